//! String interner backing `Name`.

use rustc_hash::FxHashMap;

use crate::name::Name;

/// Single-threaded string interner.
///
/// The preceding passes (lexer, parser, type checker) are the producers of
/// `Name`s consumed here; this interner is typically populated once by
/// whatever glue code constructs a `cil_ast::Program` + `Context` and then
/// treated as read-only for the remainder of lowering.
#[derive(Default)]
pub struct StringInterner {
    map: FxHashMap<Box<str>, Name>,
    strings: Vec<Box<str>>,
}

impl StringInterner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::expect_used, reason = "a module with u32::MAX distinct identifiers cannot exist")]
    pub fn intern(&mut self, s: &str) -> Name {
        if let Some(&name) = self.map.get(s) {
            return name;
        }
        let idx = u32::try_from(self.strings.len()).expect("interner exceeded u32::MAX entries");
        let boxed: Box<str> = s.into();
        self.strings.push(boxed.clone());
        let name = Name::from_raw(idx);
        self.map.insert(boxed, name);
        name
    }

    #[must_use]
    pub fn lookup(&self, name: Name) -> &str {
        &self.strings[name.raw() as usize]
    }
}
