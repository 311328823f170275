//! Interned identifier for the typed AST and semantic context.
//!
//! Mirrors the compiler lineage's `Name(u32)` convention ("intern
//! everything"), trimmed to a single-threaded table: the lowering pass that
//! consumes this crate is specified as strictly synchronous, so there is no
//! need for the sharded, lock-protected interner the rest of that pipeline
//! uses for concurrent, incremental compilation.

use std::fmt;

/// Interned identifier: class names, method names, attribute names, and
/// local/parameter names all live in this one namespace.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}
