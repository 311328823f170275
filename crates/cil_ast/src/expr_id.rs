//! Arena indices for expressions.

/// Index of an `Expr` within an `ExprArena`. No `Box<Expr>` recursion —
/// every child reference is one of these flat indices.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    #[must_use]
    pub const fn new(idx: u32) -> Self {
        ExprId(idx)
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A contiguous range of `ExprId`s inside `ExprArena::expr_lists`, used for
/// call argument lists.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ExprRange {
    start: u32,
    len: u32,
}

impl ExprRange {
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        ExprRange { start: 0, len: 0 }
    }

    #[inline]
    #[must_use]
    pub const fn new(start: u32, len: u32) -> Self {
        ExprRange { start, len }
    }

    #[inline]
    #[must_use]
    pub const fn start(self) -> usize {
        self.start as usize
    }

    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.len as usize
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }
}
