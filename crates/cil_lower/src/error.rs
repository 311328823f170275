//! Internal lowering errors.
//!
//! Per the error handling design, these should be unreachable if the
//! preceding type checker is correct — they exist to fail fast with a
//! descriptive diagnostic instead of returning a partial or silently wrong
//! program. This is deliberately a small `thiserror` enum rather than the
//! full span/label/suggestion diagnostic machinery used further up the
//! pipeline: by the time a `Context` reaches this pass, there is no source
//! span left to report against.

use cil_ast::Name;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LowerError {
    #[error("unknown type {0:?} referenced during lowering")]
    UnknownType(Name),

    #[error("type {ty:?} has no method named {method:?} in its vtable")]
    UnknownMethod { ty: Name, method: Name },

    #[error("class {ty:?} has no attribute named {attr:?}")]
    UnknownAttribute { ty: Name, attr: Name },

    #[error("`case ... of ... esac` is not supported by this lowering pass")]
    UnsupportedCase,

    #[error("builtin class `{0}` missing from context")]
    MissingBuiltin(String),
}
