//! Atomize Library
//!
//! Rewrites regex atomic groups `(?>...)` into an equivalent lookahead capture
//! plus backreference, for backtracking engines without native support.

pub mod atomic;
pub mod depollute;
pub mod error;
pub mod lexer;
pub mod transform;
pub mod unescaped;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use atomic::{
    ATOMIC_GROUP_OPENER, AtomicGroupRecord, Rewrite, has_atomic_groups, rewrite_atomic_groups,
};
pub use depollute::depollute;
pub use error::{AtomizeError, Result, Span};
pub use lexer::{GroupKind, Lexeme, Lexer, Token};
pub use transform::{TransformReport, transform_atomic_groups, transform_atomic_groups_debug};
pub use unescaped::{
    Context, Needle, exists_unescaped, exists_unescaped_in_default_context, replace_unescaped,
};
