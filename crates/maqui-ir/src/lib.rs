#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

pub mod builtin;
pub mod ir;
pub mod lower;
pub mod value;

pub use ir::Module;
pub use lower::{is_block_expr, lower, LowerError};
pub use value::ValueLookup;
