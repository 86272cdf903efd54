//! The NX pattern engine: compiles a small pattern language into an NFA
//! and matches it against canonical strings with bounded edit distance.

mod compile;
mod inst;
mod matcher;
mod program;

pub use compile::compile;
pub use matcher::run_match;
pub use program::{CompileFlags, Nx, DEFAULT_K_MAX, MAX_K_MAX, MAX_STATES};

pub(crate) use matcher::Frontier;
