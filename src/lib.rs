//! Noodle: a word-search engine for crossword- and puzzle-hunt
//! constructors.
//!
//! Given a wordlist and one or more pattern expressions, compiles each
//! pattern into an NX automaton ([`nx`]) and enumerates entries — single
//! words or ordered concatenations of words drawn from the list — that
//! satisfy every pattern, optionally within a bounded edit distance.
//!
//! The crate is organized leaf-first, mirroring the dependency order of
//! the engine's components:
//!
//!   - [`alphabet`] — the fixed 28-symbol alphabet and character classes.
//!   - [`nx`] — pattern compilation and single-string fuzzy matching.
//!   - [`word`] / [`wordlist`] — canonicalization and the read-only
//!     wordlist.
//!   - [`combo`] — the multi-word combinatorial search.
//!   - [`cursor`] / [`sink`] — resumable progress and result collection.
//!   - [`diagnostics`] / [`error`] — the ambient error and tracing surface.
//!
//! The surface expression language (anagram brackets, enumerations,
//! macros, wordlist selection) and any network front-end are external
//! collaborators layered on top of this crate; they are not implemented
//! here (see the crate's design notes).

pub mod alphabet;
pub mod combo;
pub mod cursor;
pub mod diagnostics;
pub mod error;
pub mod nx;
pub mod sink;
pub mod word;
pub mod wordlist;

pub use combo::combo_run;
pub use cursor::Cursor;
pub use diagnostics::Diagnostics;
pub use error::{CapacityKind, Error};
pub use nx::{compile, run_match, CompileFlags, Nx};
pub use sink::{Sink, UniqueSink, WriterSink};
pub use word::Word;
pub use wordlist::Wordlist;
