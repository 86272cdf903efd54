//! The compiled, immutable NX program.
//!
//! Modeled on `defuz-regex`'s `program::Program`: a flat instruction array
//! plus the bits of metadata the matching engines need (here, the start
//! state and the two flags that tame `.`).

use crate::nx::inst::{NxState, StateId};

/// Maximum number of states a compiled program may contain.
pub const MAX_STATES: usize = 1 << 14;

/// Default, and maximum allowed, per-call fuzz budget unless a pattern's
/// compile-time `k_max` raises it.
pub const DEFAULT_K_MAX: u32 = 0;

/// Hard implementation cap on the fuzz budget, regardless of what a caller
/// requests at compile time.
pub const MAX_K_MAX: u32 = 8;

/// Flags controlling compilation of a single NX expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompileFlags {
    /// When set, `.` does not match the word-boundary symbol `_` unless `_`
    /// is written literally. Defaults to `true`.
    pub explicit_space: bool,
    /// When set, `.` does not match the punctuation symbol `'` unless `'`
    /// is written literally. Defaults to `true`.
    pub explicit_punct: bool,
    /// The maximum edit distance this program may be matched with at call
    /// time. Must not exceed [`MAX_K_MAX`].
    pub k_max: u32,
}

impl Default for CompileFlags {
    fn default() -> CompileFlags {
        CompileFlags { explicit_space: true, explicit_punct: true, k_max: DEFAULT_K_MAX }
    }
}

/// A compiled, immutable NX pattern.
///
/// Compilation is deterministic: the same expression and flags always
/// produce a byte-identical state array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nx {
    pub(crate) states: Vec<NxState>,
    pub(crate) start: StateId,
    pub(crate) original: String,
    pub(crate) flags: CompileFlags,
}

impl Nx {
    /// The original pattern expression text this program was compiled from.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The flags this program was compiled with.
    pub fn flags(&self) -> CompileFlags {
        self.flags
    }

    /// The maximum fuzz budget `k` this program may be matched with.
    pub fn k_max(&self) -> u32 {
        self.flags.k_max
    }

    /// Number of states in the compiled program.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub(crate) fn start_state(&self) -> StateId {
        self.start
    }

    pub(crate) fn state(&self, id: StateId) -> &NxState {
        &self.states[id as usize]
    }

    /// The index of the (always-last) `Accept` state.
    pub(crate) fn accept_state(&self) -> StateId {
        (self.states.len() - 1) as StateId
    }
}
