//! The NX state representation.
//!
//! Mirrors the shape of `defuz-regex`'s `inst::Inst` (`Char` / `Split` /
//! `EmptyLook` / `Match`), minus capture-group `Save` instructions — NX
//! patterns never capture submatches, they only accept or reject (with an
//! error count), so there is nothing analogous to `Inst::Save` here.

use crate::alphabet::CharClass;

/// Placeholder target used while a fragment's exit points are still
/// unpatched. Never observable once [`crate::nx::compile::compile`] returns.
pub(crate) const UNPATCHED: StateId = StateId::MAX;

/// An index into an [`crate::nx::program::Nx`]'s state array.
pub type StateId = u32;

/// A single NX automaton state.
///
/// Every state either consumes one input symbol (`Char`) or participates in
/// an ε-path (`Split`, `Jump`, the two anchors, `Accept`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NxState {
    /// Consumes one input symbol matching `class`, then continues at `next`.
    Char { class: CharClass, next: StateId },
    /// ε-transition to both `a` and `b`. Order is preserved (and matters for
    /// match-trace stability), with `a` tried before `b`.
    Split { a: StateId, b: StateId },
    /// Unconditional ε-transition to `next`, used purely for group/sequence
    /// structure so that quantifier patch lists have a stable join point.
    Jump { next: StateId },
    /// ε-transition to `next`, gated on no input having been consumed yet.
    AnchorStart { next: StateId },
    /// ε-transition to `next`, gated on no input remaining to consume.
    AnchorEnd { next: StateId },
    /// Terminal accepting state. Always the last entry in the state array.
    Accept,
}

impl NxState {
    pub(crate) fn placeholder_char(class: CharClass) -> NxState {
        NxState::Char { class, next: UNPATCHED }
    }

    pub(crate) fn placeholder_jump() -> NxState {
        NxState::Jump { next: UNPATCHED }
    }

    pub(crate) fn placeholder_split(a: StateId, b: StateId) -> NxState {
        NxState::Split { a, b }
    }

    pub(crate) fn placeholder_anchor_start() -> NxState {
        NxState::AnchorStart { next: UNPATCHED }
    }

    pub(crate) fn placeholder_anchor_end() -> NxState {
        NxState::AnchorEnd { next: UNPATCHED }
    }
}
