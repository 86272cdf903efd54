//! The fuzzy matching engine: a layered bitset frontier, one layer
//! per error count `0..=k`, simulated the way `defuz-regex`'s
//! `exec::Threads` drives an NFA — except each step now fans out across
//! `k + 1` parallel state sets rather than one, with cross-layer edges for
//! substitution, insertion, and deletion.
//!
//! Layer `j` holds the (epsilon-closed) set of `Char`/`Accept` states
//! reachable after the input consumed so far, using exactly `j` edits.
//! Within a step, an input symbol advances a `Char` state to `next` in the
//! same layer when it matches (no edit spent) and in layer `j + 1` either
//! way (substitution); every state in layer `j` also survives unchanged
//! into layer `j + 1` of the *next* step (insertion, the input symbol is
//! treated as spurious). Deletion — skipping a required pattern symbol — is
//! folded into epsilon-closure itself: closing a `Char` state in layer `j`
//! also seeds its `next` into layer `j + 1`, since that costs an edit but
//! consumes no input.

use crate::alphabet::Symbol;
use crate::diagnostics::{Diagnostics, Level};
use crate::error::{CapacityKind, Error};
use crate::nx::inst::{NxState, StateId};
use crate::nx::program::Nx;

/// A fixed-size bitset over state ids, sized to one program's state count.
#[derive(Clone)]
struct Bitset {
    words: Vec<u64>,
}

impl Bitset {
    fn new(len: usize) -> Bitset {
        Bitset { words: vec![0u64; len.div_ceil(64)] }
    }

    /// Inserts `id`, returning `true` if it wasn't already present.
    fn insert(&mut self, id: usize) -> bool {
        let word = id / 64;
        let bit = 1u64 << (id % 64);
        let was_set = self.words[word] & bit != 0;
        self.words[word] |= bit;
        !was_set
    }

    fn contains(&self, id: usize) -> bool {
        self.words[id / 64] & (1u64 << (id % 64)) != 0
    }

    fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.words.iter().enumerate().flat_map(|(word_idx, &word)| {
            (0..64usize).filter(move |bit| word & (1u64 << *bit) != 0).map(move |bit| (word_idx * 64 + bit) as StateId)
        })
    }
}

/// Closes `pending[0..=k]` under epsilon-transitions, producing the
/// resulting per-layer state sets. `pending` is consumed and left empty;
/// closing layer `j` may append to `pending[j + 1]` (deletion).
fn close(nfa: &Nx, pending: &mut [Vec<StateId>], at_start: bool, at_end: bool) -> Vec<Bitset> {
    let k = pending.len() - 1;
    let n = nfa.state_count();
    let mut layers = vec![Bitset::new(n); k + 1];

    for j in 0..=k {
        let mut visited = Bitset::new(n);
        let mut worklist = std::mem::take(&mut pending[j]);
        while let Some(id) = worklist.pop() {
            if !visited.insert(id as usize) {
                continue;
            }
            match nfa.state(id) {
                NxState::Split { a, b } => {
                    worklist.push(*a);
                    worklist.push(*b);
                }
                NxState::Jump { next } => worklist.push(*next),
                NxState::AnchorStart { next } => {
                    if at_start {
                        worklist.push(*next);
                    }
                }
                NxState::AnchorEnd { next } => {
                    if at_end {
                        worklist.push(*next);
                    }
                }
                NxState::Char { next, .. } => {
                    layers[j].insert(id as usize);
                    if j < k {
                        pending[j + 1].push(*next);
                    }
                }
                NxState::Accept => {
                    layers[j].insert(id as usize);
                }
            }
        }
    }
    layers
}

/// A live fuzzy-matching run against a single compiled [`Nx`] program.
///
/// Exposed at `pub(crate)` visibility so the combo engine can drive
/// several of these in lockstep, one per pattern in a query, feeding
/// symbols across word boundaries without knowing the total input length
/// up front.
#[derive(Clone)]
pub(crate) struct Frontier<'a> {
    nfa: &'a Nx,
    layers: Vec<Bitset>,
}

impl<'a> Frontier<'a> {
    /// Starts a frontier at the beginning of the input. `at_end` should be
    /// `true` only if the caller already knows the input is empty.
    pub(crate) fn new(nfa: &'a Nx, k: u32, at_end: bool) -> Frontier<'a> {
        let k = k as usize;
        let mut pending = vec![Vec::new(); k + 1];
        pending[0].push(nfa.start_state());
        let layers = close(nfa, &mut pending, true, at_end);
        Frontier { nfa, layers }
    }

    /// `true` if no layer holds any reachable state: the frontier can never
    /// accept regardless of what input follows.
    pub(crate) fn is_dead(&self) -> bool {
        self.layers.iter().all(|l| l.is_empty())
    }

    /// The minimum error count at which the accept state is currently
    /// reachable, if any.
    pub(crate) fn accepted(&self) -> Option<u32> {
        let accept = self.nfa.accept_state() as usize;
        self.layers.iter().position(|l| l.contains(accept)).map(|j| j as u32)
    }

    /// Advances the frontier by one input symbol. `at_end` should be `true`
    /// exactly when this is the last symbol of the input.
    pub(crate) fn step(&mut self, sym: Symbol, at_end: bool) {
        let k = self.layers.len() - 1;
        let mut pending: Vec<Vec<StateId>> = vec![Vec::new(); k + 1];
        for (j, layer) in self.layers.iter().enumerate() {
            for id in layer.iter() {
                if let NxState::Char { class, next } = self.nfa.state(id) {
                    if class.contains(sym) {
                        pending[j].push(*next); // exact match, no new error
                    }
                    if j < k {
                        pending[j + 1].push(*next); // substitution
                    }
                }
                if j < k {
                    pending[j + 1].push(id); // insertion: this symbol is spurious
                }
            }
        }
        self.layers = close(self.nfa, &mut pending, false, at_end);
    }
}

/// Converts a canonical-form string into alphabet symbols, failing if any
/// byte has no symbol (i.e. `input` is not itself a canonical form).
fn canonical_symbols(input: &str) -> Option<Vec<Symbol>> {
    input.bytes().map(Symbol::from_byte).collect()
}

/// Matches `input` (already in canonical form) against `nfa`, allowing up
/// to `k` edits, and returns the minimum number of edits needed to accept
/// it, or `None` if it cannot be matched within budget.
pub fn run_match(nfa: &Nx, input: &str, k: u32, diag: &mut Diagnostics) -> Result<Option<u32>, Error> {
    if k > nfa.k_max() {
        return Err(Error::Capacity { kind: CapacityKind::FuzzBudget });
    }
    let symbols = canonical_symbols(input).ok_or(Error::InvalidInput)?;

    let mut frontier = Frontier::new(nfa, k, symbols.is_empty());
    for (i, &sym) in symbols.iter().enumerate() {
        if frontier.is_dead() {
            break;
        }
        let at_end = i + 1 == symbols.len();
        frontier.step(sym, at_end);
    }
    let result = frontier.accepted();
    diag.record(Level::Trace, format!("match '{input}' against '{}' -> {result:?}", nfa.original()));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::nx::compile::compile;
    use crate::nx::program::CompileFlags;

    fn nx(expr: &str, k_max: u32) -> Nx {
        let mut diag = Diagnostics::new();
        compile(expr, CompileFlags { k_max, ..CompileFlags::default() }, &mut diag).unwrap()
    }

    fn run(nfa: &Nx, input: &str, k: u32) -> Result<Option<u32>, Error> {
        let mut diag = Diagnostics::new();
        run_match(nfa, input, k, &mut diag)
    }

    #[test]
    fn exact_match() {
        let p = nx("hello", 0);
        assert_eq!(run(&p, "_hello_", 0).unwrap(), Some(0));
        assert_eq!(run(&p, "_hellp_", 0).unwrap(), None);
    }

    #[test]
    fn dot_matches_any_letter() {
        let p = nx("h.llo", 0);
        assert_eq!(run(&p, "_hello_", 0).unwrap(), Some(0));
        assert_eq!(run(&p, "_hallo_", 0).unwrap(), Some(0));
    }

    #[test]
    fn class_and_alternation() {
        let p = nx("c(a|o)t", 0);
        assert_eq!(run(&p, "_cat_", 0).unwrap(), Some(0));
        assert_eq!(run(&p, "_cot_", 0).unwrap(), Some(0));
        assert_eq!(run(&p, "_cut_", 0).unwrap(), None);
    }

    #[test]
    fn star_and_plus() {
        let p = nx("ab*c", 0);
        assert_eq!(run(&p, "_ac_", 0).unwrap(), Some(0));
        assert_eq!(run(&p, "_abbbc_", 0).unwrap(), Some(0));

        let p = nx("ab+c", 0);
        assert_eq!(run(&p, "_ac_", 0).unwrap(), None);
        assert_eq!(run(&p, "_abc_", 0).unwrap(), Some(0));
    }

    #[test]
    fn substitution_costs_one_error() {
        let p = nx("hello", 1);
        assert_eq!(run(&p, "_hallo_", 1).unwrap(), Some(1));
        assert_eq!(run(&p, "_hallo_", 0).unwrap(), None);
    }

    #[test]
    fn insertion_and_deletion_cost_one_error() {
        let p = nx("hello", 1);
        assert_eq!(run(&p, "_helllo_", 1).unwrap(), Some(1)); // insertion
        assert_eq!(run(&p, "_hllo_", 1).unwrap(), Some(1)); // deletion
    }

    #[test]
    fn rejects_k_above_compiled_ceiling() {
        let p = nx("hello", 1);
        assert!(matches!(run(&p, "_hello_", 2), Err(Error::Capacity { .. })));
    }

    #[test]
    fn rejects_non_canonical_input() {
        let p = nx("hello", 0);
        assert!(matches!(run(&p, "Hello!", 0), Err(Error::InvalidInput)));
    }

    #[test]
    fn counted_quantifier_unrolls_bounds() {
        let p = nx("a{2,3}", 0);
        // Too few `a`s anywhere for the implicit `.*` slack to find a run.
        assert_eq!(run(&p, "_a_", 0).unwrap(), None);
        assert_eq!(run(&p, "_aa_", 0).unwrap(), Some(0));
        assert_eq!(run(&p, "_aaa_", 0).unwrap(), Some(0));
        // Slack absorbs one of the four `a`s, leaving a run within range.
        assert_eq!(run(&p, "_aaaa_", 0).unwrap(), Some(0));
    }

    /// Monotonicity (§8): widening the fuzz budget can never turn a match
    /// into a non-match, nor raise the minimum error count.
    #[quickcheck_macros::quickcheck]
    fn monotonic_in_fuzz_budget(word: String) -> bool {
        let Some(canonical) = crate::word::canonicalize(&word) else { return true };
        let p = nx("hello", 3);
        let mut prev: Option<u32> = None;
        for k in 0..=3 {
            let got = run(&p, &canonical, k).unwrap();
            if let (Some(prev_e), Some(e)) = (prev, got) {
                if e > prev_e {
                    return false;
                }
            }
            if prev.is_some() && got.is_none() {
                return false;
            }
            prev = got;
        }
        true
    }

    /// Edit-distance soundness (§8): whenever a fuzzy match reports `e`
    /// errors, brute-force Levenshtein distance to the one string the
    /// pattern's language contains (`hello`) is never more than `e`.
    #[quickcheck_macros::quickcheck]
    fn fuzzy_errors_bound_levenshtein_distance(word: String) -> bool {
        let Some(canonical) = crate::word::canonicalize(&word) else { return true };
        let p = nx("hello", 3);
        match run(&p, &canonical, 3).unwrap() {
            None => true,
            Some(e) => levenshtein(&canonical, "_hello_") <= e as usize,
        }
    }

    fn levenshtein(a: &str, b: &str) -> usize {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let mut row: Vec<usize> = (0..=b.len()).collect();
        for i in 1..=a.len() {
            let mut prev_diag = row[0];
            row[0] = i;
            for j in 1..=b.len() {
                let tmp = row[j];
                row[j] = if a[i - 1] == b[j - 1] {
                    prev_diag
                } else {
                    1 + prev_diag.min(row[j]).min(row[j - 1])
                };
                prev_diag = tmp;
            }
        }
        row[b.len()]
    }
}
