//! Combo engine: depth-first enumeration of ordered wordlist tuples whose
//! concatenated canonical form satisfies every supplied [`Nx`] pattern,
//! advancing a composite frontier (one [`Frontier`] per pattern) in
//! lockstep across the word-boundary marker between tuple components.
//!
//! Concatenation contract: adjacent words share their boundary marker
//! rather than each contributing its own `_`, so the tuple
//! `(hello, world)` is matched as the single stream `_helloworld_` — the
//! same canonical form the single wordlist entry `helloworld` would
//! produce. Concretely: the committed stream is one leading `_`, followed
//! by each word's *core* (its canonical form with both boundary markers
//! stripped), with the trailing `_` only ever tested virtually (never
//! committed to the persisted frontier) when checking whether the tuple
//! built so far is a complete match. A literal `_` between every pair of
//! words would make a tuple like `(hello, world)` unable to ever satisfy a
//! pattern like `helloworld`, which concatenation is supposed to support.

use crate::alphabet::Symbol;
use crate::cursor::Cursor;
use crate::error::{CapacityKind, Error};
use crate::nx::{Frontier, Nx};
use crate::sink::Sink;
use crate::wordlist::Wordlist;

/// The word-boundary symbol, consumed once at the very start of a combo
/// candidate stream and probed virtually at every potential end.
fn boundary() -> Symbol {
    Symbol::from_byte(b'_').unwrap()
}

/// Hard cap on tuple length: ordered tuples of wordlist indices of
/// length `1..=N` with `N <= 10`.
pub const MAX_TUPLE_LEN: usize = 10;

/// A composite frontier: one [`Frontier`] per pattern in the query,
/// advanced together through the shared candidate stream.
#[derive(Clone)]
struct FrontierSet<'a> {
    frontiers: Vec<Frontier<'a>>,
}

impl<'a> FrontierSet<'a> {
    /// Starts a fresh composite frontier and consumes the single leading
    /// `_` that opens every combo candidate stream.
    fn root(nxs: &'a [Nx]) -> FrontierSet<'a> {
        let mut frontiers: Vec<Frontier<'a>> =
            nxs.iter().map(|nx| Frontier::new(nx, nx.k_max(), false)).collect();
        for f in &mut frontiers {
            f.step(boundary(), false);
        }
        FrontierSet { frontiers }
    }

    /// `true` if any pattern's frontier can never accept regardless of
    /// what follows: every error layer's bitset is empty, so the branch
    /// can be abandoned immediately.
    fn any_dead(&self) -> bool {
        self.frontiers.iter().any(Frontier::is_dead)
    }

    /// Advances every frontier through one word's core (its canonical form
    /// with the boundary markers stripped), symbol by symbol. Word cores
    /// never carry the stream's real end, since another word (or the
    /// virtual trailing `_`) always follows.
    fn advance_core(&mut self, core: &str) {
        for &b in core.as_bytes() {
            let sym = Symbol::from_byte(b).expect("wordlist cores contain only alphabet bytes");
            for f in &mut self.frontiers {
                f.step(sym, false);
            }
        }
    }

    /// Probes whether every pattern accepts if the stream ended right here
    /// (a virtual trailing `_`), without committing that symbol to the
    /// persisted frontier — so a later, deeper tuple can still extend past
    /// this point.
    fn accepts_here(&self) -> bool {
        self.frontiers.iter().all(|f| {
            let mut probe = f.clone();
            probe.step(boundary(), true);
            probe.accepted().is_some()
        })
    }
}

/// Runs (or resumes) a combo search: enumerates ordered tuples of 1..=`n`
/// wordlist indices whose concatenated canonical form satisfies every
/// pattern in `nxs`, feeding accepted tuples to `sink`.
///
/// Cooperative and resumable: progress is checked at each outer word
/// iteration, and on suspension the current DFS path is
/// recorded in `cursor` so a later call with the same cursor continues
/// exactly where this one left off, in wordlist order.
pub fn combo_run(
    nxs: &[Nx],
    wordlist: &Wordlist,
    n: usize,
    cursor: &mut Cursor,
    sink: &mut dyn Sink,
) -> Result<(), Error> {
    if n == 0 || n > MAX_TUPLE_LEN {
        return Err(Error::Capacity { kind: CapacityKind::TupleLength });
    }

    let resume: Vec<usize> = cursor.path().to_vec();
    let root = FrontierSet::root(nxs);
    let mut path = Vec::with_capacity(n);
    let on_chain = !resume.is_empty();
    let suspended = visit(&root, &mut path, &resume, on_chain, 0, wordlist, n, cursor, sink);

    if suspended {
        cursor.suspend(path);
    } else {
        cursor.finish();
    }
    Ok(())
}

/// Explores one depth of the search tree: every remaining wordlist word
/// that keeps every pattern's frontier alive, in wordlist order.
///
/// Suspension is only ever checked before a node is touched (top of the
/// loop below), so every index this function pushes onto `path` is, at
/// that moment, a node that has never been emitted or recursed into —
/// whether this call is a fresh search or a resumption. That invariant
/// keeps resumption simple: a resumed node is processed exactly like a
/// fresh one, just starting its sibling scan at `resume[depth]` instead of
/// `0`. `on_chain` tracks whether this call is still following the
/// recorded path (`resume[depth]` is meaningful) or has already diverged
/// from it into genuinely unexplored territory.
fn visit(
    frontier: &FrontierSet<'_>,
    path: &mut Vec<usize>,
    resume: &[usize],
    on_chain: bool,
    depth: usize,
    wordlist: &Wordlist,
    n: usize,
    cursor: &mut Cursor,
    sink: &mut dyn Sink,
) -> bool {
    let start_idx = if on_chain { resume[depth] } else { 0 };

    for idx in start_idx..wordlist.len() {
        if cursor.should_suspend() {
            // Record `idx` itself as the resume point: it has not been
            // touched yet, so resuming re-enters this exact loop at this
            // exact index rather than skipping or repeating work.
            path.push(idx);
            return true;
        }

        let word = match wordlist.get(idx) {
            Some(w) => w,
            None => continue,
        };

        let mut next = frontier.clone();
        next.advance_core(word.core());
        if next.any_dead() {
            continue;
        }

        path.push(idx);

        // Only the very first sibling tried at this depth can still be on
        // the recorded path; everything after it is unexplored. And of that
        // first sibling, only a resume index strictly before the path's
        // last entry names a node the suspended run had already pushed,
        // accepted-checked, and recursed into — the last entry is always
        // the untouched node the suspension recorded, so it still needs its
        // accept check and recursion run exactly like a fresh node.
        let already_processed = on_chain && idx == start_idx && depth + 1 < resume.len();

        if !already_processed && next.accepts_here() {
            let canonical = render_canonical(wordlist, path);
            if sink.accept(&canonical, path) {
                cursor.record_output();
            }
        }

        if path.len() < n {
            let suspended =
                visit(&next, path, resume, already_processed, depth + 1, wordlist, n, cursor, sink);
            if suspended {
                return true;
            }
        }

        path.pop();
    }

    false
}

/// Renders the canonical concatenation a tuple produces: one leading `_`,
/// each word's core back to back, one trailing `_` (§3, §4.3).
fn render_canonical(wordlist: &Wordlist, path: &[usize]) -> String {
    let mut out = String::from("_");
    for &idx in path {
        if let Some(word) = wordlist.get(idx) {
            out.push_str(word.core());
        }
    }
    out.push('_');
    out
}
