//! Cursor: deadline, output-count limit, and deterministic resumability
//! for a combo-engine run.
//!
//! The resumable DFS state is not a snapshot of live frontier state (an
//! arena of `(word_index, frontier_snapshot)` pairs) but just the path of
//! wordlist indices taken so far. The combo engine rebuilds the frontier
//! stack by replaying that path forward, which is cheap (bounded by
//! `N <= 10`) and keeps the cursor itself a plain, cloneable value type
//! with no borrowed or arena-allocated state to manage.

use std::time::{SystemTime, UNIX_EPOCH};

/// Resumable progress state for one `combo_run` query.
#[derive(Clone, Debug, Default)]
pub struct Cursor {
    output_index: u64,
    deadline_output_index: Option<u64>,
    deadline_ns: Option<u64>,
    path: Vec<usize>,
    finished: bool,
}

impl Cursor {
    /// Creates a fresh cursor with no deadline and an empty path.
    pub fn new() -> Cursor {
        Cursor::default()
    }

    /// Sets (or clears, with `None`) the deadline and output-count limit
    /// for subsequent `combo_run` calls using this cursor.
    pub fn set_deadline(&mut self, deadline_ns: Option<u64>, output_limit: Option<u64>) {
        self.deadline_ns = deadline_ns;
        self.deadline_output_index = output_limit;
    }

    /// `true` once a `combo_run` call has walked the entire search tree to
    /// completion without being suspended by the deadline or output limit.
    pub fn is_done(&self) -> bool {
        self.finished
    }

    /// Number of matches emitted so far across all `combo_run` calls that
    /// have used this cursor.
    pub fn output_index(&self) -> u64 {
        self.output_index
    }

    /// Human-readable rendering of the cursor's progress.
    pub fn debug(&self) -> String {
        format!(
            "output_index={} finished={} path={:?}",
            self.output_index, self.finished, self.path
        )
    }

    pub(crate) fn path(&self) -> &[usize] {
        &self.path
    }

    pub(crate) fn record_output(&mut self) {
        self.output_index += 1;
    }

    pub(crate) fn suspend(&mut self, path: Vec<usize>) {
        self.path = path;
        self.finished = false;
    }

    pub(crate) fn finish(&mut self) {
        self.path.clear();
        self.finished = true;
    }

    pub(crate) fn should_suspend(&self) -> bool {
        if let Some(limit) = self.deadline_output_index {
            if self.output_index >= limit {
                return true;
            }
        }
        if let Some(deadline) = self.deadline_ns {
            if now_ns() >= deadline {
                return true;
            }
        }
        false
    }
}

fn now_ns() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_nanos() as u64).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_cursor_is_not_done() {
        let cursor = Cursor::new();
        assert!(!cursor.is_done());
        assert!(cursor.path().is_empty());
    }

    #[test]
    fn output_limit_trips_suspend() {
        let mut cursor = Cursor::new();
        cursor.set_deadline(None, Some(2));
        cursor.record_output();
        assert!(!cursor.should_suspend());
        cursor.record_output();
        assert!(cursor.should_suspend());
    }

    #[test]
    fn finish_clears_path_and_marks_done() {
        let mut cursor = Cursor::new();
        cursor.suspend(vec![2, 0]);
        assert!(!cursor.is_done());
        cursor.finish();
        assert!(cursor.is_done());
        assert!(cursor.path().is_empty());
    }
}
