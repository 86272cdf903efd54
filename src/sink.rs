//! Sink: the destination for emitted combo matches.
//!
//! A small capability trait (`accept(canonical, tuple) -> bool`) rather
//! than a callback function pointer. Two stock implementations are
//! provided: [`UniqueSink`], which de-duplicates by canonical
//! concatenation, and [`WriterSink`], which formats every tuple to any
//! `std::io::Write` unconditionally.

use std::collections::HashSet;
use std::io::{self, Write};

/// A destination for tuples emitted by the combo engine.
///
/// `accept` is called once per candidate tuple found to satisfy every
/// pattern; it returns `true` if the tuple was newly accepted (and should
/// count against the cursor's output limit) or `false` if suppressed, e.g.
/// as a duplicate.
pub trait Sink {
    /// Offers one emitted tuple: `canonical` is the concatenated canonical
    /// form, `tuple` the ordered wordlist indices that produced it.
    fn accept(&mut self, canonical: &str, tuple: &[usize]) -> bool;
}

/// A sink that keeps emitted tuples in memory, de-duplicated by their
/// canonical concatenation: a set of canonical concatenations already
/// emitted is kept, and a repeat is skipped.
#[derive(Clone, Debug, Default)]
pub struct UniqueSink {
    seen: HashSet<String>,
    entries: Vec<Vec<usize>>,
}

impl UniqueSink {
    /// Creates an empty unique sink.
    pub fn new() -> UniqueSink {
        UniqueSink::default()
    }

    /// Number of distinct tuples accepted so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if no tuple has been accepted yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `i`th accepted tuple, in emission order.
    pub fn get(&self, i: usize) -> Option<&[usize]> {
        self.entries.get(i).map(Vec::as_slice)
    }

    /// Iterates over all accepted tuples, in emission order.
    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.entries.iter().map(Vec::as_slice)
    }
}

impl Sink for UniqueSink {
    fn accept(&mut self, canonical: &str, tuple: &[usize]) -> bool {
        if self.seen.insert(canonical.to_string()) {
            self.entries.push(tuple.to_vec());
            true
        } else {
            false
        }
    }
}

/// A sink that formats every accepted tuple to a writer, unconditionally
/// (non-unique mode: appends unconditionally).
pub struct WriterSink<W> {
    writer: W,
    count: usize,
}

impl<W: Write> WriterSink<W> {
    /// Wraps `writer`, formatting one line per accepted tuple.
    pub fn new(writer: W) -> WriterSink<W> {
        WriterSink { writer, count: 0 }
    }

    /// Number of tuples written so far.
    pub fn len(&self) -> usize {
        self.count
    }

    /// `true` if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Recovers the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, canonical: &str, tuple: &[usize]) -> io::Result<()> {
        write!(self.writer, "{canonical}\t")?;
        for (i, idx) in tuple.iter().enumerate() {
            if i > 0 {
                write!(self.writer, ",")?;
            }
            write!(self.writer, "{idx}")?;
        }
        writeln!(self.writer)
    }
}

impl<W: Write> Sink for WriterSink<W> {
    fn accept(&mut self, canonical: &str, tuple: &[usize]) -> bool {
        // A formatting failure (e.g. a closed pipe) has nowhere to go given
        // this trait's `bool`-only contract; drop the line rather than
        // abort the whole combo run.
        let _ = self.write_line(canonical, tuple);
        self.count += 1;
        true
    }
}
