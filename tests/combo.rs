//! Integration tests for the combo engine against the wordlist
//! `{hello, world, help, helloworld}`, encoding the concrete scenarios
//! from the engine's testable-properties section.

use noodle::{combo_run, compile, CompileFlags, Cursor, Diagnostics, Nx, UniqueSink, Wordlist};

fn sample_wordlist() -> Wordlist {
    let mut wl = Wordlist::new();
    for w in ["hello", "world", "help", "helloworld"] {
        wl.add(w, 0);
    }
    wl
}

fn compiled(expr: &str) -> Nx {
    let mut diag = Diagnostics::new();
    compile(expr, CompileFlags::default(), &mut diag).unwrap()
}

#[test]
fn scenario_1_exact_match() {
    let _ = env_logger::try_init();
    let nx = compiled("hello");
    let mut diag = Diagnostics::new();
    let result = noodle::run_match(&nx, "_hello_", 0, &mut diag).unwrap();
    assert_eq!(result, Some(0));
}

#[test]
fn scenario_2_dot_matches_any_letter() {
    let nx = compiled("hel.o");
    let mut diag = Diagnostics::new();
    let result = noodle::run_match(&nx, "_hello_", 0, &mut diag).unwrap();
    assert_eq!(result, Some(0));
}

#[test]
fn scenario_3_fuzzy_match_within_budget() {
    let mut diag = Diagnostics::new();
    let nx = compile("hello", CompileFlags { k_max: 1, ..CompileFlags::default() }, &mut diag).unwrap();
    let result = noodle::run_match(&nx, "_hallo_", 1, &mut diag).unwrap();
    assert_eq!(result, Some(1));
}

#[test]
fn scenario_4_fuzzy_match_exceeds_zero_budget() {
    let nx = compiled("hello");
    let mut diag = Diagnostics::new();
    let result = noodle::run_match(&nx, "_hallo_", 0, &mut diag).unwrap();
    assert_eq!(result, None);
}

#[test]
fn scenario_5_combo_emits_both_tuple_and_single_word() {
    let wl = sample_wordlist();
    let nx = compiled("helloworld");
    let mut cursor = Cursor::new();
    let mut sink = UniqueSink::new();
    combo_run(&[nx], &wl, 2, &mut cursor, &mut sink).unwrap();
    assert!(cursor.is_done());

    // `hello` (index 0) precedes `helloworld` (index 3) in the wordlist,
    // and DFS emits the shorter tuple first.
    let tuples: Vec<&[usize]> = sink.iter().collect();
    let pos_pair = tuples.iter().position(|t| *t == &[0usize, 1usize][..]);
    let pos_single = tuples.iter().position(|t| *t == &[3usize][..]);
    assert!(pos_pair.is_some() && pos_single.is_some());
    assert!(pos_pair.unwrap() < pos_single.unwrap());
}

#[test]
fn scenario_6_cumulative_suspended_emissions_match_single_call() {
    let wl = sample_wordlist();

    let direct_nx = compiled("h.+d");
    let mut direct_cursor = Cursor::new();
    let mut direct_sink = UniqueSink::new();
    combo_run(&[direct_nx], &wl, 3, &mut direct_cursor, &mut direct_sink).unwrap();
    assert!(direct_cursor.is_done());
    let direct: Vec<Vec<usize>> = direct_sink.iter().map(|t| t.to_vec()).collect();

    let mut cursor = Cursor::new();
    let mut sink = UniqueSink::new();
    let mut calls = 0;
    loop {
        let nx = compiled("h.+d");
        cursor.set_deadline(None, Some(sink.len() as u64 + 1));
        combo_run(&[nx], &wl, 3, &mut cursor, &mut sink).unwrap();
        calls += 1;
        if cursor.is_done() || calls > direct.len() + 5 {
            break;
        }
    }
    let cumulative: Vec<Vec<usize>> = sink.iter().map(|t| t.to_vec()).collect();
    assert_eq!(direct, cumulative);
}

#[test]
fn unique_sink_suppresses_duplicate_canonical_concatenations() {
    let mut wl = Wordlist::new();
    wl.add("cat", 0);
    wl.add("cat", 0); // same canonical form, distinct index
    let nx = compiled("cat");
    let mut cursor = Cursor::new();
    let mut sink = UniqueSink::new();
    combo_run(&[nx], &wl, 1, &mut cursor, &mut sink).unwrap();
    // Both indices produce the same canonical form "_cat_"; only the
    // first is kept.
    assert_eq!(sink.len(), 1);
    assert_eq!(sink.get(0), Some(&[0usize][..]));
}

#[test]
fn no_match_when_pattern_absent_from_every_tuple() {
    let wl = sample_wordlist();
    let nx = compiled("xyz");
    let mut cursor = Cursor::new();
    let mut sink = UniqueSink::new();
    combo_run(&[nx], &wl, 2, &mut cursor, &mut sink).unwrap();
    assert!(cursor.is_done());
    assert_eq!(sink.len(), 0);
}
