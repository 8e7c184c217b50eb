//! Whole-pipeline checks: literal source in, final parameter stack out.
//! Each case builds a fresh dictionary (`Runtime::bootstrap` compiles the
//! boot source once) and a fresh session on top of it, the shape any
//! embedder uses.

use std::rc::Rc;
use stackforth::host::PlainObjectHost;
use stackforth::value::Value;
use stackforth::{ForthError, Runtime};

fn run(source: &str) -> Runtime {
    let dictionary = Runtime::bootstrap(Rc::new(PlainObjectHost::new()));
    let mut rt = Runtime::new_ctx(dictionary, Rc::new(PlainObjectHost::new()), source);
    rt.query().expect("program should run to completion");
    rt
}

fn numbers(rt: &Runtime) -> Vec<f64> {
    rt.ctx
        .parameter_stack
        .iter()
        .map(|v| match v {
            Value::Number(n) => *n,
            other => panic!("expected number, found {:?}", other),
        })
        .collect()
}

#[test]
fn addition() {
    let rt = run("3 5 +");
    assert_eq!(numbers(&rt), vec![8.0]);
}

#[test]
fn minus_rot_reorders_three_values() {
    let rt = run("111 222 333 -rot");
    assert_eq!(numbers(&rt), vec![333.0, 111.0, 222.0]);
}

#[test]
fn nested_word_calls_run_in_place() {
    let rt = run(": inner 3 ; : outer 4 inner ; outer");
    assert_eq!(numbers(&rt), vec![4.0, 3.0]);
}

#[test]
fn if_else_endif_picks_the_true_branch() {
    let rt = run(": iffy true if true else 'X' endif ; iffy");
    match rt.ctx.parameter_stack.last().unwrap() {
        Value::Boolean(b) => assert!(*b),
        other => panic!("expected boolean, found {:?}", other),
    }
}

#[test]
fn begin_until_counts_down_to_the_threshold() {
    let rt = run(": count begin 1 - dup 1 < until ; 5 count 0 ===");
    match rt.ctx.parameter_stack.last().unwrap() {
        Value::Boolean(b) => assert!(*b),
        other => panic!("expected boolean, found {:?}", other),
    }
}

#[test]
fn each_sums_an_array() {
    let rt = run("0 [ 3 5 7 ] : addall each I + endeach ; addall");
    assert_eq!(numbers(&rt), vec![15.0]);
}

#[test]
fn variable_store_and_fetch_round_trip() {
    let rt = run("var: v 5 v ! v @");
    assert_eq!(numbers(&rt), vec![5.0]);
}

#[test]
fn regex_literal_matches_and_compares_as_equal() {
    let rt = run(r"re/ e\\d+/ ' te123st' match first ' e123' ===");
    match rt.ctx.parameter_stack.last().unwrap() {
        Value::Boolean(b) => assert!(*b),
        other => panic!("expected boolean, found {:?}", other),
    }
}

fn run_err(source: &str) -> ForthError {
    let dictionary = Runtime::bootstrap(Rc::new(PlainObjectHost::new()));
    let mut rt = Runtime::new_ctx(dictionary, Rc::new(PlainObjectHost::new()), source);
    rt.query().expect_err("program should fail")
}

#[test]
fn semicolon_with_no_open_definition_underflows_the_compilation_stack() {
    assert!(matches!(run_err(";"), ForthError::CompilationStackUnderflow));
}

#[test]
fn unknown_word_is_reported() {
    assert!(matches!(run_err("thisWordIsUndefined"), ForthError::UnknownWord(_)));
}

#[test]
fn a_raw_branch_with_no_numeric_offset_is_a_bad_branch() {
    assert!(matches!(run_err(": b branch ' f' ; b"), ForthError::BadBranch));
}

#[test]
fn clone_on_a_non_array_is_rejected() {
    assert!(matches!(run_err("5 clone"), ForthError::CloneNonArray));
}
