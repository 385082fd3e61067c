use cinder_value::{Machine, RuntimeErrorKind, Value};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::{error_kind, machine_for, num, run};
use crate::VmConfig;

const TICKED: &str = "
    (function square (x) (return (* x x)))
    (define total 0)
    (define i 0)
    (loop (< i 4)
      (++ i)
      (+= total (square i)))
    (return total [i total])";

fn run_ticked(source: &str, per_tick: usize) -> Vec<Value> {
    let mut vm = machine_for(source, VmConfig::default());
    while vm.is_running() {
        let ran = vm.run_steps(per_tick).unwrap();
        assert!(ran <= per_tick);
    }
    vm.stack().to_vec()
}

#[test]
fn test_backward_jump_to_user_label() {
    assert_eq!(
        run("(define n 0) (:top) (++ n) (if (< n 3) (jump :top)) (return n)"),
        vec![num(3.0)]
    );
}

#[test]
fn test_dynamic_jump_to_label_value() {
    assert_eq!(
        run("(define where :done) (jump where) 1 (:done) 2"),
        vec![num(2.0)]
    );
}

#[test]
fn test_dynamic_jump_rejects_non_labels() {
    assert_eq!(
        error_kind("(define t 4) (jump t)"),
        RuntimeErrorKind::InvalidJumpTarget("number")
    );
    assert!(matches!(
        error_kind("(define t :nowhere) (jump t)"),
        RuntimeErrorKind::LabelNotFound(_)
    ));
}

#[test]
fn test_switch_takes_first_true_clause() {
    let source = r#"
        (define x 2)
        (switch
          ((== x 1) "one")
          ((== x 2) "two")
          (true "other"))"#;
    assert_eq!(run(source), vec![Value::string("two")]);
}

#[test]
fn test_if_and_unless() {
    assert_eq!(
        run(r#"(define x 5) (if (> x 1) "big" "small") (unless (> x 1) "small")"#),
        vec![Value::string("big")]
    );
}

#[test]
fn test_only_true_counts_as_true() {
    assert_eq!(run(r#"(if 0 "yes" "no")"#), vec![Value::string("yes")]);
}

#[test]
fn test_break_and_continue() {
    let source = "
        (define i 0)
        (define odd 0)
        (loop true
          (++ i)
          (if (> i 6) (break))
          (if (== (% i 2) 0) (continue))
          (++ odd))
        (return odd)";
    assert_eq!(run(source), vec![num(3.0)]);
}

#[test]
fn test_builtin_pause_and_host_resume() {
    let mut vm = machine_for("(define n 1) (wait) (+= n 2) (return n)", VmConfig::default());
    vm.run().unwrap();
    assert!(vm.is_running());
    assert!(vm.is_paused());
    assert_eq!(vm.global_scope().get("n"), Some(num(1.0)));

    vm.resume();
    vm.run().unwrap();
    assert!(!vm.is_running());
    assert_eq!(vm.stack(), &[num(3.0)]);
}

#[test]
fn test_step_is_inert_while_paused() {
    let mut vm = machine_for("(wait) 1 2", VmConfig::default());
    vm.run().unwrap();
    let pc = vm.pc;

    for _ in 0..3 {
        vm.step().unwrap();
    }
    assert_eq!(vm.pc, pc);
    assert!(vm.stack().is_empty());
    assert_eq!(vm.run_steps(10).unwrap(), 0);
}

#[test]
fn test_halted_machine_ignores_steps() {
    let mut vm = machine_for("(return 1) 2", VmConfig::default());
    vm.run().unwrap();
    vm.step().unwrap();
    assert_eq!(vm.stack(), &[num(1.0)]);
}

#[test]
fn test_single_steps_match_full_run() {
    assert_eq!(run_ticked(TICKED, 1), run(TICKED));
    assert_eq!(
        run(TICKED),
        vec![num(30.0), Value::array(vec![num(4.0), num(30.0)])]
    );
}

#[test]
fn test_call_depth_unwinds() {
    let mut vm = machine_for(
        "(function f () (wait) (return 1)) (f)",
        VmConfig::default(),
    );
    vm.run().unwrap();
    assert_eq!(vm.call_depth(), 1);
    vm.resume();
    vm.run().unwrap();
    assert_eq!(vm.call_depth(), 0);
    assert_eq!(vm.pop_result(), Some(num(1.0)));
}

proptest! {
    #[test]
    fn prop_tick_size_does_not_change_results(per_tick in 1usize..40) {
        prop_assert_eq!(run_ticked(TICKED, per_tick), run(TICKED));
    }
}
