mod common;

use common::{eval_ok, shown, shown_lines};
use zisk::core::value::Value;

#[test]
fn while_loop_shows_each_iteration_in_order() {
    let writes = shown("var i=0; mientras(i<3){ mostrar(i); i=i+1; }");
    assert_eq!(writes.len(), 3);
    for (i, write) in writes.iter().enumerate() {
        assert_eq!(write.len(), 1);
        assert!(matches!(write[0], Value::Integer(n) if n == i as i64));
    }
}

#[test]
fn if_else_chain_takes_the_matching_branch() {
    let lines = shown_lines(
        "var n = 7;
         si (n < 5) { mostrar(\"bajo\"); }
         sino si (n < 10) { mostrar(\"medio\"); }
         sino { mostrar(\"alto\"); }",
    );
    assert_eq!(lines, vec!["medio"]);
}

#[test]
fn entonces_is_optional_sugar() {
    let lines = shown_lines("si (verdadero) entonces { mostrar(1); }");
    assert_eq!(lines, vec!["1"]);
}

#[test]
fn for_loop_with_declaration_counts() {
    let lines = shown_lines("para (var i = 0; i < 3; i = i + 1) { mostrar(i); }");
    assert_eq!(lines, vec!["0", "1", "2"]);
}

#[test]
fn for_loop_continue_still_runs_the_step() {
    let lines = shown_lines(
        "para (var i = 0; i < 5; i = i + 1) {
             si (i % 2 == 0) { continua; }
             mostrar(i);
         }",
    );
    assert_eq!(lines, vec!["1", "3"]);
}

#[test]
fn break_exits_only_the_innermost_loop() {
    let lines = shown_lines(
        "para (var i = 0; i < 2; i = i + 1) {
             var j = 0;
             mientras (verdadero) {
                 si (j == 1) { romper; }
                 mostrar(i, j);
                 j = j + 1;
             }
         }",
    );
    assert_eq!(lines, vec!["0 0", "1 0"]);
}

#[test]
fn do_while_runs_the_body_at_least_once() {
    let lines = shown_lines("hacer_mientras { mostrar(\"una vez\"); } mientras falso");
    assert_eq!(lines, vec!["una vez"]);
}

#[test]
fn do_while_repeats_until_condition_fails() {
    let lines = shown_lines(
        "var i = 0;
         hacer_mientras { mostrar(i); i = i + 1; } mientras i < 3",
    );
    assert_eq!(lines, vec!["0", "1", "2"]);
}

#[test]
fn for_init_binding_lives_across_iterations() {
    // The init variable is one binding reused by every iteration.
    let value = eval_ok(
        "var total = 0;
         para (var i = 0; i < 4; i = i + 1) { total = total + i; }
         total",
    );
    assert!(matches!(value, Value::Integer(6)));
}

#[test]
fn loop_body_scope_is_fresh_per_iteration() {
    // A `var` inside the body must not collide with itself across
    // iterations.
    let lines = shown_lines(
        "para (var i = 0; i < 2; i = i + 1) {
             var dentro = i * 10;
             mostrar(dentro);
         }",
    );
    assert_eq!(lines, vec!["0", "10"]);
}

#[test]
fn logical_operators_short_circuit() {
    // The right side would fault; short-circuiting must skip it.
    let lines = shown_lines(
        "var xs = [1];
         si (falso && xs[5] == 1) { mostrar(\"no\"); } sino { mostrar(\"si\"); }
         si (verdadero || xs[5] == 1) { mostrar(\"tambien\"); }",
    );
    assert_eq!(lines, vec!["si", "tambien"]);
}
