mod common;

use common::{eval_ok, interpreter, runtime_error, shown_lines, RecordingHost};
use std::cell::RefCell;
use std::rc::Rc;
use zisk::core::error::ErrorKind;
use zisk::core::interpreter::Interpreter;
use zisk::core::value::Value;

#[test]
fn typed_declarations_without_initializer_get_type_defaults() {
    assert!(matches!(eval_ok("var n: entero; n"), Value::Integer(0)));
    assert!(matches!(eval_ok("var d: decimal; d"), Value::Float(f) if f == 0.0));
    assert!(matches!(eval_ok("var s: texto; s"), Value::Text(ref s) if s.is_empty()));
    assert!(matches!(eval_ok("var b: booleano; b"), Value::Boolean(false)));
    assert!(matches!(eval_ok("var l: lista; longitud(l)"), Value::Integer(0)));
    assert!(matches!(eval_ok("var o: objeto; longitud(o)"), Value::Integer(0)));
    assert!(matches!(eval_ok("var x; x"), Value::Null));
}

#[test]
fn declared_types_are_enforced_on_declaration_and_reassignment() {
    assert_eq!(runtime_error("var n: entero = \"uno\";").kind, ErrorKind::Type);
    assert_eq!(runtime_error("var n: entero = 1; n = 2.5;").kind, ErrorKind::Type);
    // Untyped variables accept anything.
    assert!(matches!(eval_ok("var x = 1; x = \"texto\"; x"), Value::Text(_)));
}

#[test]
fn integer_and_decimal_are_distinct_types() {
    assert_eq!(runtime_error("var d: decimal = 5;").kind, ErrorKind::Type);
    assert!(matches!(eval_ok("var d: decimal = 5.0; d"), Value::Float(_)));
}

#[test]
fn division_always_promotes_to_decimal() {
    assert!(matches!(eval_ok("10 / 2"), Value::Float(f) if f == 5.0));
    assert!(matches!(eval_ok("tipo_de(10 / 2)"), Value::Text(ref s) if s == "decimal"));
    // Every other integer operation stays integral.
    assert!(matches!(eval_ok("tipo_de(10 * 2)"), Value::Text(ref s) if s == "entero"));
    assert!(matches!(eval_ok("10 % 3"), Value::Integer(1)));
}

#[test]
fn modulo_follows_the_sign_of_the_divisor() {
    assert!(matches!(eval_ok("-7 % 3"), Value::Integer(2)));
    assert!(matches!(eval_ok("7 % -3"), Value::Integer(-2)));
}

#[test]
fn text_concatenation_stringifies_mixed_operands() {
    assert!(matches!(eval_ok("\"n = \" + 5"), Value::Text(ref s) if s == "n = 5"));
    assert!(matches!(eval_ok("5 + \" = n\""), Value::Text(ref s) if s == "5 = n"));
    assert!(matches!(eval_ok("\"a\" + \"b\""), Value::Text(ref s) if s == "ab"));
}

#[test]
fn equality_is_deep_for_composites() {
    assert!(matches!(eval_ok("[1, [2, 3]] == [1, [2, 3]]"), Value::Boolean(true)));
    assert!(matches!(eval_ok("[1, [2, 3]] == [1, [2, 4]]"), Value::Boolean(false)));
    // A `{` at statement position opens a block, so bind the maps first.
    assert!(matches!(
        eval_ok("var a = {a: 1, b: 2}; var b = {b: 2, a: 1}; a == b"),
        Value::Boolean(true)
    ));
    assert!(matches!(eval_ok("1 == 1.0"), Value::Boolean(true)));
    assert!(matches!(eval_ok("1 != 2"), Value::Boolean(true)));
}

#[test]
fn tipo_de_infers_dynamic_kinds() {
    let lines = shown_lines(
        "mostrar(tipo_de(1), tipo_de(1.5), tipo_de(\"a\"), tipo_de(verdadero), \
         tipo_de(nulo), tipo_de([1]), tipo_de({a: 1}), tipo_de(longitud));",
    );
    assert_eq!(lines, vec!["entero decimal texto booleano nulo lista objeto funcion"]);
}

#[test]
fn longitud_counts_text_lists_and_maps() {
    assert!(matches!(eval_ok("longitud(\"hola\")"), Value::Integer(4)));
    assert!(matches!(eval_ok("longitud([1, 2, 3])"), Value::Integer(3)));
    assert!(matches!(eval_ok("longitud({a: 1})"), Value::Integer(1)));
    assert!(runtime_error("longitud(5)").message.contains("length"));
}

#[test]
fn conversions_round_trip_and_fault_loudly() {
    assert!(matches!(eval_ok("convertir_a_entero(\"42\")"), Value::Integer(42)));
    assert!(matches!(eval_ok("convertir_a_entero(3.9)"), Value::Integer(3)));
    assert!(matches!(eval_ok("convertir_a_entero(verdadero)"), Value::Integer(1)));
    assert!(matches!(eval_ok("convertir_a_decimal(\"2.5\")"), Value::Float(f) if f == 2.5));
    assert!(matches!(eval_ok("convertir_a_texto(5)"), Value::Text(ref s) if s == "5"));
    assert!(matches!(eval_ok("convertir_a_booleano(\"falso\")"), Value::Boolean(false)));
    assert!(matches!(eval_ok("convertir_a_booleano(\"hola\")"), Value::Boolean(true)));
    assert!(matches!(eval_ok("convertir_a_booleano(0)"), Value::Boolean(false)));

    // Never a silent default value.
    let err = runtime_error("convertir_a_entero(\"cuatro\")");
    assert!(err.message.contains("cannot convert"));
}

#[test]
fn mostrar_renders_composites_deterministically() {
    let lines = shown_lines("mostrar([1, \"a\", verdadero], {b: 2, a: 1});");
    assert_eq!(lines, vec!["[1, \"a\", verdadero] {\"a\": 1, \"b\": 2}"]);
}

#[test]
fn mostrar_renders_floats_with_a_decimal_point() {
    let lines = shown_lines("mostrar(10 / 2, 2.5, nulo, falso);");
    assert_eq!(lines, vec!["5.0 2.5 nulo falso"]);
}

#[test]
fn ingresar_reads_a_line_from_the_host() {
    let host = Rc::new(RefCell::new(RecordingHost::with_input(&["Ana"])));
    let mut interp = Interpreter::with_host(host.clone());
    interp
        .evaluate("var nombre = ingresar(\"nombre: \"); mostrar(\"hola\", nombre);")
        .expect("evaluates");
    let writes = host.borrow().writes.clone();
    let line: Vec<String> = writes[0].iter().map(|v| v.to_string()).collect();
    assert_eq!(line, vec!["hola", "Ana"]);
}

#[test]
fn ingresar_yields_null_at_end_of_input() {
    let host = Rc::new(RefCell::new(RecordingHost::new()));
    let mut interp = Interpreter::with_host(host);
    let value = interp.evaluate("ingresar()").expect("evaluates");
    assert!(matches!(value, Value::Null));
}

#[test]
fn list_and_map_mutation_through_assignment() {
    let lines = shown_lines(
        "var xs = [1, 2, 3];
         xs[0] = 10;
         xs[1] += 5;
         xs[3] = 4;
         mostrar(xs);
         var m = {a: 1};
         m[\"b\"] = 2;
         m.a += 1;
         mostrar(m);",
    );
    assert_eq!(lines, vec!["[10, 7, 3, 4]", "{\"a\": 2, \"b\": 2}"]);
}

#[test]
fn compound_assignment_on_missing_entries_faults() {
    assert_eq!(runtime_error("var xs = [1]; xs[5] += 1;").kind, ErrorKind::Index);
    assert_eq!(runtime_error("var m = {a: 1}; m[\"b\"] += 1;").kind, ErrorKind::Key);
}

#[test]
fn lists_share_by_reference() {
    let lines = shown_lines("var a = [1]; var b = a; b[0] = 9; mostrar(a);");
    assert_eq!(lines, vec!["[9]"]);
}

#[test]
fn evaluate_keeps_state_across_calls() {
    let (mut interp, host) = interpreter();
    interp.evaluate("var x = 1;").expect("declare");
    interp.evaluate("x = x + 1;").expect("mutate");
    interp.evaluate("mostrar(x);").expect("show");
    let writes = host.borrow().writes.clone();
    assert!(matches!(writes[0][0], Value::Integer(2)));
}
