mod common;

use common::{eval_ok, runtime_error, shown, shown_lines};
use zisk::core::error::ErrorKind;
use zisk::core::value::Value;

#[test]
fn function_call_end_to_end() {
    let writes = shown("funcion suma(a,b){ retorna a+b; } mostrar(suma(5,10));");
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].len(), 1);
    assert!(matches!(writes[0][0], Value::Integer(15)));
}

#[test]
fn closures_capture_by_reference_not_by_value() {
    // The closure observes a mutation made after its declaration.
    let lines = shown_lines(
        "var x = 1;
         funcion leer() { retorna x; }
         x = 42;
         mostrar(leer());",
    );
    assert_eq!(lines, vec!["42"]);
}

#[test]
fn closures_can_mutate_captured_variables() {
    let lines = shown_lines(
        "var contador = 0;
         funcion incrementar() { contador = contador + 1; }
         incrementar();
         incrementar();
         mostrar(contador);",
    );
    assert_eq!(lines, vec!["2"]);
}

#[test]
fn nested_closures_keep_their_defining_frame_alive() {
    let lines = shown_lines(
        "funcion crear_contador() {
             var n = 0;
             funcion siguiente() { n = n + 1; retorna n; }
             retorna siguiente;
         }
         var c = crear_contador();
         mostrar(c());
         mostrar(c());",
    );
    assert_eq!(lines, vec!["1", "2"]);
}

#[test]
fn recursion_works_through_the_scope_chain() {
    let lines = shown_lines(
        "funcion factorial(n) {
             si (n <= 1) { retorna 1; }
             retorna n * factorial(n - 1);
         }
         mostrar(factorial(5));",
    );
    assert_eq!(lines, vec!["120"]);
}

#[test]
fn return_without_value_yields_null() {
    let value = eval_ok("funcion nada() { retorna; } nada()");
    assert!(matches!(value, Value::Null));
}

#[test]
fn missing_return_yields_null() {
    let value = eval_ok("funcion nada() { var x = 1; } nada()");
    assert!(matches!(value, Value::Null));
}

#[test]
fn arity_mismatch_is_a_runtime_error() {
    let err = runtime_error("funcion f(a, b) { retorna a; } f(1);");
    assert_eq!(err.kind, ErrorKind::Runtime);
    assert!(err.message.contains("expects 2 argument(s), got 1"));
}

#[test]
fn declared_parameter_types_are_checked() {
    let err = runtime_error("funcion doble(n: entero) { retorna n * 2; } doble(\"dos\");");
    assert_eq!(err.kind, ErrorKind::Type);
}

#[test]
fn declared_return_types_are_checked() {
    let err = runtime_error("funcion f(): entero { retorna \"uno\"; } f();");
    assert_eq!(err.kind, ErrorKind::Type);
}

#[test]
fn functions_are_first_class_values() {
    let lines = shown_lines(
        "funcion doble(n) { retorna n * 2; }
         funcion aplicar(f, x) { retorna f(x); }
         mostrar(aplicar(doble, 21));",
    );
    assert_eq!(lines, vec!["42"]);
}

#[test]
fn calling_a_non_callable_is_a_type_error() {
    let err = runtime_error("var x = 5; x(1);");
    assert_eq!(err.kind, ErrorKind::Type);
    assert!(err.message.contains("not callable"));
}
