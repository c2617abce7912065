mod common;

use common::{runtime_error, shown_lines};
use zisk::core::error::ErrorKind;

#[test]
fn division_and_modulo_by_zero_fault_for_every_pairing() {
    for source in [
        "10 / 0",
        "10.0 / 0",
        "10 / 0.0",
        "10.0 / 0.0",
        "10 % 0",
        "10.0 % 0",
        "10 % 0.0",
        "10.0 % 0.0",
    ] {
        let err = runtime_error(source);
        assert_eq!(err.kind, ErrorKind::Runtime, "for: {}", source);
        assert!(err.message.contains("zero"), "for: {}", source);
    }
}

#[test]
fn division_by_zero_keeps_its_source_position() {
    let err = runtime_error("var x = 10 / 0;");
    assert_eq!((err.line, err.column), (1, 12));
}

#[test]
fn compound_division_by_zero_also_faults() {
    let err = runtime_error("var x = 10; x /= 0;");
    assert!(err.message.contains("division by zero"));
    let err = runtime_error("var x = 10; x %= 0;");
    assert!(err.message.contains("modulo by zero"));
}

#[test]
fn constants_can_never_be_reassigned() {
    let err = runtime_error("const MAX = 1; MAX = 2;");
    assert_eq!(err.kind, ErrorKind::Runtime);
    assert!(err.message.contains("constant 'MAX'"));

    let err = runtime_error("const MAX = 1; MAX += 1;");
    assert!(err.message.contains("constant 'MAX'"));
}

#[test]
fn out_of_range_list_access_is_an_index_error() {
    assert_eq!(runtime_error("var xs = [1, 2]; xs[2]").kind, ErrorKind::Index);
    // Negative-from-end indexing is not supported.
    assert_eq!(runtime_error("var xs = [1, 2]; xs[-1]").kind, ErrorKind::Index);
}

#[test]
fn missing_map_key_is_a_key_error() {
    assert_eq!(runtime_error("var m = {a: 1}; m[\"b\"]").kind, ErrorKind::Key);
}

#[test]
fn missing_property_is_an_attribute_error() {
    assert_eq!(runtime_error("var m = {a: 1}; m.b").kind, ErrorKind::Attribute);
}

#[test]
fn text_indexing_is_bounds_checked() {
    let lines = shown_lines("var s = \"hola\"; mostrar(s[1]);");
    assert_eq!(lines, vec!["o"]);
    assert_eq!(runtime_error("var s = \"ab\"; s[5]").kind, ErrorKind::Index);
}

#[test]
fn catch_binds_a_structured_error_value() {
    let lines = shown_lines(
        "try { var x = 1 / 0; } catch (e) { mostrar(e.tipo, e.mensaje, e.linea); }",
    );
    assert_eq!(lines, vec!["RuntimeError division by zero 1"]);
}

#[test]
fn untyped_catch_catches_everything() {
    let lines = shown_lines(
        "var xs = [1];
         try { mostrar(xs[9]); } catch (e) { mostrar(\"atrapado\"); }
         mostrar(\"sigue\");",
    );
    assert_eq!(lines, vec!["atrapado", "sigue"]);
}

#[test]
fn typed_catch_matches_the_error_object() {
    let lines = shown_lines("try { var x = 1 / 0; } catch (e: objeto) { mostrar(\"si\"); }");
    assert_eq!(lines, vec!["si"]);
}

#[test]
fn incompatible_typed_catch_lets_the_fault_propagate() {
    let err = runtime_error("try { var x = 1 / 0; } catch (e: texto) { mostrar(\"no\"); }");
    assert!(err.message.contains("division by zero"));
}

#[test]
fn finally_runs_on_normal_completion_and_after_catch() {
    let lines = shown_lines(
        "try { mostrar(\"t\"); } finally { mostrar(\"f1\"); }
         try { var x = 1 / 0; } catch (e) { mostrar(\"c\"); } finally { mostrar(\"f2\"); }",
    );
    assert_eq!(lines, vec!["t", "f1", "c", "f2"]);
}

#[test]
fn finally_runs_while_a_return_is_in_flight() {
    let lines = shown_lines(
        "funcion f() {
             try { retorna 1; } finally { mostrar(\"limpieza\"); }
         }
         mostrar(f());",
    );
    assert_eq!(lines, vec!["limpieza", "1"]);
}

#[test]
fn a_return_in_finally_overrides_the_one_in_flight() {
    let lines = shown_lines(
        "funcion f() {
             try { retorna 1; } finally { retorna 2; }
         }
         mostrar(f());",
    );
    assert_eq!(lines, vec!["2"]);
}

#[test]
fn finally_runs_even_when_the_fault_is_uncaught() {
    let lines = shown_lines(
        "var marca = 0;
         try {
             try { var x = 1 / 0; } finally { marca = 1; }
         } catch (e) { mostrar(marca, e.tipo); }",
    );
    assert_eq!(lines, vec!["1 RuntimeError"]);
}

#[test]
fn a_fault_in_finally_supersedes_the_original_fault() {
    let err = runtime_error("try { var x = 1 / 0; } finally { var y = [1]; y[9]; }");
    assert_eq!(err.kind, ErrorKind::Index);
}

#[test]
fn undefined_name_reports_its_position() {
    // Parsed fine (declared later at top level), but read before binding.
    let err = runtime_error("funcion f() { retorna tardia; } f(); var tardia = 1;");
    assert_eq!(err.kind, ErrorKind::Runtime);
    assert!(err.message.contains("undefined name 'tardia'"));
}

#[test]
fn arithmetic_on_incompatible_types_is_a_type_error() {
    assert_eq!(runtime_error("verdadero - 1").kind, ErrorKind::Type);
    assert_eq!(runtime_error("\"a\" < \"b\"").kind, ErrorKind::Type);
    assert_eq!(runtime_error("-\"texto\"").kind, ErrorKind::Type);
}
