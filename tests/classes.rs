mod common;

use common::{eval_ok, runtime_error, shown_lines};
use zisk::core::error::ErrorKind;
use zisk::core::value::Value;

#[test]
fn construction_initializes_fields_and_runs_constructor() {
    let lines = shown_lines(
        "clase Punto {
             var x = 0;
             var y = 0;
             funcion constructor(x, y) {
                 este.x = x;
                 este.y = y;
             }
             funcion magnitud2() { retorna este.x * este.x + este.y * este.y; }
         }
         var p = nuevo Punto(3, 4);
         mostrar(p.x, p.y);
         mostrar(p.magnitud2());",
    );
    assert_eq!(lines, vec!["3 4", "25"]);
}

#[test]
fn field_defaults_run_at_instantiation() {
    let lines = shown_lines(
        "var semilla = 1;
         clase Caja { var valor = semilla; }
         semilla = 10;
         var c = nuevo Caja();
         mostrar(c.valor);",
    );
    // Defaults are recorded at declaration and evaluated at `nuevo`.
    assert_eq!(lines, vec!["10"]);
}

#[test]
fn methods_dispatch_through_the_inheritance_chain() {
    let lines = shown_lines(
        "clase Animal {
             funcion hablar() { retorna \"...\"; }
             funcion presentar() { retorna este.hablar(); }
         }
         clase Perro extiende Animal {
             funcion hablar() { retorna \"guau\"; }
         }
         var p = nuevo Perro();
         mostrar(p.presentar());",
    );
    // Most-derived method wins even when called from a base method.
    assert_eq!(lines, vec!["guau"]);
}

#[test]
fn inherited_fields_are_initialized_base_to_derived() {
    let lines = shown_lines(
        "clase Base { var a = 1; }
         clase Derivada extiende Base { var b = 2; }
         var d = nuevo Derivada();
         mostrar(d.a, d.b);",
    );
    assert_eq!(lines, vec!["1 2"]);
}

#[test]
fn static_fields_live_on_the_class() {
    let lines = shown_lines(
        "clase Contador {
             estatico var total = 0;
             funcion constructor() { Contador.total = Contador.total + 1; }
         }
         var a = nuevo Contador();
         var b = nuevo Contador();
         mostrar(Contador.total);",
    );
    assert_eq!(lines, vec!["2"]);
}

#[test]
fn class_constants_cannot_be_reassigned() {
    let err = runtime_error(
        "clase Config { const LIMITE = 10; }
         Config.LIMITE = 20;",
    );
    assert_eq!(err.kind, ErrorKind::Runtime);
    assert!(err.message.contains("constant"));
}

#[test]
fn static_methods_are_callable_on_the_class() {
    let lines = shown_lines(
        "clase Mates {
             estatico funcion doble(n) { retorna n * 2; }
         }
         mostrar(Mates.doble(21));",
    );
    assert_eq!(lines, vec!["42"]);
}

#[test]
fn unknown_superclass_is_a_runtime_error() {
    let err = runtime_error("clase Perro extiende Animal { }");
    assert_eq!(err.kind, ErrorKind::Runtime);
    assert!(err.message.contains("unknown superclass"));
}

#[test]
fn duplicate_class_name_is_rejected() {
    let err = runtime_error("clase Uno { } clase Uno { }");
    assert!(err.message.contains("already declared"));
}

#[test]
fn constructor_arguments_without_constructor_are_an_error() {
    let err = runtime_error("clase Vacia { } var v = nuevo Vacia(1);");
    assert_eq!(err.kind, ErrorKind::Runtime);
    assert!(err.message.contains("no 'constructor'"));
}

#[test]
fn missing_member_is_an_attribute_error() {
    let err = runtime_error("clase Vacia { } var v = nuevo Vacia(); mostrar(v.nada);");
    assert_eq!(err.kind, ErrorKind::Attribute);
}

#[test]
fn instances_satisfy_ancestor_type_annotations() {
    let value = eval_ok(
        "clase Animal { }
         clase Perro extiende Animal { }
         var mascota: Animal = nuevo Perro();
         tipo_de(mascota)",
    );
    assert!(matches!(value, Value::Text(ref s) if s == "Perro"));
}

#[test]
fn sibling_class_fails_the_type_check() {
    let err = runtime_error(
        "clase Animal { }
         clase Perro extiende Animal { }
         clase Gato extiende Animal { }
         var p: Perro = nuevo Gato();",
    );
    assert_eq!(err.kind, ErrorKind::Type);
}

#[test]
fn este_is_the_receiver_and_fields_mutate_through_it() {
    let lines = shown_lines(
        "clase Acumulador {
             var total = 0;
             funcion sumar(n) { este.total = este.total + n; retorna este.total; }
         }
         var a = nuevo Acumulador();
         a.sumar(5);
         mostrar(a.sumar(7));",
    );
    assert_eq!(lines, vec!["12"]);
}
