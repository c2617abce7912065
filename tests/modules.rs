mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{interpreter_with_modules, RecordingHost};
use zisk::core::host::FileResolver;
use zisk::core::interpreter::Interpreter;
use zisk::core::value::Value;

const UTIL_ZK: &str = r#"
mostrar("cargando util");
var saludo = "hola";
const VERSION = 3;
funcion saluda(nombre) { retorna saludo + " " + nombre; }
clase Cosa { var n = 1; }
"#;

#[test]
fn imported_bindings_are_visible_through_the_module() {
    let (mut interp, host) = interpreter_with_modules(&[("util", UTIL_ZK)]);
    interp
        .evaluate(
            "importa \"util\";
             mostrar(util.saludo);
             mostrar(util.saluda(\"mundo\"));
             mostrar(util.VERSION);",
        )
        .expect("evaluates");

    let writes = host.borrow().writes.clone();
    let lines: Vec<String> = writes
        .iter()
        .map(|w| w.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" "))
        .collect();
    assert_eq!(lines, vec!["cargando util", "hola", "hola mundo", "3"]);
}

#[test]
fn reimport_is_a_cache_hit_with_no_side_effects() {
    let (mut interp, host) = interpreter_with_modules(&[("util", UTIL_ZK)]);
    interp
        .evaluate("importa \"util\"; importa \"util\"; mostrar(util.saludo);")
        .expect("evaluates");

    let writes = host.borrow().writes.clone();
    // The module's top-level `mostrar` ran exactly once.
    assert_eq!(writes.len(), 2);
    assert!(matches!(&writes[0][0], Value::Text(s) if s == "cargando util"));
    assert!(matches!(&writes[1][0], Value::Text(s) if s == "hola"));
}

#[test]
fn reimport_across_evaluations_is_also_cached() {
    let (mut interp, host) = interpreter_with_modules(&[("util", UTIL_ZK)]);
    interp.evaluate("importa \"util\";").expect("first import");
    interp.evaluate("importa \"util\";").expect("second import");
    assert_eq!(host.borrow().writes.len(), 1);
}

#[test]
fn alias_binds_the_module_under_another_name() {
    let (mut interp, host) = interpreter_with_modules(&[("util", UTIL_ZK)]);
    interp
        .evaluate("importa \"util\" como u; mostrar(u.saluda(\"ana\"));")
        .expect("evaluates");
    let writes = host.borrow().writes.clone();
    assert!(matches!(&writes[1][0], Value::Text(s) if s == "hola ana"));
}

#[test]
fn module_globals_do_not_leak_into_the_importer() {
    let (mut interp, _host) = interpreter_with_modules(&[("util", UTIL_ZK)]);
    let err = interp
        .evaluate("importa \"util\"; mostrar(saludo);")
        .expect_err("saludo is module-local");
    assert!(err.to_string().contains("saludo"));
}

#[test]
fn importer_state_is_isolated_from_the_module() {
    // Both the importer and the module define `saludo`; they must not
    // collide because each import evaluates in its own interpreter.
    let (mut interp, host) = interpreter_with_modules(&[("util", UTIL_ZK)]);
    interp
        .evaluate(
            "var saludo = \"propio\";
             importa \"util\";
             mostrar(saludo, util.saludo);",
        )
        .expect("evaluates");
    let writes = host.borrow().writes.clone();
    let last: Vec<String> = writes.last().unwrap().iter().map(|v| v.to_string()).collect();
    assert_eq!(last, vec!["propio", "hola"]);
}

#[test]
fn module_classes_are_exported() {
    let (mut interp, _host) = interpreter_with_modules(&[("util", UTIL_ZK)]);
    let value = interp.evaluate("importa \"util\"; tipo_de(util.Cosa)").expect("evaluates");
    assert!(matches!(value, Value::Text(ref s) if s == "clase"));
}

#[test]
fn file_resolver_loads_modules_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("saludos.zk"),
        "funcion hola(nombre) { retorna \"hola \" + nombre; }",
    )
    .expect("write module");

    let host = Rc::new(RefCell::new(RecordingHost::new()));
    let mut interp = Interpreter::with_host_and_resolver(
        host,
        Rc::new(FileResolver::with_root(dir.path())),
    );
    let value = interp
        .evaluate("importa \"saludos\"; saludos.hola(\"ana\")")
        .expect("evaluates");
    assert!(matches!(value, Value::Text(ref s) if s == "hola ana"));
}

#[test]
fn unresolvable_module_is_a_runtime_error() {
    let (mut interp, _host) = interpreter_with_modules(&[]);
    let err = interp.evaluate("importa \"fantasma\";").expect_err("no such module");
    assert!(err.to_string().contains("fantasma"));
}

#[test]
fn faulting_module_surfaces_as_an_import_error() {
    let (mut interp, _host) =
        interpreter_with_modules(&[("roto", "var x = 1 / 0;")]);
    let err = interp.evaluate("importa \"roto\";").expect_err("module faults");
    let text = err.to_string();
    assert!(text.contains("roto"));
    assert!(text.contains("division by zero"));
}
