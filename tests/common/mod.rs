#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use zisk::core::error::ZiskError;
use zisk::core::host::{Host, ModuleResolver, ResolvedModule};
use zisk::core::interpreter::Interpreter;
use zisk::core::value::Value;

/// Captures every `mostrar` call and serves scripted input lines.
pub struct RecordingHost {
    pub writes: Vec<Vec<Value>>,
    pub input: Vec<String>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self { writes: Vec::new(), input: Vec::new() }
    }

    pub fn with_input(lines: &[&str]) -> Self {
        Self { writes: Vec::new(), input: lines.iter().map(|s| s.to_string()).collect() }
    }
}

impl Host for RecordingHost {
    fn read_line(&mut self, _prompt: &str) -> Option<String> {
        if self.input.is_empty() {
            None
        } else {
            Some(self.input.remove(0))
        }
    }

    fn write(&mut self, values: &[Value]) {
        self.writes.push(values.to_vec());
    }
}

/// In-memory module resolver: spec -> source, identity is the spec.
pub struct MapResolver {
    modules: HashMap<String, String>,
}

impl MapResolver {
    pub fn new(modules: &[(&str, &str)]) -> Self {
        Self {
            modules: modules.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        }
    }
}

impl ModuleResolver for MapResolver {
    fn resolve(&self, spec: &str) -> Result<ResolvedModule, String> {
        self.modules
            .get(spec)
            .map(|source| ResolvedModule { identity: spec.to_string(), source: source.clone() })
            .ok_or_else(|| format!("could not read module '{}'", spec))
    }
}

pub fn interpreter() -> (Interpreter, Rc<RefCell<RecordingHost>>) {
    let host = Rc::new(RefCell::new(RecordingHost::new()));
    let interp = Interpreter::with_host(host.clone());
    (interp, host)
}

pub fn interpreter_with_modules(
    modules: &[(&str, &str)],
) -> (Interpreter, Rc<RefCell<RecordingHost>>) {
    let host = Rc::new(RefCell::new(RecordingHost::new()));
    let interp =
        Interpreter::with_host_and_resolver(host.clone(), Rc::new(MapResolver::new(modules)));
    (interp, host)
}

/// Evaluates in a fresh interpreter and returns the final value.
pub fn eval_ok(source: &str) -> Value {
    let (mut interp, _host) = interpreter();
    match interp.evaluate(source) {
        Ok(value) => value,
        Err(err) => panic!("evaluation failed: {}\nsource: {}", err, source),
    }
}

/// Evaluates in a fresh interpreter and returns the error.
pub fn eval_err(source: &str) -> ZiskError {
    let (mut interp, _host) = interpreter();
    match interp.evaluate(source) {
        Ok(value) => panic!("expected an error, got {}\nsource: {}", value, source),
        Err(err) => err,
    }
}

/// Evaluates and returns everything the output sink received.
pub fn shown(source: &str) -> Vec<Vec<Value>> {
    let (mut interp, host) = interpreter();
    if let Err(err) = interp.evaluate(source) {
        panic!("evaluation failed: {}\nsource: {}", err, source);
    }
    let writes = host.borrow().writes.clone();
    writes
}

/// Flattens single-value writes into rendered strings, a convenient shape
/// for asserting on output order.
pub fn shown_lines(source: &str) -> Vec<String> {
    shown(source)
        .into_iter()
        .map(|values| {
            values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" ")
        })
        .collect()
}

/// The runtime error inside a `ZiskError::Runtime`, or a panic.
pub fn runtime_error(source: &str) -> zisk::core::error::RuntimeError {
    match eval_err(source) {
        ZiskError::Runtime(err) => err,
        other => panic!("expected a runtime error, got {}\nsource: {}", other, source),
    }
}
