// src/core/value.rs
//! Runtime value representation: a closed tagged union, one case per
//! dynamic kind. Lists, maps and instances have shared-mutable interiors
//! (`Rc<RefCell<...>>`) so the language's reference semantics hold;
//! everything else is value-like and cheap to clone.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

use crate::core::ast::{AstNode, FunctionDecl};
use crate::core::env::ScopeFrame;
use crate::core::error::RuntimeError;
use crate::core::interpreter::Interpreter;

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    List(Rc<RefCell<Vec<Value>>>),
    // BTreeMap keeps key order deterministic for rendering and equality.
    Map(Rc<RefCell<BTreeMap<String, Value>>>),
    Function(Rc<FunctionValue>),
    Native(NativeFunction),
    Class(Rc<ClassValue>),
    Instance(InstanceRef),
    Module(Rc<ModuleValue>),
}

pub type InstanceRef = Rc<InstanceValue>;

/// A user function, method or closure. Holds the declaration, the scope
/// chain captured (by reference) at the declaration site, and, once bound
/// through an instance, the `este` receiver.
pub struct FunctionValue {
    pub decl: Rc<FunctionDecl>,
    pub captured: Vec<ScopeFrame>,
    pub receiver: Option<InstanceRef>,
    pub is_static: bool,
    pub is_public: bool,
    /// Declaring class, when this is a method.
    pub owner: Option<String>,
}

impl FunctionValue {
    pub fn function(decl: Rc<FunctionDecl>, captured: Vec<ScopeFrame>) -> Self {
        Self { decl, captured, receiver: None, is_static: false, is_public: true, owner: None }
    }

    pub fn method(
        decl: Rc<FunctionDecl>,
        captured: Vec<ScopeFrame>,
        owner: &str,
        is_static: bool,
        is_public: bool,
    ) -> Self {
        Self { decl, captured, receiver: None, is_static, is_public, owner: Some(owner.into()) }
    }

    /// A copy of this method bound to a receiver instance.
    pub fn bind(&self, receiver: InstanceRef) -> Self {
        Self {
            decl: self.decl.clone(),
            captured: self.captured.clone(),
            receiver: Some(receiver),
            is_static: self.is_static,
            is_public: self.is_public,
            owner: self.owner.clone(),
        }
    }

    pub fn qualified_name(&self) -> String {
        match &self.owner {
            Some(owner) => format!("{}.{}", owner, self.decl.name),
            None => self.decl.name.clone(),
        }
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionValue")
            .field("name", &self.qualified_name())
            .field("params", &self.decl.params.len())
            .field("bound", &self.receiver.is_some())
            .finish()
    }
}

/// Host-implemented builtin callable.
#[derive(Clone)]
pub struct NativeFunction {
    pub name: &'static str,
    /// `None` means variadic.
    pub arity: Option<usize>,
    pub f: fn(&mut Interpreter, Vec<Value>, usize, usize) -> Result<Value, RuntimeError>,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction").field("name", &self.name).finish()
    }
}

/// Per-instance field slot layout recorded at class-declaration time; the
/// default expression is evaluated at instantiation, not declaration.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub ty: Option<String>,
    pub default: Option<AstNode>,
    pub is_public: bool,
}

pub struct ClassValue {
    pub name: String,
    pub superclass: Option<Rc<ClassValue>>,
    /// Instance field layout, this class only (ancestors contribute their
    /// own specs through the chain walk).
    pub fields: Vec<FieldSpec>,
    /// Static fields and class constants, evaluated at declaration time.
    pub statics: RefCell<HashMap<String, Value>>,
    pub static_consts: std::collections::HashSet<String>,
    pub methods: HashMap<String, Rc<FunctionValue>>,
    /// Scope chain at the declaration site; methods and instance field
    /// defaults evaluate under it.
    pub captured: Vec<ScopeFrame>,
}

impl ClassValue {
    /// Method lookup through the inheritance chain, most-derived first.
    pub fn find_method(&self, name: &str) -> Option<Rc<FunctionValue>> {
        if let Some(method) = self.methods.get(name) {
            return Some(method.clone());
        }
        self.superclass.as_ref().and_then(|s| s.find_method(name))
    }

    /// Static field lookup through the chain, most-derived first.
    pub fn find_static(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.statics.borrow().get(name) {
            return Some(value.clone());
        }
        self.superclass.as_ref().and_then(|s| s.find_static(name))
    }

    /// Instance field specs in base-to-derived order, so a subclass
    /// default overrides its ancestor's for the same name.
    pub fn collect_field_specs(&self) -> Vec<FieldSpec> {
        let mut specs = match &self.superclass {
            Some(s) => s.collect_field_specs(),
            None => Vec::new(),
        };
        specs.extend(self.fields.iter().cloned());
        specs
    }

    /// Declared type of an instance field, searched through the chain.
    pub fn field_type(&self, name: &str) -> Option<String> {
        if let Some(spec) = self.fields.iter().find(|f| f.name == name) {
            return spec.ty.clone();
        }
        self.superclass.as_ref().and_then(|s| s.field_type(name))
    }

    pub fn has_ancestor(&self, name: &str) -> bool {
        if self.name == name {
            return true;
        }
        self.superclass.as_ref().map_or(false, |s| s.has_ancestor(name))
    }
}

impl fmt::Debug for ClassValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassValue")
            .field("name", &self.name)
            .field("superclass", &self.superclass.as_ref().map(|s| s.name.clone()))
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

pub struct InstanceValue {
    pub class: Rc<ClassValue>,
    pub fields: RefCell<HashMap<String, Value>>,
}

impl fmt::Debug for InstanceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceValue")
            .field("class", &self.class.name)
            .field("fields", &self.fields.borrow().keys().collect::<Vec<_>>())
            .finish()
    }
}

/// An imported module: the isolated interpreter's exported bindings.
pub struct ModuleValue {
    pub name: String,
    /// Resolved identity used as the cache key.
    pub identity: String,
    pub globals: ScopeFrame,
    pub functions: HashMap<String, Value>,
    pub classes: HashMap<String, Value>,
}

impl ModuleValue {
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(slot) = self.globals.borrow().get(name) {
            return Some(slot.value.clone());
        }
        if let Some(value) = self.functions.get(name) {
            return Some(value.clone());
        }
        self.classes.get(name).cloned()
    }
}

impl fmt::Debug for ModuleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleValue").field("name", &self.name).finish()
    }
}

impl Value {
    pub fn new_list(elements: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(elements)))
    }

    pub fn new_map(entries: BTreeMap<String, Value>) -> Self {
        Value::Map(Rc::new(RefCell::new(entries)))
    }

    /// Language-level truthiness: `nulo`, `falso`, zero and empty
    /// containers are falsy, everything else is truthy.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Integer(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Text(s) => !s.is_empty(),
            Value::List(l) => !l.borrow().is_empty(),
            Value::Map(m) => !m.borrow().is_empty(),
            Value::Function(_)
            | Value::Native(_)
            | Value::Class(_)
            | Value::Instance(_)
            | Value::Module(_) => true,
        }
    }

    /// Deep value equality for lists and maps, numeric equality across
    /// int/float, identity for callables, classes and instances.
    pub fn deep_eq(&self, other: &Value) -> bool {
        use Value::*;
        match (self, other) {
            (Null, Null) => true,
            (Boolean(a), Boolean(b)) => a == b,
            (Integer(a), Integer(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Integer(a), Float(b)) | (Float(b), Integer(a)) => (*a as f64) == *b,
            (Text(a), Text(b)) => a == b,
            (List(a), List(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.deep_eq(y))
            }
            (Map(a), Map(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len()
                    && a.iter().all(|(k, v)| b.get(k).map_or(false, |w| v.deep_eq(w)))
            }
            (Function(a), Function(b)) => Rc::ptr_eq(a, b),
            (Native(a), Native(b)) => a.name == b.name,
            (Class(a), Class(b)) => Rc::ptr_eq(a, b),
            (Instance(a), Instance(b)) => Rc::ptr_eq(a, b),
            (Module(a), Module(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Rendering used inside composite values: text is quoted there so
    /// `["a", "b"]` and `{"k": 1}` read back unambiguously.
    fn render_nested(&self) -> String {
        match self {
            Value::Text(s) => format!("\"{}\"", s),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "nulo"),
            Value::Boolean(true) => write!(f, "verdadero"),
            Value::Boolean(false) => write!(f, "falso"),
            Value::Integer(i) => write!(f, "{}", i),
            // `{:?}` keeps the decimal point: 5.0 renders as "5.0".
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Text(s) => write!(f, "{}", s),
            Value::List(items) => {
                let parts: Vec<String> =
                    items.borrow().iter().map(|v| v.render_nested()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Value::Map(entries) => {
                let parts: Vec<String> = entries
                    .borrow()
                    .iter()
                    .map(|(k, v)| format!("\"{}\": {}", k, v.render_nested()))
                    .collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
            Value::Function(func) => write!(f, "<funcion {}>", func.qualified_name()),
            Value::Native(n) => write!(f, "<funcion nativa {}>", n.name),
            Value::Class(c) => write!(f, "<clase {}>", c.name),
            Value::Instance(i) => write!(f, "<instancia de {}>", i.class.name),
            Value::Module(m) => write!(f, "<modulo {}>", m.name),
        }
    }
}

/// Space-separated rendering used by the `mostrar` output contract.
pub fn render_values(values: &[Value]) -> String {
    values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_rendering_is_deterministic() {
        let mut entries = BTreeMap::new();
        entries.insert("b".to_string(), Value::Integer(2));
        entries.insert("a".to_string(), Value::Text("hola".into()));
        let map = Value::new_map(entries);
        assert_eq!(map.to_string(), "{\"a\": \"hola\", \"b\": 2}");

        let list = Value::new_list(vec![
            Value::Integer(1),
            Value::Float(2.0),
            Value::Boolean(true),
            Value::Null,
        ]);
        assert_eq!(list.to_string(), "[1, 2.0, verdadero, nulo]");
    }

    #[test]
    fn deep_equality_recurses_into_composites() {
        let a = Value::new_list(vec![Value::Integer(1), Value::new_list(vec![Value::Integer(2)])]);
        let b = Value::new_list(vec![Value::Integer(1), Value::new_list(vec![Value::Integer(2)])]);
        assert!(a.deep_eq(&b));

        let c = Value::new_list(vec![Value::Integer(1), Value::new_list(vec![Value::Integer(3)])]);
        assert!(!a.deep_eq(&c));
    }

    #[test]
    fn int_and_float_compare_numerically() {
        assert!(Value::Integer(1).deep_eq(&Value::Float(1.0)));
        assert!(!Value::Integer(1).deep_eq(&Value::Float(1.5)));
    }

    #[test]
    fn truthiness_matches_the_language_rules() {
        assert!(!Value::Null.truthy());
        assert!(!Value::Integer(0).truthy());
        assert!(!Value::Text(String::new()).truthy());
        assert!(!Value::new_list(vec![]).truthy());
        assert!(Value::Float(0.5).truthy());
        assert!(Value::Text("x".into()).truthy());
    }
}
