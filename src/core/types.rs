// src/core/types.rs
//! Runtime type oracle.
//!
//! One registry per interpreter instance. Declarations feed it (classes,
//! method signatures, variable annotations); every annotated assignment,
//! call and return consults it. Class-typed checks walk the declared
//! single-inheritance chain by name, so they work even for values that
//! crossed a module boundary.

use std::collections::HashMap;

use crate::core::ast::Param;
use crate::core::error::RuntimeError;
use crate::core::value::Value;

/// What a Zisk type name means in terms of the runtime value union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostType {
    Integer,
    Float,
    Text,
    Boolean,
    List,
    Map,
    Null,
    Function,
    Class,
    /// Instance of the named class or one of its subclasses.
    InstanceOf(String),
}

#[derive(Debug, Clone)]
pub struct MethodSignature {
    pub params: Vec<Param>,
    pub return_type: Option<String>,
}

#[derive(Debug, Default)]
pub struct TypeRegistry {
    /// class name -> superclass name (None at the root).
    class_hierarchy: HashMap<String, Option<String>>,
    /// variable name -> declared type name; last write wins.
    annotations: HashMap<String, String>,
    /// "Class.method" -> signature; last write wins.
    method_signatures: HashMap<String, MethodSignature>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /* ── State updates ───────────────────────────────────── */

    pub fn add_class(&mut self, name: &str, superclass: Option<&str>) {
        self.class_hierarchy.insert(name.to_string(), superclass.map(|s| s.to_string()));
    }

    pub fn add_method_signature(
        &mut self,
        class_name: &str,
        method_name: &str,
        params: Vec<Param>,
        return_type: Option<String>,
    ) {
        self.method_signatures.insert(
            format!("{}.{}", class_name, method_name),
            MethodSignature { params, return_type },
        );
    }

    pub fn add_variable_annotation(&mut self, name: &str, ty: Option<&str>) {
        if let Some(ty) = ty {
            self.annotations.insert(name.to_string(), ty.to_string());
        }
    }

    pub fn variable_annotation(&self, name: &str) -> Option<&str> {
        self.annotations.get(name).map(|s| s.as_str())
    }

    /// Signature lookup walking the inheritance chain upward.
    pub fn method_signature(&self, class_name: &str, method_name: &str) -> Option<&MethodSignature> {
        let mut current = Some(class_name.to_string());
        while let Some(name) = current {
            if let Some(sig) = self.method_signatures.get(&format!("{}.{}", name, method_name)) {
                return Some(sig);
            }
            current = self.class_hierarchy.get(&name).cloned().flatten();
        }
        None
    }

    /* ── Queries ─────────────────────────────────────────── */

    pub fn map_to_host_type(&self, type_name: &str) -> Result<HostType, RuntimeError> {
        let host = match type_name {
            "entero" => HostType::Integer,
            "decimal" => HostType::Float,
            "texto" => HostType::Text,
            "booleano" => HostType::Boolean,
            "lista" => HostType::List,
            "objeto" => HostType::Map,
            "nulo" => HostType::Null,
            "funcion" => HostType::Function,
            "clase" => HostType::Class,
            name if self.class_hierarchy.contains_key(name) => {
                HostType::InstanceOf(name.to_string())
            }
            name => {
                return Err(RuntimeError::type_error(
                    format!("unknown type '{}'", name),
                    0,
                    0,
                ))
            }
        };
        Ok(host)
    }

    /// Runtime compatibility of a value with a declared type name.
    pub fn check(&self, value: &Value, expected: &str) -> bool {
        match self.map_to_host_type(expected) {
            Ok(HostType::Integer) => matches!(value, Value::Integer(_)),
            Ok(HostType::Float) => matches!(value, Value::Float(_)),
            Ok(HostType::Text) => matches!(value, Value::Text(_)),
            Ok(HostType::Boolean) => matches!(value, Value::Boolean(_)),
            Ok(HostType::List) => matches!(value, Value::List(_)),
            Ok(HostType::Map) => matches!(value, Value::Map(_)),
            Ok(HostType::Null) => matches!(value, Value::Null),
            Ok(HostType::Function) => matches!(value, Value::Function(_) | Value::Native(_)),
            Ok(HostType::Class) => matches!(value, Value::Class(_)),
            Ok(HostType::InstanceOf(class_name)) => match value {
                Value::Instance(instance) => {
                    self.is_subclass_or_same(&instance.class.name, &class_name)
                        || instance.class.has_ancestor(&class_name)
                }
                Value::Class(class) => class.name == class_name,
                _ => false,
            },
            Err(_) => false,
        }
    }

    /// Deduces the type name of a runtime value from its dynamic kind.
    pub fn infer(&self, value: &Value) -> String {
        match value {
            Value::Null => "nulo",
            Value::Integer(_) => "entero",
            Value::Float(_) => "decimal",
            Value::Text(_) => "texto",
            Value::Boolean(_) => "booleano",
            Value::List(_) => "lista",
            Value::Map(_) => "objeto",
            Value::Function(_) | Value::Native(_) => "funcion",
            Value::Class(_) => "clase",
            Value::Instance(instance) => return instance.class.name.clone(),
            Value::Module(_) => "modulo",
        }
        .to_string()
    }

    /// Walks the single-inheritance chain from `class_name` to the root;
    /// true when `ancestor` is encountered (the class itself included).
    pub fn is_subclass_or_same(&self, class_name: &str, ancestor: &str) -> bool {
        if class_name == ancestor {
            return true;
        }
        let mut visited = std::collections::HashSet::new();
        let mut current = class_name.to_string();
        visited.insert(current.clone());
        while let Some(Some(superclass)) = self.class_hierarchy.get(&current) {
            if superclass == ancestor {
                return true;
            }
            if !visited.insert(superclass.clone()) {
                break; // defensive stop on a malformed hierarchy
            }
            current = superclass.clone();
        }
        false
    }

    /// Fails with a `TypeError` when a declared (non-absent) type is
    /// violated. Untyped targets always pass, and `nulo` is assignable
    /// to any declared type.
    pub fn validate_assignment(
        &self,
        target: &str,
        value: &Value,
        expected: Option<&str>,
        line: usize,
        column: usize,
    ) -> Result<(), RuntimeError> {
        let expected = match expected {
            Some(t) => t,
            None => return Ok(()),
        };
        if matches!(value, Value::Null) && expected != "nulo" {
            return Ok(());
        }
        if !self.check(value, expected) {
            return Err(RuntimeError::type_error(
                format!(
                    "incompatible types: cannot assign a value of type '{}' to '{}' of type '{}'",
                    self.infer(value),
                    target,
                    expected
                ),
                line,
                column,
            ));
        }
        Ok(())
    }

    /// Checks every argument against the declared parameter type at its
    /// position; parameters without an annotation are wildcards. Arity is
    /// the evaluator's concern, not the oracle's.
    pub fn validate_function_call(
        &self,
        func_name: &str,
        params: &[Param],
        args: &[Value],
        line: usize,
        column: usize,
    ) -> Result<(), RuntimeError> {
        for (param, arg) in params.iter().zip(args.iter()) {
            if param.ty.is_some() {
                self.validate_assignment(
                    &format!("parameter '{}' of '{}'", param.name, func_name),
                    arg,
                    param.ty.as_deref(),
                    line,
                    column,
                )?;
            }
        }
        Ok(())
    }

    pub fn validate_return(
        &self,
        func_name: &str,
        value: &Value,
        expected: Option<&str>,
        line: usize,
        column: usize,
    ) -> Result<(), RuntimeError> {
        self.validate_assignment(&format!("return of '{}'", func_name), value, expected, line, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_names_map_to_host_types() {
        let reg = TypeRegistry::new();
        assert_eq!(reg.map_to_host_type("entero").unwrap(), HostType::Integer);
        assert_eq!(reg.map_to_host_type("objeto").unwrap(), HostType::Map);
        assert!(reg.map_to_host_type("inexistente").is_err());
    }

    #[test]
    fn registered_class_becomes_a_type() {
        let mut reg = TypeRegistry::new();
        reg.add_class("Animal", None);
        assert_eq!(
            reg.map_to_host_type("Animal").unwrap(),
            HostType::InstanceOf("Animal".into())
        );
    }

    #[test]
    fn subclass_chain_walk() {
        let mut reg = TypeRegistry::new();
        reg.add_class("Animal", None);
        reg.add_class("Perro", Some("Animal"));
        reg.add_class("Cachorro", Some("Perro"));
        assert!(reg.is_subclass_or_same("Cachorro", "Animal"));
        assert!(reg.is_subclass_or_same("Perro", "Perro"));
        assert!(!reg.is_subclass_or_same("Animal", "Perro"));
    }

    #[test]
    fn infer_names_dynamic_kinds() {
        let reg = TypeRegistry::new();
        assert_eq!(reg.infer(&Value::Integer(1)), "entero");
        assert_eq!(reg.infer(&Value::Float(1.5)), "decimal");
        assert_eq!(reg.infer(&Value::Text("x".into())), "texto");
        assert_eq!(reg.infer(&Value::Null), "nulo");
    }

    #[test]
    fn typed_assignment_is_validated() {
        let reg = TypeRegistry::new();
        assert!(reg
            .validate_assignment("x", &Value::Integer(3), Some("entero"), 1, 1)
            .is_ok());
        let err = reg
            .validate_assignment("x", &Value::Text("tres".into()), Some("entero"), 1, 1)
            .unwrap_err();
        assert_eq!(err.kind, crate::core::error::ErrorKind::Type);
    }

    #[test]
    fn null_is_assignable_to_any_declared_type() {
        let reg = TypeRegistry::new();
        assert!(reg.validate_assignment("x", &Value::Null, Some("texto"), 1, 1).is_ok());
    }

    #[test]
    fn untyped_targets_always_pass() {
        let reg = TypeRegistry::new();
        assert!(reg.validate_assignment("x", &Value::Integer(1), None, 1, 1).is_ok());
    }
}
