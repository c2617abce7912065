// src/core/interpreter.rs
//! Tree-walking evaluator for Zisk.
//!
//! Non-local transfer (`retorna`, `romper`, `continua`, thrown runtime
//! errors) travels as a `Signal` in the error channel of every evaluation
//! step; the nearest matching construct consumes it. Scope frames are
//! pushed and popped around blocks, loop bodies and calls so a frame is
//! closed exactly once no matter which signal unwinds through it.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

use crate::core::ast::{AstNode, CatchClause, FieldDecl, MethodDecl};
use crate::core::env::{Scopes, Slot};
use crate::core::error::{RuntimeError, ZiskError};
use crate::core::host::{module_basename, FileResolver, Host, ModuleResolver, StdHost};
use crate::core::lexer::Lexer;
use crate::core::optimizer::Optimizer;
use crate::core::parser::Parser;
use crate::core::token::TokenKind;
use crate::core::types::TypeRegistry;
use crate::core::value::{
    ClassValue, FieldSpec, FunctionValue, InstanceRef, InstanceValue, ModuleValue, NativeFunction,
    Value,
};

/// Builtin callables registered in every interpreter's function registry.
/// `mostrar`/`ingresar` are keywords with their own AST nodes, but they
/// are listed here so the parser's name tracker knows them.
pub const NATIVE_FUNCTIONS: &[&str] = &[
    "mostrar",
    "ingresar",
    "longitud",
    "tipo_de",
    "convertir_a_entero",
    "convertir_a_decimal",
    "convertir_a_texto",
    "convertir_a_booleano",
];

/// Non-local control transfer. `Thrown` doubles as the error channel; the
/// other three are internal and never user-visible.
#[derive(Debug)]
pub enum Signal {
    Return(Value),
    Break,
    Continue,
    Thrown(RuntimeError),
}

impl From<RuntimeError> for Signal {
    fn from(e: RuntimeError) -> Self {
        Signal::Thrown(e)
    }
}

type Exec = Result<Value, Signal>;

pub struct Interpreter {
    scopes: Scopes,
    /// Top-level functions (user-declared and native), for identifier
    /// fallback and module exports.
    functions: HashMap<String, Value>,
    /// Global class registry.
    classes: HashMap<String, Rc<ClassValue>>,
    /// Module cache, keyed by resolved identity.
    modules: HashMap<String, Rc<ModuleValue>>,
    types: TypeRegistry,
    host: Rc<RefCell<dyn Host>>,
    resolver: Rc<dyn ModuleResolver>,
    optimize: bool,
    /// Names fed to the parser so later REPL lines see earlier bindings.
    known_names: HashSet<String>,
    current_self: Option<InstanceRef>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_host_and_resolver(
            Rc::new(RefCell::new(StdHost)),
            Rc::new(FileResolver::new()),
        )
    }

    pub fn with_host(host: Rc<RefCell<dyn Host>>) -> Self {
        Self::with_host_and_resolver(host, Rc::new(FileResolver::new()))
    }

    pub fn with_host_and_resolver(
        host: Rc<RefCell<dyn Host>>,
        resolver: Rc<dyn ModuleResolver>,
    ) -> Self {
        let mut interp = Self {
            scopes: Scopes::new(),
            functions: HashMap::new(),
            classes: HashMap::new(),
            modules: HashMap::new(),
            types: TypeRegistry::new(),
            host,
            resolver,
            optimize: true,
            known_names: HashSet::new(),
            current_self: None,
        };
        interp.install_natives();
        interp
    }

    pub fn set_optimize(&mut self, enabled: bool) {
        self.optimize = enabled;
    }

    /// Full pipeline: lex, parse, optionally optimize, execute. Returns
    /// the program's final observable value (the last statement's result)
    /// or the first unhandled error.
    pub fn evaluate(&mut self, source: &str) -> Result<Value, ZiskError> {
        let tokens = Lexer::new(source).tokenize()?;
        let mut parser = Parser::new(tokens).with_known_names(self.known_names.iter().cloned());
        let ast = parser.parse()?;
        self.known_names.extend(parser.declared_globals());

        let ast = if self.optimize { Optimizer::new().optimize(ast) } else { ast };

        match self.execute(&ast) {
            Ok(value) => Ok(value),
            Err(Signal::Thrown(err)) => Err(ZiskError::Runtime(err)),
            // The parser rejects these statically; reaching here means a
            // signal escaped through a dynamic path (e.g. a module's top
            // level), which is still a plain runtime error.
            Err(Signal::Return(_)) => Err(ZiskError::Runtime(RuntimeError::new(
                "'retorna' outside of a function",
                0,
                0,
            ))),
            Err(Signal::Break) | Err(Signal::Continue) => Err(ZiskError::Runtime(
                RuntimeError::new("loop control outside of a loop", 0, 0),
            )),
        }
    }

    /// One evaluation rule per node kind.
    pub fn execute(&mut self, node: &AstNode) -> Exec {
        match node {
            AstNode::Program(stmts) => {
                let mut result = Value::Null;
                for stmt in stmts {
                    result = self.execute(stmt)?;
                }
                Ok(result)
            }

            AstNode::Block(stmts) => {
                self.scopes.push();
                let mut result = Ok(Value::Null);
                for stmt in stmts {
                    result = self.execute(stmt);
                    if result.is_err() {
                        break;
                    }
                }
                self.scopes.pop(); // exactly once, signal or not
                result
            }

            // ── Declarations ────────────────────────────────
            AstNode::VarDecl { name, ty, init, line, column } => {
                let value = match init {
                    Some(expr) => self.execute(expr)?,
                    None => default_for_type(ty.as_deref()),
                };
                self.types.validate_assignment(name, &value, ty.as_deref(), *line, *column)?;
                if !self.scopes.define(name, Slot::typed(value.clone(), ty.clone())) {
                    return Err(Signal::Thrown(RuntimeError::new(
                        format!("'{}' is already declared in this scope", name),
                        *line,
                        *column,
                    )));
                }
                self.types.add_variable_annotation(name, ty.as_deref());
                Ok(value)
            }

            AstNode::ConstDecl { name, ty, init, line, column } => {
                let value = self.execute(init)?;
                self.types.validate_assignment(name, &value, ty.as_deref(), *line, *column)?;
                if !self.scopes.define(name, Slot::constant(value.clone(), ty.clone())) {
                    return Err(Signal::Thrown(RuntimeError::new(
                        format!("'{}' is already declared in this scope", name),
                        *line,
                        *column,
                    )));
                }
                self.types.add_variable_annotation(name, ty.as_deref());
                Ok(value)
            }

            AstNode::FunctionDecl(decl) => {
                let func = Rc::new(FunctionValue::function(decl.clone(), self.scopes.snapshot()));
                let value = Value::Function(func);
                if !self.scopes.define(&decl.name, Slot::new(value.clone())) {
                    return Err(Signal::Thrown(RuntimeError::new(
                        format!("'{}' is already declared in this scope", decl.name),
                        decl.line,
                        decl.column,
                    )));
                }
                if self.scopes.depth() == 1 {
                    self.functions.insert(decl.name.clone(), value);
                }
                self.types.add_variable_annotation(&decl.name, Some("funcion"));
                Ok(Value::Null)
            }

            AstNode::ClassDecl { name, superclass, fields, methods, line, column } => {
                self.declare_class(name, superclass.as_deref(), fields, methods, *line, *column)
            }

            AstNode::Import { spec, alias, line, column } => {
                self.import_module(spec, alias.as_deref(), *line, *column)
            }

            // ── Control flow ────────────────────────────────
            AstNode::If { condition, then_branch, else_branch } => {
                if self.execute(condition)?.truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(Value::Null)
                }
            }

            AstNode::While { condition, body } => {
                let mut result = Value::Null;
                while self.execute(condition)?.truthy() {
                    match self.execute(body) {
                        Ok(value) => result = value,
                        Err(Signal::Break) => break,
                        Err(Signal::Continue) => continue,
                        Err(other) => return Err(other),
                    }
                }
                Ok(result)
            }

            AstNode::For { init, condition, step, body } => {
                // One scope for the init binding, spanning the whole loop;
                // the body block opens its own frame per iteration.
                self.scopes.push();
                let result = self.run_for(init, condition, step, body);
                self.scopes.pop();
                result
            }

            AstNode::DoWhile { body, condition } => {
                let mut result = Value::Null;
                loop {
                    match self.execute(body) {
                        Ok(value) => result = value,
                        Err(Signal::Break) => break,
                        Err(Signal::Continue) => {}
                        Err(other) => return Err(other),
                    }
                    if !self.execute(condition)?.truthy() {
                        break;
                    }
                }
                Ok(result)
            }

            AstNode::Return { value, line: _, column: _ } => {
                let value = match value {
                    Some(expr) => self.execute(expr)?,
                    None => Value::Null,
                };
                Err(Signal::Return(value))
            }

            AstNode::Break { .. } => Err(Signal::Break),
            AstNode::Continue { .. } => Err(Signal::Continue),

            AstNode::TryCatch { try_block, catch, finally_block } => {
                self.run_try_catch(try_block, catch.as_ref(), finally_block.as_deref())
            }

            // ── Built-in statements ─────────────────────────
            AstNode::Show { args, .. } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.execute(arg)?);
                }
                self.host.borrow_mut().write(&values);
                Ok(Value::Null)
            }

            AstNode::ReadInput { prompt, .. } => {
                let prompt = match prompt {
                    Some(expr) => match self.execute(expr)? {
                        Value::Text(s) => s,
                        other => other.to_string(),
                    },
                    None => String::new(),
                };
                let line = self.host.borrow_mut().read_line(&prompt);
                Ok(line.map(Value::Text).unwrap_or(Value::Null))
            }

            // ── Expressions ─────────────────────────────────
            AstNode::Assignment { op, target, value, line, column } => {
                self.assign(op, target, value, *line, *column)
            }

            AstNode::BinaryOp { op, left, right, line, column } => match op {
                // Short-circuit: the right operand must not run when the
                // left already decides the result.
                TokenKind::AndAnd => {
                    if !self.execute(left)?.truthy() {
                        return Ok(Value::Boolean(false));
                    }
                    let right = self.execute(right)?;
                    Ok(Value::Boolean(right.truthy()))
                }
                TokenKind::OrOr => {
                    if self.execute(left)?.truthy() {
                        return Ok(Value::Boolean(true));
                    }
                    let right = self.execute(right)?;
                    Ok(Value::Boolean(right.truthy()))
                }
                _ => {
                    let l = self.execute(left)?;
                    let r = self.execute(right)?;
                    Ok(self.binary_op(op, l, r, *line, *column)?)
                }
            },

            AstNode::UnaryOp { op, expr, line, column } => {
                let value = self.execute(expr)?;
                match op {
                    TokenKind::Minus => match value {
                        Value::Integer(i) => i
                            .checked_neg()
                            .map(Value::Integer)
                            .ok_or_else(|| {
                                Signal::Thrown(RuntimeError::new(
                                    "integer overflow",
                                    *line,
                                    *column,
                                ))
                            }),
                        Value::Float(f) => Ok(Value::Float(-f)),
                        other => Err(Signal::Thrown(RuntimeError::type_error(
                            format!(
                                "unary '-' requires a numeric operand, not '{}'",
                                self.types.infer(&other)
                            ),
                            *line,
                            *column,
                        ))),
                    },
                    TokenKind::Bang => Ok(Value::Boolean(!value.truthy())),
                    other => Err(Signal::Thrown(RuntimeError::new(
                        format!("unsupported unary operator '{}'", other),
                        *line,
                        *column,
                    ))),
                }
            }

            AstNode::Call { callee, args, line, column } => {
                // Receiver-aware dispatch: a member callee binds `este`.
                if let AstNode::MemberAccess { object, member, .. } = &**callee {
                    let object = self.execute(object)?;
                    let args = self.eval_args(args)?;
                    return self.call_member(object, member, args, *line, *column);
                }
                let callee = self.execute(callee)?;
                let args = self.eval_args(args)?;
                self.call_value(callee, args, *line, *column)
            }

            AstNode::New { class_name, args, line, column } => {
                // Lexical lookup first (covers classes captured by module
                // functions), then the global registry.
                let class = match self.scopes.get(class_name) {
                    Some(Value::Class(class)) => class,
                    _ => self.classes.get(class_name).cloned().ok_or_else(|| {
                        Signal::Thrown(RuntimeError::new(
                            format!("class '{}' is not defined", class_name),
                            *line,
                            *column,
                        ))
                    })?,
                };
                let args = self.eval_args(args)?;
                self.construct(class, args, *line, *column)
            }

            AstNode::MemberAccess { object, member, line, column } => {
                let object = self.execute(object)?;
                Ok(self.get_member(&object, member, *line, *column)?)
            }

            AstNode::IndexAccess { object, index, line, column } => {
                let object = self.execute(object)?;
                let index = self.execute(index)?;
                Ok(self.index_value(&object, &index, *line, *column)?)
            }

            AstNode::Identifier { name, line, column } => {
                if let Some(value) = self.scopes.get(name) {
                    return Ok(value);
                }
                if let Some(value) = self.functions.get(name) {
                    return Ok(value.clone());
                }
                if let Some(class) = self.classes.get(name) {
                    return Ok(Value::Class(class.clone()));
                }
                Err(Signal::Thrown(RuntimeError::new(
                    format!("undefined name '{}'", name),
                    *line,
                    *column,
                )))
            }

            AstNode::This { line, column } => {
                self.current_self.clone().map(Value::Instance).ok_or_else(|| {
                    Signal::Thrown(RuntimeError::new(
                        "'este' is not bound in this context",
                        *line,
                        *column,
                    ))
                })
            }

            // ── Literals ────────────────────────────────────
            AstNode::IntLiteral(i) => Ok(Value::Integer(*i)),
            AstNode::FloatLiteral(f) => Ok(Value::Float(*f)),
            AstNode::StringLiteral(s) => Ok(Value::Text(s.clone())),
            AstNode::BooleanLiteral(b) => Ok(Value::Boolean(*b)),
            AstNode::NullLiteral => Ok(Value::Null),

            AstNode::ListLiteral(elements) => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.execute(element)?);
                }
                Ok(Value::new_list(values))
            }

            AstNode::ObjectLiteral(properties) => {
                let mut entries = BTreeMap::new();
                for (key, expr) in properties {
                    let value = self.execute(expr)?;
                    entries.insert(key.clone(), value);
                }
                Ok(Value::new_map(entries))
            }
        }
    }

    /* ── Loops ───────────────────────────────────────────── */

    fn run_for(
        &mut self,
        init: &Option<Box<AstNode>>,
        condition: &Option<Box<AstNode>>,
        step: &Option<Box<AstNode>>,
        body: &AstNode,
    ) -> Exec {
        if let Some(init) = init {
            self.execute(init)?;
        }
        let mut result = Value::Null;
        loop {
            if let Some(condition) = condition {
                if !self.execute(condition)?.truthy() {
                    break;
                }
            }
            match self.execute(body) {
                Ok(value) => result = value,
                Err(Signal::Break) => break,
                Err(Signal::Continue) => {} // the step still runs
                Err(other) => return Err(other),
            }
            if let Some(step) = step {
                self.execute(step)?;
            }
        }
        Ok(result)
    }

    /* ── try / catch / finally ───────────────────────────── */

    fn run_try_catch(
        &mut self,
        try_block: &AstNode,
        catch: Option<&CatchClause>,
        finally_block: Option<&AstNode>,
    ) -> Exec {
        let outcome = match self.execute(try_block) {
            Err(Signal::Thrown(err)) => {
                let mut handled = None;
                if let Some(clause) = catch {
                    let error_value = error_value(&err);
                    let matches = clause
                        .ty
                        .as_ref()
                        .map_or(true, |ty| self.types.check(&error_value, ty));
                    if matches {
                        self.scopes.push();
                        self.scopes.define(&clause.name, Slot::new(error_value));
                        let caught = self.execute(&clause.body);
                        self.scopes.pop();
                        handled = Some(caught);
                    }
                }
                // No compatible catch: the fault keeps unwinding.
                handled.unwrap_or(Err(Signal::Thrown(err)))
            }
            other => other,
        };

        // `finally` runs exactly once whatever happened above; if it
        // raises or returns itself, that outcome supersedes the pending
        // one (a `retorna` here overrides a `retorna` in flight).
        if let Some(finally_block) = finally_block {
            if let Err(signal) = self.execute(finally_block) {
                return Err(signal);
            }
        }
        outcome
    }

    /* ── Assignment ──────────────────────────────────────── */

    fn assign(
        &mut self,
        op: &TokenKind,
        target: &AstNode,
        value: &AstNode,
        line: usize,
        column: usize,
    ) -> Exec {
        // Right-hand side first, then resolve the target place.
        let rhs = self.execute(value)?;

        match target {
            AstNode::Identifier { name, .. } => {
                let (current, is_const, declared_type) =
                    self.scopes.lookup_slot(name).ok_or_else(|| {
                        Signal::Thrown(RuntimeError::new(
                            format!("variable '{}' is not defined", name),
                            line,
                            column,
                        ))
                    })?;
                if is_const {
                    return Err(Signal::Thrown(RuntimeError::new(
                        format!("cannot reassign constant '{}'", name),
                        line,
                        column,
                    )));
                }
                let final_value = self.resolve_compound(op, || Ok(current), rhs, line, column)?;
                self.types.validate_assignment(
                    name,
                    &final_value,
                    declared_type.as_deref(),
                    line,
                    column,
                )?;
                self.scopes.set(name, final_value.clone());
                Ok(final_value)
            }

            AstNode::MemberAccess { object, member, .. } => {
                let object = self.execute(object)?;
                match object {
                    Value::Instance(instance) => {
                        let current = instance.fields.borrow().get(member).cloned();
                        let final_value = self.resolve_compound(
                            op,
                            || {
                                current.ok_or_else(|| {
                                    RuntimeError::attribute(
                                        format!(
                                            "instance of '{}' has no property '{}'",
                                            instance.class.name, member
                                        ),
                                        line,
                                        column,
                                    )
                                })
                            },
                            rhs,
                            line,
                            column,
                        )?;
                        self.types.validate_assignment(
                            &format!("{}.{}", instance.class.name, member),
                            &final_value,
                            instance.class.field_type(member).as_deref(),
                            line,
                            column,
                        )?;
                        instance.fields.borrow_mut().insert(member.clone(), final_value.clone());
                        Ok(final_value)
                    }
                    Value::Map(map) => {
                        let current = map.borrow().get(member).cloned();
                        let final_value = self.resolve_compound(
                            op,
                            || {
                                current.ok_or_else(|| {
                                    RuntimeError::key(
                                        format!("key '{}' not found", member),
                                        line,
                                        column,
                                    )
                                })
                            },
                            rhs,
                            line,
                            column,
                        )?;
                        map.borrow_mut().insert(member.clone(), final_value.clone());
                        Ok(final_value)
                    }
                    Value::Class(class) => {
                        if class.static_consts.contains(member) {
                            return Err(Signal::Thrown(RuntimeError::new(
                                format!(
                                    "cannot reassign constant field '{}.{}'",
                                    class.name, member
                                ),
                                line,
                                column,
                            )));
                        }
                        let current = class.find_static(member);
                        let final_value = self.resolve_compound(
                            op,
                            || {
                                current.ok_or_else(|| {
                                    RuntimeError::attribute(
                                        format!(
                                            "class '{}' has no static field '{}'",
                                            class.name, member
                                        ),
                                        line,
                                        column,
                                    )
                                })
                            },
                            rhs,
                            line,
                            column,
                        )?;
                        class.statics.borrow_mut().insert(member.clone(), final_value.clone());
                        Ok(final_value)
                    }
                    other => Err(Signal::Thrown(RuntimeError::type_error(
                        format!(
                            "cannot assign to a property of a value of type '{}'",
                            self.types.infer(&other)
                        ),
                        line,
                        column,
                    ))),
                }
            }

            AstNode::IndexAccess { object, index, .. } => {
                let object = self.execute(object)?;
                let index = self.execute(index)?;
                self.assign_index(op, object, index, rhs, line, column)
            }

            // The parser restricts targets; anything else is a bad tree.
            _ => Err(Signal::Thrown(RuntimeError::new(
                "invalid assignment target",
                line,
                column,
            ))),
        }
    }

    fn assign_index(
        &mut self,
        op: &TokenKind,
        object: Value,
        index: Value,
        rhs: Value,
        line: usize,
        column: usize,
    ) -> Exec {
        match (&object, &index) {
            (Value::List(list), Value::Integer(i)) => {
                let len = list.borrow().len();
                let i = *i;
                if matches!(op, TokenKind::Equals) && i >= 0 && i as usize == len {
                    // Plain assignment one past the end appends.
                    list.borrow_mut().push(rhs.clone());
                    return Ok(rhs);
                }
                if i < 0 || i as usize >= len {
                    return Err(Signal::Thrown(RuntimeError::index(
                        format!("index {} out of range for list of size {}", i, len),
                        line,
                        column,
                    )));
                }
                let current = list.borrow()[i as usize].clone();
                let final_value = self.resolve_compound(op, || Ok(current), rhs, line, column)?;
                list.borrow_mut()[i as usize] = final_value.clone();
                Ok(final_value)
            }
            (Value::Map(map), Value::Text(key)) => {
                let current = map.borrow().get(key).cloned();
                let final_value = self.resolve_compound(
                    op,
                    || {
                        current.ok_or_else(|| {
                            RuntimeError::key(format!("key '{}' not found", key), line, column)
                        })
                    },
                    rhs,
                    line,
                    column,
                )?;
                map.borrow_mut().insert(key.clone(), final_value.clone());
                Ok(final_value)
            }
            (Value::List(_), other) => Err(Signal::Thrown(RuntimeError::type_error(
                format!("list indices must be 'entero', not '{}'", self.types.infer(other)),
                line,
                column,
            ))),
            (Value::Map(_), other) => Err(Signal::Thrown(RuntimeError::type_error(
                format!("map keys must be 'texto', not '{}'", self.types.infer(other)),
                line,
                column,
            ))),
            (other, _) => Err(Signal::Thrown(RuntimeError::type_error(
                format!(
                    "a value of type '{}' does not support index assignment",
                    self.types.infer(other)
                ),
                line,
                column,
            ))),
        }
    }

    /// For `x op= v`, reads the current value and applies the base
    /// operator; for plain `=` the right-hand side passes through. The
    /// read-modify-write happens within one evaluation step.
    fn resolve_compound(
        &self,
        op: &TokenKind,
        current: impl FnOnce() -> Result<Value, RuntimeError>,
        rhs: Value,
        line: usize,
        column: usize,
    ) -> Result<Value, RuntimeError> {
        let base = match op {
            TokenKind::Equals => return Ok(rhs),
            TokenKind::PlusEquals => TokenKind::Plus,
            TokenKind::MinusEquals => TokenKind::Minus,
            TokenKind::StarEquals => TokenKind::Star,
            TokenKind::SlashEquals => TokenKind::Slash,
            TokenKind::PercentEquals => TokenKind::Percent,
            other => {
                return Err(RuntimeError::new(
                    format!("unsupported assignment operator '{}'", other),
                    line,
                    column,
                ))
            }
        };
        let current = current()?;
        self.binary_op(&base, current, rhs, line, column)
    }

    /* ── Binary operations ───────────────────────────────── */

    fn binary_op(
        &self,
        op: &TokenKind,
        l: Value,
        r: Value,
        line: usize,
        column: usize,
    ) -> Result<Value, RuntimeError> {
        use TokenKind::*;
        match op {
            Plus => self.add_values(l, r, line, column),
            Minus | Star => self.arithmetic(op, l, r, line, column),
            Slash => {
                let (a, b) = self.numeric_operands(op, &l, &r, line, column)?;
                if b == 0.0 {
                    return Err(RuntimeError::new("division by zero", line, column));
                }
                // Division always yields a decimal, even for two integers.
                Ok(Value::Float(a / b))
            }
            Percent => match (&l, &r) {
                (Value::Integer(_), Value::Integer(0)) => {
                    Err(RuntimeError::new("modulo by zero", line, column))
                }
                (Value::Integer(a), Value::Integer(b)) => {
                    // Result follows the sign of the divisor.
                    Ok(Value::Integer(((a % b) + b) % b))
                }
                _ => {
                    let (a, b) = self.numeric_operands(op, &l, &r, line, column)?;
                    if b == 0.0 {
                        return Err(RuntimeError::new("modulo by zero", line, column));
                    }
                    Ok(Value::Float(((a % b) + b) % b))
                }
            },
            DoubleEquals => Ok(Value::Boolean(l.deep_eq(&r))),
            NotEquals => Ok(Value::Boolean(!l.deep_eq(&r))),
            Less | LessEqual | Greater | GreaterEqual => {
                let (a, b) = self.numeric_operands(op, &l, &r, line, column)?;
                let result = match op {
                    Less => a < b,
                    LessEqual => a <= b,
                    Greater => a > b,
                    _ => a >= b,
                };
                Ok(Value::Boolean(result))
            }
            other => Err(RuntimeError::new(
                format!("unsupported binary operator '{}'", other),
                line,
                column,
            )),
        }
    }

    /// `+` is numeric addition, text concatenation, or stringifying
    /// concatenation when exactly one side is text.
    fn add_values(
        &self,
        l: Value,
        r: Value,
        line: usize,
        column: usize,
    ) -> Result<Value, RuntimeError> {
        match (l, r) {
            (Value::Integer(a), Value::Integer(b)) => a
                .checked_add(b)
                .map(Value::Integer)
                .ok_or_else(|| RuntimeError::new("integer overflow", line, column)),
            (Value::Integer(a), Value::Float(b)) => Ok(Value::Float(a as f64 + b)),
            (Value::Float(a), Value::Integer(b)) => Ok(Value::Float(a + b as f64)),
            (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a + b)),
            (Value::Text(a), Value::Text(b)) => Ok(Value::Text(format!("{}{}", a, b))),
            (Value::Text(a), b) => Ok(Value::Text(format!("{}{}", a, b))),
            (a, Value::Text(b)) => Ok(Value::Text(format!("{}{}", a, b))),
            (a, b) => Err(RuntimeError::type_error(
                format!(
                    "'+' requires numeric or text operands, got '{}' and '{}'",
                    self.types.infer(&a),
                    self.types.infer(&b)
                ),
                line,
                column,
            )),
        }
    }

    /// `-` and `*`: integers stay integral (checked), any float promotes.
    fn arithmetic(
        &self,
        op: &TokenKind,
        l: Value,
        r: Value,
        line: usize,
        column: usize,
    ) -> Result<Value, RuntimeError> {
        match (&l, &r) {
            (Value::Integer(a), Value::Integer(b)) => {
                let folded = match op {
                    TokenKind::Minus => a.checked_sub(*b),
                    _ => a.checked_mul(*b),
                };
                folded
                    .map(Value::Integer)
                    .ok_or_else(|| RuntimeError::new("integer overflow", line, column))
            }
            _ => {
                let (a, b) = self.numeric_operands(op, &l, &r, line, column)?;
                Ok(Value::Float(match op {
                    TokenKind::Minus => a - b,
                    _ => a * b,
                }))
            }
        }
    }

    fn numeric_operands(
        &self,
        op: &TokenKind,
        l: &Value,
        r: &Value,
        line: usize,
        column: usize,
    ) -> Result<(f64, f64), RuntimeError> {
        let as_f64 = |v: &Value| match v {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        };
        match (as_f64(l), as_f64(r)) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(RuntimeError::type_error(
                format!(
                    "'{}' requires numeric operands, got '{}' and '{}'",
                    op,
                    self.types.infer(l),
                    self.types.infer(r)
                ),
                line,
                column,
            )),
        }
    }

    /* ── Calls and construction ──────────────────────────── */

    fn eval_args(&mut self, args: &[AstNode]) -> Result<Vec<Value>, Signal> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.execute(arg)?);
        }
        Ok(values)
    }

    fn call_value(&mut self, callee: Value, args: Vec<Value>, line: usize, column: usize) -> Exec {
        match callee {
            Value::Function(func) => self.call_function(&func, args, line, column),
            Value::Native(native) => self.call_native(&native, args, line, column),
            Value::Class(class) => self.construct(class, args, line, column),
            other => Err(Signal::Thrown(RuntimeError::type_error(
                format!("a value of type '{}' is not callable", self.types.infer(&other)),
                line,
                column,
            ))),
        }
    }

    fn call_member(
        &mut self,
        object: Value,
        member: &str,
        args: Vec<Value>,
        line: usize,
        column: usize,
    ) -> Exec {
        match &object {
            Value::Instance(instance) => {
                // An instance field holding a callable shadows methods.
                let field = instance.fields.borrow().get(member).cloned();
                if let Some(field) = field {
                    return self.call_value(field, args, line, column);
                }
                if let Some(method) = instance.class.find_method(member) {
                    if method.is_static {
                        return self.call_function(&method, args, line, column);
                    }
                    let bound = method.bind(instance.clone());
                    return self.call_function(&bound, args, line, column);
                }
                Err(Signal::Thrown(RuntimeError::attribute(
                    format!(
                        "instance of '{}' has no method or property '{}'",
                        instance.class.name, member
                    ),
                    line,
                    column,
                )))
            }
            Value::Module(module) => {
                let value = module.lookup(member).ok_or_else(|| {
                    Signal::Thrown(RuntimeError::attribute(
                        format!("module '{}' has no member '{}'", module.name, member),
                        line,
                        column,
                    ))
                })?;
                self.call_value(value, args, line, column)
            }
            Value::Map(map) => {
                let value = map.borrow().get(member).cloned().ok_or_else(|| {
                    Signal::Thrown(RuntimeError::attribute(
                        format!("object has no property '{}'", member),
                        line,
                        column,
                    ))
                })?;
                self.call_value(value, args, line, column)
            }
            Value::Class(class) => {
                if let Some(value) = class.find_static(member) {
                    return self.call_value(value, args, line, column);
                }
                if let Some(method) = class.find_method(member) {
                    return self.call_function(&method, args, line, column);
                }
                Err(Signal::Thrown(RuntimeError::attribute(
                    format!("class '{}' has no member '{}'", class.name, member),
                    line,
                    column,
                )))
            }
            other => Err(Signal::Thrown(RuntimeError::type_error(
                format!(
                    "a value of type '{}' has no callable members",
                    self.types.infer(other)
                ),
                line,
                column,
            ))),
        }
    }

    fn call_function(
        &mut self,
        func: &FunctionValue,
        args: Vec<Value>,
        line: usize,
        column: usize,
    ) -> Exec {
        let params = &func.decl.params;
        if args.len() != params.len() {
            return Err(Signal::Thrown(RuntimeError::new(
                format!(
                    "'{}' expects {} argument(s), got {}",
                    func.qualified_name(),
                    params.len(),
                    args.len()
                ),
                line,
                column,
            )));
        }
        self.types
            .validate_function_call(&func.qualified_name(), params, &args, line, column)?;

        // Install the closure's captured chain plus a fresh call frame,
        // bind `este` when the function is a bound method, and restore
        // everything whatever way the body exits.
        let saved_scopes =
            std::mem::replace(&mut self.scopes, Scopes::from_frames(func.captured.clone()));
        let saved_self = std::mem::replace(&mut self.current_self, func.receiver.clone());
        self.scopes.push();
        for (param, arg) in params.iter().zip(args.into_iter()) {
            self.scopes.define(&param.name, Slot::typed(arg, param.ty.clone()));
        }

        let mut outcome = Ok(Value::Null);
        for stmt in &func.decl.body {
            match self.execute(stmt) {
                Ok(_) => {}
                Err(Signal::Return(value)) => {
                    outcome = Ok(value);
                    break;
                }
                Err(other) => {
                    outcome = Err(other);
                    break;
                }
            }
        }

        self.scopes = saved_scopes;
        self.current_self = saved_self;

        let value = match outcome {
            Ok(value) => value,
            // Dynamic backstop for signals the parser could not pin down.
            Err(Signal::Break) | Err(Signal::Continue) => {
                return Err(Signal::Thrown(RuntimeError::new(
                    "loop control outside of a loop",
                    line,
                    column,
                )))
            }
            Err(other) => return Err(other),
        };
        self.types.validate_return(
            &func.qualified_name(),
            &value,
            func.decl.return_type.as_deref(),
            line,
            column,
        )?;
        Ok(value)
    }

    fn call_native(
        &mut self,
        native: &NativeFunction,
        args: Vec<Value>,
        line: usize,
        column: usize,
    ) -> Exec {
        if let Some(arity) = native.arity {
            if args.len() != arity {
                return Err(Signal::Thrown(RuntimeError::new(
                    format!("'{}' expects {} argument(s), got {}", native.name, arity, args.len()),
                    line,
                    column,
                )));
            }
        }
        Ok((native.f)(self, args, line, column)?)
    }

    fn construct(
        &mut self,
        class: Rc<ClassValue>,
        args: Vec<Value>,
        line: usize,
        column: usize,
    ) -> Exec {
        let instance = Rc::new(InstanceValue {
            class: class.clone(),
            fields: RefCell::new(HashMap::new()),
        });

        // Field defaults evaluate at instantiation, base-to-derived, under
        // the class's declaration-site scope chain.
        let saved_scopes =
            std::mem::replace(&mut self.scopes, Scopes::from_frames(class.captured.clone()));
        self.scopes.push();
        let mut init_outcome: Result<(), Signal> = Ok(());
        for spec in class.collect_field_specs() {
            let value = match &spec.default {
                Some(expr) => match self.execute(expr) {
                    Ok(value) => value,
                    Err(signal) => {
                        init_outcome = Err(signal);
                        break;
                    }
                },
                None => Value::Null,
            };
            if let Err(err) = self.types.validate_assignment(
                &format!("{}.{}", class.name, spec.name),
                &value,
                spec.ty.as_deref(),
                line,
                column,
            ) {
                init_outcome = Err(Signal::Thrown(err));
                break;
            }
            instance.fields.borrow_mut().insert(spec.name.clone(), value);
        }
        self.scopes = saved_scopes;
        init_outcome?;

        if let Some(ctor) = class.find_method("constructor") {
            let bound = ctor.bind(instance.clone());
            self.call_function(&bound, args, line, column)?;
        } else if !args.is_empty() {
            return Err(Signal::Thrown(RuntimeError::new(
                format!(
                    "class '{}' has no 'constructor' but {} argument(s) were given",
                    class.name,
                    args.len()
                ),
                line,
                column,
            )));
        }

        Ok(Value::Instance(instance))
    }

    /* ── Member and index reads ──────────────────────────── */

    fn get_member(
        &self,
        object: &Value,
        member: &str,
        line: usize,
        column: usize,
    ) -> Result<Value, RuntimeError> {
        match object {
            Value::Instance(instance) => {
                if let Some(value) = instance.fields.borrow().get(member) {
                    return Ok(value.clone());
                }
                if let Some(method) = instance.class.find_method(member) {
                    let bound = if method.is_static {
                        return Ok(Value::Function(method));
                    } else {
                        method.bind(instance.clone())
                    };
                    return Ok(Value::Function(Rc::new(bound)));
                }
                Err(RuntimeError::attribute(
                    format!(
                        "instance of '{}' has no property '{}'",
                        instance.class.name, member
                    ),
                    line,
                    column,
                ))
            }
            Value::Map(map) => map.borrow().get(member).cloned().ok_or_else(|| {
                RuntimeError::attribute(format!("object has no property '{}'", member), line, column)
            }),
            Value::Module(module) => module.lookup(member).ok_or_else(|| {
                RuntimeError::attribute(
                    format!("module '{}' has no member '{}'", module.name, member),
                    line,
                    column,
                )
            }),
            Value::Class(class) => {
                if let Some(value) = class.find_static(member) {
                    return Ok(value);
                }
                if let Some(method) = class.find_method(member) {
                    return Ok(Value::Function(method));
                }
                Err(RuntimeError::attribute(
                    format!("class '{}' has no member '{}'", class.name, member),
                    line,
                    column,
                ))
            }
            other => Err(RuntimeError::attribute(
                format!(
                    "a value of type '{}' has no property '{}'",
                    self.types.infer(other),
                    member
                ),
                line,
                column,
            )),
        }
    }

    fn index_value(
        &self,
        object: &Value,
        index: &Value,
        line: usize,
        column: usize,
    ) -> Result<Value, RuntimeError> {
        match (object, index) {
            (Value::List(list), Value::Integer(i)) => {
                let list = list.borrow();
                if *i < 0 || *i as usize >= list.len() {
                    return Err(RuntimeError::index(
                        format!("index {} out of range for list of size {}", i, list.len()),
                        line,
                        column,
                    ));
                }
                Ok(list[*i as usize].clone())
            }
            (Value::Text(s), Value::Integer(i)) => {
                let chars: Vec<char> = s.chars().collect();
                if *i < 0 || *i as usize >= chars.len() {
                    return Err(RuntimeError::index(
                        format!("index {} out of range for text of size {}", i, chars.len()),
                        line,
                        column,
                    ));
                }
                Ok(Value::Text(chars[*i as usize].to_string()))
            }
            (Value::Map(map), Value::Text(key)) => {
                map.borrow().get(key).cloned().ok_or_else(|| {
                    RuntimeError::key(format!("key '{}' not found", key), line, column)
                })
            }
            (Value::List(_), other) | (Value::Text(_), other) => Err(RuntimeError::type_error(
                format!("indices must be 'entero', not '{}'", self.types.infer(other)),
                line,
                column,
            )),
            (Value::Map(_), other) => Err(RuntimeError::type_error(
                format!("map keys must be 'texto', not '{}'", self.types.infer(other)),
                line,
                column,
            )),
            (other, _) => Err(RuntimeError::type_error(
                format!(
                    "a value of type '{}' does not support index access",
                    self.types.infer(other)
                ),
                line,
                column,
            )),
        }
    }

    /* ── Declarations: classes and modules ───────────────── */

    fn declare_class(
        &mut self,
        name: &str,
        superclass_name: Option<&str>,
        fields: &[FieldDecl],
        methods: &[MethodDecl],
        line: usize,
        column: usize,
    ) -> Exec {
        if self.classes.contains_key(name) {
            return Err(Signal::Thrown(RuntimeError::new(
                format!("class '{}' is already declared", name),
                line,
                column,
            )));
        }
        let superclass = match superclass_name {
            Some(super_name) => Some(self.classes.get(super_name).cloned().ok_or_else(|| {
                Signal::Thrown(RuntimeError::new(
                    format!("unknown superclass '{}'", super_name),
                    line,
                    column,
                ))
            })?),
            None => None,
        };

        let captured = self.scopes.snapshot();

        // Statics and class constants run now; instance defaults wait for
        // `nuevo`.
        let mut statics = HashMap::new();
        let mut static_consts = HashSet::new();
        let mut field_specs = Vec::new();
        for field in fields {
            if field.is_static {
                let value = match &field.default {
                    Some(expr) => self.execute(expr)?,
                    None => Value::Null,
                };
                self.types.validate_assignment(
                    &format!("{}.{}", name, field.name),
                    &value,
                    field.ty.as_deref(),
                    field.line,
                    field.column,
                )?;
                statics.insert(field.name.clone(), value);
                if field.is_const {
                    static_consts.insert(field.name.clone());
                }
            } else {
                field_specs.push(FieldSpec {
                    name: field.name.clone(),
                    ty: field.ty.clone(),
                    default: field.default.clone(),
                    is_public: field.is_public,
                });
            }
        }

        let mut method_table = HashMap::new();
        for method in methods {
            let func = Rc::new(FunctionValue::method(
                method.func.clone(),
                captured.clone(),
                name,
                method.is_static,
                method.is_public,
            ));
            self.types.add_method_signature(
                name,
                &method.func.name,
                method.func.params.clone(),
                method.func.return_type.clone(),
            );
            method_table.insert(method.func.name.clone(), func);
        }

        let class = Rc::new(ClassValue {
            name: name.to_string(),
            superclass,
            fields: field_specs,
            statics: RefCell::new(statics),
            static_consts,
            methods: method_table,
            captured,
        });
        // Registry for `nuevo` and module export; scope binding so class
        // methods and closures can reach the class lexically.
        self.classes.insert(name.to_string(), class.clone());
        self.scopes.define(name, Slot::new(Value::Class(class)));
        self.types.add_class(name, superclass_name);
        Ok(Value::Null)
    }

    fn import_module(
        &mut self,
        spec: &str,
        alias: Option<&str>,
        line: usize,
        column: usize,
    ) -> Exec {
        let bound = alias.map(|a| a.to_string()).unwrap_or_else(|| module_basename(spec));

        let resolved = self
            .resolver
            .resolve(spec)
            .map_err(|e| Signal::Thrown(RuntimeError::new(e, line, column)))?;

        // Cache hit: same resolved identity, no re-execution.
        if let Some(module) = self.modules.get(&resolved.identity).cloned() {
            if !self.scopes.current_contains(&bound) {
                self.scopes.define(&bound, Slot::new(Value::Module(module)));
            }
            return Ok(Value::Null);
        }

        // First import: evaluate the module's top level to completion in a
        // fully isolated interpreter (own scopes, registries and type
        // oracle) that shares only the host and the resolver.
        let mut sub = Interpreter::with_host_and_resolver(self.host.clone(), self.resolver.clone());
        sub.set_optimize(self.optimize);
        sub.evaluate(&resolved.source).map_err(|e| {
            Signal::Thrown(RuntimeError::new(
                format!("error importing module '{}': {}", spec, e),
                line,
                column,
            ))
        })?;

        let functions = sub
            .functions
            .iter()
            .filter(|(_, v)| !matches!(v, Value::Native(_)))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let classes = sub
            .classes
            .iter()
            .map(|(k, c)| (k.clone(), Value::Class(c.clone())))
            .collect();
        let module = Rc::new(ModuleValue {
            name: bound.clone(),
            identity: resolved.identity.clone(),
            globals: sub.scopes.global_frame(),
            functions,
            classes,
        });
        self.modules.insert(resolved.identity, module.clone());

        if !self.scopes.define(&bound, Slot::new(Value::Module(module))) {
            return Err(Signal::Thrown(RuntimeError::new(
                format!("'{}' is already declared in this scope", bound),
                line,
                column,
            )));
        }
        Ok(Value::Null)
    }

    /* ── Natives ─────────────────────────────────────────── */

    fn install_natives(&mut self) {
        let natives: &[(&'static str, Option<usize>, _)] = &[
            ("longitud", Some(1), native_longitud as fn(&mut Interpreter, Vec<Value>, usize, usize) -> Result<Value, RuntimeError>),
            ("tipo_de", Some(1), native_tipo_de),
            ("convertir_a_entero", Some(1), native_convertir_a_entero),
            ("convertir_a_decimal", Some(1), native_convertir_a_decimal),
            ("convertir_a_texto", Some(1), native_convertir_a_texto),
            ("convertir_a_booleano", Some(1), native_convertir_a_booleano),
        ];
        for &(name, arity, f) in natives {
            self.functions
                .insert(name.to_string(), Value::Native(NativeFunction { name, arity, f }));
        }
    }

    /* ── Introspection for the shell ─────────────────────── */

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// (name, rendered value, is_const) for every global binding.
    pub fn global_bindings(&self) -> Vec<(String, String, bool)> {
        let frame = self.scopes.global_frame();
        let frame = frame.borrow();
        let mut out: Vec<(String, String, bool)> = frame
            .iter()
            .map(|(name, slot)| (name.clone(), slot.value.to_string(), slot.is_const))
            .collect();
        out.sort();
        out
    }

    /// (user functions, native functions), each sorted.
    pub fn function_names(&self) -> (Vec<String>, Vec<String>) {
        let mut user = Vec::new();
        let mut native = Vec::new();
        for (name, value) in &self.functions {
            match value {
                Value::Native(_) => native.push(name.clone()),
                _ => user.push(name.clone()),
            }
        }
        user.sort();
        native.sort();
        (user, native)
    }

    /// (class, superclass) pairs, sorted by class name.
    pub fn class_names(&self) -> Vec<(String, Option<String>)> {
        let mut out: Vec<(String, Option<String>)> = self
            .classes
            .values()
            .map(|c| (c.name.clone(), c.superclass.as_ref().map(|s| s.name.clone())))
            .collect();
        out.sort();
        out
    }

    /// (bound name, resolved identity) for every cached module.
    pub fn module_names(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = self
            .modules
            .values()
            .map(|m| (m.name.clone(), m.identity.clone()))
            .collect();
        out.sort();
        out
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// The error value a `catch` clause binds: a map with the fault's kind,
/// message and source position.
fn error_value(err: &RuntimeError) -> Value {
    let mut entries = BTreeMap::new();
    entries.insert("tipo".to_string(), Value::Text(err.kind.name().to_string()));
    entries.insert("mensaje".to_string(), Value::Text(err.message.clone()));
    entries.insert("linea".to_string(), Value::Integer(err.line as i64));
    entries.insert("columna".to_string(), Value::Integer(err.column as i64));
    Value::new_map(entries)
}

/// Default for a typed `var` without initializer; untyped gets `nulo`.
fn default_for_type(ty: Option<&str>) -> Value {
    match ty {
        Some("entero") => Value::Integer(0),
        Some("decimal") => Value::Float(0.0),
        Some("texto") => Value::Text(String::new()),
        Some("booleano") => Value::Boolean(false),
        Some("lista") => Value::new_list(Vec::new()),
        Some("objeto") => Value::new_map(BTreeMap::new()),
        _ => Value::Null,
    }
}

/* ── Native function implementations ─────────────────────── */

fn native_longitud(
    interp: &mut Interpreter,
    args: Vec<Value>,
    line: usize,
    column: usize,
) -> Result<Value, RuntimeError> {
    match &args[0] {
        Value::Text(s) => Ok(Value::Integer(s.chars().count() as i64)),
        Value::List(l) => Ok(Value::Integer(l.borrow().len() as i64)),
        Value::Map(m) => Ok(Value::Integer(m.borrow().len() as i64)),
        other => Err(RuntimeError::new(
            format!("cannot take the length of a value of type '{}'", interp.types.infer(other)),
            line,
            column,
        )),
    }
}

fn native_tipo_de(
    interp: &mut Interpreter,
    args: Vec<Value>,
    _line: usize,
    _column: usize,
) -> Result<Value, RuntimeError> {
    Ok(Value::Text(interp.types.infer(&args[0])))
}

fn native_convertir_a_entero(
    interp: &mut Interpreter,
    mut args: Vec<Value>,
    line: usize,
    column: usize,
) -> Result<Value, RuntimeError> {
    let value = args.remove(0);
    match &value {
        Value::Integer(i) => Ok(Value::Integer(*i)),
        Value::Float(f) => Ok(Value::Integer(*f as i64)),
        Value::Boolean(b) => Ok(Value::Integer(*b as i64)),
        Value::Text(s) => s.trim().parse::<i64>().map(Value::Integer).map_err(|_| {
            conversion_error(interp, &value, "entero", line, column)
        }),
        _ => Err(conversion_error(interp, &value, "entero", line, column)),
    }
}

fn native_convertir_a_decimal(
    interp: &mut Interpreter,
    mut args: Vec<Value>,
    line: usize,
    column: usize,
) -> Result<Value, RuntimeError> {
    let value = args.remove(0);
    match &value {
        Value::Integer(i) => Ok(Value::Float(*i as f64)),
        Value::Float(f) => Ok(Value::Float(*f)),
        Value::Boolean(b) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
        Value::Text(s) => s.trim().parse::<f64>().map(Value::Float).map_err(|_| {
            conversion_error(interp, &value, "decimal", line, column)
        }),
        _ => Err(conversion_error(interp, &value, "decimal", line, column)),
    }
}

fn native_convertir_a_texto(
    _interp: &mut Interpreter,
    args: Vec<Value>,
    _line: usize,
    _column: usize,
) -> Result<Value, RuntimeError> {
    Ok(Value::Text(args[0].to_string()))
}

fn native_convertir_a_booleano(
    _interp: &mut Interpreter,
    args: Vec<Value>,
    _line: usize,
    _column: usize,
) -> Result<Value, RuntimeError> {
    let result = match &args[0] {
        // Text spellings of falsehood convert to falso; any other
        // non-empty text is verdadero.
        Value::Text(s) => !matches!(s.to_lowercase().as_str(), "falso" | "false" | "0" | ""),
        other => other.truthy(),
    };
    Ok(Value::Boolean(result))
}

fn conversion_error(
    interp: &Interpreter,
    value: &Value,
    target: &str,
    line: usize,
    column: usize,
) -> RuntimeError {
    RuntimeError::new(
        format!(
            "cannot convert '{}' (type '{}') to '{}'",
            value,
            interp.types.infer(value),
            target
        ),
        line,
        column,
    )
}
