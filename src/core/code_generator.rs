// src/core/code_generator.rs
//! Zisk-to-Python source emitter.
//!
//! Read-only consumer of the AST, off the execution path: the output is
//! informational (diagnostics, export) and carries no behavioral
//! contract. Shapes follow the evaluator where Python can express them
//! directly; where it cannot (do-while), the standard loop rewrite is
//! emitted.

use crate::core::ast::{AstNode, FunctionDecl, MethodDecl};
use crate::core::token::TokenKind;

pub struct CodeGenerator {
    indent: usize,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self { indent: 0 }
    }

    pub fn generate(&mut self, ast: &AstNode) -> Result<String, String> {
        match ast {
            AstNode::Program(stmts) => {
                let mut out = String::from("# Generated from Zisk source\n\n");
                for stmt in stmts {
                    out.push_str(&self.emit_stmt(stmt));
                }
                Ok(out)
            }
            other => Err(format!("expected a program root, got {:?}", other)),
        }
    }

    fn emit_stmt(&mut self, node: &AstNode) -> String {
        match node {
            AstNode::Block(stmts) => {
                let mut out = String::new();
                for stmt in stmts {
                    out.push_str(&self.emit_stmt(stmt));
                }
                out
            }

            AstNode::VarDecl { name, ty, init, .. } => {
                let value = match init {
                    Some(expr) => self.emit_expr(expr),
                    None => "None".to_string(),
                };
                let type_comment = ty
                    .as_ref()
                    .map(|t| format!("  # type: {}", t))
                    .unwrap_or_default();
                format!("{}{} = {}{}\n", self.pad(), name, value, type_comment)
            }

            AstNode::ConstDecl { name, ty, init, .. } => {
                let type_comment = ty
                    .as_ref()
                    .map(|t| format!("  # type: {}", t))
                    .unwrap_or_default();
                format!("{}{} = {}{}\n", self.pad(), name, self.emit_expr(init), type_comment)
            }

            AstNode::FunctionDecl(decl) => self.emit_function(decl, None),

            AstNode::ClassDecl { name, superclass, fields, methods, .. } => {
                self.emit_class(name, superclass.as_deref(), fields, methods)
            }

            AstNode::Import { spec, alias, .. } => {
                let module = spec
                    .rsplit(['/', '\\'])
                    .next()
                    .unwrap_or(spec)
                    .trim_end_matches(".zk")
                    .to_string();
                match alias {
                    Some(alias) => format!("{}import {} as {}\n", self.pad(), module, alias),
                    None => format!("{}import {}\n", self.pad(), module),
                }
            }

            AstNode::If { condition, then_branch, else_branch } => {
                let mut out = format!("{}if {}:\n", self.pad(), self.emit_expr(condition));
                out.push_str(&self.emit_suite(then_branch));
                if let Some(else_branch) = else_branch {
                    out.push_str(&format!("{}else:\n", self.pad()));
                    out.push_str(&self.emit_suite(else_branch));
                }
                out
            }

            AstNode::While { condition, body } => {
                let mut out = format!("{}while {}:\n", self.pad(), self.emit_expr(condition));
                out.push_str(&self.emit_suite(body));
                out
            }

            AstNode::For { init, condition, step, body } => {
                let mut out = String::new();
                if let Some(init) = init {
                    out.push_str(&self.emit_stmt(init));
                }
                let cond = condition
                    .as_ref()
                    .map(|c| self.emit_expr(c))
                    .unwrap_or_else(|| "True".to_string());
                out.push_str(&format!("{}while {}:\n", self.pad(), cond));
                self.indent += 1;
                let mut suite = self.emit_stmt(body);
                if let Some(step) = step {
                    suite.push_str(&format!("{}{}\n", self.pad(), self.emit_expr(step)));
                }
                if suite.trim().is_empty() {
                    suite = format!("{}pass\n", self.pad());
                }
                self.indent -= 1;
                out.push_str(&suite);
                out
            }

            AstNode::DoWhile { body, condition } => {
                // while True: body; if not cond: break
                let mut out = format!("{}while True:\n", self.pad());
                self.indent += 1;
                let mut suite = self.emit_stmt(body);
                if suite.trim().is_empty() {
                    suite = format!("{}pass\n", self.pad());
                }
                suite.push_str(&format!(
                    "{}if not ({}):\n{}    break\n",
                    self.pad(),
                    self.emit_expr(condition),
                    self.pad()
                ));
                self.indent -= 1;
                out.push_str(&suite);
                out
            }

            AstNode::Return { value, .. } => match value {
                Some(expr) => format!("{}return {}\n", self.pad(), self.emit_expr(expr)),
                None => format!("{}return\n", self.pad()),
            },

            AstNode::Break { .. } => format!("{}break\n", self.pad()),
            AstNode::Continue { .. } => format!("{}continue\n", self.pad()),

            AstNode::TryCatch { try_block, catch, finally_block } => {
                let mut out = format!("{}try:\n", self.pad());
                out.push_str(&self.emit_suite(try_block));
                if let Some(clause) = catch {
                    out.push_str(&format!("{}except Exception as {}:\n", self.pad(), clause.name));
                    out.push_str(&self.emit_suite(&clause.body));
                }
                if let Some(finally_block) = finally_block {
                    out.push_str(&format!("{}finally:\n", self.pad()));
                    out.push_str(&self.emit_suite(finally_block));
                }
                out
            }

            AstNode::Show { args, .. } => {
                let args: Vec<String> = args.iter().map(|a| self.emit_expr(a)).collect();
                format!("{}print({})\n", self.pad(), args.join(", "))
            }

            // Expression used in statement position.
            other => format!("{}{}\n", self.pad(), self.emit_expr(other)),
        }
    }

    fn emit_function(&mut self, decl: &FunctionDecl, receiver: Option<&str>) -> String {
        let mut params: Vec<String> = Vec::new();
        if let Some(receiver) = receiver {
            params.push(receiver.to_string());
        }
        params.extend(decl.params.iter().map(|p| p.name.clone()));
        let return_comment = decl
            .return_type
            .as_ref()
            .map(|t| format!("  # -> {}", t))
            .unwrap_or_default();
        let mut out = format!(
            "{}def {}({}):{}\n",
            self.pad(),
            decl.name,
            params.join(", "),
            return_comment
        );
        self.indent += 1;
        let mut body = String::new();
        for stmt in &decl.body {
            body.push_str(&self.emit_stmt(stmt));
        }
        if body.trim().is_empty() {
            body = format!("{}pass\n", self.pad());
        }
        self.indent -= 1;
        out.push_str(&body);
        out
    }

    fn emit_class(
        &mut self,
        name: &str,
        superclass: Option<&str>,
        fields: &[crate::core::ast::FieldDecl],
        methods: &[MethodDecl],
    ) -> String {
        let bases = superclass.map(|s| format!("({})", s)).unwrap_or_default();
        let mut out = format!("{}class {}{}:\n", self.pad(), name, bases);
        self.indent += 1;

        let mut body = String::new();
        for field in fields.iter().filter(|f| f.is_static) {
            let value = field
                .default
                .as_ref()
                .map(|d| self.emit_expr(d))
                .unwrap_or_else(|| "None".to_string());
            body.push_str(&format!("{}{} = {}\n", self.pad(), field.name, value));
        }

        let instance_fields: Vec<_> = fields.iter().filter(|f| !f.is_static).collect();
        if !instance_fields.is_empty() {
            body.push_str(&format!("{}def __init__(self):\n", self.pad()));
            self.indent += 1;
            for field in &instance_fields {
                let value = field
                    .default
                    .as_ref()
                    .map(|d| self.emit_expr(d))
                    .unwrap_or_else(|| "None".to_string());
                body.push_str(&format!("{}self.{} = {}\n", self.pad(), field.name, value));
            }
            self.indent -= 1;
        }

        for method in methods {
            if method.is_static {
                body.push_str(&format!("{}@staticmethod\n", self.pad()));
                body.push_str(&self.emit_function(&method.func, None));
            } else {
                body.push_str(&self.emit_function(&method.func, Some("self")));
            }
        }

        if body.trim().is_empty() {
            body = format!("{}pass\n", self.pad());
        }
        self.indent -= 1;
        out.push_str(&body);
        out
    }

    /// Emits an indented suite under a just-written header line.
    fn emit_suite(&mut self, node: &AstNode) -> String {
        self.indent += 1;
        let mut suite = self.emit_stmt(node);
        if suite.trim().is_empty() {
            suite = format!("{}pass\n", self.pad());
        }
        self.indent -= 1;
        suite
    }

    fn emit_expr(&mut self, node: &AstNode) -> String {
        match node {
            AstNode::IntLiteral(i) => i.to_string(),
            AstNode::FloatLiteral(f) => format!("{:?}", f),
            AstNode::StringLiteral(s) => format!("\"{}\"", escape_py(s)),
            AstNode::BooleanLiteral(true) => "True".to_string(),
            AstNode::BooleanLiteral(false) => "False".to_string(),
            AstNode::NullLiteral => "None".to_string(),
            AstNode::Identifier { name, .. } => name.clone(),
            AstNode::This { .. } => "self".to_string(),

            AstNode::BinaryOp { op, left, right, .. } => format!(
                "({} {} {})",
                self.emit_expr(left),
                py_operator(op),
                self.emit_expr(right)
            ),
            AstNode::UnaryOp { op, expr, .. } => match op {
                TokenKind::Bang => format!("(not {})", self.emit_expr(expr)),
                _ => format!("(-{})", self.emit_expr(expr)),
            },
            AstNode::Assignment { op, target, value, .. } => format!(
                "{} {} {}",
                self.emit_expr(target),
                py_operator(op),
                self.emit_expr(value)
            ),

            AstNode::Call { callee, args, .. } => {
                let args: Vec<String> = args.iter().map(|a| self.emit_expr(a)).collect();
                format!("{}({})", self.emit_expr(callee), args.join(", "))
            }
            AstNode::New { class_name, args, .. } => {
                let args: Vec<String> = args.iter().map(|a| self.emit_expr(a)).collect();
                format!("{}({})", class_name, args.join(", "))
            }
            AstNode::MemberAccess { object, member, .. } => {
                format!("{}.{}", self.emit_expr(object), member)
            }
            AstNode::IndexAccess { object, index, .. } => {
                format!("{}[{}]", self.emit_expr(object), self.emit_expr(index))
            }
            AstNode::ReadInput { prompt, .. } => match prompt {
                Some(expr) => format!("input({})", self.emit_expr(expr)),
                None => "input()".to_string(),
            },

            AstNode::ListLiteral(elements) => {
                let parts: Vec<String> = elements.iter().map(|e| self.emit_expr(e)).collect();
                format!("[{}]", parts.join(", "))
            }
            AstNode::ObjectLiteral(properties) => {
                let parts: Vec<String> = properties
                    .iter()
                    .map(|(k, v)| format!("\"{}\": {}", escape_py(k), self.emit_expr(v)))
                    .collect();
                format!("{{{}}}", parts.join(", "))
            }

            other => format!("None  # unsupported expression: {:?}", other),
        }
    }

    fn pad(&self) -> String {
        "    ".repeat(self.indent)
    }
}

fn py_operator(op: &TokenKind) -> &'static str {
    match op {
        TokenKind::Plus => "+",
        TokenKind::Minus => "-",
        TokenKind::Star => "*",
        TokenKind::Slash => "/",
        TokenKind::Percent => "%",
        TokenKind::Equals => "=",
        TokenKind::PlusEquals => "+=",
        TokenKind::MinusEquals => "-=",
        TokenKind::StarEquals => "*=",
        TokenKind::SlashEquals => "/=",
        TokenKind::PercentEquals => "%=",
        TokenKind::DoubleEquals => "==",
        TokenKind::NotEquals => "!=",
        TokenKind::Less => "<",
        TokenKind::LessEqual => "<=",
        TokenKind::Greater => ">",
        TokenKind::GreaterEqual => ">=",
        TokenKind::AndAnd => "and",
        TokenKind::OrOr => "or",
        _ => "?",
    }
}

fn escape_py(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\t', "\\t")
        .replace('\r', "\\r")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lexer::Lexer;
    use crate::core::parser::Parser;

    fn emit(source: &str) -> String {
        let tokens = Lexer::new(source).tokenize().expect("lexes");
        let ast = Parser::new(tokens).parse().expect("parses");
        CodeGenerator::new().generate(&ast).expect("generates")
    }

    #[test]
    fn emits_function_and_call() {
        let py = emit("funcion suma(a, b) { retorna a + b; } mostrar(suma(2, 3));");
        assert!(py.contains("def suma(a, b):"));
        assert!(py.contains("return (a + b)"));
        assert!(py.contains("print(suma(2, 3))"));
    }

    #[test]
    fn emits_while_with_python_operators() {
        let py = emit("var i = 0; mientras (i < 3 && verdadero) { i += 1; }");
        assert!(py.contains("i = 0"));
        assert!(py.contains("while ((i < 3) and True):"));
        assert!(py.contains("i += 1"));
    }

    #[test]
    fn emits_class_with_init_and_methods() {
        let py = emit(
            "clase Punto { var x = 0; var y = 0; funcion suma() { retorna este.x + este.y; } }",
        );
        assert!(py.contains("class Punto:"));
        assert!(py.contains("def __init__(self):"));
        assert!(py.contains("self.x = 0"));
        assert!(py.contains("def suma(self):"));
        assert!(py.contains("return (self.x + self.y)"));
    }

    #[test]
    fn empty_bodies_get_pass() {
        let py = emit("funcion nada() { }");
        assert!(py.contains("def nada():"));
        assert!(py.contains("    pass"));
    }
}
