// src/core/parser.rs
//! Recursive-descent parser for Zisk with precedence climbing, spanned
//! errors, and lightweight scope tracking.
//!
//! The scope tracking is a best-effort static net: it catches
//! redeclarations in the same scope, uses of names that are declared
//! nowhere, misplaced `romper`/`continua`/`retorna`, and the naming
//! conventions the language enforces. Everything it cannot prove is left
//! to the evaluator.

use std::collections::HashSet;
use std::rc::Rc;

use crate::core::ast::{AstNode, CatchClause, FieldDecl, FunctionDecl, MethodDecl, Param};
use crate::core::host::module_basename;
use crate::core::interpreter::NATIVE_FUNCTIONS;
use crate::core::token::{Token, TokenKind};

#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}:{}", self.message, self.line, self.column)
    }
}

impl std::error::Error for ParseError {}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Stack of lexical scopes for declaration tracking; frame 0 is global.
    scopes: Vec<HashSet<String>>,
    /// Names known from earlier parses (REPL lines) plus a pre-scan of the
    /// token stream, so forward references to later declarations resolve.
    known: HashSet<String>,
    loop_depth: usize,
    function_depth: usize,
    class_stack: Vec<String>,
}

impl Parser {
    /// Create new parser instance; ensure trailing EOF token present.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        let needs_eof = match tokens.last() {
            Some(t) => !matches!(t.kind, TokenKind::Eof),
            None => true,
        };
        if needs_eof {
            tokens.push(Token::new(TokenKind::Eof, "", 0, 0));
        }

        let mut known: HashSet<String> =
            NATIVE_FUNCTIONS.iter().map(|s| s.to_string()).collect();
        // Pre-scan declared names so a call may precede its declaration.
        for pair in tokens.windows(2) {
            if matches!(
                pair[0].kind,
                TokenKind::Var | TokenKind::Const | TokenKind::Funcion | TokenKind::Clase
            ) {
                if let TokenKind::Identifier(name) = &pair[1].kind {
                    known.insert(name.clone());
                }
            }
        }

        Parser {
            tokens,
            pos: 0,
            scopes: vec![HashSet::new()],
            known,
            loop_depth: 0,
            function_depth: 0,
            class_stack: Vec::new(),
        }
    }

    /// Seed the tracker with names declared by earlier evaluations, so a
    /// REPL line can reference bindings from previous lines.
    pub fn with_known_names<I: IntoIterator<Item = String>>(mut self, names: I) -> Self {
        self.known.extend(names);
        self
    }

    /// Names declared at the top level of the parsed program, for feeding
    /// back into `with_known_names` on the next REPL line.
    pub fn declared_globals(&self) -> HashSet<String> {
        self.scopes.first().cloned().unwrap_or_default()
    }

    /// Main parse entrypoint: parses all tokens into a program AST.
    pub fn parse(&mut self) -> Result<AstNode, ParseError> {
        let mut nodes = Vec::new();
        while !self.is_at_end() {
            nodes.push(self.parse_declaration()?);
        }
        Ok(AstNode::Program(nodes))
    }

    /* ── Declarations and statements ─────────────────────── */

    fn parse_declaration(&mut self) -> Result<AstNode, ParseError> {
        match self.peek().kind {
            TokenKind::Funcion => self.parse_function_decl(),
            TokenKind::Clase => self.parse_class_decl(),
            TokenKind::Var => self.parse_var_decl(),
            TokenKind::Const => self.parse_const_decl(),
            TokenKind::Importa => self.parse_import(),
            _ => self.parse_statement(),
        }
    }

    fn parse_statement(&mut self) -> Result<AstNode, ParseError> {
        match self.peek().kind {
            TokenKind::Si => self.parse_if(),
            TokenKind::Mientras => self.parse_while(),
            TokenKind::Para => self.parse_for(),
            TokenKind::HacerMientras => self.parse_do_while(),
            TokenKind::Mostrar => self.parse_show(),
            TokenKind::Retorna => self.parse_return(),
            TokenKind::Romper => self.parse_break(),
            TokenKind::Continua => self.parse_continue(),
            TokenKind::Try => self.parse_try_catch(),
            TokenKind::OpenBrace => self.parse_block(false),
            _ => {
                let expr = self.parse_expression()?;
                self.consume_optional_semicolon();
                Ok(expr)
            }
        }
    }

    fn parse_var_decl(&mut self) -> Result<AstNode, ParseError> {
        self.consume(TokenKind::Var, "expected 'var'")?;
        let name_tok = self.peek().clone();
        let name = self.consume_identifier("expected variable name")?;
        if !is_lower_name(&name) {
            return Err(self.err_at(
                "variable names must start with a lowercase letter or '_'",
                name_tok.line,
                name_tok.column,
            ));
        }
        if self.declared_in_current_scope(&name) {
            return Err(self.err_at(
                &format!("'{}' is already declared in this scope", name),
                name_tok.line,
                name_tok.column,
            ));
        }

        let ty = if self.match_token(&TokenKind::Colon) { Some(self.parse_type_name()?) } else { None };
        let init = if self.match_token(&TokenKind::Equals) {
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };
        self.declare(&name);
        self.consume_optional_semicolon();
        Ok(AstNode::VarDecl { name, ty, init, line: name_tok.line, column: name_tok.column })
    }

    fn parse_const_decl(&mut self) -> Result<AstNode, ParseError> {
        self.consume(TokenKind::Const, "expected 'const'")?;
        let name_tok = self.peek().clone();
        let name = self.consume_identifier("expected constant name")?;
        if !is_upper_name(&name) {
            return Err(self.err_at(
                "constant names must be UPPER_SNAKE_CASE",
                name_tok.line,
                name_tok.column,
            ));
        }
        if self.declared_in_current_scope(&name) {
            return Err(self.err_at(
                &format!("'{}' is already declared in this scope", name),
                name_tok.line,
                name_tok.column,
            ));
        }

        let ty = if self.match_token(&TokenKind::Colon) { Some(self.parse_type_name()?) } else { None };
        self.consume(TokenKind::Equals, "a constant declaration requires an initializer")?;
        let init = Box::new(self.parse_expression()?);
        self.declare(&name);
        self.consume_optional_semicolon();
        Ok(AstNode::ConstDecl { name, ty, init, line: name_tok.line, column: name_tok.column })
    }

    fn parse_function_decl(&mut self) -> Result<AstNode, ParseError> {
        let func = self.parse_function_common("function")?;
        Ok(AstNode::FunctionDecl(Rc::new(func)))
    }

    /// Shared by free functions and class methods: `funcion` was not yet
    /// consumed; the caller decides what to wrap the declaration in.
    fn parse_function_common(&mut self, what: &str) -> Result<FunctionDecl, ParseError> {
        let func_tok = self.consume(TokenKind::Funcion, "expected 'funcion'")?.clone();
        let name_tok = self.peek().clone();
        let name = self.consume_identifier(&format!("expected {} name", what))?;
        if !is_lower_name(&name) {
            return Err(self.err_at(
                &format!("{} names must start with a lowercase letter or '_'", what),
                name_tok.line,
                name_tok.column,
            ));
        }
        self.declare(&name);

        self.consume(TokenKind::OpenParen, &format!("expected '(' after {} name", what))?;
        self.enter_scope();
        let mut params: Vec<Param> = Vec::new();
        if !self.check(&TokenKind::CloseParen) {
            loop {
                let p_tok = self.peek().clone();
                let p_name = self.consume_identifier("expected parameter name")?;
                if p_name == "este" {
                    return Err(self.err_at(
                        "'este' is reserved and cannot be a parameter name",
                        p_tok.line,
                        p_tok.column,
                    ));
                }
                let p_ty = if self.match_token(&TokenKind::Colon) {
                    Some(self.parse_type_name()?)
                } else {
                    None
                };
                self.declare(&p_name);
                params.push(Param { name: p_name, ty: p_ty, line: p_tok.line, column: p_tok.column });
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::CloseParen, "expected ')' after parameters")?;

        let return_type = if self.match_token(&TokenKind::Colon) {
            Some(self.parse_type_name()?)
        } else {
            None
        };

        self.function_depth += 1;
        let body = self.parse_block(true);
        self.function_depth -= 1;
        let body = match body? {
            AstNode::Block(stmts) => stmts,
            _ => return Err(self.err_here("function body must be a block")),
        };

        Ok(FunctionDecl {
            name,
            params,
            return_type,
            body,
            line: func_tok.line,
            column: func_tok.column,
        })
    }

    fn parse_class_decl(&mut self) -> Result<AstNode, ParseError> {
        let class_tok = self.consume(TokenKind::Clase, "expected 'clase'")?.clone();
        let name_tok = self.peek().clone();
        let name = self.consume_identifier("expected class name")?;
        if !is_pascal_name(&name) {
            return Err(self.err_at(
                "class names must be PascalCase",
                name_tok.line,
                name_tok.column,
            ));
        }
        self.declare(&name);

        let superclass = if self.match_token(&TokenKind::Extiende) {
            Some(self.consume_identifier("expected superclass name after 'extiende'")?)
        } else {
            None
        };

        self.class_stack.push(name.clone());
        self.enter_scope();
        self.consume(TokenKind::OpenBrace, "expected '{' to open class body")?;

        let mut fields: Vec<FieldDecl> = Vec::new();
        let mut methods: Vec<MethodDecl> = Vec::new();
        while !self.check(&TokenKind::CloseBrace) && !self.is_at_end() {
            let mut is_static = false;
            let mut is_public = true;
            loop {
                match self.peek().kind {
                    TokenKind::Estatico => {
                        self.advance();
                        is_static = true;
                    }
                    TokenKind::Publico => {
                        self.advance();
                        is_public = true;
                    }
                    TokenKind::Privado => {
                        self.advance();
                        is_public = false;
                    }
                    _ => break,
                }
            }

            match self.peek().kind {
                TokenKind::Var | TokenKind::Const => {
                    fields.push(self.parse_class_field(is_static, is_public)?);
                }
                TokenKind::Funcion => {
                    let func = self.parse_function_common("method")?;
                    methods.push(MethodDecl { func: Rc::new(func), is_static, is_public });
                }
                _ => {
                    return Err(self.err_here(
                        "a class body may only contain fields, constants and methods",
                    ))
                }
            }
        }
        self.consume(TokenKind::CloseBrace, "expected '}' to close class body")?;
        self.exit_scope();
        self.class_stack.pop();

        Ok(AstNode::ClassDecl {
            name,
            superclass,
            fields,
            methods,
            line: class_tok.line,
            column: class_tok.column,
        })
    }

    fn parse_class_field(
        &mut self,
        is_static: bool,
        is_public: bool,
    ) -> Result<FieldDecl, ParseError> {
        let is_const = matches!(self.peek().kind, TokenKind::Const);
        self.advance(); // var | const
        let name_tok = self.peek().clone();
        let name = self.consume_identifier("expected field name")?;
        if is_const && !is_upper_name(&name) {
            return Err(self.err_at(
                "constant field names must be UPPER_SNAKE_CASE",
                name_tok.line,
                name_tok.column,
            ));
        }
        if !is_const && !is_lower_name(&name) {
            return Err(self.err_at(
                "field names must start with a lowercase letter or '_'",
                name_tok.line,
                name_tok.column,
            ));
        }
        self.declare(&name);

        let ty = if self.match_token(&TokenKind::Colon) { Some(self.parse_type_name()?) } else { None };
        let default = if self.match_token(&TokenKind::Equals) {
            Some(self.parse_expression()?)
        } else if is_const {
            return Err(self.err_here("a constant field requires an initializer"));
        } else {
            None
        };
        self.consume_optional_semicolon();

        Ok(FieldDecl {
            name,
            ty,
            default,
            // Constant fields live in class-level storage like statics do.
            is_static: is_static || is_const,
            is_public,
            is_const,
            line: name_tok.line,
            column: name_tok.column,
        })
    }

    fn parse_import(&mut self) -> Result<AstNode, ParseError> {
        let import_tok = self.consume(TokenKind::Importa, "expected 'importa'")?.clone();
        let spec = match self.peek().kind.clone() {
            TokenKind::StringLiteral(path) => {
                self.advance();
                path
            }
            TokenKind::Identifier(name) => {
                self.advance();
                name
            }
            _ => {
                return Err(self.err_here(
                    "expected a module name or a path string after 'importa'",
                ))
            }
        };
        let alias = if self.match_token(&TokenKind::Como) {
            Some(self.consume_identifier("expected alias name after 'como'")?)
        } else {
            None
        };
        let bound = alias.clone().unwrap_or_else(|| module_basename(&spec));
        self.declare(&bound);
        self.consume_optional_semicolon();
        Ok(AstNode::Import { spec, alias, line: import_tok.line, column: import_tok.column })
    }

    fn parse_if(&mut self) -> Result<AstNode, ParseError> {
        self.consume(TokenKind::Si, "expected 'si'")?;
        let condition = self.parse_expression()?;
        let _ = self.match_token(&TokenKind::Entonces); // 'entonces' is optional sugar
        let then_branch = self.parse_block_or_statement()?;
        let else_branch = if self.match_token(&TokenKind::Sino) {
            Some(Box::new(self.parse_block_or_statement()?))
        } else {
            None
        };
        Ok(AstNode::If {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch,
        })
    }

    fn parse_while(&mut self) -> Result<AstNode, ParseError> {
        self.consume(TokenKind::Mientras, "expected 'mientras'")?;
        let condition = self.parse_expression()?;
        self.loop_depth += 1;
        let body = self.parse_block_or_statement();
        self.loop_depth -= 1;
        Ok(AstNode::While { condition: Box::new(condition), body: Box::new(body?) })
    }

    fn parse_for(&mut self) -> Result<AstNode, ParseError> {
        self.consume(TokenKind::Para, "expected 'para'")?;
        self.consume(TokenKind::OpenParen, "expected '(' after 'para'")?;

        // The init binding lives in a scope that spans the whole loop.
        self.enter_scope();
        let init = if self.match_token(&TokenKind::Semicolon) {
            None
        } else if self.check(&TokenKind::Var) {
            Some(Box::new(self.parse_var_decl()?)) // consumes its own ';'
        } else {
            let expr = self.parse_expression()?;
            self.consume(TokenKind::Semicolon, "expected ';' after loop initializer")?;
            Some(Box::new(expr))
        };

        let condition = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        self.consume(TokenKind::Semicolon, "expected ';' after loop condition")?;

        let step = if self.check(&TokenKind::CloseParen) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        self.consume(TokenKind::CloseParen, "expected ')' after 'para' clauses")?;

        self.loop_depth += 1;
        let body = self.parse_block_or_statement();
        self.loop_depth -= 1;
        self.exit_scope();

        Ok(AstNode::For { init, condition, step, body: Box::new(body?) })
    }

    fn parse_do_while(&mut self) -> Result<AstNode, ParseError> {
        self.consume(TokenKind::HacerMientras, "expected 'hacer_mientras'")?;
        self.loop_depth += 1;
        let body = self.parse_block_or_statement();
        self.loop_depth -= 1;
        let body = body?;
        self.consume(TokenKind::Mientras, "expected 'mientras' after 'hacer_mientras' body")?;
        let condition = self.parse_expression()?;
        self.consume_optional_semicolon();
        Ok(AstNode::DoWhile { body: Box::new(body), condition: Box::new(condition) })
    }

    fn parse_show(&mut self) -> Result<AstNode, ParseError> {
        let show_tok = self.consume(TokenKind::Mostrar, "expected 'mostrar'")?.clone();
        self.consume(TokenKind::OpenParen, "expected '(' after 'mostrar'")?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::CloseParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::CloseParen, "expected ')' after 'mostrar' arguments")?;
        self.consume_optional_semicolon();
        Ok(AstNode::Show { args, line: show_tok.line, column: show_tok.column })
    }

    fn parse_return(&mut self) -> Result<AstNode, ParseError> {
        let tok = self.consume(TokenKind::Retorna, "expected 'retorna'")?.clone();
        if self.function_depth == 0 {
            return Err(self.err_at(
                "'retorna' may only be used inside a function or method",
                tok.line,
                tok.column,
            ));
        }
        let value = if self.check(&TokenKind::Semicolon)
            || self.check(&TokenKind::CloseBrace)
            || self.is_at_end()
        {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        self.consume_optional_semicolon();
        Ok(AstNode::Return { value, line: tok.line, column: tok.column })
    }

    fn parse_break(&mut self) -> Result<AstNode, ParseError> {
        let tok = self.consume(TokenKind::Romper, "expected 'romper'")?.clone();
        if self.loop_depth == 0 {
            return Err(self.err_at(
                "'romper' may only be used inside a loop",
                tok.line,
                tok.column,
            ));
        }
        self.consume_optional_semicolon();
        Ok(AstNode::Break { line: tok.line, column: tok.column })
    }

    fn parse_continue(&mut self) -> Result<AstNode, ParseError> {
        let tok = self.consume(TokenKind::Continua, "expected 'continua'")?.clone();
        if self.loop_depth == 0 {
            return Err(self.err_at(
                "'continua' may only be used inside a loop",
                tok.line,
                tok.column,
            ));
        }
        self.consume_optional_semicolon();
        Ok(AstNode::Continue { line: tok.line, column: tok.column })
    }

    fn parse_try_catch(&mut self) -> Result<AstNode, ParseError> {
        self.consume(TokenKind::Try, "expected 'try'")?;
        let try_block = self.parse_block(false)?;

        let catch = if self.match_token(&TokenKind::Catch) {
            self.consume(TokenKind::OpenParen, "expected '(' after 'catch'")?;
            let name = self.consume_identifier("expected error variable name")?;
            let ty = if self.match_token(&TokenKind::Colon) {
                Some(self.parse_type_name()?)
            } else {
                None
            };
            self.consume(TokenKind::CloseParen, "expected ')' after catch binding")?;
            self.enter_scope();
            self.declare(&name);
            let body = self.parse_block(true)?; // shares (and closes) the catch scope
            Some(CatchClause { name, ty, body: Box::new(body) })
        } else {
            None
        };

        let finally_block = if self.match_token(&TokenKind::Finally) {
            Some(Box::new(self.parse_block(false)?))
        } else {
            None
        };

        Ok(AstNode::TryCatch {
            try_block: Box::new(try_block),
            catch,
            finally_block,
        })
    }

    /// Parses `{ ... }`. When `scope_prepared` the caller already opened a
    /// scope frame (function parameters, catch binding) that the block
    /// should share instead of opening its own.
    fn parse_block(&mut self, scope_prepared: bool) -> Result<AstNode, ParseError> {
        if !scope_prepared {
            self.enter_scope();
        }
        let result = self.parse_block_inner();
        self.exit_scope();
        result
    }

    fn parse_block_inner(&mut self) -> Result<AstNode, ParseError> {
        self.consume(TokenKind::OpenBrace, "expected '{' to start block")?;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::CloseBrace) && !self.is_at_end() {
            stmts.push(self.parse_declaration()?);
        }
        self.consume(TokenKind::CloseBrace, "expected '}' after block")?;
        Ok(AstNode::Block(stmts))
    }

    /// Control constructs may take a `{ }` block or a single statement; a
    /// single statement is wrapped in an implicit block with its own scope.
    fn parse_block_or_statement(&mut self) -> Result<AstNode, ParseError> {
        if self.check(&TokenKind::OpenBrace) {
            self.parse_block(false)
        } else {
            self.enter_scope();
            let stmt = self.parse_declaration();
            self.exit_scope();
            Ok(AstNode::Block(vec![stmt?]))
        }
    }

    fn parse_type_name(&mut self) -> Result<String, ParseError> {
        match self.peek().kind.clone() {
            TokenKind::TypeName(name) => {
                self.advance();
                Ok(name)
            }
            // A class name is a valid annotation; so are the callable kinds.
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            TokenKind::Funcion => {
                self.advance();
                Ok("funcion".to_string())
            }
            TokenKind::Clase => {
                self.advance();
                Ok("clase".to_string())
            }
            TokenKind::Nulo => {
                self.advance();
                Ok("nulo".to_string())
            }
            _ => Err(self.err_here("expected a type name")),
        }
    }

    /* ── Expression precedence, lowest to highest ─────────── */

    pub fn parse_expression(&mut self) -> Result<AstNode, ParseError> {
        self.parse_assignment()
    }

    // assignment: target ('=' | '+=' | ...) assignment | logical-or
    fn parse_assignment(&mut self) -> Result<AstNode, ParseError> {
        let expr = self.parse_logical_or()?;
        let op = match self.peek().kind {
            TokenKind::Equals
            | TokenKind::PlusEquals
            | TokenKind::MinusEquals
            | TokenKind::StarEquals
            | TokenKind::SlashEquals
            | TokenKind::PercentEquals => self.peek().kind.clone(),
            _ => return Ok(expr),
        };
        let op_tok = self.advance().clone();
        if !matches!(
            expr,
            AstNode::Identifier { .. } | AstNode::MemberAccess { .. } | AstNode::IndexAccess { .. }
        ) {
            return Err(self.err_at(
                "the left side of an assignment must be a variable, member or index",
                op_tok.line,
                op_tok.column,
            ));
        }
        // Right-recursion makes assignment right-associative.
        let value = self.parse_assignment()?;
        Ok(AstNode::Assignment {
            op,
            target: Box::new(expr),
            value: Box::new(value),
            line: op_tok.line,
            column: op_tok.column,
        })
    }

    fn parse_logical_or(&mut self) -> Result<AstNode, ParseError> {
        let mut expr = self.parse_logical_and()?;
        while self.check(&TokenKind::OrOr) {
            let tok = self.advance().clone();
            let right = self.parse_logical_and()?;
            expr = self.spanned_binary(TokenKind::OrOr, expr, right, &tok);
        }
        Ok(expr)
    }

    fn parse_logical_and(&mut self) -> Result<AstNode, ParseError> {
        let mut expr = self.parse_equality()?;
        while self.check(&TokenKind::AndAnd) {
            let tok = self.advance().clone();
            let right = self.parse_equality()?;
            expr = self.spanned_binary(TokenKind::AndAnd, expr, right, &tok);
        }
        Ok(expr)
    }

    fn parse_equality(&mut self) -> Result<AstNode, ParseError> {
        let mut expr = self.parse_comparison()?;
        while matches!(self.peek().kind, TokenKind::DoubleEquals | TokenKind::NotEquals) {
            let tok = self.advance().clone();
            let right = self.parse_comparison()?;
            expr = self.spanned_binary(tok.kind.clone(), expr, right, &tok);
        }
        Ok(expr)
    }

    fn parse_comparison(&mut self) -> Result<AstNode, ParseError> {
        let mut expr = self.parse_term()?;
        while matches!(
            self.peek().kind,
            TokenKind::Less | TokenKind::LessEqual | TokenKind::Greater | TokenKind::GreaterEqual
        ) {
            let tok = self.advance().clone();
            let right = self.parse_term()?;
            expr = self.spanned_binary(tok.kind.clone(), expr, right, &tok);
        }
        Ok(expr)
    }

    fn parse_term(&mut self) -> Result<AstNode, ParseError> {
        let mut expr = self.parse_factor()?;
        while matches!(self.peek().kind, TokenKind::Plus | TokenKind::Minus) {
            let tok = self.advance().clone();
            let right = self.parse_factor()?;
            expr = self.spanned_binary(tok.kind.clone(), expr, right, &tok);
        }
        Ok(expr)
    }

    fn parse_factor(&mut self) -> Result<AstNode, ParseError> {
        let mut expr = self.parse_unary()?;
        while matches!(self.peek().kind, TokenKind::Star | TokenKind::Slash | TokenKind::Percent) {
            let tok = self.advance().clone();
            let right = self.parse_unary()?;
            expr = self.spanned_binary(tok.kind.clone(), expr, right, &tok);
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> Result<AstNode, ParseError> {
        if matches!(self.peek().kind, TokenKind::Minus | TokenKind::Bang) {
            let tok = self.advance().clone();
            let expr = self.parse_unary()?; // right-associative: !!x, --x
            return Ok(AstNode::UnaryOp {
                op: tok.kind.clone(),
                expr: Box::new(expr),
                line: tok.line,
                column: tok.column,
            });
        }
        self.parse_postfix()
    }

    // postfix chain: primary ('(' args ')' | '[' index ']' | '.' member)*
    fn parse_postfix(&mut self) -> Result<AstNode, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek().kind {
                TokenKind::OpenParen => {
                    let tok = self.advance().clone();
                    let mut args = Vec::new();
                    if !self.check(&TokenKind::CloseParen) {
                        loop {
                            args.push(self.parse_expression()?);
                            if !self.match_token(&TokenKind::Comma) {
                                break;
                            }
                        }
                    }
                    self.consume(TokenKind::CloseParen, "expected ')' after arguments")?;
                    expr = AstNode::Call {
                        callee: Box::new(expr),
                        args,
                        line: tok.line,
                        column: tok.column,
                    };
                }
                TokenKind::OpenBracket => {
                    let tok = self.advance().clone();
                    let index = self.parse_expression()?;
                    self.consume(TokenKind::CloseBracket, "expected ']' after index")?;
                    expr = AstNode::IndexAccess {
                        object: Box::new(expr),
                        index: Box::new(index),
                        line: tok.line,
                        column: tok.column,
                    };
                }
                TokenKind::Dot => {
                    let tok = self.advance().clone();
                    let member = self.consume_identifier("expected member name after '.'")?;
                    expr = AstNode::MemberAccess {
                        object: Box::new(expr),
                        member,
                        line: tok.line,
                        column: tok.column,
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<AstNode, ParseError> {
        let tok = self.advance().clone();
        match tok.kind {
            TokenKind::IntLiteral(v) => Ok(AstNode::IntLiteral(v)),
            TokenKind::FloatLiteral(v) => Ok(AstNode::FloatLiteral(v)),
            TokenKind::StringLiteral(s) => Ok(AstNode::StringLiteral(s)),
            TokenKind::BooleanLiteral(b) => Ok(AstNode::BooleanLiteral(b)),
            TokenKind::Nulo => Ok(AstNode::NullLiteral),
            TokenKind::Identifier(name) => {
                if !self.is_declared(&name) {
                    return Err(self.err_at(
                        &format!("use of undeclared name '{}'", name),
                        tok.line,
                        tok.column,
                    ));
                }
                Ok(AstNode::Identifier { name, line: tok.line, column: tok.column })
            }
            TokenKind::Este => {
                if self.class_stack.is_empty() {
                    return Err(self.err_at(
                        "'este' may only be used inside a class method",
                        tok.line,
                        tok.column,
                    ));
                }
                Ok(AstNode::This { line: tok.line, column: tok.column })
            }
            TokenKind::Nuevo => {
                let name_tok = self.peek().clone();
                let class_name = self.consume_identifier("expected class name after 'nuevo'")?;
                if !self.is_declared(&class_name) {
                    return Err(self.err_at(
                        &format!("use of undeclared class '{}'", class_name),
                        name_tok.line,
                        name_tok.column,
                    ));
                }
                self.consume(TokenKind::OpenParen, "expected '(' after class name")?;
                let mut args = Vec::new();
                if !self.check(&TokenKind::CloseParen) {
                    loop {
                        args.push(self.parse_expression()?);
                        if !self.match_token(&TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.consume(TokenKind::CloseParen, "expected ')' after constructor arguments")?;
                Ok(AstNode::New { class_name, args, line: tok.line, column: tok.column })
            }
            TokenKind::Ingresar => {
                self.consume(TokenKind::OpenParen, "expected '(' after 'ingresar'")?;
                let prompt = if self.check(&TokenKind::CloseParen) {
                    None
                } else {
                    Some(Box::new(self.parse_expression()?))
                };
                self.consume(TokenKind::CloseParen, "expected ')' after 'ingresar' prompt")?;
                Ok(AstNode::ReadInput { prompt, line: tok.line, column: tok.column })
            }
            TokenKind::OpenParen => {
                let expr = self.parse_expression()?;
                self.consume(TokenKind::CloseParen, "expected ')'")?;
                Ok(expr)
            }
            TokenKind::OpenBracket => self.parse_list_literal(),
            TokenKind::OpenBrace => self.parse_object_literal(),
            _ => Err(ParseError {
                message: format!("unexpected token '{}' in expression", tok.kind),
                line: tok.line,
                column: tok.column,
            }),
        }
    }

    // '[' was already consumed.
    fn parse_list_literal(&mut self) -> Result<AstNode, ParseError> {
        let mut elements = Vec::new();
        if !self.check(&TokenKind::CloseBracket) {
            loop {
                elements.push(self.parse_expression()?);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::CloseBracket, "expected ']' after list elements")?;
        Ok(AstNode::ListLiteral(elements))
    }

    // '{' was already consumed. Keys are bare identifiers or strings.
    fn parse_object_literal(&mut self) -> Result<AstNode, ParseError> {
        let mut properties = Vec::new();
        if !self.check(&TokenKind::CloseBrace) {
            loop {
                let key = match self.peek().kind.clone() {
                    TokenKind::Identifier(name) => {
                        self.advance();
                        name
                    }
                    TokenKind::StringLiteral(s) => {
                        self.advance();
                        s
                    }
                    _ => {
                        return Err(
                            self.err_here("expected an identifier or string as object key")
                        )
                    }
                };
                self.consume(TokenKind::Colon, "expected ':' after object key")?;
                let value = self.parse_expression()?;
                properties.push((key, value));
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::CloseBrace, "expected '}' after object literal")?;
        Ok(AstNode::ObjectLiteral(properties))
    }

    fn spanned_binary(
        &self,
        op: TokenKind,
        left: AstNode,
        right: AstNode,
        tok: &Token,
    ) -> AstNode {
        AstNode::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
            line: tok.line,
            column: tok.column,
        }
    }

    /* ── Scope tracking ──────────────────────────────────── */

    fn enter_scope(&mut self) {
        self.scopes.push(HashSet::new());
    }

    fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    fn declare(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string());
        }
    }

    fn declared_in_current_scope(&self, name: &str) -> bool {
        self.scopes.last().map_or(false, |s| s.contains(name))
    }

    fn is_declared(&self, name: &str) -> bool {
        self.scopes.iter().rev().any(|scope| scope.contains(name)) || self.known.contains(name)
    }

    /* ── Token utils ─────────────────────────────────────── */

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        self.previous()
    }

    fn previous(&self) -> &Token {
        if self.pos == 0 {
            &self.tokens[0]
        } else {
            &self.tokens[self.pos - 1]
        }
    }

    fn peek(&self) -> &Token {
        // Safe: tokenize always appends an EOF sentinel.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            return true;
        }
        false
    }

    fn consume(&mut self, kind: TokenKind, msg: &str) -> Result<&Token, ParseError> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            Err(self.err_at(msg, self.peek().line, self.peek().column))
        }
    }

    fn consume_identifier(&mut self, msg: &str) -> Result<String, ParseError> {
        if let TokenKind::Identifier(name) = self.peek().kind.clone() {
            self.advance();
            Ok(name)
        } else {
            Err(self.err_at(msg, self.peek().line, self.peek().column))
        }
    }

    fn consume_optional_semicolon(&mut self) -> bool {
        self.match_token(&TokenKind::Semicolon)
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn err_here(&self, msg: &str) -> ParseError {
        self.err_at(msg, self.peek().line, self.peek().column)
    }

    fn err_at(&self, msg: &str, line: usize, column: usize) -> ParseError {
        ParseError { message: msg.into(), line, column }
    }
}

fn is_lower_name(name: &str) -> bool {
    name.chars().next().map_or(false, |c| c.is_lowercase() || c == '_')
}

fn is_upper_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_uppercase() || c.is_ascii_digit() || c == '_')
}

fn is_pascal_name(name: &str) -> bool {
    name.chars().next().map_or(false, |c| c.is_uppercase())
}
