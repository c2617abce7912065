pub mod ast;
pub mod emit;
pub mod run;
pub mod tokens;

use std::path::Path;
use std::process::exit;

use anyhow::Context;
use colored::Colorize;

use crate::core::ast::AstNode;
use crate::core::diagnostics::{print_error, Span};
use crate::core::error::ZiskError;
use crate::core::lexer::Lexer;
use crate::core::parser::Parser;

/// Reports a pipeline error and terminates with a non-zero status.
pub fn report_and_exit(filename: &str, source: &str, err: &ZiskError, pretty: bool) -> ! {
    report(filename, source, err, pretty);
    exit(1);
}

pub fn report(filename: &str, source: &str, err: &ZiskError, pretty: bool) {
    if pretty {
        let (line, col) = err.position();
        print_error(filename, source, &err.to_string(), Span::single(line, col));
    } else {
        eprintln!("{} {}", "error:".bright_red().bold(), err);
    }
}

/// Shared front half of the file commands: read, lex and parse, reporting
/// failures in the selected style.
pub fn load_and_parse(input: &Path, pretty: bool) -> anyhow::Result<(String, AstNode)> {
    let source = std::fs::read_to_string(input)
        .with_context(|| format!("could not read '{}'", input.display()))?;
    let filename = input.display().to_string();

    let tokens = match Lexer::new(&source).tokenize() {
        Ok(tokens) => tokens,
        Err(e) => report_and_exit(&filename, &source, &ZiskError::Lex(e), pretty),
    };
    let ast = match Parser::new(tokens).parse() {
        Ok(ast) => ast,
        Err(e) => report_and_exit(&filename, &source, &ZiskError::Parse(e), pretty),
    };
    Ok((source, ast))
}
