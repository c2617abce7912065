use std::path::PathBuf;

use anyhow::Context;

use crate::core::error::ZiskError;
use crate::core::lexer::Lexer;

/// Dumps the token stream of a program, one token per line.
pub fn main(input: PathBuf, pretty: bool) -> anyhow::Result<()> {
    let source = std::fs::read_to_string(&input)
        .with_context(|| format!("could not read '{}'", input.display()))?;
    let tokens = match Lexer::new(&source).tokenize() {
        Ok(tokens) => tokens,
        Err(e) => {
            super::report_and_exit(&input.display().to_string(), &source, &ZiskError::Lex(e), pretty)
        }
    };
    for token in &tokens {
        println!("{}", token);
    }
    Ok(())
}
