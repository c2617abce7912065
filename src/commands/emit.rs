use std::path::PathBuf;
use std::process::exit;

use anyhow::Context;
use colored::Colorize;

use crate::core::code_generator::CodeGenerator;

/// Translates a `.zk` program to Python source for inspection or export.
pub fn main_with_opts(input: PathBuf, out: Option<PathBuf>, pretty: bool) -> anyhow::Result<()> {
    let (_, ast) = super::load_and_parse(&input, pretty)?;

    let output = match CodeGenerator::new().generate(&ast) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} Python emit failed: {}", "error:".bright_red().bold(), e);
            exit(1);
        }
    };

    let out_path = out.unwrap_or_else(|| input.with_extension("py"));
    std::fs::write(&out_path, output)
        .with_context(|| format!("could not write '{}'", out_path.display()))?;
    println!(
        "{} {}",
        "ok:".green().bold(),
        format!("Python source written to '{}'.", out_path.display())
    );
    Ok(())
}
