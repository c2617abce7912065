use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context;

use crate::core::host::{FileResolver, StdHost};
use crate::core::interpreter::Interpreter;

/// Executes a `.zk` program natively. Module imports resolve relative to
/// the program's directory.
pub fn main_with_opts(input: PathBuf, pretty: bool, optimize: bool) -> anyhow::Result<()> {
    let source = std::fs::read_to_string(&input)
        .with_context(|| format!("could not read '{}'", input.display()))?;

    let root = input.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let mut interp = Interpreter::with_host_and_resolver(
        Rc::new(RefCell::new(StdHost)),
        Rc::new(FileResolver::with_root(root)),
    );
    interp.set_optimize(optimize);

    if let Err(err) = interp.evaluate(&source) {
        super::report_and_exit(&input.display().to_string(), &source, &err, pretty);
    }
    Ok(())
}
