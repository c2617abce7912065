// src/core/host.rs
//! The interpreter's only boundaries with the outside world: a line-based
//! input provider, an output sink for `mostrar`, and a module resolver for
//! `importa`. All three are injectable so the core stays free of console
//! and filesystem knowledge; tests swap in recording implementations.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::core::value::{render_values, Value};

/// Interactive boundary: blocking line input and rendered line output.
pub trait Host {
    /// Blocks until a line is available; `None` at end of input.
    fn read_line(&mut self, prompt: &str) -> Option<String>;

    /// Receives every `mostrar` call: all arguments, in order.
    fn write(&mut self, values: &[Value]);
}

/// Default host over stdin/stdout.
pub struct StdHost;

impl Host for StdHost {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        if !prompt.is_empty() {
            print!("{}", prompt);
            io::stdout().flush().ok();
        }
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                Some(line)
            }
        }
    }

    fn write(&mut self, values: &[Value]) {
        println!("{}", render_values(values));
    }
}

/// A module spec resolved to source text plus the identity that keys the
/// importer's cache (two spellings of the same file must share one).
pub struct ResolvedModule {
    pub identity: String,
    pub source: String,
}

pub trait ModuleResolver {
    fn resolve(&self, spec: &str) -> Result<ResolvedModule, String>;
}

/// Disk-backed resolver: bare names get a `.zk` extension, relative paths
/// resolve against a root directory, and the canonical path is the cache
/// identity.
pub struct FileResolver {
    root: PathBuf,
}

impl FileResolver {
    pub fn new() -> Self {
        Self { root: PathBuf::from(".") }
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for FileResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleResolver for FileResolver {
    fn resolve(&self, spec: &str) -> Result<ResolvedModule, String> {
        let mut path = self.root.join(spec);
        if path.extension().is_none() {
            path.set_extension("zk");
        }
        let identity = path
            .canonicalize()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| path.display().to_string());
        let source = std::fs::read_to_string(&path)
            .map_err(|e| format!("could not read module '{}': {}", path.display(), e))?;
        Ok(ResolvedModule { identity, source })
    }
}

/// `"lib/utiles.zk"` imports under the name `utiles` unless aliased.
pub fn module_basename(spec: &str) -> String {
    let base = spec.rsplit(['/', '\\']).next().unwrap_or(spec);
    base.strip_suffix(".zk").unwrap_or(base).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basename_strips_directories_and_extension() {
        assert_eq!(module_basename("lib/utiles.zk"), "utiles");
        assert_eq!(module_basename("utiles"), "utiles");
        assert_eq!(module_basename("a\\b\\c.zk"), "c");
    }
}
