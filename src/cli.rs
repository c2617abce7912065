use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "zisk",
    about = "Zisk — run, translate and explore .zk programs",
    version,
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct ZiskCli {
    /// Global: pretty caret diagnostics
    #[arg(long = "pretty-errors", action = ArgAction::SetTrue, global = true)]
    pub pretty_errors: bool,

    /// Global: disable the optimizer pass
    #[arg(long = "no-optimize", action = ArgAction::SetTrue, global = true)]
    pub no_optimize: bool,

    /// Global: path to config (TOML); default: ~/.zisk/config.toml
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a Zisk program
    ///
    /// Example:
    ///   zisk run programa.zk
    Run {
        /// Input file (.zk)
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// Translate a Zisk program to Python source
    ///
    /// Example:
    ///   zisk emit programa.zk -o programa.py
    Emit {
        /// Input file (.zk)
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        /// Output file; defaults to the input with a .py extension
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Print the token stream of a Zisk program
    Tokens {
        /// Input file (.zk)
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// Print the parsed AST of a Zisk program
    Ast {
        /// Input file (.zk)
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
}
