/// Zisk main — subcommands, or the interactive shell by default.
use clap::Parser;

use zisk::cli::{Command, ZiskCli};
use zisk::{commands, config, shell};

fn main() -> anyhow::Result<()> {
    let args = ZiskCli::parse();

    let cfg = config::load(&config::resolve_config_path(&args.config))?;
    let pretty = args.pretty_errors || cfg.pretty_errors.unwrap_or(false);
    let optimize = if args.no_optimize { false } else { cfg.optimize.unwrap_or(true) };

    match args.cmd {
        None => shell::start(cfg, pretty, optimize),
        Some(Command::Run { input }) => commands::run::main_with_opts(input, pretty, optimize),
        Some(Command::Emit { input, out }) => commands::emit::main_with_opts(input, out, pretty),
        Some(Command::Tokens { input }) => commands::tokens::main(input, pretty),
        Some(Command::Ast { input }) => commands::ast::main(input, pretty),
    }
}
