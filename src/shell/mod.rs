//! Interactive Zisk shell.
//!
//! A thin consumer of the core's `evaluate` surface: it buffers lines
//! until brackets balance, evaluates, prints non-null results, and offers
//! a few `:meta` commands for inspecting interpreter state. All state
//! lives in one persistent `Interpreter`, so bindings accumulate across
//! lines.

use std::io::{self, Write};

use colored::Colorize;

use crate::commands::report;
use crate::config::Config;
use crate::core::error::ZiskError;
use crate::core::interpreter::Interpreter;
use crate::core::lexer::Lexer;
use crate::core::parser::Parser;
use crate::core::value::Value;

pub fn start(config: Config, pretty: bool, optimize: bool) -> anyhow::Result<()> {
    banner();

    let prompt = config.prompt.clone().unwrap_or_else(|| "zisk".to_string());
    let mut interp = Interpreter::new();
    interp.set_optimize(optimize);

    let mut buffer: Vec<String> = Vec::new();
    loop {
        if buffer.is_empty() {
            print!("{} {} ", prompt.bold().bright_green(), "›".bright_yellow());
        } else {
            print!("{} ", "...".dimmed());
        }
        io::stdout().flush().ok();

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            println!();
            break;
        }
        let line = line.trim_end().to_string();

        if buffer.is_empty() && line.trim_start().starts_with(':') {
            if !handle_command(&mut interp, line.trim(), pretty)? {
                break;
            }
            continue;
        }
        if buffer.is_empty() && line.trim().is_empty() {
            continue;
        }

        buffer.push(line);
        let code = buffer.join("\n");
        if needs_more(&code) {
            continue;
        }
        buffer.clear();

        match interp.evaluate(&code) {
            Ok(Value::Null) => {}
            Ok(value) => println!("{}", value),
            Err(err) => report("<shell>", &code, &err, pretty),
        }
    }
    Ok(())
}

fn banner() {
    println!("{}", "Zisk shell".bold().bright_green());
    println!("{}", "Type ':ayuda' for commands, ':salir' to quit.".dimmed());
}

/// `false` means quit the shell.
fn handle_command(interp: &mut Interpreter, line: &str, pretty: bool) -> anyhow::Result<bool> {
    let (cmd, arg) = match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };

    match cmd {
        ":salir" => {
            println!("Adios.");
            return Ok(false);
        }
        ":ayuda" => print_help(),
        ":cargar" => {
            if arg.is_empty() {
                usage(":cargar <archivo.zk>");
            } else {
                match std::fs::read_to_string(arg) {
                    Ok(source) => match interp.evaluate(&source) {
                        Ok(Value::Null) => {}
                        Ok(value) => println!("{}", value),
                        Err(err) => report(arg, &source, &err, pretty),
                    },
                    Err(e) => eprintln!("{} {}: {}", "err:".red().bold(), arg, e),
                }
            }
        }
        ":vars" => {
            let bindings = interp.global_bindings();
            if bindings.is_empty() {
                println!("  (ninguna)");
            }
            for (name, rendered, is_const) in bindings {
                let marker = if is_const { " (const)" } else { "" };
                println!("  {}{} = {}", name, marker.dimmed(), rendered);
            }
        }
        ":funcs" => {
            let (user, native) = interp.function_names();
            if !user.is_empty() {
                println!("  Funciones de usuario:");
                for name in user {
                    println!("    funcion {}(...)", name);
                }
            }
            println!("  Funciones nativas:");
            for name in native {
                println!("    {}(...)", name);
            }
        }
        ":clases" => {
            let classes = interp.class_names();
            if classes.is_empty() {
                println!("  (ninguna)");
            }
            for (name, superclass) in classes {
                match superclass {
                    Some(superclass) => println!("  clase {} extiende {}", name, superclass),
                    None => println!("  clase {}", name),
                }
            }
        }
        ":modulos" => {
            let modules = interp.module_names();
            if modules.is_empty() {
                println!("  (ninguno)");
            }
            for (name, identity) in modules {
                println!("  modulo {} ({})", name, identity.dimmed());
            }
        }
        ":tokens" => {
            if arg.is_empty() {
                usage(":tokens <codigo>");
            } else {
                match Lexer::new(arg).tokenize() {
                    Ok(tokens) => {
                        for token in tokens {
                            println!("  {}", token);
                        }
                    }
                    Err(e) => report("<shell>", arg, &ZiskError::Lex(e), pretty),
                }
            }
        }
        ":ast" => {
            if arg.is_empty() {
                usage(":ast <codigo>");
            } else {
                match Lexer::new(arg).tokenize().map_err(ZiskError::Lex).and_then(|tokens| {
                    Parser::new(tokens).parse().map_err(ZiskError::Parse)
                }) {
                    Ok(ast) => println!("{:#?}", ast),
                    Err(e) => report("<shell>", arg, &e, pretty),
                }
            }
        }
        other => eprintln!("{} comando desconocido: {}", "err:".red().bold(), other),
    }
    Ok(true)
}

fn print_help() {
    println!("Comandos del shell:");
    println!("  :ayuda            - muestra esta ayuda");
    println!("  :salir            - termina el shell");
    println!("  :cargar <ruta>    - carga y ejecuta un archivo .zk");
    println!("  :vars             - variables globales definidas");
    println!("  :funcs            - funciones definidas");
    println!("  :clases           - clases definidas");
    println!("  :modulos          - modulos importados");
    println!("  :tokens <codigo>  - muestra los tokens del codigo");
    println!("  :ast <codigo>     - muestra el AST del codigo");
}

fn usage(text: &str) {
    eprintln!("{} uso: {}", "err:".red().bold(), text);
}

/// Multi-line heuristic: keep reading while brackets (outside string
/// literals) are unbalanced or the line ends in a continuation character.
fn needs_more(code: &str) -> bool {
    let mut parens = 0i32;
    let mut braces = 0i32;
    let mut brackets = 0i32;
    let mut in_string = false;
    let mut escape = false;
    for ch in code.chars() {
        if in_string {
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '(' => parens += 1,
            ')' => parens -= 1,
            '{' => braces += 1,
            '}' => braces -= 1,
            '[' => brackets += 1,
            ']' => brackets -= 1,
            _ => {}
        }
    }
    if in_string {
        return true;
    }
    if parens > 0 || braces > 0 || brackets > 0 {
        return true;
    }
    code.trim_end().ends_with('\\') || code.trim_end().ends_with(',')
}

#[cfg(test)]
mod tests {
    use super::needs_more;

    #[test]
    fn balanced_code_is_complete() {
        assert!(!needs_more("var x = 1;"));
        assert!(!needs_more("mostrar(\"{\");"));
    }

    #[test]
    fn open_brackets_request_more_input() {
        assert!(needs_more("funcion f() {"));
        assert!(needs_more("var xs = [1, 2,"));
        assert!(needs_more("mostrar(\"sin cerrar"));
    }
}
