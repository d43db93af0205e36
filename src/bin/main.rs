use std::{
    error::Error,
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, ValueEnum};
use defc::{codegen, lexer, parser, util::fmt::tree};

/// Compiles a `def ... end` definition into a C-like function.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Source file. Reads from stdin if absent or `-`.
    input: Option<PathBuf>,

    /// What to print.
    #[arg(long, value_enum, default_value_t = Emit::Code)]
    emit: Emit,

    /// Writes to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// One token per line.
    Tokens,
    /// The parsed definition, as an indented tree.
    Ast,
    /// The generated code.
    Code,
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(error) = run(&args) {
        eprintln!("error: {error:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let src = read_source(args.input.as_deref())?;
    let tokens = lexer::tokenize(&src)?;

    let output = match args.emit {
        Emit::Tokens => tokens.iter().map(|token| format!("{token:?}\n")).collect::<String>(),
        Emit::Ast => tree::print_definition_string(&parser::parse(tokens)?),
        Emit::Code => {
            let mut code = codegen::generate(&parser::parse(tokens)?);
            code.push('\n');
            code
        }
    };

    match &args.output {
        Some(path) => fs::write(path, output)?,
        None => io::stdout().write_all(output.as_bytes())?,
    }
    Ok(())
}

fn read_source(input: Option<&Path>) -> io::Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path),
        _ => {
            let mut src = String::new();
            io::stdin().read_to_string(&mut src)?;
            Ok(src)
        }
    }
}
