//! The `maqui` driver binary.

mod compiler;
mod target;

use anyhow::{Context, Result};
use clap::Parser;
use compiler::Compiler;
use std::path::PathBuf;
use target::TargetChoice;

#[derive(Parser, Debug)]
#[command(name = "maqui")]
#[command(about = "Maqui compiler: builds a single source file into an executable")]
struct Cli {
    /// Path to the source file
    file: PathBuf,

    /// Cross-compilation target
    #[arg(long, value_enum, default_value_t = target::DEFAULT_TARGET)]
    target: TargetChoice,

    /// Print the generated IR module instead of invoking the backend
    #[arg(long)]
    emit_ir: bool,

    /// Print the parsed statements as JSON and stop
    #[arg(long, conflicts_with = "emit_ir")]
    dump_ast: bool,
}

fn main() {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(errors) if errors.is_empty() => {}
        Ok(errors) => {
            for err in errors {
                println!("{err}");
            }
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<Vec<maqui_types::CompileError>> {
    let compiler = Compiler::new(cli.target.into());

    if cli.dump_ast {
        let src = std::fs::read_to_string(&cli.file)
            .with_context(|| format!("failed to read {}", cli.file.display()))?;
        let (statements, lex_error) = maqui_parse::parse_str(&cli.file.to_string_lossy(), &src);
        if let Some(err) = lex_error {
            eprintln!("{err}");
        }
        println!("{}", serde_json::to_string_pretty(&statements)?);
        return Ok(Vec::new());
    }

    if cli.emit_ir {
        let ast = compiler.analyze_file(&cli.file)?;
        if !ast.errors.is_empty() {
            return Ok(ast.errors);
        }
        print!("{}", maqui_ir::lower(&ast)?);
        return Ok(Vec::new());
    }

    let errors = compiler.compile(&cli.file)?;
    if errors.is_empty() {
        println!("Ok");
    }
    Ok(errors)
}
