//! Python-to-Wasm Compiler Driver
//!
//! Command-line entry point. Parsing happens upstream: the input file
//! holds the program tree as JSON, matching the AST's serde shape. The
//! driver checks it, generates WAT text, and writes the result; running
//! the module is left to a Wasm host.

use clap::{Parser, Subcommand};
use pwc_common::CompilerError;
use pwc_frontend::ast::Program;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pwc")]
#[command(about = "Python-to-Wasm Compiler")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a program tree (JSON) to a WAT module
    Compile {
        /// Input program tree, JSON format
        input: PathBuf,

        /// Output WAT file; defaults to the input with a .wat extension
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the annotated tree to stdout after checking
        #[arg(long)]
        print_ast: bool,
    },

    /// Type-check a program tree without generating code
    Check {
        /// Input program tree, JSON format
        input: PathBuf,

        /// Print the annotated tree to stdout after checking
        #[arg(long)]
        print_ast: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            input,
            output,
            print_ast,
        } => {
            if let Err(e) = compile_file(&input, output.as_deref(), print_ast) {
                eprintln!("Error compiling {}: {}", input.display(), e);
                std::process::exit(1);
            }
        }
        Commands::Check { input, print_ast } => {
            if let Err(e) = check_file(&input, print_ast) {
                eprintln!("Error checking {}: {}", input.display(), e);
                std::process::exit(1);
            }
        }
    }
}

fn load_program(input: &Path) -> Result<Program, CompilerError> {
    let text = fs::read_to_string(input)?;
    serde_json::from_str(&text)
        .map_err(|e| CompilerError::IoError {
            message: format!("invalid program tree: {e}"),
        })
}

fn compile_file(
    input: &Path,
    output: Option<&Path>,
    print_ast: bool,
) -> Result<(), CompilerError> {
    let mut program = load_program(input)?;
    let wat = pwc_codegen::compile(&mut program)?;

    if print_ast {
        println!("{program:#?}");
    }

    let output_path = match output {
        Some(path) => path.to_path_buf(),
        None => input.with_extension("wat"),
    };
    fs::write(&output_path, &wat)?;
    println!("Wrote {}", output_path.display());
    Ok(())
}

fn check_file(input: &Path, print_ast: bool) -> Result<(), CompilerError> {
    let mut program = load_program(input)?;
    pwc_frontend::check_program(&mut program)?;

    if print_ast {
        println!("{program:#?}");
    }

    println!("{}: no type errors", input.display());
    Ok(())
}
