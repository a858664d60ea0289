// cfront: resolve the declarations of a C source file and print their types

mod parser;
mod semantics;

use std::fs;
use std::path::Path;

use parser::parse::Parser;
use semantics::env::Env;
use semantics::specifiers::StorageClass;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        let program_name = args.first().map(|s| s.as_str()).unwrap_or("cfront");
        eprintln!("Error: No input file provided");
        eprintln!();
        eprintln!("Usage: {} <file.c>", program_name);
        eprintln!();
        eprintln!("Parses the external declarations in the file and prints one");
        eprintln!("line per declared name with its storage class and resolved type.");
        std::process::exit(1);
    }

    let input_file = &args[1];

    if !Path::new(input_file).exists() {
        eprintln!("Error: File '{}' not found", input_file);
        std::process::exit(1);
    }

    // Read source code
    let source = fs::read_to_string(input_file)?;

    // Parse the declarations
    let mut parser = match Parser::new(&source) {
        Ok(parser) => parser,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let program = match parser.parse_program() {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    // Resolve declaration by declaration against an empty root environment,
    // so semantic errors can report the line they came from
    let mut env = Env::new();
    let mut resolved = Vec::new();
    for declaration in &program.declarations {
        match declaration.resolve(env) {
            Ok((next_env, mut batch)) => {
                env = next_env;
                resolved.append(&mut batch);
            }
            Err(e) => {
                eprintln!("Semantic error at line {}: {}", declaration.location.line, e);
                std::process::exit(1);
            }
        }
    }

    for decl in &resolved {
        match decl.storage {
            StorageClass::Auto => println!("{}: {}", decl.name, decl.ty),
            storage => println!("{}: {} {}", decl.name, storage, decl.ty),
        }
    }

    Ok(())
}
