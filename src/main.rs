//! Blocksmith CLI
//!
//! Usage:
//!   blocksmith [OPTIONS] <GRAMMAR> [GENERATOR]
//!
//! Options:
//!   -n, --name <NAME>  Name of the generated block language
//!   --validate         Only validate the generator document's parameters
//!   --compact          Emit compact JSON instead of pretty-printed

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use blocksmith::{generate_block_language, BlockLanguageMetadata, GeneratorDocument, GrammarDocument};

#[derive(Parser)]
#[command(name = "blocksmith")]
#[command(about = "Generates block language documents from grammar definitions")]
struct Cli {
    /// Grammar definition file (JSON)
    grammar: PathBuf,

    /// Generator document file (JSON, reads from stdin if not provided)
    generator: Option<PathBuf>,

    /// Name of the generated block language
    #[arg(short, long)]
    name: Option<String>,

    /// Only validate the generator document's parameters and exit
    #[arg(long)]
    validate: bool,

    /// Emit compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let grammar_source = match fs::read_to_string(&cli.grammar) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading grammar '{}': {}", cli.grammar.display(), e);
            return ExitCode::FAILURE;
        }
    };
    let grammar: GrammarDocument = match serde_json::from_str(&grammar_source) {
        Ok(grammar) => grammar,
        Err(e) => {
            eprintln!("Invalid grammar '{}': {}", cli.grammar.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let generator_source = match &cli.generator {
        Some(path) => match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("Error reading generator document '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            if io::stdin().is_terminal() {
                eprintln!("No generator document given and stdin is a terminal.");
                eprintln!("Pass a file or pipe a JSON document in.");
                return ExitCode::FAILURE;
            }
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error reading generator document from stdin: {}", e);
                return ExitCode::FAILURE;
            }
            buffer
        }
    };
    let generator: GeneratorDocument = match serde_json::from_str(&generator_source) {
        Ok(generator) => generator,
        Err(e) => {
            eprintln!("Invalid generator document: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.validate {
        let issues = generator.validate();
        if issues.is_empty() {
            eprintln!("Generator document is valid.");
            return ExitCode::SUCCESS;
        }
        for issue in &issues {
            eprintln!("{}", issue);
        }
        return ExitCode::FAILURE;
    }

    let metadata = BlockLanguageMetadata {
        id: None,
        name: cli
            .name
            .unwrap_or_else(|| format!("{} blocks", grammar.name)),
        slug: None,
    };

    let document = match generate_block_language(&metadata, &generator, &grammar) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Generation failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let serialized = if cli.compact {
        serde_json::to_string(&document)
    } else {
        serde_json::to_string_pretty(&document)
    };
    match serialized {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error serializing document: {}", e);
            ExitCode::FAILURE
        }
    }
}
