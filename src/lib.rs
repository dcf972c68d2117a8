//! Blocksmith - turns grammar definitions into block language documents
//!
//! This library takes a formal grammar (the node types of a DSL) together
//! with a generation-instructions document and produces a declarative block
//! language: a tree of visual block descriptions that a drag-and-drop editor
//! renders. Generation is deterministic, synchronous and free of side
//! effects; inputs are never mutated.
//!
//! # Example
//!
//! ```rust
//! use blocksmith::generate;
//!
//! let grammar = r#"{
//!     "name": "math",
//!     "types": {
//!         "lit": {
//!             "type": "concrete",
//!             "attributes": [{ "type": "property", "name": "value" }]
//!         }
//!     }
//! }"#;
//!
//! let json = generate(grammar, "{}").unwrap();
//! assert!(json.contains("editorBlocks"));
//! ```

pub mod document;
pub mod error;
pub mod generator;
pub mod grammar;
pub mod instructions;

pub use document::{BlockLanguageDocument, BlockLanguageMetadata, EditorBlock, VisualBlock};
pub use error::{GeneratorError, ValidationIssue};
pub use generator::{generate_block_language, GeneratorDocument};
pub use grammar::{Attribute, GrammarDocument, NodeTypeDescription};
pub use instructions::resolver::GeneratorInstructions;

use thiserror::Error;

/// Errors that can occur in the complete generation pipeline
#[derive(Debug, Error)]
pub enum GenerateError {
    /// An input document was not valid JSON of the expected shape
    #[error("invalid input document: {0}")]
    Json(#[from] serde_json::Error),

    /// Generation itself failed
    #[error("generation failed: {0}")]
    Generator(#[from] GeneratorError),
}

/// Generate a block language from JSON inputs with default metadata
///
/// This is the main entry point for the library: it parses the grammar and
/// the generator document, runs the generation pipeline and serializes the
/// resulting block language document.
pub fn generate(grammar_json: &str, generator_json: &str) -> Result<String, GenerateError> {
    let grammar: GrammarDocument = serde_json::from_str(grammar_json)?;
    let generator: GeneratorDocument = serde_json::from_str(generator_json)?;
    let metadata = BlockLanguageMetadata {
        id: None,
        name: format!("{} blocks", grammar.name),
        slug: None,
    };
    let document = generate_block_language(&metadata, &generator, &grammar)?;
    Ok(serde_json::to_string_pretty(&document)?)
}
