//! Document assembler: orchestrates trait application, parameter resolution,
//! instruction lookup and type mapping into the final block language

pub mod mapper;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::{
    default_editor_components, BlockLanguageDocument, BlockLanguageMetadata, EditorBlock,
    EditorComponent, QualifiedTypeName,
};
use crate::error::{GeneratorError, ValidationIssue};
use crate::grammar::GrammarDocument;
use crate::instructions::parameters::{ParameterDeclaration, ParameterRegistry};
use crate::instructions::resolver::GeneratorInstructions;
use crate::instructions::traits::{TraitDefinition, TraitRegistry, TraitScope};
use crate::instructions::InstructionsDocument;

/// The whole generation configuration a caller hands in: raw (possibly
/// reference-bearing) type instructions plus parameter and trait sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorDocument {
    /// grammar → type → instructions; fields may still hold `$ref` nodes
    pub type_instructions: Value,
    pub parameter_declarations: BTreeMap<String, ParameterDeclaration>,
    pub parameter_values: BTreeMap<String, Value>,
    pub traits: BTreeMap<String, TraitDefinition>,
    pub trait_scopes: Vec<TraitScope>,
    /// Editor components to carry through; a minimal standard set when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor_components: Option<Vec<EditorComponent>>,
    pub sidebars: Vec<Value>,
}

impl Default for GeneratorDocument {
    fn default() -> Self {
        Self {
            type_instructions: Value::Object(Map::new()),
            parameter_declarations: BTreeMap::new(),
            parameter_values: BTreeMap::new(),
            traits: BTreeMap::new(),
            trait_scopes: Vec::new(),
            editor_components: None,
            sidebars: Vec::new(),
        }
    }
}

impl GeneratorDocument {
    /// Report recoverable configuration problems without attempting a
    /// generation. Never fails; fatal conditions (unknown traits, unresolved
    /// references, unmapped attributes) are only raised by
    /// [`generate_block_language`].
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut registry = ParameterRegistry::new();
        if let Err(err) = registry.add_parameters(&self.parameter_declarations) {
            return vec![ValidationIssue::Schema {
                detail: err.to_string(),
            }];
        }
        registry.add_values(&self.parameter_values);
        registry.validate()
    }
}

/// Generate a complete block language for `grammar`.
///
/// Pipeline: broadcast traits onto the raw instructions, resolve parameter
/// references, deserialize into the typed document, then map every concrete
/// type (`oneOf` types never produce blocks). The inputs are never mutated,
/// so a failed generation leaves any previously generated document intact.
pub fn generate_block_language(
    metadata: &BlockLanguageMetadata,
    generator: &GeneratorDocument,
    grammar: &GrammarDocument,
) -> Result<BlockLanguageDocument, GeneratorError> {
    let mut traits = TraitRegistry::new();
    traits.add_known_traits(&generator.traits);
    traits.add_scopes(&generator.trait_scopes);
    let broadcast = traits.apply_traits(&generator.type_instructions)?;

    let mut parameters = ParameterRegistry::new();
    parameters.add_parameters(&generator.parameter_declarations)?;
    parameters.add_values(&generator.parameter_values);
    let resolved = parameters.resolve(&broadcast)?;

    let typed: InstructionsDocument =
        serde_json::from_value(resolved).map_err(GeneratorError::malformed)?;
    let instructions = GeneratorInstructions::new(typed);

    let mut editor_blocks = Vec::new();
    for (type_name, ty) in grammar.concrete_types() {
        editor_blocks.push(EditorBlock {
            described_type: QualifiedTypeName {
                language_name: grammar.name.clone(),
                type_name: type_name.to_string(),
            },
            visual: mapper::map_type(&grammar.name, type_name, ty, &instructions)?,
        });
    }

    Ok(BlockLanguageDocument {
        id: metadata.id.clone(),
        name: metadata.name.clone(),
        slug: metadata.slug.clone(),
        editor_blocks,
        editor_components: generator
            .editor_components
            .clone()
            .unwrap_or_else(default_editor_components),
        sidebars: generator.sidebars.clone(),
    })
}
