//! Read access to a fully resolved instructions document
//!
//! The resolver wraps the typed, reference-free document and answers every
//! lookup with safe defaults: a type nobody configured still gets a plain
//! single-block rendering. It distinguishes single-block from multi-block
//! configurations and hands out complete per-scope instruction views.

use std::collections::BTreeMap;

use crate::error::GeneratorError;
use crate::grammar::{Attribute, ConcreteType};
use crate::instructions::{
    BlockInstructions, Instructions, InstructionsDocument, IteratorInstructions,
    PropertyInstructions, TerminalInstructions,
};

/// A resolved instructions document, ready for lookups
#[derive(Debug, Clone, Default)]
pub struct GeneratorInstructions {
    document: InstructionsDocument,
}

impl GeneratorInstructions {
    pub fn new(document: InstructionsDocument) -> Self {
        Self { document }
    }

    /// The instructions for one type. Missing entries yield a default,
    /// unstyled single-block view.
    pub fn type_instructions(&self, grammar: &str, type_name: &str) -> TypeInstructions<'_> {
        let description = self
            .document
            .get(grammar)
            .and_then(|types| types.get(type_name));

        match description {
            Some(description) if description.blocks.len() >= 2 => {
                TypeInstructions::Multi(MultiBlockInstructions {
                    blocks: &description.blocks,
                    attributes: Some(&description.attributes),
                })
            }
            Some(description) => TypeInstructions::Single(SingleBlockInstructions {
                block: description.blocks.first(),
                attributes: Some(&description.attributes),
            }),
            None => TypeInstructions::Single(SingleBlockInstructions {
                block: None,
                attributes: None,
            }),
        }
    }
}

/// Instructions for a type, split by block arity
#[derive(Debug, Clone)]
pub enum TypeInstructions<'a> {
    Single(SingleBlockInstructions<'a>),
    Multi(MultiBlockInstructions<'a>),
}

/// View over the instructions of one block of a type
#[derive(Debug, Clone)]
pub struct SingleBlockInstructions<'a> {
    block: Option<&'a Instructions>,
    attributes: Option<&'a BTreeMap<String, Instructions>>,
}

impl<'a> SingleBlockInstructions<'a> {
    /// The attributes this block renders, in order: the explicit mapping if
    /// one is configured, otherwise the grammar's declaration order. Every
    /// mapped name must exist on the type.
    pub fn relevant_attributes<'g>(
        &self,
        type_name: &str,
        ty: &'g ConcreteType,
    ) -> Result<Vec<&'g Attribute>, GeneratorError> {
        use crate::instructions::AttributeMapping;

        match self.scope_block().attribute_mapping {
            AttributeMapping::Order(_) => Ok(ty.attributes.iter().collect()),
            AttributeMapping::Explicit(names) => names
                .iter()
                .map(|name| {
                    ty.attribute(name)
                        .ok_or_else(|| GeneratorError::unknown_attribute(type_name, name))
                })
                .collect(),
        }
    }

    /// Complete block-level instructions
    pub fn scope_block(&self) -> BlockInstructions {
        match self.block {
            Some(partial) => BlockInstructions::overlaid(partial),
            None => BlockInstructions::default(),
        }
    }

    /// Complete instructions for the iterator over the named group
    pub fn scope_iterator(&self, name: &str) -> IteratorInstructions {
        match self.attribute_partial(name) {
            Some(partial) => IteratorInstructions::overlaid(partial),
            None => IteratorInstructions::default(),
        }
    }

    /// Complete instructions for the named terminal
    pub fn scope_terminal(&self, name: &str) -> TerminalInstructions {
        match self.attribute_partial(name) {
            Some(partial) => TerminalInstructions::overlaid(partial),
            None => TerminalInstructions::default(),
        }
    }

    /// Complete instructions for the named property
    pub fn scope_property(&self, name: &str) -> PropertyInstructions {
        match self.attribute_partial(name) {
            Some(partial) => PropertyInstructions::overlaid(partial),
            None => PropertyInstructions::default(),
        }
    }

    fn attribute_partial(&self, name: &str) -> Option<&'a Instructions> {
        self.attributes.and_then(|attributes| attributes.get(name))
    }
}

/// View over a multi-block configuration: ordered per-index block views
/// sharing one attribute pool
#[derive(Debug, Clone)]
pub struct MultiBlockInstructions<'a> {
    blocks: &'a [Instructions],
    attributes: Option<&'a BTreeMap<String, Instructions>>,
}

impl<'a> MultiBlockInstructions<'a> {
    /// Number of declared blocks
    pub fn count(&self) -> usize {
        self.blocks.len()
    }

    /// The single-block view at `index`
    pub fn block(
        &self,
        type_name: &str,
        index: usize,
    ) -> Result<SingleBlockInstructions<'a>, GeneratorError> {
        let partial = self
            .blocks
            .get(index)
            .ok_or_else(|| GeneratorError::undeclared_block(type_name, index, self.blocks.len()))?;
        Ok(SingleBlockInstructions {
            block: Some(partial),
            attributes: self.attributes,
        })
    }
}
