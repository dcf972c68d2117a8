//! Generation instructions: per-type, per-scope rendering customization
//!
//! An instructions document is authored as JSON. Every record is a partial:
//! any field may be absent, and prior to parameter resolution any field may
//! hold a `{"$ref": ...}` placeholder instead of a literal. The resolver
//! overlays these partials onto built-in defaults to obtain the complete
//! per-scope views the mapper works with.

pub mod parameters;
pub mod resolver;
pub mod traits;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::StyleMap;

/// Where the auto-generated error indicator is placed in a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorIndicatorPosition {
    Start,
    End,
    None,
}

/// Which attributes a block renders, and in what order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeMapping {
    /// The keyword `"grammar"`: follow the grammar's declaration order
    Order(MappingOrder),
    /// Explicit ordered list of attribute names
    Explicit(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MappingOrder {
    Grammar,
}

impl Default for AttributeMapping {
    fn default() -> Self {
        AttributeMapping::Order(MappingOrder::Grammar)
    }
}

impl AttributeMapping {
    /// True if this mapping follows the grammar's declaration order
    pub fn is_grammar_order(&self) -> bool {
        matches!(self, AttributeMapping::Order(MappingOrder::Grammar))
    }
}

/// A partial instructions record as it appears in the authored document.
///
/// Unknown keys are tolerated so trait fragments may carry editor-specific
/// extensions without breaking the typed boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Instructions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub between: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_mapping: Option<AttributeMapping>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_drop: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate_error_indicator: Option<ErrorIndicatorPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_drop_target: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prop_read_only: Option<bool>,
}

/// Instructions for one type: its block list and per-attribute overrides.
///
/// A type with two or more entries in `blocks` is multi-block; the attribute
/// pool in `attributes` is shared by all of its blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypeInstructionsDescription {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Instructions>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Instructions>,
}

/// The fully resolved, typed instructions document:
/// grammar name → type name → type instructions
pub type InstructionsDocument = BTreeMap<String, BTreeMap<String, TypeInstructionsDescription>>;

/// Complete instructions for a whole block, defaults overlaid with the
/// authored partial
#[derive(Debug, Clone, PartialEq)]
pub struct BlockInstructions {
    pub attribute_mapping: AttributeMapping,
    pub style: StyleMap,
    pub on_drop: Option<Value>,
    pub generate_error_indicator: ErrorIndicatorPosition,
}

impl Default for BlockInstructions {
    fn default() -> Self {
        Self {
            attribute_mapping: AttributeMapping::default(),
            style: StyleMap::new(),
            on_drop: None,
            generate_error_indicator: ErrorIndicatorPosition::Start,
        }
    }
}

impl BlockInstructions {
    /// Overlay an authored partial over the defaults
    pub fn overlaid(partial: &Instructions) -> Self {
        let defaults = Self::default();
        Self {
            attribute_mapping: partial
                .attribute_mapping
                .clone()
                .unwrap_or(defaults.attribute_mapping),
            style: overlay_style(defaults.style, &partial.style),
            on_drop: partial.on_drop.clone(),
            generate_error_indicator: partial
                .generate_error_indicator
                .unwrap_or(defaults.generate_error_indicator),
        }
    }
}

/// Complete instructions for an iterator scope
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IteratorInstructions {
    pub between: Option<String>,
    pub style: StyleMap,
    pub empty_drop_target: bool,
}

impl IteratorInstructions {
    pub fn overlaid(partial: &Instructions) -> Self {
        let defaults = Self::default();
        Self {
            between: partial.between.clone(),
            style: overlay_style(defaults.style, &partial.style),
            empty_drop_target: partial
                .empty_drop_target
                .unwrap_or(defaults.empty_drop_target),
        }
    }
}

/// Complete instructions for a terminal scope
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TerminalInstructions {
    pub style: StyleMap,
}

impl TerminalInstructions {
    pub fn overlaid(partial: &Instructions) -> Self {
        let defaults = Self::default();
        Self {
            style: overlay_style(defaults.style, &partial.style),
        }
    }
}

/// Complete instructions for a property scope
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyInstructions {
    pub style: StyleMap,
    pub read_only: bool,
}

impl PropertyInstructions {
    pub fn overlaid(partial: &Instructions) -> Self {
        let defaults = Self::default();
        Self {
            style: overlay_style(defaults.style, &partial.style),
            read_only: partial.prop_read_only.unwrap_or(defaults.read_only),
        }
    }
}

/// Merge an optional style override into default styling, key by key.
/// Override keys win; unrelated default keys survive.
fn overlay_style(mut defaults: StyleMap, explicit: &Option<StyleMap>) -> StyleMap {
    if let Some(explicit) = explicit {
        for (key, value) in explicit {
            defaults.insert(key.clone(), value.clone());
        }
    }
    defaults
}
