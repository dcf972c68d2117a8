//! Generated block language document types
//!
//! These are the output of generation: a declarative description of visual
//! blocks that a drag-and-drop editor renders. Nothing here performs layout;
//! the document only names what should appear.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::grammar::Orientation;

/// Style assignments for a visual block, key → CSS-ish value
pub type StyleMap = BTreeMap<String, String>;

/// Error codes that are surfaced by drop targets rather than by the
/// generated error indicator. Structural child-count problems fall in this
/// class: the empty slot itself shows them.
pub const ERRORS_SHOWN_BY_DROP_TARGETS: [&str; 2] = ["missingChild", "invalidMinOccurrences"];

/// A single renderable unit in the generated document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "blockType", rename_all = "camelCase")]
pub enum VisualBlock {
    /// Top-level draggable block for a node of the described type
    #[serde(rename_all = "camelCase")]
    Block {
        children: Vec<VisualBlock>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        drop_target: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<StyleMap>,
    },
    /// Presentational grouping of further visuals
    #[serde(rename_all = "camelCase")]
    Container {
        children: Vec<VisualBlock>,
        orientation: Orientation,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<StyleMap>,
    },
    /// Iterates the children of a named group
    #[serde(rename_all = "camelCase")]
    Iterator {
        child_group_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        between: Option<Box<VisualBlock>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        empty_drop_target: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<StyleMap>,
    },
    /// Fixed piece of text
    #[serde(rename_all = "camelCase")]
    Constant {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<StyleMap>,
    },
    /// Read-only rendering of a property value
    #[serde(rename_all = "camelCase")]
    Interpolated {
        property: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<StyleMap>,
    },
    /// Editable input bound to a property
    #[serde(rename_all = "camelCase")]
    Input {
        property: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<StyleMap>,
    },
    /// Indicator shown when the described node carries errors
    #[serde(rename_all = "camelCase")]
    Error {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        excluded_errors: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<StyleMap>,
    },
}

impl VisualBlock {
    /// The standard auto-generated error indicator
    pub fn error_indicator() -> Self {
        VisualBlock::Error {
            excluded_errors: ERRORS_SHOWN_BY_DROP_TARGETS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            style: None,
        }
    }
}

/// Identifies the grammar type a generated block renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualifiedTypeName {
    pub language_name: String,
    pub type_name: String,
}

/// One entry of the generated document: the visuals for a single type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorBlock {
    pub described_type: QualifiedTypeName,
    pub visual: Vec<VisualBlock>,
}

/// An editor-level UI component carried through to the consuming editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorComponent {
    pub component_type: String,
}

/// The minimal component set an editor needs when the generator document
/// supplies none.
pub fn default_editor_components() -> Vec<EditorComponent> {
    vec![EditorComponent {
        component_type: "block-root".to_string(),
    }]
}

/// Caller-supplied identity of the language being generated
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockLanguageMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// The complete generated block language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockLanguageDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub editor_blocks: Vec<EditorBlock>,
    pub editor_components: Vec<EditorComponent>,
    #[serde(default)]
    pub sidebars: Vec<Value>,
}
