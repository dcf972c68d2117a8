//! Grammar definitions consumed by the generator
//!
//! A grammar names the node types of a DSL. Types are either a pure union
//! (`oneOf`, never instantiated and never rendered) or concrete, carrying an
//! ordered list of attributes. The declaration order of attributes is the
//! default rendering order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A complete grammar: the language name and its node type definitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarDocument {
    /// Name of the language this grammar defines
    pub name: String,
    /// All node types, keyed by type name
    #[serde(default)]
    pub types: BTreeMap<String, NodeTypeDescription>,
}

impl GrammarDocument {
    /// Iterate over the concrete (instantiable) types of this grammar
    pub fn concrete_types(&self) -> impl Iterator<Item = (&str, &ConcreteType)> {
        self.types.iter().filter_map(|(name, node)| match node {
            NodeTypeDescription::Concrete(ty) => Some((name.as_str(), ty)),
            NodeTypeDescription::OneOf { .. } => None,
        })
    }
}

/// A node type definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeTypeDescription {
    /// Pure union over other type names; never instantiated
    OneOf { options: Vec<String> },
    /// Instantiable type with ordered attributes
    Concrete(ConcreteType),
}

/// An instantiable type: an ordered list of attributes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConcreteType {
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl ConcreteType {
    /// Look up an attribute by name, searching containers recursively.
    ///
    /// Terminals are addressed by their symbol; containers themselves are
    /// anonymous and can only contribute their children.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        find_attribute(&self.attributes, name)
    }
}

fn find_attribute<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    for attr in attributes {
        match attr {
            Attribute::Container { children, .. } => {
                if let Some(found) = find_attribute(children, name) {
                    return Some(found);
                }
            }
            _ => {
                if attr.name() == Some(name) {
                    return Some(attr);
                }
            }
        }
    }
    None
}

/// A facet of a concrete type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Attribute {
    /// Fixed piece of syntax, e.g. a keyword or punctuation
    Terminal { symbol: String },
    /// Editable scalar value of the node
    Property { name: String },
    /// Named group of child nodes
    #[serde(rename_all = "camelCase")]
    ChildrenGroup {
        name: String,
        kind: GroupKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        separator: Option<String>,
    },
    /// Presentational grouping of further attributes
    Container {
        children: Vec<Attribute>,
        orientation: Orientation,
    },
}

impl Attribute {
    /// The name this attribute is addressed by in mappings and scopes.
    ///
    /// A terminal doubles its symbol as its name; containers have none.
    pub fn name(&self) -> Option<&str> {
        match self {
            Attribute::Terminal { symbol } => Some(symbol),
            Attribute::Property { name } => Some(name),
            Attribute::ChildrenGroup { name, .. } => Some(name),
            Attribute::Container { .. } => None,
        }
    }
}

/// How the children of a group relate to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupKind {
    Allowed,
    Sequence,
    Choice,
    Parentheses,
}

/// Layout direction of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_type() -> ConcreteType {
        ConcreteType {
            attributes: vec![
                Attribute::Terminal {
                    symbol: "if".to_string(),
                },
                Attribute::Property {
                    name: "cond".to_string(),
                },
                Attribute::Container {
                    orientation: Orientation::Horizontal,
                    children: vec![Attribute::ChildrenGroup {
                        name: "body".to_string(),
                        kind: GroupKind::Sequence,
                        separator: None,
                    }],
                },
            ],
        }
    }

    #[test]
    fn test_attribute_lookup_by_name() {
        let ty = sample_type();
        assert!(matches!(
            ty.attribute("cond"),
            Some(Attribute::Property { .. })
        ));
        assert!(ty.attribute("nope").is_none());
    }

    #[test]
    fn test_terminal_addressed_by_symbol() {
        let ty = sample_type();
        assert!(matches!(
            ty.attribute("if"),
            Some(Attribute::Terminal { .. })
        ));
    }

    #[test]
    fn test_lookup_descends_into_containers() {
        let ty = sample_type();
        assert!(matches!(
            ty.attribute("body"),
            Some(Attribute::ChildrenGroup { .. })
        ));
    }

    #[test]
    fn test_grammar_deserialization() {
        let json = r##"{
            "name": "expr",
            "types": {
                "root": { "type": "oneOf", "options": ["lit"] },
                "lit": {
                    "type": "concrete",
                    "attributes": [
                        { "type": "terminal", "symbol": "#" },
                        { "type": "property", "name": "value" }
                    ]
                }
            }
        }"##;
        let grammar: GrammarDocument = serde_json::from_str(json).expect("should deserialize");
        assert_eq!(grammar.name, "expr");
        assert_eq!(grammar.concrete_types().count(), 1);
    }

    #[test]
    fn test_unknown_attribute_kind_rejected() {
        let json = r#"{ "type": "hologram", "name": "x" }"#;
        let result: Result<Attribute, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
