//! Maps concrete grammar types to visual block trees
//!
//! This is the heart of the generator: for every declared block of a type it
//! walks the relevant attributes and emits the matching visual, recursing
//! through containers. The attribute kinds form a closed union, so the
//! dispatch is a plain match.

use crate::document::{StyleMap, VisualBlock};
use crate::error::GeneratorError;
use crate::grammar::{Attribute, ConcreteType};
use crate::instructions::resolver::{
    GeneratorInstructions, SingleBlockInstructions, TypeInstructions,
};
use crate::instructions::ErrorIndicatorPosition;

/// Produce the visual blocks for one concrete type, one per declared block
/// index (a single default block when nothing is configured).
pub fn map_type(
    grammar_name: &str,
    type_name: &str,
    ty: &ConcreteType,
    instructions: &GeneratorInstructions,
) -> Result<Vec<VisualBlock>, GeneratorError> {
    match instructions.type_instructions(grammar_name, type_name) {
        TypeInstructions::Single(single) => Ok(vec![map_block(&single, type_name, ty)?]),
        TypeInstructions::Multi(multi) => (0..multi.count())
            .map(|index| map_block(&multi.block(type_name, index)?, type_name, ty))
            .collect(),
    }
}

fn map_block(
    single: &SingleBlockInstructions<'_>,
    type_name: &str,
    ty: &ConcreteType,
) -> Result<VisualBlock, GeneratorError> {
    let block = single.scope_block();

    let mut children = Vec::new();
    for attribute in single.relevant_attributes(type_name, ty)? {
        children.push(map_attribute(single, attribute)?);
    }

    // The indicator shows node-level errors; child-count problems are left
    // to the drop targets.
    match block.generate_error_indicator {
        ErrorIndicatorPosition::Start => children.insert(0, VisualBlock::error_indicator()),
        ErrorIndicatorPosition::End => children.push(VisualBlock::error_indicator()),
        ErrorIndicatorPosition::None => {}
    }

    Ok(VisualBlock::Block {
        children,
        drop_target: block.on_drop,
        style: none_if_empty(block.style),
    })
}

fn map_attribute(
    single: &SingleBlockInstructions<'_>,
    attribute: &Attribute,
) -> Result<VisualBlock, GeneratorError> {
    match attribute {
        Attribute::Terminal { symbol } => Ok(VisualBlock::Constant {
            text: symbol.clone(),
            style: none_if_empty(single.scope_terminal(symbol).style),
        }),
        Attribute::Property { name } => {
            let property = single.scope_property(name);
            let style = none_if_empty(property.style);
            if property.read_only {
                Ok(VisualBlock::Interpolated {
                    property: name.clone(),
                    style,
                })
            } else {
                Ok(VisualBlock::Input {
                    property: name.clone(),
                    style,
                })
            }
        }
        Attribute::ChildrenGroup {
            name, separator, ..
        } => {
            let iterator = single.scope_iterator(name);
            // Explicit override, else the group's declared separator
            let between = iterator
                .between
                .clone()
                .or_else(|| separator.clone())
                .map(|text| {
                    Box::new(VisualBlock::Constant {
                        text,
                        style: None,
                    })
                });
            Ok(VisualBlock::Iterator {
                child_group_name: name.clone(),
                between,
                empty_drop_target: iterator.empty_drop_target.then_some(true),
                style: none_if_empty(iterator.style),
            })
        }
        Attribute::Container {
            children,
            orientation,
        } => {
            let mapped = children
                .iter()
                .map(|child| map_attribute(single, child))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(VisualBlock::Container {
                children: mapped,
                orientation: *orientation,
                style: None,
            })
        }
    }
}

fn none_if_empty(style: StyleMap) -> Option<StyleMap> {
    if style.is_empty() {
        None
    } else {
        Some(style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{GroupKind, Orientation};
    use crate::instructions::{
        AttributeMapping, Instructions, InstructionsDocument, TypeInstructionsDescription,
    };
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn instructions_for(description: TypeInstructionsDescription) -> GeneratorInstructions {
        let mut types = BTreeMap::new();
        types.insert("expr".to_string(), description);
        let mut document = InstructionsDocument::new();
        document.insert("math".to_string(), types);
        GeneratorInstructions::new(document)
    }

    fn terminal(symbol: &str) -> Attribute {
        Attribute::Terminal {
            symbol: symbol.to_string(),
        }
    }

    fn property(name: &str) -> Attribute {
        Attribute::Property {
            name: name.to_string(),
        }
    }

    fn group(name: &str, separator: Option<&str>) -> Attribute {
        Attribute::ChildrenGroup {
            name: name.to_string(),
            kind: GroupKind::Allowed,
            separator: separator.map(|s| s.to_string()),
        }
    }

    fn children_of(block: &VisualBlock) -> &[VisualBlock] {
        match block {
            VisualBlock::Block { children, .. } => children,
            other => panic!("expected a block, got {other:?}"),
        }
    }

    #[test]
    fn test_unconfigured_type_gets_default_block() {
        let ty = ConcreteType {
            attributes: vec![terminal("t"), group("c1", None)],
        };
        let visuals = map_type("math", "expr", &ty, &GeneratorInstructions::default())
            .expect("should map");
        assert_eq!(visuals.len(), 1);

        let children = children_of(&visuals[0]);
        assert_eq!(children.len(), 3);
        assert_eq!(children[0], VisualBlock::error_indicator());
        assert_eq!(
            children[1],
            VisualBlock::Constant {
                text: "t".to_string(),
                style: None
            }
        );
        assert!(matches!(
            &children[2],
            VisualBlock::Iterator { child_group_name, between: None, .. }
                if child_group_name == "c1"
        ));
    }

    #[test]
    fn test_multi_block_splits_attributes_by_mapping() {
        let ty = ConcreteType {
            attributes: vec![terminal("t"), property("p1")],
        };
        let instructions = instructions_for(TypeInstructionsDescription {
            blocks: vec![
                Instructions {
                    attribute_mapping: Some(AttributeMapping::Explicit(vec!["t".to_string()])),
                    ..Instructions::default()
                },
                Instructions {
                    attribute_mapping: Some(AttributeMapping::Explicit(vec!["p1".to_string()])),
                    ..Instructions::default()
                },
            ],
            attributes: BTreeMap::new(),
        });

        let visuals = map_type("math", "expr", &ty, &instructions).expect("should map");
        assert_eq!(visuals.len(), 2);

        let first = children_of(&visuals[0]);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0], VisualBlock::error_indicator());
        assert!(matches!(&first[1], VisualBlock::Constant { text, .. } if text == "t"));

        let second = children_of(&visuals[1]);
        assert_eq!(second.len(), 2);
        assert_eq!(second[0], VisualBlock::error_indicator());
        assert!(matches!(&second[1], VisualBlock::Input { property, .. } if property == "p1"));
    }

    #[test]
    fn test_error_indicator_placement() {
        use crate::instructions::ErrorIndicatorPosition;

        let ty = ConcreteType {
            attributes: vec![terminal("t")],
        };
        let for_position = |position| {
            let instructions = instructions_for(TypeInstructionsDescription {
                blocks: vec![Instructions {
                    generate_error_indicator: Some(position),
                    ..Instructions::default()
                }],
                attributes: BTreeMap::new(),
            });
            map_type("math", "expr", &ty, &instructions).expect("should map")
        };

        let start = for_position(ErrorIndicatorPosition::Start);
        assert_eq!(children_of(&start[0]).len(), 2);
        assert_eq!(children_of(&start[0])[0], VisualBlock::error_indicator());

        let end = for_position(ErrorIndicatorPosition::End);
        assert_eq!(children_of(&end[0]).len(), 2);
        assert_eq!(children_of(&end[0])[1], VisualBlock::error_indicator());

        // Suppressing the indicator drops exactly one child
        let none = for_position(ErrorIndicatorPosition::None);
        assert_eq!(children_of(&none[0]).len(), 1);
    }

    #[test]
    fn test_read_only_property_is_interpolated() {
        let ty = ConcreteType {
            attributes: vec![property("name")],
        };
        let mut attributes = BTreeMap::new();
        attributes.insert(
            "name".to_string(),
            Instructions {
                prop_read_only: Some(true),
                ..Instructions::default()
            },
        );
        let instructions = instructions_for(TypeInstructionsDescription {
            blocks: Vec::new(),
            attributes,
        });

        let visuals = map_type("math", "expr", &ty, &instructions).expect("should map");
        let children = children_of(&visuals[0]);
        assert!(
            matches!(&children[1], VisualBlock::Interpolated { property, .. } if property == "name")
        );
    }

    #[test]
    fn test_separator_precedence() {
        let make_instructions = |between: Option<&str>| {
            let mut attributes = BTreeMap::new();
            if let Some(between) = between {
                attributes.insert(
                    "args".to_string(),
                    Instructions {
                        between: Some(between.to_string()),
                        ..Instructions::default()
                    },
                );
            }
            instructions_for(TypeInstructionsDescription {
                blocks: Vec::new(),
                attributes,
            })
        };
        let separator_of = |visuals: &[VisualBlock]| -> Option<String> {
            match &children_of(&visuals[0])[1] {
                VisualBlock::Iterator { between, .. } => between.as_ref().map(|b| match &**b {
                    VisualBlock::Constant { text, .. } => text.clone(),
                    other => panic!("separator must be a constant, got {other:?}"),
                }),
                other => panic!("expected iterator, got {other:?}"),
            }
        };

        // Explicit override beats the declared separator
        let ty = ConcreteType {
            attributes: vec![group("args", Some(";"))],
        };
        let visuals = map_type("math", "expr", &ty, &make_instructions(Some(",")))
            .expect("should map");
        assert_eq!(separator_of(&visuals), Some(",".to_string()));

        // Declared separator applies when no override is configured
        let visuals = map_type("math", "expr", &ty, &make_instructions(None)).expect("should map");
        assert_eq!(separator_of(&visuals), Some(";".to_string()));

        // Neither configured: no separator
        let ty = ConcreteType {
            attributes: vec![group("args", None)],
        };
        let visuals = map_type("math", "expr", &ty, &make_instructions(None)).expect("should map");
        assert_eq!(separator_of(&visuals), None);
    }

    #[test]
    fn test_container_children_mapped_recursively() {
        let ty = ConcreteType {
            attributes: vec![Attribute::Container {
                orientation: Orientation::Vertical,
                children: vec![terminal("do"), group("body", None)],
            }],
        };
        let visuals = map_type("math", "expr", &ty, &GeneratorInstructions::default())
            .expect("should map");
        let children = children_of(&visuals[0]);
        match &children[1] {
            VisualBlock::Container {
                children,
                orientation,
                ..
            } => {
                assert_eq!(*orientation, Orientation::Vertical);
                assert_eq!(children.len(), 2);
                assert!(matches!(&children[0], VisualBlock::Constant { text, .. } if text == "do"));
                assert!(matches!(&children[1], VisualBlock::Iterator { .. }));
            }
            other => panic!("expected container, got {other:?}"),
        }
    }

    #[test]
    fn test_styled_terminal_carries_style() {
        let ty = ConcreteType {
            attributes: vec![terminal("+")],
        };
        let mut style = StyleMap::new();
        style.insert("color".to_string(), "#2196f3".to_string());
        let mut attributes = BTreeMap::new();
        attributes.insert(
            "+".to_string(),
            Instructions {
                style: Some(style.clone()),
                ..Instructions::default()
            },
        );
        let instructions = instructions_for(TypeInstructionsDescription {
            blocks: Vec::new(),
            attributes,
        });

        let visuals = map_type("math", "expr", &ty, &instructions).expect("should map");
        assert_eq!(
            children_of(&visuals[0])[1],
            VisualBlock::Constant {
                text: "+".to_string(),
                style: Some(style),
            }
        );
    }
}
