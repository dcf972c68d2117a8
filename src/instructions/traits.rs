//! Trait registry: reusable instruction fragments broadcast onto many targets
//!
//! A trait is a named fragment of instructions plus a merge mode. Scopes
//! describe which attributes or blocks of which types the trait bundle lands
//! on. Applying traits rewrites the raw instructions document before
//! parameter resolution, auto-creating any entry a scope addresses.
//!
//! Precedence: a value already present on a target, whether authored
//! explicitly or set by an earlier trait, is never overwritten by
//! `shallowMerge` or `deepMerge`. `replace` is the deliberate exception: it
//! clears the target first.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::GeneratorError;

/// How a trait fragment combines with its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApplyMode {
    /// Fill only absent top-level keys
    ShallowMerge,
    /// Recurse into nested objects, filling absent leaves
    DeepMerge,
    /// Clear the target, then fill
    Replace,
}

/// A named, reusable instructions fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitDefinition {
    /// The fragment to merge onto each target
    pub instructions: Map<String, Value>,
    pub apply_mode: ApplyMode,
}

/// Which targets a list of traits is broadcast onto
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TraitScope {
    /// Trait names, applied in order
    pub traits: Vec<String>,
    /// grammar → type → attribute names to target
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, BTreeMap<String, Vec<String>>>,
    /// grammar → type → block indices to target
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub blocks: BTreeMap<String, BTreeMap<String, Vec<usize>>>,
}

/// Registered traits and the scopes that broadcast them.
///
/// Like the parameter registry this is a per-request builder with no
/// document state of its own.
#[derive(Debug, Default)]
pub struct TraitRegistry {
    traits: BTreeMap<String, TraitDefinition>,
    scopes: Vec<TraitScope>,
}

impl TraitRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register named traits. An existing name is overwritten.
    pub fn add_known_traits(&mut self, traits: &BTreeMap<String, TraitDefinition>) {
        for (name, definition) in traits {
            self.traits.insert(name.clone(), definition.clone());
        }
    }

    /// Append scope assignments, preserving order
    pub fn add_scopes(&mut self, scopes: &[TraitScope]) {
        self.scopes.extend(scopes.iter().cloned());
    }

    /// Apply every registered scope to `document`, returning a new document.
    ///
    /// Targets a scope addresses are created on demand; a sparse `blocks`
    /// array is padded with empty records up to the needed index.
    pub fn apply_traits(&self, document: &Value) -> Result<Value, GeneratorError> {
        let mut result = document.clone();
        let root = as_object_mut(&mut result, "instructions document")?;

        for scope in &self.scopes {
            for (grammar, types) in &scope.attributes {
                for (type_name, attribute_names) in types {
                    for attribute in attribute_names {
                        let grammar_entry = ensure_object(root, grammar)?;
                        let type_entry = ensure_object(grammar_entry, type_name)?;
                        let attributes = ensure_object(type_entry, "attributes")?;
                        let target = ensure_object(attributes, attribute)?;
                        self.apply_scope_traits(target, scope)?;
                    }
                }
            }
            for (grammar, types) in &scope.blocks {
                for (type_name, indices) in types {
                    for &index in indices {
                        let grammar_entry = ensure_object(root, grammar)?;
                        let type_entry = ensure_object(grammar_entry, type_name)?;
                        let target = ensure_block(type_entry, index)?;
                        self.apply_scope_traits(target, scope)?;
                    }
                }
            }
        }
        Ok(result)
    }

    fn apply_scope_traits(
        &self,
        target: &mut Map<String, Value>,
        scope: &TraitScope,
    ) -> Result<(), GeneratorError> {
        for name in &scope.traits {
            let definition = self
                .traits
                .get(name)
                .ok_or_else(|| GeneratorError::UnknownTrait { name: name.clone() })?;
            apply_fragment(target, &definition.instructions, definition.apply_mode)?;
        }
        Ok(())
    }
}

fn apply_fragment(
    target: &mut Map<String, Value>,
    fragment: &Map<String, Value>,
    mode: ApplyMode,
) -> Result<(), GeneratorError> {
    match mode {
        ApplyMode::ShallowMerge => {
            shallow_merge(target, fragment);
            Ok(())
        }
        ApplyMode::DeepMerge => deep_merge(target, fragment),
        ApplyMode::Replace => {
            target.clear();
            shallow_merge(target, fragment);
            Ok(())
        }
    }
}

/// Set only keys absent on the target
fn shallow_merge(target: &mut Map<String, Value>, fragment: &Map<String, Value>) {
    for (key, value) in fragment {
        target
            .entry(key.clone())
            .or_insert_with(|| value.clone());
    }
}

/// Recurse into nested objects, filling absent leaves. Present leaves stay
/// untouched. Arrays are not mergeable on either side.
fn deep_merge(
    target: &mut Map<String, Value>,
    fragment: &Map<String, Value>,
) -> Result<(), GeneratorError> {
    for (key, value) in fragment {
        reject_arrays(key, value)?;
        match target.get_mut(key) {
            None => {
                target.insert(key.clone(), value.clone());
            }
            Some(existing) if existing.is_array() => {
                return Err(GeneratorError::ArrayMergeUnsupported { key: key.clone() });
            }
            Some(existing) => {
                if let (Some(nested_target), Some(nested_fragment)) =
                    (existing.as_object_mut(), value.as_object())
                {
                    deep_merge(nested_target, nested_fragment)?;
                }
                // A present leaf wins over the trait's value
            }
        }
    }
    Ok(())
}

fn reject_arrays(key: &str, value: &Value) -> Result<(), GeneratorError> {
    match value {
        Value::Array(_) => Err(GeneratorError::ArrayMergeUnsupported {
            key: key.to_string(),
        }),
        Value::Object(map) => {
            for (nested_key, nested_value) in map {
                reject_arrays(nested_key, nested_value)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn ensure_object<'a>(
    parent: &'a mut Map<String, Value>,
    key: &str,
) -> Result<&'a mut Map<String, Value>, GeneratorError> {
    let entry = parent
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    entry
        .as_object_mut()
        .ok_or_else(|| GeneratorError::MalformedInstructions {
            message: format!("expected an object at '{key}'"),
        })
}

fn ensure_block<'a>(
    type_entry: &'a mut Map<String, Value>,
    index: usize,
) -> Result<&'a mut Map<String, Value>, GeneratorError> {
    let blocks = type_entry
        .entry("blocks".to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    let blocks = blocks
        .as_array_mut()
        .ok_or_else(|| GeneratorError::MalformedInstructions {
            message: "expected an array at 'blocks'".to_string(),
        })?;
    while blocks.len() <= index {
        blocks.push(Value::Object(Map::new()));
    }
    blocks[index]
        .as_object_mut()
        .ok_or_else(|| GeneratorError::MalformedInstructions {
            message: format!("expected an object at block index {index}"),
        })
}

fn as_object_mut<'a>(
    value: &'a mut Value,
    what: &str,
) -> Result<&'a mut Map<String, Value>, GeneratorError> {
    value
        .as_object_mut()
        .ok_or_else(|| GeneratorError::MalformedInstructions {
            message: format!("expected {what} to be an object"),
        })
}
