//! Parameter registry: named typed placeholders substituted into the
//! instructions document
//!
//! Parameters decouple an instructions document from concrete values: the
//! document references a parameter with `{"$ref": "name"}` and the registry
//! substitutes the bound value at resolution time. The substitution is a
//! generic walk over the JSON value tree, so instruction schema changes never
//! touch this module.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{GeneratorError, ValidationIssue};

/// The key that marks a reference object
const REF_KEY: &str = "$ref";

/// Value type a parameter may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterType {
    String,
    Boolean,
    Color,
}

/// Declaration of a single parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDeclaration {
    #[serde(rename = "type")]
    pub parameter_type: ParameterType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

/// Declared parameters and the values currently bound to them.
///
/// A registry is a per-request builder: construct one, feed it declarations
/// and values, validate, then resolve. It holds no document state, so
/// concurrent generations each use their own.
#[derive(Debug, Default)]
pub struct ParameterRegistry {
    declarations: BTreeMap<String, ParameterDeclaration>,
    values: BTreeMap<String, Value>,
}

impl ParameterRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register parameter declarations. Re-declaring an existing name fails.
    pub fn add_parameters(
        &mut self,
        declarations: &BTreeMap<String, ParameterDeclaration>,
    ) -> Result<(), GeneratorError> {
        for (name, declaration) in declarations {
            if self.declarations.contains_key(name) {
                return Err(GeneratorError::DuplicateParameter { name: name.clone() });
            }
            self.declarations.insert(name.clone(), declaration.clone());
        }
        Ok(())
    }

    /// Bind values to parameters. Later bindings overwrite earlier ones.
    pub fn add_values(&mut self, values: &BTreeMap<String, Value>) {
        for (name, value) in values {
            self.values.insert(name.clone(), value.clone());
        }
    }

    /// Check declarations against bindings without failing.
    ///
    /// Yields one [`ValidationIssue::MissingValue`] per declared parameter
    /// that has neither an explicit value nor a default, and one
    /// [`ValidationIssue::UnknownParameter`] per supplied value without a
    /// matching declaration. Both classes can occur together.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        for (name, declaration) in &self.declarations {
            if !self.values.contains_key(name) && declaration.default_value.is_none() {
                issues.push(ValidationIssue::MissingValue { name: name.clone() });
            }
        }
        for name in self.values.keys() {
            if !self.declarations.contains_key(name) {
                issues.push(ValidationIssue::UnknownParameter { name: name.clone() });
            }
        }
        issues
    }

    /// The value a reference to `name` resolves to: the explicit binding,
    /// else the declared default, else nothing.
    pub fn value_of(&self, name: &str) -> Option<&Value> {
        self.values.get(name).or_else(|| {
            self.declarations
                .get(name)?
                .default_value
                .as_ref()
        })
    }

    /// True if `name` was declared
    pub fn is_declared(&self, name: &str) -> bool {
        self.declarations.contains_key(name)
    }

    /// Substitute every `{"$ref": name}` node in `document` with the bound
    /// value of `name`.
    ///
    /// The result is a freshly built tree sharing nothing with the input;
    /// a reference-free document comes back value-identical. A reference to
    /// an undeclared parameter is fatal.
    pub fn resolve(&self, document: &Value) -> Result<Value, GeneratorError> {
        match document {
            Value::Object(map) => {
                if let Some(name) = reference_name(map) {
                    if !self.is_declared(name) {
                        return Err(GeneratorError::ReferenceToUnknownParameter {
                            name: name.to_string(),
                        });
                    }
                    // Declared but unbound surfaces as null; validate()
                    // reports it as a missing value beforehand.
                    return Ok(self.value_of(name).cloned().unwrap_or(Value::Null));
                }
                let mut resolved = Map::new();
                for (key, value) in map {
                    resolved.insert(key.clone(), self.resolve(value)?);
                }
                Ok(Value::Object(resolved))
            }
            Value::Array(items) => {
                let resolved = items
                    .iter()
                    .map(|item| self.resolve(item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Array(resolved))
            }
            other => Ok(other.clone()),
        }
    }
}

/// If `map` is a reference object (exactly one `$ref` key holding a string),
/// return the referenced parameter name.
fn reference_name(map: &Map<String, Value>) -> Option<&str> {
    if map.len() == 1 {
        map.get(REF_KEY).and_then(Value::as_str)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn declarations(entries: &[(&str, Option<Value>)]) -> BTreeMap<String, ParameterDeclaration> {
        entries
            .iter()
            .map(|(name, default)| {
                (
                    name.to_string(),
                    ParameterDeclaration {
                        parameter_type: ParameterType::String,
                        default_value: default.clone(),
                    },
                )
            })
            .collect()
    }

    fn values(entries: &[(&str, Value)]) -> BTreeMap<String, Value> {
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_duplicate_declaration_fails() {
        let mut registry = ParameterRegistry::new();
        let decls = declarations(&[("fg", None)]);
        registry.add_parameters(&decls).expect("first add succeeds");
        let result = registry.add_parameters(&decls);
        assert!(matches!(
            result,
            Err(GeneratorError::DuplicateParameter { .. })
        ));
    }

    #[test]
    fn test_validate_missing_and_unknown_together() {
        let mut registry = ParameterRegistry::new();
        registry
            .add_parameters(&declarations(&[("declared", None)]))
            .expect("should add");
        registry.add_values(&values(&[("stray", json!("x"))]));

        let issues = registry.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues.contains(&ValidationIssue::MissingValue {
            name: "declared".to_string()
        }));
        assert!(issues.contains(&ValidationIssue::UnknownParameter {
            name: "stray".to_string()
        }));
    }

    #[test]
    fn test_default_satisfies_validation() {
        let mut registry = ParameterRegistry::new();
        registry
            .add_parameters(&declarations(&[("fg", Some(json!("#000")))]))
            .expect("should add");
        assert!(registry.validate().is_empty());
    }

    #[test]
    fn test_value_of_prefers_explicit_over_default() {
        let mut registry = ParameterRegistry::new();
        registry
            .add_parameters(&declarations(&[("fg", Some(json!("#000")))]))
            .expect("should add");
        assert_eq!(registry.value_of("fg"), Some(&json!("#000")));

        registry.add_values(&values(&[("fg", json!("#fff"))]));
        assert_eq!(registry.value_of("fg"), Some(&json!("#fff")));
    }

    #[test]
    fn test_later_value_wins() {
        let mut registry = ParameterRegistry::new();
        registry
            .add_parameters(&declarations(&[("fg", None)]))
            .expect("should add");
        registry.add_values(&values(&[("fg", json!("first"))]));
        registry.add_values(&values(&[("fg", json!("second"))]));
        assert_eq!(registry.value_of("fg"), Some(&json!("second")));
    }

    #[test]
    fn test_resolve_substitutes_ref_verbatim() {
        let mut registry = ParameterRegistry::new();
        registry
            .add_parameters(&declarations(&[("fg", None)]))
            .expect("should add");
        registry.add_values(&values(&[("fg", json!("#123456"))]));

        let document = json!({
            "style": { "color": { "$ref": "fg" } },
            "list": [{ "$ref": "fg" }]
        });
        let resolved = registry.resolve(&document).expect("should resolve");
        assert_eq!(
            resolved,
            json!({ "style": { "color": "#123456" }, "list": ["#123456"] })
        );
    }

    #[test]
    fn test_resolve_reference_free_is_value_noop() {
        let registry = ParameterRegistry::new();
        let document = json!({ "between": ",", "nested": { "n": 1 } });
        let resolved = registry.resolve(&document).expect("should resolve");
        assert_eq!(resolved, document);
    }

    #[test]
    fn test_resolve_unknown_reference_fails() {
        let registry = ParameterRegistry::new();
        let document = json!({ "color": { "$ref": "ghost" } });
        let result = registry.resolve(&document);
        assert!(matches!(
            result,
            Err(GeneratorError::ReferenceToUnknownParameter { .. })
        ));
    }

    #[test]
    fn test_object_with_extra_keys_is_not_a_reference() {
        let registry = ParameterRegistry::new();
        let document = json!({ "inner": { "$ref": "ghost", "other": 1 } });
        // Two keys: treated as a plain object, not a reference
        let resolved = registry.resolve(&document).expect("should resolve");
        assert_eq!(resolved, document);
    }
}
