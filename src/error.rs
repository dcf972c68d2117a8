//! Error types for block language generation

use thiserror::Error;

/// Fatal errors raised while turning a grammar and a generator document into
/// a block language. These indicate malformed configuration and abort the
/// generation; recoverable problems are reported as [`ValidationIssue`]s
/// instead.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// A parameter name was declared twice
    #[error("duplicate parameter declaration: {name}")]
    DuplicateParameter { name: String },

    /// A `$ref` pointed at a parameter that was never declared
    #[error("reference to unknown parameter: {name}")]
    ReferenceToUnknownParameter { name: String },

    /// A scope listed a trait that was never registered
    #[error("unknown trait '{name}' referenced by a scope")]
    UnknownTrait { name: String },

    /// Trait deep-merge ran into an array value
    #[error("deep merge does not support arrays (at key '{key}')")]
    ArrayMergeUnsupported { key: String },

    /// An explicit attribute mapping named an attribute the type lacks
    #[error("type '{type_name}' has no attribute '{attribute}' named by its mapping")]
    UnknownMappedAttribute {
        type_name: String,
        attribute: String,
    },

    /// A block index was requested that the type never declared
    #[error("type '{type_name}' declares {declared} block(s), index {index} requested")]
    UndeclaredBlockIndex {
        type_name: String,
        index: usize,
        declared: usize,
    },

    /// The resolved instructions document did not match the expected shape.
    /// This also covers unknown attribute kinds and unknown enum values,
    /// which the closed tagged unions reject during deserialization.
    #[error("malformed instructions document: {message}")]
    MalformedInstructions { message: String },
}

impl GeneratorError {
    /// Create an unknown mapped attribute error
    pub fn unknown_attribute(type_name: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::UnknownMappedAttribute {
            type_name: type_name.into(),
            attribute: attribute.into(),
        }
    }

    /// Create an undeclared block index error
    pub fn undeclared_block(type_name: impl Into<String>, index: usize, declared: usize) -> Self {
        Self::UndeclaredBlockIndex {
            type_name: type_name.into(),
            index,
            declared,
        }
    }

    /// Wrap a serde error from the typed deserialization step
    pub fn malformed(err: serde_json::Error) -> Self {
        Self::MalformedInstructions {
            message: err.to_string(),
        }
    }
}

/// Recoverable configuration problems, returned as data rather than raised.
///
/// Validation never aborts: a caller collects every issue at once and can
/// surface them before attempting a generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    /// A declared parameter has neither an explicit value nor a default
    #[error("parameter '{name}' has no value and no default")]
    MissingValue { name: String },

    /// A value was supplied for a parameter that was never declared
    #[error("value supplied for undeclared parameter '{name}'")]
    UnknownParameter { name: String },

    /// Opaque wrapper for schema validation performed by external tooling
    #[error("schema validation failed: {detail}")]
    Schema { detail: String },
}
