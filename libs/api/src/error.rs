//! Error types for the configuration codec.

use thiserror::Error;

use crate::gvk::GroupVersionKind;

/// Errors that can occur when encoding or decoding configuration objects.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The input is not a well-formed YAML document.
    #[error("malformed YAML document: {0}")]
    Syntax(#[source] serde_yaml::Error),

    /// The document does not name its kind and API version.
    #[error("document is missing 'kind' and/or 'apiVersion'")]
    MissingTypeMeta,

    /// No type is registered for the named group-version-kind.
    #[error("no type registered for {0}")]
    UnknownType(GroupVersionKind),

    /// The object's concrete type was never registered in the scheme.
    #[error("type {type_name} is not registered in the scheme")]
    UnregisteredType { type_name: &'static str },

    /// No conversion path exists between the two group-version-kinds.
    #[error("no conversion from {from} to {to}")]
    NoConversion {
        from: GroupVersionKind,
        to: GroupVersionKind,
    },

    /// Serialization of a registered type failed.
    #[error("failed to encode {gvk}: {source}")]
    Encode {
        gvk: GroupVersionKind,
        #[source]
        source: serde_yaml::Error,
    },

    /// Deserialization into a registered type failed.
    #[error("failed to decode {gvk}: {source}")]
    Decode {
        gvk: GroupVersionKind,
        #[source]
        source: serde_yaml::Error,
    },

    /// A scheme entry was handed an object of the wrong concrete type.
    #[error("object is not a {expected}")]
    UnexpectedType { expected: &'static str },
}
