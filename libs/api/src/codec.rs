//! Marshalling of configuration objects to and from YAML.
//!
//! Thin entry points over the scheme registry: the default-scheme pair is
//! what production call sites use, and the `_with` pair takes an explicit
//! [`Scheme`] so tests can run against isolated registries.

use serde_yaml::Value;

use crate::error::CodecError;
use crate::gvk::{GroupVersion, TypeMeta};
use crate::scheme::{default_scheme, ConfigObject, Scheme};

/// Serializes a registered object to YAML in the requested group-version,
/// using the process-wide default scheme.
pub fn marshal_to_yaml(
    obj: &dyn ConfigObject,
    gv: &GroupVersion,
) -> Result<Vec<u8>, CodecError> {
    marshal_to_yaml_with(obj, gv, default_scheme())
}

/// Serializes a registered object to YAML against an explicit scheme.
pub fn marshal_to_yaml_with(
    obj: &dyn ConfigObject,
    gv: &GroupVersion,
    scheme: &Scheme,
) -> Result<Vec<u8>, CodecError> {
    let gvk = gv.with_kind(&scheme.object_kind(obj)?.kind);
    let value = scheme.encode_to_version(obj, gv)?;
    let text = serde_yaml::to_string(&value)
        .map_err(|source| CodecError::Encode { gvk, source })?;
    Ok(text.into_bytes())
}

/// Deserializes a YAML document, converting the decoded object to the
/// requested group-version, using the process-wide default scheme.
///
/// The returned object is the external representation registered for
/// `gv`; callers downcast it to the concrete type they expect.
pub fn unmarshal_from_yaml(
    bytes: &[u8],
    gv: &GroupVersion,
) -> Result<Box<dyn ConfigObject>, CodecError> {
    unmarshal_from_yaml_with(bytes, gv, default_scheme())
}

/// Deserializes a YAML document against an explicit scheme.
pub fn unmarshal_from_yaml_with(
    bytes: &[u8],
    gv: &GroupVersion,
    scheme: &Scheme,
) -> Result<Box<dyn ConfigObject>, CodecError> {
    let value: Value = serde_yaml::from_slice(bytes).map_err(CodecError::Syntax)?;
    let meta: TypeMeta =
        serde_yaml::from_value(value.clone()).map_err(CodecError::Syntax)?;
    let gvk = meta
        .group_version_kind()
        .ok_or(CodecError::MissingTypeMeta)?;

    scheme.decode_to_version(value, &gvk, gv)
}
