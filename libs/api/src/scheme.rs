//! The type registry ("scheme") mapping group-version-kinds to codecs.
//!
//! A [`Scheme`] knows, for every registered type, how to encode it to a
//! YAML value, decode it back, populate defaulted fields, and convert it
//! to and from the internal hub representation. Schemes are populated at
//! process start and read-only afterwards; the process-wide default is
//! built lazily and never mutated, so all lookups are lock-free.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::LazyLock;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_yaml::Value;

use crate::error::CodecError;
use crate::gvk::{GroupVersion, GroupVersionKind};
use crate::{types, v1alpha1, v1alpha2};

/// A configuration object that can pass through the codec.
///
/// Implemented automatically for every `'static` clonable type; the
/// scheme's registration tables decide which of those the codec will
/// actually accept.
pub trait ConfigObject: Any + Send + Sync + std::fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn clone_object(&self) -> Box<dyn ConfigObject>;
    fn type_name(&self) -> &'static str;
}

impl<T> ConfigObject for T
where
    T: Any + Send + Sync + std::fmt::Debug + Clone,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn clone_object(&self) -> Box<dyn ConfigObject> {
        Box::new(self.clone())
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Default-field population for external configuration versions.
///
/// Must be idempotent: applying defaults to an already defaulted object
/// is a no-op.
pub trait ConfigDefaults {
    fn populate_defaults(&mut self);
}

type EncodeFn = Box<dyn Fn(&dyn ConfigObject) -> Result<Value, CodecError> + Send + Sync>;
type DecodeFn = Box<dyn Fn(Value) -> Result<Box<dyn ConfigObject>, CodecError> + Send + Sync>;
type DefaultFn = Box<dyn Fn(&mut dyn ConfigObject) -> Result<(), CodecError> + Send + Sync>;
type ConvertFn =
    Box<dyn Fn(&dyn ConfigObject) -> Result<Box<dyn ConfigObject>, CodecError> + Send + Sync>;

struct TypeEntry {
    gvk: GroupVersionKind,
    encode: EncodeFn,
    decode: DecodeFn,
    defaulter: Option<DefaultFn>,
    to_internal: Option<ConvertFn>,
    from_internal: Option<ConvertFn>,
}

/// Registry of configuration types keyed by group-version-kind.
#[derive(Default)]
pub struct Scheme {
    entries: HashMap<GroupVersionKind, TypeEntry>,
    by_type: HashMap<TypeId, GroupVersionKind>,
}

impl Scheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the internal hub type for a kind.
    ///
    /// Hub types have no defaulter and no conversions; they are the pivot
    /// other versions convert through.
    pub fn register_internal<H>(&mut self, gvk: GroupVersionKind)
    where
        H: ConfigObject + Serialize + DeserializeOwned + Clone,
    {
        let entry = TypeEntry {
            gvk: gvk.clone(),
            encode: make_encode::<H>(gvk.clone()),
            decode: make_decode::<H>(gvk.clone()),
            defaulter: None,
            to_internal: None,
            from_internal: None,
        };
        self.insert::<H>(gvk, entry);
    }

    /// Registers an external versioned type for a kind, along with its
    /// conversions to and from the hub type `H`.
    pub fn register_versioned<E, H>(
        &mut self,
        gvk: GroupVersionKind,
        to_internal: fn(&E) -> H,
        from_internal: fn(&H) -> E,
    ) where
        E: ConfigObject + ConfigDefaults + Serialize + DeserializeOwned + Clone,
        H: ConfigObject + Clone,
    {
        let entry = TypeEntry {
            gvk: gvk.clone(),
            encode: make_encode::<E>(gvk.clone()),
            decode: make_decode::<E>(gvk.clone()),
            defaulter: Some(Box::new(|obj: &mut dyn ConfigObject| {
                let concrete = obj
                    .as_any_mut()
                    .downcast_mut::<E>()
                    .ok_or(CodecError::UnexpectedType {
                        expected: std::any::type_name::<E>(),
                    })?;
                concrete.populate_defaults();
                Ok(())
            })),
            to_internal: Some(Box::new(move |obj: &dyn ConfigObject| {
                let concrete = downcast::<E>(obj)?;
                Ok(Box::new(to_internal(concrete)) as Box<dyn ConfigObject>)
            })),
            from_internal: Some(Box::new(move |obj: &dyn ConfigObject| {
                let hub = downcast::<H>(obj)?;
                Ok(Box::new(from_internal(hub)) as Box<dyn ConfigObject>)
            })),
        };
        self.insert::<E>(gvk, entry);
    }

    fn insert<T: 'static>(&mut self, gvk: GroupVersionKind, entry: TypeEntry) {
        self.by_type.insert(TypeId::of::<T>(), gvk.clone());
        self.entries.insert(gvk, entry);
    }

    /// Whether a type is registered for the given group-version-kind.
    pub fn recognizes(&self, gvk: &GroupVersionKind) -> bool {
        self.entries.contains_key(gvk)
    }

    /// The group-version-kind an object is registered under.
    pub fn object_kind(&self, obj: &dyn ConfigObject) -> Result<&GroupVersionKind, CodecError> {
        self.by_type
            .get(&obj.as_any().type_id())
            .ok_or(CodecError::UnregisteredType {
                type_name: obj.type_name(),
            })
    }

    /// Populates defaulted fields on a registered object in place.
    ///
    /// Internal hub types have no registered defaulter; this is a no-op
    /// for them.
    pub fn apply_defaults(&self, obj: &mut dyn ConfigObject) -> Result<(), CodecError> {
        let gvk = self.object_kind(obj)?.clone();
        let entry = self.entry(&gvk)?;
        match &entry.defaulter {
            Some(defaulter) => defaulter(obj),
            None => Ok(()),
        }
    }

    /// Encodes an object to a YAML value in the requested group-version,
    /// converting through the hub when the object's own version differs.
    ///
    /// The resulting value carries the target `kind` and `apiVersion`.
    pub fn encode_to_version(
        &self,
        obj: &dyn ConfigObject,
        gv: &GroupVersion,
    ) -> Result<Value, CodecError> {
        let source_gvk = self.object_kind(obj)?.clone();
        let target_gvk = gv.with_kind(&source_gvk.kind);

        let target = self.entry(&target_gvk)?;
        let mut value = if source_gvk == target_gvk {
            (target.encode)(obj)?
        } else {
            let converted = self.convert(obj, &source_gvk, &target_gvk)?;
            (target.encode)(converted.as_ref())?
        };

        stamp_type_meta(&mut value, &target_gvk);
        Ok(value)
    }

    /// Decodes a YAML value into its registered type, applies defaults,
    /// and converts the result to the requested group-version.
    pub fn decode_to_version(
        &self,
        value: Value,
        gvk: &GroupVersionKind,
        gv: &GroupVersion,
    ) -> Result<Box<dyn ConfigObject>, CodecError> {
        let entry = self.entry(gvk)?;
        let mut obj = (entry.decode)(value)?;
        if let Some(defaulter) = &entry.defaulter {
            defaulter(obj.as_mut())?;
        }

        if gvk.group_version() == *gv {
            return Ok(obj);
        }
        self.convert(obj.as_ref(), gvk, &gv.with_kind(&gvk.kind))
    }

    /// Converts an object between two registered versions of the same
    /// kind, pivoting through the hub representation.
    fn convert(
        &self,
        obj: &dyn ConfigObject,
        from: &GroupVersionKind,
        to: &GroupVersionKind,
    ) -> Result<Box<dyn ConfigObject>, CodecError> {
        let source = self.entry(from)?;
        let target = self.entry(to)?;

        let no_conversion = || CodecError::NoConversion {
            from: from.clone(),
            to: to.clone(),
        };

        // Normalize to the hub shape first.
        let hub: Box<dyn ConfigObject> = if from.group_version().is_internal() {
            obj.clone_object()
        } else {
            let to_internal = source.to_internal.as_ref().ok_or_else(no_conversion)?;
            to_internal(obj)?
        };

        if to.group_version().is_internal() {
            return Ok(hub);
        }
        let from_internal = target.from_internal.as_ref().ok_or_else(no_conversion)?;
        from_internal(hub.as_ref())
    }

    fn entry(&self, gvk: &GroupVersionKind) -> Result<&TypeEntry, CodecError> {
        self.entries
            .get(gvk)
            .ok_or_else(|| CodecError::UnknownType(gvk.clone()))
    }
}

/// The process-wide scheme with all kubelift configuration versions
/// registered. Built once, read-only afterwards.
pub fn default_scheme() -> &'static Scheme {
    static SCHEME: LazyLock<Scheme> = LazyLock::new(|| {
        let mut scheme = Scheme::new();
        types::register(&mut scheme);
        v1alpha1::register(&mut scheme);
        v1alpha2::register(&mut scheme);
        scheme
    });
    &SCHEME
}

fn downcast<T: ConfigObject>(obj: &dyn ConfigObject) -> Result<&T, CodecError> {
    obj.as_any()
        .downcast_ref::<T>()
        .ok_or(CodecError::UnexpectedType {
            expected: std::any::type_name::<T>(),
        })
}

fn make_encode<T>(gvk: GroupVersionKind) -> EncodeFn
where
    T: ConfigObject + Serialize,
{
    Box::new(move |obj: &dyn ConfigObject| {
        let concrete = downcast::<T>(obj)?;
        serde_yaml::to_value(concrete).map_err(|source| CodecError::Encode {
            gvk: gvk.clone(),
            source,
        })
    })
}

fn make_decode<T>(gvk: GroupVersionKind) -> DecodeFn
where
    T: ConfigObject + DeserializeOwned,
{
    Box::new(move |value: Value| {
        let concrete: T = serde_yaml::from_value(value).map_err(|source| CodecError::Decode {
            gvk: gvk.clone(),
            source,
        })?;
        Ok(Box::new(concrete) as Box<dyn ConfigObject>)
    })
}

/// Overwrites `kind` and `apiVersion` on a mapping value so the emitted
/// document always names the version it was encoded as.
fn stamp_type_meta(value: &mut Value, gvk: &GroupVersionKind) {
    if let Value::Mapping(mapping) = value {
        mapping.insert(
            Value::from("kind"),
            Value::from(gvk.kind.clone()),
        );
        mapping.insert(
            Value::from("apiVersion"),
            Value::from(gvk.group_version().to_string()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gvk::GROUP;

    #[test]
    fn test_default_scheme_recognizes_all_versions() {
        let scheme = default_scheme();
        for version in ["v1alpha1", "v1alpha2"] {
            let gvk = GroupVersion::new(GROUP, version).with_kind(types::KIND);
            assert!(scheme.recognizes(&gvk), "missing {gvk}");
        }
        let internal = types::group_version().with_kind(types::KIND);
        assert!(scheme.recognizes(&internal));
    }

    #[test]
    fn test_object_kind_unregistered() {
        let scheme = Scheme::new();
        let cfg = types::ClusterConfiguration::default();
        let err = scheme.object_kind(&cfg).unwrap_err();
        assert!(matches!(err, CodecError::UnregisteredType { .. }));
    }

    #[test]
    fn test_apply_defaults_is_idempotent() {
        let scheme = default_scheme();
        let mut cfg = v1alpha2::ClusterConfiguration::default();
        scheme.apply_defaults(&mut cfg).unwrap();
        let once = cfg.clone();
        scheme.apply_defaults(&mut cfg).unwrap();
        assert_eq!(cfg, once);
    }
}
