//! Configuration types and versioned YAML codec for kubelift.
//!
//! The crate has two halves:
//!
//! - **Types**: the internal hub [`types::ClusterConfiguration`] and its
//!   external wire representations ([`v1alpha1`], [`v1alpha2`]).
//! - **Codec**: a [`scheme::Scheme`] registry mapping group-version-kinds
//!   to encode/decode/convert functions, and the [`codec`] entry points
//!   that marshal objects through it.
//!
//! All operations are pure, synchronous transformations. The default
//! scheme is populated once at first use and read-only afterwards, so
//! everything here is safe to call from multiple threads.

pub mod codec;
pub mod constants;
pub mod error;
pub mod gvk;
pub mod scheme;
pub mod types;
pub mod v1alpha1;
pub mod v1alpha2;

pub use codec::{
    marshal_to_yaml, marshal_to_yaml_with, unmarshal_from_yaml, unmarshal_from_yaml_with,
};
pub use error::CodecError;
pub use gvk::{GroupVersion, GroupVersionKind, TypeMeta};
pub use scheme::{default_scheme, ConfigDefaults, ConfigObject, Scheme};
