//! Group/version/kind identifiers used as registry keys.

use serde::{Deserialize, Serialize};

/// The API group owned by kubelift configuration types.
pub const GROUP: &str = "kubelift.io";

/// Version marker for the internal (hub) representation.
///
/// Objects carrying this version never appear on disk; they exist only as
/// the conversion pivot between external versions.
pub const API_VERSION_INTERNAL: &str = "__internal";

/// An API group and version pair, e.g. `kubelift.io/v1alpha2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupVersion {
    pub group: String,
    pub version: String,
}

impl GroupVersion {
    pub fn new(group: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
        }
    }

    /// Parses an `apiVersion` string of the form `group/version`.
    ///
    /// A string without a slash is treated as a version in the core
    /// (empty) group.
    pub fn parse(api_version: &str) -> Self {
        match api_version.split_once('/') {
            Some((group, version)) => Self::new(group, version),
            None => Self::new("", api_version),
        }
    }

    /// Attaches a kind to form a full registry key.
    pub fn with_kind(&self, kind: impl Into<String>) -> GroupVersionKind {
        GroupVersionKind {
            group: self.group.clone(),
            version: self.version.clone(),
            kind: kind.into(),
        }
    }

    /// Whether this is the internal hub version.
    pub fn is_internal(&self) -> bool {
        self.version == API_VERSION_INTERNAL
    }
}

impl std::fmt::Display for GroupVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}", self.version)
        } else {
            write!(f, "{}/{}", self.group, self.version)
        }
    }
}

/// A fully qualified type identifier: group, version, and kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GroupVersionKind {
    /// The group/version portion of this identifier.
    pub fn group_version(&self) -> GroupVersion {
        GroupVersion::new(self.group.clone(), self.version.clone())
    }
}

impl std::fmt::Display for GroupVersionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, Kind={}",
            GroupVersion::new(self.group.clone(), self.version.clone()),
            self.kind
        )
    }
}

/// The `kind` / `apiVersion` pair carried by every serialized document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TypeMeta {
    #[serde(default)]
    pub kind: String,

    #[serde(rename = "apiVersion", default)]
    pub api_version: String,
}

impl TypeMeta {
    /// Type meta naming the given group-version-kind.
    pub fn for_gvk(gvk: &GroupVersionKind) -> Self {
        Self {
            kind: gvk.kind.clone(),
            api_version: gvk.group_version().to_string(),
        }
    }

    /// The group-version-kind this meta names, if both fields are present.
    pub fn group_version_kind(&self) -> Option<GroupVersionKind> {
        if self.kind.is_empty() || self.api_version.is_empty() {
            return None;
        }
        Some(GroupVersion::parse(&self.api_version).with_kind(&self.kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_version_display() {
        let gv = GroupVersion::new(GROUP, "v1alpha2");
        assert_eq!(gv.to_string(), "kubelift.io/v1alpha2");

        let core = GroupVersion::new("", "v1");
        assert_eq!(core.to_string(), "v1");
    }

    #[test]
    fn test_group_version_parse_roundtrip() {
        let gv = GroupVersion::parse("kubelift.io/v1alpha1");
        assert_eq!(gv.group, "kubelift.io");
        assert_eq!(gv.version, "v1alpha1");
        assert_eq!(GroupVersion::parse(&gv.to_string()), gv);
    }

    #[test]
    fn test_group_version_parse_core_group() {
        let gv = GroupVersion::parse("v1");
        assert_eq!(gv.group, "");
        assert_eq!(gv.version, "v1");
    }

    #[test]
    fn test_gvk_display() {
        let gvk = GroupVersion::new(GROUP, "v1alpha2").with_kind("ClusterConfiguration");
        assert_eq!(
            gvk.to_string(),
            "kubelift.io/v1alpha2, Kind=ClusterConfiguration"
        );
    }

    #[test]
    fn test_type_meta_missing_fields() {
        let meta = TypeMeta::default();
        assert!(meta.group_version_kind().is_none());

        let meta = TypeMeta {
            kind: "ClusterConfiguration".to_string(),
            api_version: String::new(),
        };
        assert!(meta.group_version_kind().is_none());
    }

    #[test]
    fn test_type_meta_for_gvk() {
        let gvk = GroupVersion::new(GROUP, "v1alpha2").with_kind("ClusterConfiguration");
        let meta = TypeMeta::for_gvk(&gvk);
        assert_eq!(meta.kind, "ClusterConfiguration");
        assert_eq!(meta.api_version, "kubelift.io/v1alpha2");
        assert_eq!(meta.group_version_kind(), Some(gvk));
    }
}
