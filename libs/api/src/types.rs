//! Internal (hub) configuration types.
//!
//! These are the version-independent shapes the rest of the tool works
//! against. External versions convert to and from these via the scheme;
//! the hub itself is never written to disk.

use serde::{Deserialize, Serialize};

use crate::gvk::{GroupVersion, TypeMeta, API_VERSION_INTERNAL, GROUP};
use crate::scheme::Scheme;
use crate::v1alpha2;

/// Kind of the cluster master configuration document.
pub const KIND: &str = "ClusterConfiguration";

/// The internal hub group-version.
pub fn group_version() -> GroupVersion {
    GroupVersion::new(GROUP, API_VERSION_INTERNAL)
}

/// Registers the hub types with a scheme.
pub fn register(scheme: &mut Scheme) {
    scheme.register_internal::<ClusterConfiguration>(group_version().with_kind(KIND));
}

/// Cluster master configuration, internal representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterConfiguration {
    #[serde(flatten)]
    pub type_meta: TypeMeta,

    /// API server endpoint settings.
    pub api: ApiEndpoint,

    /// How this node registers itself with the cluster.
    pub node_registration: NodeRegistrationOptions,

    /// Cluster networking topology.
    pub networking: Networking,

    /// Target Kubernetes version, e.g. `v1.11.0`.
    pub kubernetes_version: String,

    /// Repository prefix for control-plane images.
    pub image_repository: String,

    /// CI repository override. Internal only; never serialized into
    /// external versions.
    #[serde(skip)]
    pub ci_image_repository: String,

    /// Single image replacing resolution for all control-plane components
    /// when non-empty.
    pub unified_control_plane_image: String,

    /// Etcd topology: managed locally or operated externally.
    pub etcd: Etcd,
}

/// API server endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiEndpoint {
    /// Address the API server advertises to cluster members.
    pub advertise_address: String,

    /// Port the API server binds to.
    pub bind_port: u16,
}

/// Node registration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeRegistrationOptions {
    /// Node name registered with the API server.
    pub name: String,

    /// Path to the container runtime interface socket.
    pub cri_socket: String,
}

/// Cluster networking topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Networking {
    /// Subnet for cluster services.
    pub service_subnet: String,

    /// Subnet for pods.
    pub pod_subnet: String,

    /// Cluster DNS domain.
    pub dns_domain: String,
}

/// Etcd topology.
///
/// Local etcd is deployed and imaged by this tool; external etcd is
/// operator-managed and excluded from image resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Etcd {
    Local(LocalEtcd),
    External(ExternalEtcd),
}

impl Etcd {
    /// Whether etcd is operated outside the cluster.
    pub fn is_external(&self) -> bool {
        matches!(self, Etcd::External(_))
    }

    /// The local etcd settings, when etcd is locally managed.
    pub fn local(&self) -> Option<&LocalEtcd> {
        match self {
            Etcd::Local(local) => Some(local),
            Etcd::External(_) => None,
        }
    }
}

impl Default for Etcd {
    fn default() -> Self {
        Etcd::Local(LocalEtcd::default())
    }
}

/// Locally managed etcd.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalEtcd {
    /// Full image reference override. Takes precedence over resolution.
    pub image: String,

    /// Etcd version to deploy. Falls back to the constants table when empty.
    pub version: String,

    /// Data directory on the host.
    pub data_dir: String,
}

/// Operator-managed etcd reached over the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ExternalEtcd {
    /// Client endpoints of the external cluster.
    pub endpoints: Vec<String>,

    /// CA certificate used to secure etcd communication.
    pub ca_file: String,

    /// Client certificate used to secure etcd communication.
    pub cert_file: String,

    /// Client key used to secure etcd communication.
    pub key_file: String,
}

/// A fully defaulted internal configuration, as produced by decoding an
/// empty `v1alpha2` document.
pub fn defaulted_configuration() -> ClusterConfiguration {
    use crate::scheme::ConfigDefaults;

    let mut external = v1alpha2::ClusterConfiguration::default();
    external.populate_defaults();
    v1alpha2::to_internal(&external)
}
