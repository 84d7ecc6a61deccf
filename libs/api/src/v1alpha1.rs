//! The `v1alpha1` external configuration version (legacy).
//!
//! Kept for reading configurations written by earlier releases. The main
//! difference from `v1alpha2` is the flat etcd section: a non-empty
//! `endpoints` list means operator-managed (external) etcd, otherwise the
//! `image`/`version`/`dataDir` fields describe locally managed etcd.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::gvk::{GroupVersion, TypeMeta, GROUP};
use crate::scheme::{ConfigDefaults, Scheme};
use crate::types;

pub const KIND: &str = "ClusterConfiguration";

/// The `kubelift.io/v1alpha1` group-version.
pub fn group_version() -> GroupVersion {
    GroupVersion::new(GROUP, "v1alpha1")
}

/// Registers the v1alpha1 types with a scheme.
pub fn register(scheme: &mut Scheme) {
    scheme.register_versioned::<ClusterConfiguration, types::ClusterConfiguration>(
        group_version().with_kind(KIND),
        to_internal,
        from_internal,
    );
}

/// Cluster master configuration, v1alpha1 wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterConfiguration {
    #[serde(flatten)]
    pub type_meta: TypeMeta,

    pub api: Api,

    pub node_name: String,

    pub cri_socket: String,

    pub networking: Networking,

    pub kubernetes_version: String,

    pub image_repository: String,

    pub unified_control_plane_image: String,

    pub etcd: Etcd,
}

/// API server endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Api {
    pub advertise_address: String,
    pub bind_port: u16,
}

/// Cluster networking topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Networking {
    pub service_subnet: String,
    pub pod_subnet: String,
    pub dns_domain: String,
}

/// Flat etcd section. External when `endpoints` is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Etcd {
    pub endpoints: Vec<String>,
    pub ca_file: String,
    pub cert_file: String,
    pub key_file: String,
    pub image: String,
    pub version: String,
    pub data_dir: String,
}

impl ConfigDefaults for ClusterConfiguration {
    fn populate_defaults(&mut self) {
        if self.api.bind_port == 0 {
            self.api.bind_port = constants::DEFAULT_BIND_PORT;
        }
        if self.networking.service_subnet.is_empty() {
            self.networking.service_subnet = constants::DEFAULT_SERVICE_SUBNET.to_string();
        }
        if self.networking.dns_domain.is_empty() {
            self.networking.dns_domain = constants::DEFAULT_DNS_DOMAIN.to_string();
        }
        if self.image_repository.is_empty() {
            self.image_repository = constants::DEFAULT_IMAGE_REPOSITORY.to_string();
        }
        if self.etcd.endpoints.is_empty() && self.etcd.data_dir.is_empty() {
            self.etcd.data_dir = constants::DEFAULT_ETCD_DATA_DIR.to_string();
        }
    }
}

/// Converts the v1alpha1 wire shape to the internal hub shape.
pub fn to_internal(external: &ClusterConfiguration) -> types::ClusterConfiguration {
    let etcd = if external.etcd.endpoints.is_empty() {
        types::Etcd::Local(types::LocalEtcd {
            image: external.etcd.image.clone(),
            version: external.etcd.version.clone(),
            data_dir: external.etcd.data_dir.clone(),
        })
    } else {
        types::Etcd::External(types::ExternalEtcd {
            endpoints: external.etcd.endpoints.clone(),
            ca_file: external.etcd.ca_file.clone(),
            cert_file: external.etcd.cert_file.clone(),
            key_file: external.etcd.key_file.clone(),
        })
    };

    types::ClusterConfiguration {
        type_meta: TypeMeta::default(),
        api: types::ApiEndpoint {
            advertise_address: external.api.advertise_address.clone(),
            bind_port: external.api.bind_port,
        },
        node_registration: types::NodeRegistrationOptions {
            name: external.node_name.clone(),
            cri_socket: external.cri_socket.clone(),
        },
        networking: types::Networking {
            service_subnet: external.networking.service_subnet.clone(),
            pod_subnet: external.networking.pod_subnet.clone(),
            dns_domain: external.networking.dns_domain.clone(),
        },
        kubernetes_version: external.kubernetes_version.clone(),
        image_repository: external.image_repository.clone(),
        ci_image_repository: String::new(),
        unified_control_plane_image: external.unified_control_plane_image.clone(),
        etcd,
    }
}

/// Converts the internal hub shape to the v1alpha1 wire shape.
pub fn from_internal(internal: &types::ClusterConfiguration) -> ClusterConfiguration {
    let etcd = match &internal.etcd {
        types::Etcd::Local(local) => Etcd {
            image: local.image.clone(),
            version: local.version.clone(),
            data_dir: local.data_dir.clone(),
            ..Default::default()
        },
        types::Etcd::External(ext) => Etcd {
            endpoints: ext.endpoints.clone(),
            ca_file: ext.ca_file.clone(),
            cert_file: ext.cert_file.clone(),
            key_file: ext.key_file.clone(),
            ..Default::default()
        },
    };

    ClusterConfiguration {
        type_meta: TypeMeta::for_gvk(&group_version().with_kind(KIND)),
        api: Api {
            advertise_address: internal.api.advertise_address.clone(),
            bind_port: internal.api.bind_port,
        },
        node_name: internal.node_registration.name.clone(),
        cri_socket: internal.node_registration.cri_socket.clone(),
        networking: Networking {
            service_subnet: internal.networking.service_subnet.clone(),
            pod_subnet: internal.networking.pod_subnet.clone(),
            dns_domain: internal.networking.dns_domain.clone(),
        },
        kubernetes_version: internal.kubernetes_version.clone(),
        image_repository: internal.image_repository.clone(),
        unified_control_plane_image: internal.unified_control_plane_image.clone(),
        etcd,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_select_external_etcd() {
        let external = ClusterConfiguration {
            etcd: Etcd {
                endpoints: vec!["https://etcd.example.test:2379".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };

        let internal = to_internal(&external);
        assert!(internal.etcd.is_external());
    }

    #[test]
    fn test_empty_endpoints_select_local_etcd() {
        let external = ClusterConfiguration {
            etcd: Etcd {
                image: "example.test/etcd:tag".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        let internal = to_internal(&external);
        match &internal.etcd {
            types::Etcd::Local(local) => assert_eq!(local.image, "example.test/etcd:tag"),
            types::Etcd::External(_) => panic!("expected local etcd"),
        }
    }

    #[test]
    fn test_node_fields_map_to_registration() {
        let external = ClusterConfiguration {
            node_name: "node-0".to_string(),
            cri_socket: "/var/run/cri.sock".to_string(),
            ..Default::default()
        };

        let internal = to_internal(&external);
        assert_eq!(internal.node_registration.name, "node-0");
        assert_eq!(internal.node_registration.cri_socket, "/var/run/cri.sock");

        let back = from_internal(&internal);
        assert_eq!(back.node_name, "node-0");
        assert_eq!(back.cri_socket, "/var/run/cri.sock");
    }
}
