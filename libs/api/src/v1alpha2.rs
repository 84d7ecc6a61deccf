//! The `v1alpha2` external configuration version (current).

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::gvk::{GroupVersion, TypeMeta, GROUP};
use crate::scheme::{ConfigDefaults, Scheme};
use crate::types;

/// Kind of the cluster master configuration document.
pub const KIND: &str = "ClusterConfiguration";

/// The `kubelift.io/v1alpha2` group-version.
pub fn group_version() -> GroupVersion {
    GroupVersion::new(GROUP, "v1alpha2")
}

/// Registers the v1alpha2 types with a scheme.
pub fn register(scheme: &mut Scheme) {
    scheme.register_versioned::<ClusterConfiguration, types::ClusterConfiguration>(
        group_version().with_kind(KIND),
        to_internal,
        from_internal,
    );
}

/// Cluster master configuration, v1alpha2 wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterConfiguration {
    #[serde(flatten)]
    pub type_meta: TypeMeta,

    pub api: Api,

    pub node_registration: NodeRegistrationOptions,

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

/// Node registration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeRegistrationOptions {
    pub name: String,
    pub cri_socket: String,
}

/// Cluster networking topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Networking {
    pub service_subnet: String,
    pub pod_subnet: String,
    pub dns_domain: String,
}

/// Etcd topology. At most one of `local` and `external` is set; when
/// both are absent, defaulting fills in a local section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Etcd {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local: Option<LocalEtcd>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub external: Option<ExternalEtcd>,
}

/// Locally managed etcd.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalEtcd {
    pub image: String,
    pub version: String,
    pub data_dir: String,
}

/// Operator-managed etcd reached over the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ExternalEtcd {
    pub endpoints: Vec<String>,
    pub ca_file: String,
    pub cert_file: String,
    pub key_file: String,
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
        if self.etcd.external.is_none() {
            let local = self.etcd.local.get_or_insert_with(LocalEtcd::default);
            if local.data_dir.is_empty() {
                local.data_dir = constants::DEFAULT_ETCD_DATA_DIR.to_string();
            }
        }
    }
}

/// Converts the v1alpha2 wire shape to the internal hub shape.
pub fn to_internal(external: &ClusterConfiguration) -> types::ClusterConfiguration {
    let etcd = match (&external.etcd.external, &external.etcd.local) {
        (Some(ext), _) => types::Etcd::External(types::ExternalEtcd {
            endpoints: ext.endpoints.clone(),
            ca_file: ext.ca_file.clone(),
            cert_file: ext.cert_file.clone(),
            key_file: ext.key_file.clone(),
        }),
        (None, local) => {
            let local = local.clone().unwrap_or_default();
            types::Etcd::Local(types::LocalEtcd {
                image: local.image,
                version: local.version,
                data_dir: local.data_dir,
            })
        }
    };

    types::ClusterConfiguration {
        type_meta: TypeMeta::default(),
        api: types::ApiEndpoint {
            advertise_address: external.api.advertise_address.clone(),
            bind_port: external.api.bind_port,
        },
        node_registration: types::NodeRegistrationOptions {
            name: external.node_registration.name.clone(),
            cri_socket: external.node_registration.cri_socket.clone(),
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

/// Converts the internal hub shape to the v1alpha2 wire shape.
pub fn from_internal(internal: &types::ClusterConfiguration) -> ClusterConfiguration {
    let etcd = match &internal.etcd {
        types::Etcd::Local(local) => Etcd {
            local: Some(LocalEtcd {
                image: local.image.clone(),
                version: local.version.clone(),
                data_dir: local.data_dir.clone(),
            }),
            external: None,
        },
        types::Etcd::External(ext) => Etcd {
            local: None,
            external: Some(ExternalEtcd {
                endpoints: ext.endpoints.clone(),
                ca_file: ext.ca_file.clone(),
                cert_file: ext.cert_file.clone(),
                key_file: ext.key_file.clone(),
            }),
        },
    };

    ClusterConfiguration {
        type_meta: TypeMeta::for_gvk(&group_version().with_kind(KIND)),
        api: Api {
            advertise_address: internal.api.advertise_address.clone(),
            bind_port: internal.api.bind_port,
        },
        node_registration: NodeRegistrationOptions {
            name: internal.node_registration.name.clone(),
            cri_socket: internal.node_registration.cri_socket.clone(),
        },
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
    fn test_defaults_fill_empty_fields() {
        let mut cfg = ClusterConfiguration::default();
        cfg.populate_defaults();

        assert_eq!(cfg.api.bind_port, constants::DEFAULT_BIND_PORT);
        assert_eq!(cfg.image_repository, constants::DEFAULT_IMAGE_REPOSITORY);
        assert_eq!(cfg.networking.dns_domain, constants::DEFAULT_DNS_DOMAIN);
        let local = cfg.etcd.local.expect("defaulting should add local etcd");
        assert_eq!(local.data_dir, constants::DEFAULT_ETCD_DATA_DIR);
    }

    #[test]
    fn test_defaults_preserve_set_fields() {
        let mut cfg = ClusterConfiguration {
            api: Api {
                advertise_address: "10.100.0.1".to_string(),
                bind_port: 4332,
            },
            image_repository: "example.test/registry".to_string(),
            ..Default::default()
        };
        cfg.populate_defaults();

        assert_eq!(cfg.api.bind_port, 4332);
        assert_eq!(cfg.image_repository, "example.test/registry");
    }

    #[test]
    fn test_defaults_skip_local_etcd_when_external() {
        let mut cfg = ClusterConfiguration::default();
        cfg.etcd.external = Some(ExternalEtcd {
            endpoints: vec!["https://etcd.example.test:2379".to_string()],
            ..Default::default()
        });
        cfg.populate_defaults();
        assert!(cfg.etcd.local.is_none());
    }

    #[test]
    fn test_conversion_roundtrip_local_etcd() {
        let mut external = ClusterConfiguration::default();
        external.populate_defaults();
        external.kubernetes_version = "v1.11.0".to_string();

        let internal = to_internal(&external);
        assert!(!internal.etcd.is_external());

        let back = from_internal(&internal);
        assert_eq!(back.etcd, external.etcd);
        assert_eq!(back.kubernetes_version, external.kubernetes_version);
    }

    #[test]
    fn test_conversion_external_etcd() {
        let external = ClusterConfiguration {
            etcd: Etcd {
                local: None,
                external: Some(ExternalEtcd {
                    endpoints: vec!["https://etcd.example.test:2379".to_string()],
                    ca_file: "/etc/etcd/ca.crt".to_string(),
                    ..Default::default()
                }),
            },
            ..Default::default()
        };

        let internal = to_internal(&external);
        match &internal.etcd {
            types::Etcd::External(ext) => {
                assert_eq!(ext.endpoints, ["https://etcd.example.test:2379"]);
            }
            types::Etcd::Local(_) => panic!("expected external etcd"),
        }
    }
}
