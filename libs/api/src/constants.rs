//! Default values applied to unset configuration fields.

/// Default container image repository for control-plane components.
pub const DEFAULT_IMAGE_REPOSITORY: &str = "k8s.gcr.io";

/// Etcd version deployed when the configuration does not pin one.
pub const DEFAULT_ETCD_VERSION: &str = "3.2.18";

/// Default data directory for locally managed etcd.
pub const DEFAULT_ETCD_DATA_DIR: &str = "/var/lib/etcd";

/// Default API server bind port.
pub const DEFAULT_BIND_PORT: u16 = 6443;

/// Default subnet for cluster services.
pub const DEFAULT_SERVICE_SUBNET: &str = "10.96.0.0/12";

/// Default cluster DNS domain.
pub const DEFAULT_DNS_DOMAIN: &str = "cluster.local";
