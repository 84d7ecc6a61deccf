//! Container image reference resolution for control-plane components.
//!
//! Builds fully qualified image references of the form
//! `{repository}/{component}-{arch}:{tag}` from the cluster configuration,
//! honoring the per-component and unified override fields. Everything here
//! is pure string formatting; no registry is contacted.

use kubelift_api::constants::DEFAULT_ETCD_VERSION;
use kubelift_api::types::{ClusterConfiguration, Etcd};

/// Image name of the etcd component.
pub const ETCD: &str = "etcd";

/// Control-plane components this tool deploys as container images.
///
/// The set is closed: resolving an image for anything outside it is
/// unrepresentable rather than a runtime lookup failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    ApiServer,
    ControllerManager,
    Scheduler,
}

impl Component {
    /// All components in deployment order. [`all_images`] output follows
    /// this order.
    pub const ALL: [Component; 3] = [
        Component::ApiServer,
        Component::ControllerManager,
        Component::Scheduler,
    ];

    /// The component's image name.
    pub const fn image_name(self) -> &'static str {
        match self {
            Component::ApiServer => "kube-apiserver",
            Component::ControllerManager => "kube-controller-manager",
            Component::Scheduler => "kube-scheduler",
        }
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.image_name())
    }
}

/// The running host's architecture, as it appears in image names.
pub fn host_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        "powerpc64" => "ppc64le",
        other => other,
    }
}

/// Builds `{prefix}/{name}-{arch}:{tag}` for the host architecture.
///
/// No validation is performed on any part.
pub fn generic_arch_image(prefix: &str, name: &str, tag: &str) -> String {
    format!("{}/{}-{}:{}", prefix, name, host_arch(), tag)
}

/// Rewrites build-metadata `+` separators, which are not valid in image
/// tags, to `_`.
fn sanitize_version_tag(version: &str) -> String {
    version.replace('+', "_")
}

/// Resolves a control-plane component's image from the repository and
/// version fields, ignoring the unified override even when it is set.
///
/// Upgrade logic uses this to compute what a component *would* resolve to
/// while a manual override is active; steady-state deployment goes
/// through [`control_plane_image`] instead.
pub fn control_plane_image_no_override(
    component: Component,
    cfg: &ClusterConfiguration,
) -> String {
    generic_arch_image(
        &cfg.image_repository,
        component.image_name(),
        &sanitize_version_tag(&cfg.kubernetes_version),
    )
}

/// Resolves a control-plane component's image.
///
/// A non-empty unified override replaces resolution for every component
/// and is returned verbatim.
pub fn control_plane_image(component: Component, cfg: &ClusterConfiguration) -> String {
    if !cfg.unified_control_plane_image.is_empty() {
        return cfg.unified_control_plane_image.clone();
    }
    control_plane_image_no_override(component, cfg)
}

/// Resolves the etcd image.
///
/// A non-empty local-etcd image override is returned verbatim; otherwise
/// the image is built from the repository prefix and the configured etcd
/// version, falling back to the default version when unset.
pub fn etcd_image(cfg: &ClusterConfiguration) -> String {
    if let Etcd::Local(local) = &cfg.etcd {
        if !local.image.is_empty() {
            return local.image.clone();
        }
        if !local.version.is_empty() {
            return generic_arch_image(&cfg.image_repository, ETCD, &local.version);
        }
    }
    generic_arch_image(&cfg.image_repository, ETCD, DEFAULT_ETCD_VERSION)
}

/// Resolves the image for every control-plane component, plus etcd when
/// it is locally managed.
///
/// When the CI repository override is set it replaces the normal
/// repository prefix for every image. Output order is fixed by
/// [`Component::ALL`], with etcd last; calling twice with the same
/// configuration yields identical output.
pub fn all_images(cfg: &ClusterConfiguration) -> Vec<String> {
    let mut cfg = cfg.clone();
    if !cfg.ci_image_repository.is_empty() {
        cfg.image_repository = cfg.ci_image_repository.clone();
    }

    let mut images: Vec<String> = Component::ALL
        .iter()
        .map(|component| control_plane_image(*component, &cfg))
        .collect();
    if !cfg.etcd.is_external() {
        images.push(etcd_image(&cfg));
    }
    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubelift_api::types::{ExternalEtcd, LocalEtcd};
    use proptest::prelude::*;

    const TEST_VERSION: &str = "v10.1.2-alpha.1.100+0123456789abcdef+SOMETHING";
    const EXPECTED_TAG: &str = "v10.1.2-alpha.1.100_0123456789abcdef_SOMETHING";
    const REPO_PREFIX: &str = "k8s.gcr.io";

    fn config_with_version() -> ClusterConfiguration {
        ClusterConfiguration {
            image_repository: REPO_PREFIX.to_string(),
            kubernetes_version: TEST_VERSION.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_generic_arch_image() {
        let expected = format!("foo/bar-{}:baz", host_arch());
        assert_eq!(generic_arch_image("foo", "bar", "baz"), expected);
    }

    #[test]
    fn test_no_override_ignores_unified_image() {
        let mut cfg = config_with_version();
        cfg.unified_control_plane_image = "nooverride".to_string();

        for component in Component::ALL {
            let expected =
                generic_arch_image(REPO_PREFIX, component.image_name(), EXPECTED_TAG);
            assert_eq!(control_plane_image_no_override(component, &cfg), expected);
        }
    }

    #[test]
    fn test_no_override_resolves_each_component() {
        let cfg = config_with_version();
        assert_eq!(
            control_plane_image_no_override(Component::ApiServer, &cfg),
            generic_arch_image(REPO_PREFIX, "kube-apiserver", EXPECTED_TAG)
        );
        assert_eq!(
            control_plane_image_no_override(Component::ControllerManager, &cfg),
            generic_arch_image(REPO_PREFIX, "kube-controller-manager", EXPECTED_TAG)
        );
        assert_eq!(
            control_plane_image_no_override(Component::Scheduler, &cfg),
            generic_arch_image(REPO_PREFIX, "kube-scheduler", EXPECTED_TAG)
        );
    }

    #[test]
    fn test_unified_override_short_circuits() {
        let cfg = ClusterConfiguration {
            unified_control_plane_image: "override".to_string(),
            ..Default::default()
        };
        for component in Component::ALL {
            assert_eq!(control_plane_image(component, &cfg), "override");
        }
    }

    #[test]
    fn test_control_plane_image_without_override() {
        let cfg = config_with_version();
        assert_eq!(
            control_plane_image(Component::Scheduler, &cfg),
            generic_arch_image(REPO_PREFIX, "kube-scheduler", EXPECTED_TAG)
        );
    }

    #[test]
    fn test_etcd_image_override() {
        let cfg = ClusterConfiguration {
            etcd: Etcd::Local(LocalEtcd {
                image: "override".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(etcd_image(&cfg), "override");
    }

    #[test]
    fn test_etcd_image_default_version() {
        let cfg = config_with_version();
        assert_eq!(
            etcd_image(&cfg),
            generic_arch_image(REPO_PREFIX, ETCD, DEFAULT_ETCD_VERSION)
        );
    }

    #[test]
    fn test_etcd_image_configured_version() {
        let cfg = ClusterConfiguration {
            image_repository: REPO_PREFIX.to_string(),
            etcd: Etcd::Local(LocalEtcd {
                version: "3.2.24".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(
            etcd_image(&cfg),
            generic_arch_image(REPO_PREFIX, ETCD, "3.2.24")
        );
    }

    #[test]
    fn test_all_images_uses_ci_repository() {
        let cfg = ClusterConfiguration {
            image_repository: "real.repo".to_string(),
            ci_image_repository: "test.repo".to_string(),
            ..Default::default()
        };
        let images = all_images(&cfg);
        assert!(!images.is_empty());
        for image in &images {
            assert!(image.contains("test.repo"), "missing CI repo in {image}");
        }
    }

    #[test]
    fn test_all_images_uses_normal_repository() {
        let cfg = ClusterConfiguration {
            image_repository: "real.repo".to_string(),
            ..Default::default()
        };
        for image in all_images(&cfg) {
            assert!(image.contains("real.repo"), "missing repo in {image}");
        }
    }

    #[test]
    fn test_all_images_includes_local_etcd() {
        let cfg = ClusterConfiguration::default();
        let images = all_images(&cfg);
        assert_eq!(images.len(), Component::ALL.len() + 1);
        assert!(images.iter().any(|image| image.contains(ETCD)));
    }

    #[test]
    fn test_all_images_excludes_external_etcd() {
        let cfg = ClusterConfiguration {
            etcd: Etcd::External(ExternalEtcd {
                endpoints: vec!["https://etcd.example.test:2379".to_string()],
                ..Default::default()
            }),
            ..Default::default()
        };
        let images = all_images(&cfg);
        assert_eq!(images.len(), Component::ALL.len());
        assert!(!images.iter().any(|image| image.contains(ETCD)));
    }

    #[test]
    fn test_all_images_is_idempotent() {
        let cfg = config_with_version();
        assert_eq!(all_images(&cfg), all_images(&cfg));
    }

    proptest! {
        #[test]
        fn prop_generic_arch_image_shape(
            prefix in "[a-z][a-z0-9.]{0,20}",
            name in "[a-z][a-z0-9-]{0,20}",
            tag in "[a-zA-Z0-9][a-zA-Z0-9._-]{0,20}",
        ) {
            let image = generic_arch_image(&prefix, &name, &tag);
            prop_assert_eq!(
                image,
                format!("{}/{}-{}:{}", prefix, name, host_arch(), tag)
            );
        }

        #[test]
        fn prop_version_tags_never_contain_plus(version in "[a-zA-Z0-9.+-]{1,40}") {
            let cfg = ClusterConfiguration {
                image_repository: REPO_PREFIX.to_string(),
                kubernetes_version: version,
                ..Default::default()
            };
            let image = control_plane_image_no_override(Component::ApiServer, &cfg);
            let tag = image.rsplit(':').next().unwrap();
            prop_assert!(!tag.contains('+'));
        }
    }
}
