//! Config commands (inspect, default, and migrate configuration).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand};
use tracing::debug;

use kubelift_api::scheme::ConfigDefaults;
use kubelift_api::{codec, types, v1alpha2};
use kubelift_images::all_images;

use crate::error::CliError;

/// Config commands.
#[derive(Debug, Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
enum ConfigSubcommand {
    /// Work with the container images a configuration resolves to.
    Images(ImagesCommand),

    /// Print a fully defaulted configuration document.
    Print,

    /// Rewrite an older configuration document as the current version.
    Migrate(MigrateArgs),
}

#[derive(Debug, Args)]
struct ImagesCommand {
    #[command(subcommand)]
    command: ImagesSubcommand,
}

#[derive(Debug, Subcommand)]
enum ImagesSubcommand {
    /// List the images this configuration will pull.
    List(ListImagesArgs),
}

#[derive(Debug, Args)]
struct ListImagesArgs {
    /// Path to a cluster configuration file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Kubernetes version to resolve, overriding the configuration.
    #[arg(long)]
    kubernetes_version: Option<String>,
}

#[derive(Debug, Args)]
struct MigrateArgs {
    /// Path to the existing configuration file, any supported version.
    #[arg(long)]
    old_config: PathBuf,

    /// Destination path. Prints to stdout when omitted.
    #[arg(long)]
    new_config: Option<PathBuf>,
}

impl ConfigCommand {
    pub fn run(self) -> Result<()> {
        match self.command {
            ConfigSubcommand::Images(cmd) => match cmd.command {
                ImagesSubcommand::List(args) => list_images(args),
            },
            ConfigSubcommand::Print => print_config(),
            ConfigSubcommand::Migrate(args) => migrate_config(args),
        }
    }
}

fn list_images(args: ListImagesArgs) -> Result<()> {
    let mut cfg = match &args.config {
        Some(path) => load_cluster_configuration(path)?,
        None => types::defaulted_configuration(),
    };
    if let Some(version) = args.kubernetes_version {
        cfg.kubernetes_version = version;
    }

    for image in all_images(&cfg) {
        println!("{image}");
    }
    Ok(())
}

fn print_config() -> Result<()> {
    let mut external = v1alpha2::ClusterConfiguration::default();
    external.populate_defaults();

    let bytes = codec::marshal_to_yaml(&external, &v1alpha2::group_version())
        .map_err(CliError::Codec)?;
    print!("{}", String::from_utf8_lossy(&bytes));
    Ok(())
}

fn migrate_config(args: MigrateArgs) -> Result<()> {
    let bytes = fs::read(&args.old_config).map_err(|source| CliError::ReadConfig {
        path: args.old_config.clone(),
        source,
    })?;
    debug!(path = %args.old_config.display(), "read configuration");

    let obj = codec::unmarshal_from_yaml(&bytes, &v1alpha2::group_version())
        .map_err(CliError::Codec)?;
    let migrated = codec::marshal_to_yaml(obj.as_ref(), &v1alpha2::group_version())
        .map_err(CliError::Codec)?;

    match args.new_config {
        Some(path) => {
            fs::write(&path, &migrated)
                .map_err(|source| CliError::WriteConfig { path, source })?;
        }
        None => print!("{}", String::from_utf8_lossy(&migrated)),
    }
    Ok(())
}

/// Reads a configuration file of any supported version and converts it
/// to the internal representation.
fn load_cluster_configuration(path: &Path) -> Result<types::ClusterConfiguration> {
    let bytes = fs::read(path).map_err(|source| CliError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;

    let obj = codec::unmarshal_from_yaml(&bytes, &types::group_version())
        .map_err(CliError::Codec)?;
    let cfg = obj
        .as_any()
        .downcast_ref::<types::ClusterConfiguration>()
        .ok_or_else(|| CliError::UnexpectedDocument {
            path: path.to_path_buf(),
        })?;
    Ok(cfg.clone())
}
