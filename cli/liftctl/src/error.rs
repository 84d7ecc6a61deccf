//! Error handling and display for the CLI.

use std::path::PathBuf;

use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} does not contain a cluster configuration")]
    UnexpectedDocument { path: PathBuf },

    #[error(transparent)]
    Codec(#[from] kubelift_api::CodecError),
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("Error: {err}");

    // Show the underlying cause chain, if any
    for cause in err.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
}
