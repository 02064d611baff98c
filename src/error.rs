//! Error types shared by the capture, reveal and launch paths.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("failed to install input hook: {0}")]
    HookInstallationFailed(String),

    #[error("anchor overlay unavailable: {0}")]
    OverlayUnavailable(String),

    #[error("a position capture session is already active")]
    SessionActive,
}

#[derive(Error, Debug)]
pub enum RevealError {
    #[error("failed to open {path}: {source}")]
    ContentOpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("no stack matches folder '{0}'")]
    StackLookupFailed(String),

    #[error("failed to load stacks: {0}")]
    Store(#[from] anyhow::Error),
}
