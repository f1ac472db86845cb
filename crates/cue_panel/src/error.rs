//! Error types for cue_panel
//!
//! Entrance orchestration itself never fails: every skip is a silent no-op.
//! Errors only come from loading configuration and content.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading panel configuration or content
#[derive(Error, Debug)]
pub enum PanelError {
    /// Failed to read a file from disk
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// Well-formed but unusable value
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Result type for cue_panel operations
pub type Result<T> = std::result::Result<T, PanelError>;
