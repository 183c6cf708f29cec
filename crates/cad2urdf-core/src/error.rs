//! Error types shared across the export pipeline

use thiserror::Error;

use crate::urdf::UrdfError;

/// Failure raised while turning host data into a robot description.
///
/// The `Invalid*` variants carry the host name of the offending entity. Any of
/// them aborts the whole export, no partial description is produced.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Invalid occurrence '{name}': {reason}")]
    InvalidOccurrence { name: String, reason: String },
    #[error("Invalid joint '{name}': {reason}")]
    InvalidJoint { name: String, reason: String },
    #[error("Invalid material '{name}': {reason}")]
    InvalidMaterial { name: String, reason: String },
    #[error("Invalid export settings: {0}")]
    InvalidSettings(String),
    #[error(transparent)]
    Urdf(#[from] UrdfError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to read assembly snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl ExportError {
    pub fn occurrence(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOccurrence {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn joint(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidJoint {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn material(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMaterial {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// True for the failures caused by malformed or missing host data.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidOccurrence { .. } | Self::InvalidJoint { .. } | Self::InvalidMaterial { .. }
        )
    }
}
