//! Error types for override stores and stylesheet publishing.
//!
//! Every mutation error is returned to the immediate caller and none are
//! retried. Two variants leave the in-memory state ahead of the files:
//!
//! - [`Error::StorageWrite`] after a `set`/`delete`: the mapping already
//!   reflects the mutation but the store file may not.
//! - [`Error::RegionCorruption`] / [`Error::Template`] after a `set`/`delete`:
//!   the store file is written but the stylesheet is untouched.
//!
//! Callers should report these as "state may be inconsistent" and retry the
//! whole operation (or `reload` once the stylesheet is repaired).

use std::path::PathBuf;

use namehue_region::RegionError;
use thiserror::Error;

use crate::identity::Identity;
use crate::kind::OverrideKind;

#[derive(Debug, Error)]
pub enum Error {
    /// `set` on an identity that already has an override of this kind.
    #[error("{kind} already set for {identity}; delete it first")]
    AlreadyExists {
        kind: OverrideKind,
        identity: Identity,
    },

    /// `delete` on an identity with no override of this kind.
    #[error("no {kind} set for {identity}")]
    NotFound {
        kind: OverrideKind,
        identity: Identity,
    },

    /// Identity is empty or longer than the configured bound.
    #[error("invalid identity '{identity}': {reason}")]
    InvalidIdentity { identity: Identity, reason: String },

    /// Override value cannot be safely placed in a stylesheet rule.
    #[error("invalid {kind} value {value:?}: {reason}")]
    InvalidValue {
        kind: OverrideKind,
        value: String,
        reason: &'static str,
    },

    #[error("failed to read {}: {source}", .path.display())]
    StorageRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    StorageWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The stylesheet's markers are inconsistent; the file was left alone.
    #[error("stylesheet {} is corrupt: {source}", .path.display())]
    RegionCorruption { path: PathBuf, source: RegionError },

    #[error("failed to render {kind} rules: {source}")]
    Template {
        kind: OverrideKind,
        source: minijinja::Error,
    },

    #[error("invalid configuration{}: {message}", location(.path))]
    Config {
        path: Option<PathBuf>,
        message: String,
    },
}

fn location(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}

/// Result type for namehue operations.
pub type Result<T> = std::result::Result<T, Error>;
