//! One override kind's persistent mapping.
//!
//! # Lifecycle
//!
//! A store is loaded once at startup. A missing or unreadable file starts it
//! empty (and logs why) instead of failing startup.
//!
//! Entries are created by [`set`](OverrideStore::set) and removed by
//! [`delete`](OverrideStore::delete); there is no update in place. Every
//! mutation:
//!
//! 1. changes the in-memory mapping,
//! 2. writes the whole mapping to the store file atomically,
//! 3. regenerates this kind's stylesheet region,
//! 4. notifies the [`OverrideListener`].
//!
//! The store's write lock is held through steps 1–3, so mutations of one kind
//! reach the stylesheet in the order they were applied.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Error, Result};
use crate::identity::Identity;
use crate::kind::OverrideKind;
use crate::stylesheet::StylesheetPublisher;
use crate::util;

use super::change::{ChangeAction, NoopListener, OverrideChange, OverrideListener};
use super::Entries;

/// Default bound on identity length.
pub const DEFAULT_MAX_IDENTITY_LEN: usize = 19;

pub struct OverrideStore {
    kind: OverrideKind,
    path: PathBuf,
    max_identity_len: usize,
    entries: RwLock<Entries>,
    publisher: Arc<StylesheetPublisher>,
    listener: Arc<dyn OverrideListener>,
}

impl std::fmt::Debug for OverrideStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverrideStore")
            .field("kind", &self.kind)
            .field("path", &self.path)
            .field("max_identity_len", &self.max_identity_len)
            .field("entries", &*self.read())
            .finish_non_exhaustive()
    }
}

/// Reads a store file.
///
/// Returns `Ok(None)` when the file does not exist or is blank.
pub fn read_entries(path: &Path) -> Result<Option<Entries>> {
    let storage_error = |source| Error::StorageRead {
        path: path.to_path_buf(),
        source,
    };
    let Some(text) = util::read_if_exists(path).map_err(storage_error)? else {
        return Ok(None);
    };
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| storage_error(e.into()))
}

fn write_entries(path: &Path, entries: &Entries) -> Result<()> {
    let storage_error = |source| Error::StorageWrite {
        path: path.to_path_buf(),
        source,
    };
    let bytes = serde_json::to_vec(entries).map_err(|e| storage_error(e.into()))?;
    util::write_atomic(path, &bytes).map_err(storage_error)
}

impl OverrideStore {
    /// Loads `kind`'s store from `path`, starting empty if the file is
    /// missing or unreadable.
    ///
    /// Stored values that `set` would refuse are dropped with a warning.
    pub fn load(
        kind: OverrideKind,
        path: impl Into<PathBuf>,
        publisher: Arc<StylesheetPublisher>,
    ) -> Self {
        let path = path.into();
        let entries = match read_entries(&path) {
            Ok(Some(mut entries)) => {
                entries.retain(|identity, value| {
                    match admit(kind, &publisher, identity, value) {
                        Ok(()) => true,
                        Err(e) => {
                            tracing::warn!(
                                kind = %kind,
                                identity = %identity,
                                error = %e,
                                "dropping stored override"
                            );
                            false
                        }
                    }
                });
                tracing::info!(
                    kind = %kind,
                    path = %path.display(),
                    count = entries.len(),
                    "loaded overrides"
                );
                entries
            }
            Ok(None) => {
                tracing::debug!(
                    kind = %kind,
                    path = %path.display(),
                    "no stored overrides; starting empty"
                );
                Entries::new()
            }
            Err(e) => {
                tracing::warn!(
                    kind = %kind,
                    error = %e,
                    "could not load overrides; starting empty"
                );
                Entries::new()
            }
        };

        Self {
            kind,
            path,
            max_identity_len: DEFAULT_MAX_IDENTITY_LEN,
            entries: RwLock::new(entries),
            publisher,
            listener: Arc::new(NoopListener),
        }
    }

    pub fn with_max_identity_len(mut self, len: usize) -> Self {
        self.max_identity_len = len;
        self
    }

    pub fn with_listener(mut self, listener: Arc<dyn OverrideListener>) -> Self {
        self.listener = listener;
        self
    }

    pub fn kind(&self) -> OverrideKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> RwLockReadGuard<'_, Entries> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entries> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// The override for `identity`, if any.
    pub fn get(&self, identity: &Identity) -> Option<String> {
        self.read().get(identity).cloned()
    }

    pub fn contains(&self, identity: &Identity) -> bool {
        self.read().contains_key(identity)
    }

    /// A snapshot of every entry in generation order.
    pub fn entries(&self) -> Entries {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Creates an override. Fails if `identity` already has one.
    pub fn set(&self, identity: &Identity, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        self.check_identity(identity)?;
        admit(self.kind, &self.publisher, identity, &value)?;

        let mut entries = self.write();
        if entries.contains_key(identity) {
            return Err(Error::AlreadyExists {
                kind: self.kind,
                identity: identity.clone(),
            });
        }
        entries.insert(identity.clone(), value.clone());
        self.commit(&entries)?;
        drop(entries);

        tracing::info!(kind = %self.kind, identity = %identity, value = %value, "override set");
        self.listener.on_change(&OverrideChange {
            kind: self.kind,
            identity: identity.clone(),
            action: ChangeAction::Set { value },
        });
        Ok(())
    }

    /// Removes an override. Fails if `identity` has none.
    pub fn delete(&self, identity: &Identity) -> Result<()> {
        let mut entries = self.write();
        let Some(previous) = entries.shift_remove(identity) else {
            return Err(Error::NotFound {
                kind: self.kind,
                identity: identity.clone(),
            });
        };
        self.commit(&entries)?;
        drop(entries);

        tracing::info!(kind = %self.kind, identity = %identity, "override deleted");
        self.listener.on_change(&OverrideChange {
            kind: self.kind,
            identity: identity.clone(),
            action: ChangeAction::Deleted { previous },
        });
        Ok(())
    }

    /// Regenerates this kind's stylesheet region from memory without
    /// touching the store file. Used to repair the stylesheet after it was
    /// edited or damaged by hand.
    pub fn reload(&self) -> Result<()> {
        let entries = self.read();
        self.publisher.publish(self.kind, &entries)
    }

    /// Writes the whole mapping to the store file.
    pub fn save(&self) -> Result<()> {
        write_entries(&self.path, &self.read())
    }

    fn commit(&self, entries: &Entries) -> Result<()> {
        write_entries(&self.path, entries).inspect_err(|e| {
            tracing::error!(
                kind = %self.kind,
                error = %e,
                "override store write failed; memory and file may differ"
            );
        })?;
        self.publisher.publish(self.kind, entries)
    }

    fn check_identity(&self, identity: &Identity) -> Result<()> {
        let reason = if identity.is_empty() {
            "identity is empty".to_string()
        } else if identity.len() > self.max_identity_len {
            format!("longer than {} characters", self.max_identity_len)
        } else {
            return Ok(());
        };
        Err(Error::InvalidIdentity {
            identity: identity.clone(),
            reason,
        })
    }
}

/// Checks `value` and the rule it renders to.
fn admit(
    kind: OverrideKind,
    publisher: &StylesheetPublisher,
    identity: &Identity,
    value: &str,
) -> Result<()> {
    check_value(kind, value)?;
    publisher.templates().render_rule(kind, identity, value)?;
    Ok(())
}

/// Rejects values that could escape their rule or forge a marker line.
fn check_value(kind: OverrideKind, value: &str) -> Result<()> {
    let reason = if value.trim().is_empty() {
        "value is empty"
    } else if value.chars().any(char::is_control) {
        "value contains line breaks or control characters"
    } else if kind.is_color() && value.contains(['{', '}', ';']) {
        "colors may not contain '{', '}' or ';'"
    } else if !kind.is_color() && value.contains('"') {
        "URLs may not contain '\"'"
    } else {
        return Ok(());
    };
    Err(Error::InvalidValue {
        kind,
        value: value.to_string(),
        reason,
    })
}
