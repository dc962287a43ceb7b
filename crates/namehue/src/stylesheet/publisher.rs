//! Writing override regions into the shared stylesheet.
//!
//! [`StylesheetPublisher::publish`] renders a kind's region, splices it into
//! the current stylesheet with [`namehue_region::replace_region`], writes the
//! result atomically and fires the reload notifier.
//!
//! The read-patch-write sequence is not transactional, so one publisher owns
//! one stylesheet and serializes that sequence across every kind. Two
//! mutations that both read the old text would otherwise each write back a
//! copy missing the other's change.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::{Error, Result};
use crate::kind::OverrideKind;
use crate::store::Entries;
use crate::util;

use super::reload::{NoopReload, ReloadNotifier};
use super::rules::RuleTemplates;

pub struct StylesheetPublisher {
    path: PathBuf,
    templates: RuleTemplates,
    notifier: Box<dyn ReloadNotifier>,
    /// Held for the whole read-patch-write of the stylesheet.
    file_lock: Mutex<()>,
}

impl std::fmt::Debug for StylesheetPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StylesheetPublisher")
            .field("path", &self.path)
            .field("templates", &self.templates)
            .finish_non_exhaustive()
    }
}

impl StylesheetPublisher {
    /// Creates a publisher for the stylesheet at `path` with no reload
    /// notification.
    pub fn new(path: impl Into<PathBuf>, templates: RuleTemplates) -> Self {
        Self {
            path: path.into(),
            templates,
            notifier: Box::new(NoopReload),
            file_lock: Mutex::new(()),
        }
    }

    /// Sets the notifier fired after each successful write.
    pub fn with_notifier(mut self, notifier: impl ReloadNotifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub(crate) fn with_boxed_notifier(mut self, notifier: Box<dyn ReloadNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn templates(&self) -> &RuleTemplates {
        &self.templates
    }

    /// Regenerates `kind`'s region from `entries`.
    ///
    /// On [`Error::RegionCorruption`] the stylesheet is left exactly as it
    /// was and no reload is sent.
    pub fn publish(&self, kind: OverrideKind, entries: &Entries) -> Result<()> {
        let body = self.templates.render_region(kind, entries)?;
        self.patch(kind, &body)?;
        tracing::info!(
            kind = %kind,
            rules = entries.len(),
            stylesheet = %self.path.display(),
            "published stylesheet region"
        );
        self.notify();
        Ok(())
    }

    fn patch(&self, kind: OverrideKind, body: &str) -> Result<()> {
        let _guard = self.file_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let text = util::read_if_exists(&self.path)
            .map_err(|source| Error::StorageRead {
                path: self.path.clone(),
                source,
            })?
            .unwrap_or_default();

        let patched = namehue_region::replace_region(&text, &kind.region(), body).map_err(|source| {
            tracing::error!(
                kind = %kind,
                stylesheet = %self.path.display(),
                error = %source,
                "stylesheet region markers are corrupt; leaving file untouched"
            );
            Error::RegionCorruption {
                path: self.path.clone(),
                source,
            }
        })?;

        util::write_atomic(&self.path, patched.as_bytes()).map_err(|source| {
            tracing::error!(
                stylesheet = %self.path.display(),
                error = %source,
                "failed to write stylesheet"
            );
            Error::StorageWrite {
                path: self.path.clone(),
                source,
            }
        })
    }

    fn notify(&self) {
        if let Err(e) = self.notifier.reload() {
            tracing::warn!(error = %e, "stylesheet reload notification failed");
        }
    }
}
