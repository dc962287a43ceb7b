//! Change notifications for hosts.
//!
//! A host typically uses these to tell the affected user (if connected) that
//! their color or icon changed, or to post an audit line to a staff room.

use crate::identity::Identity;
use crate::kind::OverrideKind;

/// A completed mutation of an override store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideChange {
    pub kind: OverrideKind,
    pub identity: Identity,
    pub action: ChangeAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeAction {
    /// An override was created with this raw value.
    Set { value: String },
    /// An override holding this raw value was removed.
    Deleted { previous: String },
}

/// Receives every successful `set` and `delete`.
///
/// Called after the store file and the stylesheet have both been written,
/// with no store locks held.
pub trait OverrideListener: Send + Sync {
    fn on_change(&self, change: &OverrideChange);
}

/// A listener that ignores every change.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl OverrideListener for NoopListener {
    fn on_change(&self, _change: &OverrideChange) {}
}
