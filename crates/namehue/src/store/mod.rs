//! Persistent per-kind override stores.

mod change;
#[allow(clippy::module_inception)]
mod store;

use indexmap::IndexMap;

use crate::identity::Identity;

pub use change::{ChangeAction, NoopListener, OverrideChange, OverrideListener};
pub use store::{read_entries, OverrideStore, DEFAULT_MAX_IDENTITY_LEN};

/// Identity → override value, in insertion order.
///
/// Insertion order is the rule order in the generated stylesheet region, so
/// the same entries always produce the same bytes.
pub type Entries = IndexMap<Identity, String>;
