//! Canonical user identities.
//!
//! Display names are case- and punctuation-insensitive: `"Ash Ketchum"`,
//! `"ash_ketchum"` and `"ASHKETCHUM"` all name the same user. [`Identity`]
//! holds the canonical form that overrides are keyed by and colors are
//! derived from.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// The canonical key for a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Normalizes a display name with [`to_id`].
    pub fn new(name: &str) -> Self {
        Self(to_id(name))
    }

    /// Wraps an already-canonical identity without normalizing it.
    ///
    /// Use this when the host resolves names with its own rule.
    pub fn from_canonical(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Default normalization: ASCII letters lowercased, ASCII digits kept,
/// everything else dropped.
pub fn to_id(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// A host-supplied display name → identity rule.
pub type Normalizer = Arc<dyn Fn(&str) -> Identity + Send + Sync>;

/// The [`Normalizer`] that applies [`to_id`].
pub fn default_normalizer() -> Normalizer {
    Arc::new(Identity::new)
}
