//! The [`Overrides`] facade: every store, the shared publisher and the
//! derived color cache, constructed once at startup.
//!
//! # Example
//!
//! ```rust,no_run
//! use namehue::{Config, OverrideKind, Overrides};
//!
//! let overrides = Overrides::open(Config::from_file("namehue.yaml")?)?;
//!
//! overrides.set(OverrideKind::NameColor, "Ash Ketchum", "#ff0000")?;
//! assert_eq!(overrides.color_for("ashketchum"), "#ff0000");
//!
//! // No override: falls back to the hash-derived color.
//! assert_eq!(overrides.color_for("misty"), "#3279a6");
//! # Ok::<(), namehue::Error>(())
//! ```

use std::sync::Arc;

use crate::colorspace::Rgb;
use crate::config::Config;
use crate::derive::DerivedColors;
use crate::error::Result;
use crate::identity::{default_normalizer, Identity, Normalizer};
use crate::kind::OverrideKind;
use crate::store::{Entries, NoopListener, OverrideListener, OverrideStore};
use crate::stylesheet::{NoopReload, ReloadNotifier, RuleTemplates, StylesheetPublisher};

/// Builder for [`Overrides`].
pub struct OverridesBuilder {
    config: Config,
    notifier: Box<dyn ReloadNotifier>,
    listener: Arc<dyn OverrideListener>,
    normalizer: Normalizer,
}

impl OverridesBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            notifier: Box::new(NoopReload),
            listener: Arc::new(NoopListener),
            normalizer: default_normalizer(),
        }
    }

    /// Sets the notifier fired after each stylesheet write.
    pub fn notifier(mut self, notifier: impl ReloadNotifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// Sets the listener told about every set and delete.
    pub fn listener(mut self, listener: impl OverrideListener + 'static) -> Self {
        self.listener = Arc::new(listener);
        self
    }

    /// Replaces the display name → identity rule.
    pub fn normalizer<F>(mut self, normalize: F) -> Self
    where
        F: Fn(&str) -> Identity + Send + Sync + 'static,
    {
        self.normalizer = Arc::new(normalize);
        self
    }

    /// Compiles the rule templates and loads every store.
    pub fn build(self) -> Result<Overrides> {
        let templates = RuleTemplates::from_config(&self.config)?;
        let publisher = Arc::new(
            StylesheetPublisher::new(self.config.stylesheet.clone(), templates)
                .with_boxed_notifier(self.notifier),
        );

        let load = |kind: OverrideKind| {
            OverrideStore::load(kind, self.config.storage_path(kind), publisher.clone())
                .with_max_identity_len(self.config.max_identity_len)
                .with_listener(self.listener.clone())
        };
        let name_colors = load(OverrideKind::NameColor);
        let symbol_colors = load(OverrideKind::SymbolColor);
        let icons = load(OverrideKind::Icon);

        Ok(Overrides {
            config: self.config,
            publisher,
            name_colors,
            symbol_colors,
            icons,
            derived: DerivedColors::new(),
            normalizer: self.normalizer,
        })
    }
}

/// All override state for one process.
///
/// Name arguments are display names; they are normalized before use.
pub struct Overrides {
    config: Config,
    publisher: Arc<StylesheetPublisher>,
    name_colors: OverrideStore,
    symbol_colors: OverrideStore,
    icons: OverrideStore,
    derived: DerivedColors,
    normalizer: Normalizer,
}

impl std::fmt::Debug for Overrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Overrides")
            .field("config", &self.config)
            .field("name_colors", &self.name_colors)
            .field("symbol_colors", &self.symbol_colors)
            .field("icons", &self.icons)
            .finish_non_exhaustive()
    }
}

impl Overrides {
    /// Opens with default notifier, listener and normalizer.
    pub fn open(config: Config) -> Result<Self> {
        OverridesBuilder::new(config).build()
    }

    pub fn builder(config: Config) -> OverridesBuilder {
        OverridesBuilder::new(config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn publisher(&self) -> &StylesheetPublisher {
        &self.publisher
    }

    /// Normalizes a display name.
    pub fn identity(&self, name: &str) -> Identity {
        (self.normalizer)(name)
    }

    pub fn store(&self, kind: OverrideKind) -> &OverrideStore {
        match kind {
            OverrideKind::NameColor => &self.name_colors,
            OverrideKind::SymbolColor => &self.symbol_colors,
            OverrideKind::Icon => &self.icons,
        }
    }

    pub fn set(&self, kind: OverrideKind, name: &str, value: impl Into<String>) -> Result<()> {
        self.store(kind).set(&self.identity(name), value)
    }

    pub fn delete(&self, kind: OverrideKind, name: &str) -> Result<()> {
        self.store(kind).delete(&self.identity(name))
    }

    pub fn get(&self, kind: OverrideKind, name: &str) -> Option<String> {
        self.store(kind).get(&self.identity(name))
    }

    pub fn entries(&self, kind: OverrideKind) -> Entries {
        self.store(kind).entries()
    }

    /// Regenerates one kind's stylesheet region from memory.
    pub fn reload(&self, kind: OverrideKind) -> Result<()> {
        self.store(kind).reload()
    }

    /// Regenerates every region. Stops at the first failure.
    pub fn reload_all(&self) -> Result<()> {
        OverrideKind::ALL
            .into_iter()
            .try_for_each(|kind| self.reload(kind))
    }

    /// The hash-derived color for `name`, ignoring any override.
    pub fn derived_color(&self, name: &str) -> Rgb {
        self.derived.get(&self.identity(name))
    }

    /// The color `name` is displayed in: the name-color override verbatim if
    /// one exists, else the derived color as `#rrggbb`.
    pub fn color_for(&self, name: &str) -> String {
        let identity = self.identity(name);
        self.name_colors
            .get(&identity)
            .unwrap_or_else(|| self.derived.get(&identity).to_hex())
    }
}
