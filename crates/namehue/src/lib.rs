//! # namehue - Identity Colors and Stylesheet Overrides
//!
//! `namehue` gives every user of a chat service a stable display color
//! derived from their name, and lets staff override that color, the color of
//! the rank symbol in front of it, or the icon shown next to it.
//!
//! ## Derived colors
//!
//! A name is normalized to an [`Identity`] (lowercase ASCII alphanumerics),
//! hashed with MD5, and the digest picks a hue, saturation and lightness.
//! The lightness is then corrected so that hues the eye perceives as very
//! bright or very dark stay readable on the chat background:
//!
//! ```rust
//! use namehue::{derive_color, Identity};
//!
//! assert_eq!(derive_color(&Identity::new("Ash")).to_hex(), "#27a836");
//! assert_eq!(derive_color(&Identity::new("Misty")).to_hex(), "#3279a6");
//! ```
//!
//! The same name gives the same color on every run and every machine.
//!
//! ## Overrides
//!
//! Each [`OverrideKind`] has an [`OverrideStore`]: a JSON file of
//! identity → value plus a marker-delimited region of a shared stylesheet
//! holding one CSS rule per entry. Every mutation rewrites the JSON file,
//! regenerates the region (see the `namehue-region` crate) and fires a
//! [`ReloadNotifier`] so connected clients refetch the stylesheet.
//!
//! [`Overrides`] bundles the three stores with the derived color cache:
//!
//! ```rust,no_run
//! use namehue::{Config, OverrideKind, Overrides};
//!
//! let overrides = Overrides::open(Config::default())?;
//! overrides.set(OverrideKind::Icon, "Brock", "https://example.com/brock.png")?;
//! overrides.delete(OverrideKind::Icon, "Brock")?;
//! # Ok::<(), namehue::Error>(())
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (store loads and writes, stylesheet
//! publishes, reload failures). Install any subscriber to see them.
//!
//! ## Features
//!
//! - `http`: enables [`HttpReload`], which requests the configured reload URL
//!   after each stylesheet write.

pub mod colorspace;
mod config;
mod derive;
mod error;
mod identity;
mod kind;
mod overrides;
mod store;
mod stylesheet;
mod util;

pub use colorspace::{Hsl, LinearRgb, Rgb};
pub use config::{Config, SERVER_PLACEHOLDER};
pub use derive::{derive_color, lightness_correction, DerivedColors, HslSeed};
pub use error::{Error, Result};
pub use identity::{default_normalizer, to_id, Identity, Normalizer};
pub use kind::OverrideKind;
pub use overrides::{Overrides, OverridesBuilder};
pub use store::{
    read_entries, ChangeAction, Entries, NoopListener, OverrideChange, OverrideListener,
    OverrideStore, DEFAULT_MAX_IDENTITY_LEN,
};
#[cfg(feature = "http")]
pub use stylesheet::HttpReload;
pub use stylesheet::{NoopReload, ReloadError, ReloadNotifier, RuleTemplates, StylesheetPublisher};

pub use namehue_region::{Region, RegionError};
