//! The shared stylesheet: rule rendering, region publishing, client reloads.

mod publisher;
mod reload;
mod rules;

pub use publisher::StylesheetPublisher;
#[cfg(feature = "http")]
pub use reload::HttpReload;
pub use reload::{NoopReload, ReloadError, ReloadNotifier};
pub use rules::RuleTemplates;
