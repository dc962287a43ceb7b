//! Configuration.
//!
//! A [`Config`] is usually read from YAML. Every field has a default, so an
//! empty document is valid and reproduces the stock layout:
//!
//! ```yaml
//! data_dir: impulse-db
//! stylesheet: config/custom.css
//! server_id: impulse
//! reload_url: "https://play.pokemonshowdown.com/customcss.php?server={server}"
//! max_identity_len: 19
//! icon_background: "rgba(17, 72, 79, 0.6)"
//! templates:
//!   icon: "[id$=\"-userlist-user-{{ id }}\"] { background: url(\"{{ value }}\") right no-repeat; }\n"
//! ```
//!
//! # Example
//!
//! ```rust
//! use namehue::{Config, OverrideKind};
//!
//! let config = Config::from_yaml("server_id: mainserver\n").unwrap();
//! assert_eq!(
//!     config.reload_url(),
//!     "https://play.pokemonshowdown.com/customcss.php?server=mainserver"
//! );
//! assert_eq!(
//!     config.storage_path(OverrideKind::Icon),
//!     std::path::Path::new("impulse-db/usericons.json")
//! );
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::kind::OverrideKind;
use crate::store::DEFAULT_MAX_IDENTITY_LEN;
use crate::util;

/// Placeholder in [`Config::reload_url`] replaced by the server id.
pub const SERVER_PLACEHOLDER: &str = "{server}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding one JSON store file per override kind.
    pub data_dir: PathBuf,
    /// The shared stylesheet the regions are written into.
    pub stylesheet: PathBuf,
    /// Server id substituted into `reload_url`.
    pub server_id: String,
    /// URL requested after each stylesheet write.
    #[serde(rename = "reload_url")]
    pub reload_url_template: String,
    /// Maximum identity length accepted by `set`.
    pub max_identity_len: usize,
    /// CSS background placed behind user-list icons.
    pub icon_background: String,
    /// Rule template overrides, keyed by kind.
    pub templates: BTreeMap<OverrideKind, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("impulse-db"),
            stylesheet: PathBuf::from("config/custom.css"),
            server_id: "impulse".to_string(),
            reload_url_template: format!(
                "https://play.pokemonshowdown.com/customcss.php?server={}",
                SERVER_PLACEHOLDER
            ),
            max_identity_len: DEFAULT_MAX_IDENTITY_LEN,
            icon_background: "rgba(17, 72, 79, 0.6)".to_string(),
            templates: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Parses a configuration from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::parse(yaml, None)
    }

    /// Reads and parses a YAML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = util::read_if_exists(path)
            .map_err(|source| Error::StorageRead {
                path: path.to_path_buf(),
                source,
            })?
            .ok_or_else(|| Error::Config {
                path: Some(path.to_path_buf()),
                message: "file not found".to_string(),
            })?;
        Self::parse(&text, Some(path))
    }

    fn parse(yaml: &str, path: Option<&Path>) -> Result<Self> {
        // An empty document deserializes as null rather than an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(yaml).map_err(|e| Error::Config {
            path: path.map(Path::to_path_buf),
            message: e.to_string(),
        })?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: Option<&Path>) -> Result<()> {
        if self.max_identity_len == 0 {
            return Err(Error::Config {
                path: path.map(Path::to_path_buf),
                message: "max_identity_len must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_stylesheet(mut self, path: impl Into<PathBuf>) -> Self {
        self.stylesheet = path.into();
        self
    }

    pub fn with_server_id(mut self, id: impl Into<String>) -> Self {
        self.server_id = id.into();
        self
    }

    pub fn with_reload_url(mut self, template: impl Into<String>) -> Self {
        self.reload_url_template = template.into();
        self
    }

    pub fn with_max_identity_len(mut self, len: usize) -> Self {
        self.max_identity_len = len;
        self
    }

    pub fn with_icon_background(mut self, background: impl Into<String>) -> Self {
        self.icon_background = background.into();
        self
    }

    /// Replaces the rule template for `kind`.
    pub fn with_template(mut self, kind: OverrideKind, template: impl Into<String>) -> Self {
        self.templates.insert(kind, template.into());
        self
    }

    /// Path of `kind`'s store file.
    pub fn storage_path(&self, kind: OverrideKind) -> PathBuf {
        self.data_dir.join(kind.storage_file())
    }

    /// The reload URL with the server id filled in.
    pub fn reload_url(&self) -> String {
        self.reload_url_template
            .replace(SERVER_PLACEHOLDER, &self.server_id)
    }

    /// The rule template for `kind`: the override if configured, else the
    /// built-in default.
    pub fn template(&self, kind: OverrideKind) -> &str {
        self.templates
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| kind.default_template())
    }
}
