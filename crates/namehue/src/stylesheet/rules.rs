//! Rule generation.
//!
//! Each override becomes one CSS rule rendered from its kind's MiniJinja
//! template. The template context is:
//!
//! | Variable     | Value |
//! |--------------|-------|
//! | `id`         | the canonical identity |
//! | `value`      | the stored override value, verbatim |
//! | `background` | [`Config::icon_background`](crate::Config::icon_background) |
//!
//! Templates are named `*.css`, so MiniJinja applies no auto-escaping, and
//! trailing newlines are kept so rules concatenate line by line.
//!
//! A rendered rule may not contain a line equal to any kind's region marker.
//! Such a line would open or close another region inside this one.

use minijinja::{context, Environment};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::identity::Identity;
use crate::kind::OverrideKind;
use crate::store::Entries;

/// Compiled rule templates for every override kind.
pub struct RuleTemplates {
    env: Environment<'static>,
    background: String,
}

impl std::fmt::Debug for RuleTemplates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleTemplates")
            .field("background", &self.background)
            .finish_non_exhaustive()
    }
}

impl RuleTemplates {
    /// Creates templates from the built-in defaults.
    pub fn new(background: impl Into<String>) -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        for kind in OverrideKind::ALL {
            // Built-in templates are fixed strings covered by tests.
            if let Err(e) = env.add_template(kind.template_name(), kind.default_template()) {
                tracing::error!(
                    kind = %kind,
                    error = %e,
                    "built-in rule template failed to compile"
                );
            }
        }
        Self {
            env,
            background: background.into(),
        }
    }

    /// Creates templates from a configuration, applying its overrides.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut templates = Self::new(config.icon_background.clone());
        for kind in OverrideKind::ALL {
            templates.set_template(kind, config.template(kind).to_string())?;
        }
        Ok(templates)
    }

    /// Replaces the template for `kind`.
    pub fn set_template(&mut self, kind: OverrideKind, source: impl Into<String>) -> Result<()> {
        self.env
            .add_template_owned(kind.template_name(), source.into())
            .map_err(|source| Error::Template { kind, source })
    }

    /// Renders one rule.
    ///
    /// Fails with [`Error::InvalidValue`] when the rule contains a region
    /// marker line.
    pub fn render_rule(
        &self,
        kind: OverrideKind,
        identity: &Identity,
        value: &str,
    ) -> Result<String> {
        let template = self
            .env
            .get_template(kind.template_name())
            .map_err(|source| Error::Template { kind, source })?;
        let rule = template
            .render(context! {
                id => identity.as_str(),
                value => value,
                background => self.background.as_str(),
            })
            .map_err(|source| Error::Template { kind, source })?;
        if rule.lines().any(is_marker_line) {
            return Err(Error::InvalidValue {
                kind,
                value: value.to_string(),
                reason: "rendered rule contains a region marker line",
            });
        }
        Ok(rule)
    }

    /// Renders the complete region for `kind`: start marker, one rule per
    /// entry in iteration order, end marker.
    pub fn render_region(&self, kind: OverrideKind, entries: &Entries) -> Result<String> {
        let rules = entries
            .iter()
            .map(|(identity, value)| self.render_rule(kind, identity, value))
            .collect::<Result<Vec<_>>>()?;
        Ok(kind.region().wrap(rules))
    }
}

fn is_marker_line(line: &str) -> bool {
    OverrideKind::ALL.iter().any(|kind| {
        let region = kind.region();
        line == region.start_marker() || line == region.end_marker()
    })
}
