//! Override store kinds.
//!
//! Each kind owns one storage file, one stylesheet region and one rule
//! template. The defaults reproduce the stylesheet rules existing
//! deployments already serve, byte for byte.

use std::fmt;

use namehue_region::Region;
use serde::{Deserialize, Serialize};

/// The kinds of per-user override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideKind {
    /// Color of the user's name in chat and in the user list.
    NameColor,
    /// Color of the group symbol shown before the user's name.
    SymbolColor,
    /// Image shown at the right of the user's user-list entry.
    Icon,
}

impl OverrideKind {
    pub const ALL: [OverrideKind; 3] = [
        OverrideKind::NameColor,
        OverrideKind::SymbolColor,
        OverrideKind::Icon,
    ];

    /// File name of this kind's store inside the data directory.
    pub fn storage_file(self) -> &'static str {
        match self {
            OverrideKind::NameColor => "customcolors.json",
            OverrideKind::SymbolColor => "symbolcolors.json",
            OverrideKind::Icon => "usericons.json",
        }
    }

    /// Name used in the region markers, e.g. `COLORS` in `/* COLORS START */`.
    pub fn marker_name(self) -> &'static str {
        match self {
            OverrideKind::NameColor => "COLORS",
            OverrideKind::SymbolColor => "SYMBOLCOLORS",
            OverrideKind::Icon => "ICONS",
        }
    }

    pub fn region(self) -> Region {
        Region::named(self.marker_name())
    }

    /// Template name registered with the rule engine.
    pub fn template_name(self) -> &'static str {
        match self {
            OverrideKind::NameColor => "name_color.css",
            OverrideKind::SymbolColor => "symbol_color.css",
            OverrideKind::Icon => "icon.css",
        }
    }

    /// The built-in rule template. Context: `id`, `value`, `background`.
    pub fn default_template(self) -> &'static str {
        match self {
            OverrideKind::NameColor => concat!(
                "[class$=\"chatmessage-{{ id }}\"] strong, ",
                "[class$=\"chatmessage-{{ id }} mine\"] strong, ",
                "[class$=\"chatmessage-{{ id }} highlighted\"] strong, ",
                "[id$=\"-userlist-user-{{ id }}\"] strong em, ",
                "[id$=\"-userlist-user-{{ id }}\"] strong, ",
                "[id$=\"-userlist-user-{{ id }}\"] span",
                "{\n\tcolor: {{ value }} !important;\n}\n",
            ),
            OverrideKind::SymbolColor => concat!(
                "[id$=\"-userlist-user-{{ id }}\"] button > em.group {\n color: {{ value }}; \n}\n",
                "\n[class$=\"chatmessage-{{ id }}\"] strong small, .groupsymbol ",
                "{\n color: {{ value }}; \n}\n",
            ),
            OverrideKind::Icon => concat!(
                "[id$=\"-userlist-user-{{ id }}\"] { background: {{ background }} ",
                "url(\"{{ value }}\") right no-repeat !important;}\n",
            ),
        }
    }

    /// Whether values of this kind are colors (as opposed to URLs).
    pub fn is_color(self) -> bool {
        matches!(self, OverrideKind::NameColor | OverrideKind::SymbolColor)
    }
}

impl fmt::Display for OverrideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OverrideKind::NameColor => "custom color",
            OverrideKind::SymbolColor => "symbol color",
            OverrideKind::Icon => "icon",
        })
    }
}
