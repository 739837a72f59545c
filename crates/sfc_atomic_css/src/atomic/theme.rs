//! Engine configuration and the resolved design tokens it produces.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::Deserialize;

/// Configuration accepted by [`AtomicSheet`](super::AtomicSheet).
///
/// Deserializes from the same camelCase object shape the JavaScript
/// atomic CSS engines use, e.g.
/// `{ "important": true, "theme": { "extend": { "colors": { "brand": "#123456" } } } }`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Append `!important` to every generated declaration.
    pub important: bool,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Replaces the default breakpoints. Values are `min-width` lengths.
    pub screens: Option<BTreeMap<String, String>>,
    /// Replaces the default palette.
    pub colors: Option<BTreeMap<String, ColorValue>>,
    /// Added on top of the default (or replaced) tokens.
    pub extend: ThemeExtension,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThemeExtension {
    pub screens: BTreeMap<String, String>,
    pub colors: BTreeMap<String, ColorValue>,
}

/// A palette entry: one color, or a map of shade to color.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    Single(String),
    Shades(BTreeMap<String, String>),
}

/// Design tokens resolved from an [`EngineConfig`].
#[derive(Debug, Clone)]
pub struct Theme {
    /// Flattened palette: `"green-200"`, `"white"`, `"brand"`.
    colors: FxHashMap<String, String>,
    /// Breakpoints ordered by ascending `min-width`.
    screens: Vec<(String, String)>,
}

impl Theme {
    pub fn from_config(config: &ThemeConfig) -> Self {
        let mut colors = FxHashMap::default();
        match &config.colors {
            Some(custom) => {
                for (name, value) in custom {
                    insert_color(&mut colors, name, value);
                }
            }
            None => {
                for (name, value) in SPECIAL_COLORS {
                    colors.insert((*name).to_string(), (*value).to_string());
                }
                for (name, shades) in DEFAULT_PALETTE {
                    for (shade, value) in SHADES.iter().zip(shades.iter()) {
                        colors.insert(format!("{name}-{shade}"), (*value).to_string());
                    }
                }
            }
        }
        for (name, value) in &config.extend.colors {
            insert_color(&mut colors, name, value);
        }

        let mut screens: Vec<(String, String)> = match &config.screens {
            Some(custom) => custom.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            None => DEFAULT_SCREENS
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        };
        for (name, width) in &config.extend.screens {
            screens.retain(|(existing, _)| existing != name);
            screens.push((name.clone(), width.clone()));
        }
        screens.sort_by(|(_, a), (_, b)| leading_number(a).total_cmp(&leading_number(b)));

        Self { colors, screens }
    }

    pub fn color(&self, name: &str) -> Option<&str> {
        self.colors.get(name).map(String::as_str)
    }

    /// Index and `min-width` of a named breakpoint.
    pub fn screen(&self, name: &str) -> Option<(usize, &str)> {
        self.screens
            .iter()
            .position(|(screen, _)| screen == name)
            .map(|index| (index, self.screens[index].1.as_str()))
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}

fn insert_color(colors: &mut FxHashMap<String, String>, name: &str, value: &ColorValue) {
    match value {
        ColorValue::Single(color) => {
            colors.insert(name.to_string(), color.clone());
        }
        ColorValue::Shades(shades) => {
            for (shade, color) in shades {
                let key = if shade == "DEFAULT" {
                    name.to_string()
                } else {
                    format!("{name}-{shade}")
                };
                colors.insert(key, color.clone());
            }
        }
    }
}

/// `"640px"` → 640.0; unparsable lengths sort last.
fn leading_number(length: &str) -> f64 {
    let end = length
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(length.len());
    length[..end].parse().unwrap_or(f64::MAX)
}

const DEFAULT_SCREENS: &[(&str, &str)] = &[
    ("sm", "640px"),
    ("md", "768px"),
    ("lg", "1024px"),
    ("xl", "1280px"),
    ("2xl", "1536px"),
];

const SPECIAL_COLORS: &[(&str, &str)] = &[
    ("transparent", "transparent"),
    ("current", "currentColor"),
    ("black", "#000"),
    ("white", "#fff"),
];

const SHADES: [&str; 10] = ["50", "100", "200", "300", "400", "500", "600", "700", "800", "900"];

#[rustfmt::skip]
const DEFAULT_PALETTE: &[(&str, [&str; 10])] = &[
    ("gray", ["#f9fafb", "#f3f4f6", "#e5e7eb", "#d1d5db", "#9ca3af", "#6b7280", "#4b5563", "#374151", "#1f2937", "#111827"]),
    ("red", ["#fef2f2", "#fee2e2", "#fecaca", "#fca5a5", "#f87171", "#ef4444", "#dc2626", "#b91c1c", "#991b1b", "#7f1d1d"]),
    ("yellow", ["#fffbeb", "#fef3c7", "#fde68a", "#fcd34d", "#fbbf24", "#f59e0b", "#d97706", "#b45309", "#92400e", "#78350f"]),
    ("green", ["#ecfdf5", "#d1fae5", "#a7f3d0", "#6ee7b7", "#34d399", "#10b981", "#059669", "#047857", "#065f46", "#064e3b"]),
    ("blue", ["#eff6ff", "#dbeafe", "#bfdbfe", "#93c5fd", "#60a5fa", "#3b82f6", "#2563eb", "#1d4ed8", "#1e40af", "#1e3a8a"]),
    ("indigo", ["#eef2ff", "#e0e7ff", "#c7d2fe", "#a5b4fc", "#818cf8", "#6366f1", "#4f46e5", "#4338ca", "#3730a3", "#312e81"]),
    ("purple", ["#f5f3ff", "#ede9fe", "#ddd6fe", "#c4b5fd", "#a78bfa", "#8b5cf6", "#7c3aed", "#6d28d9", "#5b21b6", "#4c1d95"]),
    ("pink", ["#fdf2f8", "#fce7f3", "#fbcfe8", "#f9a8d4", "#f472b6", "#ec4899", "#db2777", "#be185d", "#9d174d", "#831843"]),
];
