//! Built-in palettes and resolution of the active theme into style variables

use std::collections::BTreeMap;

use crate::constants::theme::DEFAULT_THEME;
use crate::types::{Theme, ThemeColors};

fn palette(name: &str, colors: [&str; 6]) -> Theme {
    let [bg, fg, muted, border, accent, hover] = colors;
    Theme {
        name: name.to_string(),
        colors: ThemeColors {
            bg: bg.to_string(),
            fg: fg.to_string(),
            muted: muted.to_string(),
            border: border.to_string(),
            accent: accent.to_string(),
            hover: hover.to_string(),
        },
    }
}

/// Palettes shipped with the dashboard, keyed by theme id
pub fn builtin_themes() -> BTreeMap<String, Theme> {
    [
        ("midnight", palette("Midnight", ["#0d1117", "#c9d1d9", "#6e7681", "#30363d", "#58a6ff", "#161b22"])),
        ("crt", palette("CRT", ["#0a0f0a", "#33ff33", "#1a801a", "#1f4d1f", "#66ff66", "#102010"])),
        ("lavender", palette("Lavender", ["#1e1b2e", "#e0d7f5", "#8a80a8", "#3b3454", "#b79cff", "#29243d"])),
        ("nord", palette("Nord", ["#2e3440", "#d8dee9", "#7b88a1", "#434c5e", "#88c0d0", "#3b4252"])),
        ("gruvbox", palette("Gruvbox", ["#282828", "#ebdbb2", "#928374", "#504945", "#fabd2f", "#3c3836"])),
        ("paper", palette("Paper", ["#f5f3ee", "#2b2b2b", "#8a8578", "#d6d2c4", "#c2410c", "#ebe7dc"])),
    ]
    .into_iter()
    .map(|(id, theme)| (id.to_string(), theme))
    .collect()
}

/// Resolved styling handed to the theming layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeVariables {
    pub colors: ThemeColors,
    pub widget_radius: u32,
    /// User stylesheet, injected verbatim
    pub custom_css: String,
}

impl ThemeVariables {
    /// `(name, value)` pairs for the themed style variables
    pub fn css_variables(&self) -> Vec<(&'static str, String)> {
        vec![
            ("--color-bg", self.colors.bg.clone()),
            ("--color-fg", self.colors.fg.clone()),
            ("--color-muted", self.colors.muted.clone()),
            ("--color-border", self.colors.border.clone()),
            ("--color-accent", self.colors.accent.clone()),
            ("--color-hover", self.colors.hover.clone()),
            ("--widget-radius", format!("{}px", self.widget_radius)),
        ]
    }

    /// `:root { ... }` block followed by the custom stylesheet
    pub fn to_stylesheet(&self) -> String {
        let mut css = String::from(":root {\n");
        for (name, value) in self.css_variables() {
            css.push_str(&format!("  {name}: {value};\n"));
        }
        css.push_str("}\n");
        if !self.custom_css.is_empty() {
            css.push_str(&self.custom_css);
            css.push('\n');
        }
        css
    }
}

/// Look up `selected` in `themes`, falling back to the default palette
pub fn resolve<'a>(themes: &'a BTreeMap<String, Theme>, selected: &str) -> Option<&'a Theme> {
    themes.get(selected).or_else(|| themes.get(DEFAULT_THEME))
}
