//! Composition root: the config registry plus the clock used to mint ids
//!
//! Opening a dashboard loads every slot, runs the legacy migrations and
//! enforces the settings guard before any consumer reads state.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

use crate::config::ConfigRegistry;
use crate::constants::theme::{CRT_THEME, DEFAULT_THEME};
use crate::migrate;
use crate::persistence::KeyValueStore;
use crate::theme::{self, ThemeVariables};
use crate::types::Theme;

/// Millisecond timestamp source
pub type Clock = Box<dyn Fn() -> u64>;

fn system_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

pub struct Dashboard<S: KeyValueStore> {
    config: ConfigRegistry<S>,
    clock: Clock,
}

impl<S: KeyValueStore> Dashboard<S> {
    pub fn open(store: S) -> Self {
        Self::with_clock(store, system_clock)
    }

    pub fn with_clock(store: S, clock: impl Fn() -> u64 + 'static) -> Self {
        let mut config = ConfigRegistry::load(store);
        let applied = migrate::run(&mut config);
        if !applied.is_empty() {
            info!(migrations = ?applied, "Applied legacy migrations");
        }
        config.reconcile_layouts();
        Self {
            config,
            clock: Box::new(clock),
        }
    }

    pub fn config(&self) -> &ConfigRegistry<S> {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ConfigRegistry<S> {
        &mut self.config
    }

    pub(crate) fn now(&self) -> u64 {
        (self.clock)()
    }

    /// Built-in palettes overlaid by custom themes of the same id
    pub fn all_themes(&self) -> BTreeMap<String, Theme> {
        let mut themes = theme::builtin_themes();
        themes.extend(
            self.config
                .custom_themes()
                .iter()
                .map(|(id, theme)| (id.clone(), theme.clone())),
        );
        themes
    }

    /// The selected theme, or the default palette if the selection is unknown
    pub fn active_theme(&self) -> Theme {
        let themes = self.all_themes();
        theme::resolve(&themes, self.config.current_theme())
            .cloned()
            .unwrap_or_else(|| theme::builtin_themes()[DEFAULT_THEME].clone())
    }

    pub fn theme_variables(&self) -> ThemeVariables {
        ThemeVariables {
            colors: self.active_theme().colors,
            widget_radius: *self.config.widget_radius(),
            custom_css: self.config.custom_css().clone(),
        }
    }

    pub fn is_crt(&self) -> bool {
        self.config.current_theme() == CRT_THEME
    }

    /// Store `theme` under its name (replacing any previous one) and select it
    pub fn save_custom_theme(&mut self, theme: Theme) {
        let name = theme.name.clone();
        self.config.update_custom_themes(|prev| {
            let mut next = prev.clone();
            next.insert(theme.name.clone(), theme);
            next
        });
        self.config.set_current_theme(name.clone());
        info!(theme = %name, "Saved custom theme");
    }

    /// Delete a custom theme; a deleted selection falls back to the default
    pub fn delete_custom_theme(&mut self, name: &str) -> bool {
        if !self.config.custom_themes().contains_key(name) {
            return false;
        }
        self.config.update_custom_themes(|prev| {
            let mut next = prev.clone();
            next.remove(name);
            next
        });
        if self.config.current_theme() == name {
            self.config.set_current_theme(DEFAULT_THEME.to_string());
        }
        info!(theme = %name, "Deleted custom theme");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::storage;
    use crate::persistence::MemoryStore;
    use crate::types::ThemeColors;

    fn custom(name: &str) -> Theme {
        Theme {
            name: name.to_string(),
            colors: ThemeColors {
                bg: "#000000".to_string(),
                fg: "#ffffff".to_string(),
                muted: "#777777".to_string(),
                border: "#333333".to_string(),
                accent: "#ff00ff".to_string(),
                hover: "#111111".to_string(),
            },
        }
    }

    #[test]
    fn test_deleting_selected_custom_theme_falls_back() {
        let mut dash = Dashboard::open(MemoryStore::new());
        dash.save_custom_theme(custom("neon"));
        assert_eq!(dash.config().current_theme(), "neon");
        assert_eq!(dash.active_theme().colors.accent, "#ff00ff");

        assert!(dash.delete_custom_theme("neon"));
        assert_eq!(dash.config().current_theme(), DEFAULT_THEME);
        assert!(!dash.delete_custom_theme("neon"));
    }

    #[test]
    fn test_deleting_unselected_theme_keeps_selection() {
        let mut dash = Dashboard::open(MemoryStore::new());
        dash.save_custom_theme(custom("neon"));
        dash.config_mut().set_current_theme("nord".to_string());
        assert!(dash.delete_custom_theme("neon"));
        assert_eq!(dash.config().current_theme(), "nord");
    }

    #[test]
    fn test_unknown_selection_resolves_to_default_palette() {
        let store = MemoryStore::new().with_entry(storage::THEME, "\"gone\"");
        let dash = Dashboard::open(store);
        assert_eq!(dash.config().current_theme(), "gone");
        assert_eq!(dash.active_theme(), theme::builtin_themes()[DEFAULT_THEME]);
    }

    #[test]
    fn test_theme_variables_follow_radius_and_css() {
        let mut dash = Dashboard::open(MemoryStore::new());
        dash.config_mut().set_widget_radius(4);
        dash.config_mut().set_custom_css(".x{}".to_string());
        let vars = dash.theme_variables();
        assert_eq!(vars.widget_radius, 4);
        assert_eq!(vars.custom_css, ".x{}");
        assert!(!dash.is_crt());

        dash.config_mut().set_current_theme(CRT_THEME.to_string());
        assert!(dash.is_crt());
    }

    #[test]
    fn test_open_migrates_legacy_theme() {
        let store = MemoryStore::new().with_entry(storage::THEME, "\"vss\"");
        let dash = Dashboard::open(store);
        assert_eq!(dash.config().current_theme(), "crt");
        assert!(dash.is_crt());
    }
}
