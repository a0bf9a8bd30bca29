//! Named snapshots of the user-facing configuration
//!
//! A preset's `data` is kept as raw JSON so a malformed entry in the stored
//! list never prevents the other presets from loading. Loading is a
//! field-by-field merge: anything the preset does not carry is left as is.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

use crate::config::ConfigRegistry;
use crate::dashboard::Dashboard;
use crate::migrate;
use crate::persistence::KeyValueStore;
use crate::types::{
    ActiveWidgets, FunOptions, Layouts, LinkGroup, MarketConfig, StatsMode, TempUnit, TodoItem,
    TodoistConfig, WeatherMode,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Creation time in milliseconds; not guaranteed unique
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub data: Value,
}

/// Captured settings; every field is optional so older presets still load
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub todos: Option<Vec<TodoItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_groups: Option<Vec<LinkGroup>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_css: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats_mode: Option<StatsMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_mode: Option<WeatherMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_unit: Option<TempUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layouts: Option<Layouts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_widgets: Option<ActiveWidgets>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_widget_titles: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fun_options: Option<FunOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_radius: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_in_new_tab: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_config: Option<MarketConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub todoist_config: Option<TodoistConfig>,
}

impl PresetData {
    /// Snapshot every captured field of `config`
    pub fn capture<S: KeyValueStore>(config: &ConfigRegistry<S>) -> Self {
        Self {
            current_theme: Some(config.current_theme().clone()),
            todos: Some(config.todos().clone()),
            link_groups: Some(config.link_groups().clone()),
            custom_css: Some(config.custom_css().clone()),
            stats_mode: Some(*config.stats_mode()),
            weather_mode: Some(*config.weather_mode()),
            temp_unit: Some(*config.temp_unit()),
            layouts: Some(config.layouts().clone()),
            active_widgets: Some(config.active_widgets().clone()),
            show_widget_titles: Some(*config.show_widget_titles()),
            custom_font: Some(config.custom_font().clone()),
            fun_options: Some(config.fun_options().clone()),
            widget_radius: Some(*config.widget_radius()),
            open_in_new_tab: Some(*config.open_in_new_tab()),
            market_config: Some(config.market_config().clone()),
            todoist_config: Some(config.todoist_config().clone()),
        }
    }

    /// Overwrite each live value this snapshot carries; returns how many were applied
    pub fn apply<S: KeyValueStore>(self, config: &mut ConfigRegistry<S>) -> usize {
        let mut applied = 0;
        let mut count = || applied += 1;

        if let Some(theme) = self.current_theme.filter(|t| !t.is_empty()) {
            config.set_current_theme(theme);
            count();
        }
        if let Some(todos) = self.todos {
            config.set_todos(todos);
            count();
        }
        if let Some(groups) = self.link_groups {
            config.set_link_groups(groups);
            count();
        }
        if let Some(css) = self.custom_css {
            config.set_custom_css(css);
            count();
        }
        if let Some(mode) = self.stats_mode {
            config.set_stats_mode(mode);
            count();
        }
        if let Some(mode) = self.weather_mode {
            config.set_weather_mode(mode);
            count();
        }
        if let Some(unit) = self.temp_unit {
            config.set_temp_unit(unit);
            count();
        }
        if let Some(layouts) = self.layouts {
            config.set_layouts(layouts);
            count();
        }
        if let Some(active) = self.active_widgets {
            config.set_active_widgets(active);
            count();
        }
        if let Some(show) = self.show_widget_titles {
            config.set_show_widget_titles(show);
            count();
        }
        if let Some(font) = self.custom_font {
            config.set_custom_font(font);
            count();
        }
        if let Some(options) = self.fun_options {
            config.set_fun_options(options);
            count();
        }
        if let Some(radius) = self.widget_radius {
            config.set_widget_radius(radius);
            count();
        }
        if let Some(new_tab) = self.open_in_new_tab {
            config.set_open_in_new_tab(new_tab);
            count();
        }
        if let Some(market) = self.market_config {
            config.set_market_config(market);
            count();
        }
        if let Some(todoist) = self.todoist_config {
            config.set_todoist_config(todoist);
            count();
        }

        applied
    }
}

impl Preset {
    /// Decode `data`, or `None` when it is missing or malformed
    pub fn decode(&self) -> Option<PresetData> {
        if !self.data.is_object() {
            return None;
        }
        serde_json::from_value(self.data.clone())
            .inspect_err(|e| warn!(preset = %self.name, id = self.id, error = %e, "Preset data is malformed"))
            .ok()
    }
}

impl<S: KeyValueStore> Dashboard<S> {
    pub fn presets(&self) -> &[Preset] {
        self.config().presets()
    }

    /// Capture the current configuration under `name`; returns the new id
    pub fn save_preset(&mut self, name: &str) -> u64 {
        let id = self.now();
        let data = serde_json::to_value(PresetData::capture(self.config()))
            .unwrap_or_else(|e| {
                error!(error = %e, "Failed to encode preset data");
                Value::Object(serde_json::Map::new())
            });
        let preset = Preset {
            id,
            name: name.to_string(),
            data,
        };
        self.config_mut().update_presets(|prev| {
            let mut next = prev.clone();
            next.push(preset);
            next
        });
        info!(preset = %name, id, "Saved preset");
        id
    }

    /// Apply `preset` to the live configuration
    ///
    /// Returns false and changes nothing when the preset's data is missing
    /// or malformed.
    pub fn load_preset(&mut self, preset: &Preset) -> bool {
        let Some(data) = preset.decode() else {
            warn!(preset = %preset.name, id = preset.id, "Skipping preset without usable data");
            return false;
        };
        let applied = data.apply(self.config_mut());
        migrate::run(self.config_mut());
        info!(preset = %preset.name, id = preset.id, fields = applied, "Loaded preset");
        true
    }

    /// Load the first stored preset with `id`
    pub fn load_preset_by_id(&mut self, id: u64) -> bool {
        let Some(preset) = self.presets().iter().find(|p| p.id == id).cloned() else {
            warn!(id, "No preset with this id");
            return false;
        };
        self.load_preset(&preset)
    }

    /// Remove every preset whose id equals `id`; returns how many were removed
    pub fn delete_preset(&mut self, id: u64) -> usize {
        let matches = self.presets().iter().filter(|p| p.id == id).count();
        if matches == 0 {
            return 0;
        }
        self.config_mut()
            .update_presets(|prev| prev.iter().filter(|p| p.id != id).cloned().collect());
        info!(id, removed = matches, "Deleted preset");
        matches
    }

    /// Write the first preset with `id` to `path` as pretty JSON
    pub fn export_preset(&self, id: u64, path: &Path) -> Result<()> {
        let preset = self
            .presets()
            .iter()
            .find(|p| p.id == id)
            .with_context(|| format!("No preset with id {id}"))?;
        let contents = serde_json::to_string_pretty(preset).context("Failed to serialize preset")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write preset to {}", path.display()))?;
        info!(id, path = %path.display(), "Exported preset");
        Ok(())
    }

    /// Read a preset file and append it under a fresh id; returns that id
    pub fn import_preset(&mut self, path: &Path) -> Result<u64> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read preset from {}", path.display()))?;
        let mut preset: Preset = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse preset from {}", path.display()))?;
        if preset.decode().is_none() {
            bail!("Preset in {} has no usable data", path.display());
        }
        preset.id = self.now();
        let id = preset.id;
        info!(preset = %preset.name, id, "Imported preset");
        self.config_mut().update_presets(|prev| {
            let mut next = prev.clone();
            next.push(preset);
            next
        });
        Ok(id)
    }
}

/// Presets grouped by id, for spotting same-millisecond collisions
pub fn ids_with_duplicates(presets: &[Preset]) -> BTreeMap<u64, usize> {
    let mut counts = BTreeMap::new();
    for preset in presets {
        *counts.entry(preset.id).or_insert(0) += 1;
    }
    counts.retain(|_, count| *count > 1);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::types::{Breakpoint, Theme};
    use std::cell::Cell;
    use std::rc::Rc;

    fn dashboard() -> Dashboard<MemoryStore> {
        let tick = Rc::new(Cell::new(1_700_000_000_000u64));
        Dashboard::with_clock(MemoryStore::new(), move || {
            tick.set(tick.get() + 1);
            tick.get()
        })
    }

    #[test]
    fn test_save_then_load_restores_captured_fields() {
        let mut dash = dashboard();
        dash.config_mut().set_current_theme("nord".to_string());
        dash.config_mut().set_widget_radius(6);
        dash.config_mut().set_temp_unit(TempUnit::F);
        let id = dash.save_preset("A");
        let saved_layouts = dash.config().layouts().clone();

        dash.config_mut().set_current_theme("crt".to_string());
        dash.config_mut().set_widget_radius(0);
        dash.config_mut().set_temp_unit(TempUnit::C);
        dash.config_mut().set_custom_css("body{}".to_string());
        dash.toggle_widget("matrix");

        assert!(dash.load_preset_by_id(id));
        assert_eq!(dash.config().current_theme(), "nord");
        assert_eq!(*dash.config().widget_radius(), 6);
        assert_eq!(*dash.config().temp_unit(), TempUnit::F);
        assert_eq!(dash.config().custom_css(), "");
        assert_eq!(dash.config().layouts(), &saved_layouts);
        assert_eq!(dash.config().active_widgets().get("matrix"), Some(&false));
    }

    #[test]
    fn test_load_without_radius_keeps_live_radius() {
        let mut dash = dashboard();
        dash.config_mut().set_widget_radius(12);
        let preset = Preset {
            id: 1,
            name: "old".to_string(),
            data: serde_json::json!({ "currentTheme": "paper" }),
        };

        assert!(dash.load_preset(&preset));
        assert_eq!(dash.config().current_theme(), "paper");
        assert_eq!(*dash.config().widget_radius(), 12);
    }

    #[test]
    fn test_load_with_missing_or_malformed_data_is_noop() {
        let mut dash = dashboard();
        dash.config_mut().set_widget_radius(3);
        let writes = dash.config().store().writes();

        let missing = Preset { id: 1, name: "m".to_string(), data: Value::Null };
        let malformed = Preset {
            id: 2,
            name: "bad".to_string(),
            data: serde_json::json!({ "currentTheme": "nord", "widgetRadius": "round" }),
        };
        assert!(!dash.load_preset(&missing));
        assert!(!dash.load_preset(&malformed));
        assert_eq!(dash.config().current_theme(), "midnight");
        assert_eq!(dash.config().store().writes(), writes);
    }

    #[test]
    fn test_legacy_values_in_preset_are_migrated_on_load() {
        let mut dash = dashboard();
        let preset = Preset {
            id: 1,
            name: "legacy".to_string(),
            data: serde_json::json!({ "currentTheme": "vss", "weatherMode": "ascii" }),
        };

        assert!(dash.load_preset(&preset));
        assert_eq!(dash.config().current_theme(), "crt");
        assert_eq!(*dash.config().weather_mode(), WeatherMode::Icon);
        assert!(dash.is_crt());
    }

    #[test]
    fn test_empty_theme_in_preset_is_ignored() {
        let mut dash = dashboard();
        let preset = Preset {
            id: 1,
            name: "blank".to_string(),
            data: serde_json::json!({ "currentTheme": "", "customCss": "" }),
        };
        dash.config_mut().set_custom_css("a{}".to_string());
        assert!(dash.load_preset(&preset));
        assert_eq!(dash.config().current_theme(), "midnight");
        assert_eq!(dash.config().custom_css(), "");
    }

    #[test]
    fn test_delete_removes_all_matching_ids() {
        let mut dash = dashboard();
        let id = dash.save_preset("one");
        dash.save_preset("two");
        let mut dup = dash.presets()[0].clone();
        dup.name = "dup".to_string();
        dash.config_mut().update_presets(|prev| {
            let mut next = prev.clone();
            next.push(dup);
            next
        });
        assert_eq!(ids_with_duplicates(dash.presets()).get(&id), Some(&2));

        assert_eq!(dash.delete_preset(id), 2);
        assert_eq!(dash.presets().len(), 1);
        assert_eq!(dash.presets()[0].name, "two");
        assert_eq!(dash.delete_preset(id), 0);
    }

    #[test]
    fn test_preset_layouts_get_guard_reconciled() {
        let mut dash = dashboard();
        let mut layouts = dash.config().layouts().clone();
        layouts.get_mut(Breakpoint::Sm).unwrap().retain(|i| i.key != "settings-guard");
        let preset = Preset {
            id: 9,
            name: "no guard".to_string(),
            data: serde_json::json!({ "layouts": layouts }),
        };
        assert!(dash.load_preset(&preset));
        assert!(dash.config().layouts().find(Breakpoint::Sm, "settings-guard").is_some());
    }

    #[test]
    fn test_export_import_round_trip_mints_new_id() {
        let mut dash = dashboard();
        dash.save_custom_theme(Theme {
            name: "mine".to_string(),
            colors: crate::theme::builtin_themes()["nord"].colors.clone(),
        });
        let id = dash.save_preset("share");

        let dir = std::env::temp_dir().join(format!("tui-startpage-preset-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("share.json");
        dash.export_preset(id, &path).unwrap();

        let imported = dash.import_preset(&path).unwrap();
        assert_ne!(imported, id);
        assert_eq!(dash.presets().len(), 2);
        assert_eq!(dash.presets()[1].data, dash.presets()[0].data);

        fs::write(&path, r#"{"id":1,"name":"empty"}"#).unwrap();
        assert!(dash.import_preset(&path).is_err());

        let _ = fs::remove_dir_all(&dir);
    }
}
