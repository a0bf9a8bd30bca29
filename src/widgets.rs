//! Widget lifecycle: show/hide, duplicate, remove and factory reset
//!
//! Every operation is total. Unknown keys are created rather than rejected,
//! and removing something that does not exist is a no-op. The settings
//! guard belongs to the layout reconciler and is never touched here.

use tracing::{info, warn};

use crate::config::defaults::{default_active_widgets, default_layouts};
use crate::constants::grid::SETTINGS_GUARD_KEY;
use crate::dashboard::Dashboard;
use crate::layout;
use crate::persistence::KeyValueStore;
use crate::types::{
    FunOptions, MarketConfig, StatsMode, TempUnit, TodoistConfig, WeatherMode, extra_key,
    is_extra_key,
};

impl<S: KeyValueStore> Dashboard<S> {
    pub fn is_widget_active(&self, key: &str) -> bool {
        self.config().active_widgets().get(key).copied().unwrap_or(false)
    }

    /// Flip a widget's visibility; returns whether it is now shown
    ///
    /// An active extra widget is removed outright instead of hidden. A widget
    /// that becomes active is placed in every breakpoint that lacks it.
    pub fn toggle_widget(&mut self, key: &str) -> bool {
        if key == SETTINGS_GUARD_KEY {
            warn!("The settings guard cannot be toggled");
            return false;
        }
        let active = self.is_widget_active(key);
        if is_extra_key(key) && active {
            self.remove_extra_widget(key);
            return false;
        }

        let will_be_active = !active;
        self.config_mut().update_active_widgets(|prev| {
            let mut next = prev.clone();
            next.insert(key.to_string(), will_be_active);
            next
        });

        if will_be_active {
            let mut layouts = self.config().layouts().clone();
            if layout::place_where_missing(&mut layouts, key) > 0 {
                self.config_mut().set_layouts(layouts);
            }
        }

        info!(widget = %key, active = will_be_active, "Toggled widget");
        will_be_active
    }

    /// Add another instance of `widget_type`; returns its new key
    pub fn add_extra_widget(&mut self, widget_type: &str) -> String {
        let mut created = self.now();
        let mut key = extra_key(widget_type, created);
        while self.config().active_widgets().contains_key(&key)
            || self.config().layouts().contains_key(&key)
        {
            created += 1;
            key = extra_key(widget_type, created);
        }
        self.config_mut().update_active_widgets(|prev| {
            let mut next = prev.clone();
            next.insert(key.clone(), true);
            next
        });
        self.config_mut().update_layouts(|prev| {
            let mut next = prev.clone();
            layout::place_everywhere(&mut next, &key);
            next
        });
        info!(widget = %key, "Added extra widget");
        key
    }

    /// Forget a widget entirely: its activation entry and every placement
    ///
    /// Returns false when there was nothing to remove.
    pub fn remove_extra_widget(&mut self, key: &str) -> bool {
        if key == SETTINGS_GUARD_KEY {
            warn!("The settings guard cannot be removed");
            return false;
        }
        let known = self.config().active_widgets().contains_key(key);
        let placed = self.config().layouts().contains_key(key);
        if !known && !placed {
            return false;
        }

        if known {
            self.config_mut().update_active_widgets(|prev| {
                let mut next = prev.clone();
                next.remove(key);
                next
            });
        }
        if placed {
            let mut layouts = self.config().layouts().clone();
            layout::strip(&mut layouts, key);
            self.config_mut().set_layouts(layouts);
        }
        info!(widget = %key, "Removed widget");
        true
    }

    /// Restore layout, activation and display options to factory defaults
    ///
    /// Theme selection, custom themes, presets, todos and links are kept.
    pub fn reset_layout(&mut self) {
        let config = self.config_mut();
        config.set_layouts(default_layouts());
        config.set_active_widgets(default_active_widgets());
        config.set_show_widget_titles(true);
        config.set_custom_font(String::new());
        config.set_stats_mode(StatsMode::default());
        config.set_weather_mode(WeatherMode::default());
        config.set_temp_unit(TempUnit::default());
        config.set_widget_radius(0);
        config.set_fun_options(FunOptions::default());
        config.set_market_config(MarketConfig::default());
        config.set_todoist_config(TodoistConfig::default());
        info!("Reset layout and display options to defaults");
    }
}
