//! The full set of persisted dashboard settings
//!
//! Each setting is a [`StickyCell`] bound to its own storage slot. Every
//! committed write notifies subscribers with the [`Field`] that changed.
//! Writes to the layouts or to the reserve-settings-space flag re-run the
//! settings guard reconciliation before returning.

use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::config::defaults::{default_active_widgets, default_layouts, default_link_groups};
use crate::config::sticky::StickyCell;
use crate::constants::storage;
use crate::constants::theme::DEFAULT_THEME;
use crate::layout;
use crate::persistence::KeyValueStore;
use crate::preset::Preset;
use crate::types::{
    ActiveWidgets, FunOptions, Layouts, LinkGroup, MarketConfig, StatsMode, TempUnit, Theme,
    TodoItem, TodoistConfig, WeatherMode,
};

/// Identifies one persisted setting in change notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    CurrentTheme,
    CustomThemes,
    Todos,
    LinkGroups,
    CustomCss,
    StatsMode,
    WeatherMode,
    Layouts,
    TempUnit,
    WidgetRadius,
    OpenInNewTab,
    ShowWidgetTitles,
    ReserveSettingsSpace,
    CustomFont,
    BorderGlow,
    AnimatedLinks,
    FunOptions,
    MarketConfig,
    TodoistConfig,
    ActiveWidgets,
    LayoutLocked,
    ResizingEnabled,
    Presets,
}

/// Handle returned by [`ConfigRegistry::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(Field)>;

pub struct ConfigRegistry<S: KeyValueStore> {
    store: S,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,

    current_theme: StickyCell<String>,
    custom_themes: StickyCell<BTreeMap<String, Theme>>,
    todos: StickyCell<Vec<TodoItem>>,
    link_groups: StickyCell<Vec<LinkGroup>>,
    custom_css: StickyCell<String>,
    stats_mode: StickyCell<StatsMode>,
    weather_mode: StickyCell<WeatherMode>,
    layouts: StickyCell<Layouts>,
    temp_unit: StickyCell<TempUnit>,
    widget_radius: StickyCell<u32>,
    open_in_new_tab: StickyCell<bool>,
    show_widget_titles: StickyCell<bool>,
    reserve_settings_space: StickyCell<bool>,
    custom_font: StickyCell<String>,
    border_glow: StickyCell<bool>,
    animated_links: StickyCell<bool>,
    fun_options: StickyCell<FunOptions>,
    market_config: StickyCell<MarketConfig>,
    todoist_config: StickyCell<TodoistConfig>,
    active_widgets: StickyCell<ActiveWidgets>,
    layout_locked: StickyCell<bool>,
    resizing_enabled: StickyCell<bool>,
    presets: StickyCell<Vec<Preset>>,
}

impl<S: KeyValueStore> ConfigRegistry<S> {
    /// Read every slot from `store`, materializing defaults for missing ones
    pub fn load(mut store: S) -> Self {
        let s: &mut dyn KeyValueStore = &mut store;

        let current_theme = StickyCell::load(s, storage::THEME, DEFAULT_THEME.to_string());
        let custom_themes = StickyCell::load(s, storage::CUSTOM_THEMES, BTreeMap::new());
        let todos = StickyCell::load(s, storage::TODOS, Vec::new());
        let link_groups = StickyCell::load(s, storage::LINKS, default_link_groups());
        let custom_css = StickyCell::load(s, storage::CUSTOM_CSS, String::new());
        let stats_mode = StickyCell::load(s, storage::STATS_MODE, StatsMode::default());
        let weather_mode = StickyCell::load(s, storage::WEATHER_MODE, WeatherMode::default());
        let layouts = StickyCell::load(s, storage::LAYOUTS, default_layouts());
        let temp_unit = StickyCell::load(s, storage::TEMP_UNIT, TempUnit::default());
        let widget_radius = StickyCell::load(s, storage::WIDGET_RADIUS, 0);
        let open_in_new_tab = StickyCell::load(s, storage::OPEN_IN_NEW_TAB, false);
        let show_widget_titles = StickyCell::load(s, storage::SHOW_TITLES, true);
        let reserve_settings_space = StickyCell::load(s, storage::RESERVE_SETTINGS, true);
        let custom_font = StickyCell::load(s, storage::CUSTOM_FONT, String::new());
        let border_glow = StickyCell::load(s, storage::BORDER_GLOW, true);
        let animated_links = StickyCell::load(s, storage::ANIMATED_LINKS, true);
        let fun_options = StickyCell::load(s, storage::FUN_OPTIONS, FunOptions::default());
        let market_config = StickyCell::load(s, storage::MARKET_CONFIG, MarketConfig::default());
        let todoist_config = StickyCell::load(s, storage::TODOIST_CONFIG, TodoistConfig::default());
        let active_widgets = StickyCell::load(s, storage::ACTIVE_WIDGETS, default_active_widgets());
        let layout_locked = StickyCell::load(s, storage::LAYOUT_LOCKED, true);
        let resizing_enabled = StickyCell::load(s, storage::RESIZING_ENABLED, false);
        let presets = StickyCell::load(s, storage::PRESETS, Vec::<Preset>::new());

        info!(
            theme = %current_theme.get(),
            widgets = active_widgets.get().len(),
            presets = presets.get().len(),
            "Loaded config registry"
        );

        Self {
            store,
            listeners: Vec::new(),
            next_subscription: 0,
            current_theme,
            custom_themes,
            todos,
            link_groups,
            custom_css,
            stats_mode,
            weather_mode,
            layouts,
            temp_unit,
            widget_radius,
            open_in_new_tab,
            show_widget_titles,
            reserve_settings_space,
            custom_font,
            border_glow,
            animated_links,
            fun_options,
            market_config,
            todoist_config,
            active_widgets,
            layout_locked,
            resizing_enabled,
            presets,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register `listener` for change notifications
    pub fn subscribe(&mut self, listener: impl FnMut(Field) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Drop a listener; returns false if `id` was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(registered, _)| *registered != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, field: Field) {
        debug!(field = ?field, "Config changed");
        for (_, listener) in self.listeners.iter_mut() {
            listener(field);
        }
    }

    pub fn layouts(&self) -> &Layouts {
        self.layouts.get()
    }

    pub fn set_layouts(&mut self, value: Layouts) {
        self.layouts.set(&mut self.store, value);
        self.notify(Field::Layouts);
        self.reconcile_layouts();
    }

    pub fn update_layouts(&mut self, f: impl FnOnce(&Layouts) -> Layouts) {
        self.layouts.update(&mut self.store, f);
        self.notify(Field::Layouts);
        self.reconcile_layouts();
    }

    pub fn reserve_settings_space(&self) -> bool {
        *self.reserve_settings_space.get()
    }

    pub fn set_reserve_settings_space(&mut self, value: bool) {
        self.reserve_settings_space.set(&mut self.store, value);
        self.notify(Field::ReserveSettingsSpace);
        self.reconcile_layouts();
    }

    /// Enforce the settings guard when space is reserved
    ///
    /// Writes only when the guard scan proposes a change. Returns whether a
    /// write happened.
    pub fn reconcile_layouts(&mut self) -> bool {
        if !self.reserve_settings_space() {
            return false;
        }
        match layout::reconcile_settings_guard(self.layouts.get()) {
            Some(next) => {
                self.layouts.set(&mut self.store, next);
                self.notify(Field::Layouts);
                true
            }
            None => false,
        }
    }

    pub fn update_active_widgets(&mut self, f: impl FnOnce(&ActiveWidgets) -> ActiveWidgets) {
        self.active_widgets.update(&mut self.store, f);
        self.notify(Field::ActiveWidgets);
    }

    pub fn update_custom_themes(
        &mut self,
        f: impl FnOnce(&BTreeMap<String, Theme>) -> BTreeMap<String, Theme>,
    ) {
        self.custom_themes.update(&mut self.store, f);
        self.notify(Field::CustomThemes);
    }

    pub fn update_presets(&mut self, f: impl FnOnce(&Vec<Preset>) -> Vec<Preset>) {
        self.presets.update(&mut self.store, f);
        self.notify(Field::Presets);
    }
}

macro_rules! sticky_accessors {
    ($($field:ident, $setter:ident: $ty:ty => $variant:ident;)*) => {
        impl<S: KeyValueStore> ConfigRegistry<S> {
            $(
                pub fn $field(&self) -> &$ty {
                    self.$field.get()
                }

                pub fn $setter(&mut self, value: $ty) {
                    self.$field.set(&mut self.store, value);
                    self.notify(Field::$variant);
                }
            )*
        }
    };
}

sticky_accessors! {
    current_theme, set_current_theme: String => CurrentTheme;
    custom_themes, set_custom_themes: BTreeMap<String, Theme> => CustomThemes;
    todos, set_todos: Vec<TodoItem> => Todos;
    link_groups, set_link_groups: Vec<LinkGroup> => LinkGroups;
    custom_css, set_custom_css: String => CustomCss;
    stats_mode, set_stats_mode: StatsMode => StatsMode;
    weather_mode, set_weather_mode: WeatherMode => WeatherMode;
    temp_unit, set_temp_unit: TempUnit => TempUnit;
    widget_radius, set_widget_radius: u32 => WidgetRadius;
    open_in_new_tab, set_open_in_new_tab: bool => OpenInNewTab;
    show_widget_titles, set_show_widget_titles: bool => ShowWidgetTitles;
    custom_font, set_custom_font: String => CustomFont;
    border_glow, set_border_glow: bool => BorderGlow;
    animated_links, set_animated_links: bool => AnimatedLinks;
    fun_options, set_fun_options: FunOptions => FunOptions;
    market_config, set_market_config: MarketConfig => MarketConfig;
    todoist_config, set_todoist_config: TodoistConfig => TodoistConfig;
    active_widgets, set_active_widgets: ActiveWidgets => ActiveWidgets;
    layout_locked, set_layout_locked: bool => LayoutLocked;
    resizing_enabled, set_resizing_enabled: bool => ResizingEnabled;
    presets, set_presets: Vec<Preset> => Presets;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::grid::SETTINGS_GUARD_KEY;
    use crate::persistence::MemoryStore;
    use crate::types::{Breakpoint, LayoutItem};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_first_load_materializes_every_slot() {
        let registry = ConfigRegistry::load(MemoryStore::new());
        assert_eq!(registry.store().writes(), 23);
        assert_eq!(registry.current_theme(), DEFAULT_THEME);
        assert_eq!(registry.layouts(), &default_layouts());
        assert!(registry.reserve_settings_space());
        assert_eq!(*registry.weather_mode(), WeatherMode::Icon);
        assert_eq!(*registry.stats_mode(), StatsMode::Minimal);
    }

    #[test]
    fn test_second_load_writes_nothing() {
        let first = ConfigRegistry::load(MemoryStore::new());
        let store = first.store().clone();
        let baseline = store.writes();
        let second = ConfigRegistry::load(store);
        assert_eq!(second.store().writes(), baseline);
    }

    #[test]
    fn test_partial_market_config_merges_defaults() {
        let store = MemoryStore::new()
            .with_entry(storage::MARKET_CONFIG, r#"{"symbols":["BTC-USD"],"refreshInterval":30}"#);
        let registry = ConfigRegistry::load(store);
        assert_eq!(registry.market_config().symbols, vec!["BTC-USD".to_string()]);
        assert_eq!(registry.market_config().refresh_interval, 30);
        assert_eq!(registry.market_config().api_key, "");
    }

    #[test]
    fn test_partial_fun_options_keep_per_animation_defaults() {
        let store = MemoryStore::new().with_entry(storage::FUN_OPTIONS, r#"{"starfield":{}}"#);
        let registry = ConfigRegistry::load(store);
        assert_eq!(registry.fun_options().starfield.speed, 25);
        assert_eq!(registry.fun_options().snake.speed, 100);
        assert_eq!(registry.fun_options().matrix.font_size, 16);
    }

    #[test]
    fn test_subscribers_see_each_write() {
        let mut registry = ConfigRegistry::load(MemoryStore::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = registry.subscribe(move |field| sink.borrow_mut().push(field));

        registry.set_temp_unit(TempUnit::F);
        registry.set_widget_radius(8);
        assert_eq!(*seen.borrow(), vec![Field::TempUnit, Field::WidgetRadius]);

        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        registry.set_custom_font("Iosevka".to_string());
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_setting_layouts_reinstates_guard() {
        let mut registry = ConfigRegistry::load(MemoryStore::new());
        let mut layouts = default_layouts();
        layouts.get_mut(Breakpoint::Lg).unwrap().retain(|i| i.key != SETTINGS_GUARD_KEY);
        registry.set_layouts(layouts);

        let guard = registry.layouts().find(Breakpoint::Lg, SETTINGS_GUARD_KEY).unwrap();
        assert_eq!(guard, &LayoutItem::settings_guard(11));
    }

    #[test]
    fn test_guard_left_alone_when_space_not_reserved() {
        let mut registry = ConfigRegistry::load(MemoryStore::new());
        registry.set_reserve_settings_space(false);
        let mut layouts = default_layouts();
        layouts.get_mut(Breakpoint::Md).unwrap().retain(|i| i.key != SETTINGS_GUARD_KEY);
        registry.set_layouts(layouts.clone());
        assert_eq!(registry.layouts(), &layouts);

        registry.set_reserve_settings_space(true);
        assert!(registry.layouts().find(Breakpoint::Md, SETTINGS_GUARD_KEY).is_some());
    }

    #[test]
    fn test_reconcile_without_change_does_not_write() {
        let mut registry = ConfigRegistry::load(MemoryStore::new());
        let mut layouts = default_layouts();
        layouts.insert(Breakpoint::Xs, vec![]);
        registry.set_layouts(layouts);

        let writes = registry.store().writes();
        let snapshot = registry.layouts().clone();
        assert!(!registry.reconcile_layouts());
        assert!(!registry.reconcile_layouts());
        assert_eq!(registry.store().writes(), writes);
        assert_eq!(registry.layouts(), &snapshot);
    }
}
