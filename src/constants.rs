//! Application-wide constants
//!
//! Storage slot names, grid geometry and theme fallbacks live here so the
//! registry, reconciler and CLI agree on a single source of truth.

/// Persisted storage slot names
///
/// A suffix like `-v4` marks an incompatible shape change; data stored under
/// an older suffix is abandoned, not migrated.
pub mod storage {
    pub const THEME: &str = "tui-theme";
    pub const CUSTOM_THEMES: &str = "tui-custom-themes";
    pub const TODOS: &str = "tui-todos";
    pub const LINKS: &str = "tui-links";
    pub const CUSTOM_CSS: &str = "tui-custom-css";
    pub const STATS_MODE: &str = "tui-stats-mode";
    pub const WEATHER_MODE: &str = "tui-weather-mode";
    pub const LAYOUTS: &str = "tui-layouts-v4";
    pub const TEMP_UNIT: &str = "tui-temp-unit";
    pub const WIDGET_RADIUS: &str = "tui-widget-radius";
    pub const OPEN_IN_NEW_TAB: &str = "tui-open-new-tab";
    pub const SHOW_TITLES: &str = "tui-show-titles";
    pub const RESERVE_SETTINGS: &str = "tui-reserve-settings";
    pub const CUSTOM_FONT: &str = "tui-custom-font";
    pub const BORDER_GLOW: &str = "tui-border-glow";
    pub const ANIMATED_LINKS: &str = "tui-animated-links";
    pub const FUN_OPTIONS: &str = "tui-fun-options-v3";
    pub const MARKET_CONFIG: &str = "tui-market-config";
    pub const TODOIST_CONFIG: &str = "tui-todoist-config";
    pub const ACTIVE_WIDGETS: &str = "tui-active-widgets-v4";
    pub const LAYOUT_LOCKED: &str = "tui-layout-locked-v2";
    pub const RESIZING_ENABLED: &str = "tui-resizing-enabled";
    pub const PRESETS: &str = "tui-presets";
}

/// Grid geometry
pub mod grid {
    /// Key of the reserved tile that keeps the settings control uncovered
    pub const SETTINGS_GUARD_KEY: &str = "settings-guard";

    /// Separator between widget type and creation timestamp in extra keys
    pub const EXTRA_KEY_SEPARATOR: char = '-';

    /// Size given to widgets placed by toggle/add
    pub const NEW_ITEM_W: u32 = 2;
    pub const NEW_ITEM_H: u32 = 4;
    pub const NEW_ITEM_MIN_W: u32 = 1;
    pub const NEW_ITEM_MIN_H: u32 = 2;
}

/// Theme selection
pub mod theme {
    /// Built-in theme used at first run and whenever the selection is invalid
    pub const DEFAULT_THEME: &str = "midnight";

    /// Theme that switches the dashboard into its CRT presentation
    pub const CRT_THEME: &str = "crt";
}

/// On-disk store location
pub mod config {
    /// Directory under the platform config dir
    pub const APP_DIR: &str = "tui-startpage";

    /// Storage file name
    pub const FILENAME: &str = "storage.json";

    /// Suffix appended to a store file that failed to parse
    pub const CORRUPT_SUFFIX: &str = "corrupt";
}
