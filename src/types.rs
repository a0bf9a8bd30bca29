//! Shared data model: widget keys, grid placement, themes and option bundles
//!
//! Every persisted struct carries `#[serde(default)]` so a stored value that
//! predates a field still loads, with the missing field taken from `Default`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::grid::{EXTRA_KEY_SEPARATOR, SETTINGS_GUARD_KEY};

/// Visibility of every widget instance, keyed by widget key
pub type ActiveWidgets = BTreeMap<String, bool>;

/// Whether `key` names a user-duplicated widget (`{type}-{timestamp}`)
pub fn is_extra_key(key: &str) -> bool {
    key.contains(EXTRA_KEY_SEPARATOR)
}

/// Build the key for a duplicated widget of `widget_type` created at `created_ms`
pub fn extra_key(widget_type: &str, created_ms: u64) -> String {
    format!("{widget_type}{EXTRA_KEY_SEPARATOR}{created_ms}")
}

/// Responsive grid-width tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Breakpoint {
    Lg,
    Md,
    Sm,
    Xs,
    Xxs,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 5] = [
        Breakpoint::Lg,
        Breakpoint::Md,
        Breakpoint::Sm,
        Breakpoint::Xs,
        Breakpoint::Xxs,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Breakpoint::Lg => "lg",
            Breakpoint::Md => "md",
            Breakpoint::Sm => "sm",
            Breakpoint::Xs => "xs",
            Breakpoint::Xxs => "xxs",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|bp| bp.as_str() == name)
    }

    /// Column the settings guard is pinned to in this tier
    pub fn guard_column(self) -> u32 {
        match self {
            Breakpoint::Lg | Breakpoint::Md => 11,
            Breakpoint::Sm => 5,
            Breakpoint::Xs => 3,
            Breakpoint::Xxs => 1,
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One placed widget in one breakpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutItem {
    #[serde(rename = "i")]
    pub key: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    #[serde(rename = "minW", default, skip_serializing_if = "Option::is_none")]
    pub min_w: Option<u32>,
    #[serde(rename = "minH", default, skip_serializing_if = "Option::is_none")]
    pub min_h: Option<u32>,
    #[serde(rename = "static", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_static: bool,
}

impl LayoutItem {
    /// Movable, resizable item
    pub fn new(key: &str, x: u32, y: u32, w: u32, h: u32, min_w: u32, min_h: u32) -> Self {
        Self {
            key: key.to_string(),
            x,
            y,
            w,
            h,
            min_w: Some(min_w),
            min_h: Some(min_h),
            is_static: false,
        }
    }

    /// The immovable 1x1 settings guard pinned at `column`, row 0
    pub fn settings_guard(column: u32) -> Self {
        Self {
            key: SETTINGS_GUARD_KEY.to_string(),
            x: column,
            y: 0,
            w: 1,
            h: 1,
            min_w: None,
            min_h: None,
            is_static: true,
        }
    }

    /// First row below this item
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }
}

/// Placement lists keyed by breakpoint name
///
/// Keys are kept as strings so stored layouts naming a tier this build does
/// not know about survive a load/save cycle untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layouts(pub BTreeMap<String, Vec<LayoutItem>>);

impl Layouts {
    pub fn get(&self, breakpoint: Breakpoint) -> Option<&Vec<LayoutItem>> {
        self.0.get(breakpoint.as_str())
    }

    pub fn get_mut(&mut self, breakpoint: Breakpoint) -> Option<&mut Vec<LayoutItem>> {
        self.0.get_mut(breakpoint.as_str())
    }

    pub fn insert(&mut self, breakpoint: Breakpoint, items: Vec<LayoutItem>) {
        self.0.insert(breakpoint.as_str().to_string(), items);
    }

    /// Find the item for `key` in `breakpoint`
    pub fn find(&self, breakpoint: Breakpoint, key: &str) -> Option<&LayoutItem> {
        self.get(breakpoint)?.iter().find(|item| item.key == key)
    }

    /// Whether any breakpoint places `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.values().any(|items| items.iter().any(|item| item.key == key))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub muted: String,
    pub border: String,
    pub accent: String,
    pub hover: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TodoId {
    Number(u64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: TodoId,
    pub text: String,
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkGroup {
    pub category: String,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsMode {
    Text,
    Graph,
    Detailed,
    #[default]
    Minimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherMode {
    Standard,
    #[default]
    Icon,
    /// Retired ASCII-art mode, rewritten to `Icon` on load
    Ascii,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TempUnit {
    #[default]
    C,
    F,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatrixCharSet {
    Numbers,
    Latin,
    #[default]
    Mixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatrixOptions {
    pub speed: u32,
    pub fade: f64,
    pub char_set: MatrixCharSet,
    pub char_flux: u32,
    pub glow: bool,
    pub font_size: u32,
}

impl Default for MatrixOptions {
    fn default() -> Self {
        Self {
            speed: 50,
            fade: 0.05,
            char_set: MatrixCharSet::Mixed,
            char_flux: 30,
            glow: true,
            font_size: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipesOptions {
    pub speed: u32,
    pub fade: f64,
    pub count: u32,
    pub font_size: u32,
    pub lifetime: u32,
}

impl Default for PipesOptions {
    fn default() -> Self {
        Self {
            speed: 50,
            fade: 0.1,
            count: 5,
            font_size: 16,
            lifetime: 80,
        }
    }
}

/// Declares an animation bundle with a single speed knob and its own default
macro_rules! speed_options {
    ($($name:ident => $speed:expr),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
            #[serde(default)]
            pub struct $name {
                pub speed: u32,
            }

            impl Default for $name {
                fn default() -> Self {
                    Self { speed: $speed }
                }
            }
        )*
    };
}

speed_options! {
    DonutOptions => 50,
    SnakeOptions => 100,
    LifeOptions => 50,
    StarfieldOptions => 25,
    RainOptions => 48,
    MazeOptions => 50,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FireworksOptions {
    pub speed: u32,
    pub explosion_size: u32,
}

impl Default for FireworksOptions {
    fn default() -> Self {
        Self {
            speed: 50,
            explosion_size: 50,
        }
    }
}

/// Per-animation option bundles for the decorative widgets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunOptions {
    pub matrix: MatrixOptions,
    pub pipes: PipesOptions,
    pub donut: DonutOptions,
    pub snake: SnakeOptions,
    pub life: LifeOptions,
    pub fireworks: FireworksOptions,
    pub starfield: StarfieldOptions,
    pub rain: RainOptions,
    pub maze: MazeOptions,
}

impl Default for FunOptions {
    fn default() -> Self {
        Self {
            matrix: MatrixOptions::default(),
            pipes: PipesOptions::default(),
            donut: DonutOptions::default(),
            snake: SnakeOptions::default(),
            life: LifeOptions::default(),
            fireworks: FireworksOptions::default(),
            starfield: StarfieldOptions::default(),
            rain: RainOptions::default(),
            maze: MazeOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketProvider {
    #[default]
    Yahoo,
    Finnhub,
    Twelvedata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarketConfig {
    pub symbols: Vec<String>,
    /// Seconds between quote refreshes
    pub refresh_interval: u32,
    pub provider: MarketProvider,
    pub api_key: String,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            symbols: ["DX-Y.NYB", "^IXIC", "^FTSE", "000001.SS", "^HSI", "GC=F", "CL=F"]
                .into_iter()
                .map(String::from)
                .collect(),
            refresh_interval: 60,
            provider: MarketProvider::Yahoo,
            api_key: String::new(),
        }
    }
}

/// Hosted todo-service integration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TodoistConfig {
    pub api_key: String,
    pub enabled: bool,
}
