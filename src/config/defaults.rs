//! Factory defaults shipped with the dashboard
//!
//! Only `lg`, `md` and `sm` ship placements; smaller tiers start absent.

use crate::types::{ActiveWidgets, Breakpoint, LayoutItem, Layouts, Link, LinkGroup};

/// Compiled-in grid placements
pub fn default_layouts() -> Layouts {
    let mut layouts = Layouts::default();

    layouts.insert(
        Breakpoint::Lg,
        vec![
            LayoutItem::settings_guard(11),
            LayoutItem::new("search", 2, 0, 7, 2, 1, 2),
            LayoutItem::new("datetime", 6, 2, 3, 3, 1, 2),
            LayoutItem::new("stats", 5, 2, 1, 3, 1, 2),
            LayoutItem::new("weather", 2, 2, 3, 9, 1, 2),
            LayoutItem::new("todo", 5, 5, 4, 6, 1, 2),
            LayoutItem::new("links", 2, 11, 7, 5, 1, 2),
            LayoutItem::new("snake", 2, 16, 7, 2, 1, 2),
        ],
    );

    layouts.insert(
        Breakpoint::Md,
        vec![
            LayoutItem::new("search", 0, 0, 11, 2, 2, 2),
            LayoutItem::settings_guard(11),
            LayoutItem::new("datetime", 0, 2, 8, 4, 2, 2),
            LayoutItem::new("stats", 8, 2, 4, 4, 2, 2),
            LayoutItem::new("weather", 0, 6, 4, 6, 2, 2),
            LayoutItem::new("todo", 4, 6, 8, 6, 2, 2),
            LayoutItem::new("links", 0, 12, 12, 4, 2, 2),
            LayoutItem::new("snake", 0, 44, 2, 4, 1, 2),
        ],
    );

    layouts.insert(
        Breakpoint::Sm,
        vec![
            LayoutItem::settings_guard(5),
            LayoutItem::new("search", 0, 0, 5, 2, 2, 2),
            LayoutItem::new("datetime", 0, 2, 6, 4, 2, 2),
            LayoutItem::new("stats", 0, 6, 6, 3, 2, 2),
            LayoutItem::new("weather", 0, 9, 6, 4, 2, 2),
            LayoutItem::new("todo", 0, 13, 6, 5, 2, 2),
            LayoutItem::new("links", 0, 18, 6, 4, 2, 2),
            LayoutItem::new("snake", 0, 22, 2, 4, 1, 2),
        ],
    );

    layouts
}

/// Built-in widgets and whether each is shown on first run
const DEFAULT_ACTIVATION: &[(&str, bool)] = &[
    ("search", true),
    ("datetime", true),
    ("stats", true),
    ("weather", true),
    ("todo", true),
    ("links", true),
    ("donut", false),
    ("matrix", false),
    ("pipes", false),
    ("snake", true),
    ("life", false),
    ("fireworks", false),
    ("starfield", false),
    ("rain", false),
    ("maze", false),
    ("market", false),
];

pub fn default_active_widgets() -> ActiveWidgets {
    DEFAULT_ACTIVATION
        .iter()
        .map(|(key, active)| (key.to_string(), *active))
        .collect()
}

/// Whether `key` is one of the built-in widget keys
pub fn is_builtin_widget(key: &str) -> bool {
    DEFAULT_ACTIVATION.iter().any(|(builtin, _)| *builtin == key)
}

fn link(label: &str, url: &str) -> Link {
    Link {
        label: label.to_string(),
        url: url.to_string(),
        icon: None,
    }
}

pub fn default_link_groups() -> Vec<LinkGroup> {
    vec![
        LinkGroup {
            category: "dev".to_string(),
            links: vec![
                link("github", "https://github.com"),
                link("crates", "https://crates.io"),
                link("docs.rs", "https://docs.rs"),
            ],
        },
        LinkGroup {
            category: "news".to_string(),
            links: vec![
                link("hn", "https://news.ycombinator.com"),
                link("lobsters", "https://lobste.rs"),
            ],
        },
        LinkGroup {
            category: "media".to_string(),
            links: vec![
                link("youtube", "https://youtube.com"),
                link("reddit", "https://reddit.com"),
            ],
        },
    ]
}
