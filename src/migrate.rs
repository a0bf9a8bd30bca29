//! One-shot corrective rewrites of retired stored values
//!
//! No schema version is tracked. Each migration detects the retired value
//! itself and rewrites it, so the list is safe to run on every load and
//! order among entries does not matter.

use tracing::info;

use crate::config::ConfigRegistry;
use crate::persistence::KeyValueStore;
use crate::types::WeatherMode;

pub struct Migration<S: KeyValueStore> {
    pub name: &'static str,
    applies: fn(&ConfigRegistry<S>) -> bool,
    rewrite: fn(&mut ConfigRegistry<S>),
}

pub fn migrations<S: KeyValueStore>() -> Vec<Migration<S>> {
    vec![
        Migration {
            name: "theme-vss-to-crt",
            applies: |config| config.current_theme() == "vss",
            rewrite: |config| config.set_current_theme("crt".to_string()),
        },
        Migration {
            name: "theme-lavander-to-lavender",
            applies: |config| config.current_theme() == "lavander",
            rewrite: |config| config.set_current_theme("lavender".to_string()),
        },
        Migration {
            name: "weather-ascii-to-icon",
            applies: |config| *config.weather_mode() == WeatherMode::Ascii,
            rewrite: |config| config.set_weather_mode(WeatherMode::Icon),
        },
    ]
}

/// Apply every migration whose retired value is present; returns their names
pub fn run<S: KeyValueStore>(config: &mut ConfigRegistry<S>) -> Vec<&'static str> {
    let mut applied = Vec::new();
    for migration in migrations::<S>() {
        if (migration.applies)(config) {
            (migration.rewrite)(config);
            info!(migration = migration.name, "Migrated legacy value");
            applied.push(migration.name);
        }
    }
    applied
}
