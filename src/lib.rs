#![forbid(unsafe_code)]
//! State and layout engine for a customizable start-page dashboard
//!
//! [`Dashboard`] owns the [`ConfigRegistry`](config::ConfigRegistry), whose
//! settings are each persisted under their own slot of a [`KeyValueStore`].
//! Widget lifecycle and preset operations keep the responsive grid layouts
//! consistent with widget visibility.

pub mod config;
pub mod constants;
pub mod dashboard;
pub mod layout;
pub mod migrate;
pub mod persistence;
pub mod preset;
pub mod theme;
pub mod types;
pub mod widgets;

pub use dashboard::Dashboard;
pub use persistence::{FileStore, KeyValueStore, MemoryStore};
pub use preset::{Preset, PresetData};
