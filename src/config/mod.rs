//! Configuration state for the dashboard
//!
//! - **sticky**: write-through cache of one storage slot
//! - **defaults**: compiled-in layouts, activation map and links
//! - **registry**: every persisted setting behind typed accessors

pub mod defaults;
pub mod registry;
pub mod sticky;

pub use registry::{ConfigRegistry, Field, SubscriptionId};
pub use sticky::StickyCell;
