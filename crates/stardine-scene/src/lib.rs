//! Stardine Scene -- alien customers and diner scenery for a 2D serving game.
//!
//! This crate holds the pure, GPU-free half of the diner: the
//! [`CustomerLifecycleManager`](lifecycle::CustomerLifecycleManager) that
//! walks customers in, reacts to their trays and walks them out, the
//! [`Backdrop`](backdrop::Backdrop) scenery, and the [`RenderSurface`]
//! contract both of them paint onto.
//!
//! # Quick Start
//!
//! ```
//! use stardine_scene::prelude::*;
//!
//! let config = SceneConfig::default();
//! let backdrop = Backdrop::new(config.backdrop.clone());
//! let mut customers = CustomerLifecycleManager::new(config.customers.clone(), 1);
//! let mut trays = TrayBoard::new();
//!
//! customers.spawn(trays.open());
//!
//! let mut frame = DrawList::new();
//! for tick in 0..60 {
//!     customers.update(&trays);
//!     frame.clear();
//!     backdrop.render(&mut frame, tick);
//!     customers.render(&mut frame);
//! }
//! assert!(frame.at_depth(Depth::CUSTOMERS).count() > 0);
//! ```
//!
//! [`RenderSurface`]: draw::RenderSurface

#![deny(unsafe_code)]

pub mod backdrop;
pub mod config;
pub mod customer;
pub mod draw;
pub mod lifecycle;
pub mod silhouette;
pub mod tray;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while loading or validating a [`SceneConfig`](config::SceneConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read scene config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The config document is not valid JSON for the expected shape.
    #[error("failed to parse scene config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A random range is inverted or non-finite.
    #[error("range '{field}' is invalid: min {min} must be <= max {max} and both finite")]
    InvalidSpan {
        field: &'static str,
        min: f32,
        max: f32,
    },

    /// A scalar setting is out of bounds.
    #[error("setting '{field}' is invalid: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::backdrop::Backdrop;
    pub use crate::config::{BackdropConfig, CustomerConfig, SceneConfig, Span};
    pub use crate::customer::{Customer, CustomerId, CustomerState, CustomerTraits, Mood};
    pub use crate::draw::{Color, Depth, DrawCommand, DrawList, Paint, Path, Point, RenderSurface, Shape};
    pub use crate::lifecycle::{CustomerLifecycleManager, FrameReport};
    pub use crate::silhouette::{mood_color, Silhouette};
    pub use crate::tray::{OrderTrays, TrayBoard, TrayId, TrayStatus};
    pub use crate::ConfigError;
}
