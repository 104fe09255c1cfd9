//! Stardine Engine -- frame loop and renderer hosting the diner scene.
//!
//! This crate builds on [`stardine_scene`] to provide the host side of the
//! scene: a fixed-timestep [`FrameLoop`](frame::FrameLoop) that owns the
//! customers, the backdrop and a tray board, advances them once per frame
//! and rebuilds the draw list. The [`render`] module tessellates draw lists
//! into triangles and, with the `renderer` feature, shows them in a wgpu
//! window.
//!
//! # Quick Start
//!
//! ```
//! use stardine_engine::prelude::*;
//!
//! let mut frames = FrameLoop::new(SceneConfig::default(), 42, FrameConfig::default());
//! frames.spawn_customer();
//!
//! frames.run_frames(100);
//! assert_eq!(frames.frame_count(), 100);
//! assert!(!frames.draw_list().is_empty());
//! ```

#![deny(unsafe_code)]

pub mod frame;
pub mod render;
pub mod snapshot;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

/// Re-export the scene crate for convenience.
pub use stardine_scene;

/// Install a `tracing` subscriber that honours `RUST_LOG`, falling back to
/// `default_filter` (e.g. `"warn"` or `"stardine_scene=debug"`).
///
/// Returns an error if a global subscriber is already set.
pub fn init_tracing(default_filter: &str) -> Result<(), anyhow::Error> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    pub use stardine_scene::prelude::*;

    pub use crate::frame::{FrameConfig, FrameDiagnostics, FrameLoop};
    pub use crate::render::{tessellate, Camera2D, Vertex};
    pub use crate::snapshot::SceneSnapshot;

    #[cfg(feature = "renderer")]
    pub use crate::render::{run_windowed, SceneRenderer};
}
