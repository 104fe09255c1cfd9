//! Turning scene draw lists into pixels.
//!
//! [`tessellate`] and [`camera`] are plain math and always compiled, so the
//! geometry can be tested without a GPU. The wgpu renderer and the winit
//! window runner are feature-gated behind `renderer`.

pub mod camera;
pub mod tessellate;

#[cfg(feature = "renderer")]
pub mod app;
#[cfg(feature = "renderer")]
pub mod renderer;

pub use camera::Camera2D;
pub use tessellate::{tessellate, Vertex};

#[cfg(feature = "renderer")]
pub use app::run_windowed;
#[cfg(feature = "renderer")]
pub use renderer::SceneRenderer;
