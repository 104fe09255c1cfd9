//! Windowed application runner for the scene renderer.
//!
//! Provides [`run_windowed`], which takes ownership of a [`FrameLoop`] and
//! drives it inside a winit event loop. Each `RedrawRequested` event feeds
//! the elapsed wall time to [`FrameLoop::advance`], lets the host script
//! react, and renders the latest draw list.

use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{WindowAttributes, WindowId};

use super::camera::Camera2D;
use super::renderer::SceneRenderer;
use crate::frame::FrameLoop;

/// Run the frame loop in a window.
///
/// Blocks until the window is closed. Each redraw:
///
/// 1. Calls `host` so the game layer can spawn customers and update trays.
/// 2. Advances the frame loop by the wall time since the previous redraw.
/// 3. Renders the current draw list.
///
/// # Errors
///
/// Returns an error if the event loop cannot be created or the window or
/// renderer fail to initialize.
pub fn run_windowed<H>(
    frame_loop: FrameLoop,
    host: H,
    window_title: &str,
    width: u32,
    height: u32,
) -> Result<(), anyhow::Error>
where
    H: FnMut(&mut FrameLoop) + 'static,
{
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(winit::event_loop::ControlFlow::Poll);

    let mut app = App {
        state: AppState::Pending {
            frame_loop,
            title: window_title.to_owned(),
            width,
            height,
        },
        host: Box::new(host),
        init_failed: false,
    };

    event_loop.run_app(&mut app)?;

    if app.init_failed {
        return Err(anyhow::anyhow!(
            "failed to initialize windowed renderer (see logs for details)"
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Internal state machine
// ---------------------------------------------------------------------------

/// Window creation must happen inside `ApplicationHandler::resumed`, so the
/// app starts `Pending` and becomes `Running` once the window and renderer
/// exist.
enum AppState {
    Pending {
        frame_loop: FrameLoop,
        title: String,
        width: u32,
        height: u32,
    },
    Running {
        frame_loop: FrameLoop,
        renderer: SceneRenderer,
        last_redraw: Instant,
    },
    /// Placeholder while moving between states.
    Transitioning,
}

struct App {
    state: AppState,
    host: Box<dyn FnMut(&mut FrameLoop)>,
    init_failed: bool,
}

impl App {
    fn fail(&mut self, event_loop: &ActiveEventLoop, frame_loop: FrameLoop, width: u32, height: u32) {
        self.init_failed = true;
        self.state = AppState::Pending {
            frame_loop,
            title: String::new(),
            width,
            height,
        };
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let state = std::mem::replace(&mut self.state, AppState::Transitioning);
        match state {
            AppState::Pending {
                frame_loop,
                title,
                width,
                height,
            } => {
                let window_attrs = WindowAttributes::default()
                    .with_title(title)
                    .with_inner_size(winit::dpi::PhysicalSize::new(width, height));

                let window = match event_loop.create_window(window_attrs) {
                    Ok(window) => Arc::new(window),
                    Err(e) => {
                        tracing::error!(error = %e, "failed to create window; exiting");
                        self.fail(event_loop, frame_loop, width, height);
                        return;
                    }
                };

                let scene = frame_loop.backdrop().config();
                let camera = Camera2D::for_scene(scene.width, scene.height);
                match pollster::block_on(SceneRenderer::new(window.clone(), camera)) {
                    Ok(renderer) => {
                        tracing::info!(width, height, "scene window created");
                        window.request_redraw();
                        self.state = AppState::Running {
                            frame_loop,
                            renderer,
                            last_redraw: Instant::now(),
                        };
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to initialize renderer; exiting");
                        self.fail(event_loop, frame_loop, width, height);
                    }
                }
            }
            running @ AppState::Running { .. } => self.state = running,
            AppState::Transitioning => {
                tracing::warn!("resumed called during state transition");
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let AppState::Running {
            frame_loop,
            renderer,
            last_redraw,
        } = &mut self.state
        else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!(
                    frames = frame_loop.frame_count(),
                    "window close requested; shutting down"
                );
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                tracing::debug!(
                    width = new_size.width,
                    height = new_size.height,
                    "window resized"
                );
                renderer.resize(new_size);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = now.duration_since(*last_redraw).as_secs_f64();
                *last_redraw = now;

                (self.host)(frame_loop);
                frame_loop.advance(dt);

                match renderer.render_frame(frame_loop) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let size = renderer.window().inner_size();
                        renderer.resize(size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        tracing::error!("GPU out of memory; exiting");
                        event_loop.exit();
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "surface error during render");
                    }
                }

                renderer.window().request_redraw();
            }
            _ => {}
        }
    }
}
