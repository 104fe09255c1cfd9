//! Fixed-timestep frame loop driving the diner scene.
//!
//! The [`FrameLoop`] is the host the scene crate expects: it owns the
//! customer manager, the backdrop and a [`TrayBoard`], and each frame:
//!
//! 1. Advances every customer by one step against the current tray flags.
//! 2. Drops finished trays nobody is waiting on any more.
//! 3. Clears the draw list and redraws the backdrop and all customers
//!    (skipped in headless mode).
//! 4. Advances the frame counter.
//!
//! Customer motion is defined per frame, so wall-clock time is converted to
//! whole frames by [`advance`](FrameLoop::advance), which accumulates `dt`
//! and runs as many fixed steps as fit.
//!
//! # Example
//!
//! ```
//! use stardine_engine::frame::{FrameConfig, FrameLoop};
//! use stardine_scene::config::SceneConfig;
//!
//! let mut frames = FrameLoop::new(SceneConfig::default(), 7, FrameConfig::default());
//! let (tray, _customer) = frames.spawn_customer().unwrap();
//!
//! for _ in 0..10 {
//!     frames.step();
//! }
//! frames.trays_mut().finish(tray, true);
//! let report = frames.step();
//!
//! assert_eq!(report.departed.len(), 1);
//! assert_eq!(frames.frame_count(), 11);
//! ```

use std::collections::HashSet;
use std::time::{Duration, Instant};

use stardine_scene::backdrop::Backdrop;
use stardine_scene::config::SceneConfig;
use stardine_scene::customer::CustomerId;
use stardine_scene::draw::{DrawList, RenderSurface};
use stardine_scene::lifecycle::{CustomerLifecycleManager, FrameReport};
use stardine_scene::tray::{TrayBoard, TrayId};
use tracing::{debug, warn};

use crate::snapshot::SceneSnapshot;

// ---------------------------------------------------------------------------
// FrameConfig
// ---------------------------------------------------------------------------

/// Configuration for the fixed-timestep frame loop.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Fixed time step in seconds per frame. Must be positive and finite.
    pub fixed_dt: f64,
    /// Upper bound on frames run by one [`FrameLoop::advance`] call, so a
    /// long stall does not trigger a burst of catch-up frames.
    pub max_catch_up: u32,
    /// Headless mode: simulate customers but never build draw lists.
    pub headless: bool,
}

impl Default for FrameConfig {
    /// Defaults to 60 Hz, at most 5 catch-up frames, headless off.
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_catch_up: 5,
            headless: false,
        }
    }
}

// ---------------------------------------------------------------------------
// FrameDiagnostics
// ---------------------------------------------------------------------------

/// Timing and size diagnostics for the last frame.
#[derive(Debug, Clone, Default)]
pub struct FrameDiagnostics {
    /// Time spent in the customer update.
    pub update_time: Duration,
    /// Time spent rebuilding the draw list.
    pub render_time: Duration,
    /// Total time for the frame.
    pub total_time: Duration,
    /// Commands in the rebuilt draw list (0 when headless).
    pub draw_commands: usize,
    /// Customers on screen after the frame.
    pub customers: usize,
    /// Customers removed at the exit this frame.
    pub removed: usize,
}

// ---------------------------------------------------------------------------
// FrameLoop
// ---------------------------------------------------------------------------

/// The deterministic frame loop hosting one diner scene.
///
/// Given the same scene config, seed, and sequence of host calls (spawns and
/// tray changes between frames), the loop produces identical customers and
/// draw lists across runs.
pub struct FrameLoop {
    customers: CustomerLifecycleManager,
    backdrop: Backdrop,
    trays: TrayBoard,
    draw_list: DrawList,
    frame_counter: u64,
    fixed_dt: f64,
    /// Unspent wall time carried between `advance` calls.
    accumulator: f64,
    config: FrameConfig,
    last_diagnostics: FrameDiagnostics,
}

impl FrameLoop {
    /// Create a frame loop for `scene`, seeding customer randomness with
    /// `seed`.
    ///
    /// # Panics
    ///
    /// Panics if `config.fixed_dt` is not positive and finite.
    pub fn new(scene: SceneConfig, seed: u64, config: FrameConfig) -> Self {
        let SceneConfig {
            customers,
            backdrop,
        } = scene;
        Self::from_parts(
            CustomerLifecycleManager::new(customers, seed),
            Backdrop::new(backdrop),
            config,
        )
    }

    /// Create a frame loop around an existing manager and backdrop.
    ///
    /// # Panics
    ///
    /// Panics if `config.fixed_dt` is not positive and finite.
    pub fn from_parts(
        customers: CustomerLifecycleManager,
        backdrop: Backdrop,
        config: FrameConfig,
    ) -> Self {
        assert!(
            config.fixed_dt > 0.0 && config.fixed_dt.is_finite(),
            "fixed_dt must be positive and finite, got {}",
            config.fixed_dt
        );
        Self {
            customers,
            backdrop,
            trays: TrayBoard::new(),
            draw_list: DrawList::new(),
            frame_counter: 0,
            fixed_dt: config.fixed_dt,
            accumulator: 0.0,
            config,
            last_diagnostics: FrameDiagnostics::default(),
        }
    }

    /// Open a tray and spawn a customer waiting on it, if there is room on
    /// screen.
    pub fn spawn_customer(&mut self) -> Option<(TrayId, CustomerId)> {
        if !self.customers.has_room() {
            debug!(
                on_screen = self.customers.len(),
                "spawn skipped: diner is full"
            );
            return None;
        }
        let tray = self.trays.open();
        let customer = self.customers.spawn(tray);
        Some((tray, customer))
    }

    /// Send the customer waiting on `tray` away early and forget the tray.
    ///
    /// Only a customer standing at the bar can be dismissed. Otherwise
    /// nothing changes and the tray stays open, so the customer still
    /// reacts when the tray finishes; the host may retry on a later frame.
    pub fn dismiss_customer(&mut self, tray: TrayId) -> bool {
        if !self.customers.mark_departing(tray) {
            return false;
        }
        self.trays.close(tray);
        true
    }

    /// Run exactly one frame.
    pub fn step(&mut self) -> FrameReport {
        let frame_start = Instant::now();

        // Phase 1: customers.
        let update_start = Instant::now();
        let report = self.customers.update(&self.trays);
        let update_time = update_start.elapsed();

        // Phase 2: forget finished trays whose customer has gone.
        if !report.removed.is_empty() {
            let waiting: HashSet<TrayId> =
                self.customers.customers().iter().map(|c| c.tray()).collect();
            self.trays
                .retain(|id, status| !status.is_finished() || waiting.contains(&id));
        }

        // Phase 3: redraw.
        let render_start = Instant::now();
        if !self.config.headless {
            self.render_frame();
        }
        let render_time = render_start.elapsed();

        // Phase 4: advance frame counter.
        self.frame_counter += 1;

        self.last_diagnostics = FrameDiagnostics {
            update_time,
            render_time,
            total_time: frame_start.elapsed(),
            draw_commands: self.draw_list.len(),
            customers: self.customers.len(),
            removed: report.removed.len(),
        };

        report
    }

    /// Run `count` frames, merging their reports in order.
    pub fn run_frames(&mut self, count: u64) -> FrameReport {
        let mut merged = FrameReport::default();
        for _ in 0..count {
            let report = self.step();
            merged.arrived.extend(report.arrived);
            merged.departed.extend(report.departed);
            merged.removed.extend(report.removed);
        }
        merged
    }

    /// Feed `dt` seconds of wall time and run every whole frame it covers,
    /// up to [`FrameConfig::max_catch_up`]. Returns the number of frames run.
    ///
    /// Time beyond the catch-up cap is dropped, not deferred.
    pub fn advance(&mut self, dt: f64) -> u32 {
        if !(dt.is_finite() && dt >= 0.0) {
            warn!(dt, "ignoring invalid frame delta");
            return 0;
        }
        self.accumulator += dt;

        let mut ran = 0;
        while self.accumulator >= self.fixed_dt && ran < self.config.max_catch_up {
            self.step();
            self.accumulator -= self.fixed_dt;
            ran += 1;
        }
        if self.accumulator >= self.fixed_dt {
            debug!(
                dropped = self.accumulator,
                "frame loop fell behind; dropping time"
            );
            self.accumulator %= self.fixed_dt;
        }
        ran
    }

    /// Clear the draw list and redraw every layer for the current frame.
    ///
    /// Called by [`step`](Self::step); hosts that mutate the scene between
    /// frames and want to see it immediately can call it directly.
    pub fn render_frame(&mut self) {
        self.draw_list.clear();
        self.backdrop.render(&mut self.draw_list, self.frame_counter);
        self.customers.render(&mut self.draw_list);
    }

    /// Serializable view of the current scene.
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot::capture(self)
    }

    // -- accessors ----------------------------------------------------------

    /// The number of frames executed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_counter
    }

    /// Scene time in seconds.
    ///
    /// Computed as `frame_count * fixed_dt` to avoid floating-point drift
    /// from repeated addition.
    pub fn scene_time(&self) -> f64 {
        self.frame_counter as f64 * self.fixed_dt
    }

    pub fn fixed_dt(&self) -> f64 {
        self.fixed_dt
    }

    pub fn customers(&self) -> &CustomerLifecycleManager {
        &self.customers
    }

    /// Mutable access to the customer manager, e.g. for
    /// [`mark_departing`](CustomerLifecycleManager::mark_departing).
    pub fn customers_mut(&mut self) -> &mut CustomerLifecycleManager {
        &mut self.customers
    }

    pub fn trays(&self) -> &TrayBoard {
        &self.trays
    }

    /// Mutable access to the tray board. Changes take effect on the next
    /// frame.
    pub fn trays_mut(&mut self) -> &mut TrayBoard {
        &mut self.trays
    }

    pub fn backdrop(&self) -> &Backdrop {
        &self.backdrop
    }

    /// The draw list built by the last rendered frame.
    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    pub fn last_diagnostics(&self) -> &FrameDiagnostics {
        &self.last_diagnostics
    }

    pub fn is_headless(&self) -> bool {
        self.config.headless
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
