//! Diner scenery: space sky, porthole wall, conveyor belt and finish line.
//!
//! Nothing here has state beyond its config. Star positions are regenerated
//! every frame from the same seed, so the sky never shifts, and the animated
//! parts (twinkle, belt stripes, roller spokes) are pure functions of the
//! frame number.

use std::f32::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::BackdropConfig;
use crate::draw::{Color, Depth, Path, Point, RenderSurface};

const SPACE: Color = Color::rgb(0.03, 0.02, 0.09);
const STAR: Color = Color::rgb(0.95, 0.95, 1.0);
const WALL: Color = Color::rgb(0.2, 0.22, 0.28);
const WALL_SEAM: Color = Color::rgb(0.15, 0.16, 0.2);
const WINDOW_GLASS: Color = Color::rgb(0.05, 0.04, 0.16);
const WINDOW_RIM: Color = Color::rgb(0.55, 0.58, 0.66);
const GLINT: Color = Color::rgba(1.0, 1.0, 1.0, 0.35);
const BELT: Color = Color::rgb(0.16, 0.16, 0.18);
const BELT_STRIPE: Color = Color::rgb(0.28, 0.28, 0.3);
const ROLLER: Color = Color::rgb(0.45, 0.45, 0.5);
const ROLLER_SPOKE: Color = Color::rgb(0.25, 0.25, 0.28);

/// Horizontal distance between belt stripes.
pub const STRIPE_SPACING: f32 = 24.0;
/// Edge length of one finish-line chequer.
pub const CHEQUER: f32 = 9.0;

/// A star placed by the seeded scatter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub at: Point,
    pub radius: f32,
    /// Offset into the twinkle cycle so stars don't pulse in unison.
    pub twinkle_phase: f32,
}

/// Static and animated scenery for one diner.
#[derive(Debug, Clone)]
pub struct Backdrop {
    config: BackdropConfig,
}

impl Backdrop {
    pub fn new(config: BackdropConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BackdropConfig {
        &self.config
    }

    /// Star scatter for this backdrop's seed. Stars fill the area above the
    /// conveyor belt.
    pub fn stars(&self) -> Vec<Star> {
        let mut rng = Pcg32::seed_from_u64(self.config.star_seed);
        let sky_bottom = self.config.belt_y.max(1.0);
        (0..self.config.star_count)
            .map(|_| Star {
                at: Point::new(
                    rng.gen_range(0.0..self.config.width),
                    rng.gen_range(0.0..sky_bottom),
                ),
                radius: rng.gen_range(0.6..1.8),
                twinkle_phase: rng.gen_range(0.0..TAU),
            })
            .collect()
    }

    /// Centres of the porthole windows, evenly spaced across the width.
    pub fn window_centers(&self) -> Vec<Point> {
        let n = self.config.window_count;
        let step = self.config.width / (n as f32 + 1.0);
        (1..=n)
            .map(|i| Point::new(step * i as f32, self.config.window_y))
            .collect()
    }

    /// Belt stripe scroll at `frame`, in `[0, STRIPE_SPACING)`.
    pub fn stripe_offset(&self, frame: u64) -> f32 {
        let travelled = frame as f64 * f64::from(self.config.belt_speed);
        let offset = travelled.rem_euclid(f64::from(STRIPE_SPACING)) as f32;
        // Rounding to f32 can land exactly on the spacing.
        if offset >= STRIPE_SPACING {
            0.0
        } else {
            offset
        }
    }

    /// Draw the full backdrop for `frame`.
    pub fn render<S: RenderSurface + ?Sized>(&self, surface: &mut S, frame: u64) {
        self.render_sky(surface, frame);
        self.render_wall(surface);
        self.render_conveyor(surface, frame);
        self.render_finish_line(surface);
    }

    fn render_sky<S: RenderSurface + ?Sized>(&self, surface: &mut S, frame: u64) {
        let c = &self.config;
        surface.fill_path(Depth::SKY, rect(0.0, 0.0, c.width, c.height), SPACE);
        let t = (frame % 100_000) as f32 * 0.05;
        for star in self.stars() {
            let alpha = 0.6 + 0.4 * (t + star.twinkle_phase).sin();
            surface.fill_circle(Depth::SKY, star.at, star.radius, STAR.with_alpha(alpha));
        }
    }

    fn render_wall<S: RenderSurface + ?Sized>(&self, surface: &mut S) {
        let c = &self.config;
        let d = Depth::WALL;
        let wall_top = (c.window_y + c.window_radius + 24.0).min(c.belt_y);
        surface.fill_path(d, rect(0.0, wall_top, c.width, c.belt_y - wall_top), WALL);
        surface.line(d, Point::new(0.0, wall_top), Point::new(c.width, wall_top), WALL_SEAM, 3.0);

        for center in self.window_centers() {
            let r = c.window_radius;
            surface.fill_circle(d, center, r, WINDOW_GLASS);
            surface.stroke_circle(d, center, r, WINDOW_RIM, 6.0);
            surface.line(
                d,
                center.offset(-r * 0.5, -r * 0.2),
                center.offset(-r * 0.2, -r * 0.5),
                GLINT,
                3.0,
            );
        }
    }

    fn render_conveyor<S: RenderSurface + ?Sized>(&self, surface: &mut S, frame: u64) {
        let c = &self.config;
        let d = Depth::CONVEYOR;
        let (top, h) = (c.belt_y, c.belt_height);
        surface.fill_path(d, rect(0.0, top, c.width, h), BELT);

        let mut x = self.stripe_offset(frame) - STRIPE_SPACING;
        while x < c.width {
            let from = Point::new(x.max(0.0), top + 4.0);
            let to = Point::new((x + 10.0).min(c.width), top + h - 4.0);
            if from.x < to.x {
                surface.line(d, from, to, BELT_STRIPE, 3.0);
            }
            x += STRIPE_SPACING;
        }

        if c.roller_count > 0 {
            let step = c.width / c.roller_count as f32;
            let radius = h * 0.3;
            let spin = (frame % 100_000) as f32 * c.belt_speed / radius.max(1.0);
            for i in 0..c.roller_count {
                let center = Point::new(step * (i as f32 + 0.5), top + h);
                surface.fill_circle(d, center, radius, ROLLER);
                let spoke = Point::new(center.x + radius * spin.cos(), center.y + radius * spin.sin());
                surface.line(d, center, spoke, ROLLER_SPOKE, 2.0);
            }
        }
    }

    fn render_finish_line<S: RenderSurface + ?Sized>(&self, surface: &mut S) {
        let c = &self.config;
        let rows = (c.belt_height / CHEQUER).ceil() as usize;
        for row in 0..rows {
            let y = c.belt_y + row as f32 * CHEQUER;
            let h = CHEQUER.min(c.belt_y + c.belt_height - y);
            for col in 0..2 {
                let color = if (row + col) % 2 == 0 {
                    Color::WHITE
                } else {
                    Color::BLACK
                };
                let x = c.finish_x - CHEQUER + col as f32 * CHEQUER;
                surface.fill_path(Depth::FINISH_LINE, rect(x, y, CHEQUER, h), color);
            }
        }
    }
}

fn rect(x: f32, y: f32, w: f32, h: f32) -> Path {
    Path::polygon(&[
        Point::new(x, y),
        Point::new(x + w, y),
        Point::new(x + w, y + h),
        Point::new(x, y + h),
    ])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
