//! Alien silhouettes and mood rendering.
//!
//! Each customer is drawn with one of four fixed recipes. The exact geometry
//! is decorative; what matters is the mood encoding shared by all of them:
//!
//! | Mood    | Eyes / glow            | Mouth (Blob, EyedHead only) |
//! |---------|------------------------|-----------------------------|
//! | Happy   | [`MOOD_HAPPY`] yellow  | smile (middle below corners) |
//! | Neutral | [`MOOD_NEUTRAL`] cyan  | none                         |
//! | Unhappy | [`MOOD_UNHAPPY`] red   | frown (middle above corners) |
//!
//! Scene y grows downward, so a smile's midpoint has the larger y.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::customer::Mood;
use crate::draw::{Color, Depth, Path, Point, RenderSurface};

/// Eye colour of a happy customer.
pub const MOOD_HAPPY: Color = Color::rgb(1.0, 0.92, 0.1);
/// Eye colour of a customer with no verdict yet.
pub const MOOD_NEUTRAL: Color = Color::rgb(0.55, 0.95, 1.0);
/// Eye colour of an unhappy customer.
pub const MOOD_UNHAPPY: Color = Color::rgb(1.0, 0.15, 0.12);

/// Stroke colour of every mouth.
pub const MOUTH_COLOR: Color = Color::rgb(0.08, 0.05, 0.12);

const MOUTH_SEGMENTS: usize = 8;

const BLOB_BODY: Color = Color::rgb(0.35, 0.8, 0.4);
const TENTACLE_BODY: Color = Color::rgb(0.62, 0.36, 0.85);
const HEAD_BODY: Color = Color::rgb(0.95, 0.55, 0.3);
const CRYSTAL_BODY: Color = Color::rgb(0.45, 0.7, 0.95);
const CRYSTAL_FACET: Color = Color::rgba(1.0, 1.0, 1.0, 0.55);
const SCLERA: Color = Color::WHITE;

/// Colour that encodes `mood` on eyes and glows.
pub fn mood_color(mood: Mood) -> Color {
    match mood {
        Mood::Happy => MOOD_HAPPY,
        Mood::Neutral => MOOD_NEUTRAL,
        Mood::Unhappy => MOOD_UNHAPPY,
    }
}

/// Mouth polyline centred at `center`, or `None` for a neutral mood.
///
/// The curve is a parabola through both corners whose midpoint sits `depth`
/// below (smile) or above (frown) the corners.
pub fn mouth_path(center: Point, half_width: f32, depth: f32, mood: Mood) -> Option<Path> {
    let bend = match mood {
        Mood::Happy => depth,
        Mood::Unhappy => -depth,
        Mood::Neutral => return None,
    };
    let points: Vec<Point> = (0..=MOUTH_SEGMENTS)
        .map(|i| {
            let t = i as f32 / MOUTH_SEGMENTS as f32 * 2.0 - 1.0;
            Point::new(center.x + t * half_width, center.y + bend * (1.0 - t * t))
        })
        .collect();
    Some(Path::polyline(&points))
}

/// The four alien body plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Silhouette {
    Blob,
    Tentacle,
    EyedHead,
    Crystalline,
}

impl Silhouette {
    pub const ALL: [Silhouette; 4] = [
        Silhouette::Blob,
        Silhouette::Tentacle,
        Silhouette::EyedHead,
        Silhouette::Crystalline,
    ];

    /// Whether this recipe draws a mouth for non-neutral moods.
    pub fn has_mouth(self) -> bool {
        matches!(self, Silhouette::Blob | Silhouette::EyedHead)
    }

    /// Draw the silhouette centred on `at`. `phase` drives secondary
    /// animation (tentacle wave, glow pulse).
    pub fn draw<S: RenderSurface + ?Sized>(self, surface: &mut S, at: Point, mood: Mood, phase: f32) {
        match self {
            Silhouette::Blob => draw_blob(surface, at, mood),
            Silhouette::Tentacle => draw_tentacle(surface, at, mood, phase),
            Silhouette::EyedHead => draw_eyed_head(surface, at, mood),
            Silhouette::Crystalline => draw_crystalline(surface, at, mood, phase),
        }
    }
}

fn draw_eye<S: RenderSurface + ?Sized>(surface: &mut S, at: Point, radius: f32, mood: Mood) {
    let d = Depth::CUSTOMERS;
    surface.fill_circle(d, at, radius, SCLERA);
    surface.fill_circle(d, at, radius * 0.55, mood_color(mood));
}

fn draw_mouth<S: RenderSurface + ?Sized>(surface: &mut S, at: Point, half_width: f32, mood: Mood) {
    if let Some(path) = mouth_path(at, half_width, half_width * 0.45, mood) {
        surface.stroke_path(Depth::CUSTOMERS, path, MOUTH_COLOR, 2.5);
    }
}

fn draw_blob<S: RenderSurface + ?Sized>(surface: &mut S, at: Point, mood: Mood) {
    let d = Depth::CUSTOMERS;
    surface.fill_ellipse(d, at, 28.0, 32.0, BLOB_BODY);
    surface.stroke_ellipse(d, at, 28.0, 32.0, BLOB_BODY.with_alpha(0.5), 3.0);
    draw_eye(surface, at.offset(-10.0, -10.0), 7.0, mood);
    draw_eye(surface, at.offset(10.0, -10.0), 7.0, mood);
    draw_mouth(surface, at.offset(0.0, 10.0), 10.0, mood);
}

fn draw_tentacle<S: RenderSurface + ?Sized>(surface: &mut S, at: Point, mood: Mood, phase: f32) {
    let d = Depth::CUSTOMERS;
    // Tentacles first so the mantle covers their roots.
    for i in 0..4 {
        let root = at.offset(-15.0 + i as f32 * 10.0, 14.0);
        let wiggle = phase + i as f32 * PI * 0.5;
        let points: Vec<Point> = (0..5)
            .map(|k| {
                let k = k as f32;
                root.offset((wiggle + k * 0.9).sin() * 3.0 * k * 0.5, k * 7.0)
            })
            .collect();
        surface.stroke_path(d, Path::polyline(&points), TENTACLE_BODY, 4.0);
    }
    surface.fill_ellipse(d, at, 24.0, 22.0, TENTACLE_BODY);
    // One large glowing eye.
    surface.fill_circle(d, at.offset(0.0, -4.0), 12.0, mood_color(mood).with_alpha(0.35));
    draw_eye(surface, at.offset(0.0, -4.0), 8.0, mood);
}

fn draw_eyed_head<S: RenderSurface + ?Sized>(surface: &mut S, at: Point, mood: Mood) {
    let d = Depth::CUSTOMERS;
    let stalk_color = HEAD_BODY.with_alpha(0.9);
    for dx in [-14.0_f32, 0.0, 14.0] {
        let base = at.offset(dx * 0.6, -22.0);
        let tip = at.offset(dx, -44.0);
        surface.line(d, base, tip, stalk_color, 3.0);
        draw_eye(surface, tip, 6.0, mood);
    }
    surface.fill_circle(d, at, 26.0, HEAD_BODY);
    draw_mouth(surface, at.offset(0.0, 6.0), 12.0, mood);
}

fn draw_crystalline<S: RenderSurface + ?Sized>(surface: &mut S, at: Point, mood: Mood, phase: f32) {
    let d = Depth::CUSTOMERS;
    let top = at.offset(0.0, -36.0);
    let right = at.offset(22.0, 0.0);
    let bottom = at.offset(0.0, 34.0);
    let left = at.offset(-22.0, 0.0);
    surface.fill_path(d, Path::polygon(&[top, right, bottom, left]), CRYSTAL_BODY);
    surface.line(d, top, bottom, CRYSTAL_FACET, 1.5);
    surface.line(d, left, right, CRYSTAL_FACET, 1.5);
    // Pulsing core glow.
    let pulse = 0.5 + 0.5 * (phase * 2.0).sin();
    let core = mood_color(mood);
    surface.fill_circle(d, at, 10.0 + 3.0 * pulse, core.with_alpha(0.3 + 0.3 * pulse));
    surface.fill_circle(d, at, 6.0, core);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
