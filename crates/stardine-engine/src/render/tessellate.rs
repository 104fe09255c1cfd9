//! Triangle tessellation of recorded draw lists.
//!
//! The GPU only draws triangle lists. [`tessellate`] turns a
//! [`DrawList`] into one flat vertex buffer in paint order (ascending depth,
//! submission order within a depth), so later vertices overdraw earlier ones
//! without a depth buffer.
//!
//! - Ellipses and circles become fans of [`ELLIPSE_SEGMENTS`] triangles.
//! - Filled paths become a fan per subpath. Fans are exact for convex
//!   outlines, which is all the scene draws.
//! - Strokes and lines become one quad per segment.
//!
//! This module is pure math and does not need the `renderer` feature.

use std::f32::consts::TAU;

use stardine_scene::draw::{Color, DrawCommand, DrawList, Paint, Point, Shape};

/// Segments used to approximate ellipses and circles.
pub const ELLIPSE_SEGMENTS: usize = 32;

/// A single vertex with 2D position and RGBA color, sent to the GPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "renderer",
    derive(bytemuck_derive::Pod, bytemuck_derive::Zeroable)
)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    #[inline]
    fn new(p: Point, color: Color) -> Self {
        Self {
            position: [p.x, p.y],
            color: color.0,
        }
    }
}

/// Tessellate a whole draw list in paint order.
pub fn tessellate(list: &DrawList) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(list.len() * 3 * ELLIPSE_SEGMENTS);
    for cmd in list.sorted() {
        tessellate_command(cmd, &mut out);
    }
    out
}

/// Append the triangles for one command to `out`.
pub fn tessellate_command(cmd: &DrawCommand, out: &mut Vec<Vertex>) {
    match (&cmd.shape, cmd.paint) {
        (Shape::Ellipse { center, rx, ry }, paint) => ellipse(*center, *rx, *ry, paint, out),
        (Shape::Circle { center, radius }, paint) => ellipse(*center, *radius, *radius, paint, out),
        (Shape::Path(path), Paint::Fill(color)) => {
            for sub in path.subpaths() {
                fill_fan(&sub.points, color, out);
            }
        }
        (Shape::Path(path), Paint::Stroke { color, width }) => {
            for sub in path.subpaths() {
                stroke_polyline(&sub.points, sub.closed, width, color, out);
            }
        }
        // A filled line has no area; both paints draw it as a stroke.
        (Shape::Line { from, to }, Paint::Stroke { color, width }) => {
            segment_quad(*from, *to, width, color, out)
        }
        (Shape::Line { from, to }, Paint::Fill(color)) => segment_quad(*from, *to, 1.0, color, out),
    }
}

fn ellipse_points(center: Point, rx: f32, ry: f32) -> Vec<Point> {
    (0..ELLIPSE_SEGMENTS)
        .map(|i| {
            let a = i as f32 / ELLIPSE_SEGMENTS as f32 * TAU;
            Point::new(center.x + rx * a.cos(), center.y + ry * a.sin())
        })
        .collect()
}

fn ellipse(center: Point, rx: f32, ry: f32, paint: Paint, out: &mut Vec<Vertex>) {
    if rx <= 0.0 || ry <= 0.0 {
        return;
    }
    let rim = ellipse_points(center, rx, ry);
    match paint {
        Paint::Fill(color) => {
            for i in 0..rim.len() {
                let next = rim[(i + 1) % rim.len()];
                out.push(Vertex::new(center, color));
                out.push(Vertex::new(rim[i], color));
                out.push(Vertex::new(next, color));
            }
        }
        Paint::Stroke { color, width } => stroke_polyline(&rim, true, width, color, out),
    }
}

fn fill_fan(points: &[Point], color: Color, out: &mut Vec<Vertex>) {
    let Some((&first, rest)) = points.split_first() else {
        return;
    };
    for pair in rest.windows(2) {
        out.push(Vertex::new(first, color));
        out.push(Vertex::new(pair[0], color));
        out.push(Vertex::new(pair[1], color));
    }
}

fn stroke_polyline(points: &[Point], closed: bool, width: f32, color: Color, out: &mut Vec<Vertex>) {
    for pair in points.windows(2) {
        segment_quad(pair[0], pair[1], width, color, out);
    }
    if closed && points.len() > 2 {
        segment_quad(points[points.len() - 1], points[0], width, color, out);
    }
}

fn segment_quad(from: Point, to: Point, width: f32, color: Color, out: &mut Vec<Vertex>) {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let len = (dx * dx + dy * dy).sqrt();
    if len <= f32::EPSILON || width <= 0.0 {
        return;
    }
    let half = width * 0.5;
    let (nx, ny) = (-dy / len * half, dx / len * half);

    let a = from.offset(nx, ny);
    let b = from.offset(-nx, -ny);
    let c = to.offset(-nx, -ny);
    let d = to.offset(nx, ny);
    for p in [a, b, c, a, c, d] {
        out.push(Vertex::new(p, color));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use stardine_scene::draw::{Depth, Path, RenderSurface};

    #[test]
    fn filled_circle_is_a_full_fan() {
        let mut list = DrawList::new();
        list.fill_circle(Depth::SKY, Point::new(0.0, 0.0), 5.0, Color::WHITE);
        let verts = tessellate(&list);
        assert_eq!(verts.len(), ELLIPSE_SEGMENTS * 3);
        // Every rim vertex lies on the circle.
        for tri in verts.chunks(3) {
            assert_eq!(tri[0].position, [0.0, 0.0]);
            let [x, y] = tri[1].position;
            assert!(((x * x + y * y).sqrt() - 5.0).abs() < 1e-4);
        }
    }

    #[test]
    fn stroked_ellipse_is_one_quad_per_segment() {
        let mut list = DrawList::new();
        list.stroke_ellipse(Depth::SKY, Point::new(0.0, 0.0), 5.0, 3.0, Color::WHITE, 2.0);
        assert_eq!(tessellate(&list).len(), ELLIPSE_SEGMENTS * 6);
    }

    #[test]
    fn line_quad_has_requested_width() {
        let mut list = DrawList::new();
        list.line(Depth::SKY, Point::new(0.0, 0.0), Point::new(10.0, 0.0), Color::BLACK, 4.0);
        let verts = tessellate(&list);
        assert_eq!(verts.len(), 6);
        let ys: Vec<f32> = verts.iter().map(|v| v.position[1]).collect();
        let span = ys.iter().cloned().fold(f32::MIN, f32::max) - ys.iter().cloned().fold(f32::MAX, f32::min);
        assert!((span - 4.0).abs() < 1e-5);
    }

    #[test]
    fn degenerate_shapes_emit_nothing() {
        let mut list = DrawList::new();
        list.line(Depth::SKY, Point::new(1.0, 1.0), Point::new(1.0, 1.0), Color::BLACK, 2.0);
        list.fill_circle(Depth::SKY, Point::new(0.0, 0.0), 0.0, Color::BLACK);
        list.fill_path(
            Depth::SKY,
            Path::new().move_to(Point::new(0.0, 0.0)).line_to(Point::new(1.0, 0.0)),
            Color::BLACK,
        );
        assert!(tessellate(&list).is_empty());
    }

    #[test]
    fn filled_polygon_fans_from_first_point() {
        let mut list = DrawList::new();
        let square = Path::polygon(&[
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ]);
        list.fill_path(Depth::SKY, square.clone(), Color::WHITE);
        assert_eq!(tessellate(&list).len(), 6);

        list.clear();
        list.stroke_path(Depth::SKY, square, Color::WHITE, 1.0);
        // Closed: four edges.
        assert_eq!(tessellate(&list).len(), 24);
    }
}
