//! Retained draw primitives and the render surface contract.
//!
//! Scene code never talks to a GPU. It paints onto a [`RenderSurface`], which
//! accepts a handful of 2D primitives tagged with a [`Depth`]. The
//! [`DrawList`] surface simply records them, so the same frame can be
//! inspected in tests, tessellated for the GPU, or dumped for debugging.
//!
//! Coordinates are scene units with the origin at the top-left corner and
//! `y` growing downward.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Point / Color / Depth
// ---------------------------------------------------------------------------

/// A 2D point in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// This point shifted by `(dx, dy)`.
    #[inline]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// RGBA colour, each channel in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Color = Color([1.0, 1.0, 1.0, 1.0]);
    pub const BLACK: Color = Color([0.0, 0.0, 0.0, 1.0]);

    /// Opaque colour from RGB channels.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self([r, g, b, 1.0])
    }

    /// Colour from RGBA channels.
    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self([r, g, b, a])
    }

    /// Same colour with a different alpha.
    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        let [r, g, b, _] = self.0;
        Self([r, g, b, a])
    }

    /// Opaque colour from a `0xRRGGBB` literal.
    pub fn hex(rgb: u32) -> Self {
        let channel = |shift: u32| ((rgb >> shift) & 0xFF) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }
}

/// Draw-order layer. Higher depths paint over lower ones; commands at the
/// same depth keep their submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Depth(pub i32);

impl Depth {
    /// Space fill and stars.
    pub const SKY: Depth = Depth(0);
    /// Back wall and porthole windows.
    pub const WALL: Depth = Depth(1);
    /// Every alien customer.
    pub const CUSTOMERS: Depth = Depth(5);
    /// Conveyor belt and rollers, in front of the customers' legs.
    pub const CONVEYOR: Depth = Depth(8);
    /// Finish line painted over the belt.
    pub const FINISH_LINE: Depth = Depth(9);
}

// ---------------------------------------------------------------------------
// Path
// ---------------------------------------------------------------------------

/// A single path verb.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathVerb {
    MoveTo(Point),
    LineTo(Point),
    Close,
}

/// A polyline path built from move/line/close verbs.
///
/// ```
/// use stardine_scene::draw::{Path, Point};
///
/// let tri = Path::new()
///     .move_to(Point::new(0.0, 0.0))
///     .line_to(Point::new(10.0, 0.0))
///     .line_to(Point::new(5.0, 8.0))
///     .close();
/// assert_eq!(tri.subpaths().len(), 1);
/// assert!(tri.subpaths()[0].closed);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    verbs: Vec<PathVerb>,
}

/// One connected run of points inside a [`Path`].
#[derive(Debug, Clone, PartialEq)]
pub struct Subpath {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, p: Point) -> Self {
        self.verbs.push(PathVerb::MoveTo(p));
        self
    }

    pub fn line_to(mut self, p: Point) -> Self {
        self.verbs.push(PathVerb::LineTo(p));
        self
    }

    pub fn close(mut self) -> Self {
        self.verbs.push(PathVerb::Close);
        self
    }

    /// Closed polygon through `points`.
    pub fn polygon(points: &[Point]) -> Self {
        Self::polyline(points).close()
    }

    /// Open polyline through `points`.
    pub fn polyline(points: &[Point]) -> Self {
        let mut path = Path::new();
        for (i, &p) in points.iter().enumerate() {
            path = if i == 0 { path.move_to(p) } else { path.line_to(p) };
        }
        path
    }

    pub fn verbs(&self) -> &[PathVerb] {
        &self.verbs
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    /// Split the verb stream into connected subpaths.
    ///
    /// A `LineTo` with no preceding `MoveTo` starts a subpath at that point.
    pub fn subpaths(&self) -> Vec<Subpath> {
        let mut out = Vec::new();
        let mut current: Option<Subpath> = None;
        for verb in &self.verbs {
            match *verb {
                PathVerb::MoveTo(p) => {
                    if let Some(done) = current.take() {
                        out.push(done);
                    }
                    current = Some(Subpath {
                        points: vec![p],
                        closed: false,
                    });
                }
                PathVerb::LineTo(p) => match current.as_mut() {
                    Some(sub) => sub.points.push(p),
                    None => {
                        current = Some(Subpath {
                            points: vec![p],
                            closed: false,
                        })
                    }
                },
                PathVerb::Close => {
                    if let Some(mut done) = current.take() {
                        done.closed = true;
                        out.push(done);
                    }
                }
            }
        }
        if let Some(done) = current {
            out.push(done);
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Shape / Paint / DrawCommand
// ---------------------------------------------------------------------------

/// Geometry of a primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Ellipse { center: Point, rx: f32, ry: f32 },
    Circle { center: Point, radius: f32 },
    Path(Path),
    Line { from: Point, to: Point },
}

/// How a primitive is painted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Paint {
    Fill(Color),
    Stroke { color: Color, width: f32 },
}

impl Paint {
    pub fn color(&self) -> Color {
        match *self {
            Paint::Fill(c) => c,
            Paint::Stroke { color, .. } => color,
        }
    }
}

/// One recorded primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawCommand {
    pub depth: Depth,
    pub shape: Shape,
    pub paint: Paint,
}

// ---------------------------------------------------------------------------
// RenderSurface
// ---------------------------------------------------------------------------

/// Something scene code can paint onto.
///
/// Only [`clear`](Self::clear) and [`draw`](Self::draw) are required; the
/// rest are conveniences that forward to `draw`.
pub trait RenderSurface {
    /// Discard everything painted so far.
    fn clear(&mut self);

    /// Paint one primitive at `depth`.
    fn draw(&mut self, depth: Depth, shape: Shape, paint: Paint);

    fn fill_ellipse(&mut self, depth: Depth, center: Point, rx: f32, ry: f32, color: Color) {
        self.draw(depth, Shape::Ellipse { center, rx, ry }, Paint::Fill(color));
    }

    fn stroke_ellipse(
        &mut self,
        depth: Depth,
        center: Point,
        rx: f32,
        ry: f32,
        color: Color,
        width: f32,
    ) {
        self.draw(
            depth,
            Shape::Ellipse { center, rx, ry },
            Paint::Stroke { color, width },
        );
    }

    fn fill_circle(&mut self, depth: Depth, center: Point, radius: f32, color: Color) {
        self.draw(depth, Shape::Circle { center, radius }, Paint::Fill(color));
    }

    fn stroke_circle(&mut self, depth: Depth, center: Point, radius: f32, color: Color, width: f32) {
        self.draw(
            depth,
            Shape::Circle { center, radius },
            Paint::Stroke { color, width },
        );
    }

    fn fill_path(&mut self, depth: Depth, path: Path, color: Color) {
        self.draw(depth, Shape::Path(path), Paint::Fill(color));
    }

    fn stroke_path(&mut self, depth: Depth, path: Path, color: Color, width: f32) {
        self.draw(depth, Shape::Path(path), Paint::Stroke { color, width });
    }

    fn line(&mut self, depth: Depth, from: Point, to: Point, color: Color, width: f32) {
        self.draw(depth, Shape::Line { from, to }, Paint::Stroke { color, width });
    }
}

// ---------------------------------------------------------------------------
// DrawList
// ---------------------------------------------------------------------------

/// A [`RenderSurface`] that records commands in submission order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands in submission order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Commands in paint order: ascending depth, submission order within a
    /// depth.
    pub fn sorted(&self) -> Vec<&DrawCommand> {
        let mut sorted: Vec<&DrawCommand> = self.commands.iter().collect();
        sorted.sort_by_key(|cmd| cmd.depth);
        sorted
    }

    /// Commands recorded at exactly `depth`.
    pub fn at_depth(&self, depth: Depth) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(move |cmd| cmd.depth == depth)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl RenderSurface for DrawList {
    fn clear(&mut self) {
        self.commands.clear();
    }

    fn draw(&mut self, depth: Depth, shape: Shape, paint: Paint) {
        self.commands.push(DrawCommand {
            depth,
            shape,
            paint,
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colour_channels() {
        let c = Color::hex(0xFF8000);
        assert_eq!(c.0[0], 1.0);
        assert!((c.0[1] - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.0[2], 0.0);
        assert_eq!(c.0[3], 1.0);
    }

    #[test]
    fn subpaths_split_on_move_and_close() {
        let path = Path::new()
            .move_to(Point::new(0.0, 0.0))
            .line_to(Point::new(1.0, 0.0))
            .close()
            .move_to(Point::new(5.0, 5.0))
            .line_to(Point::new(6.0, 5.0))
            .line_to(Point::new(6.0, 6.0));
        let subs = path.subpaths();
        assert_eq!(subs.len(), 2);
        assert!(subs[0].closed);
        assert_eq!(subs[0].points.len(), 2);
        assert!(!subs[1].closed);
        assert_eq!(subs[1].points.len(), 3);
    }

    #[test]
    fn line_without_move_starts_subpath() {
        let path = Path::new().line_to(Point::new(1.0, 1.0)).line_to(Point::new(2.0, 2.0));
        let subs = path.subpaths();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].points[0], Point::new(1.0, 1.0));
    }

    #[test]
    fn clear_discards_recorded_commands() {
        let mut list = DrawList::new();
        list.fill_circle(Depth::SKY, Point::new(1.0, 1.0), 2.0, Color::WHITE);
        list.line(Depth::WALL, Point::default(), Point::new(3.0, 3.0), Color::BLACK, 1.0);
        assert_eq!(list.len(), 2);
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn sorted_is_stable_within_depth() {
        let mut list = DrawList::new();
        list.fill_circle(Depth::CONVEYOR, Point::new(0.0, 0.0), 1.0, Color::WHITE);
        list.fill_circle(Depth::SKY, Point::new(1.0, 0.0), 1.0, Color::WHITE);
        list.fill_circle(Depth::CONVEYOR, Point::new(2.0, 0.0), 1.0, Color::WHITE);

        let sorted = list.sorted();
        let xs: Vec<f32> = sorted
            .iter()
            .map(|cmd| match &cmd.shape {
                Shape::Circle { center, .. } => center.x,
                other => panic!("unexpected shape {other:?}"),
            })
            .collect();
        assert_eq!(xs, vec![1.0, 0.0, 2.0]);
    }
}
