//! A 2D orthographic camera for y-down scene coordinates.

/// A simple 2D orthographic camera.
///
/// The scene uses screen-style coordinates: `(0, 0)` is the top-left corner
/// and `y` grows downward. [`orthographic_matrix`](Self::orthographic_matrix)
/// produces a column-major 4x4 matrix mapping that space to clip space
/// `[-1, 1]`, flipping `y` so the top of the scene is the top of the window.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera2D {
    /// Width of the visible area in scene units.
    pub width: f32,
    /// Height of the visible area in scene units.
    pub height: f32,
    /// Camera center X in scene units.
    pub x: f32,
    /// Camera center Y in scene units.
    pub y: f32,
}

impl Camera2D {
    /// A camera framing exactly `[0, width] x [0, height]`.
    pub fn for_scene(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            x: width / 2.0,
            y: height / 2.0,
        }
    }

    /// Produce a column-major 4x4 orthographic projection matrix.
    pub fn orthographic_matrix(&self) -> [f32; 16] {
        let sx = 2.0 / self.width;
        let sy = -2.0 / self.height;
        let tx = -2.0 * self.x / self.width;
        let ty = 2.0 * self.y / self.height;

        [
            sx, 0.0, 0.0, 0.0, // column 0
            0.0, sy, 0.0, 0.0, // column 1
            0.0, 0.0, 1.0, 0.0, // column 2
            tx, ty, 0.0, 1.0, // column 3
        ]
    }

    /// Map a scene point to clip space, as the vertex shader does.
    pub fn world_to_clip(&self, x: f32, y: f32) -> [f32; 2] {
        let m = self.orthographic_matrix();
        [m[0] * x + m[12], m[5] * y + m[13]]
    }
}

impl Default for Camera2D {
    fn default() -> Self {
        Self::for_scene(800.0, 600.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-6 && (a[1] - b[1]).abs() < 1e-6
    }

    #[test]
    fn scene_corners_map_to_clip_corners() {
        let cam = Camera2D::for_scene(800.0, 600.0);
        assert!(approx(cam.world_to_clip(0.0, 0.0), [-1.0, 1.0]));
        assert!(approx(cam.world_to_clip(800.0, 600.0), [1.0, -1.0]));
        assert!(approx(cam.world_to_clip(400.0, 300.0), [0.0, 0.0]));
    }

    #[test]
    fn larger_y_is_lower_on_screen() {
        let cam = Camera2D::default();
        assert!(cam.world_to_clip(0.0, 100.0)[1] > cam.world_to_clip(0.0, 500.0)[1]);
    }
}
