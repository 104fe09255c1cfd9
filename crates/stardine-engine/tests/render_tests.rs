//! Tessellation of whole frames, plus GPU-free checks of the renderer's
//! vertex format.

use stardine_engine::prelude::*;
use stardine_engine::stardine_scene::silhouette::MOOD_NEUTRAL;

fn rendered_frame() -> FrameLoop {
    let mut fl = FrameLoop::new(SceneConfig::default(), 21, FrameConfig::default());
    fl.spawn_customer();
    fl.run_frames(30);
    fl
}

#[test]
fn frame_tessellates_into_whole_triangles() {
    let fl = rendered_frame();
    let verts = tessellate(fl.draw_list());
    assert!(!verts.is_empty());
    assert_eq!(verts.len() % 3, 0);
}

#[test]
fn sky_is_painted_first_and_customers_over_the_wall() {
    let fl = rendered_frame();
    let verts = tessellate(fl.draw_list());

    // The sky rectangle is the first command at the lowest depth.
    let sky = fl.draw_list().commands()[0].paint.color();
    assert_eq!(verts[0].color, sky.0);

    // A waiting customer is neutral, and its mood colour paints after the wall.
    let wall_colors: Vec<[f32; 4]> = fl
        .draw_list()
        .at_depth(Depth::WALL)
        .map(|c| c.paint.color().0)
        .collect();
    let first_customer = verts
        .iter()
        .position(|v| v.color == MOOD_NEUTRAL.0)
        .unwrap();
    let last_wall = verts
        .iter()
        .rposition(|v| wall_colors.contains(&v.color))
        .unwrap();
    assert!(last_wall < first_customer);
}

#[test]
fn scene_fits_the_default_camera() {
    let fl = rendered_frame();
    let cam = Camera2D::for_scene(
        fl.backdrop().config().width,
        fl.backdrop().config().height,
    );
    assert_eq!(cam, Camera2D::default());

    // The sky rectangle spans exactly the clip-space square.
    let verts = tessellate(fl.draw_list());
    for v in &verts[..6] {
        let [x, y] = cam.world_to_clip(v.position[0], v.position[1]);
        assert!((x.abs() - 1.0).abs() < 1e-6);
        assert!((y.abs() - 1.0).abs() < 1e-6);
    }
}

#[cfg(feature = "renderer")]
mod gpu_layout {
    use super::*;

    #[test]
    fn vertices_cast_to_bytes() {
        let fl = rendered_frame();
        let verts = tessellate(fl.draw_list());
        let bytes: &[u8] = bytemuck::cast_slice(&verts);
        assert_eq!(bytes.len(), verts.len() * std::mem::size_of::<Vertex>());
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
    }
}
