use crate::geometry::cube_mesh::CubeMesh;
use crate::geometry::transform::to_column_major;
use crate::render::render_target::{RenderTarget, UniformSlot};
use crate::scene::composer::FrameTransform;
use nalgebra::Point2;

/// 场景渲染器：把合成好的帧变换交给渲染边界
pub struct SceneRenderer {
    pub mesh: CubeMesh,
    /// 跟随标记的半边长（曲线空间单位），为零时不绘制
    pub tracker_size: f32,
}

impl Default for SceneRenderer {
    fn default() -> Self {
        Self {
            mesh: CubeMesh::unit(),
            tracker_size: 0.01,
        }
    }
}

impl SceneRenderer {
    pub fn new(tracker_size: f32) -> Self {
        Self {
            tracker_size,
            ..Self::default()
        }
    }

    /// 绘制一帧：上传三个矩阵，然后绘制曲线、跟随标记与立方体
    pub fn draw_frame<T: RenderTarget + ?Sized>(&self, target: &mut T, frame: &FrameTransform) {
        target.clear();

        target.set_uniform_matrix(
            UniformSlot::CurveMvp,
            &to_column_major(&frame.curve_projection),
        );
        target.draw_line_strip(&frame.curve_samples);
        if self.tracker_size > 0.0 {
            target.draw_line_strip(&self.tracker_outline(&frame.tracker));
        }

        target.set_uniform_matrix(
            UniformSlot::CubeModelView,
            &to_column_major(&frame.model_view),
        );
        target.set_uniform_matrix(
            UniformSlot::CubeProjection,
            &to_column_major(&frame.projection),
        );
        target.draw_indexed_triangles(&self.mesh);
    }

    /// 跟随标记：以曲线点为中心的闭合正方形
    fn tracker_outline(&self, center: &Point2<f32>) -> [Point2<f32>; 5] {
        let s = self.tracker_size;
        [
            Point2::new(center.x - s, center.y - s),
            Point2::new(center.x + s, center.y - s),
            Point2::new(center.x + s, center.y + s),
            Point2::new(center.x - s, center.y + s),
            Point2::new(center.x - s, center.y - s),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::frame_buffer::{CURVE_COLOR, FrameBuffer};
    use crate::scene::composer::{ComposerSettings, compose_frame_transform};
    use crate::scene::state::{ControlPoints, TransformState};
    use std::collections::HashMap;

    /// 记录调用序列的渲染目标
    #[derive(Default)]
    struct RecordingTarget {
        uniforms: HashMap<&'static str, [f32; 16]>,
        calls: Vec<String>,
    }

    impl RenderTarget for RecordingTarget {
        fn clear(&mut self) {
            self.calls.push("clear".to_string());
        }

        fn set_uniform_matrix(&mut self, slot: UniformSlot, matrix: &[f32; 16]) {
            self.uniforms.insert(slot.name(), *matrix);
            self.calls.push(format!("uniform {}", slot.name()));
        }

        fn draw_line_strip(&mut self, vertices: &[Point2<f32>]) {
            self.calls.push(format!("line_strip {}", vertices.len()));
        }

        fn draw_indexed_triangles(&mut self, mesh: &CubeMesh) {
            self.calls.push(format!("triangles {}", mesh.vertex_count()));
        }
    }

    fn sample_frame() -> FrameTransform {
        compose_frame_transform(
            0.7,
            &ControlPoints::default(),
            &TransformState::default(),
            &ComposerSettings::default(),
        )
    }

    #[test]
    fn uploads_uniforms_before_draws() {
        let frame = sample_frame();
        let mut target = RecordingTarget::default();
        SceneRenderer::default().draw_frame(&mut target, &frame);

        assert_eq!(
            target.calls,
            vec![
                "clear",
                "uniform mvp",
                "line_strip 100",
                "line_strip 5",
                "uniform umvp",
                "uniform uProjectionMatrix",
                "triangles 36",
            ]
        );
        assert_eq!(target.uniforms["umvp"], to_column_major(&frame.model_view));
        assert_eq!(
            target.uniforms["uProjectionMatrix"],
            to_column_major(&frame.projection)
        );
    }

    #[test]
    fn tracker_can_be_disabled() {
        let mut target = RecordingTarget::default();
        SceneRenderer::new(0.0).draw_frame(&mut target, &sample_frame());
        assert_eq!(
            target
                .calls
                .iter()
                .filter(|c| c.starts_with("line_strip"))
                .count(),
            1
        );
    }

    #[test]
    fn software_frame_contains_curve_and_cube() {
        let frame = sample_frame();
        let mut fb = FrameBuffer::new(200, 200);
        SceneRenderer::default().draw_frame(&mut fb, &frame);

        let bytes = fb.get_color_buffer_bytes();
        let blue = bytes
            .chunks_exact(3)
            .filter(|px| *px == CURVE_COLOR.as_slice())
            .count();
        let cube = bytes
            .chunks_exact(3)
            .filter(|px| *px != [0, 0, 0].as_slice() && *px != CURVE_COLOR.as_slice())
            .count();
        assert!(blue > 100, "曲线像素过少: {blue}");
        assert!(cube > 0, "立方体未绘制");
    }
}
