use crate::geometry::bezier::{eval_cubic_bezier, sample_curve};
use crate::geometry::transform::{
    compose_sequential, identity, orthographic_projection, rotation_xyz, scaling, translation,
    viewport_projection,
};
use crate::scene::state::{ControlPoints, TransformState};
use nalgebra::{Matrix4, Point2, Vector3};

/// 正交投影的视景体
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionBox {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionBox {
    fn default() -> Self {
        Self {
            left: -1.0,
            right: 1.0,
            bottom: -1.0,
            top: 1.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl ProjectionBox {
    pub fn matrix(&self) -> Matrix4<f32> {
        orthographic_projection(
            self.left,
            self.right,
            self.bottom,
            self.top,
            self.near,
            self.far,
        )
    }
}

/// 合成器的固定参数
#[derive(Debug, Clone, PartialEq)]
pub struct ComposerSettings {
    pub projection: ProjectionBox,
    /// 曲线离散化的段数
    pub curve_steps: usize,
    /// 曲线所在二维空间的宽高；控制点为归一化坐标时为 (1, 1)
    pub curve_space: (f32, f32),
}

impl Default for ComposerSettings {
    fn default() -> Self {
        Self {
            projection: ProjectionBox::default(),
            curve_steps: 100,
            curve_space: (1.0, 1.0),
        }
    }
}

/// 单帧的全部变换结果，交给渲染边界使用
#[derive(Debug, Clone)]
pub struct FrameTransform {
    /// 振荡驱动量 `sin(time) * 0.5 + 0.5`，位于 [0,1]
    pub delta: f32,
    /// 立方体当前所在的曲线点（跟随标记）
    pub tracker: Point2<f32>,
    /// 立方体的模型-视图矩阵（`umvp`）
    pub model_view: Matrix4<f32>,
    /// 立方体的投影矩阵（`uProjectionMatrix`）
    pub projection: Matrix4<f32>,
    /// 曲线画布矩阵（`mvp`）
    pub curve_projection: Matrix4<f32>,
    /// 曲线采样点
    pub curve_samples: Vec<Point2<f32>>,
}

impl FrameTransform {
    /// 完整的裁剪空间变换 `projection * model_view`
    pub fn model_view_projection(&self) -> Matrix4<f32> {
        self.projection * self.model_view
    }
}

/// 振荡驱动量：`sin(time)` 映射到 [0,1]
pub fn oscillation(time: f32) -> f32 {
    time.sin() * 0.5 + 0.5
}

/// 曲线空间到模型空间的经验映射：曲线 x 驱动高度，曲线 y 驱动深度
pub fn curve_to_model(point: &Point2<f32>) -> Vector3<f32> {
    Vector3::new(0.0, -point.x * 20.0 + 10.0, point.y * 10.0 - 10.0)
}

/// 合成单帧变换
///
/// 顶点依次经过：立方体旋转、模型平移、缩放、空间旋转、缩放平移（zoom）、单位矩阵。
/// `compose_sequential` 中最右侧的矩阵最先作用，因此列表按相反顺序给出：
/// `model_view = I * T_zoom * R_space * S * T_model * R_cube`。
/// 缩放位于模型平移之后，曲线映射出的较大位移会被一并缩小到视景体内。
/// 退化的投影参数产生的非有限值原样传递。
pub fn compose_frame_transform(
    time: f32,
    control_points: &ControlPoints,
    state: &TransformState,
    settings: &ComposerSettings,
) -> FrameTransform {
    let [p0, p1, p2, p3] = &control_points.points;

    let delta = oscillation(time);
    let tracker = eval_cubic_bezier(delta, p0, p1, p2, p3);

    let offset = curve_to_model(&tracker);
    let model_translation = translation(offset.x, offset.y, offset.z);

    let cube_rotation = rotation_xyz(0.0, state.effective_cube_rotation(time), 0.0);
    let scale = scaling(state.cube_scale);
    let space_rotation = rotation_xyz(0.0, state.space_y_rotation, 0.0);
    let zoom = translation(0.0, 0.0, state.zoom);

    let model_view = compose_sequential(&[
        identity(),
        zoom,
        space_rotation,
        scale,
        model_translation,
        cube_rotation,
    ]);

    let (curve_width, curve_height) = settings.curve_space;

    FrameTransform {
        delta,
        tracker,
        model_view,
        projection: settings.projection.matrix(),
        curve_projection: viewport_projection(curve_width, curve_height),
        curve_samples: sample_curve(settings.curve_steps, p0, p1, p2, p3),
    }
}
