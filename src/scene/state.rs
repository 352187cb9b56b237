use nalgebra::Point2;

/// 控制点默认位置（归一化曲线空间，原点左上）
pub const DEFAULT_CONTROL_POINTS: [[f32; 2]; 4] =
    [[0.1, 0.1], [0.35, 0.6], [0.55, 0.3], [0.8, 0.9]];

/// 手动模式下立方体的初始Y轴角度（弧度）
pub const DEFAULT_CUBE_ROTATION: f32 = 0.5;
/// 立方体在三个轴上的统一缩放
pub const DEFAULT_CUBE_SCALE: f32 = 0.1;

/// 三次贝塞尔曲线的四个控制点，坐标位于归一化 [0,1] 曲线空间
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoints {
    pub points: [Point2<f32>; 4],
}

impl Default for ControlPoints {
    fn default() -> Self {
        Self::from_array(DEFAULT_CONTROL_POINTS)
    }
}

impl ControlPoints {
    pub fn new(p0: Point2<f32>, p1: Point2<f32>, p2: Point2<f32>, p3: Point2<f32>) -> Self {
        Self {
            points: [p0, p1, p2, p3],
        }
    }

    pub fn from_array(points: [[f32; 2]; 4]) -> Self {
        Self {
            points: points.map(|[x, y]| Point2::new(x, y)),
        }
    }

    /// 由容器相对像素坐标构造（除以容器宽高）
    pub fn from_pixels(pixels: &[Point2<f32>; 4], width: f32, height: f32) -> Self {
        Self {
            points: pixels.map(|p| normalize_pixel(&p, width, height)),
        }
    }

    /// 转换回容器相对像素坐标，用于叠加层绘制
    pub fn to_pixels(&self, width: f32, height: f32) -> [Point2<f32>; 4] {
        self.points.map(|p| Point2::new(p.x * width, p.y * height))
    }

    /// 更新单个控制点；索引越界时返回 `false` 且不修改
    pub fn set(&mut self, index: usize, point: Point2<f32>) -> bool {
        match self.points.get_mut(index) {
            Some(slot) => {
                *slot = point;
                true
            }
            None => false,
        }
    }

    pub fn p0(&self) -> &Point2<f32> {
        &self.points[0]
    }

    pub fn p1(&self) -> &Point2<f32> {
        &self.points[1]
    }

    pub fn p2(&self) -> &Point2<f32> {
        &self.points[2]
    }

    pub fn p3(&self) -> &Point2<f32> {
        &self.points[3]
    }
}

/// 像素坐标归一化
pub fn normalize_pixel(pixel: &Point2<f32>, width: f32, height: f32) -> Point2<f32> {
    Point2::new(pixel.x / width, pixel.y / height)
}

/// 动画与交互状态
///
/// 由输入事件与逐帧推进修改，由场景合成器在每帧读取。
#[derive(Debug, Clone, PartialEq)]
pub struct TransformState {
    /// 立方体自身的Y轴角度（弧度）；自动旋转时每帧被覆盖为当前时间
    pub cube_rotation: f32,
    /// 自动旋转开关
    pub auto_rotate: bool,
    /// 立方体之后整个空间的Y轴旋转（拖拽累积）
    pub space_y_rotation: f32,
    /// 沿Z轴的缩放平移（滚轮累积）
    pub zoom: f32,
    /// 立方体统一缩放
    pub cube_scale: f32,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            cube_rotation: DEFAULT_CUBE_ROTATION,
            auto_rotate: true,
            space_y_rotation: 0.0,
            zoom: 0.0,
            cube_scale: DEFAULT_CUBE_SCALE,
        }
    }
}

impl TransformState {
    /// 本帧立方体Y轴角度：自动旋转时等于时间，否则为手动角度
    pub fn effective_cube_rotation(&self, time: f32) -> f32 {
        if self.auto_rotate {
            time
        } else {
            self.cube_rotation
        }
    }

    /// 逐帧推进：自动旋转时把角度写回，关闭自动旋转后立方体停在最后的角度
    pub fn advance(&mut self, time: f32) {
        if self.auto_rotate {
            self.cube_rotation = time;
        }
    }

    /// 重置旋转、缩放与空间旋转；保留自动旋转开关和缩放常量
    pub fn reset(&mut self) {
        self.cube_rotation = DEFAULT_CUBE_ROTATION;
        self.zoom = 0.0;
        self.space_y_rotation = 0.0;
    }
}

/// 单一执行上下文中共享的全部可变场景状态
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub control_points: ControlPoints,
    pub transform: TransformState,
    /// 拖拽进行中时上一次的指针X坐标
    pub drag_anchor: Option<f32>,
}

impl Scene {
    pub fn new(control_points: ControlPoints, transform: TransformState) -> Self {
        Self {
            control_points,
            transform,
            drag_anchor: None,
        }
    }
}
