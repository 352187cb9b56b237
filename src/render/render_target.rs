use crate::geometry::cube_mesh::CubeMesh;
use nalgebra::Point2;

/// 渲染管线中的矩阵 uniform 槽位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformSlot {
    /// 曲线着色器的画布矩阵
    CurveMvp,
    /// 立方体着色器的模型-视图矩阵
    CubeModelView,
    /// 立方体着色器的投影矩阵
    CubeProjection,
}

impl UniformSlot {
    /// 着色器源码中对应的 uniform 名称
    pub fn name(&self) -> &'static str {
        match self {
            UniformSlot::CurveMvp => "mvp",
            UniformSlot::CubeModelView => "umvp",
            UniformSlot::CubeProjection => "uProjectionMatrix",
        }
    }
}

/// 渲染边界：接收列主序矩阵并执行绘制调用
///
/// GPU 绑定层与软件帧缓冲都实现该特质，场景渲染器只依赖这里的接口。
pub trait RenderTarget {
    /// 清除颜色与深度
    fn clear(&mut self);

    /// 上传16个元素的列主序矩阵（不转置）
    fn set_uniform_matrix(&mut self, slot: UniformSlot, matrix: &[f32; 16]);

    /// 以 `CurveMvp` 变换并绘制折线
    fn draw_line_strip(&mut self, vertices: &[Point2<f32>]);

    /// 以 `CubeProjection * CubeModelView` 变换并按索引绘制三角形
    fn draw_indexed_triangles(&mut self, mesh: &CubeMesh);
}
