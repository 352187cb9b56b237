// geometry/mod.rs
// 导出矩阵变换、贝塞尔曲线与立方体网格模块
pub mod bezier;
pub mod cube_mesh;
pub mod transform;
