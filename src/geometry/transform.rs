use nalgebra::{Matrix4, Point3, Vector4};

// 所有矩阵按列主序存储（nalgebra 的存储布局），与 GPU uniform 上传约定一致。
// `Matrix4::new` 的参数按行书写，因此下面的字面量与数学记法一一对应。

/// 单位矩阵
pub fn identity() -> Matrix4<f32> {
    Matrix4::identity()
}

/// 创建平移矩阵，平移分量位于第四列（列主序下标 12、13、14）
pub fn translation(dx: f32, dy: f32, dz: f32) -> Matrix4<f32> {
    Matrix4::new(
        1.0, 0.0, 0.0, dx, //
        0.0, 1.0, 0.0, dy, //
        0.0, 0.0, 1.0, dz, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// 绕X轴旋转（右手系，从 +X 看向原点为逆时针）
pub fn rotation_x(angle_rad: f32) -> Matrix4<f32> {
    let (s, c) = angle_rad.sin_cos();
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0, //
        0.0, c, -s, 0.0, //
        0.0, s, c, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// 绕Y轴旋转（右手系，从 +Y 看向原点为逆时针）
pub fn rotation_y(angle_rad: f32) -> Matrix4<f32> {
    let (s, c) = angle_rad.sin_cos();
    Matrix4::new(
        c, 0.0, s, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        -s, 0.0, c, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// 绕Z轴旋转（右手系，从 +Z 看向原点为逆时针）
pub fn rotation_z(angle_rad: f32) -> Matrix4<f32> {
    let (s, c) = angle_rad.sin_cos();
    Matrix4::new(
        c, -s, 0.0, 0.0, //
        s, c, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// 按 X、Y、Z 顺序组合的欧拉旋转：`Rx * Ry * Rz`
pub fn rotation_xyz(x_rad: f32, y_rad: f32, z_rad: f32) -> Matrix4<f32> {
    compose_sequential(&[rotation_x(x_rad), rotation_y(y_rad), rotation_z(z_rad)])
}

/// 创建均匀缩放矩阵
pub fn scaling(scale: f32) -> Matrix4<f32> {
    Matrix4::new(
        scale, 0.0, 0.0, 0.0, //
        0.0, scale, 0.0, 0.0, //
        0.0, 0.0, scale, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// 创建正交投影矩阵，将视景体映射到 [-1,1]^3 裁剪立方体
///
/// 不校验边界：`left == right`、`bottom == top` 或 `z_near == z_far`
/// 时结果包含非有限值，由调用方保证边界互不相同。
pub fn orthographic_projection(
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    z_near: f32,
    z_far: f32,
) -> Matrix4<f32> {
    let width = right - left;
    let height = top - bottom;
    let depth = z_far - z_near;
    Matrix4::new(
        2.0 / width, 0.0, 0.0, -(right + left) / width, //
        0.0, 2.0 / height, 0.0, -(top + bottom) / height, //
        0.0, 0.0, -2.0 / depth, -(z_far + z_near) / depth, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// 二维画布投影：像素坐标（原点左上，Y向下）映射到裁剪空间，翻转Y轴
pub fn viewport_projection(width: f32, height: f32) -> Matrix4<f32> {
    Matrix4::new(
        2.0 / width, 0.0, 0.0, -1.0, //
        0.0, -2.0 / height, 0.0, 1.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// 矩阵乘法 `a * b`，作用于列向量时先应用 `b`
pub fn multiply(a: &Matrix4<f32>, b: &Matrix4<f32>) -> Matrix4<f32> {
    a * b
}

/// 依次左折叠相乘：`list[0] * list[1] * ... * list[n-1]`
///
/// 对列向量 `v`，`compose_sequential(&[A, B, C]) * v == A * (B * (C * v))`，
/// 即列表最右侧的矩阵最先作用。空列表返回单位矩阵。
pub fn compose_sequential(matrices: &[Matrix4<f32>]) -> Matrix4<f32> {
    matrices
        .iter()
        .fold(identity(), |acc, matrix| multiply(&acc, matrix))
}

/// 导出为16个元素的列主序数组，可直接作为 `uniformMatrix4fv(transpose = false)` 的数据
pub fn to_column_major(matrix: &Matrix4<f32>) -> [f32; 16] {
    let mut data = [0.0; 16];
    data.copy_from_slice(matrix.as_slice());
    data
}

/// 将点以齐次坐标 `(x, y, z, 1)` 变换到裁剪空间
pub fn transform_point(matrix: &Matrix4<f32>, point: &Point3<f32>) -> Vector4<f32> {
    matrix * point.to_homogeneous()
}
