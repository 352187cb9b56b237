use nalgebra::{Point3, Vector3, Vector4};

/// 立方体顶点着色器：`uProjectionMatrix * umvp * position`，颜色按顶点位置调制
pub const CUBE_VERTEX_SHADER: &str = r#"
attribute vec4 aVertexPosition;
attribute vec4 aVertexColor;
uniform mat4 uProjectionMatrix;
uniform mat4 umvp;
varying lowp vec4 vColor;

void main(void) {
    gl_Position = uProjectionMatrix * umvp * aVertexPosition;

    float lowerBound = 0.4;
    float upperBound = 1.0;
    vColor = vec4(
        clamp(aVertexColor.r * aVertexPosition.x, lowerBound, upperBound),
        clamp(aVertexColor.g * aVertexPosition.y, lowerBound, upperBound),
        clamp(aVertexColor.b * aVertexPosition.z, lowerBound, upperBound),
        1.0
    );
}
"#;

pub const CUBE_FRAGMENT_SHADER: &str = r#"
precision mediump float;
varying lowp vec4 vColor;

void main(void) {
    gl_FragColor = vColor;
}
"#;

pub const VERTEX_COLOR_LOWER_BOUND: f32 = 0.4;
pub const VERTEX_COLOR_UPPER_BOUND: f32 = 1.0;

/// `CUBE_VERTEX_SHADER` 中顶点颜色计算的CPU版本
pub fn cube_vertex_color(color: &Vector4<f32>, position: &Point3<f32>) -> Vector3<f32> {
    Vector3::new(
        color.x * position.x,
        color.y * position.y,
        color.z * position.z,
    )
    .map(|c| c.clamp(VERTEX_COLOR_LOWER_BOUND, VERTEX_COLOR_UPPER_BOUND))
}
