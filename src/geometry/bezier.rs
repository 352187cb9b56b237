use nalgebra::Point2;

// 三次贝塞尔曲线
//
//   B(t) = (1-t)^3 P0 + 3(1-t)^2 t P1 + 3(1-t) t^2 P2 + t^3 P3
//
// CPU 版本（`eval_cubic_bezier`）与 GPU 版本（`CURVE_VERTEX_SHADER` 中的
// `evalBezierCubic`）必须逐项使用相同的系数分组，修改其中一个时同步修改另一个。

/// 在参数 `t` 处计算三次贝塞尔曲线上的点
///
/// `t` 通常位于 [0,1]，但不做截断：任意实数都按同一多项式求值。
pub fn eval_cubic_bezier(
    t: f32,
    p0: &Point2<f32>,
    p1: &Point2<f32>,
    p2: &Point2<f32>,
    p3: &Point2<f32>,
) -> Point2<f32> {
    let u = 1.0 - t;
    let b0 = u.powi(3);
    let b1 = 3.0 * u.powi(2) * t;
    let b2 = 3.0 * u * t.powi(2);
    let b3 = t.powi(3);
    Point2::from(p0.coords * b0 + p1.coords * b1 + p2.coords * b2 + p3.coords * b3)
}

/// 曲线顶点着色器：每个顶点只携带参数 `t`，控制点通过 uniform 传入
pub const CURVE_VERTEX_SHADER: &str = r#"
uniform mat4 mvp;

attribute float t;

uniform vec2 p0;
uniform vec2 p1;
uniform vec2 p2;
uniform vec2 p3;

vec2 evalBezierCubic(float t, vec2 p0, vec2 p1, vec2 p2, vec2 p3)
{
    float u = 1.0 - t;
    return pow(u, 3.0) * p0
         + 3.0 * pow(u, 2.0) * t * p1
         + 3.0 * u * pow(t, 2.0) * p2
         + pow(t, 3.0) * p3;
}

void main()
{
    vec2 pos = evalBezierCubic(t, p0, p1, p2, p3);
    gl_Position = mvp * vec4(pos, 0, 1);
}
"#;

/// 曲线片元着色器（纯蓝色）
pub const CURVE_FRAGMENT_SHADER: &str = r#"
precision mediump float;
void main()
{
    gl_FragColor = vec4(0, 0, 1, 1);
}
"#;

/// GPU 路径的顶点缓冲内容：`t = i / steps`，`i ∈ [0, steps)`
pub fn curve_parameters(steps: usize) -> Vec<f32> {
    (0..steps).map(|i| i as f32 / steps as f32).collect()
}

/// 在 `curve_parameters(steps)` 的每个参数处求值，返回 `steps` 个点
///
/// 纯函数，不保留任何状态；`steps == 0` 时返回空序列。
pub fn sample_curve(
    steps: usize,
    p0: &Point2<f32>,
    p1: &Point2<f32>,
    p2: &Point2<f32>,
    p3: &Point2<f32>,
) -> Vec<Point2<f32>> {
    curve_parameters(steps)
        .into_iter()
        .map(|t| eval_cubic_bezier(t, p0, p1, p2, p3))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn arch() -> [Point2<f32>; 4] {
        [
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
        ]
    }

    fn close(a: &Point2<f32>, b: &Point2<f32>) -> bool {
        (a - b).norm() < EPSILON
    }

    #[test]
    fn endpoints_match_outer_control_points() {
        let p = [
            Point2::new(0.1, 0.1),
            Point2::new(0.35, 0.6),
            Point2::new(0.55, 0.3),
            Point2::new(0.8, 0.9),
        ];
        assert!(close(&eval_cubic_bezier(0.0, &p[0], &p[1], &p[2], &p[3]), &p[0]));
        assert!(close(&eval_cubic_bezier(1.0, &p[0], &p[1], &p[2], &p[3]), &p[3]));
    }

    #[test]
    fn midpoint_of_arch() {
        let [p0, p1, p2, p3] = arch();
        let mid = eval_cubic_bezier(0.5, &p0, &p1, &p2, &p3);
        assert!(close(&mid, &Point2::new(0.5, 0.75)), "{mid}");
    }

    #[test]
    fn parameter_is_not_clamped() {
        let [p0, p1, p2, p3] = arch();
        // t = 2: u = -1 -> -P0 + 6 P1 - 12 P2 + 8 P3
        let outside = eval_cubic_bezier(2.0, &p0, &p1, &p2, &p3);
        assert!(close(&outside, &Point2::new(-4.0, -6.0)), "{outside}");
    }

    #[test]
    fn sampling_has_requested_length_and_starts_at_p0() {
        let [p0, p1, p2, p3] = arch();
        let samples = sample_curve(100, &p0, &p1, &p2, &p3);
        assert_eq!(samples.len(), 100);
        assert_eq!(samples[0], eval_cubic_bezier(0.0, &p0, &p1, &p2, &p3));
        // 最后一个样本停在 t = 0.99，不包含 P3
        assert!(!close(samples.last().unwrap(), &p3));
        assert!(sample_curve(0, &p0, &p1, &p2, &p3).is_empty());
    }

    #[test]
    fn sampling_is_restartable() {
        let [p0, p1, p2, p3] = arch();
        assert_eq!(
            sample_curve(16, &p0, &p1, &p2, &p3),
            sample_curve(16, &p0, &p1, &p2, &p3)
        );
    }

    #[test]
    fn gpu_parameters_match_host_sampling() {
        let [p0, p1, p2, p3] = arch();
        let params = curve_parameters(10);
        assert_eq!(params.len(), 10);
        assert_eq!(params[5], 0.5);
        let host = sample_curve(10, &p0, &p1, &p2, &p3);
        for (t, sample) in params.iter().zip(host.iter()) {
            assert_eq!(*sample, eval_cubic_bezier(*t, &p0, &p1, &p2, &p3));
        }
    }

    #[test]
    fn shader_declares_the_same_polynomial() {
        assert!(CURVE_VERTEX_SHADER.contains("vec2 evalBezierCubic(float t"));
        assert!(CURVE_VERTEX_SHADER.contains("3.0 * pow(u, 2.0) * t * p1"));
        assert!(CURVE_VERTEX_SHADER.contains("3.0 * u * pow(t, 2.0) * p2"));
        assert!(CURVE_VERTEX_SHADER.contains("uniform mat4 mvp;"));
    }
}
