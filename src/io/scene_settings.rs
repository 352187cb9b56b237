use crate::scene::composer::{ComposerSettings, ProjectionBox};
use crate::scene::input::InputHandler;
use crate::scene::state::{
    ControlPoints, DEFAULT_CUBE_ROTATION, DEFAULT_CUBE_SCALE, Scene, TransformState,
};
use nalgebra::{Point2, Vector3};

/// 所有可通过TOML配置的场景参数
///
/// 点与颜色以字符串保存（"x,y" / "r,g,b"），与配置文件格式一致，使用时再解析。
#[derive(Debug, Clone)]
pub struct SceneSettings {
    // ===== 曲线 =====
    /// 控制点，归一化坐标 "x,y"
    pub p0: String,
    pub p1: String,
    pub p2: String,
    pub p3: String,
    /// 曲线离散化段数
    pub curve_steps: usize,
    /// 跟随标记半边长，0 表示不绘制
    pub tracker_size: f32,

    // ===== 立方体 =====
    pub cube_scale: f32,
    /// 手动模式下的初始Y轴角度（弧度）
    pub cube_rotation: f32,
    pub auto_rotate: bool,

    // ===== 正交投影 =====
    pub projection_left: f32,
    pub projection_right: f32,
    pub projection_bottom: f32,
    pub projection_top: f32,
    pub projection_near: f32,
    pub projection_far: f32,

    // ===== 输入 =====
    /// 每像素拖拽对应的空间旋转（弧度）
    pub drag_sensitivity: f32,
    /// 每单位滚轮对应的Z平移
    pub wheel_sensitivity: f32,

    // ===== 输出 =====
    pub width: usize,
    pub height: usize,
    pub output_dir: String,
    /// 输出文件名前缀，帧文件为 `<output>_###.png`
    pub output: String,
    /// 背景颜色 "r,g,b"，分量位于 [0,1]
    pub background_color: String,

    // ===== 动画 =====
    pub fps: usize,
    pub frames: usize,
    /// 第0帧对应的时间（秒）
    pub start_time: f32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        let home = ControlPoints::default();
        let point = |i: usize| format_vec2(&home.points[i]);
        let projection = ProjectionBox::default();

        Self {
            p0: point(0),
            p1: point(1),
            p2: point(2),
            p3: point(3),
            curve_steps: 100,
            tracker_size: 0.01,

            cube_scale: DEFAULT_CUBE_SCALE,
            cube_rotation: DEFAULT_CUBE_ROTATION,
            auto_rotate: true,

            projection_left: projection.left,
            projection_right: projection.right,
            projection_bottom: projection.bottom,
            projection_top: projection.top,
            projection_near: projection.near,
            projection_far: projection.far,

            drag_sensitivity: 0.01,
            wheel_sensitivity: 0.01,

            width: 512,
            height: 512,
            output_dir: "output_frames".to_string(),
            output: "frame".to_string(),
            background_color: "0,0,0".to_string(),

            fps: 60,
            frames: 120,
            start_time: 0.0,
        }
    }
}

/// 解析逗号分隔的二维点
pub fn parse_vec2(s: &str) -> Result<Point2<f32>, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        return Err(format!("需要2个逗号分隔的值: '{}'", s));
    }
    let x = parts[0]
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("无效数字 '{}': {}", parts[0], e))?;
    let y = parts[1]
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("无效数字 '{}': {}", parts[1], e))?;
    Ok(Point2::new(x, y))
}

/// 解析逗号分隔的三维向量
pub fn parse_vec3(s: &str) -> Result<Vector3<f32>, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("需要3个逗号分隔的值: '{}'", s));
    }
    let mut values = [0.0f32; 3];
    for (value, part) in values.iter_mut().zip(parts.iter()) {
        *value = part
            .trim()
            .parse::<f32>()
            .map_err(|e| format!("无效数字 '{}': {}", part, e))?;
    }
    Ok(Vector3::from(values))
}

pub fn format_vec2(point: &Point2<f32>) -> String {
    format!("{},{}", point.x, point.y)
}

impl SceneSettings {
    pub fn control_points(&self) -> Result<ControlPoints, String> {
        Ok(ControlPoints::new(
            parse_vec2(&self.p0).map_err(|e| format!("p0: {}", e))?,
            parse_vec2(&self.p1).map_err(|e| format!("p1: {}", e))?,
            parse_vec2(&self.p2).map_err(|e| format!("p2: {}", e))?,
            parse_vec2(&self.p3).map_err(|e| format!("p3: {}", e))?,
        ))
    }

    pub fn transform_state(&self) -> TransformState {
        TransformState {
            cube_rotation: self.cube_rotation,
            auto_rotate: self.auto_rotate,
            space_y_rotation: 0.0,
            zoom: 0.0,
            cube_scale: self.cube_scale,
        }
    }

    pub fn projection_box(&self) -> ProjectionBox {
        ProjectionBox {
            left: self.projection_left,
            right: self.projection_right,
            bottom: self.projection_bottom,
            top: self.projection_top,
            near: self.projection_near,
            far: self.projection_far,
        }
    }

    pub fn composer_settings(&self) -> ComposerSettings {
        ComposerSettings {
            projection: self.projection_box(),
            curve_steps: self.curve_steps,
            curve_space: (1.0, 1.0),
        }
    }

    pub fn input_handler(&self) -> Result<InputHandler, String> {
        Ok(InputHandler {
            drag_sensitivity: self.drag_sensitivity,
            wheel_sensitivity: self.wheel_sensitivity,
            home_points: self.control_points()?,
        })
    }

    /// 初始场景状态
    pub fn initial_scene(&self) -> Result<Scene, String> {
        Ok(Scene::new(self.control_points()?, self.transform_state()))
    }

    pub fn background_rgb(&self) -> Result<[u8; 3], String> {
        let color = parse_vec3(&self.background_color)
            .map_err(|e| format!("background_color: {}", e))?;
        let c = color.map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8);
        Ok([c.x, c.y, c.z])
    }

    /// 验证设置
    ///
    /// 投影边界重合不在此处拒绝：退化矩阵会原样传递，只表现为画面异常。
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err("错误: 图像宽度和高度必须大于0".to_string());
        }
        if self.fps == 0 {
            return Err("错误: 帧率必须大于0".to_string());
        }
        if self.curve_steps == 0 {
            return Err("错误: 曲线段数必须大于0".to_string());
        }
        if self.output_dir.trim().is_empty() {
            return Err("错误: 输出目录不能为空".to_string());
        }
        if self.output.trim().is_empty() {
            return Err("错误: 输出文件名不能为空".to_string());
        }
        self.control_points()?;
        self.background_rgb()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_and_match_scene_defaults() {
        let settings = SceneSettings::default();
        settings.validate().unwrap();
        assert_eq!(settings.control_points().unwrap(), ControlPoints::default());
        assert_eq!(settings.transform_state(), TransformState::default());
        assert_eq!(settings.composer_settings(), ComposerSettings::default());
        assert_eq!(settings.background_rgb().unwrap(), [0, 0, 0]);
    }

    #[test]
    fn parses_points_and_vectors() {
        assert_eq!(parse_vec2(" 0.25, 1 ").unwrap(), Point2::new(0.25, 1.0));
        assert!(parse_vec2("1,2,3").is_err());
        assert!(parse_vec2("a,1").is_err());
        assert_eq!(parse_vec3("1,0.5,0").unwrap(), Vector3::new(1.0, 0.5, 0.0));
        assert!(parse_vec3("1,0.5").is_err());
    }

    #[test]
    fn validation_rejects_broken_values() {
        let settings = SceneSettings {
            p2: "0.5;0.5".to_string(),
            ..SceneSettings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.starts_with("p2"), "{err}");

        let settings = SceneSettings {
            fps: 0,
            ..SceneSettings::default()
        };
        assert!(settings.validate().is_err());

        // 退化投影不是配置错误
        let settings = SceneSettings {
            projection_near: 1.0,
            projection_far: 1.0,
            ..SceneSettings::default()
        };
        assert!(settings.validate().is_ok());
    }
}
