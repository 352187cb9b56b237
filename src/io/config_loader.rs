use crate::io::scene_settings::{SceneSettings, parse_vec2};
use log::warn;
use std::path::Path;
use toml::Value;

/// TOML配置管理器 - 统一处理场景配置的读写
pub struct TomlConfigLoader;

impl TomlConfigLoader {
    /// 从TOML文件加载完整配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<SceneSettings, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("读取配置文件失败: {}", e))?;

        Self::load_from_content(&content)
    }

    /// 从TOML内容字符串加载配置
    pub fn load_from_content(content: &str) -> Result<SceneSettings, String> {
        let toml_value: Value =
            toml::from_str(content).map_err(|e| format!("解析TOML失败: {}", e))?;

        Self::parse_toml_to_settings(toml_value)
    }

    /// 保存配置到TOML文件
    pub fn save_to_file<P: AsRef<Path>>(settings: &SceneSettings, path: P) -> Result<(), String> {
        let toml_content = Self::settings_to_toml(settings);
        std::fs::write(path, toml_content).map_err(|e| format!("写入配置文件失败: {}", e))
    }

    /// 以默认设置写出示例配置
    pub fn create_example_config<P: AsRef<Path>>(path: P) -> Result<(), String> {
        Self::save_to_file(&SceneSettings::default(), path)
            .map_err(|e| format!("创建示例配置失败: {}", e))
    }

    // ===== TOML -> SceneSettings 转换 =====

    fn parse_toml_to_settings(toml: Value) -> Result<SceneSettings, String> {
        let mut settings = SceneSettings::default();

        // [curve] 部分
        if let Some(curve) = toml.get("curve").and_then(|v| v.as_table()) {
            Self::parse_curve_section(&mut settings, curve)?;
        }

        // [cube] 部分
        if let Some(cube) = toml.get("cube").and_then(|v| v.as_table()) {
            Self::parse_cube_section(&mut settings, cube);
        }

        // [projection] 部分
        if let Some(projection) = toml.get("projection").and_then(|v| v.as_table()) {
            Self::parse_projection_section(&mut settings, projection);
        }

        // [input] 部分
        if let Some(input) = toml.get("input").and_then(|v| v.as_table()) {
            Self::parse_input_section(&mut settings, input);
        }

        // [output] 部分
        if let Some(output) = toml.get("output").and_then(|v| v.as_table()) {
            Self::parse_output_section(&mut settings, output);
        }

        // [animation] 部分
        if let Some(animation) = toml.get("animation").and_then(|v| v.as_table()) {
            Self::parse_animation_section(&mut settings, animation);
        }

        Ok(settings)
    }

    // ===== 各个section的解析方法 =====

    fn parse_curve_section(settings: &mut SceneSettings, curve: &toml::Table) -> Result<(), String> {
        let targets = [
            ("p0", &mut settings.p0),
            ("p1", &mut settings.p1),
            ("p2", &mut settings.p2),
            ("p3", &mut settings.p3),
        ];
        for (key, target) in targets {
            if let Some(point) = curve.get(key).and_then(|v| v.as_str()) {
                // 控制点格式错误属于配置错误，不静默忽略
                parse_vec2(point).map_err(|e| format!("[curve] {}: {}", key, e))?;
                *target = point.to_string();
            }
        }
        if let Some(steps) = curve.get("steps").and_then(|v| v.as_integer()) {
            if steps > 0 {
                settings.curve_steps = steps as usize;
            } else {
                warn!("无效的曲线段数 {}, 使用默认值{}", steps, settings.curve_steps);
            }
        }
        if let Some(tracker_size) = float_value(curve, "tracker_size") {
            if tracker_size >= 0.0 {
                settings.tracker_size = tracker_size;
            } else {
                warn!("跟随标记尺寸不能为负: {}", tracker_size);
            }
        }
        Ok(())
    }

    fn parse_cube_section(settings: &mut SceneSettings, cube: &toml::Table) {
        if let Some(scale) = float_value(cube, "scale") {
            settings.cube_scale = scale;
        }
        if let Some(rotation) = float_value(cube, "rotation") {
            settings.cube_rotation = rotation;
        }
        if let Some(auto_rotate) = cube.get("auto_rotate").and_then(|v| v.as_bool()) {
            settings.auto_rotate = auto_rotate;
        }
    }

    fn parse_projection_section(settings: &mut SceneSettings, projection: &toml::Table) {
        let targets = [
            ("left", &mut settings.projection_left),
            ("right", &mut settings.projection_right),
            ("bottom", &mut settings.projection_bottom),
            ("top", &mut settings.projection_top),
            ("near", &mut settings.projection_near),
            ("far", &mut settings.projection_far),
        ];
        for (key, target) in targets {
            if let Some(value) = float_value(projection, key) {
                *target = value;
            }
        }
        if settings.projection_left == settings.projection_right
            || settings.projection_bottom == settings.projection_top
            || settings.projection_near == settings.projection_far
        {
            warn!("正交投影边界重合，生成的矩阵将包含非有限值");
        }
    }

    fn parse_input_section(settings: &mut SceneSettings, input: &toml::Table) {
        if let Some(drag) = float_value(input, "drag_sensitivity") {
            settings.drag_sensitivity = drag;
        }
        if let Some(wheel) = float_value(input, "wheel_sensitivity") {
            settings.wheel_sensitivity = wheel;
        }
    }

    fn parse_output_section(settings: &mut SceneSettings, output: &toml::Table) {
        if let Some(width) = output.get("width").and_then(|v| v.as_integer()) {
            if width > 0 {
                settings.width = width as usize;
            } else {
                warn!("无效的图像宽度 {}, 使用默认值{}", width, settings.width);
            }
        }
        if let Some(height) = output.get("height").and_then(|v| v.as_integer()) {
            if height > 0 {
                settings.height = height as usize;
            } else {
                warn!("无效的图像高度 {}, 使用默认值{}", height, settings.height);
            }
        }
        if let Some(output_dir) = output.get("output_dir").and_then(|v| v.as_str()) {
            settings.output_dir = output_dir.to_string();
        }
        if let Some(name) = output.get("output").and_then(|v| v.as_str()) {
            settings.output = name.to_string();
        }
        if let Some(background) = output.get("background_color").and_then(|v| v.as_str()) {
            settings.background_color = background.to_string();
        }
    }

    fn parse_animation_section(settings: &mut SceneSettings, animation: &toml::Table) {
        if let Some(fps) = animation.get("fps").and_then(|v| v.as_integer()) {
            if fps > 0 {
                settings.fps = fps as usize;
            } else {
                warn!("无效的帧率 {}, 使用默认值{}", fps, settings.fps);
            }
        }
        if let Some(frames) = animation.get("frames").and_then(|v| v.as_integer()) {
            if frames >= 0 {
                settings.frames = frames as usize;
            } else {
                warn!("无效的帧数 {}, 使用默认值{}", frames, settings.frames);
            }
        }
        if let Some(start_time) = float_value(animation, "start_time") {
            settings.start_time = start_time;
        }
    }

    // ===== SceneSettings -> TOML 转换 =====

    fn settings_to_toml(settings: &SceneSettings) -> String {
        let mut content = String::new();

        content.push_str("# 贝塞尔立方体动画配置文件\n");
        content.push_str("# 基于SceneSettings默认值生成\n\n");

        // [curve] 部分
        content.push_str("[curve]\n");
        content.push_str("# 控制点使用归一化画布坐标，原点在左上角\n");
        content.push_str(&format!("p0 = \"{}\"\n", settings.p0));
        content.push_str(&format!("p1 = \"{}\"\n", settings.p1));
        content.push_str(&format!("p2 = \"{}\"\n", settings.p2));
        content.push_str(&format!("p3 = \"{}\"\n", settings.p3));
        content.push_str(&format!("steps = {}\n", settings.curve_steps));
        content.push_str(&format!(
            "tracker_size = {}\n",
            float_literal(settings.tracker_size)
        ));
        content.push('\n');

        // [cube] 部分
        content.push_str("[cube]\n");
        content.push_str(&format!("scale = {}\n", float_literal(settings.cube_scale)));
        content.push_str(&format!(
            "rotation = {}\n",
            float_literal(settings.cube_rotation)
        ));
        content.push_str(&format!("auto_rotate = {}\n", settings.auto_rotate));
        content.push('\n');

        // [projection] 部分
        content.push_str("[projection]\n");
        content.push_str(&format!("left = {}\n", float_literal(settings.projection_left)));
        content.push_str(&format!(
            "right = {}\n",
            float_literal(settings.projection_right)
        ));
        content.push_str(&format!(
            "bottom = {}\n",
            float_literal(settings.projection_bottom)
        ));
        content.push_str(&format!("top = {}\n", float_literal(settings.projection_top)));
        content.push_str(&format!("near = {}\n", float_literal(settings.projection_near)));
        content.push_str(&format!("far = {}\n", float_literal(settings.projection_far)));
        content.push('\n');

        // [input] 部分
        content.push_str("[input]\n");
        content.push_str(&format!(
            "drag_sensitivity = {}\n",
            float_literal(settings.drag_sensitivity)
        ));
        content.push_str(&format!(
            "wheel_sensitivity = {}\n",
            float_literal(settings.wheel_sensitivity)
        ));
        content.push('\n');

        // [output] 部分
        content.push_str("[output]\n");
        content.push_str(&format!("width = {}\n", settings.width));
        content.push_str(&format!("height = {}\n", settings.height));
        content.push_str(&format!("output_dir = \"{}\"\n", settings.output_dir));
        content.push_str(&format!("output = \"{}\"\n", settings.output));
        content.push_str(&format!(
            "background_color = \"{}\"\n",
            settings.background_color
        ));
        content.push('\n');

        // [animation] 部分
        content.push_str("[animation]\n");
        content.push_str(&format!("fps = {}\n", settings.fps));
        content.push_str(&format!("frames = {}\n", settings.frames));
        content.push_str(&format!(
            "start_time = {}\n",
            float_literal(settings.start_time)
        ));

        content
    }
}

/// 读取浮点值，整数写法（如 `far = 100`）同样接受
fn float_value(table: &toml::Table, key: &str) -> Option<f32> {
    table
        .get(key)
        .and_then(|v| v.as_float().or_else(|| v.as_integer().map(|i| i as f64)))
        .map(|v| v as f32)
}

/// TOML浮点字面量必须带小数点或指数
fn float_literal(value: f32) -> String {
    let text = format!("{}", value);
    if text.contains(['.', 'e', 'E']) || !value.is_finite() {
        text
    } else {
        format!("{}.0", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::state::ControlPoints;
    use nalgebra::Point2;

    #[test]
    fn example_config_round_trips_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("example.toml");
        TomlConfigLoader::create_example_config(&path).unwrap();

        let loaded = TomlConfigLoader::load_from_file(&path).unwrap();
        let defaults = SceneSettings::default();
        assert_eq!(loaded.control_points().unwrap(), ControlPoints::default());
        assert_eq!(loaded.transform_state(), defaults.transform_state());
        assert_eq!(loaded.composer_settings(), defaults.composer_settings());
        assert_eq!(loaded.width, defaults.width);
        assert_eq!(loaded.fps, defaults.fps);
        assert_eq!(loaded.output_dir, defaults.output_dir);
    }

    #[test]
    fn partial_config_overrides_only_given_keys() {
        let settings = TomlConfigLoader::load_from_content(
            r#"
            [curve]
            p1 = "0.2, 0.9"
            steps = 40

            [cube]
            auto_rotate = false
            rotation = 1

            [projection]
            far = 50
            "#,
        )
        .unwrap();

        let points = settings.control_points().unwrap();
        assert_eq!(points.points[1], Point2::new(0.2, 0.9));
        assert_eq!(points.points[0], ControlPoints::default().points[0]);
        assert_eq!(settings.curve_steps, 40);
        assert!(!settings.auto_rotate);
        assert_eq!(settings.cube_rotation, 1.0);
        assert_eq!(settings.projection_far, 50.0);
        assert_eq!(settings.projection_near, 0.1);
    }

    #[test]
    fn invalid_values_fall_back_or_fail() {
        let settings = TomlConfigLoader::load_from_content(
            r#"
            [output]
            width = -3
            [animation]
            fps = 0
            "#,
        )
        .unwrap();
        assert_eq!(settings.width, 512);
        assert_eq!(settings.fps, 60);

        let err = TomlConfigLoader::load_from_content("[curve]\np3 = \"0.5\"\n").unwrap_err();
        assert!(err.contains("p3"), "{err}");

        assert!(TomlConfigLoader::load_from_content("[curve\n").is_err());
        assert!(TomlConfigLoader::load_from_file("/nonexistent/scene.toml").is_err());
    }

    #[test]
    fn float_literals_stay_floats() {
        assert_eq!(float_literal(100.0), "100.0");
        assert_eq!(float_literal(0.1), "0.1");
        assert_eq!(float_literal(-1.0), "-1.0");
    }
}
