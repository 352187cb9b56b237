use crate::io::config_loader::TomlConfigLoader;
use crate::io::scene_settings::SceneSettings;
use crate::scene::input::{InputEvent, parse_event_script};
use clap::Parser;
use log::info;

/// 极简CLI - 配置文件驱动的离屏动画导出
#[derive(Parser, Debug)]
#[command(name = "bezier-cube")]
#[command(about = "沿三次贝塞尔曲线运动的立方体动画")]
pub struct Cli {
    /// 配置文件路径（TOML格式）
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// 使用示例配置（写出并加载）
    #[arg(long)]
    pub use_example_config: bool,

    /// 覆盖配置中的帧数
    #[arg(short, long, value_name = "N")]
    pub frames: Option<usize>,

    /// 输入事件脚本，在第一帧之前依次应用
    #[arg(short, long, value_name = "FILE")]
    pub events: Option<String>,

    /// 只渲染不写出PNG
    #[arg(long)]
    pub no_save: bool,

    /// 使用rayon并行导出各帧
    #[arg(long)]
    pub parallel: bool,
}

/// CLI处理结果
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub settings: SceneSettings,
    pub events: Vec<InputEvent>,
    pub save_frames: bool,
    pub parallel: bool,
}

impl Cli {
    /// 解析进程参数
    pub fn process() -> Result<RunOptions, String> {
        Self::parse().into_run_options()
    }

    pub fn into_run_options(self) -> Result<RunOptions, String> {
        let mut settings = if self.use_example_config {
            let example_path = "example_config.toml";
            TomlConfigLoader::create_example_config(example_path)?;
            info!("已创建示例配置: {}", example_path);

            TomlConfigLoader::load_from_file(example_path)
                .map_err(|e| format!("加载示例配置失败: {}", e))?
        } else if let Some(config_path) = &self.config {
            info!("加载配置文件: {}", config_path);
            TomlConfigLoader::load_from_file(config_path)
                .map_err(|e| format!("配置文件加载失败: {}", e))?
        } else {
            info!("使用默认设置");
            SceneSettings::default()
        };

        if let Some(frames) = self.frames {
            settings.frames = frames;
        }

        let events = match &self.events {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .map_err(|e| format!("读取事件脚本失败: {}", e))?;
                let events = parse_event_script(&content)
                    .map_err(|e| format!("事件脚本解析失败: {}", e))?;
                info!("从 {} 读取了 {} 个输入事件", path, events.len());
                events
            }
            None => Vec::new(),
        };

        settings.validate()?;

        Ok(RunOptions {
            settings,
            events,
            save_frames: !self.no_save,
            parallel: self.parallel,
        })
    }
}
