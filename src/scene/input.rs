use crate::scene::state::{ControlPoints, Scene, normalize_pixel};
use log::{debug, warn};
use nalgebra::Point2;
use std::str::FromStr;

/// 来自指针、滚轮与键盘的输入事件
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// 在3D画布上按下指针，开始拖拽
    PointerDown { x: f32 },
    /// 指针移动；仅在拖拽中生效
    PointerMove { x: f32 },
    /// 松开指针，结束拖拽
    PointerUp,
    /// 滚轮滚动
    Wheel { delta_y: f32 },
    /// 空格键：切换自动旋转
    ToggleAutoRotate,
    /// `r` 键：重置变换与控制点
    Reset,
    /// 在2D画布上拖动控制点，坐标为容器相对像素
    MoveControlPoint {
        index: usize,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// 输入灵敏度与重置目标
#[derive(Debug, Clone)]
pub struct InputHandler {
    pub drag_sensitivity: f32,
    pub wheel_sensitivity: f32,
    /// `Reset` 恢复到的控制点
    pub home_points: ControlPoints,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self {
            drag_sensitivity: 0.01,
            wheel_sensitivity: 0.01,
            home_points: ControlPoints::default(),
        }
    }
}

impl InputHandler {
    /// 将事件作用于场景状态，在下一次合成时可见
    pub fn apply(&self, scene: &mut Scene, event: &InputEvent) {
        match *event {
            InputEvent::PointerDown { x } => {
                scene.drag_anchor = Some(x);
            }
            InputEvent::PointerMove { x } => {
                if let Some(last_x) = scene.drag_anchor {
                    scene.transform.space_y_rotation += (x - last_x) * self.drag_sensitivity;
                    scene.drag_anchor = Some(x);
                    debug!("spaceYRotation: {:.2}", scene.transform.space_y_rotation);
                }
            }
            InputEvent::PointerUp => {
                scene.drag_anchor = None;
            }
            InputEvent::Wheel { delta_y } => {
                scene.transform.zoom += delta_y * self.wheel_sensitivity;
                debug!("zoom: {:.2}", scene.transform.zoom);
            }
            InputEvent::ToggleAutoRotate => {
                scene.transform.auto_rotate = !scene.transform.auto_rotate;
                debug!("自动旋转: {}", scene.transform.auto_rotate);
            }
            InputEvent::Reset => {
                scene.transform.reset();
                scene.control_points = self.home_points;
                debug!("已重置变换与控制点");
            }
            InputEvent::MoveControlPoint {
                index,
                x,
                y,
                width,
                height,
            } => {
                let point = normalize_pixel(&Point2::new(x, y), width, height);
                if !scene.control_points.set(index, point) {
                    warn!("忽略越界的控制点索引 {}", index);
                }
            }
        }
    }

    pub fn apply_all<'a, I>(&self, scene: &mut Scene, events: I)
    where
        I: IntoIterator<Item = &'a InputEvent>,
    {
        for event in events {
            self.apply(scene, event);
        }
    }
}

// 事件脚本的文本格式，每行一个事件：
//   down <x> | move <x> | up | wheel <dy> | toggle | reset
//   point <index> <x> <y> <width> <height>
impl FromStr for InputEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let keyword = parts.next().ok_or("空事件")?;
        let args: Vec<&str> = parts.collect();

        let number = |i: usize| -> Result<f32, String> {
            let raw = args
                .get(i)
                .ok_or_else(|| format!("事件 '{}' 缺少第{}个参数", keyword, i + 1))?;
            raw.parse::<f32>()
                .map_err(|e| format!("无效数字 '{}': {}", raw, e))
        };
        let expect_args = |n: usize| -> Result<(), String> {
            if args.len() == n {
                Ok(())
            } else {
                Err(format!(
                    "事件 '{}' 需要{}个参数，实际{}个",
                    keyword,
                    n,
                    args.len()
                ))
            }
        };

        match keyword {
            "down" => {
                expect_args(1)?;
                Ok(InputEvent::PointerDown { x: number(0)? })
            }
            "move" => {
                expect_args(1)?;
                Ok(InputEvent::PointerMove { x: number(0)? })
            }
            "up" => {
                expect_args(0)?;
                Ok(InputEvent::PointerUp)
            }
            "wheel" => {
                expect_args(1)?;
                Ok(InputEvent::Wheel {
                    delta_y: number(0)?,
                })
            }
            "toggle" => {
                expect_args(0)?;
                Ok(InputEvent::ToggleAutoRotate)
            }
            "reset" => {
                expect_args(0)?;
                Ok(InputEvent::Reset)
            }
            "point" => {
                expect_args(5)?;
                let index = args[0]
                    .parse::<usize>()
                    .map_err(|e| format!("无效索引 '{}': {}", args[0], e))?;
                Ok(InputEvent::MoveControlPoint {
                    index,
                    x: number(1)?,
                    y: number(2)?,
                    width: number(3)?,
                    height: number(4)?,
                })
            }
            other => Err(format!("未知事件类型 '{}'", other)),
        }
    }
}

/// 解析事件脚本，忽略空行与 `#` 注释
pub fn parse_event_script(content: &str) -> Result<Vec<InputEvent>, String> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i, line.split('#').next().unwrap_or("").trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(i, line)| {
            line.parse::<InputEvent>()
                .map_err(|e| format!("第{}行: {}", i + 1, e))
        })
        .collect()
}
