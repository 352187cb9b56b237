use crate::io::scene_settings::SceneSettings;
use crate::render::frame_buffer::FrameBuffer;
use crate::render::renderer::SceneRenderer;
use crate::scene::composer::{ComposerSettings, compose_frame_transform};
use crate::scene::input::InputEvent;
use crate::scene::state::Scene;
use crate::utils::save_utils::{ensure_output_dir, frame_path, save_frame_buffer};
use log::{debug, info};
use rayon::prelude::*;
use std::time::Instant;

/// 帧号到动画时间（秒）的映射
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    pub fps: usize,
    pub start_time: f32,
}

impl FrameClock {
    pub fn new(fps: usize, start_time: f32) -> Self {
        Self { fps, start_time }
    }

    pub fn from_settings(settings: &SceneSettings) -> Self {
        Self::new(settings.fps, settings.start_time)
    }

    pub fn time_at(&self, frame: usize) -> f32 {
        self.start_time + frame as f32 / self.fps as f32
    }
}

/// 单帧渲染统计
#[derive(Debug, Clone, PartialEq)]
pub struct FrameStats {
    pub frame: usize,
    pub time: f32,
    pub delta: f32,
    pub painted_pixels: usize,
}

/// 动画导出所需的全部上下文
pub struct AnimationJob<'a> {
    pub settings: &'a SceneSettings,
    pub composer: ComposerSettings,
    pub renderer: SceneRenderer,
    pub clock: FrameClock,
    pub background: [u8; 3],
    pub save_frames: bool,
}

impl<'a> AnimationJob<'a> {
    pub fn new(settings: &'a SceneSettings, save_frames: bool) -> Result<Self, String> {
        Ok(Self {
            settings,
            composer: settings.composer_settings(),
            renderer: SceneRenderer::new(settings.tracker_size),
            clock: FrameClock::from_settings(settings),
            background: settings.background_rgb()?,
            save_frames,
        })
    }

    /// 在场景上推进到 `frame` 对应的时间，合成并绘制到帧缓冲
    fn render_frame(
        &self,
        scene: &mut Scene,
        frame: usize,
        frame_buffer: &mut FrameBuffer,
    ) -> Result<FrameStats, String> {
        let time = self.clock.time_at(frame);
        scene.transform.advance(time);

        let transform =
            compose_frame_transform(time, &scene.control_points, &scene.transform, &self.composer);
        self.renderer.draw_frame(frame_buffer, &transform);

        if self.save_frames {
            let path = frame_path(&self.settings.output_dir, &self.settings.output, frame);
            save_frame_buffer(&path, frame_buffer)?;
        }

        Ok(FrameStats {
            frame,
            time,
            delta: transform.delta,
            painted_pixels: frame_buffer.painted_pixel_count(),
        })
    }

    fn new_frame_buffer(&self) -> FrameBuffer {
        FrameBuffer::with_background(self.settings.width, self.settings.height, self.background)
    }

    fn prepare_output(&self) -> Result<(), String> {
        if self.save_frames {
            ensure_output_dir(&self.settings.output_dir)?;
        }
        Ok(())
    }
}

/// 由设置构建初始场景，并在第一帧之前依次应用脚本事件
pub fn prepare_scene(settings: &SceneSettings, events: &[InputEvent]) -> Result<Scene, String> {
    let mut scene = settings.initial_scene()?;
    let handler = settings.input_handler()?;
    handler.apply_all(&mut scene, events);
    Ok(scene)
}

/// 运行动画循环
///
/// 单线程逐帧推进场景状态、合成变换、绘制并保存，每帧复用同一个帧缓冲。
pub fn run_animation_loop(job: &AnimationJob, scene: &mut Scene) -> Result<Vec<FrameStats>, String> {
    let total_frames = job.settings.frames;
    info!("开始动画渲染 ({} 帧)...", total_frames);
    job.prepare_output()?;

    let mut frame_buffer = job.new_frame_buffer();
    let mut stats = Vec::with_capacity(total_frames);

    for frame in 0..total_frames {
        let frame_start_time = Instant::now();
        let frame_stats = job.render_frame(scene, frame, &mut frame_buffer)?;

        debug!(
            "帧 {:03} 渲染完成 (t={:.3}, delta={:.3})，耗时 {:?}",
            frame,
            frame_stats.time,
            frame_stats.delta,
            frame_start_time.elapsed()
        );
        stats.push(frame_stats);
    }

    info!("动画渲染完成。");
    Ok(stats)
}

/// 并行导出所有帧
///
/// 每帧从 `scene` 的快照出发独立推进，因此只适用于帧间没有输入事件的导出：
/// 自动旋转角度只取决于时间，手动模式下状态不随帧变化，结果与顺序循环一致。
pub fn render_frames_parallel(job: &AnimationJob, scene: &Scene) -> Result<Vec<FrameStats>, String> {
    let total_frames = job.settings.frames;
    info!("开始并行动画渲染 ({} 帧)...", total_frames);
    job.prepare_output()?;

    let start_time = Instant::now();
    let stats = (0..total_frames)
        .into_par_iter()
        .map(|frame| {
            let mut snapshot = scene.clone();
            let mut frame_buffer = job.new_frame_buffer();
            job.render_frame(&mut snapshot, frame, &mut frame_buffer)
        })
        .collect::<Result<Vec<_>, String>>()?;

    info!("并行动画渲染完成，总耗时 {:?}", start_time.elapsed());
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_settings(frames: usize) -> SceneSettings {
        SceneSettings {
            width: 64,
            height: 64,
            fps: 10,
            frames,
            ..SceneSettings::default()
        }
    }

    #[test]
    fn clock_maps_frames_to_seconds() {
        let clock = FrameClock::new(4, 1.0);
        assert_eq!(clock.time_at(0), 1.0);
        assert_eq!(clock.time_at(2), 1.5);
    }

    #[test]
    fn sequential_loop_persists_auto_rotation() {
        let settings = small_settings(3);
        let job = AnimationJob::new(&settings, false).unwrap();
        let mut scene = prepare_scene(&settings, &[]).unwrap();

        let stats = run_animation_loop(&job, &mut scene).unwrap();
        assert_eq!(stats.len(), 3);
        assert!(stats.iter().all(|s| s.painted_pixels > 0));
        assert!((scene.transform.cube_rotation - 0.2).abs() < 1e-6);
    }

    #[test]
    fn parallel_export_matches_sequential() {
        let settings = small_settings(4);
        let job = AnimationJob::new(&settings, false).unwrap();
        let scene = prepare_scene(&settings, &[InputEvent::Wheel { delta_y: -30.0 }]).unwrap();

        let parallel = render_frames_parallel(&job, &scene).unwrap();
        let mut sequential_scene = scene.clone();
        let sequential = run_animation_loop(&job, &mut sequential_scene).unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn scripted_events_apply_before_first_frame() {
        let settings = small_settings(1);
        let scene = prepare_scene(
            &settings,
            &[
                InputEvent::ToggleAutoRotate,
                InputEvent::PointerDown { x: 0.0 },
                InputEvent::PointerMove { x: 100.0 },
            ],
        )
        .unwrap();
        assert!(!scene.transform.auto_rotate);
        assert!((scene.transform.space_y_rotation - 1.0).abs() < 1e-6);
    }

    #[test]
    fn frames_are_written_to_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let settings = SceneSettings {
            output_dir: dir.path().join("frames").to_str().unwrap().to_string(),
            ..small_settings(2)
        };
        let job = AnimationJob::new(&settings, true).unwrap();
        let mut scene = prepare_scene(&settings, &[]).unwrap();
        run_animation_loop(&job, &mut scene).unwrap();

        assert!(frame_path(&settings.output_dir, "frame", 0).exists());
        assert!(frame_path(&settings.output_dir, "frame", 1).exists());
        assert!(!frame_path(&settings.output_dir, "frame", 2).exists());
    }
}
