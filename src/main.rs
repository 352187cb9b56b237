use log::info;
use std::time::Instant;

mod geometry;
mod io;
mod render;
mod scene;
mod utils;

use io::cli::Cli;
use utils::animation_utils::{
    AnimationJob, prepare_scene, render_frames_parallel, run_animation_loop,
};

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = Cli::process()?;
    let settings = &options.settings;
    let start_time = Instant::now();

    let mut scene = prepare_scene(settings, &options.events)?;
    info!(
        "画布 {}x{}，{} 帧 @ {} fps，自动旋转: {}",
        settings.width,
        settings.height,
        settings.frames,
        settings.fps,
        scene.transform.auto_rotate
    );

    let job = AnimationJob::new(settings, options.save_frames)?;
    let stats = if options.parallel {
        render_frames_parallel(&job, &scene)?
    } else {
        run_animation_loop(&job, &mut scene)?
    };

    if let Some(last) = stats.last() {
        info!(
            "最后一帧 t={:.3}s，曲线参数 {:.3}，着色像素 {}",
            last.time, last.delta, last.painted_pixels
        );
    }
    if options.save_frames {
        info!("帧已写入 {}", settings.output_dir);
    }
    info!("总耗时 {:?}", start_time.elapsed());

    Ok(())
}
