use crate::render::frame_buffer::FrameBuffer;
use image::ColorType;
use log::debug;
use std::path::{Path, PathBuf};

/// 保存RGB图像数据到PNG文件
///
/// # 参数
/// * `path` - 输出文件路径
/// * `data` - RGB数据（u8数组）
/// * `width` - 图像宽度
/// * `height` - 图像高度
pub fn save_image(path: &Path, data: &[u8], width: u32, height: u32) -> Result<(), String> {
    image::save_buffer(path, data, width, height, ColorType::Rgb8)
        .map_err(|e| format!("保存图像到 {} 时出错: {}", path.display(), e))?;
    debug!("图像已保存到 {}", path.display());
    Ok(())
}

/// 保存帧缓冲的颜色数据
pub fn save_frame_buffer(path: &Path, frame_buffer: &FrameBuffer) -> Result<(), String> {
    save_image(
        path,
        &frame_buffer.get_color_buffer_bytes(),
        frame_buffer.width as u32,
        frame_buffer.height as u32,
    )
}

/// 第 `frame` 帧的输出路径：`<output_dir>/<output>_###.png`
pub fn frame_path(output_dir: &str, output: &str, frame: usize) -> PathBuf {
    Path::new(output_dir).join(format!("{}_{:03}.png", output, frame))
}

/// 确保输出目录存在
pub fn ensure_output_dir(output_dir: &str) -> Result<(), String> {
    std::fs::create_dir_all(output_dir)
        .map_err(|e| format!("创建输出目录 {} 失败: {}", output_dir, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_paths_are_zero_padded() {
        let path = frame_path("out", "frame", 7);
        assert_eq!(path, Path::new("out").join("frame_007.png"));
        assert_eq!(
            frame_path("out", "frame", 1234).file_name().unwrap(),
            "frame_1234.png"
        );
    }

    #[test]
    fn saved_png_has_frame_size() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        let nested = nested.to_str().unwrap();
        ensure_output_dir(nested).unwrap();

        let frame_buffer = FrameBuffer::with_background(6, 4, [0, 0, 255]);
        let path = frame_path(nested, "frame", 0);
        save_frame_buffer(&path, &frame_buffer).unwrap();

        let image = image::open(&path).unwrap().to_rgb8();
        assert_eq!(image.dimensions(), (6, 4));
        assert_eq!(image.get_pixel(5, 3).0, [0, 0, 255]);
    }
}
