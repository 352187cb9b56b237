use crate::geometry::cube_mesh::CubeMesh;
use crate::geometry::transform::transform_point;
use crate::render::render_target::{RenderTarget, UniformSlot};
use crate::render::shaders::cube_vertex_color;
use atomic_float::AtomicF32;
use nalgebra::{Matrix4, Point2, Point3, Vector3, Vector4};
use rayon::prelude::*;
use std::sync::atomic::{AtomicU8, Ordering};

/// 曲线颜色（与曲线片元着色器一致的纯蓝）
pub const CURVE_COLOR: [u8; 3] = [0, 0, 255];

/// 软件帧缓冲，作为渲染边界的CPU实现
///
/// 曲线以折线覆盖绘制（不参与深度测试），立方体以三角形边框绘制并做深度测试。
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    /// 存储 [0,1] 深度值，数值越小表示越近。使用原子类型以支持并行写入。
    pub depth_buffer: Vec<AtomicF32>,
    /// 存储RGB颜色值 [0, 255]，类型为u8。使用原子类型以支持并行写入。
    pub color_buffer: Vec<AtomicU8>,
    pub background: [u8; 3],
    curve_mvp: Matrix4<f32>,
    cube_model_view: Matrix4<f32>,
    cube_projection: Matrix4<f32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_background(width, height, [0, 0, 0])
    }

    pub fn with_background(width: usize, height: usize, background: [u8; 3]) -> Self {
        let num_pixels = width * height;

        let depth_buffer = (0..num_pixels)
            .map(|_| AtomicF32::new(f32::INFINITY))
            .collect();

        let color_buffer = (0..num_pixels)
            .flat_map(|_| background.map(AtomicU8::new))
            .collect();

        FrameBuffer {
            width,
            height,
            depth_buffer,
            color_buffer,
            background,
            curve_mvp: Matrix4::identity(),
            cube_model_view: Matrix4::identity(),
            cube_projection: Matrix4::identity(),
        }
    }

    /// 读取单个像素，越界返回 `None`
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y * self.width + x) * 3;
        Some([
            self.color_buffer[index].load(Ordering::Relaxed),
            self.color_buffer[index + 1].load(Ordering::Relaxed),
            self.color_buffer[index + 2].load(Ordering::Relaxed),
        ])
    }

    /// 不同于背景色的像素数量
    pub fn painted_pixel_count(&self) -> usize {
        (0..self.width * self.height)
            .into_par_iter()
            .filter(|&i| self.pixel(i % self.width, i / self.width) != Some(self.background))
            .count()
    }

    /// 获取颜色缓冲区的字节数据
    pub fn get_color_buffer_bytes(&self) -> Vec<u8> {
        self.color_buffer
            .iter()
            .map(|atomic_color| atomic_color.load(Ordering::Relaxed))
            .collect()
    }

    /// 获取深度缓冲区的浮点数据
    pub fn get_depth_buffer_f32(&self) -> Vec<f32> {
        self.depth_buffer
            .iter()
            .map(|atomic_depth| atomic_depth.load(Ordering::Relaxed))
            .collect()
    }

    /// 裁剪空间 -> NDC -> 像素坐标；w 接近零或结果非有限时返回 `None`
    fn clip_to_pixel(&self, clip: &Vector4<f32>) -> Option<Point3<f32>> {
        if clip.w.abs() <= 1e-8 {
            return None;
        }
        let ndc = clip.xyz() / clip.w;
        if !(ndc.x.is_finite() && ndc.y.is_finite() && ndc.z.is_finite()) {
            return None;
        }
        let screen_x = (ndc.x + 1.0) * 0.5 * self.width as f32;
        // 翻转Y轴：NDC中+1是顶部，屏幕坐标中0是顶部
        let screen_y = (1.0 - (ndc.y + 1.0) * 0.5) * self.height as f32;
        let depth = (ndc.z + 1.0) * 0.5;
        Some(Point3::new(screen_x, screen_y, depth))
    }

    fn write_pixel(&self, x: usize, y: usize, color: [u8; 3]) {
        let index = (y * self.width + x) * 3;
        self.color_buffer[index].store(color[0], Ordering::Relaxed);
        self.color_buffer[index + 1].store(color[1], Ordering::Relaxed);
        self.color_buffer[index + 2].store(color[2], Ordering::Relaxed);
    }

    /// DDA 画线；`depth_test` 为真时按 LEQUAL 做深度测试
    fn draw_segment(
        &self,
        from: &Point3<f32>,
        to: &Point3<f32>,
        color_from: &Vector3<f32>,
        color_to: &Vector3<f32>,
        depth_test: bool,
    ) {
        let delta = to - from;
        let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as usize;
        // 远超画布的线段只会浪费时间
        if steps > 4 * (self.width + self.height) {
            return;
        }

        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let p = from + delta * t;
            if p.x < 0.0 || p.y < 0.0 {
                continue;
            }
            let (x, y) = (p.x as usize, p.y as usize);
            if x >= self.width || y >= self.height {
                continue;
            }

            if depth_test {
                let old_depth =
                    self.depth_buffer[y * self.width + x].fetch_min(p.z, Ordering::Relaxed);
                if old_depth < p.z {
                    continue; // 深度测试失败
                }
            }

            let color = color_from.lerp(color_to, t);
            self.write_pixel(x, y, to_rgb8(&color));
        }
    }
}

fn to_rgb8(color: &Vector3<f32>) -> [u8; 3] {
    let c = color.map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8);
    [c.x, c.y, c.z]
}

impl RenderTarget for FrameBuffer {
    fn clear(&mut self) {
        self.depth_buffer.par_iter().for_each(|atomic_depth| {
            atomic_depth.store(f32::INFINITY, Ordering::Relaxed);
        });

        let background = self.background;
        self.color_buffer
            .par_iter()
            .enumerate()
            .for_each(|(i, atomic_color)| {
                atomic_color.store(background[i % 3], Ordering::Relaxed);
            });
    }

    fn set_uniform_matrix(&mut self, slot: UniformSlot, matrix: &[f32; 16]) {
        let matrix = Matrix4::from_column_slice(matrix);
        match slot {
            UniformSlot::CurveMvp => self.curve_mvp = matrix,
            UniformSlot::CubeModelView => self.cube_model_view = matrix,
            UniformSlot::CubeProjection => self.cube_projection = matrix,
        }
    }

    fn draw_line_strip(&mut self, vertices: &[Point2<f32>]) {
        let color = Vector3::new(
            CURVE_COLOR[0] as f32,
            CURVE_COLOR[1] as f32,
            CURVE_COLOR[2] as f32,
        ) / 255.0;

        let pixels: Vec<Option<Point3<f32>>> = vertices
            .iter()
            .map(|v| {
                let clip = transform_point(&self.curve_mvp, &Point3::new(v.x, v.y, 0.0));
                self.clip_to_pixel(&clip)
            })
            .collect();

        for pair in pixels.windows(2) {
            if let (Some(a), Some(b)) = (&pair[0], &pair[1]) {
                self.draw_segment(a, b, &color, &color, false);
            }
        }
    }

    fn draw_indexed_triangles(&mut self, mesh: &CubeMesh) {
        let mvp = self.cube_projection * self.cube_model_view;

        let vertices: Vec<Option<(Point3<f32>, Vector3<f32>)>> = mesh
            .positions
            .iter()
            .zip(mesh.colors.iter())
            .map(|(position, color)| {
                self.clip_to_pixel(&transform_point(&mvp, position))
                    .map(|pixel| (pixel, cube_vertex_color(color, position)))
            })
            .collect();

        let target: &FrameBuffer = self;
        let triangles: Vec<[usize; 3]> = mesh.triangles().collect();
        triangles.par_iter().for_each(|tri| {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                if let (Some((pa, ca)), Some((pb, cb))) = (&vertices[a], &vertices[b]) {
                    target.draw_segment(pa, pb, ca, cb, true);
                }
            }
        });
    }
}
