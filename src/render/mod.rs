// render/mod.rs
// 渲染边界、软件帧缓冲与场景绘制
pub mod frame_buffer;
pub mod render_target;
pub mod renderer;
pub mod shaders;
