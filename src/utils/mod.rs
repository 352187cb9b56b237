// utils/mod.rs
// 动画导出与图像保存
pub mod animation_utils;
pub mod save_utils;
