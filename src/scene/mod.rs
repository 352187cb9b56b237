// scene/mod.rs
// 场景状态、输入事件与逐帧变换合成
pub mod composer;
pub mod input;
pub mod state;
