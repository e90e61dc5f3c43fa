//! # Bota Protocol
//!
//! Bota 力/力矩传感器的线上帧格式定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `axis`: 六个测量通道的枚举与顺序
//! - `codec`: 请求帧编码 / 响应帧解码
//! - `measurement`: 解码后的测量值类型 `ForceTorqueData`
//!
//! ## 字节序
//!
//! 响应帧为 6 个 IEEE-754 单精度浮点数，小端字节序（LSB 在前），
//! 通道顺序固定为 fx, fy, fz, tx, ty, tz。
//!
//! ## 帧格式说明
//!
//! 请求帧（2 字节）与响应帧（≥24 字节，无校验和、无帧定界符）的具体取值
//! 来自厂商提供的示例协议，尚未对照真实设备手册验证。
//! 面向实际硬件时需先确认设备的帧布局。

pub mod axis;
pub mod codec;
pub mod measurement;

pub use axis::{Axis, CHANNEL_COUNT};
pub use codec::{
    MAX_RESPONSE_LEN, REQUEST_COMMAND, RESPONSE_FRAME_LEN, RawSample, decode_response,
    encode_request, encode_response,
};
pub use measurement::{ForceTorqueData, current_timestamp};

use thiserror::Error;

/// 协议解析错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Invalid frame length: expected at least {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}
