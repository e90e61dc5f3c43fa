//! 帧编解码
//!
//! ```text
//! 请求帧:  [0x01, 0x00]                          “立即采样一次”
//! 响应帧:  | fx | fy | fz | tx | ty | tz | 保留... |
//!          每个通道 4 字节 f32 LE，前 24 字节有效，其余忽略
//! ```

use crate::ProtocolError;
use crate::axis::{Axis, CHANNEL_COUNT};

/// 单次采样请求命令（厂商定义的不透明常量）
pub const REQUEST_COMMAND: [u8; 2] = [0x01, 0x00];

/// 可解码的最短响应帧长度（6 × f32）
pub const RESPONSE_FRAME_LEN: usize = CHANNEL_COUNT * 4;

/// 接收响应时使用的缓冲区长度
///
/// 大于 `RESPONSE_FRAME_LEN`，以容纳带保留字段的更长帧。
pub const MAX_RESPONSE_LEN: usize = 48;

/// 未经校准的原始采样（线上 f32 精度）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    /// 按 `Axis::ALL` 顺序排列的通道值
    pub values: [f32; CHANNEL_COUNT],
}

impl RawSample {
    pub fn new(values: [f32; CHANNEL_COUNT]) -> Self {
        Self { values }
    }

    /// 读取指定通道
    pub fn get(&self, axis: Axis) -> f32 {
        self.values[axis.index()]
    }

    /// 扩展为 f64（无损）
    pub fn to_f64(&self) -> [f64; CHANNEL_COUNT] {
        self.values.map(f64::from)
    }
}

/// 编码单次采样请求
pub fn encode_request() -> [u8; 2] {
    REQUEST_COMMAND
}

/// 解码响应帧
///
/// # Errors
/// - `ProtocolError::InvalidLength`: 少于 24 字节
///
/// NaN / ∞ 是合法的 IEEE-754 值，按原样透传（例如通道饱和时）。
pub fn decode_response(bytes: &[u8]) -> Result<RawSample, ProtocolError> {
    if bytes.len() < RESPONSE_FRAME_LEN {
        return Err(ProtocolError::InvalidLength {
            expected: RESPONSE_FRAME_LEN,
            actual: bytes.len(),
        });
    }

    let mut values = [0.0f32; CHANNEL_COUNT];
    for (axis, chunk) in Axis::ALL.iter().zip(bytes[..RESPONSE_FRAME_LEN].chunks_exact(4)) {
        values[axis.index()] = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }

    Ok(RawSample { values })
}

/// 编码响应帧（供模拟设备与测试使用）
pub fn encode_response(sample: &RawSample) -> [u8; RESPONSE_FRAME_LEN] {
    let mut frame = [0u8; RESPONSE_FRAME_LEN];
    for (value, chunk) in sample.values.iter().zip(frame.chunks_exact_mut(4)) {
        chunk.copy_from_slice(&value.to_le_bytes());
    }
    frame
}
