//! 会话诊断信息

use bota_protocol::CHANNEL_COUNT;
use std::fmt;

/// 会话状态快照
#[derive(Debug, Clone, PartialEq)]
pub struct SensorInfo {
    pub connected: bool,
    pub calibration_offset: [f64; CHANNEL_COUNT],
    pub scale_factor: f64,
    /// 传输类型名称（"udp" / "serial" / ...）
    pub transport: &'static str,
}

impl fmt::Display for SensorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Connected:    {}", self.connected)?;
        writeln!(f, "Transport:    {}", self.transport)?;
        writeln!(f, "Scale factor: {}", self.scale_factor)?;
        write!(f, "Offset:       {:?}", self.calibration_offset)
    }
}
