//! 驱动层错误类型定义

use bota_protocol::ProtocolError;
use bota_transport::TransportError;
use std::fmt;
use thiserror::Error;

/// 错误分类
///
/// 调用方按类别处理错误，无需关心底层平台错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 未连接、socket/串口打开失败、收发故障、校准采样不足
    Connection,
    /// 超时窗口内无响应
    Timeout,
    /// 参数或配置无效
    Config,
    /// 响应帧过短或无法解码
    Data,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Connection => "connection",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Config => "config",
            ErrorKind::Data => "data",
        };
        f.write_str(name)
    }
}

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 会话未连接
    #[error("Sensor is not connected")]
    NotConnected,

    /// 传输层错误（超时或连接故障）
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// 协议解析错误
    #[error("Data error: {0}")]
    Protocol(#[from] ProtocolError),

    /// 无效参数或配置
    #[error("Configuration error: {0}")]
    Config(String),

    /// 重试预算耗尽前未采集到足够的校准样本
    #[error(
        "Calibration failed: only {collected}/{required} samples collected after {attempts} attempts"
    )]
    CalibrationIncomplete {
        collected: usize,
        required: usize,
        attempts: usize,
    },
}

impl DriverError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        DriverError::Config(message.into())
    }

    /// 错误所属类别
    pub fn kind(&self) -> ErrorKind {
        match self {
            DriverError::NotConnected => ErrorKind::Connection,
            DriverError::Transport(e) if e.is_timeout() => ErrorKind::Timeout,
            DriverError::Transport(_) => ErrorKind::Connection,
            DriverError::Protocol(_) => ErrorKind::Data,
            DriverError::Config(_) => ErrorKind::Config,
            DriverError::CalibrationIncomplete { .. } => ErrorKind::Connection,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind() == ErrorKind::Timeout
    }
}
