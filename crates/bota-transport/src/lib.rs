//! # Bota Transport Layer
//!
//! 字节级通信抽象，提供统一的 `Transport` 接口：
//!
//! - [`UdpTransport`]: UDP/以太网（无连接，按对端地址发送）
//! - [`SerialTransport`]: 串口/USB（字节流，按设备路径打开）
//! - [`SensorTransport`]: 上述两者的和类型，按配置在运行时选择
//! - `MockTransport`: 脚本化的测试替身（`mock` feature）
//!
//! 每个实现自行持有超时与寻址参数；会话层只通过 `Transport` 访问。

use std::fmt;
use thiserror::Error;

pub mod serial;
pub mod udp;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use serial::{SerialTransport, list_serial_ports};
pub use udp::UdpTransport;

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockBehavior, MockTransport};

/// 传输层统一错误类型
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Device Error: {0}")]
    Device(#[from] TransportDeviceError),
    #[error("Read timeout")]
    Timeout,
    #[error("Transport not connected")]
    NotConnected,
}

impl TransportError {
    /// 是否为超时（其余错误均视为连接故障）
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout)
    }
}

/// 设备/后端错误的结构化分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportDeviceErrorKind {
    Unknown,
    NotFound,
    AccessDenied,
    Busy,
    InvalidConfig,
    Backend,
}

/// 结构化设备错误
#[derive(Error, Debug, Clone)]
#[error("{kind:?}: {message}")]
pub struct TransportDeviceError {
    pub kind: TransportDeviceErrorKind,
    pub message: String,
}

impl TransportDeviceError {
    pub fn new(kind: TransportDeviceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// 重试无意义的错误（设备不存在、无权限）
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind,
            TransportDeviceErrorKind::NotFound | TransportDeviceErrorKind::AccessDenied
        )
    }
}

impl From<String> for TransportDeviceError {
    fn from(message: String) -> Self {
        Self::new(TransportDeviceErrorKind::Unknown, message)
    }
}

impl From<&str> for TransportDeviceError {
    fn from(message: &str) -> Self {
        Self::new(TransportDeviceErrorKind::Unknown, message)
    }
}

/// 连接状态
///
/// 只能通过 `connect()` / `disconnect()` 迁移。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => f.write_str("disconnected"),
            ConnectionState::Connected => f.write_str("connected"),
        }
    }
}

/// 字节级传输接口
///
/// # 约定
///
/// - 除 `connect` / `is_connected` 外，未连接时调用任何操作都返回
///   `TransportError::NotConnected`（`disconnect` 例外：未连接时为空操作）。
/// - `receive` 在配置的超时内无数据时返回 `TransportError::Timeout`。
/// - 重复调用 `connect` 的行为由实现决定，调用方负责避免。
pub trait Transport {
    /// 打开底层 socket / 串口
    fn connect(&mut self) -> Result<(), TransportError>;

    /// 关闭底层资源；未连接时为空操作
    fn disconnect(&mut self);

    /// 发送原始字节
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError>;

    /// 接收最多 `size` 字节
    fn receive(&mut self, size: usize) -> Result<Vec<u8>, TransportError>;

    fn is_connected(&self) -> bool;

    fn state(&self) -> ConnectionState {
        if self.is_connected() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    /// 传输类型名称（用于诊断信息）
    fn name(&self) -> &'static str;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn connect(&mut self) -> Result<(), TransportError> {
        (**self).connect()
    }

    fn disconnect(&mut self) {
        (**self).disconnect()
    }

    fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        (**self).send(data)
    }

    fn receive(&mut self, size: usize) -> Result<Vec<u8>, TransportError> {
        (**self).receive(size)
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// 运行时选择的传输（UDP 或串口）
pub enum SensorTransport {
    Udp(UdpTransport),
    Serial(SerialTransport),
}

impl From<UdpTransport> for SensorTransport {
    fn from(transport: UdpTransport) -> Self {
        SensorTransport::Udp(transport)
    }
}

impl From<SerialTransport> for SensorTransport {
    fn from(transport: SerialTransport) -> Self {
        SensorTransport::Serial(transport)
    }
}

impl Transport for SensorTransport {
    fn connect(&mut self) -> Result<(), TransportError> {
        match self {
            SensorTransport::Udp(t) => t.connect(),
            SensorTransport::Serial(t) => t.connect(),
        }
    }

    fn disconnect(&mut self) {
        match self {
            SensorTransport::Udp(t) => t.disconnect(),
            SensorTransport::Serial(t) => t.disconnect(),
        }
    }

    fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        match self {
            SensorTransport::Udp(t) => t.send(data),
            SensorTransport::Serial(t) => t.send(data),
        }
    }

    fn receive(&mut self, size: usize) -> Result<Vec<u8>, TransportError> {
        match self {
            SensorTransport::Udp(t) => t.receive(size),
            SensorTransport::Serial(t) => t.receive(size),
        }
    }

    fn is_connected(&self) -> bool {
        match self {
            SensorTransport::Udp(t) => t.is_connected(),
            SensorTransport::Serial(t) => t.is_connected(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            SensorTransport::Udp(t) => t.name(),
            SensorTransport::Serial(t) => t.name(),
        }
    }
}
