//! Bota SDK - Bota Systems 力/力矩传感器 Rust SDK
//!
//! 通过 UDP/以太网或串口/USB 读取六维力/力矩数据，并在软件侧完成零点校准与缩放。
//!
//! # 架构设计
//!
//! 本 SDK 采用分层架构，从底层到高层：
//!
//! - **协议层** (`protocol`): 请求/响应帧编解码、测量值类型
//! - **传输层** (`transport`): UDP / 串口字节级收发
//! - **驱动层** (`driver`): 会话、校准、采样循环
//!
//! # 快速开始
//!
//! ```no_run
//! use bota_sdk::prelude::*;
//! use std::time::Duration;
//!
//! bota_sdk::init_logging();
//!
//! let mut sensor = BotaSensor::builder().udp("192.168.1.1", 1000).build()?;
//! let mut session = sensor.session()?;
//! session.calibrate(100, Duration::from_millis(10))?;
//! for data in session.read_continuous(Duration::from_secs(1), 100.0)? {
//!     println!("{}", data);
//! }
//! # Ok::<(), DriverError>(())
//! ```

pub use bota_driver as driver;
pub use bota_protocol as protocol;
pub use bota_transport as transport;

mod logging;
pub mod prelude;

pub use logging::{init_logging, init_logging_with};

// --- 常用类型 ---
pub use bota_driver::{
    BotaSensor, BotaSensorBuilder, CalibrationState, ConnectionConfig, ConnectionType,
    DriverError, ErrorKind, SamplingConfig, SamplingStats, SensorConfig, SensorInfo,
    SensorSession, SerialConfig, UdpConfig,
};
pub use bota_protocol::{Axis, ForceTorqueData, ProtocolError, RawSample};
pub use bota_transport::{
    ConnectionState, SensorTransport, SerialTransport, Transport, TransportError, UdpTransport,
    list_serial_ports,
};
