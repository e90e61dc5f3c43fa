//! 驱动层模块
//!
//! 本模块提供 Bota 力/力矩传感器的会话管理，包括：
//! - 连接生命周期（UDP / 串口，经由 `Transport` 抽象）
//! - 单次读取：请求 → 响应 → 解码 → 校准
//! - 软件零点校准（偏置向量 + 增益）
//! - 容忍单次失败的校准循环与连续采样循环
//! - 作用域连接守卫（离开作用域自动断开）
//!
//! # 并发模型
//!
//! 单线程、同步阻塞：每个传输操作最多阻塞到其配置的超时。
//! 没有后台线程，也不会自动重连；传输故障后需由调用方显式断开并重新连接。

mod builder;
pub mod calibration;
pub mod config;
mod error;
mod guard;
mod info;
mod sensor;

pub use builder::BotaSensorBuilder;
pub use calibration::{CalibrationState, OffsetAccumulator};
pub use config::{
    ConnectionConfig, ConnectionType, SamplingConfig, SensorConfig, SerialConfig, UdpConfig,
};
pub use error::{DriverError, ErrorKind};
pub use guard::SensorSession;
pub use info::SensorInfo;
pub use sensor::{BotaSensor, SamplingStats};
