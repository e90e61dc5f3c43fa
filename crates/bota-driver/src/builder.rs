//! Builder 模式实现
//!
//! 提供链式构造 `BotaSensor` 实例的便捷方式。

use crate::config::{
    ConnectionConfig, ConnectionType, SamplingConfig, SensorConfig, SerialConfig, UdpConfig,
};
use crate::error::DriverError;
use crate::sensor::BotaSensor;
use std::time::Duration;

/// BotaSensor Builder（链式构造）
///
/// 参数错误（例如对 UDP 连接设置波特率）不会立即报错，而是在 `build()` 时返回
/// 第一个错误。
///
/// # Example
///
/// ```no_run
/// use bota_driver::BotaSensorBuilder;
/// use std::time::Duration;
///
/// // UDP（默认 192.168.1.1:1000）
/// let sensor = BotaSensorBuilder::new().build().unwrap();
///
/// // 串口
/// let sensor = BotaSensorBuilder::new()
///     .serial("/dev/ttyUSB0")
///     .baud_rate(921_600)
///     .timeout(Duration::from_millis(500))
///     .build()
///     .unwrap();
/// ```
pub struct BotaSensorBuilder {
    connection: ConnectionConfig,
    sampling: SamplingConfig,
    /// 构造过程中记录的第一个错误
    error: Option<DriverError>,
}

impl Default for BotaSensorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BotaSensorBuilder {
    /// 创建新的 Builder（默认 UDP 配置）
    pub fn new() -> Self {
        Self {
            connection: ConnectionConfig::default(),
            sampling: SamplingConfig::default(),
            error: None,
        }
    }

    fn record_error(&mut self, error: DriverError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// 按名称选择连接类型（"udp" / "serial"，不区分大小写）
    ///
    /// 切换类型时参数重置为该类型的默认值。
    pub fn connection_type(mut self, connection_type: &str) -> Self {
        match connection_type.parse::<ConnectionType>() {
            Ok(kind) if kind != self.connection.connection_type() => {
                self.connection = ConnectionConfig::default_for(kind);
            },
            Ok(_) => {},
            Err(e) => self.record_error(e),
        }
        self
    }

    /// 使用 UDP 连接
    pub fn udp(mut self, host: impl Into<String>, port: u16) -> Self {
        let timeout_secs = self.current_timeout_secs();
        self.connection = ConnectionConfig::Udp(UdpConfig {
            host: host.into(),
            port,
            timeout_secs,
        });
        self
    }

    /// 使用串口连接
    pub fn serial(mut self, device: impl Into<String>) -> Self {
        let timeout_secs = self.current_timeout_secs();
        self.connection = ConnectionConfig::Serial(SerialConfig {
            device: device.into(),
            timeout_secs,
            ..SerialConfig::default()
        });
        self
    }

    /// 设置 UDP 主机（仅 UDP）
    pub fn host(mut self, host: impl Into<String>) -> Self {
        match &mut self.connection {
            ConnectionConfig::Udp(c) => c.host = host.into(),
            ConnectionConfig::Serial(_) => {
                self.record_error(DriverError::config("host is only valid for UDP connections"))
            },
        }
        self
    }

    /// 设置 UDP 端口（仅 UDP）
    pub fn port(mut self, port: u16) -> Self {
        match &mut self.connection {
            ConnectionConfig::Udp(c) => c.port = port,
            ConnectionConfig::Serial(_) => {
                self.record_error(DriverError::config("port is only valid for UDP connections"))
            },
        }
        self
    }

    /// 设置串口设备路径（仅串口）
    pub fn device(mut self, device: impl Into<String>) -> Self {
        match &mut self.connection {
            ConnectionConfig::Serial(c) => c.device = device.into(),
            ConnectionConfig::Udp(_) => self.record_error(DriverError::config(
                "device is only valid for serial connections",
            )),
        }
        self
    }

    /// 设置波特率（仅串口）
    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        match &mut self.connection {
            ConnectionConfig::Serial(c) => c.baud_rate = baud_rate,
            ConnectionConfig::Udp(_) => self.record_error(DriverError::config(
                "baud_rate is only valid for serial connections",
            )),
        }
        self
    }

    /// 设置接收超时
    pub fn timeout(mut self, timeout: Duration) -> Self {
        let secs = timeout.as_secs_f64();
        match &mut self.connection {
            ConnectionConfig::Udp(c) => c.timeout_secs = secs,
            ConnectionConfig::Serial(c) => c.timeout_secs = secs,
        }
        self
    }

    /// 直接指定连接配置
    pub fn connection(mut self, connection: ConnectionConfig) -> Self {
        self.connection = connection;
        self
    }

    /// 设置采样默认参数
    pub fn sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }

    /// 当前累积的配置
    pub fn to_config(&self) -> SensorConfig {
        SensorConfig {
            connection: self.connection.clone(),
            sampling: self.sampling.clone(),
        }
    }

    fn current_timeout_secs(&self) -> f64 {
        match &self.connection {
            ConnectionConfig::Udp(c) => c.timeout_secs,
            ConnectionConfig::Serial(c) => c.timeout_secs,
        }
    }

    /// 构建 BotaSensor 实例（未连接）
    ///
    /// # Errors
    /// - `DriverError::Config`: 连接类型未知、参数无效或与连接类型不匹配
    pub fn build(self) -> Result<BotaSensor, DriverError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        self.sampling.validate()?;
        let mut sensor = BotaSensor::new(&self.connection)?;
        sensor.set_sampling(self.sampling);
        Ok(sensor)
    }
}
