//! 连接与采样配置
//!
//! 配置文件示例（TOML）：
//!
//! ```toml
//! [connection]
//! type = "serial"
//! device = "/dev/ttyUSB0"
//! baud_rate = 115200
//! timeout_secs = 1.0
//!
//! [sampling]
//! calibration_samples = 50
//! continuous_rate_hz = 200.0
//! ```
//!
//! 未给出的字段取默认值。

use crate::error::DriverError;
use bota_transport::{SensorTransport, SerialTransport, UdpTransport};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// 默认传感器 IP
pub const DEFAULT_UDP_HOST: &str = "192.168.1.1";
/// 默认 UDP 端口
pub const DEFAULT_UDP_PORT: u16 = 1000;
/// 默认串口设备
pub const DEFAULT_SERIAL_DEVICE: &str = "/dev/ttyUSB0";
/// 默认波特率
pub const DEFAULT_BAUD_RATE: u32 = 115_200;
/// 默认接收超时（秒）
pub const DEFAULT_TIMEOUT_SECS: f64 = 5.0;

/// 连接类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionType {
    Udp,
    Serial,
}

impl FromStr for ConnectionType {
    type Err = DriverError;

    /// 不区分大小写解析 "udp" / "serial"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "udp" => Ok(ConnectionType::Udp),
            "serial" => Ok(ConnectionType::Serial),
            _ => Err(DriverError::config(format!("Invalid connection type: {}", s))),
        }
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionType::Udp => f.write_str("udp"),
            ConnectionType::Serial => f.write_str("serial"),
        }
    }
}

fn timeout_from_secs(secs: f64) -> Result<Duration, DriverError> {
    if !(secs.is_finite() && secs > 0.0) {
        return Err(DriverError::config(format!(
            "Timeout must be a positive number of seconds, got {}",
            secs
        )));
    }
    Duration::try_from_secs_f64(secs)
        .map_err(|e| DriverError::config(format!("Invalid timeout {}: {}", secs, e)))
}

/// UDP 连接参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UdpConfig {
    /// 传感器主机名或 IPv4 地址
    pub host: String,
    /// UDP 端口
    pub port: u16,
    /// 接收超时（秒）
    pub timeout_secs: f64,
}

impl Default for UdpConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_UDP_HOST.to_string(),
            port: DEFAULT_UDP_PORT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl UdpConfig {
    pub fn timeout(&self) -> Result<Duration, DriverError> {
        timeout_from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), DriverError> {
        if self.host.trim().is_empty() {
            return Err(DriverError::config("UDP host must not be empty"));
        }
        if self.port == 0 {
            return Err(DriverError::config("UDP port must not be 0"));
        }
        self.timeout().map(|_| ())
    }
}

/// 串口连接参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// 设备路径
    #[serde(alias = "port")]
    pub device: String,
    /// 波特率
    pub baud_rate: u32,
    /// 接收超时（秒）
    pub timeout_secs: f64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            device: DEFAULT_SERIAL_DEVICE.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl SerialConfig {
    pub fn timeout(&self) -> Result<Duration, DriverError> {
        timeout_from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), DriverError> {
        if self.device.trim().is_empty() {
            return Err(DriverError::config("Serial device path must not be empty"));
        }
        if self.baud_rate == 0 {
            return Err(DriverError::config("Baud rate must be greater than 0"));
        }
        self.timeout().map(|_| ())
    }
}

/// 连接配置（按类型区分）
///
/// `type` 字段接受全小写、首字母大写或全大写写法（如 "udp" / "Udp" / "UDP"）；
/// 写回文件时统一为小写。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConnectionConfig {
    #[serde(alias = "Udp", alias = "UDP")]
    Udp(UdpConfig),
    #[serde(alias = "Serial", alias = "SERIAL")]
    Serial(SerialConfig),
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        ConnectionConfig::Udp(UdpConfig::default())
    }
}

impl ConnectionConfig {
    /// 指定类型的默认配置
    pub fn default_for(connection_type: ConnectionType) -> Self {
        match connection_type {
            ConnectionType::Udp => ConnectionConfig::Udp(UdpConfig::default()),
            ConnectionType::Serial => ConnectionConfig::Serial(SerialConfig::default()),
        }
    }

    pub fn connection_type(&self) -> ConnectionType {
        match self {
            ConnectionConfig::Udp(_) => ConnectionType::Udp,
            ConnectionConfig::Serial(_) => ConnectionType::Serial,
        }
    }

    pub fn validate(&self) -> Result<(), DriverError> {
        match self {
            ConnectionConfig::Udp(c) => c.validate(),
            ConnectionConfig::Serial(c) => c.validate(),
        }
    }

    /// 校验参数并创建对应的传输（未连接）
    pub fn build_transport(&self) -> Result<SensorTransport, DriverError> {
        self.validate()?;
        let transport = match self {
            ConnectionConfig::Udp(c) => {
                SensorTransport::Udp(UdpTransport::new(c.host.clone(), c.port, c.timeout()?))
            },
            ConnectionConfig::Serial(c) => SensorTransport::Serial(SerialTransport::new(
                c.device.clone(),
                c.baud_rate,
                c.timeout()?,
            )),
        };
        Ok(transport)
    }
}

/// 校准与连续采样的默认参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// 校准时平均的样本数
    pub calibration_samples: usize,
    /// 校准样本间隔（毫秒）
    pub calibration_interval_ms: u64,
    /// 连续采样时长（毫秒）
    pub continuous_duration_ms: u64,
    /// 连续采样目标频率（Hz）
    pub continuous_rate_hz: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            calibration_samples: 100,
            calibration_interval_ms: 10,
            continuous_duration_ms: 1000,
            continuous_rate_hz: 100.0,
        }
    }
}

impl SamplingConfig {
    pub fn calibration_interval(&self) -> Duration {
        Duration::from_millis(self.calibration_interval_ms)
    }

    pub fn continuous_duration(&self) -> Duration {
        Duration::from_millis(self.continuous_duration_ms)
    }

    pub fn validate(&self) -> Result<(), DriverError> {
        if self.calibration_samples == 0 {
            return Err(DriverError::config("calibration_samples must be greater than 0"));
        }
        if !(self.continuous_rate_hz.is_finite() && self.continuous_rate_hz > 0.0) {
            return Err(DriverError::config(format!(
                "continuous_rate_hz must be positive, got {}",
                self.continuous_rate_hz
            )));
        }
        Ok(())
    }
}

/// 传感器完整配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    pub connection: ConnectionConfig,
    pub sampling: SamplingConfig,
}

impl SensorConfig {
    pub fn validate(&self) -> Result<(), DriverError> {
        self.connection.validate()?;
        self.sampling.validate()
    }

    /// 从 TOML 文本解析并校验
    pub fn from_toml_str(content: &str) -> Result<Self, DriverError> {
        let config: SensorConfig = toml::from_str(content)
            .map_err(|e| DriverError::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, DriverError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            DriverError::config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, DriverError> {
        toml::to_string_pretty(self)
            .map_err(|e| DriverError::config(format!("Failed to serialize config: {}", e)))
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), DriverError> {
        let path = path.as_ref();
        let content = self.to_toml_string()?;
        fs::write(path, content).map_err(|e| {
            DriverError::config(format!("Failed to write config {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use bota_transport::Transport;

    #[test]
    fn test_connection_type_parse() {
        assert_eq!("udp".parse::<ConnectionType>().unwrap(), ConnectionType::Udp);
        assert_eq!("UDP".parse::<ConnectionType>().unwrap(), ConnectionType::Udp);
        assert_eq!("Serial".parse::<ConnectionType>().unwrap(), ConnectionType::Serial);

        let err = "invalid".parse::<ConnectionType>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(format!("{}", err).contains("invalid"));
    }

    #[test]
    fn test_defaults() {
        let udp = UdpConfig::default();
        assert_eq!(udp.host, "192.168.1.1");
        assert_eq!(udp.port, 1000);
        assert_eq!(udp.timeout().unwrap(), Duration::from_secs(5));

        let serial = SerialConfig::default();
        assert_eq!(serial.device, "/dev/ttyUSB0");
        assert_eq!(serial.baud_rate, 115_200);

        let sampling = SamplingConfig::default();
        assert_eq!(sampling.calibration_samples, 100);
        assert_eq!(sampling.calibration_interval(), Duration::from_millis(10));
        assert_eq!(sampling.continuous_duration(), Duration::from_secs(1));
        assert_eq!(sampling.continuous_rate_hz, 100.0);

        assert_eq!(
            ConnectionConfig::default().connection_type(),
            ConnectionType::Udp
        );
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let bad = [
            ConnectionConfig::Udp(UdpConfig {
                timeout_secs: 0.0,
                ..UdpConfig::default()
            }),
            ConnectionConfig::Udp(UdpConfig {
                host: "  ".into(),
                ..UdpConfig::default()
            }),
            ConnectionConfig::Udp(UdpConfig {
                port: 0,
                ..UdpConfig::default()
            }),
            ConnectionConfig::Serial(SerialConfig {
                baud_rate: 0,
                ..SerialConfig::default()
            }),
            ConnectionConfig::Serial(SerialConfig {
                timeout_secs: f64::NAN,
                ..SerialConfig::default()
            }),
        ];
        for config in bad {
            let err = config.validate().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Config, "{:?}", config);
            assert!(config.build_transport().is_err());
        }

        let sampling = SamplingConfig {
            continuous_rate_hz: -1.0,
            ..SamplingConfig::default()
        };
        assert_eq!(sampling.validate().unwrap_err().kind(), ErrorKind::Config);
    }

    #[test]
    fn test_build_transport() {
        let transport = ConnectionConfig::default().build_transport().unwrap();
        assert_eq!(transport.name(), "udp");
        assert!(!transport.is_connected());

        let transport = ConnectionConfig::default_for(ConnectionType::Serial)
            .build_transport()
            .unwrap();
        assert_eq!(transport.name(), "serial");
    }

    #[test]
    fn test_parse_toml() {
        let config = SensorConfig::from_toml_str(
            r#"
            [connection]
            type = "serial"
            device = "/dev/ttyACM0"
            timeout_secs = 0.5

            [sampling]
            calibration_samples = 20
            "#,
        )
        .unwrap();

        match &config.connection {
            ConnectionConfig::Serial(c) => {
                assert_eq!(c.device, "/dev/ttyACM0");
                assert_eq!(c.baud_rate, 115_200);
                assert_eq!(c.timeout().unwrap(), Duration::from_millis(500));
            },
            other => panic!("Expected serial config, got {:?}", other),
        }
        assert_eq!(config.sampling.calibration_samples, 20);
        assert_eq!(config.sampling.calibration_interval_ms, 10);
    }

    #[test]
    fn test_parse_toml_port_alias_and_empty() {
        let config = SensorConfig::from_toml_str(
            r#"
            [connection]
            type = "serial"
            port = "/dev/ttyUSB1"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.connection,
            ConnectionConfig::Serial(SerialConfig {
                device: "/dev/ttyUSB1".into(),
                ..SerialConfig::default()
            })
        );

        let config = SensorConfig::from_toml_str("").unwrap();
        assert_eq!(config, SensorConfig::default());
    }

    #[test]
    fn test_parse_toml_type_case() {
        for tag in ["udp", "Udp", "UDP"] {
            let config =
                SensorConfig::from_toml_str(&format!("[connection]\ntype = \"{}\"\n", tag))
                    .unwrap();
            assert_eq!(config.connection.connection_type(), ConnectionType::Udp, "{}", tag);
        }
        for tag in ["serial", "Serial", "SERIAL"] {
            let config =
                SensorConfig::from_toml_str(&format!("[connection]\ntype = \"{}\"\n", tag))
                    .unwrap();
            assert_eq!(config.connection.connection_type(), ConnectionType::Serial, "{}", tag);
        }

        let text = SensorConfig::from_toml_str("[connection]\ntype = \"UDP\"\n")
            .unwrap()
            .to_toml_string()
            .unwrap();
        assert!(text.contains("type = \"udp\""), "{}", text);
    }

    #[test]
    fn test_parse_toml_errors() {
        let err = SensorConfig::from_toml_str("[connection]\ntype = \"can\"\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);

        let err = SensorConfig::from_toml_str("[sampling]\ncalibration_samples = 0\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sensor.toml");

        let config = SensorConfig {
            connection: ConnectionConfig::Udp(UdpConfig {
                host: "10.0.0.7".into(),
                port: 5000,
                timeout_secs: 0.25,
            }),
            sampling: SamplingConfig {
                continuous_rate_hz: 250.0,
                ..SamplingConfig::default()
            },
        };
        config.save_to_file(&path).unwrap();

        let loaded = SensorConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = SensorConfig::load_from_file("/nonexistent/bota/sensor.toml").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
