//! 串口/USB 传输
//!
//! 串口读取在超时时不会报错，而是返回 0 字节；这里把“超时内无任何字节”
//! 统一报告为 `TransportError::Timeout`。

use crate::{Transport, TransportDeviceError, TransportDeviceErrorKind, TransportError};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

/// 帧内字节间隔的下限
const MIN_INTER_BYTE_GAP: Duration = Duration::from_millis(2);

/// 串口传输
pub struct SerialTransport {
    /// 设备路径（如 "/dev/ttyUSB0"）
    path: String,
    /// 波特率
    baud_rate: u32,
    /// 接收超时
    timeout: Duration,
    port: Option<Box<dyn SerialPort>>,
}

impl SerialTransport {
    /// 创建串口传输（未连接）
    ///
    /// # 参数
    /// - `path`: 设备路径
    /// - `baud_rate`: 波特率（如 115200）
    /// - `timeout`: 接收超时
    pub fn new(path: impl Into<String>, baud_rate: u32, timeout: Duration) -> Self {
        Self {
            path: path.into(),
            baud_rate,
            timeout,
            port: None,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 首字节到达后，等待后续字节的最长间隔
    ///
    /// 取 10 个字符时间（8N1 下每字符 10 bit），且不小于 2ms。
    pub fn inter_byte_gap(&self) -> Duration {
        if self.baud_rate == 0 {
            return MIN_INTER_BYTE_GAP;
        }
        let char_time = Duration::from_secs_f64(10.0 / self.baud_rate as f64);
        (char_time * 10).max(MIN_INTER_BYTE_GAP)
    }

    /// 单次读取；超时或 0 字节返回 `Ok(0)`
    fn read_chunk(port: &mut dyn SerialPort, buf: &mut [u8]) -> Result<usize, TransportError> {
        match port.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(TransportError::Io(e)),
        }
    }
}

fn map_open_error(path: &str, e: serialport::Error) -> TransportError {
    let kind = match e.kind {
        serialport::ErrorKind::NoDevice => TransportDeviceErrorKind::NotFound,
        serialport::ErrorKind::InvalidInput => TransportDeviceErrorKind::InvalidConfig,
        serialport::ErrorKind::Io(io::ErrorKind::NotFound) => TransportDeviceErrorKind::NotFound,
        serialport::ErrorKind::Io(io::ErrorKind::PermissionDenied) => {
            TransportDeviceErrorKind::AccessDenied
        },
        serialport::ErrorKind::Io(io::ErrorKind::ResourceBusy) => TransportDeviceErrorKind::Busy,
        serialport::ErrorKind::Io(_) => TransportDeviceErrorKind::Backend,
        _ => TransportDeviceErrorKind::Unknown,
    };
    TransportError::Device(TransportDeviceError::new(
        kind,
        format!("Failed to open serial port {}: {}", path, e.description),
    ))
}

impl Transport for SerialTransport {
    fn connect(&mut self) -> Result<(), TransportError> {
        let port = serialport::new(self.path.as_str(), self.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(self.timeout)
            .open()
            .map_err(|e| map_open_error(&self.path, e))?;

        tracing::info!("Opened serial port: {} at {} baud", self.path, self.baud_rate);
        self.port = Some(port);
        Ok(())
    }

    fn disconnect(&mut self) {
        // Drop 即关闭设备
        if self.port.take().is_some() {
            tracing::info!("Closed serial port: {}", self.path);
        }
    }

    fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let port = self.port.as_mut().ok_or(TransportError::NotConnected)?;
        port.write_all(data).map_err(TransportError::Io)?;
        port.flush().map_err(TransportError::Io)?;
        Ok(())
    }

    fn receive(&mut self, size: usize) -> Result<Vec<u8>, TransportError> {
        let gap = self.inter_byte_gap();
        let timeout = self.timeout;
        let port = self.port.as_mut().ok_or(TransportError::NotConnected)?;
        if size == 0 {
            return Ok(Vec::new());
        }

        let mut buf = vec![0u8; size];
        let started = Instant::now();

        // 1. 等待首批字节（最长为配置的超时）
        let mut filled = Self::read_chunk(&mut **port, &mut buf)?;
        if filled == 0 {
            return Err(TransportError::Timeout);
        }

        // 2. 以短间隔继续读取同一帧的剩余字节
        if filled < size {
            port.set_timeout(gap).map_err(|e| {
                TransportError::Device(TransportDeviceError::new(
                    TransportDeviceErrorKind::Backend,
                    format!("Failed to set serial timeout: {}", e.description),
                ))
            })?;

            let drained = loop {
                if filled >= size || started.elapsed() >= timeout {
                    break Ok(());
                }
                match Self::read_chunk(&mut **port, &mut buf[filled..]) {
                    Ok(0) => break Ok(()),
                    Ok(n) => filled += n,
                    Err(e) => break Err(e),
                }
            };

            // 无论读取结果如何都恢复原超时
            let restored = port.set_timeout(timeout);
            drained?;
            restored.map_err(|e| {
                TransportError::Device(TransportDeviceError::new(
                    TransportDeviceErrorKind::Backend,
                    format!("Failed to restore serial timeout: {}", e.description),
                ))
            })?;
        }

        buf.truncate(filled);
        tracing::trace!("Serial received {} bytes from {}", filled, self.path);
        Ok(buf)
    }

    fn is_connected(&self) -> bool {
        self.port.is_some()
    }

    fn name(&self) -> &'static str {
        "serial"
    }
}

/// 列出系统中可用的串口设备路径
pub fn list_serial_ports() -> Result<Vec<String>, TransportError> {
    let ports = serialport::available_ports().map_err(|e| {
        TransportError::Device(TransportDeviceError::new(
            TransportDeviceErrorKind::Backend,
            format!("Failed to enumerate serial ports: {}", e.description),
        ))
    })?;
    Ok(ports.into_iter().map(|p| p.port_name).collect())
}
