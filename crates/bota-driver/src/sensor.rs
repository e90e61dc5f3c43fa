//! 传感器会话
//!
//! `BotaSensor` 独占一个 `Transport`，并持有校准状态。
//! 所有操作在调用线程上同步执行：每次请求都是
//! `encode → send → receive → decode → 校准`，同一时刻只有一个请求在途。

use crate::builder::BotaSensorBuilder;
use crate::calibration::{CalibrationState, OffsetAccumulator};
use crate::config::{ConnectionConfig, SamplingConfig, SensorConfig};
use crate::error::DriverError;
use crate::guard::SensorSession;
use crate::info::SensorInfo;
use bota_protocol::{
    CHANNEL_COUNT, ForceTorqueData, MAX_RESPONSE_LEN, RawSample, current_timestamp,
    decode_response, encode_request,
};
use bota_transport::{ConnectionState, SensorTransport, Transport};
use std::ops::ControlFlow;
use std::time::{Duration, Instant};

/// 连续采样统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplingStats {
    /// 成功采集的样本数
    pub collected: usize,
    /// 失败（被跳过）的读取次数
    pub failed: usize,
    /// 实际耗时
    pub elapsed: Duration,
}

/// Bota 力/力矩传感器会话
///
/// # Example
///
/// ```no_run
/// use bota_driver::BotaSensor;
/// use std::time::Duration;
///
/// let mut sensor = BotaSensor::builder().udp("192.168.1.1", 1000).build()?;
/// let mut session = sensor.session()?;
/// session.calibrate(100, Duration::from_millis(10))?;
/// let data = session.read_data()?;
/// println!("{}", data);
/// # Ok::<(), bota_driver::DriverError>(())
/// ```
pub struct BotaSensor<T: Transport = SensorTransport> {
    transport: T,
    calibration: CalibrationState,
    sampling: SamplingConfig,
}

impl BotaSensor<SensorTransport> {
    /// 按连接配置创建会话（未连接）
    ///
    /// # Errors
    /// - `DriverError::Config`: 参数无效
    pub fn new(connection: &ConnectionConfig) -> Result<Self, DriverError> {
        Ok(Self::with_transport(connection.build_transport()?))
    }

    /// 按完整配置创建会话（未连接）
    pub fn from_config(config: &SensorConfig) -> Result<Self, DriverError> {
        config.sampling.validate()?;
        let mut sensor = Self::new(&config.connection)?;
        sensor.sampling = config.sampling.clone();
        Ok(sensor)
    }

    /// 链式构造
    pub fn builder() -> BotaSensorBuilder {
        BotaSensorBuilder::new()
    }
}

impl<T: Transport> BotaSensor<T> {
    /// 使用自定义传输创建会话（未连接）
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            calibration: CalibrationState::default(),
            sampling: SamplingConfig::default(),
        }
    }

    pub(crate) fn set_sampling(&mut self, sampling: SamplingConfig) {
        self.sampling = sampling;
    }

    pub fn connect(&mut self) -> Result<(), DriverError> {
        self.transport.connect()?;
        tracing::info!("Sensor connected via {}", self.transport.name());
        Ok(())
    }

    pub fn disconnect(&mut self) {
        if self.transport.is_connected() {
            tracing::info!("Disconnecting sensor ({})", self.transport.name());
        }
        self.transport.disconnect();
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.transport.state()
    }

    /// 连接并返回作用域守卫；守卫离开作用域时断开连接
    pub fn session(&mut self) -> Result<SensorSession<'_, T>, DriverError> {
        if let Err(e) = self.connect() {
            self.transport.disconnect();
            return Err(e);
        }
        Ok(SensorSession::new(self))
    }

    fn ensure_connected(&self) -> Result<(), DriverError> {
        if self.transport.is_connected() {
            Ok(())
        } else {
            Err(DriverError::NotConnected)
        }
    }

    /// 读取一帧未经校准的原始数据
    pub fn read_raw(&mut self) -> Result<RawSample, DriverError> {
        self.ensure_connected()?;
        self.transport.send(&encode_request())?;
        let bytes = self.transport.receive(MAX_RESPONSE_LEN)?;
        let sample = decode_response(&bytes)?;
        tracing::trace!("Decoded {} byte response", bytes.len());
        Ok(sample)
    }

    /// 读取一帧并应用校准
    ///
    /// # Errors
    /// - `ErrorKind::Connection`: 未连接或传输故障
    /// - `ErrorKind::Timeout`: 超时内无响应
    /// - `ErrorKind::Data`: 响应帧无效
    pub fn read_data(&mut self) -> Result<ForceTorqueData, DriverError> {
        let raw = self.read_raw()?;
        let timestamp = current_timestamp();
        Ok(ForceTorqueData::new(
            self.calibration.apply(&raw.to_f64()),
            timestamp,
        ))
    }

    /// 零点校准：平均 `samples` 个原始样本作为新的偏置
    ///
    /// 最多尝试 `2 × samples` 次读取；单次失败只记录日志并计入尝试次数。
    /// 仅在成功读取之间休眠 `sample_interval`。
    /// 预算耗尽仍不足 `samples` 个样本时返回 `CalibrationIncomplete`，
    /// 原有校准状态保持不变。增益不受影响。
    ///
    /// 返回新的偏置向量。
    pub fn calibrate(
        &mut self,
        samples: usize,
        sample_interval: Duration,
    ) -> Result<[f64; CHANNEL_COUNT], DriverError> {
        self.ensure_connected()?;
        if samples == 0 {
            return Err(DriverError::config("Calibration requires at least one sample"));
        }

        let max_attempts = samples.saturating_mul(2);
        let mut accumulator = OffsetAccumulator::new();
        let mut attempts = 0;

        tracing::info!("Calibrating sensor with {} samples...", samples);
        while accumulator.count() < samples && attempts < max_attempts {
            attempts += 1;
            match self.read_raw() {
                Ok(sample) => {
                    accumulator.add(&sample);
                    if accumulator.count() < samples {
                        spin_sleep::sleep(sample_interval);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read calibration sample {}: {}", attempts, e);
                },
            }
        }

        let offset = match accumulator.mean() {
            Some(mean) if accumulator.count() >= samples => mean,
            _ => {
                return Err(DriverError::CalibrationIncomplete {
                    collected: accumulator.count(),
                    required: samples,
                    attempts,
                });
            },
        };

        self.calibration.replace_offset(offset);
        tracing::info!("Calibration complete. Offset: {:?}", offset);
        Ok(offset)
    }

    /// 使用配置中的默认参数校准
    pub fn calibrate_default(&mut self) -> Result<[f64; CHANNEL_COUNT], DriverError> {
        let samples = self.sampling.calibration_samples;
        let interval = self.sampling.calibration_interval();
        self.calibrate(samples, interval)
    }

    /// 在 `duration` 时间内以约 `rate_hz` 的频率连续读取
    ///
    /// 单次读取失败不会中断循环，也不会返回错误；返回的样本数可能少于
    /// `duration × rate_hz`。
    pub fn read_continuous(
        &mut self,
        duration: Duration,
        rate_hz: f64,
    ) -> Result<Vec<ForceTorqueData>, DriverError> {
        let mut readings = Vec::new();
        self.read_continuous_with(duration, rate_hz, |data| {
            readings.push(*data);
            ControlFlow::Continue(())
        })?;
        Ok(readings)
    }

    /// 使用配置中的默认时长与频率连续读取
    pub fn read_continuous_default(&mut self) -> Result<Vec<ForceTorqueData>, DriverError> {
        let duration = self.sampling.continuous_duration();
        let rate = self.sampling.continuous_rate_hz;
        self.read_continuous(duration, rate)
    }

    /// 连续读取，每个成功样本交给回调；回调返回 `Break` 时提前结束
    pub fn read_continuous_with<F>(
        &mut self,
        duration: Duration,
        rate_hz: f64,
        mut on_sample: F,
    ) -> Result<SamplingStats, DriverError>
    where
        F: FnMut(&ForceTorqueData) -> ControlFlow<()>,
    {
        self.ensure_connected()?;
        if !(rate_hz.is_finite() && rate_hz > 0.0) {
            return Err(DriverError::config(format!(
                "Sampling rate must be positive, got {}",
                rate_hz
            )));
        }
        let interval = Duration::try_from_secs_f64(1.0 / rate_hz).map_err(|e| {
            DriverError::config(format!("Invalid sampling rate {}: {}", rate_hz, e))
        })?;

        let mut stats = SamplingStats::default();
        let start = Instant::now();

        while start.elapsed() < duration {
            match self.read_data() {
                Ok(data) => {
                    stats.collected += 1;
                    if on_sample(&data).is_break() {
                        break;
                    }
                    spin_sleep::sleep(interval);
                },
                Err(e) => {
                    stats.failed += 1;
                    tracing::debug!("Failed to read data: {}", e);
                },
            }
        }

        stats.elapsed = start.elapsed();
        if stats.failed > 0 {
            tracing::warn!(
                "Continuous read: {} samples collected, {} reads failed in {:?}",
                stats.collected,
                stats.failed,
                stats.elapsed
            );
        }
        Ok(stats)
    }

    /// 设置增益（下一次读取生效）
    pub fn set_scale_factor(&mut self, scale_factor: f64) -> Result<(), DriverError> {
        self.calibration.set_scale_factor(scale_factor)
    }

    pub fn scale_factor(&self) -> f64 {
        self.calibration.scale_factor()
    }

    /// 手动设置偏置向量（复制传入值）
    pub fn set_calibration_offset(&mut self, offset: &[f64]) -> Result<(), DriverError> {
        self.calibration.set_offset(offset)
    }

    /// 当前偏置向量副本
    pub fn get_calibration_offset(&self) -> [f64; CHANNEL_COUNT] {
        self.calibration.offset()
    }

    /// 当前校准状态副本
    pub fn calibration(&self) -> CalibrationState {
        self.calibration
    }

    /// 恢复 {offset = 0, scale_factor = 1}
    pub fn reset_calibration(&mut self) {
        self.calibration.reset();
    }

    /// 连接状态与当前配置
    pub fn info(&self) -> SensorInfo {
        SensorInfo {
            connected: self.is_connected(),
            calibration_offset: self.calibration.offset(),
            scale_factor: self.calibration.scale_factor(),
            transport: self.transport.name(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// 取回传输（不会自动断开）
    pub fn into_transport(self) -> T {
        self.transport
    }
}
