//! 力/力矩测量值

use crate::axis::{Axis, CHANNEL_COUNT};
use std::fmt;
use std::ops::Index;
use std::time::{SystemTime, UNIX_EPOCH};

/// 当前时间戳（秒，UNIX 纪元起）
///
/// 时间戳在主机侧解码时打上，而非设备时间。
pub fn current_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// 单次力/力矩测量
///
/// 构造后不可变：六个通道全部存在，没有缺省字段。
/// 短帧在解码阶段即失败，不会产生部分填充的测量值。
///
/// # 示例
///
/// ```rust
/// use bota_protocol::{Axis, ForceTorqueData};
///
/// let data = ForceTorqueData::new([1.0, 2.0, 3.0, 0.1, 0.2, 0.3], 0.0);
/// assert_eq!(data.fz(), 3.0);
/// assert_eq!(data[Axis::Tx], 0.1);
/// assert_eq!(data.to_array(), [1.0, 2.0, 3.0, 0.1, 0.2, 0.3]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForceTorqueData {
    fx: f64,
    fy: f64,
    fz: f64,
    tx: f64,
    ty: f64,
    tz: f64,
    /// 秒（UNIX 纪元起）
    timestamp: f64,
}

impl ForceTorqueData {
    /// 按 `Axis::ALL` 顺序的通道值与时间戳构造
    pub fn new(channels: [f64; CHANNEL_COUNT], timestamp: f64) -> Self {
        let [fx, fy, fz, tx, ty, tz] = channels;
        Self {
            fx,
            fy,
            fz,
            tx,
            ty,
            tz,
            timestamp,
        }
    }

    /// 以当前时间为时间戳构造
    pub fn now(channels: [f64; CHANNEL_COUNT]) -> Self {
        Self::new(channels, current_timestamp())
    }

    pub fn fx(&self) -> f64 {
        self.fx
    }

    pub fn fy(&self) -> f64 {
        self.fy
    }

    pub fn fz(&self) -> f64 {
        self.fz
    }

    pub fn tx(&self) -> f64 {
        self.tx
    }

    pub fn ty(&self) -> f64 {
        self.ty
    }

    pub fn tz(&self) -> f64 {
        self.tz
    }

    /// 采样时间戳（秒）
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// 读取指定通道
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Fx => self.fx,
            Axis::Fy => self.fy,
            Axis::Fz => self.fz,
            Axis::Tx => self.tx,
            Axis::Ty => self.ty,
            Axis::Tz => self.tz,
        }
    }

    /// 有序通道值 `[fx, fy, fz, tx, ty, tz]`
    pub fn to_array(&self) -> [f64; CHANNEL_COUNT] {
        [self.fx, self.fy, self.fz, self.tx, self.ty, self.tz]
    }

    /// 带标签的有序键值对，最后一项为 `timestamp`
    pub fn to_labeled(&self) -> [(&'static str, f64); CHANNEL_COUNT + 1] {
        [
            (Axis::Fx.label(), self.fx),
            (Axis::Fy.label(), self.fy),
            (Axis::Fz.label(), self.fz),
            (Axis::Tx.label(), self.tx),
            (Axis::Ty.label(), self.ty),
            (Axis::Tz.label(), self.tz),
            ("timestamp", self.timestamp),
        ]
    }

    /// 合力大小（N）
    pub fn force_magnitude(&self) -> f64 {
        (self.fx * self.fx + self.fy * self.fy + self.fz * self.fz).sqrt()
    }

    /// 合力矩大小（Nm）
    pub fn torque_magnitude(&self) -> f64 {
        (self.tx * self.tx + self.ty * self.ty + self.tz * self.tz).sqrt()
    }
}

impl Index<Axis> for ForceTorqueData {
    type Output = f64;

    fn index(&self, axis: Axis) -> &f64 {
        match axis {
            Axis::Fx => &self.fx,
            Axis::Fy => &self.fy,
            Axis::Fz => &self.fz,
            Axis::Tx => &self.tx,
            Axis::Ty => &self.ty,
            Axis::Tz => &self.tz,
        }
    }
}

impl fmt::Display for ForceTorqueData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ForceTorqueData(fx={:.3}, fy={:.3}, fz={:.3}, tx={:.3}, ty={:.3}, tz={:.3})",
            self.fx, self.fy, self.fz, self.tx, self.ty, self.tz
        )
    }
}
