//! 测量通道定义

use std::fmt;

/// 通道数量（3 个力 + 3 个力矩）
pub const CHANNEL_COUNT: usize = 6;

/// 力/力矩测量通道
///
/// 枚举顺序即线上帧与偏置向量中的通道顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Axis {
    /// X 方向力（N）
    Fx,
    /// Y 方向力（N）
    Fy,
    /// Z 方向力（N）
    Fz,
    /// 绕 X 轴力矩（Nm）
    Tx,
    /// 绕 Y 轴力矩（Nm）
    Ty,
    /// 绕 Z 轴力矩（Nm）
    Tz,
}

impl Axis {
    /// 按线上顺序排列的全部通道
    pub const ALL: [Axis; CHANNEL_COUNT] =
        [Axis::Fx, Axis::Fy, Axis::Fz, Axis::Tx, Axis::Ty, Axis::Tz];

    /// 通道在帧/向量中的下标
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 通道标签（"fx" ... "tz"）
    pub const fn label(self) -> &'static str {
        match self {
            Axis::Fx => "fx",
            Axis::Fy => "fy",
            Axis::Fz => "fz",
            Axis::Tx => "tx",
            Axis::Ty => "ty",
            Axis::Tz => "tz",
        }
    }

    /// 是否为力通道（否则为力矩通道）
    pub const fn is_force(self) -> bool {
        matches!(self, Axis::Fx | Axis::Fy | Axis::Fz)
    }

    /// 物理单位
    pub const fn unit(self) -> &'static str {
        if self.is_force() { "N" } else { "Nm" }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
