//! 软件零点校准状态
//!
//! 校准公式（逐通道）：
//!
//! ```text
//! calibrated[i] = (raw[i] - offset[i]) * scale_factor
//! ```
//!
//! 状态只存在于会话内存中，不写入设备或磁盘；`reset()` 恢复初始值。

use crate::error::DriverError;
use bota_protocol::{CHANNEL_COUNT, RawSample};

/// 校准状态：偏置向量 + 标量增益
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationState {
    offset: [f64; CHANNEL_COUNT],
    scale_factor: f64,
}

impl Default for CalibrationState {
    fn default() -> Self {
        Self {
            offset: [0.0; CHANNEL_COUNT],
            scale_factor: 1.0,
        }
    }
}

impl CalibrationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 偏置向量副本
    pub fn offset(&self) -> [f64; CHANNEL_COUNT] {
        self.offset
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// 设置偏置向量
    ///
    /// # Errors
    /// - 长度不为 6，或含 NaN / ∞ 时返回 `DriverError::Config`
    pub fn set_offset(&mut self, offset: &[f64]) -> Result<(), DriverError> {
        let offset: [f64; CHANNEL_COUNT] = offset.try_into().map_err(|_| {
            DriverError::config(format!(
                "Offset must contain exactly {} values, got {}",
                CHANNEL_COUNT,
                offset.len()
            ))
        })?;
        if offset.iter().any(|v| !v.is_finite()) {
            return Err(DriverError::config("Offset values must be finite"));
        }
        self.offset = offset;
        Ok(())
    }

    /// 设置增益，必须为正的有限值
    pub fn set_scale_factor(&mut self, scale_factor: f64) -> Result<(), DriverError> {
        if !(scale_factor.is_finite() && scale_factor > 0.0) {
            return Err(DriverError::config(format!(
                "Scale factor must be positive, got {}",
                scale_factor
            )));
        }
        self.scale_factor = scale_factor;
        Ok(())
    }

    /// 恢复 {offset = 0, scale_factor = 1}
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 对原始通道值应用校准
    pub fn apply(&self, raw: &[f64; CHANNEL_COUNT]) -> [f64; CHANNEL_COUNT] {
        std::array::from_fn(|i| (raw[i] - self.offset[i]) * self.scale_factor)
    }

    pub(crate) fn replace_offset(&mut self, offset: [f64; CHANNEL_COUNT]) {
        self.offset = offset;
    }
}

/// 逐通道累加原始样本，用于计算零点均值
#[derive(Debug, Clone, Default)]
pub struct OffsetAccumulator {
    sums: [f64; CHANNEL_COUNT],
    count: usize,
}

impl OffsetAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, sample: &RawSample) {
        for (sum, value) in self.sums.iter_mut().zip(sample.to_f64()) {
            *sum += value;
        }
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// 各通道均值；无样本时为 `None`
    pub fn mean(&self) -> Option<[f64; CHANNEL_COUNT]> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some(self.sums.map(|sum| sum / n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use proptest::prelude::*;

    #[test]
    fn test_default_state() {
        let state = CalibrationState::new();
        assert_eq!(state.offset(), [0.0; 6]);
        assert_eq!(state.scale_factor(), 1.0);
        let raw = [1.0, -2.0, 3.5, 0.1, 0.2, 0.3];
        assert_eq!(state.apply(&raw), raw);
    }

    #[test]
    fn test_set_offset_requires_six_values() {
        let mut state = CalibrationState::new();
        for len in [0usize, 1, 5, 7, 12] {
            let offset = vec![1.0; len];
            let err = state.set_offset(&offset).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Config, "length {}", len);
        }
        assert_eq!(state.offset(), [0.0; 6]);

        state.set_offset(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(state.offset(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_set_offset_rejects_non_finite() {
        let mut state = CalibrationState::new();
        let err = state.set_offset(&[0.0, f64::NAN, 0.0, 0.0, 0.0, 0.0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_set_scale_factor_validation() {
        let mut state = CalibrationState::new();
        for bad in [0.0, -1.0, -0.001, f64::NAN, f64::INFINITY] {
            assert_eq!(
                state.set_scale_factor(bad).unwrap_err().kind(),
                ErrorKind::Config,
                "value {}",
                bad
            );
        }
        assert_eq!(state.scale_factor(), 1.0);

        state.set_scale_factor(2.5).unwrap();
        assert_eq!(state.scale_factor(), 2.5);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut state = CalibrationState::new();
        state.set_offset(&[1.0; 6]).unwrap();
        state.set_scale_factor(3.0).unwrap();
        state.reset();
        assert_eq!(state, CalibrationState::default());
    }

    #[test]
    fn test_apply_formula() {
        let mut state = CalibrationState::new();
        state.set_offset(&[1.0, 1.0, 1.0, 0.5, 0.5, 0.5]).unwrap();
        state.set_scale_factor(2.0).unwrap();
        let out = state.apply(&[3.0, 1.0, -1.0, 0.5, 1.5, 0.0]);
        assert_eq!(out, [4.0, 0.0, -4.0, 0.0, 2.0, -1.0]);
    }

    #[test]
    fn test_accumulator_mean() {
        let mut acc = OffsetAccumulator::new();
        assert_eq!(acc.mean(), None);

        acc.add(&RawSample::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
        acc.add(&RawSample::new([3.0, 4.0, 5.0, 6.0, 7.0, 8.0]));
        assert_eq!(acc.count(), 2);
        assert_eq!(acc.mean(), Some([2.0, 3.0, 4.0, 5.0, 6.0, 7.0]));
    }

    proptest! {
        #[test]
        fn prop_apply_matches_formula(
            raw in proptest::array::uniform6(-1.0e4f64..1.0e4),
            offset in proptest::array::uniform6(-1.0e4f64..1.0e4),
            gain in 1.0e-3f64..1.0e3,
        ) {
            let mut state = CalibrationState::new();
            state.set_offset(&offset).unwrap();
            state.set_scale_factor(gain).unwrap();
            let out = state.apply(&raw);
            for i in 0..6 {
                prop_assert_eq!(out[i], (raw[i] - offset[i]) * gain);
            }
        }

        #[test]
        fn prop_reset_always_restores_defaults(
            offset in proptest::array::uniform6(-1.0e4f64..1.0e4),
            gain in 1.0e-3f64..1.0e3,
        ) {
            let mut state = CalibrationState::new();
            state.set_offset(&offset).unwrap();
            state.set_scale_factor(gain).unwrap();
            state.reset();
            prop_assert_eq!(state.offset(), [0.0; 6]);
            prop_assert_eq!(state.scale_factor(), 1.0);
        }
    }
}
