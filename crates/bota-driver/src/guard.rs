//! 作用域连接守卫
//!
//! 守卫持有会话的可变借用；在任何退出路径（正常返回、`?` 提前返回、panic 展开）
//! 上 Drop 时都会断开连接。

use crate::sensor::BotaSensor;
use bota_transport::Transport;
use std::ops::{Deref, DerefMut};

/// 已连接的会话守卫，由 [`BotaSensor::session`] 创建
pub struct SensorSession<'a, T: Transport> {
    sensor: &'a mut BotaSensor<T>,
}

impl<'a, T: Transport> SensorSession<'a, T> {
    pub(crate) fn new(sensor: &'a mut BotaSensor<T>) -> Self {
        Self { sensor }
    }
}

impl<T: Transport> Deref for SensorSession<'_, T> {
    type Target = BotaSensor<T>;

    fn deref(&self) -> &Self::Target {
        self.sensor
    }
}

impl<T: Transport> DerefMut for SensorSession<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.sensor
    }
}

impl<T: Transport> Drop for SensorSession<'_, T> {
    fn drop(&mut self) {
        self.sensor.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DriverError;
    use bota_transport::MockTransport;

    #[test]
    fn test_session_disconnects_on_drop() {
        let mock = MockTransport::with_sample([1.0; 6]);
        let mut sensor = BotaSensor::with_transport(mock.clone());
        {
            let mut session = sensor.session().unwrap();
            assert!(session.is_connected());
            session.read_data().unwrap();
        }
        assert!(!sensor.is_connected());
        assert_eq!(mock.connect_calls(), 1);
        assert_eq!(mock.disconnect_calls(), 1);
    }

    #[test]
    fn test_session_disconnects_on_early_return() {
        fn failing_workflow(sensor: &mut BotaSensor<MockTransport>) -> Result<(), DriverError> {
            let mut session = sensor.session()?;
            session.read_data()?;
            Ok(())
        }

        let mock = MockTransport::failing();
        let mut sensor = BotaSensor::with_transport(mock.clone());
        assert!(failing_workflow(&mut sensor).is_err());
        assert!(!sensor.is_connected());
        assert_eq!(mock.disconnect_calls(), 1);
    }

    #[test]
    fn test_session_connect_failure_releases_transport() {
        let mock = MockTransport::new();
        mock.set_fail_connect(true);
        let mut sensor = BotaSensor::with_transport(mock.clone());

        assert!(sensor.session().is_err());
        assert!(!sensor.is_connected());
        assert_eq!(mock.disconnect_calls(), 1);
    }

    #[test]
    fn test_session_disconnects_on_panic() {
        let mock = MockTransport::with_sample([1.0; 6]);
        let handle = mock.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let mut sensor = BotaSensor::with_transport(mock);
            let _session = sensor.session().unwrap();
            panic!("workflow failed");
        }));
        assert!(result.is_err());
        assert!(!handle.is_connected());
    }
}
