//! Mock 传输（测试用）
//!
//! 可克隆的句柄，内部共享状态：测试代码保留一个克隆用于注入行为和检查记录，
//! 另一个克隆交给会话。

use crate::{Transport, TransportDeviceError, TransportDeviceErrorKind, TransportError};
use bota_protocol::{RawSample, encode_response};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// 单次 `receive` 调用的脚本化结果
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// 返回给定字节（按 `size` 截断）
    Respond(Vec<u8>),
    /// 返回 `TransportError::Timeout`
    Timeout,
    /// 返回传输故障
    Fault,
}

impl MockBehavior {
    /// 返回一帧编码后的采样
    pub fn sample(values: [f32; 6]) -> Self {
        MockBehavior::Respond(encode_response(&RawSample::new(values)).to_vec())
    }

    fn into_result(self, size: usize) -> Result<Vec<u8>, TransportError> {
        match self {
            MockBehavior::Respond(mut bytes) => {
                bytes.truncate(size);
                Ok(bytes)
            },
            MockBehavior::Timeout => Err(TransportError::Timeout),
            MockBehavior::Fault => Err(TransportError::Device(TransportDeviceError::new(
                TransportDeviceErrorKind::Backend,
                "mock transport fault",
            ))),
        }
    }
}

/// Mock 传输
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

struct MockTransportInner {
    connected: bool,
    /// 优先消费的脚本队列
    script: VecDeque<MockBehavior>,
    /// 队列耗尽后的默认行为
    fallback: MockBehavior,
    /// `connect()` 是否失败
    fail_connect: bool,
    sent: Vec<Vec<u8>>,
    connect_calls: usize,
    disconnect_calls: usize,
    receive_calls: usize,
}

impl MockTransport {
    /// 创建 Mock 传输（默认行为：超时）
    pub fn new() -> Self {
        MockTransport {
            inner: Arc::new(Mutex::new(MockTransportInner {
                connected: false,
                script: VecDeque::new(),
                fallback: MockBehavior::Timeout,
                fail_connect: false,
                sent: Vec::new(),
                connect_calls: 0,
                disconnect_calls: 0,
                receive_calls: 0,
            })),
        }
    }

    /// 每次接收都返回同一帧采样
    pub fn with_sample(values: [f32; 6]) -> Self {
        let mock = Self::new();
        mock.set_fallback(MockBehavior::sample(values));
        mock
    }

    /// 每次接收都失败
    pub fn failing() -> Self {
        let mock = Self::new();
        mock.set_fallback(MockBehavior::Fault);
        mock
    }

    /// 设置默认行为
    pub fn set_fallback(&self, behavior: MockBehavior) {
        self.inner.lock().fallback = behavior;
    }

    /// 追加一次性行为
    pub fn push(&self, behavior: MockBehavior) {
        self.inner.lock().script.push_back(behavior);
    }

    /// 让后续 `connect()` 失败
    pub fn set_fail_connect(&self, fail: bool) {
        self.inner.lock().fail_connect = fail;
    }

    /// 已发送的全部帧
    pub fn sent_frames(&self) -> Vec<Vec<u8>> {
        self.inner.lock().sent.clone()
    }

    pub fn connect_calls(&self) -> usize {
        self.inner.lock().connect_calls
    }

    pub fn disconnect_calls(&self) -> usize {
        self.inner.lock().disconnect_calls
    }

    pub fn receive_calls(&self) -> usize {
        self.inner.lock().receive_calls
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockTransport {
    fn connect(&mut self) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        inner.connect_calls += 1;
        if inner.fail_connect {
            return Err(TransportError::Device(TransportDeviceError::new(
                TransportDeviceErrorKind::NotFound,
                "mock device unavailable",
            )));
        }
        inner.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) {
        let mut inner = self.inner.lock();
        inner.disconnect_calls += 1;
        inner.connected = false;
    }

    fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        if !inner.connected {
            return Err(TransportError::NotConnected);
        }
        inner.sent.push(data.to_vec());
        Ok(())
    }

    fn receive(&mut self, size: usize) -> Result<Vec<u8>, TransportError> {
        let mut inner = self.inner.lock();
        if !inner.connected {
            return Err(TransportError::NotConnected);
        }
        inner.receive_calls += 1;
        let behavior = match inner.script.pop_front() {
            Some(behavior) => behavior,
            None => inner.fallback.clone(),
        };
        behavior.into_result(size)
    }

    fn is_connected(&self) -> bool {
        self.inner.lock().connected
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
