//! UDP/以太网传输
//!
//! UDP 无握手：`connect()` 只绑定本地 socket、设置接收超时并解析对端地址，
//! 因此 `is_connected()` 表示“socket 就绪”，而非“对端可达”。

use crate::{Transport, TransportDeviceError, TransportDeviceErrorKind, TransportError};
use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;

/// UDP 传输
pub struct UdpTransport {
    /// 传感器主机名或 IPv4 地址
    host: String,
    /// 传感器 UDP 端口
    port: u16,
    /// 接收超时
    timeout: Duration,
    /// 已打开的 socket 与解析后的对端地址
    socket: Option<(UdpSocket, SocketAddr)>,
}

impl UdpTransport {
    /// 创建 UDP 传输（未连接）
    ///
    /// # 参数
    /// - `host`: 传感器地址（如 "192.168.1.1"）
    /// - `port`: UDP 端口
    /// - `timeout`: 接收超时
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
            socket: None,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 已解析的对端地址（仅连接后可用）
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.socket.as_ref().map(|(_, addr)| *addr)
    }

    /// 本地绑定地址（仅连接后可用）
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.socket
            .as_ref()
            .and_then(|(socket, _)| socket.local_addr().ok())
    }

    fn resolve_peer(&self) -> Result<SocketAddr, TransportError> {
        let mut addrs = (self.host.as_str(), self.port).to_socket_addrs().map_err(|e| {
            TransportError::Device(TransportDeviceError::new(
                TransportDeviceErrorKind::NotFound,
                format!("Failed to resolve {}:{}: {}", self.host, self.port, e),
            ))
        })?;

        // 本地 socket 绑定在 IPv4 上，优先选择 IPv4 地址
        let mut first = None;
        for addr in addrs.by_ref() {
            if addr.is_ipv4() {
                return Ok(addr);
            }
            first.get_or_insert(addr);
        }
        first.ok_or_else(|| {
            TransportError::Device(TransportDeviceError::new(
                TransportDeviceErrorKind::NotFound,
                format!("No address found for {}:{}", self.host, self.port),
            ))
        })
    }
}

/// 超时在不同平台上分别表现为 WouldBlock（Unix）或 TimedOut（Windows）
fn map_recv_error(e: io::Error) -> TransportError {
    match e.kind() {
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => TransportError::Timeout,
        _ => TransportError::Io(e),
    }
}

impl Transport for UdpTransport {
    fn connect(&mut self) -> Result<(), TransportError> {
        if self.timeout.is_zero() {
            return Err(TransportError::Device(TransportDeviceError::new(
                TransportDeviceErrorKind::InvalidConfig,
                "UDP receive timeout must be greater than zero",
            )));
        }

        let peer = self.resolve_peer()?;
        let bind_addr = if peer.is_ipv4() {
            "0.0.0.0:0"
        } else {
            "[::]:0"
        };

        let socket = UdpSocket::bind(bind_addr).map_err(TransportError::Io)?;
        socket
            .set_read_timeout(Some(self.timeout))
            .map_err(TransportError::Io)?;

        tracing::info!(
            "UDP transport ready: local {:?} -> sensor {}",
            socket.local_addr().ok(),
            peer
        );
        self.socket = Some((socket, peer));
        Ok(())
    }

    fn disconnect(&mut self) {
        if self.socket.take().is_some() {
            tracing::info!("UDP transport closed ({}:{})", self.host, self.port);
        }
    }

    fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let (socket, peer) = self.socket.as_ref().ok_or(TransportError::NotConnected)?;
        let sent = socket.send_to(data, *peer).map_err(TransportError::Io)?;
        tracing::trace!("UDP sent {} bytes to {}", sent, peer);
        Ok(())
    }

    fn receive(&mut self, size: usize) -> Result<Vec<u8>, TransportError> {
        let (socket, _) = self.socket.as_ref().ok_or(TransportError::NotConnected)?;

        let mut buf = vec![0u8; size];
        let (len, from) = socket.recv_from(&mut buf).map_err(map_recv_error)?;
        buf.truncate(len);
        tracing::trace!("UDP received {} bytes from {}", len, from);
        Ok(buf)
    }

    fn is_connected(&self) -> bool {
        self.socket.is_some()
    }

    fn name(&self) -> &'static str {
        "udp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loopback_peer() -> UdpSocket {
        let peer = UdpSocket::bind("127.0.0.1:0").unwrap();
        peer.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
        peer
    }

    #[test]
    fn test_udp_new_is_disconnected() {
        let transport = UdpTransport::new("192.168.1.1", 1000, Duration::from_secs(5));
        assert!(!transport.is_connected());
        assert_eq!(transport.host(), "192.168.1.1");
        assert_eq!(transport.port(), 1000);
        assert_eq!(transport.timeout(), Duration::from_secs(5));
        assert!(transport.peer_addr().is_none());
    }

    #[test]
    fn test_udp_operations_require_connection() {
        let mut transport = UdpTransport::new("127.0.0.1", 1000, Duration::from_secs(1));
        assert!(matches!(transport.send(&[0x01, 0x00]), Err(TransportError::NotConnected)));
        assert!(matches!(transport.receive(48), Err(TransportError::NotConnected)));
    }

    #[test]
    fn test_udp_disconnect_when_disconnected_is_noop() {
        let mut transport = UdpTransport::new("127.0.0.1", 1000, Duration::from_secs(1));
        transport.disconnect();
        transport.disconnect();
        assert!(!transport.is_connected());
    }

    #[test]
    fn test_udp_zero_timeout_rejected() {
        let mut transport = UdpTransport::new("127.0.0.1", 1000, Duration::ZERO);
        match transport.connect() {
            Err(TransportError::Device(e)) => {
                assert_eq!(e.kind, TransportDeviceErrorKind::InvalidConfig)
            },
            other => panic!("Expected InvalidConfig, got {:?}", other.err()),
        }
        assert!(!transport.is_connected());
    }

    #[test]
    fn test_udp_send_and_receive_loopback() {
        let peer = loopback_peer();
        let peer_addr = peer.local_addr().unwrap();

        let mut transport =
            UdpTransport::new("127.0.0.1", peer_addr.port(), Duration::from_secs(2));
        transport.connect().unwrap();
        assert!(transport.is_connected());
        assert_eq!(transport.peer_addr(), Some(peer_addr));

        transport.send(&[0x01, 0x00]).unwrap();
        let mut buf = [0u8; 16];
        let (len, from) = peer.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..len], &[0x01, 0x00]);

        peer.send_to(&[1, 2, 3, 4, 5], from).unwrap();
        let data = transport.receive(48).unwrap();
        assert_eq!(data, vec![1, 2, 3, 4, 5]);

        transport.disconnect();
        assert!(!transport.is_connected());
    }

    #[test]
    fn test_udp_receive_truncates_to_size() {
        let peer = loopback_peer();
        let mut transport = UdpTransport::new(
            "127.0.0.1",
            peer.local_addr().unwrap().port(),
            Duration::from_secs(2),
        );
        transport.connect().unwrap();
        let local_port = transport.local_addr().unwrap().port();

        peer.send_to(&[7u8; 64], ("127.0.0.1", local_port)).unwrap();
        let data = transport.receive(48).unwrap();
        assert_eq!(data.len(), 48);
    }

    #[test]
    fn test_udp_receive_timeout() {
        let peer = loopback_peer();
        let mut transport = UdpTransport::new(
            "127.0.0.1",
            peer.local_addr().unwrap().port(),
            Duration::from_millis(50),
        );
        transport.connect().unwrap();

        match transport.receive(48) {
            Err(TransportError::Timeout) => {},
            other => panic!("Expected Timeout, got {:?}", other),
        }
        // 超时不改变连接状态
        assert!(transport.is_connected());
    }

    #[test]
    fn test_udp_unresolvable_host() {
        let mut transport =
            UdpTransport::new("no-such-host.invalid", 1000, Duration::from_millis(50));
        assert!(transport.connect().is_err());
        assert!(!transport.is_connected());
    }
}
