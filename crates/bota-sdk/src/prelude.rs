//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use bota_sdk::prelude::*;
//! ```

pub use crate::driver::{BotaSensor, BotaSensorBuilder, SensorConfig, SensorSession};
pub use crate::protocol::{Axis, ForceTorqueData};
pub use crate::transport::{ConnectionState, Transport};

// 错误类型
pub use crate::driver::{DriverError, ErrorKind};
pub use crate::transport::TransportError;
