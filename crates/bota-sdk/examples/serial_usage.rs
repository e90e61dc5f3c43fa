//! 串口连接示例
//!
//! 列出可用串口，连接指定设备并读取一帧数据。
//!
//! 用法：`cargo run --example serial_usage -- [DEVICE] [BAUD]`

use bota_sdk::prelude::*;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    bota_sdk::init_logging();

    match bota_sdk::list_serial_ports() {
        Ok(ports) if ports.is_empty() => println!("未发现串口设备"),
        Ok(ports) => {
            println!("可用串口:");
            for port in ports {
                println!("  {}", port);
            }
        },
        Err(e) => println!("无法枚举串口: {}", e),
    }

    let mut args = std::env::args().skip(1);
    let device = args.next().unwrap_or_else(|| "/dev/ttyUSB0".to_string());
    let baud_rate: u32 = match args.next() {
        Some(b) => b.parse()?,
        None => 115_200,
    };

    let mut sensor = BotaSensor::builder()
        .serial(device.as_str())
        .baud_rate(baud_rate)
        .timeout(Duration::from_millis(500))
        .build()?;

    let mut session = match sensor.session() {
        Ok(session) => session,
        Err(e) => {
            eprintln!("连接 {} 失败 ({}): {}", device, e.kind(), e);
            return Err(e.into());
        },
    };
    println!("✓ 已连接到 {} @ {} baud", device, baud_rate);

    let data = session.read_data()?;
    for (label, value) in data.to_labeled() {
        println!("  {:>9}: {:.4}", label, value);
    }
    Ok(())
}
