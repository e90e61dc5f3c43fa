//! 基本用法示例
//!
//! 通过 UDP 连接传感器，做零点校准，然后读取几帧数据。
//!
//! 用法：`cargo run --example basic_usage -- [HOST] [PORT]`

use bota_sdk::prelude::*;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    bota_sdk::init_logging();

    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "192.168.1.1".to_string());
    let port: u16 = match args.next() {
        Some(p) => p.parse()?,
        None => 1000,
    };

    println!("正在连接到传感器 {}:{} ...", host, port);
    let mut sensor = BotaSensor::builder()
        .udp(host, port)
        .timeout(Duration::from_secs(1))
        .build()?;

    // 离开作用域时自动断开
    let mut session = sensor.session()?;
    println!("✓ 已连接");

    println!("请保持传感器空载，正在校准...");
    let offset = session.calibrate(100, Duration::from_millis(10))?;
    println!("✓ 校准完成，偏置: {:?}", offset);

    for i in 1..=5 {
        match session.read_data() {
            Ok(data) => {
                println!("[{}] {}", i, data);
                println!(
                    "    |F| = {:.3} N, |T| = {:.3} Nm",
                    data.force_magnitude(),
                    data.torque_magnitude()
                );
            },
            Err(e) if e.is_timeout() => println!("[{}] 读取超时", i),
            Err(e) => return Err(e.into()),
        }
        std::thread::sleep(Duration::from_millis(100));
    }

    println!("{}", session.info());
    Ok(())
}
