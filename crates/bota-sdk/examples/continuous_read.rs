//! 连续采样示例
//!
//! 校准后以固定频率持续读取，按 Ctrl+C 退出并打印统计。
//!
//! 用法：`cargo run --example continuous_read -- [HOST] [RATE_HZ]`

use bota_sdk::prelude::*;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    bota_sdk::init_logging();

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
        println!("\n收到退出信号，正在关闭...");
    })?;

    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "192.168.1.1".to_string());
    let rate_hz: f64 = match args.next() {
        Some(r) => r.parse()?,
        None => 100.0,
    };

    let mut sensor = BotaSensor::builder().udp(host, 1000).build()?;
    let mut session = sensor.session()?;
    session.calibrate(50, Duration::from_millis(10))?;
    println!("✓ 校准完成，开始以 {} Hz 采样（Ctrl+C 退出）", rate_hz);

    let mut count = 0u64;
    let mut peak_force = 0.0f64;
    let stats = session.read_continuous_with(Duration::from_secs(3600), rate_hz, |data| {
        count += 1;
        peak_force = peak_force.max(data.force_magnitude());
        if count % (rate_hz.max(1.0) as u64) == 0 {
            println!("{}", data);
        }
        if running.load(Ordering::SeqCst) {
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(())
        }
    })?;

    println!(
        "采集 {} 帧，失败 {} 次，耗时 {:.2?}，峰值力 {:.3} N",
        stats.collected, stats.failed, stats.elapsed, peak_force
    );
    Ok(())
}
