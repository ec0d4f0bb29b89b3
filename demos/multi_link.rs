//! Drive two peripherals at once, each through its own link.
//!
//! Run with: cargo run --example multi_link
//!
//! Flash the peripherals with distinct names, `PicoW_BLE_1` and
//! `PicoW_BLE_2`.

use ble_text_link::{
    BleLinkClient, LinkConfig, LinkRegistry, LinkSinks, PlatformTransport, Result,
};
use std::sync::Arc;
use std::time::Duration;

const DEVICES: [&str; 2] = ["PicoW_BLE_1", "PicoW_BLE_2"];

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ble_text_link=info".parse().unwrap()),
        )
        .init();

    let transport = Arc::new(PlatformTransport::new().await?);
    let registry = LinkRegistry::new();

    for name in DEVICES {
        let status_tag = name.to_string();
        let log_tag = name.to_string();
        let sinks = LinkSinks::new(
            Arc::new(move |status: &str| println!("[{}] {}", status_tag, status)),
            Arc::new(move |line: &str| print!("[{}] < {}", log_tag, line)),
            Arc::new(|_: bool| {}),
        );

        let config = LinkConfig::default().with_device_name(name);
        registry.insert(BleLinkClient::new(config, transport.clone(), sinks))?;
    }

    for name in DEVICES {
        // Failures are already on the status line.
        let _ = registry.connect(name).await;
    }

    println!("Connected: {:?}", registry.connected().await);

    for round in 0..3 {
        for name in DEVICES {
            let command = if round % 2 == 0 { "LED_ON" } else { "LED_OFF" };
            let _ = registry.send_to(name, command).await;
        }
        tokio::time::sleep(Duration::from_secs(2)).await;
    }

    registry.shutdown().await;
    Ok(())
}
