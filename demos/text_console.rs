//! Interactive console: relay stdin lines to the peripheral and print
//! whatever it notifies.
//!
//! Run with: cargo run --example text_console -- [DEVICE_NAME]
//!
//! Try `LED_ON` / `LED_OFF` against the reference Pico W firmware.

use ble_text_link::{BleLinkClient, LinkConfig, LinkSinks, PlatformTransport, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ble_text_link=info".parse().unwrap()),
        )
        .init();

    let mut config = LinkConfig::default();
    if let Some(name) = std::env::args().nth(1) {
        config = config.with_device_name(name);
    }

    println!("Looking for {}...", config.device_name);

    let transport = Arc::new(PlatformTransport::new().await?);
    let sinks = LinkSinks::new(
        Arc::new(|status: &str| println!("[status] {}", status)),
        Arc::new(|line: &str| print!("< {}", line)),
        Arc::new(|enabled: bool| {
            if enabled {
                println!("[connect available]");
            }
        }),
    );
    let client = BleLinkClient::new(config, transport, sinks);

    if client.connect().await.is_err() {
        return Ok(());
    }

    println!("Type a message and press Enter. Ctrl-C to quit.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        if client.send_message(&line).await.is_err() {
                            break;
                        }
                    }
                    _ => break,
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    client.shutdown().await?;
    Ok(())
}
