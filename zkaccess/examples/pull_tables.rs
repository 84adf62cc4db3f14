//! Pull the user table and new attendance transactions from a panel
//!
//! ```text
//! DEVICE_IP=172.16.222.170 RUST_LOG=zkaccess=trace cargo run --example pull_tables
//! ```

use std::time::Duration;

use tokio::net::TcpStream;
use tracing_subscriber::EnvFilter;
use zkaccess::{Device, TableQuery, TcpTransport};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let ip = std::env::var("DEVICE_IP").unwrap_or_else(|_| "192.168.1.201".to_string());
    let port: u16 = match std::env::var("DEVICE_PORT") {
        Ok(port) => port.parse()?,
        Err(_) => zkaccess_core::constants::DEFAULT_PORT,
    };
    let device_id: u8 = match std::env::var("DEVICE_ID") {
        Ok(id) => id.parse()?,
        Err(_) => 0x01,
    };

    println!("Connecting to {}:{}...", ip, port);

    let stream = TcpStream::connect((ip.as_str(), port)).await?;
    let mut device = Device::new(TcpTransport::from_tcp(stream)?, device_id)
        .with_settle_delay(Duration::from_millis(200))
        .with_trace_hook(|direction, data| {
            tracing::debug!(%direction, bytes = data.len(), "{}", hex::encode_upper(data));
        });

    device.connect().await?;
    device.test_connection().await?;
    println!("✓ Connected");

    let users = device.fetch_table(&TableQuery::all_users()).await?;
    println!("✓ {} users", users.len());
    for user in &users {
        println!("  {}", user);
    }

    let transactions = device.fetch_table(&TableQuery::new_transactions()).await?;
    println!("✓ {} new transactions", transactions.len());
    for tx in &transactions {
        match tx.timestamp("Time_second") {
            Some(time) => println!("  {} {}", time, tx),
            None => println!("  {}", tx),
        }
    }

    Ok(())
}

