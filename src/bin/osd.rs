//! # Backpack OSD Shell
//!
//! Sends OSD canvas commands to a VRX Backpack through a TX Backpack
//! connected to a serial port. Commands are read line by line from stdin:
//!
//! ```text
//! C                      clear the OSD canvas
//! D                      display the OSD canvas
//! H                      print the help message
//! <row> <col> <message>  write message to the OSD canvas
//! ```
//!
//! Depending on the OSD font only UPPERCASE letters may display as actual
//! letters; the other character positions hold symbols.
//!
//! Usage: `backpack-osd [config.toml]`

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use backpack_tool::config::Config;
use backpack_tool::msp::osd::OsdCommand;
use backpack_tool::serial::{drain_inbound, write_frame, BackpackSerial};

/// Configuration file consulted when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

fn print_help() {
    println!();
    println!("Depending on the OSD font only UPPERCASE letters may display as letters,");
    println!("the other character positions are used to display symbols on the OSD.");
    println!("Command should be one of:");
    println!("C = clear the OSD canvas");
    println!("D = display the OSD canvas");
    println!("H = print this help message");
    println!("<row> <col> <message> = send message to OSD canvas");
    println!();
    println!("Example:");
    println!("C");
    println!("10 10 ELRS ROCKS");
    println!("D");
}

/// Parse a `<row> <col> <message>` line into a write-text command
fn parse_write_text(line: &str) -> Option<OsdCommand> {
    let mut parts = line.splitn(3, ' ');
    let row = parts.next()?.parse::<u8>().ok()?;
    let col = parts.next()?.parse::<u8>().ok()?;
    let text = parts.next()?.to_string();

    Some(OsdCommand::WriteText { row, col, text })
}

/// Map an input line to an OSD command, or help/unknown
fn parse_command(line: &str) -> Option<OsdCommand> {
    match line.trim().to_uppercase().chars().next() {
        Some('C') => Some(OsdCommand::Clear),
        Some('D') => Some(OsdCommand::Display),
        _ => parse_write_text(line.trim()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load configuration from {}", config_path))?;

    let serial = BackpackSerial::open(
        &config.serial.port,
        config.serial.baud_rate,
        Duration::from_millis(config.serial.timeout_ms),
    )?;
    info!("Connected to {}", serial.device_path());

    // Reads and writes never interleave: the drain task owns the read half
    let (read_half, mut write_half) = serial.into_split();
    tokio::spawn(drain_inbound(read_half));

    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("stdin closed, exiting");
                    break;
                };

                if line.trim().to_uppercase().starts_with('H') {
                    print_help();
                    continue;
                }

                match parse_command(&line) {
                    Some(command) => {
                        let envelope = command.encode()?;
                        info!("Sending {:02X?}", envelope);
                        write_frame(&mut write_half, &envelope).await?;
                    }
                    None => {
                        warn!("Unrecognized command: {:?}", line.trim());
                        print_help();
                    }
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    Ok(())
}
