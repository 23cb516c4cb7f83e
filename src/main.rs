//! # Backpack Configurator
//!
//! Appends a runtime-configuration block to a pre-built Backpack firmware
//! image. The firmware reads the block back at boot, picking up the binding
//! UID, home WiFi credentials and flash discriminator without a rebuild.
//!
//! Usage: `backpack-conf <firmware.bin> [config.toml]`
//!
//! The firmware file is patched in place; hand it to the uploader of your
//! choice afterwards.

use anyhow::{bail, Context, Result};
use std::fs::OpenOptions;
use tracing::info;

use backpack_tool::config::Config;
use backpack_tool::firmware::image::append_config;

/// Configuration file consulted when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Backpack Configurator v{}", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args().skip(1);
    let firmware_path = match args.next() {
        Some(path) => path,
        None => bail!("usage: backpack-conf <firmware.bin> [config.toml]"),
    };
    let config_path = args.next().unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load configuration from {}", config_path))?;

    let options_json = config.runtime_options().build()?;
    info!("Runtime options: {}", options_json);

    let mut firmware = OpenOptions::new()
        .read(true)
        .write(true)
        .open(&firmware_path)
        .with_context(|| format!("failed to open firmware image {}", firmware_path))?;

    let offset = append_config(&mut firmware, &options_json)
        .with_context(|| format!("failed to patch {}", firmware_path))?;

    info!(
        "Wrote {}-byte configuration block to {} at offset {}",
        options_json.len().min(512),
        firmware_path,
        offset
    );

    Ok(())
}
