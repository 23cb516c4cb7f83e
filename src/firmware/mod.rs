//! # Firmware Module
//!
//! Patches pre-built ESP8266/ESP32 firmware images with a runtime
//! configuration block.
//!
//! This module handles:
//! - Image layout detection (single header vs. combined bootloader+app)
//! - Locating the append offset after the last segment
//! - Writing the 513-byte configuration block
//! - Building the JSON runtime-options mapping

pub mod image;
pub mod options;
