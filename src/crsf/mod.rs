//! # CRSF Protocol Module
//!
//! Implementation of the Crossfire (CRSF) telemetry link-layer framing.
//!
//! This module handles:
//! - Generic frame encoding (sync, length, type, payload, CRC)
//! - GPS telemetry frame encoding
//! - Frame validation with CRC recomputation
//! - CRC8-DVB-S2 checksum calculation

pub mod crc;
pub mod decoder;
pub mod encoder;
pub mod protocol;
