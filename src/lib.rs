//! # Backpack Tool Library
//!
//! Host-side tooling for ExpressLRS Backpack devices.
//!
//! This library provides the two codecs the tools are built on: the
//! firmware tail-append codec, which patches a pre-built ESP firmware image
//! with a runtime-configuration block, and the CRSF/MSP frame codec, which
//! builds and validates CRC-protected telemetry frames and MSPv2 envelopes
//! for a serial link.

pub mod config;
pub mod crsf;
pub mod error;
pub mod firmware;
pub mod msp;
pub mod serial;
