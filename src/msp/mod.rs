//! # MSPv2 Envelope Module
//!
//! MultiWii Serial Protocol v2 framing, used purely as a tunnel to carry
//! CRSF telemetry frames and OSD commands to a Backpack device.
//!
//! Envelope structure: `"$X<" + [flags] + LE16(function) + LE16(len) +
//! payload + [crc]` where the CRC-8/DVB-S2 covers every byte after the
//! 3-byte magic (flag byte included).

pub mod osd;

use bytes::BufMut;

use crate::crsf::crc::crc8_dvb_s2;
use crate::error::{BackpackError, Result};

/// MSPv2 request magic (`$X<`)
pub const MSP_MAGIC: [u8; 3] = *b"$X<";

/// MSPv2 flag byte; the Backpack protocol never sets any flags
pub const MSP_FLAG_NONE: u8 = 0x00;

/// Function id for tunnelling a CRSF telemetry frame to the Backpack
pub const MSP_ELRS_BACKPACK_CRSF_TLM: u16 = 0x0011;

/// Function id for OSD canvas commands on a VRX Backpack
pub const MSP_ELRS_SET_OSD: u16 = 0x00B6;

/// Maximum MSPv2 payload size (bounded by the 2-byte length field)
pub const MSP_MAX_PAYLOAD_SIZE: usize = u16::MAX as usize;

/// Wrap a payload in an MSPv2 envelope
///
/// # Arguments
///
/// * `function` - MSPv2 function id (e.g. [`MSP_ELRS_BACKPACK_CRSF_TLM`])
/// * `payload` - Function payload bytes
///
/// # Returns
///
/// * `Result<Vec<u8>>` - Complete envelope ready for a serial write
///
/// # Errors
///
/// Returns [`BackpackError::PayloadTooLarge`] if the payload does not fit
/// the 2-byte length field.
pub fn wrap_msp(function: u16, payload: &[u8]) -> Result<Vec<u8>> {
    if payload.len() > MSP_MAX_PAYLOAD_SIZE {
        return Err(BackpackError::PayloadTooLarge {
            actual: payload.len(),
            max: MSP_MAX_PAYLOAD_SIZE,
        });
    }

    let mut envelope = Vec::with_capacity(payload.len() + 9);
    envelope.put_slice(&MSP_MAGIC);
    envelope.put_u8(MSP_FLAG_NONE);
    envelope.put_u16_le(function);
    envelope.put_u16_le(payload.len() as u16);
    envelope.put_slice(payload);

    // CRC over flag + function + length + payload
    let crc = crc8_dvb_s2(&envelope[3..]);
    envelope.put_u8(crc);

    Ok(envelope)
}
