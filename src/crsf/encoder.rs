//! # CRSF Frame Encoder
//!
//! Builds CRC-protected CRSF frames from a type byte and payload, plus the
//! GPS telemetry frame layout used by Backpack video receivers.

use bytes::BufMut;

use super::crc::crc8_dvb_s2;
use super::protocol::*;
use crate::error::{BackpackError, Result};

/// Encode a complete CRSF frame
///
/// Frame structure: `[sync, length, type] + payload + [crc]` where the
/// length byte counts type + payload + crc (total frame length minus 2)
/// and the CRC covers type + payload.
///
/// # Arguments
///
/// * `frame_type` - CRSF frame type byte (e.g. 0x02 for GPS)
/// * `payload` - Frame payload, at most [`CRSF_MAX_PAYLOAD_SIZE`] bytes
///
/// # Errors
///
/// Returns [`BackpackError::PayloadTooLarge`] if the payload would overflow
/// the 1-byte length field. The length byte must never wrap silently.
pub fn encode_frame(frame_type: u8, payload: &[u8]) -> Result<Vec<u8>> {
    if payload.len() > CRSF_MAX_PAYLOAD_SIZE {
        return Err(BackpackError::PayloadTooLarge {
            actual: payload.len(),
            max: CRSF_MAX_PAYLOAD_SIZE,
        });
    }

    // CRC is computed over Type + Payload
    let mut crc_data = Vec::with_capacity(1 + payload.len());
    crc_data.push(frame_type);
    crc_data.extend_from_slice(payload);
    let crc = crc8_dvb_s2(&crc_data);

    // Build complete frame: Sync + Length + Type + Payload + CRC
    let mut frame = Vec::with_capacity(payload.len() + 4);
    frame.push(CRSF_SYNC_BYTE);
    frame.push((payload.len() + 2) as u8);
    frame.extend_from_slice(&crc_data);
    frame.push(crc);

    Ok(frame)
}

/// Encode a GPS telemetry frame
///
/// Payload layout, all big-endian: i32 latitude (deg × 10^7), i32 longitude
/// (deg × 10^7), u16 ground speed (km/h × 10), u16 heading (centideg),
/// u16 altitude + 1000 (meters), u8 satellite count. The altitude offset
/// saturates at the u16 range rather than wrapping.
///
/// # Examples
///
/// ```
/// use backpack_tool::crsf::encoder::encode_gps_frame;
/// use backpack_tool::crsf::protocol::GpsTelemetry;
///
/// let gps = GpsTelemetry {
///     latitude: 100_000_000,
///     longitude: -50_000_000,
///     groundspeed: 123,
///     heading: 27000,
///     altitude_m: 120,
///     satellites: 11,
/// };
/// let frame = encode_gps_frame(&gps).unwrap();
/// assert_eq!(frame.len(), 19);
/// ```
pub fn encode_gps_frame(gps: &GpsTelemetry) -> Result<Vec<u8>> {
    let altitude = (gps.altitude_m + CRSF_GPS_ALTITUDE_OFFSET).clamp(0, u16::MAX as i32) as u16;

    let mut payload = Vec::with_capacity(CRSF_GPS_PAYLOAD_SIZE);
    payload.put_i32(gps.latitude);
    payload.put_i32(gps.longitude);
    payload.put_u16(gps.groundspeed);
    payload.put_u16(gps.heading);
    payload.put_u16(altitude);
    payload.put_u8(gps.satellites);

    encode_frame(CRSF_FRAMETYPE_GPS, &payload)
}
