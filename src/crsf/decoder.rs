//! # CRSF Frame Validation
//!
//! Recomputes the CRC of a received frame and rejects anything that does
//! not check out. Mismatches are surfaced as errors, never dropped.

use super::crc::crc8_dvb_s2;
use super::protocol::CRSF_SYNC_BYTE;
use crate::error::{BackpackError, Result};

/// Validate a complete CRSF frame and split it into type and payload
///
/// # Arguments
///
/// * `frame` - Complete frame bytes (sync, length, type, payload, crc)
///
/// # Returns
///
/// * `Result<(u8, &[u8])>` - Frame type and payload slice on success
///
/// # Errors
///
/// Returns [`BackpackError::Integrity`] if:
/// - The frame is shorter than the 4-byte minimum (sync + length + type + crc)
/// - The sync byte is not 0xC8
/// - The length byte disagrees with the actual frame size
/// - The recomputed CRC does not match the trailing CRC byte
pub fn validate_frame(frame: &[u8]) -> Result<(u8, &[u8])> {
    if frame.len() < 4 {
        return Err(BackpackError::Integrity(format!(
            "frame too short: {} bytes",
            frame.len()
        )));
    }

    if frame[0] != CRSF_SYNC_BYTE {
        return Err(BackpackError::Integrity(format!(
            "invalid sync byte: 0x{:02X}",
            frame[0]
        )));
    }

    // length byte counts type + payload + crc
    let length = frame[1] as usize;
    if frame.len() != 2 + length {
        return Err(BackpackError::Integrity(format!(
            "length mismatch: declared {} bytes, frame is {}",
            2 + length,
            frame.len()
        )));
    }

    // CRC covers Type + Payload (everything between length and crc)
    let received_crc = frame[frame.len() - 1];
    let calculated_crc = crc8_dvb_s2(&frame[2..frame.len() - 1]);

    if calculated_crc != received_crc {
        return Err(BackpackError::Integrity(format!(
            "CRC mismatch: expected 0x{:02X}, got 0x{:02X}",
            calculated_crc, received_crc
        )));
    }

    let frame_type = frame[2];
    let payload = &frame[3..frame.len() - 1];

    Ok((frame_type, payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crsf::encoder::{encode_frame, encode_gps_frame};
    use crate::crsf::protocol::{GpsTelemetry, CRSF_FRAMETYPE_GPS};

    #[test]
    fn test_validate_encoded_frame() {
        let frame = encode_frame(0x14, &[1, 2, 3, 4]).unwrap();
        let (frame_type, payload) = validate_frame(&frame).unwrap();

        assert_eq!(frame_type, 0x14);
        assert_eq!(payload, &[1, 2, 3, 4]);
    }

    #[test]
    fn test_validate_gps_round_trip() {
        let gps = GpsTelemetry {
            latitude: -337_412_340,
            longitude: 1_510_000_000,
            groundspeed: 85,
            heading: 35999,
            altitude_m: 42,
            satellites: 9,
        };
        let frame = encode_gps_frame(&gps).unwrap();

        let (frame_type, payload) = validate_frame(&frame).unwrap();
        assert_eq!(frame_type, CRSF_FRAMETYPE_GPS);
        assert_eq!(payload.len(), 15);
    }

    #[test]
    fn test_validate_rejects_short_frame() {
        let result = validate_frame(&[0xC8, 0x02]);
        assert!(matches!(result, Err(BackpackError::Integrity(_))));
    }

    #[test]
    fn test_validate_rejects_bad_sync() {
        let mut frame = encode_frame(0x02, &[0xAA]).unwrap();
        frame[0] = 0xEA;

        let result = validate_frame(&frame);
        assert!(matches!(result, Err(BackpackError::Integrity(_))));
    }

    #[test]
    fn test_validate_rejects_length_mismatch() {
        let mut frame = encode_frame(0x02, &[0xAA, 0xBB]).unwrap();
        frame[1] += 1;

        let result = validate_frame(&frame);
        assert!(matches!(result, Err(BackpackError::Integrity(_))));
    }

    #[test]
    fn test_validate_rejects_corrupted_payload() {
        let mut frame = encode_frame(0x02, &[0xAA, 0xBB, 0xCC]).unwrap();
        frame[4] ^= 0x01;

        let result = validate_frame(&frame);
        assert!(matches!(result, Err(BackpackError::Integrity(_))));
    }

    #[test]
    fn test_validate_rejects_corrupted_crc() {
        let mut frame = encode_frame(0x02, &[0xAA, 0xBB, 0xCC]).unwrap();
        let last = frame.len() - 1;
        frame[last] ^= 0xFF;

        let result = validate_frame(&frame);
        assert!(matches!(result, Err(BackpackError::Integrity(_))));
    }
}
