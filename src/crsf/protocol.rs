//! # CRSF Protocol Constants and Types
//!
//! Core protocol definitions for CRSF (Crossfire) telemetry frames.

/// CRSF frame sync byte (always 0xC8)
pub const CRSF_SYNC_BYTE: u8 = 0xC8;

/// GPS telemetry packet type
pub const CRSF_FRAMETYPE_GPS: u8 = 0x02;

/// Maximum CRSF payload size
///
/// The length byte covers type(1) + payload(N) + crc(1) and caps at 255,
/// so the payload itself caps at 253 bytes.
pub const CRSF_MAX_PAYLOAD_SIZE: usize = 253;

/// GPS payload size (lat 4 + lon 4 + speed 2 + heading 2 + altitude 2 + sats 1)
pub const CRSF_GPS_PAYLOAD_SIZE: usize = 15;

/// Complete GPS frame size (sync + length + type + payload + crc)
pub const CRSF_GPS_FRAME_SIZE: usize = CRSF_GPS_PAYLOAD_SIZE + 4;

/// Altitude offset applied on the wire so negative altitudes stay
/// representable in the unsigned field
pub const CRSF_GPS_ALTITUDE_OFFSET: i32 = 1000;

/// GPS telemetry values, already in their CRSF wire units
///
/// Callers convert from natural units before building a frame:
/// degrees × 10^7 for coordinates, km/h × 10 for ground speed,
/// centidegrees for heading, plain meters for altitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpsTelemetry {
    /// Latitude in degrees × 10^7
    pub latitude: i32,

    /// Longitude in degrees × 10^7
    pub longitude: i32,

    /// Ground speed in km/h × 10
    pub groundspeed: u16,

    /// Heading in centidegrees (0-35999)
    pub heading: u16,

    /// Altitude in meters; the +1000 wire offset is applied on encode
    pub altitude_m: i32,

    /// Number of satellites in the fix
    pub satellites: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_constants() {
        assert_eq!(CRSF_SYNC_BYTE, 0xC8);
        assert_eq!(CRSF_FRAMETYPE_GPS, 0x02);
        assert_eq!(CRSF_GPS_PAYLOAD_SIZE, 15);
        assert_eq!(CRSF_GPS_FRAME_SIZE, 19);
    }

    #[test]
    fn test_max_payload_fits_length_byte() {
        // length byte = payload + type + crc
        assert_eq!(CRSF_MAX_PAYLOAD_SIZE + 2, 255);
    }
}
