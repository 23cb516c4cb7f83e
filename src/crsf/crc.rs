//! # CRC8-DVB-S2 Implementation
//!
//! CRC-8-DVB-S2 checksum calculation, shared by CRSF frames and MSPv2
//! envelopes.
//!
//! **Polynomial**: 0xD5 (x^8 + x^7 + x^6 + x^4 + x^2 + 1)
//! **Initial Value**: 0x00

/// CRC-8-DVB-S2 polynomial
const CRC8_POLY: u8 = 0xD5;

/// Precomputed CRC8 lookup table for fast calculation
const CRC8_TABLE: [u8; 256] = generate_crc8_table();

/// Generate CRC8 lookup table at compile time
const fn generate_crc8_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;

    while i < 256 {
        let mut crc = i as u8;
        let mut j = 0;

        while j < 8 {
            if (crc & 0x80) != 0 {
                crc = (crc << 1) ^ CRC8_POLY;
            } else {
                crc <<= 1;
            }
            j += 1;
        }

        table[i] = crc;
        i += 1;
    }

    table
}

/// Calculate CRC8-DVB-S2 checksum using the lookup table
///
/// # Arguments
///
/// * `data` - Byte slice to checksum. For CRSF frames this is Type +
///   Payload; for MSPv2 envelopes it is everything after the 3-byte magic.
///
/// # Returns
///
/// * `u8` - Calculated CRC8 checksum
pub fn crc8_dvb_s2(data: &[u8]) -> u8 {
    let mut crc: u8 = 0;

    for &byte in data {
        crc = CRC8_TABLE[(crc ^ byte) as usize];
    }

    crc
}

/// Calculate CRC8-DVB-S2 using the direct bit-shift algorithm
///
/// Slower than the table but trivially checkable against the DVB-S2
/// definition. Used to verify the lookup table in tests.
#[allow(dead_code)]
fn crc8_dvb_s2_slow(data: &[u8]) -> u8 {
    let mut crc: u8 = 0;

    for &byte in data {
        crc ^= byte;

        for _ in 0..8 {
            if (crc & 0x80) != 0 {
                crc = (crc << 1) ^ CRC8_POLY;
            } else {
                crc <<= 1;
            }
        }
    }

    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc8_empty() {
        let data = [];
        assert_eq!(crc8_dvb_s2(&data), 0x00);
    }

    #[test]
    fn test_crc8_single_byte() {
        assert_eq!(crc8_dvb_s2(&[0x00]), 0x00);
        assert_eq!(crc8_dvb_s2(&[0xFF]), 0xF9);
        assert_eq!(crc8_dvb_s2(&[0x01]), 0xD5);
    }

    #[test]
    fn test_crc8_table_known_entries() {
        // Spot checks against the reference DVB-S2 table used by the
        // Backpack firmware (first row, a middle entry, last row).
        assert_eq!(CRC8_TABLE[0x00], 0x00);
        assert_eq!(CRC8_TABLE[0x01], 0xD5);
        assert_eq!(CRC8_TABLE[0x0F], 0x7D);
        assert_eq!(CRC8_TABLE[0x40], 0x9D);
        assert_eq!(CRC8_TABLE[0x80], 0xEF);
        assert_eq!(CRC8_TABLE[0xFE], 0x2C);
        assert_eq!(CRC8_TABLE[0xFF], 0xF9);
    }

    #[test]
    fn test_crc8_lookup_table_matches_slow() {
        // Every single-byte input pins one table entry, so this checks the
        // full 256-entry table against the bit-shift algorithm.
        for i in 0..=255u8 {
            assert_eq!(
                crc8_dvb_s2(&[i]),
                crc8_dvb_s2_slow(&[i]),
                "table mismatch at index {}",
                i
            );
        }
    }

    #[test]
    fn test_crc8_multi_byte_matches_slow() {
        let test_data = [
            vec![0x02, 0x00, 0x00, 0x00, 0x01],
            vec![0xFF, 0xFE, 0xFD],
            vec![0x00, 0xB6, 0x00, 0x01, 0x00, 0x02],
            vec![0x00; 24],
            vec![0xFF; 10],
        ];

        for data in test_data.iter() {
            assert_eq!(
                crc8_dvb_s2(data),
                crc8_dvb_s2_slow(data),
                "CRC mismatch for data: {:?}",
                data
            );
        }
    }

    #[test]
    fn test_crc8_changes_with_data() {
        let crc1 = crc8_dvb_s2(&[0x02, 0x05, 0xF5, 0xE1, 0x00]);
        let crc2 = crc8_dvb_s2(&[0x02, 0x05, 0xF5, 0xE1, 0x01]);

        assert_ne!(crc1, crc2, "CRC should change when data changes");
    }
}
