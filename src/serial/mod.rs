//! # Serial Communication Module
//!
//! Handles serial communication with a Backpack device.
//!
//! This module handles:
//! - Opening a serial port with 8-N-1 framing and no flow control
//! - Writing complete CRSF/MSP frames
//! - Draining inbound bytes so device output stays visible
//!
//! Frame writes must stay exclusive to one writer; the read half may be
//! split off for a concurrent drain task that never writes.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadHalf, WriteHalf};
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info, warn};

use crate::error::{BackpackError, Result};

/// Backpack serial port handler
///
/// Manages the connection to a TX Backpack module over USB serial.
pub struct BackpackSerial {
    /// Serial port handle
    port: tokio_serial::SerialStream,
    /// Device path (e.g., /dev/ttyUSB0)
    device_path: String,
}

impl std::fmt::Debug for BackpackSerial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackpackSerial")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl BackpackSerial {
    /// Open a serial connection to a Backpack device
    ///
    /// # Arguments
    ///
    /// * `path` - Device path (e.g., "/dev/ttyUSB0"); no auto-detection,
    ///   the caller names the port
    /// * `baud_rate` - Link baud rate (Backpack default is 460800)
    /// * `timeout` - Read timeout for the underlying port
    ///
    /// # Errors
    ///
    /// Returns [`BackpackError::Serial`] if the port cannot be opened
    pub fn open(path: &str, baud_rate: u32, timeout: Duration) -> Result<Self> {
        debug!("Opening serial port {} at {} baud", path, baud_rate);

        let port = tokio_serial::new(path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .timeout(timeout)
            .open_native_async()
            .map_err(|e| BackpackError::Serial(format!("Failed to open {}: {}", path, e)))?;

        info!("Opened Backpack device at {}", path);
        Ok(Self {
            port,
            device_path: path.to_string(),
        })
    }

    /// Send a complete frame to the device
    ///
    /// # Arguments
    ///
    /// * `frame` - Complete CRSF frame or MSPv2 envelope, CRC included
    pub async fn send_frame(&mut self, frame: &[u8]) -> Result<()> {
        write_frame(&mut self.port, frame).await
    }

    /// Split into read and write halves
    ///
    /// The read half feeds [`drain_inbound`]; the write half keeps frame
    /// writes exclusive.
    pub fn into_split(
        self,
    ) -> (
        ReadHalf<tokio_serial::SerialStream>,
        WriteHalf<tokio_serial::SerialStream>,
    ) {
        tokio::io::split(self.port)
    }

    /// Get the device path of the opened serial port
    pub fn device_path(&self) -> &str {
        &self.device_path
    }
}

/// Write a complete frame and flush
///
/// # Arguments
///
/// * `port` - Write half (or whole port) of the serial connection
/// * `frame` - Complete frame bytes, CRC included
pub async fn write_frame<W: AsyncWrite + Unpin>(port: &mut W, frame: &[u8]) -> Result<()> {
    port.write_all(frame)
        .await
        .map_err(|e| BackpackError::Serial(format!("Failed to write frame: {}", e)))?;

    port.flush()
        .await
        .map_err(|e| BackpackError::Serial(format!("Failed to flush serial port: {}", e)))?;

    debug!("Sent frame ({} bytes)", frame.len());
    Ok(())
}

/// Drain inbound bytes, logging device output
///
/// Runs until the port closes or errors. The Backpack echoes status text
/// over the same link; dropping it would hide flash/bind feedback.
pub async fn drain_inbound<R: AsyncRead + Unpin>(mut reader: R) {
    let mut buf = [0u8; 128];

    loop {
        match reader.read(&mut buf).await {
            Ok(0) => {
                debug!("Serial port closed, stopping inbound drain");
                break;
            }
            Ok(n) => {
                info!(target: "device", "{}", String::from_utf8_lossy(&buf[..n]).trim_end());
            }
            Err(e) => {
                warn!("Inbound read failed: {}", e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_invalid_path_returns_error() {
        let result = BackpackSerial::open("/dev/nonexistent0", 460_800, Duration::from_secs(1));

        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, BackpackError::Serial(_)));
        assert!(err.to_string().contains("/dev/nonexistent0"));
    }

    #[tokio::test]
    async fn test_write_frame_to_buffer() {
        let mut buffer = std::io::Cursor::new(Vec::new());
        let frame = [0xC8, 0x02, 0x14, 0x5A];

        write_frame(&mut buffer, &frame).await.unwrap();
        assert_eq!(buffer.into_inner(), frame);
    }

    #[tokio::test]
    async fn test_drain_inbound_stops_at_eof() {
        let data: &[u8] = b"flash ok\n";
        // Must return once the reader is exhausted
        drain_inbound(data).await;
    }
}
