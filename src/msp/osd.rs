//! # OSD Commands
//!
//! Command bodies for the VRX Backpack's on-screen display canvas.
//!
//! The canvas is drawn in three steps: clear it, write text at row/column
//! positions, then display it. Depending on the OSD font only UPPERCASE
//! letters may render as letters; other character positions hold symbols.

use super::{wrap_msp, MSP_ELRS_SET_OSD};
use crate::error::Result;

/// Clear-canvas subcommand
const OSD_SUBCMD_CLEAR: u8 = 0x02;

/// Write-text subcommand
const OSD_SUBCMD_WRITE: u8 = 0x03;

/// Display-canvas subcommand
const OSD_SUBCMD_DISPLAY: u8 = 0x04;

/// Text attribute byte; no attributes are defined for the Backpack OSD
const OSD_TEXT_ATTR: u8 = 0x00;

/// An OSD canvas command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OsdCommand {
    /// Clear the OSD canvas
    Clear,

    /// Display the (previously written) OSD canvas
    Display,

    /// Write text to the canvas at a row/column position
    WriteText {
        /// Canvas row
        row: u8,
        /// Canvas column
        col: u8,
        /// ASCII text to place at the position
        text: String,
    },
}

impl OsdCommand {
    /// Build the MSPv2 function payload for this command
    ///
    /// `Clear` and `Display` are bare subcommand bytes; `WriteText` carries
    /// `[subcmd, row, col, attr] + text bytes`.
    pub fn msp_payload(&self) -> Vec<u8> {
        match self {
            OsdCommand::Clear => vec![OSD_SUBCMD_CLEAR],
            OsdCommand::Display => vec![OSD_SUBCMD_DISPLAY],
            OsdCommand::WriteText { row, col, text } => {
                let mut payload = Vec::with_capacity(4 + text.len());
                payload.push(OSD_SUBCMD_WRITE);
                payload.push(*row);
                payload.push(*col);
                payload.push(OSD_TEXT_ATTR);
                payload.extend_from_slice(text.as_bytes());
                payload
            }
        }
    }

    /// Encode this command as a complete MSPv2 envelope
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::BackpackError::PayloadTooLarge`] if the text
    /// overflows the envelope's length field.
    pub fn encode(&self) -> Result<Vec<u8>> {
        wrap_msp(MSP_ELRS_SET_OSD, &self.msp_payload())
    }
}
