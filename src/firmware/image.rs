//! # Firmware Tail-Append Codec
//!
//! Locates the end of an ESP firmware image's real content by walking its
//! segment table, then writes a fixed-size runtime-configuration block
//! after it. The firmware reads the block back at boot.
//!
//! Image structure (little-endian): 1-byte magic (0xE9), 1-byte segment
//! count, 2 reserved bytes, 4-byte entry point, then per segment an 8-byte
//! header (load address, size) followed by `size` payload bytes. Combined
//! bootloader+app images carry the authoritative header at offset 0x1000.

use std::io::{Read, Seek, SeekFrom, Write};

use tracing::debug;

use crate::error::{BackpackError, Result};

/// ESP image header magic byte
pub const FIRMWARE_MAGIC: u8 = 0xE9;

/// Size of the configuration text region (a trailing NUL follows it)
pub const CONFIG_BLOCK_SIZE: usize = 512;

/// Single-header images: segment table starts after a 24-byte header region
const SINGLE_HEADER_TABLE_OFFSET: u64 = 24;

/// Combined images: authoritative header lives at this fixed offset
const COMPACT_HEADER_OFFSET: u64 = 0x1000;

/// Extra padding added after alignment for single-header images
const SINGLE_HEADER_TAIL_PADDING: u64 = 32;

/// Detected firmware image layout
///
/// The layout is selected once from the header and then treated uniformly;
/// the `segments == 2` heuristic lives only in [`ImageLayout::detect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLayout {
    /// Plain app image; segment table follows the 24-byte header region
    SingleHeader {
        /// Declared segment count
        segments: u8,
    },

    /// Combined bootloader+app image (ESP8266/85 style): the first header
    /// declares exactly 2 segments and the authoritative header sits at
    /// offset 0x1000
    CompactDualHeader {
        /// Segment count from the authoritative header
        segments: u8,
    },
}

impl ImageLayout {
    /// Detect the image layout from its header(s)
    ///
    /// Leaves the reader positioned at the start of the authoritative
    /// segment table.
    ///
    /// # Errors
    ///
    /// Returns [`BackpackError::Format`] if the magic byte is not 0xE9 or
    /// a header is truncated.
    pub fn detect<R: Read + Seek>(image: &mut R) -> Result<Self> {
        image.seek(SeekFrom::Start(0))?;
        let (magic, segments) = read_image_header(image)?;

        if magic != FIRMWARE_MAGIC {
            return Err(BackpackError::Format(format!(
                "bad image magic: expected 0x{:02X}, found 0x{:02X}",
                FIRMWARE_MAGIC, magic
            )));
        }

        if segments == 2 {
            // Two declared segments means an ESP8266/85 combined image;
            // the real segment table follows the header at 0x1000.
            image.seek(SeekFrom::Start(COMPACT_HEADER_OFFSET))?;
            let (_, segments) = read_image_header(image)?;
            Ok(ImageLayout::CompactDualHeader { segments })
        } else {
            image.seek(SeekFrom::Start(SINGLE_HEADER_TABLE_OFFSET))?;
            Ok(ImageLayout::SingleHeader { segments })
        }
    }

    /// Declared segment count of the authoritative header
    pub fn segments(&self) -> u8 {
        match self {
            ImageLayout::SingleHeader { segments } => *segments,
            ImageLayout::CompactDualHeader { segments } => *segments,
        }
    }

    /// Padding added after 16-byte alignment of the append position
    fn tail_padding(&self) -> u64 {
        match self {
            ImageLayout::SingleHeader { .. } => SINGLE_HEADER_TAIL_PADDING,
            ImageLayout::CompactDualHeader { .. } => 0,
        }
    }
}

/// Read an 8-byte image header, returning (magic, segment count)
///
/// The 2 reserved bytes and the 4-byte entry point are skipped.
fn read_image_header<R: Read>(image: &mut R) -> Result<(u8, u8)> {
    let mut header = [0u8; 8];
    image
        .read_exact(&mut header)
        .map_err(|e| map_truncation(e, "truncated image header"))?;
    Ok((header[0], header[1]))
}

/// Map an unexpected EOF to a format error; other I/O errors pass through
fn map_truncation(err: std::io::Error, what: &str) -> BackpackError {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        BackpackError::Format(what.to_string())
    } else {
        BackpackError::Io(err)
    }
}

/// Locate the offset where the configuration block belongs
///
/// Walks the authoritative segment table, skipping each segment's payload
/// without reading it, then aligns the resulting position: the position is
/// always advanced to the next 16-byte boundary (even when already
/// aligned), and single-header images get 32 further bytes of padding.
/// The offset is deterministic given only the header and segment table.
///
/// # Errors
///
/// Returns [`BackpackError::Format`] for a bad magic byte, a truncated
/// segment table, or segment data that extends past end-of-file. The image
/// is unusable in all three cases.
pub fn locate_append_offset<R: Read + Seek>(image: &mut R) -> Result<u64> {
    let file_len = image.seek(SeekFrom::End(0))?;
    let layout = ImageLayout::detect(image)?;

    for _ in 0..layout.segments() {
        let mut segment_header = [0u8; 8];
        image
            .read_exact(&mut segment_header)
            .map_err(|e| map_truncation(e, "truncated segment table"))?;

        // 4-byte load address (unused) + 4-byte segment size
        let size = u32::from_le_bytes([
            segment_header[4],
            segment_header[5],
            segment_header[6],
            segment_header[7],
        ]) as u64;

        let pos = image.seek(SeekFrom::Current(size as i64))?;
        if pos > file_len {
            return Err(BackpackError::Format(format!(
                "segment data extends past end of file ({} > {})",
                pos, file_len
            )));
        }
    }

    let pos = image.stream_position()?;
    let offset = ((pos + 16) & !15) + layout.tail_padding();

    debug!(
        "append offset {} for {:?} (segment data ends at {})",
        offset, layout, pos
    );
    Ok(offset)
}

/// Append a configuration block to a firmware image
///
/// Writes exactly [`CONFIG_BLOCK_SIZE`] bytes of UTF-8 options text at the
/// located offset — truncated if longer, NUL-padded if shorter — plus one
/// trailing NUL byte, then flushes. The file is never truncated afterwards:
/// truncation fails with permission errors on some target filesystems, and
/// nothing reads past the block, so stale trailing bytes are harmless.
/// Re-running append on an already-configured image writes a fresh block at
/// a freshly computed offset.
///
/// # Arguments
///
/// * `image` - Open firmware image; the caller owns the handle and must
///   hold exclusive access for the duration of the call
/// * `options_json` - Compact JSON text of the runtime options
///
/// # Returns
///
/// * `Result<u64>` - Offset the block was written at
pub fn append_config<F: Read + Write + Seek>(image: &mut F, options_json: &str) -> Result<u64> {
    let offset = locate_append_offset(image)?;
    image.seek(SeekFrom::Start(offset))?;

    let mut block = [0u8; CONFIG_BLOCK_SIZE + 1];
    let text = options_json.as_bytes();
    let len = text.len().min(CONFIG_BLOCK_SIZE);
    block[..len].copy_from_slice(&text[..len]);

    image.write_all(&block)?;
    image.flush()?;

    debug!("wrote {}-byte configuration block at offset {}", block.len(), offset);
    Ok(offset)
}
