//! Binary image-format sniffer.
//!
//! Extracts pixel dimensions for PNG and JPEG from the raw bytes, without a
//! decoding library. Unsupported or truncated headers yield `None`, which is
//! "dimensions unknown", not an error condition.

use std::io;
use std::path::Path;

use serde::Serialize;
use tokio::io::AsyncReadExt;

/// Fixed 8-byte PNG signature.
const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];

/// JPEG start-of-frame markers (SOF0–SOF15 minus DHT/DAC/RST gaps).
const SOF_MARKERS: [u8; 13] = [
    0xc0, 0xc1, 0xc2, 0xc3, 0xc5, 0xc6, 0xc7, 0xc9, 0xca, 0xcb, 0xcd, 0xce, 0xcf,
];

/// How much of the file is needed to sniff a PNG header. The IHDR chunk is
/// guaranteed to immediately follow the signature, so 64 bytes always
/// suffice.
const HEADER_PREFIX_LEN: usize = 64;

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Sniff the pixel dimensions of the image at `path`.
///
/// - PNG: width/height are the big-endian 32-bit integers at byte offsets
///   16 and 20 of the file (inside IHDR).
/// - JPEG (`FF D8` prefix): the whole file is scanned for the first
///   start-of-frame segment, which carries height/width at payload offsets
///   5 and 7.
/// - Anything else, or a truncated header, is `Ok(None)`.
///
/// I/O failures (unreadable file) are the only error path.
pub async fn dimensions(path: &Path) -> io::Result<Option<Dimensions>> {
    let mut file = tokio::fs::File::open(path).await?;

    let mut header = [0u8; HEADER_PREFIX_LEN];
    let mut filled = 0;
    while filled < header.len() {
        let n = file.read(&mut header[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    let header = &header[..filled];

    if header.len() >= 24 && header[..8] == PNG_SIGNATURE {
        let width = u32::from_be_bytes(header[16..20].try_into().unwrap());
        let height = u32::from_be_bytes(header[20..24].try_into().unwrap());
        return Ok(Some(Dimensions { width, height }));
    }

    if header.len() >= 2 && header[0] == 0xff && header[1] == 0xd8 {
        let full = tokio::fs::read(path).await?;
        return Ok(first_jpeg_frame(&full));
    }

    Ok(None)
}

/// Walk JPEG marker segments and return the dimensions of the first
/// start-of-frame segment, or `None` if the file ends first.
fn first_jpeg_frame(data: &[u8]) -> Option<Dimensions> {
    let mut offset = 2usize;
    while offset + 1 < data.len() {
        if data[offset] != 0xff {
            // Stray byte between segments (entropy-coded data); resync.
            offset += 1;
            continue;
        }
        let marker = data[offset + 1];
        if SOF_MARKERS.contains(&marker) {
            // Segment layout after the marker: length(2) precision(1)
            // height(2) width(2).
            if offset + 9 > data.len() {
                return None;
            }
            let height = u16::from_be_bytes([data[offset + 5], data[offset + 6]]);
            let width = u16::from_be_bytes([data[offset + 7], data[offset + 8]]);
            return Some(Dimensions {
                width: width.into(),
                height: height.into(),
            });
        }
        if offset + 4 > data.len() {
            return None;
        }
        let segment_len = u16::from_be_bytes([data[offset + 2], data[offset + 3]]) as usize;
        offset += 2 + segment_len;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal PNG: signature + IHDR with the given dimensions.
    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(&13u32.to_be_bytes());
        bytes.extend_from_slice(b"IHDR");
        bytes.extend_from_slice(&width.to_be_bytes());
        bytes.extend_from_slice(&height.to_be_bytes());
        bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
        bytes.extend_from_slice(&[0, 0, 0, 0]); // CRC, not checked
        bytes
    }

    /// Minimal JPEG: SOI, an APP0 segment to skip, then SOF0.
    fn jpeg_bytes(width: u16, height: u16) -> Vec<u8> {
        let mut bytes = vec![0xff, 0xd8];
        bytes.extend_from_slice(&[0xff, 0xe0, 0x00, 0x10]);
        bytes.extend_from_slice(&[0u8; 14]); // APP0 payload
        bytes.extend_from_slice(&[0xff, 0xc0, 0x00, 0x11, 0x08]);
        bytes.extend_from_slice(&height.to_be_bytes());
        bytes.extend_from_slice(&width.to_be_bytes());
        bytes.extend_from_slice(&[0x03, 0x01, 0x22, 0x00, 0x02, 0x11, 0x01, 0x03, 0x11, 0x01]);
        bytes.extend_from_slice(&[0xff, 0xd9]);
        bytes
    }

    async fn sniff(bytes: &[u8]) -> Option<Dimensions> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image");
        std::fs::write(&path, bytes).unwrap();
        dimensions(&path).await.unwrap()
    }

    #[tokio::test]
    async fn png_dimensions_come_from_ihdr() {
        let dims = sniff(&png_bytes(2000, 3000)).await.unwrap();
        assert_eq!(dims, Dimensions { width: 2000, height: 3000 });
    }

    #[tokio::test]
    async fn one_by_one_png() {
        let dims = sniff(&png_bytes(1, 1)).await.unwrap();
        assert_eq!(dims, Dimensions { width: 1, height: 1 });
    }

    #[tokio::test]
    async fn jpeg_dimensions_come_from_first_frame_marker() {
        let dims = sniff(&jpeg_bytes(1024, 768)).await.unwrap();
        assert_eq!(dims, Dimensions { width: 1024, height: 768 });
    }

    #[tokio::test]
    async fn jpeg_without_frame_marker_is_unknown() {
        // SOI plus a couple of APPn segments, then EOF.
        let mut bytes = vec![0xff, 0xd8];
        bytes.extend_from_slice(&[0xff, 0xe0, 0x00, 0x04, 0x00, 0x00]);
        bytes.extend_from_slice(&[0xff, 0xe1, 0x00, 0x04, 0x00, 0x00]);
        assert_eq!(sniff(&bytes).await, None);
    }

    #[tokio::test]
    async fn unsupported_prefix_is_unknown_not_an_error() {
        assert_eq!(sniff(&[0u8; 64]).await, None);
        assert_eq!(sniff(b"RIFF....WEBP").await, None);
    }

    #[tokio::test]
    async fn truncated_png_header_is_unknown() {
        assert_eq!(sniff(&png_bytes(10, 10)[..20]).await, None);
    }

    #[tokio::test]
    async fn empty_file_is_unknown() {
        assert_eq!(sniff(&[]).await, None);
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(dimensions(&dir.path().join("nope.png")).await.is_err());
    }
}
