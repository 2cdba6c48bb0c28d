//! Container demultiplexer: classifies input as JSON text or a binary
//! container and extracts the JSON and optional binary chunk slices.

use crate::error::{Error, Result};
use crate::types::FileKind;

const HEADER_SIZE: usize = 12;
const CHUNK_HEADER_SIZE: usize = 8;

const MAGIC: u32 = 0x4654_6C67; // "glTF" in little-endian
const VERSION: u32 = 2;
const CHUNK_JSON: u32 = 0x4E4F_534A; // "JSON"
const CHUNK_BIN: u32 = 0x004E_4942; // "BIN\0"

fn read_u32_le(data: &[u8]) -> u32 {
    u32::from_le_bytes([data[0], data[1], data[2], data[3]])
}

/// Splits raw input into (detected kind, JSON chunk, optional BIN chunk).
///
/// With an `Auto` hint the first four bytes decide: the binary magic selects
/// container framing, anything else is treated as JSON text. JSON inputs
/// have no minimum length; the binary path requires at least the 12-byte
/// header.
pub(crate) fn demux(data: &[u8], hint: FileKind) -> Result<(FileKind, &[u8], Option<&[u8]>)> {
    let binary = match hint {
        FileKind::Binary => true,
        FileKind::Json => false,
        FileKind::Auto => data.len() >= 4 && read_u32_le(data) == MAGIC,
    };

    if !binary {
        return Ok((FileKind::Json, data, None));
    }

    if data.len() < HEADER_SIZE {
        return Err(Error::DataTooShort);
    }
    if read_u32_le(data) != MAGIC {
        return Err(Error::UnknownFormat);
    }
    if read_u32_le(&data[4..]) != VERSION {
        return Err(Error::UnknownFormat);
    }
    // Declared total length must not exceed the actual input.
    if read_u32_le(&data[8..]) as usize > data.len() {
        return Err(Error::DataTooShort);
    }

    if HEADER_SIZE + CHUNK_HEADER_SIZE > data.len() {
        return Err(Error::DataTooShort);
    }
    let json_length = read_u32_le(&data[HEADER_SIZE..]) as usize;
    if HEADER_SIZE + CHUNK_HEADER_SIZE + json_length > data.len() {
        return Err(Error::DataTooShort);
    }
    if read_u32_le(&data[HEADER_SIZE + 4..]) != CHUNK_JSON {
        return Err(Error::UnknownFormat);
    }

    let json_start = HEADER_SIZE + CHUNK_HEADER_SIZE;
    let json = &data[json_start..json_start + json_length];

    let mut bin = None;
    let bin_header = json_start + json_length;
    if bin_header + CHUNK_HEADER_SIZE <= data.len() {
        let bin_length = read_u32_le(&data[bin_header..]) as usize;
        if bin_header + CHUNK_HEADER_SIZE + bin_length > data.len() {
            return Err(Error::DataTooShort);
        }
        if read_u32_le(&data[bin_header + 4..]) != CHUNK_BIN {
            return Err(Error::UnknownFormat);
        }
        let bin_start = bin_header + CHUNK_HEADER_SIZE;
        bin = Some(&data[bin_start..bin_start + bin_length]);
    }

    Ok((FileKind::Binary, json, bin))
}
