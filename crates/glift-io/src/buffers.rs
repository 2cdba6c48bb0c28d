//! Buffer payload resolution.
//!
//! After parsing, each buffer declares a byte size and optionally a URI.
//! [`load_buffers`] fills every unloaded buffer: the binary-container
//! chunk backs buffer 0 when it has no URI, `data:` URIs carrying a
//! `;base64,` marker are decoded in place, and relative paths (no scheme)
//! are read from disk next to the asset file. Any other URI scheme is
//! rejected as `UnknownFormat`.

use std::fs;
use std::io;
use std::path::Path;

use glift_core::{BufferData, Document, Error, Result};

/// Decodes exactly `size` bytes from a base64 payload.
///
/// Accepts the RFC 4648 alphabet (`A-Z a-z 0-9 + /`); any other character,
/// including `=` padding, stops the stream with an error. Trailing
/// characters beyond the requested size are ignored.
pub fn load_buffer_base64(size: usize, base64: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(size);
    let mut chars = base64.bytes();
    let mut window: u32 = 0;
    let mut bits: u32 = 0;

    for _ in 0..size {
        while bits < 8 {
            let ch = chars.next().ok_or_else(invalid_base64)?;
            let index = match ch {
                b'A'..=b'Z' => ch - b'A',
                b'a'..=b'z' => ch - b'a' + 26,
                b'0'..=b'9' => ch - b'0' + 52,
                b'+' => 62,
                b'/' => 63,
                _ => return Err(invalid_base64()),
            };
            window = (window << 6) | index as u32;
            bits += 6;
        }
        out.push((window >> (bits - 8)) as u8);
        bits -= 8;
    }

    Ok(out)
}

fn invalid_base64() -> Error {
    Error::Io(io::Error::new(
        io::ErrorKind::InvalidData,
        "invalid base64 character",
    ))
}

/// Joins a buffer URI against the asset path it is relative to: everything
/// up to and including the last path separator of `base` (either `/` or
/// `\`), then the URI.
fn combine_paths(base: &str, uri: &str) -> String {
    let slash = base.rfind('/');
    let backslash = base.rfind('\\');
    let separator = match (slash, backslash) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    };

    match separator {
        Some(pos) => format!("{}{}", &base[..pos + 1], uri),
        None => uri.to_string(),
    }
}

fn load_buffer_file(size: usize, uri: &str, gltf_path: &str) -> Result<Vec<u8>> {
    let path = combine_paths(gltf_path, uri);
    log::debug!("loading buffer from {} ({} bytes)", path, size);

    let mut data = fs::read(Path::new(&path)).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::FileNotFound,
        _ => Error::Io(e),
    })?;

    if data.len() < size {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "buffer file shorter than declared size",
        )));
    }
    data.truncate(size);
    Ok(data)
}

/// Loads the payload of every buffer in the document.
///
/// Buffers that already carry data are skipped, as are buffers with no
/// URI (other than binary-container buffer 0, which the retained binary
/// chunk backs). `gltf_path` is the path the asset was loaded from; it
/// anchors relative buffer URIs.
pub fn load_buffers(doc: &mut Document, gltf_path: &str) -> Result<()> {
    if let Some(first) = doc.buffers.first() {
        if matches!(first.data, BufferData::Unloaded) && first.uri.is_none() {
            if let Some(bin) = &doc.bin {
                if bin.len() < first.size {
                    return Err(Error::DataTooShort);
                }
                doc.buffers[0].data = BufferData::BinChunk;
            }
        }
    }

    for buffer in &mut doc.buffers {
        if !matches!(buffer.data, BufferData::Unloaded) {
            continue;
        }
        let uri = match &buffer.uri {
            Some(uri) => uri,
            None => continue,
        };

        if let Some(after_scheme) = uri.strip_prefix("data:") {
            let comma = after_scheme
                .find(',')
                .ok_or(Error::UnknownFormat)?;
            let header = &after_scheme[..comma];
            let payload = &after_scheme[comma + 1..];

            if !header.ends_with(";base64") {
                return Err(Error::UnknownFormat);
            }
            buffer.data = BufferData::Owned(load_buffer_base64(buffer.size, payload)?);
        } else if !uri.contains("://") {
            buffer.data = BufferData::Owned(load_buffer_file(buffer.size, uri, gltf_path)?);
        } else {
            return Err(Error::UnknownFormat);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_decode() {
        assert_eq!(load_buffer_base64(3, "QUJD").unwrap(), b"ABC");
        assert_eq!(load_buffer_base64(5, "SGVsbG8=").unwrap(), b"Hello");
        assert_eq!(load_buffer_base64(1, "YQ==").unwrap(), b"a");
        assert_eq!(load_buffer_base64(2, "+/8=").unwrap(), &[0xFB, 0xFF]);
    }

    #[test]
    fn test_base64_rejects_garbage() {
        assert!(load_buffer_base64(3, "QU*D").is_err());
        // Exhausted input before producing the requested size.
        assert!(load_buffer_base64(4, "QUJD").is_err());
    }

    #[test]
    fn test_combine_paths() {
        assert_eq!(combine_paths("scene/model.gltf", "data.bin"), "scene/data.bin");
        assert_eq!(combine_paths("model.gltf", "data.bin"), "data.bin");
        assert_eq!(
            combine_paths("a\\b\\model.gltf", "data.bin"),
            "a\\b\\data.bin"
        );
        assert_eq!(
            combine_paths("a/b\\model.gltf", "data.bin"),
            "a/b\\data.bin"
        );
    }
}
