//! Convenience file loading.

use std::fs;
use std::io;
use std::path::Path;

use glift_core::{parse, Document, Error, Options, Result};

/// Reads an asset file and parses it, auto-detecting the container shape.
pub fn parse_file<P: AsRef<Path>>(options: &Options, path: P) -> Result<Document> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::FileNotFound,
        _ => Error::Io(e),
    })?;

    log::debug!("read {} bytes from {}", data.len(), path.display());
    parse(options, &data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        let err = parse_file(&Options::default(), "no/such/file.gltf").unwrap_err();
        assert!(matches!(err, Error::FileNotFound));
    }
}
