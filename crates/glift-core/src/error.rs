//! Error handling for glTF parsing and validation.

use std::io;

use thiserror::Error;

/// Errors reported by parsing, validation and buffer loading.
#[derive(Error, Debug)]
pub enum Error {
    /// Input is truncated relative to a declared length (GLB framing,
    /// accessor ranges, sparse overlays, bin chunk shorter than a buffer).
    #[error("data too short")]
    DataTooShort,

    /// Wrong magic, wrong chunk kind, wrong container version, or an
    /// unsupported buffer URI scheme.
    #[error("unknown format")]
    UnknownFormat,

    /// The JSON text could not be tokenized.
    #[error("invalid JSON")]
    InvalidJson,

    /// The JSON tokenized but violates the glTF schema: wrong value kind at
    /// a schema slot, out-of-range reference, or a semantic rule failure.
    #[error("invalid glTF: {0}")]
    InvalidGltf(&'static str),

    /// A required out parameter is missing or unusable.
    #[error("invalid options")]
    InvalidOptions,

    /// A referenced file does not exist.
    #[error("file not found")]
    FileNotFound,

    /// Any other I/O failure while reading files or decoding payloads.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Token array allocation failed.
    #[error("out of memory")]
    OutOfMemory,
}

pub type Result<T> = std::result::Result<T, Error>;
