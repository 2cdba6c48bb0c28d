//! File and buffer loading collaborators for glift-core.
//!
//! The core crate parses from memory and never touches the filesystem;
//! this crate supplies the I/O around it:
//!
//! - [`parse_file`] reads an asset file and parses it.
//! - [`load_buffers`] resolves every buffer's payload after parsing:
//!   the GLB binary chunk, `data:` URIs with base64 payloads, and
//!   relative file paths next to the asset.
//! - [`load_buffer_base64`] is the standalone base64 payload decoder.
//!
//! # Example
//!
//! ```no_run
//! use glift_core::Options;
//! use glift_io::{load_buffers, parse_file};
//!
//! let options = Options::default();
//! let mut doc = parse_file(&options, "model.gltf").unwrap();
//! load_buffers(&mut doc, "model.gltf").unwrap();
//! ```

pub mod buffers;
pub mod file;

pub use buffers::{load_buffer_base64, load_buffers};
pub use file::parse_file;
