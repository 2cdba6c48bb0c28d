//! Buffer loading end to end: data URIs, relative files, and the binary
//! container chunk.

use std::fs;

use glift_core::{parse, validate, BufferData, BufferId, Error, Options};
use glift_io::{load_buffer_base64, load_buffers, parse_file};

const GLB_MAGIC: u32 = 0x46546C67;
const GLB_CHUNK_JSON: u32 = 0x4E4F534A;
const GLB_CHUNK_BIN: u32 = 0x004E4942;

fn glb(json: &[u8], bin: Option<&[u8]>) -> Vec<u8> {
    let total = 12 + 8 + json.len() + bin.map_or(0, |b| 8 + b.len());
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(&GLB_CHUNK_JSON.to_le_bytes());
    out.extend_from_slice(json);
    if let Some(bin) = bin {
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(&GLB_CHUNK_BIN.to_le_bytes());
        out.extend_from_slice(bin);
    }
    out
}

#[test]
fn test_base64_data_uri() {
    let json = br#"{
        "asset":{"version":"2.0"},
        "buffers":[{"byteLength":3,"uri":"data:application/octet-stream;base64,QUJD"}]
    }"#;
    let mut doc = parse(&Options::default(), json).unwrap();
    load_buffers(&mut doc, "model.gltf").unwrap();

    assert_eq!(doc.buffer_bytes(BufferId(0)), Some(&[0x41u8, 0x42, 0x43][..]));
}

#[test]
fn test_data_uri_without_base64_marker() {
    let json = br#"{"buffers":[{"byteLength":3,"uri":"data:application/octet-stream,ABC"}]}"#;
    let mut doc = parse(&Options::default(), json).unwrap();
    assert!(matches!(
        load_buffers(&mut doc, "model.gltf"),
        Err(Error::UnknownFormat)
    ));
}

#[test]
fn test_remote_uri_is_rejected() {
    let json = br#"{"buffers":[{"byteLength":3,"uri":"https://example.com/data.bin"}]}"#;
    let mut doc = parse(&Options::default(), json).unwrap();
    assert!(matches!(
        load_buffers(&mut doc, "model.gltf"),
        Err(Error::UnknownFormat)
    ));
}

#[test]
fn test_glb_bin_chunk_backs_first_buffer() {
    let json = br#"{"asset":{"version":"2.0"},"buffers":[{"byteLength":4}]}"#;
    let data = glb(json, Some(&[1, 2, 3, 4]));
    let mut doc = parse(&Options::default(), &data).unwrap();

    load_buffers(&mut doc, "model.glb").unwrap();
    assert!(matches!(doc.buffers[0].data, BufferData::BinChunk));
    assert_eq!(doc.buffer_bytes(BufferId(0)), Some(&[1u8, 2, 3, 4][..]));
}

#[test]
fn test_glb_bin_chunk_shorter_than_buffer() {
    let json = br#"{"buffers":[{"byteLength":100}]}"#;
    let data = glb(json, Some(&[1, 2, 3, 4]));
    let mut doc = parse(&Options::default(), &data).unwrap();

    assert!(matches!(
        load_buffers(&mut doc, "model.glb"),
        Err(Error::DataTooShort)
    ));
}

#[test]
fn test_loaded_buffers_are_not_reloaded() {
    let json = br#"{"buffers":[{"byteLength":2,"uri":"missing.bin"}]}"#;
    let mut doc = parse(&Options::default(), json).unwrap();
    doc.buffers[0].data = BufferData::Owned(vec![5, 6]);

    load_buffers(&mut doc, "model.gltf").unwrap();
    assert_eq!(doc.buffer_bytes(BufferId(0)), Some(&[5u8, 6][..]));
}

#[test]
fn test_relative_file_uri() {
    let dir = tempfile::tempdir().unwrap();
    let bin_path = dir.path().join("payload.bin");
    fs::write(&bin_path, [10u8, 20, 30, 40, 50]).unwrap();

    let gltf_path = dir.path().join("model.gltf");
    let json = br#"{
        "asset":{"version":"2.0"},
        "buffers":[{"byteLength":4,"uri":"payload.bin"}],
        "bufferViews":[{"buffer":0,"byteLength":4}],
        "accessors":[{"bufferView":0,"componentType":5121,"count":4,"type":"SCALAR"}]
    }"#;
    fs::write(&gltf_path, json).unwrap();

    let mut doc = parse_file(&Options::default(), &gltf_path).unwrap();
    load_buffers(&mut doc, gltf_path.to_str().unwrap()).unwrap();
    validate(&doc).unwrap();

    // The file is longer than the declared size; only `size` bytes load.
    assert_eq!(doc.buffer_bytes(BufferId(0)), Some(&[10u8, 20, 30, 40][..]));
}

#[test]
fn test_missing_buffer_file() {
    let dir = tempfile::tempdir().unwrap();
    let gltf_path = dir.path().join("model.gltf");
    let json = br#"{"buffers":[{"byteLength":4,"uri":"nope.bin"}]}"#;
    fs::write(&gltf_path, json).unwrap();

    let mut doc = parse_file(&Options::default(), &gltf_path).unwrap();
    assert!(matches!(
        load_buffers(&mut doc, gltf_path.to_str().unwrap()),
        Err(Error::FileNotFound)
    ));
}

#[test]
fn test_base64_roundtrip() {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    fn encode(data: &[u8]) -> String {
        let mut out = String::new();
        for chunk in data.chunks(3) {
            let b = [
                chunk[0],
                chunk.get(1).copied().unwrap_or(0),
                chunk.get(2).copied().unwrap_or(0),
            ];
            let n = (b[0] as u32) << 16 | (b[1] as u32) << 8 | b[2] as u32;
            out.push(ALPHABET[(n >> 18) as usize & 63] as char);
            out.push(ALPHABET[(n >> 12) as usize & 63] as char);
            if chunk.len() > 1 {
                out.push(ALPHABET[(n >> 6) as usize & 63] as char);
            }
            if chunk.len() > 2 {
                out.push(ALPHABET[n as usize & 63] as char);
            }
        }
        out
    }

    // Deterministic pseudo-random byte strings of varying lengths.
    let mut state = 0x12345678u32;
    let mut next = move || {
        state = state.wrapping_mul(1664525).wrapping_add(1013904223);
        (state >> 24) as u8
    };

    for len in [0usize, 1, 2, 3, 4, 31, 57, 256] {
        let data: Vec<u8> = (0..len).map(|_| next()).collect();
        let encoded = encode(&data);
        let decoded = load_buffer_base64(len, &encoded).unwrap();
        assert_eq!(decoded, data, "roundtrip failed for length {}", len);
    }
}
