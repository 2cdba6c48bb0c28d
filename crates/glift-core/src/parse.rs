//! Parse entry point: container demux, tokenization, deserialization and
//! reference resolution in one call.

use crate::container;
use crate::deserialize;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::json_tokens::{Token, Tokenizer};
use crate::resolve;
use crate::types::FileKind;

/// Parse options.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Container shape hint; `Auto` detects from the magic bytes.
    pub file_kind: FileKind,
    /// Token array size; 0 runs a counting pre-pass to compute the exact
    /// count. A nonzero value trusts the caller and fails with
    /// `InvalidJson` when too small.
    pub json_token_count: usize,
}

/// Parses a glTF asset from memory, auto-detecting the container shape.
///
/// On success the returned document owns a copy of the JSON chunk (for
/// extras retrieval) and of the binary chunk when the input is a binary
/// container. Buffer payloads are not loaded; see the I/O crate's
/// `load_buffers`.
pub fn parse(options: &Options, data: &[u8]) -> Result<Document> {
    let (file_kind, json_chunk, bin_chunk) = container::demux(data, options.file_kind)?;

    let mut token_count = options.json_token_count;
    if token_count == 0 {
        token_count = Tokenizer::new()
            .count(json_chunk)
            .map_err(|_| Error::InvalidJson)?;
        if token_count == 0 {
            return Err(Error::InvalidJson);
        }
    }

    let mut tokens: Vec<Token> = Vec::new();
    tokens
        .try_reserve_exact(token_count)
        .map_err(|_| Error::OutOfMemory)?;
    tokens.resize(token_count, Token::default());

    let produced = Tokenizer::new()
        .tokenize(json_chunk, &mut tokens)
        .map_err(|_| Error::InvalidJson)?;
    if produced == 0 {
        return Err(Error::InvalidJson);
    }

    let mut doc = Document::default();
    deserialize::parse_document(&tokens[..produced], json_chunk, &mut doc)?;
    resolve::resolve(&mut doc)?;

    doc.file_kind = file_kind;
    doc.json = json_chunk.to_vec();
    doc.bin = bin_chunk.map(|bin| bin.to_vec());

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_json_asset() {
        let doc = parse(&Options::default(), br#"{"asset":{"version":"2.0"}}"#).unwrap();
        assert_eq!(doc.file_kind, FileKind::Json);
        assert_eq!(doc.asset.version.as_deref(), Some("2.0"));
        assert!(doc.bin.is_none());
    }

    #[test]
    fn test_short_json_is_accepted() {
        // Shorter than a binary container header; still valid JSON.
        let doc = parse(&Options::default(), b"{}").unwrap();
        assert_eq!(doc.file_kind, FileKind::Json);
    }

    #[test]
    fn test_token_count_hint() {
        let options = Options {
            json_token_count: 64,
            ..Options::default()
        };
        let doc = parse(&options, br#"{"asset":{"version":"2.0"}}"#).unwrap();
        assert_eq!(doc.asset.version.as_deref(), Some("2.0"));

        let too_small = Options {
            json_token_count: 2,
            ..Options::default()
        };
        assert!(matches!(
            parse(&too_small, br#"{"asset":{"version":"2.0"}}"#),
            Err(Error::InvalidJson)
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            parse(&Options::default(), b"{\"asset\":"),
            Err(Error::InvalidJson)
        ));
        assert!(matches!(
            parse(&Options::default(), b"        "),
            Err(Error::InvalidJson)
        ));
    }

    #[test]
    fn test_json_copy_is_retained() {
        let json = br#"{"asset":{"version":"2.0"}}"#;
        let doc = parse(&Options::default(), json).unwrap();
        assert_eq!(doc.json, json);
    }
}
