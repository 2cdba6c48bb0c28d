//! Streaming JSON tokenizer with bounded memory use.
//!
//! Scans a UTF-8 byte slice in a single pass and produces a flat array of
//! tokens; the caller owns the token storage. A counting pre-pass (no token
//! buffer) reports the exact number of tokens needed, so the parser can
//! allocate the array in one shot. Every token carries a back-link to its
//! enclosing container, which keeps close-bracket handling O(1) and the
//! whole scan linear in input size even for large flat arrays.
//!
//! Strings are tokenized but never unescaped: `\uXXXX` escapes are checked
//! for four hex digits and left in place. Numbers and the `true`/`false`/
//! `null` literals become a single primitive token holding the verbatim
//! span; no numeric conversion happens here.

/// Token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Object,
    Array,
    String,
    Primitive,
}

/// Sentinel for a container token whose closing bracket has not been seen.
const UNCLOSED: usize = usize::MAX;

/// One token in the flat token array.
///
/// `start..end` is the byte range of the value; string tokens exclude the
/// surrounding quotes. `size` is the child count: elements for arrays,
/// key/value pairs for objects (counted by keys), and for a key string the
/// number of values that follow it (1 for a well-formed pair). `parent` is
/// the index of the enclosing container token, or -1 at top level.
#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    pub size: usize,
    pub parent: i32,
}

impl Default for Token {
    fn default() -> Self {
        Token {
            kind: TokenKind::Primitive,
            start: 0,
            end: 0,
            size: 0,
            parent: -1,
        }
    }
}

/// Tokenizer failure. `parse` collapses all three to `Error::InvalidJson`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizeError {
    /// The provided token buffer is too small.
    NoSpace,
    /// Invalid character in the input.
    Invalid,
    /// The input ends before the value does.
    Incomplete,
}

/// Scanner state: byte cursor, token allocation cursor, current container.
#[derive(Debug)]
pub struct Tokenizer {
    pos: usize,
    next_token: usize,
    super_token: i32,
}

impl Tokenizer {
    pub fn new() -> Self {
        Tokenizer {
            pos: 0,
            next_token: 0,
            super_token: -1,
        }
    }

    /// Counting pre-pass: scans without storing tokens and returns the
    /// total token count. This mode does not balance brackets; the filling
    /// pass performs the full validation.
    pub fn count(&mut self, json: &[u8]) -> Result<usize, TokenizeError> {
        self.scan(json, None)
    }

    /// Filling pass: tokenizes into `tokens` and returns the number of
    /// tokens produced.
    pub fn tokenize(&mut self, json: &[u8], tokens: &mut [Token]) -> Result<usize, TokenizeError> {
        self.scan(json, Some(tokens))
    }

    fn scan(&mut self, js: &[u8], mut tokens: Option<&mut [Token]>) -> Result<usize, TokenizeError> {
        let mut count = self.next_token;

        while self.pos < js.len() {
            let c = js[self.pos];
            match c {
                b'{' | b'[' => {
                    count += 1;
                    if let Some(toks) = tokens.as_deref_mut() {
                        let i = self.alloc_token(toks)?;
                        if self.super_token != -1 {
                            toks[self.super_token as usize].size += 1;
                            toks[i].parent = self.super_token;
                        }
                        toks[i].kind = if c == b'{' {
                            TokenKind::Object
                        } else {
                            TokenKind::Array
                        };
                        toks[i].start = self.pos;
                        self.super_token = self.next_token as i32 - 1;
                    }
                }
                b'}' | b']' => {
                    if let Some(toks) = tokens.as_deref_mut() {
                        let kind = if c == b'}' {
                            TokenKind::Object
                        } else {
                            TokenKind::Array
                        };
                        if self.next_token < 1 {
                            return Err(TokenizeError::Invalid);
                        }
                        // Walk parent links back to the open container.
                        let mut i = self.next_token - 1;
                        loop {
                            let tok = toks[i];
                            if tok.start != UNCLOSED && tok.end == UNCLOSED {
                                if tok.kind != kind {
                                    return Err(TokenizeError::Invalid);
                                }
                                toks[i].end = self.pos + 1;
                                self.super_token = tok.parent;
                                break;
                            }
                            if tok.parent == -1 {
                                if tok.kind != kind || self.super_token == -1 {
                                    return Err(TokenizeError::Invalid);
                                }
                                break;
                            }
                            i = tok.parent as usize;
                        }
                    }
                }
                b'"' => {
                    self.scan_string(js, tokens.as_deref_mut())?;
                    count += 1;
                    if self.super_token != -1 {
                        if let Some(toks) = tokens.as_deref_mut() {
                            toks[self.super_token as usize].size += 1;
                        }
                    }
                }
                b'\t' | b'\r' | b'\n' | b' ' => {}
                b':' => {
                    self.super_token = self.next_token as i32 - 1;
                }
                b',' => {
                    if let Some(toks) = tokens.as_deref_mut() {
                        if self.super_token != -1 {
                            let sup = toks[self.super_token as usize];
                            if sup.kind != TokenKind::Array && sup.kind != TokenKind::Object {
                                self.super_token = sup.parent;
                            }
                        }
                    }
                }
                _ => {
                    self.scan_primitive(js, tokens.as_deref_mut())?;
                    count += 1;
                    if self.super_token != -1 {
                        if let Some(toks) = tokens.as_deref_mut() {
                            toks[self.super_token as usize].size += 1;
                        }
                    }
                }
            }
            self.pos += 1;
        }

        if let Some(toks) = tokens.as_deref() {
            for i in (0..self.next_token).rev() {
                // Unmatched opened object or array.
                if toks[i].start != UNCLOSED && toks[i].end == UNCLOSED {
                    return Err(TokenizeError::Incomplete);
                }
            }
        }

        Ok(count)
    }

    fn alloc_token(&mut self, tokens: &mut [Token]) -> Result<usize, TokenizeError> {
        if self.next_token >= tokens.len() {
            return Err(TokenizeError::NoSpace);
        }
        let i = self.next_token;
        self.next_token += 1;
        tokens[i] = Token {
            kind: TokenKind::Primitive,
            start: UNCLOSED,
            end: UNCLOSED,
            size: 0,
            parent: -1,
        };
        Ok(i)
    }

    /// Scans a number or `true`/`false`/`null` literal. The span is kept
    /// verbatim; any control byte or byte >= 127 inside is an error.
    fn scan_primitive(
        &mut self,
        js: &[u8],
        tokens: Option<&mut [Token]>,
    ) -> Result<(), TokenizeError> {
        let start = self.pos;

        while self.pos < js.len() {
            let c = js[self.pos];
            if matches!(c, b':' | b'\t' | b'\r' | b'\n' | b' ' | b',' | b']' | b'}') {
                break;
            }
            if c < 32 || c >= 127 {
                self.pos = start;
                return Err(TokenizeError::Invalid);
            }
            self.pos += 1;
        }

        if let Some(toks) = tokens {
            match self.alloc_token(toks) {
                Ok(i) => {
                    toks[i] = Token {
                        kind: TokenKind::Primitive,
                        start,
                        end: self.pos,
                        size: 0,
                        parent: self.super_token,
                    };
                }
                Err(e) => {
                    self.pos = start;
                    return Err(e);
                }
            }
        }
        // The terminator is re-examined by the main loop.
        self.pos -= 1;
        Ok(())
    }

    /// Scans a quoted string, validating escapes without unescaping.
    fn scan_string(
        &mut self,
        js: &[u8],
        tokens: Option<&mut [Token]>,
    ) -> Result<(), TokenizeError> {
        let start = self.pos;
        self.pos += 1;

        while self.pos < js.len() {
            let c = js[self.pos];

            if c == b'"' {
                if let Some(toks) = tokens {
                    match self.alloc_token(toks) {
                        Ok(i) => {
                            toks[i] = Token {
                                kind: TokenKind::String,
                                start: start + 1,
                                end: self.pos,
                                size: 0,
                                parent: self.super_token,
                            };
                        }
                        Err(e) => {
                            self.pos = start;
                            return Err(e);
                        }
                    }
                }
                return Ok(());
            }

            if c == b'\\' && self.pos + 1 < js.len() {
                self.pos += 1;
                match js[self.pos] {
                    b'"' | b'/' | b'\\' | b'b' | b'f' | b'r' | b'n' | b't' => {}
                    b'u' => {
                        self.pos += 1;
                        let mut digits = 0;
                        while digits < 4 && self.pos < js.len() {
                            if !js[self.pos].is_ascii_hexdigit() {
                                self.pos = start;
                                return Err(TokenizeError::Invalid);
                            }
                            self.pos += 1;
                            digits += 1;
                        }
                        self.pos -= 1;
                    }
                    _ => {
                        self.pos = start;
                        return Err(TokenizeError::Invalid);
                    }
                }
            }
            self.pos += 1;
        }

        self.pos = start;
        Err(TokenizeError::Incomplete)
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}
