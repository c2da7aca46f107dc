//! Header/body payloads shared by commits and tags
//!
//! ## Format
//!
//! ```text
//! tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147
//! parent 206941306e8a8af65b66eaaaea388a7ae24d49a0
//! gpgsig -----BEGIN PGP SIGNATURE-----
//!  continuation lines start with one space
//!
//! free-text body, taken verbatim
//! ```
//!
//! Keys may repeat (several `parent` lines) and their order is significant.
//! Values and body are raw bytes: messages in legacy encodings (see the
//! `encoding` header) are kept as written.

use crate::errors::{OdbError, Result};

/// Ordered header list plus free-text body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(Vec<u8>, Vec<u8>)>,
    body: Vec<u8>,
}

impl Headers {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Headers {
            entries: Vec::new(),
            body: body.into(),
        }
    }

    /// Append a header, keeping insertion order
    ///
    /// Keys cannot be empty and cannot contain a space or a newline, since either
    /// would change how the line parses back.
    pub fn push(
        &mut self,
        object_type: &'static str,
        key: impl AsRef<[u8]>,
        value: impl AsRef<[u8]>,
    ) -> Result<()> {
        let key = key.as_ref();
        if key.is_empty() || key.iter().any(|&b| b == b' ' || b == b'\n') {
            return Err(OdbError::malformed(
                object_type,
                format!("invalid header key '{}'", String::from_utf8_lossy(key)),
            ));
        }
        self.entries.push((key.to_vec(), value.as_ref().to_vec()));
        Ok(())
    }

    /// First value stored under `key`
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.get_all(key).next()
    }

    /// Every value stored under `key`, in payload order
    pub fn get_all<'h, 'k>(
        &'h self,
        key: &'k str,
    ) -> impl Iterator<Item = &'h [u8]> + use<'h, 'k> {
        self.entries
            .iter()
            .filter(move |(k, _)| k.as_slice() == key.as_bytes())
            .map(|(_, v)| v.as_slice())
    }

    /// First value under `key` as text, for headers whose grammar is ASCII
    pub fn get_text(&self, object_type: &'static str, key: &str) -> Result<Option<&str>> {
        self.get(key)
            .map(|value| text(object_type, key, value))
            .transpose()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.entries.iter().map(|(k, v)| (k.as_slice(), v.as_slice()))
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut payload = Vec::new();

        for (key, value) in &self.entries {
            payload.extend_from_slice(key);
            payload.push(b' ');
            for &byte in value {
                payload.push(byte);
                if byte == b'\n' {
                    payload.push(b' ');
                }
            }
            payload.push(b'\n');
        }
        payload.push(b'\n');
        payload.extend_from_slice(&self.body);

        payload
    }

    /// Parse headers up to the first blank line; everything after it is the body
    pub fn parse(object_type: &'static str, payload: &[u8]) -> Result<Self> {
        let mut entries: Vec<(Vec<u8>, Vec<u8>)> = Vec::new();
        let mut rest = payload;

        loop {
            let Some(newline) = rest.iter().position(|&b| b == b'\n') else {
                return Err(OdbError::malformed(
                    object_type,
                    "missing blank line between headers and body",
                ));
            };
            let line = &rest[..newline];
            rest = &rest[newline + 1..];

            if line.is_empty() {
                break;
            }

            if let Some(continuation) = line.strip_prefix(b" ") {
                let (_, value) = entries.last_mut().ok_or_else(|| {
                    OdbError::malformed(object_type, "continuation line before any header")
                })?;
                value.push(b'\n');
                value.extend_from_slice(continuation);
                continue;
            }

            let space = line.iter().position(|&b| b == b' ').ok_or_else(|| {
                OdbError::malformed(
                    object_type,
                    format!(
                        "header line without value: '{}'",
                        String::from_utf8_lossy(line)
                    ),
                )
            })?;
            entries.push((line[..space].to_vec(), line[space + 1..].to_vec()));
        }

        Ok(Headers {
            entries,
            body: rest.to_vec(),
        })
    }
}

fn text<'v>(object_type: &'static str, key: &str, value: &'v [u8]) -> Result<&'v str> {
    std::str::from_utf8(value)
        .map_err(|_| OdbError::malformed(object_type, format!("{key} header is not valid UTF-8")))
}
