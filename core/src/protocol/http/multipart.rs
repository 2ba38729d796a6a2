/*
 * multipart.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Smolcurl, a raw-socket HTTP/1.1 command-line client.
 *
 * Smolcurl is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Smolcurl is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Smolcurl.  If not, see <http://www.gnu.org/licenses/>.
 */

//! multipart/form-data body writer. The whole body is assembled in memory.
//!
//! Layout: `--B\r\n` before the first part, `\r\n--B\r\n` before each later part, part headers,
//! blank line, content, and `\r\n--B--\r\n` at the end.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use rand::Rng;

use crate::config::{MultipartPart, PartSource};
use crate::error::CurlError;

/// Random bytes in a boundary; hex-encoded, so the token is twice as long.
const BOUNDARY_BYTES: usize = 30;

fn random_boundary() -> String {
    let mut bytes = [0u8; BOUNDARY_BYTES];
    rand::thread_rng().fill(&mut bytes[..]);
    let mut out = String::with_capacity(BOUNDARY_BYTES * 2);
    for b in bytes {
        let _ = write!(out, "{:02x}", b);
    }
    out
}

/// Backslash-escape `\` and `"` for a quoted-string parameter.
fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Base name of a path, directory stripped. Falls back to the path as given.
fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

pub struct MultipartWriter {
    boundary: String,
    out: Vec<u8>,
    parts: usize,
}

impl MultipartWriter {
    pub fn new() -> Self {
        Self::with_boundary(random_boundary())
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            out: Vec::new(),
            parts: 0,
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// `multipart/form-data; boundary=<token>`
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    fn begin_part(&mut self, disposition: &str, content_type: Option<&str>) {
        if self.parts > 0 {
            self.out.extend_from_slice(b"\r\n");
        }
        self.parts += 1;
        self.out.extend_from_slice(b"--");
        self.out.extend_from_slice(self.boundary.as_bytes());
        self.out.extend_from_slice(b"\r\n");
        append_header(&mut self.out, "Content-Disposition", disposition);
        if let Some(ct) = content_type {
            append_header(&mut self.out, "Content-Type", ct);
        }
        self.out.extend_from_slice(b"\r\n");
    }

    /// Plain form field.
    pub fn field(&mut self, name: &str, value: &[u8]) {
        let disposition = format!("form-data; name=\"{}\"", escape_quotes(name));
        self.begin_part(&disposition, None);
        self.out.extend_from_slice(value);
    }

    /// File part; `filename` is sent as given.
    pub fn file(&mut self, name: &str, filename: &str, content: &[u8]) {
        let disposition = format!(
            "form-data; name=\"{}\"; filename=\"{}\"",
            escape_quotes(name),
            escape_quotes(filename)
        );
        self.begin_part(&disposition, Some("application/octet-stream"));
        self.out.extend_from_slice(content);
    }

    /// Write the closing delimiter and return the body.
    pub fn finish(mut self) -> Vec<u8> {
        self.out.extend_from_slice(b"\r\n--");
        self.out.extend_from_slice(self.boundary.as_bytes());
        self.out.extend_from_slice(b"--\r\n");
        self.out
    }
}

impl Default for MultipartWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn append_header(out: &mut Vec<u8>, name: &str, value: &str) {
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(b": ");
    out.extend_from_slice(value.as_bytes());
    out.extend_from_slice(b"\r\n");
}

/// Build a multipart body from `-F` parts, reading referenced files fully.
/// Returns (content type, body). An unreadable file aborts the whole body.
pub fn encode_parts(
    parts: &[MultipartPart],
    mut writer: MultipartWriter,
) -> Result<(String, Vec<u8>), CurlError> {
    for part in parts {
        match &part.source {
            PartSource::Value(value) => writer.field(&part.name, value.as_bytes()),
            PartSource::File(path) => {
                let content = fs::read(path)
                    .map_err(|e| CurlError::input(format!("{}: {}", path.display(), e)))?;
                writer.file(&part.name, &base_name(path), &content);
            }
        }
    }
    let content_type = writer.content_type();
    Ok((content_type, writer.finish()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn random_boundary_is_sixty_hex_chars() {
        let b = MultipartWriter::new();
        assert_eq!(b.boundary().len(), 60);
        assert!(b.boundary().bytes().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(b.boundary(), MultipartWriter::new().boundary());
    }

    #[test]
    fn single_field_layout() {
        let mut w = MultipartWriter::with_boundary("XyZ");
        w.field("greeting", b"hello");
        assert_eq!(w.content_type(), "multipart/form-data; boundary=XyZ");
        let body = w.finish();
        assert_eq!(
            body,
            b"--XyZ\r\nContent-Disposition: form-data; name=\"greeting\"\r\n\r\nhello\r\n--XyZ--\r\n"
        );
    }

    #[test]
    fn file_part_after_field() {
        let mut w = MultipartWriter::with_boundary("b");
        w.field("a", b"1");
        w.file("doc", "notes.txt", b"line\r\n");
        let body = String::from_utf8(w.finish()).unwrap();
        assert_eq!(
            body,
            "--b\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\n1\
             \r\n--b\r\nContent-Disposition: form-data; name=\"doc\"; filename=\"notes.txt\"\r\n\
             Content-Type: application/octet-stream\r\n\r\nline\r\n\
             \r\n--b--\r\n"
        );
    }

    #[test]
    fn quotes_in_names_are_escaped() {
        let mut w = MultipartWriter::with_boundary("b");
        w.field("we\"ird\\", b"");
        let body = String::from_utf8(w.finish()).unwrap();
        assert!(body.contains("name=\"we\\\"ird\\\\\""));
    }

    #[test]
    fn file_reference_uses_base_name_and_file_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.bin");
        fs::write(&path, [0u8, 1, 2, 255]).unwrap();
        let parts = vec![
            MultipartPart {
                name: "upload".to_string(),
                source: PartSource::File(path.clone()),
            },
            MultipartPart {
                name: "note".to_string(),
                source: PartSource::Value("@not-a-file-here".to_string()),
            },
        ];
        let (ct, body) = encode_parts(&parts, MultipartWriter::with_boundary("q")).unwrap();
        assert_eq!(ct, "multipart/form-data; boundary=q");

        let mut expected = Vec::new();
        expected.extend_from_slice(
            b"--q\r\nContent-Disposition: form-data; name=\"upload\"; filename=\"report.bin\"\r\n\
              Content-Type: application/octet-stream\r\n\r\n",
        );
        expected.extend_from_slice(&[0u8, 1, 2, 255]);
        expected.extend_from_slice(
            b"\r\n--q\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\n@not-a-file-here\r\n--q--\r\n",
        );
        assert_eq!(body, expected);
    }

    #[test]
    fn unreadable_file_is_an_input_error() {
        let parts = vec![MultipartPart {
            name: "f".to_string(),
            source: PartSource::File(PathBuf::from("/nonexistent/dir/missing.txt")),
        }];
        let err = encode_parts(&parts, MultipartWriter::new()).unwrap_err();
        assert!(matches!(err, CurlError::Input(_)));
    }
}
