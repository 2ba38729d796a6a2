/*
 * response.rs
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

//! Response read loop and accumulator.
//!
//! The response is not parsed: bytes are accumulated exactly as received. The only thing
//! looked for is the first CRLFCRLF, which marks the end of the header block. It is found
//! incrementally (each append only scans the new bytes plus a 3-byte overlap) and recorded
//! once; later occurrences inside the body are never considered.

use std::io;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::CurlError;
use crate::protocol::http::connection::Deadline;
use crate::protocol::http::HeaderSink;

/// Size of each read from the connection.
pub const READ_BUFFER_SIZE: usize = 10_000;

const HEADER_END: &[u8] = b"\r\n\r\n";

fn find_header_end(haystack: &[u8]) -> Option<usize> {
    haystack
        .windows(HEADER_END.len())
        .position(|w| w == HEADER_END)
}

/// Append-only response accumulator with one-shot header boundary detection.
#[derive(Debug, Default)]
pub struct ResponseBuffer {
    data: BytesMut,
    /// Bytes already searched without finding the boundary.
    scanned: usize,
    /// Length of the header block (including CRLFCRLF) once found.
    header_end: Option<usize>,
}

impl ResponseBuffer {
    pub fn new() -> Self {
        Self {
            data: BytesMut::with_capacity(READ_BUFFER_SIZE),
            scanned: 0,
            header_end: None,
        }
    }

    /// Append a chunk. Returns the header block length if this append completed it;
    /// `None` before the boundary and on every append after it.
    pub fn append(&mut self, chunk: &[u8]) -> Option<usize> {
        self.data.extend_from_slice(chunk);
        if self.header_end.is_some() {
            return None;
        }
        // A boundary split across appends starts at most 3 bytes before the new data.
        let start = self.scanned.saturating_sub(HEADER_END.len() - 1);
        match find_header_end(&self.data[start..]) {
            Some(pos) => {
                let end = start + pos + HEADER_END.len();
                self.header_end = Some(end);
                Some(end)
            }
            None => {
                self.scanned = self.data.len();
                None
            }
        }
    }

    pub fn headers_captured(&self) -> bool {
        self.header_end.is_some()
    }

    pub fn header_block(&self) -> Option<&[u8]> {
        self.header_end.map(|end| &self.data[..end])
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_response(self, error: Option<CurlError>) -> Response {
        Response {
            header_end: self.header_end,
            data: self.data.freeze(),
            error,
        }
    }
}

/// Everything received, plus the read error that ended the loop, if any.
#[derive(Debug)]
pub struct Response {
    data: Bytes,
    header_end: Option<usize>,
    error: Option<CurlError>,
}

impl Response {
    /// Raw response bytes: headers and body exactly as received.
    pub fn bytes(&self) -> &Bytes {
        &self.data
    }

    pub fn header_block(&self) -> Option<&[u8]> {
        self.header_end.map(|end| &self.data[..end])
    }

    /// Set when the loop ended on a read error or deadline expiry rather than end-of-stream.
    pub fn read_error(&self) -> Option<&CurlError> {
        self.error.as_ref()
    }
}

/// Read until end-of-stream, a read error, or (for `head_only`) the end of the header block.
///
/// The sink, if any, receives the header block once. Read errors end the loop without retry;
/// whatever was accumulated is still returned.
pub async fn read_response<S>(
    stream: &mut S,
    deadline: Deadline,
    head_only: bool,
    mut sink: Option<&mut dyn HeaderSink>,
) -> Response
where
    S: AsyncRead + Unpin,
{
    let mut buffer = ResponseBuffer::new();
    let mut chunk = vec![0u8; READ_BUFFER_SIZE];
    let error = loop {
        let n = match deadline.run(stream.read(&mut chunk)).await {
            Ok(0) => break None,
            Ok(n) => n,
            // Servers commonly close TLS without close_notify after Connection: close.
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof && !buffer.is_empty() => {
                tracing::debug!("peer closed without close_notify");
                break None;
            }
            Err(e) => {
                tracing::warn!("Error reading response: {}", e);
                break Some(CurlError::transport("Error reading response", e));
            }
        };
        if let Some(end) = buffer.append(&chunk[..n]) {
            tracing::debug!("header block complete ({} bytes)", end);
            if let Some(sink) = sink.as_deref_mut() {
                sink.headers(&buffer.as_slice()[..end]);
            }
        }
        if head_only && buffer.headers_captured() {
            break None;
        }
    };
    buffer.into_response(error)
}
