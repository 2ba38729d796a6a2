/*
 * error.rs
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

//! Errors for every stage of an exchange: argument handling, resolution, TLS set-up,
//! connecting, request building, transport and output.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Errors from building, sending or receiving a request.
///
/// `Connection` is reported per candidate address and is never fatal on its own; the
/// establisher turns a run of them into `ConnectionExhausted`.
#[derive(Debug, thiserror::Error)]
pub enum CurlError {
    /// Wrong number of positional arguments, or an unusable option value.
    #[error("usage: {0}")]
    Usage(String),

    /// Hostname lookup failed.
    #[error("LookupHost error for {host}: {source}")]
    Resolution {
        host: String,
        #[source]
        source: io::Error,
    },

    /// Client certificate missing, unreadable or not a usable certificate/key pair.
    #[error("Error loading client certificate {}: {reason}", path.display())]
    Certificate { path: PathBuf, reason: String },

    /// TLS client configuration could not be assembled.
    #[error("TLS configuration error: {0}")]
    Tls(#[from] rustls::Error),

    /// One candidate address could not be connected (TCP or TLS handshake).
    #[error("Connection failed: {addr}: {source}")]
    Connection {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// Every candidate address failed.
    #[error("Failed to connect to any address ({attempts} tried)")]
    ConnectionExhausted { attempts: usize },

    /// Malformed multipart field, or a multipart file that cannot be read.
    #[error("invalid form data: {0}")]
    Input(String),

    /// Write failure, or read failure / deadline expiry mid-response.
    #[error("{context}: {source}")]
    Transport {
        context: &'static str,
        #[source]
        source: io::Error,
    },

    /// Header dump or response output file could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CurlError {
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    pub fn transport(context: &'static str, source: io::Error) -> Self {
        Self::Transport { context, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_error_names_the_file() {
        let err = CurlError::Output {
            path: PathBuf::from("out.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "Failed to write out.txt: denied");
    }

    #[test]
    fn display_names_the_address() {
        let addr: SocketAddr = "10.0.0.1:443".parse().unwrap();
        let err = CurlError::Connection {
            addr,
            source: io::Error::new(io::ErrorKind::TimedOut, "timed out"),
        };
        assert_eq!(err.to_string(), "Connection failed: 10.0.0.1:443: timed out");
    }
}
