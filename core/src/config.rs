/*
 * config.rs
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

//! Per-invocation configuration handed to the core by the command-line front end.
//!
//! `ConnectOptions` + resolved candidates make a `ConnectionConfig`; `RequestOptions` is turned
//! into a serialized request by `protocol::http::request`. Both are built once and not mutated.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CurlError;

/// Dial timeout used when `--connect-timeout` is not given.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub const HTTP_PORT: u16 = 80;
pub const HTTPS_PORT: u16 = 443;

/// Default User-Agent header value.
pub const DEFAULT_USER_AGENT: &str = concat!("smolcurl/", env!("CARGO_PKG_VERSION"));

/// Connection options known before resolution.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// Skip server certificate verification (`-k`). Also selects TLS.
    pub insecure: bool,
    /// PEM file holding the client certificate chain and its private key (`-E`). Selects TLS.
    pub client_cert: Option<PathBuf>,
    pub connect_timeout: Option<Duration>,
    /// Overall deadline for dial, write and the whole read loop (`-m`).
    pub total_timeout: Option<Duration>,
    pub plain_port: u16,
    pub tls_port: u16,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            insecure: false,
            client_cert: None,
            connect_timeout: None,
            total_timeout: None,
            plain_port: HTTP_PORT,
            tls_port: HTTPS_PORT,
        }
    }
}

impl ConnectOptions {
    /// TLS is chosen by the certificate and insecure options only, never by the URL scheme.
    pub fn use_tls(&self) -> bool {
        self.client_cert.is_some() || self.insecure
    }

    pub fn dial_timeout(&self) -> Duration {
        self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT)
    }

    pub fn port(&self) -> u16 {
        if self.use_tls() {
            self.tls_port
        } else {
            self.plain_port
        }
    }
}

/// Everything the establisher needs: candidates in resolver order plus the options.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    candidates: Vec<IpAddr>,
    options: ConnectOptions,
}

impl ConnectionConfig {
    /// Candidates are kept exactly as given: no reordering, no de-duplication.
    pub fn new(candidates: Vec<IpAddr>, options: ConnectOptions) -> Self {
        Self {
            candidates,
            options,
        }
    }

    pub fn candidates(&self) -> &[IpAddr] {
        &self.candidates
    }

    pub fn options(&self) -> &ConnectOptions {
        &self.options
    }

    /// Socket addresses to dial, in candidate order, on the port TLS selection implies.
    pub fn socket_addrs(&self) -> Vec<SocketAddr> {
        let port = self.options.port();
        self.candidates
            .iter()
            .map(|ip| SocketAddr::new(*ip, port))
            .collect()
    }
}

/// Where a multipart part's content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartSource {
    Value(String),
    File(PathBuf),
}

/// One `-F` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartPart {
    pub name: String,
    pub source: PartSource,
}

impl MultipartPart {
    /// Parse `name=value` or `name=@path`. The split is at the first `=`.
    pub fn parse(spec: &str) -> Result<Self, CurlError> {
        let (name, value) = spec
            .split_once('=')
            .ok_or_else(|| CurlError::input(spec))?;
        let source = match value.strip_prefix('@') {
            Some(path) => PartSource::File(PathBuf::from(path)),
            None => PartSource::Value(value.to_string()),
        };
        Ok(Self {
            name: name.to_string(),
            source,
        })
    }
}

/// Request body source. Exactly one variant applies per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyDescriptor {
    None,
    /// `-d` items in the order given.
    Data(Vec<String>),
    /// `-F` fields in the order given.
    Multipart(Vec<MultipartPart>),
}

impl BodyDescriptor {
    /// Select the body source: multipart fields win over data items, data over nothing.
    /// Field specs are only parsed when multipart is selected.
    pub fn select(data: &[String], form: &[String]) -> Result<Self, CurlError> {
        if !form.is_empty() {
            let parts = form
                .iter()
                .map(|f| MultipartPart::parse(f))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(BodyDescriptor::Multipart(parts))
        } else if !data.is_empty() {
            Ok(BodyDescriptor::Data(data.to_vec()))
        } else {
            Ok(BodyDescriptor::None)
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, BodyDescriptor::None)
    }
}

/// Request-side options (method, headers, cookie, credentials, body).
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub user_agent: String,
    /// `-X`; upper-cased when the method is resolved.
    pub custom_method: Option<String>,
    /// `-I`
    pub head_only: bool,
    /// Raw header lines, sent verbatim and in order.
    pub headers: Vec<String>,
    pub cookie: Option<String>,
    /// `user:pass` exactly as given to `-u`.
    pub credentials: Option<String>,
    pub body: BodyDescriptor,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            custom_method: None,
            head_only: false,
            headers: Vec::new(),
            cookie: None,
            credentials: None,
            body: BodyDescriptor::None,
        }
    }
}
