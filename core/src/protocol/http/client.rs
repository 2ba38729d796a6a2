/*
 * client.rs
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

//! HTTP client: one exchange per call. Build the request, resolve, connect, write, read, close.

use crate::config::{ConnectOptions, ConnectionConfig, RequestOptions};
use crate::error::CurlError;
use crate::protocol::http::connection::HttpConnection;
use crate::protocol::http::request::Request;
use crate::protocol::http::resolver::{Resolver, SystemResolver};
use crate::protocol::http::response::Response;
use crate::protocol::http::HeaderSink;
use crate::uri::Target;

/// HTTP client. Create with `HttpClient::new()` (system resolver) or `with_resolver`, then
/// call `execute` once per request.
pub struct HttpClient<R = SystemResolver> {
    resolver: R,
}

impl HttpClient<SystemResolver> {
    pub fn new() -> Self {
        Self {
            resolver: SystemResolver,
        }
    }
}

impl Default for HttpClient<SystemResolver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resolver> HttpClient<R> {
    pub fn with_resolver(resolver: R) -> Self {
        Self { resolver }
    }

    /// Perform one exchange with `target`.
    ///
    /// The request is fully built (multipart files included) before any network activity.
    /// A read error does not fail the call: the partial response is returned with
    /// `Response::read_error` set. The connection is closed on every path.
    pub async fn execute(
        &self,
        target: &Target,
        connect: &ConnectOptions,
        options: &RequestOptions,
        sink: Option<&mut dyn HeaderSink>,
    ) -> Result<Response, CurlError> {
        tracing::info!("Fetching {} ...", target.host());
        let request = Request::build(target, options)?;

        let candidates = self
            .resolver
            .resolve(target.host())
            .await
            .map_err(|source| CurlError::Resolution {
                host: target.host().to_string(),
                source,
            })?;
        let config = ConnectionConfig::new(candidates, connect.clone());
        let mut connection = HttpConnection::establish(target.host(), &config).await?;

        tracing::info!("Sending request:\n{}", request.head());
        if let Err(e) = connection.send(&request).await {
            connection.close().await;
            return Err(e);
        }
        let response = connection
            .read_response(request.method().is_head(), sink)
            .await;
        connection.close().await;
        tracing::info!("Received response:");
        tracing::debug!("{} bytes", response.bytes().len());
        Ok(response)
    }
}
