/*
 * lib.rs
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

//! Smolcurl core: a curl-like HTTP/1.1 client engine that writes requests and reads responses
//! directly on TCP or TLS sockets.
//!
//! The front end supplies a `Target`, `ConnectOptions` and `RequestOptions`; `HttpClient`
//! performs the exchange and returns the raw response bytes.

pub mod config;
pub mod error;
pub mod net;
pub mod protocol;
pub mod uri;

pub use config::{BodyDescriptor, ConnectOptions, ConnectionConfig, MultipartPart, PartSource, RequestOptions};
pub use error::CurlError;
pub use protocol::http::{HeaderSink, HttpClient, Method, Request, Response};
pub use uri::Target;
