/*
 * mod.rs
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

//! HTTP/1.1 over raw sockets: request serialization, connection establishment with address
//! fallback, and the response read loop.
//!
//! - `request`: method resolution, head serialization; bodies via `form` and `multipart`.
//! - `connection`: candidate scan, TLS/plain dial, shared deadline, write and read.
//! - `response`: accumulator with incremental CRLFCRLF detection, `HeaderSink` delivery.
//! - `client`: one exchange end to end.

mod form;
mod handler;
mod multipart;

pub mod client;
pub mod connection;
pub mod request;
pub mod resolver;
pub mod response;

pub use client::HttpClient;
pub use connection::{Deadline, Established, HttpConnection, HttpStream};
pub use form::FORM_URLENCODED;
pub use handler::HeaderSink;
pub use multipart::MultipartWriter;
pub use request::{EncodedBody, Method, Request};
pub use resolver::{Resolver, StaticResolver, SystemResolver};
pub use response::{Response, ResponseBuffer, READ_BUFFER_SIZE};
