/*
 * uri.rs
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

//! Target parsing and form percent-encoding.
//!
//! The positional argument is reduced to a bare hostname: a leading `http://` or `https://`
//! is dropped and everything from the first `/` is discarded. The scheme never selects TLS.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Query-component set: everything except the unreserved characters `- _ . ~` and
/// alphanumerics is encoded. Space is encoded here and turned into `+` by `form_encode`.
const FORM_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Request target: the host the request is sent to. The request path is always `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    host: String,
}

impl Target {
    /// Parse the positional argument. `https://example.com/a/b` -> `example.com`.
    pub fn parse(arg: &str) -> Self {
        let rest = arg.strip_prefix("http://").unwrap_or(arg);
        let rest = rest.strip_prefix("https://").unwrap_or(rest);
        let host = rest.split('/').next().unwrap_or("");
        Self {
            host: host.to_string(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Request path; explicit paths in the argument are not supported.
    pub fn path(&self) -> &'static str {
        "/"
    }
}

/// Percent-encode one key or value of an `application/x-www-form-urlencoded` pair.
pub fn form_encode(s: &str) -> String {
    // A literal "%20" in the input is itself encoded as "%2520", so this only hits spaces.
    utf8_percent_encode(s, FORM_COMPONENT)
        .to_string()
        .replace("%20", "+")
}
