/*
 * request.rs
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

//! HTTP request: method resolution, body encoding and head serialization.
//!
//! The head and the body are produced as two separate byte sequences; the connection writes
//! them one after the other. Bodies are always sent with Content-Length, never chunked.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::config::{BodyDescriptor, RequestOptions};
use crate::error::CurlError;
use crate::protocol::http::form::{encode_data, FORM_URLENCODED};
use crate::protocol::http::multipart::{encode_parts, MultipartWriter};
use crate::uri::Target;

/// HTTP request method. Anything other than the three the client picks on its own is sent
/// as given, upper-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Head,
    Custom(String),
}

impl Method {
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Head => "HEAD",
            Method::Custom(s) => s,
        }
    }

    /// Method from a user-supplied token, upper-cased.
    pub fn from_token(token: &str) -> Self {
        let upper = token.to_ascii_uppercase();
        match upper.as_str() {
            "GET" => Method::Get,
            "POST" => Method::Post,
            "HEAD" => Method::Head,
            _ => Method::Custom(upper),
        }
    }

    /// Precedence: custom method, then head-only, then POST when a body is configured, then GET.
    pub fn resolve(custom: Option<&str>, head_only: bool, has_body: bool) -> Self {
        match custom.filter(|m| !m.is_empty()) {
            Some(token) => Method::from_token(token),
            None if head_only => Method::Head,
            None if has_body => Method::Post,
            None => Method::Get,
        }
    }

    /// Head-only exchanges stop reading once the header block is complete.
    pub fn is_head(&self) -> bool {
        matches!(self, Method::Head)
    }
}

/// Encoded request body with its content type. Empty for `BodyDescriptor::None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncodedBody {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl EncodedBody {
    /// Encode the selected body source. Multipart files are read here, before any I/O.
    pub fn encode(body: &BodyDescriptor) -> Result<Self, CurlError> {
        match body {
            BodyDescriptor::None => Ok(Self::default()),
            BodyDescriptor::Data(items) => Ok(Self {
                content_type: Some(FORM_URLENCODED.to_string()),
                bytes: encode_data(items).into_bytes(),
            }),
            BodyDescriptor::Multipart(parts) => {
                let (content_type, bytes) = encode_parts(parts, MultipartWriter::new())?;
                Ok(Self {
                    content_type: Some(content_type),
                    bytes,
                })
            }
        }
    }
}

/// Fully serialized request, ready to write.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    head: String,
    body: Vec<u8>,
}

impl Request {
    /// Resolve the method, encode the body and serialize the head for `target`.
    pub fn build(target: &Target, options: &RequestOptions) -> Result<Self, CurlError> {
        let body = EncodedBody::encode(&options.body)?;
        let method = Method::resolve(
            options.custom_method.as_deref(),
            options.head_only,
            !options.body.is_none(),
        );
        Ok(Self::from_parts(method, target, options, body))
    }

    /// Serialize with an already resolved method and encoded body.
    pub fn from_parts(
        method: Method,
        target: &Target,
        options: &RequestOptions,
        body: EncodedBody,
    ) -> Self {
        let mut head = String::new();
        head.push_str(method.as_str());
        head.push(' ');
        head.push_str(target.path());
        head.push_str(" HTTP/1.1\r\n");
        push_header(&mut head, "Host", target.host());
        push_header(&mut head, "User-Agent", &options.user_agent);
        push_header(&mut head, "Accept", "*/*");
        if !body.bytes.is_empty() {
            if let Some(ct) = &body.content_type {
                push_header(&mut head, "Content-Type", ct);
            }
            push_header(&mut head, "Content-Length", &body.bytes.len().to_string());
        }
        if let Some(cookie) = options.cookie.as_deref().filter(|c| !c.is_empty()) {
            push_header(&mut head, "Cookie", cookie);
        }
        for line in &options.headers {
            head.push_str(line);
            head.push_str("\r\n");
        }
        if let Some(credentials) = options.credentials.as_deref().filter(|c| !c.is_empty()) {
            let auth = format!("Basic {}", BASE64.encode(credentials.as_bytes()));
            push_header(&mut head, "Authorization", &auth);
        }
        push_header(&mut head, "Connection", "close");
        head.push_str("\r\n");
        Self {
            method,
            head,
            body: body.bytes,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request line and headers including the terminating blank line.
    pub fn head(&self) -> &str {
        &self.head
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

fn push_header(out: &mut String, name: &str, value: &str) {
    out.push_str(name);
    out.push_str(": ");
    out.push_str(value);
    out.push_str("\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MultipartPart, PartSource};

    fn target() -> Target {
        Target::parse("example.com")
    }

    fn options() -> RequestOptions {
        RequestOptions {
            user_agent: "test-agent/1.0".to_string(),
            ..RequestOptions::default()
        }
    }

    fn content_length(head: &str) -> Option<usize> {
        head.split("\r\n")
            .find_map(|l| l.strip_prefix("Content-Length: "))
            .map(|v| v.parse().unwrap())
    }

    #[test]
    fn method_precedence_all_combinations() {
        for custom in [None, Some("put")] {
            for head_only in [false, true] {
                for has_body in [false, true] {
                    let m = Method::resolve(custom, head_only, has_body);
                    let expected = if custom.is_some() {
                        Method::Custom("PUT".to_string())
                    } else if head_only {
                        Method::Head
                    } else if has_body {
                        Method::Post
                    } else {
                        Method::Get
                    };
                    assert_eq!(m, expected, "custom={:?} head={} body={}", custom, head_only, has_body);
                }
            }
        }
    }

    #[test]
    fn custom_method_is_upper_cased() {
        assert_eq!(Method::resolve(Some("propfind"), false, false).as_str(), "PROPFIND");
        assert_eq!(Method::resolve(Some("head"), false, true), Method::Head);
        assert!(Method::resolve(Some("head"), false, false).is_head());
        assert_eq!(Method::resolve(Some(""), false, false), Method::Get);
    }

    #[test]
    fn default_get_head_block() {
        let req = Request::build(&target(), &options()).unwrap();
        assert_eq!(
            req.head(),
            "GET / HTTP/1.1\r\nHost: example.com\r\nUser-Agent: test-agent/1.0\r\n\
             Accept: */*\r\nConnection: close\r\n\r\n"
        );
        assert!(req.body().is_empty());
    }

    #[test]
    fn post_data_sets_type_and_length() {
        let mut opts = options();
        opts.body = BodyDescriptor::Data(vec!["a=1".to_string(), "b=2".to_string()]);
        let req = Request::build(&target(), &opts).unwrap();
        assert_eq!(req.method(), &Method::Post);
        assert_eq!(req.body(), b"a=1&b=2");
        assert_eq!(
            req.head(),
            "POST / HTTP/1.1\r\nHost: example.com\r\nUser-Agent: test-agent/1.0\r\nAccept: */*\r\n\
             Content-Type: application/x-www-form-urlencoded\r\nContent-Length: 7\r\n\
             Connection: close\r\n\r\n"
        );
    }

    #[test]
    fn empty_data_is_post_without_body_headers() {
        let mut opts = options();
        opts.body = BodyDescriptor::Data(vec![String::new()]);
        let req = Request::build(&target(), &opts).unwrap();
        assert_eq!(req.method(), &Method::Post);
        assert!(!req.head().contains("Content-Type"));
        assert!(!req.head().contains("Content-Length"));
    }

    #[test]
    fn header_order_with_everything_set() {
        let mut opts = options();
        opts.cookie = Some("session=abc".to_string());
        opts.headers = vec![
            "X-One: 1".to_string(),
            "X-One: 1".to_string(),
            "not even a header".to_string(),
        ];
        opts.credentials = Some("user:pass".to_string());
        opts.body = BodyDescriptor::Data(vec!["raw".to_string()]);
        let req = Request::build(&target(), &opts).unwrap();
        let lines: Vec<&str> = req.head().split("\r\n").collect();
        assert_eq!(
            lines,
            vec![
                "POST / HTTP/1.1",
                "Host: example.com",
                "User-Agent: test-agent/1.0",
                "Accept: */*",
                "Content-Type: application/x-www-form-urlencoded",
                "Content-Length: 3",
                "Cookie: session=abc",
                "X-One: 1",
                "X-One: 1",
                "not even a header",
                "Authorization: Basic dXNlcjpwYXNz",
                "Connection: close",
                "",
                "",
            ]
        );
    }

    #[test]
    fn content_length_matches_body_on_every_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.dat");
        std::fs::write(&path, vec![7u8; 1234]).unwrap();

        let bodies = vec![
            BodyDescriptor::None,
            BodyDescriptor::Data(vec!["k=v w".to_string(), "x".to_string()]),
            BodyDescriptor::Data(vec!["verbatim".to_string(), "é".to_string()]),
            BodyDescriptor::Multipart(vec![
                MultipartPart {
                    name: "f".to_string(),
                    source: PartSource::File(path.clone()),
                },
                MultipartPart {
                    name: "v".to_string(),
                    source: PartSource::Value("value".to_string()),
                },
            ]),
        ];
        for body in bodies {
            let mut opts = options();
            opts.body = body;
            let req = Request::build(&target(), &opts).unwrap();
            match content_length(req.head()) {
                Some(len) => assert_eq!(len, req.body().len()),
                None => assert!(req.body().is_empty()),
            }
        }
    }

    #[test]
    fn multipart_content_type_carries_boundary() {
        let mut opts = options();
        opts.body = BodyDescriptor::Multipart(vec![MultipartPart {
            name: "n".to_string(),
            source: PartSource::Value("v".to_string()),
        }]);
        let req = Request::build(&target(), &opts).unwrap();
        let ct = req
            .head()
            .split("\r\n")
            .find_map(|l| l.strip_prefix("Content-Type: "))
            .unwrap();
        let boundary = ct.strip_prefix("multipart/form-data; boundary=").unwrap();
        let body = std::str::from_utf8(req.body()).unwrap();
        assert!(body.starts_with(&format!("--{}\r\n", boundary)));
        assert!(body.ends_with(&format!("\r\n--{}--\r\n", boundary)));
    }

    #[test]
    fn unreadable_multipart_file_fails_build() {
        let mut opts = options();
        opts.body = BodyDescriptor::Multipart(vec![MultipartPart {
            name: "f".to_string(),
            source: PartSource::File("/nonexistent/upload.bin".into()),
        }]);
        assert!(matches!(
            Request::build(&target(), &opts),
            Err(CurlError::Input(_))
        ));
    }

    #[test]
    fn head_only_request() {
        let mut opts = options();
        opts.head_only = true;
        let req = Request::build(&target(), &opts).unwrap();
        assert!(req.head().starts_with("HEAD / HTTP/1.1\r\n"));
        assert!(req.method().is_head());
    }
}
