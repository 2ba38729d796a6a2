/*
 * connection.rs
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

//! HTTP connection: one TCP or TLS stream to the first candidate address that accepts.
//!
//! Candidates are tried strictly in order, one at a time. Each attempt is bounded by the dial
//! timeout (and the overall timeout, if set). Once connected, the overall timeout becomes one
//! absolute deadline shared by the request write and the whole read loop.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use rustls::pki_types::ServerName;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, ReadBuf};
use tokio::net::TcpStream;
use tokio::time::{timeout_at, Instant};
use tokio_rustls::client::TlsStream as TokioTlsStream;
use tokio_rustls::TlsConnector;

use crate::config::ConnectionConfig;
use crate::error::CurlError;
use crate::net::tls_client_config;
use crate::protocol::http::request::Request;
use crate::protocol::http::response::{read_response, Response};
use crate::protocol::http::HeaderSink;

/// Unified stream: plain TCP or TLS. Implements AsyncRead + AsyncWrite.
pub enum HttpStream {
    Plain(TcpStream),
    Tls(TokioTlsStream<TcpStream>),
}

impl AsyncRead for HttpStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match &mut *self {
            HttpStream::Plain(s) => Pin::new(s).poll_read(cx, buf),
            HttpStream::Tls(s) => Pin::new(s).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for HttpStream {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match &mut *self {
            HttpStream::Plain(s) => Pin::new(s).poll_write(cx, buf),
            HttpStream::Tls(s) => Pin::new(s).poll_write(cx, buf),
        }
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match &mut *self {
            HttpStream::Plain(s) => Pin::new(s).poll_flush(cx),
            HttpStream::Tls(s) => Pin::new(s).poll_flush(cx),
        }
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match &mut *self {
            HttpStream::Plain(s) => Pin::new(s).poll_shutdown(cx),
            HttpStream::Tls(s) => Pin::new(s).poll_shutdown(cx),
        }
    }
}

/// Absolute point in time after which pending I/O fails with `TimedOut`. `none()` never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    pub fn none() -> Self {
        Self { at: None }
    }

    /// Deadline `timeout` from now, or none. A timeout too large to represent never fires.
    pub fn after(timeout: Option<Duration>) -> Self {
        Self {
            at: timeout.and_then(|t| Instant::now().checked_add(t)),
        }
    }

    /// The earlier of two deadlines; `none()` loses to any set deadline.
    pub fn earlier(self, other: Deadline) -> Deadline {
        match (self.at, other.at) {
            (Some(a), Some(b)) => Self { at: Some(a.min(b)) },
            (Some(a), None) | (None, Some(a)) => Self { at: Some(a) },
            (None, None) => Self::none(),
        }
    }

    /// Run `fut`, failing with `TimedOut` if the deadline passes first.
    pub async fn run<T, F>(&self, fut: F) -> io::Result<T>
    where
        F: Future<Output = io::Result<T>>,
    {
        match self.at {
            Some(at) => timeout_at(at, fut).await.map_err(|_| {
                io::Error::new(io::ErrorKind::TimedOut, "operation deadline exceeded")
            })?,
            None => fut.await,
        }
    }
}

/// Result of scanning the candidate list.
pub enum Established<T> {
    Connected {
        addr: SocketAddr,
        stream: T,
        attempts: usize,
    },
    Exhausted {
        attempts: usize,
    },
}

/// Try `attempt` on each candidate in order; stop at the first success. Failures are
/// reported and only advance the scan.
pub async fn scan_candidates<T, F, Fut>(candidates: &[SocketAddr], mut attempt: F) -> Established<T>
where
    F: FnMut(SocketAddr) -> Fut,
    Fut: Future<Output = io::Result<T>>,
{
    let mut attempts = 0;
    for &addr in candidates {
        attempts += 1;
        tracing::info!("Trying address: {}", addr.ip());
        match attempt(addr).await {
            Ok(stream) => {
                tracing::info!("Connected to {}", addr.ip());
                return Established::Connected {
                    addr,
                    stream,
                    attempts,
                };
            }
            Err(source) => {
                tracing::warn!("{}", CurlError::Connection { addr, source });
            }
        }
    }
    Established::Exhausted { attempts }
}

/// SNI / verification name: the target hostname, or the dialed address when the hostname
/// is not a valid DNS name.
fn server_name(host: &str, addr: SocketAddr) -> ServerName<'static> {
    match ServerName::try_from(host) {
        Ok(name) => name.to_owned(),
        Err(_) => ServerName::IpAddress(addr.ip().into()),
    }
}

async fn dial(addr: SocketAddr, host: &str, tls: Option<&TlsConnector>) -> io::Result<HttpStream> {
    let tcp = TcpStream::connect(addr).await?;
    match tls {
        None => Ok(HttpStream::Plain(tcp)),
        Some(connector) => {
            let stream = connector.connect(server_name(host, addr), tcp).await?;
            Ok(HttpStream::Tls(stream))
        }
    }
}

/// HTTP connection: owns the stream and the shared I/O deadline. Used for one request.
pub struct HttpConnection {
    stream: HttpStream,
    peer: SocketAddr,
    deadline: Deadline,
}

impl HttpConnection {
    /// Connect to the first reachable candidate in `config`.
    ///
    /// The TLS config (and client certificate) is prepared before the first dial; a failure
    /// there aborts without trying any address.
    pub async fn establish(host: &str, config: &ConnectionConfig) -> Result<Self, CurlError> {
        let options = config.options();
        let connector = if options.use_tls() {
            let tls = tls_client_config(options.insecure, options.client_cert.as_deref())?;
            Some(TlsConnector::from(tls))
        } else {
            None
        };
        let connector = connector.as_ref();
        let dial_timeout = options.dial_timeout();
        let total_timeout = options.total_timeout;

        let scanned = scan_candidates(&config.socket_addrs(), move |addr| async move {
            let limit = Deadline::after(total_timeout).earlier(Deadline::after(Some(dial_timeout)));
            limit.run(dial(addr, host, connector)).await
        })
        .await;

        match scanned {
            Established::Connected { addr, stream, .. } => Ok(Self {
                stream,
                peer: addr,
                deadline: Deadline::after(total_timeout),
            }),
            Established::Exhausted { attempts } => {
                Err(CurlError::ConnectionExhausted { attempts })
            }
        }
    }

    /// Write the head, then the body, under the shared deadline.
    pub async fn send(&mut self, request: &Request) -> Result<(), CurlError> {
        let deadline = self.deadline;
        deadline
            .run(self.stream.write_all(request.head().as_bytes()))
            .await
            .map_err(|e| CurlError::transport("Failed to send request headers", e))?;
        if !request.body().is_empty() {
            deadline
                .run(self.stream.write_all(request.body()))
                .await
                .map_err(|e| CurlError::transport("Failed to send request body", e))?;
        }
        deadline
            .run(self.stream.flush())
            .await
            .map_err(|e| CurlError::transport("Failed to send request", e))?;
        Ok(())
    }

    /// Run the read loop on this connection.
    pub async fn read_response(
        &mut self,
        head_only: bool,
        sink: Option<&mut dyn HeaderSink>,
    ) -> Response {
        read_response(&mut self.stream, self.deadline, head_only, sink).await
    }

    /// Shut the stream down (TLS close_notify, TCP FIN) and drop it.
    pub async fn close(mut self) {
        if let Err(e) = self.deadline.run(self.stream.shutdown()).await {
            tracing::debug!("shutdown of {} failed: {}", self.peer, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectOptions;
    use std::cell::Cell;
    use std::net::IpAddr;

    fn addrs(n: u8) -> Vec<SocketAddr> {
        (1..=n)
            .map(|i| SocketAddr::new(IpAddr::from([10, 0, 0, i]), 80))
            .collect()
    }

    #[tokio::test]
    async fn scan_stops_at_first_success() {
        for k in 0..4usize {
            let candidates = addrs(4);
            let tried = Cell::new(Vec::new());
            let result = scan_candidates(&candidates, |addr| {
                let mut seen = tried.take();
                seen.push(addr);
                let n = seen.len();
                tried.set(seen);
                async move {
                    if n <= k {
                        Err(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"))
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;
            let tried = tried.take();
            assert_eq!(tried, candidates[..k + 1].to_vec());
            match result {
                Established::Connected {
                    addr,
                    stream,
                    attempts,
                } => {
                    assert_eq!(addr, candidates[k]);
                    assert_eq!(stream, k + 1);
                    assert_eq!(attempts, k + 1);
                }
                Established::Exhausted { .. } => panic!("expected a connection"),
            }
        }
    }

    #[tokio::test]
    async fn scan_exhausts_when_all_fail() {
        let candidates = addrs(3);
        let calls = Cell::new(0);
        let result: Established<()> = scan_candidates(&candidates, |_| {
            calls.set(calls.get() + 1);
            async { Err(io::Error::new(io::ErrorKind::TimedOut, "timed out")) }
        })
        .await;
        assert_eq!(calls.get(), 3);
        assert!(matches!(result, Established::Exhausted { attempts: 3 }));
    }

    #[tokio::test]
    async fn empty_candidate_list_is_exhausted() {
        let result: Established<()> =
            scan_candidates(&[], |_| async { Ok(()) }).await;
        assert!(matches!(result, Established::Exhausted { attempts: 0 }));
    }

    #[test]
    fn earlier_deadline_wins() {
        let soon = Deadline::after(Some(Duration::from_millis(10)));
        let later = Deadline::after(Some(Duration::from_secs(60)));
        assert_eq!(soon.earlier(later).at, soon.at);
        assert_eq!(later.earlier(soon).at, soon.at);
        assert_eq!(Deadline::none().earlier(later).at, later.at);
        assert_eq!(later.earlier(Deadline::none()).at, later.at);
        assert!(Deadline::none().earlier(Deadline::none()).at.is_none());
    }

    #[test]
    fn unrepresentable_timeout_never_fires() {
        let d = Deadline::after(Some(Duration::from_secs(u64::MAX)));
        assert!(d.at.is_none());
        let set = Deadline::after(Some(Duration::from_secs(1)));
        assert_eq!(d.earlier(set).at, set.at);
    }

    #[tokio::test]
    async fn huge_timeouts_still_connect() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let options = ConnectOptions {
            connect_timeout: Some(Duration::from_secs(u64::MAX / 2)),
            total_timeout: Some(Duration::from_secs(u64::MAX)),
            plain_port: port,
            ..ConnectOptions::default()
        };
        let config = ConnectionConfig::new(vec![IpAddr::from([127, 0, 0, 1])], options);
        let connection = HttpConnection::establish("localhost", &config).await.unwrap();
        assert_eq!(connection.peer.port(), port);
        assert!(connection.deadline.at.is_none());
        connection.close().await;
    }

    #[test]
    fn server_name_falls_back_to_address() {
        let addr: SocketAddr = "192.0.2.7:443".parse().unwrap();
        assert!(matches!(server_name("example.com", addr), ServerName::DnsName(_)));
        assert!(matches!(server_name("bad_host name", addr), ServerName::IpAddress(_)));
    }

    #[tokio::test]
    async fn bad_certificate_aborts_before_dialing() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let options = ConnectOptions {
            client_cert: Some("/nonexistent/client.pem".into()),
            tls_port: port,
            ..ConnectOptions::default()
        };
        let config = ConnectionConfig::new(vec![IpAddr::from([127, 0, 0, 1])], options);
        let err = HttpConnection::establish("localhost", &config).await.err().unwrap();
        assert!(matches!(err, CurlError::Certificate { .. }));
        let accepted = tokio::time::timeout(Duration::from_millis(100), listener.accept()).await;
        assert!(accepted.is_err(), "a connection was attempted");
    }

    #[tokio::test]
    async fn dial_timeout_bounds_each_attempt() {
        // 192.0.2.0/24 (TEST-NET-1) is not routed; the attempt fails by timeout or at once.
        let options = ConnectOptions {
            connect_timeout: Some(Duration::from_millis(100)),
            ..ConnectOptions::default()
        };
        let config = ConnectionConfig::new(vec![IpAddr::from([192, 0, 2, 1])], options);
        let started = std::time::Instant::now();
        let err = HttpConnection::establish("example.invalid", &config)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, CurlError::ConnectionExhausted { attempts: 1 }));
        assert!(started.elapsed() < Duration::from_secs(3));
    }
}
