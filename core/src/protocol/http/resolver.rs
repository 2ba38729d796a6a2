/*
 * resolver.rs
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

//! Hostname resolution. Addresses are returned in resolver order, duplicates included.

use std::future::Future;
use std::io;
use std::net::IpAddr;

/// Turns a hostname into candidate addresses.
pub trait Resolver {
    fn resolve(&self, host: &str) -> impl Future<Output = io::Result<Vec<IpAddr>>>;
}

/// System resolver (getaddrinfo via tokio's blocking pool).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl Resolver for SystemResolver {
    async fn resolve(&self, host: &str) -> io::Result<Vec<IpAddr>> {
        let addrs: Vec<IpAddr> = tokio::net::lookup_host((host, 0))
            .await?
            .map(|a| a.ip())
            .collect();
        if addrs.is_empty() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such host"));
        }
        Ok(addrs)
    }
}

/// Fixed address list, whatever the hostname.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    addrs: Vec<IpAddr>,
}

impl StaticResolver {
    pub fn new(addrs: Vec<IpAddr>) -> Self {
        Self { addrs }
    }
}

impl Resolver for StaticResolver {
    async fn resolve(&self, _host: &str) -> io::Result<Vec<IpAddr>> {
        if self.addrs.is_empty() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such host"));
        }
        Ok(self.addrs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn system_resolver_handles_ip_literals() {
        let addrs = SystemResolver.resolve("127.0.0.1").await.unwrap();
        assert_eq!(addrs, vec![IpAddr::from([127, 0, 0, 1])]);
    }

    #[tokio::test]
    async fn static_resolver_keeps_order_and_duplicates() {
        let a = IpAddr::from([10, 0, 0, 2]);
        let b = IpAddr::from([10, 0, 0, 1]);
        let r = StaticResolver::new(vec![a, b, a]);
        assert_eq!(r.resolve("anything").await.unwrap(), vec![a, b, a]);
        assert!(StaticResolver::default().resolve("x").await.is_err());
    }
}
