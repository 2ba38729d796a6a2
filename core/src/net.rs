/*
 * net.rs
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

//! TLS client configuration: root store, optional client certificate, optional insecure mode.
//!
//! The config is built once per invocation, before any address is dialed, so a bad client
//! certificate aborts without touching the network.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{verify_tls12_signature, verify_tls13_signature, CryptoProvider};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};

use crate::error::CurlError;

/// Build a root certificate store: platform native certs first, then webpki-roots as fallback.
fn build_root_store() -> RootCertStore {
    let mut root_store = RootCertStore::empty();
    match rustls_native_certs::load_native_certs() {
        Ok(certs) => {
            for cert in certs {
                let _ = root_store.add(cert);
            }
        }
        Err(e) => {
            tracing::debug!("native root certificates unavailable: {}", e);
        }
    }
    if root_store.is_empty() {
        root_store.roots = webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect();
    }
    root_store
}

/// Client certificate chain and private key, read from one PEM file.
pub struct ClientIdentity {
    certs: Vec<CertificateDer<'static>>,
    key: PrivateKeyDer<'static>,
}

impl ClientIdentity {
    /// Load certificate(s) and the first private key from `path`. Both must be present.
    pub fn load(path: &Path) -> Result<Self, CurlError> {
        let fail = |reason: String| CurlError::Certificate {
            path: path.to_path_buf(),
            reason,
        };
        let pem = fs::read(path).map_err(|e| fail(e.to_string()))?;
        let certs = rustls_pemfile::certs(&mut pem.as_slice())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| fail(e.to_string()))?;
        if certs.is_empty() {
            return Err(fail("no certificate found".to_string()));
        }
        let key = rustls_pemfile::private_key(&mut pem.as_slice())
            .map_err(|e| fail(e.to_string()))?
            .ok_or_else(|| fail("no private key found".to_string()))?;
        Ok(Self { certs, key })
    }

    pub fn chain_len(&self) -> usize {
        self.certs.len()
    }
}

/// Accepts any server certificate (`-k`). Handshake signatures are still checked so the
/// session keys are bound to whatever key the server presented.
#[derive(Debug)]
struct AcceptAnyServerCert {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for AcceptAnyServerCert {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}

/// TLS client config for one invocation. The client certificate, if any, is loaded here,
/// exactly once.
pub fn tls_client_config(
    insecure: bool,
    client_cert: Option<&Path>,
) -> Result<Arc<ClientConfig>, CurlError> {
    let identity = client_cert.map(ClientIdentity::load).transpose()?;

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let builder = ClientConfig::builder_with_provider(provider.clone())
        .with_safe_default_protocol_versions()?;
    let builder = if insecure {
        builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AcceptAnyServerCert { provider }))
    } else {
        builder.with_root_certificates(build_root_store())
    };
    let config = match (identity, client_cert) {
        (Some(identity), Some(path)) => {
            tracing::info!(
                "Using client certificate {} ({} in chain)",
                path.display(),
                identity.chain_len()
            );
            builder
                .with_client_auth_cert(identity.certs, identity.key)
                .map_err(|e| CurlError::Certificate {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?
        }
        _ => builder.with_no_client_auth(),
    };
    Ok(Arc::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn insecure_config_builds_without_certificate() {
        assert!(tls_client_config(true, None).is_ok());
    }

    #[test]
    fn missing_certificate_file_is_a_certificate_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.pem");
        let err = tls_client_config(true, Some(&path)).err().unwrap();
        assert!(matches!(err, CurlError::Certificate { .. }));
    }

    #[test]
    fn pem_without_certificate_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not a pem file").unwrap();
        match ClientIdentity::load(file.path()) {
            Err(CurlError::Certificate { reason, .. }) => {
                assert_eq!(reason, "no certificate found")
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("garbage accepted as identity"),
        }
    }

    #[test]
    fn certificate_without_key_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        // Structurally valid PEM block; contents are not checked until the handshake.
        writeln!(file, "-----BEGIN CERTIFICATE-----").unwrap();
        writeln!(file, "AAECAwQFBgcICQ==").unwrap();
        writeln!(file, "-----END CERTIFICATE-----").unwrap();
        match ClientIdentity::load(file.path()) {
            Err(CurlError::Certificate { reason, .. }) => {
                assert_eq!(reason, "no private key found")
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("certificate without key accepted"),
        }
    }
}
