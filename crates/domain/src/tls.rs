//! TLS handshake types.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// TLS protocol version.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TlsVersion {
    /// TLS 1.0 (deprecated)
    #[serde(rename = "1.0")]
    Tls10,
    /// TLS 1.1 (deprecated)
    #[serde(rename = "1.1")]
    Tls11,
    /// TLS 1.2
    #[serde(rename = "1.2")]
    #[default]
    Tls12,
    /// TLS 1.3
    #[serde(rename = "1.3")]
    Tls13,
}

/// An X.509 certificate presented during a handshake.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Certificate {
    /// DER encoding.
    pub der: Vec<u8>,
    /// Subject distinguished name, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl Certificate {
    /// Wraps a DER-encoded certificate.
    #[must_use]
    pub fn from_der(der: impl Into<Vec<u8>>) -> Self {
        Self {
            der: der.into(),
            subject: None,
        }
    }

    /// Sets the subject name.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Encodes the certificate as PEM.
    #[must_use]
    pub fn to_pem(&self) -> String {
        let encoded = STANDARD.encode(&self.der);
        let mut pem = String::from("-----BEGIN CERTIFICATE-----\n");
        for line in encoded.as_bytes().chunks(64) {
            // base64 output is ASCII
            pem.push_str(&String::from_utf8_lossy(line));
            pem.push('\n');
        }
        pem.push_str("-----END CERTIFICATE-----\n");
        pem
    }
}

/// Negotiated parameters of a TLS session.
///
/// The peer is the server; the local side is this client. A one-way
/// handshake has a peer identity and no local identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Handshake {
    /// Negotiated cipher suite (e.g., "`TLS_AES_128_GCM_SHA256`").
    #[serde(default)]
    pub cipher_suite: Option<String>,
    /// Negotiated protocol version.
    #[serde(default)]
    pub tls_version: Option<TlsVersion>,
    /// Server identity.
    #[serde(default)]
    pub peer_principal: Option<String>,
    /// Server certificate chain, leaf first.
    #[serde(default)]
    pub peer_certificates: Vec<Certificate>,
    /// Client identity, for mutual TLS.
    #[serde(default)]
    pub local_principal: Option<String>,
    /// Client certificate chain, for mutual TLS.
    #[serde(default)]
    pub local_certificates: Vec<Certificate>,
}

impl Handshake {
    /// Builds a one-way handshake: the server presented `certificate`, the
    /// client presented nothing.
    #[must_use]
    pub fn server_authenticated(
        cipher_suite: impl Into<String>,
        peer_principal: impl Into<String>,
        certificate: Certificate,
    ) -> Self {
        Self {
            cipher_suite: Some(cipher_suite.into()),
            tls_version: None,
            peer_principal: Some(peer_principal.into()),
            peer_certificates: vec![certificate],
            local_principal: None,
            local_certificates: Vec::new(),
        }
    }

    /// Sets the protocol version.
    #[must_use]
    pub const fn with_tls_version(mut self, version: TlsVersion) -> Self {
        self.tls_version = Some(version);
        self
    }

    /// Adds a client certificate and identity, turning this into mutual TLS.
    #[must_use]
    pub fn with_local_certificate(
        mut self,
        principal: impl Into<String>,
        certificate: Certificate,
    ) -> Self {
        self.local_principal = Some(principal.into());
        self.local_certificates.push(certificate);
        self
    }

    /// Returns true if the client authenticated too.
    #[must_use]
    pub fn is_mutual(&self) -> bool {
        self.local_principal.is_some() || !self.local_certificates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tls_version_default() {
        assert_eq!(TlsVersion::default(), TlsVersion::Tls12);
    }

    #[test]
    fn test_tls_version_serde_names() {
        assert_eq!(
            serde_json::to_string(&TlsVersion::Tls13).ok(),
            Some("\"1.3\"".to_string())
        );
    }

    #[test]
    fn test_server_authenticated_shape() {
        let handshake = Handshake::server_authenticated(
            "TLS_AES_128_GCM_SHA256",
            "CN=localhost",
            Certificate::from_der(vec![1, 2, 3]),
        )
        .with_tls_version(TlsVersion::Tls13);

        assert_eq!(handshake.peer_certificates.len(), 1);
        assert!(!handshake.is_mutual());

        let mutual = handshake.with_local_certificate("CN=client", Certificate::from_der(vec![4]));
        assert!(mutual.is_mutual());
    }

    #[test]
    fn test_certificate_to_pem_wraps_lines() {
        let pem = Certificate::from_der(vec![0u8; 60]).to_pem();
        let lines: Vec<&str> = pem.lines().collect();

        assert_eq!(lines.first(), Some(&"-----BEGIN CERTIFICATE-----"));
        assert_eq!(lines.last(), Some(&"-----END CERTIFICATE-----"));
        // 60 bytes encode to 80 base64 characters
        assert_eq!(lines[1].len(), 64);
        assert_eq!(lines[2].len(), 16);
    }
}
