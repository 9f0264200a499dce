//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port. reqwest's own redirect
//! handling is switched off so every hop can be recorded: the terminal
//! response links back to each redirect it passed through, and only the
//! terminal body is read.

use std::error::Error as StdError;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method};
use url::Url;
use witness_application::ports::{Clock, HttpClient, HttpClientError};
use witness_domain::{
    Certificate, Handshake, Headers, HttpMethod, Request, Response, ResponseBody, StatusCode,
};

use crate::adapters::SystemClock;
use crate::config::ClientConfig;

/// HTTP client implementation using reqwest.
pub struct ReqwestHttpClient {
    client: Client,
    config: ClientConfig,
    clock: Arc<dyn Clock>,
}

impl ReqwestHttpClient {
    /// Creates a client with [`ClientConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> Result<Self, HttpClientError> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn with_config(config: ClientConfig) -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .tls_info(true)
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self {
            client,
            config,
            clock: Arc::new(SystemClock::new()),
        })
    }

    /// Replaces the clock used to stamp sent/received times.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Options => Method::OPTIONS,
        }
    }

    async fn send(&self, request: &Request) -> Result<reqwest::Response, HttpClientError> {
        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), request.url.clone());

        for header in &request.headers {
            builder = builder.header(header.name.as_str(), header.value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        builder.send().await.map_err(|e| self.map_error(&e))
    }

    /// Resolves a `Location` header against the URL that returned it.
    ///
    /// Returns `None` for unparseable targets and non-http(s) schemes.
    fn redirect_target(base: &Url, location: Option<&str>) -> Option<Url> {
        let target = base.join(location?).ok()?;
        matches!(target.scheme(), "http" | "https").then_some(target)
    }

    fn headers(response: &reqwest::Response) -> Headers {
        let mut headers = Headers::new();
        for (name, value) in response.headers() {
            headers.add(
                name.as_str(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            );
        }
        headers
    }

    fn handshake(response: &reqwest::Response) -> Option<Handshake> {
        let info = response.extensions().get::<reqwest::tls::TlsInfo>()?;
        Some(peer_handshake(info.peer_certificate()?))
    }

    /// Maps reqwest errors to `HttpClientError`.
    fn map_error(&self, error: &reqwest::Error) -> HttpClientError {
        let message = error_chain(error);
        let lowercase = message.to_lowercase();
        let host = error
            .url()
            .and_then(|u| u.host_str())
            .unwrap_or("unknown")
            .to_string();

        if error.is_timeout() {
            #[allow(clippy::cast_possible_truncation)]
            let timeout_ms = self.config.timeout.as_millis() as u64;
            return HttpClientError::Timeout { timeout_ms };
        }

        if error.is_connect() {
            if lowercase.contains("dns") || lowercase.contains("resolve") {
                return HttpClientError::DnsError { host, message };
            }
            if lowercase.contains("refused") {
                let port = error
                    .url()
                    .and_then(Url::port_or_known_default)
                    .unwrap_or(80);
                return HttpClientError::ConnectionRefused { host, port };
            }
            if lowercase.contains("certificate") || lowercase.contains("tls") {
                return HttpClientError::Tls(message);
            }
            return HttpClientError::ConnectionFailed(message);
        }

        if error.is_body() || error.is_decode() {
            return HttpClientError::InvalidBody(message);
        }

        if error.is_builder() && caused_by_url(error) {
            return HttpClientError::InvalidUrl(message);
        }

        HttpClientError::Other(message)
    }
}

/// Builds the handshake for a server's leaf certificate.
///
/// reqwest exposes the certificate only, so the cipher suite stays unset.
/// The peer principal is the certificate subject when the DER parses.
fn peer_handshake(der: &[u8]) -> Handshake {
    let subject = x509_parser::parse_x509_certificate(der)
        .ok()
        .map(|(_, cert)| cert.subject().to_string());

    let mut certificate = Certificate::from_der(der);
    if let Some(subject) = &subject {
        certificate = certificate.with_subject(subject.clone());
    }
    Handshake {
        peer_principal: subject,
        peer_certificates: vec![certificate],
        ..Handshake::default()
    }
}

fn caused_by_url(error: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(cause) = current {
        if cause.is::<url::ParseError>() {
            return true;
        }
        current = cause.source();
    }
    false
}

/// Joins an error and its sources, since reqwest's top-level message
/// rarely says what went wrong.
fn error_chain(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: &Request) -> Result<Response, HttpClientError> {
        let mut current = request.clone();
        let mut prior: Option<Response> = None;
        let mut redirects = 0;

        loop {
            let sent_at = self.clock.now();
            let raw = self.send(&current).await?;
            let received_at = self.clock.now();

            let status = StatusCode::new(raw.status().as_u16());
            let mut hop = Response::new(current.clone(), status)
                .with_headers(Self::headers(&raw))
                .with_timestamps(sent_at, received_at);
            if let Some(reason) = raw.status().canonical_reason() {
                hop = hop.with_message(reason);
            }
            if let Some(handshake) = Self::handshake(&raw) {
                hop = hop.with_handshake(handshake);
            }
            if let Some(previous) = prior.take() {
                hop = hop.with_prior_response(previous);
            }

            let target = if self.config.follow_redirects && hop.is_redirect() {
                Self::redirect_target(&current.url, hop.header("Location"))
            } else {
                None
            };

            let Some(target) = target else {
                let content_type = hop.header("Content-Type").map(str::to_string);
                let bytes = raw.bytes().await.map_err(|e| self.map_error(&e))?;
                tracing::debug!(
                    url = %current.url,
                    status = status.as_u16(),
                    redirects,
                    bytes = bytes.len(),
                    "received response"
                );
                return Ok(hop.with_body(ResponseBody::new(bytes.to_vec(), content_type)));
            };

            redirects += 1;
            if redirects > self.config.max_redirects {
                tracing::warn!(
                    url = %request.url,
                    max = self.config.max_redirects,
                    "redirect limit exceeded"
                );
                return Err(HttpClientError::TooManyRedirects {
                    max: self.config.max_redirects,
                });
            }

            let method = current.method.after_redirect(status);
            tracing::debug!(from = %current.url, to = %target, %method, "following redirect");
            current = current.redirected(method, target);
            prior = Some(hop.without_body());
        }
    }
}
