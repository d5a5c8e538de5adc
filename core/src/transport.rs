//! Blocking JSON transport over HTTP(S).
//!
//! # Design
//! `Transport` owns one ureq agent built from a validated `TransportConfig`.
//! The agent carries the TLS trust policy and timeouts, is immutable after
//! construction, and is shared by clones, so concurrent calls read the same
//! configuration without locking. Each call opens its own round-trip.
//!
//! Every operation is split into `build_*`, which produces an `HttpRequest`
//! with all headers decided, and `execute`, which performs the I/O. Failures
//! are classified on the numeric status the agent reports; the agent is
//! configured not to turn statuses into errors and not to follow redirects.

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use rustls::crypto::CryptoProvider;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use ureq::{Agent, RequestBuilder};

use crate::auth::Credentials;
use crate::codec;
use crate::config::TransportConfig;
use crate::error::{Result, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::tls::default_crypto_provider;

pub const CHARSET: &str = "UTF-8";

/// Size of the buffer the response body is read through.
const READ_CHUNK: usize = 4096;

/// Synchronous fetch/send client for JSON documents.
#[derive(Clone)]
pub struct Transport {
    agent: Agent,
    config: TransportConfig,
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport").field("config", &self.config).finish()
    }
}

impl Transport {
    /// Validate `config` and build the agent and its TLS configuration.
    ///
    /// Call this once at startup; an error here means the process cannot
    /// talk to the server at all.
    pub fn new(config: TransportConfig) -> Result<Self> {
        Self::with_crypto_provider(config, default_crypto_provider())
    }

    /// Like `new`, with TLS built on an explicit rustls `provider`.
    pub fn with_crypto_provider(config: TransportConfig, provider: Arc<CryptoProvider>) -> Result<Self> {
        config.validate()?;
        let tls = config.trust.tls_config(provider)?;
        let agent = Agent::config_builder()
            .tls_config(tls)
            .timeout_connect(Some(config.connect_timeout()))
            .timeout_global(Some(config.timeout()))
            .http_status_as_error(false)
            .max_redirects(0)
            .build()
            .new_agent();
        debug!(trust = ?config.trust, "transport ready");
        Ok(Self { agent, config })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// The GET request `fetch_text` would send.
    pub fn build_fetch(&self, url: &str, credentials: Option<&Credentials>) -> HttpRequest {
        let mut headers = vec![("Accept-Charset".to_string(), CHARSET.to_string())];
        self.common_headers(&mut headers, credentials);
        HttpRequest {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers,
            body: None,
        }
    }

    /// The POST request `send_text` would send, carrying `text` as UTF-8.
    pub fn build_send(&self, url: &str, text: &str, credentials: Option<&Credentials>) -> HttpRequest {
        let body = text.as_bytes().to_vec();
        let mut headers = vec![
            (
                "Content-Type".to_string(),
                format!("text/plain; charset={CHARSET}"),
            ),
            ("Content-Length".to_string(), body.len().to_string()),
        ];
        self.common_headers(&mut headers, credentials);
        HttpRequest {
            method: HttpMethod::Post,
            url: url.to_string(),
            headers,
            body: Some(body),
        }
    }

    fn common_headers(&self, headers: &mut Vec<(String, String)>, credentials: Option<&Credentials>) {
        headers.push(("Cache-Control".to_string(), "no-cache".to_string()));
        headers.push(("Pragma".to_string(), "no-cache".to_string()));
        if let Some(agent) = &self.config.user_agent {
            headers.push(("User-Agent".to_string(), agent.clone()));
        }
        if let Some(credentials) = credentials {
            headers.push(("Authorization".to_string(), credentials.basic_header_value()));
        }
    }

    /// Perform the round-trip for `request`.
    ///
    /// Any status is returned as data. The body is read for GET requests
    /// only; send responses come back with an empty body.
    pub fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");
        let url = request.url.as_str();
        let result = match (request.method, &request.body) {
            (HttpMethod::Get, _) => apply_headers(self.agent.get(url), &request.headers).call(),
            (HttpMethod::Post, Some(body)) => {
                apply_headers(self.agent.post(url), &request.headers).send(body.as_slice())
            }
            (HttpMethod::Post, None) => {
                apply_headers(self.agent.post(url), &request.headers).send_empty()
            }
        };
        let mut response = result.map_err(|e| TransportError::from_ureq(url, e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = match request.method {
            HttpMethod::Get => read_body(response.body_mut().as_reader())?,
            HttpMethod::Post => String::new(),
        };
        debug!(status, bytes = body.len(), url = %request.url, "response received");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    /// GET `url` and return the body as text. An empty body is returned as
    /// an empty string.
    pub fn fetch_text(&self, url: &str, credentials: Option<&Credentials>) -> Result<String> {
        let response = self.execute(&self.build_fetch(url, credentials))?;
        if !response.is_success() {
            return Err(rejected(url, response.status));
        }
        Ok(response.body)
    }

    /// POST `text` to `url` and return the response status.
    ///
    /// 401, 403, 405 and 501 are raised as their classified errors; every
    /// other status is returned as is.
    pub fn send_text(&self, url: &str, text: &str, credentials: Option<&Credentials>) -> Result<u16> {
        let response = self.execute(&self.build_send(url, text, credentials))?;
        match response.status {
            401 | 403 | 405 | 501 => Err(rejected(url, response.status)),
            status => Ok(status),
        }
    }

    /// GET `url` and decode the body as `T`.
    ///
    /// Returns `Ok(None)` when the server answers with an empty body.
    pub fn fetch_typed<T: DeserializeOwned>(
        &self,
        url: &str,
        credentials: Option<&Credentials>,
    ) -> Result<Option<T>> {
        let text = self.fetch_text(url, credentials)?;
        if text.is_empty() {
            return Ok(None);
        }
        Ok(Some(codec::decode(&text)?))
    }

    /// Encode `value` and POST it to `url`, returning the response status.
    pub fn send_typed<T: Serialize + ?Sized>(
        &self,
        url: &str,
        value: &T,
        credentials: Option<&Credentials>,
    ) -> Result<u16> {
        let text = codec::encode(value)?;
        self.send_text(url, &text, credentials)
    }
}

fn apply_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn read_body(mut reader: impl Read) -> Result<String> {
    let mut buffer = [0u8; READ_CHUNK];
    let mut bytes = Vec::new();
    loop {
        let len = reader.read(&mut buffer)?;
        if len == 0 {
            break;
        }
        bytes.extend_from_slice(&buffer[..len]);
    }
    Ok(String::from_utf8(bytes)?)
}

fn rejected(url: &str, status: u16) -> TransportError {
    let err = TransportError::from_status(url, status);
    warn!(url, status, "request rejected: {err}");
    err
}
