//! Blocking JSON transport for talking to a repository server.
//!
//! # Overview
//! Fetches JSON documents with GET and pushes them with POST, optionally
//! with HTTP Basic authentication, over plain HTTP or over TLS with a
//! configurable trust policy. Statuses 401, 403, 405 and 501 are raised as
//! dedicated errors so callers can react to them without parsing messages.
//!
//! # Design
//! - `Transport` is built once from a `TransportConfig` and cloned freely;
//!   the TLS configuration inside it never changes after construction.
//! - Requests are described as plain `HttpRequest` data before execution,
//!   so header rules are testable without a server.
//! - `codec` owns the JSON format: pretty-printed output and a whole-second
//!   UTC wire format for dates (`codec::gmt_date`).
//! - An empty response body decodes to `None`, never to an error.

pub mod auth;
pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod tls;
pub mod transport;
pub mod types;

pub use auth::Credentials;
pub use config::TransportConfig;
pub use error::{CodecError, Result, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use tls::{default_crypto_provider, TrustPolicy};
pub use transport::Transport;
pub use types::{Repository, RepositoryMap, User, UserCollection};
