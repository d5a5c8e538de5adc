//! Basic authentication credentials.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// A username and secret sent as an HTTP Basic `Authorization` header.
///
/// Only constructible with both fields non-empty, so holding a
/// `Credentials` always means the header will be sent.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    secret: String,
}

impl Credentials {
    /// Returns `None` when either `username` or `secret` is empty.
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Option<Self> {
        let username = username.into();
        let secret = secret.into();
        if username.is_empty() || secret.is_empty() {
            return None;
        }
        Some(Self { username, secret })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// `Basic <base64(username:secret)>`.
    pub fn basic_header_value(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.secret));
        format!("Basic {token}")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_mean_no_credentials() {
        assert!(Credentials::new("", "secret").is_none());
        assert!(Credentials::new("admin", "").is_none());
        assert!(Credentials::new("", "").is_none());
    }

    #[test]
    fn basic_header_encodes_user_and_secret() {
        let creds = Credentials::new("admin", "admin").unwrap();
        assert_eq!(creds.basic_header_value(), "Basic YWRtaW46YWRtaW4=");
    }

    #[test]
    fn secret_may_contain_colons() {
        let creds = Credentials::new("alice", "p:w").unwrap();
        assert_eq!(creds.basic_header_value(), "Basic YWxpY2U6cDp3");
    }

    #[test]
    fn debug_hides_secret() {
        let creds = Credentials::new("alice", "hunter2").unwrap();
        let debug = format!("{creds:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }
}
