//! Record shapes exchanged with a repository server.
//!
//! # Design
//! The transport is generic over any serde type; these records and the two
//! aliases below are the shapes the server's listing endpoints return. The
//! mock server defines its own copies, and integration tests catch any drift
//! between the two.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codec::gmt_date;

/// A repository as listed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner: String,
    #[serde(with = "gmt_date")]
    pub last_change: DateTime<Utc>,
    #[serde(with = "gmt_date::option", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub frozen: bool,
}

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub can_admin: bool,
    #[serde(default)]
    pub repositories: Vec<String>,
}

/// Repositories keyed by their clone URL.
pub type RepositoryMap = BTreeMap<String, Repository>;

/// All user accounts.
pub type UserCollection = Vec<User>;

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::codec::{decode, encode};

    #[test]
    fn repository_uses_gmt_dates_and_camel_case() {
        let repo = Repository {
            name: "tools.git".to_string(),
            description: "build tooling".to_string(),
            owner: "admin".to_string(),
            last_change: Utc.with_ymd_and_hms(2011, 6, 15, 10, 30, 0).unwrap(),
            created_at: None,
            frozen: false,
        };
        let json: serde_json::Value = serde_json::from_str(&encode(&repo).unwrap()).unwrap();
        assert_eq!(json["lastChange"], "2011-06-15T10:30:00Z");
        assert!(json.get("createdAt").is_none());
    }

    #[test]
    fn repository_map_decodes() {
        let text = r#"{
            "https://host/git/tools.git": {
                "name": "tools.git",
                "lastChange": "2011-06-15T10:30:00Z",
                "createdAt": "2010-01-02T03:04:05Z"
            }
        }"#;
        let repos: RepositoryMap = decode(text).unwrap();
        let repo = &repos["https://host/git/tools.git"];
        assert_eq!(repo.name, "tools.git");
        assert_eq!(
            repo.created_at,
            Some(Utc.with_ymd_and_hms(2010, 1, 2, 3, 4, 5).unwrap())
        );
        assert!(!repo.frozen);
    }

    #[test]
    fn user_collection_defaults_optional_fields() {
        let users: UserCollection = decode(r#"[{"username": "alice"}]"#).unwrap();
        assert_eq!(users[0].username, "alice");
        assert!(users[0].display_name.is_none());
        assert!(users[0].repositories.is_empty());
    }
}
