pub mod catalog;
pub mod fetch;
pub mod lookup;
pub mod traits;
pub mod uri;

pub use catalog::ProjectCatalog;
pub use fetch::{fetch_json_with_timeout, fetch_with_timeout, FetchOptions};
pub use lookup::EntityLookupClient;
pub use traits::EntityLookup;
pub use uri::build_search_uri;

use crate::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Repository tag stamped on every normalized record
pub const REPOSITORY: &str = "CWRC";

/// HTTP client configuration for the lookup endpoints
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Connection timeout duration
    pub connect_timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Keep cookies between requests, so session credentials for the
    /// repository origin are sent along with lookups
    pub cookie_store: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            user_agent: concat!("cwrc-entity-lookup/", env!("CARGO_PKG_VERSION")).to_string(),
            cookie_store: true,
        }
    }
}

impl HttpClientConfig {
    /// Build a reqwest client. Request deadlines are enforced per call by the
    /// timed fetch, not by the client.
    pub fn build(&self) -> Result<Client> {
        let client = Client::builder()
            .connect_timeout(self.connect_timeout)
            .user_agent(&self.user_agent)
            .cookie_store(self.cookie_store)
            .gzip(true)
            .build()?;
        Ok(client)
    }
}

/// Kind of entity searched for; selects the search endpoint variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Person,
    Place,
    Organization,
    Title,
}

impl EntityType {
    pub const ALL: [Self; 4] = [Self::Person, Self::Place, Self::Organization, Self::Title];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Place => "place",
            Self::Organization => "organization",
            Self::Title => "title",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "person" => Ok(Self::Person),
            "place" => Ok(Self::Place),
            "organization" => Ok(Self::Organization),
            "title" => Ok(Self::Title),
            other => Err(crate::Error::InvalidInput {
                field: "entity_type".to_string(),
                reason: format!("unknown entity type '{other}'"),
            }),
        }
    }
}

/// Normalized search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRecord {
    /// Repository PID, e.g. `cwrc:1234`
    pub id: String,
    pub uri: String,
    pub uri_for_display: String,
    pub name: String,
    pub name_type: EntityType,
    pub repository: String,
    pub original_query_string: String,
    /// Project logo URL, only when the id's namespace has a catalog entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl EntityRecord {
    /// Portion of the id before its first colon, if non-empty
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        namespace_of(&self.id)
    }
}

/// Substring before the first colon; `None` when there is no colon or the
/// prefix is empty
pub(crate) fn namespace_of(id: &str) -> Option<&str> {
    match id.split_once(':') {
        Some((prefix, _)) if !prefix.is_empty() => Some(prefix),
        _ => None,
    }
}
