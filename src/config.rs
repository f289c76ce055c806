//! # Lookup configuration
//!
//! Root URLs and the project-lookup section consumed by
//! [`EntityLookupClient`](crate::EntityLookupClient). Values layer as
//! defaults, then an optional file, then `CWRC_LOOKUP_*` environment
//! variables. Nothing is validated beyond its type; an empty root simply
//! produces URIs with an empty root segment.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Default maximum wait for any single request
pub const DEFAULT_TIMEOUT_MS: u64 = 8000;

const ENV_PREFIX: &str = "CWRC_LOOKUP";

/// Adapter configuration, owned by one client instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Prefix for entity URIs, joined to the PID with `/`
    pub entity_root: String,
    /// Root of the search service
    pub search_root: String,
    /// Prefix for project logo URLs, joined to the filename with `/`
    pub project_logo_root: String,
    /// Project metadata lookup, if the catalog should be used
    pub project_lookup: Option<ProjectLookupConfig>,
    /// Maximum wait per request in milliseconds
    pub timeout_ms: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            entity_root: String::new(),
            search_root: String::new(),
            project_logo_root: String::new(),
            project_lookup: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Where the project catalog comes from and how its ids are normalized
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectLookupConfig {
    pub project_lookup_url: String,
    pub project_logo_root: String,
    /// Top-level collection PID that stands for the repository itself.
    /// Projects rooted there are filed under the `cwrc` namespace.
    pub cwrc_project_id: Option<String>,
}

impl LookupConfig {
    /// Load configuration from defaults, an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            debug!("Loading lookup configuration from {}", path.display());
            builder = builder.add_source(config::File::from(path));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Special project id from the project-lookup section, if any
    pub fn cwrc_project_id(&self) -> Option<&str> {
        self.project_lookup
            .as_ref()
            .and_then(|p| p.cwrc_project_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = LookupConfig::default();
        assert!(config.search_root.is_empty());
        assert!(config.entity_root.is_empty());
        assert!(config.project_lookup.is_none());
        assert_eq!(config.timeout(), Duration::from_millis(8000));
        assert_eq!(config.cwrc_project_id(), None);
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
search_root = "https://beta.cwrc.ca"
entity_root = "https://commons.cwrc.ca"
timeout_ms = 2500

[project_lookup]
project_lookup_url = "https://beta.cwrc.ca/projects.json"
project_logo_root = "https://beta.cwrc.ca/sites/default/files"
cwrc_project_id = "cwrc:cwrc"
"#
        )
        .unwrap();

        let config = LookupConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.search_root, "https://beta.cwrc.ca");
        assert_eq!(config.entity_root, "https://commons.cwrc.ca");
        assert_eq!(config.timeout(), Duration::from_millis(2500));
        assert_eq!(config.cwrc_project_id(), Some("cwrc:cwrc"));
        assert_eq!(
            config.project_lookup.unwrap().project_lookup_url,
            "https://beta.cwrc.ca/projects.json"
        );
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = LookupConfig::load(Some(Path::new("/nonexistent/cwrc-lookup.toml")));
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }
}
