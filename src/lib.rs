pub mod client;
pub mod config;
pub mod error;
pub mod resilience;

pub use client::{
    build_search_uri, fetch_json_with_timeout, fetch_with_timeout, EntityLookup,
    EntityLookupClient, EntityRecord, EntityType, FetchOptions, HttpClientConfig, ProjectCatalog,
};
pub use config::{LookupConfig, ProjectLookupConfig};
pub use error::{Error, Result};
pub use resilience::{TimeoutConfig, TimeoutExt};
