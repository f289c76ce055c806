use super::catalog::ProjectCatalog;
use super::fetch::{fetch_json_with_timeout, FetchOptions};
use super::traits::EntityLookup;
use super::uri::build_search_uri;
use super::{EntityRecord, EntityType, HttpClientConfig, REPOSITORY};
use crate::config::{LookupConfig, ProjectLookupConfig};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Lookup client for the CWRC repository.
///
/// Owns its configuration and the current project catalog snapshot. Clones
/// share both, so a setter called through one clone is seen by the others.
#[derive(Clone)]
pub struct EntityLookupClient {
    http_client: Client,
    config: Arc<RwLock<LookupConfig>>,
    catalog: Arc<RwLock<Arc<ProjectCatalog>>>,
}

impl std::fmt::Debug for EntityLookupClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityLookupClient")
            .field("http_client", &"reqwest::Client")
            .field("config", &"RwLock<LookupConfig>")
            .field("catalog", &"RwLock<Arc<ProjectCatalog>>")
            .finish()
    }
}

impl EntityLookupClient {
    /// Create a client with the default HTTP settings
    pub fn new(config: LookupConfig) -> Result<Self> {
        Ok(Self::with_http_client(config, HttpClientConfig::default().build()?))
    }

    /// Create a client on top of an existing HTTP client
    #[must_use]
    pub fn with_http_client(config: LookupConfig, http_client: Client) -> Self {
        Self {
            http_client,
            config: Arc::new(RwLock::new(config)),
            catalog: Arc::new(RwLock::new(Arc::new(ProjectCatalog::new()))),
        }
    }

    /// Copy of the current configuration
    pub async fn config(&self) -> LookupConfig {
        self.config.read().await.clone()
    }

    pub async fn set_entity_root(&self, url: impl Into<String>) {
        self.config.write().await.entity_root = url.into();
    }

    pub async fn entity_root(&self) -> String {
        self.config.read().await.entity_root.clone()
    }

    pub async fn set_search_root(&self, url: impl Into<String>) {
        self.config.write().await.search_root = url.into();
    }

    pub async fn search_root(&self) -> String {
        self.config.read().await.search_root.clone()
    }

    pub async fn set_project_logo_root(&self, url: impl Into<String>) {
        self.config.write().await.project_logo_root = url.into();
    }

    pub async fn project_logo_root(&self) -> String {
        self.config.read().await.project_logo_root.clone()
    }

    pub async fn set_timeout(&self, timeout: Duration) {
        let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self.config.write().await.timeout_ms = millis;
    }

    pub async fn timeout(&self) -> Duration {
        self.config.read().await.timeout()
    }

    /// Store the project lookup section and refresh the catalog from it.
    ///
    /// A non-empty logo root in the section replaces the client's project
    /// logo root. An empty one is filled from the client's current root.
    pub async fn set_project_lookup_config(
        &self,
        mut project_lookup: ProjectLookupConfig,
    ) -> Result<Arc<ProjectCatalog>> {
        {
            let mut config = self.config.write().await;
            if project_lookup.project_logo_root.is_empty() {
                project_lookup
                    .project_logo_root
                    .clone_from(&config.project_logo_root);
            } else {
                config
                    .project_logo_root
                    .clone_from(&project_lookup.project_logo_root);
            }
            config.project_lookup = Some(project_lookup);
        }
        self.refresh_project_catalog().await
    }

    /// Point the catalog at a new URL, keeping any special project id
    /// already configured, and refresh it.
    pub async fn set_project_lookup_uri(
        &self,
        url: impl Into<String>,
    ) -> Result<Arc<ProjectCatalog>> {
        {
            let mut config = self.config.write().await;
            let logo_root = config.project_logo_root.clone();
            let project_lookup = config
                .project_lookup
                .get_or_insert_with(|| ProjectLookupConfig {
                    project_logo_root: logo_root,
                    ..ProjectLookupConfig::default()
                });
            project_lookup.project_lookup_url = url.into();
        }
        self.refresh_project_catalog().await
    }

    /// Refresh the catalog from the configured project lookup URL
    pub async fn refresh_project_catalog(&self) -> Result<Arc<ProjectCatalog>> {
        let url = self
            .config
            .read()
            .await
            .project_lookup
            .as_ref()
            .map(|p| p.project_lookup_url.clone())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| Error::InvalidInput {
                field: "project_lookup_url".to_string(),
                reason: "no project lookup URL configured".to_string(),
            })?;

        self.refresh_project_catalog_from(&url).await
    }

    /// Fetch the project document at `source_url` and swap in the catalog
    /// built from it. On any failure the previous snapshot stays in place.
    pub async fn refresh_project_catalog_from(
        &self,
        source_url: &str,
    ) -> Result<Arc<ProjectCatalog>> {
        let (timeout, cwrc_project_id) = {
            let config = self.config.read().await;
            (config.timeout(), config.cwrc_project_id().map(str::to_string))
        };

        let options = FetchOptions::default().with_timeout(timeout);
        let document: Value = fetch_json_with_timeout(&self.http_client, source_url, &options)
            .await
            .map_err(|e| {
                warn!("Project lookup failed: {}", e);
                e
            })?;

        let catalog = Arc::new(ProjectCatalog::from_json(
            &document,
            cwrc_project_id.as_deref(),
        ));
        *self.catalog.write().await = Arc::clone(&catalog);

        info!("Project catalog refreshed: {} namespaces", catalog.len());
        Ok(catalog)
    }

    /// Current catalog snapshot
    pub async fn project_catalog(&self) -> Arc<ProjectCatalog> {
        Arc::clone(&*self.catalog.read().await)
    }

    pub async fn lookup_uri(&self, query: &str, entity_type: EntityType) -> String {
        build_search_uri(&self.config.read().await.search_root, query, entity_type)
    }

    pub async fn person_lookup_uri(&self, query: &str) -> String {
        self.lookup_uri(query, EntityType::Person).await
    }

    pub async fn place_lookup_uri(&self, query: &str) -> String {
        self.lookup_uri(query, EntityType::Place).await
    }

    pub async fn organization_lookup_uri(&self, query: &str) -> String {
        self.lookup_uri(query, EntityType::Organization).await
    }

    pub async fn title_lookup_uri(&self, query: &str) -> String {
        self.lookup_uri(query, EntityType::Title).await
    }
}

#[async_trait]
impl EntityLookup for EntityLookupClient {
    fn name(&self) -> &str {
        "cwrc"
    }

    async fn search(&self, query: &str, entity_type: EntityType) -> Result<Vec<EntityRecord>> {
        let start_time = Instant::now();
        let config = self.config().await;

        info!("Searching CWRC for: {} (type: {})", query, entity_type);
        let url = build_search_uri(&config.search_root, query, entity_type);

        let options = FetchOptions::default().with_timeout(config.timeout());
        let body: Value = fetch_json_with_timeout(&self.http_client, &url, &options).await?;

        let catalog = self.project_catalog().await;
        let records = normalize_records(&body, query, entity_type, &config, &catalog);

        info!(
            "CWRC search completed: {} records in {:?}",
            records.len(),
            start_time.elapsed()
        );
        Ok(records)
    }
}

/// Map the `response.objects` list of a search body to normalized records.
///
/// A missing list means no results. Hits without a string `PID` are
/// skipped; a label that is not a string becomes an empty name.
fn normalize_records(
    body: &Value,
    query: &str,
    entity_type: EntityType,
    config: &LookupConfig,
    catalog: &ProjectCatalog,
) -> Vec<EntityRecord> {
    let Some(objects) = body
        .get("response")
        .and_then(|response| response.get("objects"))
        .and_then(Value::as_array)
    else {
        debug!("Search response has no result list");
        return Vec::new();
    };

    objects
        .iter()
        .filter_map(|raw| {
            let Some(id) = raw.get("PID").and_then(Value::as_str) else {
                debug!("Skipping search hit without a PID: {}", raw);
                return None;
            };
            let name = raw
                .get("object_label")
                .and_then(Value::as_str)
                .unwrap_or_default();

            let uri = format!("{}/{}", config.entity_root, id);
            Some(EntityRecord {
                id: id.to_string(),
                uri_for_display: uri.clone(),
                uri,
                name: name.to_string(),
                name_type: entity_type,
                repository: REPOSITORY.to_string(),
                original_query_string: query.to_string(),
                logo: catalog.logo_url(&config.project_logo_root, id),
            })
        })
        .collect()
}
