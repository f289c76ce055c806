use super::{EntityRecord, EntityType};
use crate::Result;
use async_trait::async_trait;

/// Source of normalized entity records
#[async_trait]
pub trait EntityLookup: Send + Sync {
    /// Unique name/identifier for this source
    fn name(&self) -> &str;

    /// Search one entity type, records in the order the source returned them
    async fn search(&self, query: &str, entity_type: EntityType) -> Result<Vec<EntityRecord>>;

    async fn find_person(&self, query: &str) -> Result<Vec<EntityRecord>> {
        self.search(query, EntityType::Person).await
    }

    async fn find_place(&self, query: &str) -> Result<Vec<EntityRecord>> {
        self.search(query, EntityType::Place).await
    }

    async fn find_organization(&self, query: &str) -> Result<Vec<EntityRecord>> {
        self.search(query, EntityType::Organization).await
    }

    async fn find_title(&self, query: &str) -> Result<Vec<EntityRecord>> {
        self.search(query, EntityType::Title).await
    }
}
