use super::EntityType;

/// Fixed page size requested from the search service
pub const SEARCH_LIMIT: u32 = 100;

/// Build the search URL for `query` against the `entity_type` endpoint.
///
/// The query is percent-encoded as a URI component. An empty `search_root`
/// is allowed and yields a root-relative path.
#[must_use]
pub fn build_search_uri(search_root: &str, query: &str, entity_type: EntityType) -> String {
    format!(
        "{search_root}/search/{entity_type}?query={}&limit={SEARCH_LIMIT}&page=0",
        urlencoding::encode(query)
    )
}
