use cwrc_entity_lookup::{EntityLookup, EntityLookupClient, EntityType, Error, LookupConfig};
use std::time::Duration;

#[tokio::test]
async fn test_config_default() {
    let config = LookupConfig::default();
    assert_eq!(config.timeout_ms, 8000);
    assert!(config.search_root.is_empty());
    assert!(config.project_lookup.is_none());
}

#[tokio::test]
async fn test_unconfigured_client_builds_root_relative_uri() {
    let client = EntityLookupClient::new(LookupConfig::default()).unwrap();
    assert_eq!(
        client.title_lookup_uri("hamlet").await,
        "/search/title?query=hamlet&limit=100&page=0"
    );
}

#[tokio::test]
async fn test_unreachable_service_fails_fast() {
    let config = LookupConfig {
        // Reserved port on loopback; connection is refused
        search_root: "http://127.0.0.1:9".to_string(),
        timeout_ms: 2000,
        ..LookupConfig::default()
    };
    let client = EntityLookupClient::new(config).unwrap();

    let lookup = client.search("john", EntityType::Person);
    let result = tokio::time::timeout(Duration::from_secs(5), lookup)
        .await
        .expect("lookup should settle within its own timeout");
    assert!(matches!(result, Err(Error::Http(_) | Error::Timeout { .. })));
}

#[test]
fn test_error_chain() {
    let err = Error::InvalidInput {
        field: "entity_type".to_string(),
        reason: "unknown entity type 'planet'".to_string(),
    };
    assert_eq!(
        format!("{}", err),
        "Invalid input: entity_type - unknown entity type 'planet'"
    );
}

#[test]
fn test_entity_type_parse_error() {
    let err = "planet".parse::<EntityType>().unwrap_err();
    assert!(matches!(err, Error::InvalidInput { ref field, .. } if field == "entity_type"));
}
