use cwrc_entity_lookup::{build_search_uri, EntityType, ProjectCatalog};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

/// Property-based tests for search URI construction
mod search_uri_props {
    use super::*;

    fn entity_type() -> impl Strategy<Value = EntityType> {
        prop::sample::select(EntityType::ALL.to_vec())
    }

    fn encoded_query(uri: &str) -> &str {
        let start = uri.find("?query=").expect("query parameter") + "?query=".len();
        let end = uri.rfind("&limit=").expect("limit parameter");
        &uri[start..end]
    }

    proptest! {
        #[test]
        fn test_query_round_trips_through_encoding(
            query in any::<String>(),
            entity_type in entity_type(),
        ) {
            let uri = build_search_uri("https://beta.cwrc.ca", &query, entity_type);
            let encoded = encoded_query(&uri);
            let decoded = urlencoding::decode(encoded).expect("valid utf-8");
            prop_assert_eq!(&*decoded, query.as_str());
        }

        #[test]
        fn test_encoded_query_has_no_reserved_characters(
            query in ".*",
            entity_type in entity_type(),
        ) {
            let uri = build_search_uri("", &query, entity_type);
            let encoded = encoded_query(&uri);
            prop_assert!(
                encoded
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "-_.~%".contains(c)),
                "unexpected character in {}",
                encoded
            );
        }

        #[test]
        fn test_uri_shape(
            root in "(https?://[a-z]{1,10}\\.ca)?",
            query in "[a-z ]{0,20}",
            entity_type in entity_type(),
        ) {
            let uri = build_search_uri(&root, &query, entity_type);
            let prefix = format!("{root}/search/{entity_type}?query=");
            prop_assert!(uri.starts_with(&prefix));
            prop_assert!(uri.ends_with("&limit=100&page=0"));
        }
    }
}

/// Property-based tests for catalog construction
mod catalog_props {
    use super::*;

    proptest! {
        #[test]
        fn test_first_logo_per_namespace_wins(namespaces in prop::collection::vec("[a-c]", 1..20)) {
            let mut document = Map::new();
            for (i, namespace) in namespaces.iter().enumerate() {
                document.insert(
                    format!("p{i}"),
                    json!({
                        "field_logo": { "und": [ { "filename": format!("logo-{i}.png") } ] },
                        "field_top_level_collection": {
                            "und": [ { "pid": format!("{namespace}:root") } ]
                        }
                    }),
                );
            }

            let catalog = ProjectCatalog::from_json(&Value::Object(document), None);
            for namespace in &namespaces {
                let first = namespaces.iter().position(|n| n == namespace).unwrap();
                let expected = format!("logo-{first}.png");
                prop_assert_eq!(catalog.logo_filename(namespace), Some(expected.as_str()));
            }
        }
    }
}
