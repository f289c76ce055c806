//! # Project catalog
//!
//! Maps a repository namespace to the logo file of the project that owns
//! it. The catalog is built from the project metadata document, a JSON
//! object whose values look like:
//!
//! ```json
//! {
//!   "field_logo": { "und": [ { "filename": "reed.png" } ] },
//!   "field_top_level_collection": { "und": [ { "pid": "reed:root" } ] }
//! }
//! ```
//!
//! Every field is optional and entries of the wrong shape are skipped, so a
//! partly broken document still yields a catalog of whatever is usable.

use super::namespace_of;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Namespace given to projects rooted at the special project id
pub const CWRC_NAMESPACE: &str = "cwrc";

/// Snapshot of namespace to logo filename
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectCatalog {
    logos: BTreeMap<String, String>,
}

impl ProjectCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from the project metadata document.
    ///
    /// Entries are visited in document order and the first logo recorded
    /// for a namespace wins.
    #[must_use]
    pub fn from_json(document: &Value, cwrc_project_id: Option<&str>) -> Self {
        let entries: Box<dyn Iterator<Item = &Value> + '_> = match document {
            Value::Object(map) => Box::new(map.values()),
            Value::Array(items) => Box::new(items.iter()),
            _ => Box::new(std::iter::empty()),
        };

        let mut catalog = Self::new();
        for entry in entries {
            let (Some(filename), Some(namespace)) = (
                entry_logo_filename(entry),
                entry_namespace(entry, cwrc_project_id),
            ) else {
                continue;
            };

            if catalog.logos.contains_key(&namespace) {
                debug!("Ignoring duplicate logo '{}' for '{}'", filename, namespace);
                continue;
            }
            catalog.logos.insert(namespace, filename.to_string());
        }
        catalog
    }

    /// Logo filename for `namespace`
    #[must_use]
    pub fn logo_filename(&self, namespace: &str) -> Option<&str> {
        self.logos.get(namespace).map(String::as_str)
    }

    /// Full logo URL for an entity id, if its namespace has a logo
    #[must_use]
    pub fn logo_url(&self, logo_root: &str, id: &str) -> Option<String> {
        let filename = self.logo_filename(namespace_of(id)?)?;
        Some(format!("{logo_root}/{filename}"))
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.logos.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.logos.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.logos.is_empty()
    }
}

/// First filename of each logo list, keeping the last list that has one.
///
/// A list whose first item has no filename is skipped and does not clear a
/// filename found in an earlier list.
fn entry_logo_filename(entry: &Value) -> Option<&str> {
    let lists: Box<dyn Iterator<Item = &Value> + '_> = match entry.get("field_logo")? {
        Value::Object(map) => Box::new(map.values()),
        Value::Array(items) => Box::new(items.iter()),
        _ => return None,
    };

    lists
        .filter_map(Value::as_array)
        .filter_map(|items| items.first()?.get("filename")?.as_str())
        .last()
}

fn entry_namespace(entry: &Value, cwrc_project_id: Option<&str>) -> Option<String> {
    let pid = entry
        .get("field_top_level_collection")?
        .get("und")?
        .as_array()?
        .first()?
        .get("pid")?
        .as_str()?;

    if cwrc_project_id == Some(pid) {
        return Some(CWRC_NAMESPACE.to_string());
    }
    namespace_of(pid).map(str::to_string)
}
