//! Interfaces to the content-management host.
//!
//! The compiler never talks to a CMS directly. Everything it needs (content
//! records, feature detection, the live route registry) comes through [`Host`],
//! so a deployment can back it with a database, an HTTP client or, as the CLI
//! does, a static [`SiteSnapshot`](crate::snapshot::SiteSnapshot).

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::Result;

/// Optional host feature whose presence changes the generated catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Structured custom fields (ACF). Drives the rich-metadata projection.
    CustomFields,
    /// SEO head metadata (Yoast).
    SeoMetadata,
    /// Multilingual content (Polylang and friends).
    Multilingual,
    /// Companion forms handler exposing form records over REST.
    FormsHandler,
    /// E-commerce extension (WooCommerce).
    Ecommerce,
}

/// Content store record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: u64,
    pub slug: String,
    #[serde(default)]
    pub title: String,
    /// JSON-encoded field configuration; only set on form records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields_config: Option<String>,
}

/// Custom content type registered with the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentType {
    pub name: String,
    /// REST collection segment; falls back to `name` when absent.
    #[serde(default)]
    pub rest_base: Option<String>,
    /// Plural display label.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub singular_label: Option<String>,
}

impl ContentType {
    pub fn rest_base(&self) -> &str {
        self.rest_base
            .as_deref()
            .filter(|b| !b.is_empty())
            .unwrap_or(&self.name)
    }

    pub fn plural_label(&self) -> String {
        self.label
            .clone()
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| crate::utils::ucfirst(&self.name))
    }

    pub fn singular_label(&self) -> String {
        self.singular_label
            .clone()
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| self.plural_label())
    }
}

/// Configured option group (options page).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionGroup {
    pub slug: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Filter for [`Host::list_content_items`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentQuery {
    /// Restrict to these slugs; empty means no restriction.
    pub slugs: Vec<String>,
    /// Only published records.
    pub published_only: bool,
}

impl ContentQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_slugs(slugs: &[String]) -> Self {
        Self {
            slugs: slugs.to_vec(),
            published_only: false,
        }
    }

    pub fn published() -> Self {
        Self {
            slugs: Vec::new(),
            published_only: true,
        }
    }
}

/// Declared schema of one route argument.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArgSchema {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub default: Option<JsonValue>,
    #[serde(rename = "enum", default)]
    pub variants: Option<Vec<JsonValue>>,
}

/// One handler entry of a registered route pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEndpoint {
    #[serde(deserialize_with = "methods::deserialize")]
    pub methods: Vec<String>,
    #[serde(default)]
    pub args: IndexMap<String, ArgSchema>,
    /// `None` counts as visible; only an explicit `false` hides the route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_in_index: Option<bool>,
}

impl RouteEndpoint {
    pub fn is_visible(&self) -> bool {
        self.show_in_index != Some(false)
    }
}

/// Route registry snapshot: pattern to handler entries, in registration order.
pub type RouteTable = IndexMap<String, Vec<RouteEndpoint>>;

/// Accept every shape the registry emits for `methods`: a list, the
/// `"GET, POST"` string, the index's `{"GET": true}` map, or the server bitmask.
mod methods {
    use indexmap::IndexMap;
    use serde::{Deserialize, Deserializer};

    /// Bit per verb, as the REST server packs them.
    const BITMASK: [(u64, &str); 5] = [
        (1, "GET"),
        (2, "POST"),
        (4, "PUT"),
        (8, "PATCH"),
        (16, "DELETE"),
    ];

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        List(Vec<String>),
        Joined(String),
        Flags(IndexMap<String, bool>),
        Bitmask(u64),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        let raw = match Repr::deserialize(deserializer)? {
            Repr::List(list) => list,
            Repr::Joined(joined) => joined.split(',').map(str::to_string).collect(),
            Repr::Flags(flags) => flags
                .into_iter()
                .filter(|(_, enabled)| *enabled)
                .map(|(method, _)| method)
                .collect(),
            Repr::Bitmask(mask) => from_bitmask(mask),
        };
        Ok(raw
            .into_iter()
            .map(|m| m.trim().to_ascii_uppercase())
            .filter(|m| !m.is_empty())
            .collect())
    }

    pub(super) fn from_bitmask(mask: u64) -> Vec<String> {
        BITMASK
            .iter()
            .filter(|(bit, _)| mask & bit == *bit)
            .map(|(_, method)| method.to_string())
            .collect()
    }
}

/// Data the document compiler needs from the host CMS.
///
/// Implementations must be safe for concurrent reads if the host serves
/// several generations at once; the compiler itself never writes through it.
pub trait Host {
    /// Records of `kind` (`page`, `post`, `category`, a custom type name, ...).
    fn list_content_items(&self, kind: &str, query: &ContentQuery) -> Result<Vec<ContentItem>>;

    fn is_capability_active(&self, capability: Capability) -> bool;

    /// Site locale in host notation, e.g. `en_US`.
    fn default_locale(&self) -> String;

    fn configured_option_groups(&self) -> Result<Vec<OptionGroup>>;

    /// Live route registry. Read fresh for every generation.
    fn registered_routes(&self) -> Result<RouteTable>;

    fn resolve_base_url(&self) -> String;

    /// Custom content types exposed over REST, built-ins included.
    fn content_types(&self) -> Result<Vec<ContentType>>;

    fn site_name(&self) -> String;

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_methods_accept_both_forms() {
        let list: RouteEndpoint =
            serde_json::from_value(json!({"methods": ["get", "POST"]})).unwrap();
        assert_eq!(list.methods, vec!["GET", "POST"]);

        let joined: RouteEndpoint =
            serde_json::from_value(json!({"methods": "GET, PUT, PATCH"})).unwrap();
        assert_eq!(joined.methods, vec!["GET", "PUT", "PATCH"]);
        assert!(joined.is_visible());
    }

    #[test]
    fn test_endpoint_methods_from_index_map() {
        let flags: RouteEndpoint =
            serde_json::from_value(json!({"methods": {"GET": true, "POST": true, "PUT": false}}))
                .unwrap();
        assert_eq!(flags.methods, vec!["GET", "POST"]);

        let yaml: RouteEndpoint = serde_yaml::from_str("methods: {get: true, delete: true}").unwrap();
        assert_eq!(yaml.methods, vec!["GET", "DELETE"]);
    }

    #[test]
    fn test_endpoint_methods_from_bitmask() {
        let readable: RouteEndpoint = serde_json::from_value(json!({"methods": 1})).unwrap();
        assert_eq!(readable.methods, vec!["GET"]);

        // 2 | 4 | 8: the server's EDITABLE mask
        let editable: RouteEndpoint = serde_json::from_value(json!({"methods": 14})).unwrap();
        assert_eq!(editable.methods, vec!["POST", "PUT", "PATCH"]);
        assert_eq!(methods::from_bitmask(31).len(), 5);
        assert!(methods::from_bitmask(0).is_empty());
    }

    #[test]
    fn test_content_type_fallbacks() {
        let ty = ContentType {
            name: "book".into(),
            rest_base: None,
            label: Some("Books".into()),
            singular_label: None,
        };
        assert_eq!(ty.rest_base(), "book");
        assert_eq!(ty.plural_label(), "Books");
        assert_eq!(ty.singular_label(), "Books");
    }

    #[test]
    fn test_capability_names() {
        let cap: Capability = serde_json::from_value(json!("forms_handler")).unwrap();
        assert_eq!(cap, Capability::FormsHandler);
    }
}
