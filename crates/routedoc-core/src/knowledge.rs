//! Canonical descriptions and schemas for well-known WordPress REST parameters.
//!
//! Both the catalog builder and the OpenAPI converter read from these tables so
//! the same wording ends up in the collection and in the converted document.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::{json, Value as JsonValue};

use crate::collection::Param;

const PAGINATION_DOCS: &str =
    "https://developer.wordpress.org/rest-api/using-the-rest-api/pagination/";
const GLOBAL_PARAMS_DOCS: &str =
    "https://developer.wordpress.org/rest-api/using-the-rest-api/global-parameters/";

static QUERY: Lazy<HashMap<&'static str, String>> = Lazy::new(|| {
    HashMap::from([
        ("page", format!("Current page number. Per {PAGINATION_DOCS}")),
        (
            "per_page",
            format!("Maximum number of items per page (max 100). Per {PAGINATION_DOCS}"),
        ),
        ("offset", "Number of items to skip in result set".to_string()),
        (
            "slug",
            "Limit result to item(s) with specific slug(s). Use for single item by slug."
                .to_string(),
        ),
        (
            "_fields",
            format!("Comma-separated fields to include. Supports dot notation. Per {GLOBAL_PARAMS_DOCS}"),
        ),
        (
            "_embed",
            format!("Include linked resources (e.g. author, wp:term). Per {GLOBAL_PARAMS_DOCS}"),
        ),
        (
            "acf_format",
            "ACF fields format when Advanced Custom Fields plugin is active (e.g. standard)"
                .to_string(),
        ),
        ("search", "Filter results by search string".to_string()),
        ("type", "Content type for search: post, page, etc.".to_string()),
        (
            "categories",
            "Filter posts by category ID(s). Comma-separated for multiple.".to_string(),
        ),
        (
            "parent",
            "Filter by parent ID. For hierarchical items (pages, categories).".to_string(),
        ),
        (
            "context",
            format!("Response scope: view, embed, or edit. Determines which fields are returned. Per {GLOBAL_PARAMS_DOCS}"),
        ),
        ("order", "Sort order: asc or desc".to_string()),
        (
            "orderby",
            "Field to sort by: date, title, id, slug, etc. Per WP REST API.".to_string(),
        ),
        (
            "status",
            "Filter by post status: publish, draft, pending, private, etc.".to_string(),
        ),
        (
            "force",
            "Bypass Trash on delete. Use force=true for permanent deletion.".to_string(),
        ),
    ])
});

static HEADERS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (
            "Accept-Language",
            "Preferred language (RFC 5646). For multilingual sites (e.g. Polylang).",
        ),
        (
            "X-WP-Nonce",
            "Nonce for same-origin auth. Get via wp_create_nonce('wp_rest'). Required for POST/PUT/PATCH/DELETE when logged in.",
        ),
    ])
});

static REQUEST_BODY: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("title", "The title of the post/page"),
        ("content", "The content of the post/page. HTML supported."),
        ("excerpt", "Short excerpt or summary"),
        (
            "status",
            "Post status: publish, draft, pending, private. Per WP REST API.",
        ),
    ])
});

/// Description for a query parameter, if the key is a well-known one.
pub fn query_description(key: &str) -> Option<&'static str> {
    QUERY.get(key).map(String::as_str)
}

/// Description for a request header, if the key is a well-known one.
pub fn header_description(key: &str) -> Option<&'static str> {
    HEADERS.get(key).copied()
}

/// Description for a JSON request body property, if the key is a well-known one.
pub fn body_description(key: &str) -> Option<&'static str> {
    REQUEST_BODY.get(key).copied()
}

/// Fill empty query parameter descriptions from the knowledge base.
pub fn enrich_query(params: &mut [Param]) {
    enrich(params, query_description);
}

/// Fill empty header descriptions from the knowledge base.
pub fn enrich_headers(headers: &mut [Param]) {
    enrich(headers, header_description);
}

fn enrich(params: &mut [Param], lookup: fn(&str) -> Option<&'static str>) {
    for param in params.iter_mut().filter(|p| p.description.is_empty()) {
        if let Some(description) = lookup(&param.key) {
            param.description = description.to_string();
        }
    }
}

/// JSON schema for a well-known query parameter, following the WordPress defaults.
///
/// Returns `None` for keys the knowledge base does not cover; callers infer a
/// schema from the example value instead.
pub fn query_schema(key: &str) -> Option<JsonValue> {
    let schema = match key {
        "page" => json!({"type": "integer", "default": 1, "minimum": 1}),
        "per_page" => json!({"type": "integer", "default": 10, "minimum": 1, "maximum": 100}),
        "offset" => json!({"type": "integer", "minimum": 0}),
        "context" => json!({"type": "string", "default": "view", "enum": ["view", "embed", "edit"]}),
        "order" => json!({"type": "string", "default": "desc", "enum": ["asc", "desc"]}),
        "orderby" => json!({
            "type": "string",
            "default": "date",
            "enum": [
                "author", "date", "id", "include", "modified", "parent", "relevance", "slug",
                "include_slugs", "title", "menu_order", "comment_count", "rand"
            ]
        }),
        "status" => json!({"type": "string", "default": "publish"}),
        "_embed" => json!({"type": "string", "example": "author,wp:term"}),
        "acf_format" => json!({"type": "string", "default": "standard"}),
        "force" => json!({"type": "boolean", "default": false}),
        "slug" | "_fields" | "search" | "type" | "categories" | "parent" => {
            json!({"type": "string"})
        }
        _ => return None,
    };
    Some(schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_keys() {
        assert!(query_description("per_page")
            .is_some_and(|d| d.contains("max 100")));
        assert_eq!(query_description("nope"), None);
        assert!(header_description("X-WP-Nonce").is_some());
        assert_eq!(body_description("excerpt"), Some("Short excerpt or summary"));
    }

    #[test]
    fn test_query_schema_defaults() {
        let force = query_schema("force").unwrap();
        assert_eq!(force["type"], "boolean");
        assert_eq!(force["default"], false);
        assert_eq!(query_schema("per_page").unwrap()["maximum"], 100);
        assert!(query_schema("color").is_none());
    }

    #[test]
    fn test_enrich_keeps_existing_descriptions() {
        let mut params = vec![
            Param::disabled("page", "1"),
            Param::new("search", "x").with_description("custom"),
            Param::new("unknown", "y"),
        ];
        enrich_query(&mut params);
        assert!(params[0].description.starts_with("Current page number"));
        assert_eq!(params[1].description, "custom");
        assert!(params[2].description.is_empty());
    }
}
