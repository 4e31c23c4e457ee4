//! Fixed `components` section: entity schemas, shared error responses and
//! security schemes.

use indexmap::IndexMap;
use serde_json::{json, Value as JsonValue};

use super::document::{OpenApiComponents, SecurityRequirement};

const AUTH_DOCS: &str = "https://developer.wordpress.org/rest-api/using-the-rest-api/authentication/";

/// Components for a converted document; `wcBasicAuth` only when the e-commerce
/// block was part of the source.
pub fn components(with_commerce: bool) -> OpenApiComponents {
    OpenApiComponents {
        schemas: schemas(),
        responses: responses(),
        security_schemes: security_schemes(with_commerce),
    }
}

/// Alternatives accepted by mutating operations.
pub fn write_security() -> Vec<SecurityRequirement> {
    ["cookieAuth", "nonceAuth", "applicationPassword"]
        .into_iter()
        .map(|scheme| IndexMap::from([(scheme.to_string(), Vec::new())]))
        .collect()
}

fn schemas() -> IndexMap<String, JsonValue> {
    let rendered = || json!({"type": "object", "properties": {"rendered": {"type": "string"}}});
    let protected_text = || {
        json!({
            "type": "object",
            "properties": {
                "rendered": {"type": "string"},
                "protected": {"type": "boolean"}
            }
        })
    };
    let date_time = || json!({"type": "string", "format": "date-time"});
    let id = || json!({"type": "integer", "format": "int64"});

    IndexMap::from([
        (
            "WP_Post".to_string(),
            json!({
                "type": "object",
                "description": "WordPress Post object. Schema aligns with [Posts Reference](https://developer.wordpress.org/rest-api/reference/posts/).",
                "properties": {
                    "id": {"type": "integer", "format": "int64", "description": "Unique identifier"},
                    "slug": {"type": "string", "description": "URL-friendly slug"},
                    "link": {"type": "string", "format": "uri", "description": "URL to the post"},
                    "guid": {
                        "type": "object",
                        "properties": {"rendered": {"type": "string"}},
                        "description": "Globally unique identifier for the post"
                    },
                    "title": rendered(),
                    "content": protected_text(),
                    "excerpt": protected_text(),
                    "date": date_time(),
                    "date_gmt": date_time(),
                    "modified": date_time(),
                    "modified_gmt": date_time(),
                    "status": {"type": "string", "enum": ["publish", "future", "draft", "pending", "private"]},
                    "type": {"type": "string"},
                    "author": {"type": "integer"},
                    "featured_media": {"type": "integer"},
                    "comment_status": {"type": "string", "enum": ["open", "closed"]},
                    "ping_status": {"type": "string", "enum": ["open", "closed"]},
                    "sticky": {"type": "boolean"},
                    "format": {"type": "string"},
                    "categories": {"type": "array", "items": {"type": "integer"}},
                    "tags": {"type": "array", "items": {"type": "integer"}},
                    "acf": {"type": "object", "description": "ACF fields when acf_format=standard"},
                    "yoast_head_json": {"type": "object", "description": "Yoast SEO metadata when plugin is active"}
                }
            }),
        ),
        (
            "WP_Page".to_string(),
            json!({
                "type": "object",
                "description": "WordPress Page object. Schema aligns with [Pages Reference](https://developer.wordpress.org/rest-api/reference/pages/).",
                "properties": {
                    "id": id(),
                    "slug": {"type": "string"},
                    "link": {"type": "string", "format": "uri"},
                    "title": rendered(),
                    "content": protected_text(),
                    "excerpt": {"type": "object"},
                    "date": date_time(),
                    "modified": date_time(),
                    "status": {"type": "string"},
                    "type": {"type": "string"},
                    "parent": {"type": "integer"},
                    "menu_order": {"type": "integer"},
                    "template": {"type": "string"},
                    "acf": {"type": "object"},
                    "yoast_head_json": {"type": "object"}
                }
            }),
        ),
        (
            "WP_Term".to_string(),
            json!({
                "type": "object",
                "description": "WordPress Term object (category, tag, etc.). See [Categories](https://developer.wordpress.org/rest-api/reference/categories/), [Tags](https://developer.wordpress.org/rest-api/reference/tags/).",
                "properties": {
                    "id": id(),
                    "slug": {"type": "string"},
                    "name": {"type": "string"},
                    "description": {"type": "string"},
                    "count": {"type": "integer"},
                    "parent": {"type": "integer"},
                    "taxonomy": {"type": "string"}
                }
            }),
        ),
        (
            "WP_User".to_string(),
            json!({
                "type": "object",
                "description": "WordPress User object. See [Users Reference](https://developer.wordpress.org/rest-api/reference/users/).",
                "properties": {
                    "id": id(),
                    "slug": {"type": "string"},
                    "name": {"type": "string"},
                    "description": {"type": "string"},
                    "avatar_urls": {"type": "object"}
                }
            }),
        ),
        (
            "WP_Comment".to_string(),
            json!({
                "type": "object",
                "description": "WordPress Comment object. See [Comments Reference](https://developer.wordpress.org/rest-api/reference/comments/).",
                "properties": {
                    "id": id(),
                    "content": {"type": "object"},
                    "date": date_time(),
                    "parent": {"type": "integer"},
                    "post": {"type": "integer"},
                    "author": {"type": "integer"},
                    "status": {"type": "string"}
                }
            }),
        ),
        (
            "WP_REST_Error".to_string(),
            json!({
                "type": "object",
                "description": "WordPress REST API error response. Per https://developer.wordpress.org/rest-api/extending-the-rest-api/controller-classes/",
                "properties": {
                    "code": {"type": "string", "description": "Error code (e.g. rest_not_logged_in, rest_post_invalid_id)"},
                    "message": {"type": "string", "description": "Human-readable error message"},
                    "data": {"type": "object", "description": "Additional data (e.g. status HTTP code)"}
                }
            }),
        ),
    ])
}

fn error_response(description: &str, example: Option<JsonValue>) -> JsonValue {
    let mut media = json!({"schema": {"$ref": "#/components/schemas/WP_REST_Error"}});
    if let Some(example) = example {
        media["example"] = example;
    }
    json!({
        "description": description,
        "content": {"application/json": media}
    })
}

fn responses() -> IndexMap<String, JsonValue> {
    IndexMap::from([
        (
            "Unauthorized".to_string(),
            error_response(
                "Authentication required",
                Some(json!({
                    "code": "rest_not_logged_in",
                    "message": "You are not currently logged in.",
                    "data": {"status": 401}
                })),
            ),
        ),
        (
            "NotFound".to_string(),
            error_response(
                "Resource not found",
                Some(json!({
                    "code": "rest_post_invalid_id",
                    "message": "Invalid post ID.",
                    "data": {"status": 404}
                })),
            ),
        ),
        ("Forbidden".to_string(), error_response("Insufficient permissions", None)),
        ("ServerError".to_string(), error_response("Internal server error", None)),
    ])
}

fn security_schemes(with_commerce: bool) -> IndexMap<String, JsonValue> {
    let mut schemes = IndexMap::from([
        (
            "cookieAuth".to_string(),
            json!({
                "type": "apiKey",
                "in": "cookie",
                "name": "wordpress_logged_in",
                "description": format!("Cookie auth for logged-in users. For same-origin AJAX, prefer X-WP-Nonce header. Per {}", AUTH_DOCS)
            }),
        ),
        (
            "nonceAuth".to_string(),
            json!({
                "type": "apiKey",
                "in": "header",
                "name": "X-WP-Nonce",
                "description": format!("Nonce for CSRF protection. Use wp_create_nonce('wp_rest'). Required for same-origin authenticated requests. Per {}", AUTH_DOCS)
            }),
        ),
        (
            "applicationPassword".to_string(),
            json!({
                "type": "http",
                "scheme": "basic",
                "description": format!("Application Passwords (WordPress 5.6+). Create in Users > Profile > Application Passwords. Use with Basic auth over HTTPS. Per {}", AUTH_DOCS)
            }),
        ),
    ]);
    if with_commerce {
        schemes.insert(
            "wcBasicAuth".to_string(),
            json!({
                "type": "http",
                "scheme": "basic",
                "description": "WooCommerce REST API. Consumer Key as username, Consumer Secret as password. Create in WooCommerce > Settings > Advanced > REST API. Per https://github.com/woocommerce/woocommerce-rest-api-docs"
            }),
        );
    }
    schemes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commerce_scheme_is_conditional() {
        assert!(!components(false).security_schemes.contains_key("wcBasicAuth"));
        assert!(components(true).security_schemes.contains_key("wcBasicAuth"));
    }

    #[test]
    fn test_error_responses_reference_error_schema() {
        let c = components(false);
        assert!(c.schemas.contains_key("WP_REST_Error"));
        for (_, response) in &c.responses {
            assert_eq!(
                response["content"]["application/json"]["schema"]["$ref"],
                "#/components/schemas/WP_REST_Error"
            );
        }
        assert_eq!(c.responses["NotFound"]["content"]["application/json"]["example"]["data"]["status"], 404);
    }

    #[test]
    fn test_write_security_alternatives() {
        let security = write_security();
        assert_eq!(security.len(), 3);
        assert!(security[1].contains_key("nonceAuth"));
    }
}
