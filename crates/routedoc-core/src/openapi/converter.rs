//! Collection to OpenAPI 3.0 conversion.
//!
//! The conversion is lossy but deterministic: the same collection always
//! yields the same document. Requests that cannot be expressed (unsupported
//! method, no path segments) are skipped, never fatal.

// Internal imports (std, crate)
use crate::catalog::SPECIFIC_PAGES_FOLDER;
use crate::collection::{Body, Collection, FormPart, Item, Method, Operation, Param};
use crate::knowledge;
use crate::utils::{slugify_identifier, to_lower_camel_case};

use super::components::{components, write_security};
use super::describe::{
    is_good_description, list_or_slug_description, synthesize_description, MIN_DESCRIPTION_LEN,
};
use super::document::{
    sort_parameters, ExternalDocs, OpenApiDocument, OpenApiInfo, OpenApiOperation,
    OpenApiParameter, OpenApiResponse, OpenApiServer, ParameterLocation, PathItem,
};
use super::OPENAPI_VERSION;

// External imports (alphabetized)
use indexmap::map::Entry;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map as JsonMap, Value as JsonValue};

const DEFAULT_TITLE: &str = "WordPress REST API";
const API_DESCRIPTION: &str = "OpenAPI 3.0 specification for WordPress REST API. Compatible with wp/v2 endpoints (posts, pages, terms, users, etc.) and custom namespaces. Aligned with [WordPress REST API Handbook](https://developer.wordpress.org/rest-api/). Authentication: Cookie/Nonce for same-origin, Application Passwords for external apps.";
const HANDBOOK_URL: &str = "https://developer.wordpress.org/rest-api/";

static TAG_SOURCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/wp-json/([^/]+)/v\d+/([^/]+)").expect("valid tag regex"));

/// Hook applied to the finished document; receives the source collection too.
pub type DocumentTransform = Box<dyn Fn(OpenApiDocument, &Collection) -> OpenApiDocument + Send + Sync>;

/// Converts collections into OpenAPI documents.
///
/// Holds configuration only; per-conversion state lives in the call, so one
/// converter can be reused and every conversion starts its counters at zero.
pub struct OpenApiConverter {
    base_url: String,
    transform: Option<DocumentTransform>,
}

impl Default for OpenApiConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// Paths collected during one conversion.
struct Conversion {
    paths: IndexMap<String, PathItem>,
    counter: usize,
}

impl OpenApiConverter {
    pub fn new() -> Self {
        Self {
            base_url: "/".to_string(),
            transform: None,
        }
    }

    /// Server URL used when the collection has no `baseUrl` variable.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_transform(mut self, transform: DocumentTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn convert(&self, collection: &Collection) -> OpenApiDocument {
        let base_url = collection
            .variable("baseUrl")
            .unwrap_or(self.base_url.as_str())
            .trim_end_matches('/');
        let server_url = if base_url.is_empty() { "/" } else { base_url };

        let mut state = Conversion {
            paths: IndexMap::new(),
            counter: 0,
        };
        state.visit(&collection.items);

        let with_commerce = state.paths.keys().any(|p| p.starts_with("/wp-json/wc/"));
        let title = if collection.info.name.trim().is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            collection.info.name.clone()
        };
        let operations = state.counter;
        let document = OpenApiDocument {
            openapi: OPENAPI_VERSION.to_string(),
            info: OpenApiInfo {
                title,
                description: Some(API_DESCRIPTION.to_string()),
                version: "1.0.0".to_string(),
            },
            external_docs: Some(ExternalDocs {
                description: "WordPress REST API Handbook".to_string(),
                url: HANDBOOK_URL.to_string(),
            }),
            servers: vec![OpenApiServer {
                url: server_url.to_string(),
                description: Some("WordPress site URL".to_string()),
            }],
            paths: state.paths,
            components: components(with_commerce),
        };
        log::info!(
            "converted {} requests into {} paths",
            operations,
            document.paths.len()
        );

        match &self.transform {
            Some(transform) => transform(document, collection),
            None => document,
        }
    }
}

impl Conversion {
    fn visit(&mut self, items: &[Item]) {
        for item in items {
            match item {
                Item::Folder(folder) if folder.name == SPECIFIC_PAGES_FOLDER => {
                    log::debug!("skipping folder '{}'", folder.name);
                }
                Item::Folder(folder) => self.visit(&folder.items),
                Item::Operation(op) => self.convert_operation(op),
            }
        }
    }

    fn convert_operation(&mut self, op: &Operation) {
        let method = op.method();
        if matches!(method, Method::Other(_)) {
            log::debug!("skipping '{}': unsupported method {}", op.name, method);
            return;
        }
        let Some(path) = openapi_path(&op.request.url.path) else {
            log::debug!("skipping '{}': url has no path segments", op.name);
            return;
        };

        self.counter += 1;
        let id = format!("{}_{}", slugify_identifier(&op.name), self.counter);
        let mut parameters = convert_parameters(op);
        sort_parameters(&mut parameters);

        let source = op.request.description.trim();
        let description = if is_good_description(source, &op.name) {
            source.to_string()
        } else {
            synthesize_description(&path, method.as_str(), &parameters)
        };

        let mut responses = default_responses(method);
        if *method == Method::Get && !path.contains('{') && !path.ends_with("/settings") {
            if let Some(OpenApiResponse::Inline { headers, .. }) = responses.get_mut("200") {
                *headers = Some(pagination_headers());
            }
        }

        let request_body = if method.accepts_body() {
            op.request.body.as_ref().and_then(convert_body)
        } else {
            None
        };

        let operation = OpenApiOperation {
            tags: tags_for(&path),
            summary: Some(op.name.clone()),
            description: (description.chars().count() >= MIN_DESCRIPTION_LEN).then_some(description),
            id,
            parameters,
            request_body,
            responses,
            security: method.is_mutating().then(write_security),
        };

        let method_key = method.as_str().to_ascii_lowercase();
        match self.paths.entry(path.clone()).or_default().entry(method_key) {
            Entry::Vacant(slot) => {
                slot.insert(operation);
            }
            Entry::Occupied(mut slot) => {
                log::debug!("merging duplicate {} {}", method, path);
                let existing = slot.get_mut();
                existing.merge_parameters(operation.parameters);
                if *method == Method::Get && !path.contains('{') {
                    existing.description = Some(list_or_slug_description(&path));
                }
            }
        }
    }
}

/// `{{PostID}}` segments become `{postId}`, `:slug` segments become `{slug}`.
fn openapi_path(segments: &[String]) -> Option<String> {
    let converted: Vec<String> = segments
        .iter()
        .filter(|s| !s.is_empty())
        .map(|segment| match placeholder_of(segment) {
            Some(Placeholder::Variable(token)) => format!("{{{}}}", camel_param(token)),
            Some(Placeholder::Named(name)) => format!("{{{}}}", name),
            None => segment.clone(),
        })
        .collect();
    if converted.is_empty() {
        return None;
    }
    Some(format!("/{}", converted.join("/")))
}

enum Placeholder<'s> {
    /// `{{Token}}` collection variable.
    Variable(&'s str),
    /// `:name` path variable.
    Named(&'s str),
}

fn placeholder_of(segment: &str) -> Option<Placeholder<'_>> {
    if let Some(token) = segment.strip_prefix("{{").and_then(|s| s.strip_suffix("}}")) {
        return Some(Placeholder::Variable(token));
    }
    segment
        .strip_prefix(':')
        .filter(|name| !name.is_empty())
        .map(Placeholder::Named)
}

/// Parameter name for a collection variable: `PostID` becomes `postId`.
fn camel_param(token: &str) -> String {
    match token.strip_suffix("ID") {
        Some(prefix) => format!("{}Id", prefix.to_lowercase()),
        None => to_lower_camel_case(token),
    }
}

fn convert_parameters(op: &Operation) -> Vec<OpenApiParameter> {
    let mut params = Vec::new();

    for q in op.request.url.query.iter().filter(|q| !q.key.is_empty()) {
        let description = if q.description.is_empty() {
            knowledge::query_description(&q.key).map(str::to_string)
        } else {
            Some(q.description.clone())
        };
        params.push(OpenApiParameter {
            name: q.key.clone(),
            location: ParameterLocation::Query,
            description,
            required: false,
            schema: query_schema(q),
        });
    }

    for segment in &op.request.url.path {
        let param = match placeholder_of(segment) {
            Some(Placeholder::Variable(token)) => match token.strip_suffix("ID") {
                Some(prefix) => OpenApiParameter {
                    name: camel_param(token),
                    location: ParameterLocation::Path,
                    description: Some(format!("ID of the {}", prefix)),
                    required: true,
                    schema: json!({"type": "integer", "format": "int64"}),
                },
                None => slug_parameter(camel_param(token)),
            },
            Some(Placeholder::Named(name)) => slug_parameter(name.to_string()),
            None => continue,
        };
        if !params
            .iter()
            .any(|p| p.name == param.name && p.location == ParameterLocation::Path)
        {
            params.push(param);
        }
    }

    for h in &op.request.headers {
        if h.key.is_empty() || !h.enabled || h.key.eq_ignore_ascii_case("content-type") {
            continue;
        }
        let description = if h.description.is_empty() {
            knowledge::header_description(&h.key).map(str::to_string)
        } else {
            Some(h.description.clone())
        };
        params.push(OpenApiParameter {
            name: h.key.clone(),
            location: ParameterLocation::Header,
            description,
            required: false,
            schema: json!({"type": "string", "default": h.value}),
        });
    }

    params
}

fn slug_parameter(name: String) -> OpenApiParameter {
    OpenApiParameter {
        name,
        location: ParameterLocation::Path,
        description: Some("URL-friendly slug or identifier".to_string()),
        required: true,
        schema: json!({"type": "string"}),
    }
}

/// Knowledge-base schema, else one inferred from the example value. The value
/// becomes the example when the schema has no default or example of its own.
fn query_schema(param: &Param) -> JsonValue {
    let mut schema = knowledge::query_schema(&param.key)
        .unwrap_or_else(|| json!({"type": infer_param_type(&param.value)}));
    if let Some(obj) = schema.as_object_mut() {
        if !obj.contains_key("default") && !obj.contains_key("example") && !param.value.is_empty() {
            obj.insert("example".to_string(), JsonValue::String(param.value.clone()));
        }
    }
    schema
}

fn infer_param_type(value: &str) -> &'static str {
    let trimmed = value.trim();
    let numeric = !trimmed.is_empty()
        && trimmed.parse::<f64>().is_ok_and(f64::is_finite)
        && trimmed.chars().any(|c| c.is_ascii_digit());
    if numeric {
        return if trimmed.contains('.') { "number" } else { "integer" };
    }
    if trimmed == "true" || trimmed == "false" {
        return "boolean";
    }
    "string"
}

fn convert_body(body: &Body) -> Option<JsonValue> {
    match body {
        Body::Raw { raw, .. } => {
            let decoded: JsonValue = serde_json::from_str(raw).ok()?;
            let schema = match &decoded {
                JsonValue::Object(obj) => json!({
                    "type": "object",
                    "properties": infer_properties(obj),
                }),
                JsonValue::Array(_) => json!({"type": "array", "items": {"type": "string"}}),
                _ => return None,
            };
            Some(json!({
                "required": true,
                "content": {
                    "application/json": {"schema": schema, "example": decoded}
                }
            }))
        }
        Body::Formdata { formdata } => {
            let mut properties = JsonMap::new();
            let mut required = Vec::new();
            for part in formdata.iter().filter(|p| !p.key().is_empty()) {
                properties.insert(part.key().to_string(), form_property(part));
                if part.is_required() {
                    required.push(part.key().to_string());
                }
            }
            if properties.is_empty() {
                return None;
            }
            let mut schema = json!({"type": "object", "properties": properties});
            if !required.is_empty() {
                schema["required"] = json!(required);
            }
            Some(json!({
                "required": !required.is_empty(),
                "content": {"multipart/form-data": {"schema": schema}}
            }))
        }
        Body::Unsupported => None,
    }
}

fn form_property(part: &FormPart) -> JsonValue {
    let fallback = if part.is_file() { "File upload" } else { "Form field value" };
    let mut property = json!({
        "type": "string",
        "description": part.description().filter(|d| !d.is_empty()).unwrap_or(fallback),
    });
    if part.is_file() {
        property["format"] = json!("binary");
    }
    property
}

fn infer_properties(obj: &JsonMap<String, JsonValue>) -> JsonMap<String, JsonValue> {
    obj.iter()
        .map(|(key, value)| {
            let mut property = match value {
                JsonValue::Number(n) if n.is_f64() => json!({"type": "number"}),
                JsonValue::Number(_) => json!({"type": "integer"}),
                JsonValue::Bool(_) => json!({"type": "boolean"}),
                JsonValue::Array(_) => json!({"type": "array", "items": {"type": "string"}}),
                JsonValue::Object(_) => json!({"type": "object"}),
                _ => json!({"type": "string"}),
            };
            if let Some(description) = knowledge::body_description(key) {
                property["description"] = json!(description);
            }
            (key.clone(), property)
        })
        .collect()
}

fn default_responses(method: &Method) -> IndexMap<String, OpenApiResponse> {
    let mut responses = IndexMap::new();
    responses.insert(
        "200".to_string(),
        OpenApiResponse::Inline {
            description: "Successful response".to_string(),
            headers: None,
            content: Some(IndexMap::from([(
                "application/json".to_string(),
                json!({
                    "schema": {
                        "oneOf": [
                            {"type": "object"},
                            {"type": "array", "items": {"type": "object"}}
                        ]
                    }
                }),
            )])),
        },
    );
    if method.accepts_body() {
        responses.insert(
            "201".to_string(),
            OpenApiResponse::Inline {
                description: "Resource created".to_string(),
                headers: None,
                content: Some(IndexMap::from([(
                    "application/json".to_string(),
                    json!({"schema": {"type": "object"}}),
                )])),
            },
        );
    }
    for (code, component) in [
        ("401", "Unauthorized"),
        ("403", "Forbidden"),
        ("404", "NotFound"),
        ("500", "ServerError"),
    ] {
        responses.insert(code.to_string(), OpenApiResponse::reference(component));
    }
    responses
}

fn pagination_headers() -> IndexMap<String, JsonValue> {
    IndexMap::from([
        (
            "X-WP-Total".to_string(),
            json!({
                "schema": {"type": "integer", "description": "Total number of records in collection"},
                "description": "Total number of records in the collection. Per WordPress REST API pagination."
            }),
        ),
        (
            "X-WP-TotalPages".to_string(),
            json!({
                "schema": {"type": "integer", "description": "Total number of pages"},
                "description": "Total number of pages encompassing all available records. Per WordPress REST API pagination."
            }),
        ),
    ])
}

/// `"{group} - {resource}"` for paths shaped like `/wp-json/{group}/v{n}/{resource}`.
fn tags_for(path: &str) -> Option<Vec<String>> {
    TAG_SOURCE
        .captures(path)
        .map(|c| vec![format!("{} - {}", &c[1], &c[2])])
}
