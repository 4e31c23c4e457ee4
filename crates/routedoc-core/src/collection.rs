//! Typed request-collection model (Postman collection v2.1 wire format).
//!
//! The tree is built fresh for every generation and serialized exactly as the
//! Postman importer expects: folders carry `item`, requests carry `request`,
//! parameters carry an inverted `disabled` flag.
//!
//! Parsing is lenient: collections exported by other tools may carry body modes,
//! `null` values or description objects this model does not produce. Those are
//! normalized, and an item that still cannot be read is dropped with a warning
//! instead of failing the whole document.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use crate::Error;

/// Schema identifier written into `info.schema`.
pub const COLLECTION_SCHEMA: &str =
    "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

/// Host placeholder every generated URL starts with.
pub const BASE_URL_TOKEN: &str = "{{baseUrl}}";

/// Root of a generated collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub info: CollectionInfo,
    #[serde(rename = "item", default, deserialize_with = "lenient::items")]
    pub items: Vec<Item>,
    #[serde(rename = "variable", default)]
    pub variables: Vec<Variable>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    #[serde(rename = "schema")]
    pub schema_id: String,
}

/// Document-level placeholder with its default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl Variable {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A node of the collection tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Item {
    Folder(Folder),
    Operation(Operation),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub name: String,
    #[serde(rename = "item", deserialize_with = "lenient::items")]
    pub items: Vec<Item>,
    /// Folder-wide credentials, inherited by every request below.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<FolderAuth>,
}

/// Basic-auth credentials attached to a folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderAuth {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub basic: Vec<AuthAttribute>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthAttribute {
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FolderAuth {
    /// Basic auth whose username and password are collection placeholders.
    pub fn basic(username: &str, password: &str) -> Self {
        let attr = |key: &str, value: &str| AuthAttribute {
            key: key.to_string(),
            value: value.to_string(),
            kind: "string".to_string(),
        };
        Self {
            kind: "basic".to_string(),
            basic: vec![attr("username", username), attr("password", password)],
        }
    }
}

/// One HTTP request template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    pub request: Request,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub method: Method,
    #[serde(rename = "header", default)]
    pub headers: Vec<Param>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::body"
    )]
    pub body: Option<Body>,
    pub url: UrlTemplate,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
}

/// HTTP method. Unknown verbs survive deserialization so the converter can skip them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Other(String),
}

impl Method {
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Other(other) => other.as_str(),
        }
    }

    /// POST, PUT, PATCH and DELETE change server state.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Method::Post | Method::Put | Method::Patch | Method::Delete
        )
    }

    /// Methods that may carry a request body.
    pub fn accepts_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put | Method::Patch)
    }
}

impl From<String> for Method {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "GET" => Method::Get,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "PATCH" => Method::Patch,
            "DELETE" => Method::Delete,
            other => Method::Other(other.to_string()),
        }
    }
}

impl From<&str> for Method {
    fn from(raw: &str) -> Self {
        Method::from(raw.to_string())
    }
}

impl From<Method> for String {
    fn from(method: Method) -> Self {
        method.as_str().to_string()
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query parameter or header entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub key: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub value: String,
    #[serde(
        rename = "disabled",
        default = "enabled_by_default",
        skip_serializing_if = "is_enabled",
        with = "inverted"
    )]
    pub enabled: bool,
    #[serde(
        default,
        skip_serializing_if = "String::is_empty",
        deserialize_with = "lenient::text"
    )]
    pub description: String,
}

fn enabled_by_default() -> bool {
    true
}

fn is_enabled(enabled: &bool) -> bool {
    *enabled
}

/// Stores `enabled` on the wire as Postman's `disabled`.
mod inverted {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(enabled: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(!*enabled)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        bool::deserialize(deserializer).map(|disabled| !disabled)
    }
}

impl Param {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            enabled: true,
            description: String::new(),
        }
    }

    /// Documented but opt-in: the consuming tool leaves it unchecked.
    pub fn disabled(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            enabled: false,
            ..Self::new(key, value)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Request URL as raw template plus its decomposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "UrlRepr")]
pub struct UrlTemplate {
    pub raw: String,
    #[serde(default)]
    pub host: Vec<String>,
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<Param>,
}

impl UrlTemplate {
    /// Build a URL under `{{baseUrl}}`; the raw form lists the enabled query parameters.
    pub fn new<I, S>(segments: I, query: Vec<Param>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path: Vec<String> = segments.into_iter().map(Into::into).collect();
        let mut raw = format!("{}/{}", BASE_URL_TOKEN, path.join("/"));
        let enabled: Vec<String> = query
            .iter()
            .filter(|p| p.enabled)
            .map(|p| format!("{}={}", p.key, p.value))
            .collect();
        if !enabled.is_empty() {
            raw.push('?');
            raw.push_str(&enabled.join("&"));
        }
        Self {
            raw,
            host: vec![BASE_URL_TOKEN.to_string()],
            path,
            query,
        }
    }

    /// Path segments reconstructed from `raw`: host and query string removed.
    pub fn raw_path_segments(&self) -> Vec<String> {
        let without_query = self.raw.split('?').next().unwrap_or_default();
        let without_host = without_query
            .strip_prefix(BASE_URL_TOKEN)
            .unwrap_or(without_query);
        without_host
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UrlRepr {
    Structured {
        raw: String,
        #[serde(default)]
        host: Vec<String>,
        #[serde(default)]
        path: Vec<String>,
        #[serde(default)]
        query: Vec<Param>,
    },
    Raw(String),
}

impl From<UrlRepr> for UrlTemplate {
    fn from(repr: UrlRepr) -> Self {
        match repr {
            UrlRepr::Structured {
                raw,
                host,
                path,
                query,
            } => Self {
                raw,
                host,
                path,
                query,
            },
            // A bare string has no decomposition; the converter skips it.
            UrlRepr::Raw(raw) => Self {
                raw,
                host: Vec::new(),
                path: Vec::new(),
                query: Vec::new(),
            },
        }
    }
}

/// Request body: a raw JSON template or a multipart form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Body {
    Raw {
        #[serde(default, deserialize_with = "lenient::text")]
        raw: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        options: Option<JsonValue>,
    },
    Formdata {
        #[serde(default)]
        formdata: Vec<FormPart>,
    },
    /// Any other mode (`urlencoded`, `file`, `graphql`, ...). Read but never converted.
    #[serde(other)]
    Unsupported,
}

impl Body {
    /// Pretty-printed JSON body.
    pub fn json(value: &JsonValue) -> crate::Result<Self> {
        let raw = serde_json::to_string_pretty(value)
            .map_err(|e| Error::encoding(format!("request body: {}", e)))?;
        Ok(Body::Raw {
            raw,
            options: Some(serde_json::json!({"raw": {"language": "json"}})),
        })
    }
}

/// One multipart field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FormPart {
    Text {
        key: String,
        #[serde(default)]
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        required: bool,
    },
    File {
        key: String,
        #[serde(default)]
        src: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        required: bool,
    },
}

/// Wire form of a multipart field; `type` may be missing (text) and `src` may be a list.
#[derive(Deserialize)]
struct FormPartRepr {
    #[serde(default)]
    key: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    value: String,
    #[serde(default)]
    src: JsonValue,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    description: Option<String>,
    #[serde(default)]
    required: bool,
}

impl From<FormPartRepr> for FormPart {
    fn from(repr: FormPartRepr) -> Self {
        if repr.kind.as_deref() == Some("file") {
            let src = match repr.src {
                JsonValue::String(src) => src,
                JsonValue::Array(list) => list
                    .into_iter()
                    .find_map(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default(),
                _ => String::new(),
            };
            FormPart::File {
                key: repr.key,
                src,
                description: repr.description,
                required: repr.required,
            }
        } else {
            FormPart::Text {
                key: repr.key,
                value: repr.value,
                description: repr.description,
                required: repr.required,
            }
        }
    }
}

impl<'de> Deserialize<'de> for FormPart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        FormPartRepr::deserialize(deserializer).map(FormPart::from)
    }
}

impl FormPart {
    pub fn text(key: impl Into<String>, value: impl Into<String>) -> Self {
        FormPart::Text {
            key: key.into(),
            value: value.into(),
            description: None,
            required: false,
        }
    }

    pub fn file(key: impl Into<String>, src: impl Into<String>) -> Self {
        FormPart::File {
            key: key.into(),
            src: src.into(),
            description: None,
            required: false,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            FormPart::Text { key, .. } | FormPart::File { key, .. } => key,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, FormPart::File { .. })
    }

    pub fn is_required(&self) -> bool {
        match self {
            FormPart::Text { required, .. } | FormPart::File { required, .. } => *required,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            FormPart::Text { description, .. } | FormPart::File { description, .. } => {
                description.as_deref()
            }
        }
    }
}

/// Tolerant field readers for collections written by other tools.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value as JsonValue;

    use super::{Body, Item};

    /// String, number, `null` or a `{"content": ...}` description object.
    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(flatten_text(JsonValue::deserialize(deserializer)?).unwrap_or_default())
    }

    pub fn optional_text<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(flatten_text(JsonValue::deserialize(deserializer)?))
    }

    fn flatten_text(value: JsonValue) -> Option<String> {
        match value {
            JsonValue::Null => None,
            JsonValue::String(s) => Some(s),
            JsonValue::Number(n) => Some(n.to_string()),
            JsonValue::Bool(b) => Some(b.to_string()),
            JsonValue::Object(mut obj) => obj.remove("content").and_then(flatten_text),
            JsonValue::Array(_) => None,
        }
    }

    /// A body that does not fit the model becomes [`Body::Unsupported`].
    pub fn body<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Body>, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value).unwrap_or_else(|e| {
            log::debug!("unreadable request body ({}), keeping it as unsupported", e);
            Body::Unsupported
        })))
    }

    /// Children that cannot be read are dropped, the rest are kept in order.
    pub fn items<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Item>, D::Error> {
        let raw = Vec::<JsonValue>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|value| {
                let name = value
                    .get("name")
                    .and_then(JsonValue::as_str)
                    .unwrap_or("<unnamed>")
                    .to_string();
                serde_json::from_value::<Item>(value)
                    .map_err(|e| log::warn!("skipping unreadable item '{}': {}", name, e))
                    .ok()
            })
            .collect())
    }
}

impl Operation {
    pub fn new(
        name: impl Into<String>,
        method: Method,
        url: UrlTemplate,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            request: Request {
                method,
                headers: Vec::new(),
                body: None,
                url,
                description: description.into(),
            },
        }
    }

    pub fn with_headers(mut self, headers: Vec<Param>) -> Self {
        self.request.headers = headers;
        self
    }

    /// Attach a body. Methods that never carry one (GET, DELETE) keep `None`.
    pub fn with_body(mut self, body: Body) -> Self {
        if self.request.method.accepts_body() {
            self.request.body = Some(body);
        } else {
            log::debug!(
                "dropping body on {} operation '{}'",
                self.request.method,
                self.name
            );
        }
        self
    }

    pub fn method(&self) -> &Method {
        &self.request.method
    }
}

impl Folder {
    pub fn new(name: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            name: name.into(),
            items,
            auth: None,
        }
    }

    /// Every operation below this folder, depth first.
    pub fn operations(&self) -> Vec<&Operation> {
        let mut out = Vec::new();
        collect_operations(&self.items, &mut out);
        out
    }

    /// Direct child folder by name.
    pub fn folder(&self, name: &str) -> Option<&Folder> {
        self.items.iter().find_map(|item| match item {
            Item::Folder(f) if f.name == name => Some(f),
            _ => None,
        })
    }
}

impl From<Folder> for Item {
    fn from(folder: Folder) -> Self {
        Item::Folder(folder)
    }
}

impl From<Operation> for Item {
    fn from(op: Operation) -> Self {
        Item::Operation(op)
    }
}

fn collect_operations<'a>(items: &'a [Item], out: &mut Vec<&'a Operation>) {
    for item in items {
        match item {
            Item::Folder(folder) => collect_operations(&folder.items, out),
            Item::Operation(op) => out.push(op),
        }
    }
}

impl Collection {
    /// Every operation in document order.
    pub fn operations(&self) -> Vec<&Operation> {
        let mut out = Vec::new();
        collect_operations(&self.items, &mut out);
        out
    }

    /// Top-level folder by name.
    pub fn folder(&self, name: &str) -> Option<&Folder> {
        self.items.iter().find_map(|item| match item {
            Item::Folder(f) if f.name == name => Some(f),
            _ => None,
        })
    }

    pub fn variable(&self, key: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|v| v.key == key)
            .map(|v| v.value.as_str())
    }

    /// Serialize as pretty JSON; a failure here aborts the export.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::encoding(format!("collection: {}", e)))
    }
}
