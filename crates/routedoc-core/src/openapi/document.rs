//! Typed OpenAPI 3.0 document produced by the converter.
//!
//! Paths and operations keep insertion order so the serialized document is
//! stable across runs. Schemas stay as raw JSON values; the document as a
//! whole is checked against `openapiv3` by [`OpenApiDocument::validate`].

// Internal imports (std, crate)
use std::collections::HashSet;

use crate::Error;

// External imports (alphabetized)
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Operations of one path, keyed by lowercase method.
pub type PathItem = IndexMap<String, OpenApiOperation>;

/// One entry of an operation's `security` list.
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiDocument {
    pub openapi: String,
    pub info: OpenApiInfo,
    #[serde(rename = "externalDocs", default, skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,
    #[serde(default)]
    pub servers: Vec<OpenApiServer>,
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    #[serde(default)]
    pub components: OpenApiComponents,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiInfo {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalDocs {
    pub description: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiServer {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenApiComponents {
    #[serde(default)]
    pub schemas: IndexMap<String, JsonValue>,
    #[serde(default)]
    pub responses: IndexMap<String, JsonValue>,
    #[serde(rename = "securitySchemes", default)]
    pub security_schemes: IndexMap<String, JsonValue>,
}

/// Represents an OpenAPI operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiOperation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "operationId")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<OpenApiParameter>,
    #[serde(rename = "requestBody", default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<JsonValue>,
    pub responses: IndexMap<String, OpenApiResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,
}

impl OpenApiOperation {
    pub fn parameter(&self, name: &str, location: ParameterLocation) -> Option<&OpenApiParameter> {
        self.parameters
            .iter()
            .find(|p| p.name == name && p.location == location)
    }

    /// Union with `incoming` by name and location; earlier entries win.
    /// The result is ordered path, query, header.
    pub fn merge_parameters(&mut self, incoming: Vec<OpenApiParameter>) {
        for param in incoming {
            if self.parameter(&param.name, param.location).is_none() {
                self.parameters.push(param);
            }
        }
        sort_parameters(&mut self.parameters);
    }
}

/// Stable sort: path parameters first, then query, then header.
pub fn sort_parameters(params: &mut [OpenApiParameter]) {
    params.sort_by_key(|p| p.location);
}

/// Represents an OpenAPI parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiParameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    pub schema: JsonValue,
}

/// Where a parameter is carried. The declaration order is the sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
}

/// A response: either a shared component reference or an inline definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OpenApiResponse {
    Reference {
        #[serde(rename = "$ref")]
        reference: String,
    },
    Inline {
        description: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        headers: Option<IndexMap<String, JsonValue>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<IndexMap<String, JsonValue>>,
    },
}

impl OpenApiResponse {
    pub fn reference(component: &str) -> Self {
        Self::Reference {
            reference: format!("#/components/responses/{}", component),
        }
    }
}

impl OpenApiDocument {
    /// Every operation as `(path, method, operation)` in document order.
    pub fn operations(&self) -> impl Iterator<Item = (&str, &str, &OpenApiOperation)> {
        self.paths.iter().flat_map(|(path, item)| {
            item.iter()
                .map(move |(method, op)| (path.as_str(), method.as_str(), op))
        })
    }

    pub fn operation(&self, path: &str, method: &str) -> Option<&OpenApiOperation> {
        self.paths.get(path)?.get(&method.to_ascii_lowercase())
    }

    /// Check the document against the OpenAPI 3.0 object model.
    ///
    /// Also rejects duplicate operation ids and `{name}` path segments without a
    /// matching path parameter, which the object model alone does not catch.
    pub fn validate(&self) -> crate::Result<()> {
        let value = serde_json::to_value(self)?;
        serde_json::from_value::<openapiv3::OpenAPI>(value)
            .map_err(|e| Error::openapi(format!("document does not match OpenAPI 3.0: {}", e)))?;

        let mut ids = HashSet::new();
        for (path, method, op) in self.operations() {
            if !ids.insert(op.id.as_str()) {
                return Err(Error::openapi(format!("duplicate operationId '{}'", op.id)));
            }
            for segment in path.split('/') {
                let Some(name) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) else {
                    continue;
                };
                if op.parameter(name, ParameterLocation::Path).is_none() {
                    return Err(Error::openapi(format!(
                        "{} {}: path parameter '{}' is not declared",
                        method.to_ascii_uppercase(),
                        path,
                        name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Serialize as pretty JSON.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::encoding(format!("openapi document: {}", e)))
    }
}
