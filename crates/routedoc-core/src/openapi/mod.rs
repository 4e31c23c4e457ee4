//! OpenAPI 3.0 output.
//!
//! [`OpenApiConverter`] turns an assembled [`Collection`](crate::collection::Collection)
//! into an [`OpenApiDocument`]. The document is typed, so it serializes with
//! stable key order and can be checked with [`OpenApiDocument::validate`].

mod components;
mod converter;
pub mod describe;
mod document;

pub use converter::{DocumentTransform, OpenApiConverter};
pub use document::{
    ExternalDocs, OpenApiComponents, OpenApiDocument, OpenApiInfo, OpenApiOperation,
    OpenApiParameter, OpenApiResponse, OpenApiServer, ParameterLocation, PathItem,
    SecurityRequirement,
};

/// Version string written into `openapi`.
pub const OPENAPI_VERSION: &str = "3.0.3";
