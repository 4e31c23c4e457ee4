//! Routedoc Core Library
//!
//! Compiles a WordPress site's REST surface into API documentation: a
//! Postman-style request collection assembled from the content model and the
//! live route registry, and an OpenAPI 3.0 document converted from it.
//!
//! # Examples
//!
//! ```no_run
//! use routedoc_core::{Config, Result, SiteSnapshot};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! let site = SiteSnapshot::from_file("site.yaml").await?;
//! let config = Config::from_file("routedoc.yaml").await?;
//! let document = routedoc_core::export_openapi(&site, &config)?;
//! println!("{}", document.to_json_pretty()?);
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod catalog;
pub mod collection;
pub mod config;
pub mod discovery;
pub mod error;
pub mod host;
pub mod knowledge;
pub mod openapi;
pub mod snapshot;
pub mod utils;

pub use crate::{
    assembler::CollectionAssembler,
    collection::Collection,
    config::Config,
    error::{Error, Result},
    host::{Capability, Host},
    openapi::{OpenApiConverter, OpenApiDocument},
    snapshot::SiteSnapshot,
};

/// Assemble the request collection for `host` under `config`.
pub fn export<H: Host + ?Sized>(host: &H, config: &Config) -> Result<Collection> {
    CollectionAssembler::new(host, config).assemble()
}

/// Assemble the collection and convert it to a validated OpenAPI document.
pub fn export_openapi<H: Host + ?Sized>(host: &H, config: &Config) -> Result<OpenApiDocument> {
    let collection = export(host, config)?;
    let document = OpenApiConverter::new()
        .with_base_url(host.resolve_base_url())
        .convert(&collection);
    document.validate()?;
    Ok(document)
}
