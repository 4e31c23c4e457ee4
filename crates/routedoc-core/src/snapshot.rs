//! Static site snapshot.
//!
//! A [`SiteSnapshot`] is a serialized picture of everything the compiler asks a
//! host for: content records, custom types, option groups, active capabilities
//! and the route registry. The CLI exports from a snapshot file; tests build
//! snapshots in memory.
//!
//! # Examples
//!
//! ```no_run
//! use routedoc_core::snapshot::SiteSnapshot;
//! use routedoc_core::Result;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! let site = SiteSnapshot::from_file("site.yaml").await?;
//! println!("{} routes registered", site.routes.len());
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::path::Path;

use crate::host::{
    Capability, ContentItem, ContentQuery, ContentType, Host, OptionGroup, RouteTable,
};
use crate::Error;

// External imports (alphabetized)
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokio::fs;

const DEFAULT_LOCALE: &str = "en_US";
const DEFAULT_SITE_NAME: &str = "WordPress Site";

/// Content record plus its publication status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotItem {
    #[serde(flatten)]
    pub item: ContentItem,
    /// `None` counts as published.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl SnapshotItem {
    pub fn is_published(&self) -> bool {
        self.status.as_deref().map_or(true, |s| s == "publish")
    }
}

impl From<ContentItem> for SnapshotItem {
    fn from(item: ContentItem) -> Self {
        Self { item, status: None }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSnapshot {
    pub site_name: Option<String>,
    pub base_url: String,
    pub locale: Option<String>,
    pub capabilities: Vec<Capability>,
    /// Records keyed by content kind (`page`, `category`, custom type names).
    pub content: IndexMap<String, Vec<SnapshotItem>>,
    pub content_types: Vec<ContentType>,
    pub option_groups: Vec<OptionGroup>,
    pub routes: RouteTable,
    /// Fixed clock for form samples; the wall clock when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub now: Option<DateTime<Utc>>,
}

impl SiteSnapshot {
    /// Load a snapshot from a JSON or YAML file.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let parsed = match extension.as_deref() {
            Some("json") => serde_json::from_str(&content).map_err(|e| format!("invalid JSON: {}", e)),
            Some("yaml" | "yml") => {
                serde_yaml::from_str(&content).map_err(|e| format!("invalid YAML: {}", e))
            }
            _ => Self::parse_content(&content),
        };
        parsed.map_err(|e| {
            Error::collaborator(format!(
                "failed to parse site snapshot at {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Parse content as either JSON or YAML; a failure reports both errors.
    pub fn parse_content(content: &str) -> Result<Self, String> {
        let json_error = match serde_json::from_str(content) {
            Ok(snapshot) => return Ok(snapshot),
            Err(e) => e,
        };
        serde_yaml::from_str(content)
            .map_err(|yaml_error| format!("invalid JSON ({}) and invalid YAML ({})", json_error, yaml_error))
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        if !self.capabilities.contains(&capability) {
            self.capabilities.push(capability);
        }
        self
    }

    /// Add a record under `kind`, keeping insertion order.
    pub fn add_item(&mut self, kind: &str, item: impl Into<SnapshotItem>) {
        self.content.entry(kind.to_string()).or_default().push(item.into());
    }
}

impl Host for SiteSnapshot {
    fn list_content_items(&self, kind: &str, query: &ContentQuery) -> crate::Result<Vec<ContentItem>> {
        let Some(items) = self.content.get(kind) else {
            return Ok(Vec::new());
        };
        Ok(items
            .iter()
            .filter(|entry| !query.published_only || entry.is_published())
            .filter(|entry| query.slugs.is_empty() || query.slugs.contains(&entry.item.slug))
            .map(|entry| entry.item.clone())
            .collect())
    }

    fn is_capability_active(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    fn default_locale(&self) -> String {
        self.locale
            .clone()
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string())
    }

    fn configured_option_groups(&self) -> crate::Result<Vec<OptionGroup>> {
        Ok(self.option_groups.clone())
    }

    fn registered_routes(&self) -> crate::Result<RouteTable> {
        Ok(self.routes.clone())
    }

    fn resolve_base_url(&self) -> String {
        self.base_url.clone()
    }

    fn content_types(&self) -> crate::Result<Vec<ContentType>> {
        Ok(self.content_types.clone())
    }

    fn site_name(&self) -> String {
        self.site_name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_SITE_NAME.to_string())
    }

    fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const YAML: &str = r#"
site_name: Demo
base_url: https://demo.test/
capabilities: [custom_fields, forms_handler]
content:
  page:
    - {id: 2, slug: about, title: About}
    - {id: 5, slug: draft-page, title: Draft, status: draft}
routes:
  /acme/v1/items:
    - methods: GET, POST
      args:
        title: {type: string}
now: 2025-03-14T09:26:53Z
"#;

    #[tokio::test]
    async fn test_from_file_yaml() -> crate::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("site.yaml");
        fs::write(&path, YAML).await?;

        let site = SiteSnapshot::from_file(&path).await?;
        assert_eq!(site.site_name(), "Demo");
        assert_eq!(site.default_locale(), "en_US");
        assert!(site.is_capability_active(Capability::FormsHandler));
        assert!(!site.is_capability_active(Capability::Ecommerce));
        assert_eq!(site.registered_routes()?["/acme/v1/items"][0].methods, ["GET", "POST"]);
        assert_eq!(site.now().to_rfc3339(), "2025-03-14T09:26:53+00:00");
        Ok(())
    }

    #[tokio::test]
    async fn test_from_file_rejects_garbage() -> crate::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("broken.json");
        fs::write(&path, "capabilities: {{").await?;
        let err = SiteSnapshot::from_file(&path).await.unwrap_err();
        assert!(matches!(err, Error::CollaboratorUnavailable(_)));
        let message = err.to_string();
        assert!(message.contains("invalid JSON"));
        assert!(!message.contains("YAML"));
        Ok(())
    }

    #[tokio::test]
    async fn test_extension_picks_parser() -> crate::Result<()> {
        let dir = tempdir()?;
        let yaml_path = dir.path().join("site.yml");
        fs::write(&yaml_path, YAML).await?;
        assert_eq!(SiteSnapshot::from_file(&yaml_path).await?.site_name(), "Demo");

        let yaml_in_json = dir.path().join("site.json");
        fs::write(&yaml_in_json, YAML).await?;
        let err = SiteSnapshot::from_file(&yaml_in_json).await.unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));
        Ok(())
    }

    #[test]
    fn test_parse_content_reports_both_errors() {
        let err = SiteSnapshot::parse_content("capabilities: {{").unwrap_err();
        assert!(err.contains("invalid JSON ("));
        assert!(err.contains("invalid YAML ("));
    }

    #[test]
    fn test_content_queries() {
        let site = SiteSnapshot::parse_content(YAML).unwrap();
        let all = site.list_content_items("page", &ContentQuery::all()).unwrap();
        assert_eq!(all.len(), 2);
        let published = site.list_content_items("page", &ContentQuery::published()).unwrap();
        assert_eq!(published.len(), 1);
        let by_slug = site
            .list_content_items("page", &ContentQuery::by_slugs(&["draft-page".into()]))
            .unwrap();
        assert_eq!(by_slug[0].id, 5);
        assert!(site.list_content_items("movie", &ContentQuery::all()).unwrap().is_empty());
    }

    #[test]
    fn test_builder_helpers() {
        let mut site = SiteSnapshot::default().with_capability(Capability::Ecommerce);
        site.add_item(
            "category",
            ContentItem {
                id: 3,
                slug: "news".into(),
                title: "News".into(),
                fields_config: None,
            },
        );
        assert_eq!(site.site_name(), DEFAULT_SITE_NAME);
        assert!(site.is_capability_active(Capability::Ecommerce));
        assert_eq!(site.content["category"].len(), 1);
    }
}
