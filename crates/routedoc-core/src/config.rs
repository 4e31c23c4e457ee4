//! Caller selections for one generation.
//!
//! This module defines the `Config` struct: which standard entities, pages,
//! categories, custom types, option groups and registered namespaces end up in
//! the generated documents. The configuration can be loaded from a YAML file,
//! created programmatically, or overridden from command-line arguments.
//!
//! # Examples
//!
//! ```no_run
//! use routedoc_core::config::Config;
//!
//! let mut config = Config::default();
//! config.pages = vec!["home".to_string(), "about".to_string()];
//! config.include_extension = false;
//!
//! # async fn load() -> routedoc_core::Result<()> {
//! let config = Config::from_file("routedoc.yaml").await?;
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::path::Path;

use crate::catalog::StandardEntity;
use crate::utils::{sanitize_key, sanitize_slug};

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use tokio::fs;
use url::Url;

/// Selection flags driving the catalog builder and the assembler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Standard entities emitted under "Basic Routes"
    #[serde(default = "default_entities")]
    pub entities: Vec<StandardEntity>,

    /// Page slugs listed individually under "Specific Pages"
    #[serde(default)]
    pub pages: Vec<String>,

    /// Category slugs for the "Posts by Categories" folder
    #[serde(default)]
    pub categories: Vec<String>,

    /// Custom content types to include. Empty selects none.
    #[serde(default)]
    pub custom_types: Vec<String>,

    /// Option group slugs to include; `None` includes every configured group
    #[serde(default)]
    pub option_groups: Option<Vec<String>>,

    /// Registered route namespaces to include
    #[serde(default)]
    pub namespaces: Vec<String>,

    /// Include the e-commerce block when the host has it active
    #[serde(default = "default_true")]
    pub include_extension: bool,

    /// Where list projections gain the custom-fields column
    #[serde(default)]
    pub rich_metadata: RichMetadata,

    /// Overrides the host's base URL (Optional)
    #[serde(default)]
    pub base_url: Option<Url>,

    /// Overrides the collection name and OpenAPI title (Optional)
    #[serde(default)]
    pub collection_name: Option<String>,
}

/// Opt-in for the rich-metadata (custom fields) projection on list operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RichMetadata {
    /// Follow the host's custom-fields capability for pages, posts and selected custom types.
    #[default]
    Auto,
    /// Never add the projection.
    Off,
    /// Only for these list keys (`pages`, `posts`, custom type names).
    Only(Vec<String>),
}

impl RichMetadata {
    /// Whether the list operation identified by `key` gets the extra projection.
    ///
    /// The capability must be active in every mode; opting in cannot invent fields.
    pub fn applies_to(&self, key: &str, capability_active: bool) -> bool {
        if !capability_active {
            return false;
        }
        match self {
            RichMetadata::Auto => true,
            RichMetadata::Off => false,
            RichMetadata::Only(keys) => keys.iter().any(|k| k == key),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entities: default_entities(),
            pages: Vec::new(),
            categories: Vec::new(),
            custom_types: Vec::new(),
            option_groups: None,
            namespaces: Vec::new(),
            include_extension: true,
            rich_metadata: RichMetadata::default(),
            base_url: None,
            collection_name: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = fs::read_to_string(path).await?;
        let mut config: Config = serde_yaml::from_str(&content)?;
        config.sanitize();
        Ok(config)
    }

    /// Save configuration to a file
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Normalize selector lists the same way command-line input is normalized.
    pub fn sanitize(&mut self) {
        self.pages = clean(&self.pages, sanitize_slug);
        self.categories = clean(&self.categories, sanitize_slug);
        self.custom_types = clean(&self.custom_types, sanitize_key);
        if let Some(groups) = self.option_groups.as_mut() {
            *groups = clean(groups, sanitize_slug);
        }
        self.namespaces = self
            .namespaces
            .iter()
            .map(|ns| ns.trim().trim_matches('/').to_string())
            .filter(|ns| !ns.is_empty())
            .collect();
    }

    pub fn has_entity(&self, entity: StandardEntity) -> bool {
        self.entities.contains(&entity)
    }
}

/// Parse a yes/no flag: anything except `no` or `0` counts as yes.
pub fn parse_yes_no(raw: &str) -> bool {
    let lowered = raw.trim().to_ascii_lowercase();
    lowered != "no" && lowered != "0"
}

fn clean(values: &[String], sanitize: fn(&str) -> String) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let value = sanitize(value);
        if !value.is_empty() && !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

fn default_entities() -> Vec<StandardEntity> {
    StandardEntity::ALL.to_vec()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_config_roundtrip() -> crate::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("routedoc.yaml");

        let mut config = Config::default();
        config.pages = vec!["home".to_string()];
        config.namespaces = vec!["acme/v1".to_string()];
        config.rich_metadata = RichMetadata::Only(vec!["posts".to_string()]);
        config.base_url = Some(Url::parse("https://example.com").unwrap());
        config.save(&file_path).await?;

        let loaded = Config::from_file(&file_path).await?;
        assert_eq!(loaded, config);
        assert_eq!(loaded.entities.len(), 7);
        assert!(loaded.include_extension);
        Ok(())
    }

    #[tokio::test]
    async fn test_config_defaults_and_sanitizing() -> crate::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("routedoc.yaml");
        tokio::fs::write(
            &file_path,
            "pages: [' About Us ', home, home]\ncustom_types: ['Book!']\nnamespaces: ['/acme/v1/']\n",
        )
        .await?;

        let config = Config::from_file(&file_path).await?;
        assert_eq!(config.pages, vec!["about-us", "home"]);
        assert_eq!(config.custom_types, vec!["book"]);
        assert_eq!(config.namespaces, vec!["acme/v1"]);
        assert_eq!(config.option_groups, None);
        assert_eq!(config.rich_metadata, RichMetadata::Auto);
        Ok(())
    }

    #[test]
    fn test_rich_metadata_requires_capability() {
        assert!(RichMetadata::Auto.applies_to("pages", true));
        assert!(!RichMetadata::Auto.applies_to("pages", false));
        let only = RichMetadata::Only(vec!["book".into()]);
        assert!(only.applies_to("book", true));
        assert!(!only.applies_to("posts", true));
        assert!(!RichMetadata::Off.applies_to("posts", true));
    }

    #[test]
    fn test_parse_yes_no() {
        assert!(parse_yes_no("yes"));
        assert!(parse_yes_no("anything"));
        assert!(!parse_yes_no("NO"));
        assert!(!parse_yes_no("0"));
    }
}
