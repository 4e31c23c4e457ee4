//! Route catalog builder.
//!
//! Produces the folders of the request collection from the host's content
//! model: standard entities, search, custom types (with the forms special
//! case), option groups, individually selected pages, category-filtered posts
//! and the e-commerce block. Each folder family lives in its own submodule as
//! an `impl` block on [`CatalogBuilder`].

mod commerce;
mod custom_types;
mod entities;
pub mod forms;
mod options;
mod pages;
mod variables;

pub use entities::StandardEntity;
pub use forms::FORMS_TYPE;
pub use pages::SPECIFIC_PAGES_FOLDER;

use std::collections::HashSet;

use crate::collection::{Param, UrlTemplate};
use crate::config::Config;
use crate::host::{Capability, Host};
use crate::knowledge;

/// Projection for list operations on pages and custom types.
const LIST_FIELDS: &str = "id,slug,title";
const POSTS_FIELDS: &str = "id,slug,title,date,status,excerpt,featured_media,sticky,categories,tags";
const CATEGORIES_FIELDS: &str = "id,count,description,name,slug,taxonomy,parent,thumbnail,acf,meta";
const SEARCH_FIELDS: &str = "id,slug,title,excerpt,featured_media";
const SEO_FIELD: &str = "yoast_head_json";
const RICH_FIELD: &str = "acf";

/// Builds catalog folders for one generation.
///
/// Capability checks and the locale are read once at construction so every
/// folder of a generation sees the same host state.
pub struct CatalogBuilder<'a, H: Host + ?Sized> {
    host: &'a H,
    config: &'a Config,
    accept_language: String,
    custom_fields: bool,
    seo: bool,
}

impl<'a, H: Host + ?Sized> CatalogBuilder<'a, H> {
    pub fn new(host: &'a H, config: &'a Config) -> Self {
        Self {
            host,
            config,
            accept_language: host.default_locale().replace('_', "-"),
            custom_fields: host.is_capability_active(Capability::CustomFields),
            seo: host.is_capability_active(Capability::SeoMetadata),
        }
    }

    fn default_headers(&self) -> Vec<Param> {
        read_headers(&self.accept_language)
    }

    fn auth_headers(&self) -> Vec<Param> {
        nonce_headers()
    }

    fn json_write_headers(&self) -> Vec<Param> {
        let mut headers = self.auth_headers();
        headers.push(content_type_json());
        headers
    }

    fn pagination(&self) -> Vec<Param> {
        vec![
            Param::disabled("page", "1"),
            Param::disabled("per_page", "10"),
            Param::disabled("offset", "0"),
        ]
    }

    /// Global list parameters; `status` only applies to posts and pages.
    fn list_extras(&self, with_status: bool) -> Vec<Param> {
        let mut params = vec![
            Param::disabled("context", "view"),
            Param::disabled("search", ""),
            Param::disabled("order", "desc"),
            Param::disabled("orderby", "date"),
            Param::disabled("_embed", ""),
        ];
        if with_status {
            params.insert(2, Param::disabled("status", "publish"));
        }
        params
    }

    fn single_extras(&self) -> Vec<Param> {
        vec![
            Param::disabled("context", "view"),
            Param::disabled("_embed", ""),
        ]
    }

    /// Projection for single-item reads.
    fn detailed_fields(&self) -> String {
        let mut fields = String::from("title");
        if self.custom_fields {
            fields.push(',');
            fields.push_str(RICH_FIELD);
        }
        fields.push_str(",content");
        if self.seo {
            fields.push(',');
            fields.push_str(SEO_FIELD);
        }
        fields
    }

    /// `acf_format` plus the detailed projection, used by page and post reads.
    fn detailed_query(&self) -> Vec<Param> {
        let mut params = Vec::new();
        if self.custom_fields {
            params.push(Param::new("acf_format", "standard"));
        }
        params.push(Param::new("_fields", self.detailed_fields()));
        params
    }

    /// List projection for pages and custom types.
    fn list_fields(&self) -> String {
        if self.seo {
            format!("{},{}", LIST_FIELDS, SEO_FIELD)
        } else {
            LIST_FIELDS.to_string()
        }
    }

    /// Whether the list operation for `key` carries the rich-metadata column.
    fn rich_list(&self, key: &str) -> bool {
        self.config.rich_metadata.applies_to(key, self.custom_fields)
    }

    /// Suffix for descriptions of reads that include custom fields.
    fn rich_suffix(&self) -> &'static str {
        if self.custom_fields {
            " with ACF fields"
        } else {
            ""
        }
    }
}

/// Headers shared by every read request: an opt-in Accept-Language.
pub(crate) fn read_headers(accept_language: &str) -> Vec<Param> {
    let mut headers = vec![Param::disabled("Accept-Language", accept_language)];
    knowledge::enrich_headers(&mut headers);
    headers
}

/// Opt-in nonce placeholder carried by every mutating request.
pub(crate) fn nonce_headers() -> Vec<Param> {
    let mut headers = vec![Param::disabled("X-WP-Nonce", "{{wpNonce}}")];
    knowledge::enrich_headers(&mut headers);
    headers
}

pub(crate) fn content_type_json() -> Param {
    Param::new("Content-Type", "application/json")
}

/// URL under the core REST namespace (`wp-json/wp/v2/...`).
fn core_url<I, S>(segments: I, mut query: Vec<Param>) -> UrlTemplate
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    knowledge::enrich_query(&mut query);
    let path = ["wp-json", "wp", "v2"]
        .into_iter()
        .map(String::from)
        .chain(segments.into_iter().map(Into::into));
    UrlTemplate::new(path, query)
}

/// `{{LabelID}}` placeholder name for an entity or type label; whitespace is dropped.
pub fn id_variable(singular_label: &str) -> String {
    let compact: String = singular_label.split_whitespace().collect();
    format!("{}ID", compact)
}

fn placeholder(variable: &str) -> String {
    format!("{{{{{}}}}}", variable)
}

/// `name`, or `name (qualifier)` when a sibling already took it.
///
/// A repeated qualifier gets a counter so names inside one folder never collide.
fn distinct_name(taken: &mut HashSet<String>, name: String, qualifier: &str) -> String {
    let mut candidate = name.clone();
    let mut n = 1;
    while taken.contains(&candidate) {
        candidate = match n {
            1 => format!("{} ({})", name, qualifier),
            _ => format!("{} ({}) {}", name, qualifier, n),
        };
        n += 1;
    }
    taken.insert(candidate.clone());
    candidate
}

#[cfg(test)]
pub(crate) mod test_support {
    //! In-memory host shared by the catalog tests.

    use chrono::{DateTime, TimeZone, Utc};

    use crate::host::{
        Capability, ContentItem, ContentQuery, ContentType, Host, OptionGroup, RouteTable,
    };
    use crate::Result;

    #[derive(Default)]
    pub struct StubHost {
        pub capabilities: Vec<Capability>,
        pub items: Vec<(String, ContentItem)>,
        pub types: Vec<ContentType>,
        pub groups: Vec<OptionGroup>,
        pub routes: RouteTable,
    }

    impl StubHost {
        pub fn with(capabilities: &[Capability]) -> Self {
            Self {
                capabilities: capabilities.to_vec(),
                ..Default::default()
            }
        }
    }

    impl Host for StubHost {
        fn list_content_items(&self, kind: &str, query: &ContentQuery) -> Result<Vec<ContentItem>> {
            Ok(self
                .items
                .iter()
                .filter(|(k, item)| {
                    k == kind && (query.slugs.is_empty() || query.slugs.contains(&item.slug))
                })
                .map(|(_, item)| item.clone())
                .collect())
        }

        fn is_capability_active(&self, capability: Capability) -> bool {
            self.capabilities.contains(&capability)
        }

        fn default_locale(&self) -> String {
            "en_US".to_string()
        }

        fn configured_option_groups(&self) -> Result<Vec<OptionGroup>> {
            Ok(self.groups.clone())
        }

        fn registered_routes(&self) -> Result<RouteTable> {
            Ok(self.routes.clone())
        }

        fn resolve_base_url(&self) -> String {
            "https://example.com".to_string()
        }

        fn content_types(&self) -> Result<Vec<ContentType>> {
            Ok(self.types.clone())
        }

        fn site_name(&self) -> String {
            "Example Site".to_string()
        }

        fn now(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::StubHost;
    use super::*;

    #[test]
    fn test_detailed_fields_follow_capabilities() {
        let config = Config::default();
        let plain = StubHost::default();
        assert_eq!(CatalogBuilder::new(&plain, &config).detailed_fields(), "title,content");

        let rich = StubHost::with(&[Capability::CustomFields, Capability::SeoMetadata]);
        let builder = CatalogBuilder::new(&rich, &config);
        assert_eq!(builder.detailed_fields(), "title,acf,content,yoast_head_json");
        assert_eq!(builder.list_fields(), "id,slug,title,yoast_head_json");
    }

    #[test]
    fn test_default_headers_use_locale() {
        let config = Config::default();
        let host = StubHost::default();
        let headers = CatalogBuilder::new(&host, &config).default_headers();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0].value, "en-US");
        assert!(!headers[0].enabled);
        assert!(!headers[0].description.is_empty());
    }

    #[test]
    fn test_list_extras_status_position() {
        let config = Config::default();
        let host = StubHost::default();
        let builder = CatalogBuilder::new(&host, &config);
        let keys: Vec<_> = builder.list_extras(true).into_iter().map(|p| p.key).collect();
        assert_eq!(keys, ["context", "search", "status", "order", "orderby", "_embed"]);
        assert!(builder.list_extras(true).iter().all(|p| !p.enabled));
    }

    #[test]
    fn test_distinct_name() {
        let mut taken = HashSet::new();
        assert_eq!(distinct_name(&mut taken, "Home".into(), "home"), "Home");
        assert_eq!(distinct_name(&mut taken, "Home".into(), "home-2"), "Home (home-2)");
        assert_eq!(distinct_name(&mut taken, "Home".into(), "home-2"), "Home (home-2) 2");
        assert_eq!(distinct_name(&mut taken, "About".into(), "about"), "About");
    }

    #[test]
    fn test_id_variable() {
        assert_eq!(id_variable("Post"), "PostID");
        assert_eq!(id_variable("Movie Review"), "MovieReviewID");
        assert_eq!(placeholder("PostID"), "{{PostID}}");
    }
}
