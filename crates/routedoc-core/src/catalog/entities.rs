//! Standard entities and the search folder ("Basic Routes").

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{
    core_url, id_variable, placeholder, CatalogBuilder, CATEGORIES_FIELDS, POSTS_FIELDS,
    RICH_FIELD, SEARCH_FIELDS,
};
use crate::collection::{Body, Folder, Item, Method, Operation, Param};
use crate::host::Host;
use crate::utils::ucfirst;
use crate::Result;

/// Content kinds with built-in list/slug/ID/create/update/delete conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StandardEntity {
    Pages,
    Posts,
    Categories,
    Tags,
    Comments,
    Users,
    Settings,
}

impl StandardEntity {
    /// Display order of the "Basic Routes" folders.
    pub const ALL: [StandardEntity; 7] = [
        StandardEntity::Pages,
        StandardEntity::Posts,
        StandardEntity::Categories,
        StandardEntity::Tags,
        StandardEntity::Comments,
        StandardEntity::Users,
        StandardEntity::Settings,
    ];

    /// REST collection segment, also the plural key.
    pub fn rest_base(self) -> &'static str {
        match self {
            StandardEntity::Pages => "pages",
            StandardEntity::Posts => "posts",
            StandardEntity::Categories => "categories",
            StandardEntity::Tags => "tags",
            StandardEntity::Comments => "comments",
            StandardEntity::Users => "users",
            StandardEntity::Settings => "settings",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            StandardEntity::Pages => "Page",
            StandardEntity::Posts => "Post",
            StandardEntity::Categories => "Category",
            StandardEntity::Tags => "Tag",
            StandardEntity::Comments => "Comment",
            StandardEntity::Users => "User",
            StandardEntity::Settings => "Setting",
        }
    }

    /// Default for the entity's `{Singular}ID` variable.
    pub fn default_id(self) -> &'static str {
        match self {
            StandardEntity::Pages => "2",
            _ => "1",
        }
    }

    fn is_content(self) -> bool {
        matches!(self, StandardEntity::Pages | StandardEntity::Posts)
    }
}

impl fmt::Display for StandardEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rest_base())
    }
}

impl FromStr for StandardEntity {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        StandardEntity::ALL
            .into_iter()
            .find(|e| e.rest_base() == key)
            .ok_or_else(|| crate::Error::config(format!("unknown entity '{}'", s.trim())))
    }
}

impl<'a, H: Host + ?Sized> CatalogBuilder<'a, H> {
    /// Entity folders for the configured entities plus the search folder.
    pub fn basic_routes(&self) -> Result<Vec<Item>> {
        let mut folders = Vec::new();
        for entity in StandardEntity::ALL {
            if !self.config.has_entity(entity) {
                continue;
            }
            let items = if entity == StandardEntity::Settings {
                vec![self.settings_read().into()]
            } else {
                self.entity_operations(entity)?
            };
            folders.push(Folder::new(ucfirst(entity.rest_base()), items).into());
        }
        folders.push(self.search_folder().into());
        Ok(folders)
    }

    /// Settings is a singleton resource: one read, nothing else.
    fn settings_read(&self) -> Operation {
        Operation::new(
            "Get Settings",
            Method::Get,
            core_url(["settings"], Vec::new()),
            "Get site settings",
        )
        .with_headers(self.default_headers())
    }

    fn entity_operations(&self, entity: StandardEntity) -> Result<Vec<Item>> {
        let base = entity.rest_base();
        let singular = entity.singular();
        let id = placeholder(&id_variable(singular));
        let detail_suffix = if entity.is_content() {
            self.rich_suffix()
        } else {
            ""
        };

        let list = Operation::new(
            format!("List of {}", ucfirst(base)),
            Method::Get,
            core_url([base], self.entity_list_query(entity)),
            format!("Get list of all {}", base),
        )
        .with_headers(self.default_headers());

        let mut slug_query = match entity {
            StandardEntity::Pages => {
                let mut q = vec![Param::new("slug", "sample-page")];
                q.extend(self.detailed_query());
                q
            }
            StandardEntity::Posts => {
                let mut q = vec![Param::new("slug", "hello-world")];
                q.extend(self.detailed_query());
                q
            }
            StandardEntity::Categories => vec![
                Param::new("slug", "uncategorized"),
                Param::disabled("parent", "1"),
            ],
            _ => vec![Param::new("slug", "example")],
        };
        slug_query.extend(self.single_extras());
        let by_slug = Operation::new(
            format!("{} by Slug", singular),
            Method::Get,
            core_url([base], slug_query),
            format!("Get specific {} by slug{}", singular, detail_suffix),
        )
        .with_headers(self.default_headers());

        let mut id_query = match entity {
            StandardEntity::Pages | StandardEntity::Posts => self.detailed_query(),
            StandardEntity::Categories => vec![Param::disabled("parent", "1")],
            _ => Vec::new(),
        };
        id_query.extend(self.single_extras());
        let by_id = Operation::new(
            format!("{} by ID", singular),
            Method::Get,
            core_url([base, id.as_str()], id_query),
            format!("Get specific {} by ID{}", singular, detail_suffix),
        )
        .with_headers(self.default_headers());

        let mut ops = vec![list, by_slug, by_id];
        ops.extend(self.write_operations(base, singular, &id)?);
        Ok(ops.into_iter().map(Item::from).collect())
    }

    fn entity_list_query(&self, entity: StandardEntity) -> Vec<Param> {
        let mut query = Vec::new();
        match entity {
            StandardEntity::Posts => {
                let mut fields = POSTS_FIELDS.to_string();
                if self.rich_list("posts") {
                    fields = format!("{},{}", fields, RICH_FIELD);
                    query.push(Param::new("acf_format", "standard"));
                }
                query.push(Param::new("_fields", fields));
                query.push(Param::disabled("categories", "1"));
            }
            StandardEntity::Pages => {
                let mut fields = self.list_fields();
                if self.rich_list("pages") {
                    fields = format!("{},{}", fields, RICH_FIELD);
                    query.push(Param::new("acf_format", "standard"));
                }
                query.push(Param::new("_fields", fields));
            }
            StandardEntity::Categories => {
                query.push(Param::new("_fields", CATEGORIES_FIELDS));
            }
            _ => {}
        }
        query.extend(self.list_extras(entity.is_content()));
        query.extend(self.pagination());
        query
    }

    /// Create, Update and Delete for a `wp/v2` collection.
    pub(super) fn write_operations(
        &self,
        base: &str,
        singular: &str,
        id: &str,
    ) -> Result<Vec<Operation>> {
        let create_body = json!({
            "title": format!("Sample {} Title", singular),
            "content": format!("Sample {} content here.", singular),
            "excerpt": format!("Sample {} excerpt.", singular),
            "status": "draft",
        });
        let update_body = json!({
            "title": format!("Updated {} Title", singular),
            "content": format!("Updated {} content here.", singular),
            "excerpt": format!("Updated {} excerpt.", singular),
        });

        let create = Operation::new(
            format!("Create {}", singular),
            Method::Post,
            core_url([base], Vec::new()),
            format!("Create new {}", singular),
        )
        .with_headers(self.json_write_headers())
        .with_body(Body::json(&create_body)?);

        let update = Operation::new(
            format!("Update {}", singular),
            Method::Post,
            core_url([base, id], Vec::new()),
            format!("Update existing {} by ID", singular),
        )
        .with_headers(self.json_write_headers())
        .with_body(Body::json(&update_body)?);

        let delete = Operation::new(
            format!("Delete {}", singular),
            Method::Delete,
            core_url([base, id], vec![Param::disabled("force", "false")]),
            format!("Delete {} by ID. Add ?force=true to bypass Trash.", singular),
        )
        .with_headers(self.auth_headers());

        Ok(vec![create, update, delete])
    }

    fn search_folder(&self) -> Folder {
        let search = |name: &str, kind: Option<&str>, description: &str| {
            let mut query = Vec::new();
            if let Some(kind) = kind {
                query.push(Param::new("type", kind));
            }
            query.push(Param::new("search", "example"));
            query.push(Param::new("_fields", SEARCH_FIELDS));
            query.extend(self.single_extras());
            Item::from(
                Operation::new(name, Method::Get, core_url(["search"], query), description)
                    .with_headers(self.default_headers()),
            )
        };
        Folder::new(
            "Search",
            vec![
                search(
                    "Search Posts",
                    Some("post"),
                    "Search for posts with keyword \"example\"",
                ),
                search(
                    "Search Pages",
                    Some("page"),
                    "Search for pages with keyword \"example\"",
                ),
                search(
                    "Search All",
                    None,
                    "Search across all content types with keyword \"example\"",
                ),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::StubHost;
    use super::*;
    use crate::config::Config;
    use crate::host::Capability;

    fn folder<'f>(items: &'f [Item], name: &str) -> &'f Folder {
        items
            .iter()
            .find_map(|i| match i {
                Item::Folder(f) if f.name == name => Some(f),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_pages_and_posts_selection() {
        let mut config = Config::default();
        config.entities = vec![StandardEntity::Posts, StandardEntity::Pages];
        let host = StubHost::default();
        let items = CatalogBuilder::new(&host, &config).basic_routes().unwrap();

        let names: Vec<_> = items
            .iter()
            .map(|i| match i {
                Item::Folder(f) => f.name.as_str(),
                Item::Operation(o) => o.name.as_str(),
            })
            .collect();
        assert_eq!(names, ["Pages", "Posts", "Search"]);
        assert_eq!(folder(&items, "Posts").operations().len(), 6);
        assert_eq!(folder(&items, "Search").operations().len(), 3);
    }

    #[test]
    fn test_settings_is_single_read() {
        let mut config = Config::default();
        config.entities = vec![StandardEntity::Settings];
        let host = StubHost::default();
        let items = CatalogBuilder::new(&host, &config).basic_routes().unwrap();
        let ops = folder(&items, "Settings").operations();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].method(), &Method::Get);
        assert!(ops[0].request.url.query.is_empty());
    }

    #[test]
    fn test_mutating_operations_carry_nonce() {
        let config = Config::default();
        let host = StubHost::default();
        let items = CatalogBuilder::new(&host, &config).basic_routes().unwrap();
        for op in folder(&items, "Tags").operations() {
            let has_nonce = op.request.headers.iter().any(|h| h.key == "X-WP-Nonce");
            assert_eq!(has_nonce, op.method().is_mutating(), "{}", op.name);
        }
        let delete = folder(&items, "Tags").operations()[5];
        assert_eq!(delete.request.url.raw, "{{baseUrl}}/wp-json/wp/v2/tags/{{TagID}}");
        assert!(delete.request.body.is_none());
    }

    #[test]
    fn test_posts_list_with_rich_metadata() {
        let config = Config::default();
        let host = StubHost::with(&[Capability::CustomFields]);
        let items = CatalogBuilder::new(&host, &config).basic_routes().unwrap();
        let list = folder(&items, "Posts").operations()[0];
        let query = &list.request.url.query;
        assert_eq!(query[0].key, "acf_format");
        assert_eq!(query[1].value, format!("{},acf", POSTS_FIELDS));
        assert!(!query[2].enabled);
        assert_eq!(
            list.request.url.raw,
            format!(
                "{{{{baseUrl}}}}/wp-json/wp/v2/posts?acf_format=standard&_fields={},acf",
                POSTS_FIELDS
            )
        );
    }

    #[test]
    fn test_entity_from_str() {
        assert_eq!("Posts".parse::<StandardEntity>().unwrap(), StandardEntity::Posts);
        assert!("widgets".parse::<StandardEntity>().is_err());
    }
}
