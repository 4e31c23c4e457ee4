//! Individually selected pages and category-filtered post lists.

use std::collections::HashSet;

use super::{core_url, distinct_name, CatalogBuilder, POSTS_FIELDS};
use crate::collection::{Folder, Item, Method, Operation, Param};
use crate::host::{ContentItem, ContentQuery, Host};
use crate::Result;

/// Name of the folder listing selected pages. The OpenAPI converter skips it.
pub const SPECIFIC_PAGES_FOLDER: &str = "Specific Pages";

impl<'a, H: Host + ?Sized> CatalogBuilder<'a, H> {
    /// One read per selected page slug, titled from the content store.
    ///
    /// Pages sharing a title are told apart by their slug.
    pub fn specific_pages_folder(&self) -> Result<Option<Folder>> {
        let slugs = &self.config.pages;
        if slugs.is_empty() {
            return Ok(None);
        }
        let found = self
            .host
            .list_content_items("page", &ContentQuery::by_slugs(slugs))?;

        let mut items: Vec<Item> = Vec::with_capacity(slugs.len());
        let mut taken = HashSet::new();
        for slug in slugs {
            let title = match lookup(&found, slug) {
                Some(page) if !page.title.is_empty() => page.title.clone(),
                _ => {
                    log::debug!("page '{}' not found, using slug as title", slug);
                    slug.clone()
                }
            };
            let mut query = vec![Param::new("slug", slug)];
            query.extend(self.detailed_query());
            items.push(
                Operation::new(
                    distinct_name(&mut taken, title.clone(), slug),
                    Method::Get,
                    core_url(["pages"], query),
                    format!("Get {} by slug{}", title, self.rich_suffix()),
                )
                .with_headers(self.default_headers())
                .into(),
            );
        }
        Ok(Some(Folder::new(SPECIFIC_PAGES_FOLDER, items)))
    }

    /// Post lists filtered by each selected category.
    ///
    /// A slug the store does not know keeps its own name and filters by the
    /// `{{CategoryID}}` placeholder.
    pub fn posts_by_categories_folder(&self) -> Result<Option<Folder>> {
        let slugs = &self.config.categories;
        if slugs.is_empty() {
            return Ok(None);
        }
        let found = self
            .host
            .list_content_items("category", &ContentQuery::by_slugs(slugs))?;

        let mut items: Vec<Item> = Vec::with_capacity(slugs.len());
        let mut taken = HashSet::new();
        for slug in slugs {
            let (name, filter, description) = match lookup(&found, slug) {
                Some(term) => {
                    let name = if term.title.is_empty() {
                        slug.clone()
                    } else {
                        term.title.clone()
                    };
                    let description =
                        format!("Get posts filtered by category \"{}\" (ID {})", name, term.id);
                    (name, term.id.to_string(), description)
                }
                None => {
                    log::debug!("category '{}' not found, using placeholder id", slug);
                    let description = format!("Get posts filtered by category \"{}\"", slug);
                    (slug.clone(), "{{CategoryID}}".to_string(), description)
                }
            };
            let mut query = vec![
                Param::new("_fields", POSTS_FIELDS),
                Param::new("categories", filter),
            ];
            query.extend(self.list_extras(true));
            query.extend(self.pagination());
            items.push(
                Operation::new(
                    distinct_name(&mut taken, format!("Posts in {}", name), slug),
                    Method::Get,
                    core_url(["posts"], query),
                    description,
                )
                .with_headers(self.default_headers())
                .into(),
            );
        }
        Ok(Some(Folder::new("Posts by Categories", items)))
    }
}

fn lookup<'i>(items: &'i [ContentItem], slug: &str) -> Option<&'i ContentItem> {
    items.iter().find(|item| item.slug == slug)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::StubHost;
    use super::*;
    use crate::config::Config;

    fn host() -> StubHost {
        let mut host = StubHost::default();
        host.items = vec![
            (
                "page".into(),
                ContentItem {
                    id: 2,
                    slug: "about".into(),
                    title: "About Us".into(),
                    fields_config: None,
                },
            ),
            (
                "category".into(),
                ContentItem {
                    id: 7,
                    slug: "news".into(),
                    title: "News".into(),
                    fields_config: None,
                },
            ),
        ];
        host
    }

    #[test]
    fn test_specific_pages_fall_back_to_slug() {
        let host = host();
        let mut config = Config::default();
        config.pages = vec!["about".into(), "ghost".into()];
        let folder = CatalogBuilder::new(&host, &config)
            .specific_pages_folder()
            .unwrap()
            .unwrap();
        let names: Vec<_> = folder.operations().iter().map(|o| o.name.clone()).collect();
        assert_eq!(names, ["About Us", "ghost"]);
        assert_eq!(
            folder.operations()[1].request.url.raw,
            "{{baseUrl}}/wp-json/wp/v2/pages?slug=ghost&_fields=title,content"
        );
    }

    #[test]
    fn test_no_selection_no_folder() {
        let host = host();
        let config = Config::default();
        let builder = CatalogBuilder::new(&host, &config);
        assert!(builder.specific_pages_folder().unwrap().is_none());
        assert!(builder.posts_by_categories_folder().unwrap().is_none());
    }

    #[test]
    fn test_posts_by_categories() {
        let host = host();
        let mut config = Config::default();
        config.categories = vec!["news".into(), "unknown".into()];
        let folder = CatalogBuilder::new(&host, &config)
            .posts_by_categories_folder()
            .unwrap()
            .unwrap();
        let ops = folder.operations();
        assert_eq!(ops[0].name, "Posts in News");
        assert_eq!(ops[0].request.url.query[1].value, "7");
        assert_eq!(ops[1].request.url.query[1].value, "{{CategoryID}}");
    }

    #[test]
    fn test_colliding_titles_get_slugs() {
        let mut host = host();
        for (ty, slug, title) in [
            ("page", "about-2", "About Us"),
            ("category", "news-archive", "News"),
        ] {
            host.items.push((
                ty.into(),
                ContentItem {
                    id: 40,
                    slug: slug.into(),
                    title: title.into(),
                    fields_config: None,
                },
            ));
        }
        let mut config = Config::default();
        config.pages = vec!["about".into(), "about-2".into()];
        config.categories = vec!["news".into(), "news-archive".into()];
        let builder = CatalogBuilder::new(&host, &config);

        let pages = builder.specific_pages_folder().unwrap().unwrap();
        let names: Vec<_> = pages.operations().iter().map(|o| o.name.clone()).collect();
        assert_eq!(names, ["About Us", "About Us (about-2)"]);

        let posts = builder.posts_by_categories_folder().unwrap().unwrap();
        let names: Vec<_> = posts.operations().iter().map(|o| o.name.clone()).collect();
        assert_eq!(names, ["Posts in News", "Posts in News (news-archive)"]);
    }
}
