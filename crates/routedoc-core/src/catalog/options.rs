//! Option group ("Options Pages") folder.

use super::CatalogBuilder;
use crate::collection::{Folder, Item, Method, Operation, UrlTemplate};
use crate::host::Host;
use crate::utils::title_from_slug;
use crate::Result;

const OPTIONS_PATH: [&str; 4] = ["wp-json", "custom", "v1", "options"];

/// Slugs with this prefix are demo placeholders and never exported.
const EXAMPLE_PREFIX: &str = "example-";

impl<'a, H: Host + ?Sized> CatalogBuilder<'a, H> {
    /// "Options Pages" folder, or `None` when no real group is selected.
    ///
    /// Without an explicit selection every configured group is listed.
    pub fn options_folder(&self) -> Result<Option<Folder>> {
        let configured = self.host.configured_option_groups()?;
        let slugs: Vec<String> = match &self.config.option_groups {
            Some(selected) => selected.clone(),
            None => configured.iter().map(|g| g.slug.clone()).collect(),
        };

        let mut items: Vec<Item> = Vec::new();
        for slug in slugs {
            if slug.starts_with(EXAMPLE_PREFIX) {
                log::debug!("skipping example option group '{}'", slug);
                continue;
            }
            let title = configured
                .iter()
                .find(|g| g.slug == slug)
                .and_then(|g| g.title.clone())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| title_from_slug(&slug));
            let mut path: Vec<&str> = OPTIONS_PATH.to_vec();
            path.push(&slug);
            items.push(
                Operation::new(
                    title.as_str(),
                    Method::Get,
                    UrlTemplate::new(path, Vec::new()),
                    format!("Get options for {}", title),
                )
                .with_headers(self.default_headers())
                .into(),
            );
        }

        if items.is_empty() {
            return Ok(None);
        }
        items.insert(
            0,
            Operation::new(
                "List of Options Pages",
                Method::Get,
                UrlTemplate::new(OPTIONS_PATH, Vec::new()),
                "Get list of all available options pages",
            )
            .with_headers(self.default_headers())
            .into(),
        );
        Ok(Some(Folder::new("Options Pages", items)))
    }
}
