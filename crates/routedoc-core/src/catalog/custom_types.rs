//! Custom content type folders.

use super::{core_url, forms::FORMS_TYPE, id_variable, placeholder, CatalogBuilder, RICH_FIELD};
use crate::collection::{Folder, Item, Method, Operation, Param};
use crate::host::{ContentType, Host};
use crate::Result;

/// Types the host always registers; they are covered by the standard entities.
pub(super) const BUILTIN_TYPES: [&str; 3] = ["page", "post", "attachment"];

impl<'a, H: Host + ?Sized> CatalogBuilder<'a, H> {
    /// Custom types known to the host, minus the built-ins.
    pub fn discovered_types(&self) -> Result<Vec<ContentType>> {
        Ok(self
            .host
            .content_types()?
            .into_iter()
            .filter(|t| !BUILTIN_TYPES.contains(&t.name.as_str()))
            .collect())
    }

    /// One folder per selected custom type, in selection order.
    pub fn custom_type_folders(&self, discovered: &[ContentType]) -> Result<Vec<Item>> {
        let mut folders = Vec::new();
        for selected in &self.config.custom_types {
            let Some(ty) = discovered.iter().find(|t| &t.name == selected) else {
                log::debug!("custom type '{}' is not registered, skipping", selected);
                continue;
            };
            let folder = if ty.name == FORMS_TYPE {
                self.forms_folder(ty)?
            } else {
                Some(Folder::new(ty.plural_label(), self.custom_type_operations(ty)?))
            };
            if let Some(folder) = folder.filter(|f| !f.items.is_empty()) {
                folders.push(folder.into());
            }
        }
        Ok(folders)
    }

    fn custom_type_operations(&self, ty: &ContentType) -> Result<Vec<Item>> {
        let base = ty.rest_base();
        let singular = ty.singular_label();
        let plural = ty.plural_label();
        let id = placeholder(&id_variable(&singular));
        let rich = self.rich_list(&ty.name);

        let mut list_query = Vec::new();
        let mut fields = self.list_fields();
        if rich {
            fields = format!("{},{}", fields, RICH_FIELD);
            list_query.push(Param::new("acf_format", "standard"));
        }
        list_query.push(Param::new("_fields", fields));
        list_query.extend(self.list_extras(base == "posts" || base == "pages"));
        list_query.extend(self.pagination());

        let list = Operation::new(
            format!("List of {}", plural),
            Method::Get,
            core_url([base], list_query),
            format!(
                "Get list of all {}{}",
                plural,
                if rich { " with ACF fields" } else { "" }
            ),
        )
        .with_headers(self.default_headers());

        let mut slug_query = vec![Param::new("slug", "example")];
        slug_query.extend(self.single_extras());
        let by_slug = Operation::new(
            format!("{} by Slug", singular),
            Method::Get,
            core_url([base], slug_query),
            format!("Get specific {} by slug", singular),
        )
        .with_headers(self.default_headers());

        let by_id = Operation::new(
            format!("{} by ID", singular),
            Method::Get,
            core_url([base, id.as_str()], self.single_extras()),
            format!("Get specific {} by ID", singular),
        )
        .with_headers(self.default_headers());

        let mut ops = vec![list, by_slug, by_id];
        ops.extend(self.write_operations(base, &singular, &id)?);
        Ok(ops.into_iter().map(Item::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::StubHost;
    use super::*;
    use crate::config::{Config, RichMetadata};
    use crate::host::Capability;

    fn book() -> ContentType {
        ContentType {
            name: "book".into(),
            rest_base: Some("books".into()),
            label: Some("Books".into()),
            singular_label: Some("Book".into()),
        }
    }

    #[test]
    fn test_builtins_are_not_discovered() {
        let mut host = StubHost::default();
        host.types = vec![
            ContentType {
                name: "post".into(),
                rest_base: None,
                label: None,
                singular_label: None,
            },
            book(),
        ];
        let config = Config::default();
        let types = CatalogBuilder::new(&host, &config).discovered_types().unwrap();
        assert_eq!(types, vec![book()]);
    }

    #[test]
    fn test_custom_type_six_operations() {
        let host = StubHost::with(&[Capability::CustomFields]);
        let mut config = Config::default();
        config.custom_types = vec!["book".into(), "missing".into()];
        config.rich_metadata = RichMetadata::Only(vec!["book".into()]);
        let builder = CatalogBuilder::new(&host, &config);
        let folders = builder.custom_type_folders(&[book()]).unwrap();
        assert_eq!(folders.len(), 1);

        let Item::Folder(folder) = &folders[0] else {
            panic!("expected folder");
        };
        assert_eq!(folder.name, "Books");
        let ops = folder.operations();
        let names: Vec<_> = ops.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(
            names,
            ["List of Books", "Book by Slug", "Book by ID", "Create Book", "Update Book", "Delete Book"]
        );
        assert_eq!(ops[0].request.url.query[1].value, "id,slug,title,acf");
        assert_eq!(ops[2].request.url.path.last().unwrap(), "{{BookID}}");
    }

    #[test]
    fn test_unselected_types_are_skipped() {
        let host = StubHost::default();
        let config = Config::default();
        let folders = CatalogBuilder::new(&host, &config)
            .custom_type_folders(&[book()])
            .unwrap();
        assert!(folders.is_empty());
    }
}
