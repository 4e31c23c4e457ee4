//! Collection-level variable dictionary.

use super::{id_variable, CatalogBuilder, StandardEntity};
use crate::collection::Variable;
use crate::host::{ContentType, Host};

impl<'a, H: Host + ?Sized> CatalogBuilder<'a, H> {
    /// Base URL used for `{{baseUrl}}`: the configured override, else the host's.
    pub fn base_url(&self) -> String {
        let raw = match &self.config.base_url {
            Some(url) => url.to_string(),
            None => self.host.resolve_base_url(),
        };
        raw.trim_end_matches('/').to_string()
    }

    /// Variables for every placeholder the catalog can emit. Keys are unique.
    pub fn variables(&self, discovered: &[ContentType]) -> Vec<Variable> {
        let mut vars = vec![
            Variable::new("baseUrl", self.base_url()),
            Variable::new("wpNonce", ""),
        ];
        for entity in [
            StandardEntity::Posts,
            StandardEntity::Pages,
            StandardEntity::Comments,
            StandardEntity::Users,
            StandardEntity::Categories,
            StandardEntity::Tags,
        ] {
            vars.push(Variable::new(id_variable(entity.singular()), entity.default_id()));
        }
        vars.push(Variable::new("TaxID", "1"));

        if self.commerce_enabled() {
            vars.push(Variable::new("wcConsumerKey", ""));
            vars.push(Variable::new("wcConsumerSecret", ""));
            vars.push(Variable::new("ProductID", "1"));
            vars.push(Variable::new("ProductCategoryID", "1"));
            vars.push(Variable::new("OrderID", "1"));
        }

        for ty in discovered {
            let key = id_variable(&ty.singular_label());
            if vars.iter().any(|v| v.key == key) {
                continue;
            }
            vars.push(Variable::new(key, "1"));
        }
        vars
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::StubHost;
    use super::*;
    use crate::config::Config;
    use crate::host::Capability;
    use url::Url;

    fn ty(name: &str, singular: &str) -> ContentType {
        ContentType {
            name: name.into(),
            rest_base: None,
            label: None,
            singular_label: Some(singular.into()),
        }
    }

    #[test]
    fn test_variables_are_unique() {
        let host = StubHost::with(&[Capability::Ecommerce]);
        let config = Config::default();
        let vars = CatalogBuilder::new(&host, &config)
            .variables(&[ty("book", "Book"), ty("product", "Product"), ty("novel", "Book")]);

        let keys: Vec<_> = vars.iter().map(|v| v.key.as_str()).collect();
        let mut deduped = keys.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), keys.len());
        assert!(keys.contains(&"BookID"));
        assert!(keys.contains(&"OrderID"));
        assert_eq!(vars[0].value, "https://example.com");
        assert_eq!(vars.iter().find(|v| v.key == "PageID").unwrap().value, "2");
    }

    #[test]
    fn test_base_url_override() {
        let host = StubHost::default();
        let mut config = Config::default();
        config.base_url = Some(Url::parse("https://staging.example.org/").unwrap());
        let builder = CatalogBuilder::new(&host, &config);
        assert_eq!(builder.base_url(), "https://staging.example.org");
        assert!(!builder.variables(&[]).iter().any(|v| v.key == "wcConsumerKey"));
    }
}
