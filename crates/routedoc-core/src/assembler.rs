//! Collection assembly.
//!
//! Runs the catalog builder and the route discoverer as one straight-line
//! pipeline and merges their folders into a single [`Collection`]. Every
//! generation reads the host afresh; nothing is cached between calls.

// Internal imports (std, crate)
use std::collections::BTreeSet;

use crate::catalog::CatalogBuilder;
use crate::collection::{Collection, CollectionInfo, Folder, Item, COLLECTION_SCHEMA};
use crate::config::Config;
use crate::discovery::{path_key, DemoBodyHook, ExistingKeys, NamespacePolicy, RouteDiscoverer};
use crate::host::Host;
use crate::Result;

/// Name of the folder holding the standard entity folders and search.
pub const BASIC_ROUTES_FOLDER: &str = "Basic Routes";

/// Hook applied to the finished collection before it is returned.
pub type CollectionTransform = Box<dyn Fn(Collection) -> Collection + Send + Sync>;

pub struct CollectionAssembler<'a, H: Host + ?Sized> {
    host: &'a H,
    config: &'a Config,
    transform: Option<CollectionTransform>,
    namespace_policy: Option<NamespacePolicy>,
    demo_body_hook: Option<DemoBodyHook>,
}

impl<'a, H: Host + ?Sized> CollectionAssembler<'a, H> {
    pub fn new(host: &'a H, config: &'a Config) -> Self {
        Self {
            host,
            config,
            transform: None,
            namespace_policy: None,
            demo_body_hook: None,
        }
    }

    pub fn with_transform(mut self, transform: CollectionTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Narrow the namespaces that may be included from the route registry.
    pub fn with_namespace_policy(mut self, policy: NamespacePolicy) -> Self {
        self.namespace_policy = Some(policy);
        self
    }

    /// Rewrite the example bodies of discovered routes that take one.
    pub fn with_demo_body_hook(mut self, hook: DemoBodyHook) -> Self {
        self.demo_body_hook = Some(hook);
        self
    }

    /// Build the collection. Any collaborator failure aborts the generation.
    pub fn assemble(self) -> Result<Collection> {
        let builder = CatalogBuilder::new(self.host, self.config);
        let discovered = builder.discovered_types()?;

        let mut items: Vec<Item> = vec![Folder::new(BASIC_ROUTES_FOLDER, builder.basic_routes()?).into()];
        if let Some(folder) = builder.commerce_folder()? {
            items.push(folder.into());
        }
        if let Some(folder) = builder.options_folder()? {
            items.push(folder.into());
        }
        items.extend(builder.custom_type_folders(&discovered)?);
        if let Some(folder) = builder.specific_pages_folder()? {
            items.push(folder.into());
        }
        if let Some(folder) = builder.posts_by_categories_folder()? {
            items.push(folder.into());
        }

        if !self.config.namespaces.is_empty() {
            let mut discoverer = RouteDiscoverer::from_host(self.host)?;
            if let Some(policy) = self.namespace_policy {
                discoverer = discoverer.with_policy(policy);
            }
            if let Some(hook) = self.demo_body_hook {
                discoverer = discoverer.with_demo_body_hook(hook);
            }
            let includable = discoverer.includable_namespaces();
            let selected: Vec<String> = self
                .config
                .namespaces
                .iter()
                .filter(|ns| {
                    let keep = includable.contains(ns.as_str());
                    if !keep {
                        log::debug!("namespace '{}' is not includable, skipping", ns);
                    }
                    keep
                })
                .cloned()
                .collect();
            if !selected.is_empty() {
                let folder = discoverer.build_folder(&selected, &existing_keys(&items))?;
                if !folder.items.is_empty() {
                    items.push(folder.into());
                }
            }
        }

        let name = self
            .config
            .collection_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.host.site_name());
        let collection = Collection {
            info: CollectionInfo {
                name,
                schema_id: COLLECTION_SCHEMA.to_string(),
            },
            variables: builder.variables(&discovered),
            items,
        };
        log::info!(
            "assembled collection '{}': {} folders, {} operations",
            collection.info.name,
            collection.items.len(),
            collection.operations().len()
        );

        Ok(match self.transform {
            Some(transform) => transform(collection),
            None => collection,
        })
    }
}

/// Normalized path to methods for every operation already in `items`.
pub fn existing_keys(items: &[Item]) -> ExistingKeys {
    let mut keys = ExistingKeys::new();
    let mut stack: Vec<&Item> = items.iter().collect();
    while let Some(item) = stack.pop() {
        match item {
            Item::Folder(folder) => stack.extend(folder.items.iter()),
            Item::Operation(op) => {
                let key = path_key(&format!("/{}", op.request.url.path.join("/")));
                keys.entry(key)
                    .or_insert_with(BTreeSet::new)
                    .insert(op.method().as_str().to_string());
            }
        }
    }
    keys
}
