//! E-commerce (WooCommerce `wc/v3`) block.
//!
//! Requests authenticate through the folder's basic-auth credentials, so the
//! individual operations carry no nonce header.

use serde_json::{json, Value as JsonValue};

use super::{content_type_json, placeholder, CatalogBuilder};
use crate::collection::{Body, Folder, FolderAuth, Item, Method, Operation, Param, UrlTemplate};
use crate::host::{Capability, Host};
use crate::knowledge;
use crate::Result;

const WC_PATH: [&str; 3] = ["wp-json", "wc", "v3"];

/// One resource family of the block.
struct Resource<'r> {
    folder: &'r str,
    singular: &'r str,
    plural: &'r str,
    segments: &'r [&'r str],
    id_variable: &'r str,
    list_filters: Vec<Param>,
    create: JsonValue,
    update: JsonValue,
}

fn wc_url(segments: &[&str], mut query: Vec<Param>) -> UrlTemplate {
    knowledge::enrich_query(&mut query);
    let mut path: Vec<&str> = WC_PATH.to_vec();
    path.extend_from_slice(segments);
    UrlTemplate::new(path, query)
}

impl<'a, H: Host + ?Sized> CatalogBuilder<'a, H> {
    /// Whether the block (and its variables) belongs in this generation.
    pub fn commerce_enabled(&self) -> bool {
        self.config.include_extension && self.host.is_capability_active(Capability::Ecommerce)
    }

    pub fn commerce_folder(&self) -> Result<Option<Folder>> {
        if !self.commerce_enabled() {
            return Ok(None);
        }
        let mut folders = Vec::new();
        for resource in resources() {
            folders.push(Item::from(self.commerce_resource(&resource)?));
        }
        let mut folder = Folder::new("WooCommerce", folders);
        folder.auth = Some(FolderAuth::basic("{{wcConsumerKey}}", "{{wcConsumerSecret}}"));
        Ok(Some(folder))
    }

    fn commerce_resource(&self, r: &Resource<'_>) -> Result<Folder> {
        let id = placeholder(r.id_variable);
        let mut by_id_segments: Vec<&str> = r.segments.to_vec();
        by_id_segments.push(&id);

        let mut list_query = vec![
            Param::disabled("page", "1"),
            Param::disabled("per_page", "10"),
        ];
        list_query.extend(r.list_filters.iter().cloned());

        let json_headers = vec![content_type_json()];
        let lower_singular = r.singular.to_ascii_lowercase();
        let ops = vec![
            Operation::new(
                format!("List {}", r.plural),
                Method::Get,
                wc_url(r.segments, list_query),
                format!("List all {}.", r.plural.to_ascii_lowercase()),
            )
            .with_headers(self.default_headers()),
            Operation::new(
                format!("{} by ID", r.singular),
                Method::Get,
                wc_url(&by_id_segments, vec![Param::disabled("context", "view")]),
                format!("Get {} by ID.", lower_singular),
            )
            .with_headers(self.default_headers()),
            Operation::new(
                format!("Create {}", r.singular),
                Method::Post,
                wc_url(r.segments, Vec::new()),
                format!("Create new {}.", lower_singular),
            )
            .with_headers(json_headers.clone())
            .with_body(Body::json(&r.create)?),
            Operation::new(
                format!("Update {}", r.singular),
                Method::Put,
                wc_url(&by_id_segments, Vec::new()),
                format!("Update {} by ID.", lower_singular),
            )
            .with_headers(json_headers)
            .with_body(Body::json(&r.update)?),
            Operation::new(
                format!("Delete {}", r.singular),
                Method::Delete,
                wc_url(&by_id_segments, vec![Param::disabled("force", "true")]),
                format!("Delete {}. Use force=true for permanent delete.", lower_singular),
            ),
        ];
        Ok(Folder::new(r.folder, ops.into_iter().map(Item::from).collect()))
    }
}

fn resources() -> Vec<Resource<'static>> {
    let off = Param::disabled;
    vec![
        Resource {
            folder: "Products",
            singular: "Product",
            plural: "Products",
            segments: &["products"],
            id_variable: "ProductID",
            list_filters: vec![
                off("context", "view"),
                off("search", ""),
                off("after", ""),
                off("before", ""),
                off("exclude", ""),
                off("include", ""),
                off("slug", ""),
                off("status", "publish"),
                off("type", "simple"),
                off("category", ""),
                off("tag", ""),
                off("orderby", "date"),
                off("order", "desc"),
            ],
            create: json!({
                "name": "Sample Product",
                "type": "simple",
                "regular_price": "29.99",
                "description": "Product description.",
                "short_description": "Short description.",
                "status": "draft",
            }),
            update: json!({"name": "Updated Product Name", "regular_price": "39.99"}),
        },
        Resource {
            folder: "Product Categories",
            singular: "Product Category",
            plural: "Product Categories",
            segments: &["products", "categories"],
            id_variable: "ProductCategoryID",
            list_filters: vec![
                off("context", "view"),
                off("search", ""),
                off("exclude", ""),
                off("include", ""),
                off("slug", ""),
                off("parent", "0"),
                off("orderby", "name"),
                off("order", "asc"),
            ],
            create: json!({
                "name": "Sample Category",
                "slug": "sample-category",
                "description": "Category description.",
                "parent": 0,
            }),
            update: json!({"name": "Updated Category", "slug": "updated-category"}),
        },
        Resource {
            folder: "Orders",
            singular: "Order",
            plural: "Orders",
            segments: &["orders"],
            id_variable: "OrderID",
            list_filters: vec![
                off("context", "view"),
                off("search", ""),
                off("after", ""),
                off("before", ""),
                off("status", "any"),
                off("customer", ""),
                off("product", ""),
                off("orderby", "date"),
                off("order", "desc"),
            ],
            create: json!({
                "payment_method": "bacs",
                "billing": {
                    "first_name": "John",
                    "last_name": "Doe",
                    "address_1": "123 Main St",
                    "city": "Anytown",
                    "postcode": "12345",
                    "country": "US",
                    "email": "john@example.com",
                },
                "line_items": [{"product_id": 1, "quantity": 1}],
            }),
            update: json!({"status": "processing"}),
        },
    ]
}
