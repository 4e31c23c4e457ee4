//! Dynamic route discovery.
//!
//! Exposes the namespaces of the host's live route registry and turns the
//! routes of selected namespaces into collection operations. Regex route
//! patterns are normalized into readable `:name` paths and request bodies are
//! synthesized from the declared argument schemas.

// Internal imports (std, crate)
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::catalog::{content_type_json, nonce_headers, read_headers};
use crate::collection::{Body, Folder, Item, Method, Operation, UrlTemplate};
use crate::host::{ArgSchema, Host, RouteTable};
use crate::Result;

// External imports (alphabetized)
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map as JsonMap, Value as JsonValue};

/// Name of the top-level folder holding discovered routes.
pub const REGISTERED_ROUTES_FOLDER: &str = "Registered Routes";

/// Core and internal namespaces never offered for inclusion.
const HIDDEN_NAMESPACES: [&str; 6] = [
    "wp/v2",
    "wc/v3",
    "batch/v1",
    "wp-abilities/v1",
    "wp-block-editor/v1",
    "wp-site-health/v1",
];

/// First-segment prefix reserved for host-internal namespaces.
const INTERNAL_PREFIX: &str = "wp-";

static NAMED_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\?P<([^>]+)>[^)]+\)").expect("valid named group regex"));
static UNNAMED_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^)]+\)").expect("valid group regex"));
static TRAILING_FRAGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#.*$").expect("valid fragment regex"));
static PATH_PARAM: Lazy<Regex> = Lazy::new(|| Regex::new(r":(\w+)").expect("valid param regex"));

/// Normalized path to the methods already present for it.
pub type ExistingKeys = HashMap<String, BTreeSet<String>>;

/// Caller policy narrowing the includable namespaces.
pub type NamespacePolicy = Box<dyn Fn(BTreeSet<String>) -> BTreeSet<String> + Send + Sync>;

/// Caller hook rewriting a synthesized request body.
///
/// Receives the body built from the argument schemas (`{}` when the route
/// declares none), the full path, the method and the namespace.
pub type DemoBodyHook = Box<dyn Fn(JsonValue, &str, &Method, &str) -> JsonValue + Send + Sync>;

/// Reads one registry snapshot and builds operations from it.
pub struct RouteDiscoverer {
    routes: RouteTable,
    accept_language: String,
    policy: Option<NamespacePolicy>,
    demo_body_hook: Option<DemoBodyHook>,
}

impl RouteDiscoverer {
    pub fn new(routes: RouteTable, locale: &str) -> Self {
        Self {
            routes,
            accept_language: locale.replace('_', "-"),
            policy: None,
            demo_body_hook: None,
        }
    }

    /// Snapshot the host's registry. Never cached across generations.
    pub fn from_host<H: Host + ?Sized>(host: &H) -> Result<Self> {
        Ok(Self::new(host.registered_routes()?, &host.default_locale()))
    }

    pub fn with_policy(mut self, policy: NamespacePolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn with_demo_body_hook(mut self, hook: DemoBodyHook) -> Self {
        self.demo_body_hook = Some(hook);
        self
    }

    /// Every namespace that has at least one visible endpoint.
    pub fn available_namespaces(&self) -> BTreeSet<String> {
        self.routes
            .iter()
            .filter(|(_, endpoints)| endpoints.iter().any(|e| e.is_visible()))
            .filter_map(|(pattern, _)| namespace_of(pattern))
            .collect()
    }

    /// Available namespaces minus core/internal ones, then the caller policy.
    pub fn includable_namespaces(&self) -> BTreeSet<String> {
        let candidates: BTreeSet<String> = self
            .available_namespaces()
            .into_iter()
            .filter(|ns| is_custom_namespace(ns))
            .collect();
        match &self.policy {
            Some(policy) => policy(candidates),
            None => candidates,
        }
    }

    /// Operations for the selected namespaces, one sub-folder per namespace.
    ///
    /// Pairs already present in `existing` or added earlier in this pass are
    /// skipped. The selection is taken as given; filtering it is the caller's
    /// job.
    pub fn build_folder(&self, selected: &[String], existing: &ExistingKeys) -> Result<Folder> {
        let selected: HashSet<&str> = selected.iter().map(String::as_str).collect();
        let mut by_namespace: BTreeMap<String, Vec<Item>> = BTreeMap::new();
        let mut added: HashSet<(String, String)> = HashSet::new();

        for (pattern, endpoints) in &self.routes {
            let Some(namespace) = namespace_of(pattern) else {
                continue;
            };
            if !selected.contains(namespace.as_str()) {
                continue;
            }
            let readable = normalize_route_pattern(pattern);
            let full_path = format!("/wp-json{}", readable);
            let key = path_key(&full_path);

            for endpoint in endpoints.iter().filter(|e| e.is_visible()) {
                for raw_method in &endpoint.methods {
                    let method = Method::from(raw_method.as_str());
                    if matches!(method, Method::Other(_)) {
                        log::debug!("skipping {} {}: unsupported method", raw_method, readable);
                        continue;
                    }
                    let method_name = method.as_str().to_string();
                    if existing
                        .get(&key)
                        .is_some_and(|methods| methods.contains(&method_name))
                    {
                        log::debug!("{} {} already covered, skipping", method_name, full_path);
                        continue;
                    }
                    if !added.insert((key.clone(), method_name)) {
                        continue;
                    }
                    let op = self.route_operation(&full_path, &readable, &namespace, method, &endpoint.args)?;
                    by_namespace
                        .entry(namespace.clone())
                        .or_default()
                        .push(op.into());
                }
            }
        }

        let folders = by_namespace
            .into_iter()
            .map(|(ns, items)| Folder::new(ns, items).into())
            .collect();
        Ok(Folder::new(REGISTERED_ROUTES_FOLDER, folders))
    }

    fn route_operation(
        &self,
        full_path: &str,
        readable: &str,
        namespace: &str,
        method: Method,
        args: &IndexMap<String, ArgSchema>,
    ) -> Result<Operation> {
        let mut headers = read_headers(&self.accept_language);
        if method.is_mutating() {
            headers.extend(nonce_headers());
        }
        let takes_body = method.accepts_body();
        if takes_body {
            headers.push(content_type_json());
        }

        let segments: Vec<&str> = full_path.split('/').filter(|s| !s.is_empty()).collect();
        let description = format!(
            "Registered route: {} {} (namespace {}).",
            method, readable, namespace
        );
        let mut op = Operation::new(
            format!("{} {}", method, readable),
            method,
            UrlTemplate::new(segments, Vec::new()),
            description,
        )
        .with_headers(headers);
        if takes_body {
            let mut body = demo_body(args, readable);
            if let Some(hook) = &self.demo_body_hook {
                body = hook(body, full_path, &op.request.method, namespace);
            }
            op = op.with_body(Body::json(&body)?);
        }
        Ok(op)
    }
}

/// `group/version` prefix of a route pattern, if it has two segments.
pub fn namespace_of(pattern: &str) -> Option<String> {
    let mut parts = pattern.split('/').filter(|s| !s.is_empty());
    let group = parts.next()?;
    let version = parts.next()?;
    Some(format!("{}/{}", group, version))
}

/// Whether a namespace may be offered for inclusion.
pub fn is_custom_namespace(namespace: &str) -> bool {
    if HIDDEN_NAMESPACES.contains(&namespace) {
        return false;
    }
    let first = namespace.split('/').next().unwrap_or_default();
    !first.is_empty() && !first.starts_with(INTERNAL_PREFIX)
}

/// Turn a registry regex pattern into a readable path.
///
/// `(?P<id>[\d]+)` becomes `:id`; unnamed groups, anchors and a trailing
/// `#...` fragment are removed. The result always starts with `/`.
pub fn normalize_route_pattern(pattern: &str) -> String {
    let trimmed = pattern.trim_matches('/');
    let named = NAMED_GROUP.replace_all(trimmed, ":$1");
    let unnamed = UNNAMED_GROUP.replace_all(&named, "");
    let without_fragment = TRAILING_FRAGMENT.replace(&unnamed, "");
    let without_anchors = without_fragment
        .trim_start_matches('^')
        .trim_end_matches('$');
    format!("/{}", without_anchors.trim_matches('/'))
}

/// Normalized key for cross-source comparison: placeholders become `*`.
///
/// Accepts collection segments (`{{PostID}}`) and readable paths (`:id`).
pub fn path_key(path: &str) -> String {
    let segments: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.starts_with(':') || (s.starts_with("{{") && s.ends_with("}}")) {
                "*"
            } else {
                s
            }
        })
        .collect();
    format!("/{}", segments.join("/"))
}

/// Example body from argument schemas; arguments bound by the path are left out.
pub fn demo_body(args: &IndexMap<String, ArgSchema>, readable_path: &str) -> JsonValue {
    let path_params: HashSet<&str> = PATH_PARAM
        .captures_iter(readable_path)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();
    let mut body = JsonMap::new();
    for (name, schema) in args {
        if path_params.contains(name.as_str()) {
            continue;
        }
        body.insert(name.clone(), arg_example(schema));
    }
    JsonValue::Object(body)
}

/// Default, else first enum value, else a zero value for the declared type.
fn arg_example(schema: &ArgSchema) -> JsonValue {
    if let Some(default) = &schema.default {
        return default.clone();
    }
    if let Some(first) = schema.variants.as_ref().and_then(|v| v.first()) {
        return first.clone();
    }
    match schema.kind.as_deref().unwrap_or("string") {
        "integer" | "number" => json!(0),
        "boolean" => json!(false),
        "array" => json!([]),
        "object" => json!({}),
        _ => json!(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RouteEndpoint;
    use serde_json::json;

    fn endpoint(methods: &[&str], args: JsonValue) -> RouteEndpoint {
        serde_json::from_value(json!({"methods": methods, "args": args})).unwrap()
    }

    fn registry() -> RouteTable {
        let mut routes = RouteTable::new();
        routes.insert("/wp/v2/posts".into(), vec![endpoint(&["GET", "POST"], json!({}))]);
        routes.insert(
            "/acme/v1/items/(?P<id>[\\d]+)".into(),
            vec![endpoint(
                &["GET", "PUT"],
                json!({
                    "id": {"type": "integer"},
                    "title": {"type": "string"},
                    "count": {"type": "integer", "default": 3},
                    "mode": {"type": "string", "enum": ["fast", "slow"]},
                    "tags": {"type": "array"},
                    "flag": {"type": "boolean"}
                }),
            )],
        );
        routes.insert("/acme/v1/ping".into(), vec![endpoint(&["GET", "OPTIONS"], json!({}))]);
        routes.insert(
            "/hidden/v1/secret".into(),
            vec![serde_json::from_value(json!({"methods": "GET", "show_in_index": false})).unwrap()],
        );
        routes.insert("/wp-site-health/v1/tests".into(), vec![endpoint(&["GET"], json!({}))]);
        routes.insert("/zeta/v2/things".into(), vec![endpoint(&["DELETE"], json!({}))]);
        routes
    }

    #[test]
    fn test_normalize_route_pattern() {
        assert_eq!(
            normalize_route_pattern("/acme/v1/items/(?P<id>[\\d]+)"),
            "/acme/v1/items/:id"
        );
        assert_eq!(
            normalize_route_pattern("/acme/v1/(?P<slug>[a-z-]+)/files(\\d+)"),
            "/acme/v1/:slug/files"
        );
        assert_eq!(normalize_route_pattern("^/acme/v1/export$"), "/acme/v1/export");
        assert_eq!(normalize_route_pattern("/acme/v1/docs#anchor"), "/acme/v1/docs");
        assert_eq!(normalize_route_pattern("/"), "/");
    }

    #[test]
    fn test_namespaces() {
        let discoverer = RouteDiscoverer::new(registry(), "en_US");
        let available: Vec<_> = discoverer.available_namespaces().into_iter().collect();
        assert_eq!(available, ["acme/v1", "wp-site-health/v1", "wp/v2", "zeta/v2"]);
        let includable: Vec<_> = discoverer.includable_namespaces().into_iter().collect();
        assert_eq!(includable, ["acme/v1", "zeta/v2"]);

        let narrowed = RouteDiscoverer::new(registry(), "en_US").with_policy(Box::new(|set: BTreeSet<String>| {
            set.into_iter().filter(|ns| ns.starts_with("acme")).collect()
        }));
        assert_eq!(narrowed.includable_namespaces().len(), 1);
    }

    #[test]
    fn test_build_folder_groups_and_sorts() {
        let discoverer = RouteDiscoverer::new(registry(), "en_US");
        let folder = discoverer
            .build_folder(&["zeta/v2".into(), "acme/v1".into()], &ExistingKeys::new())
            .unwrap();
        assert_eq!(folder.name, REGISTERED_ROUTES_FOLDER);
        let names: Vec<_> = folder
            .items
            .iter()
            .map(|i| match i {
                Item::Folder(f) => f.name.clone(),
                Item::Operation(o) => o.name.clone(),
            })
            .collect();
        assert_eq!(names, ["acme/v1", "zeta/v2"]);

        let acme = folder.folder("acme/v1").unwrap().operations();
        let op_names: Vec<_> = acme.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(
            op_names,
            ["GET /acme/v1/items/:id", "PUT /acme/v1/items/:id", "GET /acme/v1/ping"]
        );
        assert_eq!(acme[0].request.url.raw, "{{baseUrl}}/wp-json/acme/v1/items/:id");
        assert!(acme[0].request.body.is_none());
    }

    #[test]
    fn test_demo_body_from_args() {
        let discoverer = RouteDiscoverer::new(registry(), "en_US");
        let folder = discoverer
            .build_folder(&["acme/v1".into()], &ExistingKeys::new())
            .unwrap();
        let put = folder.folder("acme/v1").unwrap().operations()[1];
        let Some(Body::Raw { raw, .. }) = &put.request.body else {
            panic!("expected json body");
        };
        let body: JsonValue = serde_json::from_str(raw).unwrap();
        assert_eq!(
            body,
            json!({"title": "", "count": 3, "mode": "fast", "tags": [], "flag": false})
        );
        assert!(put.request.headers.iter().any(|h| h.key == "X-WP-Nonce"));
    }

    #[test]
    fn test_demo_body_hook_fills_argless_post() {
        let mut routes = RouteTable::new();
        routes.insert("/acme/v1/submit".into(), vec![endpoint(&["POST"], json!({}))]);

        let plain = RouteDiscoverer::new(routes.clone(), "en_US")
            .build_folder(&["acme/v1".into()], &ExistingKeys::new())
            .unwrap();
        let post = plain.folder("acme/v1").unwrap().operations()[0];
        let Some(Body::Raw { raw, .. }) = &post.request.body else {
            panic!("expected json body");
        };
        assert_eq!(serde_json::from_str::<JsonValue>(raw).unwrap(), json!({}));

        let hooked = RouteDiscoverer::new(routes, "en_US")
            .with_demo_body_hook(Box::new(|body: JsonValue, path: &str, method: &Method, namespace: &str| {
                assert_eq!(body, json!({}));
                assert_eq!(path, "/wp-json/acme/v1/submit");
                assert_eq!(method.as_str(), "POST");
                assert_eq!(namespace, "acme/v1");
                json!({"email": "user@example.com"})
            }))
            .build_folder(&["acme/v1".into()], &ExistingKeys::new())
            .unwrap();
        let post = hooked.folder("acme/v1").unwrap().operations()[0];
        let Some(Body::Raw { raw, .. }) = &post.request.body else {
            panic!("expected json body");
        };
        assert_eq!(
            serde_json::from_str::<JsonValue>(raw).unwrap(),
            json!({"email": "user@example.com"})
        );
    }

    #[test]
    fn test_existing_keys_suppress_duplicates() {
        let discoverer = RouteDiscoverer::new(registry(), "en_US");
        let mut existing = ExistingKeys::new();
        existing.insert(
            path_key("/wp-json/acme/v1/items/{{ItemID}}"),
            BTreeSet::from(["GET".to_string()]),
        );
        let folder = discoverer.build_folder(&["acme/v1".into()], &existing).unwrap();
        let names: Vec<_> = folder.operations().iter().map(|o| o.name.clone()).collect();
        assert_eq!(names, ["PUT /acme/v1/items/:id", "GET /acme/v1/ping"]);
    }

    #[test]
    fn test_path_key() {
        assert_eq!(path_key("/wp-json/wp/v2/posts/{{PostID}}"), "/wp-json/wp/v2/posts/*");
        assert_eq!(path_key("/wp-json/acme/v1/items/:id/"), "/wp-json/acme/v1/items/*");
    }
}
