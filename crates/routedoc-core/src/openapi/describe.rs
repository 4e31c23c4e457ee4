//! Operation descriptions: deciding whether a source description is usable
//! and synthesizing one from the path shape when it is not.

use super::document::{OpenApiParameter, ParameterLocation};

/// A usable description contains at least one of these.
const ACTION_VERBS: [&str; 10] = [
    "get", "retrieve", "create", "update", "delete", "list", "fetch", "obtain", "submit", "search",
];

/// Shortest description that is emitted at all.
pub const MIN_DESCRIPTION_LEN: usize = 10;

/// Whether `description` can be used verbatim for an operation called `name`.
pub fn is_good_description(description: &str, name: &str) -> bool {
    if description.is_empty() || description == name {
        return false;
    }
    if description.chars().count() < MIN_DESCRIPTION_LEN {
        return false;
    }
    if description.chars().any(|c| c.is_alphabetic() && !is_latin(c)) {
        return false;
    }
    let lower = description.to_lowercase();
    ACTION_VERBS.iter().any(|verb| lower.contains(verb))
}

/// ASCII plus the Latin-1 supplement and Latin extended blocks.
fn is_latin(c: char) -> bool {
    c.is_ascii() || matches!(c, '\u{00C0}'..='\u{024F}' | '\u{1E00}'..='\u{1EFF}')
}

/// Description derived from the OpenAPI path, method and parameters.
///
/// Returns an empty string when the path has no usable segment.
pub fn synthesize_description(path: &str, method: &str, parameters: &[OpenApiParameter]) -> String {
    let parts = segments(path);
    let Some(&last) = parts.last() else {
        return String::new();
    };
    let from_end = |k: usize| parts.len().checked_sub(k).map_or("", |i| parts[i]);
    let second_last = from_end(2);
    let method = method.to_ascii_uppercase();

    // Submissions live at `forms/{slug}/submit`.
    if last == "submit" && (second_last == "forms" || from_end(3) == "forms") {
        return match method.as_str() {
            "POST" => "Submit form data",
            _ => "Perform operation on form submission",
        }
        .to_string();
    }
    if second_last == "forms" && !last.starts_with('{') {
        return match method.as_str() {
            "GET" => "Retrieve form information",
            _ => "Perform operation on form",
        }
        .to_string();
    }
    if last == "search" {
        return match method.as_str() {
            "GET" => "Search content across the site",
            _ => "Perform search operation",
        }
        .to_string();
    }
    if last == "options" || second_last == "options" {
        return match method.as_str() {
            "GET" if last == "options" => "Retrieve list of options pages",
            "GET" => "Retrieve options page data",
            _ => "Perform operation on options",
        }
        .to_string();
    }

    let entity = entity_of(&parts);
    if entity.is_empty() {
        return String::new();
    }
    let singular = singular_form(entity);
    let has_path_param = path.contains('{');
    let has_search = parameters
        .iter()
        .any(|p| p.name == "search" && p.location == ParameterLocation::Query);

    match method.as_str() {
        "GET" if has_search => format!("Search for {}", entity),
        "GET" if has_path_param => format!("Retrieve a specific {} by ID", singular),
        "GET" => format!("Retrieve a list of {}", entity),
        "POST" => format!("Create a new {}", singular),
        "PUT" => format!("Update an existing {}", singular),
        "PATCH" => format!("Partially update an existing {}", singular),
        "DELETE" => format!("Delete a {}", singular),
        other => format!("Perform {} operation on {}", other.to_ascii_lowercase(), entity),
    }
}

/// Description for a GET path that serves both the list and the by-slug lookup.
pub fn list_or_slug_description(path: &str) -> String {
    match segments(path).last() {
        None => "List all items or get a specific item by slug. Use slug parameter for a single item."
            .to_string(),
        Some(entity) => format!(
            "List all {} with pagination. To get a specific {}, use the slug parameter (e.g. slug=home).",
            entity,
            singular_form(entity)
        ),
    }
}

/// Singular of an entity segment: known irregulars first, then suffix rules.
pub fn singular_form(entity: &str) -> String {
    let irregular = match entity {
        "pages" => Some("page"),
        "posts" => Some("post"),
        "categories" => Some("category"),
        "tags" => Some("tag"),
        "comments" => Some("comment"),
        "users" => Some("user"),
        "settings" => Some("setting"),
        "media" => Some("media"),
        "taxonomies" => Some("taxonomy"),
        _ => None,
    };
    if let Some(singular) = irregular {
        return singular.to_string();
    }
    if let Some(stem) = entity.strip_suffix("ies") {
        return format!("{}y", stem);
    }
    if let Some(stem) = entity.strip_suffix("es") {
        return stem.to_string();
    }
    entity.strip_suffix('s').unwrap_or(entity).to_string()
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// The collection segment an operation acts on, skipping a trailing placeholder.
fn entity_of<'p>(parts: &[&'p str]) -> &'p str {
    let from_end = |k: usize| parts.len().checked_sub(k).map_or("", |i| parts[i]);
    let is_param = |s: &str| s.starts_with('{');
    if is_param(from_end(1)) {
        from_end(2)
    } else if is_param(from_end(2)) {
        from_end(3)
    } else {
        from_end(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query(name: &str) -> OpenApiParameter {
        OpenApiParameter {
            name: name.into(),
            location: ParameterLocation::Query,
            description: None,
            required: false,
            schema: json!({"type": "string"}),
        }
    }

    #[test]
    fn test_good_description_rules() {
        assert!(is_good_description("Get list of pages", "List of Pages"));
        assert!(!is_good_description("Pages", "Pages"));
        assert!(!is_good_description("Get page", "x"));
        assert!(!is_good_description("Some generic words here", "x"));
        assert!(!is_good_description("Получить список страниц get", "x"));
        assert!(is_good_description("Récupérer: get the café list", "x"));
    }

    #[test]
    fn test_singular_form() {
        assert_eq!(singular_form("categories"), "category");
        assert_eq!(singular_form("media"), "media");
        assert_eq!(singular_form("stories"), "story");
        assert_eq!(singular_form("boxes"), "box");
        assert_eq!(singular_form("books"), "book");
        assert_eq!(singular_form("fish"), "fish");
    }

    #[test]
    fn test_synthesized_entity_descriptions() {
        let path = "/wp-json/wp/v2/books/{bookId}";
        assert_eq!(synthesize_description(path, "GET", &[]), "Retrieve a specific book by ID");
        assert_eq!(synthesize_description(path, "DELETE", &[]), "Delete a book");
        assert_eq!(
            synthesize_description("/wp-json/wp/v2/books", "GET", &[]),
            "Retrieve a list of books"
        );
        assert_eq!(
            synthesize_description("/wp-json/wp/v2/books", "GET", &[query("search")]),
            "Search for books"
        );
        assert_eq!(
            synthesize_description("/wp-json/wp/v2/books/{bookId}/meta", "PATCH", &[]),
            "Partially update an existing book"
        );
    }

    #[test]
    fn test_synthesized_special_paths() {
        assert_eq!(
            synthesize_description("/wp-json/mksddn-forms-handler/v1/forms/contact/submit", "POST", &[]),
            "Submit form data"
        );
        assert_eq!(
            synthesize_description("/wp-json/mksddn-forms-handler/v1/forms/contact", "GET", &[]),
            "Retrieve form information"
        );
        assert_eq!(
            synthesize_description("/wp-json/custom/v1/options", "GET", &[]),
            "Retrieve list of options pages"
        );
        assert_eq!(
            synthesize_description("/wp-json/custom/v1/options/footer", "GET", &[]),
            "Retrieve options page data"
        );
        assert_eq!(synthesize_description("/", "GET", &[]), "");
    }

    #[test]
    fn test_list_or_slug_description() {
        assert_eq!(
            list_or_slug_description("/wp-json/wp/v2/pages"),
            "List all pages with pagination. To get a specific page, use the slug parameter (e.g. slug=home)."
        );
    }
}
