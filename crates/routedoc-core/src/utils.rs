//! String transformation utilities shared by the catalog builder and the converter.

/// Convert a string to snake_case
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let mut prev_is_lowercase = false;

    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            // Add underscore before uppercase letter if:
            // - Not at the start
            // - Previous character was lowercase
            if i > 0 && prev_is_lowercase {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
            prev_is_lowercase = false;
        } else if ch.is_alphanumeric() {
            result.push(ch);
            prev_is_lowercase = ch.is_lowercase();
        } else if ch == '-' || ch == '_' || ch == ' ' || ch == '.' {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            prev_is_lowercase = false;
        }
    }

    result.trim_matches('_').to_string()
}

/// Convert a string to UpperCamelCase (PascalCase)
pub fn to_upper_camel_case(s: &str) -> String {
    to_snake_case(s)
        .split('_')
        .filter(|s| !s.is_empty())
        .map(ucfirst)
        .collect()
}

/// Convert a string to lowerCamelCase
pub fn to_lower_camel_case(s: &str) -> String {
    let upper_camel = to_upper_camel_case(s);
    let mut chars = upper_camel.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
    }
}

/// Uppercase the first character, leaving the rest untouched.
pub fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Collapse every run of non-alphanumeric characters into `_` and lowercase the rest.
///
/// Returns `"operation"` when nothing usable remains.
pub fn slugify_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "operation".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Normalize a user supplied slug: lowercase, whitespace and underscores become `-`.
pub fn sanitize_slug(raw: &str) -> String {
    let mut out = String::new();
    for ch in raw.trim().chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
        } else if (ch.is_whitespace() || ch == '-' || ch == '_') && !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}

/// Normalize a type key: lowercase ASCII alphanumerics, `_` and `-` only.
pub fn sanitize_key(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Split a comma separated selector list, sanitize each entry and drop empties.
pub fn split_selector<F>(raw: &str, sanitize: F) -> Vec<String>
where
    F: Fn(&str) -> String,
{
    raw.split(',')
        .map(sanitize)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Human title for a slug: `contact-info` becomes `Contact info`.
pub fn title_from_slug(slug: &str) -> String {
    ucfirst(&slug.replace('-', " "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("findPetsByStatus"), "find_pets_by_status");
        assert_eq!(to_snake_case("find-pets-by-status"), "find_pets_by_status");
        assert_eq!(to_snake_case("get HTTP Response"), "get_http_response");
    }

    #[test]
    fn test_to_lower_camel_case() {
        assert_eq!(to_lower_camel_case("post_slug"), "postSlug");
        assert_eq!(to_lower_camel_case("form-name"), "formName");
        assert_eq!(to_lower_camel_case("FIND_PETS_BY_STATUS"), "findPetsByStatus");
        assert_eq!(to_lower_camel_case("slug"), "slug");
    }

    #[test]
    fn test_slugify_identifier() {
        assert_eq!(slugify_identifier("List of Pages"), "list_of_pages");
        assert_eq!(slugify_identifier("GET /acme/v1/items/:id"), "get_acme_v1_items_id");
        assert_eq!(slugify_identifier("Страница"), "operation");
    }

    #[test]
    fn test_sanitize_selectors() {
        assert_eq!(
            split_selector(" Home , About Us,,", sanitize_slug),
            vec!["home".to_string(), "about-us".to_string()]
        );
        assert_eq!(split_selector("Book!,movie_review", sanitize_key), vec!["book", "movie_review"]);
        assert!(split_selector("", sanitize_key).is_empty());
    }

    #[test]
    fn test_title_from_slug() {
        assert_eq!(title_from_slug("contact-info"), "Contact info");
        assert_eq!(ucfirst("pages"), "Pages");
    }
}
