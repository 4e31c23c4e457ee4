//! Forms handler folder and per-field sample synthesis.
//!
//! Form records carry a JSON field configuration. Submit requests get a body
//! with one representative value per field; any file field switches the body
//! to a multipart form.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Map as JsonMap, Value as JsonValue};

use super::{content_type_json, distinct_name, CatalogBuilder};
use crate::collection::{Body, Folder, FormPart, Item, Method, Operation, UrlTemplate};
use crate::host::{Capability, ContentItem, ContentQuery, ContentType, Host};
use crate::knowledge;
use crate::Result;

/// Content type registered by the forms handler.
pub const FORMS_TYPE: &str = "mksddn_fh_forms";

const FORMS_PATH: [&str; 4] = ["wp-json", "mksddn-forms-handler", "v1", "forms"];

/// One entry of a form's field configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FormField {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default, deserialize_with = "truthy")]
    pub multiple: bool,
    #[serde(default, deserialize_with = "option_list")]
    pub options: Vec<JsonValue>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub min: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub max: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub step: Option<f64>,
}

fn default_kind() -> String {
    "text".to_string()
}

fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    let value = JsonValue::deserialize(deserializer)?;
    Ok(match value {
        JsonValue::Bool(b) => b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        JsonValue::String(s) => !s.is_empty() && s != "0",
        JsonValue::Array(a) => !a.is_empty(),
        JsonValue::Object(o) => !o.is_empty(),
        JsonValue::Null => false,
    })
}

fn option_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<JsonValue>, D::Error> {
    Ok(match JsonValue::deserialize(deserializer)? {
        JsonValue::Array(items) => items,
        _ => Vec::new(),
    })
}

/// Finite numbers only; `"NaN"` and `"inf"` strings read as absent.
fn lenient_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<f64>, D::Error> {
    let number = match JsonValue::deserialize(deserializer)? {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|n| n.is_finite()))
}

/// Parse a field configuration. Invalid JSON and unnamed entries yield nothing.
pub fn parse_fields(config: &str) -> Vec<FormField> {
    let Ok(entries) = serde_json::from_str::<Vec<JsonValue>>(config) else {
        log::debug!("form field configuration is not a JSON list");
        return Vec::new();
    };
    entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<FormField>(entry).ok())
        .filter(|field| !field.name.is_empty())
        .collect()
}

/// Declared option values: `.value`, else `.label`, else the raw entry.
fn option_values(options: &[JsonValue]) -> Vec<String> {
    options
        .iter()
        .filter_map(|option| match option {
            JsonValue::Object(map) => map
                .get("value")
                .filter(|v| !v.is_null())
                .or_else(|| map.get("label").filter(|v| !v.is_null()))
                .map(scalar_text),
            other => Some(scalar_text(other)),
        })
        .collect()
}

fn scalar_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

/// Representative example value for one field.
pub fn sample_value(field: &FormField, now: DateTime<Utc>) -> JsonValue {
    match field.kind.as_str() {
        "text" => json!("Sample Text"),
        "email" => json!("test@example.com"),
        "password" => json!("P@ssw0rd123"),
        "tel" => json!("+1234567890"),
        "url" => json!("https://example.com"),
        "number" => sample_number(field.min, field.max, field.step),
        "date" => json!(now.format("%Y-%m-%d").to_string()),
        "time" => json!(now.format("%H:%M").to_string()),
        "datetime-local" => json!(now.format("%Y-%m-%dT%H:%M").to_string()),
        "textarea" => json!("Sample message text."),
        "checkbox" => json!("1"),
        "radio" => json!(first_or_placeholder(&option_values(&field.options))),
        "select" => {
            let values = option_values(&field.options);
            if field.multiple {
                let take = values.len().clamp(1, 2);
                json!(values.into_iter().take(take).collect::<Vec<_>>())
            } else {
                json!(first_or_placeholder(&values))
            }
        }
        "file" if field.multiple => json!(["sample.pdf"]),
        "file" => json!("sample.pdf"),
        _ => json!("Sample text"),
    }
}

fn first_or_placeholder(values: &[String]) -> String {
    values
        .first()
        .cloned()
        .unwrap_or_else(|| "option".to_string())
}

/// Prefer `min`, else `max`, else 42; floor to a multiple of `step` (default 1).
///
/// When `min > max` the minimum wins. Whole steps produce an integer.
/// Non-finite bounds and steps are ignored.
pub fn sample_number(min: Option<f64>, max: Option<f64>, step: Option<f64>) -> JsonValue {
    let finite = |n: Option<f64>| n.filter(|n| n.is_finite());
    let step = finite(step).unwrap_or(1.0);
    let mut value = finite(min).or(finite(max)).unwrap_or(42.0);
    if step > 0.0 {
        value = (value / step).floor() * step;
    }
    if step.fract() == 0.0 {
        json!(value as i64)
    } else {
        json!(value)
    }
}

/// Submit body for a field list: JSON object, or multipart when a file field exists.
pub fn submit_body(fields: &[FormField], now: DateTime<Utc>) -> Result<Body> {
    let mut values = JsonMap::new();
    for field in fields {
        values.insert(field.name.clone(), sample_value(field, now));
    }
    if !has_file_field(fields) {
        return Body::json(&JsonValue::Object(values));
    }

    let mut parts = Vec::new();
    for (name, value) in values {
        // Later duplicates redefine the field, as they did for the value map.
        let Some(field) = fields.iter().rev().find(|f| f.name == name) else {
            continue;
        };
        let key = |multiple: bool| {
            if multiple {
                format!("{}[]", name)
            } else {
                name.clone()
            }
        };
        let is_file = field.kind == "file";
        let part = |key: String, value: &JsonValue| {
            let text = scalar_text(value);
            if is_file {
                FormPart::file(key, text)
            } else {
                FormPart::text(key, text)
            }
        };
        match &value {
            JsonValue::Array(entries) => {
                for entry in entries {
                    parts.push(part(key(field.multiple), entry));
                }
            }
            single => parts.push(part(name.clone(), single)),
        }
    }
    Ok(Body::Formdata { formdata: parts })
}

pub fn has_file_field(fields: &[FormField]) -> bool {
    fields.iter().any(|f| f.kind == "file")
}

fn forms_url(extra: &[&str], mut query: Vec<crate::collection::Param>) -> UrlTemplate {
    knowledge::enrich_query(&mut query);
    let mut path: Vec<&str> = FORMS_PATH.to_vec();
    path.extend_from_slice(extra);
    UrlTemplate::new(path, query)
}

impl<'a, H: Host + ?Sized> CatalogBuilder<'a, H> {
    /// Forms folder, or `None` when the forms handler is not active.
    pub(super) fn forms_folder(&self, ty: &ContentType) -> Result<Option<Folder>> {
        if !self.host.is_capability_active(Capability::FormsHandler) {
            log::debug!("forms handler inactive, skipping '{}'", ty.name);
            return Ok(None);
        }
        let label = "Forms";
        let mut items: Vec<Item> = vec![Operation::new(
            format!("List of {}", label),
            Method::Get,
            forms_url(&[], self.pagination()),
            format!("Get list of all {}", label),
        )
        .with_headers(self.default_headers())
        .into()];

        let mut forms = self
            .host
            .list_content_items(FORMS_TYPE, &ContentQuery::published())?;
        forms.sort_by(|a, b| a.title.cmp(&b.title));
        let mut taken = HashSet::new();
        for form in &forms {
            let title = if form.title.is_empty() {
                form.slug.clone()
            } else {
                form.title.clone()
            };
            let title = distinct_name(&mut taken, title, &form.slug);
            items.push(self.form_folder(form, &title)?.into());
        }
        Ok(Some(Folder::new(label, items)))
    }

    /// Info and submit operations for one form, filed under `title`.
    fn form_folder(&self, form: &ContentItem, title: &str) -> Result<Folder> {
        let fields = form
            .fields_config
            .as_deref()
            .map(parse_fields)
            .unwrap_or_default();

        let info = Operation::new(
            format!("Get Form Info - {}", title),
            Method::Get,
            forms_url(&[form.slug.as_str()], Vec::new()),
            format!("Get form info for '{}'", title),
        )
        .with_headers(self.default_headers());

        let submit_headers = if has_file_field(&fields) {
            Vec::new()
        } else {
            vec![content_type_json()]
        };
        let submit = Operation::new(
            format!("Submit Form - {}", title),
            Method::Post,
            forms_url(&[form.slug.as_str(), "submit"], Vec::new()),
            format!("Submit form data for '{}'", title),
        )
        .with_headers(submit_headers)
        .with_body(submit_body(&fields, self.host.now())?);

        Ok(Folder::new(title, vec![info.into(), submit.into()]))
    }
}
