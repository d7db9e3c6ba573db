//! `{{field}}` placeholder substitution
//!
//! Placeholders resolve against record paths. `tagline`, `heroTitle` and `heroSubtitle` fall
//! back to text derived from the business type. Unresolved placeholders are left in place so
//! a later content pass can fill them.

use crate::record::Record;
use crate::rules::condition::coerce_to_string;
use serde_json::{Map, Value};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Replacement text for one placeholder name
pub fn resolve(name: &str, record: &Record) -> Option<String> {
    let business_type = record.business_type();
    let derived = || match name {
        "tagline" => Some(format!("{} professionnel", business_type)),
        "heroTitle" => Some(format!("Votre {} de confiance", business_type)),
        "heroSubtitle" => Some(format!("Services professionnels de {}", business_type)),
        _ => None,
    };

    match record.lookup(name).as_deref() {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(value @ (Value::Number(_) | Value::Bool(_))) => Some(coerce_to_string(Some(value))),
        Some(Value::Array(items)) if items.iter().all(Value::is_string) && !items.is_empty() => {
            Some(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            )
        }
        _ => derived(),
    }
}

/// Substitute every resolvable placeholder in `text`
pub fn fill(text: &str, record: &Record) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len()..];
        let Some(end) = after_open.find(CLOSE) else {
            break;
        };
        out.push_str(&rest[..start]);
        let name = after_open[..end].trim();
        match resolve(name, record) {
            Some(value) => out.push_str(&value),
            None => out.push_str(&rest[start..start + OPEN.len() + end + CLOSE.len()]),
        }
        rest = &after_open[end + CLOSE.len()..];
    }

    out.push_str(rest);
    out
}

/// Personalize every string prop, descending into nested objects and arrays
pub fn personalize(props: &mut Map<String, Value>, record: &Record) {
    for value in props.values_mut() {
        personalize_value(value, record);
    }
}

fn personalize_value(value: &mut Value, record: &Record) {
    match value {
        Value::String(text) if text.contains(OPEN) => *text = fill(text, record),
        Value::Array(items) => items.iter_mut().for_each(|v| personalize_value(v, record)),
        Value::Object(map) => personalize(map, record),
        _ => {}
    }
}

/// Whether any string prop still holds a placeholder
pub fn has_placeholders(props: &Map<String, Value>) -> bool {
    props.values().any(|value| match value {
        Value::String(text) => text.contains(OPEN),
        Value::Object(map) => has_placeholders(map),
        Value::Array(items) => items.iter().any(|v| match v {
            Value::String(text) => text.contains(OPEN),
            Value::Object(map) => has_placeholders(map),
            _ => false,
        }),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> Record {
        Record::new(json!({
            "businessName": "Dupont Plomberie",
            "businessType": "plombier",
            "phone": "04 78 00 00 00",
            "yearEstablished": 1998,
            "serviceAreas": ["Lyon", "Bron"]
        }))
    }

    #[test]
    fn test_fill_record_fields() {
        assert_eq!(
            fill("{{businessName}} - {{ phone }}", &record()),
            "Dupont Plomberie - 04 78 00 00 00"
        );
        assert_eq!(fill("Depuis {{yearEstablished}}", &record()), "Depuis 1998");
        assert_eq!(fill("{{serviceAreas}}", &record()), "Lyon, Bron");
    }

    #[test]
    fn test_derived_fallbacks() {
        assert_eq!(fill("{{heroTitle}}", &record()), "Votre plombier de confiance");
        assert_eq!(fill("{{tagline}}", &record()), "plombier professionnel");
    }

    #[test]
    fn test_unresolved_and_unterminated_are_kept() {
        assert_eq!(fill("Mail: {{email}}", &record()), "Mail: {{email}}");
        assert_eq!(fill("open {{businessName", &record()), "open {{businessName");
    }

    #[test]
    fn test_personalize_nested() {
        let mut props = json!({
            "title": "{{businessName}}",
            "menu": [{ "label": "{{businessType}}" }],
            "count": 3
        })
        .as_object()
        .cloned()
        .unwrap();
        personalize(&mut props, &record());
        assert_eq!(props["title"], json!("Dupont Plomberie"));
        assert_eq!(props["menu"][0]["label"], json!("plombier"));
        assert!(!has_placeholders(&props));
    }
}
