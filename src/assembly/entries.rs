//! Typed repeated entries for list blocks
//!
//! Services, gallery images and testimonials are read from the record into typed lists and
//! stored on their block as a JSON array rather than as numbered prop keys.

use crate::record::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MAX_SERVICES: usize = 8;
pub const MAX_GALLERY_IMAGES: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEntry {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    pub src: String,
    pub title: String,
    pub description: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialEntry {
    pub text: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// First string among `keys`, or a number rendered as text
fn field(item: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match item.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Up to [`MAX_SERVICES`] services; plain strings become titles
pub fn service_entries(record: &Record) -> Vec<ServiceEntry> {
    record
        .items("services")
        .iter()
        .filter_map(|item| match item {
            Value::String(name) => Some(ServiceEntry {
                title: name.clone(),
                description: None,
                price: None,
                duration: None,
                icon: None,
                image: None,
            }),
            Value::Object(_) => Some(ServiceEntry {
                title: field(item, &["name", "title"])?,
                description: field(item, &["description"]),
                price: field(item, &["priceRange", "price"]),
                duration: field(item, &["duration"]),
                icon: field(item, &["icon"]),
                image: field(item, &["image"]),
            }),
            _ => None,
        })
        .take(MAX_SERVICES)
        .collect()
}

/// Up to [`MAX_GALLERY_IMAGES`] portfolio images
pub fn gallery_images(record: &Record) -> Vec<GalleryImage> {
    record
        .items("portfolioImages")
        .iter()
        .take(MAX_GALLERY_IMAGES)
        .enumerate()
        .filter_map(|(index, item)| {
            let src = match item {
                Value::String(url) => url.clone(),
                _ => field(item, &["url", "src"])?,
            };
            Some(GalleryImage {
                src,
                title: field(item, &["title"])
                    .unwrap_or_else(|| format!("Réalisation {}", index + 1)),
                description: field(item, &["description"]).unwrap_or_default(),
                category: field(item, &["category"]).unwrap_or_else(|| "general".to_string()),
            })
        })
        .collect()
}

/// Every testimonial with non-empty text
pub fn testimonial_entries(record: &Record) -> Vec<TestimonialEntry> {
    record
        .items("testimonials")
        .iter()
        .filter_map(|item| match item {
            Value::String(text) if !text.is_empty() => Some(TestimonialEntry {
                text: text.clone(),
                author: "Client".to_string(),
                service: None,
                rating: None,
                image: None,
            }),
            Value::Object(_) => Some(TestimonialEntry {
                text: field(item, &["text", "content"])?,
                author: field(item, &["author", "name"]).unwrap_or_else(|| "Client".to_string()),
                service: field(item, &["service"]),
                rating: item.get("rating").and_then(Value::as_f64),
                image: field(item, &["image", "photo"]),
            }),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_services_are_capped() {
        let services: Vec<_> = (0..12).map(|i| json!(format!("Service {}", i))).collect();
        let record = Record::new(json!({ "services": services }));
        let entries = service_entries(&record);
        assert_eq!(entries.len(), MAX_SERVICES);
        assert_eq!(entries[0].title, "Service 0");
    }

    #[test]
    fn test_service_objects() {
        let record = Record::new(json!({
            "services": [
                { "name": "Débouchage", "priceRange": "90-150", "duration": 2 },
                { "icon": "x" }
            ]
        }));
        let entries = service_entries(&record);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].price.as_deref(), Some("90-150"));
        assert_eq!(entries[0].duration.as_deref(), Some("2"));
    }

    #[test]
    fn test_gallery_defaults_and_cap() {
        let mut images: Vec<Value> = (0..25).map(|i| json!(format!("img{}.jpg", i))).collect();
        images[0] = json!({ "url": "cover.jpg", "category": "cuisine" });
        let record = Record::new(json!({ "portfolioImages": images }));
        let gallery = gallery_images(&record);
        assert_eq!(gallery.len(), MAX_GALLERY_IMAGES);
        assert_eq!(gallery[0].src, "cover.jpg");
        assert_eq!(gallery[0].category, "cuisine");
        assert_eq!(gallery[1].title, "Réalisation 2");
        assert_eq!(gallery[1].category, "general");
    }

    #[test]
    fn test_testimonials_keep_all_with_text() {
        let record = Record::new(json!({
            "testimonials": [
                { "text": "Parfait", "author": "Marc", "rating": 5 },
                { "author": "Sans texte" },
                "Très réactif"
            ]
        }));
        let entries = testimonial_entries(&record);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].rating, Some(5.0));
        assert_eq!(entries[1].author, "Client");
    }
}
