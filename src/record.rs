//! Business-profile records
//!
//! A [`Record`] is the immutable input to every assembly run: a JSON object addressed by
//! dot-delimited field paths such as `availability.is24x7` or `services.0.name`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

/// Immutable business-profile data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    data: Value,
}

impl Record {
    pub fn new(data: Value) -> Self {
        Self { data }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw).map(Self::new)
    }

    /// Raw underlying value
    pub fn as_value(&self) -> &Value {
        &self.data
    }

    /// Resolve a dot-delimited path.
    ///
    /// Object segments index by key, array segments by decimal index. The segment
    /// `length` on an array or string yields its size, and must be the last segment.
    /// Returns `None` for any path that does not resolve.
    pub fn lookup(&self, path: &str) -> Option<Cow<'_, Value>> {
        let mut current = &self.data;
        let mut segments = path.split('.').peekable();

        while let Some(segment) = segments.next() {
            let is_last = segments.peek().is_none();
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) if segment == "length" => {
                    return is_last.then(|| Cow::Owned(Value::from(items.len())));
                }
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                Value::String(text) if segment == "length" => {
                    return is_last.then(|| Cow::Owned(Value::from(text.chars().count())));
                }
                _ => return None,
            };
        }

        Some(Cow::Borrowed(current))
    }

    /// Truthiness of a field: false for absent, null, false, 0, NaN and "".
    pub fn flag(&self, path: &str) -> bool {
        self.lookup(path).map(|v| is_truthy(&v)).unwrap_or(false)
    }

    pub fn text(&self, path: &str) -> Option<String> {
        self.lookup(path)?.as_str().map(str::to_string)
    }

    pub fn number(&self, path: &str) -> Option<f64> {
        self.lookup(path)?.as_f64()
    }

    /// Element count of an array field, 0 when absent or not an array
    pub fn count(&self, path: &str) -> usize {
        match self.lookup(path).as_deref() {
            Some(Value::Array(items)) => items.len(),
            _ => 0,
        }
    }

    /// String elements of an array field, skipping non-string elements
    pub fn strings(&self, path: &str) -> Vec<String> {
        match self.lookup(path).as_deref() {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            Some(Value::String(s)) => vec![s.clone()],
            _ => Vec::new(),
        }
    }

    /// Elements of an array field
    pub fn items(&self, path: &str) -> Vec<Value> {
        match self.lookup(path).as_deref() {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        }
    }

    /// Declared business category (`businessType`), empty when absent
    pub fn business_type(&self) -> String {
        self.text("businessType").unwrap_or_default()
    }

    pub fn business_name(&self) -> String {
        self.text("businessName").unwrap_or_default()
    }

    /// Round-the-clock availability, declared either flat or under `availability`
    pub fn is_24x7(&self) -> bool {
        self.flag("is24x7") || self.flag("is24x7Available") || self.flag("availability.is24x7")
    }

    /// Which optional content this record can actually fill
    pub fn availability(&self) -> DataAvailability {
        let priced_service = self
            .items("services")
            .iter()
            .any(|s| s.get("priceRange").is_some_and(is_truthy));
        DataAvailability {
            has_services: self.count("services") > 0,
            has_pricing: self.flag("pricing.hourlyRate") || priced_service,
            has_gallery: self.count("portfolioImages") > 0 || self.count("projects") > 0,
            has_testimonials: self.count("testimonials") > 0,
            has_team: self.count("teamMembers") > 0,
            has_certifications: self.count("certifications") > 0,
            has_faq: self.count("commonQuestions") > 0,
        }
    }

    /// Characteristic tags used to match site structures
    ///
    /// `reference_year` anchors the business-age test so results do not depend on the clock.
    pub fn characteristics(&self, reference_year: i32) -> Vec<&'static str> {
        let mut tags = Vec::new();
        if self.is_24x7() {
            tags.extend(["urgency", "24/7"]);
        }
        if self.count("portfolioImages") > 5 || self.count("projects") > 3 {
            tags.extend(["portfolio", "visual"]);
        }
        if let Some(year) = self.number("yearEstablished") {
            if year > 0.0 && f64::from(reference_year) - year > 10.0 {
                tags.extend(["established", "trust"]);
            }
        }
        if self.count("certifications") > 2 {
            tags.extend(["certified", "professional"]);
        }
        if self.count("serviceAreas") > 5 {
            tags.extend(["local", "coverage"]);
        }
        if self.number("teamSize").is_some_and(|n| n > 5.0) {
            tags.extend(["team", "scale"]);
        }
        if let Some(usp) = self.text("uniqueSellingPoint") {
            if usp.contains("innov") || usp.contains("modern") {
                tags.extend(["innovation", "modern"]);
            }
        }
        if self.text("pricePositioning").as_deref() == Some("premium") {
            tags.extend(["premium", "quality"]);
        }
        tags
    }

    /// `stylePreference` as a list of lowercase tokens; accepts a string or an array
    pub fn style_preferences(&self) -> Vec<String> {
        self.strings("stylePreference")
            .into_iter()
            .map(|s| s.to_lowercase())
            .collect()
    }

    /// Whether a style preference mentions `token` (substring match per entry)
    pub fn prefers_style(&self, token: &str) -> bool {
        self.style_preferences().iter().any(|s| s.contains(token))
    }
}

impl From<Value> for Record {
    fn from(data: Value) -> Self {
        Self::new(data)
    }
}

/// Presence of optional record content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataAvailability {
    pub has_services: bool,
    pub has_pricing: bool,
    pub has_gallery: bool,
    pub has_testimonials: bool,
    pub has_team: bool,
    pub has_certifications: bool,
    pub has_faq: bool,
}

impl DataAvailability {
    /// Whether a block of `block_type` has data to show. Types without a data source always do.
    pub fn supports(&self, block_type: &str) -> bool {
        if block_type.contains("pricing") {
            self.has_pricing
        } else if block_type.contains("gallery") {
            self.has_gallery
        } else if block_type.contains("testimonials") {
            self.has_testimonials
        } else if block_type.contains("team") {
            self.has_team
        } else if block_type.contains("certifications") {
            self.has_certifications
        } else if block_type.contains("faq") {
            self.has_faq
        } else {
            true
        }
    }
}

/// JavaScript-style truthiness
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Record {
        Record::new(json!({
            "businessType": "plombier",
            "availability": { "is24x7": true },
            "services": [{ "name": "Fuite" }, { "name": "Chauffe-eau" }],
            "serviceAreas": ["Lyon", "Villeurbanne"],
            "stylePreference": "Modern",
            "empty": ""
        }))
    }

    #[test]
    fn test_nested_lookup() {
        let record = sample();
        assert_eq!(
            record.lookup("availability.is24x7").as_deref(),
            Some(&json!(true))
        );
        assert_eq!(record.text("services.1.name").as_deref(), Some("Chauffe-eau"));
        assert!(record.lookup("availability.missing").is_none());
        assert!(record.lookup("businessType.deeper").is_none());
    }

    #[test]
    fn test_length_segment() {
        let record = sample();
        assert_eq!(record.number("services.length"), Some(2.0));
        assert_eq!(record.number("businessType.length"), Some(8.0));
        assert!(record.lookup("services.length.more").is_none());
    }

    #[test]
    fn test_flags_and_helpers() {
        let record = sample();
        assert!(record.is_24x7());
        assert!(!record.flag("empty"));
        assert!(!record.flag("nothing"));
        assert_eq!(record.count("serviceAreas"), 2);
        assert_eq!(record.count("businessType"), 0);
        assert!(record.prefers_style("modern"));
        assert_eq!(record.business_type(), "plombier");
    }

    #[test]
    fn test_availability() {
        let record = Record::new(json!({
            "services": [{ "name": "Pose", "priceRange": "80-120" }],
            "projects": [{}],
            "testimonials": []
        }));
        let data = record.availability();
        assert!(data.has_pricing);
        assert!(data.has_gallery);
        assert!(!data.has_testimonials);
        assert!(!data.supports("testimonials"));
        assert!(data.supports("hero"));
    }

    #[test]
    fn test_characteristics_use_reference_year() {
        let record = Record::new(json!({
            "is24x7": true,
            "yearEstablished": 2010,
            "pricePositioning": "premium",
            "uniqueSellingPoint": "approche innovante"
        }));
        let tags = record.characteristics(2025);
        assert_eq!(
            tags,
            vec![
                "urgency",
                "24/7",
                "established",
                "trust",
                "innovation",
                "modern",
                "premium",
                "quality",
            ]
        );
        assert!(!record.characteristics(2020).contains(&"established"));
    }
}
