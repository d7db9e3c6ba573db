//! Themes and palettes
//!
//! A [`Theme`] is the color, typography and shape bundle applied across a candidate.
//! Themes come from two places: a [`PaletteCatalog`] keyed by business category and mood,
//! or a [`ThemeRotation`] that hands out distinct schemes by variation index.

use crate::color::{contrast_ratio, transform_hex, Rgb};
use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const DARK_TEXT: &str = "#0F172A";
const LIGHT_TEXT: &str = "#F8FAFC";

/// Emotional register of a palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Professional,
    Friendly,
    Urgent,
    Luxury,
    Tech,
    Natural,
    Bold,
}

impl Mood {
    /// Mood implied by a record: urgency first, then style, audience and trade.
    pub fn for_record(record: &Record) -> Self {
        if record.is_24x7() {
            Mood::Urgent
        } else if record.text("stylePreference").as_deref() == Some("elegant") {
            Mood::Luxury
        } else if record
            .strings("targetAudience")
            .iter()
            .any(|a| a == "particuliers")
        {
            Mood::Friendly
        } else if record.business_type() == "electricien" {
            Mood::Tech
        } else {
            Mood::Professional
        }
    }

    fn is_dark(self) -> bool {
        matches!(self, Mood::Luxury | Mood::Tech)
    }
}

/// Named theme colors; anything beyond the core slots lands in `extra`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub surface: String,
    pub text: String,
    pub text_muted: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            primary: "#1E40AF".to_string(),
            secondary: "#10B981".to_string(),
            accent: "#F59E0B".to_string(),
            background: "#F8FAFC".to_string(),
            surface: "#FFFFFF".to_string(),
            text: DARK_TEXT.to_string(),
            text_muted: "#64748B".to_string(),
            extra: BTreeMap::new(),
        }
    }
}

impl ThemeColors {
    /// Set a color by its camelCase slot name
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match name {
            "primary" => self.primary = value,
            "secondary" => self.secondary = value,
            "accent" => self.accent = value,
            "background" => self.background = value,
            "surface" => self.surface = value,
            "text" => self.text = value,
            "textMuted" | "textLight" | "text_muted" => self.text_muted = value,
            other => {
                self.extra.insert(other.to_string(), value);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            "primary" => Some(&self.primary),
            "secondary" => Some(&self.secondary),
            "accent" => Some(&self.accent),
            "background" => Some(&self.background),
            "surface" => Some(&self.surface),
            "text" => Some(&self.text),
            "textMuted" | "textLight" | "text_muted" => Some(&self.text_muted),
            other => self.extra.get(other).map(String::as_str),
        }
    }

    /// WCAG-based score in [0, 100]
    ///
    /// text/background: 30 at 7:1, 20 at 4.5:1; primary, secondary and accent against
    /// the background: 25, 25 and 20 at 4.5:1. Unparseable colors earn nothing.
    pub fn accessibility_score(&self) -> u8 {
        let against_bg = |fg: &str| contrast_ratio(fg, &self.background).unwrap_or(0.0);

        let mut score: u32 = 0;
        let text = against_bg(&self.text);
        if text >= 7.0 {
            score += 30;
        } else if text >= 4.5 {
            score += 20;
        }
        if against_bg(&self.primary) >= 4.5 {
            score += 25;
        }
        if against_bg(&self.secondary) >= 4.5 {
            score += 25;
        }
        if against_bg(&self.accent) >= 4.5 {
            score += 20;
        }
        score.min(100) as u8
    }

    /// Average contrast bucket of text, primary and secondary against the background
    pub fn contrast_level(&self) -> ContrastLevel {
        let pairs = [&self.text, &self.primary, &self.secondary];
        let total: f64 = pairs
            .iter()
            .map(|fg| contrast_ratio(fg, &self.background).unwrap_or(1.0))
            .sum();
        let average = total / pairs.len() as f64;
        if average >= 7.0 {
            ContrastLevel::High
        } else if average >= 4.5 {
            ContrastLevel::Medium
        } else {
            ContrastLevel::Low
        }
    }

    /// Replace the text color with dark or light ink when it is unreadable on the background
    pub fn ensure_readable_text(&mut self) {
        let readable = contrast_ratio(&self.text, &self.background).is_some_and(|c| c >= 4.5);
        if readable {
            return;
        }
        if let Some(bg) = Rgb::from_hex(&self.background) {
            self.text = if bg.relative_luminance() > 0.5 {
                DARK_TEXT
            } else {
                LIGHT_TEXT
            }
            .to_string();
        }
    }

    /// Apply the mood transform to these colors
    pub fn apply_mood(&mut self, mood: Mood) {
        match mood {
            Mood::Urgent => {
                self.primary = transform_hex(&self.primary, |c| c.rotate(-30.0).saturate(0.2));
                self.accent = "#F59E0B".to_string();
            }
            Mood::Luxury => {
                self.primary = transform_hex(&self.primary, |c| c.darken(0.2));
                self.background = "#1F2937".to_string();
                self.accent = "#FCD34D".to_string();
            }
            Mood::Friendly => {
                self.primary = transform_hex(&self.primary, |c| c.lighten(0.1).rotate(10.0));
            }
            Mood::Tech => {
                self.primary = transform_hex(&self.primary, |c| c.rotate(-20.0));
                self.secondary = "#10B981".to_string();
            }
            Mood::Natural => {
                self.secondary = transform_hex(&self.primary, |c| c.rotate(120.0).desaturate(0.3));
            }
            Mood::Bold => {
                self.secondary = transform_hex(&self.primary, |c| c.rotate(90.0).saturate(1.0));
            }
            Mood::Professional => {}
        }
    }

    /// Saturate or mute the brand colors per the record's `colorPreference`
    pub fn apply_preference(&mut self, preference: ColorPreference) {
        let adjust = |hex: &str| match preference {
            ColorPreference::Vibrant => transform_hex(hex, |c| c.saturate(0.3)),
            ColorPreference::Muted => transform_hex(hex, |c| c.desaturate(0.3)),
        };
        self.primary = adjust(&self.primary);
        self.secondary = adjust(&self.secondary);
        self.accent = adjust(&self.accent);
    }
}

/// Coarse contrast bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContrastLevel {
    High,
    Medium,
    Low,
}

/// Record-declared color adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorPreference {
    Vibrant,
    Muted,
}

impl ColorPreference {
    pub fn for_record(record: &Record) -> Option<Self> {
        match record.text("colorPreference").as_deref() {
            Some("vibrant") => Some(ColorPreference::Vibrant),
            Some("muted") => Some(ColorPreference::Muted),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontPair {
    pub heading: String,
    pub body: String,
}

impl FontPair {
    pub fn new(heading: &str, body: &str) -> Self {
        Self {
            heading: heading.to_string(),
            body: body.to_string(),
        }
    }
}

impl Default for FontPair {
    fn default() -> Self {
        Self::new("Inter", "Inter")
    }
}

/// Corner, shadow and motion tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    pub border_radius: String,
    pub shadows: String,
    pub motion: String,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            border_radius: "medium".to_string(),
            shadows: "subtle".to_string(),
            motion: "smooth".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
    pub fonts: FontPair,
    pub spacing: String,
    pub shape_style: ShapeStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "Corporate Blue".to_string(),
            colors: ThemeColors::default(),
            fonts: FontPair::default(),
            spacing: "normal".to_string(),
            shape_style: ShapeStyle::default(),
            mood: None,
        }
    }
}

impl Theme {
    pub fn accessibility_score(&self) -> u8 {
        self.colors.accessibility_score()
    }
}

/// A named palette for a business category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub id: String,
    pub name: String,
    pub category: String,
    pub mood: Mood,
    pub colors: ThemeColors,
}

/// Typography and spacing defaults of a business category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStyle {
    pub fonts: FontPair,
    pub spacing: String,
    pub border_radius: String,
}

impl Default for CategoryStyle {
    fn default() -> Self {
        Self {
            fonts: FontPair::default(),
            spacing: "normal".to_string(),
            border_radius: "medium".to_string(),
        }
    }
}

/// Palettes and category styles, keyed by category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteCatalog {
    palettes: BTreeMap<String, Vec<Palette>>,
    styles: BTreeMap<String, CategoryStyle>,
    /// Category whose palettes are offered to every business
    general_category: String,
    /// Category whose style applies when a business has none
    fallback_style: String,
}

impl PaletteCatalog {
    pub fn new(general_category: &str, fallback_style: &str) -> Self {
        Self {
            general_category: general_category.to_string(),
            fallback_style: fallback_style.to_string(),
            ..Self::default()
        }
    }

    pub fn add_palette(&mut self, palette: Palette) {
        self.palettes
            .entry(palette.category.clone())
            .or_default()
            .push(palette);
    }

    pub fn set_style(&mut self, category: &str, style: CategoryStyle) {
        self.styles.insert(category.to_string(), style);
    }

    /// Category palettes followed by the general ones
    pub fn palettes_for(&self, category: &str) -> Vec<&Palette> {
        let own = self.palettes.get(category).into_iter().flatten();
        let general = self
            .palettes
            .get(&self.general_category)
            .into_iter()
            .flatten()
            .filter(|_| category != self.general_category);
        own.chain(general).collect()
    }

    pub fn palettes_by_mood(&self, mood: Mood) -> Vec<&Palette> {
        self.palettes
            .values()
            .flatten()
            .filter(|p| p.mood == mood)
            .collect()
    }

    pub fn all_palettes(&self) -> impl Iterator<Item = &Palette> {
        self.palettes.values().flatten()
    }

    pub fn style_for(&self, category: &str) -> CategoryStyle {
        self.styles
            .get(category)
            .or_else(|| self.styles.get(&self.fallback_style))
            .cloned()
            .unwrap_or_default()
    }

    /// Most accessible palette of `mood` for the category, else its first palette
    pub fn best_palette(&self, category: &str, mood: Mood) -> Option<&Palette> {
        let candidates = self.palettes_for(category);
        let mut best: Option<(&Palette, u8)> = None;
        for palette in candidates.iter().filter(|p| p.mood == mood) {
            let score = palette.colors.accessibility_score();
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((palette, score));
            }
        }
        best.map(|(p, _)| p).or_else(|| candidates.first().copied())
    }

    /// Procedural theme for a record
    ///
    /// Picks the category palette for the mood (explicit or derived), applies the mood
    /// transform unless the palette already carries that mood, repairs unreadable text and
    /// applies the record's color preference.
    pub fn build_theme(&self, record: &Record, mood: Option<Mood>) -> Theme {
        let category = record.business_type();
        let mood = mood.unwrap_or_else(|| Mood::for_record(record));
        let style = self.style_for(&category);

        let (name, mut colors) = match self.best_palette(&category, mood) {
            Some(palette) => {
                let mut colors = palette.colors.clone();
                if palette.mood != mood {
                    colors.apply_mood(mood);
                }
                (palette.name.clone(), colors)
            }
            None => (Theme::default().name, ThemeColors::default()),
        };

        colors.ensure_readable_text();
        if let Some(preference) = ColorPreference::for_record(record) {
            colors.apply_preference(preference);
        }

        Theme {
            name,
            colors,
            fonts: style.fonts,
            spacing: style.spacing,
            shape_style: ShapeStyle {
                border_radius: style.border_radius,
                ..ShapeStyle::default()
            },
            mood: Some(mood),
        }
    }
}

/// Derive a full palette from one base color
pub fn custom_palette(base_hex: &str, mood: Mood) -> Option<Palette> {
    let base = Rgb::from_hex(base_hex)?;

    let secondary = match mood {
        Mood::Professional => base.rotate(180.0).saturate(0.5),
        Mood::Friendly => base.rotate(60.0).lighten(0.2),
        Mood::Urgent => base.rotate(-120.0).saturate(0.8),
        Mood::Luxury => base.rotate(30.0).darken(0.3),
        Mood::Tech => base.rotate(240.0),
        Mood::Natural => base.rotate(120.0).desaturate(0.3),
        Mood::Bold => base.rotate(90.0).saturate(1.0),
    };
    let accent = match mood {
        Mood::Urgent => Rgb::new(0xF5, 0x9E, 0x0B),
        Mood::Luxury => Rgb::new(0xFC, 0xD3, 0x4D),
        Mood::Tech => base.rotate(180.0).negate(),
        _ => base.rotate(120.0),
    };
    let (background, surface) = if mood.is_dark() {
        (
            base.darken(0.9).desaturate(0.5),
            base.darken(0.8).desaturate(0.4),
        )
    } else {
        (
            base.lighten(0.95).desaturate(0.8),
            Rgb::new(255, 255, 255),
        )
    };
    let text = if background.relative_luminance() > 0.5 {
        DARK_TEXT
    } else {
        LIGHT_TEXT
    };
    let text_muted = Rgb::from_hex(text)
        .map(|t| mix(t, background, 0.7).to_hex())
        .unwrap_or_else(|| text.to_string());

    let mut extra = BTreeMap::new();
    extra.insert("error".to_string(), "#EF4444".to_string());
    extra.insert("warning".to_string(), "#F59E0B".to_string());
    extra.insert("success".to_string(), "#10B981".to_string());

    Some(Palette {
        id: format!("custom-{}", base.to_hex().trim_start_matches('#').to_lowercase()),
        name: "Custom Palette".to_string(),
        category: "custom".to_string(),
        mood,
        colors: ThemeColors {
            primary: base.to_hex(),
            secondary: secondary.to_hex(),
            accent: accent.to_hex(),
            background: background.to_hex(),
            surface: surface.to_hex(),
            text: text.to_string(),
            text_muted,
            extra,
        },
    })
}

/// `weight` of `fg` blended over `bg`
fn mix(fg: Rgb, bg: Rgb, weight: f64) -> Rgb {
    let blend =
        |a: u8, b: u8| (f64::from(a) * weight + f64::from(b) * (1.0 - weight)).round() as u8;
    Rgb::new(blend(fg.r, bg.r), blend(fg.g, bg.g), blend(fg.b, bg.b))
}

/// A complete named color scheme used by the rotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub name: String,
    pub colors: ThemeColors,
}

/// Spacing and shape tokens used by the rotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleTokens {
    pub border_radius: String,
    pub spacing: String,
    pub shadows: String,
}

/// Scheme indices preferred when a record's style preference mentions `keyword`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleBucket {
    pub keyword: String,
    pub schemes: Vec<usize>,
}

/// Deterministic index-modulo rotation over schemes, fonts and style tokens
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeRotation {
    pub schemes: Vec<ColorScheme>,
    pub fonts: Vec<FontPair>,
    pub styles: Vec<StyleTokens>,
    pub buckets: Vec<StyleBucket>,
}

impl ThemeRotation {
    /// Scheme index for a variation; the last bucket matching the record's style wins.
    pub fn scheme_index(&self, index: usize, record: &Record) -> usize {
        let mut scheme = index % self.schemes.len().max(1);
        for bucket in &self.buckets {
            if bucket.schemes.is_empty() || !record.prefers_style(&bucket.keyword) {
                continue;
            }
            let pick = bucket.schemes[index % bucket.schemes.len()];
            if pick < self.schemes.len() {
                scheme = pick;
            }
        }
        scheme
    }

    pub fn theme_for_index(&self, index: usize, record: &Record) -> Theme {
        let defaults = Theme::default();
        let scheme = self.schemes.get(self.scheme_index(index, record));
        let fonts = if self.fonts.is_empty() {
            None
        } else {
            self.fonts.get(index % self.fonts.len())
        };
        let style = if self.styles.is_empty() {
            None
        } else {
            self.styles.get((index / 2) % self.styles.len())
        };

        Theme {
            name: scheme.map(|s| s.name.clone()).unwrap_or(defaults.name),
            colors: scheme.map(|s| s.colors.clone()).unwrap_or(defaults.colors),
            fonts: fonts.cloned().unwrap_or(defaults.fonts),
            spacing: style.map(|s| s.spacing.clone()).unwrap_or(defaults.spacing),
            shape_style: ShapeStyle {
                border_radius: style
                    .map(|s| s.border_radius.clone())
                    .unwrap_or(defaults.shape_style.border_radius),
                shadows: style
                    .map(|s| s.shadows.clone())
                    .unwrap_or(defaults.shape_style.shadows),
                motion: if index % 2 == 0 { "smooth" } else { "snappy" }.to_string(),
            },
            mood: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn colors(text: &str, primary: &str, secondary: &str, accent: &str, bg: &str) -> ThemeColors {
        ThemeColors {
            primary: primary.to_string(),
            secondary: secondary.to_string(),
            accent: accent.to_string(),
            background: bg.to_string(),
            text: text.to_string(),
            ..ThemeColors::default()
        }
    }

    #[test]
    fn test_accessibility_full_credit_for_strong_text() {
        // Black on white is 21:1; the other pairs are white on white.
        let c = colors("#000000", "#FFFFFF", "#FFFFFF", "#FFFFFF", "#FFFFFF");
        assert_eq!(c.accessibility_score(), 30);
    }

    #[test]
    fn test_accessibility_zero_for_weak_pairs() {
        let c = colors("#EEEEEE", "#EEEEEE", "#EEEEEE", "#EEEEEE", "#FFFFFF");
        assert_eq!(c.accessibility_score(), 0);
    }

    #[test]
    fn test_accessibility_partial_text_credit() {
        // #767676 on white is about 4.54:1.
        let c = colors("#767676", "#000000", "#000000", "#000000", "#FFFFFF");
        assert_eq!(c.accessibility_score(), 20 + 25 + 25 + 20);
    }

    #[test]
    fn test_unparseable_color_earns_nothing() {
        let c = colors("black", "#000000", "#000000", "#000000", "#FFFFFF");
        assert_eq!(c.accessibility_score(), 70);
    }

    #[test]
    fn test_mood_for_record() {
        assert_eq!(Mood::for_record(&Record::new(json!({"is24x7Available": true}))), Mood::Urgent);
        assert_eq!(
            Mood::for_record(&Record::new(json!({"stylePreference": "elegant"}))),
            Mood::Luxury
        );
        assert_eq!(
            Mood::for_record(&Record::new(json!({"targetAudience": ["particuliers"]}))),
            Mood::Friendly
        );
        assert_eq!(
            Mood::for_record(&Record::new(json!({"businessType": "electricien"}))),
            Mood::Tech
        );
        assert_eq!(Mood::for_record(&Record::new(json!({}))), Mood::Professional);
    }

    #[test]
    fn test_luxury_mood_sets_dark_background_and_readable_text() {
        let mut c = ThemeColors::default();
        c.apply_mood(Mood::Luxury);
        assert_eq!(c.background, "#1F2937");
        assert_eq!(c.accent, "#FCD34D");
        c.ensure_readable_text();
        assert_eq!(c.text, LIGHT_TEXT);
    }

    #[test]
    fn test_set_color_slots() {
        let mut c = ThemeColors::default();
        c.set("accent", "#EF4444");
        c.set("textMuted", "#999999");
        c.set("gradient", "linear");
        assert_eq!(c.accent, "#EF4444");
        assert_eq!(c.get("text_muted"), Some("#999999"));
        assert_eq!(c.get("gradient"), Some("linear"));
    }

    #[test]
    fn test_custom_palette_dark_moods() {
        let tech = custom_palette("#3B82F6", Mood::Tech).unwrap();
        assert_eq!(tech.colors.text, LIGHT_TEXT);
        assert_eq!(tech.colors.primary, "#3B82F6");
        let friendly = custom_palette("#3B82F6", Mood::Friendly).unwrap();
        assert_eq!(friendly.colors.text, DARK_TEXT);
        assert_eq!(friendly.colors.surface, "#FFFFFF");
        assert!(custom_palette("blue", Mood::Bold).is_none());
    }

    #[test]
    fn test_best_palette_prefers_mood_then_first() {
        let mut catalog = PaletteCatalog::new("general", "general");
        let palette = |id: &str, category: &str, mood: Mood| Palette {
            id: id.to_string(),
            name: id.to_string(),
            category: category.to_string(),
            mood,
            colors: ThemeColors::default(),
        };
        catalog.add_palette(palette("own", "plombier", Mood::Professional));
        catalog.add_palette(palette("urgent", "general", Mood::Urgent));

        assert_eq!(catalog.best_palette("plombier", Mood::Urgent).unwrap().id, "urgent");
        assert_eq!(catalog.best_palette("plombier", Mood::Bold).unwrap().id, "own");
        assert_eq!(catalog.palettes_for("general").len(), 1);
    }

    #[test]
    fn test_rotation_buckets_override_index() {
        let scheme = |name: &str| ColorScheme {
            name: name.to_string(),
            colors: ThemeColors::default(),
        };
        let rotation = ThemeRotation {
            schemes: (0..6).map(|i| scheme(&format!("s{}", i))).collect(),
            fonts: vec![FontPair::new("A", "B"), FontPair::new("C", "D")],
            styles: vec![],
            buckets: vec![StyleBucket {
                keyword: "bold".to_string(),
                schemes: vec![5, 4, 3],
            }],
        };
        let plain = Record::new(json!({}));
        let bold = Record::new(json!({"stylePreference": "bold"}));

        assert_eq!(rotation.scheme_index(7, &plain), 1);
        assert_eq!(rotation.scheme_index(1, &bold), 4);
        let theme = rotation.theme_for_index(3, &plain);
        assert_eq!(theme.name, "s3");
        assert_eq!(theme.fonts.heading, "C");
        assert_eq!(theme.shape_style.motion, "snappy");
    }
}
