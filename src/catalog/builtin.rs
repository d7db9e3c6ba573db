//! Built-in catalog data
//!
//! Block types are plain names (`header`, `hero`, `cta`, ...). The built-in tables read
//! the flat `is24x7` flag for round-the-clock availability.

use crate::assembly::{VariantRule, VariantTable};
use crate::catalog::{
    Pattern, PatternBlock, PatternTheme, Requirement, SkeletonBlock, Structure, StructureBlock,
};
use crate::ordering::CompatibilityTable;
use crate::rules::{Action, ActionKind, Condition, Operator, Rule, Target};
use crate::theme::{
    CategoryStyle, ColorScheme, FontPair, Mood, Palette, PaletteCatalog, StyleBucket, StyleTokens,
    ThemeColors, ThemeRotation,
};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet};

fn cond(field: &str, operator: Operator, value: Value, weight: u8) -> Condition {
    Condition::new(field, operator, value, weight)
}

fn action(kind: ActionKind, target: Target, payload: Value, priority: u8) -> Action {
    Action::new(kind, target, payload, priority)
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn tags(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|t| t.to_string()).collect()
}

fn rule(
    id: &str,
    name: &str,
    description: &str,
    category: &str,
    priority: u8,
    conditions: Vec<Condition>,
    actions: Vec<Action>,
    rule_tags: &[&str],
) -> Rule {
    Rule {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        conditions,
        actions,
        priority,
        tags: tags(rule_tags),
    }
}

/// Default rule set
pub fn rules() -> Vec<Rule> {
    use ActionKind::*;
    use Operator::*;

    vec![
        rule(
            "urgency-service",
            "Service Urgence 24/7",
            "Ajoute des éléments d'urgence si service 24/7",
            "services",
            90,
            vec![cond("is24x7", Equals, json!(true), 100)],
            vec![
                action(AddBlock, Target::block("hero"), json!({ "variant": "bold" }), 90)
                    .at_position(1),
                action(
                    AddBlock,
                    Target::block("cta"),
                    json!({ "variant": "urgent", "countdown": true }),
                    85,
                ),
                action(SetColor, Target::All, json!({ "accent": "#EF4444" }), 70),
            ],
            &["urgency", "conversion"],
        ),
        rule(
            "established-business",
            "Entreprise Établie",
            "Met en avant la confiance pour les entreprises anciennes",
            "trust",
            80,
            vec![
                cond("yearEstablished", LessThan, json!(2010), 80),
                cond("hasTestimonials", Equals, json!(true), 20),
            ],
            vec![
                action(
                    AddBlock,
                    Target::block("content"),
                    json!({ "type": "stats", "showYears": true }),
                    80,
                ),
                action(
                    AddBlock,
                    Target::block("testimonials"),
                    json!({ "variant": "video-cards" }),
                    85,
                ),
                action(SetVariant, Target::block("header"), json!("corporate"), 70),
            ],
            &["trust", "authority"],
        ),
        rule(
            "detailed-process",
            "Process Détaillé",
            "Ajoute une timeline pour les process détaillés",
            "content",
            75,
            vec![cond("hasProcess", Equals, json!(true), 100)],
            vec![action(
                AddBlock,
                Target::block("features"),
                json!({ "layout": "timeline" }),
                80,
            )
            .at_position(3)],
            &["process", "trust"],
        ),
        rule(
            "visual-portfolio",
            "Portfolio Visuel",
            "Met en avant la galerie pour les métiers visuels",
            "visual",
            85,
            vec![
                cond("hasGallery", Equals, json!(true), 60),
                cond(
                    "businessType",
                    In,
                    json!(["peintre", "menuisier", "carreleur"]),
                    40,
                ),
            ],
            vec![
                action(
                    AddBlock,
                    Target::block("gallery"),
                    json!({ "variant": "masonry-flow" }),
                    85,
                )
                .at_position(2),
                action(SetLayout, Target::All, json!("visual-focus"), 70),
            ],
            &["visual", "portfolio"],
        ),
        rule(
            "transparent-pricing",
            "Tarification Transparente",
            "Ajoute les prix si transparence souhaitée",
            "pricing",
            70,
            vec![cond("hasPricing", Equals, json!(true), 100)],
            vec![action(
                AddBlock,
                Target::block("pricing"),
                json!({ "toggle": true }),
                75,
            )
            .at_position(4)],
            &["pricing", "transparency"],
        ),
        rule(
            "modern-tech-style",
            "Style Tech Moderne",
            "Style high-tech pour électriciens et domotique",
            "style",
            80,
            vec![
                cond("businessType", Equals, json!("electricien"), 50),
                cond("stylePreference", In, json!(["modern", "tech"]), 50),
            ],
            vec![
                action(SetVariant, Target::All, json!("modern"), 80),
                action(
                    SetColor,
                    Target::All,
                    json!({ "primary": "#8B5CF6", "secondary": "#10B981" }),
                    75,
                ),
                action(SetContent, Target::All, json!({ "tone": "technical" }), 70),
            ],
            &["style", "tech"],
        ),
    ]
}

/// Default predecessor table
pub fn compatibility() -> CompatibilityTable {
    CompatibilityTable::new()
        .with("header", &[])
        .with("hero", &["header"])
        .with("services", &["hero"])
        .with("features", &["hero"])
        .with("gallery", &["services", "features"])
        .with("testimonials", &["services", "gallery"])
        .with("cta", &["testimonials", "pricing"])
        .with("contact", &["cta"])
        .with("footer", &["contact"])
}

fn skeleton_block(
    block_type: &str,
    variant: &str,
    position: usize,
    props: Value,
    when: Vec<Condition>,
) -> SkeletonBlock {
    SkeletonBlock {
        block_type: block_type.to_string(),
        variant: variant.to_string(),
        props: object(props),
        position,
        when,
    }
}

/// Blocks every candidate starts from
pub fn skeleton() -> Vec<SkeletonBlock> {
    vec![
        skeleton_block(
            "header",
            "modern",
            0,
            json!({
                "businessName": "{{businessName}}",
                "tagline": "{{tagline}}",
                "phone": "{{phone}}",
                "ctaText": "Devis gratuit"
            }),
            vec![],
        ),
        skeleton_block(
            "hero",
            "split",
            1,
            json!({
                "title": "{{heroTitle}}",
                "subtitle": "{{heroSubtitle}}",
                "primaryButtonText": "Contactez-nous",
                "secondaryButtonText": "Nos services"
            }),
            vec![],
        ),
        skeleton_block(
            "footer",
            "gradient",
            999,
            json!({
                "businessName": "{{businessName}}",
                "address": "{{address}}",
                "phone": "{{phone}}",
                "email": "{{email}}"
            }),
            vec![],
        ),
        skeleton_block(
            "services",
            "cards-hover",
            2,
            json!({ "title": "Nos Services", "services": "{{services}}" }),
            vec![cond("services.length", Operator::GreaterThan, json!(0), 50)],
        ),
        skeleton_block(
            "testimonials",
            "modern",
            5,
            json!({ "title": "Ce que disent nos clients" }),
            vec![cond("hasTestimonials", Operator::Equals, json!(true), 50)],
        ),
        skeleton_block(
            "contact",
            "split-map",
            8,
            json!({ "title": "Contactez-nous", "showMap": true }),
            vec![],
        ),
    ]
}

fn pattern_block(block_type: &str, variant: &str, props: Value) -> PatternBlock {
    PatternBlock {
        block_type: block_type.to_string(),
        variant: variant.to_string(),
        props: object(props),
    }
}

fn pattern_colors(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(slot, hex)| (slot.to_string(), hex.to_string()))
        .collect()
}

/// Archetype patterns offered alongside the rule-driven candidate
pub fn patterns() -> Vec<Pattern> {
    vec![
        Pattern {
            id: "urgency-master".to_string(),
            name: "Urgence Master".to_string(),
            description: "Optimisé pour les services d'urgence 24/7".to_string(),
            blocks: vec![
                pattern_block(
                    "header",
                    "modern",
                    json!({ "sticky": "always", "ctaText": "Urgence" }),
                ),
                pattern_block("hero", "bold", json!({ "countdown": true, "urgencyBadge": true })),
                pattern_block("services", "cards-hover", json!({ "highlight": "urgency" })),
                pattern_block(
                    "cta",
                    "urgent",
                    json!({ "countdown": true, "pulseAnimation": true }),
                ),
                pattern_block(
                    "contact",
                    "floating-cards",
                    json!({ "showPhone": true, "size": "large" }),
                ),
                pattern_block("footer", "dark", json!({ "showEmergencyContact": true })),
            ],
            theme: PatternTheme {
                colors: pattern_colors(&[
                    ("primary", "#DC2626"),
                    ("secondary", "#059669"),
                    ("accent", "#F59E0B"),
                ]),
                spacing: Some("compact".to_string()),
                ..PatternTheme::default()
            },
            relevance: vec![cond("is24x7", Operator::Equals, json!(true), 50)],
        },
        Pattern {
            id: "trust-builder".to_string(),
            name: "Trust Builder".to_string(),
            description: "Met en avant l'expérience et la confiance".to_string(),
            blocks: vec![
                pattern_block("header", "corporate", json!({ "showBadges": true })),
                pattern_block("hero", "elegant", json!({ "showTrustBadges": true })),
                pattern_block("content", "stats", json!({ "showYearsExperience": true })),
                pattern_block("features", "timeline", json!({ "showProcess": true })),
                pattern_block("testimonials", "video-cards", json!({ "showRatings": true })),
                pattern_block("faq", "chatbot", json!({ "showExpertBadge": true })),
                pattern_block("footer", "gradient", json!({ "showCertifications": true })),
            ],
            theme: PatternTheme {
                colors: pattern_colors(&[
                    ("primary", "#1E40AF"),
                    ("secondary", "#10B981"),
                    ("accent", "#6366F1"),
                ]),
                spacing: Some("relaxed".to_string()),
                ..PatternTheme::default()
            },
            relevance: vec![
                cond("yearEstablished", Operator::GreaterThan, json!(0), 50),
                cond("yearEstablished", Operator::LessThan, json!(2010), 50),
            ],
        },
        Pattern {
            id: "visual-showcase".to_string(),
            name: "Visual Showcase".to_string(),
            description: "Portfolio visuel pour métiers créatifs".to_string(),
            blocks: vec![
                pattern_block("header", "minimal", json!({ "transparent": true })),
                pattern_block("hero", "split", json!({ "imageGallery": true })),
                pattern_block(
                    "gallery",
                    "masonry-flow",
                    json!({ "showFilters": true, "lightbox": true }),
                ),
                pattern_block("services", "image-cards", json!({ "showPortfolio": true })),
                pattern_block("content", "before-after", json!({ "interactive": true })),
                pattern_block("cta", "elegant", json!({ "backgroundImage": true })),
                pattern_block("footer", "waves", json!({ "showInstagram": true })),
            ],
            theme: PatternTheme {
                colors: pattern_colors(&[
                    ("primary", "#7C3AED"),
                    ("secondary", "#EC4899"),
                    ("accent", "#F59E0B"),
                ]),
                border_radius: Some("large".to_string()),
                ..PatternTheme::default()
            },
            relevance: vec![cond("hasGallery", Operator::Equals, json!(true), 50)],
        },
        Pattern {
            id: "premium-elite".to_string(),
            name: "Premium Elite".to_string(),
            description: "Design luxueux pour services haut de gamme".to_string(),
            blocks: vec![
                pattern_block("header", "elegant", json!({ "glassmorphism": true })),
                pattern_block("hero", "video-bg", json!({ "parallax": true })),
                pattern_block("services", "luxury-cards", json!({ "goldAccents": true })),
                pattern_block("features", "bento-grid", json!({ "animations": "premium" })),
                pattern_block("pricing", "elegant", json!({ "showValue": true })),
                pattern_block("testimonials", "luxury", json!({ "showClientLogos": true })),
                pattern_block("contact", "glassmorphism", json!({ "showAppointment": true })),
                pattern_block("footer", "organic", json!({ "minimal": true })),
            ],
            theme: PatternTheme {
                colors: pattern_colors(&[
                    ("primary", "#991B1B"),
                    ("secondary", "#B91C1C"),
                    ("accent", "#FCD34D"),
                    ("background", "#1F2937"),
                    ("text", "#F9FAFB"),
                ]),
                fonts: Some(FontPair::new("Playfair Display", "Inter")),
                ..PatternTheme::default()
            },
            relevance: vec![cond("stylePreference", Operator::Equals, json!("elegant"), 50)],
        },
        Pattern {
            id: "local-hero".to_string(),
            name: "Local Hero".to_string(),
            description: "Optimisé pour le référencement local".to_string(),
            blocks: vec![
                pattern_block("header", "modern", json!({ "showLocation": true })),
                pattern_block("hero", "local-focused", json!({ "showServiceArea": true })),
                pattern_block("services", "location-based", json!({ "showCities": true })),
                pattern_block("content", "local-expertise", json!({ "showMap": true })),
                pattern_block("testimonials", "local-reviews", json!({ "showLocation": true })),
                pattern_block("contact", "split-map", json!({ "mapProminent": true })),
                pattern_block("footer", "centered", json!({ "showServiceAreas": true })),
            ],
            theme: PatternTheme {
                colors: pattern_colors(&[
                    ("primary", "#059669"),
                    ("secondary", "#3B82F6"),
                    ("accent", "#F59E0B"),
                ]),
                ..PatternTheme::default()
            },
            relevance: vec![cond("serviceAreas.length", Operator::GreaterThan, json!(5), 50)],
        },
    ]
}

fn structure(
    id: &str,
    name: &str,
    description: &str,
    structure_tags: &[&str],
    blocks: &[(&str, &str, Requirement)],
) -> Structure {
    Structure {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        tags: structure_tags.iter().map(|t| t.to_string()).collect(),
        blocks: blocks
            .iter()
            .map(|(block_type, variant, requirement)| StructureBlock {
                block_type: block_type.to_string(),
                variant: Some(variant.to_string()),
                requirement: *requirement,
            })
            .collect(),
    }
}

/// Site structures used for variations
pub fn structures() -> Vec<Structure> {
    use Requirement::{Conditional as C, Optional as O, Required as R};

    vec![
        structure(
            "urgency-first",
            "Urgence Première",
            "Pour les métiers d'urgence 24/7",
            &["urgency", "24/7", "emergency", "neon"],
            &[
                ("header", "transparent-float", R),
                ("hero", "split-diagonal", R),
                ("cta", "floating-emergency", R),
                ("services", "hexagon-grid", R),
                ("features", "3d-carousel", O),
                ("testimonials", "stacked-cards", C),
                ("contact", "glass-morphism", R),
                ("footer", "wave-animated", R),
            ],
        ),
        structure(
            "visual-showcase",
            "Vitrine Visuelle",
            "Pour les métiers visuels avec beaucoup de réalisations",
            &["portfolio", "visual", "showcase", "gallery", "brutalist"],
            &[
                ("header", "bold-brutalist", R),
                ("hero", "asymmetric-split", R),
                ("gallery", "polaroid-stack", R),
                ("content", "animated-counters", O),
                ("services", "flip-cards", R),
                ("gallery", "infinite-scroll", C),
                ("testimonials", "video-wall", O),
                ("cta", "liquid-morph", R),
                ("footer", "split-creative", R),
            ],
        ),
        structure(
            "trust-expertise",
            "Confiance & Expertise",
            "Pour les entreprises établies",
            &["trust", "expertise", "professional", "corporate"],
            &[
                ("header", "corporate-mega", R),
                ("hero", "cinemagraph-bg", R),
                ("content", "timeline-history", R),
                ("features", "bento-grid", R),
                ("content", "trust-badges", C),
                ("testimonials", "linkedin-style", R),
                ("faq", "chat-bubble", O),
                ("contact", "appointment-scheduler", R),
                ("footer", "corporate-trust", R),
            ],
        ),
        structure(
            "local-proximity",
            "Proximité Locale",
            "Pour les artisans ancrés localement",
            &["local", "proximity", "community", "terroir"],
            &[
                ("header", "warm-organic", R),
                ("hero", "map-background", R),
                ("content", "local-roots", R),
                ("services", "location-based", R),
                ("features", "interactive-map", C),
                ("pricing", "zone-pricing", C),
                ("testimonials", "google-reviews", O),
                ("contact", "multi-location", R),
                ("footer", "community-links", R),
            ],
        ),
        structure(
            "modern-innovation",
            "Innovation Moderne",
            "Pour les entreprises tournées vers l'innovation",
            &["modern", "innovation", "tech", "cyberpunk"],
            &[
                ("header", "holographic", R),
                ("hero", "particles-3d", R),
                ("features", "floating-orbs", R),
                ("content", "tech-metrics", O),
                ("services", "neural-network", R),
                ("content", "innovation-lab", C),
                ("cta", "glitch-effect", R),
                ("footer", "matrix-rain", R),
            ],
        ),
        structure(
            "service-focused",
            "Focus Services",
            "Pour mettre en avant une offre détaillée",
            &["services", "detailed", "pricing", "luxury"],
            &[
                ("header", "luxury-minimal", R),
                ("hero", "editorial-split", R),
                ("services", "magazine-layout", R),
                ("pricing", "luxury-cards", C),
                ("content", "service-journey", O),
                ("features", "diamond-grid", O),
                ("faq", "elegant-drops", C),
                ("contact", "concierge-form", R),
                ("footer", "luxury-brands", R),
            ],
        ),
        structure(
            "story-driven",
            "Histoire & Valeurs",
            "Pour raconter l'histoire de l'entreprise",
            &["story", "history", "values", "cinematic"],
            &[
                ("header", "documentary-nav", R),
                ("hero", "cinematic-intro", R),
                ("content", "chapter-scroll", R),
                ("content", "mission-manifesto", R),
                ("content", "team-portraits", C),
                ("services", "narrative-cards", R),
                ("testimonials", "documentary-style", O),
                ("cta", "epilogue-cta", R),
                ("footer", "credits-roll", R),
            ],
        ),
        structure(
            "conversion-optimized",
            "Conversion Max",
            "Pour maximiser les demandes de devis",
            &["conversion", "leads", "sales", "silicon-valley"],
            &[
                ("header", "sticky-cta", R),
                ("hero", "split-form", R),
                ("features", "icon-showcase", R),
                ("testimonials", "trust-logos", R),
                ("pricing", "slider-compare", C),
                ("cta", "countdown-offer", R),
                ("faq", "instant-answers", O),
                ("contact", "smart-form", R),
                ("footer", "conversion-focused", R),
            ],
        ),
        structure(
            "creative-portfolio",
            "Portfolio Créatif",
            "Pour les métiers artistiques",
            &["creative", "portfolio", "artistic", "gallery"],
            &[
                ("header", "invisible-menu", R),
                ("hero", "fullscreen-gallery", R),
                ("gallery", "hexagon-hive", R),
                ("content", "artist-statement", O),
                ("gallery", "3d-carousel", R),
                ("testimonials", "art-critics", O),
                ("cta", "exhibition-invite", R),
                ("footer", "gallery-minimal", R),
            ],
        ),
        structure(
            "minimalist-elegant",
            "Minimaliste Élégant",
            "Pour une présence sobre et raffinée",
            &["minimal", "elegant", "clean", "zen"],
            &[
                ("header", "zen-navigation", R),
                ("hero", "breath-space", R),
                ("content", "haiku-intro", R),
                ("services", "zen-cards", R),
                ("testimonials", "minimal-wisdom", O),
                ("contact", "serene-form", R),
                ("footer", "zen-closure", R),
            ],
        ),
        structure(
            "dark-luxury",
            "Dark Luxury",
            "Pour les prestations haut de gamme",
            &["luxury", "premium", "dark", "exclusive"],
            &[
                ("header", "black-gold", R),
                ("hero", "dark-elegance", R),
                ("content", "luxury-intro", R),
                ("services", "gold-accent", R),
                ("gallery", "spotlight-gallery", C),
                ("testimonials", "vip-reviews", O),
                ("pricing", "premium-tiers", C),
                ("contact", "exclusive-form", R),
                ("footer", "luxury-dark", R),
            ],
        ),
        structure(
            "eco-friendly",
            "Eco-Responsable",
            "Pour les entreprises engagées",
            &["eco", "sustainable", "green", "nature"],
            &[
                ("header", "earth-tones", R),
                ("hero", "nature-video", R),
                ("content", "eco-mission", R),
                ("features", "leaf-icons", R),
                ("services", "sustainable-grid", R),
                ("content", "carbon-stats", O),
                ("testimonials", "eco-community", O),
                ("cta", "green-action", R),
                ("footer", "eco-footer", R),
            ],
        ),
    ]
}

fn variant_rule(when: Vec<Condition>, variant: &str) -> VariantRule {
    VariantRule {
        when,
        variant: variant.to_string(),
    }
}

/// Per-type variant selection table
pub fn variants() -> VariantTable {
    use Operator::*;

    let mut table = VariantTable::new();
    table.set(
        "hero",
        vec![
            variant_rule(vec![cond("is24x7", Equals, json!(true), 50)], "split-content"),
            variant_rule(
                vec![cond("portfolioImages.length", GreaterThan, json!(0), 50)],
                "fullscreen-video",
            ),
            variant_rule(
                vec![cond("yearEstablished", LessThan, json!(2010), 50)],
                "gradient-modern",
            ),
            variant_rule(vec![], "minimal-centered"),
        ],
    );
    table.set(
        "services",
        vec![
            variant_rule(vec![cond("services.length", GreaterThan, json!(6), 50)], "grid-modern"),
            variant_rule(vec![cond("pricing.hourlyRate", Exists, Value::Null, 50)], "cards-hover"),
            variant_rule(vec![], "list-detailed"),
        ],
    );
    table.set(
        "gallery",
        vec![
            variant_rule(
                vec![cond("beforeAfterImages.length", GreaterThan, json!(0), 50)],
                "before-after",
            ),
            variant_rule(
                vec![cond("portfolioImages.length", GreaterThan, json!(10), 50)],
                "masonry-flow",
            ),
            variant_rule(vec![], "grid-uniform"),
        ],
    );
    table.set(
        "testimonials",
        vec![
            variant_rule(
                vec![cond("testimonials.length", GreaterThan, json!(6), 50)],
                "carousel-3d",
            ),
            variant_rule(
                vec![cond("videoTestimonials.length", GreaterThan, json!(0), 50)],
                "video-testimonials",
            ),
            variant_rule(vec![], "grid"),
        ],
    );
    table
}

struct PaletteSpec<'a> {
    id: &'a str,
    name: &'a str,
    mood: Mood,
    /// primary, secondary, accent, background, surface, text, muted text
    colors: [&'a str; 7],
}

fn theme_colors(colors: [&str; 7], extra: &[(&str, &str)]) -> ThemeColors {
    let [primary, secondary, accent, background, surface, text, text_muted] = colors;
    ThemeColors {
        primary: primary.to_string(),
        secondary: secondary.to_string(),
        accent: accent.to_string(),
        background: background.to_string(),
        surface: surface.to_string(),
        text: text.to_string(),
        text_muted: text_muted.to_string(),
        extra: extra
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

fn add_palettes(catalog: &mut PaletteCatalog, category: &str, specs: &[PaletteSpec<'_>]) {
    for spec in specs {
        catalog.add_palette(Palette {
            id: spec.id.to_string(),
            name: spec.name.to_string(),
            category: category.to_string(),
            mood: spec.mood,
            colors: theme_colors(spec.colors, &[]),
        });
    }
}

fn category_style(heading: &str, body: &str, spacing: &str, border_radius: &str) -> CategoryStyle {
    CategoryStyle {
        fonts: FontPair::new(heading, body),
        spacing: spacing.to_string(),
        border_radius: border_radius.to_string(),
    }
}

/// Trade palettes plus the general set offered to every trade
pub fn palettes() -> PaletteCatalog {
    let mut catalog = PaletteCatalog::new("general", "plombier");

    add_palettes(
        &mut catalog,
        "plombier",
        &[
            PaletteSpec {
                id: "ocean-trust",
                name: "Ocean Trust",
                mood: Mood::Professional,
                colors: [
                    "#0066CC", "#00A651", "#FF6B35", "#F8FAFC",
                    "#FFFFFF", "#1A202C", "#718096",
                ],
            },
            PaletteSpec {
                id: "aqua-modern",
                name: "Aqua Modern",
                mood: Mood::Tech,
                colors: [
                    "#0891B2", "#7C3AED", "#EC4899", "#F9FAFB",
                    "#FFFFFF", "#111827", "#6B7280",
                ],
            },
            PaletteSpec {
                id: "urgency-pro",
                name: "Urgency Pro",
                mood: Mood::Urgent,
                colors: [
                    "#DC2626", "#059669", "#F59E0B", "#FEF3C7",
                    "#FFFBEB", "#78350F", "#92400E",
                ],
            },
        ],
    );
    add_palettes(
        &mut catalog,
        "electricien",
        &[
            PaletteSpec {
                id: "voltage-yellow",
                name: "Voltage Yellow",
                mood: Mood::Tech,
                colors: [
                    "#FCD34D", "#1F2937", "#EF4444", "#FFFBEB",
                    "#FEF3C7", "#1F2937", "#4B5563",
                ],
            },
            PaletteSpec {
                id: "electric-purple",
                name: "Electric Purple",
                mood: Mood::Tech,
                colors: [
                    "#8B5CF6", "#10B981", "#F59E0B", "#FAFAF9",
                    "#FFFFFF", "#18181B", "#71717A",
                ],
            },
            PaletteSpec {
                id: "power-grid",
                name: "Power Grid",
                mood: Mood::Professional,
                colors: [
                    "#3B82F6", "#F97316", "#06B6D4", "#F0F9FF",
                    "#E0F2FE", "#0C4A6E", "#075985",
                ],
            },
        ],
    );
    add_palettes(
        &mut catalog,
        "menuisier",
        &[
            PaletteSpec {
                id: "wood-craft",
                name: "Wood Craft",
                mood: Mood::Natural,
                colors: [
                    "#92400E", "#059669", "#F59E0B", "#FEF3C7",
                    "#FFFBEB", "#451A03", "#78350F",
                ],
            },
            PaletteSpec {
                id: "artisan-elegant",
                name: "Artisan Elegant",
                mood: Mood::Luxury,
                colors: [
                    "#7C2D12", "#0891B2", "#D97706", "#FFFBF3",
                    "#FFF7ED", "#18181B", "#57534E",
                ],
            },
        ],
    );
    add_palettes(
        &mut catalog,
        "peintre",
        &[
            PaletteSpec {
                id: "creative-spectrum",
                name: "Creative Spectrum",
                mood: Mood::Bold,
                colors: [
                    "#7C3AED", "#EC4899", "#06B6D4", "#FAFAFF",
                    "#F3F4F6", "#111827", "#6B7280",
                ],
            },
            PaletteSpec {
                id: "pastel-dream",
                name: "Pastel Dream",
                mood: Mood::Friendly,
                colors: [
                    "#A78BFA", "#F9A8D4", "#67E8F9", "#FDF4FF",
                    "#FCE7F3", "#701A75", "#A21CAF",
                ],
            },
        ],
    );
    add_palettes(
        &mut catalog,
        "general",
        &[
            PaletteSpec {
                id: "corporate-blue",
                name: "Corporate Blue",
                mood: Mood::Professional,
                colors: [
                    "#1E40AF", "#10B981", "#F59E0B", "#F8FAFC",
                    "#FFFFFF", "#0F172A", "#64748B",
                ],
            },
            PaletteSpec {
                id: "modern-dark",
                name: "Modern Dark",
                mood: Mood::Tech,
                colors: [
                    "#8B5CF6", "#10B981", "#F59E0B", "#0F172A",
                    "#1E293B", "#F8FAFC", "#CBD5E1",
                ],
            },
            PaletteSpec {
                id: "luxury-gold",
                name: "Luxury Gold",
                mood: Mood::Luxury,
                colors: [
                    "#991B1B", "#B91C1C", "#FCD34D", "#1F2937",
                    "#374151", "#F9FAFB", "#D1D5DB",
                ],
            },
        ],
    );

    catalog.set_style("plombier", category_style("Inter", "Inter", "normal", "medium"));
    catalog.set_style("electricien", category_style("Inter", "Inter", "normal", "small"));
    catalog.set_style("menuisier", category_style("Playfair Display", "Inter", "relaxed", "large"));
    catalog.set_style("peintre", category_style("Inter", "Inter", "normal", "large"));
    catalog
}

fn scheme(name: &str, colors: [&str; 7], states: [&str; 3], gradient: &str) -> ColorScheme {
    let [success, warning, error] = states;
    ColorScheme {
        name: name.to_string(),
        colors: theme_colors(
            colors,
            &[
                ("success", success),
                ("warning", warning),
                ("error", error),
                ("gradient", gradient),
            ],
        ),
    }
}

fn style_tokens(border_radius: &str, spacing: &str, shadows: &str) -> StyleTokens {
    StyleTokens {
        border_radius: border_radius.to_string(),
        spacing: spacing.to_string(),
        shadows: shadows.to_string(),
    }
}

fn bucket(keyword: &str, schemes: [usize; 3]) -> StyleBucket {
    StyleBucket {
        keyword: keyword.to_string(),
        schemes: schemes.to_vec(),
    }
}

/// Color schemes, font pairs and shape tokens for variations
pub fn rotation() -> ThemeRotation {
    ThemeRotation {
        schemes: vec![
            scheme(
                "Electric Neon",
                ["#00D9FF", "#0066FF", "#FF00FF", "#0A0A0A", "#1A1A1A", "#FFFFFF", "#B8B8B8"],
                ["#00FF88", "#FFD700", "#FF0066"],
                "linear-gradient(135deg, #00D9FF 0%, #0066FF 50%, #FF00FF 100%)",
            ),
            scheme(
                "Brutalist Impact",
                ["#FF6B00", "#1A1A1A", "#FFEB00", "#F5F5F5", "#FFFFFF", "#1A1A1A", "#666666"],
                ["#00C853", "#FF9800", "#D32F2F"],
                "linear-gradient(45deg, #FF6B00 0%, #FFEB00 100%)",
            ),
            scheme(
                "Corporate Premium",
                ["#1E3A8A", "#3B82F6", "#F59E0B", "#FAFBFC", "#FFFFFF", "#1E293B", "#64748B"],
                ["#10B981", "#F59E0B", "#EF4444"],
                "linear-gradient(135deg, #1E3A8A 0%, #3B82F6 100%)",
            ),
            scheme(
                "Terroir Naturel",
                ["#8B4513", "#228B22", "#FFD700", "#FFF8DC", "#FFFFFF", "#2F4F4F", "#696969"],
                ["#32CD32", "#FFA500", "#DC143C"],
                "linear-gradient(135deg, #8B4513 0%, #228B22 100%)",
            ),
            scheme(
                "Cyberpunk 2030",
                ["#9D00FF", "#00FFF0", "#FF0080", "#0D0D0D", "#1A0D26", "#FFFFFF", "#B8B8D0"],
                ["#00FF00", "#FFFF00", "#FF0000"],
                "linear-gradient(135deg, #9D00FF 0%, #00FFF0 50%, #FF0080 100%)",
            ),
            scheme(
                "Dark Luxury",
                ["#FFD700", "#1A1A1A", "#B8860B", "#000000", "#1A1A1A", "#FFFFFF", "#CCCCCC"],
                ["#218838", "#FFC107", "#C82333"],
                "linear-gradient(135deg, #FFD700 0%, #B8860B 100%)",
            ),
            scheme(
                "Pastel Elegance",
                ["#E8B4F8", "#B4E8F8", "#F8B4B4", "#FEFEFE", "#FFFFFF", "#4A5568", "#A0AEC0"],
                ["#B4F8B4", "#F8E8B4", "#F8B4B4"],
                "linear-gradient(135deg, #E8B4F8 0%, #B4E8F8 50%, #F8B4B4 100%)",
            ),
            scheme(
                "Industrial Power",
                ["#455A64", "#FF5722", "#FFC107", "#ECEFF1", "#FFFFFF", "#263238", "#607D8B"],
                ["#4CAF50", "#FF9800", "#F44336"],
                "linear-gradient(135deg, #455A64 0%, #FF5722 100%)",
            ),
            scheme(
                "Zen Serenity",
                ["#6B7280", "#374151", "#D97706", "#FAFAFA", "#FFFFFF", "#1F2937", "#9CA3AF"],
                ["#059669", "#D97706", "#DC2626"],
                "linear-gradient(135deg, #F3F4F6 0%, #E5E7EB 100%)",
            ),
            scheme(
                "Ocean Breeze",
                ["#0891B2", "#06B6D4", "#10B981", "#F0FDFA", "#FFFFFF", "#134E4A", "#5EEAD4"],
                ["#10B981", "#F59E0B", "#EF4444"],
                "linear-gradient(135deg, #0891B2 0%, #06B6D4 50%, #10B981 100%)",
            ),
            scheme(
                "Sunset Vibes",
                ["#F97316", "#EA580C", "#FCD34D", "#FFFBEB", "#FFFFFF", "#451A03", "#92400E"],
                ["#65A30D", "#FCD34D", "#DC2626"],
                "linear-gradient(135deg, #F97316 0%, #EA580C 50%, #FCD34D 100%)",
            ),
            scheme(
                "Forest Sanctuary",
                ["#15803D", "#166534", "#A3E635", "#F7FEE7", "#FFFFFF", "#14532D", "#22C55E"],
                ["#16A34A", "#FDE047", "#DC2626"],
                "linear-gradient(135deg, #15803D 0%, #166534 50%, #A3E635 100%)",
            ),
        ],
        fonts: vec![
            FontPair::new("Space Grotesk", "Manrope"),
            FontPair::new("Montserrat", "Inter"),
            FontPair::new("Raleway", "Roboto"),
            FontPair::new("Poppins", "Open Sans"),
            FontPair::new("Playfair Display", "Lato"),
            FontPair::new("Bebas Neue", "Source Sans Pro"),
            FontPair::new("Oswald", "Nunito"),
            FontPair::new("DM Serif Display", "DM Sans"),
        ],
        styles: vec![
            style_tokens("0px", "tight", "sharp"),
            style_tokens("4px", "normal", "subtle"),
            style_tokens("8px", "normal", "medium"),
            style_tokens("16px", "relaxed", "soft"),
            style_tokens("24px", "relaxed", "dreamy"),
            style_tokens("50px", "generous", "floating"),
        ],
        buckets: vec![
            bucket("modern", [0, 4, 6]),
            bucket("classic", [2, 8, 9]),
            bucket("bold", [1, 5, 7]),
            bucket("natural", [3, 11, 9]),
        ],
    }
}
