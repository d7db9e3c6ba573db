//! Template assembler
//!
//! Merges base blocks, pattern blocks and weighted rule actions into a [`Candidate`], then
//! fills typed entries, personalizes placeholders, registers links and orders blocks.

use crate::assembly::entries::{gallery_images, service_entries, testimonial_entries};
use crate::assembly::links::{header_menu, HOME_HREF};
use crate::assembly::placeholders::personalize;
use crate::assembly::{Block, Candidate, Level, LinkRegistry, Metadata, Origin, VariantTable};
use crate::catalog::Catalog;
use crate::ordering::BlockOrderer;
use crate::record::Record;
use crate::rules::{ActionKind, Target, WeightedAction};
use crate::theme::{ColorPreference, Mood, PaletteCatalog, Theme};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tracing::debug;
use uuid::Uuid;

/// How the candidate theme is produced
#[derive(Debug, Clone, PartialEq)]
pub enum ThemeSeed {
    /// Palette lookup by category and mood; `None` derives the mood from the record
    Palette { mood: Option<Mood> },
    /// Use this theme as is, apart from the color preference and color overrides
    Fixed(Theme),
}

impl Default for ThemeSeed {
    fn default() -> Self {
        ThemeSeed::Palette { mood: None }
    }
}

/// Everything one assembly run consumes
#[derive(Debug, Clone)]
pub struct AssemblyInput<'a> {
    pub base_blocks: Vec<Block>,
    pub actions: &'a [WeightedAction],
    pub pattern_blocks: Vec<Block>,
    pub theme_seed: ThemeSeed,
    pub record: &'a Record,
}

impl<'a> AssemblyInput<'a> {
    pub fn new(record: &'a Record) -> Self {
        Self {
            base_blocks: Vec::new(),
            actions: &[],
            pattern_blocks: Vec::new(),
            theme_seed: ThemeSeed::default(),
            record,
        }
    }

    pub fn base_blocks(mut self, blocks: Vec<Block>) -> Self {
        self.base_blocks = blocks;
        self
    }

    pub fn actions(mut self, actions: &'a [WeightedAction]) -> Self {
        self.actions = actions;
        self
    }

    pub fn pattern_blocks(mut self, blocks: Vec<Block>) -> Self {
        self.pattern_blocks = blocks;
        self
    }

    pub fn theme_seed(mut self, seed: ThemeSeed) -> Self {
        self.theme_seed = seed;
        self
    }
}

/// Builds candidates against injected catalog tables
#[derive(Debug, Clone)]
pub struct TemplateAssembler {
    orderer: BlockOrderer,
    variants: VariantTable,
    palettes: PaletteCatalog,
}

impl TemplateAssembler {
    pub fn new(orderer: BlockOrderer, variants: VariantTable, palettes: PaletteCatalog) -> Self {
        Self {
            orderer,
            variants,
            palettes,
        }
    }

    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self::new(
            catalog.orderer(),
            catalog.variants.clone(),
            catalog.palettes.clone(),
        )
    }

    pub fn select_best_variant(&self, block_type: &str, record: &Record) -> String {
        self.variants.select_best_variant(block_type, record)
    }

    pub fn palettes(&self) -> &PaletteCatalog {
        &self.palettes
    }

    pub fn assemble(&self, input: AssemblyInput<'_>) -> Candidate {
        let record = input.record;

        let mut blocks: Vec<Block> = Vec::new();
        for block in input.base_blocks.into_iter().chain(input.pattern_blocks) {
            merge_block(&mut blocks, block);
        }

        let mut color_overrides: BTreeMap<String, String> = BTreeMap::new();
        let mut layout = Map::new();
        let mut content_directives = Map::new();

        for weighted in input.actions {
            let action = &weighted.action;
            if action.kind != ActionKind::AddBlock {
                continue;
            }
            let Some(block_type) = action.target.block_type() else {
                continue;
            };
            let mut props = action.payload.as_object().cloned().unwrap_or_default();
            let payload_variant = match props.remove("variant") {
                Some(Value::String(variant)) => Some(variant),
                _ => None,
            };

            match blocks.iter_mut().find(|b| b.block_type == block_type) {
                Some(existing) => {
                    existing.merge_props(&props);
                    if let Some(variant) = payload_variant {
                        existing.variant = variant;
                    }
                }
                None => {
                    let variant = payload_variant
                        .unwrap_or_else(|| self.select_best_variant(block_type, record));
                    let block = Block::new(block_type, &variant, props);
                    match action.position {
                        Some(position) => blocks.insert(position.min(blocks.len()), block),
                        None => blocks.push(block),
                    }
                }
            }
        }

        for weighted in input.actions {
            let action = &weighted.action;
            if action.kind != ActionKind::SetVariant {
                continue;
            }
            let Some(variant) = action.payload.as_str() else {
                continue;
            };
            match &action.target {
                Target::All => blocks.iter_mut().for_each(|b| b.variant = variant.to_string()),
                Target::Block(block_type) => {
                    if let Some(block) = blocks.iter_mut().find(|b| &b.block_type == block_type) {
                        block.variant = variant.to_string();
                    }
                }
            }
        }

        for weighted in input.actions {
            let action = &weighted.action;
            match action.kind {
                ActionKind::SetColor => {
                    if let Some(colors) = action.payload.as_object() {
                        for (slot, value) in colors {
                            if let Some(hex) = value.as_str() {
                                color_overrides.insert(slot.clone(), hex.to_string());
                            }
                        }
                    }
                }
                ActionKind::SetLayout => match &action.payload {
                    Value::Object(map) => merge_into(&mut layout, map),
                    Value::String(mode) => {
                        layout.insert("mode".to_string(), json!(mode));
                    }
                    _ => {}
                },
                ActionKind::SetContent => {
                    if let Some(map) = action.payload.as_object() {
                        merge_into(&mut content_directives, map);
                    }
                }
                ActionKind::SetPriority => {
                    let (Some(block_type), Some(index)) =
                        (action.target.block_type(), action.payload.as_u64())
                    else {
                        continue;
                    };
                    if let Some(from) = blocks.iter().position(|b| b.block_type == block_type) {
                        let block = blocks.remove(from);
                        let to = (index as usize).min(blocks.len());
                        blocks.insert(to, block);
                    }
                }
                ActionKind::AddBlock | ActionKind::SetVariant => {}
            }
        }

        fill_entries(&mut blocks, record);
        for block in &mut blocks {
            personalize(&mut block.props, record);
        }
        let links = register_links(&mut blocks, record);

        let types: Vec<&str> = blocks.iter().map(|b| b.block_type.as_str()).collect();
        let resolved = self.orderer.order(&types);
        let mut ordered = Vec::with_capacity(blocks.len());
        for block_type in &resolved.order {
            if let Some(index) = blocks.iter().position(|b| &b.block_type == block_type) {
                ordered.push(blocks.swap_remove(index));
            }
        }
        for (position, block) in ordered.iter_mut().enumerate() {
            block.position = position;
        }
        if resolved.partially_ordered {
            debug!(blocks = ?resolved.order, "Candidate assembled with a partial block order");
        }

        let theme = self.build_theme(input.theme_seed, record, &color_overrides);
        let metadata = generate_metadata(&ordered, &theme);

        Candidate {
            id: Uuid::new_v4().to_string(),
            name: template_name(record),
            description: template_description(record, &ordered),
            category: record.business_type(),
            origin: Origin::Primary,
            blocks: ordered,
            theme,
            layout,
            content_directives,
            links,
            score: 0,
            metadata,
            partially_ordered: resolved.partially_ordered,
        }
    }

    /// Resolve a theme seed, then apply the color preference and color overrides
    pub fn build_theme(
        &self,
        seed: ThemeSeed,
        record: &Record,
        overrides: &BTreeMap<String, String>,
    ) -> Theme {
        let mut theme = match seed {
            ThemeSeed::Palette { mood } => self.palettes.build_theme(record, mood),
            ThemeSeed::Fixed(mut theme) => {
                if let Some(preference) = ColorPreference::for_record(record) {
                    theme.colors.apply_preference(preference);
                }
                theme
            }
        };
        for (slot, value) in overrides {
            theme.colors.set(slot, value.clone());
        }
        theme
    }
}

/// Merge by type: an existing block takes the new variant and props, a new type is appended
fn merge_block(blocks: &mut Vec<Block>, block: Block) {
    match blocks.iter_mut().find(|b| b.block_type == block.block_type) {
        Some(existing) => {
            existing.variant = block.variant;
            existing.merge_props(&block.props);
        }
        None => blocks.push(block),
    }
}

fn merge_into(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, value) in source {
        target.insert(key.clone(), value.clone());
    }
}

fn fill_entries(blocks: &mut [Block], record: &Record) {
    for block in blocks {
        let entries = match block.block_type.as_str() {
            "services" => serde_json::to_value(service_entries(record)),
            "gallery" => serde_json::to_value(gallery_images(record)),
            "testimonials" => serde_json::to_value(testimonial_entries(record)),
            _ => continue,
        };
        let key = match block.block_type.as_str() {
            "gallery" => "images",
            other => other,
        };
        if let Ok(entries) = entries {
            block.props.insert(key.to_string(), entries);
        }
    }
}

fn register_links(blocks: &mut [Block], record: &Record) -> LinkRegistry {
    let mut links = LinkRegistry::new();

    if let Some(header) = blocks.iter_mut().find(|b| b.block_type == "header") {
        let menu = header_menu(record);
        for (label, href) in &menu {
            links.register("header", label, href);
        }
        let items: Vec<Value> = menu
            .iter()
            .map(|(label, href)| json!({ "label": label, "href": href }))
            .collect();
        header.props.insert("menuItems".to_string(), Value::Array(items));
    }

    if let Some(footer) = blocks.iter_mut().find(|b| b.block_type == "footer") {
        if !links.has_link_to(HOME_HREF) {
            links.register("footer", "Accueil", HOME_HREF);
            footer.props.insert(
                "homeLink".to_string(),
                json!({ "label": "Accueil", "href": HOME_HREF }),
            );
        }
    }

    links
}

fn is_heavy(block: &Block) -> bool {
    block.block_type == "gallery" || block.variant.contains("video") || block.variant.contains("3d")
}

/// Performance, SEO, conversion focus and accessibility of a block set
pub fn generate_metadata(blocks: &[Block], theme: &Theme) -> Metadata {
    let heavy = blocks.iter().any(is_heavy);
    let performance = if blocks.len() > 15 && heavy {
        Level::Low
    } else if blocks.len() > 10 || heavy {
        Level::Medium
    } else {
        Level::High
    };

    let has = |block_type: &str| blocks.iter().any(|b| b.block_type == block_type);
    let seo_score = 30 + 35 + if has("header") && has("footer") { 35 } else { 0 };

    let urgent = blocks.iter().any(|b| b.variant.contains("urgent"));
    let conversion_focus = if has("cta") && has("contact") && urgent {
        Level::High
    } else if has("cta") || has("contact") {
        Level::Medium
    } else {
        Level::Low
    };

    Metadata {
        performance,
        accessibility_score: theme.accessibility_score(),
        seo_score,
        conversion_focus,
    }
}

/// `"{businessType} {focus} {Style}"`
pub fn template_name(record: &Record) -> String {
    let style = record
        .text("stylePreference")
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "modern".to_string());
    let mut chars = style.chars();
    let style = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    let focus = if record.is_24x7() {
        "Urgence"
    } else if record.flag("hasTestimonials") {
        "Confiance"
    } else if record.flag("hasGallery") {
        "Portfolio"
    } else {
        "Pro"
    };
    format!("{} {} {}", record.business_type(), focus, style)
}

pub fn template_description(record: &Record, blocks: &[Block]) -> String {
    let mut features = Vec::new();
    let has = |block_type: &str| blocks.iter().any(|b| b.block_type == block_type);
    if has("gallery") {
        features.push("galerie photos");
    }
    if has("testimonials") {
        features.push("témoignages clients");
    }
    if has("pricing") {
        features.push("tarifs transparents");
    }
    if blocks.iter().any(|b| b.variant.contains("urgent")) {
        features.push("optimisé urgences");
    }
    let base = format!("Template professionnel pour {}", record.business_type());
    if features.is_empty() {
        base
    } else {
        format!("{} avec {}", base, features.join(", "))
    }
}
