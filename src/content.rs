//! Block text generation
//!
//! [`ContentWriter`] fills the text slots of a candidate through a [`TextGenerator`]. Every
//! request reads through the [`ContentCache`] first; generated text is cached with its
//! provider and cost. A failing or slow generator never blocks assembly: the slot gets a
//! deterministic fallback built from the record.

use crate::assembly::Candidate;
use crate::cache::{ContentCache, EntryMetadata};
use crate::config::ContentConfig;
use crate::error::GenerationError;
use crate::record::Record;
use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// A text slot of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Slot {
    HeroTitle,
    HeroSubtitle,
    ServicesIntro,
    CtaTitle,
    TestimonialsIntro,
}

impl Slot {
    pub const ALL: [Slot; 5] = [
        Slot::HeroTitle,
        Slot::HeroSubtitle,
        Slot::ServicesIntro,
        Slot::CtaTitle,
        Slot::TestimonialsIntro,
    ];

    pub fn block_type(self) -> &'static str {
        match self {
            Slot::HeroTitle | Slot::HeroSubtitle => "hero",
            Slot::ServicesIntro => "services",
            Slot::CtaTitle => "cta",
            Slot::TestimonialsIntro => "testimonials",
        }
    }

    /// Prop the text is written to
    pub fn prop(self) -> &'static str {
        match self {
            Slot::HeroTitle | Slot::CtaTitle => "title",
            Slot::HeroSubtitle => "subtitle",
            Slot::ServicesIntro | Slot::TestimonialsIntro => "intro",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Slot::HeroTitle => "hero-title",
            Slot::HeroSubtitle => "hero-subtitle",
            Slot::ServicesIntro => "services-intro",
            Slot::CtaTitle => "cta-title",
            Slot::TestimonialsIntro => "testimonials-intro",
        };
        f.write_str(name)
    }
}

/// What to write, independent of how it is phrased
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticRequest {
    pub slot: Slot,
    pub business_type: String,
    pub business_name: String,
    pub city: Option<String>,
    pub tone: Option<String>,
}

impl SemanticRequest {
    /// Request for `slot`; the tone comes from the candidate's content directives
    pub fn for_slot(slot: Slot, record: &Record, directives: &Map<String, Value>) -> Self {
        let city = record
            .text("city")
            .filter(|c| !c.is_empty())
            .or_else(|| record.strings("serviceAreas").into_iter().next());
        Self {
            slot,
            business_type: record.business_type(),
            business_name: record.business_name(),
            city,
            tone: directives
                .get("tone")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }

    /// Cache key; two requests with the same meaning share it
    pub fn cache_key(&self) -> String {
        format!(
            "content:{}:{}:{}:{}:{}",
            self.slot,
            self.business_type.to_lowercase(),
            self.business_name.to_lowercase(),
            self.city.as_deref().unwrap_or("").to_lowercase(),
            self.tone.as_deref().unwrap_or("default"),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedText {
    pub text: String,
    pub cost: f64,
}

/// An external text generator
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        request: &SemanticRequest,
        record: &Record,
    ) -> Result<GeneratedText, GenerationError>;

    fn provider_name(&self) -> &str;
}

/// Where a written text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    Cache,
    Generator,
    Fallback,
}

/// Deterministic text for a slot, built from record fields only
pub fn fallback_text(request: &SemanticRequest, record: &Record) -> String {
    let business_type = &request.business_type;
    let place = request
        .city
        .as_ref()
        .map(|c| format!(" à {}", c))
        .unwrap_or_default();

    match request.slot {
        Slot::HeroTitle if !request.business_name.is_empty() => {
            format!("{}, votre {} de confiance{}", request.business_name, business_type, place)
        }
        Slot::HeroTitle => format!("Votre {} de confiance{}", business_type, place),
        Slot::HeroSubtitle if record.is_24x7() => {
            "Intervention rapide 24h/24 et 7j/7".to_string()
        }
        Slot::HeroSubtitle => format!("Services professionnels de {}{}", business_type, place),
        Slot::ServicesIntro => format!("Découvrez nos services de {}", business_type),
        Slot::CtaTitle if record.is_24x7() => "Besoin d'une intervention urgente ?".to_string(),
        Slot::CtaTitle => "Demandez votre devis gratuit".to_string(),
        Slot::TestimonialsIntro => "Ce que disent nos clients".to_string(),
    }
}

/// Fills text slots through the cache and a generator
pub struct ContentWriter {
    generator: Arc<dyn TextGenerator>,
    cache: Arc<ContentCache>,
    timeout: Duration,
    max_concurrent: usize,
}

impl ContentWriter {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        cache: Arc<ContentCache>,
        config: &ContentConfig,
    ) -> Self {
        Self {
            generator,
            cache,
            timeout: Duration::from_millis(config.timeout_ms),
            max_concurrent: config.max_concurrent.max(1),
        }
    }

    async fn generate(
        &self,
        request: &SemanticRequest,
        record: &Record,
    ) -> Result<GeneratedText, GenerationError> {
        let generated = tokio::time::timeout(self.timeout, self.generator.generate(request, record))
            .await
            .map_err(|_| GenerationError::Timeout(self.timeout.as_millis() as u64))??;
        if generated.text.trim().is_empty() {
            return Err(GenerationError::Empty);
        }
        Ok(generated)
    }

    /// Cached text for `key`; the durable tier is read on the blocking pool
    async fn cached_text(&self, key: &str) -> Option<String> {
        let cache = Arc::clone(&self.cache);
        let owned_key = key.to_string();
        match tokio::task::spawn_blocking(move || cache.get(&owned_key)).await {
            Ok(payload) => {
                payload.and_then(|p| p.get("text").and_then(Value::as_str).map(str::to_string))
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Cache lookup task failed");
                None
            }
        }
    }

    async fn store_text(&self, key: &str, text: &str, metadata: EntryMetadata) {
        let cache = Arc::clone(&self.cache);
        let owned_key = key.to_string();
        let payload = json!({ "text": text });
        match tokio::task::spawn_blocking(move || cache.put(&owned_key, payload, metadata)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(key = %key, error = %e, "Failed to cache generated text"),
            Err(e) => warn!(key = %key, error = %e, "Cache store task failed"),
        }
    }

    /// Text for one request, with where it came from
    pub async fn write(&self, request: &SemanticRequest, record: &Record) -> (String, TextSource) {
        let key = request.cache_key();
        if let Some(text) = self.cached_text(&key).await {
            return (text, TextSource::Cache);
        }

        match self.generate(request, record).await {
            Ok(generated) => {
                let metadata = EntryMetadata::new(self.generator.provider_name(), generated.cost);
                self.store_text(&key, &generated.text, metadata).await;
                debug!(
                    slot = %request.slot,
                    provider = self.generator.provider_name(),
                    "Generated text"
                );
                (generated.text, TextSource::Generator)
            }
            Err(e) => {
                warn!(
                    slot = %request.slot,
                    provider = self.generator.provider_name(),
                    error = %e,
                    "Text generation failed, using fallback"
                );
                (fallback_text(request, record), TextSource::Fallback)
            }
        }
    }

    /// Fill every slot whose block is present and whose prop is unset or still a placeholder
    ///
    /// Returns how many slots were written.
    pub async fn fill_candidate(&self, candidate: &mut Candidate, record: &Record) -> usize {
        let requests: Vec<SemanticRequest> = Slot::ALL
            .iter()
            .filter(|slot| {
                candidate.block(slot.block_type()).is_some_and(|block| {
                    match block.props.get(slot.prop()) {
                        None | Some(Value::Null) => true,
                        Some(Value::String(text)) => text.is_empty() || text.contains("{{"),
                        Some(_) => false,
                    }
                })
            })
            .map(|slot| SemanticRequest::for_slot(*slot, record, &candidate.content_directives))
            .collect();

        let mut written = Vec::with_capacity(requests.len());
        for chunk in requests.chunks(self.max_concurrent) {
            let texts = join_all(chunk.iter().map(|request| self.write(request, record))).await;
            written.extend(chunk.iter().zip(texts));
        }

        let count = written.len();
        for (request, (text, _)) in written {
            if let Some(block) = candidate
                .blocks
                .iter_mut()
                .find(|b| b.block_type == request.slot.block_type())
            {
                block.props.insert(request.slot.prop().to_string(), Value::String(text));
            }
        }
        count
    }
}
