pub mod gemini;
#[cfg(test)]
pub mod fake;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::GeminiConfig;
use crate::db::models::Garment;
use crate::error::AppError;

// =============================================================================
// Parsed garment
// =============================================================================

/// Structured description extracted from free text. Fields the model could
/// not determine come back empty, whether omitted or sent as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedGarment {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub color: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// TextGenerator trait
// =============================================================================

/// Boundary to the external generative-text service.
///
/// Every failure of the backing service surfaces as
/// [`AppError::ServiceUnavailable`]. Calls are not retried.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Human-readable backend name for logs.
    fn name(&self) -> &'static str;

    /// Turn a free-text description into `{name, category, color}`.
    async fn parse_garment_text(&self, text: &str) -> Result<ParsedGarment, AppError>;

    /// Free-form styling idea for the described item or occasion.
    async fn generate_outfit_idea(&self, text: &str) -> Result<String, AppError>;

    /// Outfit suggestion built from exactly the given garments.
    async fn generate_outfit_from_closet(&self, garments: &[Garment]) -> Result<String, AppError>;
}

// =============================================================================
// Unconfigured backend
// =============================================================================

/// Stand-in used when no API key is configured. Garment CRUD keeps working;
/// every generation call fails with `ServiceUnavailable`.
pub struct UnconfiguredProvider;

const UNCONFIGURED: &str = "no text-generation API key is configured (set GEMINI_API_KEY)";

#[async_trait]
impl TextGenerator for UnconfiguredProvider {
    fn name(&self) -> &'static str {
        "unconfigured"
    }

    async fn parse_garment_text(&self, _text: &str) -> Result<ParsedGarment, AppError> {
        Err(AppError::ServiceUnavailable(UNCONFIGURED.into()))
    }

    async fn generate_outfit_idea(&self, _text: &str) -> Result<String, AppError> {
        Err(AppError::ServiceUnavailable(UNCONFIGURED.into()))
    }

    async fn generate_outfit_from_closet(&self, _garments: &[Garment]) -> Result<String, AppError> {
        Err(AppError::ServiceUnavailable(UNCONFIGURED.into()))
    }
}

// =============================================================================
// Factory
// =============================================================================

/// Create the generator for the given configuration.
/// Falls back to [`UnconfiguredProvider`] when no API key is set.
pub fn resolve_provider(config: &GeminiConfig) -> Result<Arc<dyn TextGenerator>, AppError> {
    match config.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        Some(key) => {
            let provider = gemini::GeminiProvider::new(config, key)?;
            tracing::info!(model = %config.model, "Text generation backed by Gemini");
            Ok(Arc::new(provider))
        }
        None => {
            tracing::warn!("GEMINI_API_KEY not set; outfit generation endpoints will return 503");
            Ok(Arc::new(UnconfiguredProvider))
        }
    }
}
