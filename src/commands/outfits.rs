use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::garments::GarmentResponse;
use crate::engine::outfit;
use crate::engine::provider::ParsedGarment;
use crate::error::AppError;
use crate::AppState;

// ============================================================================
// Request / response bodies
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRequest {
    pub user_id: String,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOutfitRequest {
    pub user_id: String,
    pub garment_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub parsed: ParsedGarment,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdeaResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub idea: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateOutfitResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub outfit_suggestion: String,
    pub items_used: Vec<GarmentResponse>,
}

impl From<outfit::OutfitSuggestion> for GenerateOutfitResponse {
    fn from(s: outfit::OutfitSuggestion) -> Self {
        Self {
            user_id: s.user_id,
            outfit_suggestion: s.outfit_suggestion,
            items_used: s.items_used.into_iter().map(GarmentResponse::from).collect(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/outfits/analyze
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let Json(req) = payload?;

    let parsed = outfit::analyze(state.generator.as_ref(), &req.text).await?;
    Ok(Json(AnalyzeResponse {
        user_id: req.user_id,
        parsed,
    }))
}

/// POST /api/outfits/find-ideas
pub async fn find_ideas(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<IdeaResponse>, AppError> {
    let Json(req) = payload?;

    let idea = outfit::find_ideas(state.generator.as_ref(), &req.text).await?;
    Ok(Json(IdeaResponse {
        user_id: req.user_id,
        idea,
    }))
}

/// POST /api/outfits/generate
pub async fn generate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateOutfitRequest>, JsonRejection>,
) -> Result<Json<GenerateOutfitResponse>, AppError> {
    let Json(req) = payload?;

    let suggestion = outfit::generate_outfit(
        &state.db,
        state.generator.as_ref(),
        &req.user_id,
        &req.garment_ids,
    )
    .await?;
    Ok(Json(suggestion.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::CreateGarmentInput;
    use crate::db::repos::garments as garment_repo;
    use crate::engine::provider::fake::{FakeCall, FakeGenerator, MOCK_IDEA, MOCK_PAIRING};
    use crate::server::testing::{send, test_state, test_state_with};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    fn add(state: &AppState, name: &str, category: &str, color: &str) -> String {
        garment_repo::create(
            &state.db,
            CreateGarmentInput {
                name: name.into(),
                category: category.into(),
                color: color.into(),
            },
        )
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_analyze_returns_parse_verbatim() {
        let (state, generator) = test_state();
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/outfits/analyze",
            Some(json!({"userId": "test1234", "text": "I have a navy blue pant"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["userId"], "test1234");
        assert_eq!(
            body["parsed"],
            json!({"name": "Trousers", "category": "Bottom", "color": "Navy"})
        );
        assert_eq!(
            generator.calls(),
            vec![FakeCall::Parse("I have a navy blue pant".into())]
        );
    }

    #[tokio::test]
    async fn test_find_ideas() {
        let (state, generator) = test_state();
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/outfits/find-ideas",
            Some(json!({"userId": "test1234", "text": "red floral skirt"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"userId": "test1234", "idea": MOCK_IDEA}));
        assert_eq!(generator.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_any_text_is_forwarded_verbatim() {
        let (state, generator) = test_state();
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/outfits/analyze",
            Some(json!({"userId": "u", "text": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["parsed"]["name"], "Trousers");
        assert_eq!(generator.calls(), vec![FakeCall::Parse("   ".into())]);
    }

    #[tokio::test]
    async fn test_missing_fields_are_rejected_without_calling_generator() {
        let (state, generator) = test_state();
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/outfits/analyze",
            Some(json!({"userId": "u"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("text"));

        let (status, _) = send(
            &state,
            Method::POST,
            "/api/outfits/find-ideas",
            Some(json!({"text": "red skirt"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(generator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_generate_with_matching_ids() {
        let (state, generator) = test_state();
        let shirt = add(&state, "Striped Shirt", "Top", "Black/White");
        let jeans = add(&state, "Jeans", "Bottom", "Dark Blue");
        add(&state, "Loafers", "Shoes", "Brown");

        let (status, body) = send(
            &state,
            Method::POST,
            "/api/outfits/generate",
            Some(json!({"userId": "test1234", "garmentIds": [jeans, shirt]})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["userId"], "test1234");
        assert_eq!(body["outfit_suggestion"], MOCK_PAIRING);
        let items = body["items_used"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["id"], shirt.as_str());
        assert_eq!(items[1]["id"], jeans.as_str());

        let calls = generator.closet_calls();
        assert_eq!(calls.len(), 1);
        let sent: Vec<&str> = calls[0].iter().map(|g| g.id.as_str()).collect();
        assert_eq!(sent, vec![shirt.as_str(), jeans.as_str()]);
    }

    #[tokio::test]
    async fn test_generate_with_no_matching_items() {
        let (state, generator) = test_state();
        add(&state, "Striped Shirt", "Top", "Black/White");

        let (status, body) = send(
            &state,
            Method::POST,
            "/api/outfits/generate",
            Some(json!({"userId": "test1234", "garmentIds": ["z9"]})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["outfit_suggestion"]
            .as_str()
            .unwrap()
            .contains("Please select at least one item"));
        assert_eq!(body["items_used"], json!([]));
        assert!(generator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_generator_failure_is_503() {
        let (state, _) = test_state_with(FakeGenerator::failing());
        let id = add(&state, "Jeans", "Bottom", "Dark Blue");

        let (status, body) = send(
            &state,
            Method::POST,
            "/api/outfits/generate",
            Some(json!({"userId": "u", "garmentIds": [id]})),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["kind"], "service_unavailable");
    }
}
