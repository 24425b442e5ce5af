use std::collections::HashSet;

use crate::db::models::Garment;
use crate::db::repos::garments as garment_repo;
use crate::db::DbPool;
use crate::error::AppError;

use super::provider::{ParsedGarment, TextGenerator};

/// Returned instead of a generated suggestion when no requested id matches.
pub const EMPTY_SELECTION_MESSAGE: &str = "Please select at least one item to generate an outfit.";

#[derive(Debug, Clone, PartialEq)]
pub struct OutfitSuggestion {
    pub user_id: String,
    pub outfit_suggestion: String,
    pub items_used: Vec<Garment>,
}

/// Garments whose id appears in `requested_ids`, in closet order.
///
/// Duplicate ids select a garment once; unknown ids are dropped silently.
pub fn select_garments(closet: Vec<Garment>, requested_ids: &[String]) -> Vec<Garment> {
    let wanted: HashSet<&str> = requested_ids.iter().map(String::as_str).collect();
    closet
        .into_iter()
        .filter(|g| wanted.contains(g.id.as_str()))
        .collect()
}

/// Build an outfit from the requested closet items.
///
/// The generator is not called when nothing matches.
pub async fn generate_outfit(
    pool: &DbPool,
    generator: &dyn TextGenerator,
    user_id: &str,
    requested_ids: &[String],
) -> Result<OutfitSuggestion, AppError> {
    let closet = garment_repo::get_all(pool)?;
    let found = select_garments(closet, requested_ids);

    if found.is_empty() {
        tracing::debug!(
            user_id = %user_id,
            requested = requested_ids.len(),
            "No requested garments in closet; skipping generation"
        );
        return Ok(OutfitSuggestion {
            user_id: user_id.to_string(),
            outfit_suggestion: EMPTY_SELECTION_MESSAGE.to_string(),
            items_used: Vec::new(),
        });
    }

    tracing::info!(
        user_id = %user_id,
        items = found.len(),
        backend = generator.name(),
        "Generating outfit from closet"
    );
    let suggestion = generator.generate_outfit_from_closet(&found).await?;

    Ok(OutfitSuggestion {
        user_id: user_id.to_string(),
        outfit_suggestion: suggestion,
        items_used: found,
    })
}

pub async fn analyze(generator: &dyn TextGenerator, text: &str) -> Result<ParsedGarment, AppError> {
    generator.parse_garment_text(text).await
}

pub async fn find_ideas(generator: &dyn TextGenerator, text: &str) -> Result<String, AppError> {
    generator.generate_outfit_idea(text).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_test_db;
    use crate::db::models::CreateGarmentInput;
    use crate::engine::provider::fake::{FakeGenerator, MOCK_PAIRING};
    use proptest::prelude::*;

    fn garment(id: &str) -> Garment {
        Garment {
            id: id.into(),
            name: format!("item {id}"),
            category: "Top".into(),
            color: "Black".into(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn seed(pool: &DbPool) -> (Garment, Garment, Garment) {
        let add = |name: &str, category: &str, color: &str| {
            garment_repo::create(
                pool,
                CreateGarmentInput {
                    name: name.into(),
                    category: category.into(),
                    color: color.into(),
                },
            )
            .unwrap()
        };
        (
            add("Striped Shirt", "Top", "Black/White"),
            add("Jeans", "Bottom", "Dark Blue"),
            add("Loafers", "Shoes", "Brown"),
        )
    }

    #[test]
    fn test_select_keeps_closet_order_and_dedups() {
        let closet = vec![garment("a1"), garment("b2"), garment("c3")];
        let found = select_garments(closet, &ids(&["c3", "a1", "c3", "zz"]));
        let found_ids: Vec<&str> = found.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(found_ids, vec!["a1", "c3"]);
    }

    #[tokio::test]
    async fn test_disjoint_ids_short_circuit_without_calling_generator() {
        let pool = init_test_db().unwrap();
        seed(&pool);
        let generator = FakeGenerator::new();

        let result = generate_outfit(&pool, &generator, "test1234", &ids(&["z9"]))
            .await
            .unwrap();

        assert_eq!(result.user_id, "test1234");
        assert!(result
            .outfit_suggestion
            .contains("Please select at least one item"));
        assert!(result.items_used.is_empty());
        assert!(generator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_request_short_circuits() {
        let pool = init_test_db().unwrap();
        seed(&pool);
        let generator = FakeGenerator::new();

        let result = generate_outfit(&pool, &generator, "u", &[]).await.unwrap();
        assert_eq!(result.outfit_suggestion, EMPTY_SELECTION_MESSAGE);
        assert!(generator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_matching_ids_call_generator_once_with_filtered_items() {
        let pool = init_test_db().unwrap();
        let (shirt, jeans, _loafers) = seed(&pool);
        let generator = FakeGenerator::new();

        // Request order reversed and duplicated; result follows closet order.
        let requested = vec![jeans.id.clone(), shirt.id.clone(), jeans.id.clone(), "nope".into()];
        let result = generate_outfit(&pool, &generator, "test1234", &requested)
            .await
            .unwrap();

        assert_eq!(result.outfit_suggestion, MOCK_PAIRING);
        assert_eq!(result.items_used, vec![shirt.clone(), jeans.clone()]);
        assert_eq!(generator.closet_calls(), vec![vec![shirt, jeans]]);
    }

    #[tokio::test]
    async fn test_generator_failure_propagates() {
        let pool = init_test_db().unwrap();
        let (shirt, _, _) = seed(&pool);
        let generator = FakeGenerator::failing();

        let err = generate_outfit(&pool, &generator, "u", &[shirt.id])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_analyze_and_find_ideas_delegate() {
        let generator = FakeGenerator::new();
        let parsed = analyze(&generator, "I have a navy blue pant").await.unwrap();
        assert_eq!(parsed.color, "Navy");
        let idea = find_ideas(&generator, "red floral skirt").await.unwrap();
        assert!(idea.contains("silk blouse"));
        assert_eq!(generator.calls().len(), 2);
    }

    proptest! {
        #[test]
        fn prop_selection_is_ordered_unique_subset(
            closet_size in 0usize..12,
            requested in proptest::collection::vec(0usize..16, 0..20),
        ) {
            let closet: Vec<Garment> = (0..closet_size).map(|i| garment(&format!("g{i}"))).collect();
            let requested: Vec<String> = requested.iter().map(|i| format!("g{i}")).collect();

            let found = select_garments(closet.clone(), &requested);

            // Every selected garment was requested and exists in the closet.
            for g in &found {
                prop_assert!(requested.contains(&g.id));
                prop_assert!(closet.contains(g));
            }
            // Nothing requested and present is missed.
            let expected = closet.iter().filter(|g| requested.contains(&g.id)).count();
            prop_assert_eq!(found.len(), expected);
            // Closet order, no duplicates.
            let positions: Vec<usize> = found
                .iter()
                .map(|g| closet.iter().position(|c| c.id == g.id).unwrap())
                .collect();
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
