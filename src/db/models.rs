use serde::{Deserialize, Serialize};

// ============================================================================
// Garments
// ============================================================================

/// A stored closet item. `id` is assigned by the store on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Garment {
    pub id: String,
    pub name: String,
    pub category: String,
    pub color: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGarmentInput {
    pub name: String,
    pub category: String,
    pub color: String,
}

/// Partial update. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateGarmentInput {
    pub name: Option<String>,
    pub category: Option<String>,
    pub color: Option<String>,
}

impl UpdateGarmentInput {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.category.is_none() && self.color.is_none()
    }
}
