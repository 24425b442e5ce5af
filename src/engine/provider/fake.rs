//! Recording stand-in for the text-generation service, used by tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{ParsedGarment, TextGenerator};
use crate::db::models::Garment;
use crate::error::AppError;

pub const MOCK_IDEA: &str = "Style your navy trousers with a silk blouse for a chic look.";
pub const MOCK_PAIRING: &str = "The selected items create a perfect monochromatic outfit suggestion.";

pub fn mock_parsed() -> ParsedGarment {
    ParsedGarment {
        name: "Trousers".into(),
        category: "Bottom".into(),
        color: "Navy".into(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FakeCall {
    Parse(String),
    Idea(String),
    Closet(Vec<Garment>),
}

pub struct FakeGenerator {
    fail: bool,
    calls: Mutex<Vec<FakeCall>>,
}

impl FakeGenerator {
    pub fn new() -> Self {
        Self {
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call records itself, then fails with `ServiceUnavailable`.
    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<FakeCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn closet_calls(&self) -> Vec<Vec<Garment>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                FakeCall::Closet(items) => Some(items),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: FakeCall) -> Result<(), AppError> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            return Err(AppError::ServiceUnavailable("fake backend down".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn parse_garment_text(&self, text: &str) -> Result<ParsedGarment, AppError> {
        self.record(FakeCall::Parse(text.to_string()))?;
        Ok(mock_parsed())
    }

    async fn generate_outfit_idea(&self, text: &str) -> Result<String, AppError> {
        self.record(FakeCall::Idea(text.to_string()))?;
        Ok(MOCK_IDEA.to_string())
    }

    async fn generate_outfit_from_closet(&self, garments: &[Garment]) -> Result<String, AppError> {
        self.record(FakeCall::Closet(garments.to_vec()))?;
        Ok(MOCK_PAIRING.to_string())
    }
}
