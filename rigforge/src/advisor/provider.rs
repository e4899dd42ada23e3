//! Build suggestion contract and the provider trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Category, Product, SpecMap};

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("API request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("Failed to parse response: {0}")]
    ParseError(String),
    #[error("Missing API key")]
    MissingApiKey,
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// One catalog entry as sent to the advisor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryEntry {
    pub id: String,
    pub price: u64,
    pub category: Category,
    pub specs: SpecMap,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub simplified_inventory: Vec<InventoryEntry>,
    pub budget: u64,
    pub usage: String,
}

impl SuggestionRequest {
    pub fn from_catalog(products: &[Product], budget: u64, usage: impl Into<String>) -> Self {
        Self {
            simplified_inventory: products
                .iter()
                .map(|p| InventoryEntry {
                    id: p.id.clone(),
                    price: p.price,
                    category: p.category,
                    specs: p.spec_details.clone(),
                })
                .collect(),
            budget,
            usage: usage.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResponse {
    #[serde(default)]
    pub product_ids: Vec<String>,
    #[serde(default)]
    pub explanation: String,
}

/// A service that proposes a full build for a budget and use case.
#[async_trait]
pub trait Advisor: Send + Sync {
    fn name(&self) -> &str;

    async fn suggest(&self, request: &SuggestionRequest) -> Result<SuggestionResponse, AdvisorError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::keys;

    #[test]
    fn test_request_json_shape() {
        let products = vec![Product::new("cpu", "Ryzen", Category::Cpu, 300)
            .with_spec(keys::SOCKET, "AM5")
            .with_description("not sent")];
        let request = SuggestionRequest::from_catalog(&products, 1500, "gaming");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["budget"], 1500);
        assert_eq!(json["usage"], "gaming");
        let entry = &json["simplifiedInventory"][0];
        assert_eq!(entry["id"], "cpu");
        assert_eq!(entry["category"], "CPU");
        assert_eq!(entry["specs"]["socket"], "AM5");
        assert!(entry.get("description").is_none());
    }

    #[test]
    fn test_response_parses_camel_case() {
        let response: SuggestionResponse =
            serde_json::from_str(r#"{"productIds": ["a", "b"], "explanation": "fast"}"#).unwrap();
        assert_eq!(response.product_ids, vec!["a", "b"]);
        assert_eq!(response.explanation, "fast");
    }
}
