//! Product Model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Product entity
///
/// Only `sku` matters to the store; everything else the backend sends
/// (pricing, attributes, images) is carried along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub sku: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Product {
    pub fn new(sku: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            name: None,
            payload: Map::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_is_preserved() {
        let json = serde_json::json!({
            "sku": "P1",
            "name": "Camera",
            "salePrice": { "value": 199.0, "currency": "USD" }
        });
        let product: Product = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(product.sku, "P1");
        assert_eq!(product.payload["salePrice"]["currency"], "USD");
        assert_eq!(serde_json::to_value(&product).unwrap(), json);
    }
}
