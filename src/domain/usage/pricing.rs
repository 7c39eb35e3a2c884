//! Model pricing configuration

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

const TOKENS_PER_UNIT: f64 = 1_000_000.0;

/// Price per million tokens for one model, in USD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    /// Price per 1M input tokens
    pub input: f64,
    /// Price per 1M output tokens
    pub output: f64,
}

impl ModelPricing {
    pub fn new(input_per_million: f64, output_per_million: f64) -> Self {
        Self {
            input: input_per_million,
            output: output_per_million,
        }
    }

    /// Calculate cost in USD for given token counts
    pub fn calculate_cost_usd(&self, input_tokens: u32, output_tokens: u32) -> f64 {
        let cost = (input_tokens as f64 / TOKENS_PER_UNIT) * self.input
            + (output_tokens as f64 / TOKENS_PER_UNIT) * self.output;
        cost.max(0.0)
    }
}

/// Read-only lookup from model name to pricing
#[derive(Debug, Clone, Default)]
pub struct PricingTable {
    entries: HashMap<String, ModelPricing>,
}

impl PricingTable {
    pub fn new(entries: HashMap<String, ModelPricing>) -> Self {
        Self { entries }
    }

    pub fn get(&self, model: &str) -> Option<&ModelPricing> {
        self.entries.get(model)
    }

    /// Estimated cost; 0.0 when the model has no pricing entry
    pub fn estimate_cost(&self, model: &str, input_tokens: u32, output_tokens: u32) -> f64 {
        self.get(model)
            .map(|p| p.calculate_cost_usd(input_tokens, output_tokens))
            .unwrap_or(0.0)
    }
}

/// Default pricing for common models
pub fn default_model_pricing() -> HashMap<String, ModelPricing> {
    let mut pricing = HashMap::new();

    // OpenAI
    pricing.insert("gpt-4o".to_string(), ModelPricing::new(2.50, 10.00));
    pricing.insert("gpt-4o-mini".to_string(), ModelPricing::new(0.15, 0.60));
    pricing.insert("gpt-4-turbo".to_string(), ModelPricing::new(10.00, 30.00));
    pricing.insert("gpt-3.5-turbo".to_string(), ModelPricing::new(0.50, 1.50));

    // Anthropic
    pricing.insert(
        "claude-sonnet-4-20250514".to_string(),
        ModelPricing::new(3.00, 15.00),
    );
    pricing.insert(
        "claude-3-5-sonnet-20241022".to_string(),
        ModelPricing::new(3.00, 15.00),
    );
    pricing.insert(
        "claude-3-5-haiku-20241022".to_string(),
        ModelPricing::new(0.80, 4.00),
    );
    pricing.insert(
        "claude-3-opus-20240229".to_string(),
        ModelPricing::new(15.00, 75.00),
    );

    // Google
    pricing.insert("gemini-1.5-pro".to_string(), ModelPricing::new(1.25, 5.00));
    pricing.insert("gemini-1.5-flash".to_string(), ModelPricing::new(0.075, 0.30));

    pricing
}
