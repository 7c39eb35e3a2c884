//! Token pricing and cost estimation

mod pricing;

pub use pricing::{default_model_pricing, ModelPricing, PricingTable};
