//! Per-model pricing and cost calculation
//!
//! The model set is a closed enum, so rates live in a static table rather
//! than behind a fetcher. Costs are kept at currency-scale precision (1e-6
//! USD), matching the `cost_usd` column on stored records.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{ClaudeModel, TokenCounts};

/// Per-token USD rates for a model
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModelPricing {
    /// Cost per input token
    pub input_cost_per_token: f64,
    /// Cost per output token
    pub output_cost_per_token: f64,
}

/// Published per-token rates (USD per million: opus 15/75, sonnet 3/15,
/// haiku 0.80/4.00)
pub fn pricing_for(model: ClaudeModel) -> ModelPricing {
    match model {
        ClaudeModel::Opus => ModelPricing {
            input_cost_per_token: 15.0 / 1_000_000.0,
            output_cost_per_token: 75.0 / 1_000_000.0,
        },
        ClaudeModel::Sonnet => ModelPricing {
            input_cost_per_token: 3.0 / 1_000_000.0,
            output_cost_per_token: 15.0 / 1_000_000.0,
        },
        ClaudeModel::Haiku => ModelPricing {
            input_cost_per_token: 0.80 / 1_000_000.0,
            output_cost_per_token: 4.0 / 1_000_000.0,
        },
    }
}

/// Calculate the USD cost of a request, rounded to 1e-6
pub fn calculate_cost(model: ClaudeModel, tokens: &TokenCounts) -> f64 {
    let pricing = pricing_for(model);
    let cost = tokens.input_tokens as f64 * pricing.input_cost_per_token
        + tokens.output_tokens as f64 * pricing.output_cost_per_token;
    let cost = round_to_micro(cost);

    debug!(
        "Calculated cost: ${:.6} for {} tokens on {}",
        cost,
        tokens.total(),
        model
    );

    cost
}

fn round_to_micro(cost: f64) -> f64 {
    (cost * 1_000_000.0).round() / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opus_cost() {
        let tokens = TokenCounts::new(1000, 500);
        let cost = calculate_cost(ClaudeModel::Opus, &tokens);

        // 1000 * 15e-6 + 500 * 75e-6 = 0.015 + 0.0375 = 0.0525
        assert!((cost - 0.0525).abs() < 1e-9);
    }

    #[test]
    fn test_haiku_cheaper_than_sonnet() {
        let tokens = TokenCounts::new(10_000, 10_000);
        assert!(
            calculate_cost(ClaudeModel::Haiku, &tokens)
                < calculate_cost(ClaudeModel::Sonnet, &tokens)
        );
    }

    #[test]
    fn test_zero_tokens_zero_cost() {
        let cost = calculate_cost(ClaudeModel::Sonnet, &TokenCounts::default());
        assert_eq!(cost, 0.0);
    }

    #[test]
    fn test_rounded_to_micro() {
        // A single haiku input token is 0.0000008, which rounds to 0.000001
        let cost = calculate_cost(ClaudeModel::Haiku, &TokenCounts::new(1, 0));
        assert_eq!(cost, 0.000001);
    }
}
