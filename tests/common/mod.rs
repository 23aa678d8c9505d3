//! Common test utilities and helpers for tokdash tests

use chrono::{DateTime, TimeZone, Utc};
use tokdash::types::{ClaudeModel, RecordId, SourceId, TokenCounts, UsageRecord};

/// Common test sources used across tests
#[allow(dead_code)]
pub const TEST_SOURCES: &[&str] = &["mayo-form-web", "claude-code", "personal"];

/// Builder for creating test UsageRecord instances
pub struct UsageRecordBuilder {
    source_id: String,
    model: ClaudeModel,
    created_at: DateTime<Utc>,
    input_tokens: u64,
    output_tokens: u64,
    cost_usd: f64,
    request_type: Option<String>,
}

impl UsageRecordBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            source_id: "claude-code".to_string(),
            model: ClaudeModel::Sonnet,
            created_at: Utc.with_ymd_and_hms(2026, 2, 14, 12, 0, 0).unwrap(),
            input_tokens: 1000,
            output_tokens: 500,
            cost_usd: 0.0105,
            request_type: None,
        }
    }

    #[allow(dead_code)]
    pub fn with_source(mut self, source: &str) -> Self {
        self.source_id = source.to_string();
        self
    }

    #[allow(dead_code)]
    pub fn with_model(mut self, model: ClaudeModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_created_at(mut self, ts: DateTime<Utc>) -> Self {
        self.created_at = ts;
        self
    }

    #[allow(dead_code)]
    pub fn with_tokens(mut self, input: u64, output: u64) -> Self {
        self.input_tokens = input;
        self.output_tokens = output;
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost_usd = cost;
        self
    }

    #[allow(dead_code)]
    pub fn with_request_type(mut self, request_type: &str) -> Self {
        self.request_type = Some(request_type.to_string());
        self
    }

    pub fn build(self) -> UsageRecord {
        UsageRecord {
            id: RecordId::generate(),
            created_at: self.created_at,
            source_id: SourceId::new(self.source_id),
            model: self.model,
            tokens: TokenCounts::new(self.input_tokens, self.output_tokens),
            cost_usd: self.cost_usd,
            request_type: self.request_type,
            metadata: None,
        }
    }
}

impl Default for UsageRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}
