//! Core domain types for tokdash
//!
//! Strong typing for the concepts the dashboard row schema carries: record
//! and source identifiers, the closed model set, token counts, immutable
//! usage records, and the derived usage statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

use crate::error::{Result, TokdashError};

/// Strongly-typed usage record identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    /// Create a new RecordId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a random RecordId
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly-typed source identifier
///
/// A source is a named origin of usage events, e.g. a client application or
/// project feeding the same API key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceId(String);

impl SourceId {
    /// Create a new SourceId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The closed set of models usage records may carry
///
/// Drives per-unit pricing; see [`crate::pricing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClaudeModel {
    #[serde(rename = "claude-opus-4-6")]
    Opus,
    #[serde(rename = "claude-sonnet-4-5")]
    Sonnet,
    #[serde(rename = "claude-haiku-4-5")]
    Haiku,
}

impl ClaudeModel {
    /// All known models
    pub const ALL: [ClaudeModel; 3] = [Self::Opus, Self::Sonnet, Self::Haiku];

    /// Get the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Opus => "claude-opus-4-6",
            Self::Sonnet => "claude-sonnet-4-5",
            Self::Haiku => "claude-haiku-4-5",
        }
    }
}

impl fmt::Display for ClaudeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ClaudeModel {
    type Err = TokdashError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "claude-opus-4-6" => Ok(Self::Opus),
            "claude-sonnet-4-5" => Ok(Self::Sonnet),
            "claude-haiku-4-5" => Ok(Self::Haiku),
            _ => Err(TokdashError::UnknownModel(s.to_string())),
        }
    }
}

/// Token counts for a usage record
///
/// # Examples
/// ```
/// use tokdash::types::TokenCounts;
///
/// let tokens = TokenCounts::new(1200, 800);
/// assert_eq!(tokens.total(), 2000);
///
/// let combined = tokens + TokenCounts::new(300, 100);
/// assert_eq!(combined.input_tokens, 1500);
/// ```
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenCounts {
    /// Input (prompt) tokens
    pub input_tokens: u64,
    /// Output (completion) tokens
    pub output_tokens: u64,
}

impl TokenCounts {
    /// Create new TokenCounts
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Total tokens (input + output)
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

impl Add for TokenCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            input_tokens: self.input_tokens + other.input_tokens,
            output_tokens: self.output_tokens + other.output_tokens,
        }
    }
}

impl AddAssign for TokenCounts {
    fn add_assign(&mut self, other: Self) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

/// An immutable usage event
///
/// Created by an external ingestion path and never mutated. The upstream
/// row also carries a redundant `total_tokens` column; it is ignored on
/// input and always derived as `tokens.total()` here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Unique identifier
    pub id: RecordId,
    /// Creation instant (UTC)
    pub created_at: DateTime<Utc>,
    /// Originating source
    pub source_id: SourceId,
    /// Model that served the request
    pub model: ClaudeModel,
    /// Token counts
    #[serde(flatten)]
    pub tokens: TokenCounts,
    /// Cost in USD, currency-scale precision (1e-6)
    pub cost_usd: f64,
    /// Request type tag, e.g. "chat" or "completion" (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_type: Option<String>,
    /// Opaque metadata attached by the ingestion path (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl UsageRecord {
    /// Create a new record with a generated id and no optional fields
    pub fn new(
        source_id: SourceId,
        model: ClaudeModel,
        created_at: DateTime<Utc>,
        tokens: TokenCounts,
        cost_usd: f64,
    ) -> Self {
        Self {
            id: RecordId::generate(),
            created_at,
            source_id,
            model,
            tokens,
            cost_usd,
            request_type: None,
            metadata: None,
        }
    }

    /// Total tokens for this record
    pub fn total_tokens(&self) -> u64 {
        self.tokens.total()
    }
}

/// Parse a JSON array of usage rows as handed over by the backend
pub fn parse_records(payload: &str) -> Result<Vec<UsageRecord>> {
    Ok(serde_json::from_str(payload)?)
}

/// Derived, ephemeral aggregate over a set of usage records
///
/// Recomputed on every query; never persisted. `Default` is the all-zero
/// aggregate, which is also the result for an empty record set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    /// Total tokens (input + output)
    pub total_tokens: u64,
    /// Total cost in USD
    pub total_cost: f64,
    /// Total input tokens
    pub input_tokens: u64,
    /// Total output tokens
    pub output_tokens: u64,
    /// Number of records aggregated
    pub request_count: u64,
}

impl UsageStats {
    /// Fold one record into the aggregate
    pub fn add_record(&mut self, record: &UsageRecord) {
        self.total_tokens += record.tokens.total();
        self.total_cost += record.cost_usd;
        self.input_tokens += record.tokens.input_tokens;
        self.output_tokens += record.tokens.output_tokens;
        self.request_count += 1;
    }
}

impl AddAssign for UsageStats {
    fn add_assign(&mut self, other: Self) {
        self.total_tokens += other.total_tokens;
        self.total_cost += other.total_cost;
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
        self.request_count += other.request_count;
    }
}
