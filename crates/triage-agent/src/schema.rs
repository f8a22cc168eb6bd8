//! Structured output shape for triage classification.
//!
//! The literal values of [`Intent`] and [`Sentiment`] are part of the wire
//! contract with the model and with anything consuming the result; they
//! must not change.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;

use triage_core::types::ResponseSchema;

/// Name the schema is registered under in the `response_format` request field.
pub const SCHEMA_NAME: &str = "TriageSchema";

/// Description sent alongside the schema.
pub const SCHEMA_DESCRIPTION: &str =
    "Triage of a user query: primary intent, emotional tone, and whether it contains PII.";

/// Primary intent of a user's request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    BillingInquiry,
    TechnicalIssue,
    RefundRequest,
    GeneralQuestion,
}

impl Intent {
    pub const ALL: [Intent; 4] = [
        Intent::BillingInquiry,
        Intent::TechnicalIssue,
        Intent::RefundRequest,
        Intent::GeneralQuestion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BillingInquiry => "billing_inquiry",
            Self::TechnicalIssue => "technical_issue",
            Self::RefundRequest => "refund_request",
            Self::GeneralQuestion => "general_question",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emotional tone of a user's message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a single user query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageResult {
    pub intent: Intent,
    pub sentiment: Sentiment,
    pub pii_detected: bool,
}

impl TriageResult {
    /// JSON schema sent as the response format for the triage call.
    pub fn response_schema() -> ResponseSchema {
        let intents: Vec<&str> = Intent::ALL.iter().map(Intent::as_str).collect();
        let sentiments: Vec<&str> = Sentiment::ALL.iter().map(Sentiment::as_str).collect();

        ResponseSchema::new(
            SCHEMA_NAME,
            json!({
                "type": "object",
                "properties": {
                    "intent": {
                        "type": "string",
                        "enum": intents,
                        "description": "Categorize the user's request into one of these intents."
                    },
                    "sentiment": {
                        "type": "string",
                        "enum": sentiments,
                        "description": "Determine the emotional tone of the user's message."
                    },
                    "pii_detected": {
                        "type": "boolean",
                        "description": "True if the message contains Person Identifiable Information (names, phones, etc)."
                    }
                },
                "required": ["intent", "sentiment", "pii_detected"],
                "additionalProperties": false
            }),
        )
        .with_description(SCHEMA_DESCRIPTION)
    }
}
