//! What the persistence collaborator receives for each classification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::allocation::AssetWeights;
use crate::engine::ClassificationResult;

/// A classification outcome, flattened for storage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationRecord {
    pub id: Uuid,
    pub session_id: String,
    pub persona_id: String,
    pub goal_id: String,
    pub allocation: AssetWeights,
    /// True when the persona came from the vector-similarity matcher
    pub fallback: bool,
    pub classified_at: DateTime<Utc>,
}

impl ClassificationRecord {
    pub fn new(session_id: impl Into<String>, result: &ClassificationResult) -> Self {
        Self::with_timestamp(session_id, result, Utc::now())
    }

    /// Creates a record with a specific timestamp (for testing).
    pub fn with_timestamp(
        session_id: impl Into<String>,
        result: &ClassificationResult,
        classified_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            session_id: session_id.into(),
            persona_id: result.persona_id.clone(),
            goal_id: result.goal_id.clone(),
            allocation: result.allocation.weights,
            fallback: result.match_source.is_fallback(),
            classified_at,
        }
    }
}
