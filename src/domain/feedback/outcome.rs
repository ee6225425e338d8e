//! Outcome feedback submitted after a decision was lived with.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{DecisionId, FeedbackId, Timestamp, UserId, ValidationError};

/// Maximum length of the optional free-text note.
pub const MAX_NOTE_CHARS: usize = 2000;

/// How the user felt about a decision afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackOutcome {
    /// Satisfied with the choice.
    NoRegret,
    /// Mixed feelings; some aspects regretted.
    PartialRegret,
    /// Would choose differently.
    Regret,
}

impl FeedbackOutcome {
    /// Regret signal in [0, 1] used for the weighted regret rate.
    pub fn regret_signal(&self) -> f64 {
        match self {
            Self::NoRegret => 0.0,
            Self::PartialRegret => 0.3,
            Self::Regret => 1.0,
        }
    }
}

impl fmt::Display for FeedbackOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRegret => write!(f, "no_regret"),
            Self::PartialRegret => write!(f, "partial_regret"),
            Self::Regret => write!(f, "regret"),
        }
    }
}

/// One submitted feedback entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: FeedbackId,
    pub user_id: UserId,
    pub decision_id: DecisionId,
    pub outcome: FeedbackOutcome,
    pub note: Option<String>,
    pub recorded_at: Timestamp,
}

impl FeedbackRecord {
    pub fn new(
        user_id: UserId,
        decision_id: DecisionId,
        outcome: FeedbackOutcome,
        note: Option<String>,
    ) -> Result<Self, ValidationError> {
        let note = note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        if let Some(ref text) = note {
            let len = text.chars().count();
            if len > MAX_NOTE_CHARS {
                return Err(ValidationError::out_of_range(
                    "note",
                    0.0,
                    MAX_NOTE_CHARS as f64,
                    len as f64,
                ));
            }
        }

        Ok(Self {
            id: FeedbackId::new(),
            user_id,
            decision_id,
            outcome,
            note,
            recorded_at: Timestamp::now(),
        })
    }
}
