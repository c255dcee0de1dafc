use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ModelName;

/// One answered chat turn. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatLogEntry {
    session_id: String,
    question: String,
    answer: String,
    model: ModelName,
    created_at: DateTime<Utc>,
}

impl ChatLogEntry {
    pub fn new(session_id: String, question: String, answer: String, model: ModelName) -> Self {
        Self {
            session_id,
            question,
            answer,
            model,
            created_at: Utc::now(),
        }
    }

    pub fn restore(
        session_id: String,
        question: String,
        answer: String,
        model: ModelName,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id,
            question,
            answer,
            model,
            created_at,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn model(&self) -> ModelName {
        self.model
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
