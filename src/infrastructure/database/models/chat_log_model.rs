use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;

use crate::domain::entities::ChatLogEntry;
use crate::domain::value_objects::ModelName;
use crate::infrastructure::database::schema::application_logs;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Identifiable)]
#[diesel(table_name = application_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChatLogModel {
    pub id: i32,
    pub session_id: String,
    pub question: String,
    pub answer: String,
    pub model: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = application_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewChatLogModel<'a> {
    pub session_id: &'a str,
    pub question: &'a str,
    pub answer: &'a str,
    pub model: &'static str,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a ChatLogEntry> for NewChatLogModel<'a> {
    fn from(entry: &'a ChatLogEntry) -> Self {
        Self {
            session_id: entry.session_id(),
            question: entry.question(),
            answer: entry.answer(),
            model: entry.model().as_str(),
            created_at: entry.created_at(),
        }
    }
}

impl TryFrom<ChatLogModel> for ChatLogEntry {
    type Error = String;

    fn try_from(model: ChatLogModel) -> Result<Self, Self::Error> {
        let model_name: ModelName = model.model.parse()?;

        Ok(ChatLogEntry::restore(
            model.session_id,
            model.question,
            model.answer,
            model_name,
            model.created_at,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(model: &str) -> ChatLogModel {
        ChatLogModel {
            id: 1,
            session_id: "s".to_string(),
            question: "q".to_string(),
            answer: "a".to_string(),
            model: model.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_to_entry() {
        let entry = ChatLogEntry::try_from(row("gemini-2.0-flash")).unwrap();

        assert_eq!(entry.model(), ModelName::Gemini20Flash);
        assert_eq!(entry.question(), "q");
    }

    #[test]
    fn test_unknown_model_in_row_is_rejected() {
        assert!(ChatLogEntry::try_from(row("gpt-4")).is_err());
    }

    #[test]
    fn test_entry_to_insertable() {
        let entry = ChatLogEntry::new(
            "s1".to_string(),
            "hi".to_string(),
            "hello".to_string(),
            ModelName::Gemini25Pro,
        );

        let insertable = NewChatLogModel::from(&entry);

        assert_eq!(insertable.model, "gemini-2.5-pro");
        assert_eq!(insertable.session_id, "s1");
    }
}
