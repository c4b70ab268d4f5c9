use mongodb::bson::DateTime as BsonDateTime;
use serde::{Deserialize, Serialize};

/// Registered account (collection `users`).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub user_id: String,  // PRIMARY IDENTIFIER - hex ObjectId, carried in tokens
    pub name: String,
    pub email: String,
    /// bcrypt hash
    pub password: String,
    pub recovery_question: String,
    /// Compared in plaintext during password recovery.
    pub recovery_answer: String,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

/// Fields a user may change on their own profile.
#[derive(Debug, Default, Clone)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub recovery_question: Option<String>,
    pub recovery_answer: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.recovery_question.is_none() && self.recovery_answer.is_none()
    }
}
