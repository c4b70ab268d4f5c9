use mongodb::bson::DateTime as BsonDateTime;
use serde::{Deserialize, Serialize};

/// Ledger row linking a user to a movie they saved (collection `saved_movies`).
/// Unique per (user_id, imdb_id).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SavedMovie {
    pub user_id: String,
    pub imdb_id: String,
    pub saved_at: BsonDateTime,
}
