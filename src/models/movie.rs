use serde::{Deserialize, Serialize};

pub const MOVIE_KIND: &str = "movie";

/// Locally cached movie (collection `movies`), keyed by the provider's identifier.
///
/// `rating`, `genres`, `directors` and `synopsis` are only filled in by a
/// fetch-by-id, so a movie with a rating is considered detailed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Movie {
    pub imdb_id: String,
    pub title: String,
    pub kind: String,
    pub year: i32,
    pub cover_url: String,
    pub rating: Option<f64>,
    pub genres: Option<Vec<String>>,
    pub directors: Option<Vec<String>>,
    pub synopsis: Option<String>,
}

impl Movie {
    pub fn is_detailed(&self) -> bool {
        self.rating.is_some()
    }

    /// Case-insensitive title containment.
    pub fn title_contains(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(&needle.to_lowercase())
    }
}
