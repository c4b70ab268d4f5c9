use crate::models::Movie;
use crate::services::movie_service;
use crate::state::AppState;
use crate::utils::AppError;

/// Resolve the movie (cached data is enough) and add it to the user's list.
/// Saving the same movie twice keeps a single ledger row.
///
/// Tokens outlive account deletion, so the owner is looked up first.
pub async fn save(state: &AppState, user_id: &str, imdb_id: &str) -> Result<Movie, AppError> {
    if state.store.find_user_by_id(user_id).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let movie = movie_service::resolve(state.store.as_ref(), state.provider.as_ref(), imdb_id, false).await?;

    if state.store.save_movie(user_id, &movie.imdb_id).await? {
        log::info!("⭐ User {} saved {}", user_id, movie.imdb_id);
    } else {
        log::debug!("User {} already saved {}", user_id, movie.imdb_id);
    }

    Ok(movie)
}

pub async fn list_saved(state: &AppState, user_id: &str, title: Option<&str>) -> Result<Vec<Movie>, AppError> {
    state.store.saved_movies(user_id, title).await
}

pub async fn unsave(state: &AppState, user_id: &str, imdb_id: &str) -> Result<(), AppError> {
    if !state.store.remove_saved_movie(user_id, imdb_id).await? {
        return Err(AppError::NotFound("Movie not saved".to_string()));
    }
    log::info!("User {} removed {} from saved movies", user_id, imdb_id);
    Ok(())
}
