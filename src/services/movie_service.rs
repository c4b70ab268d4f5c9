//! Movie resolution against the local cache and the external provider.
//!
//! A cached movie is trusted for plain lookups. When detail is required it is
//! trusted only once it has a rating, since only a fetch-by-id fills that in.
//! Otherwise the provider record is normalized and upserted by `imdb_id`.

use crate::database::Store;
use crate::models::{Movie, MOVIE_KIND};
use crate::provider::{MovieProvider, ProviderRecord};
use crate::utils::AppError;

/// Map a provider record onto a [`Movie`].
///
/// Non-movie kinds are rejected with `UnsupportedMediaKind`. A record without
/// a title or year is malformed.
pub fn normalize(record: ProviderRecord) -> Result<Movie, AppError> {
    let kind = record.kind.unwrap_or_default();
    if kind != MOVIE_KIND {
        return Err(AppError::UnsupportedMediaKind);
    }

    let malformed = |field: &str| {
        AppError::OperationFailed(format!("Provider record {} has no {}", record.id, field))
    };
    let title = record.title.ok_or_else(|| malformed("title"))?;
    let year = record.year.ok_or_else(|| malformed("year"))?;

    Ok(Movie {
        imdb_id: record.id,
        title,
        kind,
        year,
        cover_url: record.cover_url.unwrap_or_default(),
        rating: record.rating,
        genres: record.genres,
        directors: record
            .directors
            .map(|people| people.into_iter().map(|p| p.name).collect()),
        synopsis: record.synopsis.and_then(|s| s.into_iter().next()),
    })
}

/// Return the movie for `imdb_id`, fetching it from the provider when it is
/// missing locally or, with `require_detailed`, not yet detailed.
pub async fn resolve(
    store: &dyn Store,
    provider: &dyn MovieProvider,
    imdb_id: &str,
    require_detailed: bool,
) -> Result<Movie, AppError> {
    if let Some(movie) = store.find_movie(imdb_id).await? {
        if !require_detailed || movie.is_detailed() {
            log::debug!("Cache hit for {}", imdb_id);
            return Ok(movie);
        }
        log::info!("🔄 {} cached without details, refetching", imdb_id);
    }

    let record = provider
        .fetch_by_id(imdb_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

    let mut movie = normalize(record)?;
    // Keep the key the caller asked for
    movie.imdb_id = imdb_id.to_string();

    store.upsert_movie(&movie).await?;
    log::info!("✅ Cached movie {} ({})", movie.title, movie.imdb_id);

    Ok(movie)
}

/// Title search: local matches first, provider search otherwise.
///
/// Provider results are inserted as non-detailed rows when missing; existing
/// rows are never touched. A blank title returns nothing.
pub async fn search(
    store: &dyn Store,
    provider: &dyn MovieProvider,
    title: &str,
) -> Result<Vec<Movie>, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Ok(vec![]);
    }

    let local = store.search_movies(title).await?;
    if !local.is_empty() {
        log::debug!("{} local matches for '{}'", local.len(), title);
        return Ok(local);
    }

    let records = provider.search(title).await?;

    let mut movies = Vec::with_capacity(records.len());
    for record in records {
        let id = record.id.clone();
        match normalize(record) {
            Ok(movie) => movies.push(movie),
            Err(AppError::UnsupportedMediaKind) => {}
            Err(e) => log::warn!("⚠️ Skipping search result {}: {}", id, e),
        }
    }

    for movie in &movies {
        store.insert_movie_if_absent(movie).await?;
    }

    Ok(movies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::provider::stub::{detailed_record, search_record, StubProvider};
    use crate::provider::Person;

    fn cached(imdb_id: &str, title: &str, rating: Option<f64>) -> Movie {
        Movie {
            imdb_id: imdb_id.into(),
            title: title.into(),
            kind: MOVIE_KIND.into(),
            year: 1999,
            cover_url: String::new(),
            rating,
            genres: None,
            directors: None,
            synopsis: None,
        }
    }

    #[test]
    fn test_normalize_detailed_record() {
        let movie = normalize(detailed_record("tt0133093", "The Matrix", "movie")).unwrap();

        assert_eq!(movie.imdb_id, "tt0133093");
        assert_eq!(movie.cover_url, "https://img.test/tt0133093.jpg");
        assert_eq!(movie.rating, Some(8.7));
        assert_eq!(movie.synopsis.as_deref(), Some("A hacker learns the truth about reality."));
        assert_eq!(
            movie.directors,
            Some(vec!["Lana Wachowski".to_string(), "Lilly Wachowski".to_string()])
        );
        assert_eq!(movie.genres, Some(vec!["Action".to_string(), "Sci-Fi".to_string()]));
    }

    #[test]
    fn test_normalize_rejects_other_kinds() {
        let result = normalize(detailed_record("tt0903747", "Breaking Bad", "series"));
        assert!(matches!(result, Err(AppError::UnsupportedMediaKind)));

        let mut no_kind = detailed_record("tt1", "Unknown", "movie");
        no_kind.kind = None;
        assert!(matches!(normalize(no_kind), Err(AppError::UnsupportedMediaKind)));
    }

    #[test]
    fn test_normalize_malformed() {
        let mut record = detailed_record("tt1", "No Year", "movie");
        record.year = None;
        assert!(matches!(normalize(record), Err(AppError::OperationFailed(_))));
    }

    #[test]
    fn test_normalize_minimal_record() {
        let mut record = search_record("tt2", "Minimal", "movie");
        record.directors = Some(vec![]);
        let movie = normalize(record).unwrap();

        assert_eq!(movie.cover_url, "");
        assert!(!movie.is_detailed());
        assert_eq!(movie.directors, Some(vec![]));
        assert_eq!(movie.synopsis, None);
    }

    #[tokio::test]
    async fn test_resolve_inserts_detailed_movie() {
        let store = MemoryStore::default();
        let provider = StubProvider::default().with_record(detailed_record("tt0133093", "The Matrix", "movie"));

        let movie = resolve(&store, &provider, "tt0133093", true).await.unwrap();

        assert_eq!(store.movie_count(), 1);
        assert_eq!(provider.fetch_calls(), 1);
        assert_eq!(movie.synopsis.as_deref(), Some("A hacker learns the truth about reality."));
        assert_eq!(store.find_movie("tt0133093").await.unwrap(), Some(movie));
    }

    #[tokio::test]
    async fn test_resolve_detailed_cache_hit_skips_provider() {
        let store = MemoryStore::with_movies(vec![cached("tt0133093", "The Matrix", Some(8.7))]);
        let provider = StubProvider::failing();

        let movie = resolve(&store, &provider, "tt0133093", true).await.unwrap();

        assert_eq!(movie.rating, Some(8.7));
        assert_eq!(provider.fetch_calls(), 0);
    }

    #[tokio::test]
    async fn test_resolve_non_detailed_is_idempotent() {
        let store = MemoryStore::with_movies(vec![cached("tt0133093", "The Matrix", None)]);
        let provider = StubProvider::default().with_record(detailed_record("tt0133093", "The Matrix", "movie"));

        let first = resolve(&store, &provider, "tt0133093", false).await.unwrap();
        let second = resolve(&store, &provider, "tt0133093", false).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.rating, None);
        assert_eq!(provider.fetch_calls(), 0);
    }

    #[tokio::test]
    async fn test_resolve_upgrades_incomplete_row_in_place() {
        let store = MemoryStore::with_movies(vec![cached("tt0133093", "The Matrix", None)]);
        let provider = StubProvider::default().with_record(detailed_record("tt0133093", "The Matrix", "movie"));

        let movie = resolve(&store, &provider, "tt0133093", true).await.unwrap();

        assert!(movie.is_detailed());
        assert_eq!(store.movie_count(), 1);
        assert_eq!(provider.fetch_calls(), 1);
        assert!(store.find_movie("tt0133093").await.unwrap().unwrap().is_detailed());
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let store = MemoryStore::default();
        let provider = StubProvider::default();

        let result = resolve(&store, &provider, "tt0000000", false).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(store.movie_count(), 0);
    }

    #[tokio::test]
    async fn test_resolve_rejects_series_without_persisting() {
        let store = MemoryStore::default();
        let provider = StubProvider::default().with_record(detailed_record("tt0903747", "Breaking Bad", "series"));

        for require_detailed in [false, true] {
            let result = resolve(&store, &provider, "tt0903747", require_detailed).await;
            assert!(matches!(result, Err(AppError::UnsupportedMediaKind)));
        }
        assert_eq!(store.movie_count(), 0);
    }

    #[tokio::test]
    async fn test_resolve_provider_failure_is_generic() {
        let store = MemoryStore::default();
        let provider = StubProvider::failing();

        let result = resolve(&store, &provider, "tt0133093", true).await;

        assert!(matches!(result, Err(AppError::OperationFailed(_))));
    }

    #[tokio::test]
    async fn test_search_blank_title_never_calls_provider() {
        let store = MemoryStore::default();
        let provider = StubProvider::default().with_search_results(vec![search_record("tt1", "Anything", "movie")]);

        assert!(search(&store, &provider, "").await.unwrap().is_empty());
        assert!(search(&store, &provider, "   ").await.unwrap().is_empty());
        assert_eq!(provider.search_calls(), 0);
        assert_eq!(store.movie_count(), 0);
    }

    #[tokio::test]
    async fn test_search_prefers_local_matches() {
        let store = MemoryStore::with_movies(vec![
            cached("tt0133093", "The Matrix", None),
            cached("tt0234215", "The Matrix Reloaded", Some(7.2)),
            cached("tt0111161", "The Shawshank Redemption", Some(9.3)),
        ]);
        let provider = StubProvider::failing();

        let movies = search(&store, &provider, "matrix").await.unwrap();

        assert_eq!(movies.len(), 2);
        assert_eq!(provider.search_calls(), 0);
    }

    #[tokio::test]
    async fn test_search_persists_only_new_movies() {
        let store = MemoryStore::with_movies(vec![cached("tt0133093", "Matrix (cached title)", Some(8.7))]);
        let mut malformed = search_record("tt3", "No Year", "movie");
        malformed.year = None;
        let provider = StubProvider::default().with_search_results(vec![
            search_record("tt0133093", "The Matrix", "movie"),
            search_record("tt0234215", "The Matrix Reloaded", "movie"),
            search_record("tt7777777", "The Matrix Series", "series"),
            malformed,
        ]);

        let movies = search(&store, &provider, "the matrix").await.unwrap();

        let ids: Vec<&str> = movies.iter().map(|m| m.imdb_id.as_str()).collect();
        assert_eq!(ids, vec!["tt0133093", "tt0234215"]);
        assert_eq!(provider.search_calls(), 1);
        assert_eq!(store.movie_count(), 2);

        // The existing row keeps its details
        let existing = store.find_movie("tt0133093").await.unwrap().unwrap();
        assert_eq!(existing.title, "Matrix (cached title)");
        assert_eq!(existing.rating, Some(8.7));
        assert!(store.find_movie("tt7777777").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_provider_failure_is_generic() {
        let store = MemoryStore::default();
        let provider = StubProvider::failing();

        let result = search(&store, &provider, "matrix").await;

        assert!(matches!(result, Err(AppError::OperationFailed(_))));
    }

    #[test]
    fn test_directors_flattened() {
        let mut record = search_record("tt4", "Heat", "movie");
        record.directors = Some(vec![Person { name: "Michael Mann".into() }]);

        assert_eq!(normalize(record).unwrap().directors, Some(vec!["Michael Mann".to_string()]));
    }
}
