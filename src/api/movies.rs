use actix_web::{web, HttpResponse, ResponseError};
use serde::Deserialize;

use crate::models::Movie;
use crate::services::token_service::Claims;
use crate::services::{movie_service, saved_movie_service};
use crate::state::AppState;
use crate::utils::MessageResponse;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MoviesQuery {
    /// Case-insensitive title fragment
    pub name: Option<String>,
    /// List the caller's saved movies instead of searching
    pub saved: Option<bool>,
}

#[utoipa::path(
    get,
    path = "/movies",
    tag = "Movies",
    params(MoviesQuery),
    responses(
        (status = 200, description = "Matching movies", body = [Movie]),
        (status = 401, description = "Unauthenticated", body = MessageResponse),
        (status = 500, description = "Provider or store failure", body = MessageResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_movies(
    state: web::Data<AppState>,
    user: web::ReqData<Claims>,
    query: web::Query<MoviesQuery>,
) -> HttpResponse {
    let name = query.name.as_deref().unwrap_or("");
    let saved = query.saved.unwrap_or(false);
    log::info!("🎬 GET /movies - name: '{}', saved: {}", name, saved);

    let result = if saved {
        saved_movie_service::list_saved(&state, &user.user_id, Some(name)).await
    } else {
        movie_service::search(state.store.as_ref(), state.provider.as_ref(), name).await
    };

    match result {
        Ok(movies) => HttpResponse::Ok().json(movies),
        Err(e) => {
            log::warn!("❌ Movie listing failed: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/movies/{external_id}",
    tag = "Movies",
    params(("external_id" = String, Path, description = "IMDb identifier, e.g. tt0133093")),
    responses(
        (status = 200, description = "Movie with details", body = Movie),
        (status = 400, description = "Not a movie", body = MessageResponse),
        (status = 404, description = "Movie not found", body = MessageResponse),
        (status = 500, description = "Provider or store failure", body = MessageResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_movie(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let external_id = path.into_inner();
    log::info!("🎬 GET /movies/{}", external_id);

    match movie_service::resolve(state.store.as_ref(), state.provider.as_ref(), &external_id, true).await {
        Ok(movie) => HttpResponse::Ok().json(movie),
        Err(e) => {
            log::warn!("❌ Movie lookup failed: {} - {}", external_id, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/movies/{external_id}/save",
    tag = "Movies",
    params(("external_id" = String, Path, description = "IMDb identifier")),
    responses(
        (status = 201, description = "Movie saved", body = Movie),
        (status = 400, description = "Not a movie", body = MessageResponse),
        (status = 401, description = "Unauthenticated", body = MessageResponse),
        (status = 404, description = "Movie or user not found", body = MessageResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn save_movie(
    state: web::Data<AppState>,
    user: web::ReqData<Claims>,
    path: web::Path<String>,
) -> HttpResponse {
    let external_id = path.into_inner();
    log::info!("⭐ POST /movies/{}/save - user: {}", external_id, user.user_id);

    match saved_movie_service::save(&state, &user.user_id, &external_id).await {
        Ok(movie) => HttpResponse::Created().json(movie),
        Err(e) => {
            log::warn!("❌ Save failed: {} - {}", external_id, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/movies/{external_id}/save",
    tag = "Movies",
    params(("external_id" = String, Path, description = "IMDb identifier")),
    responses(
        (status = 200, description = "Movie removed from saved list", body = MessageResponse),
        (status = 401, description = "Unauthenticated", body = MessageResponse),
        (status = 404, description = "Movie was not saved", body = MessageResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn unsave_movie(
    state: web::Data<AppState>,
    user: web::ReqData<Claims>,
    path: web::Path<String>,
) -> HttpResponse {
    let external_id = path.into_inner();
    log::info!("🗑️ DELETE /movies/{}/save - user: {}", external_id, user.user_id);

    match saved_movie_service::unsave(&state, &user.user_id, &external_id).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new("Movie removed")),
        Err(e) => e.error_response(),
    }
}
