use actix_web::{web, HttpResponse, ResponseError};

use crate::services::auth_service::{
    self, CredentialsRequest, RecoveryPasswordRequest, RecoveryQuestionQuery, RecoveryQuestionResponse,
    TokenResponse,
};
use crate::state::AppState;
use crate::utils::MessageResponse;

#[utoipa::path(
    post,
    path = "/auth/generate-token",
    tag = "Auth",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Token issued", body = TokenResponse),
        (status = 403, description = "Invalid password", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse)
    )
)]
pub async fn generate_token(
    state: web::Data<AppState>,
    request: web::Json<CredentialsRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /auth/generate-token - email: {}", request.email);

    match auth_service::generate_token(&state, &request).await {
        Ok(response) => {
            log::info!("✅ Token issued: {}", request.email);
            HttpResponse::Created().json(response)
        }
        Err(e) => {
            log::warn!("❌ Token request failed: {} - {}", request.email, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/auth/recovery-password",
    tag = "Auth",
    request_body = RecoveryPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 400, description = "Wrong answer", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse)
    )
)]
pub async fn recovery_password(
    state: web::Data<AppState>,
    request: web::Json<RecoveryPasswordRequest>,
) -> HttpResponse {
    log::info!("🔑 POST /auth/recovery-password - email: {}", request.email);

    match auth_service::recover_password(&state, &request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log::warn!("❌ Password recovery failed: {} - {}", request.email, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/auth/get-recovery-question",
    tag = "Auth",
    params(RecoveryQuestionQuery),
    responses(
        (status = 200, description = "Recovery question", body = RecoveryQuestionResponse),
        (status = 404, description = "User not found", body = MessageResponse)
    )
)]
pub async fn get_recovery_question(
    state: web::Data<AppState>,
    query: web::Query<RecoveryQuestionQuery>,
) -> HttpResponse {
    log::info!("❓ GET /auth/get-recovery-question - email: {}", query.email);

    match auth_service::recovery_question(&state, &query.email).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => e.error_response(),
    }
}
