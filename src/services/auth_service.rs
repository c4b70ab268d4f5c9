use chrono::{DateTime, Utc};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

use crate::models::{ProfileChanges, User};
use crate::state::AppState;
use crate::utils::{AppError, MessageResponse};

const MIN_PASSWORD_LEN: usize = 8;
const MAX_FIELD_LEN: usize = 100;

/// bcrypt wrapper; the cost comes from configuration.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        bcrypt::hash(password, self.cost)
            .map_err(|e| AppError::OperationFailed(format!("Failed to hash password: {}", e)))
    }

    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        bcrypt::verify(password, hash)
            .map_err(|e| AppError::OperationFailed(format!("Password verification error: {}", e)))
    }
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub recovery_question: String,
    pub recovery_answer: String,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PublicUser {
    pub name: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub token: String,
    #[schema(value_type = String, format = DateTime)]
    pub iat: DateTime<Utc>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RecoveryPasswordRequest {
    pub email: String,
    pub recovery_answer: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecoveryQuestionQuery {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RecoveryQuestionResponse {
    pub recovery_question: String,
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub recovery_question: Option<String>,
    pub recovery_answer: Option<String>,
}

fn validate_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} must not be empty", field)));
    }
    if value.chars().count() > MAX_FIELD_LEN {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, MAX_FIELD_LEN
        )));
    }
    Ok(())
}

fn validate_password(field: &str, value: &str) -> Result<(), AppError> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "{} must be at least {} characters",
            field, MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

impl CreateUserRequest {
    fn validate(&self) -> Result<(), AppError> {
        validate_text("name", &self.name)?;
        validate_text("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(AppError::Validation("email is not a valid address".to_string()));
        }
        validate_password("password", &self.password)?;
        validate_text("recovery_question", &self.recovery_question)?;
        validate_text("recovery_answer", &self.recovery_answer)?;
        Ok(())
    }
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

// User registration
pub async fn register(state: &AppState, request: &CreateUserRequest) -> Result<PublicUser, AppError> {
    request.validate()?;

    if state.store.find_user_by_email(&request.email).await?.is_some() {
        return Err(AppError::AlreadyExists("User already exists".to_string()));
    }

    let now = BsonDateTime::now();
    let user = User {
        user_id: ObjectId::new().to_hex(),
        name: request.name.clone(),
        email: request.email.clone(),
        password: state.hasher.hash(&request.password)?,
        recovery_question: request.recovery_question.clone(),
        recovery_answer: request.recovery_answer.clone(),
        created_at: Some(now),
        updated_at: Some(now),
    };

    // The unique index on email still guards against a concurrent registration
    state.store.insert_user(&user).await?;

    log::info!("✅ User registered successfully: {}", user.email);
    Ok(PublicUser::from(&user))
}

// Password login
pub async fn generate_token(state: &AppState, request: &CredentialsRequest) -> Result<TokenResponse, AppError> {
    let user = state
        .store
        .find_user_by_email(&request.email)
        .await?
        .ok_or_else(user_not_found)?;

    if !state.hasher.verify(&request.password, &user.password)? {
        return Err(AppError::InvalidPassword);
    }

    let issued = state.tokens.issue(&user.user_id)?;
    Ok(TokenResponse {
        token: issued.token,
        iat: issued.issued_at,
    })
}

pub async fn recover_password(
    state: &AppState,
    request: &RecoveryPasswordRequest,
) -> Result<MessageResponse, AppError> {
    validate_password("new_password", &request.new_password)?;

    let user = state
        .store
        .find_user_by_email(&request.email)
        .await?
        .ok_or_else(user_not_found)?;

    // Plaintext comparison: recovery answers are stored as entered
    if user.recovery_answer != request.recovery_answer {
        return Err(AppError::WrongAnswer);
    }

    let hash = state.hasher.hash(&request.new_password)?;
    if !state.store.update_user_password(&user.user_id, &hash).await? {
        return Err(user_not_found());
    }

    log::info!("🔑 Password reset for {}", user.email);
    Ok(MessageResponse::new("Password reseted"))
}

pub async fn recovery_question(state: &AppState, email: &str) -> Result<RecoveryQuestionResponse, AppError> {
    let user = state
        .store
        .find_user_by_email(email)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(RecoveryQuestionResponse {
        recovery_question: user.recovery_question,
    })
}

// Get current user
pub async fn current_user(state: &AppState, user_id: &str) -> Result<PublicUser, AppError> {
    let user = state
        .store
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(user_not_found)?;
    Ok(PublicUser::from(&user))
}

pub async fn update_profile(
    state: &AppState,
    user_id: &str,
    request: &UpdateProfileRequest,
) -> Result<PublicUser, AppError> {
    let changes = ProfileChanges {
        name: request.name.clone(),
        recovery_question: request.recovery_question.clone(),
        recovery_answer: request.recovery_answer.clone(),
    };
    if changes.is_empty() {
        return Err(AppError::Validation("Nothing to update".to_string()));
    }
    if let Some(name) = &changes.name {
        validate_text("name", name)?;
    }
    if let Some(question) = &changes.recovery_question {
        validate_text("recovery_question", question)?;
    }
    if let Some(answer) = &changes.recovery_answer {
        validate_text("recovery_answer", answer)?;
    }

    if !state.store.update_user_profile(user_id, &changes).await? {
        return Err(user_not_found());
    }
    current_user(state, user_id).await
}

/// 🗑️ Delete user account and its saved movies
pub async fn delete_account(state: &AppState, user_id: &str) -> Result<(), AppError> {
    log::info!("🗑️ Deleting account for user_id: {}", user_id);

    if !state.store.delete_user(user_id).await? {
        log::warn!("⚠️ User {} not found in database", user_id);
        return Err(user_not_found());
    }
    Ok(())
}
