use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::utils::AppError;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub user_id: String,
    pub iat: i64, // issued at
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
}

/// Signs and verifies HS256 bearer tokens with a secret fixed at startup.
///
/// Tokens carry no `exp` claim and stay valid for as long as the secret does.
/// A token that does carry one is still checked, and an expired one is
/// rejected like any other invalid token.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims = HashSet::new();

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue(&self, user_id: &str) -> Result<IssuedToken, AppError> {
        let now = Utc::now();
        let claims = Claims {
            user_id: user_id.to_string(),
            iat: now.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::OperationFailed(format!("Failed to generate token: {}", e)))?;

        Ok(IssuedToken {
            token,
            issued_at: Utc.timestamp_opt(claims.iat, 0).single().unwrap_or(now),
        })
    }

    /// Any failure, including an expired signature, is `Unauthenticated`.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => {
                match e.kind() {
                    ErrorKind::ExpiredSignature => log::debug!("Token signature expired"),
                    _ => log::debug!("Invalid token: {}", e),
                }
                Err(AppError::Unauthenticated)
            }
        }
    }
}
