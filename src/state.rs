use std::sync::Arc;

use crate::database::Store;
use crate::provider::MovieProvider;
use crate::services::auth_service::PasswordHasher;
use crate::services::token_service::TokenIssuer;

/// Shared by every request through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub provider: Arc<dyn MovieProvider>,
    pub tokens: TokenIssuer,
    pub hasher: PasswordHasher,
}

#[cfg(test)]
const TEST_BCRYPT_COST: u32 = 4;

#[cfg(test)]
impl AppState {
    /// State over in-memory doubles with a cheap hash cost.
    pub fn for_tests(
        store: Arc<crate::database::memory::MemoryStore>,
        provider: Arc<crate::provider::stub::StubProvider>,
    ) -> Self {
        Self {
            store,
            provider,
            tokens: TokenIssuer::new("test-secret"),
            hasher: PasswordHasher::new(TEST_BCRYPT_COST),
        }
    }
}
