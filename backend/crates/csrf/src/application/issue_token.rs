//! Issue Token Use Case

use crate::application::config::CsrfConfig;
use crate::domain::entities::CsrfToken;
use crate::domain::repository::CsrfTokenRepository;
use crate::domain::value_objects::SessionKey;
use crate::error::CsrfResult;
use platform::crypto::random_token;
use std::sync::Arc;

/// Output DTO for issue token
#[derive(Debug, Clone)]
pub struct IssueTokenOutput {
    pub token: String,
    pub expires_at_ms: i64,
}

/// Issue Token Use Case
///
/// Generates a fresh token and stores it under the session key,
/// replacing any prior token for that key.
pub struct IssueTokenUseCase<R>
where
    R: CsrfTokenRepository,
{
    repo: Arc<R>,
    config: Arc<CsrfConfig>,
}

impl<R> IssueTokenUseCase<R>
where
    R: CsrfTokenRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<CsrfConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, session_key: &SessionKey) -> CsrfResult<IssueTokenOutput> {
        let token = CsrfToken::new(random_token(self.config.token_length), self.config.ttl_ms());

        self.repo.save(session_key, &token).await?;

        tracing::debug!(expires_at_ms = token.expires_at_ms, "Issued CSRF token");

        Ok(IssueTokenOutput {
            token: token.token,
            expires_at_ms: token.expires_at_ms,
        })
    }
}
