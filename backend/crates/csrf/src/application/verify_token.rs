//! Verify Token Use Case

use crate::domain::repository::CsrfTokenRepository;
use crate::domain::value_objects::SessionKey;
use crate::error::CsrfResult;
use chrono::Utc;
use std::sync::Arc;

/// Verify Token Use Case
///
/// Looks up the stored token for the session key and compares it in
/// constant time. Absent or expired entries verify as false; expired
/// entries are deleted by the repository on lookup.
pub struct VerifyTokenUseCase<R>
where
    R: CsrfTokenRepository,
{
    repo: Arc<R>,
}

impl<R> VerifyTokenUseCase<R>
where
    R: CsrfTokenRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, session_key: &SessionKey, provided: &str) -> CsrfResult<bool> {
        let now_ms = Utc::now().timestamp_millis();

        let Some(stored) = self.repo.find(session_key, now_ms).await? else {
            return Ok(false);
        };

        Ok(stored.matches(provided))
    }
}
