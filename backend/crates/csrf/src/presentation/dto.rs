//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

/// Response for GET /api/csrf
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfTokenResponse {
    pub csrf_token: String,
}
