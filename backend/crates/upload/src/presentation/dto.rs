//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

/// One accepted file in the upload response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFileDto {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub storage_path: String,
}

/// Response for POST /api/upload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub files: Vec<UploadedFileDto>,
}
