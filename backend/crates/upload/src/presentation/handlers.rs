//! HTTP Handlers

use crate::application::ValidateBatchUseCase;
use crate::domain::policy::UploadCategory;
use crate::domain::validate::FileMetadata;
use crate::error::UploadResult;
use crate::presentation::dto::{UploadResponse, UploadedFileDto};
use axum::Json;
use axum::extract::Multipart;
use axum::http::{HeaderMap, header};

/// POST /api/upload
///
/// Consumes a multipart body with file parts and an optional `category`
/// field. All parts are read before validation since the category field
/// may arrive after the files. The storage write itself belongs to the
/// object-storage collaborator; this endpoint only validates and
/// assigns destinations.
pub async fn upload(headers: HeaderMap, mut multipart: Multipart) -> UploadResult<Json<UploadResponse>> {
    let user_id = bearer_identity(&headers);
    let mut category = UploadCategory::default();
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("category") {
            let value = field.text().await?;
            category = UploadCategory::from_request_value(&value);
            continue;
        }

        let name = field.file_name().unwrap_or_default().to_string();
        let mime_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;

        files.push(FileMetadata {
            name,
            mime_type,
            size_bytes: bytes.len() as u64,
        });
    }

    let accepted = ValidateBatchUseCase::execute(category, &user_id, &files)?;

    tracing::info!(
        category = category.as_str(),
        count = accepted.len(),
        "Upload batch validated"
    );

    Ok(Json(UploadResponse {
        files: accepted
            .into_iter()
            .map(|file| UploadedFileDto {
                file_name: file.upload.sanitized_filename,
                mime_type: file.upload.mime_type,
                size_bytes: file.upload.size_bytes,
                storage_path: file.storage_path,
            })
            .collect(),
    }))
}

/// Identity for storage path scoping
///
/// Authentication is an external collaborator; the bearer token is the
/// caller-supplied identity and anonymous callers share one bucket.
fn bearer_identity(headers: &HeaderMap) -> String {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .unwrap_or("anonymous")
        .to_string()
}
