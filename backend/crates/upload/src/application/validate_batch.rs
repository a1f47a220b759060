//! Validate Batch Use Case

use crate::domain::policy::UploadCategory;
use crate::domain::storage_path::storage_path;
use crate::domain::validate::{FileMetadata, ValidUpload, validate_file};
use crate::error::{UploadError, UploadResult};

/// One accepted file with its generated storage destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedFile {
    pub upload: ValidUpload,
    pub storage_path: String,
}

/// Validate Batch Use Case
///
/// Validates every file in a multipart batch against the category's
/// policy. Files are validated independently, but the first invalid
/// file aborts the whole batch.
pub struct ValidateBatchUseCase;

impl ValidateBatchUseCase {
    pub fn execute(
        category: UploadCategory,
        user_id: &str,
        files: &[FileMetadata],
    ) -> UploadResult<Vec<AcceptedFile>> {
        if files.is_empty() {
            return Err(UploadError::validation(vec!["No file provided".to_string()]));
        }

        let policy = category.policy();
        let mut accepted = Vec::with_capacity(files.len());

        for meta in files {
            match validate_file(meta, &policy) {
                Ok(upload) => {
                    let path = storage_path(category, user_id, &upload.sanitized_filename);
                    accepted.push(AcceptedFile {
                        upload,
                        storage_path: path,
                    });
                }
                Err(failure) => {
                    tracing::info!(
                        file = %meta.name,
                        reason = %failure,
                        "Rejected upload batch"
                    );
                    return Err(UploadError::validation(vec![format!(
                        "{}: {}",
                        meta.name, failure
                    )]));
                }
            }
        }

        Ok(accepted)
    }
}
