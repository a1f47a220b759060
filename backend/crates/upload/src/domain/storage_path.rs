//! Storage Path Generation

use crate::domain::policy::UploadCategory;
use chrono::Utc;
use platform::crypto::random_token;

const MAX_PATH_LEN: usize = 255;

/// Build the object-storage path for an accepted file
///
/// Shape: `{category}/{user_id}/{timestamp}-{random}-{sanitized_name}`.
/// The timestamp plus random discriminator keeps concurrent uploads of
/// the same filename from colliding.
pub fn storage_path(category: UploadCategory, user_id: &str, sanitized_name: &str) -> String {
    let timestamp = Utc::now().timestamp_millis();
    let discriminator = random_token(8).to_ascii_lowercase();

    format!(
        "{}/{}/{}-{}-{}",
        category.as_str(),
        user_id,
        timestamp,
        discriminator,
        sanitized_name
    )
}

/// Check a storage path before handing it to the storage collaborator
pub fn validate_storage_path(path: &str) -> bool {
    if path.is_empty() || path.len() > MAX_PATH_LEN {
        return false;
    }
    if path.contains("..") || path.contains('~') {
        return false;
    }
    if path.starts_with('/') || path.starts_with('\\') {
        return false;
    }
    // Windows drive letters
    if path.len() >= 2 && path.as_bytes()[1] == b':' {
        return false;
    }
    true
}
