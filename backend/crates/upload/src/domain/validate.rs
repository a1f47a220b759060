//! File Validation Checks

use crate::domain::filename::{file_extension, sanitize_filename};
use crate::domain::policy::UploadPolicy;
use thiserror::Error;

/// Extensions rejected outright, whatever the declared MIME type says
const DANGEROUS_EXTENSIONS: &[&str] = &[
    "exe", "bat", "cmd", "com", "pif", "scr", "vbs", "js", "jar", "php", "asp", "aspx", "jsp",
    "sh", "bash", "zsh", "fish", "sql", "db", "sqlite",
];

/// Interior extension segments that flag double-extension smuggling
const SMUGGLING_SEGMENTS: &[&str] = &["exe", "bat", "cmd", "com", "scr"];

const MB: u64 = 1024 * 1024;

/// Declared metadata for one incoming file part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

/// A file that passed every check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidUpload {
    pub sanitized_filename: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

/// Why one file was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("File size must be less than {max_mb}MB")]
    TooLarge { max_mb: u64 },

    #[error("File type {mime} is not allowed")]
    MimeNotAllowed { mime: String },

    #[error("File extension .{extension} is not allowed")]
    ExtensionNotAllowed { extension: String },

    #[error("File has no extension")]
    MissingExtension,

    #[error("File type .{extension} is potentially dangerous")]
    DangerousExtension { extension: String },

    #[error("Hidden files are not allowed")]
    HiddenFile,

    #[error("Filename contains a suspicious double extension")]
    DoubleExtension,

    #[error("{category} files must be less than {max_mb}MB")]
    CategoryCapExceeded { category: &'static str, max_mb: u64 },
}

/// Validate one file against a policy
///
/// Checks run in order and stop at the first failure: size, MIME type,
/// extension, name heuristics, media-category hard cap.
pub fn validate_file(
    meta: &FileMetadata,
    policy: &UploadPolicy,
) -> Result<ValidUpload, ValidationFailure> {
    if meta.size_bytes > policy.max_size_bytes {
        return Err(ValidationFailure::TooLarge {
            max_mb: policy.max_size_mb(),
        });
    }

    if !policy.allows_mime(&meta.mime_type) {
        return Err(ValidationFailure::MimeNotAllowed {
            mime: meta.mime_type.clone(),
        });
    }

    let Some(extension) = file_extension(&meta.name) else {
        return Err(ValidationFailure::MissingExtension);
    };
    if !policy.allows_extension(&extension) {
        return Err(ValidationFailure::ExtensionNotAllowed { extension });
    }

    check_name_heuristics(&meta.name)?;
    check_category_cap(&meta.mime_type, meta.size_bytes)?;

    Ok(ValidUpload {
        sanitized_filename: sanitize_filename(&meta.name),
        mime_type: meta.mime_type.clone(),
        size_bytes: meta.size_bytes,
    })
}

/// Suspicious-name heuristics, independent of the declared MIME type
pub fn check_name_heuristics(name: &str) -> Result<(), ValidationFailure> {
    if let Some(extension) = file_extension(name) {
        if DANGEROUS_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ValidationFailure::DangerousExtension { extension });
        }
    }

    if name.starts_with('.') {
        return Err(ValidationFailure::HiddenFile);
    }

    let segments: Vec<&str> = name.split('.').collect();
    if segments.len() > 2 {
        // Every non-final segment; the final one was checked above
        let non_final = &segments[..segments.len() - 1];
        if non_final
            .iter()
            .any(|s| SMUGGLING_SEGMENTS.contains(&s.to_ascii_lowercase().as_str()))
        {
            return Err(ValidationFailure::DoubleExtension);
        }
    }

    Ok(())
}

/// Hard caps per media category, enforced even when the policy's own
/// limit is larger
pub fn check_category_cap(mime_type: &str, size_bytes: u64) -> Result<(), ValidationFailure> {
    let cap = if mime_type.starts_with("image/") {
        Some(("Image", 10))
    } else if mime_type.starts_with("video/") {
        Some(("Video", 100))
    } else if mime_type.starts_with("audio/") {
        Some(("Audio", 50))
    } else if mime_type == "application/pdf" {
        Some(("PDF", 25))
    } else {
        None
    };

    match cap {
        Some((category, max_mb)) if size_bytes > max_mb * MB => {
            Err(ValidationFailure::CategoryCapExceeded { category, max_mb })
        }
        _ => Ok(()),
    }
}
