//! Application Configuration

const MB: usize = 1024 * 1024;

/// Upload endpoint configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Cap on the whole multipart body; per-file limits are enforced by
    /// the validation policies
    pub max_request_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_request_bytes: 256 * MB,
        }
    }
}
