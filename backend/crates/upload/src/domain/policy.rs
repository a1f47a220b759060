//! Upload Policies

const MB: u64 = 1024 * 1024;

/// What a category of upload is allowed to contain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_size_bytes: u64,
    pub allowed_mime_types: Vec<String>,
    pub allowed_extensions: Vec<String>,
}

impl UploadPolicy {
    /// Plain images: JPEG/PNG/GIF/WebP up to 10MB
    pub fn images() -> Self {
        Self {
            max_size_bytes: 10 * MB,
            allowed_mime_types: to_vec(&["image/jpeg", "image/png", "image/gif", "image/webp"]),
            allowed_extensions: to_vec(&["jpg", "jpeg", "png", "gif", "webp"]),
        }
    }

    /// NFT assets: images plus video, audio, PDF and glTF up to 50MB
    pub fn nft_assets() -> Self {
        Self {
            max_size_bytes: 50 * MB,
            allowed_mime_types: to_vec(&[
                "image/jpeg",
                "image/png",
                "image/gif",
                "image/webp",
                "video/mp4",
                "video/webm",
                "video/quicktime",
                "audio/mpeg",
                "audio/wav",
                "audio/ogg",
                "application/pdf",
                "model/gltf-binary",
                "model/gltf+json",
            ]),
            allowed_extensions: to_vec(&[
                "jpg", "jpeg", "png", "gif", "webp", "mp4", "webm", "mov", "mp3", "wav", "ogg",
                "pdf", "glb", "gltf",
            ]),
        }
    }

    pub fn max_size_mb(&self) -> u64 {
        self.max_size_bytes / MB
    }

    pub fn allows_mime(&self, mime: &str) -> bool {
        self.allowed_mime_types.iter().any(|m| m == mime)
    }

    pub fn allows_extension(&self, extension: &str) -> bool {
        self.allowed_extensions.iter().any(|e| e == extension)
    }
}

fn to_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Built-in upload category, resolved from the request's category field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadCategory {
    #[default]
    Images,
    NftAssets,
}

impl UploadCategory {
    /// Map a caller-supplied category string to a built-in category
    ///
    /// Unknown strings resolve to the images policy, the most
    /// restrictive of the two.
    pub fn from_request_value(value: &str) -> Self {
        match value {
            "nft-asset" | "nft" => UploadCategory::NftAssets,
            _ => UploadCategory::Images,
        }
    }

    pub fn policy(&self) -> UploadPolicy {
        match self {
            UploadCategory::Images => UploadPolicy::images(),
            UploadCategory::NftAssets => UploadPolicy::nft_assets(),
        }
    }

    /// Top-level storage path segment for this category
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadCategory::Images => "images",
            UploadCategory::NftAssets => "nft-assets",
        }
    }
}
