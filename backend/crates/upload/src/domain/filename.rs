//! Filename Sanitization

const MAX_FILENAME_LEN: usize = 100;
const DEFAULT_NAME: &str = "file";

/// Lower-cased suffix after the final dot, if any
pub fn file_extension(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Sanitize a filename for storage
///
/// Every character outside `[A-Za-z0-9.-]` becomes `_`, runs of dots
/// and underscores collapse to one, leading and trailing dots and
/// underscores are stripped, and the result is truncated to 100
/// characters keeping the final extension. An empty result becomes
/// `file`.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '.' || ch == '-' {
                ch
            } else {
                '_'
            }
        })
        .collect();

    let mut collapsed = String::with_capacity(replaced.len());
    let mut prev = None;
    for ch in replaced.chars() {
        if (ch == '.' || ch == '_') && prev == Some(ch) {
            continue;
        }
        collapsed.push(ch);
        prev = Some(ch);
    }

    let trimmed = collapsed.trim_matches(|ch| ch == '.' || ch == '_');

    if trimmed.is_empty() {
        return DEFAULT_NAME.to_string();
    }

    truncate_keeping_extension(trimmed)
}

fn truncate_keeping_extension(name: &str) -> String {
    if name.len() <= MAX_FILENAME_LEN {
        return name.to_string();
    }

    match name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && ext.len() + 1 < MAX_FILENAME_LEN => {
            let keep = MAX_FILENAME_LEN - ext.len() - 1;
            format!("{}.{}", &stem[..stem.len().min(keep)], ext)
        }
        _ => name[..MAX_FILENAME_LEN].to_string(),
    }
}
