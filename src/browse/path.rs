//! Remote path helpers for browse navigation
//!
//! Remote paths always use `/` regardless of either side's OS. These are
//! pure string operations that never consult the remote filesystem, so
//! they are a best-effort UI aid rather than an authoritative answer.

/// Compute the parent directory of a remote path.
///
/// Returns `None` for the root and for empty input (root has no parent).
pub fn parent_of(path: &str) -> Option<String> {
    if path.is_empty() || path == "/" {
        return None;
    }

    let trimmed = path.strip_suffix('/').unwrap_or(path);
    match trimmed.rfind('/') {
        Some(0) | None => Some("/".to_string()),
        Some(idx) => Some(trimmed[..idx].to_string()),
    }
}

/// Normalize operator-supplied path input.
///
/// Trims whitespace, rejects empty input, forces a leading `/` and drops a
/// trailing `/` except on the root itself.
pub fn normalize(path: &str) -> Option<String> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut normalized = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    };

    while normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }

    Some(normalized)
}
