use std::cmp::Ordering;

use super::entry::FileEntry;

/// Order a listing for display: directories first, then case-insensitive
/// name ascending. The sort is stable, so entries comparing equal keep
/// their incoming relative order.
pub fn sort_entries(entries: &mut [FileEntry]) {
    entries.sort_by(|a, b| {
        if a.is_directory != b.is_directory {
            return if a.is_directory {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }
        a.name.to_lowercase().cmp(&b.name.to_lowercase())
    });
}
