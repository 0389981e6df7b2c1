use serde::Serialize;

use crate::transport::RawEntry;

use super::format::{format_mtime, format_permissions};

/// Uniform directory-listing record used by everything above the transport.
///
/// Fields the protocol could not supply keep their defaults: size 0,
/// empty timestamp, not a directory, empty permission string. Missing
/// metadata stays missing; FTP entries are routinely name-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub size: u64,
    pub modified_at: String,
    pub is_directory: bool,
    pub permissions: String,
}

/// Mode bit marking a directory in SFTP attribute records
const S_IFDIR: u32 = 0o40000;

/// Convert a protocol-native record into a uniform entry.
///
/// Returns `None` for records whose resolved name is empty, `.` or `..`;
/// those never appear in a normalized listing.
pub fn normalize(raw: RawEntry) -> Option<FileEntry> {
    match raw {
        RawEntry::Attributes {
            name,
            size,
            mtime,
            mode,
        } => {
            let name = usable_name(name)?;
            Some(FileEntry {
                name,
                size: size.unwrap_or(0),
                modified_at: format_mtime(mtime),
                is_directory: mode.is_some_and(|m| m & S_IFDIR != 0),
                permissions: mode.map(format_permissions).unwrap_or_default(),
            })
        }
        RawEntry::Partial { name, size, is_dir } => {
            let name = usable_name(name)?;
            Some(FileEntry {
                name,
                size,
                modified_at: String::new(),
                is_directory: is_dir,
                permissions: String::new(),
            })
        }
        RawEntry::Name(name) => {
            let name = usable_name(name)?;
            Some(FileEntry {
                name,
                size: 0,
                modified_at: String::new(),
                is_directory: false,
                permissions: String::new(),
            })
        }
    }
}

fn usable_name(name: String) -> Option<String> {
    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name)
    }
}
