use chrono::{DateTime, Local, TimeZone};
use log::warn;
use std::fmt::Display;
use std::fs::Metadata;
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// What a listing needs to know about one directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub name: String,
    pub size: u64,
    pub is_dir: bool,
    pub is_symlink: bool,
    pub permissions: u32, // rwx bits only
    pub modified: SystemTime,
}

impl ListEntry {
    /// `name` is stored with any CR or LF replaced by `?`, so every entry
    /// stays on one listing line.
    pub fn from_metadata(name: String, metadata: &Metadata) -> Self {
        Self {
            name: printable_name(name),
            size: metadata.len(),
            is_dir: metadata.is_dir(),
            is_symlink: metadata.file_type().is_symlink(),
            permissions: permission_bits(metadata),
            modified: metadata.modified().unwrap_or(UNIX_EPOCH),
        }
    }

    /// `drwxr-xr-x 1 owner group 4096 Jan 02 15:04 name`
    pub fn to_list_line(&self) -> String {
        let modified: DateTime<Local> = self.modified.into();
        format!(
            "{} 1 {} {} {} {} {}",
            self.mode_string(),
            "owner",
            "group",
            self.size,
            format_timestamp(&modified),
            self.name
        )
    }

    pub fn to_nlst_line(&self) -> String {
        self.name.clone()
    }

    pub fn mode_string(&self) -> String {
        let file_type = if self.is_dir {
            'd'
        } else if self.is_symlink {
            'l'
        } else {
            '-'
        };

        let mut mode = String::with_capacity(10);
        mode.push(file_type);
        for shift in [6, 3, 0] {
            let bits = (self.permissions >> shift) & 0o7;
            mode.push(if bits & 0o4 != 0 { 'r' } else { '-' });
            mode.push(if bits & 0o2 != 0 { 'w' } else { '-' });
            mode.push(if bits & 0o1 != 0 { 'x' } else { '-' });
        }
        mode
    }
}

fn printable_name(name: String) -> String {
    let is_break = |c: char| c == '\r' || c == '\n';
    if name.contains(is_break) {
        warn!("Entry name contains line breaks: {:?}", name);
        name.replace(is_break, "?")
    } else {
        name
    }
}

pub fn format_timestamp<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    time.format("%b %d %H:%M").to_string()
}

#[cfg(unix)]
fn permission_bits(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o777
}

#[cfg(not(unix))]
fn permission_bits(metadata: &Metadata) -> u32 {
    match (metadata.is_dir(), metadata.permissions().readonly()) {
        (true, _) => 0o755,
        (false, true) => 0o444,
        (false, false) => 0o644,
    }
}

/// Collects the entries of `path`, sorted by name.
///
/// A regular file yields a single entry for itself. Entries whose metadata
/// cannot be read are skipped.
pub async fn read_listing(path: &Path) -> io::Result<Vec<ListEntry>> {
    let metadata = tokio::fs::metadata(path).await?;
    if !metadata.is_dir() {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        return Ok(vec![ListEntry::from_metadata(name, &metadata)]);
    }

    let mut entries = Vec::new();
    let mut read_dir = tokio::fs::read_dir(path).await?;
    while let Some(entry) = read_dir.next_entry().await? {
        match entry.metadata().await {
            Ok(metadata) => {
                let name = entry.file_name().to_string_lossy().into_owned();
                entries.push(ListEntry::from_metadata(name, &metadata));
            }
            Err(e) => {
                warn!(
                    "Failed to get metadata for entry: {:?}, error: {:?}",
                    entry.path(),
                    e
                );
            }
        }
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}
