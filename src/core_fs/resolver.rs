use crate::core_error::FtpError;
use log::{debug, warn};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Resolves a command argument to a real path under `base_path`.
///
/// Relative arguments start from `current_dir`, absolute ones from
/// `base_path`. `.` and `..` are folded lexically, so the check happens
/// before anything touches the file system.
pub fn resolve_path(base_path: &Path, current_dir: &Path, arg: &str) -> Result<PathBuf, FtpError> {
    let mut resolved = if arg.starts_with('/') {
        base_path.to_path_buf()
    } else {
        current_dir.to_path_buf()
    };

    for component in Path::new(arg).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::ParentDir => {
                resolved.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    if !resolved.starts_with(base_path) {
        warn!("Path is outside of the allowed area: {:?}", resolved);
        return Err(FtpError::PermissionDenied(arg.to_string()));
    }

    debug!("Resolved {:?} to {:?}", arg, resolved);
    Ok(resolved)
}

/// Re-checks an existing target after following symlinks.
///
/// `base_path` must already be canonical.
pub async fn confirm_within_root(base_path: &Path, path: &Path) -> Result<PathBuf, FtpError> {
    let canonical = match tokio::fs::canonicalize(path).await {
        Ok(canonical) => canonical,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(FtpError::NotFound(path.display().to_string()));
        }
        Err(e) => return Err(FtpError::FileSystem(e)),
    };

    if !canonical.starts_with(base_path) {
        warn!(
            "Link leads outside of the allowed area: {:?} -> {:?}",
            path, canonical
        );
        return Err(FtpError::PermissionDenied(path.display().to_string()));
    }

    Ok(canonical)
}
