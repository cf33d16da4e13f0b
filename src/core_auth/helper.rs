use crate::core_auth::core_auth::PasswdEntry;
use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};
use log::{info, warn};
use std::path::Path;

pub fn hash_password(password: &str) -> Result<String> {
    hash(password, DEFAULT_COST).context("Failed to hash password")
}

/// Checks `password` against a bcrypt hash. A malformed hash never matches.
pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    verify(password, hashed_password).unwrap_or_else(|e| {
        warn!("Unable to verify password hash: {}", e);
        false
    })
}

pub fn load_passwd_file(path: &Path) -> Result<Vec<PasswdEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read passwd file: {}", path.display()))?;

    let entries: Vec<PasswdEntry> = content.lines().filter_map(PasswdEntry::from_line).collect();
    info!(
        "Loaded {} account(s) from passwd file {}",
        entries.len(),
        path.display()
    );
    Ok(entries)
}
