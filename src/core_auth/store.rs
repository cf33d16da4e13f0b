use crate::core_auth::core_auth::PasswdEntry;
use crate::core_auth::helper::{load_passwd_file, verify_password};
use anyhow::Result;
use log::debug;
use std::collections::HashMap;
use std::path::Path;

/// Read-only username to secret lookup shared by every session.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    entries: HashMap<String, PasswdEntry>,
}

impl CredentialStore {
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = PasswdEntry>,
    {
        let entries = entries
            .into_iter()
            .map(|entry| (entry.get_username().to_string(), entry))
            .collect();
        Self { entries }
    }

    /// Builds the store from the `[users]` table, then the passwd file.
    /// Entries from the file win on duplicate usernames.
    pub fn from_config(users: &HashMap<String, String>, passwd_file: Option<&Path>) -> Result<Self> {
        let mut entries: Vec<PasswdEntry> = users
            .iter()
            .map(|(username, secret)| PasswdEntry::new(username.as_str(), secret.as_str()))
            .collect();

        if let Some(path) = passwd_file {
            entries.extend(load_passwd_file(path)?);
        }

        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn verify(&self, username: &str, password: &str) -> bool {
        let Some(entry) = self.entries.get(username) else {
            debug!("Unknown user: {}", username);
            return false;
        };

        if entry.is_hashed() {
            verify_password(password, entry.get_secret())
        } else {
            entry.get_secret() == password
        }
    }
}
