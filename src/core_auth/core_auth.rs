/// One `username:secret` line of a passwd file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswdEntry {
    username: String,
    secret: String,
}

impl PasswdEntry {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }

    /// Parses `username:secret`. The secret may itself contain `:`.
    pub fn from_line(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let (username, secret) = line.split_once(':')?;
        if username.is_empty() {
            return None;
        }

        Some(PasswdEntry::new(username, secret))
    }

    /// True when the secret is a bcrypt hash rather than a plaintext password.
    pub fn is_hashed(&self) -> bool {
        self.secret.starts_with("$2")
    }

    pub fn get_secret(&self) -> &str {
        &self.secret
    }

    pub fn get_username(&self) -> &str {
        &self.username
    }
}
