use crate::config::Config;
use crate::core_auth::CredentialStore;
use crate::core_network::network;
use anyhow::{Context, Result};
use log::{error, info, warn};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

/// Immutable snapshot shared by all sessions.
#[derive(Debug)]
pub struct ServerContext {
    pub root: PathBuf, // Canonical, every session is confined under it
    pub credentials: CredentialStore,
    pub banner: String,
    pub pasv_address: Option<Ipv4Addr>,
    pub upload_buffer_size: usize,
    pub download_buffer_size: usize,
}

impl ServerContext {
    /// Creates the root directory when missing and canonicalizes it.
    pub fn from_config(config: &Config) -> Result<Self> {
        let root_dir = &config.server.root_dir;
        std::fs::create_dir_all(root_dir).with_context(|| {
            format!("Failed to create root directory: {}", root_dir.display())
        })?;
        let root = root_dir
            .canonicalize()
            .with_context(|| format!("Invalid root directory: {}", root_dir.display()))?;

        let credentials =
            CredentialStore::from_config(&config.users, config.server.passwd_file.as_deref())?;
        if credentials.is_empty() {
            warn!("No accounts configured, nobody will be able to log in");
        }

        Ok(Self {
            root,
            credentials,
            banner: config.server.banner.clone(),
            pasv_address: config.server.pasv_address,
            upload_buffer_size: config.server.upload_buffer_size,
            download_buffer_size: config.server.download_buffer_size,
        })
    }
}

/// Runs the FTP server with the provided configuration.
///
/// Returns only if the control listener cannot be bound or stops accepting.
pub async fn run(config: Config) -> Result<()> {
    let context = Arc::new(ServerContext::from_config(&config)?);
    let addr = SocketAddr::new(config.server.listen_address, config.server.listen_port);

    info!("Root directory: {}", context.root.display());
    info!("Accounts: {}", context.credentials.len());
    if let Some(pasv_address) = context.pasv_address {
        info!("PASV address: {}", pasv_address);
    }

    match network::start_server(addr, context).await {
        Ok(_) => info!("Server stopped."),
        Err(e) => {
            error!("Server failed: {:#}", e);
            return Err(e);
        }
    }

    Ok(())
}
