use crate::constants::{
    DEFAULT_BANNER, DEFAULT_DOWNLOAD_BUFFER_SIZE, DEFAULT_LISTEN_PORT, DEFAULT_UPLOAD_BUFFER_SIZE,
};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_address: IpAddr,
    pub listen_port: u16,
    pub root_dir: PathBuf,
    pub pasv_address: Option<Ipv4Addr>, // Public address advertised in PASV replies
    pub banner: String,
    pub passwd_file: Option<PathBuf>,
    pub upload_buffer_size: usize,
    pub download_buffer_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default = "default_users")]
    pub users: HashMap<String, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            listen_port: DEFAULT_LISTEN_PORT,
            root_dir: PathBuf::from("./ftp_root"),
            pasv_address: None,
            banner: DEFAULT_BANNER.to_string(),
            passwd_file: None,
            upload_buffer_size: DEFAULT_UPLOAD_BUFFER_SIZE,
            download_buffer_size: DEFAULT_DOWNLOAD_BUFFER_SIZE,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            users: default_users(),
        }
    }
}

fn default_users() -> HashMap<String, String> {
    HashMap::from([("user".to_string(), "password".to_string())])
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(config_str)?;

        // Zero-sized buffers would turn every copy into a no-op
        if config.server.upload_buffer_size == 0 {
            config.server.upload_buffer_size = DEFAULT_UPLOAD_BUFFER_SIZE;
        }
        if config.server.download_buffer_size == 0 {
            config.server.download_buffer_size = DEFAULT_DOWNLOAD_BUFFER_SIZE;
        }

        Ok(config)
    }
}
