mod config;
mod constants;
mod core_auth;
mod core_cli;
mod core_error;
mod core_fs;
mod core_ftpcommand;
mod core_log;
mod core_network;
mod core_transfer;
mod helpers;
mod server;
mod session;

use crate::config::Config;
use crate::constants::DEFAULT_CONFIG_PATH;
use crate::core_auth::helper::hash_password;
use crate::core_cli::Cli;
use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    if let Some(password) = args.hash_password.as_deref() {
        println!("{}", hash_password(password)?);
        return Ok(());
    }

    core_log::logger::init_logger(args.verbose);

    let mut config = load_config(&args)?;
    if let Some(root) = args.root {
        config.server.root_dir = root;
    }
    if let Some(port) = args.port {
        config.server.listen_port = port;
    }

    server::run(config).await
}

fn load_config(args: &Cli) -> Result<Config> {
    if let Some(path) = args.config.as_deref() {
        info!("Loading configuration from {}", path.display());
        return Config::load_from_file(path);
    }

    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        info!("Loading configuration from {}", default_path.display());
        return Config::load_from_file(default_path);
    }

    warn!("No configuration file found, using built-in defaults and the built-in account");
    Ok(Config::default())
}
