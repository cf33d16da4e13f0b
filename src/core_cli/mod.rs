use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "miniftpd", about = "A minimal FTP server written in Rust.")]
pub struct Cli {
    /// Directory served to clients, overrides `root_dir` from the config
    pub root: Option<PathBuf>,

    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Control port, overrides `listen_port` from the config
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,

    /// Print a bcrypt hash of the given password and exit
    #[arg(long, value_name = "PASSWORD")]
    pub hash_password: Option<String>,
}
