use std::time::Duration;

pub const LINE_ENDING: &str = "\r\n";
pub const DEFAULT_CONFIG_PATH: &str = "/etc/miniftpd.conf";
pub const DEFAULT_LISTEN_PORT: u16 = 2121;
pub const DEFAULT_BANNER: &str = "Welcome to miniftpd";
pub const DEFAULT_DOWNLOAD_BUFFER_SIZE: usize = 128 * 1024;
pub const DEFAULT_UPLOAD_BUFFER_SIZE: usize = 256 * 1024;
pub const MAX_COMMAND_LINE: usize = 8192;
pub const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);
