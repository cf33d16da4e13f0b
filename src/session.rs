use std::net::{IpAddr, SocketAddrV4};
use std::path::{Path, PathBuf};
use tokio::net::TcpListener;

/// How the next data connection will be established.
///
/// Holding the passive listener inside the variant means replacing or taking
/// the mode closes the previous listener.
#[derive(Debug, Default)]
pub enum DataMode {
    #[default]
    None,
    Active(SocketAddrV4),
    Passive(TcpListener),
}

impl DataMode {
    pub fn is_pending(&self) -> bool {
        !matches!(self, DataMode::None)
    }
}

/// State of one control connection. Owned by the task serving it.
#[derive(Debug)]
pub struct Session {
    pub username: Option<String>,
    pub is_authenticated: bool,
    pub current_dir: PathBuf, // Always under base_path
    pub base_path: PathBuf,
    pub data_mode: DataMode,
    pub local_ip: IpAddr, // Local side of the control connection
}

impl Session {
    pub fn new(base_path: PathBuf, local_ip: IpAddr) -> Self {
        Self {
            username: None,
            is_authenticated: false,
            current_dir: base_path.clone(),
            base_path,
            data_mode: DataMode::None,
            local_ip,
        }
    }

    /// Removes the pending data mode, leaving `DataMode::None` behind.
    pub fn take_data_mode(&mut self) -> DataMode {
        std::mem::take(&mut self.data_mode)
    }

    /// The current directory as the client sees it, rooted at `/`.
    pub fn virtual_dir(&self) -> String {
        self.to_virtual(&self.current_dir)
    }

    /// `virtual_dir` wrapped in double quotes for 257 and 250 replies, with
    /// embedded quotes doubled.
    pub fn quoted_virtual_dir(&self) -> String {
        format!("\"{}\"", self.virtual_dir().replace('"', "\"\""))
    }

    pub fn to_virtual(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.base_path).unwrap_or(Path::new(""));
        let joined = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!("/{}", joined)
    }
}
