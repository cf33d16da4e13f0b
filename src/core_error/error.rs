// Error types surfaced to the client as FTP replies
use crate::core_ftpcommand::reply::Reply;
use std::io;
use std::net::SocketAddrV4;
use thiserror::Error;

/// Failures while turning a pending data mode into a connected data socket.
#[derive(Error, Debug)]
pub enum DataChannelError {
    #[error("No data connection established")]
    NoPendingMode,

    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: SocketAddrV4,
        #[source]
        source: io::Error,
    },

    #[error("Failed to accept passive connection: {0}")]
    Accept(#[source] io::Error),

    #[error("Failed to open passive listener: {0}")]
    Bind(#[source] io::Error),

    #[error("Passive mode needs an IPv4 address, control connection is on {0}")]
    NoIpv4Address(std::net::IpAddr),
}

/// Command-level failures. None of them ends the session.
#[derive(Error, Debug)]
pub enum FtpError {
    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Command line longer than {0} bytes")]
    LineTooLong(usize),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Login incorrect for user {0}")]
    LoginIncorrect(String),

    #[error("PASS received before USER")]
    UserFirst,

    #[error("Path escapes the root directory: {0}")]
    PermissionDenied(String),

    #[error("No such file or directory: {0}")]
    NotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] io::Error),

    #[error(transparent)]
    DataChannel(#[from] DataChannelError),

    #[error("Transfer aborted: {0}")]
    TransferAborted(#[source] io::Error),
}

impl FtpError {
    pub fn to_ftp_response(&self) -> Reply {
        match self {
            FtpError::Syntax(_) => Reply::new(501, "Syntax error in parameters or arguments."),
            FtpError::UnknownCommand(_) => Reply::new(500, "Unknown command."),
            FtpError::LineTooLong(_) => Reply::new(500, "Command line too long."),
            FtpError::NotLoggedIn => Reply::new(530, "Please log in."),
            FtpError::LoginIncorrect(_) => Reply::new(530, "Login incorrect."),
            FtpError::UserFirst => Reply::new(530, "Login with USER first."),
            FtpError::PermissionDenied(_) => Reply::new(550, "Permission denied."),
            FtpError::NotFound(_) => Reply::new(550, "No such file or directory."),
            FtpError::NotADirectory(_) => Reply::new(550, "Not a directory."),
            FtpError::FileSystem(_) => Reply::new(550, "Requested action not taken."),
            FtpError::DataChannel(_) => Reply::new(425, "Can't open data connection."),
            FtpError::TransferAborted(_) => {
                Reply::new(426, "Connection closed; transfer aborted.")
            }
        }
    }
}
