pub mod error;

pub use error::{DataChannelError, FtpError};
