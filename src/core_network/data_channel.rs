use crate::core_error::DataChannelError;
use crate::session::DataMode;
use log::{debug, error, info};
use tokio::net::TcpStream;

/// Turns a pending data mode into one connected data socket.
///
/// Active mode dials the address the client advertised with PORT. Passive
/// mode accepts a single connection, after which the listener is dropped,
/// so every transfer needs a fresh PASV or EPSV.
pub async fn open_data_connection(mode: DataMode) -> Result<TcpStream, DataChannelError> {
    match mode {
        DataMode::None => Err(DataChannelError::NoPendingMode),
        DataMode::Active(addr) => {
            debug!("Dialing data connection to {}", addr);
            let stream = TcpStream::connect(addr).await.map_err(|source| {
                error!("Failed to connect to client {}: {}", addr, source);
                DataChannelError::Connect { addr, source }
            })?;
            info!("Active data connection established with {}", addr);
            Ok(stream)
        }
        DataMode::Passive(listener) => {
            let (stream, peer) = listener.accept().await.map_err(|e| {
                error!("Failed to accept data connection: {}", e);
                DataChannelError::Accept(e)
            })?;
            drop(listener);
            info!("Passive data connection accepted from {}", peer);
            Ok(stream)
        }
    }
}
