use crate::core_ftpcommand::reply::Reply;
use log::{debug, error};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Sends a reply on the control connection.
///
/// A failure here means the control connection is gone, so callers
/// propagate it and the session ends.
pub async fn send_response<W>(writer: &mut W, reply: &Reply) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    if let Err(e) = writer.write_all(reply.to_wire().as_bytes()).await {
        error!("Failed to send reply {}: {}", reply.code, e);
        return Err(e);
    }
    writer.flush().await?;
    debug!("Sent: {}", reply);
    Ok(())
}
