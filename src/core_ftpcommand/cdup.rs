use crate::core_ftpcommand::cwd::change_directory;
use crate::core_ftpcommand::reply::Reply;
use crate::helpers::send_response;
use crate::server::ServerContext;
use crate::session::Session;
use log::{info, warn};
use tokio::io::AsyncWrite;

/// Handles CDUP, which is `CWD ..` under another name.
pub async fn handle_cdup_command<W>(
    writer: &mut W,
    _context: &ServerContext,
    session: &mut Session,
    _arg: &str,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let reply = match change_directory(session, "..").await {
        Ok(()) => {
            info!("Directory successfully changed to: {}", session.virtual_dir());
            Reply::new(
                250,
                format!("Directory successfully changed to {}.", session.quoted_virtual_dir()),
            )
        }
        Err(e) => {
            warn!("CDUP failed: {}", e);
            e.to_ftp_response()
        }
    };

    send_response(writer, &reply).await
}
