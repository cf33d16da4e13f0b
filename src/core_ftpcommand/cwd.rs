use crate::core_error::FtpError;
use crate::core_fs::{confirm_within_root, resolve_path};
use crate::core_ftpcommand::reply::Reply;
use crate::helpers::send_response;
use crate::server::ServerContext;
use crate::session::Session;
use log::{info, warn};
use tokio::io::AsyncWrite;

/// Moves the session to `arg` if it is an existing directory under the root.
/// On any error the current directory is left as it was.
pub async fn change_directory(session: &mut Session, arg: &str) -> Result<(), FtpError> {
    let target = resolve_path(&session.base_path, &session.current_dir, arg)?;
    let target = confirm_within_root(&session.base_path, &target).await?;

    let metadata = tokio::fs::metadata(&target).await?;
    if !metadata.is_dir() {
        return Err(FtpError::NotADirectory(arg.to_string()));
    }

    session.current_dir = target;
    Ok(())
}

pub async fn handle_cwd_command<W>(
    writer: &mut W,
    _context: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    if arg.trim().is_empty() {
        warn!("CWD command received with no arguments");
        let reply = FtpError::Syntax("CWD needs a path".into()).to_ftp_response();
        return send_response(writer, &reply).await;
    }

    let reply = match change_directory(session, arg).await {
        Ok(()) => {
            info!("Directory successfully changed to: {}", session.virtual_dir());
            Reply::new(
                250,
                format!("Directory successfully changed to {}.", session.quoted_virtual_dir()),
            )
        }
        Err(e) => {
            warn!("Failed to change directory to {:?}: {}", arg, e);
            e.to_ftp_response()
        }
    };

    send_response(writer, &reply).await
}
