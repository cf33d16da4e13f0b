use crate::core_error::FtpError;
use crate::core_fs::{confirm_within_root, resolve_path};
use crate::core_ftpcommand::reply::Reply;
use crate::core_network::data_channel::open_data_connection;
use crate::core_transfer::send_file;
use crate::helpers::send_response;
use crate::server::ServerContext;
use crate::session::Session;
use log::{error, info, warn};
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::AsyncWrite;

/// Handles the RETR (Retrieve) FTP command.
///
/// The target is checked before the data connection is opened, so a missing
/// file never costs a connection. The pending data mode is consumed whatever
/// the outcome.
///
/// # Arguments
///
/// * `writer` - The control connection.
/// * `context` - Shared server settings, for the download buffer size.
/// * `session` - The session issuing the command.
/// * `arg` - The name of the file to retrieve.
///
/// # Returns
///
/// An error only when the control connection fails.
pub async fn handle_retr_command<W>(
    writer: &mut W,
    context: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let mode = session.take_data_mode();

    if arg.trim().is_empty() {
        warn!("RETR command received with no arguments");
        let reply = FtpError::Syntax("RETR needs a path".into()).to_ftp_response();
        return send_response(writer, &reply).await;
    }

    let (resolved_path, mut file) = match open_source(session, arg).await {
        Ok(opened) => opened,
        Err(e) => {
            warn!("RETR {:?} refused: {}", arg, e);
            return send_response(writer, &e.to_ftp_response()).await;
        }
    };

    let mut data_stream = match open_data_connection(mode).await {
        Ok(stream) => stream,
        Err(e) => return send_response(writer, &FtpError::from(e).to_ftp_response()).await,
    };

    send_response(writer, &Reply::new(150, "Opening BINARY mode data connection.")).await?;
    info!("Sending file: {:?}", resolved_path);

    let reply = match send_file(&mut file, &mut data_stream, context.download_buffer_size).await {
        Ok(sent) => {
            info!(
                "File transfer completed successfully: {:?} ({} bytes)",
                resolved_path, sent
            );
            Reply::new(226, "Transfer complete.")
        }
        Err(e) => {
            error!("Error sending file {:?}: {}", resolved_path, e);
            FtpError::TransferAborted(e).to_ftp_response()
        }
    };
    drop(data_stream);

    send_response(writer, &reply).await
}

async fn open_source(session: &Session, arg: &str) -> Result<(PathBuf, File), FtpError> {
    let path = resolve_path(&session.base_path, &session.current_dir, arg)?;
    let path = confirm_within_root(&session.base_path, &path).await?;

    let metadata = tokio::fs::metadata(&path).await?;
    if !metadata.is_file() {
        return Err(FtpError::NotFound(arg.to_string()));
    }

    let file = File::open(&path).await?;
    Ok((path, file))
}
