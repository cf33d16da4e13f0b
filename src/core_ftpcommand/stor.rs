use crate::core_error::FtpError;
use crate::core_fs::{confirm_within_root, resolve_path};
use crate::core_ftpcommand::reply::Reply;
use crate::core_network::data_channel::open_data_connection;
use crate::core_transfer::receive_file;
use crate::helpers::send_response;
use crate::server::ServerContext;
use crate::session::Session;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWrite};

/// Handles the STOR (Store File) FTP command.
///
/// The upload is written to a newly created, or truncated, file at the
/// resolved path. The file is only created once the data connection is up.
pub async fn handle_stor_command<W>(
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
        warn!("STOR command received with no arguments");
        let reply = FtpError::Syntax("STOR needs a path".into()).to_ftp_response();
        return send_response(writer, &reply).await;
    }

    let file_path = match resolve_target(session, arg).await {
        Ok(path) => path,
        Err(e) => {
            warn!("STOR {:?} refused: {}", arg, e);
            return send_response(writer, &e.to_ftp_response()).await;
        }
    };
    info!("Received STOR command for {:?}", file_path);

    let mut data_stream = match open_data_connection(mode).await {
        Ok(stream) => stream,
        Err(e) => return send_response(writer, &FtpError::from(e).to_ftp_response()).await,
    };

    let mut file = match File::create(&file_path).await {
        Ok(file) => file,
        Err(e) => {
            error!("Failed to create file: {:?}, error: {}", file_path, e);
            return send_response(writer, &FtpError::FileSystem(e).to_ftp_response()).await;
        }
    };

    send_response(writer, &Reply::new(150, "Ok to send data.")).await?;

    let reply = finish_upload(&mut data_stream, &mut file, &file_path, context.upload_buffer_size).await;
    drop(data_stream);

    send_response(writer, &reply).await
}

/// Drains the data connection into `file` and picks the closing reply.
async fn finish_upload<R>(data_stream: &mut R, file: &mut File, file_path: &Path, buffer_size: usize) -> Reply
where
    R: AsyncRead + Unpin,
{
    match receive_file(data_stream, file, buffer_size).await {
        Ok(received) => {
            info!("File stored successfully: {:?} ({} bytes)", file_path, received);
            Reply::new(226, "Transfer complete.")
        }
        Err(e) => {
            error!("Error receiving file {:?}: {}", file_path, e);
            FtpError::TransferAborted(e).to_ftp_response()
        }
    }
}

/// Resolves the upload target and makes sure neither its parent nor an
/// existing entry at that name leads outside the root.
async fn resolve_target(session: &Session, arg: &str) -> Result<PathBuf, FtpError> {
    let path = resolve_path(&session.base_path, &session.current_dir, arg)?;
    if path == session.base_path {
        return Err(FtpError::NotFound(arg.to_string()));
    }

    if let Some(parent) = path.parent() {
        confirm_within_root(&session.base_path, parent).await?;
    }
    if tokio::fs::symlink_metadata(&path).await.is_ok() {
        confirm_within_root(&session.base_path, &path).await?;
    }

    Ok(path)
}
