use crate::core_error::{DataChannelError, FtpError};
use crate::core_fs::{confirm_within_root, resolve_path};
use crate::core_ftpcommand::reply::Reply;
use crate::core_network::data_channel::open_data_connection;
use crate::core_transfer::{read_listing, send_listing, ListEntry};
use crate::helpers::send_response;
use crate::server::ServerContext;
use crate::session::Session;
use log::{error, info, warn};
use std::io::ErrorKind;
use tokio::io::AsyncWrite;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListingStyle {
    Long,
    NamesOnly,
}

/// Handles the LIST FTP command: one `ls -l` style line per entry.
pub async fn handle_list_command<W>(
    writer: &mut W,
    context: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    handle_listing(writer, context, session, arg, ListingStyle::Long).await
}

/// Handles the NLST FTP command: bare names only.
pub async fn handle_nlst_command<W>(
    writer: &mut W,
    context: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    handle_listing(writer, context, session, arg, ListingStyle::NamesOnly).await
}

async fn handle_listing<W>(
    writer: &mut W,
    _context: &ServerContext,
    session: &mut Session,
    arg: &str,
    style: ListingStyle,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let mode = session.take_data_mode();
    if !mode.is_pending() {
        warn!("Listing requested without PORT or PASV");
        let reply = FtpError::from(DataChannelError::NoPendingMode).to_ftp_response();
        return send_response(writer, &reply).await;
    }

    // Enumerate before connecting so a bad directory never opens the data channel
    let entries = match collect_entries(session, arg).await {
        Ok(entries) => entries,
        Err(e) => {
            error!("Failed to list directory {:?}: {}", arg, e);
            return send_response(writer, &e.to_ftp_response()).await;
        }
    };

    let lines: Vec<String> = entries
        .iter()
        .map(|entry| match style {
            ListingStyle::Long => entry.to_list_line(),
            ListingStyle::NamesOnly => entry.to_nlst_line(),
        })
        .collect();

    let mut data_stream = match open_data_connection(mode).await {
        Ok(stream) => stream,
        Err(e) => return send_response(writer, &FtpError::from(e).to_ftp_response()).await,
    };

    send_response(writer, &Reply::new(150, "Here comes the directory listing.")).await?;

    let reply = match send_listing(&mut data_stream, &lines).await {
        Ok(()) => {
            info!("Directory listing sent successfully ({} entries).", lines.len());
            Reply::new(226, "Directory send OK.")
        }
        Err(e) => {
            error!("Failed to send directory listing: {:?}", e);
            FtpError::TransferAborted(e).to_ftp_response()
        }
    };
    drop(data_stream);

    send_response(writer, &reply).await
}

async fn collect_entries(session: &Session, arg: &str) -> Result<Vec<ListEntry>, FtpError> {
    let path_arg = strip_list_options(arg);
    let target = if path_arg.is_empty() {
        session.current_dir.clone()
    } else {
        resolve_path(&session.base_path, &session.current_dir, path_arg)?
    };
    let target = confirm_within_root(&session.base_path, &target).await?;

    read_listing(&target).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => FtpError::NotFound(path_arg.to_string()),
        _ => FtpError::FileSystem(e),
    })
}

/// Drops leading `ls` style flags such as `-la`, which many clients send.
fn strip_list_options(arg: &str) -> &str {
    let mut rest = arg.trim();
    while rest.starts_with('-') {
        rest = match rest.split_once(' ') {
            Some((_, tail)) => tail.trim_start(),
            None => "",
        };
    }
    rest
}
