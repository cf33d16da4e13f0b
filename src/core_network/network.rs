use crate::constants::{ACCEPT_RETRY_DELAY, MAX_COMMAND_LINE};
use crate::core_error::FtpError;
use crate::core_ftpcommand::ftpcommand::parse_command;
use crate::core_ftpcommand::handlers::{dispatch_command, SessionControl};
use crate::core_ftpcommand::reply::Reply;
use crate::helpers::send_response;
use crate::server::ServerContext;
use crate::session::Session;
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// Binds the control port and serves connections until accepting fails.
pub async fn start_server(addr: SocketAddr, context: Arc<ServerContext>) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind control port {}", addr))?;
    info!("Server listening on {}", listener.local_addr()?);

    serve(listener, context).await
}

/// Accept loop: one task per control connection.
pub async fn serve(listener: TcpListener, context: Arc<ServerContext>) -> Result<()> {
    loop {
        let (socket, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Error accepting connection: {}", e);
                tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                continue;
            }
        };
        info!("New connection from {}", addr);

        let context = Arc::clone(&context);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, context).await {
                error!("Connection error for {}: {}", addr, e);
            }
            info!("Connection closed for {}", addr);
        });
    }
}

/// Serves one control connection from greeting to QUIT or disconnect.
///
/// Commands are handled strictly one after the other; the next line is not
/// read until the current command, data phase included, has replied.
pub async fn handle_connection(socket: TcpStream, context: Arc<ServerContext>) -> std::io::Result<()> {
    let local_ip = socket.local_addr()?.ip();
    let (read_half, mut writer) = socket.into_split();
    let mut reader = BufReader::new(read_half);
    let mut session = Session::new(context.root.clone(), local_ip);

    send_response(&mut writer, &Reply::new(220, context.banner.as_str())).await?;

    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        let n = (&mut reader)
            .take(MAX_COMMAND_LINE as u64)
            .read_until(b'\n', &mut buffer)
            .await?;
        if n == 0 {
            info!("Client disconnected");
            break;
        }
        if n == MAX_COMMAND_LINE && !buffer.ends_with(b"\n") {
            warn!("Command line exceeds {} bytes, closing session", MAX_COMMAND_LINE);
            let reply = FtpError::LineTooLong(MAX_COMMAND_LINE).to_ftp_response();
            send_response(&mut writer, &reply).await?;
            break;
        }

        let line = String::from_utf8_lossy(&buffer);
        let parsed = parse_command(&line);
        debug!("Received command: {}", parsed);

        match dispatch_command(&mut writer, &context, &mut session, &parsed).await? {
            SessionControl::Continue => {}
            SessionControl::Quit => break,
        }
    }

    // Dropping the session closes a passive listener that was never used
    if session.data_mode.is_pending() {
        debug!("Releasing unused data mode");
    }
    Ok(())
}
