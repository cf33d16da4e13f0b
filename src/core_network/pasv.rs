use crate::core_error::{DataChannelError, FtpError};
use crate::core_ftpcommand::reply::Reply;
use crate::helpers::send_response;
use crate::server::ServerContext;
use crate::session::{DataMode, Session};
use log::{debug, info, warn};
use std::net::{IpAddr, Ipv4Addr};
use tokio::io::AsyncWrite;
use tokio::net::TcpListener;

/// Sets up a passive mode listener on an ephemeral port of `bind_ip`.
pub async fn setup_pasv_listener(bind_ip: IpAddr) -> Result<TcpListener, DataChannelError> {
    let listener = TcpListener::bind((bind_ip, 0))
        .await
        .map_err(DataChannelError::Bind)?;
    let addr = listener.local_addr().map_err(DataChannelError::Bind)?;
    debug!("Passive listener set up on {}", addr);
    Ok(listener)
}

pub fn pasv_reply(ip: Ipv4Addr, port: u16) -> Reply {
    let [h1, h2, h3, h4] = ip.octets();
    Reply::new(
        227,
        format!(
            "Entering Passive Mode ({},{},{},{},{},{}).",
            h1,
            h2,
            h3,
            h4,
            port / 256,
            port % 256
        ),
    )
}

pub fn epsv_reply(port: u16) -> Reply {
    Reply::new(229, format!("Entering Extended Passive Mode (|||{}|)", port))
}

/// Address advertised in a 227 reply.
fn advertised_ipv4(context: &ServerContext, local_ip: IpAddr) -> Result<Ipv4Addr, DataChannelError> {
    if let Some(pasv_address) = context.pasv_address {
        return Ok(pasv_address);
    }
    match local_ip {
        IpAddr::V4(ip) => Ok(ip),
        IpAddr::V6(ip) => ip
            .to_ipv4_mapped()
            .ok_or(DataChannelError::NoIpv4Address(local_ip)),
    }
}

/// Replaces the session's data mode with a fresh passive listener.
///
/// The new listener is bound before the old one is dropped, so the two
/// ports always differ. The old listener is closed even when binding fails.
async fn enter_passive_mode(session: &mut Session) -> Result<u16, DataChannelError> {
    let bound = setup_pasv_listener(session.local_ip).await;
    session.data_mode = DataMode::None;

    let listener = bound?;
    let port = listener.local_addr().map_err(DataChannelError::Bind)?.port();
    session.data_mode = DataMode::Passive(listener);
    Ok(port)
}

/// Handles the PASV FTP command.
pub async fn handle_pasv_command<W>(
    writer: &mut W,
    context: &ServerContext,
    session: &mut Session,
    _arg: &str,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let reply = match advertised_ipv4(context, session.local_ip) {
        Ok(ip) => match enter_passive_mode(session).await {
            Ok(port) => {
                info!("PASV listening on port {}, advertising {}", port, ip);
                pasv_reply(ip, port)
            }
            Err(e) => {
                warn!("PASV failed: {}", e);
                FtpError::from(e).to_ftp_response()
            }
        },
        Err(e) => {
            warn!("PASV failed: {}", e);
            session.data_mode = DataMode::None;
            FtpError::from(e).to_ftp_response()
        }
    };

    send_response(writer, &reply).await
}

/// Handles the EPSV FTP command. Same as PASV, but only the port is sent back.
pub async fn handle_epsv_command<W>(
    writer: &mut W,
    _context: &ServerContext,
    session: &mut Session,
    _arg: &str,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let reply = match enter_passive_mode(session).await {
        Ok(port) => {
            info!("EPSV listening on port {}", port);
            epsv_reply(port)
        }
        Err(e) => {
            warn!("EPSV failed: {}", e);
            FtpError::from(e).to_ftp_response()
        }
    };

    send_response(writer, &reply).await
}
