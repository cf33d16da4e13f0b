use crate::core_error::FtpError;
use crate::core_ftpcommand::reply::Reply;
use crate::helpers::send_response;
use crate::server::ServerContext;
use crate::session::{DataMode, Session};
use log::{info, warn};
use std::net::{Ipv4Addr, SocketAddrV4};
use tokio::io::AsyncWrite;

/// Parses the `h1,h2,h3,h4,p1,p2` argument of PORT.
pub fn parse_port_argument(arg: &str) -> Result<SocketAddrV4, FtpError> {
    let parts: Vec<&str> = arg.trim().split(',').collect();
    if parts.len() != 6 {
        return Err(FtpError::Syntax(format!(
            "PORT expects 6 fields, got {}",
            parts.len()
        )));
    }

    let octets = parts
        .iter()
        .map(|part| part.trim().parse::<u8>())
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|e| FtpError::Syntax(format!("invalid PORT field: {}", e)))?;

    let ip = Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]);
    let port = u16::from(octets[4]) * 256 + u16::from(octets[5]);
    Ok(SocketAddrV4::new(ip, port))
}

/// Handles the PORT (Active Mode) FTP command.
///
/// Only records the address; the connection is dialed by the next transfer
/// command. A malformed argument leaves the pending data mode untouched.
pub async fn handle_port_command<W>(
    writer: &mut W,
    _context: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let addr = match parse_port_argument(arg) {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Rejected PORT {:?}: {}", arg, e);
            return send_response(writer, &e.to_ftp_response()).await;
        }
    };

    info!("Received PORT command with address {}", addr);
    session.data_mode = DataMode::Active(addr);
    send_response(writer, &Reply::new(200, "PORT command successful.")).await
}
