use crate::core_error::FtpError;
use crate::core_ftpcommand::reply::Reply;
use crate::helpers::send_response;
use crate::server::ServerContext;
use crate::session::Session;
use log::{debug, warn};
use tokio::io::AsyncWrite;

/// Handles the TYPE FTP command.
///
/// ASCII and Image are acknowledged, nothing else is. Transfers are always
/// binary, so the choice is not stored.
pub async fn handle_type_command<W>(
    writer: &mut W,
    _context: &ServerContext,
    _session: &mut Session,
    arg: &str,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let primary_type = arg.trim().to_ascii_uppercase();

    let reply = match primary_type.as_str() {
        "A" | "I" => {
            debug!("Transfer type set to {}", primary_type);
            Reply::new(200, format!("Type set to {}.", primary_type))
        }
        _ => {
            warn!("Unsupported TYPE argument: {:?}", arg);
            FtpError::Syntax(format!("unsupported type {:?}", arg)).to_ftp_response()
        }
    };

    send_response(writer, &reply).await
}
