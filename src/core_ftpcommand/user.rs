use crate::core_ftpcommand::reply::Reply;
use crate::helpers::send_response;
use crate::server::ServerContext;
use crate::session::Session;
use log::info;
use tokio::io::AsyncWrite;

/// Handles the USER FTP command.
///
/// Records the username and asks for the password. Any earlier login is
/// dropped, so a new USER always starts a fresh authentication.
pub async fn handle_user_command<W>(
    writer: &mut W,
    _context: &ServerContext,
    session: &mut Session,
    username: &str,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    info!("Received USER command with username: {}", username);

    session.username = Some(username.to_string());
    session.is_authenticated = false;

    send_response(writer, &Reply::new(331, "User name okay, need password.")).await
}
