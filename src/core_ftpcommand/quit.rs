use crate::core_ftpcommand::reply::Reply;
use crate::helpers::send_response;
use crate::session::Session;
use log::info;
use tokio::io::AsyncWrite;

/// Handles the QUIT FTP command.
///
/// Sends the goodbye reply and releases any pending passive listener. The
/// caller ends the session loop, which closes the control connection.
pub async fn handle_quit_command<W>(writer: &mut W, session: &mut Session) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    info!("Received QUIT command. Closing connection.");
    drop(session.take_data_mode());
    send_response(writer, &Reply::new(221, "Goodbye.")).await
}
