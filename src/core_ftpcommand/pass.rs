use crate::core_error::FtpError;
use crate::core_ftpcommand::reply::Reply;
use crate::helpers::send_response;
use crate::server::ServerContext;
use crate::session::Session;
use log::{info, warn};
use tokio::io::AsyncWrite;

/// Handles the PASS FTP command against the username recorded by USER.
pub async fn handle_pass_command<W>(
    writer: &mut W,
    context: &ServerContext,
    session: &mut Session,
    password: &str,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let Some(username) = session.username.clone() else {
        warn!("PASS received before USER");
        return send_response(writer, &FtpError::UserFirst.to_ftp_response()).await;
    };

    if context.credentials.verify(&username, password) {
        session.is_authenticated = true;
        info!("User {} logged in", username);
        send_response(writer, &Reply::new(230, "User logged in, proceed.")).await
    } else {
        session.is_authenticated = false;
        warn!("Failed login for user {}", username);
        send_response(writer, &FtpError::LoginIncorrect(username).to_ftp_response()).await
    }
}
