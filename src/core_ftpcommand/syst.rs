use crate::core_ftpcommand::reply::Reply;
use crate::helpers::send_response;
use tokio::io::AsyncWrite;

/// Handles the SYST (System) FTP command.
pub async fn handle_syst_command<W>(writer: &mut W) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    send_response(writer, &Reply::new(215, "UNIX Type: L8")).await
}
