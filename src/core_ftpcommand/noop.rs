use crate::core_ftpcommand::reply::Reply;
use crate::helpers::send_response;
use tokio::io::AsyncWrite;

pub async fn handle_noop_command<W>(writer: &mut W) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    send_response(writer, &Reply::new(200, "NOOP ok.")).await
}
