// src/core_ftpcommand/pwd.rs
use crate::core_ftpcommand::reply::Reply;
use crate::helpers::send_response;
use crate::server::ServerContext;
use crate::session::Session;
use tokio::io::AsyncWrite;

pub async fn handle_pwd_command<W>(
    writer: &mut W,
    _context: &ServerContext,
    session: &mut Session,
    _arg: &str,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let response = format!("{} is the current directory.", session.quoted_virtual_dir());
    send_response(writer, &Reply::new(257, response)).await
}
