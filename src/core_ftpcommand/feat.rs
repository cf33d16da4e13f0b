use crate::core_ftpcommand::reply::Reply;
use crate::helpers::send_response;
use log::info;
use tokio::io::AsyncWrite;

const FEATURES: &[&str] = &["PASV", "EPSV", "LIST", "NLST"];

/// Handles the FEAT (Feature) FTP command. Allowed before login.
pub async fn handle_feat_command<W>(writer: &mut W, _arg: &str) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let mut lines = vec!["Features:".to_string()];
    lines.extend(FEATURES.iter().map(|feature| format!(" {}", feature)));
    lines.push("End".to_string());

    info!("Responding to FEAT command with supported features.");
    send_response(writer, &Reply::multiline(211, lines)).await
}
