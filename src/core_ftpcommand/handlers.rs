use crate::core_error::FtpError;
use crate::core_ftpcommand::ftpcommand::{FtpCommand, ParsedCommand};
use crate::core_ftpcommand::{
    cdup, cwd, feat, list, noop, pass, pwd, quit, retr, stor, syst, type_, user,
};
use crate::core_network::{pasv, port};
use crate::helpers::send_response;
use crate::server::ServerContext;
use crate::session::Session;
use log::{debug, warn};
use tokio::io::AsyncWrite;

/// What the session loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionControl {
    Continue,
    Quit,
}

/// Routes a parsed command to its handler.
///
/// Login-gated commands issued before login get a 530 and have no effect.
/// The returned error is always a control connection failure.
pub async fn dispatch_command<W>(
    writer: &mut W,
    context: &ServerContext,
    session: &mut Session,
    parsed: &ParsedCommand,
) -> Result<SessionControl, std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let Some(command) = parsed.command else {
        warn!("Unknown command: {:?}", parsed.verb);
        let reply = FtpError::UnknownCommand(parsed.verb.clone()).to_ftp_response();
        send_response(writer, &reply).await?;
        return Ok(SessionControl::Continue);
    };

    if command.requires_auth() && !session.is_authenticated {
        debug!("Rejected {:?} before login", command);
        send_response(writer, &FtpError::NotLoggedIn.to_ftp_response()).await?;
        return Ok(SessionControl::Continue);
    }

    let arg = parsed.arg.as_str();
    match command {
        FtpCommand::USER => user::handle_user_command(writer, context, session, arg).await?,
        FtpCommand::PASS => pass::handle_pass_command(writer, context, session, arg).await?,
        FtpCommand::PWD => pwd::handle_pwd_command(writer, context, session, arg).await?,
        FtpCommand::CWD => cwd::handle_cwd_command(writer, context, session, arg).await?,
        FtpCommand::CDUP => cdup::handle_cdup_command(writer, context, session, arg).await?,
        FtpCommand::TYPE => type_::handle_type_command(writer, context, session, arg).await?,
        FtpCommand::PORT => port::handle_port_command(writer, context, session, arg).await?,
        FtpCommand::PASV => pasv::handle_pasv_command(writer, context, session, arg).await?,
        FtpCommand::EPSV => pasv::handle_epsv_command(writer, context, session, arg).await?,
        FtpCommand::LIST => list::handle_list_command(writer, context, session, arg).await?,
        FtpCommand::NLST => list::handle_nlst_command(writer, context, session, arg).await?,
        FtpCommand::RETR => retr::handle_retr_command(writer, context, session, arg).await?,
        FtpCommand::STOR => stor::handle_stor_command(writer, context, session, arg).await?,
        FtpCommand::FEAT => feat::handle_feat_command(writer, arg).await?,
        FtpCommand::SYST => syst::handle_syst_command(writer).await?,
        FtpCommand::NOOP => noop::handle_noop_command(writer).await?,
        FtpCommand::QUIT => {
            quit::handle_quit_command(writer, session).await?;
            return Ok(SessionControl::Quit);
        }
    }

    Ok(SessionControl::Continue)
}
