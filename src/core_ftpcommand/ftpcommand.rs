use std::fmt;

#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    USER,
    PASS,
    QUIT,
    PWD,
    CWD,
    CDUP,
    TYPE,
    PORT,
    PASV,
    EPSV,
    LIST,
    NLST,
    RETR,
    STOR,
    FEAT,
    SYST,
    NOOP,
}

impl FtpCommand {
    pub fn from_verb(verb: &str) -> Option<FtpCommand> {
        match verb.to_ascii_uppercase().as_str() {
            "USER" => Some(FtpCommand::USER),
            "PASS" => Some(FtpCommand::PASS),
            "QUIT" => Some(FtpCommand::QUIT),
            "PWD" => Some(FtpCommand::PWD),
            "CWD" => Some(FtpCommand::CWD),
            "CDUP" => Some(FtpCommand::CDUP),
            "TYPE" => Some(FtpCommand::TYPE),
            "PORT" => Some(FtpCommand::PORT),
            "PASV" => Some(FtpCommand::PASV),
            "EPSV" => Some(FtpCommand::EPSV),
            "LIST" => Some(FtpCommand::LIST),
            "NLST" => Some(FtpCommand::NLST),
            "RETR" => Some(FtpCommand::RETR),
            "STOR" => Some(FtpCommand::STOR),
            "FEAT" => Some(FtpCommand::FEAT),
            "SYST" => Some(FtpCommand::SYST),
            "NOOP" => Some(FtpCommand::NOOP),
            _ => None,
        }
    }

    /// False for the few commands accepted before login.
    pub fn requires_auth(&self) -> bool {
        !matches!(
            self,
            FtpCommand::USER | FtpCommand::PASS | FtpCommand::FEAT | FtpCommand::QUIT
        )
    }
}

/// One control line split into verb and argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub verb: String,
    pub command: Option<FtpCommand>,
    pub arg: String,
}

/// Splits a raw control line on its first space.
///
/// The verb is upper-cased; the argument is kept whole, spaces included.
pub fn parse_command(line: &str) -> ParsedCommand {
    let line = line.trim();
    let (verb, arg) = match line.split_once(' ') {
        Some((verb, arg)) => (verb, arg),
        None => (line, ""),
    };
    let verb = verb.to_ascii_uppercase();

    ParsedCommand {
        command: FtpCommand::from_verb(&verb),
        verb,
        arg: arg.to_string(),
    }
}

impl fmt::Display for ParsedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.command {
            Some(FtpCommand::PASS) => write!(f, "PASS ****"),
            _ if self.arg.is_empty() => write!(f, "{}", self.verb),
            _ => write!(f, "{} {}", self.verb, self.arg),
        }
    }
}
