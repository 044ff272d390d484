use crate::constants::MAX_STRSIZE;

/// One parsed FTP command line, see RFC 959.
///
/// The full keyword set is recognized so that unimplemented commands can be
/// answered with 502 instead of the generic syntax error. Parameter shape
/// depends on the keyword: a bounded free-form string, six raw bytes for a
/// PORT host-port pair, or a single type/structure/mode code character.
/// Anything that fails its shape constraint parses to `Invalid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FtpCommand {
    User(String),
    Pass(String),
    Acct(String),
    Cwd(String),
    Cdup,
    Smnt(String),
    Quit,
    Rein,
    /// Host address octets followed by the port's high and low byte.
    Port([u8; 6]),
    Pasv,
    Type(char),
    Stru(char),
    Mode(char),
    Retr(String),
    Stor(String),
    Stou,
    Appe(String),
    Allo(String),
    Rest(String),
    Rnfr(String),
    Rnto(String),
    Abor,
    Dele(String),
    Rmd(String),
    Mkd(String),
    Pwd,
    List(Option<String>),
    Nlst(Option<String>),
    Site(String),
    Syst,
    Stat(Option<String>),
    Help(Option<String>),
    Noop,
    Invalid,
}

impl FtpCommand {
    /// Parses a single command line. The caller strips the trailing CRLF;
    /// stray line endings are tolerated anyway. Keyword matching is
    /// case-insensitive per RFC 959.
    pub fn parse(line: &str) -> FtpCommand {
        let line = line.trim_end_matches(['\r', '\n']);
        let (keyword, arg) = match line.split_once(' ') {
            Some((keyword, arg)) => (keyword, Some(arg)),
            None => (line, None),
        };

        match keyword.to_ascii_uppercase().as_str() {
            "USER" => string_param(arg, FtpCommand::User),
            "PASS" => string_param(arg, FtpCommand::Pass),
            "ACCT" => string_param(arg, FtpCommand::Acct),
            "CWD" => string_param(arg, FtpCommand::Cwd),
            "CDUP" => FtpCommand::Cdup,
            "SMNT" => string_param(arg, FtpCommand::Smnt),
            "QUIT" => FtpCommand::Quit,
            "REIN" => FtpCommand::Rein,
            "PORT" => host_port_param(arg),
            "PASV" => FtpCommand::Pasv,
            "TYPE" => code_param(arg, FtpCommand::Type),
            "STRU" => code_param(arg, FtpCommand::Stru),
            "MODE" => code_param(arg, FtpCommand::Mode),
            "RETR" => string_param(arg, FtpCommand::Retr),
            "STOR" => string_param(arg, FtpCommand::Stor),
            "STOU" => FtpCommand::Stou,
            "APPE" => string_param(arg, FtpCommand::Appe),
            "ALLO" => string_param(arg, FtpCommand::Allo),
            "REST" => string_param(arg, FtpCommand::Rest),
            "RNFR" => string_param(arg, FtpCommand::Rnfr),
            "RNTO" => string_param(arg, FtpCommand::Rnto),
            "ABOR" => FtpCommand::Abor,
            "DELE" => string_param(arg, FtpCommand::Dele),
            "RMD" => string_param(arg, FtpCommand::Rmd),
            "MKD" => string_param(arg, FtpCommand::Mkd),
            "PWD" => FtpCommand::Pwd,
            "LIST" => opt_string_param(arg, FtpCommand::List),
            "NLST" => opt_string_param(arg, FtpCommand::Nlst),
            "SITE" => string_param(arg, FtpCommand::Site),
            "SYST" => FtpCommand::Syst,
            "STAT" => opt_string_param(arg, FtpCommand::Stat),
            "HELP" => opt_string_param(arg, FtpCommand::Help),
            "NOOP" => FtpCommand::Noop,
            _ => FtpCommand::Invalid,
        }
    }
}

/// A mandatory string parameter: the remainder of the line, bounded.
fn string_param(arg: Option<&str>, build: impl FnOnce(String) -> FtpCommand) -> FtpCommand {
    match arg {
        Some(s) if !s.is_empty() && s.len() <= MAX_STRSIZE => build(s.to_string()),
        _ => FtpCommand::Invalid,
    }
}

/// An optional string parameter (LIST, NLST, STAT, HELP).
fn opt_string_param(
    arg: Option<&str>,
    build: impl FnOnce(Option<String>) -> FtpCommand,
) -> FtpCommand {
    match arg {
        None => build(None),
        Some(s) if s.is_empty() => build(None),
        Some(s) if s.len() <= MAX_STRSIZE => build(Some(s.to_string())),
        Some(_) => FtpCommand::Invalid,
    }
}

/// Exactly six comma-separated decimal byte values (h1,h2,h3,h4,p1,p2).
fn host_port_param(arg: Option<&str>) -> FtpCommand {
    let Some(arg) = arg else {
        return FtpCommand::Invalid;
    };

    let mut numbers = [0u8; 6];
    let mut count = 0;
    for part in arg.split(',') {
        if count == numbers.len() {
            return FtpCommand::Invalid;
        }
        match part.parse::<u8>() {
            Ok(n) => {
                numbers[count] = n;
                count += 1;
            }
            Err(_) => return FtpCommand::Invalid,
        }
    }

    if count != numbers.len() {
        return FtpCommand::Invalid;
    }
    FtpCommand::Port(numbers)
}

/// A single type/structure/mode code character.
fn code_param(arg: Option<&str>, build: impl FnOnce(char) -> FtpCommand) -> FtpCommand {
    let Some(arg) = arg else {
        return FtpCommand::Invalid;
    };

    let mut chars = arg.chars();
    match (chars.next(), chars.next()) {
        (Some(code), None) => build(code),
        _ => FtpCommand::Invalid,
    }
}
