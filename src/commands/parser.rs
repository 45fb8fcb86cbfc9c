//! Command parsing.

use thiserror::Error;

use crate::cards::{ParseNameError, TokenKind};
use crate::core::EngineConfig;

/// Why a line of chat is not an executable command.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("'{0}' is not a command")]
    NotACommand(String),

    #[error("unknown command '{0}'")]
    UnknownVerb(String),

    #[error("/token needs a token kind")]
    MissingToken,

    #[error(transparent)]
    InvalidToken(#[from] ParseNameError),

    #[error("{0} tokens cannot be set by command")]
    TokenNotAllowed(TokenKind),
}

/// A parsed chat command. Counts are already defaulted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Draw { count: u32 },
    Discard { count: u32 },
    CancelPrompt,
    Token { kind: TokenKind, count: i64 },
    Forge,
    Unforge,
    /// The raw house argument; validated when executed.
    ActiveHouse(Option<String>),
    StopClocks,
    StartClocks,
    ModifyClock { seconds: i64 },
    DisconnectMe,
    Manual,
}

impl Command {
    /// Parse one chat line.
    ///
    /// ```
    /// use keyforge_pipeline::cards::TokenKind;
    /// use keyforge_pipeline::commands::Command;
    /// use keyforge_pipeline::core::EngineConfig;
    ///
    /// let config = EngineConfig::default();
    /// assert_eq!(Command::parse("/draw 3", &config), Ok(Command::Draw { count: 3 }));
    /// assert_eq!(Command::parse("/draw -2", &config), Ok(Command::Draw { count: 1 }));
    /// assert_eq!(
    ///     Command::parse("/token Stun", &config),
    ///     Ok(Command::Token { kind: TokenKind::Stun, count: 1 })
    /// );
    /// ```
    pub fn parse(text: &str, config: &EngineConfig) -> Result<Self, CommandError> {
        let mut words = text.split_whitespace();
        let verb = words.next().unwrap_or_default();
        if !verb.starts_with('/') {
            return Err(CommandError::NotACommand(text.to_string()));
        }
        let first = words.next();
        let second = words.next();

        let count = |arg: Option<&str>, default: u32| {
            u32::try_from(number_or_default(arg, i64::from(default))).unwrap_or(default)
        };

        let command = match verb {
            "/draw" => Command::Draw {
                count: count(first, config.default_draw),
            },
            "/discard" => Command::Discard {
                count: count(first, config.default_discard),
            },
            "/cancel-prompt" => Command::CancelPrompt,
            "/token" => {
                let kind: TokenKind = first.ok_or(CommandError::MissingToken)?.parse()?;
                if !config.allows_token(kind) {
                    return Err(CommandError::TokenNotAllowed(kind));
                }
                Command::Token {
                    kind,
                    count: number_or_default(second, config.default_token_count),
                }
            }
            "/forge" => Command::Forge,
            "/unforge" => Command::Unforge,
            "/active-house" => Command::ActiveHouse(first.map(str::to_string)),
            "/stop-clocks" => Command::StopClocks,
            "/start-clocks" => Command::StartClocks,
            "/modify-clock" => Command::ModifyClock {
                seconds: number_or_default(first, config.default_clock_adjustment),
            },
            "/disconnectme" => Command::DisconnectMe,
            "/manual" => Command::Manual,
            other => return Err(CommandError::UnknownVerb(other.to_string())),
        };
        Ok(command)
    }
}

/// Read a leading integer from `arg`, ignoring trailing text. Missing,
/// unparsable or negative input yields `default`.
///
/// ```
/// use keyforge_pipeline::commands::number_or_default;
///
/// assert_eq!(number_or_default(Some("12abc"), 1), 12);
/// assert_eq!(number_or_default(Some("x"), 1), 1);
/// assert_eq!(number_or_default(Some("-3"), 1), 1);
/// assert_eq!(number_or_default(None, 60), 60);
/// ```
#[must_use]
pub fn number_or_default(arg: Option<&str>, default: i64) -> i64 {
    let Some(arg) = arg else {
        return default;
    };
    let arg = arg.trim_start();
    let (negative, digits) = match arg.as_bytes().first() {
        Some(b'-') => (true, &arg[1..]),
        Some(b'+') => (false, &arg[1..]),
        _ => (false, arg),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    match digits[..end].parse::<i64>() {
        Ok(0) => 0,
        Ok(_) if negative => default,
        Ok(n) => n,
        Err(_) => default,
    }
}
