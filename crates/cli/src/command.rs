//! The subcommands the indicator knows how to issue.

use std::fmt;
use std::str::FromStr;

use crate::CliError;

/// A recognized `yandex-disk` subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subcommand {
    Setup,
    Start,
    Stop,
    Sync,
    Status,
    /// `-v`, prints the tool version.
    Version,
    Token,
    Publish,
    Unpublish,
}

impl Subcommand {
    /// The argument passed to the executable.
    pub fn as_arg(&self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Sync => "sync",
            Self::Status => "status",
            Self::Version => "-v",
            Self::Token => "token",
            Self::Publish => "publish",
            Self::Unpublish => "unpublish",
        }
    }

    /// Returns `true` if the command changes the daemon state and must not
    /// overlap with a status poll.
    pub fn is_state_changing(&self) -> bool {
        matches!(
            self,
            Self::Setup | Self::Start | Self::Stop | Self::Sync | Self::Token
        )
    }

    /// Commands that prompt on a terminal. They are never spawned from the
    /// indicator.
    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Setup | Self::Token)
    }
}

impl FromStr for Subcommand {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "setup" => Ok(Self::Setup),
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            "sync" => Ok(Self::Sync),
            "status" => Ok(Self::Status),
            "-v" => Ok(Self::Version),
            "token" => Ok(Self::Token),
            "publish" => Ok(Self::Publish),
            "unpublish" => Ok(Self::Unpublish),
            other => Err(CliError::InvalidCommand(other.to_string())),
        }
    }
}

impl fmt::Display for Subcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_arg())
    }
}
