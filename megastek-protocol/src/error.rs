use thiserror::Error;

use crate::command::CommandType;
use crate::dialect::Dialect;

pub type Result<T> = std::result::Result<T, EncodeError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("command {command} is not supported by the {dialect} dialect")]
    UnsupportedCommand {
        command: CommandType,
        dialect: Dialect,
    },

    #[error("invalid parameter `{key}`: {reason}")]
    InvalidParameter { key: &'static str, reason: String },

    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),
}

impl EncodeError {
    pub(crate) fn missing(key: &'static str) -> Self {
        Self::InvalidParameter {
            key,
            reason: "missing".to_string(),
        }
    }

    pub(crate) fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            key,
            reason: reason.into(),
        }
    }
}
