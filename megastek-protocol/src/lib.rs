pub mod checksum;
pub mod command;
pub mod custom;
pub mod dialect;
pub mod encoder;
pub mod error;
pub mod format;
pub mod protocol;
pub mod template;
pub mod timezone;

pub use command::{AttributeValue, Command, CommandType};
pub use dialect::{Dialect, DialectConfig, DialectResolver};
pub use encoder::{Encoder, encode, encode_frame};
pub use error::{EncodeError, Result};
pub use protocol::Frame;
#[cfg(feature = "tz")]
pub use timezone::IanaTimezones;
pub use timezone::{FixedOffsets, TimezoneResolver};
