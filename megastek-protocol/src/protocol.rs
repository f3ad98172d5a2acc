use crate::checksum::append_checksum;
use crate::command::CommandType;
use crate::dialect::Dialect;

/// Alternative dialect envelope prefix.
pub const GPRS_PREFIX: &str = "$GPRS,";
/// Alternative dialect terminator.
pub const GPRS_TERMINATOR: &str = ";!";
/// Vehicle dialect envelope prefix.
pub const VEHICLE_PREFIX: &str = "$,";
/// Vehicle dialect body terminator, followed by the checksum.
pub const VEHICLE_TERMINATOR: &str = ";";
/// Legacy SMS envelope marker.
pub const SMS_MARKER: &str = "$SMS";
pub const CRLF: &str = "\r\n";

/// Written to a device as soon as its connection opens.
pub const GREETING: &str = "$GPRS,;!";

/// Command types the device family accepts over GPRS, in either dialect.
pub const SUPPORTED_COMMANDS: [CommandType; 15] = CommandType::ALL;

/// An encoded command, ready for the transport.
///
/// Wire formats:
/// - `Gprs`: `$GPRS,<id>;<body>`, the body carries its own `;!`.
/// - `Vehicle`: `$,<id>,<body><XX>\r\n`, the body ends with `;` and `XX` is
///   the XOR checksum.
/// - `Verbatim`: sent exactly as held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Gprs { device_id: String, body: String },
    Vehicle { device_id: String, body: String },
    Verbatim(String),
}

impl Frame {
    /// Wrap a template body (`<opcode>[,args]`) in the dialect's envelope.
    pub fn templated(dialect: Dialect, device_id: &str, body: String) -> Self {
        match dialect {
            Dialect::Alternative => Self::Gprs {
                device_id: device_id.to_string(),
                body: body + GPRS_TERMINATOR,
            },
            Dialect::Vehicle => Self::Vehicle {
                device_id: device_id.to_string(),
                body: body + VEHICLE_TERMINATOR,
            },
        }
    }

    /// Serialize the frame to the string handed to the transport.
    pub fn to_wire(&self) -> String {
        match self {
            Self::Gprs { device_id, body } => format!("{GPRS_PREFIX}{device_id};{body}"),
            Self::Vehicle { device_id, body } => {
                append_checksum(&format!("{VEHICLE_PREFIX}{device_id},{body}"))
            }
            Self::Verbatim(text) => text.clone(),
        }
    }

    /// Returns true if the frame carries a checksum.
    pub fn is_checksummed(&self) -> bool {
        matches!(self, Self::Vehicle { .. })
    }
}
