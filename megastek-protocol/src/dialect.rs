use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::command::CommandType;
use crate::template;

/// Wire syntax spoken by a device.
///
/// Personal trackers use the alternative `$GPRS,<id>;W005,...;!` syntax.
/// Vehicle trackers use numeric opcodes in a `$,<id>,0013,...;` frame closed
/// by an XOR checksum and CRLF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Alternative,
    Vehicle,
}

impl Dialect {
    pub fn from_alternative(alternative: bool) -> Self {
        if alternative {
            Self::Alternative
        } else {
            Self::Vehicle
        }
    }

    pub fn is_alternative(self) -> bool {
        self == Self::Alternative
    }

    /// Returns true if this dialect can carry the given command type.
    pub fn supports(self, kind: CommandType) -> bool {
        kind == CommandType::Custom || template::lookup(self, kind).is_some()
    }

    /// Command types this dialect can carry, in declaration order.
    pub fn supported_commands(self) -> Vec<CommandType> {
        CommandType::ALL
            .into_iter()
            .filter(|kind| self.supports(*kind))
            .collect()
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alternative => write!(f, "alternative"),
            Self::Vehicle => write!(f, "vehicle"),
        }
    }
}

/// Resolves the dialect flag of a device.
pub trait DialectResolver {
    /// Returns true if the device speaks the alternative dialect.
    fn is_alternative(&self, device_id: &str) -> bool;

    fn resolve(&self, device_id: &str) -> Dialect {
        Dialect::from_alternative(self.is_alternative(device_id))
    }
}

/// Every device speaks the same dialect.
impl DialectResolver for Dialect {
    fn is_alternative(&self, _device_id: &str) -> bool {
        Dialect::is_alternative(*self)
    }
}

/// Protocol-wide dialect setting with per-device overrides.
///
/// A device override wins over the protocol default.
#[derive(Debug, Clone, Default)]
pub struct DialectConfig {
    /// Protocol default; `false` selects the vehicle dialect.
    pub alternative: bool,
    /// Per-device alternative flag, keyed by device id.
    pub devices: HashMap<String, bool>,
}

impl DialectConfig {
    pub fn new(alternative: bool) -> Self {
        Self {
            alternative,
            devices: HashMap::new(),
        }
    }

    pub fn with_device(mut self, device_id: impl Into<String>, alternative: bool) -> Self {
        self.devices.insert(device_id.into(), alternative);
        self
    }
}

impl DialectResolver for DialectConfig {
    fn is_alternative(&self, device_id: &str) -> bool {
        self.devices
            .get(device_id)
            .copied()
            .unwrap_or(self.alternative)
    }
}
