use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EncodeError, Result};

/// Named command parameters.
pub mod key {
    /// Server host for `setConnection`.
    pub const SERVER: &str = "server";
    /// Server port for `setConnection`.
    pub const PORT: &str = "port";
    /// Reporting period in seconds.
    pub const FREQUENCY: &str = "frequency";
    /// Slot number (SOS phone slot, output line).
    pub const INDEX: &str = "index";
    /// Phone number.
    pub const PHONE: &str = "phone";
    /// IANA timezone name.
    pub const TIMEZONE: &str = "timezone";
    /// Generic payload (alarm level, silence window, custom text, ...).
    pub const DATA: &str = "data";
    /// On/off switch.
    pub const ENABLE: &str = "enable";
}

/// The kind of operator command to send to a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommandType {
    /// Point the device at a new server and port.
    SetConnection,
    /// Stop periodic position reports.
    PositionStop,
    /// Report positions every `frequency` seconds.
    PositionPeriodic,
    /// Store an SOS phone number in slot `index`.
    SosNumber,
    /// Set the device clock offset.
    SetTimezone,
    /// Ask for a status report.
    GetDeviceStatus,
    /// Configure the vibration alarm.
    AlarmVibration,
    /// Quiet hours window.
    SilenceTime,
    /// Ask for a single position report.
    PositionSingle,
    /// Restore factory settings.
    FactoryReset,
    /// Restart the device.
    RebootDevice,
    /// Overspeed alarm threshold.
    AlarmSpeed,
    /// Toggle power saving mode.
    ModePowerSaving,
    /// Switch a digital output.
    OutputControl,
    /// Operator-entered raw command text.
    Custom,
}

impl CommandType {
    pub const ALL: [CommandType; 15] = [
        Self::SetConnection,
        Self::PositionStop,
        Self::PositionPeriodic,
        Self::SosNumber,
        Self::SetTimezone,
        Self::GetDeviceStatus,
        Self::AlarmVibration,
        Self::SilenceTime,
        Self::PositionSingle,
        Self::FactoryReset,
        Self::RebootDevice,
        Self::AlarmSpeed,
        Self::ModePowerSaving,
        Self::OutputControl,
        Self::Custom,
    ];

    /// Wire name of the command type, as used by command records.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SetConnection => "setConnection",
            Self::PositionStop => "positionStop",
            Self::PositionPeriodic => "positionPeriodic",
            Self::SosNumber => "sosNumber",
            Self::SetTimezone => "setTimezone",
            Self::GetDeviceStatus => "getDeviceStatus",
            Self::AlarmVibration => "alarmVibration",
            Self::SilenceTime => "silenceTime",
            Self::PositionSingle => "positionSingle",
            Self::FactoryReset => "factoryReset",
            Self::RebootDevice => "rebootDevice",
            Self::AlarmSpeed => "alarmSpeed",
            Self::ModePowerSaving => "modePowerSaving",
            Self::OutputControl => "outputControl",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandType {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| EncodeError::invalid("type", format!("unknown command type {s:?}")))
    }
}

/// A loosely typed parameter value.
///
/// Whole-number floats such as `60.0` deserialize as integers; other floats
/// keep their text form and fail integer coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, from = "RawValue")]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

/// Wire shapes accepted for an [`AttributeValue`].
#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl From<RawValue> for AttributeValue {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Bool(b) => Self::Bool(b),
            RawValue::Int(n) => Self::Int(n),
            RawValue::Float(f) if is_whole(f) => Self::Int(f as i64),
            RawValue::Float(f) => Self::Str(f.to_string()),
            RawValue::Str(s) => Self::Str(s),
        }
    }
}

fn is_whole(f: f64) -> bool {
    f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl AttributeValue {
    /// Coerce to an integer. Decimal strings are accepted.
    pub fn as_integer(&self, key: &'static str) -> Result<i64> {
        match self {
            Self::Int(n) => Ok(*n),
            Self::Str(s) => s
                .trim()
                .parse()
                .map_err(|_| EncodeError::invalid(key, format!("expected an integer, got {s:?}"))),
            Self::Bool(b) => Err(EncodeError::invalid(
                key,
                format!("expected an integer, got {b}"),
            )),
        }
    }

    /// Coerce to a boolean. `"true"`/`"false"` and `0`/`1` are accepted.
    pub fn as_bool(&self, key: &'static str) -> Result<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            Self::Int(0) => Ok(false),
            Self::Int(1) => Ok(true),
            Self::Str(s) if s.eq_ignore_ascii_case("true") => Ok(true),
            Self::Str(s) if s.eq_ignore_ascii_case("false") => Ok(false),
            other => Err(EncodeError::invalid(
                key,
                format!("expected a boolean, got {other}"),
            )),
        }
    }
}

/// A command addressed to one device.
///
/// Parameters are not validated on construction; each dialect checks the
/// ones it needs when the command is encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    /// Device identifier as it appears in the frame envelope (usually the IMEI).
    pub device_id: String,
    #[serde(rename = "type")]
    pub kind: CommandType,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl Command {
    pub fn new(device_id: impl Into<String>, kind: CommandType) -> Self {
        Self {
            device_id: device_id.into(),
            kind,
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style variant of [`Command::set`].
    pub fn with(mut self, key: &str, value: impl Into<AttributeValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<AttributeValue>) {
        self.attributes.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Required parameter, any kind.
    pub fn value(&self, key: &'static str) -> Result<&AttributeValue> {
        self.get(key).ok_or_else(|| EncodeError::missing(key))
    }

    /// Required parameter in its string form.
    pub fn string(&self, key: &'static str) -> Result<String> {
        self.value(key).map(ToString::to_string)
    }

    pub fn integer(&self, key: &'static str) -> Result<i64> {
        self.value(key)?.as_integer(key)
    }

    pub fn boolean(&self, key: &'static str) -> Result<bool> {
        self.value(key)?.as_bool(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names_roundtrip() {
        for kind in CommandType::ALL {
            assert_eq!(kind.as_str().parse::<CommandType>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_type_name() {
        assert!("engineStop".parse::<CommandType>().is_err());
    }

    #[test]
    fn test_serde_names_match_display() {
        let json = serde_json::to_string(&CommandType::GetDeviceStatus).unwrap();
        assert_eq!(json, "\"getDeviceStatus\"");
        let json = serde_json::to_string(&CommandType::SosNumber).unwrap();
        assert_eq!(json, "\"sosNumber\"");
    }

    #[test]
    fn test_integer_coercion() {
        let command = Command::new("1", CommandType::AlarmSpeed)
            .with(key::DATA, "120")
            .with(key::INDEX, 3);
        assert_eq!(command.integer(key::DATA).unwrap(), 120);
        assert_eq!(command.integer(key::INDEX).unwrap(), 3);
    }

    #[test]
    fn test_integer_rejects_text() {
        let command = Command::new("1", CommandType::AlarmSpeed).with(key::DATA, "fast");
        assert!(matches!(
            command.integer(key::DATA),
            Err(EncodeError::InvalidParameter { key: "data", .. })
        ));
    }

    #[test]
    fn test_missing_parameter() {
        let command = Command::new("1", CommandType::SetConnection);
        assert!(matches!(
            command.string(key::SERVER),
            Err(EncodeError::InvalidParameter { key: "server", .. })
        ));
    }

    #[test]
    fn test_bool_coercion() {
        let command = Command::new("1", CommandType::ModePowerSaving)
            .with(key::ENABLE, "TRUE")
            .with(key::DATA, 0);
        assert!(command.boolean(key::ENABLE).unwrap());
        assert!(!command.boolean(key::DATA).unwrap());
        let bad = Command::new("1", CommandType::ModePowerSaving).with(key::ENABLE, 7);
        assert!(bad.boolean(key::ENABLE).is_err());
    }

    #[test]
    fn test_whole_float_deserializes_as_integer() {
        let command: Command = serde_json::from_str(
            r#"{"deviceId": "1", "type": "positionPeriodic", "attributes": {"frequency": 60.0}}"#,
        )
        .unwrap();
        assert_eq!(command.get(key::FREQUENCY), Some(&AttributeValue::Int(60)));
        assert_eq!(command.integer(key::FREQUENCY).unwrap(), 60);
    }

    #[test]
    fn test_fractional_float_fails_integer_coercion() {
        let command: Command = serde_json::from_str(
            r#"{"deviceId": "1", "type": "alarmSpeed", "attributes": {"data": 80.5}}"#,
        )
        .unwrap();
        assert_eq!(command.get(key::DATA), Some(&AttributeValue::from("80.5")));
        assert!(matches!(
            command.integer(key::DATA),
            Err(EncodeError::InvalidParameter { key: "data", .. })
        ));
    }

    #[test]
    fn test_default_string_form() {
        assert_eq!(AttributeValue::Bool(true).to_string(), "true");
        assert_eq!(AttributeValue::Int(-4).to_string(), "-4");
        assert_eq!(AttributeValue::from("abc").to_string(), "abc");
    }
}
