use log::{debug, trace};

use crate::command::{Command, CommandType, key};
use crate::custom;
use crate::dialect::{Dialect, DialectResolver};
use crate::error::{EncodeError, Result};
use crate::format::ValueFormatter;
use crate::protocol::Frame;
use crate::template;
use crate::timezone::TimezoneResolver;

/// Encode `command` for a device speaking `dialect`.
///
/// Returns the exact string to hand to the transport.
pub fn encode(
    command: &Command,
    dialect: Dialect,
    timezones: &dyn TimezoneResolver,
) -> Result<String> {
    let wire = encode_frame(command, dialect, timezones)?.to_wire();
    trace!("{} {} -> {wire:?}", command.device_id, command.kind);
    Ok(wire)
}

/// Like [`encode`], but stops before serialization.
pub fn encode_frame(
    command: &Command,
    dialect: Dialect,
    timezones: &dyn TimezoneResolver,
) -> Result<Frame> {
    if command.kind == CommandType::Custom {
        let text = command.string(key::DATA)?;
        return Ok(custom::normalize(dialect, &command.device_id, &text));
    }

    let template =
        template::lookup(dialect, command.kind).ok_or(EncodeError::UnsupportedCommand {
            command: command.kind,
            dialect,
        })?;
    debug!("{} via {dialect} opcode {}", command.kind, template.opcode);

    let body = template.render(command, ValueFormatter::for_dialect(dialect), timezones)?;
    Ok(Frame::templated(dialect, &command.device_id, body))
}

/// Command encoder bound to its device lookups.
#[derive(Debug, Clone, Default)]
pub struct Encoder<R, Z> {
    dialects: R,
    timezones: Z,
}

impl<R: DialectResolver, Z: TimezoneResolver> Encoder<R, Z> {
    pub fn new(dialects: R, timezones: Z) -> Self {
        Self {
            dialects,
            timezones,
        }
    }

    /// Dialect spoken by the given device.
    pub fn dialect(&self, device_id: &str) -> Dialect {
        self.dialects.resolve(device_id)
    }

    /// Returns true if the device can be sent commands of this type.
    pub fn supports(&self, device_id: &str, kind: CommandType) -> bool {
        self.dialect(device_id).supports(kind)
    }

    pub fn encode(&self, command: &Command) -> Result<String> {
        encode(command, self.dialect(&command.device_id), &self.timezones)
    }

    pub fn encode_frame(&self, command: &Command) -> Result<Frame> {
        encode_frame(command, self.dialect(&command.device_id), &self.timezones)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::DialectConfig;
    use crate::timezone::FixedOffsets;

    const ID: &str = "123456789012345";

    #[test]
    fn test_unsupported_in_vehicle_dialect() {
        let command = Command::new(ID, CommandType::SetTimezone).with(key::TIMEZONE, "UTC");
        let result = encode(&command, Dialect::Vehicle, &FixedOffsets::new());
        assert_eq!(
            result,
            Err(EncodeError::UnsupportedCommand {
                command: CommandType::SetTimezone,
                dialect: Dialect::Vehicle,
            })
        );
    }

    #[test]
    fn test_unsupported_in_alternative_dialect() {
        let command = Command::new(ID, CommandType::AlarmSpeed).with(key::DATA, 80);
        let result = encode(&command, Dialect::Alternative, &FixedOffsets::new());
        assert!(matches!(result, Err(EncodeError::UnsupportedCommand { .. })));
    }

    #[test]
    fn test_custom_requires_data() {
        let command = Command::new(ID, CommandType::Custom);
        let result = encode(&command, Dialect::Alternative, &FixedOffsets::new());
        assert!(matches!(
            result,
            Err(EncodeError::InvalidParameter { key: "data", .. })
        ));
    }

    #[test]
    fn test_encoder_resolves_dialect_per_device() {
        let encoder = Encoder::new(
            DialectConfig::new(false).with_device("personal", true),
            FixedOffsets::new(),
        );
        let single = |id: &str| Command::new(id, CommandType::PositionSingle);
        assert_eq!(encoder.encode(&single("personal")).unwrap(), "$GPRS,personal;W052;!");
        assert!(encoder.encode(&single("truck")).unwrap().starts_with("$,truck,0015;"));
        assert!(encoder.supports("truck", CommandType::OutputControl));
        assert!(!encoder.supports("personal", CommandType::OutputControl));
    }

    #[test]
    fn test_unknown_timezone_propagates() {
        let command = Command::new(ID, CommandType::SetTimezone).with(key::TIMEZONE, "Nowhere");
        assert_eq!(
            encode(&command, Dialect::Alternative, &FixedOffsets::new()),
            Err(EncodeError::UnknownTimezone("Nowhere".to_string()))
        );
    }
}
