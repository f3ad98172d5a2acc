use log::warn;

use crate::command::{AttributeValue, key};
use crate::dialect::Dialect;
use crate::error::Result;
use crate::timezone::TimezoneResolver;

/// Shortest reporting interval the vehicle firmware accepts, in seconds.
pub const VEHICLE_MIN_FREQUENCY: i64 = 5;
/// Upper bound of every 16-bit interval field.
pub const MAX_INTERVAL: i64 = 65535;
/// Personal trackers count reporting periods in 30 second steps after a 5 second fix.
const PERSONAL_STEP_SECONDS: f64 = 30.0;
const PERSONAL_FIX_SECONDS: i64 = 5;

/// Dialect specific rendering of parameter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormatter {
    /// Alternative dialect (personal trackers).
    Personal,
    /// Numeric opcode dialect (vehicle trackers).
    Vehicle,
}

impl ValueFormatter {
    pub fn for_dialect(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Alternative => Self::Personal,
            Dialect::Vehicle => Self::Vehicle,
        }
    }

    /// Render `value` for the field `key`.
    ///
    /// Returns `Ok(None)` when the field needs no special handling; the
    /// caller then uses the value's plain string form.
    pub fn format(
        self,
        key: &'static str,
        value: &AttributeValue,
        timezones: &dyn TimezoneResolver,
    ) -> Result<Option<String>> {
        let formatted = match (self, key) {
            (Self::Personal, key::FREQUENCY) => {
                Some(personal_interval(value.as_integer(key)?).to_string())
            }
            (Self::Personal, key::TIMEZONE) => {
                Some(timezones.offset_minutes(&value.to_string())?.to_string())
            }
            (Self::Vehicle, key::FREQUENCY) => Some(
                clamp(
                    key,
                    value.as_integer(key)?,
                    VEHICLE_MIN_FREQUENCY,
                    MAX_INTERVAL,
                )
                .to_string(),
            ),
            (Self::Vehicle, key::ENABLE) => {
                Some(if value.as_bool(key)? { "1" } else { "0" }.to_string())
            }
            _ => None,
        };
        Ok(formatted)
    }
}

/// Convert a reporting period in seconds to a personal tracker interval count.
///
/// Rounds half up, so a period that falls between two steps lands on the
/// shorter interval when it is at least half way there.
pub fn personal_interval(seconds: i64) -> i64 {
    let steps = seconds.saturating_sub(PERSONAL_FIX_SECONDS) as f64 / PERSONAL_STEP_SECONDS;
    let interval = (steps + 0.5).floor() as i64;
    interval.clamp(1, MAX_INTERVAL)
}

/// Bound `value` to `[min, max]`, logging when it had to move.
pub fn clamp(key: &str, value: i64, min: i64, max: i64) -> i64 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        warn!("{key} {value} out of range {min}..={max}, sending {clamped}");
    }
    clamped
}
