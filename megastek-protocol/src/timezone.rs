use std::collections::HashMap;

use crate::error::{EncodeError, Result};

/// Resolves a timezone name to its standard UTC offset in minutes.
///
/// Daylight saving time is ignored: `Europe/Berlin` is always `60`.
pub trait TimezoneResolver {
    fn offset_minutes(&self, zone: &str) -> Result<i32>;
}

impl<T: TimezoneResolver + ?Sized> TimezoneResolver for &T {
    fn offset_minutes(&self, zone: &str) -> Result<i32> {
        (**self).offset_minutes(zone)
    }
}

/// A fixed table of zone offsets.
#[derive(Debug, Clone, Default)]
pub struct FixedOffsets {
    zones: HashMap<String, i32>,
}

impl FixedOffsets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, zone: impl Into<String>, minutes: i32) -> Self {
        self.zones.insert(zone.into(), minutes);
        self
    }
}

impl TimezoneResolver for FixedOffsets {
    fn offset_minutes(&self, zone: &str) -> Result<i32> {
        self.zones
            .get(zone)
            .copied()
            .ok_or_else(|| EncodeError::UnknownTimezone(zone.to_string()))
    }
}

/// IANA timezone database lookup.
#[cfg(feature = "tz")]
#[derive(Debug, Clone, Copy, Default)]
pub struct IanaTimezones;

#[cfg(feature = "tz")]
impl TimezoneResolver for IanaTimezones {
    fn offset_minutes(&self, zone: &str) -> Result<i32> {
        use chrono::{TimeZone, Utc};
        use chrono_tz::{OffsetComponents, Tz};

        let tz: Tz = zone
            .parse()
            .map_err(|_| EncodeError::UnknownTimezone(zone.to_string()))?;
        let offset = tz.offset_from_utc_datetime(&Utc::now().naive_utc());
        Ok(offset.base_utc_offset().num_minutes() as i32)
    }
}
