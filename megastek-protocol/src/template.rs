use crate::command::{Command, CommandType, key};
use crate::dialect::Dialect;
use crate::error::{EncodeError, Result};
use crate::format::{ValueFormatter, clamp};
use crate::timezone::TimezoneResolver;

/// One argument slot of a command template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg {
    /// Required parameter, rendered by the dialect formatter or in plain form.
    Param(&'static str),
    /// Required integer parameter, bounded to `[min, max]`.
    Clamped {
        key: &'static str,
        min: i64,
        max: i64,
    },
    /// Fixed text.
    Literal(&'static str),
    /// `HH:MM-HH:MM` window, sent as two arguments with the end time first.
    SilenceWindow(&'static str),
}

/// Opcode and argument layout of a templated command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub kind: CommandType,
    pub opcode: &'static str,
    pub args: &'static [Arg],
}

/// Alternative dialect, `$GPRS,<id>;<opcode>[,args];!`.
pub static ALTERNATIVE: &[Template] = &[
    Template {
        kind: CommandType::SetConnection,
        opcode: "W003",
        args: &[Arg::Param(key::SERVER), Arg::Param(key::PORT)],
    },
    Template {
        kind: CommandType::PositionStop,
        opcode: "W005",
        args: &[Arg::Literal("0")],
    },
    Template {
        kind: CommandType::PositionPeriodic,
        opcode: "W005",
        args: &[Arg::Param(key::FREQUENCY)],
    },
    Template {
        kind: CommandType::SosNumber,
        opcode: "W010",
        args: &[
            Arg::Param(key::INDEX),
            Arg::Param(key::PHONE),
            Arg::Literal("001"),
        ],
    },
    Template {
        kind: CommandType::SetTimezone,
        opcode: "W020",
        args: &[Arg::Param(key::TIMEZONE)],
    },
    Template {
        kind: CommandType::GetDeviceStatus,
        opcode: "R029",
        args: &[],
    },
    Template {
        kind: CommandType::AlarmVibration,
        opcode: "W036",
        args: &[Arg::Clamped {
            key: key::DATA,
            min: 0,
            max: 255,
        }],
    },
    Template {
        kind: CommandType::SilenceTime,
        opcode: "W038",
        args: &[Arg::SilenceWindow(key::DATA)],
    },
    Template {
        kind: CommandType::PositionSingle,
        opcode: "W052",
        args: &[],
    },
    Template {
        kind: CommandType::FactoryReset,
        opcode: "C099",
        args: &[],
    },
    Template {
        kind: CommandType::RebootDevice,
        opcode: "W100",
        args: &[],
    },
];

/// Vehicle dialect, `$,<id>,<opcode>[,args];<checksum>\r\n`.
pub static VEHICLE: &[Template] = &[
    Template {
        kind: CommandType::PositionPeriodic,
        opcode: "0013",
        args: &[Arg::Param(key::FREQUENCY)],
    },
    Template {
        kind: CommandType::PositionSingle,
        opcode: "0015",
        args: &[],
    },
    Template {
        kind: CommandType::SosNumber,
        opcode: "0020",
        args: &[
            Arg::Param(key::INDEX),
            Arg::Param(key::PHONE),
            Arg::Literal("10000000000"),
        ],
    },
    Template {
        kind: CommandType::AlarmSpeed,
        opcode: "0030",
        args: &[Arg::Clamped {
            key: key::DATA,
            min: 0,
            max: 200,
        }],
    },
    Template {
        kind: CommandType::ModePowerSaving,
        opcode: "0031",
        args: &[Arg::Param(key::ENABLE)],
    },
    Template {
        kind: CommandType::AlarmVibration,
        opcode: "0032",
        args: &[Arg::Clamped {
            key: key::DATA,
            min: 0,
            max: 1,
        }],
    },
    Template {
        kind: CommandType::GetDeviceStatus,
        opcode: "0040",
        args: &[],
    },
    Template {
        kind: CommandType::OutputControl,
        opcode: "0050",
        args: &[
            Arg::Param(key::INDEX),
            Arg::Clamped {
                key: key::DATA,
                min: 0,
                max: 1,
            },
        ],
    },
];

pub fn table(dialect: Dialect) -> &'static [Template] {
    match dialect {
        Dialect::Alternative => ALTERNATIVE,
        Dialect::Vehicle => VEHICLE,
    }
}

pub fn lookup(dialect: Dialect, kind: CommandType) -> Option<&'static Template> {
    table(dialect).iter().find(|t| t.kind == kind)
}

impl Template {
    /// Render `<opcode>[,arg...]` without the dialect terminator.
    pub fn render(
        &self,
        command: &Command,
        formatter: ValueFormatter,
        timezones: &dyn TimezoneResolver,
    ) -> Result<String> {
        let mut body = self.opcode.to_string();
        for arg in self.args {
            match *arg {
                Arg::Param(key) => {
                    let value = command.value(key)?;
                    let text = match formatter.format(key, value, timezones)? {
                        Some(text) => text,
                        None => value.to_string(),
                    };
                    body.push(',');
                    body.push_str(&text);
                }
                Arg::Clamped { key, min, max } => {
                    let value = clamp(key, command.integer(key)?, min, max);
                    body.push(',');
                    body.push_str(&value.to_string());
                }
                Arg::Literal(text) => {
                    body.push(',');
                    body.push_str(text);
                }
                Arg::SilenceWindow(key) => {
                    let [start, end] = silence_window(key, &command.string(key)?)?;
                    body.push(',');
                    body.push_str(&end);
                    body.push(',');
                    body.push_str(&start);
                }
            }
        }
        Ok(body)
    }
}

/// Split a `HH:MM-HH:MM` (or `HH-HH`) window into `[start, end]`, adding
/// `:00` to bare hours.
pub fn silence_window(key: &'static str, data: &str) -> Result<[String; 2]> {
    let tokens: Vec<&str> = data.split('-').collect();
    let [start, end] = tokens.as_slice() else {
        return Err(EncodeError::invalid(
            key,
            format!("expected START-END, got {data:?}"),
        ));
    };
    if start.is_empty() || end.is_empty() {
        return Err(EncodeError::invalid(
            key,
            format!("empty time in window {data:?}"),
        ));
    }
    Ok([with_minutes(start), with_minutes(end)])
}

fn with_minutes(time: &str) -> String {
    if time.contains(':') {
        time.to_string()
    } else {
        format!("{time}:00")
    }
}
