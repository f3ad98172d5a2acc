use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;

use crate::dialect::Dialect;
use crate::protocol::{CRLF, Frame, GPRS_TERMINATOR, SMS_MARKER, VEHICLE_TERMINATOR};

/// `W005,...`, `R029;...`, `C099`: an alternative dialect opcode call (matched upper-cased).
static GPRS_OPCODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[WRC][0-9]{3}(?:[,;][^\r\n]*)?$").unwrap());

/// `0013,60`, `0015;`, `0040`: a vehicle dialect opcode call.
static VEHICLE_OPCODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}(?:,[^\r\n]*|;)?$").unwrap());

/// Legacy SMS shorthand: optional `M<password>,` prefix, two digit code, arguments.
static LEGACY_SMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:M[0-9]{6},)?([0-9]{2})(?:,([^\r\n]*))?$").unwrap());

/// A legacy two digit SMS command code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmsCode {
    pub code: &'static str,
    /// Vehicle dialect opcode, `None` if the command only works over SMS.
    pub opcode: Option<&'static str>,
    pub description: &'static str,
}

pub static SMS_CODES: &[SmsCode] = &[
    SmsCode { code: "01", opcode: Some("0020"), description: "authorized number" },
    SmsCode { code: "02", opcode: Some("0015"), description: "single position" },
    SmsCode { code: "03", opcode: Some("0023"), description: "track regularly via SMS" },
    SmsCode { code: "05", opcode: Some("0030"), description: "overspeed alarm" },
    SmsCode { code: "10", opcode: Some("0024"), description: "SMS format" },
    SmsCode { code: "21", opcode: None, description: "TCP/UDP" },
    SmsCode { code: "22", opcode: None, description: "device ID" },
    SmsCode { code: "24", opcode: None, description: "IP and port" },
    SmsCode { code: "25", opcode: Some("0013"), description: "GPRS interval" },
    SmsCode { code: "26", opcode: Some("0016"), description: "GPRS distance" },
    SmsCode { code: "27", opcode: Some("0017"), description: "GPS corner" },
    SmsCode { code: "32", opcode: Some("0033"), description: "geofence" },
    SmsCode { code: "50", opcode: Some("0050"), description: "output control" },
];

pub fn sms_code(code: &str) -> Option<&'static SmsCode> {
    SMS_CODES.iter().find(|c| c.code == code)
}

/// Adapt operator-entered command text to the dialect's wire form.
pub fn normalize(dialect: Dialect, device_id: &str, text: &str) -> Frame {
    match dialect {
        Dialect::Alternative => normalize_gprs(device_id, text),
        Dialect::Vehicle => normalize_vehicle(device_id, text),
    }
}

/// Bare opcode calls and `$SMS` commands are wrapped in the GPRS envelope.
/// Anything else is assumed to be complete and is sent untouched.
fn normalize_gprs(device_id: &str, text: &str) -> Frame {
    let mut body = if GPRS_OPCODE.is_match(&text.to_uppercase()) {
        text.to_string()
    } else if text.starts_with(SMS_MARKER) {
        debug!("stripping SMS header from {text:?}");
        match text.find(';') {
            Some(i) => text[i + 1..].to_string(),
            None => text.to_string(),
        }
    } else {
        debug!("custom command {text:?} sent as entered");
        return Frame::Verbatim(text.to_string());
    };

    if !body.ends_with(GPRS_TERMINATOR) {
        if body.ends_with(';') {
            body.push('!');
        } else {
            body.push_str(GPRS_TERMINATOR);
        }
    }

    Frame::Gprs {
        device_id: device_id.to_string(),
        body,
    }
}

/// Opcode calls are checksummed as entered. Legacy SMS shorthand is mapped to
/// its opcode where one exists; the rest goes out as SMS text.
fn normalize_vehicle(device_id: &str, text: &str) -> Frame {
    let mut body = if VEHICLE_OPCODE.is_match(text) {
        text.to_string()
    } else {
        let Some(caps) = LEGACY_SMS.captures(text) else {
            return sms_bypass(text);
        };
        let Some(opcode) = sms_code(&caps[1]).and_then(|c| c.opcode) else {
            return sms_bypass(text);
        };
        debug!("legacy SMS code {} mapped to {opcode}", &caps[1]);
        match caps.get(2) {
            Some(args) => format!("{opcode},{}", args.as_str()),
            None => opcode.to_string(),
        }
    };

    if body.ends_with(CRLF) {
        return Frame::Verbatim(body);
    }
    if !body.ends_with(VEHICLE_TERMINATOR) {
        body.push_str(VEHICLE_TERMINATOR);
    }

    Frame::Vehicle {
        device_id: device_id.to_string(),
        body,
    }
}

fn sms_bypass(text: &str) -> Frame {
    warn!("custom command {text:?} has no GPRS equivalent, sending as SMS text");
    let mut out = text.to_string();
    if !out.ends_with(CRLF) {
        out.push_str(CRLF);
    }
    Frame::Verbatim(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::append_checksum;

    const ID: &str = "123456789012345";

    fn gprs(text: &str) -> String {
        normalize(Dialect::Alternative, ID, text).to_wire()
    }

    fn vehicle(text: &str) -> String {
        normalize(Dialect::Vehicle, ID, text).to_wire()
    }

    #[test]
    fn test_gprs_sms_header_stripped() {
        assert_eq!(gprs("$SMS,000000;R005;R029;!"), format!("$GPRS,{ID};R005;R029;!"));
    }

    #[test]
    fn test_gprs_sms_without_semicolon_kept_whole() {
        assert_eq!(gprs("$SMS"), format!("$GPRS,{ID};$SMS;!"));
    }

    #[test]
    fn test_gprs_envelope_passes_through() {
        let text = format!("$GPRS,{ID};R075,FOO;!");
        assert_eq!(gprs(&text), text);
        assert_eq!(gprs("hello"), "hello");
    }

    #[test]
    fn test_gprs_terminator_completion() {
        assert_eq!(gprs("W005,1;R029;"), format!("$GPRS,{ID};W005,1;R029;!"));
        assert_eq!(gprs("W005,1"), format!("$GPRS,{ID};W005,1;!"));
        assert_eq!(gprs("R029;!"), format!("$GPRS,{ID};R029;!"));
    }

    #[test]
    fn test_gprs_opcode_case_insensitive() {
        assert_eq!(gprs("w052"), format!("$GPRS,{ID};w052;!"));
    }

    #[test]
    fn test_gprs_no_legacy_code_remap() {
        // Two digit SMS codes mean nothing to personal trackers.
        assert_eq!(gprs("25,60"), "25,60");
    }

    #[test]
    fn test_vehicle_native_opcode_checksummed() {
        assert_eq!(vehicle("0013,60"), append_checksum(&format!("$,{ID},0013,60;")));
        assert_eq!(vehicle("0015;"), append_checksum(&format!("$,{ID},0015;")));
        assert_eq!(vehicle("0040"), append_checksum(&format!("$,{ID},0040;")));
    }

    #[test]
    fn test_vehicle_legacy_code_mapped() {
        assert_eq!(vehicle("25,60"), append_checksum(&format!("$,{ID},0013,60;")));
        assert_eq!(
            vehicle("M000000,05,100"),
            append_checksum(&format!("$,{ID},0030,100;"))
        );
        assert_eq!(vehicle("02"), append_checksum(&format!("$,{ID},0015;")));
    }

    #[test]
    fn test_vehicle_untranslatable_code_bypasses_checksum() {
        assert_eq!(vehicle("M000000,24,1.2.3.4,5000"), "M000000,24,1.2.3.4,5000\r\n");
        assert_eq!(vehicle("21,1"), "21,1\r\n");
        assert_eq!(vehicle("99"), "99\r\n");
    }

    #[test]
    fn test_vehicle_crlf_terminated_text_never_checksummed() {
        assert_eq!(vehicle("22,ABC\r\n"), "22,ABC\r\n");
        assert_eq!(vehicle("25,60\r\n"), "25,60\r\n");
        assert!(!normalize(Dialect::Vehicle, ID, "0013,60\r\n").is_checksummed());
    }

    #[test]
    fn test_vehicle_free_text_bypasses() {
        assert_eq!(vehicle("reboot please"), "reboot please\r\n");
    }

    #[test]
    fn test_sms_code_table() {
        assert_eq!(sms_code("25").and_then(|c| c.opcode), Some("0013"));
        assert_eq!(sms_code("22").map(|c| c.opcode), Some(None));
        assert!(sms_code("99").is_none());
    }
}
