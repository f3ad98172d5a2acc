use crate::protocol::CRLF;

/// XOR checksum of a vehicle dialect frame.
///
/// Covers the characters after the first `$` up to, but not including, the
/// last `;`. Without a `;` the window runs to the end of the text. Each
/// character contributes the low 8 bits of its code point.
pub fn checksum(text: &str) -> u8 {
    let start = text.find('$').map_or(0, |i| i + 1);
    let end = text.rfind(';').unwrap_or(text.len());
    if end <= start {
        return 0;
    }
    text[start..end]
        .chars()
        .fold(0u8, |acc, c| acc ^ (u32::from(c) & 0xFF) as u8)
}

/// Append the checksum as two uppercase hex digits followed by CRLF.
pub fn append_checksum(text: &str) -> String {
    format!("{text}{:02X}{CRLF}", checksum(text))
}

/// Returns true if `frame` ends with the checksum its body calls for.
pub fn verify(frame: &str) -> bool {
    let Some(without_crlf) = frame.strip_suffix(CRLF) else {
        return false;
    };
    let Some(split) = without_crlf.len().checked_sub(2) else {
        return false;
    };
    if !without_crlf.is_char_boundary(split) {
        return false;
    }
    let (body, digits) = without_crlf.split_at(split);
    u8::from_str_radix(digits, 16).is_ok_and(|sum| {
        digits.bytes().all(|b| !b.is_ascii_lowercase()) && sum == checksum(body)
    })
}
