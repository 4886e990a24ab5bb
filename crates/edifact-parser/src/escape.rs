use edifact_types::EdifactDelimiters;

/// Escapes a data value for safe inclusion in generated EDIFACT output.
///
/// Every occurrence of a delimiter byte (component, element, segment, or
/// the release byte itself) is prefixed with the release byte. The
/// tokenizer never unescapes during parsing (it is zero-copy and simply
/// skips over escaped delimiters), so this is the counterpart callers use
/// when they need a plain value back, and the generator uses this to turn
/// parsed/assembled values back into wire bytes.
pub fn escape(value: &str, delimiters: &EdifactDelimiters) -> String {
    let release = delimiters.release as char;
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        let byte = ch as u32;
        if byte <= 0x7f
            && (byte as u8 == delimiters.component
                || byte as u8 == delimiters.element
                || byte as u8 == delimiters.segment
                || byte as u8 == delimiters.release)
        {
            out.push(release);
        }
        out.push(ch);
    }
    out
}

/// Reverses [`escape`]: strips a release byte from in front of any escaped
/// delimiter, leaving the delimiter as literal data.
///
/// A release byte that is the last character of the input (a dangling
/// escape) is treated as literal data rather than an error, matching the
/// tokenizer's tolerant treatment of malformed trailing escapes.
pub fn unescape(value: &str, release: u8) -> String {
    let release = release as char;
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == release {
            if let Some(&next) = chars.peek() {
                out.push(next);
                chars.next();
                continue;
            }
            // dangling release character at end of input: keep literally
            out.push(ch);
            continue;
        }
        out.push(ch);
    }
    out
}
