//! UTF-8 text encoding for the link.
//!
//! The link carries plain text with no framing: one write per message out,
//! one notification per line in.

/// Encode a message for a single characteristic write.
#[inline]
pub fn encode_text(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

/// Decode a notification payload.
///
/// Invalid sequences are replaced with U+FFFD rather than rejected, so a
/// peripheral that splits a multi-byte character across notifications still
/// produces a visible line.
///
/// # Example
///
/// ```
/// use ble_text_link::codec::decode_text;
///
/// assert_eq!(decode_text(b"LED_ON"), "LED_ON");
/// assert_eq!(decode_text(&[0x4f, 0xff]), "O\u{fffd}");
/// ```
#[inline]
pub fn decode_text(data: &[u8]) -> String {
    String::from_utf8_lossy(data).into_owned()
}

/// Format a decoded payload as one log line.
pub fn log_line(data: &[u8]) -> String {
    let mut line = decode_text(data);
    line.push('\n');
    line
}
