//! Transfer and header decoding.
//!
//! Supports Base64, Quoted-Printable, RFC 2047 encoded words, and the
//! handful of charsets that cover nearly all exported mail.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Decodes Base64 data, ignoring embedded whitespace and line breaks.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD.decode(cleaned).map_err(Into::into)
}

/// Decodes Quoted-Printable bytes (RFC 2045 section 6.7).
///
/// Soft line breaks (`=` at end of line) are removed. A stray `=` that
/// is not followed by two hex digits is kept literally, which is what
/// most mail readers do with sloppy encoders.
#[must_use]
pub fn decode_quoted_printable(input: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        let byte = input[i];
        if byte != b'=' {
            result.push(byte);
            i += 1;
            continue;
        }

        match input.get(i + 1..i + 3) {
            Some([b'\r', b'\n']) => i += 3,
            Some([b'\n', _]) => i += 2,
            Some([hi, lo]) => match (hex_value(*hi), hex_value(*lo)) {
                (Some(hi), Some(lo)) => {
                    result.push((hi << 4) | lo);
                    i += 3;
                }
                _ => {
                    result.push(b'=');
                    i += 1;
                }
            },
            _ => {
                // Fewer than two bytes left: "=\n" is a soft break, anything else literal
                if input.get(i + 1) == Some(&b'\n') {
                    i += 2;
                } else {
                    result.push(b'=');
                    i += 1;
                }
            }
        }
    }

    result
}

const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Code points of windows-1252 bytes 0x80-0x9F. Unassigned bytes keep
/// their C1 code point, as browsers do.
const CP1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

const fn cp1252_char(byte: u8) -> char {
    match byte {
        0x80..=0x9F => CP1252_HIGH[(byte - 0x80) as usize],
        _ => byte as char,
    }
}

/// Decodes bytes in the given charset into a string.
///
/// UTF-8 and ASCII decode lossily; ISO-8859-1 maps bytes to code points
/// directly and windows-1252 additionally maps 0x80-0x9F to its
/// punctuation and currency signs. Unknown charsets fall back to lossy
/// UTF-8.
#[must_use]
pub fn decode_charset(bytes: &[u8], charset: Option<&str>) -> String {
    let charset = charset.map(str::to_ascii_lowercase);
    match charset.as_deref() {
        Some("iso-8859-1" | "latin1" | "latin-1") => bytes.iter().map(|&b| char::from(b)).collect(),
        Some("windows-1252" | "cp1252") => bytes.iter().map(|&b| cp1252_char(b)).collect(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Decodes every RFC 2047 encoded word in a header value.
///
/// Format of an encoded word: `=?charset?encoding?encoded-text?=`.
/// Whitespace between two adjacent encoded words is dropped, as the RFC
/// requires; text outside encoded words is kept as is. The bytes of
/// adjacent words in the same charset are decoded together, so a
/// multibyte character may be split across words.
///
/// # Errors
///
/// Returns an error if an encoded word has an unknown encoding or an
/// undecodable payload.
pub fn decode_rfc2047(text: &str) -> Result<String> {
    let mut output = String::with_capacity(text.len());
    let mut rest = text;
    let mut pending_whitespace = String::new();
    // Charset and undecoded bytes of the current run of adjacent words
    let mut run: Option<(String, Vec<u8>)> = None;

    while !rest.is_empty() {
        if let Some((word, consumed)) = next_encoded_word(rest) {
            let (charset, bytes) = decode_encoded_word(word)?;
            if run.is_none() {
                output.push_str(&pending_whitespace);
            }
            pending_whitespace.clear();
            match &mut run {
                Some((run_charset, run_bytes)) if run_charset.eq_ignore_ascii_case(&charset) => {
                    run_bytes.extend_from_slice(&bytes);
                }
                _ => flush_run(&mut output, run.replace((charset, bytes))),
            }
            rest = &rest[consumed..];
            continue;
        }

        let mut chars = rest.chars();
        let Some(c) = chars.next() else { break };
        rest = chars.as_str();

        if c.is_whitespace() {
            pending_whitespace.push(c);
        } else {
            flush_run(&mut output, run.take());
            output.push_str(&pending_whitespace);
            pending_whitespace.clear();
            output.push(c);
        }
    }
    flush_run(&mut output, run);
    output.push_str(&pending_whitespace);

    Ok(output)
}

fn flush_run(output: &mut String, run: Option<(String, Vec<u8>)>) {
    if let Some((charset, bytes)) = run {
        output.push_str(&decode_charset(&bytes, Some(&charset)));
    }
}

/// If `text` starts with an encoded word, returns its inner part and the
/// byte length consumed.
fn next_encoded_word(text: &str) -> Option<(&str, usize)> {
    let inner = text.strip_prefix("=?")?;
    // charset?encoding?payload?=  -- the payload may not contain "?="
    let charset_end = inner.find('?')?;
    let after_charset = &inner[charset_end + 1..];
    let encoding_end = after_charset.find('?')?;
    let after_encoding = &after_charset[encoding_end + 1..];
    let payload_end = after_encoding.find("?=")?;

    let word_len = charset_end + 1 + encoding_end + 1 + payload_end;
    let word = &inner[..word_len];
    if word.contains(char::is_whitespace) {
        return None;
    }
    Some((word, 2 + word_len + 2))
}

/// Returns the charset and the transfer-decoded bytes of an encoded word.
fn decode_encoded_word(word: &str) -> Result<(String, Vec<u8>)> {
    let mut parts = word.splitn(3, '?');
    let (Some(charset), Some(encoding), Some(payload)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(Error::InvalidEncoding(format!("Invalid RFC 2047 word: {word}")));
    };
    // RFC 2231 language suffix: charset*lang
    let charset = charset.split('*').next().unwrap_or(charset);

    let bytes = match encoding.to_ascii_uppercase().as_str() {
        "B" => decode_base64(payload)?,
        "Q" => decode_quoted_printable(payload.replace('_', " ").as_bytes()),
        other => {
            return Err(Error::InvalidEncoding(format!(
                "Unknown encoding: {other}"
            )));
        }
    };

    Ok((charset.to_string(), bytes))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_decode_with_line_breaks() {
        let decoded = decode_base64("SGVsbG8s\r\nIFdvcmxkIQ==").unwrap();
        assert_eq!(decoded, b"Hello, World!");
        assert!(decode_base64("not base64!").is_err());
    }

    #[test]
    fn test_quoted_printable_decode() {
        assert_eq!(decode_quoted_printable(b"Hello, World!"), b"Hello, World!");
        assert_eq!(
            decode_quoted_printable(b"H=C3=A9llo"),
            "Héllo".as_bytes()
        );
    }

    #[test]
    fn test_quoted_printable_soft_line_break() {
        assert_eq!(decode_quoted_printable(b"Hello=\r\nWorld"), b"HelloWorld");
        assert_eq!(decode_quoted_printable(b"Hello=\nWorld"), b"HelloWorld");
        assert_eq!(decode_quoted_printable(b"trailing=\n"), b"trailing");
    }

    #[test]
    fn test_quoted_printable_stray_equals() {
        assert_eq!(decode_quoted_printable(b"a=b"), b"a=b");
        assert_eq!(decode_quoted_printable(b"1+1=2=ZZ"), b"1+1=2=ZZ");
        assert_eq!(decode_quoted_printable(b"end="), b"end=");
    }

    #[test]
    fn test_decode_charset() {
        assert_eq!(decode_charset(&[0x63, 0x61, 0x66, 0xE9], Some("ISO-8859-1")), "café");
        assert_eq!(decode_charset("café".as_bytes(), Some("utf-8")), "café");
        assert_eq!(decode_charset(b"plain", None), "plain");
    }

    #[test]
    fn test_decode_windows_1252_high_range() {
        assert_eq!(decode_charset(&[0x80, 0x93, 0x94], Some("windows-1252")), "€“”");
        assert_eq!(decode_charset(&[0x96, 0x85, 0xE9], Some("CP1252")), "–…é");
        // Latin-1 keeps the C1 controls
        assert_eq!(decode_charset(&[0x80], Some("iso-8859-1")), "\u{0080}");
    }

    #[test]
    fn test_rfc2047_decode() {
        assert_eq!(decode_rfc2047("Hello").unwrap(), "Hello");
        assert_eq!(decode_rfc2047("=?utf-8?B?SMOpbGxv?=").unwrap(), "Héllo");
    }

    #[test]
    fn test_rfc2047_quoted_printable() {
        assert_eq!(decode_rfc2047("=?utf-8?Q?H=C3=A9llo_there?=").unwrap(), "Héllo there");
        assert_eq!(decode_rfc2047("=?ISO-8859-1?q?caf=E9?=").unwrap(), "café");
    }

    #[test]
    fn test_rfc2047_mixed_and_adjacent_words() {
        assert_eq!(
            decode_rfc2047("Re: =?utf-8?B?SMOpbGxv?= =?utf-8?Q?_w=C3=B6rld?= !").unwrap(),
            "Re: Héllo wörld !"
        );
        assert_eq!(
            decode_rfc2047("\"=?utf-8?Q?Jos=C3=A9?=\" <jose@example.com>").unwrap(),
            "\"José\" <jose@example.com>"
        );
    }

    #[test]
    fn test_rfc2047_character_split_across_words() {
        // "é" is C3 A9; each word carries one byte of it
        assert_eq!(
            decode_rfc2047("=?utf-8?Q?caf=C3?= =?UTF-8?Q?=A9?= au lait").unwrap(),
            "café au lait"
        );
        assert_eq!(
            decode_rfc2047("=?utf-8?B?8J+Y?=\r\n =?utf-8?B?gA==?=").unwrap(),
            "\u{1F600}"
        );
    }

    #[test]
    fn test_rfc2047_adjacent_words_in_different_charsets() {
        assert_eq!(
            decode_rfc2047("=?iso-8859-1?Q?caf=E9?= =?windows-1252?Q?=80?=").unwrap(),
            "café€"
        );
    }

    #[test]
    fn test_rfc2047_unknown_encoding() {
        assert!(decode_rfc2047("=?utf-8?X?abc?=").is_err());
    }

    proptest::proptest! {
        #[test]
        fn test_quoted_printable_plain_ascii_passthrough(s in "[a-zA-Z0-9 ,.!?]*") {
            proptest::prop_assert_eq!(decode_quoted_printable(s.as_bytes()), s.as_bytes());
        }

        #[test]
        fn test_rfc2047_arbitrary_input_never_panics(s in "\\PC*") {
            let _ = decode_rfc2047(&s);
        }
    }

    #[test]
    fn test_rfc2047_not_an_encoded_word() {
        assert_eq!(decode_rfc2047("=?broken").unwrap(), "=?broken");
        assert_eq!(decode_rfc2047("a =? b ?= c").unwrap(), "a =? b ?= c");
    }
}
