//! MIME message structure and decoding.

use crate::content_type::ContentType;
use crate::date::{parse_date, received_date};
use crate::encoding::{decode_base64, decode_charset, decode_quoted_printable};
use crate::error::{Error, Result};
use crate::header::Headers;
use chrono::{DateTime, FixedOffset};

/// Maximum multipart nesting accepted by the parser.
const MAX_NESTING: usize = 32;

/// Transfer encoding types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    /// 7-bit ASCII.
    SevenBit,
    /// 8-bit binary.
    EightBit,
    /// Base64 encoding.
    Base64,
    /// Quoted-Printable encoding.
    QuotedPrintable,
    /// Binary (no encoding).
    Binary,
}

impl TransferEncoding {
    /// Parses transfer encoding from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "8bit" => Self::EightBit,
            "base64" => Self::Base64,
            "quoted-printable" => Self::QuotedPrintable,
            "binary" => Self::Binary,
            _ => Self::SevenBit, // Default (includes "7bit")
        }
    }
}

/// Body of a MIME entity.
#[derive(Debug, Clone)]
pub enum Body {
    /// A leaf entity holding its still-encoded content.
    Single(Vec<u8>),
    /// A multipart entity holding its sub-parts in order.
    Multipart(Vec<Part>),
}

/// A MIME entity: headers plus body.
#[derive(Debug, Clone)]
pub struct Part {
    /// Entity headers.
    pub headers: Headers,
    /// Entity body.
    pub body: Body,
}

impl Part {
    fn parse(raw: &[u8], depth: usize) -> Result<Self> {
        if depth > MAX_NESTING {
            return Err(Error::InvalidMultipart(format!(
                "nesting deeper than {MAX_NESTING} levels"
            )));
        }

        let (header_bytes, body_bytes) = split_head(raw);
        let headers = Headers::parse(&String::from_utf8_lossy(header_bytes));
        let content_type = content_type_of(&headers);

        let body = if content_type.is_multipart() {
            let boundary = content_type.boundary().ok_or(Error::MissingBoundary)?;
            let parts = split_multipart(body_bytes, boundary)
                .into_iter()
                .map(|section| Self::parse(section, depth + 1))
                .collect::<Result<Vec<_>>>()?;
            Body::Multipart(parts)
        } else {
            Body::Single(body_bytes.to_vec())
        };

        Ok(Self { headers, body })
    }

    /// Gets the content type, falling back to `text/plain` when the header
    /// is absent or malformed (RFC 2045 section 5.2).
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        content_type_of(&self.headers)
    }

    /// Gets the transfer encoding.
    #[must_use]
    pub fn transfer_encoding(&self) -> TransferEncoding {
        self.headers
            .get("content-transfer-encoding")
            .map_or(TransferEncoding::SevenBit, TransferEncoding::parse)
    }

    /// Returns true if the part is marked as an attachment.
    #[must_use]
    pub fn is_attachment(&self) -> bool {
        self.headers
            .get("content-disposition")
            .and_then(|d| d.split(';').next())
            .is_some_and(|d| d.trim().eq_ignore_ascii_case("attachment"))
    }

    /// Decodes the body according to the transfer encoding.
    ///
    /// Multipart entities have no body of their own and decode to nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if Base64 decoding fails.
    pub fn decode_body(&self) -> Result<Vec<u8>> {
        let Body::Single(raw) = &self.body else {
            return Ok(Vec::new());
        };

        match self.transfer_encoding() {
            TransferEncoding::Base64 => decode_base64(&String::from_utf8_lossy(raw)),
            TransferEncoding::QuotedPrintable => Ok(decode_quoted_printable(raw)),
            _ => Ok(raw.clone()),
        }
    }

    /// Gets the decoded body as text in its declared charset.
    ///
    /// # Errors
    ///
    /// Returns an error if transfer decoding fails.
    pub fn body_text(&self) -> Result<String> {
        let decoded = self.decode_body()?;
        Ok(decode_charset(&decoded, self.content_type().charset()))
    }

    /// Collects leaf parts depth-first, in document order.
    fn leaves<'a>(&'a self, out: &mut Vec<&'a Self>) {
        match &self.body {
            Body::Single(_) => out.push(self),
            Body::Multipart(parts) => {
                for part in parts {
                    part.leaves(out);
                }
            }
        }
    }
}

/// A parsed RFC 5322 message.
#[derive(Debug, Clone)]
pub struct Message {
    root: Part,
}

impl Message {
    /// Parses a raw message (headers, blank line, body).
    ///
    /// Both CRLF and bare LF line endings are accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if a multipart entity has no boundary or nests too
    /// deeply.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        Ok(Self {
            root: Part::parse(raw, 0)?,
        })
    }

    /// Top-level message headers.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.root.headers
    }

    /// The top-level entity.
    #[must_use]
    pub const fn root(&self) -> &Part {
        &self.root
    }

    /// Gets the decoded Subject header.
    #[must_use]
    pub fn subject(&self) -> Option<String> {
        self.root.headers.get_decoded("subject")
    }

    /// Gets the decoded From header.
    #[must_use]
    pub fn from(&self) -> Option<String> {
        self.root.headers.get_decoded("from")
    }

    /// Gets the decoded To header.
    #[must_use]
    pub fn to(&self) -> Option<String> {
        self.root.headers.get_decoded("to")
    }

    /// Finds the first inline text/plain part and decodes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the part's transfer encoding is corrupt.
    pub fn text_body(&self) -> Result<Option<String>> {
        self.first_text_part("plain")
    }

    /// Finds the first inline text/html part and decodes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the part's transfer encoding is corrupt.
    pub fn html_body(&self) -> Result<Option<String>> {
        self.first_text_part("html")
    }

    fn first_text_part(&self, sub_type: &str) -> Result<Option<String>> {
        let mut leaves = Vec::new();
        self.root.leaves(&mut leaves);

        leaves
            .into_iter()
            .find(|part| !part.is_attachment() && part.content_type().is("text", sub_type))
            .map(Part::body_text)
            .transpose()
    }

    /// Raw header values that may record when the message was delivered,
    /// in order of preference: `Delivery-Date`, the date of each `Received`
    /// trace line from the topmost down, then the origination `Date`.
    #[must_use]
    pub fn delivery_date_candidates(&self) -> Vec<&str> {
        let headers = &self.root.headers;
        headers
            .get("delivery-date")
            .into_iter()
            .chain(headers.get_all("received").into_iter().filter_map(received_date))
            .chain(headers.get("date"))
            .collect()
    }

    /// Parses the delivery date from the first candidate that holds a
    /// valid date-time.
    ///
    /// # Errors
    ///
    /// Returns the [`Error::InvalidDate`] of the first candidate if every
    /// recorded value is malformed.
    pub fn delivery_date(&self) -> Result<Option<DateTime<FixedOffset>>> {
        let mut first_error = None;
        for value in self.delivery_date_candidates() {
            match parse_date(value) {
                Ok(date) => return Ok(Some(date)),
                Err(e) if first_error.is_none() => first_error = Some(e),
                Err(_) => {}
            }
        }
        first_error.map_or(Ok(None), Err)
    }
}

fn content_type_of(headers: &Headers) -> ContentType {
    headers
        .get("content-type")
        .and_then(|value| ContentType::parse(value).ok())
        .unwrap_or_else(ContentType::text_plain)
}

/// Splits an entity at the first empty line.
fn split_head(raw: &[u8]) -> (&[u8], &[u8]) {
    let mut pos = 0;
    while pos < raw.len() {
        let line_end = raw[pos..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(raw.len(), |i| pos + i);
        let line = &raw[pos..line_end];
        let next = (line_end + 1).min(raw.len());

        if line.is_empty() || line == b"\r" {
            return (&raw[..pos], &raw[next..]);
        }
        pos = next;
    }
    (raw, &[])
}

/// Splits a multipart body into its sections, dropping preamble and
/// epilogue. An unterminated final section is kept.
fn split_multipart<'a>(body: &'a [u8], boundary: &str) -> Vec<&'a [u8]> {
    let delimiter = format!("--{boundary}");
    let close_delimiter = format!("--{boundary}--");
    let mut sections = Vec::new();
    let mut section_start: Option<usize> = None;
    let mut pos = 0;

    while pos < body.len() {
        let line_end = body[pos..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(body.len(), |i| pos + i);
        let next = (line_end + 1).min(body.len());
        let line = body[pos..line_end].trim_ascii_end();

        let is_close = line == close_delimiter.as_bytes();
        if is_close || line == delimiter.as_bytes() {
            if let Some(start) = section_start.take() {
                sections.push(strip_line_break(&body[start..pos]));
            }
            if is_close {
                return sections;
            }
            section_start = Some(next);
        }
        pos = next;
    }

    if let Some(start) = section_start {
        sections.push(&body[start..]);
    }
    sections
}

/// Removes the line break that belongs to the following delimiter.
fn strip_line_break(section: &[u8]) -> &[u8] {
    let section = section.strip_suffix(b"\n").unwrap_or(section);
    section.strip_suffix(b"\r").unwrap_or(section)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_encoding_parse() {
        assert_eq!(TransferEncoding::parse("7bit"), TransferEncoding::SevenBit);
        assert_eq!(TransferEncoding::parse("BASE64"), TransferEncoding::Base64);
        assert_eq!(
            TransferEncoding::parse("quoted-printable"),
            TransferEncoding::QuotedPrintable
        );
    }

    #[test]
    fn test_message_single_part() {
        let raw = concat!(
            "From: Alice <alice@example.com>\r\n",
            "To: bob@example.com\r\n",
            "Subject: Test\r\n",
            "\r\n",
            "Hello, World!\r\n"
        );
        let message = Message::parse(raw.as_bytes()).unwrap();

        assert_eq!(message.from().as_deref(), Some("Alice <alice@example.com>"));
        assert_eq!(message.to().as_deref(), Some("bob@example.com"));
        assert_eq!(message.subject().as_deref(), Some("Test"));
        assert_eq!(message.text_body().unwrap().as_deref(), Some("Hello, World!\r\n"));
        assert_eq!(message.html_body().unwrap(), None);
    }

    #[test]
    fn test_message_html_only() {
        let raw = "Content-Type: text/html; charset=utf-8\n\n<p>Hi</p>";
        let message = Message::parse(raw.as_bytes()).unwrap();

        assert_eq!(message.text_body().unwrap(), None);
        assert_eq!(message.html_body().unwrap().as_deref(), Some("<p>Hi</p>"));
        assert!(message.subject().is_none());
    }

    #[test]
    fn test_message_multipart_alternative() {
        let raw = concat!(
            "Subject: Alt\n",
            "Content-Type: multipart/alternative; boundary=\"xyz\"\n",
            "\n",
            "preamble\n",
            "--xyz\n",
            "Content-Type: text/plain; charset=utf-8\n",
            "Content-Transfer-Encoding: quoted-printable\n",
            "\n",
            "H=C3=A9llo\n",
            "--xyz\n",
            "Content-Type: text/html\n",
            "Content-Transfer-Encoding: base64\n",
            "\n",
            "PGI+SGk8L2I+\n",
            "--xyz--\n",
            "epilogue\n"
        );
        let message = Message::parse(raw.as_bytes()).unwrap();

        assert_eq!(message.text_body().unwrap().as_deref(), Some("Héllo"));
        assert_eq!(message.html_body().unwrap().as_deref(), Some("<b>Hi</b>"));
    }

    #[test]
    fn test_message_nested_multipart_skips_attachments() {
        let raw = concat!(
            "Content-Type: multipart/mixed; boundary=outer\r\n",
            "\r\n",
            "--outer\r\n",
            "Content-Type: text/plain\r\n",
            "Content-Disposition: attachment; filename=notes.txt\r\n",
            "\r\n",
            "attached notes\r\n",
            "--outer\r\n",
            "Content-Type: multipart/alternative; boundary=inner\r\n",
            "\r\n",
            "--inner\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "inline text\r\n",
            "--inner--\r\n",
            "--outer--\r\n"
        );
        let message = Message::parse(raw.as_bytes()).unwrap();

        assert_eq!(message.text_body().unwrap().as_deref(), Some("inline text"));
        let Body::Multipart(parts) = &message.root().body else {
            panic!("expected multipart body");
        };
        assert_eq!(parts.len(), 2);
        assert!(parts[0].is_attachment());
    }

    #[test]
    fn test_message_missing_boundary() {
        let raw = "Content-Type: multipart/mixed\n\nbody";
        assert!(matches!(
            Message::parse(raw.as_bytes()),
            Err(Error::MissingBoundary)
        ));
    }

    #[test]
    fn test_message_corrupt_base64_body() {
        let raw = "Content-Transfer-Encoding: base64\n\n%%%%";
        let message = Message::parse(raw.as_bytes()).unwrap();
        assert!(message.text_body().is_err());
    }

    #[test]
    fn test_message_invalid_content_type_defaults_to_text() {
        let raw = "Content-Type: garbage\n\nplain after all";
        let message = Message::parse(raw.as_bytes()).unwrap();
        assert_eq!(message.text_body().unwrap().as_deref(), Some("plain after all"));
    }

    #[test]
    fn test_delivery_date_precedence() {
        let raw = concat!(
            "Received: from b by c; Wed, 15 Mar 2023 10:30:00 +0000\n",
            "Received: from a by b; Wed, 15 Mar 2023 10:29:00 +0000\n",
            "Date: Tue, 14 Mar 2023 09:00:00 +0000\n",
            "\n"
        );
        let message = Message::parse(raw.as_bytes()).unwrap();
        assert_eq!(
            message.delivery_date_candidates(),
            [
                "Wed, 15 Mar 2023 10:30:00 +0000",
                "Wed, 15 Mar 2023 10:29:00 +0000",
                "Tue, 14 Mar 2023 09:00:00 +0000",
            ]
        );
        assert_eq!(
            message.delivery_date().unwrap().unwrap().to_rfc2822(),
            "Wed, 15 Mar 2023 10:30:00 +0000"
        );

        let raw = "Delivery-Date: Thu, 16 Mar 2023 08:00:00 +0000\nDate: Tue, 14 Mar 2023 09:00:00 +0000\n\n";
        let message = Message::parse(raw.as_bytes()).unwrap();
        assert_eq!(
            message.delivery_date_candidates().first().copied(),
            Some("Thu, 16 Mar 2023 08:00:00 +0000")
        );

        let raw = "Date: Tue, 14 Mar 2023 09:00:00 +0000\n\n";
        let message = Message::parse(raw.as_bytes()).unwrap();
        assert!(message.delivery_date().unwrap().is_some());
    }

    #[test]
    fn test_delivery_date_skips_malformed_candidates() {
        let raw = concat!(
            "Received: from a by b; Wed, 15 Mar 2023 10:30:00.123 +0000\n",
            "Received: from x by a (no date)\n",
            "Date: Tue, 14 Mar 2023 09:00:00 +0000\n",
            "\n"
        );
        let message = Message::parse(raw.as_bytes()).unwrap();
        assert_eq!(
            message.delivery_date().unwrap().unwrap().to_rfc2822(),
            "Tue, 14 Mar 2023 09:00:00 +0000"
        );
    }

    #[test]
    fn test_delivery_date_missing_and_malformed() {
        let message = Message::parse(b"Subject: none\n\n").unwrap();
        assert!(message.delivery_date().unwrap().is_none());

        let message = Message::parse(b"Date: yesterday-ish\n\n").unwrap();
        assert!(matches!(
            message.delivery_date(),
            Err(Error::InvalidDate { .. })
        ));

        let raw = b"Delivery-Date: soon\nDate: later\n\n";
        let message = Message::parse(raw).unwrap();
        assert!(matches!(
            message.delivery_date(),
            Err(Error::InvalidDate { ref value, .. }) if value == "soon"
        ));
    }

    #[test]
    fn test_split_head_without_body() {
        let (head, body) = split_head(b"Subject: x\r\n");
        assert_eq!(head, b"Subject: x\r\n");
        assert!(body.is_empty());
    }
}
