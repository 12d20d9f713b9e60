//! # mailsift-mime
//!
//! Decoding of RFC 5322 / MIME messages as stored in mail exports.
//!
//! ## Features
//!
//! - **Message parsing**: headers, nested multipart bodies, CRLF or LF line endings
//! - **Decoding**: Base64, Quoted-Printable, RFC 2047 encoded words, common charsets
//! - **Dates**: RFC 5322 date-times from `Date`, `Delivery-Date` and `Received`
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailsift_mime::Message;
//!
//! let raw = b"From: sender@example.com\r\n\
//!             Subject: Test\r\n\
//!             Content-Type: text/plain\r\n\
//!             \r\n\
//!             Hello, World!";
//!
//! let message = Message::parse(raw)?;
//! println!("Subject: {}", message.subject().unwrap_or_default());
//! println!("Body: {:?}", message.text_body()?);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod content_type;
mod date;
mod error;
mod header;
mod message;

pub mod encoding;

pub use content_type::ContentType;
pub use date::{parse_date, received_date};
pub use error::{Error, Result};
pub use header::Headers;
pub use message::{Body, Message, Part, TransferEncoding};
