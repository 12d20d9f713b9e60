//! Field extraction: raw store message to [`EmailRecord`].

use tracing::debug;

use crate::record::{EmailRecord, format_timestamp};
use crate::store::{Message, StoreError, StoreResult};

/// Normalizes one message into a record.
///
/// Missing fields become empty strings. The body is the plain-text body
/// when non-empty, otherwise the HTML body. A delivery timestamp that is
/// absent or cannot be decoded becomes `None`.
///
/// # Errors
///
/// Any store error other than [`StoreError::Timestamp`] is returned: a
/// message that cannot be read is not papered over as a missing field.
pub fn extract_record<M: Message>(message: &M) -> StoreResult<EmailRecord> {
    let body = match message.plain_text_body()?.filter(|body| !body.is_empty()) {
        Some(body) => body,
        None => message.html_body()?.unwrap_or_default(),
    };

    Ok(EmailRecord {
        subject: message.subject()?.unwrap_or_default(),
        body,
        from: message.sender()?.unwrap_or_default(),
        to: message.recipients()?.unwrap_or_default(),
        delivery_time: delivery_time(message)?,
    })
}

fn delivery_time<M: Message>(message: &M) -> StoreResult<Option<String>> {
    match message.delivery_time() {
        Ok(time) => Ok(time.map(format_timestamp)),
        Err(StoreError::Timestamp(reason)) => {
            debug!("Recording null delivery time: {}", reason);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
