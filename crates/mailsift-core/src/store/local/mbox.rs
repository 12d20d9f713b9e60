//! Mbox-backed folders.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use super::LocalMessage;
use crate::store::{StoreError, StoreResult, check_index};

const SEPARATOR: &[u8] = b"From ";

/// An mbox file: one folder, no children, messages in file order.
#[derive(Debug, Clone)]
pub struct MboxFolder {
    name: String,
    path: PathBuf,
    messages: Arc<[Vec<u8>]>,
}

impl MboxFolder {
    pub(super) fn read(path: &Path) -> StoreResult<Self> {
        let data = std::fs::read(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let messages = split_mbox(&data).ok_or_else(|| StoreError::Open {
            path: path.to_path_buf(),
            reason: "not an mbox file (no leading \"From \" line)".to_string(),
        })?;
        debug!("Read {} messages from {}", messages.len(), path.display());

        Ok(Self {
            name: path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.to_path_buf(),
            messages: messages.into(),
        })
    }

    pub(super) fn name(&self) -> &str {
        &self.name
    }

    pub(super) fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub(super) fn message(&self, index: usize) -> StoreResult<LocalMessage> {
        check_index("message", index, self.messages.len())?;
        let location = format!("{}#{}", self.path.display(), index + 1);
        LocalMessage::parse(location, &self.messages[index])
    }
}

/// Splits mbox data into raw messages.
///
/// A message starts at a `From ` line that opens the file or follows an
/// empty line. The separator line itself is dropped, `>From ` quoting is
/// undone (mboxrd) and the blank line before the next separator is
/// removed. Returns `None` if non-blank data does not open with a
/// separator.
fn split_mbox(data: &[u8]) -> Option<Vec<Vec<u8>>> {
    let mut messages: Vec<Vec<u8>> = Vec::new();
    let mut current: Option<Vec<u8>> = None;
    let mut previous_blank = true;

    for line in data.split_inclusive(|&b| b == b'\n') {
        let content = line.trim_ascii_end();

        if previous_blank && line.starts_with(SEPARATOR) {
            if let Some(message) = current.take() {
                messages.push(finish_message(message));
            }
            current = Some(Vec::new());
            previous_blank = false;
            continue;
        }

        match current.as_mut() {
            Some(message) => message.extend_from_slice(unquote_from(line)),
            None if content.is_empty() => {}
            None => return None,
        }
        previous_blank = content.is_empty();
    }

    if let Some(message) = current {
        messages.push(finish_message(message));
    }
    Some(messages)
}

/// Drops the trailing blank line that separates messages.
fn finish_message(mut message: Vec<u8>) -> Vec<u8> {
    if message.ends_with(b"\r\n\r\n") {
        message.truncate(message.len() - 2);
    } else if message.ends_with(b"\n\n") {
        message.truncate(message.len() - 1);
    }
    message
}

/// Removes one `>` from lines matching `^>+From `.
fn unquote_from(line: &[u8]) -> &[u8] {
    let quotes = line.iter().take_while(|&&b| b == b'>').count();
    if quotes > 0 && line[quotes..].starts_with(SEPARATOR) {
        &line[1..]
    } else {
        line
    }
}
