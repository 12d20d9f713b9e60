//! On-disk mail store exports.
//!
//! A directory is a folder: its subdirectories and `*.mbox` files are child
//! folders and its `*.eml` files are messages, all ordered by file name.
//! A single mbox file opens as a root folder without children.

mod directory;
mod mbox;

use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::debug;

use super::{Folder, MailStore, Message, StoreError, StoreResult};

pub use directory::DirectoryFolder;
pub use mbox::MboxFolder;

/// A mail store read from the local filesystem.
#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    root: LocalFolder,
}

impl LocalStore {
    /// Opens a directory tree or an mbox file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the path does not exist and
    /// [`StoreError::Open`] if it is neither a readable directory nor a
    /// well-formed mbox file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(path.to_path_buf()),
            _ => open_error(path, &e),
        })?;

        let root = if metadata.is_dir() {
            LocalFolder::Directory(
                DirectoryFolder::read(path).map_err(|e| rejected(path, e))?,
            )
        } else if metadata.is_file() {
            LocalFolder::Mbox(MboxFolder::read(path).map_err(|e| rejected(path, e))?)
        } else {
            return Err(StoreError::Open {
                path: path.to_path_buf(),
                reason: "not a directory or regular file".to_string(),
            });
        };

        debug!("Opened local store {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            root,
        })
    }

    /// Path the store was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn open_error(path: &Path, error: &dyn std::fmt::Display) -> StoreError {
    StoreError::Open {
        path: path.to_path_buf(),
        reason: error.to_string(),
    }
}

/// Any failure while reading the root is an open failure.
fn rejected(path: &Path, error: StoreError) -> StoreError {
    match error {
        StoreError::Open { .. } => error,
        StoreError::Io { source, .. } => open_error(path, &source),
        other => open_error(path, &other),
    }
}

impl MailStore for LocalStore {
    type Folder = LocalFolder;

    fn root(&self) -> StoreResult<LocalFolder> {
        Ok(self.root.clone())
    }

    fn close(self) -> StoreResult<()> {
        debug!("Closed local store {}", self.path.display());
        Ok(())
    }
}

/// A folder of a [`LocalStore`].
#[derive(Debug, Clone)]
pub enum LocalFolder {
    /// A directory of `.eml` files and sub-folders.
    Directory(DirectoryFolder),
    /// An mbox file.
    Mbox(MboxFolder),
}

impl Folder for LocalFolder {
    type Message = LocalMessage;

    fn name(&self) -> &str {
        match self {
            Self::Directory(folder) => folder.name(),
            Self::Mbox(folder) => folder.name(),
        }
    }

    fn sub_folder_count(&self) -> usize {
        match self {
            Self::Directory(folder) => folder.sub_folder_count(),
            Self::Mbox(_) => 0,
        }
    }

    fn sub_folder(&self, index: usize) -> StoreResult<Self> {
        match self {
            Self::Directory(folder) => folder.sub_folder(index),
            Self::Mbox(_) => Err(StoreError::IndexOutOfRange {
                kind: "folder",
                index,
                count: 0,
            }),
        }
    }

    fn message_count(&self) -> usize {
        match self {
            Self::Directory(folder) => folder.message_count(),
            Self::Mbox(folder) => folder.message_count(),
        }
    }

    fn message(&self, index: usize) -> StoreResult<LocalMessage> {
        match self {
            Self::Directory(folder) => folder.message(index),
            Self::Mbox(folder) => folder.message(index),
        }
    }
}

/// A parsed message of a [`LocalStore`].
#[derive(Debug, Clone)]
pub struct LocalMessage {
    location: String,
    message: mailsift_mime::Message,
}

impl LocalMessage {
    /// Parses a raw RFC 5322 message found at `location`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Mime`] if the MIME structure is malformed.
    pub fn parse(location: impl Into<String>, raw: &[u8]) -> StoreResult<Self> {
        let location = location.into();
        match mailsift_mime::Message::parse(raw) {
            Ok(message) => Ok(Self { location, message }),
            Err(source) => Err(StoreError::Mime { location, source }),
        }
    }

    /// Where the message was read from.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    fn mime_error(&self, source: mailsift_mime::Error) -> StoreError {
        StoreError::Mime {
            location: self.location.clone(),
            source,
        }
    }
}

impl Message for LocalMessage {
    fn subject(&self) -> StoreResult<Option<String>> {
        Ok(self.message.subject())
    }

    fn plain_text_body(&self) -> StoreResult<Option<String>> {
        self.message.text_body().map_err(|e| self.mime_error(e))
    }

    fn html_body(&self) -> StoreResult<Option<String>> {
        self.message.html_body().map_err(|e| self.mime_error(e))
    }

    fn sender(&self) -> StoreResult<Option<String>> {
        Ok(self.message.from())
    }

    fn recipients(&self) -> StoreResult<Option<String>> {
        Ok(self.message.to())
    }

    fn delivery_time(&self) -> StoreResult<Option<NaiveDateTime>> {
        match self.message.delivery_date() {
            Ok(date) => Ok(date.map(|d| d.naive_utc())),
            Err(e @ mailsift_mime::Error::InvalidDate { .. }) => {
                Err(StoreError::Timestamp(format!("{}: {e}", self.location)))
            }
            Err(e) => Err(self.mime_error(e)),
        }
    }
}
