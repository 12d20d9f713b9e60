//! Store accessor abstraction.
//!
//! A [`MailStore`] is an opened, read-only container with one root
//! [`Folder`]. Folders expose their children and messages by index, in
//! the order the container records them; a [`Message`] exposes the raw
//! fields the extractor normalizes.
//!
//! Two accessors ship with the crate: [`LocalStore`] for on-disk exports
//! (directory trees of `.eml` files and mbox files) and [`MemoryStore`]
//! for hierarchies built in code.

mod error;
pub mod local;
pub mod memory;

use chrono::NaiveDateTime;

pub use error::{StoreError, StoreResult};
pub use local::{LocalFolder, LocalMessage, LocalStore};
pub use memory::{FolderId, MemoryFolder, MemoryMessage, MemoryStore, MemoryStoreBuilder};

/// An opened mail store.
pub trait MailStore {
    /// Folder type of this store.
    type Folder: Folder;

    /// Returns the root folder.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be read.
    fn root(&self) -> StoreResult<Self::Folder>;

    /// Closes the store, releasing the underlying container.
    ///
    /// Consuming `self` makes a second close impossible.
    ///
    /// # Errors
    ///
    /// Returns an error if releasing the container fails.
    fn close(self) -> StoreResult<()>
    where
        Self: Sized;
}

/// A node of the folder hierarchy.
pub trait Folder: Sized {
    /// Message type of this folder.
    type Message: Message;

    /// Display name of the folder.
    fn name(&self) -> &str;

    /// Number of child folders.
    fn sub_folder_count(&self) -> usize;

    /// Returns the child folder at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range or the child cannot
    /// be read.
    fn sub_folder(&self, index: usize) -> StoreResult<Self>;

    /// Number of messages directly in this folder.
    fn message_count(&self) -> usize;

    /// Returns the message at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range or the message cannot
    /// be read.
    fn message(&self, index: usize) -> StoreResult<Self::Message>;
}

/// Raw message fields as recorded by the store.
///
/// Every accessor returns `Ok(None)` for a field the store does not
/// record. Errors are reserved for content that is present but unreadable.
pub trait Message {
    /// Subject line.
    ///
    /// # Errors
    ///
    /// Returns an error if the field cannot be read.
    fn subject(&self) -> StoreResult<Option<String>>;

    /// Plain-text body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be decoded.
    fn plain_text_body(&self) -> StoreResult<Option<String>>;

    /// HTML body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be decoded.
    fn html_body(&self) -> StoreResult<Option<String>>;

    /// Sender display string.
    ///
    /// # Errors
    ///
    /// Returns an error if the field cannot be read.
    fn sender(&self) -> StoreResult<Option<String>>;

    /// Recipient display string.
    ///
    /// # Errors
    ///
    /// Returns an error if the field cannot be read.
    fn recipients(&self) -> StoreResult<Option<String>>;

    /// Delivery timestamp in UTC.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timestamp`] if a recorded timestamp cannot be
    /// decoded, or another variant if the message itself is unreadable.
    fn delivery_time(&self) -> StoreResult<Option<NaiveDateTime>>;
}

/// Checks an index against a sequence length.
pub(crate) const fn check_index(kind: &'static str, index: usize, count: usize) -> StoreResult<()> {
    if index < count {
        Ok(())
    } else {
        Err(StoreError::IndexOutOfRange { kind, index, count })
    }
}
