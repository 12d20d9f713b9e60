//! In-memory mail store.
//!
//! Folders live in a flat arena and refer to each other by index, so
//! arbitrarily deep hierarchies are built and dropped without recursion.

use std::sync::Arc;

use chrono::NaiveDateTime;

use super::{Folder, MailStore, Message, StoreError, StoreResult, check_index};

/// Handle to a folder inside a [`MemoryStoreBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FolderId(usize);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum DeliveryTime {
    #[default]
    Absent,
    At(NaiveDateTime),
    Undecodable(String),
}

/// A message held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryMessage {
    subject: Option<String>,
    plain_text_body: Option<String>,
    html_body: Option<String>,
    sender: Option<String>,
    recipients: Option<String>,
    delivery_time: DeliveryTime,
    corruption: Option<String>,
}

impl MemoryMessage {
    /// Creates a message with no fields recorded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the subject.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the plain-text body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.plain_text_body = Some(body.into());
        self
    }

    /// Sets the HTML body.
    #[must_use]
    pub fn with_html_body(mut self, body: impl Into<String>) -> Self {
        self.html_body = Some(body.into());
        self
    }

    /// Sets the sender display string.
    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Sets the recipient display string.
    #[must_use]
    pub fn with_recipients(mut self, recipients: impl Into<String>) -> Self {
        self.recipients = Some(recipients.into());
        self
    }

    /// Sets the delivery timestamp (UTC).
    #[must_use]
    pub fn delivered_at(mut self, time: NaiveDateTime) -> Self {
        self.delivery_time = DeliveryTime::At(time);
        self
    }

    /// Records a delivery timestamp that cannot be decoded.
    #[must_use]
    pub fn with_undecodable_delivery_time(mut self, raw: impl Into<String>) -> Self {
        self.delivery_time = DeliveryTime::Undecodable(raw.into());
        self
    }

    /// Makes every field read fail with [`StoreError::Corrupt`].
    #[must_use]
    pub fn corrupted(mut self, reason: impl Into<String>) -> Self {
        self.corruption = Some(reason.into());
        self
    }

    fn field(&self, value: Option<&String>) -> StoreResult<Option<String>> {
        match &self.corruption {
            Some(reason) => Err(StoreError::Corrupt(reason.clone())),
            None => Ok(value.cloned()),
        }
    }
}

impl Message for MemoryMessage {
    fn subject(&self) -> StoreResult<Option<String>> {
        self.field(self.subject.as_ref())
    }

    fn plain_text_body(&self) -> StoreResult<Option<String>> {
        self.field(self.plain_text_body.as_ref())
    }

    fn html_body(&self) -> StoreResult<Option<String>> {
        self.field(self.html_body.as_ref())
    }

    fn sender(&self) -> StoreResult<Option<String>> {
        self.field(self.sender.as_ref())
    }

    fn recipients(&self) -> StoreResult<Option<String>> {
        self.field(self.recipients.as_ref())
    }

    fn delivery_time(&self) -> StoreResult<Option<NaiveDateTime>> {
        if let Some(reason) = &self.corruption {
            return Err(StoreError::Corrupt(reason.clone()));
        }
        match &self.delivery_time {
            DeliveryTime::Absent => Ok(None),
            DeliveryTime::At(time) => Ok(Some(*time)),
            DeliveryTime::Undecodable(raw) => Err(StoreError::Timestamp(raw.clone())),
        }
    }
}

#[derive(Debug)]
struct FolderNode {
    name: String,
    children: Vec<usize>,
    messages: Vec<MemoryMessage>,
}

impl FolderNode {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            messages: Vec::new(),
        }
    }
}

/// Builds a [`MemoryStore`] folder by folder.
///
/// ```ignore
/// let mut builder = MemoryStore::builder();
/// let inbox = builder.add_folder(builder.root(), "Inbox");
/// builder.add_message(inbox, MemoryMessage::new().with_subject("Hello"));
/// let store = builder.build();
/// ```
#[derive(Debug)]
pub struct MemoryStoreBuilder {
    nodes: Vec<FolderNode>,
}

impl Default for MemoryStoreBuilder {
    fn default() -> Self {
        Self {
            nodes: vec![FolderNode::new("")],
        }
    }
}

impl MemoryStoreBuilder {
    /// Creates a builder holding an empty, unnamed root folder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The root folder.
    #[must_use]
    pub const fn root(&self) -> FolderId {
        FolderId(0)
    }

    /// Appends a child folder to `parent` and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if `parent` comes from another builder and is past the end of
    /// this one. Handles are plain indices, so a foreign handle in range
    /// is not detected.
    pub fn add_folder(&mut self, parent: FolderId, name: impl Into<String>) -> FolderId {
        let id = self.nodes.len();
        self.nodes[parent.0].children.push(id);
        self.nodes.push(FolderNode::new(name));
        FolderId(id)
    }

    /// Appends a message to `folder`.
    ///
    /// # Panics
    ///
    /// Panics if `folder` comes from another builder and is past the end of
    /// this one. Handles are plain indices, so a foreign handle in range
    /// is not detected.
    pub fn add_message(&mut self, folder: FolderId, message: MemoryMessage) -> &mut Self {
        self.nodes[folder.0].messages.push(message);
        self
    }

    /// Finishes the store.
    #[must_use]
    pub fn build(self) -> MemoryStore {
        MemoryStore {
            nodes: self.nodes.into(),
        }
    }
}

/// A mail store held entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    nodes: Arc<[FolderNode]>,
}

impl MemoryStore {
    /// Starts building a store.
    #[must_use]
    pub fn builder() -> MemoryStoreBuilder {
        MemoryStoreBuilder::new()
    }
}

impl MailStore for MemoryStore {
    type Folder = MemoryFolder;

    fn root(&self) -> StoreResult<MemoryFolder> {
        Ok(MemoryFolder {
            nodes: Arc::clone(&self.nodes),
            id: 0,
        })
    }

    fn close(self) -> StoreResult<()> {
        Ok(())
    }
}

/// A folder of a [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct MemoryFolder {
    nodes: Arc<[FolderNode]>,
    id: usize,
}

impl MemoryFolder {
    fn node(&self) -> &FolderNode {
        &self.nodes[self.id]
    }
}

impl Folder for MemoryFolder {
    type Message = MemoryMessage;

    fn name(&self) -> &str {
        &self.node().name
    }

    fn sub_folder_count(&self) -> usize {
        self.node().children.len()
    }

    fn sub_folder(&self, index: usize) -> StoreResult<Self> {
        let children = &self.node().children;
        check_index("folder", index, children.len())?;
        Ok(Self {
            nodes: Arc::clone(&self.nodes),
            id: children[index],
        })
    }

    fn message_count(&self) -> usize {
        self.node().messages.len()
    }

    fn message(&self, index: usize) -> StoreResult<MemoryMessage> {
        let messages = &self.node().messages;
        check_index("message", index, messages.len())?;
        Ok(messages[index].clone())
    }
}
