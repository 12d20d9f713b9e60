//! Directory-backed folders.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use super::mbox::MboxFolder;
use super::{LocalFolder, LocalMessage};
use crate::store::{StoreError, StoreResult, check_index};

/// A directory whose subdirectories and `.mbox` files are child folders
/// and whose `.eml` files are messages.
#[derive(Debug, Clone)]
pub struct DirectoryFolder {
    name: String,
    sub_folders: Vec<PathBuf>,
    messages: Vec<PathBuf>,
}

impl DirectoryFolder {
    /// Lists a directory. Entries are sorted by file name; hidden entries,
    /// symlinks and files with other extensions are skipped.
    pub(super) fn read(path: &Path) -> StoreResult<Self> {
        let io_error = |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut entries = std::fs::read_dir(path)
            .map_err(io_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(io_error)?;
        entries.sort_by_key(std::fs::DirEntry::file_name);

        let mut sub_folders = Vec::new();
        let mut messages = Vec::new();

        for entry in entries {
            let entry_path = entry.path();
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }

            let file_type = entry.file_type().map_err(io_error)?;
            if file_type.is_dir() {
                sub_folders.push(entry_path);
            } else if file_type.is_file() && has_extension(&entry_path, "mbox") {
                sub_folders.push(entry_path);
            } else if file_type.is_file() && has_extension(&entry_path, "eml") {
                messages.push(entry_path);
            } else {
                trace!("Skipping {}", entry_path.display());
            }
        }

        debug!(
            "Listed {}: {} folders, {} messages",
            path.display(),
            sub_folders.len(),
            messages.len()
        );

        Ok(Self {
            name: display_name(path),
            sub_folders,
            messages,
        })
    }

    pub(super) fn name(&self) -> &str {
        &self.name
    }

    pub(super) fn sub_folder_count(&self) -> usize {
        self.sub_folders.len()
    }

    pub(super) fn sub_folder(&self, index: usize) -> StoreResult<LocalFolder> {
        check_index("folder", index, self.sub_folders.len())?;
        let path = &self.sub_folders[index];
        if path.is_dir() {
            Ok(LocalFolder::Directory(Self::read(path)?))
        } else {
            Ok(LocalFolder::Mbox(MboxFolder::read(path)?))
        }
    }

    pub(super) fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub(super) fn message(&self, index: usize) -> StoreResult<LocalMessage> {
        check_index("message", index, self.messages.len())?;
        let path = &self.messages[index];
        let raw = std::fs::read(path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        LocalMessage::parse(path.display().to_string(), &raw)
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::{Folder, Message};
    use std::fs;

    #[test]
    fn test_directory_listing_order_and_filtering() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("b-folder")).unwrap();
        fs::create_dir(root.join("a-folder")).unwrap();
        fs::create_dir(root.join(".hidden")).unwrap();
        fs::write(root.join("c.mbox"), b"").unwrap();
        fs::write(root.join("2.eml"), b"Subject: two\n\n").unwrap();
        fs::write(root.join("1.EML"), b"Subject: one\n\n").unwrap();
        fs::write(root.join("notes.txt"), b"ignored").unwrap();

        let folder = LocalFolder::Directory(DirectoryFolder::read(root).unwrap());

        assert_eq!(folder.sub_folder_count(), 3);
        assert_eq!(folder.sub_folder(0).unwrap().name(), "a-folder");
        assert_eq!(folder.sub_folder(1).unwrap().name(), "b-folder");
        let mbox = folder.sub_folder(2).unwrap();
        assert!(matches!(mbox, LocalFolder::Mbox(_)));
        assert_eq!(mbox.name(), "c");

        assert_eq!(folder.message_count(), 2);
        assert_eq!(
            folder.message(0).unwrap().subject().unwrap().as_deref(),
            Some("one")
        );
        assert_eq!(
            folder.message(1).unwrap().subject().unwrap().as_deref(),
            Some("two")
        );
        assert!(folder.message(2).is_err());
    }

    #[test]
    fn test_message_read_failure_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.eml");
        fs::write(&path, b"Subject: x\n\n").unwrap();
        let folder = DirectoryFolder::read(dir.path()).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(matches!(folder.message(0), Err(StoreError::Io { .. })));
    }
}
