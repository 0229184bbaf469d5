//! File-system collaborator
//!
//! The runtime never touches the disk directly. Project loading and the file
//! builtins go through a [`FileSystem`] supplied by the host, so an embedder
//! can sandbox or virtualise storage.
//!
//! Two adapters ship with the crate:
//!
//! - [`StdFileSystem`]: `std::fs`, used by the `pith` binary
//! - [`MemoryFileSystem`]: an in-memory tree for embedding and tests

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub trait FileSystem {
    /// Whole file as text, `None` when it cannot be read
    fn read_file(&self, path: &Path) -> Option<String>;

    /// Replace the file's contents; false on failure
    fn write_file(&self, path: &Path, contents: &str) -> bool;

    fn file_exists(&self, path: &Path) -> bool;

    /// Entry names of a directory (no `.`/`..`), sorted
    fn list_dir(&self, path: &Path) -> Option<Vec<String>>;

    /// Append to a file, creating it when missing
    fn append_file(&self, path: &Path, contents: &str) -> bool {
        let mut existing = self.read_file(path).unwrap_or_default();
        existing.push_str(contents);
        self.write_file(path, &existing)
    }
}

/// Adapter over `std::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn read_file(&self, path: &Path) -> Option<String> {
        fs::read_to_string(path).ok()
    }

    fn write_file(&self, path: &Path, contents: &str) -> bool {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && fs::create_dir_all(parent).is_err()
        {
            return false;
        }
        fs::write(path, contents).is_ok()
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_dir(&self, path: &Path) -> Option<Vec<String>> {
        let entries = fs::read_dir(path).ok()?;
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        Some(names)
    }

    fn append_file(&self, path: &Path, contents: &str) -> bool {
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| file.write_all(contents.as_bytes()))
            .is_ok()
    }
}

/// In-memory file tree
///
/// Clones share the same storage, so a test can keep a handle and inspect
/// what the runtime wrote. Directories exist implicitly as prefixes of
/// stored file paths.
#[derive(Debug, Default, Clone)]
pub struct MemoryFileSystem {
    files: Rc<RefCell<BTreeMap<PathBuf, String>>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        MemoryFileSystem::default()
    }

    /// Builder-style seeding of a file
    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.files.borrow_mut().insert(path.into(), contents.into());
        self
    }

    /// Contents of a stored file
    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.borrow().get(path.as_ref()).cloned()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.files
            .borrow()
            .keys()
            .any(|file| file != path && file.starts_with(path))
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_file(&self, path: &Path) -> Option<String> {
        self.get(path)
    }

    fn write_file(&self, path: &Path, contents: &str) -> bool {
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), contents.to_string());
        true
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path) || self.is_dir(path)
    }

    fn list_dir(&self, path: &Path) -> Option<Vec<String>> {
        if !self.is_dir(path) {
            return None;
        }
        let names: BTreeSet<String> = self
            .files
            .borrow()
            .keys()
            .filter_map(|file| file.strip_prefix(path).ok())
            .filter_map(|rest| rest.components().next())
            .map(|first| first.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(names.into_iter().collect())
    }
}
