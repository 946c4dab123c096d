use std::path::Path;

use crate::error::ArchiveError;
use crate::zip_pak::ZipArchivePak;
use crate::ArchivePak;

/// Position of an opened archive within a [`Workspace`]'s ordered list.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ArchiveIndex(usize);

/// An ordered collection of opened `.pak` archives. Resolution and commit both favour list
/// order: the first archive that already contains an entry is the one that serves it (§4.8).
#[derive(Default)]
pub struct Workspace {
    archives: Vec<ZipArchivePak>,
}

impl Workspace {
    pub fn new() -> Self {
        Workspace::default()
    }

    /// Opens every `.pak` file directly inside `dir` (non-recursive), in directory-iteration
    /// order. Rejects a missing or non-directory path the same way the original's
    /// `FileManager::SetPath` does.
    pub fn open_dir(dir: &Path) -> Result<Self, ArchiveError> {
        if !dir.is_dir() {
            return Err(ArchiveError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} is not a directory", dir.display()),
            )));
        }
        let mut archives = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_pak = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("pak"))
                .unwrap_or(false);
            if path.is_file() && is_pak {
                archives.push(ZipArchivePak::open(path)?);
            }
        }
        Ok(Workspace { archives })
    }

    pub fn len(&self) -> usize {
        self.archives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archives.is_empty()
    }

    /// Registers an already-opened archive, for callers (and tests) that build one directly
    /// instead of scanning a directory.
    pub fn push(&mut self, archive: ZipArchivePak) {
        self.archives.push(archive);
    }

    /// The first archive, in list order, whose entry name case-insensitively equals
    /// `target_path`.
    pub fn resolve(&self, target_path: &str) -> Option<ArchiveIndex> {
        self.archives
            .iter()
            .position(|a| a.has_entry_ci(target_path))
            .map(ArchiveIndex)
    }

    pub fn read(&mut self, index: ArchiveIndex, target_path: &str) -> Result<String, ArchiveError> {
        self.archives[index.0].read_entry_text(target_path)
    }

    /// Writes `text` into the entry at `target_path`, inside whichever archive already
    /// contains it; never creates new entries.
    pub fn commit(&mut self, target_path: &str, text: &str) -> Result<(), ArchiveError> {
        let index = self
            .resolve(target_path)
            .ok_or_else(|| ArchiveError::EntryNotFound(target_path.to_string()))?;
        self.archives[index.0].write_entry_text(target_path, text)
    }

    /// Flushes every archive with pending writes and releases its handle. Collects every
    /// archive's error rather than stopping at the first, so a caller can report the full set
    /// that failed to close — surviving writes are not rolled back (§6: "if a commit partially
    /// writes and then fails, the surviving changes remain").
    pub fn close(mut self) -> Result<(), Vec<ArchiveError>> {
        let mut errs = Vec::new();
        for archive in &mut self.archives {
            if let Err(e) = archive.finish() {
                errs.push(e);
            }
        }
        if errs.is_empty() {
            Ok(())
        } else {
            Err(errs)
        }
    }
}
