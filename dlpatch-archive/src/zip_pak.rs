use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::ArchiveError;
use crate::ArchivePak;

/// A `.pak` archive fully read into memory on open. Writes are staged in place and only
/// flushed to disk by [`ZipArchivePak::finish`] (or, if a caller forgets, by `Drop`), which
/// rewrites every entry — unchanged ones included — into a sibling temp file before replacing
/// the original, since the `zip` crate has no in-place single-entry update.
pub struct ZipArchivePak {
    path: PathBuf,
    entries: Vec<(String, Vec<u8>)>,
    dirty: HashSet<usize>,
    finished: bool,
}

impl ZipArchivePak {
    /// Opens `path` and buffers every entry's raw bytes.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ArchiveError> {
        let path = path.into();
        let file = File::open(&path)?;
        let mut zip = ZipArchive::new(file)?;
        let mut entries = Vec::with_capacity(zip.len());
        for i in 0..zip.len() {
            let mut entry = zip.by_index(i)?;
            let name = entry.name().to_string();
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data)?;
            entries.push((name, data));
        }
        Ok(ZipArchivePak {
            path,
            entries,
            dirty: HashSet::new(),
            finished: false,
        })
    }

    fn find_index_ci(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    /// Flushes any staged writes to disk and marks this archive closed. A no-op if nothing was
    /// written. Safe to call more than once; only the first call after a write does any I/O.
    pub fn finish(&mut self) -> Result<(), ArchiveError> {
        if self.finished || self.dirty.is_empty() {
            self.finished = true;
            return Ok(());
        }

        let tmp_path = self.path.with_extension("pak.tmp");
        {
            let tmp_file = File::create(&tmp_path)?;
            let mut writer = ZipWriter::new(tmp_file);
            let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
            for (name, data) in &self.entries {
                writer.start_file(name.clone(), options)?;
                writer.write_all(data)?;
            }
            writer.finish()?;
        }
        if let Err(e) = std::fs::rename(&tmp_path, &self.path) {
            std::fs::remove_file(&tmp_path).ok();
            return Err(e.into());
        }
        self.finished = true;
        Ok(())
    }
}

impl ArchivePak for ZipArchivePak {
    fn has_entry_ci(&self, name: &str) -> bool {
        self.find_index_ci(name).is_some()
    }

    fn read_entry_text(&mut self, name: &str) -> Result<String, ArchiveError> {
        let idx = self
            .find_index_ci(name)
            .ok_or_else(|| ArchiveError::EntryNotFound(name.to_string()))?;
        String::from_utf8(self.entries[idx].1.clone())
            .map_err(|e| ArchiveError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }

    fn write_entry_text(&mut self, name: &str, text: &str) -> Result<(), ArchiveError> {
        let idx = self
            .find_index_ci(name)
            .ok_or_else(|| ArchiveError::EntryNotFound(name.to_string()))?;
        self.entries[idx].1 = text.as_bytes().to_vec();
        self.dirty.insert(idx);
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ZipArchivePak {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(e) = self.finish() {
                log::error!(
                    "archive {} was not closed successfully and changes to it might not go through: {e}",
                    self.path.display()
                );
            }
        }
    }
}
