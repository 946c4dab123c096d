use thiserror::Error;

/// Failures from opening, reading, or committing `.pak` archives. Kept distinct from
/// `dlpatch_parser::ParseError` since archive I/O is its own failure domain; the CLI front-end
/// wraps one of these in a `ParseError::Io` when it needs to report it alongside a parse
/// failure.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("entry '{0}' not found in archive")]
    EntryNotFound(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}
