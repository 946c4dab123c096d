// Copyright (c) 2017 King's College London
// created by the Software Development Team <http://soft-dev.org/>
//
// The Universal Permissive License (UPL), Version 1.0
//
// Subject to the condition set forth below, permission is hereby granted to any person obtaining a
// copy of this software, associated documentation and/or data (collectively the "Software"), free
// of charge and under any and all copyright rights in the Software, and any and all patent rights
// owned or freely licensable by each licensor hereunder covering either (i) the unmodified
// Software as contributed to or provided by such licensor, or (ii) the Larger Works (as defined
// below), to deal in both
//
// (a) the Software, and
// (b) any piece of software and/or hardware listed in the lrgrwrks.txt file
// if one is included with the Software (each a "Larger Work" to which the Software is contributed
// by such licensors),
//
// without restriction, including without limitation the rights to copy, create derivative works
// of, display, perform, and distribute the Software and make, use, sell, offer for sale, import,
// export, have made, and have sold the Software and the Larger Work(s), and to sublicense the
// foregoing rights on either these or other terms.
//
// This license is subject to the following condition: The above copyright notice and either this
// complete permission notice or at a minimum a reference to the UPL must be included in all copies
// or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
// BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Case-insensitive entry resolution and commit semantics over `.pak` (zip) archives.
//!
//! [`ArchivePak`] abstracts over one opened archive; [`ZipArchivePak`] is the concrete
//! `zip`-backed implementation. [`Workspace`] holds an ordered list of opened archives and
//! resolves a diff's declared target path against the first one that contains it, mirroring
//! how the original patcher scans its `.pak` directory and commits every parsed entry back
//! into whichever archive already held it.

mod error;
mod workspace;
mod zip_pak;

pub use error::ArchiveError;
pub use workspace::{ArchiveIndex, Workspace};
pub use zip_pak::ZipArchivePak;

use std::path::Path;

/// One opened archive container. Entry lookup is always case-insensitive: archives built by
/// different tools do not agree on a canonical case for stored paths.
pub trait ArchivePak {
    /// Does this archive contain an entry whose name case-insensitively equals `name`?
    fn has_entry_ci(&self, name: &str) -> bool;

    /// Reads `name`'s contents as UTF-8 text. `name` is matched case-insensitively.
    fn read_entry_text(&mut self, name: &str) -> Result<String, ArchiveError>;

    /// Overwrites `name`'s contents with `text`. `name` is matched case-insensitively; no
    /// entry is created if none already exists (callers must check [`ArchivePak::has_entry_ci`]
    /// first, as [`Workspace::commit`] does).
    fn write_entry_text(&mut self, name: &str, text: &str) -> Result<(), ArchiveError>;

    /// The path this archive was opened from.
    fn path(&self) -> &Path;
}
