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

//! An insertion-ordered string interner. Every signature produced by the tree builder is
//! handed to a `StringCache` and referenced afterwards by its `Id`, so that nodes carry a
//! cheap, copyable handle instead of an owned `String`.
//!
//! Ids are dense and assigned in insertion order starting just after the reserved
//! [`Id::NULL`], which always maps to the empty string. This mirrors an associative cache
//! with a permanent sentinel entry rather than a general-purpose hash-based interner: the
//! cache is rebuilt from scratch for every diff, never shared across parses, and strings are
//! never removed except by a wholesale [`StringCache::reset`] or [`StringCache::clear`].

use indexmap::IndexSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A dense identifier into a [`StringCache`]. `Id::NULL` denotes "no string" and is never
/// returned by [`StringCache::find_or_add`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Id(u32);

impl Id {
    /// The sentinel id, reserved for the empty string.
    pub const NULL: Id = Id(0);

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Insertion-ordered interner from `String` to [`Id`].
///
/// `Id::NULL` is always present, mapped to `""`. A fresh cache, one that has just been
/// [`reset`](StringCache::reset), or one just [`clear`](StringCache::clear)ed, differ only in
/// whether the sentinel pair is present; `next_id` always points one past the highest id in
/// use.
#[derive(Clone, Debug)]
pub struct StringCache {
    strings: IndexSet<String>,
}

impl Default for StringCache {
    fn default() -> Self {
        Self::new()
    }
}

impl StringCache {
    pub fn new() -> Self {
        let mut strings = IndexSet::new();
        strings.insert(String::new());
        StringCache { strings }
    }

    /// Looks up `value`'s id, if it has been interned.
    pub fn find(&self, value: &str) -> Option<Id> {
        self.strings.get_index_of(value).map(|idx| Id(idx as u32))
    }

    /// Looks up the string behind `id`. Falls back to the reserved empty string if `id` is
    /// out of range, mirroring the associative cache this is modelled on, which never lets a
    /// lookup miss produce a panic.
    pub fn resolve(&self, id: Id) -> &str {
        self.strings
            .get_index(id.0 as usize)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Returns `value`'s id, interning it first if necessary.
    pub fn find_or_add(&mut self, value: impl Into<String>) -> Id {
        let value = value.into();
        if let Some(idx) = self.strings.get_index_of(&value) {
            return Id(idx as u32);
        }
        let (idx, _) = self.strings.insert_full(value);
        Id(idx as u32)
    }

    /// Removes `value` if present. Note this can leave `Id`s held elsewhere pointing at a
    /// different string, since `IndexSet` removal shifts later entries back by one; callers
    /// that need stable ids across deletions should prefer [`reset`](StringCache::reset)
    /// between parses instead of deleting individual entries mid-parse.
    pub fn delete(&mut self, value: &str) {
        self.strings.shift_remove(value);
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Drops every interned string except the reserved sentinel. The next id handed out
    /// after a reset is the same as it would be from [`StringCache::new`].
    pub fn reset(&mut self) {
        self.strings.clear();
        self.strings.insert(String::new());
    }

    /// Drops everything, including the sentinel. A cache in this state must not be queried
    /// with `Id::NULL` until something has been interned again.
    pub fn clear(&mut self) {
        self.strings.clear();
    }
}

/// Mutex-guarded [`StringCache`], for the archive/CLI layers that hand the same cache to
/// more than one in-flight parse. Plain [`StringCache`] is left unsynchronized since the
/// common case — one parser owning its own cache — never needs the lock.
#[derive(Debug, Default)]
pub struct SharedStringCache(std::sync::Mutex<StringCache>);

impl SharedStringCache {
    pub fn new() -> Self {
        SharedStringCache(std::sync::Mutex::new(StringCache::new()))
    }

    pub fn find(&self, value: &str) -> Option<Id> {
        self.0.lock().expect("string cache mutex poisoned").find(value)
    }

    pub fn resolve(&self, id: Id) -> String {
        self.0.lock().expect("string cache mutex poisoned").resolve(id).to_string()
    }

    pub fn find_or_add(&self, value: impl Into<String>) -> Id {
        self.0.lock().expect("string cache mutex poisoned").find_or_add(value)
    }

    pub fn reset(&self) {
        self.0.lock().expect("string cache mutex poisoned").reset()
    }

    pub fn len(&self) -> usize {
        self.0.lock().expect("string cache mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().expect("string cache mutex poisoned").is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_id_resolves_to_empty_string() {
        let cache = StringCache::new();
        assert_eq!(cache.resolve(Id::NULL), "");
    }

    #[test]
    fn find_or_add_is_idempotent() {
        let mut cache = StringCache::new();
        let a = cache.find_or_add("sub Main()");
        let b = cache.find_or_add("sub Main()");
        assert_eq!(a, b);
        assert_eq!(cache.resolve(a), "sub Main()");
    }

    #[test]
    fn distinct_strings_get_distinct_ids() {
        let mut cache = StringCache::new();
        let a = cache.find_or_add("foo");
        let b = cache.find_or_add("bar");
        assert_ne!(a, b);
    }

    #[test]
    fn find_misses_before_insertion() {
        let cache = StringCache::new();
        assert_eq!(cache.find("not interned"), None);
    }

    #[test]
    fn reset_keeps_only_sentinel() {
        let mut cache = StringCache::new();
        cache.find_or_add("a");
        cache.find_or_add("b");
        cache.reset();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.resolve(Id::NULL), "");
        let id = cache.find_or_add("a");
        assert_ne!(id, Id::NULL);
    }

    #[test]
    fn clear_drops_sentinel_too() {
        let mut cache = StringCache::new();
        cache.clear();
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn ids_are_assigned_in_insertion_order() {
        let mut cache = StringCache::new();
        let first = cache.find_or_add("first");
        let second = cache.find_or_add("second");
        assert!(first.as_u32() < second.as_u32());
    }

    #[test]
    fn shared_string_cache_is_idempotent_across_threads() {
        use std::sync::Arc;
        use std::thread;

        let cache = Arc::new(SharedStringCache::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || cache.find_or_add("shared")));
        }
        let ids: Vec<Id> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(ids.iter().all(|&id| id == ids[0]));
        assert_eq!(cache.resolve(ids[0]), "shared");
    }
}
