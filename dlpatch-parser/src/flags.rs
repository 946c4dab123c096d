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

use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    /// Edit and kind tags carried by a [`crate::node::Node`].
    ///
    /// Exactly one of the `KIND_*` bits is set on every node that has completed building.
    /// Diff nodes may additionally carry any subset of the `EDIT_*` bits permitted for their
    /// kind (see the per-kind `*_FORBIDDEN` constants below); target nodes never carry an
    /// edit bit.
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Flag: u32 {
        const NOOP          = 1 << 0;
        const INSERT         = 1 << 1;
        const RENAME         = 1 << 2;
        const REDEFINE       = 1 << 3;
        const DELETE         = 1 << 4;

        const IMPORT          = 1 << 8;
        const EXPORT          = 1 << 9;
        const SUB_SCOPE        = 1 << 10;
        const SUB_DECLARATION  = 1 << 11;
        const USE             = 1 << 12;
        const FUNCTION        = 1 << 13;
        const INCLUDE         = 1 << 14;
        const VARDECL         = 1 << 15;
    }
}

impl Flag {
    pub const EDIT_MASK: Flag = Flag::from_bits_truncate(
        Flag::NOOP.bits() | Flag::INSERT.bits() | Flag::RENAME.bits() | Flag::REDEFINE.bits() | Flag::DELETE.bits(),
    );
    pub const KIND_MASK: Flag = Flag::from_bits_truncate(
        Flag::IMPORT.bits()
            | Flag::EXPORT.bits()
            | Flag::SUB_SCOPE.bits()
            | Flag::SUB_DECLARATION.bits()
            | Flag::USE.bits()
            | Flag::FUNCTION.bits()
            | Flag::INCLUDE.bits()
            | Flag::VARDECL.bits(),
    );

    pub fn edit_bits(self) -> Flag {
        self & Flag::EDIT_MASK
    }

    pub fn kind_bits(self) -> Flag {
        self & Flag::KIND_MASK
    }

    /// Edit bits forbidden on an import: it can be renamed, inserted wholesale, or left
    /// alone, but never deleted (an existing import's `compare_sig_id` is permanent — there
    /// is no "remove this import" operation, only "rename it to something else") nor
    /// redefined (there is no separate value to redefine an import with — a rename already
    /// covers swapping its path).
    pub fn import_forbidden() -> Flag {
        Flag::DELETE | Flag::REDEFINE
    }

    /// An export's identity is its type+name; it may be redefined (the value changes), but
    /// not deleted, renamed (there is no separate name to rename to), or inserted via an
    /// edit flag on an existing node.
    pub fn export_forbidden() -> Flag {
        Flag::DELETE | Flag::INSERT | Flag::RENAME
    }

    pub fn sub_declaration_forbidden() -> Flag {
        Flag::DELETE | Flag::INSERT | Flag::RENAME
    }

    pub fn vardecl_forbidden() -> Flag {
        Flag::INSERT
    }

    /// Same reasoning as [`Flag::import_forbidden`]: an include's only content is its path,
    /// so a rename covers every edit a redefine would otherwise need to express, and there
    /// is no "remove this include" operation.
    pub fn include_forbidden() -> Flag {
        Flag::DELETE | Flag::REDEFINE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_and_edit_bits_do_not_overlap() {
        assert!((Flag::EDIT_MASK & Flag::KIND_MASK).is_empty());
    }

    #[test]
    fn contains_reads_like_any() {
        let f = Flag::RENAME | Flag::FUNCTION;
        assert!(f.contains(Flag::RENAME));
        assert!(!f.contains(Flag::DELETE));
    }
}
