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

use dlpatch_cache::Id;

use crate::flags::Flag;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One element of a built tree: an import line, an export line, a `use` statement, a
/// function call, a sub scope/declaration, an `!include`, or a variable declaration.
///
/// `sig_id` is always the node's canonical signature. `compare_sig_id` is the (possibly
/// coarser) identity the merger matches on. `order_sig_id` starts out equal to
/// `compare_sig_id` and is what the orderer actually keys its ranking table on, kept
/// separate so a rename can change `sig_id`/`compare_sig_id` without disturbing the node's
/// position.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    pub sig_id: Id,
    pub new_sig_id: Id,
    pub compare_sig_id: Id,
    pub order_sig_id: Id,
    pub flags: Flag,
    pub order: u32,
    pub source_line: u64,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: Flag, sig_id: Id, compare_sig_id: Id, source_line: u64) -> Self {
        Node {
            sig_id,
            new_sig_id: Id::NULL,
            compare_sig_id,
            order_sig_id: compare_sig_id,
            flags: kind,
            order: 0,
            source_line,
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> Flag {
        self.flags.kind_bits()
    }

    pub fn edits(&self) -> Flag {
        self.flags.edit_bits()
    }

    pub fn is_kind(&self, kind: Flag) -> bool {
        self.kind() == kind
    }

    pub fn has_edit(&self, edit: Flag) -> bool {
        self.edits().contains(edit)
    }
}
