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

//! Deterministic text rendering of a merged tree (§4.7). `serialize_tree` is the production
//! path; `serialize_tree_attr` is a debug-oriented sibling that additionally prints each
//! node's edit-flag tags, used only for dumping diff/target trees to the log, never for
//! producing patched output.

use dlpatch_cache::{Id, StringCache};

use crate::flags::Flag;
use crate::node::Node;

const INDENT: &str = "\t";

fn bare_kind(kind: Flag) -> bool {
    kind == Flag::IMPORT || kind == Flag::INCLUDE || kind == Flag::VARDECL
}

/// Renders `nodes` (a full tree's top-level sequence) to its patched source text.
pub fn serialize_tree(nodes: &[Node], cache: &StringCache) -> String {
    nodes
        .iter()
        .map(|n| serialize_node(n, 0, cache))
        .collect::<Vec<_>>()
        .join("\n")
}

fn serialize_node(node: &Node, depth: usize, cache: &StringCache) -> String {
    let indent = INDENT.repeat(depth);
    let sig = cache.resolve(node.sig_id);
    if node.children.is_empty() {
        if bare_kind(node.kind()) {
            format!("{indent}{sig}")
        } else {
            format!("{indent}{sig};")
        }
    } else {
        let body = node
            .children
            .iter()
            .map(|c| serialize_node(c, depth + 1, cache))
            .collect::<Vec<_>>()
            .join("\n");
        format!("{indent}{sig} {{\n{body}\n{indent}}}")
    }
}

const EDIT_TAGS: [(Flag, &str); 5] = [
    (Flag::NOOP, "Noop"),
    (Flag::INSERT, "Insert"),
    (Flag::RENAME, "Rename"),
    (Flag::REDEFINE, "Redefine"),
    (Flag::DELETE, "Delete"),
];

/// Debug rendering of `nodes` including each node's edit-flag tags and rename payloads.
pub fn serialize_tree_attr(nodes: &[Node], cache: &StringCache) -> String {
    nodes
        .iter()
        .map(|n| serialize_node_attr(n, 0, cache))
        .collect::<Vec<_>>()
        .join("\n")
}

fn serialize_node_attr(node: &Node, depth: usize, cache: &StringCache) -> String {
    let indent = INDENT.repeat(depth);
    let sig = cache.resolve(node.sig_id);
    let mut head = format!("{indent}{sig}");
    for (flag, tag) in EDIT_TAGS {
        if node.has_edit(flag) {
            head.push_str(&format!("[{tag}]"));
            if flag == Flag::RENAME && node.new_sig_id != Id::NULL {
                head.push_str(&format!(" -> {}", cache.resolve(node.new_sig_id)));
            }
        }
    }
    if node.children.is_empty() {
        if bare_kind(node.kind()) {
            head
        } else {
            head.push(';');
            head
        }
    } else {
        let body = node
            .children
            .iter()
            .map(|c| serialize_node_attr(c, depth + 1, cache))
            .collect::<Vec<_>>()
            .join("\n");
        format!("{head} {{\n{body}\n{indent}}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_never_gets_a_terminator() {
        let mut cache = StringCache::new();
        let id = cache.find_or_add("import \"a\"");
        let node = Node::new(Flag::IMPORT, id, id, 1);
        assert_eq!(serialize_node(&node, 0, &cache), "import \"a\"");
    }

    #[test]
    fn export_gets_a_terminator() {
        let mut cache = StringCache::new();
        let id = cache.find_or_add("export int N = 5");
        let node = Node::new(Flag::EXPORT, id, id, 1);
        assert_eq!(serialize_node(&node, 0, &cache), "export int N = 5;");
    }

    #[test]
    fn nested_block_indents_children() {
        let mut cache = StringCache::new();
        let outer_id = cache.find_or_add("sub Main()");
        let inner_id = cache.find_or_add("f(1)");
        let mut node = Node::new(Flag::SUB_SCOPE, outer_id, outer_id, 1);
        node.children.push(Node::new(Flag::FUNCTION, inner_id, inner_id, 2));
        assert_eq!(serialize_node(&node, 0, &cache), "sub Main() {\n\tf(1);\n}");
    }

    #[test]
    fn attr_rendering_tags_rename_payload() {
        let mut cache = StringCache::new();
        let id = cache.find_or_add("f(1)");
        let new_id = cache.find_or_add("f(2)");
        let mut node = Node::new(Flag::FUNCTION, id, id, 1);
        node.flags |= Flag::RENAME;
        node.new_sig_id = new_id;
        assert_eq!(serialize_node_attr(&node, 0, &cache), "f(1)[Rename] -> f(2);");
    }
}
