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

//! The semantic-diff tree merger (§4.5): matches `diff_tree` nodes against `target_tree`
//! nodes by compare signature and produces a `result_tree`. Ordering (§4.6) is applied
//! separately by the dialect-level entry points at the bottom of this module, since only
//! they know the right reference array (the full original target list at the top level, or
//! a matched parent's `t.children` one level down) to rank surviving nodes against.

use dlpatch_cache::StringCache;

use crate::error::{ParseError, ParseResult};
use crate::flags::Flag;
use crate::node::Node;
use crate::orderer;

/// What happens to target nodes that no diff node ever claimed, once the diff is exhausted.
#[derive(Clone, Copy)]
enum TailCarry {
    /// Nothing more to add (the dialect already copied every relevant target node eagerly,
    /// as scr/def/loot's imports and exports do via `eager_kinds`).
    None,
    /// Append unmatched target nodes of these kinds (loot's sub declarations, varlist's
    /// includes and variable declarations).
    Kinds(Flag),
    /// Append every remaining unmatched target node, regardless of kind (recursing into a
    /// scope's children, where only `Use`/`Function` kinds occur and both carry over).
    All,
}

/// Runs §4.5 steps 1-4. `eager_kinds` lists the kinds that get flushed from `target` into
/// `result` wholesale the moment the diff moves past them (imports, then exports, in that
/// order, for scr/def/loot's top level; empty for varlist and for a scope's children).
fn merge_sequence(
    diff: &[Node],
    target: &[Node],
    eager_kinds: &[Flag],
    tail_carry: TailCarry,
    cache: &mut StringCache,
) -> ParseResult<Vec<Node>> {
    let mut used = vec![false; target.len()];
    let mut result = Vec::with_capacity(diff.len() + target.len());
    let mut phase = 0usize;

    let flush_kind = |kind: Flag, used: &mut [bool], result: &mut Vec<Node>| {
        for (i, t) in target.iter().enumerate() {
            if !used[i] && t.is_kind(kind) {
                used[i] = true;
                result.push(t.clone());
            }
        }
    };

    for d in diff {
        while phase < eager_kinds.len() && !d.is_kind(eager_kinds[phase]) {
            flush_kind(eager_kinds[phase], &mut used, &mut result);
            phase += 1;
        }

        if d.has_edit(Flag::INSERT) {
            let mut inserted = d.clone();
            finalize_inserted_subtree(&mut inserted);
            result.push(inserted);
            continue;
        }

        match target.iter().position(|t| t.compare_sig_id == d.compare_sig_id) {
            None => {
                if d.has_edit(Flag::DELETE) {
                    log::warn!(
                        "line {}: delete target `{}` has no match in the target; skipping",
                        d.source_line,
                        cache.resolve(d.compare_sig_id)
                    );
                    continue;
                }
                return Err(ParseError::Match {
                    line: d.source_line,
                    signature: cache.resolve(d.compare_sig_id).to_string(),
                });
            }
            Some(i) if used[i] => {
                return Err(ParseError::semantic(
                    Some(d.source_line),
                    format!(
                        "diff contains two operations against `{}`",
                        cache.resolve(d.compare_sig_id)
                    ),
                ));
            }
            Some(i) => {
                used[i] = true;
                if d.has_edit(Flag::DELETE) {
                    continue;
                }
                result.push(merge_node(d, &target[i], cache)?);
            }
        }
    }

    while phase < eager_kinds.len() {
        flush_kind(eager_kinds[phase], &mut used, &mut result);
        phase += 1;
    }

    match tail_carry {
        TailCarry::None => {}
        TailCarry::All => {
            for (i, t) in target.iter().enumerate() {
                if !used[i] {
                    result.push(t.clone());
                }
            }
        }
        TailCarry::Kinds(kinds) => {
            for (i, t) in target.iter().enumerate() {
                if !used[i] && kinds.intersects(t.kind()) {
                    result.push(t.clone());
                }
            }
        }
    }

    Ok(result)
}

/// Produces `r = merge_node(d, t)` (§4.5). Preconditions: `d` carries neither `Insert` nor
/// `Delete` (both are handled by the caller before this is reached).
fn merge_node(d: &Node, t: &Node, cache: &mut StringCache) -> ParseResult<Node> {
    let mut r = Node::new(t.kind(), t.sig_id, d.compare_sig_id, d.source_line);
    r.order_sig_id = d.order_sig_id;

    if d.has_edit(Flag::RENAME) {
        r.sig_id = d.new_sig_id;
    }

    if d.has_edit(Flag::REDEFINE) {
        let kind = t.kind();
        if kind == Flag::EXPORT {
            let compare_text = cache.resolve(d.compare_sig_id).to_string();
            let payload = cache.resolve(d.new_sig_id).to_string();
            r.sig_id = cache.find_or_add(format!("{compare_text} = {payload}"));
        } else if kind == Flag::SUB_SCOPE || kind == Flag::SUB_DECLARATION || kind == Flag::FUNCTION {
            r.children = d.children.clone();
        } else {
            log::warn!(
                "line {}: redefine on {:?} is not supported, only rename applies; ignoring",
                d.source_line,
                kind
            );
        }
        r.flags = d.flags;
        finalize_children(&mut r.children, &[]);
    } else {
        r.children = merge_sequence(&d.children, &t.children, &[], TailCarry::All, cache)?;
        r.flags = t.flags;
        finalize_children(&mut r.children, &t.children);
    }

    Ok(r)
}

/// Segregates and orders a just-built `children` list against its matched parent's original
/// `target_children` (or `&[]` for a node with no target counterpart: a redefine's wholesale
/// replacement, or a freshly inserted subtree).
fn finalize_children(children: &mut Vec<Node>, target_children: &[Node]) {
    orderer::segregate(children, Flag::USE, Flag::FUNCTION);
    orderer::order_within_kind(children, target_children, Flag::USE);
    orderer::order_within_kind(children, target_children, Flag::FUNCTION);
}

/// A node that arrived via `[insert]` has no target counterpart at any depth, but its own
/// nested children (an inserted function's body, say) still need Use/Function segregation.
fn finalize_inserted_subtree(node: &mut Node) {
    finalize_children(&mut node.children, &[]);
    for child in &mut node.children {
        finalize_inserted_subtree(child);
    }
}

/// `scr`: imports then exports are carried eagerly; the root `sub` scope is matched like any
/// other node (there is exactly one, in both diff and target).
pub fn merge_scr(diff: &[Node], target: &[Node], cache: &mut StringCache) -> ParseResult<Vec<Node>> {
    let mut result = merge_sequence(diff, target, &[Flag::IMPORT, Flag::EXPORT], TailCarry::None, cache)?;
    orderer::order_within_kind(&mut result, target, Flag::IMPORT);
    orderer::order_within_kind(&mut result, target, Flag::EXPORT);
    Ok(result)
}

/// `def`: exports only.
pub fn merge_def(diff: &[Node], target: &[Node], cache: &mut StringCache) -> ParseResult<Vec<Node>> {
    let mut result = merge_sequence(diff, target, &[Flag::EXPORT], TailCarry::None, cache)?;
    orderer::order_within_kind(&mut result, target, Flag::EXPORT);
    Ok(result)
}

/// `loot`: imports then exports carried eagerly; any sub declaration present in the target
/// but untouched by the diff is carried over at the end.
pub fn merge_loot(diff: &[Node], target: &[Node], cache: &mut StringCache) -> ParseResult<Vec<Node>> {
    let mut result = merge_sequence(
        diff,
        target,
        &[Flag::IMPORT, Flag::EXPORT],
        TailCarry::Kinds(Flag::SUB_DECLARATION),
        cache,
    )?;
    orderer::order_within_kind(&mut result, target, Flag::IMPORT);
    orderer::order_within_kind(&mut result, target, Flag::EXPORT);
    orderer::order_within_kind(&mut result, target, Flag::SUB_DECLARATION);
    Ok(result)
}

/// `varlist`: includes and variable declarations may be interleaved in either file, so the
/// merged result needs an explicit `segregate` before each kind can be ordered.
pub fn merge_varlist(diff: &[Node], target: &[Node], cache: &mut StringCache) -> ParseResult<Vec<Node>> {
    let mut result = merge_sequence(
        diff,
        target,
        &[],
        TailCarry::Kinds(Flag::INCLUDE | Flag::VARDECL),
        cache,
    )?;
    orderer::segregate(&mut result, Flag::INCLUDE, Flag::VARDECL);
    orderer::order_within_kind(&mut result, target, Flag::INCLUDE);
    orderer::order_within_kind(&mut result, target, Flag::VARDECL);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dlpatch_cache::StringCache;

    fn func(cache: &mut StringCache, sig: &str, edits: Flag) -> Node {
        let id = cache.find_or_add(sig);
        let mut n = Node::new(Flag::FUNCTION, id, id, 1);
        n.flags |= edits;
        n
    }

    #[test]
    fn insert_prepends_before_surviving_target_order() {
        let mut cache = StringCache::new();
        let target = vec![func(&mut cache, "f(1)", Flag::empty())];
        let diff = vec![func(&mut cache, "g(2)", Flag::INSERT), func(&mut cache, "f(1)", Flag::NOOP)];
        let result = merge_sequence(&diff, &target, &[], TailCarry::All, &mut cache).unwrap();
        let mut result = result;
        orderer::segregate(&mut result, Flag::USE, Flag::FUNCTION);
        orderer::order_within_kind(&mut result, &target, Flag::FUNCTION);
        assert_eq!(cache.resolve(result[0].sig_id), "g(2)");
        assert_eq!(cache.resolve(result[1].sig_id), "f(1)");
    }

    #[test]
    fn delete_removes_matched_node() {
        let mut cache = StringCache::new();
        let target = vec![func(&mut cache, "f(1)", Flag::empty()), func(&mut cache, "g(3)", Flag::empty())];
        let diff = vec![func(&mut cache, "f(1)", Flag::DELETE)];
        let result = merge_sequence(&diff, &target, &[], TailCarry::All, &mut cache).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(cache.resolve(result[0].sig_id), "g(3)");
    }

    #[test]
    fn delete_miss_warns_and_continues() {
        let mut cache = StringCache::new();
        let target = vec![func(&mut cache, "g(3)", Flag::empty())];
        let diff = vec![func(&mut cache, "f(1)", Flag::DELETE)];
        let result = merge_sequence(&diff, &target, &[], TailCarry::All, &mut cache).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(cache.resolve(result[0].sig_id), "g(3)");
    }

    #[test]
    fn non_delete_miss_is_hard_error() {
        let mut cache = StringCache::new();
        let target: Vec<Node> = vec![];
        let diff = vec![func(&mut cache, "f(1)", Flag::NOOP)];
        let result = merge_sequence(&diff, &target, &[], TailCarry::All, &mut cache);
        assert!(matches!(result, Err(ParseError::Match { .. })));
    }

    #[test]
    fn duplicate_match_is_hard_error() {
        let mut cache = StringCache::new();
        let target = vec![func(&mut cache, "f(1)", Flag::empty())];
        let diff = vec![func(&mut cache, "f(1)", Flag::NOOP), func(&mut cache, "f(1)", Flag::NOOP)];
        let result = merge_sequence(&diff, &target, &[], TailCarry::All, &mut cache);
        assert!(matches!(result, Err(ParseError::Semantic { .. })));
    }

    #[test]
    fn rename_changes_sig_keeps_identity() {
        let mut cache = StringCache::new();
        let target = vec![func(&mut cache, "f(1)", Flag::empty())];
        let mut d = func(&mut cache, "f(1)", Flag::RENAME);
        d.new_sig_id = cache.find_or_add("f(2)");
        let result = merge_sequence(&[d], &target, &[], TailCarry::All, &mut cache).unwrap();
        assert_eq!(cache.resolve(result[0].sig_id), "f(2)");
        assert_eq!(result[0].compare_sig_id, cache.find("f(1)").unwrap());
    }
}
