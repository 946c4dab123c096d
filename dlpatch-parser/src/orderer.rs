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

//! Re-ordering pass (§4.6) applied to a merged sequence of same-level nodes: inserted nodes
//! come first (in the diff's own order), then surviving target nodes in the order they had
//! in the target.

use std::collections::HashMap;

use dlpatch_cache::Id;

use crate::flags::Flag;
use crate::node::Node;

/// Stable-partitions `nodes` into `[kind_a..., kind_b..., everything else...]`.
pub fn segregate(nodes: &mut Vec<Node>, kind_a: Flag, kind_b: Flag) {
    let drained = std::mem::take(nodes);
    let mut a = Vec::new();
    let mut b = Vec::new();
    let mut rest = Vec::new();
    for n in drained {
        if n.is_kind(kind_a) {
            a.push(n);
        } else if n.is_kind(kind_b) {
            b.push(n);
        } else {
            rest.push(n);
        }
    }
    a.append(&mut b);
    a.append(&mut rest);
    *nodes = a;
}

/// Re-ranks every `kind` node in `nodes` so that ones with no counterpart in `target_ref`
/// (by `order_sig_id`) sort before the ones that do, and the latter keep `target_ref`'s
/// relative order. Nodes of other kinds are left exactly where they are; the `kind` subset
/// is treated as its own ordered slice even when it isn't contiguous in `nodes`.
pub fn order_within_kind(nodes: &mut [Node], target_ref: &[Node], kind: Flag) {
    let mut base_order: HashMap<Id, u32> = HashMap::new();
    for (rank, t) in target_ref.iter().filter(|n| n.is_kind(kind)).enumerate() {
        base_order.entry(t.order_sig_id).or_insert(rank as u32);
    }

    let indices: Vec<usize> = nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.is_kind(kind))
        .map(|(i, _)| i)
        .collect();
    if indices.len() <= 1 {
        return;
    }

    let new_count = indices
        .iter()
        .filter(|&&i| !base_order.contains_key(&nodes[i].order_sig_id))
        .count() as u32;

    let mut next_new_rank = 0u32;
    let mut ranked: Vec<(u32, usize)> = Vec::with_capacity(indices.len());
    for &i in &indices {
        let rank = match base_order.get(&nodes[i].order_sig_id) {
            Some(&base) => base + new_count,
            None => {
                let r = next_new_rank;
                next_new_rank += 1;
                r
            }
        };
        ranked.push((rank, i));
    }
    ranked.sort_by_key(|&(rank, _)| rank);

    let mut reordered: Vec<Node> = Vec::with_capacity(indices.len());
    for &(_, i) in &ranked {
        reordered.push(nodes[i].clone());
    }
    for (&slot, node) in indices.iter().zip(reordered) {
        nodes[slot] = node;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dlpatch_cache::StringCache;

    fn node(kind: Flag, sig: &str, cache: &mut StringCache) -> Node {
        let id = cache.find_or_add(sig);
        Node::new(kind, id, id, 1)
    }

    #[test]
    fn segregate_groups_use_before_function_before_rest() {
        let mut cache = StringCache::new();
        let mut nodes = vec![
            node(Flag::FUNCTION, "f()", &mut cache),
            node(Flag::USE, "use a()", &mut cache),
            node(Flag::FUNCTION, "g()", &mut cache),
        ];
        segregate(&mut nodes, Flag::USE, Flag::FUNCTION);
        assert!(nodes[0].is_kind(Flag::USE));
        assert!(nodes[1].is_kind(Flag::FUNCTION));
        assert!(nodes[2].is_kind(Flag::FUNCTION));
    }

    #[test]
    fn order_within_kind_places_new_nodes_first_then_target_order() {
        let mut cache = StringCache::new();
        let target = vec![
            node(Flag::IMPORT, "import \"a\"", &mut cache),
            node(Flag::IMPORT, "import \"b\"", &mut cache),
        ];
        // result initially has the survivor of "b" processed before the survivor of "a",
        // plus one freshly inserted import.
        let mut result = vec![
            target[1].clone(),
            node(Flag::IMPORT, "import \"c\"", &mut cache),
            target[0].clone(),
        ];
        order_within_kind(&mut result, &target, Flag::IMPORT);
        let sigs: Vec<Id> = result.iter().map(|n| n.order_sig_id).collect();
        assert_eq!(sigs[0], cache.find("import \"c\"").unwrap());
        assert_eq!(sigs[1], cache.find("import \"a\"").unwrap());
        assert_eq!(sigs[2], cache.find("import \"b\"").unwrap());
    }
}
