//! Axis traversal: the `step_first`/`step_next` pair realising the seven
//! axes over a [`TreeNode`].
//!
//! Unlike an axis helper that eagerly gathers a whole axis into a `Vec`
//! before the caller ever looks at it, this traversal can be *resumed* one
//! node at a time — `descendant` and `descendant-or-self` walk a pre-order
//! sequence driven by `first_child`/`next_sibling`/`parent` alone, climbing
//! back to the step's origin rather than collecting a queue up front.

use crate::ast::Axis;
use crate::tree::TreeNode;

/// The first candidate an axis yields from `origin`, or `None` if the axis
/// is empty from `origin` (e.g. `parent::` at the root).
pub fn step_first<N: TreeNode>(axis: Axis, origin: &N) -> Option<N> {
    match axis {
        Axis::SelfAxis => Some(origin.clone()),
        Axis::Child => origin.first_child(),
        Axis::Descendant => origin.first_child(),
        Axis::DescendantOrSelf => Some(origin.clone()),
        Axis::Parent => {
            if origin.is_root() {
                None
            } else {
                Some(origin.parent())
            }
        }
        Axis::Ancestor => {
            if origin.is_root() {
                None
            } else {
                Some(origin.parent())
            }
        }
        Axis::Root => {
            let mut cur = origin.clone();
            while !cur.is_root() {
                cur = cur.parent();
            }
            Some(cur)
        }
    }
}

/// The candidate following `prev` (the previous yield of this axis from
/// `origin`), or `None` once the axis is exhausted. `self`/`parent`/`root`
/// are always single-valued and never call this.
pub fn step_next<N: TreeNode>(axis: Axis, origin: &N, prev: &N) -> Option<N> {
    match axis {
        Axis::SelfAxis | Axis::Parent | Axis::Root => None,
        Axis::Child => prev.next_sibling(),
        Axis::Descendant => descendant_next(origin, prev),
        Axis::DescendantOrSelf => {
            if prev == origin {
                origin.first_child()
            } else {
                descendant_next(origin, prev)
            }
        }
        Axis::Ancestor => {
            if prev.is_root() {
                None
            } else {
                Some(prev.parent())
            }
        }
    }
}

/// Pre-order successor of `prev` within the subtree rooted at `origin`:
/// descend to the first child if there is one, otherwise climb to the
/// nearest ancestor (stopping at `origin`) that has a next sibling.
fn descendant_next<N: TreeNode>(origin: &N, prev: &N) -> Option<N> {
    if let Some(child) = prev.first_child() {
        return Some(child);
    }
    let mut cur = prev.clone();
    loop {
        if &cur == origin {
            return None;
        }
        match cur.next_sibling() {
            Some(sibling) => return Some(sibling),
            None => cur = cur.parent(),
        }
    }
}

/// Walk an axis from `origin` to completion, filtering by `name` (emitted
/// only if absent/wildcard or equal to the node's label), and appending
/// survivors to `out` in traversal order.
pub fn collect<N: TreeNode>(axis: Axis, origin: &N, name: Option<&str>, out: &mut Vec<N>) {
    let mut cur = step_first(axis, origin);
    while let Some(node) = cur {
        if name_matches(name, node.label()) {
            out.push(node.clone());
        }
        cur = step_next(axis, origin, &node);
    }
}

/// A candidate is emitted only if `step.name` is absent (wildcard) or
/// equals the node's label, with an absent label treated as equivalent to
/// an empty-string label.
fn name_matches(test: Option<&str>, label: Option<&str>) -> bool {
    match test {
        None => true,
        Some(name) => name == label.unwrap_or(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeNode;
    use crate::tree::mock::MockTree;

    #[test]
    fn child_axis_visits_in_sibling_order() {
        let root = MockTree::new();
        let a = root.add_child("a", None);
        let b = root.add_child("b", None);
        let mut out = Vec::new();
        collect(Axis::Child, &root, None, &mut out);
        assert_eq!(out, vec![a, b]);
    }

    #[test]
    fn descendant_axis_is_preorder() {
        let root = MockTree::new();
        let a = root.add_child("a", None);
        let a1 = a.add_child("a1", None);
        let b = root.add_child("b", None);
        let mut out = Vec::new();
        collect(Axis::Descendant, &root, None, &mut out);
        assert_eq!(out, vec![a, a1, b]);
    }

    #[test]
    fn descendant_or_self_includes_origin_first() {
        let root = MockTree::new();
        let a = root.add_child("a", None);
        let mut out = Vec::new();
        collect(Axis::DescendantOrSelf, &root, None, &mut out);
        assert_eq!(out, vec![root, a]);
    }

    #[test]
    fn ancestor_axis_stops_before_self_loop() {
        let root = MockTree::new();
        let a = root.add_child("a", None);
        let b = a.add_child("b", None);
        let mut out = Vec::new();
        collect(Axis::Ancestor, &b, None, &mut out);
        assert_eq!(out, vec![a, root]);
    }

    #[test]
    fn root_axis_climbs_to_the_self_loop() {
        let root = MockTree::new();
        let a = root.add_child("a", None);
        let b = a.add_child("b", None);
        let mut out = Vec::new();
        collect(Axis::Root, &b, None, &mut out);
        assert_eq!(out, vec![root]);
    }

    #[test]
    fn parent_axis_is_empty_at_root() {
        let root = MockTree::new();
        let mut out = Vec::new();
        collect(Axis::Parent, &root, None, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn name_filter_applies_absent_empty_equivalence() {
        let root = MockTree::new();
        root.add_child("", None);
        let mut out = Vec::new();
        collect(Axis::Child, &root, Some(""), &mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn descendant_skips_unrelated_subtrees_after_climb() {
        let root = MockTree::new();
        let a = root.add_child("a", None);
        let a1 = a.add_child("a1", None);
        let a2 = a.add_child("a2", None);
        let b = root.add_child("b", None);
        let mut out = Vec::new();
        collect(Axis::Descendant, &a, None, &mut out);
        assert_eq!(out, vec![a1, a2]);
        assert!(!out.contains(&b));
    }
}
