//! The host contract: a read-only, navigable labelled tree.
//!
//! The engine never owns tree nodes; it holds values implementing
//! [`TreeNode`] for the lifetime of a compiled path. A node type is expected
//! to be a cheap handle (an index, a pointer, a small `Rc`) that the engine
//! clones freely while building node-sets.

use std::fmt;
use std::hash::Hash;

/// The read accessors the engine needs from a host tree.
///
/// `parent()` uses the self-loop convention at the root: `node.parent() ==
/// node` iff `node` is the root. Hosts whose natural representation is
/// `Option<Self>` for "no parent" should make the root its own parent at the
/// trait boundary rather than exposing `Option` here, so `ancestor`/`root`
/// traversal can terminate on equality alone.
pub trait TreeNode: Clone + Eq + Hash + fmt::Debug {
    /// The node's label, or `None` if it carries none. An absent label and
    /// an empty-string label are equivalent everywhere the engine compares
    /// names (see [`crate::engine`]'s `streq`).
    fn label(&self) -> Option<&str>;

    /// The node's value, or `None` if it carries none. Same absent/empty
    /// equivalence as `label`.
    fn value(&self) -> Option<&str>;

    /// The parent node. Self-loops at the root.
    fn parent(&self) -> Self;

    /// The head of this node's child list, or `None` if it has no children.
    fn first_child(&self) -> Option<Self>;

    /// The next sibling in this node's parent's child list, or `None` if
    /// this is the last child.
    fn next_sibling(&self) -> Option<Self>;

    /// True iff this node is its own parent (the self-loop root sentinel).
    fn is_root(&self) -> bool {
        self.parent() == *self
    }
}

/// The additional capability [`crate::path`]'s `expand_tree` needs: creating
/// and discarding child nodes. Only required for prefix expansion; every
/// other operation works against a plain [`TreeNode`].
pub trait TreeNodeMut: TreeNode {
    /// Create a new child labelled `label` beneath `self` and return it, or
    /// `None` on failure (e.g. the host is out of storage).
    fn make_child(&self, label: &str) -> Option<Self>;

    /// Detach `child` from `parent`'s child list. `child` must be a direct
    /// child of `parent`.
    fn remove_child(parent: Self, child: Self);

    /// Recursively free a subtree previously detached with `remove_child`.
    fn free_subtree(node: Self);
}

/// A minimal in-memory tree used by this crate's own tests, and available
/// to downstream integration tests that want a throwaway tree without
/// writing their own `TreeNode` impl.
#[cfg(any(test, feature = "mock-tree"))]
pub mod mock {
    use super::{TreeNode, TreeNodeMut};
    use std::cell::RefCell;
    use std::fmt;
    use std::rc::{Rc, Weak};

    struct NodeInner {
        label: Option<String>,
        value: Option<String>,
        parent: RefCell<Weak<NodeInner>>,
        first_child: RefCell<Option<MockNode>>,
        next_sibling: RefCell<Option<MockNode>>,
    }

    /// A handle into an in-memory tree, cheap to clone (an `Rc` bump).
    #[derive(Clone)]
    pub struct MockNode(Rc<NodeInner>);

    impl fmt::Debug for MockNode {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("MockNode")
                .field("label", &self.0.label)
                .field("value", &self.0.value)
                .finish()
        }
    }

    impl PartialEq for MockNode {
        fn eq(&self, other: &Self) -> bool {
            Rc::ptr_eq(&self.0, &other.0)
        }
    }
    impl Eq for MockNode {}

    impl std::hash::Hash for MockNode {
        fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
            (Rc::as_ptr(&self.0) as usize).hash(state);
        }
    }

    /// An owning, growable mock tree. Construction returns the root node;
    /// new nodes are appended through [`TreeNodeMut::make_child`] on any
    /// node reachable from it.
    pub struct MockTree;

    impl MockTree {
        /// Build a fresh tree containing only a root node labelled `root`.
        pub fn new() -> MockNode {
            MockNode(Rc::new_cyclic(|weak| NodeInner {
                label: Some("root".to_string()),
                value: None,
                parent: RefCell::new(weak.clone()),
                first_child: RefCell::new(None),
                next_sibling: RefCell::new(None),
            }))
        }
    }

    impl MockNode {
        /// Convenience used by tests: add a labelled, valued child.
        pub fn add_child(&self, label: &str, value: Option<&str>) -> MockNode {
            let child = MockNode(Rc::new(NodeInner {
                label: Some(label.to_string()),
                value: value.map(str::to_string),
                parent: RefCell::new(Rc::downgrade(&self.0)),
                first_child: RefCell::new(None),
                next_sibling: RefCell::new(None),
            }));
            self.append_child(child.clone());
            child
        }

        fn append_child(&self, child: MockNode) {
            match self.0.first_child.borrow().clone() {
                None => *self.0.first_child.borrow_mut() = Some(child),
                Some(first) => {
                    let mut cur = first;
                    loop {
                        let next = cur.0.next_sibling.borrow().clone();
                        match next {
                            Some(n) => cur = n,
                            None => break,
                        }
                    }
                    *cur.0.next_sibling.borrow_mut() = Some(child);
                }
            }
        }
    }

    impl TreeNode for MockNode {
        fn label(&self) -> Option<&str> {
            self.0.label.as_deref()
        }

        fn value(&self) -> Option<&str> {
            self.0.value.as_deref()
        }

        fn parent(&self) -> Self {
            MockNode(self.0.parent.borrow().upgrade().expect(
                "mock tree node outlived its parent (root's self-loop should prevent this)",
            ))
        }

        fn first_child(&self) -> Option<Self> {
            self.0.first_child.borrow().clone()
        }

        fn next_sibling(&self) -> Option<Self> {
            self.0.next_sibling.borrow().clone()
        }
    }

    impl TreeNodeMut for MockNode {
        fn make_child(&self, label: &str) -> Option<Self> {
            Some(self.add_child(label, None))
        }

        fn remove_child(parent: Self, child: Self) {
            let first = parent.0.first_child.borrow().clone();
            match first {
                Some(f) if f == child => {
                    let next = child.0.next_sibling.borrow().clone();
                    *parent.0.first_child.borrow_mut() = next;
                }
                Some(f) => {
                    let mut cur = f;
                    loop {
                        let next = cur.0.next_sibling.borrow().clone();
                        match next {
                            Some(n) if n == child => {
                                let child_next = child.0.next_sibling.borrow().clone();
                                *cur.0.next_sibling.borrow_mut() = child_next;
                                break;
                            }
                            Some(n) => cur = n,
                            None => break,
                        }
                    }
                }
                None => {}
            }
        }

        fn free_subtree(node: Self) {
            drop(node);
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn root_self_loops() {
            let root = MockTree::new();
            assert_eq!(root.parent(), root);
            assert!(root.is_root());
        }

        #[test]
        fn child_links() {
            let root = MockTree::new();
            let a = root.add_child("a", Some("1"));
            let b = root.add_child("b", Some("2"));
            assert_eq!(root.first_child(), Some(a.clone()));
            assert_eq!(a.next_sibling(), Some(b.clone()));
            assert_eq!(b.next_sibling(), None);
            assert_eq!(a.parent(), root);
            assert_eq!(b.parent(), root);
        }
    }
}
