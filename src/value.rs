//! The value pool: a growable table of interned values, indexed by a
//! 32-bit handle.
//!
//! Handles are stable across growth because they index by position in a
//! `Vec`, not by address — the pool can reallocate its backing storage
//! freely and every previously issued [`ValueHandle`] keeps pointing at the
//! same logical slot. Slots 0 and 1 are reserved at construction time for
//! the canonical `false`/`true` booleans, so pushing a boolean value is
//! just returning one of the two fixed handles.

use crate::tree::TreeNode;

/// A stable 32-bit index into a [`ValuePool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueHandle(u32);

impl ValueHandle {
    /// The handle of the canonical `false` value, reserved at pool
    /// construction.
    pub const FALSE: ValueHandle = ValueHandle(0);
    /// The handle of the canonical `true` value, reserved at pool
    /// construction.
    pub const TRUE: ValueHandle = ValueHandle(1);

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One value owned by a [`ValuePool`].
///
/// Node-set slots own their node vector; equality-comparison helpers for
/// strings treat an absent string and an empty string as equivalent, which
/// is why `Str` wraps `Option<String>` rather than defaulting absent names
/// to `""` up front.
#[derive(Debug, Clone)]
pub enum PoolValue<N> {
    NodeSet(Vec<N>),
    Number(i32),
    Str(Option<String>),
    Bool(bool),
}

/// A value is one of: node-set, signed 32-bit integer, owned string, or
/// boolean. Slots outlive the evaluation and are freed with the compiled
/// path.
pub struct ValuePool<N: TreeNode> {
    slots: Vec<PoolValue<N>>,
}

impl<N: TreeNode> ValuePool<N> {
    pub fn new() -> Self {
        ValuePool {
            slots: vec![PoolValue::Bool(false), PoolValue::Bool(true)],
        }
    }

    /// Intern a value, returning its stable handle.
    pub fn push(&mut self, value: PoolValue<N>) -> ValueHandle {
        // Fold literal booleans onto the two reserved slots instead of
        // growing the table; every other kind gets a fresh slot.
        if let PoolValue::Bool(b) = value {
            return if b { ValueHandle::TRUE } else { ValueHandle::FALSE };
        }
        let handle = ValueHandle(self.slots.len() as u32);
        self.slots.push(value);
        handle
    }

    pub fn get(&self, handle: ValueHandle) -> &PoolValue<N> {
        &self.slots[handle.index()]
    }
}

impl<N: TreeNode> Default for ValuePool<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::mock::{MockNode, MockTree};

    #[test]
    fn reserved_bool_slots_are_stable() {
        let mut pool: ValuePool<MockNode> = ValuePool::new();
        assert_eq!(pool.push(PoolValue::Bool(false)), ValueHandle::FALSE);
        assert_eq!(pool.push(PoolValue::Bool(true)), ValueHandle::TRUE);
        // Interning many other values doesn't disturb the reserved slots.
        for i in 0..10 {
            pool.push(PoolValue::Number(i));
        }
        assert!(matches!(pool.get(ValueHandle::FALSE), PoolValue::Bool(false)));
        assert!(matches!(pool.get(ValueHandle::TRUE), PoolValue::Bool(true)));
    }

    #[test]
    fn handles_survive_growth() {
        let mut pool: ValuePool<MockNode> = ValuePool::new();
        let h = pool.push(PoolValue::Str(Some("hello".to_string())));
        for i in 0..1000 {
            pool.push(PoolValue::Number(i));
        }
        match pool.get(h) {
            PoolValue::Str(Some(s)) => assert_eq!(s, "hello"),
            other => panic!("expected interned string, got {other:?}"),
        }
    }

    #[test]
    fn node_set_slot_round_trips() {
        let mut pool: ValuePool<MockNode> = ValuePool::new();
        let root = MockTree::new();
        let a = root.add_child("a", Some("1"));
        let handle = pool.push(PoolValue::NodeSet(vec![a.clone()]));
        match pool.get(handle) {
            PoolValue::NodeSet(nodes) => assert_eq!(nodes, &[a]),
            other => panic!("expected a node-set, got {other:?}"),
        }
    }
}
