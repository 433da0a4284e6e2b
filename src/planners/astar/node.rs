use std::cmp::Ordering;

use crate::infra::Action;
use crate::state::KinematicState;

/// A state reached during search, with its cost bookkeeping and the edge that
/// produced it. Parents are indices into the planner's node arena.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchNode {
    pub state: KinematicState,
    pub parent: Option<usize>,
    pub action: Action,
    pub g: f32,
    pub h: f32,
    pub f: f32,
}

impl SearchNode {
    pub fn root(state: KinematicState, h: f32) -> Self {
        Self {
            state,
            parent: None,
            action: Action::None,
            g: 0.0,
            h,
            f: h,
        }
    }

    pub fn child(state: KinematicState, parent: usize, action: Action, g: f32, h: f32) -> Self {
        Self {
            state,
            parent: Some(parent),
            action,
            g,
            h,
            f: g + h,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Nodes are the same visited state when their states match, whatever the cost.
    pub fn same_state(&self, other: &SearchNode) -> bool {
        self.state == other.state
    }
}

/// Open-set entry. The heap pops the lowest `f`; among equal `f` the entry
/// pushed first wins.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OpenEntry {
    pub f: f32,
    pub seq: u64,
    pub index: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for BinaryHeap (max-heap)
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    #[test]
    fn test_child_cost() {
        let state = KinematicState::new(5, 5, true, true);
        let node = SearchNode::child(state, 0, Action::Jump, 2.0, -30.0);
        assert_eq!(node.f, -28.0);
        assert!(!node.is_root());
        assert!(SearchNode::root(state, 1.0).is_root());
    }

    #[test]
    fn test_same_state_ignores_cost() {
        let state = KinematicState::new(5, 5, true, true);
        let a = SearchNode::child(state, 0, Action::Jump, 2.0, -30.0);
        let b = SearchNode::child(state, 3, Action::WalkRight, 7.0, -30.0);
        assert!(a.same_state(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_open_set_pops_lowest_f_then_earliest() {
        let mut open = BinaryHeap::new();
        open.push(OpenEntry { f: 3.0, seq: 0, index: 0 });
        open.push(OpenEntry { f: -1.0, seq: 1, index: 1 });
        open.push(OpenEntry { f: -1.0, seq: 2, index: 2 });
        open.push(OpenEntry { f: 0.5, seq: 3, index: 3 });

        let order: Vec<usize> = std::iter::from_fn(|| open.pop().map(|e| e.index)).collect();
        assert_eq!(order, vec![1, 2, 3, 0]);
    }
}
