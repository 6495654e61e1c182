//! In-memory view of the branch forest.
//!
//! The server answers subtree queries with a recursive SQL query; this is
//! the same closure over a branch list already in memory (client state,
//! tests). Both must agree.

use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::model::Branch;

/// Adjacency mapping (parent id -> child ids) built once from a branch list.
///
/// Child order follows the input order.
#[derive(Debug, Clone, Default)]
pub struct BranchForest {
    children: HashMap<i64, Vec<i64>>,
    parents: HashMap<i64, Option<i64>>,
}

impl BranchForest {
    pub fn from_branches(branches: &[Branch]) -> Self {
        let mut forest = Self::default();
        for b in branches {
            forest.parents.insert(b.id, b.parent_id);
            forest.children.entry(b.id).or_default();
            if let Some(pid) = b.parent_id {
                forest.children.entry(pid).or_default().push(b.id);
            }
        }
        forest
    }

    pub fn contains(&self, id: i64) -> bool {
        self.parents.contains_key(&id)
    }

    /// Direct children of `id`, empty for leaves and unknown ids.
    pub fn children_of(&self, id: i64) -> &[i64] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `seed` plus every descendant. Unknown seed yields an empty set.
    ///
    /// Breadth-first; the visited set keeps it finite even on corrupt
    /// (cyclic) data.
    pub fn subtree(&self, seed: i64) -> BTreeSet<i64> {
        let mut closure = BTreeSet::new();
        if !self.contains(seed) {
            return closure;
        }

        let mut queue = VecDeque::from([seed]);
        closure.insert(seed);
        while let Some(id) = queue.pop_front() {
            for &child in self.children_of(id) {
                if closure.insert(child) {
                    queue.push_back(child);
                }
            }
        }
        closure
    }

    /// True if `candidate` is `ancestor` itself or lies below it.
    pub fn is_within(&self, ancestor: i64, candidate: i64) -> bool {
        let mut current = Some(candidate);
        let mut hops = 0;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            hops += 1;
            if hops > self.parents.len() {
                return false;
            }
            current = self.parents.get(&id).copied().flatten();
        }
        false
    }
}

/// Least fixed point of "add every branch whose parent is already in the
/// set", starting from `{seed}`. Quadratic; kept as the reference
/// definition the faster renditions are tested against.
pub fn closure_fixed_point(branches: &[Branch], seed: i64) -> BTreeSet<i64> {
    let mut set = BTreeSet::new();
    if !branches.iter().any(|b| b.id == seed) {
        return set;
    }
    set.insert(seed);
    loop {
        let before = set.len();
        for b in branches {
            if let Some(pid) = b.parent_id {
                if set.contains(&pid) {
                    set.insert(b.id);
                }
            }
        }
        if set.len() == before {
            return set;
        }
    }
}
