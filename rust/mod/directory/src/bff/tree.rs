//! Branch tree reconstruction from the flat (id, parent_id) list.

use std::collections::{HashMap, HashSet};

use crate::model::Branch;

/// One node of the rendered branch tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub id: i64,
    pub name: String,
    /// The currently selected branch.
    pub active: bool,
    /// Empty for leaves.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Number of nodes in this subtree, itself included.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(TreeNode::len).sum::<usize>()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Build the sibling list under `parent_id` (None = root level), each node
/// carrying its recursively built children.
///
/// Siblings keep the order of `branches`; the API sends them sorted by
/// name. `selected` marks the active node.
pub fn build_tree(branches: &[Branch], parent_id: Option<i64>, selected: Option<i64>) -> Vec<TreeNode> {
    let mut by_parent: HashMap<Option<i64>, Vec<&Branch>> = HashMap::new();
    for b in branches {
        by_parent.entry(b.parent_id).or_default().push(b);
    }
    let mut visited = HashSet::new();
    build_level(&by_parent, parent_id, selected, &mut visited)
}

fn build_level(
    by_parent: &HashMap<Option<i64>, Vec<&Branch>>,
    parent_id: Option<i64>,
    selected: Option<i64>,
    visited: &mut HashSet<i64>,
) -> Vec<TreeNode> {
    let Some(siblings) = by_parent.get(&parent_id) else {
        return Vec::new();
    };

    let mut nodes = Vec::with_capacity(siblings.len());
    for b in siblings {
        // The server keeps the forest acyclic; never recurse into a node twice.
        if !visited.insert(b.id) {
            continue;
        }
        nodes.push(TreeNode {
            id: b.id,
            name: b.name.clone(),
            active: selected == Some(b.id),
            children: build_level(by_parent, Some(b.id), selected, visited),
        });
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(id: i64, name: &str, parent_id: Option<i64>) -> Branch {
        Branch { id, name: name.into(), parent_id }
    }

    /// As the API returns them: sorted by name.
    fn sorted_org() -> Vec<Branch> {
        vec![
            b(1, "HQ", None),
            b(5, "Lab", None),
            b(2, "Sales", Some(1)),
            b(3, "Sales-East", Some(2)),
            b(4, "Support", Some(1)),
        ]
    }

    #[test]
    fn builds_nested_structure_in_input_order() {
        let tree = build_tree(&sorted_org(), None, None);
        assert_eq!(tree.iter().map(|n| n.name.as_str()).collect::<Vec<_>>(), vec!["HQ", "Lab"]);

        let hq = &tree[0];
        assert_eq!(hq.children.iter().map(|n| n.id).collect::<Vec<_>>(), vec![2, 4]);
        assert_eq!(hq.children[0].children[0].name, "Sales-East");
        assert!(hq.children[1].is_leaf());
        assert!(tree[1].is_leaf());
        assert_eq!(tree.iter().map(TreeNode::len).sum::<usize>(), 5);
    }

    #[test]
    fn builds_from_inner_parent() {
        let tree = build_tree(&sorted_org(), Some(2), None);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].id, 3);
        assert!(build_tree(&sorted_org(), Some(4), None).is_empty());
    }

    #[test]
    fn marks_only_the_selected_branch() {
        let tree = build_tree(&sorted_org(), None, Some(3));
        let mut active = Vec::new();
        fn walk(nodes: &[TreeNode], out: &mut Vec<i64>) {
            for n in nodes {
                if n.active {
                    out.push(n.id);
                }
                walk(&n.children, out);
            }
        }
        walk(&tree, &mut active);
        assert_eq!(active, vec![3]);
    }

    #[test]
    fn rebuilding_is_idempotent() {
        let branches = sorted_org();
        assert_eq!(build_tree(&branches, None, Some(2)), build_tree(&branches, None, Some(2)));
    }

    #[test]
    fn empty_input_is_empty_tree() {
        assert!(build_tree(&[], None, None).is_empty());
    }
}
