//! In-memory hierarchy forest: build, search/filter, view state
//!
//! Everything here is pure and re-entrant: building and filtering return
//! fresh owned forests, so they can be re-run on every keystroke of a
//! search query. The only mutable display state is the explicit
//! [`TreeViewState`] value owned by the presentation layer.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::core::store::HierarchyNode;

/// A hierarchy node plus its ordered children
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    #[serde(flatten)]
    pub node: HierarchyNode,
    pub children: Vec<TreeNode>,
}

/// Display state threaded through tree rendering, owned by the caller
#[derive(Debug, Clone, Default)]
pub struct TreeViewState {
    pub expanded_ids: HashSet<String>,
    pub selected_id: Option<String>,
}

impl TreeViewState {
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded_ids.contains(id)
    }

    pub fn toggle(&mut self, id: &str) {
        if !self.expanded_ids.remove(id) {
            self.expanded_ids.insert(id.to_string());
        }
    }

    pub fn select(&mut self, id: Option<String>) {
        self.selected_id = id;
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_id.as_deref() == Some(id)
    }
}

/// Assemble a forest from flat store rows.
///
/// Rows are sorted by path first, so sibling order is lexicographic by full
/// path regardless of input order. A node whose `parent_id` does not
/// resolve within the input set becomes a root rather than an error.
pub fn build(mut nodes: Vec<HierarchyNode>) -> Vec<TreeNode> {
    nodes.sort_by(|a, b| a.path.cmp(&b.path));

    let id_to_index: HashMap<String, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.clone(), i))
        .collect();

    let mut children_of: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut roots: Vec<usize> = Vec::new();

    for (index, node) in nodes.iter().enumerate() {
        let parent_index = node
            .parent_id
            .as_ref()
            .filter(|pid| *pid != &node.id)
            .and_then(|pid| id_to_index.get(pid));

        match parent_index {
            Some(&pi) => children_of[pi].push(index),
            None => roots.push(index),
        }
    }

    let mut slots: Vec<Option<HierarchyNode>> = nodes.into_iter().map(Some).collect();
    roots
        .iter()
        .filter_map(|&r| assemble(r, &mut slots, &children_of))
        .collect()
}

fn assemble(
    index: usize,
    slots: &mut Vec<Option<HierarchyNode>>,
    children_of: &[Vec<usize>],
) -> Option<TreeNode> {
    let node = slots[index].take()?;
    let children = children_of[index]
        .iter()
        .filter_map(|&c| assemble(c, slots, children_of))
        .collect();
    Some(TreeNode { node, children })
}

/// Prune a forest to nodes matching `query`, keeping ancestor chains.
///
/// A node survives when its name or path contains the query
/// case-insensitively, or any descendant survives (children are filtered
/// first). Non-matching siblings of a match are dropped. The empty query
/// returns the forest unchanged.
pub fn filter(forest: &[TreeNode], query: &str) -> Vec<TreeNode> {
    if query.is_empty() {
        return forest.to_vec();
    }

    let needle = query.to_lowercase();
    forest
        .iter()
        .filter_map(|node| filter_node(node, &needle))
        .collect()
}

fn filter_node(tree: &TreeNode, needle: &str) -> Option<TreeNode> {
    let children: Vec<TreeNode> = tree
        .children
        .iter()
        .filter_map(|child| filter_node(child, needle))
        .collect();

    let self_match = tree.node.name.to_lowercase().contains(needle)
        || tree.node.path.to_lowercase().contains(needle);

    if self_match || !children.is_empty() {
        Some(TreeNode {
            node: tree.node.clone(),
            children,
        })
    } else {
        None
    }
}

/// Collect every node id reachable in a forest (used to auto-expand all
/// surviving nodes after a filter produced results)
pub fn expand_all(forest: &[TreeNode]) -> HashSet<String> {
    let mut ids = HashSet::new();
    for tree in forest {
        collect_ids(tree, &mut ids);
    }
    ids
}

fn collect_ids(tree: &TreeNode, ids: &mut HashSet<String>) {
    ids.insert(tree.node.id.clone());
    for child in &tree.children {
        collect_ids(child, ids);
    }
}

/// Total number of nodes in a forest
pub fn count(forest: &[TreeNode]) -> usize {
    forest.iter().map(|t| 1 + count(&t.children)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn node(id: &str, name: &str, path: &str, parent: Option<&str>) -> HierarchyNode {
        HierarchyNode {
            id: id.to_string(),
            name: name.to_string(),
            parent_id: parent.map(String::from),
            path: path.to_string(),
            level: path.matches('/').count() as i64,
            metadata: None,
            created: Utc::now(),
        }
    }

    fn boiler_forest() -> Vec<TreeNode> {
        build(vec![
            node("1", "Boiler", "Boiler", None),
            node("2", "Pump A", "Boiler/Pump A", Some("1")),
            node("3", "Valve", "Boiler/Valve", Some("1")),
        ])
    }

    #[test]
    fn test_build_preserves_node_count() {
        let forest = boiler_forest();
        assert_eq!(forest.len(), 1);
        assert_eq!(count(&forest), 3);
        assert_eq!(forest[0].children.len(), 2);
    }

    #[test]
    fn test_build_sibling_order_is_lexicographic() {
        // Input deliberately out of order
        let forest = build(vec![
            node("3", "Valve", "Boiler/Valve", Some("1")),
            node("1", "Boiler", "Boiler", None),
            node("2", "Pump A", "Boiler/Pump A", Some("1")),
        ]);

        let names: Vec<&str> = forest[0]
            .children
            .iter()
            .map(|c| c.node.name.as_str())
            .collect();
        assert_eq!(names, vec!["Pump A", "Valve"]);
    }

    #[test]
    fn test_build_orphan_parent_becomes_root() {
        let forest = build(vec![
            node("1", "Boiler", "Boiler", None),
            node("2", "Stray", "Gone/Stray", Some("missing")),
        ]);

        assert_eq!(forest.len(), 2);
        assert_eq!(count(&forest), 2);
    }

    #[test]
    fn test_build_self_parent_becomes_root() {
        let forest = build(vec![node("1", "Loop", "Loop", Some("1"))]);
        assert_eq!(forest.len(), 1);
        assert!(forest[0].children.is_empty());
    }

    #[test]
    fn test_filter_empty_query_is_identity() {
        let forest = boiler_forest();
        assert_eq!(filter(&forest, ""), forest);
    }

    #[test]
    fn test_filter_keeps_match_and_ancestors_only() {
        let forest = boiler_forest();
        let filtered = filter(&forest, "pump");

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].node.name, "Boiler");
        assert_eq!(filtered[0].children.len(), 1);
        assert_eq!(filtered[0].children[0].node.name, "Pump A");
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let forest = boiler_forest();
        assert_eq!(count(&filter(&forest, "PUMP")), 2);
        assert_eq!(count(&filter(&forest, "pUmP")), 2);
    }

    #[test]
    fn test_filter_deep_match_keeps_whole_ancestor_chain() {
        let forest = build(vec![
            node("1", "Plant", "Plant", None),
            node("2", "Unit1", "Plant/Unit1", Some("1")),
            node("3", "pump", "Plant/Unit1/pump", Some("2")),
            node("4", "Unit2", "Plant/Unit2", Some("1")),
        ]);

        let filtered = filter(&forest, "pump");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].node.name, "Plant");
        assert_eq!(filtered[0].children.len(), 1);
        assert_eq!(filtered[0].children[0].node.name, "Unit1");
        assert_eq!(filtered[0].children[0].children[0].node.name, "pump");
    }

    #[test]
    fn test_filter_no_match_yields_empty_forest() {
        let forest = boiler_forest();
        assert!(filter(&forest, "turbine").is_empty());
    }

    #[test]
    fn test_filter_every_kept_node_matches_or_has_matching_descendant() {
        let forest = build(vec![
            node("1", "Plant", "Plant", None),
            node("2", "Boiler", "Plant/Boiler", Some("1")),
            node("3", "Pump", "Plant/Boiler/Pump", Some("2")),
            node("4", "Turbine", "Plant/Turbine", Some("1")),
        ]);

        fn check(tree: &TreeNode, needle: &str) -> bool {
            let self_match = tree.node.name.to_lowercase().contains(needle)
                || tree.node.path.to_lowercase().contains(needle);
            self_match || tree.children.iter().any(|c| check(c, needle))
        }

        for tree in filter(&forest, "pump") {
            assert!(check(&tree, "pump"));
        }
    }

    #[test]
    fn test_expand_all_collects_every_id() {
        let forest = boiler_forest();
        let ids = expand_all(&forest);
        assert_eq!(ids.len(), 3);
        assert!(ids.contains("1") && ids.contains("2") && ids.contains("3"));
    }

    #[test]
    fn test_view_state_toggle_and_select() {
        let mut state = TreeViewState::default();
        assert!(!state.is_expanded("1"));

        state.toggle("1");
        assert!(state.is_expanded("1"));
        state.toggle("1");
        assert!(!state.is_expanded("1"));

        state.select(Some("2".to_string()));
        assert!(state.is_selected("2"));
        assert!(!state.is_selected("1"));
    }
}
