//! Tree nodes and their projection into selectable options

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::Location;

/// A location in a parsed hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub node_id: String,
    pub node: Location,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(node_id: impl Into<String>, node: Location) -> Self {
        Self {
            node_id: node_id.into(),
            node,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Display name: the location name, or the node id when unnamed
    pub fn title(&self) -> &str {
        self.node.name.as_deref().unwrap_or(&self.node_id)
    }

    /// Logical id of the wrapped location, falling back to the node id
    pub fn location_id(&self) -> &str {
        self.node.id.as_deref().unwrap_or(&self.node_id)
    }

    /// Depth-first search for a node by node id
    pub fn find(&self, node_id: &str) -> Option<&TreeNode> {
        if self.node_id == node_id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(node_id))
    }

    /// Node ids of this node and everything below it
    pub fn subtree_ids(&self) -> HashSet<&str> {
        let mut ids = HashSet::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            ids.insert(node.node_id.as_str());
            stack.extend(node.children.iter());
        }
        ids
    }
}

/// A selectable entry of a tree select control
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DisplayOption {
    pub value: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DisplayOption>>,
}

/// Project parsed trees into tree-select options
///
/// `disabled` is only set when a predicate is given, and `children` only on
/// nodes that have children, so consumers can treat the key as "expandable".
/// Input must be acyclic.
pub fn tree_to_options(
    trees: &[TreeNode],
    is_disabled: Option<&dyn Fn(&TreeNode) -> bool>,
) -> Vec<DisplayOption> {
    fn project(node: &TreeNode, is_disabled: Option<&dyn Fn(&TreeNode) -> bool>) -> DisplayOption {
        DisplayOption {
            value: node.node_id.clone(),
            title: node.title().to_string(),
            disabled: is_disabled.map(|f| f(node)),
            children: node
                .has_children()
                .then(|| node.children.iter().map(|c| project(c, is_disabled)).collect()),
        }
    }

    trees.iter().map(|tree| project(tree, is_disabled)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, name: &str, children: Vec<TreeNode>) -> TreeNode {
        let location = Location {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            ..Default::default()
        };
        TreeNode::new(id, location).with_children(children)
    }

    fn three_level_tree() -> TreeNode {
        node(
            "1",
            "Kenya",
            vec![
                node(
                    "2",
                    "Nairobi",
                    vec![node("4", "Westlands", vec![]), node("5", "Kibra", vec![])],
                ),
                node("3", "Mombasa", vec![]),
            ],
        )
    }

    #[test]
    fn test_projection_preserves_shape_and_order() {
        let options = tree_to_options(&[three_level_tree()], None);

        assert_eq!(options.len(), 1);
        let root = &options[0];
        assert_eq!(root.value, "1");
        assert_eq!(root.title, "Kenya");

        let level2 = root.children.as_ref().unwrap();
        let titles: Vec<_> = level2.iter().map(|o| o.title.as_str()).collect();
        assert_eq!(titles, vec!["Nairobi", "Mombasa"]);

        let level3 = level2[0].children.as_ref().unwrap();
        let values: Vec<_> = level3.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["4", "5"]);
    }

    #[test]
    fn test_leaf_has_no_children_key() {
        let options = tree_to_options(&[three_level_tree()], None);
        let mombasa = &options[0].children.as_ref().unwrap()[1];
        assert!(mombasa.children.is_none());

        let json = serde_json::to_value(mombasa).unwrap();
        assert_eq!(json, serde_json::json!({ "value": "3", "title": "Mombasa" }));
    }

    #[test]
    fn test_disabled_absent_without_predicate() {
        let options = tree_to_options(&[three_level_tree()], None);
        assert!(options[0].disabled.is_none());
    }

    #[test]
    fn test_always_true_predicate_disables_everything() {
        let always = |_: &TreeNode| true;
        let options = tree_to_options(&[three_level_tree()], Some(&always));

        let mut stack: Vec<&DisplayOption> = options.iter().collect();
        let mut seen = 0;
        while let Some(option) = stack.pop() {
            assert_eq!(option.disabled, Some(true));
            seen += 1;
            if let Some(children) = &option.children {
                stack.extend(children.iter());
            }
        }
        assert_eq!(seen, 5);
    }

    #[test]
    fn test_subtree_predicate_disables_branch_only() {
        let tree = three_level_tree();
        let nairobi = tree.find("2").unwrap().clone();
        let excluded = nairobi.subtree_ids();
        let predicate = |n: &TreeNode| excluded.contains(n.node_id.as_str());

        let options = tree_to_options(std::slice::from_ref(&tree), Some(&predicate));
        let root = &options[0];
        assert_eq!(root.disabled, Some(false));
        let children = root.children.as_ref().unwrap();
        assert_eq!(children[0].disabled, Some(true));
        assert_eq!(children[0].children.as_ref().unwrap()[1].disabled, Some(true));
        assert_eq!(children[1].disabled, Some(false));
    }

    #[test]
    fn test_unnamed_node_uses_node_id_as_title() {
        let tree = TreeNode::new("77", Location::default());
        let options = tree_to_options(&[tree], None);
        assert_eq!(options[0].title, "77");
    }
}
