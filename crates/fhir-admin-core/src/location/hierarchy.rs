//! Building location trees from flat `partOf`-linked resources

use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::{debug, warn};

use super::tree::TreeNode;
use crate::models::Location;

/// Parent id -> children in input order, plus the id index
struct Index<'a> {
    by_id: IndexMap<&'a str, &'a Location>,
    children: IndexMap<&'a str, Vec<&'a Location>>,
}

impl<'a> Index<'a> {
    fn new(locations: &'a [Location]) -> Self {
        let mut by_id = IndexMap::new();
        let mut children: IndexMap<&str, Vec<&Location>> = IndexMap::new();

        for location in locations {
            let Some(id) = location.id.as_deref() else {
                debug!("Skipping location without id: {:?}", location.name);
                continue;
            };
            by_id.insert(id, location);
            if let Some(parent) = location.parent_id() {
                children.entry(parent).or_default().push(location);
            }
        }

        Self { by_id, children }
    }

    fn build(&self, location: &'a Location, visited: &mut HashSet<&'a str>) -> Option<TreeNode> {
        let id = location.id.as_deref()?;
        if !visited.insert(id) {
            warn!("Location '{}' is part of a partOf cycle; skipping", id);
            return None;
        }

        let children = self
            .children
            .get(id)
            .map(|kids| {
                kids.iter()
                    .filter_map(|kid| self.build(*kid, visited))
                    .collect()
            })
            .unwrap_or_default();

        Some(TreeNode::new(id, location.clone()).with_children(children))
    }
}

/// Build the tree rooted at `root_id`
///
/// Returns `None` when the root is not among `locations`.
pub fn build_hierarchy(locations: &[Location], root_id: &str) -> Option<TreeNode> {
    let index = Index::new(locations);
    let root = index.by_id.get(root_id)?;
    index.build(*root, &mut HashSet::new())
}

/// Build every tree in `locations`
///
/// Roots are locations with no parent or whose parent is not in the list.
/// Locations reachable only through a `partOf` cycle are left out.
pub fn build_forest(locations: &[Location]) -> Vec<TreeNode> {
    let index = Index::new(locations);
    let mut visited = HashSet::new();

    index
        .by_id
        .values()
        .filter(|location| {
            location
                .parent_id()
                .is_none_or(|parent| !index.by_id.contains_key(parent))
        })
        .filter_map(|root| index.build(*root, &mut visited))
        .collect()
}

/// Find a node by id anywhere in a forest
pub fn find_node<'a>(trees: &'a [TreeNode], node_id: &str) -> Option<&'a TreeNode> {
    trees.iter().find_map(|tree| tree.find(node_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Reference;

    fn location(id: &str, parent: Option<&str>) -> Location {
        Location {
            id: Some(id.to_string()),
            name: Some(format!("Location {id}")),
            part_of: parent.map(|p| Reference::to("Location", p)),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_hierarchy_from_flat_list() {
        let locations = vec![
            location("root", None),
            location("a", Some("root")),
            location("b", Some("root")),
            location("a1", Some("a")),
        ];

        let tree = build_hierarchy(&locations, "root").unwrap();
        assert_eq!(tree.node_id, "root");
        let children: Vec<_> = tree.children.iter().map(|c| c.node_id.as_str()).collect();
        assert_eq!(children, vec!["a", "b"]);
        assert_eq!(tree.children[0].children[0].node_id, "a1");
        assert!(!tree.children[1].has_children());
    }

    #[test]
    fn test_children_listed_before_parent_still_attach() {
        let locations = vec![location("a1", Some("a")), location("a", None)];
        let tree = build_hierarchy(&locations, "a").unwrap();
        assert_eq!(tree.children.len(), 1);
    }

    #[test]
    fn test_missing_root_yields_none() {
        let locations = vec![location("a", None)];
        assert!(build_hierarchy(&locations, "nope").is_none());
    }

    #[test]
    fn test_forest_roots_include_orphans() {
        let locations = vec![
            location("a", None),
            location("b", Some("missing-parent")),
            location("c", Some("a")),
        ];
        let forest = build_forest(&locations);
        let roots: Vec<_> = forest.iter().map(|t| t.node_id.as_str()).collect();
        assert_eq!(roots, vec!["a", "b"]);
        assert!(find_node(&forest, "c").is_some());
    }

    #[test]
    fn test_cycle_does_not_loop() {
        let locations = vec![
            location("root", None),
            location("x", Some("y")),
            location("y", Some("x")),
            location("self", Some("self")),
        ];

        let forest = build_forest(&locations);
        assert_eq!(forest.len(), 1);
        assert!(find_node(&forest, "x").is_none());

        let tree = build_hierarchy(&locations, "x").unwrap();
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].node_id, "y");
        assert!(!tree.children[0].has_children());
    }
}
