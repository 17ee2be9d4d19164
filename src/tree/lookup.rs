use std::collections::HashSet;

use serde::Serialize;

use crate::models::FolderNode;

const PATH_SEPARATOR: &str = " / ";

/// Depth-first search for `id`; returns the first match.
pub fn find_node<'a>(nodes: &'a [FolderNode], id: &str) -> Option<&'a FolderNode> {
    let mut stack: Vec<&FolderNode> = nodes.iter().rev().collect();

    while let Some(node) = stack.pop() {
        if node.id == id {
            return Some(node);
        }
        stack.extend(node.children.iter().rev());
    }
    None
}

/// Ids of every node below `node`, not including `node` itself.
pub fn descendant_ids(node: &FolderNode) -> HashSet<&str> {
    let mut ids = HashSet::new();
    let mut stack: Vec<&FolderNode> = node.children.iter().collect();

    while let Some(current) = stack.pop() {
        ids.insert(current.id.as_str());
        stack.extend(current.children.iter());
    }

    ids
}

/// Number of levels below `node`. A leaf has height 0.
pub fn subtree_height(node: &FolderNode) -> usize {
    let mut height = 0;
    let mut stack = vec![(node, 0)];

    while let Some((current, depth)) = stack.pop() {
        height = height.max(depth);
        stack.extend(current.children.iter().map(|child| (child, depth + 1)));
    }

    height
}

pub fn count_nodes(nodes: &[FolderNode]) -> usize {
    let mut count = 0;
    let mut stack: Vec<&FolderNode> = nodes.iter().collect();

    while let Some(node) = stack.pop() {
        count += 1;
        stack.extend(node.children.iter());
    }

    count
}

/// Root-to-node chain ending at `id`, or `None` when `id` is not in the forest.
pub fn ancestry<'a>(nodes: &'a [FolderNode], id: &str) -> Option<Vec<&'a FolderNode>> {
    let mut stack: Vec<(&FolderNode, usize)> = nodes.iter().rev().map(|node| (node, 0)).collect();
    let mut chain: Vec<&FolderNode> = Vec::new();

    while let Some((node, depth)) = stack.pop() {
        chain.truncate(depth);
        chain.push(node);
        if node.id == id {
            return Some(chain);
        }
        stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
    }
    None
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FlatFolder {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub depth: usize,
    pub path: String,
}

/// Pre-order listing of the forest with derived depth and display path.
pub fn flatten(nodes: &[FolderNode]) -> Vec<FlatFolder> {
    let mut flat: Vec<FlatFolder> = Vec::new();
    // (node, index of the parent row in `flat`)
    let mut stack: Vec<(&FolderNode, Option<usize>)> =
        nodes.iter().rev().map(|node| (node, None)).collect();

    while let Some((node, parent)) = stack.pop() {
        let (depth, path) = match parent.map(|index| &flat[index]) {
            Some(row) => (
                row.depth + 1,
                format!("{}{PATH_SEPARATOR}{}", row.path, node.name),
            ),
            None => (0, node.name.clone()),
        };

        let index = flat.len();
        flat.push(FlatFolder {
            id: node.id.clone(),
            name: node.name.clone(),
            parent_id: node.parent_id.clone(),
            depth,
            path,
        });

        stack.extend(node.children.iter().rev().map(|child| (child, Some(index))));
    }

    flat
}

pub(crate) fn display_path(chain: &[&FolderNode]) -> String {
    chain
        .iter()
        .map(|node| node.name.as_str())
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Folder;
    use crate::tree::build_tree;

    fn sample() -> Vec<FolderNode> {
        build_tree(&[
            Folder::new("A", "Languages", None),
            Folder::new("B", "Japanese", Some("A")),
            Folder::new("C", "Kanji", Some("B")),
            Folder::new("D", "Kana", Some("B")),
            Folder::new("E", "Math", None),
        ])
    }

    #[test]
    fn test_find_node_returns_every_present_id() {
        let tree = sample();

        for id in ["A", "B", "C", "D", "E"] {
            let node = find_node(&tree, id).unwrap();
            assert_eq!(node.id, id);
        }
    }

    #[test]
    fn test_find_node_returns_the_tree_node_itself() {
        let tree = sample();
        let kanji = find_node(&tree, "C").unwrap();

        assert!(std::ptr::eq(kanji, &tree[0].children[0].children[1]));
    }

    #[test]
    fn test_find_node_absent() {
        let tree = sample();

        assert!(find_node(&tree, "Z").is_none());
        assert!(find_node(&[], "A").is_none());
    }

    #[test]
    fn test_descendant_ids() {
        let tree = sample();
        let a = find_node(&tree, "A").unwrap();

        let ids = descendant_ids(a);

        assert_eq!(ids, HashSet::from(["B", "C", "D"]));
        assert!(descendant_ids(find_node(&tree, "C").unwrap()).is_empty());
    }

    #[test]
    fn test_subtree_height() {
        let tree = sample();

        assert_eq!(subtree_height(find_node(&tree, "A").unwrap()), 2);
        assert_eq!(subtree_height(find_node(&tree, "B").unwrap()), 1);
        assert_eq!(subtree_height(find_node(&tree, "E").unwrap()), 0);
    }

    #[test]
    fn test_ancestry_runs_root_to_node() {
        let tree = sample();

        let chain: Vec<&str> = ancestry(&tree, "D")
            .unwrap()
            .iter()
            .map(|n| n.id.as_str())
            .collect();

        assert_eq!(chain, vec!["A", "B", "D"]);
        assert!(ancestry(&tree, "nope").is_none());
    }

    #[test]
    fn test_flatten_is_preorder_with_depth_and_path() {
        let tree = sample();

        let flat = flatten(&tree);
        let rows: Vec<(&str, usize, &str)> = flat
            .iter()
            .map(|f| (f.id.as_str(), f.depth, f.path.as_str()))
            .collect();

        assert_eq!(
            rows,
            vec![
                ("A", 0, "Languages"),
                ("B", 1, "Languages / Japanese"),
                ("D", 2, "Languages / Japanese / Kana"),
                ("C", 2, "Languages / Japanese / Kanji"),
                ("E", 0, "Math"),
            ]
        );
    }

    #[test]
    fn test_flatten_long_chain() {
        let folders: Vec<Folder> = (0..3_000)
            .map(|i| {
                let parent = if i == 0 { None } else { Some(format!("f{}", i - 1)) };
                Folder::new(format!("f{i}"), "x", parent.as_deref())
            })
            .collect();
        let tree = build_tree(&folders);

        let flat = flatten(&tree);

        assert_eq!(flat.len(), 3_000);
        assert_eq!(flat[2_999].depth, 2_999);
        assert_eq!(flat[2].path, "x / x / x");
    }
}
