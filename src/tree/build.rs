use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use log::warn;

use crate::models::{Folder, FolderNode};

/// Turns flat folder records into an ordered forest.
///
/// A record is a root when its `parent_id` is empty, unknown, or points at
/// itself. The function never fails: records caught in a parent cycle are
/// hung off the forest as extra roots so that every distinct id shows up
/// exactly once.
pub fn build_tree(folders: &[Folder]) -> Vec<FolderNode> {
    let mut by_id: HashMap<&str, &Folder> = HashMap::with_capacity(folders.len());
    let mut unique: Vec<&Folder> = Vec::with_capacity(folders.len());

    for folder in folders {
        if by_id.contains_key(folder.id.as_str()) {
            warn!("duplicate folder id {} skipped while building tree", folder.id);
            continue;
        }
        by_id.insert(folder.id.as_str(), folder);
        unique.push(folder);
    }

    let mut children: HashMap<&str, Vec<&Folder>> = HashMap::new();
    let mut roots: Vec<&Folder> = Vec::new();

    for &folder in &unique {
        match folder.parent_id.as_deref() {
            Some(parent_id) if parent_id != folder.id && by_id.contains_key(parent_id) => {
                children.entry(parent_id).or_default().push(folder);
            }
            _ => roots.push(folder),
        }
    }

    let mut visited: HashSet<&str> = HashSet::with_capacity(unique.len());
    let mut forest = Vec::with_capacity(roots.len());

    for root in roots {
        visited.insert(root.id.as_str());
        forest.push(attach(root, &children, &mut visited));
    }

    for &folder in &unique {
        if visited.insert(folder.id.as_str()) {
            warn!("folder {} sits on a parent cycle, treating it as a root", folder.id);
            forest.push(attach(folder, &children, &mut visited));
        }
    }

    forest.sort_by(sibling_order);
    forest
}

/// Builds the subtree under `folder` with an explicit stack, so chain depth
/// is bounded by memory rather than by the call stack.
fn attach<'a>(
    folder: &'a Folder,
    children: &HashMap<&'a str, Vec<&'a Folder>>,
    visited: &mut HashSet<&'a str>,
) -> FolderNode {
    let mut stack = vec![(FolderNode::from(folder), pending_children(children, &folder.id))];
    let mut finished = None;

    while let Some((_, pending)) = stack.last_mut() {
        if let Some(&child) = pending.find(|child| visited.insert(child.id.as_str())) {
            stack.push((FolderNode::from(child), pending_children(children, &child.id)));
            continue;
        }

        if let Some((mut node, _)) = stack.pop() {
            node.children.sort_by(sibling_order);
            match stack.last_mut() {
                Some((parent, _)) => parent.children.push(node),
                None => finished = Some(node),
            }
        }
    }

    finished.unwrap_or_else(|| FolderNode::from(folder))
}

fn pending_children<'m, 'a>(
    children: &'m HashMap<&'a str, Vec<&'a Folder>>,
    id: &str,
) -> std::slice::Iter<'m, &'a Folder> {
    let none: &'m [&'a Folder] = &[];
    children.get(id).map_or(none, Vec::as_slice).iter()
}

/// Sort key ascending (unkeyed last), then case-sensitive name.
fn sibling_order(a: &FolderNode, b: &FolderNode) -> Ordering {
    let by_key = match (a.sort_order, b.sort_order) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    by_key.then_with(|| a.name.cmp(&b.name))
}
