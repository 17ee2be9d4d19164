use serde::Serialize;

use crate::models::FolderNode;

use super::lookup::{find_node, flatten, subtree_height, FlatFolder};
use super::validate::{check_destination, check_nesting, InvalidDestination, Transfer};

/// Absolute nesting limit, applied whether or not [`DepthLimit::enforce`] is set.
pub const NESTING_CEILING: usize = 256;

/// Maximum nesting and whether stores refuse placements beyond it.
///
/// With `enforce` off the limit is only reported through
/// [`destination_options`], so clients can grey out deep targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthLimit {
    pub max_depth: usize,
    pub enforce: bool,
}

impl Default for DepthLimit {
    fn default() -> Self {
        DepthLimit {
            max_depth: 10,
            enforce: true,
        }
    }
}

/// One row of a move/copy picker. `folder` is `None` for the root level.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DestinationOption {
    pub folder: Option<FlatFolder>,
    pub allowed: bool,
    pub reason: Option<InvalidDestination>,
}

/// Lists the root plus every folder of `tree` as a destination for
/// `source_id`, each flagged with whether it may be chosen.
///
/// Returns `None` when `source_id` is not in the tree.
pub fn destination_options(
    tree: &[FolderNode],
    source_id: &str,
    transfer: Transfer,
    limit: DepthLimit,
) -> Option<Vec<DestinationOption>> {
    let source = find_node(tree, source_id)?;
    let height = subtree_height(source);

    let verdict = |destination: Option<&str>, depth: Option<usize>| -> Option<InvalidDestination> {
        check_destination(source, destination, transfer)
            .and_then(|()| check_nesting(depth, height, limit.max_depth))
            .err()
    };

    let root_reason = verdict(None, None);
    let mut options = vec![DestinationOption {
        folder: None,
        allowed: root_reason.is_none(),
        reason: root_reason,
    }];

    options.extend(flatten(tree).into_iter().map(|folder| {
        let reason = verdict(Some(folder.id.as_str()), Some(folder.depth));
        DestinationOption {
            allowed: reason.is_none(),
            reason,
            folder: Some(folder),
        }
    }));

    Some(options)
}
