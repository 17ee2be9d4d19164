use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::models::FolderNode;

use super::lookup::descendant_ids;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transfer {
    Move,
    Copy,
}

/// Why a destination was refused.
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidDestination {
    #[display(fmt = "a folder cannot be placed inside itself")]
    SameFolder,
    #[display(fmt = "a folder cannot be placed inside one of its own subfolders")]
    Descendant,
    #[display(fmt = "the item is already in this location")]
    CurrentParent,
    #[display(fmt = "the result would be {} levels deep, the limit is {}", levels, max)]
    TooDeep { levels: usize, max: usize },
}

/// Decides whether `source` may be moved or copied under `destination`.
///
/// `None` as destination is the root level. Only identity and descent are
/// checked here; whether `destination` exists is up to the caller.
pub fn check_destination(
    source: &FolderNode,
    destination: Option<&str>,
    transfer: Transfer,
) -> Result<(), InvalidDestination> {
    if let Some(destination) = destination {
        if destination == source.id {
            return Err(InvalidDestination::SameFolder);
        }
        if descendant_ids(source).contains(destination) {
            return Err(InvalidDestination::Descendant);
        }
    }

    if transfer == Transfer::Move && destination == source.parent_id.as_deref() {
        return Err(InvalidDestination::CurrentParent);
    }

    Ok(())
}

pub fn is_legal_destination(
    source: &FolderNode,
    destination: Option<&str>,
    transfer: Transfer,
) -> bool {
    check_destination(source, destination, transfer).is_ok()
}

/// Checks that a subtree of `subtree_height` placed under a folder at
/// `destination_depth` (root level when `None`) stays within `max_depth` levels.
pub fn check_nesting(
    destination_depth: Option<usize>,
    subtree_height: usize,
    max_depth: usize,
) -> Result<(), InvalidDestination> {
    let top_level = destination_depth.map_or(1, |depth| depth + 2);
    let levels = top_level + subtree_height;

    if levels > max_depth {
        return Err(InvalidDestination::TooDeep { levels, max: max_depth });
    }
    Ok(())
}
