//! Pure functions over folder hierarchies.
//!
//! Nothing in here touches storage: callers hand in flat [`Folder`] records
//! or an already built forest of [`FolderNode`]s.
//!
//! [`Folder`]: crate::models::Folder
//! [`FolderNode`]: crate::models::FolderNode

pub mod build;
pub mod lookup;
pub mod options;
pub mod validate;

pub use build::build_tree;
pub use lookup::{
    ancestry, count_nodes, descendant_ids, find_node, flatten, subtree_height, FlatFolder,
};
pub use options::{destination_options, DepthLimit, DestinationOption, NESTING_CEILING};
pub use validate::{
    check_destination, check_nesting, is_legal_destination, InvalidDestination, Transfer,
};
