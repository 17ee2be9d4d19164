pub mod folder;
pub mod deck;
pub mod breadcrumb;

pub use folder::{Folder, FolderNode};
pub use deck::Deck;
pub use breadcrumb::Breadcrumb;
