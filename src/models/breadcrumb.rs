use serde::Serialize;

use super::FolderNode;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Breadcrumb {
    pub id: String,
    pub name: String,
}

impl From<&FolderNode> for Breadcrumb {
    fn from(node: &FolderNode) -> Self {
        Breadcrumb {
            id: node.id.clone(),
            name: node.name.clone(),
        }
    }
}
