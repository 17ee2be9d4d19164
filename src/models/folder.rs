use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A folder record as it is stored: flat, pointing at its parent by id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<String>,
    pub sort_order: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Folder {
    pub fn new(id: impl Into<String>, name: impl Into<String>, parent_id: Option<&str>) -> Self {
        let now = Utc::now();

        Folder {
            id: id.into(),
            name: name.into(),
            description: None,
            parent_id: parent_id.map(String::from),
            sort_order: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn with_sort_order(mut self, sort_order: i64) -> Self {
        self.sort_order = Some(sort_order);
        self
    }

    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Nested projection of [`Folder`] records, rebuilt on every read.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FolderNode {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub sort_order: Option<i64>,
    pub children: Vec<FolderNode>,
}

impl From<&Folder> for FolderNode {
    fn from(folder: &Folder) -> Self {
        FolderNode {
            id: folder.id.clone(),
            name: folder.name.clone(),
            parent_id: folder.parent_id.clone(),
            sort_order: folder.sort_order,
            children: Vec::new(),
        }
    }
}

impl Drop for FolderNode {
    // Unlinks descendants onto a flat list so dropping a deep chain does not recurse.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

#[derive(Deserialize)]
pub struct FolderCreateRequest {
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<String>,
    pub sort_order: Option<i64>,
}

#[derive(Deserialize)]
pub struct FolderRenameRequest {
    pub name: String,
}

/// Body of move and copy requests. A missing destination means the root.
#[derive(Deserialize)]
pub struct FolderTransferRequest {
    #[serde(default)]
    pub destination_id: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct TrashedFolder {
    pub id: String,
    pub name: String,
    pub path: String,
    pub trashed_at: DateTime<Utc>,
    pub days_until_deletion: i64,
}
