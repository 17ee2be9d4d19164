use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::Config;
use crate::message::{AppError, FileType};
use crate::models::deck::DeckCreateRequest;
use crate::models::folder::{FolderCreateRequest, TrashedFolder};
use crate::models::{Breadcrumb, Deck, Folder, FolderNode};
use crate::tree::lookup::display_path;
use crate::tree::{
    ancestry, build_tree, check_destination, check_nesting, descendant_ids, destination_options,
    find_node, subtree_height, DepthLimit, DestinationOption, Transfer, NESTING_CEILING,
};

#[derive(Serialize, Debug)]
pub struct FolderContents {
    pub folder: Folder,
    pub decks: Vec<Deck>,
    pub child_folders: Vec<Folder>,
    pub breadcrumbs: Vec<Breadcrumb>,
}

/// In-memory arena owning every folder and deck record, keyed by id.
///
/// Nested views are rebuilt from the flat records on each call.
pub struct FolderStore {
    inner: RwLock<Inner>,
    depth_limit: DepthLimit,
    trash_grace: Duration,
}

#[derive(Default)]
struct Inner {
    folders: HashMap<String, Folder>,
    decks: HashMap<String, Deck>,
}

impl Inner {
    fn sorted(&self, include_trashed: bool) -> Vec<Folder> {
        let mut folders: Vec<Folder> = self
            .folders
            .values()
            .filter(|folder| include_trashed || !folder.is_trashed())
            .cloned()
            .collect();
        folders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        folders
    }

    fn active_tree(&self) -> Vec<FolderNode> {
        build_tree(&self.sorted(false))
    }

    fn full_tree(&self) -> Vec<FolderNode> {
        build_tree(&self.sorted(true))
    }

    fn active(&self, id: &str) -> Result<&Folder, AppError> {
        match self.folders.get(id) {
            Some(folder) if folder.is_trashed() => Err(AppError::InTrash),
            Some(folder) => Ok(folder),
            None => Err(AppError::NotFound(FileType::Folder)),
        }
    }

    fn is_active(&self, id: &str) -> bool {
        self.active(id).is_ok()
    }
}

impl FolderStore {
    pub fn new(config: &Config) -> Self {
        FolderStore {
            inner: RwLock::new(Inner::default()),
            depth_limit: config.depth_limit,
            trash_grace: Duration::days(config.trash_grace_days),
        }
    }

    pub async fn list_folders(&self) -> Vec<Folder> {
        self.inner.read().await.sorted(false)
    }

    pub async fn tree(&self) -> Vec<FolderNode> {
        self.inner.read().await.active_tree()
    }

    pub async fn contents(&self, id: &str) -> Result<FolderContents, AppError> {
        let inner = self.inner.read().await;
        let folder = inner.active(id)?.clone();
        let tree = inner.active_tree();

        let chain = ancestry(&tree, id).ok_or(AppError::NotFound(FileType::Folder))?;
        let node = chain.last().ok_or(AppError::InternalServerError)?;

        let child_folders = node
            .children
            .iter()
            .filter_map(|child| inner.folders.get(&child.id).cloned())
            .collect();

        let mut decks: Vec<Deck> = inner
            .decks
            .values()
            .filter(|deck| deck.folder_id.as_deref() == Some(id))
            .cloned()
            .collect();
        decks.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(FolderContents {
            folder,
            decks,
            child_folders,
            breadcrumbs: chain.iter().map(|node| Breadcrumb::from(*node)).collect(),
        })
    }

    pub async fn create_folder(&self, request: FolderCreateRequest) -> Result<Folder, AppError> {
        let name = normalize_name(&request.name)?;
        let mut inner = self.inner.write().await;

        let parent_depth = match request.parent_id.as_deref() {
            Some(parent_id) => {
                inner.active(parent_id)?;
                Some(depth_of(&inner.active_tree(), parent_id)?)
            }
            None => None,
        };
        self.enforce_nesting(parent_depth, 0)?;

        let parent_id = request.parent_id.as_deref();
        let mut folder = Folder::new(Uuid::new_v4().to_string(), name, parent_id);
        folder.description = request.description;
        folder.sort_order = request.sort_order;

        info!("created folder {} ({}) under {:?}", folder.id, folder.name, folder.parent_id);
        inner.folders.insert(folder.id.clone(), folder.clone());

        Ok(folder)
    }

    pub async fn rename_folder(&self, id: &str, name: &str) -> Result<Folder, AppError> {
        let name = normalize_name(name)?;
        let mut inner = self.inner.write().await;
        inner.active(id)?;

        let folder = inner
            .folders
            .get_mut(id)
            .ok_or(AppError::NotFound(FileType::Folder))?;
        folder.name = name;
        folder.updated_at = Utc::now();

        info!("renamed folder {} to {}", folder.id, folder.name);
        Ok(folder.clone())
    }

    pub async fn move_folder(
        &self,
        id: &str,
        destination: Option<&str>,
    ) -> Result<Folder, AppError> {
        let mut inner = self.inner.write().await;
        inner.active(id)?;

        let tree = inner.active_tree();
        let source = find_node(&tree, id).ok_or(AppError::NotFound(FileType::Folder))?;

        check_destination(source, destination, Transfer::Move).map_err(|reason| {
            warn!("refused to move folder {id} to {destination:?}: {reason}");
            AppError::from(reason)
        })?;

        let destination_depth = match destination {
            Some(destination_id) => {
                inner.active(destination_id)?;
                Some(depth_of(&tree, destination_id)?)
            }
            None => None,
        };
        self.enforce_nesting(destination_depth, subtree_height(source))?;

        let folder = inner
            .folders
            .get_mut(id)
            .ok_or(AppError::NotFound(FileType::Folder))?;
        folder.parent_id = destination.map(String::from);
        folder.updated_at = Utc::now();

        info!("moved folder {id} to {destination:?}");
        Ok(folder.clone())
    }

    /// Duplicates the subtree rooted at `id`, decks included, under `destination`.
    pub async fn copy_folder(
        &self,
        id: &str,
        destination: Option<&str>,
    ) -> Result<FolderNode, AppError> {
        let mut inner = self.inner.write().await;
        inner.active(id)?;

        let tree = inner.active_tree();
        let source = find_node(&tree, id).ok_or(AppError::NotFound(FileType::Folder))?;

        check_destination(source, destination, Transfer::Copy).map_err(|reason| {
            warn!("refused to copy folder {id} to {destination:?}: {reason}");
            AppError::from(reason)
        })?;

        let destination_depth = match destination {
            Some(destination_id) => {
                inner.active(destination_id)?;
                Some(depth_of(&tree, destination_id)?)
            }
            None => None,
        };
        self.enforce_nesting(destination_depth, subtree_height(source))?;

        let mut folders = Vec::new();
        let mut decks = Vec::new();
        copy_subtree(&inner, source, destination, Utc::now(), &mut folders, &mut decks);

        let copied = build_tree(&folders)
            .into_iter()
            .next()
            .ok_or(AppError::InternalServerError)?;

        info!(
            "copied folder {id} as {} ({} folders, {} decks)",
            copied.id,
            folders.len(),
            decks.len()
        );
        inner.folders.extend(folders.into_iter().map(|folder| (folder.id.clone(), folder)));
        inner.decks.extend(decks.into_iter().map(|deck| (deck.id.clone(), deck)));

        Ok(copied)
    }

    /// Soft-deletes the folder and everything below it. Returns the number of folders trashed.
    pub async fn trash_folder(&self, id: &str) -> Result<usize, AppError> {
        let mut inner = self.inner.write().await;
        inner.active(id)?;

        let tree = inner.active_tree();
        let node = find_node(&tree, id).ok_or(AppError::NotFound(FileType::Folder))?;

        let mut ids: Vec<String> = descendant_ids(node).into_iter().map(String::from).collect();
        ids.push(id.to_string());

        let now = Utc::now();
        for folder_id in &ids {
            if let Some(folder) = inner.folders.get_mut(folder_id) {
                folder.deleted_at = Some(now);
            }
        }

        info!("moved folder {id} and {} subfolders to the trash", ids.len() - 1);
        Ok(ids.len())
    }

    /// Trashed folders that were not trashed together with their parent, newest first.
    ///
    /// A folder trashed in an earlier batch than its parent stays listed on its own.
    pub async fn list_trash(&self) -> Vec<TrashedFolder> {
        let inner = self.inner.read().await;
        let tree = inner.full_tree();
        let now = Utc::now();

        let mut trashed: Vec<TrashedFolder> = inner
            .folders
            .values()
            .filter_map(|folder| {
                let trashed_at = folder.deleted_at?;
                let same_batch_as_parent = folder
                    .parent_id
                    .as_deref()
                    .and_then(|parent_id| inner.folders.get(parent_id))
                    .is_some_and(|parent| parent.deleted_at == Some(trashed_at));
                if same_batch_as_parent {
                    return None;
                }

                let path = ancestry(&tree, &folder.id)
                    .map(|chain| display_path(&chain))
                    .unwrap_or_else(|| folder.name.clone());

                Some(TrashedFolder {
                    id: folder.id.clone(),
                    name: folder.name.clone(),
                    path,
                    trashed_at,
                    days_until_deletion: self.days_until_deletion(trashed_at, now),
                })
            })
            .collect();

        trashed.sort_by(|a, b| b.trashed_at.cmp(&a.trashed_at).then_with(|| a.id.cmp(&b.id)));
        trashed
    }

    /// Brings back a trashed folder with the subfolders trashed alongside it.
    ///
    /// The folder lands at the root when its parent is no longer active or cannot
    /// take the restored subtree back within the depth limit.
    pub async fn restore_folder(&self, id: &str) -> Result<Folder, AppError> {
        let mut inner = self.inner.write().await;

        let folder = inner
            .folders
            .get(id)
            .ok_or(AppError::NotFound(FileType::Folder))?;
        let trashed_at = folder.deleted_at.ok_or(AppError::NotInTrash)?;
        let active_parent = folder
            .parent_id
            .clone()
            .filter(|parent_id| inner.is_active(parent_id));

        let tree = inner.full_tree();
        let node = find_node(&tree, id).ok_or(AppError::NotFound(FileType::Folder))?;
        let (batch, height) = trash_batch(&inner, node, trashed_at);

        let land_at_root = match active_parent.as_deref() {
            Some(parent_id) => {
                let parent_depth = depth_of(&inner.active_tree(), parent_id)?;
                self.enforce_nesting(Some(parent_depth), height).is_err()
            }
            None => true,
        };
        if land_at_root {
            self.enforce_nesting(None, height)?;
        }

        let now = Utc::now();
        for batch_id in &batch {
            if let Some(restored) = inner.folders.get_mut(*batch_id) {
                restored.deleted_at = None;
                restored.updated_at = now;
            }
        }

        let folder = inner
            .folders
            .get_mut(id)
            .ok_or(AppError::NotFound(FileType::Folder))?;
        if land_at_root && folder.parent_id.is_some() {
            warn!("folder {id} cannot go back under its parent, restoring it at the root");
            folder.parent_id = None;
        }

        info!("restored folder {id} and {} subfolders", batch.len() - 1);
        Ok(folder.clone())
    }

    /// Permanently removes folders trashed longer than the grace period, with their decks.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut inner = self.inner.write().await;
        let cutoff = now - self.trash_grace;

        let expired: HashSet<String> = inner
            .folders
            .values()
            .filter(|folder| folder.deleted_at.is_some_and(|at| at <= cutoff))
            .map(|folder| folder.id.clone())
            .collect();

        if expired.is_empty() {
            return 0;
        }

        inner.folders.retain(|id, _| !expired.contains(id));
        inner
            .decks
            .retain(|_, deck| !deck.folder_id.as_ref().is_some_and(|id| expired.contains(id)));

        info!("purged {} expired folders from the trash", expired.len());
        expired.len()
    }

    pub async fn destination_options(
        &self,
        source_id: &str,
        transfer: Transfer,
    ) -> Result<Vec<DestinationOption>, AppError> {
        let inner = self.inner.read().await;
        inner.active(source_id)?;

        destination_options(&inner.active_tree(), source_id, transfer, self.depth_limit)
            .ok_or(AppError::NotFound(FileType::Folder))
    }

    /// Decks in active folders plus unfiled decks, by name.
    pub async fn list_decks(&self) -> Vec<Deck> {
        let inner = self.inner.read().await;

        let mut decks: Vec<Deck> = inner
            .decks
            .values()
            .filter(|deck| deck.folder_id.as_deref().map_or(true, |id| inner.is_active(id)))
            .cloned()
            .collect();
        decks.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        decks
    }

    pub async fn create_deck(&self, request: DeckCreateRequest) -> Result<Deck, AppError> {
        let name = normalize_name(&request.name)?;
        let mut inner = self.inner.write().await;

        if let Some(folder_id) = request.folder_id.as_deref() {
            inner.active(folder_id)?;
        }

        let deck = Deck {
            id: Uuid::new_v4().to_string(),
            name,
            description: request.description,
            folder_id: request.folder_id,
            created_at: Utc::now(),
        };

        info!("created deck {} in {:?}", deck.id, deck.folder_id);
        inner.decks.insert(deck.id.clone(), deck.clone());

        Ok(deck)
    }

    pub async fn move_deck(&self, id: &str, destination: Option<&str>) -> Result<Deck, AppError> {
        let mut inner = self.inner.write().await;

        let current = inner
            .decks
            .get(id)
            .ok_or(AppError::NotFound(FileType::Deck))?
            .folder_id
            .clone();
        if current.as_deref() == destination {
            return Err(crate::tree::InvalidDestination::CurrentParent.into());
        }
        if let Some(folder_id) = destination {
            inner.active(folder_id)?;
        }

        let deck = inner
            .decks
            .get_mut(id)
            .ok_or(AppError::NotFound(FileType::Deck))?;
        deck.folder_id = destination.map(String::from);

        info!("moved deck {id} to {destination:?}");
        Ok(deck.clone())
    }

    fn enforce_nesting(
        &self,
        destination_depth: Option<usize>,
        height: usize,
    ) -> Result<(), AppError> {
        if let Err(reason) = check_nesting(destination_depth, height, NESTING_CEILING) {
            warn!("refused placement beyond the nesting ceiling: {reason}");
            return Err(reason.into());
        }

        match check_nesting(destination_depth, height, self.depth_limit.max_depth) {
            Ok(()) => Ok(()),
            Err(reason) if self.depth_limit.enforce => {
                warn!("refused placement: {reason}");
                Err(reason.into())
            }
            Err(reason) => {
                warn!("placement exceeds the soft depth limit: {reason}");
                Ok(())
            }
        }
    }

    fn days_until_deletion(&self, trashed_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
        // partial days count as a whole day left
        let remaining = trashed_at + self.trash_grace - now;
        ((remaining.num_seconds() + 86_399) / 86_400).max(0)
    }
}

fn normalize_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BlankName);
    }
    Ok(name.to_string())
}

fn depth_of(tree: &[FolderNode], id: &str) -> Result<usize, AppError> {
    ancestry(tree, id)
        .map(|chain| chain.len() - 1)
        .ok_or(AppError::NotFound(FileType::Folder))
}

/// Ids trashed in the same batch as `node`, and the height of the subtree they form.
fn trash_batch<'t>(
    inner: &Inner,
    node: &'t FolderNode,
    trashed_at: DateTime<Utc>,
) -> (Vec<&'t str>, usize) {
    let mut batch = Vec::new();
    let mut height = 0;
    let mut stack = vec![(node, 0)];

    while let Some((current, depth)) = stack.pop() {
        batch.push(current.id.as_str());
        height = height.max(depth);
        stack.extend(
            current
                .children
                .iter()
                .filter(|child| {
                    inner
                        .folders
                        .get(&child.id)
                        .is_some_and(|folder| folder.deleted_at == Some(trashed_at))
                })
                .map(|child| (child, depth + 1)),
        );
    }

    (batch, height)
}

fn copy_subtree(
    inner: &Inner,
    node: &FolderNode,
    parent_id: Option<&str>,
    now: DateTime<Utc>,
    folders: &mut Vec<Folder>,
    decks: &mut Vec<Deck>,
) {
    let copy_id = Uuid::new_v4().to_string();

    folders.push(Folder {
        id: copy_id.clone(),
        name: node.name.clone(),
        description: inner.folders.get(&node.id).and_then(|f| f.description.clone()),
        parent_id: parent_id.map(String::from),
        sort_order: node.sort_order,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    });

    decks.extend(
        inner
            .decks
            .values()
            .filter(|deck| deck.folder_id.as_deref() == Some(node.id.as_str()))
            .map(|deck| Deck {
                id: Uuid::new_v4().to_string(),
                folder_id: Some(copy_id.clone()),
                created_at: now,
                ..deck.clone()
            }),
    );

    for child in &node.children {
        copy_subtree(inner, child, Some(&copy_id), now, folders, decks);
    }
}
