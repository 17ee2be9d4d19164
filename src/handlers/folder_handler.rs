use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde::Deserialize;

use crate::message::{AppError, AppSuccess, FileType};
use crate::models::folder::{FolderCreateRequest, FolderRenameRequest, FolderTransferRequest};
use crate::store::FolderStore;
use crate::tree::Transfer;

#[derive(Deserialize)]
pub struct DestinationQuery {
    pub transfer: Option<Transfer>,
}

#[get("/folders")]
pub async fn list_folders(store: web::Data<FolderStore>) -> HttpResponse {
    HttpResponse::Ok().json(store.list_folders().await)
}

#[get("/folders/tree")]
pub async fn get_folder_tree(store: web::Data<FolderStore>) -> HttpResponse {
    HttpResponse::Ok().json(store.tree().await)
}

/// Every candidate destination for moving or copying the folder, flagged allowed or not.
#[get("/folders/{folder_id}/destinations")]
pub async fn get_destinations(
    path: web::Path<String>,
    query: web::Query<DestinationQuery>,
    store: web::Data<FolderStore>,
) -> Result<HttpResponse, AppError> {
    let transfer = query.transfer.unwrap_or(Transfer::Move);
    let options = store.destination_options(&path, transfer).await?;

    Ok(HttpResponse::Ok().json(options))
}

#[get("/files/{folder_id}")]
pub async fn get_folder_contents(
    path: web::Path<String>,
    store: web::Data<FolderStore>,
) -> Result<HttpResponse, AppError> {
    let contents = store.contents(&path).await?;

    Ok(HttpResponse::Ok().json(contents))
}

#[post("/create-folder")]
pub async fn create_folder(
    store: web::Data<FolderStore>,
    payload: web::Json<FolderCreateRequest>,
) -> Result<HttpResponse, AppError> {
    let folder = store.create_folder(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": AppSuccess::Created(FileType::Folder).message(),
        "id": folder.id,
    })))
}

#[patch("/folders/{folder_id}")]
pub async fn rename_folder(
    path: web::Path<String>,
    store: web::Data<FolderStore>,
    payload: web::Json<FolderRenameRequest>,
) -> Result<HttpResponse, AppError> {
    let folder = store.rename_folder(&path, &payload.name).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": AppSuccess::Renamed.message(),
        "folder": folder,
    })))
}

#[post("/folders/{folder_id}/move")]
pub async fn move_folder(
    path: web::Path<String>,
    store: web::Data<FolderStore>,
    payload: web::Json<FolderTransferRequest>,
) -> Result<HttpResponse, AppError> {
    let folder = store.move_folder(&path, payload.destination_id.as_deref()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": AppSuccess::Moved(FileType::Folder).message(),
        "folder": folder,
    })))
}

#[post("/folders/{folder_id}/copy")]
pub async fn copy_folder(
    path: web::Path<String>,
    store: web::Data<FolderStore>,
    payload: web::Json<FolderTransferRequest>,
) -> Result<HttpResponse, AppError> {
    let copy = store.copy_folder(&path, payload.destination_id.as_deref()).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": AppSuccess::CopiedFolder.message(),
        "id": copy.id,
        "tree": copy,
    })))
}

#[delete("/folders/{folder_id}")]
pub async fn trash_folder(
    path: web::Path<String>,
    store: web::Data<FolderStore>,
) -> Result<HttpResponse, AppError> {
    let trashed = store.trash_folder(&path).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": AppSuccess::Trashed.message(),
        "trashed": trashed,
    })))
}
