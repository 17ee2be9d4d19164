use actix_web::{delete, get, post, web, HttpResponse};
use chrono::Utc;

use crate::message::{AppError, AppSuccess};
use crate::store::FolderStore;

#[get("/trash")]
pub async fn list_trash(store: web::Data<FolderStore>) -> HttpResponse {
    HttpResponse::Ok().json(store.list_trash().await)
}

#[post("/trash/{folder_id}/restore")]
pub async fn restore_folder(
    path: web::Path<String>,
    store: web::Data<FolderStore>,
) -> Result<HttpResponse, AppError> {
    let folder = store.restore_folder(&path).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": AppSuccess::Restored.message(),
        "folder": folder,
    })))
}

#[delete("/trash/expired")]
pub async fn purge_expired(store: web::Data<FolderStore>) -> HttpResponse {
    let purged = store.purge_expired(Utc::now()).await;

    HttpResponse::Ok().json(serde_json::json!({
        "message": AppSuccess::Purged.message(),
        "purged": purged,
    }))
}
