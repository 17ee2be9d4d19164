use actix_web::{get, post, web, HttpResponse};

use crate::message::{AppError, AppSuccess, FileType};
use crate::models::deck::DeckCreateRequest;
use crate::models::folder::FolderTransferRequest;
use crate::store::FolderStore;

#[get("/decks")]
pub async fn list_decks(store: web::Data<FolderStore>) -> HttpResponse {
    HttpResponse::Ok().json(store.list_decks().await)
}

#[post("/create-deck")]
pub async fn create_deck(
    store: web::Data<FolderStore>,
    payload: web::Json<DeckCreateRequest>,
) -> Result<HttpResponse, AppError> {
    let deck = store.create_deck(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": AppSuccess::Created(FileType::Deck).message(),
        "id": deck.id,
    })))
}

#[post("/decks/{deck_id}/move")]
pub async fn move_deck(
    path: web::Path<String>,
    store: web::Data<FolderStore>,
    payload: web::Json<FolderTransferRequest>,
) -> Result<HttpResponse, AppError> {
    let deck = store.move_deck(&path, payload.destination_id.as_deref()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": AppSuccess::Moved(FileType::Deck).message(),
        "deck": deck,
    })))
}
