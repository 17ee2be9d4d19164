use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derive_more::Display;
use serde::Serialize;

use crate::tree::InvalidDestination;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileType {
    Folder,
    Deck,
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileType::Folder => write!(f, "folder"),
            FileType::Deck => write!(f, "deck"),
        }
    }
}

#[derive(Debug, Serialize)]
pub enum AppSuccess {
    Created(FileType),
    Renamed,
    Moved(FileType),
    CopiedFolder,
    Trashed,
    Restored,
    Purged,
}

impl AppSuccess {
    pub fn message(&self) -> String {
        match self {
            AppSuccess::Created(file_type) => format!("The {file_type} was created."),
            AppSuccess::Renamed => "The folder was renamed.".to_string(),
            AppSuccess::Moved(file_type) => format!("The {file_type} was moved."),
            AppSuccess::CopiedFolder => "The folder was copied.".to_string(),
            AppSuccess::Trashed => "The folder was moved to the trash.".to_string(),
            AppSuccess::Restored => "The folder was restored.".to_string(),
            AppSuccess::Purged => "Expired items were removed from the trash.".to_string(),
        }
    }
}

#[derive(Debug, Display, PartialEq)]
pub enum AppError {
    #[display(fmt = "The {} was not found.", _0)]
    NotFound(FileType),
    #[display(fmt = "The folder is in the trash.")]
    InTrash,
    #[display(fmt = "The folder is not in the trash.")]
    NotInTrash,
    #[display(fmt = "A name is required.")]
    BlankName,
    #[display(fmt = "Invalid destination: {}.", _0)]
    InvalidDestination(InvalidDestination),
    #[display(fmt = "Internal Server Error")]
    InternalServerError,
}

impl std::error::Error for AppError {}

impl From<InvalidDestination> for AppError {
    fn from(reason: InvalidDestination) -> Self {
        AppError::InvalidDestination(reason)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InTrash | AppError::NotInTrash => StatusCode::CONFLICT,
            AppError::BlankName => StatusCode::BAD_REQUEST,
            AppError::InvalidDestination(InvalidDestination::TooDeep { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::InvalidDestination(_) => StatusCode::CONFLICT,
            AppError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "message": self.to_string(),
        }))
    }
}
