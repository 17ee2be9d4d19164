pub mod deck_handler;
pub mod folder_handler;
pub mod trash_handler;
