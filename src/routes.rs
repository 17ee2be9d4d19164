use actix_web::web;

use crate::handlers::deck_handler::{create_deck, list_decks, move_deck};
use crate::handlers::folder_handler::{
    copy_folder, create_folder, get_destinations, get_folder_contents, get_folder_tree,
    list_folders, move_folder, rename_folder, trash_folder,
};
use crate::handlers::trash_handler::{list_trash, purge_expired, restore_folder};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(list_folders)
        .service(get_folder_tree)
        .service(get_destinations)
        .service(get_folder_contents)
        .service(create_folder)
        .service(rename_folder)
        .service(move_folder)
        .service(copy_folder)
        .service(trash_folder)
        .service(list_trash)
        .service(restore_folder)
        .service(purge_expired)
        .service(list_decks)
        .service(create_deck)
        .service(move_deck);
}
