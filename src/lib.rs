//! Folder hierarchy service for the RepeatWise flashcard app.
//!
//! [`tree`] holds the pure folder-tree functions, [`store`] the in-memory
//! arena built on them, and [`handlers`]/[`routes`] the actix-web surface.

pub mod config;
pub mod handlers;
pub mod message;
pub mod models;
pub mod routes;
pub mod store;
pub mod tree;
