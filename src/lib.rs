// src/lib.rs
// Backend de gestão de estoque e patrimônio multiagências.

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use config::{AppState, Settings};
pub use routes::build_router;
