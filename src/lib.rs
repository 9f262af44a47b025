use sqlx::SqlitePool;

pub mod auth;
pub mod db;
pub mod errors;
pub mod routes;
pub mod structs;
pub mod utils;
pub mod validation;

#[derive(Debug, Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
}
