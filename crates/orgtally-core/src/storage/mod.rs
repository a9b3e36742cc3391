pub mod models;
pub mod queries;
mod sqlite;

pub use sqlite::Database;
