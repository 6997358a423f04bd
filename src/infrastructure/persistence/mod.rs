mod database;
mod prediction_repository;

pub use database::Database;
pub use prediction_repository::SqlitePredictionRepository;
