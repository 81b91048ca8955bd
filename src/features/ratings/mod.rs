pub mod models;
pub mod services;

pub use services::RatingStatsService;
