mod rating_stats_service;

pub use rating_stats_service::RatingStatsService;
