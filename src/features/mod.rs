pub mod categories;
pub mod comments;
pub mod library;
pub mod links;
pub mod lyrics;
pub mod monitoring;
pub mod prompts;
pub mod ratings;
pub mod refresh;
