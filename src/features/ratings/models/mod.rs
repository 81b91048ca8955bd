mod star_rating;

pub use star_rating::{PromptRating, StarRating};
