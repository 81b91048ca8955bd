mod comment_state;
mod rating_state;
mod stats_state;

pub use comment_state::{CommentOutcome, CommentState};
pub use rating_state::{RateOutcome, RatingState};
pub use stats_state::{LibraryStats, StatsState};
