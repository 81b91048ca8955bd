//! Local state: the in-memory prompt library and the operations that
//! write remotely and then reconcile it.

pub mod loader;
pub mod state;
pub mod store;

pub use loader::{LibraryLoader, LoadSummary};
pub use state::{CommentOutcome, CommentState, RateOutcome, RatingState, StatsState};
pub use store::{PromptStore, SharedStore};
