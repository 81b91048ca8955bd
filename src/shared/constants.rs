/// Prefix marking a comment that also sets the prompt's background color
pub const COLOR_DIRECTIVE_PREFIX: &str = "[color:";

/// Legacy favorite flag values
pub const RATING_FAVORITE: i32 = 1;
pub const RATING_NONE: i32 = 0;

/// Allowed star rating range
pub const MIN_STARS: i16 = 1;
pub const MAX_STARS: i16 = 5;

/// Dataset key for the shared category/prompt tree
pub const PROMPTS_DATASET: &str = "prompts";

// =============================================================================
// TABLE NAMES
// =============================================================================

pub const TABLE_CATEGORIES: &str = "categories";
pub const TABLE_PROMPTS: &str = "prompts";
pub const TABLE_COMMENTS: &str = "comments";
pub const TABLE_LINKS: &str = "links";
pub const TABLE_LYRICS: &str = "lyrics";
pub const TABLE_PROMPT_RATINGS: &str = "prompt_ratings";
