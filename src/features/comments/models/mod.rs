mod comment;

pub use comment::{ColorDirective, Comment};
