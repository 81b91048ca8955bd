mod link;

pub use link::Link;
