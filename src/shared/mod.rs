pub mod constants;
pub mod notifications;
pub mod test_helpers;
pub mod types;
pub mod validation;
