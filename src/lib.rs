//! Data-access and client-state layer for a prompt library backed by a
//! hosted table store.

pub mod core;
pub mod features;
pub mod modules;
pub mod shared;
