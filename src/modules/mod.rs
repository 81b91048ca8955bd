//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the client and typed repository for the hosted table store.

pub mod gateway;
