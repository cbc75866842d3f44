//! Integration test utilities for likeable
//!
//! This crate provides fixtures and helpers for running the service
//! against the in-memory store and, when available, PostgreSQL.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
