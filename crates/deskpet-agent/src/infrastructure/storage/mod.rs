//! Persistence infrastructure.

pub mod config;
