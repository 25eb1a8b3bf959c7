//! Command implementations.

pub mod chat;
pub mod config;
pub mod context;
pub mod skills;
