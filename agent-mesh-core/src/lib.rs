//! Core types and logic for agent-mesh
//!
//! This crate owns the topic bus, the domain registries, the event bridge
//! that maps registry events onto bus topics, and the query/mutation
//! resolvers built on top of them.

pub mod bridge;
pub mod bus;
pub mod config;
pub mod error;
pub mod logging;
pub mod platform;
pub mod registry;
pub mod resolver;

pub use error::{Error, Result};
pub use platform::Platform;
