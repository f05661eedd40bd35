//! Mutation resolvers: sendMessage, createGroup, createAgent

use crate::platform::Platform;
use crate::registry::{Agent, Message};
use crate::{Error, Result};
use std::collections::HashMap;
use tracing::trace;

/// Sentinel identity for an unauthenticated human caller
pub const DEFAULT_SOURCE: &str = "user";

/// Create a message and broadcast it.
///
/// By the time this returns, the log change and the listener chain have
/// both completed, so any subscriber attached beforehand already holds the
/// envelope in its buffer.
pub fn send_message(
    platform: &Platform,
    target: &str,
    source: Option<&str>,
    content: &str,
) -> Result<Message> {
    trace!(target, ?source, "Received message");
    if target.is_empty() {
        return Err(Error::Validation("Message target must not be empty".into()));
    }
    if content.is_empty() {
        return Err(Error::Validation("Message content must not be empty".into()));
    }

    let message = platform
        .comms
        .create_message(target, source.unwrap_or(DEFAULT_SOURCE), content);
    platform.comms.emit(&message);
    Ok(message)
}

/// Create a group, empty or seeded. The registry's own created event is
/// what feeds the bus; nothing is published from here.
pub fn create_group(platform: &Platform, name: &str, members: Vec<String>) -> Result<String> {
    trace!(name, "Received request to add group");
    let group = platform.groups.create(name, members)?;
    Ok(group.name)
}

/// Create an agent with the given driver type and config overrides.
pub fn create_agent(
    platform: &Platform,
    name: &str,
    driver: &str,
    config: HashMap<String, serde_json::Value>,
) -> Result<Agent> {
    trace!(name, driver, "Received request to add agent");
    platform.agents.create(name, driver, config)
}
