//! Read-only resolvers: agents, drivers, groups, history

use crate::platform::Platform;
use crate::registry::{Agent, Group, Message};
use serde::Serialize;
use std::collections::HashSet;
use tracing::trace;

/// A driver type currently in use by at least one agent
#[derive(Debug, Clone, Serialize)]
pub struct Driver {
    #[serde(rename = "type")]
    pub kind: String,
}

/// All registered agents, in creation order
pub fn agents(platform: &Platform) -> Vec<Agent> {
    trace!("Received request for agents");
    platform.agents.all()
}

/// Driver types currently in use, deduplicated by first appearance.
///
/// An explicit ordered dedupe-by-key pass rather than a set, so the output
/// order is deterministic.
pub fn drivers(platform: &Platform) -> Vec<Driver> {
    trace!("Received request for drivers");
    let mut seen = HashSet::new();
    platform
        .agents
        .all()
        .into_iter()
        .filter(|agent| seen.insert(agent.driver.clone()))
        .map(|agent| Driver { kind: agent.driver })
        .collect()
}

/// All groups, in creation order
pub fn groups(platform: &Platform) -> Vec<Group> {
    trace!("Received request for groups");
    platform.groups.all()
}

/// Message history, merged and ordered.
///
/// With no `target` the full log is returned. With only `target`, the
/// argument is matched against both sides of every message: the union of
/// messages sent by or addressed to it. With both arguments, sent-by
/// `source` is unioned with addressed-to `target`. The union is
/// deduplicated by id and sorted by `(timestamp, id)` ascending; the result
/// is an owned snapshot.
pub fn history(platform: &Platform, source: Option<&str>, target: Option<&str>) -> Vec<Message> {
    trace!(?source, ?target, "Received request for history");
    let Some(target) = target else {
        return platform.comms.all();
    };

    let source = source.unwrap_or(target);
    merge_history(
        platform.comms.by_source(source),
        platform.comms.by_target(target),
    )
}

/// Union two history slices, dedupe by id, sort by `(timestamp, id)`.
fn merge_history(sent: Vec<Message>, received: Vec<Message>) -> Vec<Message> {
    let mut seen = HashSet::new();
    let mut merged: Vec<Message> = sent
        .into_iter()
        .chain(received)
        .filter(|m| seen.insert(m.id))
        .collect();
    merged.sort_by_key(|m| (m.timestamp, m.id));
    merged
}
