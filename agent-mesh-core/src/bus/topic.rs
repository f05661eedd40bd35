//! Topic names and the envelope type moving through the bus

use serde::ser::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The fixed set of bus topics, one per domain-event kind.
///
/// Wire names are part of the external contract and must stay bit-exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    MessageCreated,
    MessageUpdated,
    GroupCreated,
    GroupUpdated,
    AgentCreated,
    AgentUpdated,
}

impl Topic {
    /// Every topic, in table order
    pub const ALL: [Topic; 6] = [
        Topic::MessageCreated,
        Topic::MessageUpdated,
        Topic::GroupCreated,
        Topic::GroupUpdated,
        Topic::AgentCreated,
        Topic::AgentUpdated,
    ];

    /// The wire name used by subscribers and the external surface
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::MessageCreated => "MESSAGE_SENT",
            Topic::MessageUpdated => "MESSAGE_UPDATED",
            Topic::GroupCreated => "GROUP_CREATED",
            Topic::GroupUpdated => "GROUP_UPDATED",
            Topic::AgentCreated => "AGENT_CREATED",
            Topic::AgentUpdated => "AGENT_UPDATED",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| crate::Error::NotFound(format!("Unknown topic: {s}")))
    }
}

impl Serialize for Topic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A (topic, payload) pair moving through the bus.
///
/// The payload is always a plain-data copy of the entity, never a live
/// domain object.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Envelope {
    pub topic: Topic,
    pub payload: serde_json::Value,
}

impl Envelope {
    pub fn new(topic: Topic, payload: serde_json::Value) -> Self {
        Self { topic, payload }
    }
}
