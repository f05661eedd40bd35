//! Canonical-state registries
//!
//! Each registry is the sole owner and writer of its entity kind. Mutations
//! are serialized behind the registry's own lock, and the matching domain
//! event is emitted synchronously after the state change completes, so any
//! listener notified can already observe the mutation.

pub mod agents;
pub mod comms;
pub mod groups;

pub use agents::{Agent, AgentEvent, AgentRegistry, DriverSpec};
pub use comms::{CommsLog, Message, MessageEvent};
pub use groups::{Group, GroupEvent, GroupRegistry};
