//! Topic-keyed publish/subscribe bus
//!
//! The bus carries canonical domain-event envelopes from the event bridge
//! to any number of concurrent subscribers, each with its own buffer so a
//! slow consumer never stalls a publisher.

pub mod topic;
pub mod topic_bus;

pub use topic::{Envelope, Topic};
pub use topic_bus::{Subscription, TopicBus};
