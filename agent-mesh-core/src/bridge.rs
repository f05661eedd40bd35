//! Event bridge - maps registry domain events onto bus topics
//!
//! One listener is attached per registry at startup. Each listener does
//! exactly one thing: serialize the event's entity to a plain JSON value
//! and publish it on the topic the static table below assigns to that
//! event kind. Republish order matches emission order per registry.

use crate::bus::{Topic, TopicBus};
use crate::registry::{
    AgentEvent, AgentRegistry, CommsLog, GroupEvent, GroupRegistry, MessageEvent,
};
use serde::Serialize;
use tracing::warn;

/// Attaches the registry-to-bus listeners. The bridge itself holds no
/// state; the registries own the listener registrations for their lifetime.
pub struct EventBridge;

impl EventBridge {
    pub fn attach(
        bus: &TopicBus,
        agents: &AgentRegistry,
        groups: &GroupRegistry,
        comms: &CommsLog,
    ) {
        let agent_bus = bus.clone();
        agents.on_event(move |event| {
            let (topic, entity) = match event {
                AgentEvent::Created(agent) => (Topic::AgentCreated, agent),
                AgentEvent::Updated(agent) => (Topic::AgentUpdated, agent),
            };
            republish(&agent_bus, topic, entity);
        });

        let group_bus = bus.clone();
        groups.on_event(move |event| {
            let (topic, entity) = match event {
                GroupEvent::Created(group) => (Topic::GroupCreated, group),
                GroupEvent::Updated(group) => (Topic::GroupUpdated, group),
            };
            republish(&group_bus, topic, entity);
        });

        let comms_bus = bus.clone();
        comms.on_event(move |event| {
            let (topic, entity) = match event {
                MessageEvent::Created(message) => (Topic::MessageCreated, message),
                MessageEvent::Updated(message) => (Topic::MessageUpdated, message),
            };
            republish(&comms_bus, topic, entity);
        });
    }
}

/// Serialize the entity and publish it once. A serialization failure drops
/// that single event; the listener stays attached for the next one.
fn republish<T: Serialize>(bus: &TopicBus, topic: Topic, entity: &T) {
    match serde_json::to_value(entity) {
        Ok(payload) => bus.publish(topic, payload),
        Err(e) => warn!(topic = %topic, error = %e, "Dropping event, payload failed to serialize"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn wired() -> (TopicBus, AgentRegistry, GroupRegistry, CommsLog) {
        let bus = TopicBus::new();
        let agents = AgentRegistry::new();
        let groups = GroupRegistry::new();
        let comms = CommsLog::new();
        EventBridge::attach(&bus, &agents, &groups, &comms);
        (bus, agents, groups, comms)
    }

    #[tokio::test]
    async fn test_agent_events_reach_their_topics() {
        let (bus, agents, _, _) = wired();
        let mut created = bus.subscribe(Topic::AgentCreated);
        let mut updated = bus.subscribe(Topic::AgentUpdated);

        agents.create("a1", "echo", HashMap::new()).unwrap();
        agents
            .update_config("a1", HashMap::from([("k".into(), "v".into())]))
            .unwrap();

        assert_eq!(created.try_recv().unwrap().payload["name"], "a1");
        assert_eq!(updated.try_recv().unwrap().payload["config"]["k"], "v");
    }

    #[tokio::test]
    async fn test_group_events_reach_their_topics() {
        let (bus, _, groups, _) = wired();
        let mut created = bus.subscribe(Topic::GroupCreated);
        let mut updated = bus.subscribe(Topic::GroupUpdated);

        groups.create("ops", vec![]).unwrap();
        groups.update("ops", vec!["a1".into()]).unwrap();

        assert_eq!(created.try_recv().unwrap().payload["name"], "ops");
        let envelope = updated.try_recv().unwrap();
        assert_eq!(envelope.payload["members"][0], "a1");
    }

    #[tokio::test]
    async fn test_message_events_reach_their_topics() {
        let (bus, _, _, comms) = wired();
        let mut created = bus.subscribe(Topic::MessageCreated);
        let mut updated = bus.subscribe(Topic::MessageUpdated);

        let msg = comms.create_message("bob", "alice", "hi");
        assert!(created.try_recv().is_none(), "create alone must not publish");

        comms.emit(&msg);
        let envelope = created.try_recv().unwrap();
        assert_eq!(envelope.payload["id"], 1);
        assert_eq!(envelope.payload["content"], "hi");

        comms.update_message(msg.id, "edited").unwrap();
        assert_eq!(updated.try_recv().unwrap().payload["content"], "edited");
    }

    #[tokio::test]
    async fn test_rejected_mutation_publishes_nothing() {
        let (bus, _, groups, _) = wired();
        let mut created = bus.subscribe(Topic::GroupCreated);

        groups.create("ops", vec![]).unwrap();
        assert!(groups.create("ops", vec![]).is_err());

        assert!(created.try_recv().is_some());
        assert!(created.try_recv().is_none(), "conflict must not publish");
    }
}
