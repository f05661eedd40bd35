//! Platform context - the explicitly constructed object graph
//!
//! Replaces ambient global state: the bus is created here, handed to the
//! bridge, and lives exactly as long as the platform.

use crate::bridge::EventBridge;
use crate::bus::TopicBus;
use crate::config::schema::Config;
use crate::registry::{AgentRegistry, CommsLog, GroupRegistry};
use std::sync::Arc;

/// The wired-up platform: bus, registries, and the attached event bridge.
pub struct Platform {
    pub bus: TopicBus,
    pub agents: Arc<AgentRegistry>,
    pub groups: Arc<GroupRegistry>,
    pub comms: Arc<CommsLog>,
}

impl Platform {
    /// Build a platform with empty registries and the bridge attached
    pub fn new() -> Self {
        let bus = TopicBus::new();
        let agents = Arc::new(AgentRegistry::new());
        let groups = Arc::new(GroupRegistry::new());
        let comms = Arc::new(CommsLog::new());

        EventBridge::attach(&bus, &agents, &groups, &comms);

        Self {
            bus,
            agents,
            groups,
            comms,
        }
    }

    /// Build a platform and seed it from configuration
    pub fn from_config(config: &Config) -> Self {
        let platform = Self::new();
        platform.groups.seed(&config.groups);
        platform
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::Topic;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_seeded_groups_flow_through_bridge() {
        let mut config = Config::default();
        config
            .groups
            .insert("ops".to_string(), vec!["a1".to_string()]);

        // Subscribers attached after construction see nothing (no replay),
        // but the groups are queryable.
        let platform = Platform::from_config(&config);
        let mut sub = platform.bus.subscribe(Topic::GroupCreated);
        assert!(sub.try_recv().is_none());
        assert_eq!(platform.groups.all().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_config_seeds_nothing() {
        let platform = Platform::from_config(&Config::default());
        assert!(platform.groups.all().is_empty());
        assert!(platform.agents.all().is_empty());
        assert!(platform.comms.all().is_empty());
    }

    #[test]
    fn test_config_groups_are_ordered() {
        let mut groups = BTreeMap::new();
        groups.insert("zeta".to_string(), vec![]);
        groups.insert("alpha".to_string(), vec![]);

        let mut config = Config::default();
        config.groups = groups;

        let platform = Platform::from_config(&config);
        let names: Vec<String> = platform.groups.all().iter().map(|g| g.name.clone()).collect();
        assert_eq!(names, ["alpha", "zeta"]);
    }
}
