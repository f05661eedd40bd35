//! Agent registry - single source of truth for agents and driver metadata

use crate::{Error, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// One driver's metadata, loaded from the embedded catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverSpec {
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
}

/// A registered agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    /// Unique, immutable name
    pub name: String,
    /// Driver type, always one of the catalog names
    pub driver: String,
    /// Opaque driver configuration
    #[serde(default)]
    pub config: HashMap<String, serde_json::Value>,
}

/// Domain events emitted by the agent registry
#[derive(Debug, Clone)]
pub enum AgentEvent {
    Created(Agent),
    Updated(Agent),
}

type AgentListener = Arc<dyn Fn(&AgentEvent) + Send + Sync>;

/// Registry of agents plus the catalog of available driver types.
///
/// Agents are kept in insertion order so query output is deterministic.
pub struct AgentRegistry {
    drivers: Vec<DriverSpec>,
    agents: RwLock<Vec<Agent>>,
    listeners: RwLock<Vec<AgentListener>>,
}

impl AgentRegistry {
    /// Create a registry with the built-in driver catalog
    pub fn new() -> Self {
        Self::with_drivers(Self::default_drivers())
    }

    /// Create a registry with a custom driver catalog
    pub fn with_drivers(drivers: Vec<DriverSpec>) -> Self {
        Self {
            drivers,
            agents: RwLock::new(Vec::new()),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Names of driver types that agents may be created with
    pub fn available_drivers(&self) -> Vec<String> {
        self.drivers.iter().map(|spec| spec.name.clone()).collect()
    }

    /// The full driver catalog
    pub fn driver_specs(&self) -> &[DriverSpec] {
        &self.drivers
    }

    /// All agents, in creation order
    pub fn all(&self) -> Vec<Agent> {
        self.agents.read().clone()
    }

    /// Look up an agent by name
    pub fn get(&self, name: &str) -> Option<Agent> {
        self.agents.read().iter().find(|a| a.name == name).cloned()
    }

    /// Create a new agent.
    ///
    /// Fails with a validation error on an empty or duplicate name, or a
    /// driver type absent from the catalog. Resolver-supplied config is
    /// merged over fixed defaults. Emits `AgentEvent::Created`.
    pub fn create(
        &self,
        name: &str,
        driver: &str,
        config: HashMap<String, serde_json::Value>,
    ) -> Result<Agent> {
        if name.is_empty() {
            return Err(Error::Validation("Agent name must not be empty".into()));
        }
        if !self.drivers.iter().any(|spec| spec.name == driver) {
            return Err(Error::Validation(format!(
                "Unknown driver type: {driver}"
            )));
        }

        let agent = {
            let mut agents = self.agents.write();
            if agents.iter().any(|a| a.name == name) {
                return Err(Error::Validation(format!(
                    "Agent already exists: {name}"
                )));
            }

            let mut merged: HashMap<String, serde_json::Value> = HashMap::from([
                ("description".into(), "Created via API".into()),
                ("creator".into(), false.into()),
                ("isolate".into(), false.into()),
            ]);
            merged.extend(config);

            let agent = Agent {
                name: name.to_string(),
                driver: driver.to_string(),
                config: merged,
            };
            agents.push(agent.clone());
            agent
        };

        info!(name, driver, "Agent created");
        self.emit(&AgentEvent::Created(agent.clone()));
        Ok(agent)
    }

    /// Merge a config patch into an existing agent. Emits `AgentEvent::Updated`.
    pub fn update_config(
        &self,
        name: &str,
        patch: HashMap<String, serde_json::Value>,
    ) -> Result<Agent> {
        let agent = {
            let mut agents = self.agents.write();
            let agent = agents
                .iter_mut()
                .find(|a| a.name == name)
                .ok_or_else(|| Error::NotFound(format!("Unknown agent: {name}")))?;
            agent.config.extend(patch);
            agent.clone()
        };

        self.emit(&AgentEvent::Updated(agent.clone()));
        Ok(agent)
    }

    /// Register a listener for agent domain events
    pub fn on_event(&self, listener: impl Fn(&AgentEvent) + Send + Sync + 'static) {
        self.listeners.write().push(Arc::new(listener));
    }

    fn emit(&self, event: &AgentEvent) {
        let listeners = self.listeners.read().clone();
        for listener in listeners {
            listener(event);
        }
    }

    fn default_drivers() -> Vec<DriverSpec> {
        let yaml = include_str!("drivers.yaml");
        serde_yaml::from_str(yaml).expect("embedded driver catalog must parse")
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_loads() {
        let registry = AgentRegistry::new();
        let drivers = registry.available_drivers();
        assert!(drivers.contains(&"echo".to_string()));
        assert!(drivers.contains(&"llm".to_string()));
    }

    #[test]
    fn test_create_merges_defaults_under_input() {
        let registry = AgentRegistry::new();
        let agent = registry
            .create(
                "a1",
                "echo",
                HashMap::from([("description".into(), "custom".into())]),
            )
            .unwrap();
        assert_eq!(agent.config["description"], "custom");
        assert_eq!(agent.config["creator"], false);
        assert_eq!(agent.config["isolate"], false);
    }

    #[test]
    fn test_create_rejects_duplicate_and_unknown_driver() {
        let registry = AgentRegistry::new();
        registry.create("a1", "echo", HashMap::new()).unwrap();

        assert!(matches!(
            registry.create("a1", "echo", HashMap::new()),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            registry.create("a2", "bogus", HashMap::new()),
            Err(Error::Validation(_))
        ));
        assert_eq!(registry.all().len(), 1);
    }

    #[test]
    fn test_events_fire_after_mutation() {
        let registry = Arc::new(AgentRegistry::new());
        let seen = Arc::new(RwLock::new(Vec::new()));

        let seen_inner = seen.clone();
        let registry_inner = registry.clone();
        registry.on_event(move |event| {
            if let AgentEvent::Created(agent) = event {
                // The listener must already see the agent in the registry.
                assert!(registry_inner.get(&agent.name).is_some());
                seen_inner.write().push(agent.name.clone());
            }
        });

        registry.create("a1", "echo", HashMap::new()).unwrap();
        assert_eq!(seen.read().as_slice(), ["a1"]);
    }

    #[test]
    fn test_update_config_unknown_agent() {
        let registry = AgentRegistry::new();
        assert!(matches!(
            registry.update_config("ghost", HashMap::new()),
            Err(Error::NotFound(_))
        ));
    }
}
