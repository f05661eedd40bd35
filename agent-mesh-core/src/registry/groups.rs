//! Group registry

use crate::{Error, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// A named group of agents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    /// Member agent names, in the order they were added
    pub members: Vec<String>,
}

/// Domain events emitted by the group registry
#[derive(Debug, Clone)]
pub enum GroupEvent {
    Created(Group),
    Updated(Group),
}

type GroupListener = Arc<dyn Fn(&GroupEvent) + Send + Sync>;

/// Registry of groups, kept in creation order.
pub struct GroupRegistry {
    groups: RwLock<Vec<Group>>,
    listeners: RwLock<Vec<GroupListener>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self {
            groups: RwLock::new(Vec::new()),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// All groups, in creation order
    pub fn all(&self) -> Vec<Group> {
        self.groups.read().clone()
    }

    /// Look up a group by name
    pub fn get(&self, name: &str) -> Option<Group> {
        self.groups.read().iter().find(|g| g.name == name).cloned()
    }

    /// Create a group, empty or seeded with members.
    ///
    /// Fails with a conflict error on a duplicate name. Emits
    /// `GroupEvent::Created`.
    pub fn create(&self, name: &str, members: Vec<String>) -> Result<Group> {
        if name.is_empty() {
            return Err(Error::Validation("Group name must not be empty".into()));
        }

        let group = {
            let mut groups = self.groups.write();
            if groups.iter().any(|g| g.name == name) {
                return Err(Error::Conflict(format!("Group already exists: {name}")));
            }
            let group = Group {
                name: name.to_string(),
                members,
            };
            groups.push(group.clone());
            group
        };

        info!(name, "Group created");
        self.emit(&GroupEvent::Created(group.clone()));
        Ok(group)
    }

    /// Replace a group's member list. Emits `GroupEvent::Updated`.
    pub fn update(&self, name: &str, members: Vec<String>) -> Result<Group> {
        let group = {
            let mut groups = self.groups.write();
            let group = groups
                .iter_mut()
                .find(|g| g.name == name)
                .ok_or_else(|| Error::NotFound(format!("Unknown group: {name}")))?;
            group.members = members;
            group.clone()
        };

        self.emit(&GroupEvent::Updated(group.clone()));
        Ok(group)
    }

    /// Seed groups from configuration at startup. Existing names are
    /// skipped; each seeded group emits its created event normally.
    pub fn seed(&self, groups: &BTreeMap<String, Vec<String>>) {
        for (name, members) in groups {
            match self.create(name, members.clone()) {
                Ok(_) => {}
                Err(Error::Conflict(_)) => {}
                Err(e) => tracing::warn!(name = %name, error = %e, "Failed to seed group"),
            }
        }
    }

    /// Register a listener for group domain events
    pub fn on_event(&self, listener: impl Fn(&GroupEvent) + Send + Sync + 'static) {
        self.listeners.write().push(Arc::new(listener));
    }

    fn emit(&self, event: &GroupEvent) {
        let listeners = self.listeners.read().clone();
        for listener in listeners {
            listener(event);
        }
    }
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self::new()
    }
}
