//! Owner registry
//!
//! Maps owner type tags to their per-type settings. Hosts register the
//! record types they make likeable; unregistered types fall back to the
//! registry default.

use std::collections::HashMap;

use likeable_common::{CascadeConfig, ConfigError};
use likeable_core::ReactionType;

use crate::likeable::Likeable;

/// Settings for one owner type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerSettings {
    /// Remove reactions and counters when an owner of this type is deleted
    pub remove_on_delete: bool,
}

impl Default for OwnerSettings {
    fn default() -> Self {
        Self {
            remove_on_delete: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OwnerRegistry {
    defaults: OwnerSettings,
    owners: HashMap<String, OwnerSettings>,
    cascade_types: Vec<ReactionType>,
}

impl OwnerRegistry {
    /// Registry with cascade enabled for every type, removing likes and dislikes
    pub fn new() -> Self {
        Self {
            defaults: OwnerSettings::default(),
            owners: HashMap::new(),
            cascade_types: vec![ReactionType::like(), ReactionType::dislike()],
        }
    }

    /// Build a registry from the cascade section of the configuration
    pub fn from_config(config: &CascadeConfig) -> Result<Self, ConfigError> {
        let mut registry = Self::new()
            .with_defaults(OwnerSettings {
                remove_on_delete: config.enabled,
            })
            .with_cascade_types(config.parsed_reaction_types()?);

        for owner_type in &config.keep_on_delete {
            registry = registry.register(
                owner_type.as_str(),
                OwnerSettings {
                    remove_on_delete: false,
                },
            );
        }
        Ok(registry)
    }

    /// Settings used for owner types that were never registered
    pub fn with_defaults(mut self, defaults: OwnerSettings) -> Self {
        self.defaults = defaults;
        self
    }

    /// Reaction types removed when an owner is deleted
    pub fn with_cascade_types(mut self, types: Vec<ReactionType>) -> Self {
        self.cascade_types = types;
        self
    }

    pub fn register(mut self, owner_type: impl Into<String>, settings: OwnerSettings) -> Self {
        self.owners.insert(owner_type.into(), settings);
        self
    }

    /// Register a record type using the settings it declares.
    ///
    /// An explicit `register` call for the same tag made earlier is
    /// overwritten.
    pub fn register_likeable<T: Likeable>(self) -> Self {
        self.register(
            T::OWNER_TYPE,
            OwnerSettings {
                remove_on_delete: T::REMOVE_LIKES_ON_DELETE,
            },
        )
    }

    pub fn is_registered(&self, owner_type: &str) -> bool {
        self.owners.contains_key(owner_type)
    }

    pub fn settings(&self, owner_type: &str) -> OwnerSettings {
        self.owners
            .get(owner_type)
            .copied()
            .unwrap_or(self.defaults)
    }

    /// Whether deleting an owner of this type removes its reactions
    pub fn removes_on_delete(&self, owner_type: &str) -> bool {
        self.settings(owner_type).remove_on_delete
    }

    /// Like `removes_on_delete`, for a known record type.
    ///
    /// A registered entry wins. Otherwise the type's declared flag applies,
    /// and a globally disabled cascade still keeps everything.
    pub fn removes_on_delete_for<T: Likeable>(&self) -> bool {
        match self.owners.get(T::OWNER_TYPE) {
            Some(settings) => settings.remove_on_delete,
            None => self.defaults.remove_on_delete && T::REMOVE_LIKES_ON_DELETE,
        }
    }

    pub fn cascade_types(&self) -> &[ReactionType] {
        &self.cascade_types
    }
}

impl Default for OwnerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
