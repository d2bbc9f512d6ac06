//! Identity-keyed lookup of parameter definitions.

use crate::param::Parameter;
use regmap_common::Uuid;
use std::collections::HashMap;

/// Identity-keyed lookup from parameter identity to [`Parameter`].
///
/// Any part of the entity graph can reference a parameter by identity
/// rather than by containment; the registry is what makes such references
/// resolvable. It is owned by a
/// [`ResolutionContext`](crate::ResolutionContext) — there is no
/// process-wide instance — and is populated by
/// [`Project::build_context`](crate::Project::build_context) after load.
///
/// `register` is insert-or-overwrite (last writer wins), which is what
/// makes rebuilding the registry for a reloaded project safe without an
/// explicit unregister pass.
#[derive(Debug, Default)]
pub struct ParameterRegistry {
    map: HashMap<Uuid, Parameter>,
}

impl ParameterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Inserts or overwrites the mapping for `param.uuid`.
    pub fn register(&mut self, param: Parameter) {
        self.map.insert(param.uuid.clone(), param);
    }

    /// Removes the mapping for `uuid` if present; no-op otherwise.
    pub fn unregister(&mut self, uuid: &Uuid) {
        self.map.remove(uuid);
    }

    /// Looks up a parameter by identity.
    pub fn find(&self, uuid: &Uuid) -> Option<&Parameter> {
        self.map.get(uuid)
    }

    /// Empties the registry. Called at the project-open boundary when a
    /// context is reused across loads.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns the number of registered parameters.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if no parameters are registered.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates over all registered parameters in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.map.values()
    }
}
