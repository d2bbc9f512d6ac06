//! Per-instance parameter overrides and the scoped lookup tables.

use crate::value::ParamValue;
use regmap_common::Uuid;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A persisted override record: at instance `path`, parameter `parameter`
/// takes `value` instead of its default.
///
/// `path` names either a register-set instance (when the record lives in a
/// [`Block`](crate::Block)'s override list) or a block instance (when it
/// lives in the [`Project`](crate::Project)'s). The override value may
/// itself be a parameter reference, which defers resolution one scope
/// outward.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Override {
    /// Identity of the instance the override applies at.
    pub path: Uuid,
    /// Identity of the parameter being overridden.
    pub parameter: Uuid,
    /// The replacement value.
    pub value: ParamValue,
}

/// The two scoped override indexes consulted during resolution.
///
/// One table is keyed by register-set instance identity, the other by
/// block instance identity; resolution precedence differs by level (the
/// innermost scope wins). The tables are a derived index: they are rebuilt
/// from the owning containers' override lists by
/// [`Project::build_context`](crate::Project::build_context), and the only
/// removal primitive is [`clear`](Self::clear).
#[derive(Debug, Default)]
pub struct OverrideTables {
    regset: HashMap<Uuid, HashMap<Uuid, ParamValue>>,
    block: HashMap<Uuid, HashMap<Uuid, ParamValue>>,
}

impl OverrideTables {
    /// Creates empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (insert-or-merge) an override scoped to a register-set instance.
    pub fn add_regset_override(&mut self, reginst: Uuid, param: Uuid, value: ParamValue) {
        self.regset.entry(reginst).or_default().insert(param, value);
    }

    /// Adds (insert-or-merge) an override scoped to a block instance.
    pub fn add_blockinst_override(&mut self, blkinst: Uuid, param: Uuid, value: ParamValue) {
        self.block.entry(blkinst).or_default().insert(param, value);
    }

    /// Looks up the register-set-scoped override for `(reginst, param)`.
    pub fn regset_override(&self, reginst: &Uuid, param: &Uuid) -> Option<&ParamValue> {
        self.regset.get(reginst).and_then(|m| m.get(param))
    }

    /// Looks up the block-scoped override for `(blkinst, param)`.
    pub fn block_override(&self, blkinst: &Uuid, param: &Uuid) -> Option<&ParamValue> {
        self.block.get(blkinst).and_then(|m| m.get(param))
    }

    /// Empties both tables.
    ///
    /// Must be invoked at the project-open boundary when the tables are
    /// reused across loads; stale overrides from a previously opened
    /// project must not leak into resolution for the next one.
    pub fn clear(&mut self) {
        self.regset.clear();
        self.block.clear();
    }

    /// Returns `true` if neither table has any entries.
    pub fn is_empty(&self) -> bool {
        self.regset.is_empty() && self.block.is_empty()
    }
}
