//! Parameter definitions: named, ranged, defaulted design-time constants.

use regmap_common::Uuid;
use serde::{Deserialize, Serialize};

fn default_max() -> u64 {
    0xFFFF_FFFF
}

/// A named design-time constant that can be referenced instead of a literal
/// wherever an address, repeat count, or reset value is needed.
///
/// A parameter carries a default value and a closed range
/// `[min_val, max_val]`. The range is advisory: values outside it are
/// reported as warnings by the guard checks, never rejected at
/// construction or load time, so a half-edited project still loads.
///
/// A parameter becomes resolvable when its owning container registers it
/// into a [`ParameterRegistry`](crate::ParameterRegistry); construction
/// itself has no side effects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// The unique identity of this parameter.
    pub uuid: Uuid,
    /// The display name (used by generators when emitting symbolic text).
    pub name: String,
    /// The default value, used when no override applies.
    #[serde(default)]
    pub default: u64,
    /// The lower bound of the advisory range.
    #[serde(default)]
    pub min_val: u64,
    /// The upper bound of the advisory range.
    #[serde(default = "default_max")]
    pub max_val: u64,
}

impl Parameter {
    /// Creates a parameter with a fresh identity.
    pub fn new(name: impl Into<String>, default: u64, min_val: u64, max_val: u64) -> Self {
        Self {
            uuid: Uuid::generate(),
            name: name.into(),
            default,
            min_val,
            max_val,
        }
    }

    /// Returns `true` if `value` lies within `[min_val, max_val]`.
    pub fn in_range(&self, value: u64) -> bool {
        self.min_val <= value && value <= self.max_val
    }
}

impl Default for Parameter {
    fn default() -> Self {
        Self {
            uuid: Uuid::default(),
            name: String::new(),
            default: 1,
            min_val: 0,
            max_val: default_max(),
        }
    }
}
