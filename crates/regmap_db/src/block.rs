//! Blocks: reusable collections of register-set instances.

use crate::overrides::Override;
use crate::param::Parameter;
use crate::regset::RegisterSet;
use crate::value::ParamValue;
use regmap_common::Uuid;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_repeat() -> ParamValue {
    ParamValue::literal(1)
}

fn default_address_size() -> u64 {
    0x10000
}

/// One instantiation of a register set within a block.
///
/// `offset` is the byte offset of the instance within the block's address
/// space. `repeat` may be parameter-driven; repeated instances are spaced
/// by the referenced set's address space during flattening, while
/// `repeat_offset` is the declared replica spacing the guard checks
/// validate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterSetInstance {
    /// The unique identity of this instance (the scope key for
    /// register-set-level overrides).
    pub uuid: Uuid,
    /// The instance name.
    pub name: String,
    /// Identity of the instantiated register set.
    pub regset: Uuid,
    /// Byte offset within the owning block.
    #[serde(default)]
    pub offset: u64,
    /// Number of repetitions, possibly parameter-driven.
    #[serde(default = "default_repeat")]
    pub repeat: ParamValue,
    /// Declared spacing between repetitions in bytes.
    #[serde(default)]
    pub repeat_offset: u64,
    /// HDL hierarchy path of the instance.
    #[serde(default)]
    pub hdl_path: String,
}

impl RegisterSetInstance {
    /// Creates an instance of `regset` with a fresh identity.
    pub fn new(name: impl Into<String>, regset: Uuid, offset: u64) -> Self {
        Self {
            uuid: Uuid::generate(),
            name: name.into(),
            regset,
            offset,
            repeat: default_repeat(),
            repeat_offset: 0,
            hdl_path: String::new(),
        }
    }
}

/// A reusable collection of register-set instances with its own address
/// space.
///
/// A block owns its instance list and a mapping from register-set identity
/// to the shared [`RegisterSet`] definition (shared because the same set
/// can be instantiated multiple times and places). The block's override
/// list customizes parameters at specific register-set instances; it is
/// installed into the resolution context's register-set-scoped table at
/// load time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// The unique identity of this block.
    pub uuid: Uuid,
    /// The block name.
    pub name: String,
    /// The bytes of address space one instantiation of this block occupies.
    #[serde(default = "default_address_size")]
    pub address_size: u64,
    /// The register sets this block instantiates, keyed by identity.
    #[serde(default)]
    pub regsets: HashMap<Uuid, RegisterSet>,
    /// The register-set instances, in declaration order.
    #[serde(default)]
    pub regset_insts: Vec<RegisterSetInstance>,
    /// Parameters declared by this block.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Overrides scoped to this block's register-set instances.
    #[serde(default)]
    pub overrides: Vec<Override>,
}

impl Block {
    /// Creates an empty block with a fresh identity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::generate(),
            name: name.into(),
            address_size: default_address_size(),
            regsets: HashMap::new(),
            regset_insts: Vec::new(),
            parameters: Vec::new(),
            overrides: Vec::new(),
        }
    }

    /// Looks up the register set an instance refers to.
    pub fn regset_for(&self, inst: &RegisterSetInstance) -> Option<&RegisterSet> {
        self.regsets.get(&inst.regset)
    }

    /// Adds a register set and returns its identity.
    pub fn add_regset(&mut self, regset: RegisterSet) -> Uuid {
        let uuid = regset.uuid.clone();
        self.regsets.insert(uuid.clone(), regset);
        uuid
    }
}
