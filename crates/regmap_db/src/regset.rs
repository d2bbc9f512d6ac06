//! Register sets: reusable collections of registers with a port
//! configuration.

use crate::param::Parameter;
use crate::register::Register;
use regmap_common::Uuid;
use serde::{Deserialize, Serialize};

fn default_address_bus_width() -> u32 {
    12
}

fn default_data_bus_width() -> u32 {
    32
}

/// The bus configuration of a register set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSpec {
    /// Width of the address bus in bits; the set occupies
    /// `1 << address_bus_width` bytes.
    #[serde(default = "default_address_bus_width")]
    pub address_bus_width: u32,
    /// Width of the data bus in bits.
    #[serde(default = "default_data_bus_width")]
    pub data_bus_width: u32,
}

impl PortSpec {
    /// The number of bytes the register set's address space occupies.
    pub fn address_size(&self) -> u64 {
        1u64 << self.address_bus_width
    }
}

impl Default for PortSpec {
    fn default() -> Self {
        Self {
            address_bus_width: default_address_bus_width(),
            data_bus_width: default_data_bus_width(),
        }
    }
}

/// A reusable collection of registers.
///
/// The same register set can be instantiated multiple times, in one or more
/// blocks; each instantiation is a
/// [`RegisterSetInstance`](crate::RegisterSetInstance). Parameters declared
/// here are registered into the resolution context by the owning project at
/// load time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterSet {
    /// The unique identity of this register set.
    pub uuid: Uuid,
    /// The set name.
    pub name: String,
    /// Bus configuration.
    #[serde(default)]
    pub ports: PortSpec,
    /// Parameters declared by this set.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// The registers of this set.
    #[serde(default)]
    pub registers: Vec<Register>,
}

impl RegisterSet {
    /// Creates an empty register set with a fresh identity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::generate(),
            name: name.into(),
            ports: PortSpec::default(),
            parameters: Vec::new(),
            registers: Vec::new(),
        }
    }

    /// The registers in ascending address order.
    pub fn registers_by_address(&self) -> Vec<&Register> {
        let mut regs: Vec<&Register> = self.registers.iter().collect();
        regs.sort_by_key(|r| r.address);
        regs
    }

    /// Looks up a register by identity.
    pub fn find_register(&self, uuid: &Uuid) -> Option<&Register> {
        self.registers.iter().find(|r| &r.uuid == uuid)
    }
}
