//! Register definitions within a register set.

use crate::field::BitField;
use crate::value::ParamValue;
use regmap_common::Uuid;
use serde::{Deserialize, Serialize};

fn default_width() -> u32 {
    32
}

fn default_dimension() -> ParamValue {
    ParamValue::literal(1)
}

/// A single register within a register set.
///
/// `address` is the byte offset from the start of the owning register set.
/// `token` is the identifier emitted into generated headers and defines
/// (lowercased in flattened address entries). `dimension` is the array
/// dimension and may be parameter-driven.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Register {
    /// The unique identity of this register.
    pub uuid: Uuid,
    /// The display name.
    pub name: String,
    /// The identifier used by code generators.
    pub token: String,
    /// Byte offset from the start of the owning register set.
    #[serde(default)]
    pub address: u64,
    /// Width in bits.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Array dimension, possibly parameter-driven.
    #[serde(default = "default_dimension")]
    pub dimension: ParamValue,
    /// The bit-fields of this register. May be empty.
    #[serde(default)]
    pub fields: Vec<BitField>,
    /// Free-form documentation.
    #[serde(default)]
    pub description: String,
}

impl Register {
    /// Creates a 32-bit register with a fresh identity and no fields.
    pub fn new(name: impl Into<String>, token: impl Into<String>, address: u64) -> Self {
        Self {
            uuid: Uuid::generate(),
            name: name.into(),
            token: token.into(),
            address,
            width: default_width(),
            dimension: default_dimension(),
            fields: Vec::new(),
            description: String::new(),
        }
    }

    /// The register width in bytes.
    pub fn width_in_bytes(&self) -> u64 {
        (self.width as u64) / 8
    }

    /// The fields sorted by ascending lsb.
    pub fn fields_sorted(&self) -> Vec<&BitField> {
        let mut fields: Vec<&BitField> = self.fields.iter().collect();
        fields.sort_by_key(|f| f.lsb);
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_in_bytes() {
        let mut reg = Register::new("Config", "CFG", 0x4);
        assert_eq!(reg.width_in_bytes(), 4);
        reg.width = 64;
        assert_eq!(reg.width_in_bytes(), 8);
        reg.width = 8;
        assert_eq!(reg.width_in_bytes(), 1);
    }

    #[test]
    fn fields_sorted_by_lsb() {
        let mut reg = Register::new("Status", "STAT", 0x0);
        reg.fields.push(BitField::new("high", 8));
        reg.fields.push(BitField::new("low", 0));
        reg.fields.push(BitField::new("mid", 4));
        let sorted = reg.fields_sorted();
        assert_eq!(sorted[0].name, "low");
        assert_eq!(sorted[1].name, "mid");
        assert_eq!(sorted[2].name, "high");
    }

    #[test]
    fn zero_fields_is_permitted() {
        let reg = Register::new("Spare", "SPARE", 0x10);
        assert!(reg.fields_sorted().is_empty());
    }

    #[test]
    fn serde_defaults() {
        let back: Register = serde_json::from_str(
            r#"{"uuid":"r1","name":"Config","token":"CFG","address":4}"#,
        )
        .unwrap();
        assert_eq!(back.width, 32);
        assert_eq!(back.dimension, ParamValue::literal(1));
        assert!(back.fields.is_empty());
    }
}
