//! Bit-field definitions within a register.

use crate::value::ParamValue;
use regmap_common::Uuid;
use serde::{Deserialize, Serialize};

/// The software access behavior of a bit-field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Read/write.
    #[default]
    ReadWrite,
    /// Read-only.
    ReadOnly,
    /// Write-only.
    WriteOnly,
    /// Write 1 to clear a bit, write 0 for no effect.
    Write1ToClear,
    /// Write 1 to set a bit, write 0 for no effect.
    Write1ToSet,
}

impl FieldType {
    /// Returns `true` if software reads return the field value.
    pub fn is_readable(self) -> bool {
        !matches!(self, FieldType::WriteOnly)
    }

    /// Returns `true` if software writes can change the field value.
    pub fn is_writable(self) -> bool {
        !matches!(self, FieldType::ReadOnly)
    }
}

/// A contiguous run of bits within a register.
///
/// The most-significant bit and the reset value may both be
/// parameter-driven; the least-significant bit is always fixed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitField {
    /// The unique identity of this field.
    pub uuid: Uuid,
    /// The field name.
    pub name: String,
    /// The least-significant bit position.
    #[serde(default)]
    pub lsb: u32,
    /// The most-significant bit position (inclusive), possibly
    /// parameter-driven.
    pub msb: ParamValue,
    /// The access behavior.
    #[serde(default)]
    pub field_type: FieldType,
    /// The value after reset, possibly parameter-driven.
    #[serde(default)]
    pub reset: ParamValue,
    /// Free-form documentation.
    #[serde(default)]
    pub description: String,
}

impl BitField {
    /// Creates a single-bit read/write field at `lsb` with a fresh identity.
    pub fn new(name: impl Into<String>, lsb: u32) -> Self {
        Self {
            uuid: Uuid::generate(),
            name: name.into(),
            lsb,
            msb: ParamValue::literal(lsb as u64),
            field_type: FieldType::default(),
            reset: ParamValue::default(),
            description: String::new(),
        }
    }

    /// The field width in bits, for a resolved msb.
    pub fn width(&self, msb: u64) -> u64 {
        msb.saturating_sub(self.lsb as u64) + 1
    }

    /// A mask of the bits of this field, for a resolved msb.
    pub fn mask(&self, msb: u64) -> u64 {
        let width = self.width(msb);
        if width >= 64 {
            u64::MAX
        } else {
            ((1u64 << width) - 1) << self.lsb
        }
    }
}
