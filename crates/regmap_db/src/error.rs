//! Error types for loading and validating register database files.

use regmap_common::Uuid;

/// Errors that can occur when loading or saving a project file.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// An I/O error occurred while reading or writing the file.
    #[error("failed to read project file: {0}")]
    Io(#[from] std::io::Error),

    /// The JSON content could not be parsed.
    #[error("failed to parse project file: {0}")]
    Parse(#[from] serde_json::Error),

    /// A block instance refers to a block identity that does not exist.
    #[error("block instance '{inst}' refers to unknown block '{block}'")]
    UnknownBlock {
        /// Name of the referring instance.
        inst: String,
        /// The missing block identity.
        block: Uuid,
    },

    /// A register-set instance refers to a register set that does not exist.
    #[error("register set instance '{inst}' refers to unknown register set '{regset}'")]
    UnknownRegisterSet {
        /// Name of the referring instance.
        inst: String,
        /// The missing register set identity.
        regset: Uuid,
    },
}
