//! Error types for UF2 block validation

use thiserror::Error;

/// Result type for UF2 operations
pub type Result<T> = std::result::Result<T, Uf2Error>;

/// UF2 error types
///
/// Only [`crate::block::Uf2Block::validate`] and
/// [`crate::block::Uf2Block::new`] produce these; the parse and merge paths
/// are infallible by design.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Uf2Error {
    /// First magic number at offset 0 does not match "UF2\n"
    #[error("Invalid first magic: expected 0x0A324655, got {0:#010x}")]
    InvalidMagicStart0(u32),

    /// Second magic number at offset 4 does not match
    #[error("Invalid second magic: expected 0x9E5D5157, got {0:#010x}")]
    InvalidMagicStart1(u32),

    /// Final magic number at offset 508 does not match
    #[error("Invalid end magic: expected 0x0AB16F30, got {0:#010x}")]
    InvalidMagicEnd(u32),

    /// Declared payload size exceeds the 476-byte data area
    #[error("Payload size {0} exceeds the 476-byte block data area")]
    PayloadTooLarge(u32),
}
