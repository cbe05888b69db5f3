//! UF2 firmware container handling
//!
//! [UF2][0] is a block-structured container format used to ship firmware to
//! microcontrollers over mass-storage bootloaders. A UF2 file is a flat
//! concatenation of 512-byte blocks with no outer header; each block carries
//! a target flash address, sequencing metadata, a family ID naming the chip
//! it is meant for, and up to 476 payload bytes.
//!
//! This crate provides:
//!
//! - **Block parsing and building**: split a raw buffer into typed blocks and
//!   serialize them back, byte-for-byte ([`block`])
//! - **Multi-image merging**: combine blocks from several UF2 files targeting
//!   different families into one valid output file ([`merge`])
//! - **Family ID lookup**: human-readable names for well-known family IDs
//!   ([`family`])
//!
//! Parsing is deliberately lenient: a trailing partial block is discarded
//! rather than rejected, and no field values are validated on the merge path.
//! [`block::Uf2Block::validate`] exists for diagnostics only.
//!
//! [0]: https://github.com/microsoft/uf2

#![warn(missing_docs)]

pub mod block;
pub mod error;
pub mod family;
pub mod merge;

pub use block::{
    UF2_BLOCK_SIZE, UF2_FLAG_FAMILY_ID_PRESENT, UF2_FLAG_NOT_MAIN_FLASH, UF2_MAGIC_END,
    UF2_MAGIC_START0, UF2_MAGIC_START1, UF2_PAYLOAD_CAPACITY, Uf2Block, encode_blocks,
    parse_blocks,
};
pub use error::{Result, Uf2Error};
pub use family::family_name;
pub use merge::merge;
