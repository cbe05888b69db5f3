//! UF2 block parsing and serialization
//!
//! A UF2 file is a flat sequence of 512-byte blocks with no outer header.
//! Every integer field is a little-endian `u32` at a fixed byte offset.

use byteorder::{ByteOrder, LittleEndian};

use crate::{Result, Uf2Error};

/// Size of a single UF2 block in bytes.
pub const UF2_BLOCK_SIZE: usize = 512;

/// Maximum number of payload bytes a block's data area can hold.
pub const UF2_PAYLOAD_CAPACITY: usize = 476;

/// First magic number, "UF2\n" in ASCII, at offset 0.
pub const UF2_MAGIC_START0: u32 = 0x0A32_4655;

/// Second magic number at offset 4.
pub const UF2_MAGIC_START1: u32 = 0x9E5D_5157;

/// Final magic number at offset 508.
pub const UF2_MAGIC_END: u32 = 0x0AB1_6F30;

/// Flag bit: the field at offset 28 holds a family ID, not a file size.
pub const UF2_FLAG_FAMILY_ID_PRESENT: u32 = 0x0000_2000;

/// Flag bit: the block carries data that must not be written to flash.
pub const UF2_FLAG_NOT_MAIN_FLASH: u32 = 0x0000_0001;

// Field offsets within a block
const OFFSET_MAGIC_START0: usize = 0;
const OFFSET_MAGIC_START1: usize = 4;
const OFFSET_FLAGS: usize = 8;
const OFFSET_TARGET_ADDRESS: usize = 12;
const OFFSET_PAYLOAD_SIZE: usize = 16;
const OFFSET_BLOCK_NO: usize = 20;
const OFFSET_NUM_BLOCKS: usize = 24;
const OFFSET_FAMILY_ID: usize = 28;
const OFFSET_PAYLOAD: usize = 32;
const OFFSET_MAGIC_END: usize = 508;

/// A single 512-byte UF2 block.
///
/// The block owns its raw bytes. Accessors decode fields in place; the only
/// mutators are [`set_block_no`](Self::set_block_no) and
/// [`set_num_blocks`](Self::set_num_blocks), so every other byte of a parsed
/// block survives a rebuild bit-identically.
#[derive(Clone, PartialEq, Eq)]
pub struct Uf2Block {
    raw: [u8; UF2_BLOCK_SIZE],
}

impl Uf2Block {
    /// Create a block from raw bytes, without validation.
    pub fn from_bytes(raw: [u8; UF2_BLOCK_SIZE]) -> Self {
        Self { raw }
    }

    /// Build a new well-formed block for the given address and family.
    ///
    /// Sets all three magic numbers and the `familyID present` flag. Fails
    /// if `payload` does not fit the 476-byte data area.
    pub fn new(target_address: u32, family_id: u32, payload: &[u8]) -> Result<Self> {
        if payload.len() > UF2_PAYLOAD_CAPACITY {
            return Err(Uf2Error::PayloadTooLarge(payload.len() as u32));
        }

        let mut raw = [0u8; UF2_BLOCK_SIZE];
        LittleEndian::write_u32(&mut raw[OFFSET_MAGIC_START0..], UF2_MAGIC_START0);
        LittleEndian::write_u32(&mut raw[OFFSET_MAGIC_START1..], UF2_MAGIC_START1);
        LittleEndian::write_u32(&mut raw[OFFSET_FLAGS..], UF2_FLAG_FAMILY_ID_PRESENT);
        LittleEndian::write_u32(&mut raw[OFFSET_TARGET_ADDRESS..], target_address);
        LittleEndian::write_u32(&mut raw[OFFSET_PAYLOAD_SIZE..], payload.len() as u32);
        LittleEndian::write_u32(&mut raw[OFFSET_FAMILY_ID..], family_id);
        LittleEndian::write_u32(&mut raw[OFFSET_MAGIC_END..], UF2_MAGIC_END);
        raw[OFFSET_PAYLOAD..OFFSET_PAYLOAD + payload.len()].copy_from_slice(payload);

        Ok(Self { raw })
    }

    /// Raw bytes of the block.
    pub fn as_bytes(&self) -> &[u8; UF2_BLOCK_SIZE] {
        &self.raw
    }

    fn read_u32(&self, offset: usize) -> u32 {
        LittleEndian::read_u32(&self.raw[offset..offset + 4])
    }

    /// First magic number (offset 0).
    pub fn magic_start0(&self) -> u32 {
        self.read_u32(OFFSET_MAGIC_START0)
    }

    /// Second magic number (offset 4).
    pub fn magic_start1(&self) -> u32 {
        self.read_u32(OFFSET_MAGIC_START1)
    }

    /// Flag bits (offset 8).
    pub fn flags(&self) -> u32 {
        self.read_u32(OFFSET_FLAGS)
    }

    /// Destination flash address of the payload (offset 12).
    pub fn target_address(&self) -> u32 {
        self.read_u32(OFFSET_TARGET_ADDRESS)
    }

    /// Number of payload bytes actually used (offset 16).
    pub fn payload_size(&self) -> u32 {
        self.read_u32(OFFSET_PAYLOAD_SIZE)
    }

    /// Zero-based index of this block within its family's sequence (offset 20).
    pub fn block_no(&self) -> u32 {
        self.read_u32(OFFSET_BLOCK_NO)
    }

    /// Total number of blocks in this block's family sequence (offset 24).
    pub fn num_blocks(&self) -> u32 {
        self.read_u32(OFFSET_NUM_BLOCKS)
    }

    /// Family ID identifying the target chip (offset 28).
    ///
    /// Only meaningful when [`UF2_FLAG_FAMILY_ID_PRESENT`] is set; older
    /// files store a file size here instead. The merge treats the raw value
    /// as the grouping key either way.
    pub fn family_id(&self) -> u32 {
        self.read_u32(OFFSET_FAMILY_ID)
    }

    /// Final magic number (offset 508).
    pub fn magic_end(&self) -> u32 {
        self.read_u32(OFFSET_MAGIC_END)
    }

    /// The 476-byte data area (offsets 32..508).
    pub fn payload(&self) -> &[u8] {
        &self.raw[OFFSET_PAYLOAD..OFFSET_MAGIC_END]
    }

    /// Whether the `familyID present` flag is set.
    pub fn has_family_id(&self) -> bool {
        self.flags() & UF2_FLAG_FAMILY_ID_PRESENT != 0
    }

    /// Overwrite the sequence index field.
    pub fn set_block_no(&mut self, block_no: u32) {
        LittleEndian::write_u32(&mut self.raw[OFFSET_BLOCK_NO..OFFSET_BLOCK_NO + 4], block_no);
    }

    /// Overwrite the total-blocks field.
    pub fn set_num_blocks(&mut self, num_blocks: u32) {
        LittleEndian::write_u32(
            &mut self.raw[OFFSET_NUM_BLOCKS..OFFSET_NUM_BLOCKS + 4],
            num_blocks,
        );
    }

    /// Check the structural well-formedness of the block.
    ///
    /// Verifies the three magic numbers and that the declared payload size
    /// fits the data area. This is a diagnostic aid; nothing on the merge
    /// path calls it, so malformed blocks still pass through unmodified.
    pub fn validate(&self) -> Result<()> {
        if self.magic_start0() != UF2_MAGIC_START0 {
            return Err(Uf2Error::InvalidMagicStart0(self.magic_start0()));
        }
        if self.magic_start1() != UF2_MAGIC_START1 {
            return Err(Uf2Error::InvalidMagicStart1(self.magic_start1()));
        }
        if self.magic_end() != UF2_MAGIC_END {
            return Err(Uf2Error::InvalidMagicEnd(self.magic_end()));
        }
        if self.payload_size() as usize > UF2_PAYLOAD_CAPACITY {
            return Err(Uf2Error::PayloadTooLarge(self.payload_size()));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Uf2Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Uf2Block")
            .field("target_address", &format_args!("{:#010x}", self.target_address()))
            .field("family_id", &format_args!("{:#010x}", self.family_id()))
            .field("block_no", &self.block_no())
            .field("num_blocks", &self.num_blocks())
            .field("payload_size", &self.payload_size())
            .finish_non_exhaustive()
    }
}

/// Split a raw buffer into consecutive 512-byte blocks.
///
/// Chunking starts at offset 0 and preserves file order. Trailing bytes that
/// do not form a complete block are silently discarded; truncated files are
/// common enough in practice that this is tolerance, not an error.
pub fn parse_blocks(data: &[u8]) -> Vec<Uf2Block> {
    data.chunks_exact(UF2_BLOCK_SIZE)
        .map(|chunk| {
            let mut raw = [0u8; UF2_BLOCK_SIZE];
            raw.copy_from_slice(chunk);
            Uf2Block::from_bytes(raw)
        })
        .collect()
}

/// Serialize blocks into one contiguous buffer, in sequence order.
pub fn encode_blocks(blocks: &[Uf2Block]) -> Vec<u8> {
    let mut out = Vec::with_capacity(blocks.len() * UF2_BLOCK_SIZE);
    for block in blocks {
        out.extend_from_slice(block.as_bytes());
    }
    out
}
