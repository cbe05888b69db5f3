//! Multi-image UF2 merge engine
//!
//! Combines blocks from several UF2 files into one output file. Blocks keep
//! their original family ID; the merge only rewrites the per-family
//! `blockNo`/`numBlocks` sequencing so that each family forms a contiguous
//! `0..count` sequence again.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::debug;

use crate::block::{Uf2Block, encode_blocks, parse_blocks};

/// Merge the contents of multiple UF2 files into a single output buffer.
///
/// Each input buffer is parsed independently (trailing partial blocks are
/// dropped) and the blocks are combined as follows:
///
/// 1. All blocks are stable-sorted by target address, so blocks at the same
///    address keep their input order.
/// 2. Blocks are grouped by family ID, families ordered by first occurrence
///    in the sorted stream.
/// 3. Within each family, `blockNo` is reassigned `0..count` and `numBlocks`
///    is set to the family's block count. No other bytes change.
/// 4. The output emits every family's blocks except its last, family by
///    family, then every family's last block. Bootloaders use the final
///    block of a sequence as an end-of-transfer signal, so the terminal
///    blocks of all families cluster at the end of the stream.
///
/// An empty input list produces an empty buffer. A single-block family's one
/// block is its own terminal block and lands in the trailing cluster.
pub fn merge(inputs: &[Vec<u8>]) -> Vec<u8> {
    let mut blocks: Vec<Uf2Block> = Vec::new();
    for data in inputs {
        blocks.extend(parse_blocks(data));
    }
    debug!("collected {} blocks from {} inputs", blocks.len(), inputs.len());

    // Stable: ties on address preserve input order.
    blocks.sort_by_key(Uf2Block::target_address);

    let mut family_order: Vec<u32> = Vec::new();
    let mut groups: HashMap<u32, Vec<Uf2Block>> = HashMap::new();
    for block in blocks {
        match groups.entry(block.family_id()) {
            Entry::Vacant(slot) => {
                family_order.push(block.family_id());
                slot.insert(vec![block]);
            }
            Entry::Occupied(mut slot) => slot.get_mut().push(block),
        }
    }

    let mut merged: Vec<Uf2Block> = Vec::new();
    let mut terminals: Vec<Uf2Block> = Vec::new();
    for family in &family_order {
        let Some(mut members) = groups.remove(family) else {
            continue;
        };

        let total = members.len() as u32;
        for (index, block) in members.iter_mut().enumerate() {
            block.set_block_no(index as u32);
            block.set_num_blocks(total);
        }
        debug!("family {family:#010x}: {total} blocks");

        // Defer the terminal block of every family to the end of the stream.
        if let Some(last) = members.pop() {
            terminals.push(last);
        }
        merged.append(&mut members);
    }
    merged.append(&mut terminals);

    encode_blocks(&merged)
}
