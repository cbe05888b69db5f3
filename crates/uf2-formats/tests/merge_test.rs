//! Integration tests for the UF2 merge engine
//!
//! Exercises the merge contract end to end over synthetic multi-family
//! images: sequencing completeness, byte preservation, terminal block
//! clustering, and tolerance for truncated inputs.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::HashMap;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use uf2_formats::{UF2_BLOCK_SIZE, Uf2Block, encode_blocks, merge, parse_blocks};

fn block(family: u32, addr: u32, payload: &[u8]) -> Uf2Block {
    Uf2Block::new(addr, family, payload).expect("payload fits the data area")
}

fn image(blocks: &[Uf2Block]) -> Vec<u8> {
    encode_blocks(blocks)
}

/// Group output blocks by family, preserving first-occurrence order.
fn group_output(output: &[Uf2Block]) -> Vec<(u32, Vec<Uf2Block>)> {
    let mut order = Vec::new();
    let mut groups: HashMap<u32, Vec<Uf2Block>> = HashMap::new();
    for b in output {
        if !groups.contains_key(&b.family_id()) {
            order.push(b.family_id());
        }
        groups.entry(b.family_id()).or_default().push(b.clone());
    }
    order
        .into_iter()
        .map(|family| {
            let members = groups.remove(&family).expect("family was just inserted");
            (family, members)
        })
        .collect()
}

#[test]
fn merge_of_empty_list_is_empty() {
    assert!(merge(&[]).is_empty());
}

#[test]
fn sequencing_is_complete_per_family() {
    let rp2040 = image(&[
        block(0xE48BFF56, 0x1000_0000, b"boot"),
        block(0xE48BFF56, 0x1000_0200, b"app1"),
        block(0xE48BFF56, 0x1000_0400, b"app2"),
    ]);
    let nrf = image(&[
        block(0xADA52840, 0x0002_6000, b"soft"),
        block(0xADA52840, 0x0002_6200, b"device"),
    ]);

    let output = parse_blocks(&merge(&[rp2040, nrf]));
    assert_eq!(output.len(), 5);

    for (_, members) in group_output(&output) {
        let count = members.len() as u32;
        let mut block_nos: Vec<u32> = members.iter().map(Uf2Block::block_no).collect();
        block_nos.sort_unstable();
        assert_eq!(block_nos, (0..count).collect::<Vec<_>>());
        for member in &members {
            assert_eq!(member.num_blocks(), count);
        }
    }
}

#[test]
fn ascending_block_no_follows_ascending_address() {
    let input = image(&[
        block(0xAA, 0x5000, b"c"),
        block(0xAA, 0x1000, b"a"),
        block(0xAA, 0x3000, b"b"),
        block(0xBB, 0x2000, b"x"),
        block(0xBB, 0x4000, b"y"),
    ]);

    let output = parse_blocks(&merge(&[input]));
    for (_, mut members) in group_output(&output) {
        members.sort_by_key(Uf2Block::block_no);
        let addresses: Vec<u32> = members.iter().map(Uf2Block::target_address).collect();
        let mut sorted = addresses.clone();
        sorted.sort_unstable();
        assert_eq!(addresses, sorted);
    }
}

#[test]
fn terminal_blocks_cluster_in_first_occurrence_order() {
    // Family 0xBB's lowest address precedes 0xAA's, so 0xBB is
    // first-encountered in the sorted stream and leads the family order.
    let input = image(&[
        block(0xAA, 0x3000, b"a0"),
        block(0xAA, 0x3200, b"a1"),
        block(0xBB, 0x1000, b"b0"),
        block(0xBB, 0x1200, b"b1"),
        block(0xBB, 0x1400, b"b2"),
    ]);

    let output = parse_blocks(&merge(&[input]));
    assert_eq!(output.len(), 5);

    // Two families, so the last two blocks are the terminal blocks, in
    // family first-occurrence order.
    let tail: Vec<(u32, u32)> = output[3..]
        .iter()
        .map(|b| (b.family_id(), b.block_no()))
        .collect();
    assert_eq!(tail, vec![(0xBB, 2), (0xAA, 1)]);

    // The leading section holds only non-terminal blocks.
    for b in &output[..3] {
        assert!(b.block_no() + 1 < b.num_blocks());
    }
}

#[test]
fn bytes_outside_sequencing_fields_are_preserved() {
    let mut payload = [0u8; 476];
    for (i, byte) in payload.iter_mut().enumerate() {
        *byte = i as u8;
    }
    let original = block(0x1234, 0xDEAD_BEE0, &payload);
    let output = parse_blocks(&merge(&[image(&[original.clone()])]));
    assert_eq!(output.len(), 1);

    let before = original.as_bytes();
    let after = output[0].as_bytes();
    for offset in 0..UF2_BLOCK_SIZE {
        if (20..28).contains(&offset) {
            continue;
        }
        assert_eq!(before[offset], after[offset], "byte {offset} changed");
    }
}

#[test]
fn truncated_tail_is_ignored() {
    for extra in [1usize, 100, 511] {
        let mut input = image(&[block(0xAA, 0x1000, b"a"), block(0xAA, 0x1200, b"b")]);
        input.extend(std::iter::repeat_n(0x5Au8, extra));
        let output = parse_blocks(&merge(&[input]));
        assert_eq!(output.len(), 2, "extra {extra} bytes changed block count");
    }
}

#[test]
fn remerging_merged_output_is_stable() {
    let input = image(&[
        block(0xAA, 0x1000, b"one"),
        block(0xAA, 0x1200, b"two"),
        block(0xAA, 0x1400, b"three"),
    ]);

    let once = merge(&[input]);
    let twice = merge(&[once.clone()]);
    assert_eq!(once, twice);
}

#[test]
fn two_singleton_families_both_land_in_terminal_cluster() {
    // The concrete reference scenario: family A at 0x1000, family B at
    // 0x2000, each the only block of its family.
    let a = image(&[block(0xA, 0x1000, b"a")]);
    let b = image(&[block(0xB, 0x2000, b"b")]);

    let output = parse_blocks(&merge(&[a, b]));
    assert_eq!(output.len(), 2);
    assert_eq!(output[0].family_id(), 0xA);
    assert_eq!(output[1].family_id(), 0xB);
    for member in &output {
        assert_eq!(member.block_no(), 0);
        assert_eq!(member.num_blocks(), 1);
    }
}

#[test]
fn file_order_breaks_address_ties() {
    let first = image(&[block(0xAA, 0x1000, b"from first file")]);
    let second = image(&[block(0xAA, 0x1000, b"from second file")]);

    let output = parse_blocks(&merge(&[first, second]));
    assert_eq!(&output[0].payload()[..15], b"from first file");
    assert_eq!(&output[1].payload()[..16], b"from second file");
    assert_eq!(output[0].block_no(), 0);
    assert_eq!(output[1].block_no(), 1);
}

fn arb_block() -> impl Strategy<Value = (u32, u32, u8)> {
    // Few distinct families so groups actually form.
    (0u32..4, any::<u32>(), any::<u8>())
}

proptest! {
    /// Merge invariants hold for arbitrary block sets split across inputs.
    #[test]
    fn merge_invariants_hold(
        specs in prop::collection::vec(arb_block(), 0..40),
        split in 1usize..4,
    ) {
        let blocks: Vec<Uf2Block> = specs
            .iter()
            .map(|&(family, addr, tag)| block(family, addr, &[tag]))
            .collect();

        // Distribute blocks round-robin over `split` input files.
        let mut inputs: Vec<Vec<Uf2Block>> = vec![Vec::new(); split];
        for (i, b) in blocks.iter().enumerate() {
            inputs[i % split].push(b.clone());
        }
        let buffers: Vec<Vec<u8>> = inputs.iter().map(|bs| encode_blocks(bs)).collect();

        let output = parse_blocks(&merge(&buffers));
        prop_assert_eq!(output.len(), blocks.len());

        let groups = group_output(&output);
        let distinct_families = groups.len();

        for (_, members) in &groups {
            let count = members.len() as u32;
            let mut block_nos: Vec<u32> = members.iter().map(Uf2Block::block_no).collect();
            block_nos.sort_unstable();
            prop_assert_eq!(block_nos, (0..count).collect::<Vec<_>>());
            for member in members {
                prop_assert_eq!(member.num_blocks(), count);
            }
        }

        // Exactly one terminal block per family, all at the end.
        if !output.is_empty() {
            let tail = &output[output.len() - distinct_families..];
            for member in tail {
                prop_assert_eq!(member.block_no(), member.num_blocks() - 1);
            }
        }
    }
}
