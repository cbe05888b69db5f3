//! Well-known UF2 family IDs
//!
//! A small subset of the family registry shipped with the UF2 specification
//! (`uf2families.json`). Used for log output only; unknown IDs are still
//! valid grouping keys.

/// Look up the name of a well-known family ID.
pub fn family_name(family_id: u32) -> Option<&'static str> {
    Some(match family_id {
        0xE48B_FF56 => "RP2040",
        0xE48B_FF57 => "RP2XXX absolute (unpartitioned)",
        0xE48B_FF58 => "RP2XXX data partition",
        0xE48B_FF59 => "RP2350 Arm secure",
        0xE48B_FF5A => "RP2350 RISC-V",
        0xE48B_FF5B => "RP2350 Arm non-secure",
        0x68ED_2B88 => "SAMD21",
        0x5511_4460 => "SAMD51",
        0xADA5_2840 => "nRF52840",
        0xBFDD_4EEE => "ESP32-S2",
        0xC47E_5767 => "ESP32-S3",
        0x5EE2_1072 => "STM32F1",
        0x5775_5A57 => "STM32F4",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_families() {
        assert_eq!(family_name(0xE48B_FF56), Some("RP2040"));
        assert_eq!(family_name(0xE48B_FF59), Some("RP2350 Arm secure"));
    }

    #[test]
    fn test_unknown_family() {
        assert_eq!(family_name(0xDEAD_BEEF), None);
        assert_eq!(family_name(0), None);
    }
}
