// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! PIC32CX1025SG41128 specifications

use crate::chip_specific::{ClockConstants, FlashChipSpecific};
use chip_common::ErrorCode;

pub enum Pic32cx1025sg41128Specs {}

impl ClockConstants for Pic32cx1025sg41128Specs {}

impl FlashChipSpecific for Pic32cx1025sg41128Specs {
    const FLASH_SIZE: usize = 1024 * 1024;

    fn wait_states_for_frequency(frequency_hz: u32) -> Result<u8, ErrorCode> {
        match frequency_hz {
            0..=24_000_000 => Ok(0),
            24_000_001..=51_000_000 => Ok(1),
            51_000_001..=77_000_000 => Ok(2),
            77_000_001..=101_000_000 => Ok(3),
            101_000_001..=119_000_000 => Ok(4),
            119_000_001..=120_000_000 => Ok(5),
            _ => Err(ErrorCode::SIZE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gclk::{self, ClockSource, Generator, GeneratorConfig};
    use crate::memory_map;
    use crate::oscctrl::{DpllConfig, DpllReference};

    #[test]
    fn wait_states() {
        let ws = Pic32cx1025sg41128Specs::wait_states_for_frequency;
        assert_eq!(ws(12_000_000), Ok(0));
        assert_eq!(ws(48_000_000), Ok(1));
        assert_eq!(ws(100_000_000), Ok(3));
        assert_eq!(ws(120_000_000), Ok(5));
        assert_eq!(ws(120_000_001), Err(ErrorCode::SIZE));
    }

    #[test]
    fn flash_size_matches_memory_map() {
        assert_eq!(Pic32cx1025sg41128Specs::FLASH_SIZE, memory_map::FLASH.size);
    }

    #[test]
    fn curiosity_clock_tree() {
        // 32.768 kHz crystal -> DPLL0 at ~120 MHz -> GCLK0 -> CPU
        let dpll = DpllConfig::for_output(DpllReference::Xosc32k, 32_768, 0, 120_000_000);
        assert_eq!(dpll.validate::<Pic32cx1025sg41128Specs>(), Ok(()));

        let gclk0 = GeneratorConfig::new(ClockSource::Dpll0, 1);
        let cpu_hz = gclk0.output_frequency(dpll.output_frequency());
        assert_eq!(
            gclk::validate_generator_frequency::<Pic32cx1025sg41128Specs>(
                Generator::Gclk0,
                cpu_hz
            ),
            Ok(())
        );
        assert_eq!(
            Pic32cx1025sg41128Specs::wait_states_for_frequency(cpu_hz),
            Ok(5)
        );
    }
}
