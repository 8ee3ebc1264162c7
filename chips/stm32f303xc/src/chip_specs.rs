// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! STM32F303xC specifications

use stm32f3xx::chip_specific::clock_constants::{HseConstants, PllConstants, SystemClockConstants};
use stm32f3xx::chip_specific::flash::{FlashChipSpecific, FlashLatency3};

pub enum Stm32f303Specs {}

impl PllConstants for Stm32f303Specs {}

impl SystemClockConstants for Stm32f303Specs {}

// The STM32F3DISCOVERY feeds the 8 MHz MCO of its ST-LINK into OSC_IN.
impl HseConstants for Stm32f303Specs {}

impl FlashChipSpecific for Stm32f303Specs {
    type FlashLatency = FlashLatency3;

    const FLASH_SIZE: usize = 256 * 1024;

    fn get_number_wait_cycles_based_on_frequency(frequency_hz: u32) -> Self::FlashLatency {
        match frequency_hz {
            0..=24_000_000 => Self::FlashLatency::Latency0,
            24_000_001..=48_000_000 => Self::FlashLatency::Latency1,
            _ => Self::FlashLatency::Latency2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stm32f3xx::clocks::{ClkInit, HseState, OscInit, PllInit, PllSource, SysClkSource};
    use stm32f3xx::prescaler::{AHBPrescaler, APBPrescaler};

    #[test]
    fn wait_states() {
        let ws = Stm32f303Specs::get_number_wait_cycles_based_on_frequency;
        assert_eq!(ws(8_000_000), FlashLatency3::Latency0);
        assert_eq!(ws(24_000_000), FlashLatency3::Latency0);
        assert_eq!(ws(24_000_001), FlashLatency3::Latency1);
        assert_eq!(ws(36_000_000), FlashLatency3::Latency1);
        assert_eq!(ws(48_500_000), FlashLatency3::Latency2);
        assert_eq!(ws(72_000_000), FlashLatency3::Latency2);
    }

    #[test]
    fn discovery_board_clock_tree() {
        let osc = OscInit {
            hse: HseState::Bypass,
            pll: PllInit::new(PllSource::Hse, 9, 1),
            ..OscInit::default()
        };
        let clk = ClkInit::new(
            SysClkSource::Pll,
            AHBPrescaler::DivideBy1,
            APBPrescaler::DivideBy2,
            APBPrescaler::DivideBy1,
        );
        let freqs = clk.frequencies::<Stm32f303Specs>(&osc).unwrap();
        assert_eq!(freqs.sysclk, 72_000_000);
        assert_eq!(freqs.pclk1, 36_000_000);
        assert_eq!(
            Stm32f303Specs::get_number_wait_cycles_based_on_frequency(freqs.hclk),
            FlashLatency3::Latency2
        );
    }
}
