// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! STM32L476 specifications

use chip_common::ErrorCode;
use stm32l4xx::chip_specific::clock_constants::{HseConstants, PllConstants, SystemClockConstants};
use stm32l4xx::chip_specific::flash::{FlashChipSpecific, FlashLatency5};

pub enum Stm32l476Specs {}

impl PllConstants for Stm32l476Specs {}

impl SystemClockConstants for Stm32l476Specs {}

// The NUCLEO-L476RG feeds the 8 MHz MCO of its ST-LINK into OSC_IN.
impl HseConstants for Stm32l476Specs {}

impl FlashChipSpecific for Stm32l476Specs {
    type FlashLatency = FlashLatency5;

    const FLASH_SIZE: usize = 1024 * 1024;

    fn get_number_wait_cycles_based_on_frequency_and_voltage(
        frequency_hz: u32,
        vos: usize,
    ) -> Result<Self::FlashLatency, ErrorCode> {
        match vos {
            1 => match frequency_hz {
                0..=16_000_000 => Ok(Self::FlashLatency::Latency0),
                16_000_001..=32_000_000 => Ok(Self::FlashLatency::Latency1),
                32_000_001..=48_000_000 => Ok(Self::FlashLatency::Latency2),
                48_000_001..=64_000_000 => Ok(Self::FlashLatency::Latency3),
                64_000_001..=80_000_000 => Ok(Self::FlashLatency::Latency4),
                _ => Err(ErrorCode::SIZE),
            },
            2 => match frequency_hz {
                0..=6_000_000 => Ok(Self::FlashLatency::Latency0),
                6_000_001..=12_000_000 => Ok(Self::FlashLatency::Latency1),
                12_000_001..=18_000_000 => Ok(Self::FlashLatency::Latency2),
                18_000_001..=26_000_000 => Ok(Self::FlashLatency::Latency3),
                _ => Err(ErrorCode::SIZE),
            },
            _ => Err(ErrorCode::INVAL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stm32l4xx::clocks::{ClkInit, HsiState, OscInit, PllInit, PllSource, SysClkSource};
    use stm32l4xx::prescaler::{AHBPrescaler, APBPrescaler};
    use stm32l4xx::pwr::VOS;

    #[test]
    fn wait_states() {
        let ws = Stm32l476Specs::get_number_wait_cycles_based_on_frequency_and_voltage;
        assert_eq!(ws(4_000_000, 1), Ok(FlashLatency5::Latency0));
        assert_eq!(ws(16_000_000, 1), Ok(FlashLatency5::Latency0));
        assert_eq!(ws(16_000_001, 1), Ok(FlashLatency5::Latency1));
        assert_eq!(ws(80_000_000, 1), Ok(FlashLatency5::Latency4));
        assert_eq!(ws(80_000_001, 1), Err(ErrorCode::SIZE));
        assert_eq!(ws(6_500_000, 2), Ok(FlashLatency5::Latency1));
        assert_eq!(ws(26_000_000, 2), Ok(FlashLatency5::Latency3));
        assert_eq!(ws(26_000_001, 2), Err(ErrorCode::SIZE));
        assert_eq!(ws(16_000_000, 3), Err(ErrorCode::INVAL));
    }

    #[test]
    fn nucleo_clock_tree() {
        let osc = OscInit {
            pll: PllInit::new(PllSource::Msi, 1, 40, 2),
            ..OscInit::default()
        };
        let clk = ClkInit::new(
            SysClkSource::Pll,
            AHBPrescaler::DivideBy1,
            APBPrescaler::DivideBy1,
            APBPrescaler::DivideBy1,
        );
        let freqs = clk
            .frequencies::<Stm32l476Specs>(&osc, VOS::Range1)
            .unwrap();
        assert_eq!(freqs.sysclk, 80_000_000);
        assert_eq!(
            Stm32l476Specs::get_number_wait_cycles_based_on_frequency_and_voltage(
                freqs.hclk,
                VOS::Range1 as usize
            ),
            Ok(FlashLatency5::Latency4)
        );
    }

    #[test]
    fn hclk_just_above_a_band_edge() {
        // HSI16 / 3 * 25 / 8 lands a few hundred kHz above 16 MHz.
        let osc = OscInit {
            hsi: HsiState::On,
            pll: PllInit::new(PllSource::Hsi, 3, 25, 8),
            ..OscInit::default()
        };
        let clk = ClkInit::new(
            SysClkSource::Pll,
            AHBPrescaler::DivideBy1,
            APBPrescaler::DivideBy1,
            APBPrescaler::DivideBy1,
        );
        let freqs = clk
            .frequencies::<Stm32l476Specs>(&osc, VOS::Range1)
            .unwrap();
        assert_eq!(freqs.hclk, 16_666_665);
        assert_eq!(
            Stm32l476Specs::get_number_wait_cycles_based_on_frequency_and_voltage(
                freqs.hclk,
                VOS::Range1 as usize
            ),
            Ok(FlashLatency5::Latency1)
        );
    }
}
