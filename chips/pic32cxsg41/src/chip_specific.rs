// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Part-specific constants for the PIC32CX SG41 line.

use chip_common::ErrorCode;

/// Clock limits for a specific chip
pub trait ClockConstants {
    /// Maximum CPU (GCLK generator 0) frequency in Hz
    const CPU_MAX_FREQ_HZ: u32 = 120_000_000;
    /// Maximum frequency of any GCLK generator output in Hz
    const GCLK_MAX_FREQ_HZ: u32 = 200_000_000;
    /// Minimum DPLL reference frequency in Hz
    const DPLL_MIN_REF_HZ: u32 = 32_000;
    /// Maximum DPLL reference frequency in Hz
    const DPLL_MAX_REF_HZ: u32 = 3_200_000;
    /// Minimum DPLL output frequency in Hz
    const DPLL_MIN_OUTPUT_HZ: u32 = 96_000_000;
    /// Maximum DPLL output frequency in Hz
    const DPLL_MAX_OUTPUT_HZ: u32 = 200_000_000;
    /// Crystal fitted on XOSC32K, in Hz
    const XOSC32K_FREQUENCY_HZ: u32 = 32_768;
}

/// Flash-related constants for a specific chip
pub trait FlashChipSpecific {
    /// Size of the main flash array in bytes
    const FLASH_SIZE: usize;

    /// Number of NVM read wait states needed at `frequency_hz`.
    fn wait_states_for_frequency(frequency_hz: u32) -> Result<u8, ErrorCode>;
}

pub trait ChipSpecs: ClockConstants + FlashChipSpecific {}

impl<T: ClockConstants + FlashChipSpecific> ChipSpecs for T {}
