// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Clock-related constants for a particular chip

/// PLL-related constants for specific for a specific chip
pub trait PllConstants {
    /// PLL minimum frequency in MHz
    const MIN_FREQ_MHZ: usize = 8;
    /// PLL maximum frequency in MHz
    // All boards support PLL frequencies up to 80MHz
    const MAX_FREQ_MHZ: usize = 80;
    /// Minimum VCO input (after the M divider) in MHz
    const MIN_VCO_INPUT_MHZ: usize = 4;
    /// Maximum VCO input (after the M divider) in MHz
    const MAX_VCO_INPUT_MHZ: usize = 16;
    /// Minimum VCO output in MHz
    const MIN_VCO_OUTPUT_MHZ: usize = 64;
    /// Maximum VCO output in MHz
    const MAX_VCO_OUTPUT_MHZ: usize = 344;
}

/// Generic clock constants for a specific chip
pub trait SystemClockConstants {
    /// Maximum allowed APB1 frequency in MHz
    const APB1_FREQUENCY_LIMIT_MHZ: usize = 80;
    /// Maximum allowed APB2 frequency in MHz
    const APB2_FREQUENCY_LIMIT_MHZ: usize = 80;
    /// Maximum allowed system clock frequency in MHz
    const SYS_CLOCK_FREQUENCY_LIMIT_MHZ: usize = 80;
    /// Maximum system clock frequency in voltage range 2, in MHz
    const SYS_CLOCK_FREQUENCY_LIMIT_RANGE2_MHZ: usize = 26;
}

/// External oscillator fitted on the board
pub trait HseConstants {
    /// Frequency of the HSE crystal or bypass clock in MHz
    const HSE_FREQUENCY_MHZ: usize = 8;
}

/// Clock constants for a specific chip
pub trait ClockConstants: SystemClockConstants + PllConstants + HseConstants {}

impl<T: SystemClockConstants + PllConstants + HseConstants> ClockConstants for T {}
