// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Clock-related constants for a particular chip

/// PLL-related constants for a specific chip
pub trait PllConstants {
    /// PLL minimum output frequency in MHz
    const MIN_FREQ_MHZ: usize = 16;
    /// PLL maximum output frequency in MHz
    const MAX_FREQ_MHZ: usize = 72;
    /// PLL minimum input frequency in MHz
    const MIN_INPUT_FREQ_MHZ: usize = 1;
    /// PLL maximum input frequency in MHz
    const MAX_INPUT_FREQ_MHZ: usize = 24;
}

/// Generic clock constants for a specific chip
pub trait SystemClockConstants {
    /// Maximum allowed APB1 frequency in MHz
    const APB1_FREQUENCY_LIMIT_MHZ: usize = 36;
    /// Maximum allowed APB2 frequency in MHz
    const APB2_FREQUENCY_LIMIT_MHZ: usize = 72;
    /// Maximum allowed system clock frequency in MHz
    const SYS_CLOCK_FREQUENCY_LIMIT_MHZ: usize = 72;
}

/// External oscillator fitted on the board
pub trait HseConstants {
    /// Frequency of the HSE crystal or bypass clock in MHz
    const HSE_FREQUENCY_MHZ: usize = 8;
}

/// Clock constants for a specific chip
pub trait ClockConstants: SystemClockConstants + PllConstants + HseConstants {}

impl<T: SystemClockConstants + PllConstants + HseConstants> ClockConstants for T {}
