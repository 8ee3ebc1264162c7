// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Flash constants for a particular chip

use core::fmt::Debug;

pub trait RegisterToFlashLatency {
    fn convert_register_to_enum(flash_latency_register: u32) -> Self;
}

/// Wait states available on the F3 family.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlashLatency3 {
    Latency0 = 0,
    Latency1 = 1,
    Latency2 = 2,
}

impl RegisterToFlashLatency for FlashLatency3 {
    fn convert_register_to_enum(flash_latency_register: u32) -> Self {
        match flash_latency_register {
            0 => Self::Latency0,
            1 => Self::Latency1,
            _ => Self::Latency2,
        }
    }
}

impl From<FlashLatency3> for u32 {
    fn from(value: FlashLatency3) -> u32 {
        value as u32
    }
}

pub trait FlashChipSpecific {
    type FlashLatency: RegisterToFlashLatency + Clone + Copy + PartialEq + Debug + Into<u32>;

    /// Size of the main flash array in bytes
    const FLASH_SIZE: usize;

    /// Wait states needed for an HCLK of `frequency_hz`. The F3 flash
    /// interface only depends on the frequency, not on a voltage range.
    fn get_number_wait_cycles_based_on_frequency(frequency_hz: u32) -> Self::FlashLatency;
}
