// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Flash constants for a particular chip

use core::fmt::Debug;

pub trait RegisterToFlashLatency {
    fn convert_register_to_enum(flash_latency_register: u32) -> Self;
}

/// Wait states available on the STM32L4x5/L4x6 lines.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlashLatency5 {
    Latency0 = 0,
    Latency1 = 1,
    Latency2 = 2,
    Latency3 = 3,
    Latency4 = 4,
}

impl RegisterToFlashLatency for FlashLatency5 {
    fn convert_register_to_enum(flash_latency_register: u32) -> Self {
        match flash_latency_register {
            0 => Self::Latency0,
            1 => Self::Latency1,
            2 => Self::Latency2,
            3 => Self::Latency3,
            _ => Self::Latency4,
        }
    }
}

impl From<FlashLatency5> for u32 {
    fn from(value: FlashLatency5) -> u32 {
        value as u32
    }
}

pub trait FlashChipSpecific {
    type FlashLatency: RegisterToFlashLatency + Clone + Copy + PartialEq + Debug + Into<u32>;

    /// Size of the main flash array in bytes
    const FLASH_SIZE: usize;

    /// Wait states needed for an HCLK of `frequency_hz` in voltage range
    /// `vos` (1 or 2).
    ///
    /// # Errors
    ///
    /// + [Err]\([ErrorCode::INVAL]\): `vos` is not a valid range
    /// + [Err]\([ErrorCode::SIZE]\): `frequency_hz` is above what the range
    ///   supports
    ///
    /// [ErrorCode::INVAL]: chip_common::ErrorCode::INVAL
    /// [ErrorCode::SIZE]: chip_common::ErrorCode::SIZE
    fn get_number_wait_cycles_based_on_frequency_and_voltage(
        frequency_hz: u32,
        vos: usize,
    ) -> Result<Self::FlashLatency, chip_common::ErrorCode>;
}
