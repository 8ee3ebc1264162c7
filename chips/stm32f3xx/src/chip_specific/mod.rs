// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Part-specific constants for the STM32F3 family.
//!
//! Each part crate implements these traits on an uninhabited type and hands
//! that type to the generic clock and flash helpers of this crate.

pub mod clock_constants;
pub mod flash;

use clock_constants::ClockConstants;
use flash::FlashChipSpecific;

pub trait ChipSpecs: ClockConstants + FlashChipSpecific {}

impl<T: ClockConstants + FlashChipSpecific> ChipSpecs for T {}
