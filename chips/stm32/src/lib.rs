// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Peripheral IP blocks that ST uses unchanged on both the STM32F3 and the
//! STM32L4 families.
//!
//! The family crates pick the instances (base addresses, clock gates and
//! interrupt lines); this crate only describes the register interface of
//! each block.

#![no_std]

pub mod dma;
pub mod exti;
pub mod gpio;
pub mod i2c;
pub mod iwdg;
pub mod prescaler;
pub mod spi;
pub mod tim;
pub mod usart;
