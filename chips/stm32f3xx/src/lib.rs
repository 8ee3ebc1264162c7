// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Peripheral implementations for the STM32F3xx MCU family.
//!
//! The IP blocks shared with other ST families (GPIO, USART, SPI, I2C, DMA,
//! timers, EXTI, IWDG) come from the `stm32` crate; the base addresses they
//! live at on this family are in [`memory_map`].

#![no_std]

pub mod chip_specific;
pub mod clocks;
pub mod flash;
pub mod memory_map;
pub mod pwr;
pub mod rcc;
pub mod syscfg;

pub use stm32::{dma, exti, gpio, i2c, iwdg, prescaler, spi, tim, usart};
