// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Serial communication interfaces.
//!
//! The eight SERCOMs share one register block whose layout depends on
//! `CTRLA.MODE`. Only USART mode is described here. Each instance needs its
//! MCLK bus clock and its GCLK core channel running before it is enabled.

pub mod usart;

use crate::gclk;
use crate::mclk::{PeripheralClockType, PCLKA, PCLKB, PCLKD};
use crate::memory_map::{
    SERCOM0_BASE, SERCOM1_BASE, SERCOM2_BASE, SERCOM3_BASE, SERCOM4_BASE, SERCOM5_BASE,
    SERCOM6_BASE, SERCOM7_BASE,
};
use crate::nvic;
use chip_common::StaticRef;

/// Where one SERCOM lives and how it is clocked.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SercomInstance {
    pub base: usize,
    /// Bus clock gate in MCLK.
    pub clock: PeripheralClockType,
    /// GCLK peripheral channel of the core clock.
    pub core_channel: usize,
    /// First of the instance's four interrupt lines.
    pub irq: u32,
}

impl SercomInstance {
    pub fn usart_registers(&self) -> StaticRef<usart::UsartRegisters> {
        unsafe { StaticRef::new(self.base as *const usart::UsartRegisters) }
    }

    /// Slow clock channel, shared by every SERCOM.
    pub const fn slow_channel(&self) -> usize {
        gclk::SLOW
    }
}

pub const SERCOMS: [SercomInstance; 8] = [
    SercomInstance {
        base: SERCOM0_BASE,
        clock: PeripheralClockType::APBA(PCLKA::SERCOM0),
        core_channel: gclk::SERCOM0_CORE,
        irq: nvic::SERCOM0_0,
    },
    SercomInstance {
        base: SERCOM1_BASE,
        clock: PeripheralClockType::APBA(PCLKA::SERCOM1),
        core_channel: gclk::SERCOM1_CORE,
        irq: nvic::SERCOM1_0,
    },
    SercomInstance {
        base: SERCOM2_BASE,
        clock: PeripheralClockType::APBB(PCLKB::SERCOM2),
        core_channel: gclk::SERCOM2_CORE,
        irq: nvic::SERCOM2_0,
    },
    SercomInstance {
        base: SERCOM3_BASE,
        clock: PeripheralClockType::APBB(PCLKB::SERCOM3),
        core_channel: gclk::SERCOM3_CORE,
        irq: nvic::SERCOM3_0,
    },
    SercomInstance {
        base: SERCOM4_BASE,
        clock: PeripheralClockType::APBD(PCLKD::SERCOM4),
        core_channel: gclk::SERCOM4_CORE,
        irq: nvic::SERCOM4_0,
    },
    SercomInstance {
        base: SERCOM5_BASE,
        clock: PeripheralClockType::APBD(PCLKD::SERCOM5),
        core_channel: gclk::SERCOM5_CORE,
        irq: nvic::SERCOM5_0,
    },
    SercomInstance {
        base: SERCOM6_BASE,
        clock: PeripheralClockType::APBD(PCLKD::SERCOM6),
        core_channel: gclk::SERCOM6_CORE,
        irq: nvic::SERCOM6_0,
    },
    SercomInstance {
        base: SERCOM7_BASE,
        clock: PeripheralClockType::APBD(PCLKD::SERCOM7),
        core_channel: gclk::SERCOM7_CORE,
        irq: nvic::SERCOM7_0,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instances() {
        for (n, sercom) in SERCOMS.iter().enumerate() {
            assert_eq!(sercom.irq, nvic::SERCOM0_0 + 4 * n as u32);
        }
        assert_eq!(SERCOMS[2].base, 0x4101_2000);
        assert_eq!(SERCOMS[2].core_channel, 23);
        assert_eq!(SERCOMS[5].usart_registers().address(), SERCOM5_BASE);
        assert_eq!(SERCOMS[7].slow_channel(), 3);
    }
}
