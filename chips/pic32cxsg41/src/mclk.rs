// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Main clock controller: CPU clock divider and the bus clock masks.

use crate::memory_map::MCLK_BASE;
use chip_common::{ClockInterface, ErrorCode, StaticRef};
use tock_registers::fields::Field;
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite};
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    pub MclkRegisters {
        (0x00 => _reserved0),
        /// Interrupt Enable Clear
        (0x01 => intenclr: ReadWrite<u8, INT::Register>),
        /// Interrupt Enable Set
        (0x02 => intenset: ReadWrite<u8, INT::Register>),
        /// Interrupt Flag Status and Clear
        (0x03 => intflag: ReadWrite<u8, INT::Register>),
        /// HS Clock Division
        (0x04 => hsdiv: ReadOnly<u8, CPUDIV::Register>),
        /// CPU Clock Division
        (0x05 => cpudiv: ReadWrite<u8, CPUDIV::Register>),
        (0x06 => _reserved1),
        /// AHB Mask
        (0x10 => ahbmask: ReadWrite<u32>),
        /// APBA Mask
        (0x14 => apbamask: ReadWrite<u32>),
        /// APBB Mask
        (0x18 => apbbmask: ReadWrite<u32>),
        /// APBC Mask
        (0x1c => apbcmask: ReadWrite<u32>),
        /// APBD Mask
        (0x20 => apbdmask: ReadWrite<u32>),
        (0x24 => @END),
    }
}

register_bitfields![u8,
    pub INT [
        /// Clock Ready
        CKRDY OFFSET(0) NUMBITS(1) []
    ],
    pub CPUDIV [
        DIV OFFSET(0) NUMBITS(8) [
            Div1 = 0x01,
            Div2 = 0x02,
            Div4 = 0x04,
            Div8 = 0x08,
            Div16 = 0x10,
            Div32 = 0x20,
            Div64 = 0x40,
            Div128 = 0x80
        ]
    ]
];

pub const AHBMASK_RESET: u32 = 0x00ff_ffff;
pub const APBAMASK_RESET: u32 = 0x0000_07ff;
pub const APBBMASK_RESET: u32 = 0x0001_8056;
pub const APBCMASK_RESET: u32 = 0x0000_2000;
pub const APBDMASK_RESET: u32 = 0x0000_0000;

const MCLK: StaticRef<MclkRegisters> =
    unsafe { StaticRef::new(MCLK_BASE as *const MclkRegisters) };

/// Bus + mask bit for the peripherals
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PeripheralClockType {
    AHB(HCLK),
    APBA(PCLKA),
    APBB(PCLKB),
    APBC(PCLKC),
    APBD(PCLKD),
}

/// Bits of `AHBMASK`. Bits 14, 17 and 18 gate the Ethernet MAC and the CAN
/// controllers, which this part does not have.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HCLK {
    HPB0 = 0,
    HPB1 = 1,
    HPB2 = 2,
    HPB3 = 3,
    DSU = 4,
    HMATRIX = 5,
    NVMCTRL = 6,
    HSRAM = 7,
    CMCC = 8,
    DMAC = 9,
    USB = 10,
    BKUPRAM = 11,
    PAC = 12,
    QSPI = 13,
    SDHC0 = 15,
    SDHC1 = 16,
    ICM = 19,
    PUKCC = 20,
    QSPI_2X = 21,
    NVMCTRL_SMEEPROM = 22,
    NVMCTRL_CACHE = 23,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PCLKA {
    PAC = 0,
    PM = 1,
    MCLK = 2,
    RSTC = 3,
    OSCCTRL = 4,
    OSC32KCTRL = 5,
    SUPC = 6,
    GCLK = 7,
    WDT = 8,
    RTC = 9,
    EIC = 10,
    FREQM = 11,
    SERCOM0 = 12,
    SERCOM1 = 13,
    TC0 = 14,
    TC1 = 15,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PCLKB {
    USB = 0,
    DSU = 1,
    NVMCTRL = 2,
    PORT = 4,
    EVSYS = 7,
    SERCOM2 = 9,
    SERCOM3 = 10,
    TCC0 = 11,
    TCC1 = 12,
    TC2 = 13,
    TC3 = 14,
    RAMECC = 16,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PCLKC {
    TCC2 = 3,
    TCC3 = 4,
    TC4 = 5,
    TC5 = 6,
    PDEC = 7,
    AC = 8,
    AES = 9,
    TRNG = 10,
    ICM = 11,
    QSPI = 13,
    CCL = 14,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PCLKD {
    SERCOM4 = 0,
    SERCOM5 = 1,
    SERCOM6 = 2,
    SERCOM7 = 3,
    TCC4 = 4,
    TC6 = 5,
    TC7 = 6,
    ADC0 = 7,
    ADC1 = 8,
    DAC = 9,
    I2S = 10,
    PCC = 11,
}

fn bit(position: u32) -> Field<u32, ()> {
    Field::new(1, position as usize)
}

pub struct Mclk {
    registers: StaticRef<MclkRegisters>,
}

impl Mclk {
    pub const fn new() -> Mclk {
        Mclk { registers: MCLK }
    }

    #[cfg(test)]
    pub(crate) fn with_registers(registers: StaticRef<MclkRegisters>) -> Mclk {
        Mclk { registers }
    }

    fn mask(&self, clock: PeripheralClockType) -> (&ReadWrite<u32>, u32) {
        let r = &self.registers;
        match clock {
            PeripheralClockType::AHB(c) => (&r.ahbmask, c as u32),
            PeripheralClockType::APBA(c) => (&r.apbamask, c as u32),
            PeripheralClockType::APBB(c) => (&r.apbbmask, c as u32),
            PeripheralClockType::APBC(c) => (&r.apbcmask, c as u32),
            PeripheralClockType::APBD(c) => (&r.apbdmask, c as u32),
        }
    }

    pub fn is_enabled_clock(&self, clock: PeripheralClockType) -> bool {
        let (register, position) = self.mask(clock);
        register.is_set(bit(position))
    }

    pub fn enable_clock(&self, clock: PeripheralClockType) {
        let (register, position) = self.mask(clock);
        register.modify(bit(position).val(1));
    }

    pub fn disable_clock(&self, clock: PeripheralClockType) {
        let (register, position) = self.mask(clock);
        register.modify(bit(position).val(0));
    }

    /// Divider between GCLK generator 0 and the CPU clock.
    pub fn cpu_divider(&self) -> u32 {
        self.registers.cpudiv.read(CPUDIV::DIV).into()
    }

    /// Set the CPU clock divider. Only powers of two from 1 to 128 exist.
    pub fn set_cpu_divider(&self, divider: u32) -> Result<(), ErrorCode> {
        if !divider.is_power_of_two() || divider > 128 {
            return Err(ErrorCode::INVAL);
        }
        self.registers.cpudiv.write(CPUDIV::DIV.val(divider as u8));
        Ok(())
    }

    pub fn is_clock_ready(&self) -> bool {
        self.registers.intflag.is_set(INT::CKRDY)
    }

    pub fn clear_clock_ready(&self) {
        self.registers.intflag.write(INT::CKRDY::SET);
    }
}

/// A peripheral clock gate.
pub struct PeripheralClock<'a> {
    pub clock: PeripheralClockType,
    mclk: &'a Mclk,
}

impl<'a> PeripheralClock<'a> {
    pub const fn new(clock: PeripheralClockType, mclk: &'a Mclk) -> Self {
        Self { clock, mclk }
    }
}

impl ClockInterface for PeripheralClock<'_> {
    fn is_enabled(&self) -> bool {
        self.mclk.is_enabled_clock(self.clock)
    }

    fn enable(&self) {
        self.mclk.enable_clock(self.clock);
    }

    fn disable(&self) {
        self.mclk.disable_clock(self.clock);
    }
}

/// On-target checks of the MCLK state right after reset.
///
/// **NOTE:** All these tests assume default boot configuration.
pub mod tests {
    use super::*;
    use chip_common::debug;

    pub fn run(mclk: &Mclk) {
        debug!("");
        debug!("===============================================");
        debug!("Testing MCLK reset state...");

        assert_eq!(mclk.cpu_divider(), 1);
        assert_eq!(mclk.registers.ahbmask.get(), AHBMASK_RESET);
        assert_eq!(mclk.registers.apbamask.get(), APBAMASK_RESET);
        assert!(mclk.is_enabled_clock(PeripheralClockType::APBB(PCLKB::PORT)));
        assert!(!mclk.is_enabled_clock(PeripheralClockType::APBD(PCLKD::SERCOM4)));

        debug!("Finished testing MCLK reset state. Everything is alright!");
        debug!("===============================================");
        debug!("");
    }
}

#[cfg(test)]
mod register_tests {
    use super::*;
    use core::mem::{offset_of, size_of};

    #[test]
    fn layout() {
        assert_eq!(offset_of!(MclkRegisters, intenclr), 0x01);
        assert_eq!(offset_of!(MclkRegisters, cpudiv), 0x05);
        assert_eq!(offset_of!(MclkRegisters, ahbmask), 0x10);
        assert_eq!(offset_of!(MclkRegisters, apbdmask), 0x20);
        assert_eq!(size_of::<MclkRegisters>(), 0x24);
    }

    #[test]
    fn reset_masks_cover_reset_clocks() {
        // Every peripheral the chip boots with clocked is a named mask bit.
        assert_ne!(APBAMASK_RESET & (1 << PCLKA::GCLK as u32), 0);
        assert_ne!(APBBMASK_RESET & (1 << PCLKB::NVMCTRL as u32), 0);
        assert_ne!(APBBMASK_RESET & (1 << PCLKB::PORT as u32), 0);
        assert_ne!(APBBMASK_RESET & (1 << PCLKB::RAMECC as u32), 0);
        assert_ne!(APBCMASK_RESET & (1 << PCLKC::QSPI as u32), 0);
    }

    #[test]
    fn clock_gating() {
        let regs: MclkRegisters = unsafe { core::mem::zeroed() };
        let mclk = Mclk::with_registers(unsafe { StaticRef::new(&regs) });

        PeripheralClock::new(PeripheralClockType::APBD(PCLKD::SERCOM4), &mclk).enable();
        PeripheralClock::new(PeripheralClockType::APBA(PCLKA::EIC), &mclk).enable();
        PeripheralClock::new(PeripheralClockType::AHB(HCLK::NVMCTRL_CACHE), &mclk).enable();
        assert_eq!(regs.apbdmask.get(), 1);
        assert_eq!(regs.apbamask.get(), 1 << 10);
        assert_eq!(regs.ahbmask.get(), 1 << 23);

        let eic = PeripheralClock::new(PeripheralClockType::APBA(PCLKA::EIC), &mclk);
        eic.disable();
        assert!(!eic.is_enabled());
        assert_eq!(regs.apbamask.get(), 0);
    }

    #[test]
    fn cpu_divider() {
        let regs: MclkRegisters = unsafe { core::mem::zeroed() };
        let mclk = Mclk::with_registers(unsafe { StaticRef::new(&regs) });

        assert_eq!(mclk.set_cpu_divider(4), Ok(()));
        assert_eq!(mclk.cpu_divider(), 4);
        assert_eq!(mclk.set_cpu_divider(3), Err(ErrorCode::INVAL));
        assert_eq!(mclk.set_cpu_divider(256), Err(ErrorCode::INVAL));
        assert_eq!(mclk.set_cpu_divider(0), Err(ErrorCode::INVAL));
        assert_eq!(regs.cpudiv.read(CPUDIV::DIV), 4);
    }
}
