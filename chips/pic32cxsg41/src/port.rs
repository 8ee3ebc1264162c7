// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! I/O pin controller.
//!
//! The 128-pin package has four pin groups (PA to PD) of 32 pins each. Each
//! group has its own register block, 0x80 bytes apart.
//!
//! ```rust,ignore
//! let port = Port::new();
//! let led = Pin::new(PinGroup::PC, 18);
//! port.make_output(led);
//! port.set(led);
//! ```

use crate::memory_map::PORT_BASE;
use chip_common::{ErrorCode, StaticRef};
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite, WriteOnly};
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    pub GroupRegisters {
        /// Data Direction
        (0x00 => dir: ReadWrite<u32>),
        /// Data Direction Clear
        (0x04 => dirclr: ReadWrite<u32>),
        /// Data Direction Set
        (0x08 => dirset: ReadWrite<u32>),
        /// Data Direction Toggle
        (0x0c => dirtgl: ReadWrite<u32>),
        /// Data Output Value
        (0x10 => out: ReadWrite<u32>),
        /// Data Output Value Clear
        (0x14 => outclr: ReadWrite<u32>),
        /// Data Output Value Set
        (0x18 => outset: ReadWrite<u32>),
        /// Data Output Value Toggle
        (0x1c => outtgl: ReadWrite<u32>),
        /// Data Input Value
        (0x20 => in_: ReadOnly<u32>),
        /// Control
        (0x24 => ctrl: ReadWrite<u32>),
        /// Write Configuration
        (0x28 => wrconfig: WriteOnly<u32, WRCONFIG::Register>),
        /// Event Input Control
        (0x2c => evctrl: ReadWrite<u32, EVCTRL::Register>),
        /// Peripheral Multiplexing, two pins per byte
        (0x30 => pmux: [ReadWrite<u8, PMUX::Register>; 16]),
        /// Pin Configuration
        (0x40 => pincfg: [ReadWrite<u8, PINCFG::Register>; 32]),
        (0x60 => _reserved0),
        (0x80 => @END),
    },

    pub PortRegisters {
        (0x000 => group: [GroupRegisters; 4]),
        (0x200 => @END),
    }
}

register_bitfields![u8,
    pub PMUX [
        /// Peripheral Multiplexing for Odd-Numbered Pin
        PMUXO OFFSET(4) NUMBITS(4) [],
        /// Peripheral Multiplexing for Even-Numbered Pin
        PMUXE OFFSET(0) NUMBITS(4) []
    ],
    pub PINCFG [
        /// Output Driver Strength Selection
        DRVSTR OFFSET(6) NUMBITS(1) [],
        /// Pull Enable
        PULLEN OFFSET(2) NUMBITS(1) [],
        /// Input Enable
        INEN OFFSET(1) NUMBITS(1) [],
        /// Peripheral Multiplexer Enable
        PMUXEN OFFSET(0) NUMBITS(1) []
    ]
];

register_bitfields![u32,
    pub WRCONFIG [
        /// Half-Word Select
        HWSEL OFFSET(31) NUMBITS(1) [],
        /// Write PINCFG
        WRPINCFG OFFSET(30) NUMBITS(1) [],
        /// Write PMUX
        WRPMUX OFFSET(28) NUMBITS(1) [],
        /// Peripheral Multiplexing
        PMUX OFFSET(24) NUMBITS(4) [],
        /// Output Driver Strength Selection
        DRVSTR OFFSET(22) NUMBITS(1) [],
        /// Pull Enable
        PULLEN OFFSET(18) NUMBITS(1) [],
        /// Input Enable
        INEN OFFSET(17) NUMBITS(1) [],
        /// Peripheral Multiplexer Enable
        PMUXEN OFFSET(16) NUMBITS(1) [],
        /// Pin Mask for Multiple Pin Configuration
        PINMASK OFFSET(0) NUMBITS(16) []
    ],
    pub EVCTRL [
        PORTEI3 OFFSET(31) NUMBITS(1) [],
        EVACT3 OFFSET(29) NUMBITS(2) [],
        PID3 OFFSET(24) NUMBITS(5) [],
        PORTEI2 OFFSET(23) NUMBITS(1) [],
        EVACT2 OFFSET(21) NUMBITS(2) [],
        PID2 OFFSET(16) NUMBITS(5) [],
        PORTEI1 OFFSET(15) NUMBITS(1) [],
        EVACT1 OFFSET(13) NUMBITS(2) [],
        PID1 OFFSET(8) NUMBITS(5) [],
        /// PORT Event Input Enable 0
        PORTEI0 OFFSET(7) NUMBITS(1) [],
        /// PORT Event Action 0
        EVACT0 OFFSET(5) NUMBITS(2) [
            Out = 0,
            Set = 1,
            Clear = 2,
            Toggle = 3
        ],
        /// PORT Event Pin Identifier 0
        PID0 OFFSET(0) NUMBITS(5) []
    ]
];

const PORT: StaticRef<PortRegisters> =
    unsafe { StaticRef::new(PORT_BASE as *const PortRegisters) };

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PinGroup {
    PA = 0,
    PB = 1,
    PC = 2,
    PD = 3,
}

/// Peripheral function selected through `PMUX`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PeripheralFunction {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
    I = 8,
    J = 9,
    K = 10,
    L = 11,
    M = 12,
    N = 13,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Pull {
    None,
    Up,
    Down,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Pin {
    pub group: PinGroup,
    pub number: u8,
}

impl Pin {
    pub const fn new(group: PinGroup, number: u8) -> Self {
        Self { group, number }
    }

    fn mask(&self) -> u32 {
        1 << (self.number & 31)
    }
}

pub struct Port {
    registers: StaticRef<PortRegisters>,
}

impl Port {
    pub const fn new() -> Self {
        Self { registers: PORT }
    }

    fn group(&self, pin: Pin) -> Result<&GroupRegisters, ErrorCode> {
        if pin.number > 31 {
            return Err(ErrorCode::INVAL);
        }
        Ok(&self.registers.group[pin.group as usize])
    }

    pub fn make_output(&self, pin: Pin) -> Result<(), ErrorCode> {
        self.group(pin)?.dirset.set(pin.mask());
        Ok(())
    }

    /// Configure `pin` as a GPIO input with the given pull. The pull
    /// direction comes from `OUT`, as in the datasheet's pin configuration
    /// summary.
    pub fn make_input(&self, pin: Pin, pull: Pull) -> Result<(), ErrorCode> {
        let group = self.group(pin)?;
        group.dirclr.set(pin.mask());
        let pincfg = &group.pincfg[pin.number as usize];
        match pull {
            Pull::None => pincfg.write(PINCFG::INEN::SET),
            Pull::Up => {
                group.outset.set(pin.mask());
                pincfg.write(PINCFG::INEN::SET + PINCFG::PULLEN::SET);
            }
            Pull::Down => {
                group.outclr.set(pin.mask());
                pincfg.write(PINCFG::INEN::SET + PINCFG::PULLEN::SET);
            }
        }
        Ok(())
    }

    pub fn set(&self, pin: Pin) -> Result<(), ErrorCode> {
        self.group(pin)?.outset.set(pin.mask());
        Ok(())
    }

    pub fn clear(&self, pin: Pin) -> Result<(), ErrorCode> {
        self.group(pin)?.outclr.set(pin.mask());
        Ok(())
    }

    pub fn toggle(&self, pin: Pin) -> Result<(), ErrorCode> {
        self.group(pin)?.outtgl.set(pin.mask());
        Ok(())
    }

    pub fn read(&self, pin: Pin) -> Result<bool, ErrorCode> {
        Ok(self.group(pin)?.in_.get() & pin.mask() != 0)
    }

    /// Hand `pin` to a peripheral.
    pub fn set_function(&self, pin: Pin, function: PeripheralFunction) -> Result<(), ErrorCode> {
        let group = self.group(pin)?;
        let pmux = &group.pmux[pin.number as usize / 2];
        if pin.number % 2 == 0 {
            pmux.modify(PMUX::PMUXE.val(function as u8));
        } else {
            pmux.modify(PMUX::PMUXO.val(function as u8));
        }
        group.pincfg[pin.number as usize].modify(PINCFG::PMUXEN::SET);
        Ok(())
    }

    /// Give `pin` back to the GPIO controller.
    pub fn clear_function(&self, pin: Pin) -> Result<(), ErrorCode> {
        self.group(pin)?.pincfg[pin.number as usize].modify(PINCFG::PMUXEN::CLEAR);
        Ok(())
    }

    pub fn function(&self, pin: Pin) -> Result<Option<u8>, ErrorCode> {
        let group = self.group(pin)?;
        if !group.pincfg[pin.number as usize].is_set(PINCFG::PMUXEN) {
            return Ok(None);
        }
        let pmux = &group.pmux[pin.number as usize / 2];
        Ok(Some(if pin.number % 2 == 0 {
            pmux.read(PMUX::PMUXE)
        } else {
            pmux.read(PMUX::PMUXO)
        }))
    }

    /// Apply the same function and pin configuration to every pin of
    /// `mask` in one write to `WRCONFIG`.
    pub fn set_function_multiple(
        &self,
        group: PinGroup,
        mask: u32,
        function: PeripheralFunction,
    ) {
        let regs = &self.registers.group[group as usize];
        let common = WRCONFIG::WRPMUX::SET
            + WRCONFIG::WRPINCFG::SET
            + WRCONFIG::PMUXEN::SET
            + WRCONFIG::PMUX.val(function as u32);
        if mask & 0xffff != 0 {
            regs.wrconfig
                .write(common + WRCONFIG::PINMASK.val(mask & 0xffff));
        }
        if mask >> 16 != 0 {
            regs.wrconfig
                .write(common + WRCONFIG::HWSEL::SET + WRCONFIG::PINMASK.val(mask >> 16));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::{offset_of, size_of};

    fn port(regs: &PortRegisters) -> Port {
        Port {
            registers: unsafe { StaticRef::new(regs) },
        }
    }

    #[test]
    fn layout() {
        assert_eq!(offset_of!(GroupRegisters, in_), 0x20);
        assert_eq!(offset_of!(GroupRegisters, wrconfig), 0x28);
        assert_eq!(offset_of!(GroupRegisters, pmux), 0x30);
        assert_eq!(offset_of!(GroupRegisters, pincfg), 0x40);
        assert_eq!(size_of::<GroupRegisters>(), 0x80);
        assert_eq!(size_of::<PortRegisters>(), 0x200);
        assert_eq!(WRCONFIG::PMUX.mask << WRCONFIG::PMUX.shift, 0x0f00_0000);
        assert_eq!(PINCFG::DRVSTR.shift, 6);
    }

    #[test]
    fn pin_functions() {
        let regs: PortRegisters = unsafe { core::mem::zeroed() };
        let port = port(&regs);

        // SERCOM2 PAD0/PAD1 on PB24/PB25 use function D
        port.set_function(Pin::new(PinGroup::PB, 24), PeripheralFunction::D)
            .unwrap();
        port.set_function(Pin::new(PinGroup::PB, 25), PeripheralFunction::D)
            .unwrap();
        assert_eq!(regs.group[1].pmux[12].get(), 0x33);
        assert_eq!(regs.group[1].pincfg[24].get(), 0x01);
        assert_eq!(
            port.function(Pin::new(PinGroup::PB, 25)),
            Ok(Some(PeripheralFunction::D as u8))
        );

        port.clear_function(Pin::new(PinGroup::PB, 24)).unwrap();
        assert_eq!(port.function(Pin::new(PinGroup::PB, 24)), Ok(None));
        assert_eq!(
            port.set_function(Pin::new(PinGroup::PB, 32), PeripheralFunction::A),
            Err(ErrorCode::INVAL)
        );
    }

    #[test]
    fn gpio() {
        let regs: PortRegisters = unsafe { core::mem::zeroed() };
        let port = port(&regs);
        let led = Pin::new(PinGroup::PC, 18);

        port.make_output(led).unwrap();
        assert_eq!(regs.group[2].dirset.get(), 1 << 18);
        port.set(led).unwrap();
        assert_eq!(regs.group[2].outset.get(), 1 << 18);

        let button = Pin::new(PinGroup::PB, 31);
        port.make_input(button, Pull::Up).unwrap();
        assert_eq!(regs.group[1].pincfg[31].get(), 0b110);
        assert_eq!(regs.group[1].outset.get(), 1 << 31);
        assert_eq!(port.read(button), Ok(false));
    }
}
