// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! External interrupt controller: 16 lines, each routed from one pin per
//! line number (EXTINT[n]) through the PORT function A mux.
//!
//! `CONFIGn`, `ASYNCH`, `DEBOUNCEN`, `DPRESCALER` and `CTRLA.CKSEL` can only
//! be written while the controller is disabled.

use crate::memory_map::EIC_BASE;
use chip_common::{ErrorCode, StaticRef};
use tock_registers::fields::Field;
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite};
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    pub EicRegisters {
        /// Control A
        (0x00 => ctrla: ReadWrite<u8, CTRLA::Register>),
        /// Non-Maskable Interrupt Control
        (0x01 => nmictrl: ReadWrite<u8, NMICTRL::Register>),
        /// Non-Maskable Interrupt Flag Status and Clear
        (0x02 => nmiflag: ReadWrite<u16>),
        /// Synchronization Busy
        (0x04 => syncbusy: ReadOnly<u32, SYNCBUSY::Register>),
        /// Event Control
        (0x08 => evctrl: ReadWrite<u32>),
        /// Interrupt Enable Clear
        (0x0c => intenclr: ReadWrite<u32>),
        /// Interrupt Enable Set
        (0x10 => intenset: ReadWrite<u32>),
        /// Interrupt Flag Status and Clear
        (0x14 => intflag: ReadWrite<u32>),
        /// External Interrupt Asynchronous Mode
        (0x18 => asynch: ReadWrite<u32>),
        /// External Interrupt Sense Configuration, lines 0-7 and 8-15
        (0x1c => config: [ReadWrite<u32, CONFIG::Register>; 2]),
        (0x24 => _reserved0),
        /// Debouncer Enable
        (0x30 => debouncen: ReadWrite<u32>),
        /// Debouncer Prescaler
        (0x34 => dprescaler: ReadWrite<u32, DPRESCALER::Register>),
        /// Pin State
        (0x38 => pinstate: ReadOnly<u32>),
        (0x3c => @END),
    }
}

register_bitfields![u8,
    pub CTRLA [
        /// Clock Selection
        CKSEL OFFSET(4) NUMBITS(1) [
            GCLK = 0,
            CLK_ULP32K = 1
        ],
        /// Enable
        ENABLE OFFSET(1) NUMBITS(1) [],
        /// Software Reset
        SWRST OFFSET(0) NUMBITS(1) []
    ],
    pub NMICTRL [
        /// Asynchronous Edge Detection Mode
        NMIASYNCH OFFSET(4) NUMBITS(1) [],
        /// Non-Maskable Interrupt Filter Enable
        NMIFILTEN OFFSET(3) NUMBITS(1) [],
        /// Non-Maskable Interrupt Sense Configuration
        NMISENSE OFFSET(0) NUMBITS(3) []
    ]
];

register_bitfields![u32,
    pub SYNCBUSY [
        /// Enable Synchronization Busy Status
        ENABLE OFFSET(1) NUMBITS(1) [],
        /// Software Reset Synchronization Busy Status
        SWRST OFFSET(0) NUMBITS(1) []
    ],
    pub CONFIG [
        FILTEN7 OFFSET(31) NUMBITS(1) [],
        SENSE7 OFFSET(28) NUMBITS(3) [],
        FILTEN6 OFFSET(27) NUMBITS(1) [],
        SENSE6 OFFSET(24) NUMBITS(3) [],
        FILTEN5 OFFSET(23) NUMBITS(1) [],
        SENSE5 OFFSET(20) NUMBITS(3) [],
        FILTEN4 OFFSET(19) NUMBITS(1) [],
        SENSE4 OFFSET(16) NUMBITS(3) [],
        FILTEN3 OFFSET(15) NUMBITS(1) [],
        SENSE3 OFFSET(12) NUMBITS(3) [],
        FILTEN2 OFFSET(11) NUMBITS(1) [],
        SENSE2 OFFSET(8) NUMBITS(3) [],
        FILTEN1 OFFSET(7) NUMBITS(1) [],
        SENSE1 OFFSET(4) NUMBITS(3) [],
        /// Filter Enable 0
        FILTEN0 OFFSET(3) NUMBITS(1) [],
        /// Input Sense Configuration 0
        SENSE0 OFFSET(0) NUMBITS(3) [
            None = 0,
            Rise = 1,
            Fall = 2,
            Both = 3,
            High = 4,
            Low = 5
        ]
    ],
    pub DPRESCALER [
        /// Pin Sampler frequency selection
        TICKON OFFSET(16) NUMBITS(1) [],
        /// Debouncer number of states for lines 8-15
        STATES1 OFFSET(7) NUMBITS(1) [],
        /// Debouncer Prescaler for lines 8-15
        PRESCALER1 OFFSET(4) NUMBITS(3) [],
        /// Debouncer number of states for lines 0-7
        STATES0 OFFSET(3) NUMBITS(1) [],
        /// Debouncer Prescaler for lines 0-7
        PRESCALER0 OFFSET(0) NUMBITS(3) []
    ]
];

const EIC: StaticRef<EicRegisters> = unsafe { StaticRef::new(EIC_BASE as *const EicRegisters) };

pub const NUM_LINES: usize = 16;

/// Input sense configuration of a line.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sense {
    None = 0,
    Rise = 1,
    Fall = 2,
    Both = 3,
    High = 4,
    Low = 5,
}

impl Sense {
    fn from_bits(bits: u32) -> Option<Sense> {
        match bits {
            0 => Some(Sense::None),
            1 => Some(Sense::Rise),
            2 => Some(Sense::Fall),
            3 => Some(Sense::Both),
            4 => Some(Sense::High),
            5 => Some(Sense::Low),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ClockSelect {
    Gclk,
    Ulp32k,
}

/// `SENSEx` and `FILTENx` of `line` within its `CONFIGn` register.
fn sense_field(line: usize) -> Field<u32, CONFIG::Register> {
    Field::new(0b111, 4 * (line % 8))
}

fn filten_field(line: usize) -> Field<u32, CONFIG::Register> {
    Field::new(1, 4 * (line % 8) + 3)
}

pub struct Eic {
    registers: StaticRef<EicRegisters>,
}

impl Eic {
    pub const fn new() -> Eic {
        Eic { registers: EIC }
    }

    #[cfg(test)]
    pub(crate) fn with_registers(registers: StaticRef<EicRegisters>) -> Eic {
        Eic { registers }
    }

    pub fn enable(&self) {
        self.registers.ctrla.modify(CTRLA::ENABLE::SET);
    }

    pub fn disable(&self) {
        self.registers.ctrla.modify(CTRLA::ENABLE::CLEAR);
    }

    pub fn is_enabled(&self) -> bool {
        self.registers.ctrla.is_set(CTRLA::ENABLE)
    }

    pub fn is_syncing(&self) -> bool {
        self.registers.syncbusy.is_set(SYNCBUSY::ENABLE)
            || self.registers.syncbusy.is_set(SYNCBUSY::SWRST)
    }

    fn check_writable(&self, line: usize) -> Result<(), ErrorCode> {
        if line >= NUM_LINES {
            Err(ErrorCode::INVAL)
        } else if self.is_enabled() {
            Err(ErrorCode::BUSY)
        } else {
            Ok(())
        }
    }

    pub fn set_clock_source(&self, clock: ClockSelect) -> Result<(), ErrorCode> {
        if self.is_enabled() {
            return Err(ErrorCode::BUSY);
        }
        match clock {
            ClockSelect::Gclk => self.registers.ctrla.modify(CTRLA::CKSEL::GCLK),
            ClockSelect::Ulp32k => self.registers.ctrla.modify(CTRLA::CKSEL::CLK_ULP32K),
        }
        Ok(())
    }

    pub fn configure_line(&self, line: usize, sense: Sense, filter: bool) -> Result<(), ErrorCode> {
        self.check_writable(line)?;
        self.registers.config[line / 8]
            .modify(sense_field(line).val(sense as u32) + filten_field(line).val(filter as u32));
        Ok(())
    }

    /// Sense and filter setting of `line`.
    pub fn line_config(&self, line: usize) -> Option<(Sense, bool)> {
        let config = self.registers.config.get(line / 8)?;
        let sense = Sense::from_bits(config.read(sense_field(line)))?;
        Some((sense, config.is_set(filten_field(line))))
    }

    /// Bypass the synchronizer on `line` so it can wake the device without
    /// a running GCLK.
    pub fn set_asynchronous(&self, line: usize, asynchronous: bool) -> Result<(), ErrorCode> {
        self.check_writable(line)?;
        let bit = Field::<u32, ()>::new(1, line);
        self.registers.asynch.modify(bit.val(asynchronous as u32));
        Ok(())
    }

    /// Enable the debouncer on every line set in `mask`.
    pub fn set_debounce(&self, mask: u16) -> Result<(), ErrorCode> {
        if self.is_enabled() {
            return Err(ErrorCode::BUSY);
        }
        self.registers.debouncen.set(mask as u32);
        Ok(())
    }

    pub fn enable_interrupt(&self, line: usize) -> Result<(), ErrorCode> {
        if line >= NUM_LINES {
            return Err(ErrorCode::INVAL);
        }
        self.registers.intenset.set(1 << line);
        Ok(())
    }

    pub fn disable_interrupt(&self, line: usize) -> Result<(), ErrorCode> {
        if line >= NUM_LINES {
            return Err(ErrorCode::INVAL);
        }
        self.registers.intenclr.set(1 << line);
        Ok(())
    }

    pub fn pending(&self) -> u16 {
        self.registers.intflag.get() as u16
    }

    pub fn clear_pending(&self, line: usize) {
        if line < NUM_LINES {
            self.registers.intflag.set(1 << line);
        }
    }

    pub fn pin_state(&self, line: usize) -> bool {
        line < NUM_LINES && self.registers.pinstate.get() & (1 << line) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::{offset_of, size_of};

    #[test]
    fn layout() {
        assert_eq!(offset_of!(EicRegisters, nmiflag), 0x02);
        assert_eq!(offset_of!(EicRegisters, syncbusy), 0x04);
        assert_eq!(offset_of!(EicRegisters, intflag), 0x14);
        assert_eq!(offset_of!(EicRegisters, config), 0x1c);
        assert_eq!(offset_of!(EicRegisters, debouncen), 0x30);
        assert_eq!(offset_of!(EicRegisters, pinstate), 0x38);
        assert_eq!(size_of::<EicRegisters>(), 0x3c);
    }

    #[test]
    fn line_fields_match_named_fields() {
        assert_eq!(sense_field(0).shift, CONFIG::SENSE0.shift);
        assert_eq!(sense_field(13).shift, CONFIG::SENSE5.shift);
        assert_eq!(filten_field(7).shift, CONFIG::FILTEN7.shift);
        assert_eq!(sense_field(7).mask, CONFIG::SENSE7.mask);
    }

    #[test]
    fn configure_lines() {
        let regs: EicRegisters = unsafe { core::mem::zeroed() };
        let eic = Eic::with_registers(unsafe { StaticRef::new(&regs) });

        eic.configure_line(2, Sense::Fall, true).unwrap();
        eic.configure_line(9, Sense::Both, false).unwrap();
        assert_eq!(regs.config[0].get(), 0xa00);
        assert_eq!(regs.config[1].get(), 0x30);
        assert_eq!(eic.line_config(2), Some((Sense::Fall, true)));
        assert_eq!(eic.line_config(9), Some((Sense::Both, false)));
        assert_eq!(eic.line_config(16), None);
        assert_eq!(eic.configure_line(16, Sense::Rise, false), Err(ErrorCode::INVAL));

        eic.set_asynchronous(15, true).unwrap();
        assert_eq!(regs.asynch.get(), 1 << 15);

        eic.enable();
        assert_eq!(eic.configure_line(3, Sense::Rise, false), Err(ErrorCode::BUSY));
        assert_eq!(eic.set_debounce(0xffff), Err(ErrorCode::BUSY));
        assert_eq!(eic.set_clock_source(ClockSelect::Ulp32k), Err(ErrorCode::BUSY));
        assert_eq!(regs.config[0].get(), 0xa00);
    }

    #[test]
    fn interrupts() {
        let regs: EicRegisters = unsafe { core::mem::zeroed() };
        let eic = Eic::with_registers(unsafe { StaticRef::new(&regs) });

        eic.enable_interrupt(4).unwrap();
        assert_eq!(regs.intenset.get(), 1 << 4);
        assert_eq!(eic.enable_interrupt(20), Err(ErrorCode::INVAL));
        regs.intflag.set(0x0001_0010);
        assert_eq!(eic.pending(), 0x10);
    }
}
