// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Extended interrupts and events controller.
//!
//! Lines 0-31 live in the first register bank, lines 32 and up in the
//! second, which starts at offset 0x20. Lines 0-15 are the GPIO lines routed
//! through `SYSCFG_EXTICRx`; the rest are internal sources whose numbering
//! is family specific.

use chip_common::{ErrorCode, StaticRef};
use tock_registers::interfaces::{Readable, Writeable};
use tock_registers::registers::ReadWrite;
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    /// External interrupt/event controller
    pub ExtiRegisters {
        /// Interrupt mask register 1
        (0x00 => imr1: ReadWrite<u32, LINES::Register>),
        /// Event mask register 1
        (0x04 => emr1: ReadWrite<u32, LINES::Register>),
        /// Rising Trigger selection register 1
        (0x08 => rtsr1: ReadWrite<u32, LINES::Register>),
        /// Falling Trigger selection register 1
        (0x0c => ftsr1: ReadWrite<u32, LINES::Register>),
        /// Software interrupt event register 1
        (0x10 => swier1: ReadWrite<u32, LINES::Register>),
        /// Pending register 1
        (0x14 => pr1: ReadWrite<u32, LINES::Register>),
        (0x18 => _reserved0),
        /// Interrupt mask register 2
        (0x20 => imr2: ReadWrite<u32, LINES::Register>),
        /// Event mask register 2
        (0x24 => emr2: ReadWrite<u32, LINES::Register>),
        /// Rising Trigger selection register 2
        (0x28 => rtsr2: ReadWrite<u32, LINES::Register>),
        /// Falling Trigger selection register 2
        (0x2c => ftsr2: ReadWrite<u32, LINES::Register>),
        /// Software interrupt event register 2
        (0x30 => swier2: ReadWrite<u32, LINES::Register>),
        /// Pending register 2
        (0x34 => pr2: ReadWrite<u32, LINES::Register>),
        (0x38 => @END),
    }
}

register_bitfields![u32,
    pub LINES [
        /// One bit per EXTI line of the bank
        LINE OFFSET(0) NUMBITS(32) []
    ]
];

/// Highest line number with a register bit (bank 2 has 32 bits, most of
/// them reserved on any one part).
pub const MAX_LINE: u8 = 63;

/// Edge(s) that set the pending bit of a configurable line.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Trigger {
    Rising,
    Falling,
    Both,
}

pub struct Exti {
    registers: StaticRef<ExtiRegisters>,
}

impl Exti {
    pub const fn new(registers: StaticRef<ExtiRegisters>) -> Exti {
        Exti { registers }
    }

    fn bank(&self, line: u8) -> Result<(ExtiBank<'_>, u32), ErrorCode> {
        match line {
            0..=31 => Ok((self.registers_bank1(), 1 << line)),
            32..=MAX_LINE => Ok((self.registers_bank2(), 1 << (line - 32))),
            _ => Err(ErrorCode::INVAL),
        }
    }

    fn registers_bank1(&self) -> ExtiBank<'_> {
        ExtiBank {
            imr: &self.registers.imr1,
            rtsr: &self.registers.rtsr1,
            ftsr: &self.registers.ftsr1,
            swier: &self.registers.swier1,
            pr: &self.registers.pr1,
        }
    }

    fn registers_bank2(&self) -> ExtiBank<'_> {
        ExtiBank {
            imr: &self.registers.imr2,
            rtsr: &self.registers.rtsr2,
            ftsr: &self.registers.ftsr2,
            swier: &self.registers.swier2,
            pr: &self.registers.pr2,
        }
    }

    /// Unmask the interrupt of `line`.
    pub fn unmask_interrupt(&self, line: u8) -> Result<(), ErrorCode> {
        let (bank, bit) = self.bank(line)?;
        bank.imr.set(bank.imr.get() | bit);
        Ok(())
    }

    pub fn mask_interrupt(&self, line: u8) -> Result<(), ErrorCode> {
        let (bank, bit) = self.bank(line)?;
        bank.imr.set(bank.imr.get() & !bit);
        Ok(())
    }

    pub fn select_trigger(&self, line: u8, trigger: Trigger) -> Result<(), ErrorCode> {
        let (bank, bit) = self.bank(line)?;
        let (rising, falling) = match trigger {
            Trigger::Rising => (true, false),
            Trigger::Falling => (false, true),
            Trigger::Both => (true, true),
        };
        let update = |reg: &ReadWrite<u32, LINES::Register>, on: bool| {
            let value = reg.get();
            reg.set(if on { value | bit } else { value & !bit });
        };
        update(bank.rtsr, rising);
        update(bank.ftsr, falling);
        Ok(())
    }

    pub fn generate_swi(&self, line: u8) -> Result<(), ErrorCode> {
        let (bank, bit) = self.bank(line)?;
        bank.swier.set(bank.swier.get() | bit);
        Ok(())
    }

    pub fn is_pending(&self, line: u8) -> Result<bool, ErrorCode> {
        let (bank, bit) = self.bank(line)?;
        Ok(bank.pr.get() & bit != 0)
    }

    /// Pending bits are cleared by writing 1.
    pub fn clear_pending(&self, line: u8) -> Result<(), ErrorCode> {
        let (bank, bit) = self.bank(line)?;
        bank.pr.set(bit);
        Ok(())
    }
}

struct ExtiBank<'a> {
    imr: &'a ReadWrite<u32, LINES::Register>,
    rtsr: &'a ReadWrite<u32, LINES::Register>,
    ftsr: &'a ReadWrite<u32, LINES::Register>,
    swier: &'a ReadWrite<u32, LINES::Register>,
    pr: &'a ReadWrite<u32, LINES::Register>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::{offset_of, size_of};

    #[test]
    fn register_offsets() {
        assert_eq!(offset_of!(ExtiRegisters, pr1), 0x14);
        assert_eq!(offset_of!(ExtiRegisters, imr2), 0x20);
        assert_eq!(offset_of!(ExtiRegisters, pr2), 0x34);
        assert_eq!(size_of::<ExtiRegisters>(), 0x38);
    }

    #[test]
    fn lines_map_to_banks() {
        let regs: ExtiRegisters = unsafe { core::mem::zeroed() };
        let exti = Exti::new(unsafe { StaticRef::new(&regs) });

        exti.unmask_interrupt(13).unwrap();
        exti.select_trigger(13, Trigger::Falling).unwrap();
        assert_eq!(regs.imr1.get(), 1 << 13);
        assert_eq!(regs.ftsr1.get(), 1 << 13);
        assert_eq!(regs.rtsr1.get(), 0);

        exti.unmask_interrupt(35).unwrap();
        exti.select_trigger(35, Trigger::Both).unwrap();
        assert_eq!(regs.imr2.get(), 1 << 3);
        assert_eq!(regs.rtsr2.get(), 1 << 3);
        assert_eq!(regs.ftsr2.get(), 1 << 3);

        exti.select_trigger(35, Trigger::Rising).unwrap();
        assert_eq!(regs.ftsr2.get(), 0);

        assert_eq!(exti.unmask_interrupt(64), Err(ErrorCode::INVAL));
    }

    #[test]
    fn pending_is_write_one_to_clear() {
        let regs: ExtiRegisters = unsafe { core::mem::zeroed() };
        let exti = Exti::new(unsafe { StaticRef::new(&regs) });

        regs.pr1.set(1 << 0);
        assert_eq!(exti.is_pending(0), Ok(true));
        exti.clear_pending(7).unwrap();
        assert_eq!(regs.pr1.get(), 1 << 7);
    }
}
