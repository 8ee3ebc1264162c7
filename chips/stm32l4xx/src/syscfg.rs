// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! System configuration controller (RM0351, section 9).

use crate::memory_map::SYSCFG_BASE;
use chip_common::{ErrorCode, StaticRef};
use tock_registers::fields::Field;
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{ReadWrite, WriteOnly};
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    pub SyscfgRegisters {
        /// memory remap register
        (0x00 => memrmp: ReadWrite<u32, MEMRMP::Register>),
        /// configuration register 1
        (0x04 => cfgr1: ReadWrite<u32, CFGR1::Register>),
        /// external interrupt configuration registers 1 to 4
        (0x08 => exticr: [ReadWrite<u32, EXTICR::Register>; 4]),
        /// SRAM2 control and status register
        (0x18 => scsr: ReadWrite<u32, SCSR::Register>),
        /// configuration register 2
        (0x1c => cfgr2: ReadWrite<u32, CFGR2::Register>),
        /// SRAM2 write protection register
        (0x20 => swpr: ReadWrite<u32>),
        /// SRAM2 key register
        (0x24 => skr: WriteOnly<u32, SKR::Register>),
        (0x28 => @END),
    }
}

register_bitfields![u32,
    pub MEMRMP [
        /// Flash Bank mode selection
        FB_MODE OFFSET(8) NUMBITS(1) [],
        /// QUADSPI memory mapping swap
        QFS OFFSET(3) NUMBITS(1) [],
        /// Memory mapping selection
        MEM_MODE OFFSET(0) NUMBITS(3) [
            MainFlash = 0b000,
            SystemFlash = 0b001,
            FMC = 0b010,
            SRAM1 = 0b011,
            QUADSPI = 0b110
        ]
    ],
    pub CFGR1 [
        /// Floating Point Unit interrupts enable bits
        FPU_IE OFFSET(26) NUMBITS(6) [],
        /// Fast-mode Plus driver enable for I2C3
        I2C3_FMP OFFSET(22) NUMBITS(1) [],
        /// Fast-mode Plus driver enable for I2C2
        I2C2_FMP OFFSET(21) NUMBITS(1) [],
        /// Fast-mode Plus driver enable for I2C1
        I2C1_FMP OFFSET(20) NUMBITS(1) [],
        /// Fast-mode Plus (Fm+) driving capability activation on PB9
        I2C_PB9_FMP OFFSET(19) NUMBITS(1) [],
        /// Fast-mode Plus (Fm+) driving capability activation on PB8
        I2C_PB8_FMP OFFSET(18) NUMBITS(1) [],
        /// Fast-mode Plus (Fm+) driving capability activation on PB7
        I2C_PB7_FMP OFFSET(17) NUMBITS(1) [],
        /// Fast-mode Plus (Fm+) driving capability activation on PB6
        I2C_PB6_FMP OFFSET(16) NUMBITS(1) [],
        /// I/O analog switch voltage booster enable
        BOOSTEN OFFSET(8) NUMBITS(1) [],
        /// Firewall disable
        FWDIS OFFSET(0) NUMBITS(1) []
    ],
    pub EXTICR [
        EXTI3 OFFSET(12) NUMBITS(4) [],
        EXTI2 OFFSET(8) NUMBITS(4) [],
        EXTI1 OFFSET(4) NUMBITS(4) [],
        EXTI0 OFFSET(0) NUMBITS(4) []
    ],
    pub SCSR [
        /// SRAM2 busy by erase operation
        SRAM2BSY OFFSET(1) NUMBITS(1) [],
        /// SRAM2 Erase
        SRAM2ER OFFSET(0) NUMBITS(1) []
    ],
    pub CFGR2 [
        /// SRAM2 parity error flag
        SPF OFFSET(8) NUMBITS(1) [],
        /// ECC Lock
        ECCL OFFSET(3) NUMBITS(1) [],
        /// PVD lock enable bit
        PVDL OFFSET(2) NUMBITS(1) [],
        /// SRAM2 parity lock bit
        SPL OFFSET(1) NUMBITS(1) [],
        /// Cortex-M4 LOCKUP (Hardfault) output enable bit
        CLL OFFSET(0) NUMBITS(1) []
    ],
    pub SKR [
        /// SRAM2 write protection key for software erase
        KEY OFFSET(0) NUMBITS(8) []
    ]
];

pub const SRAM2_KEY1: u32 = 0xCA;
pub const SRAM2_KEY2: u32 = 0x53;

const SYSCFG: StaticRef<SyscfgRegisters> =
    unsafe { StaticRef::new(SYSCFG_BASE as *const SyscfgRegisters) };

/// GPIO port routed to an EXTI line.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u32)]
pub enum ExtiPort {
    PA = 0b000,
    PB = 0b001,
    PC = 0b010,
    PD = 0b011,
    PE = 0b100,
    PF = 0b101,
    PG = 0b110,
    PH = 0b111,
}

pub struct Syscfg {
    registers: StaticRef<SyscfgRegisters>,
}

impl Syscfg {
    pub const fn new() -> Self {
        Self { registers: SYSCFG }
    }

    /// Route `port`'s pin `pin` to EXTI line `pin`.
    pub fn configure_interrupt(&self, port: ExtiPort, pin: usize) -> Result<(), ErrorCode> {
        if pin > 15 {
            return Err(ErrorCode::INVAL);
        }
        let field = Field::<u32, EXTICR::Register>::new(0b1111, (pin % 4) * 4);
        self.registers.exticr[pin / 4].modify(field.val(port as u32));
        Ok(())
    }

    /// Port currently routed to EXTI line `pin`, as its raw selector.
    pub fn interrupt_port(&self, pin: usize) -> Result<u32, ErrorCode> {
        if pin > 15 {
            return Err(ErrorCode::INVAL);
        }
        let field = Field::<u32, EXTICR::Register>::new(0b1111, (pin % 4) * 4);
        Ok(self.registers.exticr[pin / 4].read(field))
    }

    pub fn set_memory_mode(&self, mode: MEMRMP::MEM_MODE::Value) {
        self.registers
            .memrmp
            .modify(MEMRMP::MEM_MODE.val(mode as u32));
    }

    /// Start a software erase of SRAM2.
    pub fn erase_sram2(&self) {
        self.registers.skr.write(SKR::KEY.val(SRAM2_KEY1));
        self.registers.skr.write(SKR::KEY.val(SRAM2_KEY2));
        self.registers.scsr.modify(SCSR::SRAM2ER::SET);
    }

    pub fn is_sram2_busy(&self) -> bool {
        self.registers.scsr.is_set(SCSR::SRAM2BSY)
    }

    /// Write-protect 1 KiB pages of SRAM2, one bit per page. The protection
    /// is only cleared by a system reset.
    pub fn protect_sram2_pages(&self, pages: u32) {
        self.registers.swpr.set(pages);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::{offset_of, size_of};

    #[test]
    fn layout() {
        assert_eq!(offset_of!(SyscfgRegisters, cfgr1), 0x04);
        assert_eq!(offset_of!(SyscfgRegisters, exticr), 0x08);
        assert_eq!(offset_of!(SyscfgRegisters, scsr), 0x18);
        assert_eq!(offset_of!(SyscfgRegisters, skr), 0x24);
        assert_eq!(size_of::<SyscfgRegisters>(), 0x28);
        assert_eq!(SYSCFG_BASE, 0x4001_0000);
        assert_eq!(MEMRMP::MEM_MODE.mask, 0b111);
        assert_eq!(CFGR2::SPF.shift, 8);
    }

    #[test]
    fn exti_routing() {
        let regs: SyscfgRegisters = unsafe { core::mem::zeroed() };
        let syscfg = Syscfg {
            registers: unsafe { StaticRef::new(&regs) },
        };

        syscfg.configure_interrupt(ExtiPort::PH, 5).unwrap();
        syscfg.configure_interrupt(ExtiPort::PC, 13).unwrap();
        assert_eq!(regs.exticr[1].get(), 0b111 << 4);
        assert_eq!(regs.exticr[3].get(), 0b010 << 4);
        assert_eq!(syscfg.interrupt_port(5), Ok(ExtiPort::PH as u32));
        assert_eq!(syscfg.interrupt_port(16), Err(ErrorCode::INVAL));
    }

    #[test]
    fn sram2_erase_sequence() {
        let regs: SyscfgRegisters = unsafe { core::mem::zeroed() };
        let syscfg = Syscfg {
            registers: unsafe { StaticRef::new(&regs) },
        };
        syscfg.erase_sram2();
        let skr = unsafe { core::ptr::read_volatile(core::ptr::addr_of!(regs.skr) as *const u32) };
        assert_eq!(skr, SRAM2_KEY2);
        assert!(regs.scsr.is_set(SCSR::SRAM2ER));
    }
}
