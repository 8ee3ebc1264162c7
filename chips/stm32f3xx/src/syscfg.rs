// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! System configuration controller (RM0316, section 12).

use crate::memory_map::SYSCFG_BASE;
use chip_common::{ErrorCode, StaticRef};
use tock_registers::fields::Field;
use tock_registers::interfaces::{ReadWriteable, Readable};
use tock_registers::registers::ReadWrite;
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    pub SyscfgRegisters {
        /// configuration register 1
        (0x00 => cfgr1: ReadWrite<u32, CFGR1::Register>),
        /// CCM SRAM protection register
        (0x04 => rcr: ReadWrite<u32, RCR::Register>),
        /// external interrupt configuration registers 1 to 4
        (0x08 => exticr: [ReadWrite<u32, EXTICR::Register>; 4]),
        /// configuration register 2
        (0x18 => cfgr2: ReadWrite<u32, CFGR2::Register>),
        (0x1c => @END),
    }
}

register_bitfields![u32,
    pub CFGR1 [
        /// Interrupt enable bits from FPU
        FPU_IE OFFSET(26) NUMBITS(6) [],
        /// Encoder mode
        ENCODER_MODE OFFSET(22) NUMBITS(2) [],
        /// FM+ driving capability activation for I2C2
        I2C2_FMP OFFSET(21) NUMBITS(1) [],
        /// FM+ driving capability activation for I2C1
        I2C1_FMP OFFSET(20) NUMBITS(1) [],
        /// Fast Mode Plus (FM+) driving capability activation bits
        I2C_PB9_FMP OFFSET(19) NUMBITS(1) [],
        I2C_PB8_FMP OFFSET(18) NUMBITS(1) [],
        I2C_PB7_FMP OFFSET(17) NUMBITS(1) [],
        I2C_PB6_FMP OFFSET(16) NUMBITS(1) [],
        /// DAC2 channel1 DMA remap
        DAC2_CH1_DMA_RMP OFFSET(15) NUMBITS(1) [],
        /// TIM7 and DAC2 DMA request remapping bit
        TIM7_DAC2_DMA_RMP OFFSET(14) NUMBITS(1) [],
        /// TIM6 and DAC1 DMA request remapping bit
        TIM6_DAC1_DMA_RMP OFFSET(13) NUMBITS(1) [],
        /// TIM17 DMA request remapping bit
        TIM17_DMA_RMP OFFSET(12) NUMBITS(1) [],
        /// TIM16 DMA request remapping bit
        TIM16_DMA_RMP OFFSET(11) NUMBITS(1) [],
        /// ADC24 DMA remapping bit
        ADC24_DMA_RMP OFFSET(8) NUMBITS(1) [],
        /// DAC trigger remap (when TSEL = 001)
        DAC_TRIG_RMP OFFSET(7) NUMBITS(1) [],
        /// Timer 1 ITR3 selection
        TIM1_ITR3_RMP OFFSET(6) NUMBITS(1) [],
        /// USB interrupt remap
        USB_IT_RMP OFFSET(5) NUMBITS(1) [],
        /// Memory mapping selection bits
        MEM_MODE OFFSET(0) NUMBITS(2) [
            MainFlash = 0b00,
            SystemFlash = 0b01,
            SRAM = 0b11
        ]
    ],
    pub RCR [
        /// CCM SRAM page write protection bits
        PAGE_WP OFFSET(0) NUMBITS(8) []
    ],
    pub EXTICR [
        EXTI3 OFFSET(12) NUMBITS(4) [],
        EXTI2 OFFSET(8) NUMBITS(4) [],
        EXTI1 OFFSET(4) NUMBITS(4) [],
        EXTI0 OFFSET(0) NUMBITS(4) []
    ],
    pub CFGR2 [
        /// SRAM parity flag
        SRAM_PEF OFFSET(8) NUMBITS(1) [],
        /// Bypass address bit 29 in parity calculation
        BYP_ADDR_PAR OFFSET(4) NUMBITS(1) [],
        /// PVD lock enable bit
        PVD_LOCK OFFSET(2) NUMBITS(1) [],
        /// SRAM parity lock bit
        SRAM_PARITY_LOCK OFFSET(1) NUMBITS(1) [],
        /// Cortex-M4 LOCKUP (Hardfault) output enable bit
        LOCKUP_LOCK OFFSET(0) NUMBITS(1) []
    ]
];

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

    pub fn set_memory_mode(&self, mode: CFGR1::MEM_MODE::Value) {
        self.registers.cfgr1.modify(CFGR1::MEM_MODE.val(mode as u32));
    }

    /// Write-protect CCM SRAM pages. The protection is only cleared by a
    /// system reset.
    pub fn protect_ccm_pages(&self, pages: u8) {
        self.registers.rcr.modify(RCR::PAGE_WP.val(pages as u32));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::{offset_of, size_of};

    #[test]
    fn layout() {
        assert_eq!(offset_of!(SyscfgRegisters, rcr), 0x04);
        assert_eq!(offset_of!(SyscfgRegisters, exticr), 0x08);
        assert_eq!(offset_of!(SyscfgRegisters, cfgr2), 0x18);
        assert_eq!(size_of::<SyscfgRegisters>(), 0x1c);
        assert_eq!(CFGR1::FPU_IE.mask << CFGR1::FPU_IE.shift, 0xfc00_0000);
        assert_eq!(CFGR2::SRAM_PEF.shift, 8);
    }

    #[test]
    fn exti_routing() {
        let regs: SyscfgRegisters = unsafe { core::mem::zeroed() };
        let syscfg = Syscfg {
            registers: unsafe { StaticRef::new(&regs) },
        };

        syscfg.configure_interrupt(ExtiPort::PC, 13).unwrap();
        syscfg.configure_interrupt(ExtiPort::PB, 0).unwrap();
        assert_eq!(regs.exticr[3].get(), 0b010 << 4);
        assert_eq!(regs.exticr[0].get(), 0b001);
        assert_eq!(syscfg.interrupt_port(13), Ok(ExtiPort::PC as u32));
        assert_eq!(
            syscfg.configure_interrupt(ExtiPort::PA, 16),
            Err(ErrorCode::INVAL)
        );
    }
}
