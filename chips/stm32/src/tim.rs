// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! General-purpose timers TIM2, TIM3 and TIM4.
//!
//! TIM2 is 32 bits wide on both families; `CNT`, `ARR` and `CCRx` of TIM3
//! and TIM4 only implement the low 16 bits.

use chip_common::{ErrorCode, StaticRef};
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{ReadWrite, WriteOnly};
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    /// General purpose timer
    pub TimRegisters {
        /// control register 1
        (0x00 => cr1: ReadWrite<u32, CR1::Register>),
        /// control register 2
        (0x04 => cr2: ReadWrite<u32, CR2::Register>),
        /// slave mode control register
        (0x08 => smcr: ReadWrite<u32, SMCR::Register>),
        /// DMA/Interrupt enable register
        (0x0c => dier: ReadWrite<u32, DIER::Register>),
        /// status register
        (0x10 => sr: ReadWrite<u32, SR::Register>),
        /// event generation register
        (0x14 => egr: WriteOnly<u32, EGR::Register>),
        /// capture/compare mode register 1
        (0x18 => ccmr1: ReadWrite<u32, CCMR1::Register>),
        /// capture/compare mode register 2
        (0x1c => ccmr2: ReadWrite<u32, CCMR2::Register>),
        /// capture/compare enable register
        (0x20 => ccer: ReadWrite<u32, CCER::Register>),
        /// counter
        (0x24 => cnt: ReadWrite<u32>),
        /// prescaler
        (0x28 => psc: ReadWrite<u32, PSC::Register>),
        /// auto-reload register
        (0x2c => arr: ReadWrite<u32>),
        (0x30 => _reserved0),
        /// capture/compare register 1
        (0x34 => ccr1: ReadWrite<u32>),
        /// capture/compare register 2
        (0x38 => ccr2: ReadWrite<u32>),
        /// capture/compare register 3
        (0x3c => ccr3: ReadWrite<u32>),
        /// capture/compare register 4
        (0x40 => ccr4: ReadWrite<u32>),
        (0x44 => _reserved1),
        /// DMA control register
        (0x48 => dcr: ReadWrite<u32, DCR::Register>),
        /// DMA address for full transfer
        (0x4c => dmar: ReadWrite<u32>),
        (0x50 => @END),
    }
}

register_bitfields![u32,
    pub CR1 [
        /// UIF status bit remapping
        UIFREMAP OFFSET(11) NUMBITS(1) [],
        /// Clock division
        CKD OFFSET(8) NUMBITS(2) [],
        /// Auto-reload preload enable
        ARPE OFFSET(7) NUMBITS(1) [],
        /// Center-aligned mode selection
        CMS OFFSET(5) NUMBITS(2) [],
        /// Direction
        DIR OFFSET(4) NUMBITS(1) [],
        /// One-pulse mode
        OPM OFFSET(3) NUMBITS(1) [],
        /// Update request source
        URS OFFSET(2) NUMBITS(1) [],
        /// Update disable
        UDIS OFFSET(1) NUMBITS(1) [],
        /// Counter enable
        CEN OFFSET(0) NUMBITS(1) []
    ],
    pub CR2 [
        /// TI1 selection
        TI1S OFFSET(7) NUMBITS(1) [],
        /// Master mode selection
        MMS OFFSET(4) NUMBITS(3) [],
        /// Capture/compare DMA selection
        CCDS OFFSET(3) NUMBITS(1) []
    ],
    pub SMCR [
        /// Slave mode selection bit 3
        SMS_3 OFFSET(16) NUMBITS(1) [],
        /// External trigger polarity
        ETP OFFSET(15) NUMBITS(1) [],
        /// External clock enable
        ECE OFFSET(14) NUMBITS(1) [],
        /// External trigger prescaler
        ETPS OFFSET(12) NUMBITS(2) [],
        /// External trigger filter
        ETF OFFSET(8) NUMBITS(4) [],
        /// Master/Slave mode
        MSM OFFSET(7) NUMBITS(1) [],
        /// Trigger selection
        TS OFFSET(4) NUMBITS(3) [],
        /// OCREF clear selection
        OCCS OFFSET(3) NUMBITS(1) [],
        /// Slave mode selection
        SMS OFFSET(0) NUMBITS(3) []
    ],
    pub DIER [
        /// Trigger DMA request enable
        TDE OFFSET(14) NUMBITS(1) [],
        /// Capture/Compare 4 DMA request enable
        CC4DE OFFSET(12) NUMBITS(1) [],
        /// Capture/Compare 3 DMA request enable
        CC3DE OFFSET(11) NUMBITS(1) [],
        /// Capture/Compare 2 DMA request enable
        CC2DE OFFSET(10) NUMBITS(1) [],
        /// Capture/Compare 1 DMA request enable
        CC1DE OFFSET(9) NUMBITS(1) [],
        /// Update DMA request enable
        UDE OFFSET(8) NUMBITS(1) [],
        /// Trigger interrupt enable
        TIE OFFSET(6) NUMBITS(1) [],
        /// Capture/Compare 4 interrupt enable
        CC4IE OFFSET(4) NUMBITS(1) [],
        /// Capture/Compare 3 interrupt enable
        CC3IE OFFSET(3) NUMBITS(1) [],
        /// Capture/Compare 2 interrupt enable
        CC2IE OFFSET(2) NUMBITS(1) [],
        /// Capture/Compare 1 interrupt enable
        CC1IE OFFSET(1) NUMBITS(1) [],
        /// Update interrupt enable
        UIE OFFSET(0) NUMBITS(1) []
    ],
    pub SR [
        /// Capture/Compare 4 overcapture flag
        CC4OF OFFSET(12) NUMBITS(1) [],
        /// Capture/Compare 3 overcapture flag
        CC3OF OFFSET(11) NUMBITS(1) [],
        /// Capture/compare 2 overcapture flag
        CC2OF OFFSET(10) NUMBITS(1) [],
        /// Capture/Compare 1 overcapture flag
        CC1OF OFFSET(9) NUMBITS(1) [],
        /// Trigger interrupt flag
        TIF OFFSET(6) NUMBITS(1) [],
        /// Capture/Compare 4 interrupt flag
        CC4IF OFFSET(4) NUMBITS(1) [],
        /// Capture/Compare 3 interrupt flag
        CC3IF OFFSET(3) NUMBITS(1) [],
        /// Capture/compare 2 interrupt flag
        CC2IF OFFSET(2) NUMBITS(1) [],
        /// Capture/compare 1 interrupt flag
        CC1IF OFFSET(1) NUMBITS(1) [],
        /// Update interrupt flag
        UIF OFFSET(0) NUMBITS(1) []
    ],
    pub EGR [
        /// Trigger generation
        TG OFFSET(6) NUMBITS(1) [],
        /// Capture/compare 4 generation
        CC4G OFFSET(4) NUMBITS(1) [],
        /// Capture/compare 3 generation
        CC3G OFFSET(3) NUMBITS(1) [],
        /// Capture/compare 2 generation
        CC2G OFFSET(2) NUMBITS(1) [],
        /// Capture/compare 1 generation
        CC1G OFFSET(1) NUMBITS(1) [],
        /// Update generation
        UG OFFSET(0) NUMBITS(1) []
    ],
    pub CCMR1 [
        /// Output compare 2 mode bit 3
        OC2M_3 OFFSET(24) NUMBITS(1) [],
        /// Output compare 1 mode bit 3
        OC1M_3 OFFSET(16) NUMBITS(1) [],
        /// Output compare 2 clear enable
        OC2CE OFFSET(15) NUMBITS(1) [],
        /// Output compare 2 mode
        OC2M OFFSET(12) NUMBITS(3) [],
        /// Output compare 2 preload enable
        OC2PE OFFSET(11) NUMBITS(1) [],
        /// Output compare 2 fast enable
        OC2FE OFFSET(10) NUMBITS(1) [],
        /// Capture/Compare 2 selection
        CC2S OFFSET(8) NUMBITS(2) [],
        /// Output compare 1 clear enable
        OC1CE OFFSET(7) NUMBITS(1) [],
        /// Output compare 1 mode
        OC1M OFFSET(4) NUMBITS(3) [],
        /// Output compare 1 preload enable
        OC1PE OFFSET(3) NUMBITS(1) [],
        /// Output compare 1 fast enable
        OC1FE OFFSET(2) NUMBITS(1) [],
        /// Capture/Compare 1 selection
        CC1S OFFSET(0) NUMBITS(2) [],
        /// Input capture 2 filter
        IC2F OFFSET(12) NUMBITS(4) [],
        /// Input capture 2 prescaler
        IC2PSC OFFSET(10) NUMBITS(2) [],
        /// Input capture 1 filter
        IC1F OFFSET(4) NUMBITS(4) [],
        /// Input capture 1 prescaler
        IC1PSC OFFSET(2) NUMBITS(2) []
    ],
    pub CCMR2 [
        /// Output compare 4 mode bit 3
        OC4M_3 OFFSET(24) NUMBITS(1) [],
        /// Output compare 3 mode bit 3
        OC3M_3 OFFSET(16) NUMBITS(1) [],
        /// Output compare 4 clear enable
        OC4CE OFFSET(15) NUMBITS(1) [],
        /// Output compare 4 mode
        OC4M OFFSET(12) NUMBITS(3) [],
        /// Output compare 4 preload enable
        OC4PE OFFSET(11) NUMBITS(1) [],
        /// Output compare 4 fast enable
        OC4FE OFFSET(10) NUMBITS(1) [],
        /// Capture/Compare 4 selection
        CC4S OFFSET(8) NUMBITS(2) [],
        /// Output compare 3 clear enable
        OC3CE OFFSET(7) NUMBITS(1) [],
        /// Output compare 3 mode
        OC3M OFFSET(4) NUMBITS(3) [],
        /// Output compare 3 preload enable
        OC3PE OFFSET(3) NUMBITS(1) [],
        /// Output compare 3 fast enable
        OC3FE OFFSET(2) NUMBITS(1) [],
        /// Capture/Compare 3 selection
        CC3S OFFSET(0) NUMBITS(2) [],
        /// Input capture 4 filter
        IC4F OFFSET(12) NUMBITS(4) [],
        /// Input capture 4 prescaler
        IC4PSC OFFSET(10) NUMBITS(2) [],
        /// Input capture 3 filter
        IC3F OFFSET(4) NUMBITS(4) [],
        /// Input capture 3 prescaler
        IC3PSC OFFSET(2) NUMBITS(2) []
    ],
    pub CCER [
        /// Capture/Compare 4 output Polarity
        CC4NP OFFSET(15) NUMBITS(1) [],
        /// Capture/Compare 4 output Polarity
        CC4P OFFSET(13) NUMBITS(1) [],
        /// Capture/Compare 4 output enable
        CC4E OFFSET(12) NUMBITS(1) [],
        /// Capture/Compare 3 output Polarity
        CC3NP OFFSET(11) NUMBITS(1) [],
        /// Capture/Compare 3 output Polarity
        CC3P OFFSET(9) NUMBITS(1) [],
        /// Capture/Compare 3 output enable
        CC3E OFFSET(8) NUMBITS(1) [],
        /// Capture/Compare 2 output Polarity
        CC2NP OFFSET(7) NUMBITS(1) [],
        /// Capture/Compare 2 output Polarity
        CC2P OFFSET(5) NUMBITS(1) [],
        /// Capture/Compare 2 output enable
        CC2E OFFSET(4) NUMBITS(1) [],
        /// Capture/Compare 1 output Polarity
        CC1NP OFFSET(3) NUMBITS(1) [],
        /// Capture/Compare 1 output Polarity
        CC1P OFFSET(1) NUMBITS(1) [],
        /// Capture/Compare 1 output enable
        CC1E OFFSET(0) NUMBITS(1) []
    ],
    pub PSC [
        /// Prescaler value
        PSC OFFSET(0) NUMBITS(16) []
    ],
    pub DCR [
        /// DMA burst length
        DBL OFFSET(8) NUMBITS(5) [],
        /// DMA base address
        DBA OFFSET(0) NUMBITS(5) []
    ]
];

pub struct Tim {
    registers: StaticRef<TimRegisters>,
}

impl Tim {
    pub const fn new(registers: StaticRef<TimRegisters>) -> Tim {
        Tim { registers }
    }

    /// Upcounting timer ticking at `tick_hz` from a `timer_clock` input.
    /// The prescaler is loaded by forcing an update event.
    pub fn start_free_running(&self, timer_clock: u32, tick_hz: u32) -> Result<(), ErrorCode> {
        if tick_hz == 0 || tick_hz > timer_clock {
            return Err(ErrorCode::INVAL);
        }
        let psc = timer_clock / tick_hz - 1;
        if psc > 0xffff {
            return Err(ErrorCode::SIZE);
        }

        self.registers.cr1.modify(CR1::CEN::CLEAR);
        self.registers.psc.write(PSC::PSC.val(psc));
        self.registers.arr.set(0xffff_ffff);
        self.registers.egr.write(EGR::UG::SET);
        self.registers.sr.set(0);
        self.registers.cr1.modify(CR1::URS::SET + CR1::CEN::SET);
        Ok(())
    }

    /// Raise `CC1IF` (and the interrupt) when the counter reaches `tics`.
    pub fn set_compare(&self, tics: u32) {
        self.registers.ccr1.set(tics);
        self.registers.sr.modify(SR::CC1IF::CLEAR);
        self.registers.dier.modify(DIER::CC1IE::SET);
    }

    pub fn disarm(&self) {
        self.registers.dier.modify(DIER::CC1IE::CLEAR);
        self.registers.sr.modify(SR::CC1IF::CLEAR);
    }

    pub fn now(&self) -> u32 {
        self.registers.cnt.get()
    }

    pub fn stop(&self) {
        self.registers.cr1.modify(CR1::CEN::CLEAR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::{offset_of, size_of};

    #[test]
    fn register_offsets() {
        assert_eq!(offset_of!(TimRegisters, egr), 0x14);
        assert_eq!(offset_of!(TimRegisters, ccer), 0x20);
        assert_eq!(offset_of!(TimRegisters, cnt), 0x24);
        assert_eq!(offset_of!(TimRegisters, arr), 0x2c);
        assert_eq!(offset_of!(TimRegisters, ccr1), 0x34);
        assert_eq!(offset_of!(TimRegisters, ccr4), 0x40);
        assert_eq!(offset_of!(TimRegisters, dcr), 0x48);
        assert_eq!(size_of::<TimRegisters>(), 0x50);
    }

    #[test]
    fn compare_mode_bits() {
        assert_eq!(CCMR1::OC1M.shift, 4);
        assert_eq!(CCMR1::OC1M_3.shift, 16);
        assert_eq!(CCMR2::OC4M.shift, 12);
        assert_eq!(SMCR::SMS_3.shift, 16);
        assert_eq!(CCER::CC4NP.shift, 15);
    }

    #[test]
    fn free_running_at_1mhz() {
        let regs: TimRegisters = unsafe { core::mem::zeroed() };
        let tim = Tim::new(unsafe { StaticRef::new(&regs) });

        tim.start_free_running(72_000_000, 1_000_000).unwrap();
        assert_eq!(regs.psc.get(), 71);
        assert_eq!(regs.arr.get(), 0xffff_ffff);
        assert_eq!(regs.cr1.get(), (1 << 2) | (1 << 0));

        tim.set_compare(500);
        assert_eq!(regs.ccr1.get(), 500);
        assert!(regs.dier.is_set(DIER::CC1IE));

        assert_eq!(tim.start_free_running(72_000_000, 1000), Err(ErrorCode::SIZE));
        assert_eq!(tim.start_free_running(8_000_000, 0), Err(ErrorCode::INVAL));
    }
}
