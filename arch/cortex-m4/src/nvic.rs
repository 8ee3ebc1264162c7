// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Cortex-M NVIC
//!
//! Most NVIC configuration is in the NVIC registers:
//! <https://developer.arm.com/docs/100165/0201/nested-vectored-interrupt-controller/nvic-programmers-model/table-of-nvic-registers>
//!
//! Also part of the NVIC conceptually is the ICTR, which in older versions of
//! the ARM ARM was listed in the "Summary of system control and ID registers
//! not in the SCB". We include it here.
//!
//! A Cortex-M4 implements at most 240 interrupts, so only the first eight
//! registers of each set/clear bank exist.

use chip_common::StaticRef;
use tock_registers::fields::Field;
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite, WriteOnly};
use tock_registers::{register_bitfields, register_structs};

/// Maximum number of external interrupts on a Cortex-M4.
pub const MAX_INTERRUPTS: usize = 240;

/// Number of NVIC_XXXX registers needed to cover [`MAX_INTERRUPTS`].
const NUM_BANKS: usize = 8;

register_structs! {
    /// NVIC Registers.
    ///
    /// If you need to find the number of implemented interrupt lines
    /// dynamically, consult `ICTR.INTLINESNUM`.
    pub NvicRegisters {
        (0x000 => _reserved0),

        /// Interrupt Controller Type Register
        (0x004 => ictr: ReadOnly<u32, InterruptControllerType::Register>),

        (0x008 => _reserved1),

        /// Interrupt Set-Enable Registers
        (0x100 => iser: [ReadWrite<u32, NvicSetClear::Register>; NUM_BANKS]),

        (0x120 => _reserved2),

        /// Interrupt Clear-Enable Registers
        (0x180 => icer: [ReadWrite<u32, NvicSetClear::Register>; NUM_BANKS]),

        (0x1a0 => _reserved3),

        /// Interrupt Set-Pending Registers
        (0x200 => ispr: [ReadWrite<u32, NvicSetClear::Register>; NUM_BANKS]),

        (0x220 => _reserved4),

        /// Interrupt Clear-Pending Registers
        (0x280 => icpr: [ReadWrite<u32, NvicSetClear::Register>; NUM_BANKS]),

        (0x2a0 => _reserved5),

        /// Interrupt Active Bit Registers
        (0x300 => iabr: [ReadOnly<u32, NvicSetClear::Register>; NUM_BANKS]),

        (0x320 => _reserved6),

        /// Interrupt Priority Registers
        (0x400 => ipr: [ReadWrite<u32, NvicInterruptPriority::Register>; 60]),

        (0x4f0 => _reserved7),

        /// Software Trigger Interrupt Register
        (0xf00 => stir: WriteOnly<u32, SoftwareTrigger::Register>),

        (0xf04 => @END),
    }
}

register_bitfields![u32,
    pub InterruptControllerType [
        /// Total number of interrupt lines in groups of 32
        INTLINESNUM     OFFSET(0)   NUMBITS(4)
    ],

    pub NvicSetClear [
        /// For register NVIC_XXXXn, access interrupt (m+(32*n)).
        BITS            OFFSET(0)   NUMBITS(32)
    ],

    pub NvicInterruptPriority [
        /// For register NVIC_IPRn, priority of interrupt number 4n+3.
        PRI_N3          OFFSET(24)  NUMBITS(8),

        /// For register NVIC_IPRn, priority of interrupt number 4n+2.
        PRI_N2          OFFSET(16)  NUMBITS(8),

        /// For register NVIC_IPRn, priority of interrupt number 4n+1.
        PRI_N1          OFFSET(8)   NUMBITS(8),

        /// For register NVIC_IPRn, priority of interrupt number 4n.
        PRI_N0          OFFSET(0)   NUMBITS(8)
    ],

    pub SoftwareTrigger [
        /// Interrupt ID of the interrupt to trigger, in the range 0-239.
        INTID           OFFSET(0)   NUMBITS(9)
    ]
];

/// Address of the System Control Space block holding the NVIC.
pub const NVIC_BASE: usize = 0xe000_e000;

/// The NVIC peripheral in MMIO space.
const NVIC: StaticRef<NvicRegisters> = unsafe { StaticRef::new(NVIC_BASE as *const NvicRegisters) };

/// Number of valid NVIC_XXXX registers. Note this is a ceiling on the number
/// of available interrupts (as this is the number of banks of 32), but the
/// actual number may be less.
fn number_of_nvic_registers(nvic: &NvicRegisters) -> usize {
    ((nvic.ictr.read(InterruptControllerType::INTLINESNUM) + 1) as usize).min(NUM_BANKS)
}

fn bank_and_bit(idx: u32) -> (usize, u32) {
    ((idx / 32) as usize, 1 << (idx & 31))
}

/// Clear all pending interrupts
pub unsafe fn clear_all_pending() {
    for icpr in NVIC.icpr.iter().take(number_of_nvic_registers(&NVIC)) {
        icpr.set(!0)
    }
}

/// Enable all interrupts
pub unsafe fn enable_all() {
    for iser in NVIC.iser.iter().take(number_of_nvic_registers(&NVIC)) {
        iser.set(!0)
    }
}

/// Disable all interrupts
pub unsafe fn disable_all() {
    for icer in NVIC.icer.iter().take(number_of_nvic_registers(&NVIC)) {
        icer.set(!0)
    }
}

fn next_pending_in(nvic: &NvicRegisters) -> Option<u32> {
    for (block, ispr) in nvic
        .ispr
        .iter()
        .take(number_of_nvic_registers(nvic))
        .enumerate()
    {
        let ispr = ispr.get();

        // If there are any high bits there is a pending interrupt
        if ispr != 0 {
            // trailing_zeros == index of first high bit
            let bit = ispr.trailing_zeros();
            return Some(block as u32 * 32 + bit);
        }
    }
    None
}

/// Get the index (0-239) the lowest number pending interrupt, or `None` if none
/// are pending.
pub unsafe fn next_pending() -> Option<u32> {
    next_pending_in(&NVIC)
}

/// An opaque wrapper for a single NVIC interrupt.
///
/// Hand these out to low-level driver to let them control their own interrupts
/// but not others.
pub struct Nvic {
    idx: u32,
    registers: StaticRef<NvicRegisters>,
}

impl Nvic {
    /// Creates a new `Nvic`
    ///
    /// Marked unsafe because only chip/platform configuration code should be
    /// able to create these.
    pub const unsafe fn new(idx: u32) -> Nvic {
        Nvic {
            idx,
            registers: NVIC,
        }
    }

    #[cfg(test)]
    fn with_registers(idx: u32, registers: StaticRef<NvicRegisters>) -> Nvic {
        Nvic { idx, registers }
    }

    pub fn index(&self) -> u32 {
        self.idx
    }

    /// Enable the interrupt
    pub fn enable(&self) {
        let (bank, bit) = bank_and_bit(self.idx);
        self.registers.iser[bank].set(bit);
    }

    /// Disable the interrupt
    pub fn disable(&self) {
        let (bank, bit) = bank_and_bit(self.idx);
        self.registers.icer[bank].set(bit);
    }

    /// Clear pending state
    pub fn clear_pending(&self) {
        let (bank, bit) = bank_and_bit(self.idx);
        self.registers.icpr[bank].set(bit);
    }

    /// Pend the interrupt from software through STIR.
    pub fn trigger(&self) {
        self.registers
            .stir
            .write(SoftwareTrigger::INTID.val(self.idx));
    }

    pub fn is_pending(&self) -> bool {
        let (bank, bit) = bank_and_bit(self.idx);
        self.registers.ispr[bank].get() & bit != 0
    }

    /// Set the priority byte of this interrupt. Chips only implement the top
    /// `N` bits (four on STM32, three on PIC32CX); the rest read as zero.
    pub fn set_priority(&self, priority: u8) {
        let idx = self.idx as usize;
        let byte: Field<u32, NvicInterruptPriority::Register> =
            Field::new(0xff, 8 * (idx % 4));
        self.registers.ipr[idx / 4].modify(byte.val(priority as u32));
    }

    pub fn priority(&self) -> u8 {
        let idx = self.idx as usize;
        let byte: Field<u32, NvicInterruptPriority::Register> =
            Field::new(0xff, 8 * (idx % 4));
        self.registers.ipr[idx / 4].read(byte) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::{next_pending_in, Nvic, NvicRegisters};
    use chip_common::StaticRef;
    use core::mem::{offset_of, size_of};
    use tock_registers::interfaces::{Readable, Writeable};

    #[test]
    fn register_offsets() {
        assert_eq!(offset_of!(NvicRegisters, ictr), 0x004);
        assert_eq!(offset_of!(NvicRegisters, iser), 0x100);
        assert_eq!(offset_of!(NvicRegisters, icer), 0x180);
        assert_eq!(offset_of!(NvicRegisters, ispr), 0x200);
        assert_eq!(offset_of!(NvicRegisters, icpr), 0x280);
        assert_eq!(offset_of!(NvicRegisters, iabr), 0x300);
        assert_eq!(offset_of!(NvicRegisters, ipr), 0x400);
        assert_eq!(offset_of!(NvicRegisters, stir), 0xf00);
        assert_eq!(size_of::<NvicRegisters>(), 0xf04);
    }

    #[test]
    fn single_interrupt_bits() {
        let regs: NvicRegisters = unsafe { core::mem::zeroed() };
        let nvic = Nvic::with_registers(37, unsafe { StaticRef::new(&regs) });

        nvic.enable();
        assert_eq!(regs.iser[1].get(), 1 << 5);
        nvic.disable();
        assert_eq!(regs.icer[1].get(), 1 << 5);

        assert!(!nvic.is_pending());
        regs.ispr[1].set(1 << 5);
        assert!(nvic.is_pending());
        nvic.clear_pending();
        assert_eq!(regs.icpr[1].get(), 1 << 5);

        nvic.trigger();
        let stir = unsafe { core::ptr::read_volatile(core::ptr::addr_of!(regs.stir) as *const u32) };
        assert_eq!(stir, 37);
    }

    #[test]
    fn priority_bytes() {
        let regs: NvicRegisters = unsafe { core::mem::zeroed() };
        let irq38 = Nvic::with_registers(38, unsafe { StaticRef::new(&regs) });
        let irq39 = Nvic::with_registers(39, unsafe { StaticRef::new(&regs) });

        irq38.set_priority(0x50);
        irq39.set_priority(0xf0);
        assert_eq!(regs.ipr[9].get(), 0xf050_0000);
        assert_eq!(irq38.priority(), 0x50);
        assert_eq!(irq39.priority(), 0xf0);
    }

    #[test]
    fn lowest_pending_first() {
        let mut regs: NvicRegisters = unsafe { core::mem::zeroed() };
        // INTLINESNUM = 2 -> three banks implemented
        unsafe {
            core::ptr::write_volatile(core::ptr::addr_of_mut!(regs.ictr) as *mut u32, 2);
        }
        assert_eq!(next_pending_in(&regs), None);
        regs.ispr[2].set(1 << 17);
        regs.ispr[1].set(1 << 30);
        assert_eq!(next_pending_in(&regs), Some(62));
        regs.ispr[1].set(0);
        assert_eq!(next_pending_in(&regs), Some(81));
    }
}
