// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

use crate::memory_map::PWR_BASE;
use chip_common::StaticRef;
use tock_registers::interfaces::{ReadWriteable, Readable};
use tock_registers::registers::{ReadOnly, ReadWrite};
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    /// Power control
    pub PwrRegisters {
        /// power control register
        (0x000 => cr: ReadWrite<u32, CR::Register>),
        /// power control/status register
        (0x004 => csr: ReadOnly<u32, CSR::Register>),
        (0x008 => @END),
    }
}

register_bitfields![u32,
    pub CR [
        /// Disable backup domain write protection
        DBP OFFSET(8) NUMBITS(1) [],
        /// PVD level selection
        PLS OFFSET(5) NUMBITS(3) [
            V2_2 = 0b000,
            V2_3 = 0b001,
            V2_4 = 0b010,
            V2_5 = 0b011,
            V2_6 = 0b100,
            V2_7 = 0b101,
            V2_8 = 0b110,
            V2_9 = 0b111
        ],
        /// Power voltage detector enable
        PVDE OFFSET(4) NUMBITS(1) [],
        /// Clear standby flag
        CSBF OFFSET(3) NUMBITS(1) [],
        /// Clear wakeup flag
        CWUF OFFSET(2) NUMBITS(1) [],
        /// Power down deepsleep
        PDDS OFFSET(1) NUMBITS(1) [],
        /// Low-power deep sleep
        LPDS OFFSET(0) NUMBITS(1) []
    ],
    pub CSR [
        /// Enable WKUP3 pin
        EWUP3 OFFSET(10) NUMBITS(1) [],
        /// Enable WKUP2 pin
        EWUP2 OFFSET(9) NUMBITS(1) [],
        /// Enable WKUP1 pin
        EWUP1 OFFSET(8) NUMBITS(1) [],
        /// Internal voltage reference ready flag
        VREFINTRDYF OFFSET(3) NUMBITS(1) [],
        /// PVD output
        PVDO OFFSET(2) NUMBITS(1) [],
        /// Standby flag
        SBF OFFSET(1) NUMBITS(1) [],
        /// Wakeup flag
        WUF OFFSET(0) NUMBITS(1) []
    ]
];

const PWR: StaticRef<PwrRegisters> = unsafe { StaticRef::new(PWR_BASE as *const PwrRegisters) };

pub struct Pwr {
    registers: StaticRef<PwrRegisters>,
}

impl Pwr {
    pub const fn new() -> Self {
        Self { registers: PWR }
    }

    /// Allow writes to the RTC and `RCC_BDCR`. The PWR clock must be on.
    pub fn enable_backup_domain_access(&self) {
        self.registers.cr.modify(CR::DBP::SET);
    }

    pub fn disable_backup_domain_access(&self) {
        self.registers.cr.modify(CR::DBP::CLEAR);
    }

    pub fn is_backup_domain_writable(&self) -> bool {
        self.registers.cr.is_set(CR::DBP)
    }

    pub fn woke_from_standby(&self) -> bool {
        self.registers.csr.is_set(CSR::SBF)
    }

    pub fn clear_standby_flag(&self) {
        self.registers.cr.modify(CR::CSBF::SET);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::{offset_of, size_of};

    #[test]
    fn layout() {
        assert_eq!(offset_of!(PwrRegisters, csr), 0x04);
        assert_eq!(size_of::<PwrRegisters>(), 0x08);
        assert_eq!(CR::DBP.mask << CR::DBP.shift, 0x100);
        assert_eq!(CR::PLS.mask << CR::PLS.shift, 0xe0);
        assert_eq!(CSR::EWUP3.shift, 10);
    }

    #[test]
    fn backup_domain_access() {
        let regs: PwrRegisters = unsafe { core::mem::zeroed() };
        let pwr = Pwr {
            registers: unsafe { StaticRef::new(&regs) },
        };
        assert!(!pwr.is_backup_domain_writable());
        pwr.enable_backup_domain_access();
        assert!(pwr.is_backup_domain_writable());
        pwr.disable_backup_domain_access();
        assert!(!pwr.is_backup_domain_writable());
    }
}
