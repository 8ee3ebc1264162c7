// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

use crate::memory_map::PWR_BASE;
use chip_common::{ErrorCode, StaticRef};
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite, WriteOnly};
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    /// Power control
    pub PwrRegisters {
        /// Power control register 1
        (0x000 => cr1: ReadWrite<u32, CR1::Register>),
        /// Power control register 2
        (0x004 => cr2: ReadWrite<u32, CR2::Register>),
        /// Power control register 3
        (0x008 => cr3: ReadWrite<u32, CR3::Register>),
        /// Power control register 4
        (0x00c => cr4: ReadWrite<u32, CR4::Register>),
        /// Power status register 1
        (0x010 => sr1: ReadOnly<u32, SR1::Register>),
        /// Power status register 2
        (0x014 => sr2: ReadOnly<u32, SR2::Register>),
        /// Power status clear register
        (0x018 => scr: WriteOnly<u32, SCR::Register>),
        (0x01c => _reserved0),
        /// Pull-up / pull-down control registers, PUCRA, PDCRA, ... PUCRH, PDCRH
        (0x020 => pull: [ReadWrite<u32>; 16]),
        (0x060 => @END),
    }
}

register_bitfields![u32,
    pub CR1 [
        /// Low-power run
        LPR OFFSET(14) NUMBITS(1) [],
        /// Voltage scaling range selection
        VOS OFFSET(9) NUMBITS(2) [
            Range1 = 0b01,
            Range2 = 0b10
        ],
        /// Disable backup domain write protection
        DBP OFFSET(8) NUMBITS(1) [],
        /// Low-power mode selection
        LPMS OFFSET(0) NUMBITS(3) [
            Stop0 = 0b000,
            Stop1 = 0b001,
            Stop2 = 0b010,
            Standby = 0b011,
            Shutdown = 0b100
        ]
    ],
    pub CR2 [
        /// VDDIO2 Independent I/Os supply valid
        IOSV OFFSET(9) NUMBITS(1) [],
        /// VDDUSB USB supply valid
        USV OFFSET(10) NUMBITS(1) [],
        /// Peripheral voltage monitoring 4 enable: VDDA vs. 2.2V
        PVME4 OFFSET(7) NUMBITS(1) [],
        /// Peripheral voltage monitoring 3 enable: VDDA vs. 1.62V
        PVME3 OFFSET(6) NUMBITS(1) [],
        /// Peripheral voltage monitoring 2 enable: VDDIO2 vs. 0.9V
        PVME2 OFFSET(5) NUMBITS(1) [],
        /// Peripheral voltage monitoring 1 enable: VDDUSB vs. 1.2V
        PVME1 OFFSET(4) NUMBITS(1) [],
        /// Power voltage detector level selection
        PLS OFFSET(1) NUMBITS(3) [],
        /// Power voltage detector enable
        PVDE OFFSET(0) NUMBITS(1) []
    ],
    pub CR3 [
        /// Enable internal wakeup line
        EIWUL OFFSET(15) NUMBITS(1) [],
        /// Apply pull-up and pull-down configuration
        APC OFFSET(10) NUMBITS(1) [],
        /// SRAM2 retention in Standby mode
        RRS OFFSET(8) NUMBITS(1) [],
        /// Enable Wakeup pin WKUP5
        EWUP5 OFFSET(4) NUMBITS(1) [],
        /// Enable Wakeup pin WKUP4
        EWUP4 OFFSET(3) NUMBITS(1) [],
        /// Enable Wakeup pin WKUP3
        EWUP3 OFFSET(2) NUMBITS(1) [],
        /// Enable Wakeup pin WKUP2
        EWUP2 OFFSET(1) NUMBITS(1) [],
        /// Enable Wakeup pin WKUP1
        EWUP1 OFFSET(0) NUMBITS(1) []
    ],
    pub CR4 [
        /// VBAT battery charging resistor selection
        VBRS OFFSET(9) NUMBITS(1) [],
        /// VBAT battery charging enable
        VBE OFFSET(8) NUMBITS(1) [],
        /// Wakeup pin WKUP5 polarity
        WP5 OFFSET(4) NUMBITS(1) [],
        /// Wakeup pin WKUP4 polarity
        WP4 OFFSET(3) NUMBITS(1) [],
        /// Wakeup pin WKUP3 polarity
        WP3 OFFSET(2) NUMBITS(1) [],
        /// Wakeup pin WKUP2 polarity
        WP2 OFFSET(1) NUMBITS(1) [],
        /// Wakeup pin WKUP1 polarity
        WP1 OFFSET(0) NUMBITS(1) []
    ],
    pub SR1 [
        /// Wakeup flag internal
        WUFI OFFSET(15) NUMBITS(1) [],
        /// Standby flag
        SBF OFFSET(8) NUMBITS(1) [],
        /// Wakeup flag 5
        WUF5 OFFSET(4) NUMBITS(1) [],
        /// Wakeup flag 4
        WUF4 OFFSET(3) NUMBITS(1) [],
        /// Wakeup flag 3
        WUF3 OFFSET(2) NUMBITS(1) [],
        /// Wakeup flag 2
        WUF2 OFFSET(1) NUMBITS(1) [],
        /// Wakeup flag 1
        WUF1 OFFSET(0) NUMBITS(1) []
    ],
    pub SR2 [
        /// Peripheral voltage monitoring output: VDDA vs. 2.2 V
        PVMO4 OFFSET(15) NUMBITS(1) [],
        /// Peripheral voltage monitoring output: VDDA vs. 1.62 V
        PVMO3 OFFSET(14) NUMBITS(1) [],
        /// Peripheral voltage monitoring output: VDDIO2 vs. 0.9 V
        PVMO2 OFFSET(13) NUMBITS(1) [],
        /// Peripheral voltage monitoring output: VDDUSB vs. 1.2 V
        PVMO1 OFFSET(12) NUMBITS(1) [],
        /// Power voltage detector output
        PVDO OFFSET(11) NUMBITS(1) [],
        /// Voltage scaling flag
        VOSF OFFSET(10) NUMBITS(1) [],
        /// Low-power regulator flag
        REGLPF OFFSET(9) NUMBITS(1) [],
        /// Low-power regulator started
        REGLPS OFFSET(8) NUMBITS(1) []
    ],
    pub SCR [
        /// Clear standby flag
        CSBF OFFSET(8) NUMBITS(1) [],
        /// Clear wakeup flag 5
        CWUF5 OFFSET(4) NUMBITS(1) [],
        /// Clear wakeup flag 4
        CWUF4 OFFSET(3) NUMBITS(1) [],
        /// Clear wakeup flag 3
        CWUF3 OFFSET(2) NUMBITS(1) [],
        /// Clear wakeup flag 2
        CWUF2 OFFSET(1) NUMBITS(1) [],
        /// Clear wakeup flag 1
        CWUF1 OFFSET(0) NUMBITS(1) []
    ]
];

const PWR: StaticRef<PwrRegisters> = unsafe { StaticRef::new(PWR_BASE as *const PwrRegisters) };

/// Main regulator voltage range
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VOS {
    /// High performance, up to 80 MHz
    Range1 = 1,
    /// Low power, up to 26 MHz
    Range2 = 2,
}

pub struct Pwr {
    registers: StaticRef<PwrRegisters>,
}

impl Pwr {
    pub const fn new() -> Self {
        Self { registers: PWR }
    }

    #[cfg(test)]
    pub(crate) fn with_registers(registers: StaticRef<PwrRegisters>) -> Self {
        Self { registers }
    }

    /// Current voltage range. `None` if `VOS` holds a forbidden value.
    pub fn get_vos(&self) -> Option<VOS> {
        match self.registers.cr1.read(CR1::VOS) {
            1 => Some(VOS::Range1),
            2 => Some(VOS::Range2),
            _ => None,
        }
    }

    pub fn set_vos(&self, vos: VOS) {
        self.registers.cr1.modify(CR1::VOS.val(vos as u32));
    }

    /// `false` while the regulator is moving to a new voltage range.
    pub fn is_vos_ready(&self) -> bool {
        !self.registers.sr2.is_set(SR2::VOSF)
    }

    /// Allow writes to the RTC and `RCC_BDCR`. The PWR clock must be on.
    pub fn enable_backup_domain_access(&self) {
        self.registers.cr1.modify(CR1::DBP::SET);
    }

    pub fn disable_backup_domain_access(&self) {
        self.registers.cr1.modify(CR1::DBP::CLEAR);
    }

    pub fn is_backup_domain_writable(&self) -> bool {
        self.registers.cr1.is_set(CR1::DBP)
    }

    pub fn woke_from_standby(&self) -> bool {
        self.registers.sr1.is_set(SR1::SBF)
    }

    pub fn clear_standby_flag(&self) {
        self.registers.scr.write(SCR::CSBF::SET);
    }

    /// Pull-up (`up == true`) or pull-down mask of GPIO `port` (0 = A)
    /// applied in Standby and Shutdown when `CR3.APC` is set.
    pub fn set_standby_pull(&self, port: usize, up: bool, mask: u16) -> Result<(), ErrorCode> {
        if port > 7 {
            return Err(ErrorCode::INVAL);
        }
        let index = 2 * port + if up { 0 } else { 1 };
        self.registers.pull[index].set(mask as u32);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::{offset_of, size_of};

    #[test]
    fn layout() {
        assert_eq!(offset_of!(PwrRegisters, sr1), 0x10);
        assert_eq!(offset_of!(PwrRegisters, sr2), 0x14);
        assert_eq!(offset_of!(PwrRegisters, scr), 0x18);
        assert_eq!(offset_of!(PwrRegisters, pull), 0x20);
        assert_eq!(size_of::<PwrRegisters>(), 0x60);
        assert_eq!(PWR_BASE, 0x4000_7000);
    }

    #[test]
    fn bitfields() {
        assert_eq!(CR1::VOS.mask << CR1::VOS.shift, 0x600);
        assert_eq!(CR1::LPMS.mask << CR1::LPMS.shift, 0x7);
        assert_eq!(SR2::VOSF.shift, 10);
        assert_eq!(SCR::CSBF.shift, 8);
    }

    #[test]
    fn voltage_range() {
        let regs: PwrRegisters = unsafe { core::mem::zeroed() };
        let pwr = Pwr::with_registers(unsafe { StaticRef::new(&regs) });
        assert_eq!(pwr.get_vos(), None);
        pwr.set_vos(VOS::Range1);
        assert_eq!(pwr.get_vos(), Some(VOS::Range1));
        assert_eq!(regs.cr1.get(), 0x200);
        assert!(pwr.is_vos_ready());
    }

    #[test]
    fn standby_pulls() {
        let regs: PwrRegisters = unsafe { core::mem::zeroed() };
        let pwr = Pwr::with_registers(unsafe { StaticRef::new(&regs) });
        pwr.set_standby_pull(2, false, 0x2000).unwrap();
        assert_eq!(regs.pull[5].get(), 0x2000);
        assert_eq!(pwr.set_standby_pull(8, true, 1), Err(ErrorCode::INVAL));

        pwr.enable_backup_domain_access();
        assert!(pwr.is_backup_domain_writable());
    }
}
