// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! ARM System Control Block
//!
//! <http://infocenter.arm.com/help/index.jsp?topic=/com.arm.doc.dui0553a/CIHFDJCA.html>

use chip_common::StaticRef;
use core::fmt::Write;
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite};
use tock_registers::{register_bitfields, register_structs, LocalRegisterCopy};

register_structs! {
    /// In an ARMv7-M processor, a System Control Block (SCB) in the SCS
    /// provides key status information and control features for the processor.
    pub ScbRegisters {
        /// CPUID Base Register
        (0x00 => cpuid: ReadOnly<u32, CpuId::Register>),

        /// Interrupt Control and State Register
        (0x04 => icsr: ReadWrite<u32, InterruptControlAndState::Register>),

        /// Vector Table Offset Register
        (0x08 => vtor: ReadWrite<u32, VectorTableOffset::Register>),

        /// Application Interrupt and Reset Control Register
        (0x0c => aircr: ReadWrite<u32, ApplicationInterruptAndReset::Register>),

        /// System Control Register
        (0x10 => scr: ReadWrite<u32, SystemControl::Register>),

        /// Configuration and Control Register
        (0x14 => ccr: ReadWrite<u32, ConfigurationAndControl::Register>),

        /// System Handler Priority Register (1-3)
        (0x18 => shp: [ReadWrite<u32, SystemHandlerPriority::Register>; 3]),

        /// System Handler Control and State Register
        (0x24 => shcsr: ReadWrite<u32, SystemHandlerControlAndState::Register>),

        /// Configurable Fault Status Register
        (0x28 => cfsr: ReadWrite<u32, ConfigurableFaultStatus::Register>),

        /// HardFault Status Register
        (0x2c => hfsr: ReadWrite<u32, HardFaultStatus::Register>),

        /// Debug Fault Status Register
        (0x30 => dfsr: ReadWrite<u32, DebugFaultStatus::Register>),

        /// MemManage Fault Address Register
        (0x34 => mmfar: ReadWrite<u32, FaultAddress::Register>),

        /// BusFault Address Register
        (0x38 => bfar: ReadWrite<u32, FaultAddress::Register>),

        /// Auxiliary Fault Status Register
        (0x3c => afsr: ReadWrite<u32, FaultAddress::Register>),

        /// 0xE000ED40-7C, Reserved for CPUID registers.
        (0x40 => _reserved0),

        /// Coprocessor Access Control Register
        (0x88 => cpacr: ReadWrite<u32, CoprocessorAccessControl::Register>),

        /// 0xE000ED8C, Reserved.
        (0x8c => _reserved1),

        (0x90 => @END),
    }
}

register_bitfields![u32,
    pub CpuId [
        /// Implementer code assigned by ARM. ARM implementations are 0x41.
        IMPLEMENTER     OFFSET(24)  NUMBITS(8),

        /// Implementer-defined variant number.
        VARIANT         OFFSET(20)  NUMBITS(4),

        /// Architecture always reads as 0xF for Cortex-M
        ARCHITECTURE    OFFSET(16)  NUMBITS(4),

        /// Implementer-defined part number. 0xC24 on a Cortex-M4.
        PARTNO          OFFSET(4)   NUMBITS(12),

        /// Implementer-defined revision number.
        REVISION        OFFSET(0)   NUMBITS(4)
    ],

    pub InterruptControlAndState [
        /// Set NMI pending
        NMIPENDSET      OFFSET(31)  NUMBITS(1),
        PENDSVSET       OFFSET(28)  NUMBITS(1),
        PENDSVCLR       OFFSET(27)  NUMBITS(1),
        PENDSTSET       OFFSET(26)  NUMBITS(1),
        PENDSTCLR       OFFSET(25)  NUMBITS(1),
        ISRPREEMPT      OFFSET(23)  NUMBITS(1),
        ISRPENDING      OFFSET(22)  NUMBITS(1),

        /// Exception number of the highest priority pending exception.
        VECTPENDING     OFFSET(12)  NUMBITS(9),

        /// Return to base level (no other exceptions active)
        RETTOBASE       OFFSET(11)  NUMBITS(1),

        /// Active exception number, 0 in Thread mode.
        VECTACTIVE      OFFSET(0)   NUMBITS(9)
    ],

    pub VectorTableOffset [
        /// Bits [31:7] of the vector table address
        TBLOFF          OFFSET(7)   NUMBITS(25)
    ],

    pub ApplicationInterruptAndReset [
        /// Must write 0x05FA to this field, otherwise the write is ignored.
        VECTKEY         OFFSET(16)  NUMBITS(16),
        ENDIANNESS      OFFSET(15)  NUMBITS(1),
        PRIGROUP        OFFSET(8)   NUMBITS(3),
        SYSRESETREQ     OFFSET(2)   NUMBITS(1),
        VECTCLRACTIVE   OFFSET(1)   NUMBITS(1),
        VECTRESET       OFFSET(0)   NUMBITS(1)
    ],

    pub SystemControl [
        SEVONPEND       OFFSET(4)   NUMBITS(1),
        SLEEPDEEP       OFFSET(2)   NUMBITS(1),
        SLEEPONEXIT     OFFSET(1)   NUMBITS(1)
    ],

    pub ConfigurationAndControl [
        STKALIGN        OFFSET(9)   NUMBITS(1),
        BFHFNMIGN       OFFSET(8)   NUMBITS(1),
        DIV_0_TRP       OFFSET(4)   NUMBITS(1),
        UNALIGN_TRP     OFFSET(3)   NUMBITS(1),
        USERSETMPEND    OFFSET(1)   NUMBITS(1),
        NONBASETHRDENA  OFFSET(0)   NUMBITS(1)
    ],

    pub SystemHandlerPriority [
        PRI_N3          OFFSET(24)  NUMBITS(8),
        PRI_N2          OFFSET(16)  NUMBITS(8),
        PRI_N1          OFFSET(8)   NUMBITS(8),
        PRI_N0          OFFSET(0)   NUMBITS(8)
    ],

    pub SystemHandlerControlAndState [
        USGFAULTENA     OFFSET(18)  NUMBITS(1),
        BUSFAULTENA     OFFSET(17)  NUMBITS(1),
        MEMFAULTENA     OFFSET(16)  NUMBITS(1),
        SVCALLPENDED    OFFSET(15)  NUMBITS(1),
        BUSFAULTPENDED  OFFSET(14)  NUMBITS(1),
        MEMFAULTPENDED  OFFSET(13)  NUMBITS(1),
        USGFAULTPENDED  OFFSET(12)  NUMBITS(1),
        SYSTICKACT      OFFSET(11)  NUMBITS(1),
        PENDSVACT       OFFSET(10)  NUMBITS(1),
        MONITORACT      OFFSET(8)   NUMBITS(1),
        SVCALLACT       OFFSET(7)   NUMBITS(1),
        USGFAULTACT     OFFSET(3)   NUMBITS(1),
        BUSFAULTACT     OFFSET(1)   NUMBITS(1),
        MEMFAULTACT     OFFSET(0)   NUMBITS(1)
    ],

    pub ConfigurableFaultStatus [
        UsageFault      OFFSET(16)  NUMBITS(16),
        BusFault        OFFSET(8)   NUMBITS(8),
        MemManage       OFFSET(0)   NUMBITS(8),

        // MemManage fault status
        MMARVALID       OFFSET(7)   NUMBITS(1),
        MLSPERR         OFFSET(5)   NUMBITS(1),
        MSTKERR         OFFSET(4)   NUMBITS(1),
        MUNSTKERR       OFFSET(3)   NUMBITS(1),
        DACCVIOL        OFFSET(1)   NUMBITS(1),
        IACCVIOL        OFFSET(0)   NUMBITS(1),

        // BusFault status
        BFARVALID       OFFSET(15)  NUMBITS(1),
        LSPERR          OFFSET(13)  NUMBITS(1),
        STKERR          OFFSET(12)  NUMBITS(1),
        UNSTKERR        OFFSET(11)  NUMBITS(1),
        IMPRECISERR     OFFSET(10)  NUMBITS(1),
        PRECISERR       OFFSET(9)   NUMBITS(1),
        IBUSERR         OFFSET(8)   NUMBITS(1),

        // UsageFault status
        DIVBYZERO       OFFSET(25)  NUMBITS(1),
        UNALIGNED       OFFSET(24)  NUMBITS(1),
        NOCP            OFFSET(19)  NUMBITS(1),
        INVPC           OFFSET(18)  NUMBITS(1),
        INVSTATE        OFFSET(17)  NUMBITS(1),
        UNDEFINSTR      OFFSET(16)  NUMBITS(1)
    ],

    pub HardFaultStatus [
        DEBUGEVT        OFFSET(31)  NUMBITS(1),
        FORCED          OFFSET(30)  NUMBITS(1),
        VECTTBL         OFFSET(1)   NUMBITS(1)
    ],

    pub DebugFaultStatus [
        EXTERNAL        OFFSET(4)   NUMBITS(1),
        VCATCH          OFFSET(3)   NUMBITS(1),
        DWTTRAP         OFFSET(2)   NUMBITS(1),
        BKPT            OFFSET(1)   NUMBITS(1),
        HALTED          OFFSET(0)   NUMBITS(1)
    ],

    pub FaultAddress [
        ADDRESS         OFFSET(0)   NUMBITS(32)
    ],

    pub CoprocessorAccessControl [
        CP11            OFFSET(22)  NUMBITS(2) [
            Denied = 0b00,
            Privileged = 0b01,
            Full = 0b11
        ],
        CP10            OFFSET(20)  NUMBITS(2) [
            Denied = 0b00,
            Privileged = 0b01,
            Full = 0b11
        ]
    ]
];

/// Address of the SCB in the System Control Space.
pub const SCB_BASE: usize = 0xe000_ed00;

const SCB: StaticRef<ScbRegisters> = unsafe { StaticRef::new(SCB_BASE as *const ScbRegisters) };

/// Snapshot of the fault status registers, taken on a fault.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaultStatus {
    pub cfsr: u32,
    pub hfsr: u32,
    pub mmfar: u32,
    pub bfar: u32,
}

fn fault_status_of(scb: &ScbRegisters) -> FaultStatus {
    FaultStatus {
        cfsr: scb.cfsr.get(),
        hfsr: scb.hfsr.get(),
        mmfar: scb.mmfar.get(),
        bfar: scb.bfar.get(),
    }
}

/// Read CFSR, HFSR, MMFAR and BFAR.
pub unsafe fn fault_status() -> FaultStatus {
    fault_status_of(&SCB)
}

impl FaultStatus {
    /// Print one line per set fault bit, followed by the faulting address
    /// when the matching `*ARVALID` bit is set.
    pub fn write_report(&self, w: &mut dyn Write) -> core::fmt::Result {
        use ConfigurableFaultStatus as C;
        let cfsr: LocalRegisterCopy<u32, C::Register> = LocalRegisterCopy::new(self.cfsr);
        let hfsr: LocalRegisterCopy<u32, HardFaultStatus::Register> =
            LocalRegisterCopy::new(self.hfsr);

        let bits = [
            (cfsr.is_set(C::IACCVIOL), "Instruction Access Violation"),
            (cfsr.is_set(C::DACCVIOL), "Data Access Violation"),
            (cfsr.is_set(C::MUNSTKERR), "Memory Management Unstacking Fault"),
            (cfsr.is_set(C::MSTKERR), "Memory Management Stacking Fault"),
            (cfsr.is_set(C::MLSPERR), "Memory Management Lazy FP Fault"),
            (cfsr.is_set(C::IBUSERR), "Instruction Bus Error"),
            (cfsr.is_set(C::PRECISERR), "Precise Data Bus Error"),
            (cfsr.is_set(C::IMPRECISERR), "Imprecise Data Bus Error"),
            (cfsr.is_set(C::UNSTKERR), "Bus Unstacking Fault"),
            (cfsr.is_set(C::STKERR), "Bus Stacking Fault"),
            (cfsr.is_set(C::LSPERR), "Bus Lazy FP Fault"),
            (cfsr.is_set(C::UNDEFINSTR), "Undefined Instruction Usage Fault"),
            (cfsr.is_set(C::INVSTATE), "Invalid State Usage Fault"),
            (cfsr.is_set(C::INVPC), "Invalid PC Load Usage Fault"),
            (cfsr.is_set(C::NOCP), "No Coprocessor Usage Fault"),
            (cfsr.is_set(C::UNALIGNED), "Unaligned Access Usage Fault"),
            (cfsr.is_set(C::DIVBYZERO), "Divide By Zero"),
            (hfsr.is_set(HardFaultStatus::VECTTBL), "Bus Fault on Vector Table Read"),
            (hfsr.is_set(HardFaultStatus::FORCED), "Forced Hard Fault"),
        ];
        for (_, name) in bits.iter().filter(|(set, _)| *set) {
            writeln!(w, "{}", name)?;
        }

        if cfsr.is_set(C::MMARVALID) {
            writeln!(w, "Faulting Memory Address: {:#010X}", self.mmfar)?;
        }
        if cfsr.is_set(C::BFARVALID) {
            writeln!(w, "Bus Fault Address:       {:#010X}", self.bfar)?;
        }
        Ok(())
    }
}

/// Allow the core to go into deep sleep on WFI.
///
/// The specific definition of "deep sleep" is chip specific.
pub unsafe fn set_sleepdeep() {
    SCB.scr.modify(SystemControl::SLEEPDEEP::SET);
}

/// Do not allow the core to go into deep sleep on WFI.
pub unsafe fn unset_sleepdeep() {
    SCB.scr.modify(SystemControl::SLEEPDEEP::CLEAR);
}

fn request_reset(scb: &ScbRegisters) {
    scb.aircr.modify(
        ApplicationInterruptAndReset::VECTKEY.val(0x05FA)
            + ApplicationInterruptAndReset::SYSRESETREQ::SET,
    );
}

/// Software reset using the ARM System Control Block
pub unsafe fn reset() {
    request_reset(&SCB);
}

/// Relocate the interrupt vector table. `offset` must be 128-byte aligned.
pub unsafe fn set_vector_table_offset(offset: *const ()) {
    SCB.vtor.set(offset as u32);
}

fn grant_fpu(scb: &ScbRegisters) {
    scb.cpacr.modify(
        CoprocessorAccessControl::CP10::Full + CoprocessorAccessControl::CP11::Full,
    );
}

/// Give privileged and unprivileged code full access to the FPU.
pub unsafe fn enable_fpu() {
    grant_fpu(&SCB);

    #[cfg(all(target_arch = "arm", target_os = "none"))]
    core::arch::asm!("dsb", "isb", options(nomem, nostack, preserves_flags));
}

/// Part number field of CPUID, 0xC24 on a Cortex-M4.
pub unsafe fn part_number() -> u32 {
    SCB.cpuid.read(CpuId::PARTNO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::{offset_of, size_of};

    struct Buf {
        data: [u8; 512],
        len: usize,
    }

    impl Write for Buf {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            let end = self.len + s.len();
            self.data[self.len..end].copy_from_slice(s.as_bytes());
            self.len = end;
            Ok(())
        }
    }

    impl Buf {
        fn as_str(&self) -> &str {
            core::str::from_utf8(&self.data[..self.len]).unwrap()
        }
    }

    #[test]
    fn register_offsets() {
        assert_eq!(offset_of!(ScbRegisters, vtor), 0x08);
        assert_eq!(offset_of!(ScbRegisters, aircr), 0x0c);
        assert_eq!(offset_of!(ScbRegisters, shp), 0x18);
        assert_eq!(offset_of!(ScbRegisters, shcsr), 0x24);
        assert_eq!(offset_of!(ScbRegisters, cfsr), 0x28);
        assert_eq!(offset_of!(ScbRegisters, hfsr), 0x2c);
        assert_eq!(offset_of!(ScbRegisters, bfar), 0x38);
        assert_eq!(offset_of!(ScbRegisters, cpacr), 0x88);
        assert_eq!(size_of::<ScbRegisters>(), 0x90);
    }

    #[test]
    fn fault_bit_positions() {
        use ConfigurableFaultStatus as C;
        assert_eq!(C::IACCVIOL.mask << C::IACCVIOL.shift, 1 << 0);
        assert_eq!(C::PRECISERR.mask << C::PRECISERR.shift, 1 << 9);
        assert_eq!(C::BFARVALID.mask << C::BFARVALID.shift, 1 << 15);
        assert_eq!(C::DIVBYZERO.mask << C::DIVBYZERO.shift, 1 << 25);
        assert_eq!(SystemHandlerControlAndState::MEMFAULTPENDED.shift, 13);
        assert_eq!(SystemHandlerControlAndState::USGFAULTPENDED.shift, 12);
    }

    #[test]
    fn reset_and_fpu_encodings() {
        let scb: ScbRegisters = unsafe { core::mem::zeroed() };
        request_reset(&scb);
        assert_eq!(scb.aircr.get(), 0x05FA_0004);

        grant_fpu(&scb);
        assert_eq!(scb.cpacr.get(), 0x00F0_0000);
    }

    #[test]
    fn fault_report() {
        let scb: ScbRegisters = unsafe { core::mem::zeroed() };
        scb.cfsr.set((1 << 15) | (1 << 9) | (1 << 25));
        scb.hfsr.set(1 << 30);
        scb.bfar.set(0x2000_1000);

        let status = fault_status_of(&scb);
        assert_eq!(status.cfsr, 0x0200_8200);

        let mut buf = Buf { data: [0; 512], len: 0 };
        status.write_report(&mut buf).unwrap();
        let text = buf.as_str();
        assert!(text.contains("Precise Data Bus Error"));
        assert!(text.contains("Divide By Zero"));
        assert!(text.contains("Forced Hard Fault"));
        assert!(text.contains("Bus Fault Address:       0x20001000"));
        assert!(!text.contains("Faulting Memory Address"));
    }
}
