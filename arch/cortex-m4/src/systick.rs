// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! ARM Cortex-M SysTick peripheral.
//!
//! Documented in the Cortex-M4 Devices Generic User Guide, Chapter 4.4

use chip_common::{ErrorCode, StaticRef};
use tock_registers::interfaces::{Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite};
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    pub SystickRegisters {
        (0x00 => syst_csr: ReadWrite<u32, ControlAndStatus::Register>),
        (0x04 => syst_rvr: ReadWrite<u32, ReloadValue::Register>),
        (0x08 => syst_cvr: ReadWrite<u32, CurrentValue::Register>),
        (0x0c => syst_calib: ReadOnly<u32, CalibrationValue::Register>),
        (0x10 => @END),
    }
}

register_bitfields![u32,
    pub ControlAndStatus [
        /// Returns 1 if timer counted to 0 since last time this was read.
        COUNTFLAG 16,

        /// Clock source is (0) External Clock or (1) Processor Clock.
        CLKSOURCE 2,

        /// Set to 1 to enable SysTick exception request.
        TICKINT 1,

        /// Enable the counter (1 == Enabled).
        ENABLE 0
    ],

    pub ReloadValue [
        /// Value loaded to `syst_cvr` when counter is enabled and reaches 0.
        RELOAD          OFFSET(0)  NUMBITS(24)
    ],

    pub CurrentValue [
        /// Reads current value. Write of any value sets to 0.
        CURRENT         OFFSET(0)  NUMBITS(24)
    ],

    pub CalibrationValue [
        /// 0 if device provides reference clock to processor.
        NOREF           OFFSET(31) NUMBITS(1),

        /// 0 if TENMS value is exact, 1 if inexact or not given.
        SKEW            OFFSET(30) NUMBITS(1),

        /// Reload value for 10ms ticks, or 0 if no calibration.
        TENMS           OFFSET(0)  NUMBITS(24)
    ]
];

pub const SYSTICK_BASE: usize = 0xe000_e010;

/// Largest value the 24-bit reload register holds.
pub const MAX_RELOAD: u32 = 0x00ff_ffff;

/// The ARM Cortex-M SysTick peripheral, clocked from the processor clock.
pub struct SysTick {
    registers: StaticRef<SystickRegisters>,
    hertz: u32,
}

impl SysTick {
    /// `clock_speed` is the processor clock (HCLK) in Hertz.
    pub const unsafe fn new_with_calibration(clock_speed: u32) -> SysTick {
        SysTick {
            registers: StaticRef::new(SYSTICK_BASE as *const SystickRegisters),
            hertz: clock_speed,
        }
    }

    #[cfg(test)]
    fn with_registers(registers: StaticRef<SystickRegisters>, hertz: u32) -> SysTick {
        SysTick { registers, hertz }
    }

    /// Reload value giving an interrupt every `us` microseconds.
    pub fn reload_for_us(&self, us: u32) -> Result<u32, ErrorCode> {
        let ticks = (self.hertz as u64 * us as u64) / 1_000_000;
        if ticks == 0 {
            return Err(ErrorCode::INVAL);
        }
        if ticks - 1 > MAX_RELOAD as u64 {
            return Err(ErrorCode::SIZE);
        }
        Ok(ticks as u32 - 1)
    }

    /// Start counting down, raising the SysTick exception every `us`
    /// microseconds.
    pub fn start_periodic(&self, us: u32) -> Result<(), ErrorCode> {
        let reload = self.reload_for_us(us)?;
        self.registers.syst_rvr.write(ReloadValue::RELOAD.val(reload));
        self.registers.syst_cvr.set(0);
        self.registers.syst_csr.write(
            ControlAndStatus::ENABLE::SET
                + ControlAndStatus::TICKINT::SET
                + ControlAndStatus::CLKSOURCE::SET,
        );
        Ok(())
    }

    pub fn stop(&self) {
        self.registers.syst_csr.set(0);
    }

    /// True once the counter has wrapped since the last read. Reading clears
    /// the flag.
    pub fn overflowed(&self) -> bool {
        self.registers.syst_csr.is_set(ControlAndStatus::COUNTFLAG)
    }

    pub fn value(&self) -> u32 {
        self.registers.syst_cvr.read(CurrentValue::CURRENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::{offset_of, size_of};

    #[test]
    fn register_offsets() {
        assert_eq!(offset_of!(SystickRegisters, syst_rvr), 0x04);
        assert_eq!(offset_of!(SystickRegisters, syst_calib), 0x0c);
        assert_eq!(size_of::<SystickRegisters>(), 0x10);
    }

    #[test]
    fn periodic_start() {
        let regs: SystickRegisters = unsafe { core::mem::zeroed() };
        let systick = SysTick::with_registers(unsafe { StaticRef::new(&regs) }, 72_000_000);

        assert_eq!(systick.reload_for_us(1000), Ok(71_999));
        assert_eq!(systick.reload_for_us(0), Err(ErrorCode::INVAL));
        assert_eq!(systick.reload_for_us(1_000_000), Err(ErrorCode::SIZE));

        systick.start_periodic(1000).unwrap();
        assert_eq!(regs.syst_rvr.get(), 71_999);
        assert_eq!(regs.syst_csr.get(), 0b111);

        systick.stop();
        assert_eq!(regs.syst_csr.get(), 0);
    }
}
