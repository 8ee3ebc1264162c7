// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Oscillators controller: the two crystal oscillators (XOSC0/1), the
//! 48 MHz DFLL and the two fractional digital PLLs.

use crate::chip_specific::ClockConstants;
use crate::memory_map::OSCCTRL_BASE;
use chip_common::{debug, ErrorCode, StaticRef};
use tock_registers::fields::FieldValue;
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite};
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    pub DpllRegisters {
        /// DPLL Control A
        (0x00 => ctrla: ReadWrite<u8, DPLLCTRLA::Register>),
        (0x01 => _reserved0),
        /// DPLL Ratio Control
        (0x04 => ratio: ReadWrite<u32, DPLLRATIO::Register>),
        /// DPLL Control B
        (0x08 => ctrlb: ReadWrite<u32, DPLLCTRLB::Register>),
        /// DPLL Synchronization Busy
        (0x0c => syncbusy: ReadOnly<u32, DPLLSYNCBUSY::Register>),
        /// DPLL Status
        (0x10 => status: ReadOnly<u32, DPLLSTATUS::Register>),
        (0x14 => @END),
    },

    pub OscctrlRegisters {
        /// Event Control
        (0x00 => evctrl: ReadWrite<u8, EVCTRL::Register>),
        (0x01 => _reserved0),
        /// Interrupt Enable Clear
        (0x04 => intenclr: ReadWrite<u32, INT::Register>),
        /// Interrupt Enable Set
        (0x08 => intenset: ReadWrite<u32, INT::Register>),
        /// Interrupt Flag Status and Clear
        (0x0c => intflag: ReadWrite<u32, INT::Register>),
        /// Status
        (0x10 => status: ReadOnly<u32, INT::Register>),
        /// External Multipurpose Crystal Oscillator Control
        (0x14 => xoscctrl: [ReadWrite<u32, XOSCCTRL::Register>; 2]),
        /// DFLL48M Control A
        (0x1c => dfllctrla: ReadWrite<u8, DFLLCTRLA::Register>),
        (0x1d => _reserved1),
        /// DFLL48M Control B
        (0x20 => dfllctrlb: ReadWrite<u8, DFLLCTRLB::Register>),
        (0x21 => _reserved2),
        /// DFLL48M Value
        (0x24 => dfllval: ReadWrite<u32, DFLLVAL::Register>),
        /// DFLL48M Multiplier
        (0x28 => dfllmul: ReadWrite<u32, DFLLMUL::Register>),
        /// DFLL48M Synchronization
        (0x2c => dfllsync: ReadOnly<u8, DFLLSYNC::Register>),
        (0x2d => _reserved3),
        (0x30 => dpll: [DpllRegisters; 2]),
        (0x58 => @END),
    }
}

register_bitfields![u8,
    pub EVCTRL [
        /// Clock 1 Failure Detector Event Output Enable
        CFDEO1 OFFSET(1) NUMBITS(1) [],
        /// Clock 0 Failure Detector Event Output Enable
        CFDEO0 OFFSET(0) NUMBITS(1) []
    ],
    pub DFLLCTRLA [
        /// On Demand Control
        ONDEMAND OFFSET(7) NUMBITS(1) [],
        /// Run in Standby
        RUNSTDBY OFFSET(6) NUMBITS(1) [],
        /// DFLL Enable
        ENABLE OFFSET(1) NUMBITS(1) []
    ],
    pub DFLLCTRLB [
        /// Wait Lock
        WAITLOCK OFFSET(7) NUMBITS(1) [],
        /// Bypass Coarse Lock
        BPLCKC OFFSET(6) NUMBITS(1) [],
        /// Quick Lock Disable
        QLDIS OFFSET(5) NUMBITS(1) [],
        /// Chill Cycle Disable
        CCDIS OFFSET(4) NUMBITS(1) [],
        /// USB Clock Recovery Mode
        USBCRM OFFSET(3) NUMBITS(1) [],
        /// Lose Lock After Wake
        LLAW OFFSET(2) NUMBITS(1) [],
        /// Stable DFLL Frequency
        STABLE OFFSET(1) NUMBITS(1) [],
        /// Operating Mode Selection
        MODE OFFSET(0) NUMBITS(1) [
            OpenLoop = 0,
            ClosedLoop = 1
        ]
    ],
    pub DFLLSYNC [
        /// DFLLMUL Synchronization Busy
        DFLLMUL OFFSET(4) NUMBITS(1) [],
        /// DFLLVAL Synchronization Busy
        DFLLVAL OFFSET(3) NUMBITS(1) [],
        /// DFLLCTRLB Synchronization Busy
        DFLLCTRLB OFFSET(2) NUMBITS(1) [],
        /// ENABLE Synchronization Busy
        ENABLE OFFSET(1) NUMBITS(1) []
    ],
    pub DPLLCTRLA [
        ONDEMAND OFFSET(7) NUMBITS(1) [],
        RUNSTDBY OFFSET(6) NUMBITS(1) [],
        ENABLE OFFSET(1) NUMBITS(1) []
    ]
];

register_bitfields![u32,
    pub INT [
        DPLL1LDRTO OFFSET(27) NUMBITS(1) [],
        DPLL1LTO OFFSET(26) NUMBITS(1) [],
        DPLL1LCKF OFFSET(25) NUMBITS(1) [],
        DPLL1LCKR OFFSET(24) NUMBITS(1) [],
        /// DPLL0 Loop Divider Ratio Update Complete
        DPLL0LDRTO OFFSET(19) NUMBITS(1) [],
        /// DPLL0 Lock Timeout
        DPLL0LTO OFFSET(18) NUMBITS(1) [],
        /// DPLL0 Lock Fall
        DPLL0LCKF OFFSET(17) NUMBITS(1) [],
        /// DPLL0 Lock Rise
        DPLL0LCKR OFFSET(16) NUMBITS(1) [],
        /// DFLL Reference Clock Stopped
        DFLLRCS OFFSET(12) NUMBITS(1) [],
        /// DFLL Lock Coarse
        DFLLLCKC OFFSET(11) NUMBITS(1) [],
        /// DFLL Lock Fine
        DFLLLCKF OFFSET(10) NUMBITS(1) [],
        /// DFLL Out Of Bounds
        DFLLOOB OFFSET(9) NUMBITS(1) [],
        /// DFLL Ready
        DFLLRDY OFFSET(8) NUMBITS(1) [],
        /// XOSC1 Clock Switch, status only
        XOSCCKSW1 OFFSET(5) NUMBITS(1) [],
        /// XOSC0 Clock Switch, status only
        XOSCCKSW0 OFFSET(4) NUMBITS(1) [],
        /// XOSC1 Clock Failure Detector
        XOSCFAIL1 OFFSET(3) NUMBITS(1) [],
        /// XOSC0 Clock Failure Detector
        XOSCFAIL0 OFFSET(2) NUMBITS(1) [],
        /// XOSC1 Ready
        XOSCRDY1 OFFSET(1) NUMBITS(1) [],
        /// XOSC0 Ready
        XOSCRDY0 OFFSET(0) NUMBITS(1) []
    ],
    pub XOSCCTRL [
        /// Clock Failure Detector Prescaler
        CFDPRESC OFFSET(24) NUMBITS(4) [],
        /// Start-Up Time, 2^STARTUP cycles of OSCULP32K
        STARTUP OFFSET(20) NUMBITS(4) [],
        /// Xosc Clock Switch Enable
        SWBEN OFFSET(17) NUMBITS(1) [],
        /// Clock Failure Detector Enable
        CFDEN OFFSET(16) NUMBITS(1) [],
        /// Automatic Loop Control Enable
        ENALC OFFSET(15) NUMBITS(1) [],
        /// Oscillator Current Multiplier
        IMULT OFFSET(11) NUMBITS(4) [],
        /// Oscillator Current Reference
        IPTAT OFFSET(9) NUMBITS(2) [],
        /// Low Buffer Gain Enable
        LOWBUFGAIN OFFSET(8) NUMBITS(1) [],
        /// On Demand Control
        ONDEMAND OFFSET(7) NUMBITS(1) [],
        /// Run in Standby
        RUNSTDBY OFFSET(6) NUMBITS(1) [],
        /// Crystal Oscillator Enable
        XTALEN OFFSET(2) NUMBITS(1) [],
        /// Oscillator Enable
        ENABLE OFFSET(1) NUMBITS(1) []
    ],
    pub DFLLVAL [
        /// Multiplication Ratio Difference
        DIFF OFFSET(16) NUMBITS(16) [],
        /// Coarse Value
        COARSE OFFSET(10) NUMBITS(6) [],
        /// Fine Value
        FINE OFFSET(0) NUMBITS(8) []
    ],
    pub DFLLMUL [
        /// Coarse Maximum Step
        CSTEP OFFSET(26) NUMBITS(6) [],
        /// Fine Maximum Step
        FSTEP OFFSET(16) NUMBITS(8) [],
        /// DFLL Multiply Factor
        MUL OFFSET(0) NUMBITS(16) []
    ],
    pub DPLLRATIO [
        /// Loop Divider Ratio Fractional Part
        LDRFRAC OFFSET(16) NUMBITS(5) [],
        /// Loop Divider Ratio
        LDR OFFSET(0) NUMBITS(13) []
    ],
    pub DPLLCTRLB [
        /// Clock Divider, for XOSC references
        DIV OFFSET(16) NUMBITS(11) [],
        /// DCO Filter Enable
        DCOEN OFFSET(15) NUMBITS(1) [],
        /// Sigma-Delta DCO Filter Selection
        DCOFILTER OFFSET(12) NUMBITS(3) [],
        /// Lock Bypass
        LBYPASS OFFSET(11) NUMBITS(1) [],
        /// Lock Time
        LTIME OFFSET(8) NUMBITS(3) [
            Default = 0,
            Time800us = 4,
            Time900us = 5,
            Time1ms = 6,
            Time1p1ms = 7
        ],
        /// Reference Clock Selection
        REFCLK OFFSET(5) NUMBITS(3) [
            GCLK = 0,
            XOSC32 = 1,
            XOSC0 = 2,
            XOSC1 = 3
        ],
        /// Wake Up Fast
        WUF OFFSET(4) NUMBITS(1) [],
        /// Proportional Integral Filter Selection
        FILTER OFFSET(0) NUMBITS(4) []
    ],
    pub DPLLSYNCBUSY [
        /// DPLL Loop Divider Ratio Synchronization Status
        DPLLRATIO OFFSET(2) NUMBITS(1) [],
        /// DPLL Enable Synchronization Status
        ENABLE OFFSET(1) NUMBITS(1) []
    ],
    pub DPLLSTATUS [
        /// DPLL Clock Ready
        CLKRDY OFFSET(1) NUMBITS(1) [],
        /// DPLL Lock
        LOCK OFFSET(0) NUMBITS(1) []
    ]
];

const OSCCTRL: StaticRef<OscctrlRegisters> =
    unsafe { StaticRef::new(OSCCTRL_BASE as *const OscctrlRegisters) };

/// Frequency of the DFLL in open-loop mode after reset, and its closed-loop
/// target.
pub const DFLL_FREQUENCY_HZ: u32 = 48_000_000;
/// Crystal or external clock range accepted on XOSC0/1.
pub const XOSC_MIN_FREQUENCY_HZ: u32 = 8_000_000;
pub const XOSC_MAX_FREQUENCY_HZ: u32 = 48_000_000;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Xosc {
    Xosc0 = 0,
    Xosc1 = 1,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Dpll {
    Dpll0 = 0,
    Dpll1 = 1,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct XoscConfig {
    pub frequency_hz: u32,
    /// A crystal is fitted between XIN and XOUT. When false, XIN takes an
    /// external clock.
    pub crystal: bool,
    /// Start-up time as a power of two of OSCULP32K cycles, 0 to 15.
    pub startup: u8,
    pub on_demand: bool,
    pub run_in_standby: bool,
    pub failure_detection: bool,
}

impl XoscConfig {
    pub const fn crystal(frequency_hz: u32) -> Self {
        XoscConfig {
            frequency_hz,
            crystal: true,
            startup: 0,
            on_demand: false,
            run_in_standby: false,
            failure_detection: false,
        }
    }

    pub fn validate(&self) -> Result<(), ErrorCode> {
        let min = if self.crystal { XOSC_MIN_FREQUENCY_HZ } else { 1 };
        if self.frequency_hz < min || self.frequency_hz > XOSC_MAX_FREQUENCY_HZ {
            debug!("XOSC: {} Hz is out of range", self.frequency_hz);
            return Err(ErrorCode::INVAL);
        }
        if self.startup > 15 {
            return Err(ErrorCode::INVAL);
        }
        Ok(())
    }

    /// Recommended `(IMULT, IPTAT)` drive settings for the crystal frequency.
    pub const fn drive_settings(&self) -> (u32, u32) {
        match self.frequency_hz {
            0..=8_000_000 => (3, 2),
            8_000_001..=16_000_000 => (4, 3),
            16_000_001..=24_000_000 => (5, 3),
            _ => (6, 3),
        }
    }

    /// `XOSCCTRL` value for this configuration, with `ENABLE` set.
    pub fn xoscctrl_value(&self) -> Result<FieldValue<u32, XOSCCTRL::Register>, ErrorCode> {
        self.validate()?;
        let (imult, iptat) = self.drive_settings();
        let drive = if self.crystal {
            XOSCCTRL::XTALEN::SET
                + XOSCCTRL::ENALC::SET
                + XOSCCTRL::IMULT.val(imult)
                + XOSCCTRL::IPTAT.val(iptat)
        } else {
            XOSCCTRL::XTALEN::CLEAR
        };
        Ok(drive
            + XOSCCTRL::ENABLE::SET
            + XOSCCTRL::STARTUP.val(self.startup as u32)
            + XOSCCTRL::ONDEMAND.val(self.on_demand as u32)
            + XOSCCTRL::RUNSTDBY.val(self.run_in_standby as u32)
            + XOSCCTRL::CFDEN.val(self.failure_detection as u32))
    }
}

/// Reference clock of a DPLL.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DpllReference {
    /// Its own GCLK peripheral channel (`OSCCTRL_FDPLLn`).
    Gclk,
    Xosc32k,
    Xosc0,
    Xosc1,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DpllConfig {
    pub reference: DpllReference,
    /// Frequency of the selected reference source in Hz.
    pub source_hz: u32,
    /// XOSC reference divider; the DPLL sees source / (2 * (div + 1)).
    pub div: u32,
    /// Integer part of the loop divider ratio, minus one.
    pub ldr: u32,
    /// Fractional part of the loop divider ratio, in 1/32.
    pub ldrfrac: u32,
    pub lock_bypass: bool,
    pub wake_up_fast: bool,
}

impl DpllConfig {
    /// Loop divider settings that bring `source_hz` closest to
    /// `target_hz` from below.
    pub fn for_output(reference: DpllReference, source_hz: u32, div: u32, target_hz: u32) -> Self {
        let mut config = DpllConfig {
            reference,
            source_hz,
            div,
            ldr: 0,
            ldrfrac: 0,
            lock_bypass: false,
            wake_up_fast: false,
        };
        let reference_hz = config.reference_frequency() as u64;
        if reference_hz != 0 {
            let ratio32 = target_hz as u64 * 32 / reference_hz;
            config.ldr = ((ratio32 / 32) as u32).saturating_sub(1);
            config.ldrfrac = (ratio32 % 32) as u32;
        }
        config
    }

    /// Frequency at the phase detector input.
    pub const fn reference_frequency(&self) -> u32 {
        match self.reference {
            DpllReference::Xosc0 | DpllReference::Xosc1 => {
                self.source_hz / self.div.saturating_add(1).saturating_mul(2)
            }
            DpllReference::Gclk | DpllReference::Xosc32k => self.source_hz,
        }
    }

    /// fCK = fCKR * (LDR + 1 + LDRFRAC / 32)
    const fn output_frequency_hz(&self) -> u64 {
        let reference = self.reference_frequency() as u64;
        reference * (self.ldr as u64 + 1) + reference * self.ldrfrac as u64 / 32
    }

    /// Output frequency in Hz, saturating at `u32::MAX` for ratios no DPLL
    /// can produce.
    pub const fn output_frequency(&self) -> u32 {
        let output = self.output_frequency_hz();
        if output > u32::MAX as u64 {
            u32::MAX
        } else {
            output as u32
        }
    }

    pub fn validate<S: ClockConstants>(&self) -> Result<(), ErrorCode> {
        if self.ldr > DPLLRATIO::LDR.mask
            || self.ldrfrac > DPLLRATIO::LDRFRAC.mask
            || self.div > DPLLCTRLB::DIV.mask
        {
            return Err(ErrorCode::INVAL);
        }
        let reference = self.reference_frequency();
        if reference < S::DPLL_MIN_REF_HZ || reference > S::DPLL_MAX_REF_HZ {
            debug!("DPLL: reference {} Hz is out of range", reference);
            return Err(ErrorCode::NOSUPPORT);
        }
        let output = self.output_frequency_hz();
        if output > S::DPLL_MAX_OUTPUT_HZ as u64 {
            debug!("DPLL: output {} Hz is above the limit", output);
            return Err(ErrorCode::SIZE);
        }
        if output < S::DPLL_MIN_OUTPUT_HZ as u64 {
            debug!("DPLL: output {} Hz is below the limit", output);
            return Err(ErrorCode::NOSUPPORT);
        }
        Ok(())
    }

    pub fn ratio_value(&self) -> FieldValue<u32, DPLLRATIO::Register> {
        DPLLRATIO::LDR.val(self.ldr) + DPLLRATIO::LDRFRAC.val(self.ldrfrac)
    }

    pub fn ctrlb_value(&self) -> FieldValue<u32, DPLLCTRLB::Register> {
        let refclk = match self.reference {
            DpllReference::Gclk => DPLLCTRLB::REFCLK::GCLK,
            DpllReference::Xosc32k => DPLLCTRLB::REFCLK::XOSC32,
            DpllReference::Xosc0 => DPLLCTRLB::REFCLK::XOSC0,
            DpllReference::Xosc1 => DPLLCTRLB::REFCLK::XOSC1,
        };
        refclk
            + DPLLCTRLB::DIV.val(self.div)
            + DPLLCTRLB::LBYPASS.val(self.lock_bypass as u32)
            + DPLLCTRLB::WUF.val(self.wake_up_fast as u32)
    }
}

/// `DFLLMUL.MUL` that locks the DFLL at 48 MHz to a reference of
/// `reference_hz` in closed-loop mode.
pub fn dfll_closed_loop_multiplier(reference_hz: u32) -> Result<u32, ErrorCode> {
    if reference_hz == 0 || reference_hz > DFLL_FREQUENCY_HZ {
        return Err(ErrorCode::INVAL);
    }
    Ok(DFLL_FREQUENCY_HZ / reference_hz)
}

pub struct Oscctrl {
    registers: StaticRef<OscctrlRegisters>,
}

impl Oscctrl {
    pub const fn new() -> Oscctrl {
        Oscctrl { registers: OSCCTRL }
    }

    #[cfg(test)]
    pub(crate) fn with_registers(registers: StaticRef<OscctrlRegisters>) -> Oscctrl {
        Oscctrl { registers }
    }

    pub fn configure_xosc(&self, xosc: Xosc, config: XoscConfig) -> Result<(), ErrorCode> {
        let value = config.xoscctrl_value()?;
        self.registers.xoscctrl[xosc as usize].write(value);
        Ok(())
    }

    pub fn disable_xosc(&self, xosc: Xosc) {
        self.registers.xoscctrl[xosc as usize].modify(XOSCCTRL::ENABLE::CLEAR);
    }

    pub fn is_xosc_ready(&self, xosc: Xosc) -> bool {
        match xosc {
            Xosc::Xosc0 => self.registers.status.is_set(INT::XOSCRDY0),
            Xosc::Xosc1 => self.registers.status.is_set(INT::XOSCRDY1),
        }
    }

    pub fn is_dfll_enabled(&self) -> bool {
        self.registers.dfllctrla.is_set(DFLLCTRLA::ENABLE)
    }

    pub fn is_dfll_ready(&self) -> bool {
        self.registers.status.is_set(INT::DFLLRDY)
    }

    /// Put the DFLL in closed-loop mode against its GCLK reference running
    /// at `reference_hz`.
    pub fn set_dfll_closed_loop(&self, reference_hz: u32) -> Result<(), ErrorCode> {
        let mul = dfll_closed_loop_multiplier(reference_hz)?;
        self.registers
            .dfllmul
            .modify(DFLLMUL::MUL.val(mul) + DFLLMUL::CSTEP.val(1) + DFLLMUL::FSTEP.val(1));
        self.registers
            .dfllctrlb
            .modify(DFLLCTRLB::MODE::ClosedLoop + DFLLCTRLB::WAITLOCK::SET);
        Ok(())
    }

    /// Program the ratio and reference of `dpll`, then enable it. The caller
    /// waits for [`Oscctrl::is_dpll_locked`] before switching a generator to
    /// it.
    pub fn configure_dpll<S: ClockConstants>(
        &self,
        dpll: Dpll,
        config: &DpllConfig,
    ) -> Result<(), ErrorCode> {
        config.validate::<S>()?;
        let regs = &self.registers.dpll[dpll as usize];
        regs.ctrla.modify(DPLLCTRLA::ENABLE::CLEAR);
        regs.ratio.write(config.ratio_value());
        regs.ctrlb.write(config.ctrlb_value());
        regs.ctrla.modify(DPLLCTRLA::ENABLE::SET);
        Ok(())
    }

    pub fn disable_dpll(&self, dpll: Dpll) {
        self.registers.dpll[dpll as usize]
            .ctrla
            .modify(DPLLCTRLA::ENABLE::CLEAR);
    }

    pub fn is_dpll_locked(&self, dpll: Dpll) -> bool {
        let status = &self.registers.dpll[dpll as usize].status;
        status.is_set(DPLLSTATUS::LOCK) && status.is_set(DPLLSTATUS::CLKRDY)
    }

    /// Output frequency `dpll` is programmed for, given the frequency of its
    /// reference source.
    pub fn dpll_frequency(&self, dpll: Dpll, source_hz: u32) -> u32 {
        let regs = &self.registers.dpll[dpll as usize];
        let reference = match regs.ctrlb.read_as_enum(DPLLCTRLB::REFCLK) {
            Some(DPLLCTRLB::REFCLK::Value::XOSC0) => DpllReference::Xosc0,
            Some(DPLLCTRLB::REFCLK::Value::XOSC1) => DpllReference::Xosc1,
            Some(DPLLCTRLB::REFCLK::Value::XOSC32) => DpllReference::Xosc32k,
            _ => DpllReference::Gclk,
        };
        DpllConfig {
            reference,
            source_hz,
            div: regs.ctrlb.read(DPLLCTRLB::DIV),
            ldr: regs.ratio.read(DPLLRATIO::LDR),
            ldrfrac: regs.ratio.read(DPLLRATIO::LDRFRAC),
            lock_bypass: false,
            wake_up_fast: false,
        }
        .output_frequency()
    }
}

/// On-target checks of the oscillator state right after reset.
///
/// **NOTE:** All these tests assume default boot configuration.
pub mod tests {
    use super::*;

    pub fn run(oscctrl: &Oscctrl) {
        debug!("");
        debug!("===============================================");
        debug!("Testing OSCCTRL reset state...");

        // DFLL48M in open loop is the only oscillator running
        assert!(oscctrl.is_dfll_enabled());
        assert!(oscctrl.is_dfll_ready());
        assert!(!oscctrl.is_dpll_locked(Dpll::Dpll0));
        assert!(!oscctrl.is_dpll_locked(Dpll::Dpll1));
        assert_eq!(oscctrl.registers.dpll[0].ratio.get(), 0);

        debug!("Finished testing OSCCTRL reset state. Everything is alright!");
        debug!("===============================================");
        debug!("");
    }
}

#[cfg(test)]
mod register_tests {
    use super::*;
    use core::mem::{offset_of, size_of};

    enum Specs {}
    impl ClockConstants for Specs {}

    #[test]
    fn layout() {
        assert_eq!(offset_of!(OscctrlRegisters, status), 0x10);
        assert_eq!(offset_of!(OscctrlRegisters, xoscctrl), 0x14);
        assert_eq!(offset_of!(OscctrlRegisters, dfllctrla), 0x1c);
        assert_eq!(offset_of!(OscctrlRegisters, dfllctrlb), 0x20);
        assert_eq!(offset_of!(OscctrlRegisters, dfllmul), 0x28);
        assert_eq!(offset_of!(OscctrlRegisters, dfllsync), 0x2c);
        assert_eq!(offset_of!(OscctrlRegisters, dpll), 0x30);
        assert_eq!(offset_of!(DpllRegisters, status), 0x10);
        assert_eq!(size_of::<DpllRegisters>(), 0x14);
        assert_eq!(size_of::<OscctrlRegisters>(), 0x58);
        assert_eq!(INT::DPLL1LCKR.shift, 24);
        assert_eq!(XOSCCTRL::IMULT.mask << XOSCCTRL::IMULT.shift, 0x7800);
        assert_eq!(DPLLCTRLB::DIV.mask << DPLLCTRLB::DIV.shift, 0x07ff_0000);
    }

    #[test]
    fn dpll_from_32k_crystal() {
        let config = DpllConfig::for_output(DpllReference::Xosc32k, 32_768, 0, 120_000_000);
        assert_eq!(config.ldr, 3661);
        assert_eq!(config.ldrfrac, 3);
        assert_eq!(config.output_frequency(), 119_999_488);
        assert_eq!(config.validate::<Specs>(), Ok(()));
    }

    #[test]
    fn dpll_from_divided_xosc() {
        // 12 MHz / (2 * (5 + 1)) = 1 MHz reference, 1 MHz * 200 = 200 MHz
        let config = DpllConfig::for_output(DpllReference::Xosc0, 12_000_000, 5, 200_000_000);
        assert_eq!(config.reference_frequency(), 1_000_000);
        assert_eq!(config.ldr, 199);
        assert_eq!(config.ldrfrac, 0);
        assert_eq!(config.validate::<Specs>(), Ok(()));

        let too_fast = DpllConfig { ldr: 200, ..config };
        assert_eq!(too_fast.validate::<Specs>(), Err(ErrorCode::SIZE));
        let too_slow = DpllConfig { ldr: 50, ..config };
        assert_eq!(too_slow.validate::<Specs>(), Err(ErrorCode::NOSUPPORT));
        let undivided = DpllConfig { div: 0, ..config };
        assert_eq!(undivided.validate::<Specs>(), Err(ErrorCode::NOSUPPORT));
        let bad_div = DpllConfig { div: 0x800, ..config };
        assert_eq!(bad_div.validate::<Specs>(), Err(ErrorCode::INVAL));
    }

    #[test]
    fn dpll_ratio_beyond_u32() {
        // 537 kHz * 8177 is about 4.39 GHz, well past what fits in a u32
        let config = DpllConfig {
            reference: DpllReference::Gclk,
            source_hz: 537_000,
            div: 0,
            ldr: 8176,
            ldrfrac: 0,
            lock_bypass: false,
            wake_up_fast: false,
        };
        assert_eq!(config.output_frequency(), u32::MAX);
        assert_eq!(config.validate::<Specs>(), Err(ErrorCode::SIZE));

        let regs: OscctrlRegisters = unsafe { core::mem::zeroed() };
        let oscctrl = Oscctrl::with_registers(unsafe { StaticRef::new(&regs) });
        assert_eq!(
            oscctrl.configure_dpll::<Specs>(Dpll::Dpll0, &config),
            Err(ErrorCode::SIZE)
        );
        assert!(!regs.dpll[0].ctrla.is_set(DPLLCTRLA::ENABLE));
    }

    #[test]
    fn configure_dpll() {
        let regs: OscctrlRegisters = unsafe { core::mem::zeroed() };
        let oscctrl = Oscctrl::with_registers(unsafe { StaticRef::new(&regs) });
        let config = DpllConfig::for_output(DpllReference::Xosc32k, 32_768, 0, 120_000_000);

        oscctrl.configure_dpll::<Specs>(Dpll::Dpll0, &config).unwrap();
        assert_eq!(regs.dpll[0].ratio.get(), (3 << 16) | 3661);
        assert_eq!(regs.dpll[0].ctrlb.get(), 1 << 5);
        assert!(regs.dpll[0].ctrla.is_set(DPLLCTRLA::ENABLE));
        assert_eq!(regs.dpll[1].ratio.get(), 0);
        assert_eq!(oscctrl.dpll_frequency(Dpll::Dpll0, 32_768), 119_999_488);

        let bad = DpllConfig { ldr: 100, ..config };
        assert_eq!(
            oscctrl.configure_dpll::<Specs>(Dpll::Dpll1, &bad),
            Err(ErrorCode::NOSUPPORT)
        );
        assert_eq!(regs.dpll[1].ctrla.get(), 0);
    }

    #[test]
    fn xosc() {
        let regs: OscctrlRegisters = unsafe { core::mem::zeroed() };
        let oscctrl = Oscctrl::with_registers(unsafe { StaticRef::new(&regs) });

        oscctrl
            .configure_xosc(Xosc::Xosc1, XoscConfig::crystal(12_000_000))
            .unwrap();
        let value = regs.xoscctrl[1].get();
        assert_eq!(value & 0b110, 0b110);
        assert_eq!(regs.xoscctrl[1].read(XOSCCTRL::IMULT), 4);
        assert_eq!(regs.xoscctrl[1].read(XOSCCTRL::IPTAT), 3);
        assert!(regs.xoscctrl[1].is_set(XOSCCTRL::ENALC));

        assert_eq!(
            oscctrl.configure_xosc(Xosc::Xosc0, XoscConfig::crystal(4_000_000)),
            Err(ErrorCode::INVAL)
        );
        let external = XoscConfig {
            crystal: false,
            ..XoscConfig::crystal(4_000_000)
        };
        assert_eq!(oscctrl.configure_xosc(Xosc::Xosc0, external), Ok(()));
        assert!(!regs.xoscctrl[0].is_set(XOSCCTRL::XTALEN));
    }

    #[test]
    fn dfll() {
        assert_eq!(dfll_closed_loop_multiplier(32_768), Ok(1464));
        assert_eq!(dfll_closed_loop_multiplier(1_000), Ok(48_000));
        assert_eq!(dfll_closed_loop_multiplier(0), Err(ErrorCode::INVAL));

        let regs: OscctrlRegisters = unsafe { core::mem::zeroed() };
        let oscctrl = Oscctrl::with_registers(unsafe { StaticRef::new(&regs) });
        oscctrl.set_dfll_closed_loop(1_000).unwrap();
        assert_eq!(regs.dfllmul.read(DFLLMUL::MUL), 48_000);
        assert!(regs.dfllctrlb.is_set(DFLLCTRLB::MODE));
    }
}
