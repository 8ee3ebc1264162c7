// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Clock tree configuration for the STM32L4 family.
//!
//! [`OscInit`] describes which oscillators run and how the main PLL is set
//! up, [`ClkInit`] picks SYSCLK and the bus prescalers. Both are checked
//! against the limits of a part ([`ClockConstants`]) and the regulator
//! voltage range, and produce the register values that select them. The
//! board sequences the oscillators itself, using the timeouts below.
//!
//! ```rust,ignore
//! let osc = OscInit {
//!     pll: PllInit::new(PllSource::Msi, 1, 40, 2),
//!     ..OscInit::default()
//! };
//! let clk = ClkInit::new(SysClkSource::Pll, AHBPrescaler::DivideBy1,
//!                        APBPrescaler::DivideBy1, APBPrescaler::DivideBy1);
//! let freqs = clk.frequencies::<Stm32l476Specs>(&osc, VOS::Range1)?;
//! assert_eq!(freqs.sysclk, 80_000_000);
//! ```

pub mod msi;

use crate::chip_specific::clock_constants::ClockConstants;
use crate::pwr::VOS;
use crate::rcc::{BDCR, CFGR, CR, CSR, ICSCR, PLLCFGR};
use chip_common::{debug, ErrorCode};
use msi::{MsiRange, MSI_CALIBRATION_DEFAULT};
use stm32::prescaler::{AHBPrescaler, APBPrescaler};
use tock_registers::fields::FieldValue;

/// Internal high-speed oscillator frequency in Hz
pub const HSI_VALUE: u32 = 16_000_000;
/// Internal low-speed oscillator frequency in Hz
pub const LSI_VALUE: u32 = 32_000;
/// External low-speed crystal frequency in Hz
pub const LSE_VALUE: u32 = 32_768;

/// Accepted HSE frequency range in Hz
pub const HSE_MIN_VALUE: u32 = 4_000_000;
pub const HSE_MAX_VALUE: u32 = 48_000_000;

/// Default HSI trimming value
pub const HSI_CALIBRATION_DEFAULT: u8 = 16;

// Timeouts in milliseconds.
pub const HSE_STARTUP_TIMEOUT: u32 = 100;
pub const MSI_TIMEOUT_VALUE: u32 = 2;
pub const HSI_TIMEOUT_VALUE: u32 = 2;
pub const LSI_TIMEOUT_VALUE: u32 = 2;
pub const PLL_TIMEOUT_VALUE: u32 = 2;
pub const LSE_STARTUP_TIMEOUT: u32 = 5000;
pub const LSE_TIMEOUT_VALUE: u32 = LSE_STARTUP_TIMEOUT;
pub const CLOCKSWITCH_TIMEOUT_VALUE: u32 = 5000;
pub const DBP_TIMEOUT_VALUE: u32 = 2;

const MHZ: u32 = 1_000_000;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum HseState {
    #[default]
    Off,
    On,
    /// External clock on OSC_IN, oscillator bypassed
    Bypass,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum LseState {
    #[default]
    Off,
    On,
    Bypass,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum HsiState {
    #[default]
    Off,
    On,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum MsiState {
    Off,
    #[default]
    On,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum LsiState {
    #[default]
    Off,
    On,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum PllState {
    /// Leave the PLL untouched
    #[default]
    None,
    Off,
    On,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum PllSource {
    #[default]
    Msi,
    Hsi,
    Hse,
}

/// Main PLL: `VCO = input / m * n`, `PLLCLK = VCO / r`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PllInit {
    pub state: PllState,
    pub source: PllSource,
    /// Input divider, 1 to 8
    pub m: u8,
    /// VCO multiplier, 8 to 86
    pub n: u8,
    /// SAI clock divider, 7 or 17
    pub p: u8,
    /// 48 MHz clock divider, 2, 4, 6 or 8
    pub q: u8,
    /// System clock divider, 2, 4, 6 or 8
    pub r: u8,
}

impl Default for PllInit {
    fn default() -> Self {
        Self {
            state: PllState::None,
            source: PllSource::Msi,
            m: 1,
            n: 16,
            p: 7,
            q: 2,
            r: 2,
        }
    }
}

fn is_even_divider(d: u8) -> bool {
    matches!(d, 2 | 4 | 6 | 8)
}

impl PllInit {
    /// A PLL that is switched on, with `p` and `q` at their reset values.
    pub const fn new(source: PllSource, m: u8, n: u8, r: u8) -> Self {
        Self {
            state: PllState::On,
            source,
            m,
            n,
            p: 7,
            q: 2,
            r,
        }
    }

    /// Check the factors when the PLL is to be switched on.
    pub fn validate(&self) -> Result<(), ErrorCode> {
        if self.state != PllState::On {
            return Ok(());
        }
        self.validate_factors()
    }

    fn validate_factors(&self) -> Result<(), ErrorCode> {
        if !(1..=8).contains(&self.m) {
            debug!("PLLM /{} out of range", self.m);
            return Err(ErrorCode::INVAL);
        }
        if !(8..=86).contains(&self.n) {
            debug!("PLLN x{} out of range", self.n);
            return Err(ErrorCode::INVAL);
        }
        if self.p != 7 && self.p != 17 {
            debug!("PLLP /{} out of range", self.p);
            return Err(ErrorCode::INVAL);
        }
        if !is_even_divider(self.q) || !is_even_divider(self.r) {
            debug!("PLLQ /{} or PLLR /{} out of range", self.q, self.r);
            return Err(ErrorCode::INVAL);
        }
        Ok(())
    }

    fn source_frequency<S: ClockConstants>(&self, msi: MsiRange) -> u32 {
        match self.source {
            PllSource::Msi => msi.frequency(),
            PllSource::Hsi => HSI_VALUE,
            PllSource::Hse => S::HSE_FREQUENCY_MHZ as u32 * MHZ,
        }
    }

    /// VCO frequency, checked against the VCO input and output ranges.
    pub fn vco_frequency<S: ClockConstants>(&self, msi: MsiRange) -> Result<u32, ErrorCode> {
        self.validate_factors()?;
        let input = self.source_frequency::<S>(msi) / self.m as u32;
        if input < S::MIN_VCO_INPUT_MHZ as u32 * MHZ || input > S::MAX_VCO_INPUT_MHZ as u32 * MHZ {
            debug!("PLL VCO input {} Hz out of range", input);
            return Err(ErrorCode::NOSUPPORT);
        }
        let vco = input * self.n as u32;
        if vco < S::MIN_VCO_OUTPUT_MHZ as u32 * MHZ || vco > S::MAX_VCO_OUTPUT_MHZ as u32 * MHZ {
            debug!("PLL VCO output {} Hz out of range", vco);
            return Err(ErrorCode::NOSUPPORT);
        }
        Ok(vco)
    }

    /// PLLCLK for this configuration.
    ///
    /// # Errors
    ///
    /// + [Err]\([ErrorCode::INVAL]\): a factor is out of range
    /// + [Err]\([ErrorCode::NOSUPPORT]\): the VCO input or output is outside
    ///   its range, or PLLCLK is below the PLL minimum
    /// + [Err]\([ErrorCode::SIZE]\): PLLCLK exceeds the part's limit
    pub fn output_frequency<S: ClockConstants>(&self, msi: MsiRange) -> Result<u32, ErrorCode> {
        let output = self.vco_frequency::<S>(msi)? / self.r as u32;
        if output > S::MAX_FREQ_MHZ as u32 * MHZ {
            debug!("PLL output {} Hz above limit", output);
            return Err(ErrorCode::SIZE);
        }
        if output < S::MIN_FREQ_MHZ as u32 * MHZ {
            debug!("PLL output {} Hz below limit", output);
            return Err(ErrorCode::NOSUPPORT);
        }
        Ok(output)
    }

    /// PLL48M1CLK (USB, RNG, SDMMC) for this configuration.
    pub fn q_frequency<S: ClockConstants>(&self, msi: MsiRange) -> Result<u32, ErrorCode> {
        Ok(self.vco_frequency::<S>(msi)? / self.q as u32)
    }

    /// The whole of `RCC_PLLCFGR`, with the R output enabled.
    pub fn pllcfgr_value(&self) -> FieldValue<u32, PLLCFGR::Register> {
        let source = match self.source {
            PllSource::Msi => PLLCFGR::PLLSRC::MSI,
            PllSource::Hsi => PLLCFGR::PLLSRC::HSI16,
            PllSource::Hse => PLLCFGR::PLLSRC::HSE,
        };
        let p = if self.p == 17 {
            PLLCFGR::PLLP::Div17
        } else {
            PLLCFGR::PLLP::Div7
        };
        source
            + PLLCFGR::PLLM.val(self.m.saturating_sub(1) as u32)
            + PLLCFGR::PLLN.val(self.n as u32)
            + p
            + PLLCFGR::PLLQ.val((self.q / 2).saturating_sub(1) as u32)
            + PLLCFGR::PLLR.val((self.r / 2).saturating_sub(1) as u32)
            + PLLCFGR::PLLREN::SET
    }
}

/// Requested oscillator configuration.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct OscInit {
    pub hse: HseState,
    pub lse: LseState,
    pub hsi: HsiState,
    /// HSI trimming value, 0 to 31
    pub hsi_calibration: u8,
    pub msi: MsiState,
    pub msi_range: MsiRange,
    /// MSI trimming value
    pub msi_calibration: u8,
    pub lsi: LsiState,
    pub pll: PllInit,
}

impl Default for OscInit {
    fn default() -> Self {
        Self {
            hse: HseState::Off,
            lse: LseState::Off,
            hsi: HsiState::Off,
            hsi_calibration: HSI_CALIBRATION_DEFAULT,
            msi: MsiState::On,
            msi_range: MsiRange::default(),
            msi_calibration: MSI_CALIBRATION_DEFAULT,
            lsi: LsiState::Off,
            pll: PllInit::default(),
        }
    }
}

impl OscInit {
    pub fn validate(&self) -> Result<(), ErrorCode> {
        if self.hsi_calibration > 0x1f {
            debug!("HSI calibration {} out of range", self.hsi_calibration);
            return Err(ErrorCode::INVAL);
        }
        self.pll.validate()?;
        if self.pll.state == PllState::On {
            let source_off = match self.pll.source {
                PllSource::Msi => self.msi == MsiState::Off,
                PllSource::Hsi => self.hsi == HsiState::Off,
                PllSource::Hse => self.hse == HseState::Off,
            };
            if source_off {
                debug!("PLL source {:?} is not enabled", self.pll.source);
                return Err(ErrorCode::INVAL);
            }
        }
        Ok(())
    }

    /// Oscillator and PLL enables, and the MSI range, in `RCC_CR`.
    pub fn cr_value(&self) -> FieldValue<u32, CR::Register> {
        let hse = match self.hse {
            HseState::Off => CR::HSEON::CLEAR + CR::HSEBYP::CLEAR,
            HseState::On => CR::HSEON::SET + CR::HSEBYP::CLEAR,
            HseState::Bypass => CR::HSEON::SET + CR::HSEBYP::SET,
        };
        let hsi = match self.hsi {
            HsiState::Off => CR::HSION::CLEAR,
            HsiState::On => CR::HSION::SET,
        };
        let msi = match self.msi {
            MsiState::Off => CR::MSION::CLEAR,
            MsiState::On => CR::MSION::SET + self.msi_range.cr_value(),
        };
        match self.pll.state {
            PllState::None => hse + hsi + msi,
            PllState::Off => hse + hsi + msi + CR::PLLON::CLEAR,
            PllState::On => hse + hsi + msi + CR::PLLON::SET,
        }
    }

    /// HSI and MSI trimming in `RCC_ICSCR`.
    pub fn icscr_value(&self) -> FieldValue<u32, ICSCR::Register> {
        ICSCR::HSITRIM.val(self.hsi_calibration as u32)
            + ICSCR::MSITRIM.val(self.msi_calibration as u32)
    }

    /// LSE enable in `RCC_BDCR`. Writing it needs backup domain access.
    pub fn bdcr_value(&self) -> FieldValue<u32, BDCR::Register> {
        match self.lse {
            LseState::Off => BDCR::LSEON::CLEAR + BDCR::LSEBYP::CLEAR,
            LseState::On => BDCR::LSEON::SET + BDCR::LSEBYP::CLEAR,
            LseState::Bypass => BDCR::LSEON::SET + BDCR::LSEBYP::SET,
        }
    }

    /// LSI enable in `RCC_CSR`.
    pub fn csr_value(&self) -> FieldValue<u32, CSR::Register> {
        match self.lsi {
            LsiState::Off => CSR::LSION::CLEAR,
            LsiState::On => CSR::LSION::SET,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SysClkSource {
    #[default]
    Msi,
    Hsi,
    Hse,
    Pll,
}

/// Requested system clock source and bus prescalers.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ClkInit {
    pub sysclk_source: SysClkSource,
    pub ahb: AHBPrescaler,
    pub apb1: APBPrescaler,
    pub apb2: APBPrescaler,
}

/// Resulting bus frequencies in Hz.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ClockFrequencies {
    pub sysclk: u32,
    pub hclk: u32,
    pub pclk1: u32,
    pub pclk2: u32,
    /// Clock of the timers on APB1
    pub tim_pclk1: u32,
    /// Clock of the timers on APB2
    pub tim_pclk2: u32,
}

impl ClkInit {
    pub const fn new(
        sysclk_source: SysClkSource,
        ahb: AHBPrescaler,
        apb1: APBPrescaler,
        apb2: APBPrescaler,
    ) -> Self {
        Self {
            sysclk_source,
            ahb,
            apb1,
            apb2,
        }
    }

    /// Check that the selected SYSCLK source is enabled by `osc`.
    pub fn validate(&self, osc: &OscInit) -> Result<(), ErrorCode> {
        let enabled = match self.sysclk_source {
            SysClkSource::Msi => osc.msi == MsiState::On,
            SysClkSource::Hsi => osc.hsi == HsiState::On,
            SysClkSource::Hse => osc.hse != HseState::Off,
            SysClkSource::Pll => osc.pll.state == PllState::On,
        };
        if !enabled {
            debug!("SYSCLK source {:?} is not enabled", self.sysclk_source);
            return Err(ErrorCode::INVAL);
        }
        Ok(())
    }

    /// Compute the bus frequencies `osc` and `self` produce on part `S`
    /// with the regulator in range `vos`.
    pub fn frequencies<S: ClockConstants>(
        &self,
        osc: &OscInit,
        vos: VOS,
    ) -> Result<ClockFrequencies, ErrorCode> {
        osc.validate()?;
        self.validate(osc)?;

        let uses_hse = self.sysclk_source == SysClkSource::Hse
            || (self.sysclk_source == SysClkSource::Pll && osc.pll.source == PllSource::Hse);
        let hse = S::HSE_FREQUENCY_MHZ as u32 * MHZ;
        if uses_hse && !(HSE_MIN_VALUE..=HSE_MAX_VALUE).contains(&hse) {
            debug!("HSE {} Hz out of range", hse);
            return Err(ErrorCode::NOSUPPORT);
        }

        let sysclk = match self.sysclk_source {
            SysClkSource::Msi => osc.msi_range.frequency(),
            SysClkSource::Hsi => HSI_VALUE,
            SysClkSource::Hse => hse,
            SysClkSource::Pll => osc.pll.output_frequency::<S>(osc.msi_range)?,
        };
        let limit = match vos {
            VOS::Range1 => S::SYS_CLOCK_FREQUENCY_LIMIT_MHZ,
            VOS::Range2 => S::SYS_CLOCK_FREQUENCY_LIMIT_RANGE2_MHZ,
        };
        if sysclk > limit as u32 * MHZ {
            debug!("SYSCLK {} Hz above limit for {:?}", sysclk, vos);
            return Err(ErrorCode::SIZE);
        }

        let hclk = self.ahb.divide(sysclk);
        let pclk1 = self.apb1.divide(hclk);
        let pclk2 = self.apb2.divide(hclk);
        if pclk1 > S::APB1_FREQUENCY_LIMIT_MHZ as u32 * MHZ {
            debug!("PCLK1 {} Hz above limit", pclk1);
            return Err(ErrorCode::SIZE);
        }
        if pclk2 > S::APB2_FREQUENCY_LIMIT_MHZ as u32 * MHZ {
            debug!("PCLK2 {} Hz above limit", pclk2);
            return Err(ErrorCode::SIZE);
        }

        Ok(ClockFrequencies {
            sysclk,
            hclk,
            pclk1,
            pclk2,
            tim_pclk1: self.apb1.timer_frequency(hclk),
            tim_pclk2: self.apb2.timer_frequency(hclk),
        })
    }

    /// `SW`, `HPRE`, `PPRE1` and `PPRE2` in `RCC_CFGR`.
    pub fn cfgr_value(&self) -> FieldValue<u32, CFGR::Register> {
        let sw = match self.sysclk_source {
            SysClkSource::Msi => CFGR::SW::MSI,
            SysClkSource::Hsi => CFGR::SW::HSI16,
            SysClkSource::Hse => CFGR::SW::HSE,
            SysClkSource::Pll => CFGR::SW::PLL,
        };
        sw + CFGR::HPRE.val(self.ahb as u32)
            + CFGR::PPRE1.val(self.apb1 as u32)
            + CFGR::PPRE2.val(self.apb2 as u32)
    }
}

impl Default for ClkInit {
    fn default() -> Self {
        Self::new(
            SysClkSource::Msi,
            AHBPrescaler::DivideBy1,
            APBPrescaler::DivideBy1,
            APBPrescaler::DivideBy1,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip_specific::clock_constants::{HseConstants, PllConstants, SystemClockConstants};
    use tock_registers::interfaces::{Readable, Writeable};
    use tock_registers::registers::InMemoryRegister;

    enum L476 {}
    impl PllConstants for L476 {}
    impl SystemClockConstants for L476 {}
    impl HseConstants for L476 {}

    fn full_speed() -> ClkInit {
        ClkInit::new(
            SysClkSource::Pll,
            AHBPrescaler::DivideBy1,
            APBPrescaler::DivideBy1,
            APBPrescaler::DivideBy1,
        )
    }

    #[test]
    fn reset_configuration_runs_from_msi() {
        let freqs = ClkInit::default()
            .frequencies::<L476>(&OscInit::default(), VOS::Range1)
            .unwrap();
        assert_eq!(freqs.sysclk, 4_000_000);
        assert_eq!(freqs.pclk2, 4_000_000);
    }

    #[test]
    fn msi_pll_at_80mhz() {
        let osc = OscInit {
            pll: PllInit::new(PllSource::Msi, 1, 40, 2),
            ..OscInit::default()
        };
        let freqs = full_speed().frequencies::<L476>(&osc, VOS::Range1).unwrap();
        assert_eq!(freqs.sysclk, 80_000_000);
        assert_eq!(freqs.pclk1, 80_000_000);
        assert_eq!(freqs.tim_pclk2, 80_000_000);
        assert_eq!(
            full_speed().frequencies::<L476>(&osc, VOS::Range2),
            Err(ErrorCode::SIZE)
        );
    }

    #[test]
    fn apb_dividers() {
        let osc = OscInit {
            pll: PllInit::new(PllSource::Msi, 1, 40, 2),
            ..OscInit::default()
        };
        let clk = ClkInit::new(
            SysClkSource::Pll,
            AHBPrescaler::DivideBy1,
            APBPrescaler::DivideBy4,
            APBPrescaler::DivideBy2,
        );
        let freqs = clk.frequencies::<L476>(&osc, VOS::Range1).unwrap();
        assert_eq!(freqs.pclk1, 20_000_000);
        assert_eq!(freqs.tim_pclk1, 40_000_000);
        assert_eq!(freqs.pclk2, 40_000_000);
        assert_eq!(freqs.tim_pclk2, 80_000_000);
    }

    #[test]
    fn pll_limits() {
        // HSE 8 MHz / 1 x 20 / 2 = 80 MHz
        let pll = PllInit::new(PllSource::Hse, 1, 20, 2);
        assert_eq!(pll.output_frequency::<L476>(MsiRange::default()), Ok(80_000_000));
        // VCO 176 MHz / 2 = 88 MHz
        let pll = PllInit::new(PllSource::Hse, 1, 22, 2);
        assert_eq!(
            pll.output_frequency::<L476>(MsiRange::default()),
            Err(ErrorCode::SIZE)
        );
        // 4 MHz / 2 = 2 MHz VCO input
        let pll = PllInit::new(PllSource::Msi, 2, 40, 2);
        assert_eq!(
            pll.output_frequency::<L476>(MsiRange::default()),
            Err(ErrorCode::NOSUPPORT)
        );
        // VCO 16 MHz x 8 = 128 MHz, / 8 = 16 MHz
        let pll = PllInit::new(PllSource::Hsi, 1, 8, 8);
        assert_eq!(pll.output_frequency::<L476>(MsiRange::default()), Ok(16_000_000));
        // MSI 48 MHz is above the 16 MHz VCO input limit
        let pll = PllInit::new(PllSource::Msi, 1, 86, 2);
        assert_eq!(
            pll.output_frequency::<L476>(MsiRange::Range48M),
            Err(ErrorCode::NOSUPPORT)
        );
        let pll = PllInit::new(PllSource::Msi, 1, 40, 3);
        assert_eq!(pll.validate(), Err(ErrorCode::INVAL));
        let pll = PllInit::new(PllSource::Msi, 9, 40, 2);
        assert_eq!(pll.validate(), Err(ErrorCode::INVAL));
        let pll = PllInit {
            p: 8,
            ..PllInit::new(PllSource::Msi, 1, 40, 2)
        };
        assert_eq!(pll.validate(), Err(ErrorCode::INVAL));
    }

    #[test]
    fn pll_factors_checked_when_off() {
        let pll = PllInit {
            state: PllState::Off,
            ..PllInit::new(PllSource::Msi, 0, 40, 2)
        };
        assert_eq!(pll.validate(), Ok(()));
        assert_eq!(
            pll.vco_frequency::<L476>(MsiRange::default()),
            Err(ErrorCode::INVAL)
        );
        assert_eq!(
            pll.output_frequency::<L476>(MsiRange::default()),
            Err(ErrorCode::INVAL)
        );
    }

    #[test]
    fn usb_clock_from_pll_q() {
        // VCO 192 MHz / 4 = 48 MHz
        let pll = PllInit {
            q: 4,
            ..PllInit::new(PllSource::Hse, 1, 24, 4)
        };
        assert_eq!(pll.q_frequency::<L476>(MsiRange::default()), Ok(48_000_000));
    }

    #[test]
    fn range2_limit() {
        let clk = ClkInit::default();
        let osc = OscInit {
            msi_range: MsiRange::Range24M,
            ..OscInit::default()
        };
        assert!(clk.frequencies::<L476>(&osc, VOS::Range2).is_ok());
        let osc = OscInit {
            msi_range: MsiRange::Range32M,
            ..OscInit::default()
        };
        assert_eq!(
            clk.frequencies::<L476>(&osc, VOS::Range2),
            Err(ErrorCode::SIZE)
        );
    }

    #[test]
    fn source_must_be_enabled() {
        let clk = ClkInit::new(
            SysClkSource::Hsi,
            AHBPrescaler::DivideBy1,
            APBPrescaler::DivideBy1,
            APBPrescaler::DivideBy1,
        );
        assert_eq!(clk.validate(&OscInit::default()), Err(ErrorCode::INVAL));

        let osc = OscInit {
            pll: PllInit::new(PllSource::Hse, 1, 20, 2),
            ..OscInit::default()
        };
        assert_eq!(osc.validate(), Err(ErrorCode::INVAL));
    }

    #[test]
    fn register_encodings() {
        let pllcfgr = InMemoryRegister::<u32, PLLCFGR::Register>::new(0);
        pllcfgr.write(PllInit::new(PllSource::Hse, 1, 20, 2).pllcfgr_value());
        // PLLREN | PLLN = 20 | PLLSRC = HSE
        assert_eq!(pllcfgr.get(), 0x0100_1403);

        let cr = InMemoryRegister::<u32, CR::Register>::new(0);
        cr.write(OscInit::default().cr_value());
        // MSIRANGE = 4 MHz | MSIRGSEL | MSION
        assert_eq!(cr.get(), 0x69);

        let cfgr = InMemoryRegister::<u32, CFGR::Register>::new(0);
        let clk = ClkInit::new(
            SysClkSource::Pll,
            AHBPrescaler::DivideBy1,
            APBPrescaler::DivideBy4,
            APBPrescaler::DivideBy1,
        );
        cfgr.write(clk.cfgr_value());
        assert_eq!(cfgr.get(), 0x0503);

        let icscr = InMemoryRegister::<u32, ICSCR::Register>::new(0);
        icscr.write(OscInit::default().icscr_value());
        assert_eq!(icscr.get(), 0x1000_0000);
    }
}
