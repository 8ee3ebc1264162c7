// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Clock tree configuration for the STM32F3 family.
//!
//! The types here describe a requested oscillator and bus configuration
//! ([`OscInit`], [`ClkInit`]), check it against the limits of a part
//! ([`ClockConstants`]) and produce the register values that select it.
//! Sequencing the oscillators (enable, wait for the ready flag, switch) is
//! left to the board, using the timeouts below.
//!
//! ```rust,ignore
//! let osc = OscInit {
//!     hse: HseState::Bypass,
//!     pll: PllInit::new(PllSource::Hse, 9, 1),
//!     ..OscInit::default()
//! };
//! let clk = ClkInit::new(SysClkSource::Pll, AHBPrescaler::DivideBy1,
//!                        APBPrescaler::DivideBy2, APBPrescaler::DivideBy1);
//! let freqs = clk.frequencies::<Stm32f303Specs>(&osc)?;
//! assert_eq!(freqs.sysclk, 72_000_000);
//! ```

use crate::chip_specific::clock_constants::ClockConstants;
use crate::rcc::{BDCR, CFGR, CFGR2, CR, CSR};
use chip_common::{debug, ErrorCode};
use stm32::prescaler::{AHBPrescaler, APBPrescaler};
use tock_registers::fields::FieldValue;

/// Internal high-speed oscillator frequency in Hz
pub const HSI_VALUE: u32 = 8_000_000;
/// Internal low-speed oscillator frequency in Hz
pub const LSI_VALUE: u32 = 40_000;
/// External low-speed crystal frequency in Hz
pub const LSE_VALUE: u32 = 32_768;

/// Accepted HSE frequency range in Hz
pub const HSE_MIN_VALUE: u32 = 4_000_000;
pub const HSE_MAX_VALUE: u32 = 32_000_000;

/// Default HSI trimming value
pub const HSI_CALIBRATION_DEFAULT: u8 = 0x10;

// Timeouts in milliseconds.
pub const HSE_STARTUP_TIMEOUT: u32 = 100;
pub const HSI_TIMEOUT_VALUE: u32 = 2;
pub const LSI_TIMEOUT_VALUE: u32 = 2;
pub const PLL_TIMEOUT_VALUE: u32 = 2;
pub const LSE_STARTUP_TIMEOUT: u32 = 5000;
pub const LSE_TIMEOUT_VALUE: u32 = LSE_STARTUP_TIMEOUT;
pub const CLOCKSWITCH_TIMEOUT_VALUE: u32 = 5000;
pub const DBP_TIMEOUT_VALUE: u32 = 100;

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
    HsiDiv2,
    /// HSE divided by `PREDIV`
    Hse,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PllInit {
    pub state: PllState,
    pub source: PllSource,
    /// Multiplication factor, 2 to 16
    pub mul: u8,
    /// HSE predivider, 1 to 16
    pub prediv: u8,
}

impl Default for PllInit {
    fn default() -> Self {
        Self {
            state: PllState::None,
            source: PllSource::HsiDiv2,
            mul: 2,
            prediv: 1,
        }
    }
}

impl PllInit {
    /// A PLL that is switched on.
    pub const fn new(source: PllSource, mul: u8, prediv: u8) -> Self {
        Self {
            state: PllState::On,
            source,
            mul,
            prediv,
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
        if !(2..=16).contains(&self.mul) {
            debug!("PLL multiplier x{} out of range", self.mul);
            return Err(ErrorCode::INVAL);
        }
        if !(1..=16).contains(&self.prediv) {
            debug!("PLL predivider /{} out of range", self.prediv);
            return Err(ErrorCode::INVAL);
        }
        Ok(())
    }

    /// Frequency entering the PLL multiplier.
    pub fn input_frequency<S: ClockConstants>(&self) -> u32 {
        match self.source {
            PllSource::HsiDiv2 => HSI_VALUE / 2,
            PllSource::Hse => (S::HSE_FREQUENCY_MHZ as u32 * MHZ)
                .checked_div(self.prediv as u32)
                .unwrap_or(0),
        }
    }

    /// PLLCLK for this configuration.
    ///
    /// # Errors
    ///
    /// + [Err]\([ErrorCode::INVAL]\): a factor is out of range
    /// + [Err]\([ErrorCode::NOSUPPORT]\): the PLL input or output is below
    ///   what the PLL can lock on
    /// + [Err]\([ErrorCode::SIZE]\): the output exceeds the part's limit
    pub fn output_frequency<S: ClockConstants>(&self) -> Result<u32, ErrorCode> {
        self.validate_factors()?;
        let input = self.input_frequency::<S>();
        if input < S::MIN_INPUT_FREQ_MHZ as u32 * MHZ || input > S::MAX_INPUT_FREQ_MHZ as u32 * MHZ
        {
            debug!("PLL input {} Hz out of range", input);
            return Err(ErrorCode::NOSUPPORT);
        }
        let output = input * self.mul as u32;
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

    /// `PLLSRC` and `PLLMUL` in `RCC_CFGR`.
    pub fn cfgr_value(&self) -> FieldValue<u32, CFGR::Register> {
        let source = match self.source {
            PllSource::HsiDiv2 => CFGR::PLLSRC::HSIDiv2,
            PllSource::Hse => CFGR::PLLSRC::HSEPrediv,
        };
        // PLLMUL 0b1111 is also x16; always use the canonical 0b1110.
        source + CFGR::PLLMUL.val(self.mul.clamp(2, 16) as u32 - 2)
    }

    /// `PREDIV` in `RCC_CFGR2`.
    pub fn cfgr2_value(&self) -> FieldValue<u32, CFGR2::Register> {
        CFGR2::PREDIV.val(self.prediv.clamp(1, 16) as u32 - 1)
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
    pub lsi: LsiState,
    pub pll: PllInit,
}

impl Default for OscInit {
    fn default() -> Self {
        Self {
            hse: HseState::Off,
            lse: LseState::Off,
            hsi: HsiState::On,
            hsi_calibration: HSI_CALIBRATION_DEFAULT,
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
                PllSource::HsiDiv2 => self.hsi == HsiState::Off,
                PllSource::Hse => self.hse == HseState::Off,
            };
            if source_off {
                debug!("PLL source {:?} is not enabled", self.pll.source);
                return Err(ErrorCode::INVAL);
            }
        }
        Ok(())
    }

    /// Oscillator and PLL enables in `RCC_CR`.
    pub fn cr_value(&self) -> FieldValue<u32, CR::Register> {
        let hse = match self.hse {
            HseState::Off => CR::HSEON::CLEAR + CR::HSEBYP::CLEAR,
            HseState::On => CR::HSEON::SET + CR::HSEBYP::CLEAR,
            HseState::Bypass => CR::HSEON::SET + CR::HSEBYP::SET,
        };
        let hsi = match self.hsi {
            HsiState::Off => CR::HSION::CLEAR,
            HsiState::On => CR::HSION::SET + CR::HSITRIM.val(self.hsi_calibration as u32),
        };
        match self.pll.state {
            PllState::None => hse + hsi,
            PllState::Off => hse + hsi + CR::PLLON::CLEAR,
            PllState::On => hse + hsi + CR::PLLON::SET,
        }
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

    /// Compute the bus frequencies `osc` and `self` produce on part `S`.
    pub fn frequencies<S: ClockConstants>(
        &self,
        osc: &OscInit,
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
            SysClkSource::Hsi => HSI_VALUE,
            SysClkSource::Hse => hse,
            SysClkSource::Pll => osc.pll.output_frequency::<S>()?,
        };
        if sysclk > S::SYS_CLOCK_FREQUENCY_LIMIT_MHZ as u32 * MHZ {
            debug!("SYSCLK {} Hz above limit", sysclk);
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
            SysClkSource::Hsi => CFGR::SW::HSI,
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
            SysClkSource::Hsi,
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

    enum F303 {}
    impl PllConstants for F303 {}
    impl SystemClockConstants for F303 {}
    impl HseConstants for F303 {}

    enum FastCrystal {}
    impl PllConstants for FastCrystal {}
    impl SystemClockConstants for FastCrystal {}
    impl HseConstants for FastCrystal {
        const HSE_FREQUENCY_MHZ: usize = 40;
    }

    fn hse_pll_72mhz() -> OscInit {
        OscInit {
            hse: HseState::Bypass,
            pll: PllInit::new(PllSource::Hse, 9, 1),
            ..OscInit::default()
        }
    }

    #[test]
    fn reset_configuration_runs_from_hsi() {
        let freqs = ClkInit::default()
            .frequencies::<F303>(&OscInit::default())
            .unwrap();
        assert_eq!(freqs.sysclk, 8_000_000);
        assert_eq!(freqs.pclk1, 8_000_000);
        assert_eq!(freqs.tim_pclk1, 8_000_000);
    }

    #[test]
    fn hse_pll_at_72mhz() {
        let clk = ClkInit::new(
            SysClkSource::Pll,
            AHBPrescaler::DivideBy1,
            APBPrescaler::DivideBy2,
            APBPrescaler::DivideBy1,
        );
        let freqs = clk.frequencies::<F303>(&hse_pll_72mhz()).unwrap();
        assert_eq!(freqs.sysclk, 72_000_000);
        assert_eq!(freqs.hclk, 72_000_000);
        assert_eq!(freqs.pclk1, 36_000_000);
        assert_eq!(freqs.pclk2, 72_000_000);
        assert_eq!(freqs.tim_pclk1, 72_000_000);
    }

    #[test]
    fn apb1_limit() {
        let clk = ClkInit::new(
            SysClkSource::Pll,
            AHBPrescaler::DivideBy1,
            APBPrescaler::DivideBy1,
            APBPrescaler::DivideBy1,
        );
        assert_eq!(
            clk.frequencies::<F303>(&hse_pll_72mhz()),
            Err(ErrorCode::SIZE)
        );
    }

    #[test]
    fn pll_limits() {
        // 8 MHz x 10 = 80 MHz
        let pll = PllInit::new(PllSource::Hse, 10, 1);
        assert_eq!(pll.output_frequency::<F303>(), Err(ErrorCode::SIZE));
        // HSI/2 x 16 = 64 MHz
        let pll = PllInit::new(PllSource::HsiDiv2, 16, 1);
        assert_eq!(pll.output_frequency::<F303>(), Ok(64_000_000));
        // 8 MHz / 16 = 500 kHz input
        let pll = PllInit::new(PllSource::Hse, 16, 16);
        assert_eq!(pll.output_frequency::<F303>(), Err(ErrorCode::NOSUPPORT));
        // 4 MHz x 3 = 12 MHz output
        let pll = PllInit::new(PllSource::HsiDiv2, 3, 1);
        assert_eq!(pll.output_frequency::<F303>(), Err(ErrorCode::NOSUPPORT));
        let pll = PllInit::new(PllSource::Hse, 17, 1);
        assert_eq!(pll.validate(), Err(ErrorCode::INVAL));
        let pll = PllInit::new(PllSource::Hse, 9, 0);
        assert_eq!(pll.validate(), Err(ErrorCode::INVAL));
    }

    #[test]
    fn pll_factors_checked_when_off() {
        let pll = PllInit {
            state: PllState::Off,
            ..PllInit::new(PllSource::Hse, 9, 0)
        };
        assert_eq!(pll.validate(), Ok(()));
        assert_eq!(pll.input_frequency::<F303>(), 0);
        assert_eq!(pll.output_frequency::<F303>(), Err(ErrorCode::INVAL));
    }

    #[test]
    fn hse_range() {
        let clk = ClkInit::new(
            SysClkSource::Hse,
            AHBPrescaler::DivideBy1,
            APBPrescaler::DivideBy2,
            APBPrescaler::DivideBy1,
        );
        let osc = OscInit {
            hse: HseState::On,
            ..OscInit::default()
        };
        assert_eq!(
            clk.frequencies::<FastCrystal>(&osc),
            Err(ErrorCode::NOSUPPORT)
        );
        assert_eq!(clk.frequencies::<F303>(&osc).map(|f| f.sysclk), Ok(8_000_000));
    }

    #[test]
    fn source_must_be_enabled() {
        let clk = ClkInit::new(
            SysClkSource::Hse,
            AHBPrescaler::DivideBy1,
            APBPrescaler::DivideBy1,
            APBPrescaler::DivideBy1,
        );
        assert_eq!(clk.validate(&OscInit::default()), Err(ErrorCode::INVAL));

        let osc = OscInit {
            pll: PllInit::new(PllSource::Hse, 9, 1),
            ..OscInit::default()
        };
        assert_eq!(osc.validate(), Err(ErrorCode::INVAL));

        let osc = OscInit {
            hsi_calibration: 32,
            ..OscInit::default()
        };
        assert_eq!(osc.validate(), Err(ErrorCode::INVAL));
    }

    #[test]
    fn register_encodings() {
        let cfgr = InMemoryRegister::<u32, CFGR::Register>::new(0);
        let osc = hse_pll_72mhz();
        let clk = ClkInit::new(
            SysClkSource::Pll,
            AHBPrescaler::DivideBy1,
            APBPrescaler::DivideBy2,
            APBPrescaler::DivideBy1,
        );
        cfgr.write(osc.pll.cfgr_value() + clk.cfgr_value());
        // PLLSRC = HSE/PREDIV, PLLMUL = x9, PPRE1 = /2, SW = PLL
        assert_eq!(cfgr.get(), 0x001d_0402);

        let cfgr2 = InMemoryRegister::<u32, CFGR2::Register>::new(0);
        cfgr2.write(PllInit::new(PllSource::Hse, 9, 2).cfgr2_value());
        assert_eq!(cfgr2.get(), 0x1);

        let cr = InMemoryRegister::<u32, CR::Register>::new(0);
        cr.write(osc.cr_value());
        // HSEON | HSEBYP | PLLON | HSION | HSITRIM = 16
        assert_eq!(cr.get(), 0x0105_0081);

        let bdcr = InMemoryRegister::<u32, BDCR::Register>::new(0);
        bdcr.write(
            OscInit {
                lse: LseState::On,
                ..OscInit::default()
            }
            .bdcr_value(),
        );
        assert_eq!(bdcr.get(), 0x1);
    }
}
