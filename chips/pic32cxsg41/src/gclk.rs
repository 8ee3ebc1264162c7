// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Generic clock controller.
//!
//! Twelve generators each pick an oscillator and divide it. Each of the 48
//! peripheral channels then connects one generator to one or more
//! peripherals.
//!
//! ```rust,ignore
//! let gclk = Gclk::new();
//! gclk.configure_generator(
//!     Generator::Gclk2,
//!     GeneratorConfig::new(ClockSource::Dfll, 1),
//! )?;
//! gclk.enable_channel(gclk::SERCOM2_CORE, Generator::Gclk2)?;
//! ```

use crate::chip_specific::ClockConstants;
use crate::memory_map::GCLK_BASE;
use chip_common::{debug, ErrorCode, StaticRef};
use tock_registers::fields::FieldValue;
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite};
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    pub GclkRegisters {
        /// Control
        (0x000 => ctrla: ReadWrite<u8, CTRLA::Register>),
        (0x001 => _reserved0),
        /// Synchronization Busy
        (0x004 => syncbusy: ReadOnly<u32, SYNCBUSY::Register>),
        (0x008 => _reserved1),
        /// Generic Clock Generator Control
        (0x020 => genctrl: [ReadWrite<u32, GENCTRL::Register>; 12]),
        (0x050 => _reserved2),
        /// Peripheral Clock Control
        (0x080 => pchctrl: [ReadWrite<u32, PCHCTRL::Register>; 48]),
        (0x140 => @END),
    }
}

register_bitfields![u8,
    pub CTRLA [
        /// Software Reset
        SWRST OFFSET(0) NUMBITS(1) []
    ]
];

register_bitfields![u32,
    pub SYNCBUSY [
        /// Generator Control n Synchronization Busy, one bit per generator
        GENCTRL OFFSET(2) NUMBITS(12) [],
        /// Software Reset Synchronization Busy
        SWRST OFFSET(0) NUMBITS(1) []
    ],
    pub GENCTRL [
        /// Division Factor
        DIV OFFSET(16) NUMBITS(16) [],
        /// Run in Standby
        RUNSTDBY OFFSET(13) NUMBITS(1) [],
        /// Divide Selection
        DIVSEL OFFSET(12) NUMBITS(1) [
            /// Divide by DIV
            Div = 0,
            /// Divide by 2^(DIV + 1)
            Div2 = 1
        ],
        /// Output Enable
        OE OFFSET(11) NUMBITS(1) [],
        /// Output Off Value
        OOV OFFSET(10) NUMBITS(1) [],
        /// Improve Duty Cycle
        IDC OFFSET(9) NUMBITS(1) [],
        /// Generic Clock Generator Enable
        GENEN OFFSET(8) NUMBITS(1) [],
        /// Source Select
        SRC OFFSET(0) NUMBITS(4) [
            XOSC0 = 0,
            XOSC1 = 1,
            GCLKIN = 2,
            GCLKGEN1 = 3,
            OSCULP32K = 4,
            XOSC32K = 5,
            DFLL = 6,
            DPLL0 = 7,
            DPLL1 = 8
        ]
    ],
    pub PCHCTRL [
        /// Write Lock
        WRTLOCK OFFSET(7) NUMBITS(1) [],
        /// Channel Enable
        CHEN OFFSET(6) NUMBITS(1) [],
        /// Generic Clock Generator
        GEN OFFSET(0) NUMBITS(4) []
    ]
];

const GCLK: StaticRef<GclkRegisters> =
    unsafe { StaticRef::new(GCLK_BASE as *const GclkRegisters) };

// Peripheral channel indices into `PCHCTRL`.
pub const OSCCTRL_DFLL48: usize = 0;
pub const OSCCTRL_FDPLL0: usize = 1;
pub const OSCCTRL_FDPLL1: usize = 2;
/// Shared by the 32 kHz DPLL lock timers and the SDHC and SERCOM slow clocks.
pub const SLOW: usize = 3;
pub const EIC: usize = 4;
pub const FREQM_MSR: usize = 5;
pub const FREQM_REF: usize = 6;
pub const SERCOM0_CORE: usize = 7;
pub const SERCOM1_CORE: usize = 8;
pub const TC0_TC1: usize = 9;
pub const USB: usize = 10;
/// First of the twelve event system channels, 11 to 22.
pub const EVSYS0: usize = 11;
pub const SERCOM2_CORE: usize = 23;
pub const SERCOM3_CORE: usize = 24;
pub const TCC0_TCC1: usize = 25;
pub const TC2_TC3: usize = 26;
// 27 and 28 clock the CAN controllers, absent on this part.
pub const TCC2_TCC3: usize = 29;
pub const TC4_TC5: usize = 30;
pub const PDEC: usize = 31;
pub const AC: usize = 32;
pub const CCL: usize = 33;
pub const SERCOM4_CORE: usize = 34;
pub const SERCOM5_CORE: usize = 35;
pub const SERCOM6_CORE: usize = 36;
pub const SERCOM7_CORE: usize = 37;
pub const TCC4: usize = 38;
pub const TC6_TC7: usize = 39;
pub const ADC0: usize = 40;
pub const ADC1: usize = 41;
pub const DAC: usize = 42;
pub const I2S0: usize = 43;
pub const I2S1: usize = 44;
pub const SDHC0: usize = 45;
pub const SDHC1: usize = 46;
pub const CM4_TRACE: usize = 47;

pub const NUM_GENERATORS: usize = 12;
pub const NUM_CHANNELS: usize = 48;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Generator {
    Gclk0 = 0,
    Gclk1 = 1,
    Gclk2 = 2,
    Gclk3 = 3,
    Gclk4 = 4,
    Gclk5 = 5,
    Gclk6 = 6,
    Gclk7 = 7,
    Gclk8 = 8,
    Gclk9 = 9,
    Gclk10 = 10,
    Gclk11 = 11,
}

impl Generator {
    const ALL: [Generator; NUM_GENERATORS] = [
        Generator::Gclk0,
        Generator::Gclk1,
        Generator::Gclk2,
        Generator::Gclk3,
        Generator::Gclk4,
        Generator::Gclk5,
        Generator::Gclk6,
        Generator::Gclk7,
        Generator::Gclk8,
        Generator::Gclk9,
        Generator::Gclk10,
        Generator::Gclk11,
    ];

    pub fn from_index(index: usize) -> Option<Generator> {
        Self::ALL.get(index).copied()
    }

    /// Largest value `DIV` holds with `DIVSEL` clear. Only generator 1 has
    /// the full 16-bit divider.
    pub const fn max_divider(&self) -> u32 {
        match self {
            Generator::Gclk1 => 0xffff,
            _ => 0xff,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ClockSource {
    Xosc0 = 0,
    Xosc1 = 1,
    GclkIn = 2,
    GclkGen1 = 3,
    OscUlp32k = 4,
    Xosc32k = 5,
    Dfll = 6,
    Dpll0 = 7,
    Dpll1 = 8,
}

impl ClockSource {
    pub fn from_bits(bits: u32) -> Option<ClockSource> {
        match bits {
            0 => Some(ClockSource::Xosc0),
            1 => Some(ClockSource::Xosc1),
            2 => Some(ClockSource::GclkIn),
            3 => Some(ClockSource::GclkGen1),
            4 => Some(ClockSource::OscUlp32k),
            5 => Some(ClockSource::Xosc32k),
            6 => Some(ClockSource::Dfll),
            7 => Some(ClockSource::Dpll0),
            8 => Some(ClockSource::Dpll1),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GeneratorConfig {
    pub source: ClockSource,
    /// Division of the source frequency; 1 leaves it undivided.
    pub divider: u32,
    pub improve_duty_cycle: bool,
    pub output_enable: bool,
    pub run_in_standby: bool,
}

impl GeneratorConfig {
    pub const fn new(source: ClockSource, divider: u32) -> Self {
        GeneratorConfig {
            source,
            divider,
            improve_duty_cycle: false,
            output_enable: false,
            run_in_standby: false,
        }
    }

    /// `GENCTRL` value for this configuration on `generator`, with `GENEN`
    /// set.
    ///
    /// Dividers that fit in `DIV` are programmed directly. Larger powers of
    /// two use `DIVSEL`, which divides by 2^(DIV + 1).
    pub fn genctrl_value(
        &self,
        generator: Generator,
    ) -> Result<FieldValue<u32, GENCTRL::Register>, ErrorCode> {
        if generator == Generator::Gclk1 && self.source == ClockSource::GclkGen1 {
            return Err(ErrorCode::INVAL);
        }
        let divider = if self.divider == 0 {
            return Err(ErrorCode::INVAL);
        } else if self.divider <= generator.max_divider() {
            GENCTRL::DIVSEL::Div + GENCTRL::DIV.val(self.divider)
        } else if self.divider.is_power_of_two() {
            let exponent = self.divider.trailing_zeros();
            if exponent > generator.max_divider().count_ones() + 1 {
                return Err(ErrorCode::INVAL);
            }
            GENCTRL::DIVSEL::Div2 + GENCTRL::DIV.val(exponent - 1)
        } else {
            return Err(ErrorCode::INVAL);
        };

        Ok(GENCTRL::SRC.val(self.source as u32)
            + GENCTRL::GENEN::SET
            + GENCTRL::IDC.val(self.improve_duty_cycle as u32)
            + GENCTRL::OE.val(self.output_enable as u32)
            + GENCTRL::RUNSTDBY.val(self.run_in_standby as u32)
            + divider)
    }

    /// Output frequency for a source running at `source_hz`.
    pub const fn output_frequency(&self, source_hz: u32) -> u32 {
        if self.divider <= 1 {
            source_hz
        } else {
            source_hz / self.divider
        }
    }
}

/// Output frequency of a generator whose `GENCTRL` reads `genctrl` and
/// whose source runs at `source_hz`.
pub fn genctrl_frequency(genctrl: u32, source_hz: u32) -> u32 {
    let div = (genctrl & (GENCTRL::DIV.mask << GENCTRL::DIV.shift)) >> GENCTRL::DIV.shift;
    if genctrl & (1 << GENCTRL::DIVSEL.shift) != 0 {
        source_hz.checked_shr(div + 1).unwrap_or(0)
    } else if div <= 1 {
        source_hz
    } else {
        source_hz / div
    }
}

/// Reject generator outputs above the part's limits. Generator 0 clocks the
/// CPU and has the lower limit.
pub fn validate_generator_frequency<S: ClockConstants>(
    generator: Generator,
    frequency_hz: u32,
) -> Result<(), ErrorCode> {
    let limit = match generator {
        Generator::Gclk0 => S::CPU_MAX_FREQ_HZ,
        _ => S::GCLK_MAX_FREQ_HZ,
    };
    if frequency_hz > limit {
        debug!(
            "GCLK{}: {} Hz is above the {} Hz limit",
            generator as usize, frequency_hz, limit
        );
        return Err(ErrorCode::SIZE);
    }
    Ok(())
}

pub struct Gclk {
    registers: StaticRef<GclkRegisters>,
}

impl Gclk {
    pub const fn new() -> Gclk {
        Gclk { registers: GCLK }
    }

    #[cfg(test)]
    pub(crate) fn with_registers(registers: StaticRef<GclkRegisters>) -> Gclk {
        Gclk { registers }
    }

    pub fn configure_generator(
        &self,
        generator: Generator,
        config: GeneratorConfig,
    ) -> Result<(), ErrorCode> {
        let value = config.genctrl_value(generator)?;
        self.registers.genctrl[generator as usize].write(value);
        Ok(())
    }

    pub fn disable_generator(&self, generator: Generator) {
        self.registers.genctrl[generator as usize].modify(GENCTRL::GENEN::CLEAR);
    }

    pub fn is_generator_enabled(&self, generator: Generator) -> bool {
        self.registers.genctrl[generator as usize].is_set(GENCTRL::GENEN)
    }

    pub fn generator_source(&self, generator: Generator) -> Option<ClockSource> {
        ClockSource::from_bits(self.registers.genctrl[generator as usize].read(GENCTRL::SRC))
    }

    /// Output frequency of `generator` when its source runs at `source_hz`.
    pub fn generator_frequency(&self, generator: Generator, source_hz: u32) -> u32 {
        genctrl_frequency(self.registers.genctrl[generator as usize].get(), source_hz)
    }

    /// A write to `GENCTRLn` has not reached the generator yet.
    pub fn is_syncing(&self, generator: Generator) -> bool {
        self.registers.syncbusy.read(SYNCBUSY::GENCTRL) & (1 << generator as u32) != 0
    }

    /// Connect peripheral channel `channel` to `generator` and enable it.
    pub fn enable_channel(&self, channel: usize, generator: Generator) -> Result<(), ErrorCode> {
        let pchctrl = self.registers.pchctrl.get(channel).ok_or(ErrorCode::INVAL)?;
        if pchctrl.is_set(PCHCTRL::WRTLOCK) {
            return Err(ErrorCode::BUSY);
        }
        pchctrl.write(PCHCTRL::GEN.val(generator as u32) + PCHCTRL::CHEN::SET);
        Ok(())
    }

    pub fn disable_channel(&self, channel: usize) -> Result<(), ErrorCode> {
        let pchctrl = self.registers.pchctrl.get(channel).ok_or(ErrorCode::INVAL)?;
        if pchctrl.is_set(PCHCTRL::WRTLOCK) {
            return Err(ErrorCode::BUSY);
        }
        pchctrl.modify(PCHCTRL::CHEN::CLEAR);
        Ok(())
    }

    /// Generator feeding `channel`, if the channel is enabled.
    pub fn channel_generator(&self, channel: usize) -> Option<Generator> {
        let pchctrl = self.registers.pchctrl.get(channel)?;
        if !pchctrl.is_set(PCHCTRL::CHEN) {
            return None;
        }
        Generator::from_index(pchctrl.read(PCHCTRL::GEN) as usize)
    }
}

/// On-target checks of the GCLK state right after reset.
///
/// **NOTE:** All these tests assume default boot configuration.
pub mod tests {
    use super::*;

    pub fn run(gclk: &Gclk) {
        debug!("");
        debug!("===============================================");
        debug!("Testing GCLK reset state...");

        // The CPU boots from the 48 MHz DFLL through generator 0
        assert!(gclk.is_generator_enabled(Generator::Gclk0));
        assert_eq!(gclk.generator_source(Generator::Gclk0), Some(ClockSource::Dfll));
        assert_eq!(gclk.generator_frequency(Generator::Gclk0, 48_000_000), 48_000_000);
        assert_eq!(gclk.channel_generator(OSCCTRL_DFLL48), None);

        debug!("Finished testing GCLK reset state. Everything is alright!");
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
        assert_eq!(offset_of!(GclkRegisters, syncbusy), 0x04);
        assert_eq!(offset_of!(GclkRegisters, genctrl), 0x20);
        assert_eq!(offset_of!(GclkRegisters, pchctrl), 0x80);
        assert_eq!(size_of::<GclkRegisters>(), 0x140);
        assert_eq!(GENCTRL::DIV.mask << GENCTRL::DIV.shift, 0xffff_0000);
        assert_eq!(GENCTRL::DIVSEL.shift, 12);
        assert_eq!(SYNCBUSY::GENCTRL.shift, 2);
    }

    #[test]
    fn channel_indices() {
        assert_eq!(SERCOM0_CORE, 7);
        assert_eq!(EVSYS0 + 11, 22);
        assert_eq!(SERCOM2_CORE, 23);
        assert_eq!(SERCOM7_CORE, 37);
        assert_eq!(CM4_TRACE, NUM_CHANNELS - 1);
    }

    #[test]
    fn dividers() {
        let gclk_regs: GclkRegisters = unsafe { core::mem::zeroed() };
        let gclk = Gclk::with_registers(unsafe { StaticRef::new(&gclk_regs) });

        // DPLL0 at 120 MHz, undivided, for the CPU
        gclk.configure_generator(Generator::Gclk0, GeneratorConfig::new(ClockSource::Dpll0, 1))
            .unwrap();
        assert_eq!(gclk_regs.genctrl[0].get(), 0x0001_0107);
        assert_eq!(gclk.generator_frequency(Generator::Gclk0, 120_000_000), 120_000_000);

        // 48 MHz / 48 on generator 3
        gclk.configure_generator(Generator::Gclk3, GeneratorConfig::new(ClockSource::Dfll, 48))
            .unwrap();
        assert_eq!(gclk_regs.genctrl[3].read(GENCTRL::DIV), 48);
        assert_eq!(gclk.generator_frequency(Generator::Gclk3, 48_000_000), 1_000_000);

        // 512 does not fit the 8-bit DIV, so DIVSEL selects 2^(8 + 1)
        gclk.configure_generator(Generator::Gclk4, GeneratorConfig::new(ClockSource::Dfll, 512))
            .unwrap();
        assert!(gclk_regs.genctrl[4].is_set(GENCTRL::DIVSEL));
        assert_eq!(gclk_regs.genctrl[4].read(GENCTRL::DIV), 8);
        assert_eq!(gclk.generator_frequency(Generator::Gclk4, 48_000_000), 93_750);
        assert_eq!(genctrl_frequency(0xffff_1006, 48_000_000), 0);

        // Generator 1 has a 16-bit DIV
        gclk.configure_generator(Generator::Gclk1, GeneratorConfig::new(ClockSource::Dfll, 1000))
            .unwrap();
        assert!(!gclk_regs.genctrl[1].is_set(GENCTRL::DIVSEL));
        assert_eq!(gclk_regs.genctrl[1].read(GENCTRL::DIV), 1000);

        for divider in [0, 300, 1024] {
            assert_eq!(
                gclk.configure_generator(
                    Generator::Gclk2,
                    GeneratorConfig::new(ClockSource::Dfll, divider)
                ),
                Err(ErrorCode::INVAL)
            );
        }
        assert!(matches!(
            GeneratorConfig::new(ClockSource::GclkGen1, 1).genctrl_value(Generator::Gclk1),
            Err(ErrorCode::INVAL)
        ));
        assert_eq!(gclk_regs.genctrl[2].get(), 0);
    }

    #[test]
    fn channels() {
        let gclk_regs: GclkRegisters = unsafe { core::mem::zeroed() };
        let gclk = Gclk::with_registers(unsafe { StaticRef::new(&gclk_regs) });

        gclk.enable_channel(SERCOM2_CORE, Generator::Gclk2).unwrap();
        assert_eq!(gclk_regs.pchctrl[SERCOM2_CORE].get(), 0x42);
        assert_eq!(gclk.channel_generator(SERCOM2_CORE), Some(Generator::Gclk2));

        gclk.disable_channel(SERCOM2_CORE).unwrap();
        assert_eq!(gclk.channel_generator(SERCOM2_CORE), None);

        assert_eq!(gclk.enable_channel(48, Generator::Gclk0), Err(ErrorCode::INVAL));
        gclk_regs.pchctrl[EIC].write(PCHCTRL::WRTLOCK::SET);
        assert_eq!(gclk.enable_channel(EIC, Generator::Gclk0), Err(ErrorCode::BUSY));
    }

    #[test]
    fn frequency_limits() {
        assert_eq!(
            validate_generator_frequency::<Specs>(Generator::Gclk0, 120_000_000),
            Ok(())
        );
        assert_eq!(
            validate_generator_frequency::<Specs>(Generator::Gclk0, 200_000_000),
            Err(ErrorCode::SIZE)
        );
        assert_eq!(
            validate_generator_frequency::<Specs>(Generator::Gclk2, 200_000_000),
            Ok(())
        );
    }
}
