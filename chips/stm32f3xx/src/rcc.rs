// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Reset and clock control (RM0316, section 9.4).

use crate::memory_map::RCC_BASE;
use chip_common::{ClockInterface, ErrorCode, StaticRef};
use stm32::prescaler::{AHBPrescaler, APBPrescaler};
use tock_registers::interfaces::{ReadWriteable, Readable};
use tock_registers::registers::ReadWrite;
use tock_registers::fields::Field;
use tock_registers::{register_bitfields, register_structs, LocalRegisterCopy};

register_structs! {
    /// Reset and clock control
    pub RccRegisters {
        /// clock control register
        (0x00 => cr: ReadWrite<u32, CR::Register>),
        /// clock configuration register
        (0x04 => cfgr: ReadWrite<u32, CFGR::Register>),
        /// clock interrupt register
        (0x08 => cir: ReadWrite<u32, CIR::Register>),
        /// APB2 peripheral reset register
        (0x0c => apb2rstr: ReadWrite<u32, APB2RSTR::Register>),
        /// APB1 peripheral reset register
        (0x10 => apb1rstr: ReadWrite<u32, APB1RSTR::Register>),
        /// AHB peripheral clock enable register
        (0x14 => ahbenr: ReadWrite<u32, AHBENR::Register>),
        /// APB2 peripheral clock enable register
        (0x18 => apb2enr: ReadWrite<u32, APB2ENR::Register>),
        /// APB1 peripheral clock enable register
        (0x1c => apb1enr: ReadWrite<u32, APB1ENR::Register>),
        /// Backup domain control register
        (0x20 => bdcr: ReadWrite<u32, BDCR::Register>),
        /// Control/status register
        (0x24 => csr: ReadWrite<u32, CSR::Register>),
        /// AHB peripheral reset register
        (0x28 => ahbrstr: ReadWrite<u32, AHBRSTR::Register>),
        /// Clock configuration register 2
        (0x2c => cfgr2: ReadWrite<u32, CFGR2::Register>),
        /// Clock configuration register 3
        (0x30 => cfgr3: ReadWrite<u32, CFGR3::Register>),
        (0x34 => @END),
    }
}

register_bitfields![u32,
    pub CR [
        /// PLL clock ready flag
        PLLRDY OFFSET(25) NUMBITS(1) [],
        /// PLL enable
        PLLON OFFSET(24) NUMBITS(1) [],
        /// Clock security system enable
        CSSON OFFSET(19) NUMBITS(1) [],
        /// HSE clock bypass
        HSEBYP OFFSET(18) NUMBITS(1) [],
        /// HSE clock ready flag
        HSERDY OFFSET(17) NUMBITS(1) [],
        /// HSE clock enable
        HSEON OFFSET(16) NUMBITS(1) [],
        /// Internal High Speed clock Calibration
        HSICAL OFFSET(8) NUMBITS(8) [],
        /// Internal High Speed clock trimming
        HSITRIM OFFSET(3) NUMBITS(5) [],
        /// Internal High Speed clock ready flag
        HSIRDY OFFSET(1) NUMBITS(1) [],
        /// Internal High Speed clock enable
        HSION OFFSET(0) NUMBITS(1) []
    ],
    pub CFGR [
        /// Microcontroller clock output flag
        MCOF OFFSET(28) NUMBITS(1) [],
        /// Microcontroller clock output
        MCO OFFSET(24) NUMBITS(3) [
            NoClock = 0b000,
            LSI = 0b010,
            LSE = 0b011,
            SYSCLK = 0b100,
            HSI = 0b101,
            HSE = 0b110,
            PLLDiv2 = 0b111
        ],
        /// I2S external clock source selection
        I2SSRC OFFSET(23) NUMBITS(1) [],
        /// USB prescaler
        USBPRE OFFSET(22) NUMBITS(1) [],
        /// PLL Multiplication Factor
        PLLMUL OFFSET(18) NUMBITS(4) [],
        /// HSE divider for PLL entry
        PLLXTPRE OFFSET(17) NUMBITS(1) [],
        /// PLL entry clock source
        PLLSRC OFFSET(16) NUMBITS(1) [
            HSIDiv2 = 0,
            HSEPrediv = 1
        ],
        /// APB high speed prescaler (APB2)
        PPRE2 OFFSET(11) NUMBITS(3) [],
        /// APB Low speed prescaler (APB1)
        PPRE1 OFFSET(8) NUMBITS(3) [],
        /// AHB prescaler
        HPRE OFFSET(4) NUMBITS(4) [],
        /// System clock Switch Status
        SWS OFFSET(2) NUMBITS(2) [
            HSI = 0b00,
            HSE = 0b01,
            PLL = 0b10
        ],
        /// System clock Switch
        SW OFFSET(0) NUMBITS(2) [
            HSI = 0b00,
            HSE = 0b01,
            PLL = 0b10
        ]
    ],
    pub CIR [
        /// Clock security system interrupt clear
        CSSC OFFSET(23) NUMBITS(1) [],
        /// PLL Ready Interrupt Clear
        PLLRDYC OFFSET(20) NUMBITS(1) [],
        /// HSE Ready Interrupt Clear
        HSERDYC OFFSET(19) NUMBITS(1) [],
        /// HSI Ready Interrupt Clear
        HSIRDYC OFFSET(18) NUMBITS(1) [],
        /// LSE Ready Interrupt Clear
        LSERDYC OFFSET(17) NUMBITS(1) [],
        /// LSI Ready Interrupt Clear
        LSIRDYC OFFSET(16) NUMBITS(1) [],
        /// PLL Ready Interrupt Enable
        PLLRDYIE OFFSET(12) NUMBITS(1) [],
        /// HSE Ready Interrupt Enable
        HSERDYIE OFFSET(11) NUMBITS(1) [],
        /// HSI Ready Interrupt Enable
        HSIRDYIE OFFSET(10) NUMBITS(1) [],
        /// LSE Ready Interrupt Enable
        LSERDYIE OFFSET(9) NUMBITS(1) [],
        /// LSI Ready Interrupt Enable
        LSIRDYIE OFFSET(8) NUMBITS(1) [],
        /// Clock Security System Interrupt flag
        CSSF OFFSET(7) NUMBITS(1) [],
        /// PLL Ready Interrupt flag
        PLLRDYF OFFSET(4) NUMBITS(1) [],
        /// HSE Ready Interrupt flag
        HSERDYF OFFSET(3) NUMBITS(1) [],
        /// HSI Ready Interrupt flag
        HSIRDYF OFFSET(2) NUMBITS(1) [],
        /// LSE Ready Interrupt flag
        LSERDYF OFFSET(1) NUMBITS(1) [],
        /// LSI Ready Interrupt flag
        LSIRDYF OFFSET(0) NUMBITS(1) []
    ],
    pub APB2RSTR [
        /// TIM17 timer reset
        TIM17RST OFFSET(18) NUMBITS(1) [],
        /// TIM16 timer reset
        TIM16RST OFFSET(17) NUMBITS(1) [],
        /// TIM15 timer reset
        TIM15RST OFFSET(16) NUMBITS(1) [],
        /// USART1 reset
        USART1RST OFFSET(14) NUMBITS(1) [],
        /// TIM8 timer reset
        TIM8RST OFFSET(13) NUMBITS(1) [],
        /// SPI 1 reset
        SPI1RST OFFSET(12) NUMBITS(1) [],
        /// TIM1 timer reset
        TIM1RST OFFSET(11) NUMBITS(1) [],
        /// SYSCFG and COMP reset
        SYSCFGRST OFFSET(0) NUMBITS(1) []
    ],
    pub APB1RSTR [
        /// DAC interface reset
        DACRST OFFSET(29) NUMBITS(1) [],
        /// Power interface reset
        PWRRST OFFSET(28) NUMBITS(1) [],
        /// CAN reset
        CANRST OFFSET(25) NUMBITS(1) [],
        /// USB reset
        USBRST OFFSET(23) NUMBITS(1) [],
        /// I2C2 reset
        I2C2RST OFFSET(22) NUMBITS(1) [],
        /// I2C1 reset
        I2C1RST OFFSET(21) NUMBITS(1) [],
        /// UART 5 reset
        UART5RST OFFSET(20) NUMBITS(1) [],
        /// UART 4 reset
        UART4RST OFFSET(19) NUMBITS(1) [],
        /// USART 3 reset
        USART3RST OFFSET(18) NUMBITS(1) [],
        /// USART 2 reset
        USART2RST OFFSET(17) NUMBITS(1) [],
        /// SPI3 reset
        SPI3RST OFFSET(15) NUMBITS(1) [],
        /// SPI2 reset
        SPI2RST OFFSET(14) NUMBITS(1) [],
        /// Window watchdog reset
        WWDGRST OFFSET(11) NUMBITS(1) [],
        /// Timer 7 reset
        TIM7RST OFFSET(5) NUMBITS(1) [],
        /// Timer 6 reset
        TIM6RST OFFSET(4) NUMBITS(1) [],
        /// Timer 4 reset
        TIM4RST OFFSET(2) NUMBITS(1) [],
        /// Timer 3 reset
        TIM3RST OFFSET(1) NUMBITS(1) [],
        /// Timer 2 reset
        TIM2RST OFFSET(0) NUMBITS(1) []
    ],
    pub AHBENR [
        /// ADC3 and ADC4 enable
        ADC34EN OFFSET(29) NUMBITS(1) [],
        /// ADC1 and ADC2 enable
        ADC12EN OFFSET(28) NUMBITS(1) [],
        /// Touch sensing controller clock enable
        TSCEN OFFSET(24) NUMBITS(1) [],
        /// I/O port F clock enable
        IOPFEN OFFSET(22) NUMBITS(1) [],
        /// I/O port E clock enable
        IOPEEN OFFSET(21) NUMBITS(1) [],
        /// I/O port D clock enable
        IOPDEN OFFSET(20) NUMBITS(1) [],
        /// I/O port C clock enable
        IOPCEN OFFSET(19) NUMBITS(1) [],
        /// I/O port B clock enable
        IOPBEN OFFSET(18) NUMBITS(1) [],
        /// I/O port A clock enable
        IOPAEN OFFSET(17) NUMBITS(1) [],
        /// CRC clock enable
        CRCEN OFFSET(6) NUMBITS(1) [],
        /// FLITF clock enable
        FLITFEN OFFSET(4) NUMBITS(1) [],
        /// SRAM interface clock enable
        SRAMEN OFFSET(2) NUMBITS(1) [],
        /// DMA2 clock enable
        DMA2EN OFFSET(1) NUMBITS(1) [],
        /// DMA1 clock enable
        DMA1EN OFFSET(0) NUMBITS(1) []
    ],
    pub APB2ENR [
        /// TIM17 timer clock enable
        TIM17EN OFFSET(18) NUMBITS(1) [],
        /// TIM16 timer clock enable
        TIM16EN OFFSET(17) NUMBITS(1) [],
        /// TIM15 timer clock enable
        TIM15EN OFFSET(16) NUMBITS(1) [],
        /// USART1 clock enable
        USART1EN OFFSET(14) NUMBITS(1) [],
        /// TIM8 Timer clock enable
        TIM8EN OFFSET(13) NUMBITS(1) [],
        /// SPI 1 clock enable
        SPI1EN OFFSET(12) NUMBITS(1) [],
        /// TIM1 Timer clock enable
        TIM1EN OFFSET(11) NUMBITS(1) [],
        /// SYSCFG clock enable
        SYSCFGEN OFFSET(0) NUMBITS(1) []
    ],
    pub APB1ENR [
        /// DAC interface clock enable
        DACEN OFFSET(29) NUMBITS(1) [],
        /// Power interface clock enable
        PWREN OFFSET(28) NUMBITS(1) [],
        /// CAN clock enable
        CANEN OFFSET(25) NUMBITS(1) [],
        /// USB clock enable
        USBEN OFFSET(23) NUMBITS(1) [],
        /// I2C 2 clock enable
        I2C2EN OFFSET(22) NUMBITS(1) [],
        /// I2C 1 clock enable
        I2C1EN OFFSET(21) NUMBITS(1) [],
        /// UART 5 clock enable
        UART5EN OFFSET(20) NUMBITS(1) [],
        /// UART 4 clock enable
        UART4EN OFFSET(19) NUMBITS(1) [],
        /// USART 3 clock enable
        USART3EN OFFSET(18) NUMBITS(1) [],
        /// USART 2 clock enable
        USART2EN OFFSET(17) NUMBITS(1) [],
        /// SPI 3 clock enable
        SPI3EN OFFSET(15) NUMBITS(1) [],
        /// SPI 2 clock enable
        SPI2EN OFFSET(14) NUMBITS(1) [],
        /// Window watchdog clock enable
        WWDGEN OFFSET(11) NUMBITS(1) [],
        /// Timer 7 clock enable
        TIM7EN OFFSET(5) NUMBITS(1) [],
        /// Timer 6 clock enable
        TIM6EN OFFSET(4) NUMBITS(1) [],
        /// Timer 4 clock enable
        TIM4EN OFFSET(2) NUMBITS(1) [],
        /// Timer 3 clock enable
        TIM3EN OFFSET(1) NUMBITS(1) [],
        /// Timer 2 clock enable
        TIM2EN OFFSET(0) NUMBITS(1) []
    ],
    pub BDCR [
        /// Backup domain software reset
        BDRST OFFSET(16) NUMBITS(1) [],
        /// RTC clock enable
        RTCEN OFFSET(15) NUMBITS(1) [],
        /// RTC clock source selection
        RTCSEL OFFSET(8) NUMBITS(2) [
            NoClock = 0b00,
            LSE = 0b01,
            LSI = 0b10,
            HSEDiv32 = 0b11
        ],
        /// LSE oscillator drive capability
        LSEDRV OFFSET(3) NUMBITS(2) [],
        /// External Low Speed oscillator bypass
        LSEBYP OFFSET(2) NUMBITS(1) [],
        /// External Low Speed oscillator ready
        LSERDY OFFSET(1) NUMBITS(1) [],
        /// External Low Speed oscillator enable
        LSEON OFFSET(0) NUMBITS(1) []
    ],
    pub CSR [
        /// Low-power reset flag
        LPWRRSTF OFFSET(31) NUMBITS(1) [],
        /// Window watchdog reset flag
        WWDGRSTF OFFSET(30) NUMBITS(1) [],
        /// Independent watchdog reset flag
        IWDGRSTF OFFSET(29) NUMBITS(1) [],
        /// Software reset flag
        SFTRSTF OFFSET(28) NUMBITS(1) [],
        /// POR/PDR reset flag
        PORRSTF OFFSET(27) NUMBITS(1) [],
        /// PIN reset flag
        PINRSTF OFFSET(26) NUMBITS(1) [],
        /// Option byte loader reset flag
        OBLRSTF OFFSET(25) NUMBITS(1) [],
        /// Remove reset flag
        RMVF OFFSET(24) NUMBITS(1) [],
        /// Reset flag of the 1.8 V domain
        V18PWRRSTF OFFSET(23) NUMBITS(1) [],
        /// Internal low speed oscillator ready
        LSIRDY OFFSET(1) NUMBITS(1) [],
        /// Internal low speed oscillator enable
        LSION OFFSET(0) NUMBITS(1) []
    ],
    pub AHBRSTR [
        /// ADC3 and ADC4 reset
        ADC34RST OFFSET(29) NUMBITS(1) [],
        /// ADC1 and ADC2 reset
        ADC12RST OFFSET(28) NUMBITS(1) [],
        /// Touch sensing controller reset
        TSCRST OFFSET(24) NUMBITS(1) [],
        /// I/O port F reset
        IOPFRST OFFSET(22) NUMBITS(1) [],
        /// I/O port E reset
        IOPERST OFFSET(21) NUMBITS(1) [],
        /// I/O port D reset
        IOPDRST OFFSET(20) NUMBITS(1) [],
        /// I/O port C reset
        IOPCRST OFFSET(19) NUMBITS(1) [],
        /// I/O port B reset
        IOPBRST OFFSET(18) NUMBITS(1) [],
        /// I/O port A reset
        IOPARST OFFSET(17) NUMBITS(1) []
    ],
    pub CFGR2 [
        /// ADC34 prescaler
        ADC34PRES OFFSET(9) NUMBITS(5) [],
        /// ADC12 prescaler
        ADC12PRES OFFSET(4) NUMBITS(5) [],
        /// PREDIV division factor
        PREDIV OFFSET(0) NUMBITS(4) []
    ],
    pub CFGR3 [
        /// UART5 clock source selection
        UART5SW OFFSET(22) NUMBITS(2) [],
        /// UART4 clock source selection
        UART4SW OFFSET(20) NUMBITS(2) [],
        /// USART3 clock source selection
        USART3SW OFFSET(18) NUMBITS(2) [],
        /// USART2 clock source selection
        USART2SW OFFSET(16) NUMBITS(2) [],
        /// Timer8 clock source selection
        TIM8SW OFFSET(9) NUMBITS(1) [],
        /// Timer1 clock source selection
        TIM1SW OFFSET(8) NUMBITS(1) [],
        /// I2C2 clock source selection
        I2C2SW OFFSET(5) NUMBITS(1) [],
        /// I2C1 clock source selection
        I2C1SW OFFSET(4) NUMBITS(1) [],
        /// USART1 clock source selection
        USART1SW OFFSET(0) NUMBITS(2) [
            PCLK = 0b00,
            SYSCLK = 0b01,
            LSE = 0b10,
            HSI = 0b11
        ]
    ]
];

const RCC: StaticRef<RccRegisters> = unsafe { StaticRef::new(RCC_BASE as *const RccRegisters) };

/// Bus + Clock name for the peripherals
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PeripheralClockType {
    AHB(HCLK),
    APB1(PCLK1),
    APB2(PCLK2),
}

/// Peripherals clocked by HCLK. The discriminant is the bit in `AHBENR`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HCLK {
    DMA1 = 0,
    DMA2 = 1,
    SRAM = 2,
    FLITF = 4,
    CRC = 6,
    GPIOA = 17,
    GPIOB = 18,
    GPIOC = 19,
    GPIOD = 20,
    GPIOE = 21,
    GPIOF = 22,
    TSC = 24,
    ADC12 = 28,
    ADC34 = 29,
}

/// Peripherals clocked by PCLK1. The discriminant is the bit in `APB1ENR`
/// and `APB1RSTR`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PCLK1 {
    TIM2 = 0,
    TIM3 = 1,
    TIM4 = 2,
    TIM6 = 4,
    TIM7 = 5,
    WWDG = 11,
    SPI2 = 14,
    SPI3 = 15,
    USART2 = 17,
    USART3 = 18,
    UART4 = 19,
    UART5 = 20,
    I2C1 = 21,
    I2C2 = 22,
    USB = 23,
    CAN = 25,
    PWR = 28,
    DAC = 29,
}

/// Peripherals clocked by PCLK2. The discriminant is the bit in `APB2ENR`
/// and `APB2RSTR`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PCLK2 {
    SYSCFG = 0,
    TIM1 = 11,
    SPI1 = 12,
    TIM8 = 13,
    USART1 = 14,
    TIM15 = 16,
    TIM16 = 17,
    TIM17 = 18,
}

/// Source of the last reset, decoded from `RCC_CSR`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ResetFlags {
    pub low_power: bool,
    pub window_watchdog: bool,
    pub independent_watchdog: bool,
    pub software: bool,
    pub power_on: bool,
    pub pin: bool,
    pub option_byte_loader: bool,
    pub v18_power: bool,
}

impl From<u32> for ResetFlags {
    fn from(csr: u32) -> Self {
        let csr: LocalRegisterCopy<u32, CSR::Register> = LocalRegisterCopy::new(csr);
        ResetFlags {
            low_power: csr.is_set(CSR::LPWRRSTF),
            window_watchdog: csr.is_set(CSR::WWDGRSTF),
            independent_watchdog: csr.is_set(CSR::IWDGRSTF),
            software: csr.is_set(CSR::SFTRSTF),
            power_on: csr.is_set(CSR::PORRSTF),
            pin: csr.is_set(CSR::PINRSTF),
            option_byte_loader: csr.is_set(CSR::OBLRSTF),
            v18_power: csr.is_set(CSR::V18PWRRSTF),
        }
    }
}

/// Clock currently driving SYSCLK, as reported by `CFGR.SWS`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SysClockSource {
    HSI = 0b00,
    HSE = 0b01,
    PLL = 0b10,
}

pub struct Rcc {
    registers: StaticRef<RccRegisters>,
}

impl Rcc {
    pub const fn new() -> Rcc {
        Rcc { registers: RCC }
    }

    #[cfg(test)]
    pub(crate) fn with_registers(registers: StaticRef<RccRegisters>) -> Rcc {
        Rcc { registers }
    }

    pub fn is_enabled_clock(&self, clock: PeripheralClockType) -> bool {
        match clock {
            PeripheralClockType::AHB(c) => self.registers.ahbenr.is_set(Field::new(1, c as usize)),
            PeripheralClockType::APB1(c) => {
                self.registers.apb1enr.is_set(Field::new(1, c as usize))
            }
            PeripheralClockType::APB2(c) => {
                self.registers.apb2enr.is_set(Field::new(1, c as usize))
            }
        }
    }

    pub fn enable_clock(&self, clock: PeripheralClockType) {
        match clock {
            PeripheralClockType::AHB(c) => self
                .registers
                .ahbenr
                .modify(Field::<u32, AHBENR::Register>::new(1, c as usize).val(1)),
            PeripheralClockType::APB1(c) => self
                .registers
                .apb1enr
                .modify(Field::<u32, APB1ENR::Register>::new(1, c as usize).val(1)),
            PeripheralClockType::APB2(c) => self
                .registers
                .apb2enr
                .modify(Field::<u32, APB2ENR::Register>::new(1, c as usize).val(1)),
        }
    }

    pub fn disable_clock(&self, clock: PeripheralClockType) {
        match clock {
            PeripheralClockType::AHB(c) => self
                .registers
                .ahbenr
                .modify(Field::<u32, AHBENR::Register>::new(1, c as usize).val(0)),
            PeripheralClockType::APB1(c) => self
                .registers
                .apb1enr
                .modify(Field::<u32, APB1ENR::Register>::new(1, c as usize).val(0)),
            PeripheralClockType::APB2(c) => self
                .registers
                .apb2enr
                .modify(Field::<u32, APB2ENR::Register>::new(1, c as usize).val(0)),
        }
    }

    /// Pulse the reset line of a peripheral. On the AHB only the GPIO
    /// ports, TSC and ADCs have a reset bit.
    pub fn reset_peripheral(&self, clock: PeripheralClockType) -> Result<(), ErrorCode> {
        match clock {
            PeripheralClockType::AHB(c) => {
                if (c as u32) < HCLK::GPIOA as u32 {
                    return Err(ErrorCode::NOSUPPORT);
                }
                let field = Field::<u32, AHBRSTR::Register>::new(1, c as usize);
                self.registers.ahbrstr.modify(field.val(1));
                self.registers.ahbrstr.modify(field.val(0));
            }
            PeripheralClockType::APB1(c) => {
                let field = Field::<u32, APB1RSTR::Register>::new(1, c as usize);
                self.registers.apb1rstr.modify(field.val(1));
                self.registers.apb1rstr.modify(field.val(0));
            }
            PeripheralClockType::APB2(c) => {
                let field = Field::<u32, APB2RSTR::Register>::new(1, c as usize);
                self.registers.apb2rstr.modify(field.val(1));
                self.registers.apb2rstr.modify(field.val(0));
            }
        }
        Ok(())
    }

    pub fn reset_flags(&self) -> ResetFlags {
        ResetFlags::from(self.registers.csr.get())
    }

    /// Clear the reset flags by setting `RMVF`.
    pub fn clear_reset_flags(&self) {
        self.registers.csr.modify(CSR::RMVF::SET);
    }

    pub fn sys_clock_source(&self) -> SysClockSource {
        match self.registers.cfgr.read(CFGR::SWS) {
            0b01 => SysClockSource::HSE,
            0b10 => SysClockSource::PLL,
            _ => SysClockSource::HSI,
        }
    }

    pub fn ahb_prescaler(&self) -> AHBPrescaler {
        AHBPrescaler::from_bits(self.registers.cfgr.read(CFGR::HPRE))
    }

    pub fn apb1_prescaler(&self) -> APBPrescaler {
        APBPrescaler::from_bits(self.registers.cfgr.read(CFGR::PPRE1))
    }

    pub fn apb2_prescaler(&self) -> APBPrescaler {
        APBPrescaler::from_bits(self.registers.cfgr.read(CFGR::PPRE2))
    }

    pub fn is_hsi_ready(&self) -> bool {
        self.registers.cr.is_set(CR::HSIRDY)
    }

    pub fn is_hse_ready(&self) -> bool {
        self.registers.cr.is_set(CR::HSERDY)
    }

    pub fn is_pll_ready(&self) -> bool {
        self.registers.cr.is_set(CR::PLLRDY)
    }

    pub fn is_lsi_ready(&self) -> bool {
        self.registers.csr.is_set(CSR::LSIRDY)
    }

    pub fn is_lse_ready(&self) -> bool {
        self.registers.bdcr.is_set(BDCR::LSERDY)
    }
}

/// A peripheral clock gate.
pub struct PeripheralClock<'a> {
    pub clock: PeripheralClockType,
    rcc: &'a Rcc,
}

impl<'a> PeripheralClock<'a> {
    pub const fn new(clock: PeripheralClockType, rcc: &'a Rcc) -> Self {
        Self { clock, rcc }
    }
}

impl ClockInterface for PeripheralClock<'_> {
    fn is_enabled(&self) -> bool {
        self.rcc.is_enabled_clock(self.clock)
    }

    fn enable(&self) {
        self.rcc.enable_clock(self.clock);
    }

    fn disable(&self) {
        self.rcc.disable_clock(self.clock);
    }
}

/// On-target checks of the RCC state right after reset, before the board
/// touches the clock tree.
pub mod tests {
    use super::*;
    use chip_common::debug;

    pub fn run(rcc: &Rcc) {
        debug!("");
        debug!("===============================================");
        debug!("Testing RCC reset state...");

        assert_eq!(rcc.sys_clock_source(), SysClockSource::HSI);
        assert!(rcc.is_hsi_ready());
        assert!(!rcc.is_pll_ready());
        assert_eq!(rcc.ahb_prescaler(), AHBPrescaler::DivideBy1);
        assert_eq!(rcc.apb1_prescaler(), APBPrescaler::DivideBy1);
        assert_eq!(rcc.apb2_prescaler(), APBPrescaler::DivideBy1);

        // SRAM and FLITF clocks are on out of reset.
        let sram = PeripheralClock::new(PeripheralClockType::AHB(HCLK::SRAM), rcc);
        let flitf = PeripheralClock::new(PeripheralClockType::AHB(HCLK::FLITF), rcc);
        assert!(sram.is_enabled());
        assert!(flitf.is_enabled());

        let gpioa = PeripheralClock::new(PeripheralClockType::AHB(HCLK::GPIOA), rcc);
        let was_enabled = gpioa.is_enabled();
        gpioa.enable();
        assert!(gpioa.is_enabled());
        if !was_enabled {
            gpioa.disable();
            assert!(!gpioa.is_enabled());
        }

        debug!("Finished testing RCC reset state. Everything is alright!");
        debug!("===============================================");
        debug!("");
    }
}

#[cfg(test)]
mod register_tests {
    use super::*;
    use core::mem::{offset_of, size_of};
    use tock_registers::interfaces::Writeable;

    #[test]
    fn layout() {
        assert_eq!(offset_of!(RccRegisters, cfgr), 0x04);
        assert_eq!(offset_of!(RccRegisters, apb2rstr), 0x0c);
        assert_eq!(offset_of!(RccRegisters, ahbenr), 0x14);
        assert_eq!(offset_of!(RccRegisters, bdcr), 0x20);
        assert_eq!(offset_of!(RccRegisters, csr), 0x24);
        assert_eq!(offset_of!(RccRegisters, ahbrstr), 0x28);
        assert_eq!(offset_of!(RccRegisters, cfgr3), 0x30);
        assert_eq!(size_of::<RccRegisters>(), 0x34);
    }

    #[test]
    fn bitfields() {
        assert_eq!(CR::PLLRDY.mask << CR::PLLRDY.shift, 0x0200_0000);
        assert_eq!(CR::HSICAL.mask << CR::HSICAL.shift, 0x0000_ff00);
        assert_eq!(CFGR::PLLMUL.mask << CFGR::PLLMUL.shift, 0x003c_0000);
        assert_eq!(CFGR::PPRE2.mask << CFGR::PPRE2.shift, 0x0000_3800);
        assert_eq!(CFGR::MCO.mask << CFGR::MCO.shift, 0x0700_0000);
        assert_eq!(CIR::CSSC.shift, 23);
        assert_eq!(BDCR::RTCSEL.mask << BDCR::RTCSEL.shift, 0x0000_0300);
        assert_eq!(CSR::RMVF.shift, 24);
        assert_eq!(CFGR2::ADC34PRES.mask << CFGR2::ADC34PRES.shift, 0x0000_3e00);
        assert_eq!(CFGR3::UART5SW.mask << CFGR3::UART5SW.shift, 0x00c0_0000);
    }

    #[test]
    fn clock_gating() {
        let regs: RccRegisters = unsafe { core::mem::zeroed() };
        let rcc = Rcc::with_registers(unsafe { StaticRef::new(&regs) });

        let usart1 = PeripheralClock::new(PeripheralClockType::APB2(PCLK2::USART1), &rcc);
        let usart2 = PeripheralClock::new(PeripheralClockType::APB1(PCLK1::USART2), &rcc);
        let gpioc = PeripheralClock::new(PeripheralClockType::AHB(HCLK::GPIOC), &rcc);

        usart1.enable();
        usart2.enable();
        gpioc.enable();
        assert!(usart1.is_enabled());
        assert_eq!(regs.apb2enr.get(), 1 << 14);
        assert_eq!(regs.apb1enr.get(), 1 << 17);
        assert_eq!(regs.ahbenr.get(), 1 << 19);

        usart2.disable();
        assert!(!usart2.is_enabled());
        assert_eq!(regs.apb1enr.get(), 0);
    }

    #[test]
    fn reset_pulse() {
        let regs: RccRegisters = unsafe { core::mem::zeroed() };
        let rcc = Rcc::with_registers(unsafe { StaticRef::new(&regs) });

        assert_eq!(
            rcc.reset_peripheral(PeripheralClockType::AHB(HCLK::DMA1)),
            Err(ErrorCode::NOSUPPORT)
        );
        assert_eq!(
            rcc.reset_peripheral(PeripheralClockType::AHB(HCLK::GPIOB)),
            Ok(())
        );
        assert_eq!(
            rcc.reset_peripheral(PeripheralClockType::APB1(PCLK1::I2C1)),
            Ok(())
        );
        // The reset bit is released again.
        assert_eq!(regs.ahbrstr.get(), 0);
        assert_eq!(regs.apb1rstr.get(), 0);
    }

    #[test]
    fn reset_flags_and_clock_readout() {
        let flags = ResetFlags::from((1 << 26) | (1 << 27));
        assert!(flags.pin);
        assert!(flags.power_on);
        assert!(!flags.software);

        let regs: RccRegisters = unsafe { core::mem::zeroed() };
        let rcc = Rcc::with_registers(unsafe { StaticRef::new(&regs) });
        regs.cfgr
            .write(CFGR::SWS::PLL + CFGR::HPRE.val(0b1000) + CFGR::PPRE1.val(0b100));
        assert_eq!(rcc.sys_clock_source(), SysClockSource::PLL);
        assert_eq!(rcc.ahb_prescaler(), AHBPrescaler::DivideBy2);
        assert_eq!(rcc.apb1_prescaler(), APBPrescaler::DivideBy2);
        assert_eq!(rcc.apb2_prescaler(), APBPrescaler::DivideBy1);

        rcc.clear_reset_flags();
        assert!(regs.csr.is_set(CSR::RMVF));
    }
}
