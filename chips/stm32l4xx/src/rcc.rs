// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Reset and clock control (RM0351, section 6.4).

use crate::memory_map::RCC_BASE;
use chip_common::{ClockInterface, ErrorCode, StaticRef};
use stm32::prescaler::{AHBPrescaler, APBPrescaler};
use tock_registers::fields::Field;
use tock_registers::interfaces::{ReadWriteable, Readable};
use tock_registers::registers::ReadWrite;
use tock_registers::{register_bitfields, register_structs, LocalRegisterCopy};

register_structs! {
    /// Reset and clock control
    pub RccRegisters {
        /// clock control register
        (0x00 => cr: ReadWrite<u32, CR::Register>),
        /// internal clock sources calibration register
        (0x04 => icscr: ReadWrite<u32, ICSCR::Register>),
        /// clock configuration register
        (0x08 => cfgr: ReadWrite<u32, CFGR::Register>),
        /// PLL configuration register
        (0x0c => pllcfgr: ReadWrite<u32, PLLCFGR::Register>),
        /// PLLSAI1 configuration register
        (0x10 => pllsai1cfgr: ReadWrite<u32, PLLSAI1CFGR::Register>),
        /// PLLSAI2 configuration register
        (0x14 => pllsai2cfgr: ReadWrite<u32, PLLSAI2CFGR::Register>),
        /// clock interrupt enable register
        (0x18 => cier: ReadWrite<u32, CIER::Register>),
        /// clock interrupt flag register
        (0x1c => cifr: ReadWrite<u32, CIFR::Register>),
        /// clock interrupt clear register
        (0x20 => cicr: ReadWrite<u32, CICR::Register>),
        (0x24 => _reserved0),
        /// AHB1 peripheral reset register
        (0x28 => ahb1rstr: ReadWrite<u32, AHB1RSTR::Register>),
        /// AHB2 peripheral reset register
        (0x2c => ahb2rstr: ReadWrite<u32, AHB2ENR::Register>),
        /// AHB3 peripheral reset register
        (0x30 => ahb3rstr: ReadWrite<u32, AHB3ENR::Register>),
        (0x34 => _reserved1),
        /// APB1 peripheral reset register 1
        (0x38 => apb1rstr1: ReadWrite<u32, APB1RSTR1::Register>),
        /// APB1 peripheral reset register 2
        (0x3c => apb1rstr2: ReadWrite<u32, APB1ENR2::Register>),
        /// APB2 peripheral reset register
        (0x40 => apb2rstr: ReadWrite<u32, APB2RSTR::Register>),
        (0x44 => _reserved2),
        /// AHB1 peripheral clock enable register
        (0x48 => ahb1enr: ReadWrite<u32, AHB1ENR::Register>),
        /// AHB2 peripheral clock enable register
        (0x4c => ahb2enr: ReadWrite<u32, AHB2ENR::Register>),
        /// AHB3 peripheral clock enable register
        (0x50 => ahb3enr: ReadWrite<u32, AHB3ENR::Register>),
        (0x54 => _reserved3),
        /// APB1ENR1
        (0x58 => apb1enr1: ReadWrite<u32, APB1ENR1::Register>),
        /// APB1 peripheral clock enable register 2
        (0x5c => apb1enr2: ReadWrite<u32, APB1ENR2::Register>),
        /// APB2ENR
        (0x60 => apb2enr: ReadWrite<u32, APB2ENR::Register>),
        (0x64 => _reserved4),
        /// AHB1 peripheral clocks enable in Sleep and Stop modes register
        (0x68 => ahb1smenr: ReadWrite<u32, AHB1ENR::Register>),
        /// AHB2 peripheral clocks enable in Sleep and Stop modes register
        (0x6c => ahb2smenr: ReadWrite<u32, AHB2ENR::Register>),
        /// AHB3 peripheral clocks enable in Sleep and Stop modes register
        (0x70 => ahb3smenr: ReadWrite<u32, AHB3ENR::Register>),
        (0x74 => _reserved5),
        /// APB1SMENR1
        (0x78 => apb1smenr1: ReadWrite<u32, APB1ENR1::Register>),
        /// APB1 peripheral clocks enable in Sleep and Stop modes register 2
        (0x7c => apb1smenr2: ReadWrite<u32, APB1ENR2::Register>),
        /// APB2SMENR
        (0x80 => apb2smenr: ReadWrite<u32, APB2ENR::Register>),
        (0x84 => _reserved6),
        /// peripherals independent clock configuration register
        (0x88 => ccipr: ReadWrite<u32, CCIPR::Register>),
        (0x8c => _reserved7),
        /// Backup domain control register
        (0x90 => bdcr: ReadWrite<u32, BDCR::Register>),
        /// control/status register
        (0x94 => csr: ReadWrite<u32, CSR::Register>),
        (0x98 => @END),
    }
}

register_bitfields![u32,
    pub CR [
        /// SAI2 PLL clock ready flag
        PLLSAI2RDY OFFSET(29) NUMBITS(1) [],
        /// SAI2 PLL enable
        PLLSAI2ON OFFSET(28) NUMBITS(1) [],
        /// SAI1 PLL clock ready flag
        PLLSAI1RDY OFFSET(27) NUMBITS(1) [],
        /// SAI1 PLL enable
        PLLSAI1ON OFFSET(26) NUMBITS(1) [],
        /// Main PLL clock ready flag
        PLLRDY OFFSET(25) NUMBITS(1) [],
        /// Main PLL enable
        PLLON OFFSET(24) NUMBITS(1) [],
        /// Clock security system enable
        CSSON OFFSET(19) NUMBITS(1) [],
        /// HSE crystal oscillator bypass
        HSEBYP OFFSET(18) NUMBITS(1) [],
        /// HSE clock ready flag
        HSERDY OFFSET(17) NUMBITS(1) [],
        /// HSE clock enable
        HSEON OFFSET(16) NUMBITS(1) [],
        /// HSI automatic start from Stop
        HSIASFS OFFSET(11) NUMBITS(1) [],
        /// HSI clock ready flag
        HSIRDY OFFSET(10) NUMBITS(1) [],
        /// HSI always enable for peripheral kernels
        HSIKERON OFFSET(9) NUMBITS(1) [],
        /// HSI clock enable
        HSION OFFSET(8) NUMBITS(1) [],
        /// MSI clock ranges
        MSIRANGE OFFSET(4) NUMBITS(4) [
            Range100k = 0,
            Range200k = 1,
            Range400k = 2,
            Range800k = 3,
            Range1M = 4,
            Range2M = 5,
            Range4M = 6,
            Range8M = 7,
            Range16M = 8,
            Range24M = 9,
            Range32M = 10,
            Range48M = 11
        ],
        /// MSI clock range selection
        MSIRGSEL OFFSET(3) NUMBITS(1) [],
        /// MSI clock PLL enable
        MSIPLLEN OFFSET(2) NUMBITS(1) [],
        /// MSI clock ready flag
        MSIRDY OFFSET(1) NUMBITS(1) [],
        /// MSI clock enable
        MSION OFFSET(0) NUMBITS(1) []
    ],
    pub ICSCR [
        /// HSI clock trimming
        HSITRIM OFFSET(24) NUMBITS(5) [],
        /// HSI clock calibration
        HSICAL OFFSET(16) NUMBITS(8) [],
        /// MSI clock trimming
        MSITRIM OFFSET(8) NUMBITS(8) [],
        /// MSI clock calibration
        MSICAL OFFSET(0) NUMBITS(8) []
    ],
    pub CFGR [
        /// Microcontroller clock output prescaler
        MCOPRE OFFSET(28) NUMBITS(3) [
            Div1 = 0b000,
            Div2 = 0b001,
            Div4 = 0b010,
            Div8 = 0b011,
            Div16 = 0b100
        ],
        /// Microcontroller clock output
        MCOSEL OFFSET(24) NUMBITS(3) [
            Disabled = 0b000,
            SYSCLK = 0b001,
            MSI = 0b010,
            HSI16 = 0b011,
            HSE = 0b100,
            PLL = 0b101,
            LSI = 0b110,
            LSE = 0b111
        ],
        /// Wakeup from Stop and CSS backup clock selection
        STOPWUCK OFFSET(15) NUMBITS(1) [],
        /// APB high-speed prescaler (APB2)
        PPRE2 OFFSET(11) NUMBITS(3) [],
        /// PB low-speed prescaler (APB1)
        PPRE1 OFFSET(8) NUMBITS(3) [],
        /// AHB prescaler
        HPRE OFFSET(4) NUMBITS(4) [],
        /// System clock switch status
        SWS OFFSET(2) NUMBITS(2) [
            MSI = 0b00,
            HSI16 = 0b01,
            HSE = 0b10,
            PLL = 0b11
        ],
        /// System clock switch
        SW OFFSET(0) NUMBITS(2) [
            MSI = 0b00,
            HSI16 = 0b01,
            HSE = 0b10,
            PLL = 0b11
        ]
    ],
    pub PLLCFGR [
        /// Main PLL division factor for PLLCLK (system clock)
        PLLR OFFSET(25) NUMBITS(2) [
            Div2 = 0b00,
            Div4 = 0b01,
            Div6 = 0b10,
            Div8 = 0b11
        ],
        /// Main PLL PLLCLK output enable
        PLLREN OFFSET(24) NUMBITS(1) [],
        /// Main PLL division factor for PLL48M1CLK (48 MHz clock)
        PLLQ OFFSET(21) NUMBITS(2) [
            Div2 = 0b00,
            Div4 = 0b01,
            Div6 = 0b10,
            Div8 = 0b11
        ],
        /// Main PLL PLL48M1CLK output enable
        PLLQEN OFFSET(20) NUMBITS(1) [],
        /// Main PLL division factor for PLLSAI3CLK (SAI1 and SAI2 clock)
        PLLP OFFSET(17) NUMBITS(1) [
            Div7 = 0,
            Div17 = 1
        ],
        /// Main PLL PLLSAI3CLK output enable
        PLLPEN OFFSET(16) NUMBITS(1) [],
        /// Main PLL multiplication factor for VCO
        PLLN OFFSET(8) NUMBITS(7) [],
        /// Division factor for the main PLL and audio PLL (PLLSAI1 and
        /// PLLSAI2) input clock
        PLLM OFFSET(4) NUMBITS(3) [],
        /// Main PLL, PLLSAI1 and PLLSAI2 entry clock source
        PLLSRC OFFSET(0) NUMBITS(2) [
            NoClock = 0b00,
            MSI = 0b01,
            HSI16 = 0b10,
            HSE = 0b11
        ]
    ],
    pub PLLSAI1CFGR [
        /// PLLSAI1 division factor for PLLADC1CLK (ADC clock)
        PLLSAI1R OFFSET(25) NUMBITS(2) [],
        /// PLLSAI1 PLLADC1CLK output enable
        PLLSAI1REN OFFSET(24) NUMBITS(1) [],
        /// SAI1PLL division factor for PLL48M2CLK (48 MHz clock)
        PLLSAI1Q OFFSET(21) NUMBITS(2) [],
        /// SAI1PLL PLL48M2CLK output enable
        PLLSAI1QEN OFFSET(20) NUMBITS(1) [],
        /// SAI1PLL division factor for PLLSAI1CLK (SAI1 or SAI2 clock)
        PLLSAI1P OFFSET(17) NUMBITS(1) [],
        /// SAI1PLL PLLSAI1CLK output enable
        PLLSAI1PEN OFFSET(16) NUMBITS(1) [],
        /// SAI1PLL multiplication factor for VCO
        PLLSAI1N OFFSET(8) NUMBITS(7) []
    ],
    pub PLLSAI2CFGR [
        /// PLLSAI2 division factor for PLLADC2CLK (ADC clock)
        PLLSAI2R OFFSET(25) NUMBITS(2) [],
        /// PLLSAI2 PLLADC2CLK output enable
        PLLSAI2REN OFFSET(24) NUMBITS(1) [],
        /// SAI1PLL division factor for PLLSAI2CLK (SAI1 or SAI2 clock)
        PLLSAI2P OFFSET(17) NUMBITS(1) [],
        /// SAI2PLL PLLSAI2CLK output enable
        PLLSAI2PEN OFFSET(16) NUMBITS(1) [],
        /// SAI2PLL multiplication factor for VCO
        PLLSAI2N OFFSET(8) NUMBITS(7) []
    ],
    pub CIER [
        /// LSE clock security system interrupt enable
        LSECSSIE OFFSET(9) NUMBITS(1) [],
        /// PLLSAI2 ready interrupt enable
        PLLSAI2RDYIE OFFSET(7) NUMBITS(1) [],
        /// PLLSAI1 ready interrupt enable
        PLLSAI1RDYIE OFFSET(6) NUMBITS(1) [],
        /// PLL ready interrupt enable
        PLLRDYIE OFFSET(5) NUMBITS(1) [],
        /// HSE ready interrupt enable
        HSERDYIE OFFSET(4) NUMBITS(1) [],
        /// HSI ready interrupt enable
        HSIRDYIE OFFSET(3) NUMBITS(1) [],
        /// MSI ready interrupt enable
        MSIRDYIE OFFSET(2) NUMBITS(1) [],
        /// LSE ready interrupt enable
        LSERDYIE OFFSET(1) NUMBITS(1) [],
        /// LSI ready interrupt enable
        LSIRDYIE OFFSET(0) NUMBITS(1) []
    ],
    pub CIFR [
        /// LSE Clock security system interrupt flag
        LSECSSF OFFSET(9) NUMBITS(1) [],
        /// Clock security system interrupt flag
        CSSF OFFSET(8) NUMBITS(1) [],
        /// PLLSAI2 ready interrupt flag
        PLLSAI2RDYF OFFSET(7) NUMBITS(1) [],
        /// PLLSAI1 ready interrupt flag
        PLLSAI1RDYF OFFSET(6) NUMBITS(1) [],
        /// PLL ready interrupt flag
        PLLRDYF OFFSET(5) NUMBITS(1) [],
        /// HSE ready interrupt flag
        HSERDYF OFFSET(4) NUMBITS(1) [],
        /// HSI ready interrupt flag
        HSIRDYF OFFSET(3) NUMBITS(1) [],
        /// MSI ready interrupt flag
        MSIRDYF OFFSET(2) NUMBITS(1) [],
        /// LSE ready interrupt flag
        LSERDYF OFFSET(1) NUMBITS(1) [],
        /// LSI ready interrupt flag
        LSIRDYF OFFSET(0) NUMBITS(1) []
    ],
    pub CICR [
        /// LSE Clock security system interrupt clear
        LSECSSC OFFSET(9) NUMBITS(1) [],
        /// Clock security system interrupt clear
        CSSC OFFSET(8) NUMBITS(1) [],
        /// PLLSAI2 ready interrupt clear
        PLLSAI2RDYC OFFSET(7) NUMBITS(1) [],
        /// PLLSAI1 ready interrupt clear
        PLLSAI1RDYC OFFSET(6) NUMBITS(1) [],
        /// PLL ready interrupt clear
        PLLRDYC OFFSET(5) NUMBITS(1) [],
        /// HSE ready interrupt clear
        HSERDYC OFFSET(4) NUMBITS(1) [],
        /// HSI ready interrupt clear
        HSIRDYC OFFSET(3) NUMBITS(1) [],
        /// MSI ready interrupt clear
        MSIRDYC OFFSET(2) NUMBITS(1) [],
        /// LSE ready interrupt clear
        LSERDYC OFFSET(1) NUMBITS(1) [],
        /// LSI ready interrupt clear
        LSIRDYC OFFSET(0) NUMBITS(1) []
    ],
    pub AHB1RSTR [
        /// Touch Sensing Controller reset
        TSCRST OFFSET(16) NUMBITS(1) [],
        /// CRC reset
        CRCRST OFFSET(12) NUMBITS(1) [],
        /// Flash memory interface reset
        FLASHRST OFFSET(8) NUMBITS(1) [],
        /// DMA2 reset
        DMA2RST OFFSET(1) NUMBITS(1) [],
        /// DMA1 reset
        DMA1RST OFFSET(0) NUMBITS(1) []
    ],
    pub AHB1ENR [
        /// Touch Sensing Controller clock enable
        TSCEN OFFSET(16) NUMBITS(1) [],
        /// CRC clock enable
        CRCEN OFFSET(12) NUMBITS(1) [],
        /// Flash memory interface clock enable
        FLASHEN OFFSET(8) NUMBITS(1) [],
        /// DMA2 clock enable
        DMA2EN OFFSET(1) NUMBITS(1) [],
        /// DMA1 clock enable
        DMA1EN OFFSET(0) NUMBITS(1) []
    ],
    pub AHB2ENR [
        /// Random Number Generator clock enable
        RNGEN OFFSET(18) NUMBITS(1) [],
        /// ADC clock enable
        ADCEN OFFSET(13) NUMBITS(1) [],
        /// OTG full speed clock enable
        OTGFSEN OFFSET(12) NUMBITS(1) [],
        /// IO port H clock enable
        GPIOHEN OFFSET(7) NUMBITS(1) [],
        /// IO port G clock enable
        GPIOGEN OFFSET(6) NUMBITS(1) [],
        /// IO port F clock enable
        GPIOFEN OFFSET(5) NUMBITS(1) [],
        /// IO port E clock enable
        GPIOEEN OFFSET(4) NUMBITS(1) [],
        /// IO port D clock enable
        GPIODEN OFFSET(3) NUMBITS(1) [],
        /// IO port C clock enable
        GPIOCEN OFFSET(2) NUMBITS(1) [],
        /// IO port B clock enable
        GPIOBEN OFFSET(1) NUMBITS(1) [],
        /// IO port A clock enable
        GPIOAEN OFFSET(0) NUMBITS(1) []
    ],
    pub AHB3ENR [
        /// Quad SPI memory interface clock enable
        QSPIEN OFFSET(8) NUMBITS(1) [],
        /// Flexible memory controller clock enable
        FMCEN OFFSET(0) NUMBITS(1) []
    ],
    pub APB1RSTR1 [
        /// Low Power Timer 1 reset
        LPTIM1RST OFFSET(31) NUMBITS(1) [],
        /// OPAMP interface reset
        OPAMPRST OFFSET(30) NUMBITS(1) [],
        /// DAC1 interface reset
        DAC1RST OFFSET(29) NUMBITS(1) [],
        /// Power interface reset
        PWRRST OFFSET(28) NUMBITS(1) [],
        /// CAN1 reset
        CAN1RST OFFSET(25) NUMBITS(1) [],
        /// I2C3 reset
        I2C3RST OFFSET(23) NUMBITS(1) [],
        /// I2C2 reset
        I2C2RST OFFSET(22) NUMBITS(1) [],
        /// I2C1 reset
        I2C1RST OFFSET(21) NUMBITS(1) [],
        /// UART5 reset
        UART5RST OFFSET(20) NUMBITS(1) [],
        /// UART4 reset
        UART4RST OFFSET(19) NUMBITS(1) [],
        /// USART3 reset
        USART3RST OFFSET(18) NUMBITS(1) [],
        /// USART2 reset
        USART2RST OFFSET(17) NUMBITS(1) [],
        /// SPI3 reset
        SPI3RST OFFSET(15) NUMBITS(1) [],
        /// SPI2 reset
        SPI2RST OFFSET(14) NUMBITS(1) [],
        /// LCD interface reset
        LCDRST OFFSET(9) NUMBITS(1) [],
        /// TIM7 timer reset
        TIM7RST OFFSET(5) NUMBITS(1) [],
        /// TIM6 timer reset
        TIM6RST OFFSET(4) NUMBITS(1) [],
        /// TIM5 timer reset
        TIM5RST OFFSET(3) NUMBITS(1) [],
        /// TIM4 timer reset
        TIM4RST OFFSET(2) NUMBITS(1) [],
        /// TIM3 timer reset
        TIM3RST OFFSET(1) NUMBITS(1) [],
        /// TIM2 timer reset
        TIM2RST OFFSET(0) NUMBITS(1) []
    ],
    pub APB1ENR1 [
        /// Low power timer 1 clock enable
        LPTIM1EN OFFSET(31) NUMBITS(1) [],
        /// OPAMP interface clock enable
        OPAMPEN OFFSET(30) NUMBITS(1) [],
        /// DAC1 interface clock enable
        DAC1EN OFFSET(29) NUMBITS(1) [],
        /// Power interface clock enable
        PWREN OFFSET(28) NUMBITS(1) [],
        /// CAN1 clock enable
        CAN1EN OFFSET(25) NUMBITS(1) [],
        /// I2C3 clock enable
        I2C3EN OFFSET(23) NUMBITS(1) [],
        /// I2C2 clock enable
        I2C2EN OFFSET(22) NUMBITS(1) [],
        /// I2C1 clock enable
        I2C1EN OFFSET(21) NUMBITS(1) [],
        /// UART5 clock enable
        UART5EN OFFSET(20) NUMBITS(1) [],
        /// UART4 clock enable
        UART4EN OFFSET(19) NUMBITS(1) [],
        /// USART3 clock enable
        USART3EN OFFSET(18) NUMBITS(1) [],
        /// USART2 clock enable
        USART2EN OFFSET(17) NUMBITS(1) [],
        /// SPI3 clock enable
        SPI3EN OFFSET(15) NUMBITS(1) [],
        /// SPI2 clock enable
        SPI2EN OFFSET(14) NUMBITS(1) [],
        /// Window watchdog clock enable
        WWDGEN OFFSET(11) NUMBITS(1) [],
        /// LCD clock enable
        LCDEN OFFSET(9) NUMBITS(1) [],
        /// TIM7 timer clock enable
        TIM7EN OFFSET(5) NUMBITS(1) [],
        /// TIM6 timer clock enable
        TIM6EN OFFSET(4) NUMBITS(1) [],
        /// TIM5 timer clock enable
        TIM5EN OFFSET(3) NUMBITS(1) [],
        /// TIM4 timer clock enable
        TIM4EN OFFSET(2) NUMBITS(1) [],
        /// TIM3 timer clock enable
        TIM3EN OFFSET(1) NUMBITS(1) [],
        /// TIM2 timer clock enable
        TIM2EN OFFSET(0) NUMBITS(1) []
    ],
    pub APB1ENR2 [
        /// LPTIM2EN
        LPTIM2EN OFFSET(5) NUMBITS(1) [],
        /// Single wire protocol clock enable
        SWPMI1EN OFFSET(2) NUMBITS(1) [],
        /// Low power UART 1 clock enable
        LPUART1EN OFFSET(0) NUMBITS(1) []
    ],
    pub APB2RSTR [
        /// Digital filters for sigma-delata modulators (DFSDM) reset
        DFSDMRST OFFSET(24) NUMBITS(1) [],
        /// Serial audio interface 2 (SAI2) reset
        SAI2RST OFFSET(22) NUMBITS(1) [],
        /// Serial audio interface 1 (SAI1) reset
        SAI1RST OFFSET(21) NUMBITS(1) [],
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
        /// SPI1 reset
        SPI1RST OFFSET(12) NUMBITS(1) [],
        /// TIM1 timer reset
        TIM1RST OFFSET(11) NUMBITS(1) [],
        /// SDMMC reset
        SDMMCRST OFFSET(10) NUMBITS(1) [],
        /// System configuration (SYSCFG) reset
        SYSCFGRST OFFSET(0) NUMBITS(1) []
    ],
    pub APB2ENR [
        /// DFSDM timer clock enable
        DFSDMEN OFFSET(24) NUMBITS(1) [],
        /// SAI2 clock enable
        SAI2EN OFFSET(22) NUMBITS(1) [],
        /// SAI1 clock enable
        SAI1EN OFFSET(21) NUMBITS(1) [],
        /// TIM17 timer clock enable
        TIM17EN OFFSET(18) NUMBITS(1) [],
        /// TIM16 timer clock enable
        TIM16EN OFFSET(17) NUMBITS(1) [],
        /// TIM15 timer clock enable
        TIM15EN OFFSET(16) NUMBITS(1) [],
        /// USART1clock enable
        USART1EN OFFSET(14) NUMBITS(1) [],
        /// TIM8 timer clock enable
        TIM8EN OFFSET(13) NUMBITS(1) [],
        /// SPI1 clock enable
        SPI1EN OFFSET(12) NUMBITS(1) [],
        /// TIM1 timer clock enable
        TIM1EN OFFSET(11) NUMBITS(1) [],
        /// SDMMC clock enable
        SDMMCEN OFFSET(10) NUMBITS(1) [],
        /// Firewall clock enable
        FWEN OFFSET(7) NUMBITS(1) [],
        /// SYSCFG clock enable
        SYSCFGEN OFFSET(0) NUMBITS(1) []
    ],
    pub CCIPR [
        /// DFSDM clock source selection
        DFSDMSEL OFFSET(31) NUMBITS(1) [],
        /// SWPMI1 clock source selection
        SWPMI1SEL OFFSET(30) NUMBITS(1) [],
        /// ADCs clock source selection
        ADCSEL OFFSET(28) NUMBITS(2) [
            NoClock = 0b00,
            PLLSAI1R = 0b01,
            PLLSAI2R = 0b10,
            SYSCLK = 0b11
        ],
        /// 48 MHz clock source selection
        CLK48SEL OFFSET(26) NUMBITS(2) [
            NoClock = 0b00,
            PLLSAI1Q = 0b01,
            PLLQ = 0b10,
            MSI = 0b11
        ],
        /// SAI2 clock source selection
        SAI2SEL OFFSET(24) NUMBITS(2) [],
        /// SAI1 clock source selection
        SAI1SEL OFFSET(22) NUMBITS(2) [],
        /// Low power timer 2 clock source selection
        LPTIM2SEL OFFSET(20) NUMBITS(2) [],
        /// Low power timer 1 clock source selection
        LPTIM1SEL OFFSET(18) NUMBITS(2) [],
        /// I2C3 clock source selection
        I2C3SEL OFFSET(16) NUMBITS(2) [],
        /// I2C2 clock source selection
        I2C2SEL OFFSET(14) NUMBITS(2) [],
        /// I2C1 clock source selection
        I2C1SEL OFFSET(12) NUMBITS(2) [],
        /// LPUART1 clock source selection
        LPUART1SEL OFFSET(10) NUMBITS(2) [],
        /// UART5 clock source selection
        UART5SEL OFFSET(8) NUMBITS(2) [],
        /// UART4 clock source selection
        UART4SEL OFFSET(6) NUMBITS(2) [],
        /// USART3 clock source selection
        USART3SEL OFFSET(4) NUMBITS(2) [],
        /// USART2 clock source selection
        USART2SEL OFFSET(2) NUMBITS(2) [],
        /// USART1 clock source selection
        USART1SEL OFFSET(0) NUMBITS(2) [
            PCLK = 0b00,
            SYSCLK = 0b01,
            HSI16 = 0b10,
            LSE = 0b11
        ]
    ],
    pub BDCR [
        /// Low speed clock output selection
        LSCOSEL OFFSET(25) NUMBITS(1) [],
        /// Low speed clock output enable
        LSCOEN OFFSET(24) NUMBITS(1) [],
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
        /// LSECSSD
        LSECSSD OFFSET(6) NUMBITS(1) [],
        /// LSECSSON
        LSECSSON OFFSET(5) NUMBITS(1) [],
        /// SE oscillator drive capability
        LSEDRV OFFSET(3) NUMBITS(2) [],
        /// LSE oscillator bypass
        LSEBYP OFFSET(2) NUMBITS(1) [],
        /// LSE oscillator ready
        LSERDY OFFSET(1) NUMBITS(1) [],
        /// LSE oscillator enable
        LSEON OFFSET(0) NUMBITS(1) []
    ],
    pub CSR [
        /// Low-power reset flag
        LPWRSTF OFFSET(31) NUMBITS(1) [],
        /// Window watchdog reset flag
        WWDGRSTF OFFSET(30) NUMBITS(1) [],
        /// Independent window watchdog reset flag
        IWDGRSTF OFFSET(29) NUMBITS(1) [],
        /// Software reset flag
        SFTRSTF OFFSET(28) NUMBITS(1) [],
        /// BOR flag
        BORRSTF OFFSET(27) NUMBITS(1) [],
        /// Pin reset flag
        PINRSTF OFFSET(26) NUMBITS(1) [],
        /// Option byte loader reset flag
        OBLRSTF OFFSET(25) NUMBITS(1) [],
        /// Firewall reset flag
        FIREWALLRSTF OFFSET(24) NUMBITS(1) [],
        /// Remove reset flag
        RMVF OFFSET(23) NUMBITS(1) [],
        /// SI range after Standby mode
        MSISRANGE OFFSET(8) NUMBITS(4) [],
        /// LSI oscillator ready
        LSIRDY OFFSET(1) NUMBITS(1) [],
        /// LSI oscillator enable
        LSION OFFSET(0) NUMBITS(1) []
    ]
];

const RCC: StaticRef<RccRegisters> = unsafe { StaticRef::new(RCC_BASE as *const RccRegisters) };

/// Bus + Clock name for the peripherals
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PeripheralClockType {
    AHB1(HCLK1),
    AHB2(HCLK2),
    AHB3(HCLK3),
    APB1(PCLK1),
    APB1_2(PCLK1_2),
    APB2(PCLK2),
}

/// Peripherals clocked by HCLK on AHB1. The discriminant is the bit in
/// `AHB1ENR` and `AHB1RSTR`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HCLK1 {
    DMA1 = 0,
    DMA2 = 1,
    FLASH = 8,
    CRC = 12,
    TSC = 16,
}

/// Peripherals clocked by HCLK on AHB2.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HCLK2 {
    GPIOA = 0,
    GPIOB = 1,
    GPIOC = 2,
    GPIOD = 3,
    GPIOE = 4,
    GPIOF = 5,
    GPIOG = 6,
    GPIOH = 7,
    OTGFS = 12,
    ADC = 13,
    RNG = 18,
}

/// Peripherals clocked by HCLK on AHB3.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HCLK3 {
    FMC = 0,
    QSPI = 8,
}

/// Peripherals in `APB1ENR1`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PCLK1 {
    TIM2 = 0,
    TIM3 = 1,
    TIM4 = 2,
    TIM5 = 3,
    TIM6 = 4,
    TIM7 = 5,
    LCD = 9,
    WWDG = 11,
    SPI2 = 14,
    SPI3 = 15,
    USART2 = 17,
    USART3 = 18,
    UART4 = 19,
    UART5 = 20,
    I2C1 = 21,
    I2C2 = 22,
    I2C3 = 23,
    CAN1 = 25,
    PWR = 28,
    DAC1 = 29,
    OPAMP = 30,
    LPTIM1 = 31,
}

/// Peripherals in `APB1ENR2`.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PCLK1_2 {
    LPUART1 = 0,
    SWPMI1 = 2,
    LPTIM2 = 5,
}

/// Peripherals clocked by PCLK2.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PCLK2 {
    SYSCFG = 0,
    FW = 7,
    SDMMC1 = 10,
    TIM1 = 11,
    SPI1 = 12,
    TIM8 = 13,
    USART1 = 14,
    TIM15 = 16,
    TIM16 = 17,
    TIM17 = 18,
    SAI1 = 21,
    SAI2 = 22,
    DFSDM1 = 24,
}

/// Source of the last reset, decoded from `RCC_CSR`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ResetFlags {
    pub low_power: bool,
    pub window_watchdog: bool,
    pub independent_watchdog: bool,
    pub software: bool,
    pub brown_out: bool,
    pub pin: bool,
    pub option_byte_loader: bool,
    pub firewall: bool,
}

impl From<u32> for ResetFlags {
    fn from(csr: u32) -> Self {
        let csr: LocalRegisterCopy<u32, CSR::Register> = LocalRegisterCopy::new(csr);
        ResetFlags {
            low_power: csr.is_set(CSR::LPWRSTF),
            window_watchdog: csr.is_set(CSR::WWDGRSTF),
            independent_watchdog: csr.is_set(CSR::IWDGRSTF),
            software: csr.is_set(CSR::SFTRSTF),
            brown_out: csr.is_set(CSR::BORRSTF),
            pin: csr.is_set(CSR::PINRSTF),
            option_byte_loader: csr.is_set(CSR::OBLRSTF),
            firewall: csr.is_set(CSR::FIREWALLRSTF),
        }
    }
}

/// Clock currently driving SYSCLK, as reported by `CFGR.SWS`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SysClockSource {
    MSI = 0b00,
    HSI16 = 0b01,
    HSE = 0b10,
    PLL = 0b11,
}

pub struct Rcc {
    registers: StaticRef<RccRegisters>,
}

fn bit<R: tock_registers::RegisterLongName>(position: u32) -> Field<u32, R> {
    Field::new(1, position as usize)
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
        let r = &self.registers;
        match clock {
            PeripheralClockType::AHB1(c) => r.ahb1enr.is_set(bit(c as u32)),
            PeripheralClockType::AHB2(c) => r.ahb2enr.is_set(bit(c as u32)),
            PeripheralClockType::AHB3(c) => r.ahb3enr.is_set(bit(c as u32)),
            PeripheralClockType::APB1(c) => r.apb1enr1.is_set(bit(c as u32)),
            PeripheralClockType::APB1_2(c) => r.apb1enr2.is_set(bit(c as u32)),
            PeripheralClockType::APB2(c) => r.apb2enr.is_set(bit(c as u32)),
        }
    }

    fn set_clock(&self, clock: PeripheralClockType, on: u32) {
        let r = &self.registers;
        match clock {
            PeripheralClockType::AHB1(c) => r.ahb1enr.modify(bit(c as u32).val(on)),
            PeripheralClockType::AHB2(c) => r.ahb2enr.modify(bit(c as u32).val(on)),
            PeripheralClockType::AHB3(c) => r.ahb3enr.modify(bit(c as u32).val(on)),
            PeripheralClockType::APB1(c) => r.apb1enr1.modify(bit(c as u32).val(on)),
            PeripheralClockType::APB1_2(c) => r.apb1enr2.modify(bit(c as u32).val(on)),
            PeripheralClockType::APB2(c) => r.apb2enr.modify(bit(c as u32).val(on)),
        }
    }

    pub fn enable_clock(&self, clock: PeripheralClockType) {
        self.set_clock(clock, 1);
    }

    pub fn disable_clock(&self, clock: PeripheralClockType) {
        self.set_clock(clock, 0);
    }

    /// Pulse the reset line of a peripheral. The window watchdog and the
    /// firewall have no reset bit.
    pub fn reset_peripheral(&self, clock: PeripheralClockType) -> Result<(), ErrorCode> {
        let r = &self.registers;
        match clock {
            PeripheralClockType::APB1(PCLK1::WWDG) | PeripheralClockType::APB2(PCLK2::FW) => {
                return Err(ErrorCode::NOSUPPORT)
            }
            PeripheralClockType::AHB1(c) => {
                r.ahb1rstr.modify(bit(c as u32).val(1));
                r.ahb1rstr.modify(bit(c as u32).val(0));
            }
            PeripheralClockType::AHB2(c) => {
                r.ahb2rstr.modify(bit(c as u32).val(1));
                r.ahb2rstr.modify(bit(c as u32).val(0));
            }
            PeripheralClockType::AHB3(c) => {
                r.ahb3rstr.modify(bit(c as u32).val(1));
                r.ahb3rstr.modify(bit(c as u32).val(0));
            }
            PeripheralClockType::APB1(c) => {
                r.apb1rstr1.modify(bit(c as u32).val(1));
                r.apb1rstr1.modify(bit(c as u32).val(0));
            }
            PeripheralClockType::APB1_2(c) => {
                r.apb1rstr2.modify(bit(c as u32).val(1));
                r.apb1rstr2.modify(bit(c as u32).val(0));
            }
            PeripheralClockType::APB2(c) => {
                r.apb2rstr.modify(bit(c as u32).val(1));
                r.apb2rstr.modify(bit(c as u32).val(0));
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
            0b01 => SysClockSource::HSI16,
            0b10 => SysClockSource::HSE,
            0b11 => SysClockSource::PLL,
            _ => SysClockSource::MSI,
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

    /// Raw `MSIRANGE` value in use (from `CR` when `MSIRGSEL` is set,
    /// from `CSR.MSISRANGE` otherwise).
    pub fn msi_range(&self) -> u32 {
        if self.registers.cr.is_set(CR::MSIRGSEL) {
            self.registers.cr.read(CR::MSIRANGE)
        } else {
            self.registers.csr.read(CSR::MSISRANGE)
        }
    }

    pub fn is_msi_ready(&self) -> bool {
        self.registers.cr.is_set(CR::MSIRDY)
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

/// On-target checks of the RCC state right after reset.
///
/// ```rust,ignore
/// stm32l4xx::rcc::tests::run(&rcc);
/// ```
///
/// **NOTE:** All these tests assume default boot configuration.
pub mod tests {
    use super::*;
    use chip_common::debug;

    pub fn run(rcc: &Rcc) {
        debug!("");
        debug!("===============================================");
        debug!("Testing RCC reset state...");

        // MSI at 4 MHz drives SYSCLK out of reset
        assert_eq!(rcc.sys_clock_source(), SysClockSource::MSI);
        assert!(rcc.is_msi_ready());
        assert_eq!(rcc.msi_range(), 6);
        assert!(!rcc.is_pll_ready());
        assert_eq!(rcc.ahb_prescaler(), AHBPrescaler::DivideBy1);
        assert_eq!(rcc.apb1_prescaler(), APBPrescaler::DivideBy1);

        // Flash interface clock is on out of reset
        let flash = PeripheralClock::new(PeripheralClockType::AHB1(HCLK1::FLASH), rcc);
        assert!(flash.is_enabled());

        let pwr = PeripheralClock::new(PeripheralClockType::APB1(PCLK1::PWR), rcc);
        let was_enabled = pwr.is_enabled();
        pwr.enable();
        assert!(pwr.is_enabled());
        if !was_enabled {
            pwr.disable();
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
        assert_eq!(offset_of!(RccRegisters, pllcfgr), 0x0c);
        assert_eq!(offset_of!(RccRegisters, cicr), 0x20);
        assert_eq!(offset_of!(RccRegisters, ahb1rstr), 0x28);
        assert_eq!(offset_of!(RccRegisters, apb1rstr1), 0x38);
        assert_eq!(offset_of!(RccRegisters, ahb1enr), 0x48);
        assert_eq!(offset_of!(RccRegisters, apb1enr1), 0x58);
        assert_eq!(offset_of!(RccRegisters, apb2enr), 0x60);
        assert_eq!(offset_of!(RccRegisters, ahb1smenr), 0x68);
        assert_eq!(offset_of!(RccRegisters, apb2smenr), 0x80);
        assert_eq!(offset_of!(RccRegisters, ccipr), 0x88);
        assert_eq!(offset_of!(RccRegisters, bdcr), 0x90);
        assert_eq!(offset_of!(RccRegisters, csr), 0x94);
        assert_eq!(size_of::<RccRegisters>(), 0x98);
    }

    #[test]
    fn bitfields() {
        assert_eq!(CR::MSIRANGE.mask << CR::MSIRANGE.shift, 0xf0);
        assert_eq!(CR::PLLSAI2RDY.shift, 29);
        assert_eq!(ICSCR::HSITRIM.mask << ICSCR::HSITRIM.shift, 0x1f00_0000);
        assert_eq!(PLLCFGR::PLLN.mask << PLLCFGR::PLLN.shift, 0x7f00);
        assert_eq!(PLLCFGR::PLLM.mask << PLLCFGR::PLLM.shift, 0x70);
        assert_eq!(PLLCFGR::PLLR.mask << PLLCFGR::PLLR.shift, 0x0600_0000);
        assert_eq!(CFGR::MCOPRE.mask << CFGR::MCOPRE.shift, 0x7000_0000);
        assert_eq!(CCIPR::CLK48SEL.mask << CCIPR::CLK48SEL.shift, 0x0c00_0000);
        assert_eq!(CSR::RMVF.shift, 23);
        assert_eq!(BDCR::LSCOSEL.shift, 25);
    }

    #[test]
    fn clock_gating() {
        let regs: RccRegisters = unsafe { core::mem::zeroed() };
        let rcc = Rcc::with_registers(unsafe { StaticRef::new(&regs) });

        PeripheralClock::new(PeripheralClockType::AHB2(HCLK2::GPIOA), &rcc).enable();
        PeripheralClock::new(PeripheralClockType::APB1(PCLK1::USART2), &rcc).enable();
        PeripheralClock::new(PeripheralClockType::APB1_2(PCLK1_2::LPUART1), &rcc).enable();
        PeripheralClock::new(PeripheralClockType::APB1(PCLK1::LPTIM1), &rcc).enable();
        assert_eq!(regs.ahb2enr.get(), 1);
        assert_eq!(regs.apb1enr1.get(), (1 << 17) | (1 << 31));
        assert_eq!(regs.apb1enr2.get(), 1);

        let usart2 = PeripheralClock::new(PeripheralClockType::APB1(PCLK1::USART2), &rcc);
        usart2.disable();
        assert!(!usart2.is_enabled());
        assert_eq!(regs.apb1enr1.get(), 1 << 31);
    }

    #[test]
    fn reset_pulse() {
        let regs: RccRegisters = unsafe { core::mem::zeroed() };
        let rcc = Rcc::with_registers(unsafe { StaticRef::new(&regs) });

        assert_eq!(
            rcc.reset_peripheral(PeripheralClockType::APB1(PCLK1::WWDG)),
            Err(ErrorCode::NOSUPPORT)
        );
        assert_eq!(
            rcc.reset_peripheral(PeripheralClockType::AHB3(HCLK3::QSPI)),
            Ok(())
        );
        assert_eq!(regs.ahb3rstr.get(), 0);
    }

    #[test]
    fn clock_readout() {
        let regs: RccRegisters = unsafe { core::mem::zeroed() };
        let rcc = Rcc::with_registers(unsafe { StaticRef::new(&regs) });

        regs.cfgr
            .write(CFGR::SWS::PLL + CFGR::PPRE1.val(0b101) + CFGR::PPRE2.val(0b100));
        assert_eq!(rcc.sys_clock_source(), SysClockSource::PLL);
        assert_eq!(rcc.apb1_prescaler(), APBPrescaler::DivideBy4);
        assert_eq!(rcc.apb2_prescaler(), APBPrescaler::DivideBy2);

        regs.csr.write(CSR::MSISRANGE.val(6) + CSR::PINRSTF::SET);
        assert_eq!(rcc.msi_range(), 6);
        regs.cr.write(CR::MSIRGSEL::SET + CR::MSIRANGE::Range48M);
        assert_eq!(rcc.msi_range(), 11);
        assert!(rcc.reset_flags().pin);
    }
}
