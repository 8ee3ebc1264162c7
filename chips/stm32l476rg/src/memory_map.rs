// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Memory regions and peripheral table of the STM32L476RG.

use chip_common::memory_map::{MemoryRegion, Peripheral, PeripheralMap};
pub use stm32l4xx::memory_map::*;

/// 1 MiB main flash, two banks of 512 KiB
pub const FLASH: MemoryRegion = MemoryRegion::new(FLASH_MEMORY_BASE, 1024 * 1024);
/// 96 KiB SRAM1
pub const SRAM1: MemoryRegion = MemoryRegion::new(SRAM1_BASE, 96 * 1024);
/// 32 KiB SRAM2, also aliased at `0x2001_8000`
pub const SRAM2: MemoryRegion = MemoryRegion::new(SRAM2_BASE, 32 * 1024);

static TABLE: [Peripheral; 65] = [
    Peripheral::new("TIM2", TIM2_BASE),
    Peripheral::new("TIM3", TIM3_BASE),
    Peripheral::new("TIM4", TIM4_BASE),
    Peripheral::new("TIM5", TIM5_BASE),
    Peripheral::new("TIM6", TIM6_BASE),
    Peripheral::new("TIM7", TIM7_BASE),
    Peripheral::new("LCD", LCD_BASE),
    Peripheral::new("RTC", RTC_BASE),
    Peripheral::new("WWDG", WWDG_BASE),
    Peripheral::new("IWDG", IWDG_BASE),
    Peripheral::new("SPI2", SPI2_BASE),
    Peripheral::new("SPI3", SPI3_BASE),
    Peripheral::new("USART2", USART2_BASE),
    Peripheral::new("USART3", USART3_BASE),
    Peripheral::new("UART4", UART4_BASE),
    Peripheral::new("UART5", UART5_BASE),
    Peripheral::new("I2C1", I2C1_BASE),
    Peripheral::new("I2C2", I2C2_BASE),
    Peripheral::new("I2C3", I2C3_BASE),
    Peripheral::new("CAN1", CAN1_BASE),
    Peripheral::new("PWR", PWR_BASE),
    Peripheral::new("DAC1", DAC1_BASE),
    Peripheral::new("OPAMP", OPAMP_BASE),
    Peripheral::new("LPTIM1", LPTIM1_BASE),
    Peripheral::new("LPUART1", LPUART1_BASE),
    Peripheral::new("SWPMI1", SWPMI1_BASE),
    Peripheral::new("LPTIM2", LPTIM2_BASE),
    Peripheral::new("SYSCFG", SYSCFG_BASE),
    Peripheral::new("VREFBUF", VREFBUF_BASE),
    Peripheral::new("COMP", COMP_BASE),
    Peripheral::new("EXTI", EXTI_BASE),
    Peripheral::new("FIREWALL", FIREWALL_BASE),
    Peripheral::new("SDMMC1", SDMMC1_BASE),
    Peripheral::new("TIM1", TIM1_BASE),
    Peripheral::new("SPI1", SPI1_BASE),
    Peripheral::new("TIM8", TIM8_BASE),
    Peripheral::new("USART1", USART1_BASE),
    Peripheral::new("TIM15", TIM15_BASE),
    Peripheral::new("TIM16", TIM16_BASE),
    Peripheral::new("TIM17", TIM17_BASE),
    Peripheral::new("SAI1", SAI1_BASE),
    Peripheral::new("SAI2", SAI2_BASE),
    Peripheral::new("DFSDM1", DFSDM1_BASE),
    Peripheral::new("DMA1", DMA1_BASE),
    Peripheral::new("DMA2", DMA2_BASE),
    Peripheral::new("RCC", RCC_BASE),
    Peripheral::new("FLASH", FLASH_R_BASE),
    Peripheral::new("CRC", CRC_BASE),
    Peripheral::new("TSC", TSC_BASE),
    Peripheral::new("GPIOA", GPIOA_BASE),
    Peripheral::new("GPIOB", GPIOB_BASE),
    Peripheral::new("GPIOC", GPIOC_BASE),
    Peripheral::new("GPIOD", GPIOD_BASE),
    Peripheral::new("GPIOE", GPIOE_BASE),
    Peripheral::new("GPIOF", GPIOF_BASE),
    Peripheral::new("GPIOG", GPIOG_BASE),
    Peripheral::new("GPIOH", GPIOH_BASE),
    Peripheral::new("USB_OTG_FS", USB_OTG_FS_BASE),
    Peripheral::new("ADC1", ADC1_BASE),
    Peripheral::new("ADC2", ADC2_BASE),
    Peripheral::new("ADC3", ADC3_BASE),
    Peripheral::new("ADC123_COMMON", ADC123_COMMON_BASE),
    Peripheral::new("RNG", RNG_BASE),
    Peripheral::new("FMC", FMC_R_BASE),
    Peripheral::new("QUADSPI", QSPI_R_BASE),
];

pub static PERIPHERALS: PeripheralMap = PeripheralMap::new(&TABLE);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip_specs::Stm32l476Specs;
    use stm32l4xx::chip_specific::flash::FlashChipSpecific;

    #[test]
    fn table_is_ordered() {
        assert!(PERIPHERALS.is_sorted_and_unique());
        assert_eq!(PERIPHERALS.len(), 65);
    }

    #[test]
    fn lookups() {
        assert_eq!(PERIPHERALS.get("USART2"), Some(0x4000_4400));
        assert_eq!(PERIPHERALS.get("LPUART1"), Some(0x4000_8000));
        assert_eq!(PERIPHERALS.get("GPIOH"), Some(0x4800_1c00));
        assert_eq!(PERIPHERALS.get("RNG"), Some(0x5006_0800));
        assert_eq!(PERIPHERALS.name_of(0x4002_1000), Some("RCC"));
        assert_eq!(PERIPHERALS.get("USB"), None);
    }

    #[test]
    fn regions() {
        assert_eq!(FLASH.end(), 0x0810_0000);
        assert_eq!(FLASH.size, Stm32l476Specs::FLASH_SIZE);
        assert_eq!(SRAM1.end(), 0x2001_8000);
        assert!(SRAM2.contains(0x1000_7fff));
        assert!(!SRAM2.contains(0x1000_8000));
    }
}
