// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Memory regions and peripheral table of the STM32F303xC.

use chip_common::memory_map::{MemoryRegion, Peripheral, PeripheralMap};
pub use stm32f3xx::memory_map::*;

/// 256 KiB main flash
pub const FLASH: MemoryRegion = MemoryRegion::new(FLASH_MEMORY_BASE, 256 * 1024);
/// 40 KiB SRAM
pub const SRAM: MemoryRegion = MemoryRegion::new(SRAM_BASE, 40 * 1024);
/// 8 KiB core coupled memory
pub const CCMRAM: MemoryRegion = MemoryRegion::new(CCMRAM_BASE, 8 * 1024);

static TABLE: [Peripheral; 52] = [
    Peripheral::new("TIM2", TIM2_BASE),
    Peripheral::new("TIM3", TIM3_BASE),
    Peripheral::new("TIM4", TIM4_BASE),
    Peripheral::new("TIM6", TIM6_BASE),
    Peripheral::new("TIM7", TIM7_BASE),
    Peripheral::new("RTC", RTC_BASE),
    Peripheral::new("WWDG", WWDG_BASE),
    Peripheral::new("IWDG", IWDG_BASE),
    Peripheral::new("I2S2EXT", I2S2EXT_BASE),
    Peripheral::new("SPI2", SPI2_BASE),
    Peripheral::new("SPI3", SPI3_BASE),
    Peripheral::new("I2S3EXT", I2S3EXT_BASE),
    Peripheral::new("USART2", USART2_BASE),
    Peripheral::new("USART3", USART3_BASE),
    Peripheral::new("UART4", UART4_BASE),
    Peripheral::new("UART5", UART5_BASE),
    Peripheral::new("I2C1", I2C1_BASE),
    Peripheral::new("I2C2", I2C2_BASE),
    Peripheral::new("USB", USB_BASE),
    Peripheral::new("USB_PMA", USB_PMAADDR),
    Peripheral::new("CAN", CAN_BASE),
    Peripheral::new("PWR", PWR_BASE),
    Peripheral::new("DAC1", DAC1_BASE),
    Peripheral::new("SYSCFG", SYSCFG_BASE),
    Peripheral::new("COMP", COMP_BASE),
    Peripheral::new("OPAMP", OPAMP_BASE),
    Peripheral::new("EXTI", EXTI_BASE),
    Peripheral::new("TIM1", TIM1_BASE),
    Peripheral::new("SPI1", SPI1_BASE),
    Peripheral::new("TIM8", TIM8_BASE),
    Peripheral::new("USART1", USART1_BASE),
    Peripheral::new("TIM15", TIM15_BASE),
    Peripheral::new("TIM16", TIM16_BASE),
    Peripheral::new("TIM17", TIM17_BASE),
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
    Peripheral::new("ADC1", ADC1_BASE),
    Peripheral::new("ADC2", ADC2_BASE),
    Peripheral::new("ADC1_2_COMMON", ADC1_2_COMMON_BASE),
    Peripheral::new("ADC3", ADC3_BASE),
    Peripheral::new("ADC4", ADC4_BASE),
    Peripheral::new("ADC3_4_COMMON", ADC3_4_COMMON_BASE),
];

pub static PERIPHERALS: PeripheralMap = PeripheralMap::new(&TABLE);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip_specs::Stm32f303Specs;
    use stm32f3xx::chip_specific::flash::FlashChipSpecific;

    #[test]
    fn table_is_ordered() {
        assert!(PERIPHERALS.is_sorted_and_unique());
        assert_eq!(PERIPHERALS.len(), 52);
    }

    #[test]
    fn lookups() {
        assert_eq!(PERIPHERALS.get("USART1"), Some(0x4001_3800));
        assert_eq!(PERIPHERALS.get("GPIOE"), Some(0x4800_1000));
        assert_eq!(PERIPHERALS.get("FLASH"), Some(0x4002_2000));
        assert_eq!(PERIPHERALS.name_of(0x4000_4400), Some("USART2"));
        assert_eq!(PERIPHERALS.get("TIM20"), None);
    }

    #[test]
    fn regions() {
        assert_eq!(FLASH.end(), 0x0804_0000);
        assert_eq!(FLASH.size, Stm32f303Specs::FLASH_SIZE);
        assert_eq!(SRAM.end(), 0x2000_a000);
        assert!(CCMRAM.contains(0x1000_1fff));
        assert!(!CCMRAM.contains(0x1000_2000));
    }
}
