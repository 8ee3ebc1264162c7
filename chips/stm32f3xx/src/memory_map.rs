// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Peripheral base addresses of the STM32F3 family (RM0316, section 3.2.2).
//!
//! Not every part implements every block; the part crates list the ones
//! they have in their `PERIPHERALS` table.

use chip_common::StaticRef;
use stm32::dma::DmaRegisters;
use stm32::exti::ExtiRegisters;
use stm32::gpio::GpioRegisters;
use stm32::i2c::I2CRegisters;
use stm32::iwdg::IwdgRegisters;
use stm32::spi::SpiRegisters;
use stm32::tim::TimRegisters;
use stm32::usart::UsartRegisters;

pub const FLASH_MEMORY_BASE: usize = 0x0800_0000;
pub const SYSTEM_MEMORY_BASE: usize = 0x1fff_d800;
pub const OPTION_BYTES_BASE: usize = 0x1fff_f800;
pub const CCMRAM_BASE: usize = 0x1000_0000;
pub const SRAM_BASE: usize = 0x2000_0000;

// APB1
pub const TIM2_BASE: usize = 0x4000_0000;
pub const TIM3_BASE: usize = 0x4000_0400;
pub const TIM4_BASE: usize = 0x4000_0800;
pub const TIM6_BASE: usize = 0x4000_1000;
pub const TIM7_BASE: usize = 0x4000_1400;
pub const RTC_BASE: usize = 0x4000_2800;
pub const WWDG_BASE: usize = 0x4000_2c00;
pub const IWDG_BASE: usize = 0x4000_3000;
pub const I2S2EXT_BASE: usize = 0x4000_3400;
pub const SPI2_BASE: usize = 0x4000_3800;
pub const SPI3_BASE: usize = 0x4000_3c00;
pub const I2S3EXT_BASE: usize = 0x4000_4000;
pub const USART2_BASE: usize = 0x4000_4400;
pub const USART3_BASE: usize = 0x4000_4800;
pub const UART4_BASE: usize = 0x4000_4c00;
pub const UART5_BASE: usize = 0x4000_5000;
pub const I2C1_BASE: usize = 0x4000_5400;
pub const I2C2_BASE: usize = 0x4000_5800;
pub const USB_BASE: usize = 0x4000_5c00;
pub const USB_PMAADDR: usize = 0x4000_6000;
pub const CAN_BASE: usize = 0x4000_6400;
pub const PWR_BASE: usize = 0x4000_7000;
pub const DAC1_BASE: usize = 0x4000_7400;

// APB2
pub const SYSCFG_BASE: usize = 0x4001_0000;
pub const COMP_BASE: usize = 0x4001_001c;
pub const OPAMP_BASE: usize = 0x4001_0038;
pub const EXTI_BASE: usize = 0x4001_0400;
pub const TIM1_BASE: usize = 0x4001_2c00;
pub const SPI1_BASE: usize = 0x4001_3000;
pub const TIM8_BASE: usize = 0x4001_3400;
pub const USART1_BASE: usize = 0x4001_3800;
pub const TIM15_BASE: usize = 0x4001_4000;
pub const TIM16_BASE: usize = 0x4001_4400;
pub const TIM17_BASE: usize = 0x4001_4800;

// AHB1
pub const DMA1_BASE: usize = 0x4002_0000;
pub const DMA2_BASE: usize = 0x4002_0400;
pub const RCC_BASE: usize = 0x4002_1000;
pub const FLASH_R_BASE: usize = 0x4002_2000;
pub const CRC_BASE: usize = 0x4002_3000;
pub const TSC_BASE: usize = 0x4002_4000;

// AHB2
pub const GPIOA_BASE: usize = 0x4800_0000;
pub const GPIOB_BASE: usize = 0x4800_0400;
pub const GPIOC_BASE: usize = 0x4800_0800;
pub const GPIOD_BASE: usize = 0x4800_0c00;
pub const GPIOE_BASE: usize = 0x4800_1000;
pub const GPIOF_BASE: usize = 0x4800_1400;

// AHB3
pub const ADC1_BASE: usize = 0x5000_0000;
pub const ADC2_BASE: usize = 0x5000_0100;
pub const ADC1_2_COMMON_BASE: usize = 0x5000_0300;
pub const ADC3_BASE: usize = 0x5000_0400;
pub const ADC4_BASE: usize = 0x5000_0500;
pub const ADC3_4_COMMON_BASE: usize = 0x5000_0700;

pub const DBGMCU_BASE: usize = 0xe004_2000;

pub const GPIOA: StaticRef<GpioRegisters> = unsafe { StaticRef::new(GPIOA_BASE as *const _) };
pub const GPIOB: StaticRef<GpioRegisters> = unsafe { StaticRef::new(GPIOB_BASE as *const _) };
pub const GPIOC: StaticRef<GpioRegisters> = unsafe { StaticRef::new(GPIOC_BASE as *const _) };
pub const GPIOD: StaticRef<GpioRegisters> = unsafe { StaticRef::new(GPIOD_BASE as *const _) };
pub const GPIOE: StaticRef<GpioRegisters> = unsafe { StaticRef::new(GPIOE_BASE as *const _) };
pub const GPIOF: StaticRef<GpioRegisters> = unsafe { StaticRef::new(GPIOF_BASE as *const _) };

pub const USART1: StaticRef<UsartRegisters> = unsafe { StaticRef::new(USART1_BASE as *const _) };
pub const USART2: StaticRef<UsartRegisters> = unsafe { StaticRef::new(USART2_BASE as *const _) };
pub const USART3: StaticRef<UsartRegisters> = unsafe { StaticRef::new(USART3_BASE as *const _) };
pub const UART4: StaticRef<UsartRegisters> = unsafe { StaticRef::new(UART4_BASE as *const _) };
pub const UART5: StaticRef<UsartRegisters> = unsafe { StaticRef::new(UART5_BASE as *const _) };

pub const SPI1: StaticRef<SpiRegisters> = unsafe { StaticRef::new(SPI1_BASE as *const _) };
pub const SPI2: StaticRef<SpiRegisters> = unsafe { StaticRef::new(SPI2_BASE as *const _) };
pub const SPI3: StaticRef<SpiRegisters> = unsafe { StaticRef::new(SPI3_BASE as *const _) };

pub const I2C1: StaticRef<I2CRegisters> = unsafe { StaticRef::new(I2C1_BASE as *const _) };
pub const I2C2: StaticRef<I2CRegisters> = unsafe { StaticRef::new(I2C2_BASE as *const _) };

pub const TIM2: StaticRef<TimRegisters> = unsafe { StaticRef::new(TIM2_BASE as *const _) };
pub const TIM3: StaticRef<TimRegisters> = unsafe { StaticRef::new(TIM3_BASE as *const _) };
pub const TIM4: StaticRef<TimRegisters> = unsafe { StaticRef::new(TIM4_BASE as *const _) };

pub const DMA1: StaticRef<DmaRegisters> = unsafe { StaticRef::new(DMA1_BASE as *const _) };
pub const DMA2: StaticRef<DmaRegisters> = unsafe { StaticRef::new(DMA2_BASE as *const _) };

pub const EXTI: StaticRef<ExtiRegisters> = unsafe { StaticRef::new(EXTI_BASE as *const _) };
pub const IWDG: StaticRef<IwdgRegisters> = unsafe { StaticRef::new(IWDG_BASE as *const _) };

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bus_bases() {
        assert_eq!(SYSCFG_BASE, 0x4001_0000);
        assert_eq!(RCC_BASE, 0x4002_1000);
        assert_eq!(FLASH_R_BASE, 0x4002_2000);
        assert_eq!(GPIOF_BASE - GPIOA_BASE, 5 * 0x400);
        assert_eq!(ADC3_4_COMMON_BASE, 0x5000_0700);
    }

    #[test]
    fn typed_references() {
        assert_eq!(GPIOC.address(), 0x4800_0800);
        assert_eq!(USART1.address(), 0x4001_3800);
        assert_eq!(DMA2.address(), 0x4002_0400);
        assert_eq!(IWDG.address(), 0x4000_3000);
    }
}
