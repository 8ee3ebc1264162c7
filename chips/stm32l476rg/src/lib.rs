// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Peripheral definitions for the STM32L476RG MCU.
//!
//! STM32L476RG: <https://www.st.com/en/microcontrollers-microprocessors/stm32l476rg.html>

#![no_std]

pub mod chip_specs;
pub mod memory_map;
pub mod nvic;

pub use stm32l4xx::{
    chip_specific, clocks, dma, exti, flash, gpio, i2c, iwdg, prescaler, pwr, rcc, spi, syscfg,
    tim, usart,
};

use cortexm4::{generic_isr, unhandled_interrupt};

#[cfg(all(target_arch = "arm", target_os = "none"))]
extern "C" {
    // _estack is not really a function, but it makes the types work
    // You should never actually invoke it!!
    fn _estack();
}

#[cfg(all(target_arch = "arm", target_os = "none"))]
#[link_section = ".vectors"]
// used Ensures that the symbol is kept until the final binary
#[used]
pub static BASE_VECTORS: [unsafe extern "C" fn(); 16] = [
    _estack,
    cortexm4::initialize_ram_jump_to_main,
    unhandled_interrupt,          // NMI
    cortexm4::hard_fault_handler, // Hard Fault
    unhandled_interrupt,          // MemManage
    unhandled_interrupt,          // BusFault
    unhandled_interrupt,          // UsageFault
    unhandled_interrupt,
    unhandled_interrupt,
    unhandled_interrupt,
    unhandled_interrupt,
    unhandled_interrupt, // SVC
    unhandled_interrupt, // DebugMon
    unhandled_interrupt,
    unhandled_interrupt, // PendSV
    unhandled_interrupt, // SysTick
];

// STM32L476RG has 82 interrupt slots; slot 79 is reserved (the CRS
// interrupt of other L4 lines).
#[cfg_attr(all(target_arch = "arm", target_os = "none"), link_section = ".irqs")]
// used Ensures that the symbol is kept until the final binary
#[cfg_attr(all(target_arch = "arm", target_os = "none"), used)]
pub static IRQS: [unsafe extern "C" fn(); 82] = [
    generic_isr,         // WWDG (0)
    generic_isr,         // PVD_PVM (1)
    generic_isr,         // TAMP_STAMP (2)
    generic_isr,         // RTC_WKUP (3)
    generic_isr,         // FLASH (4)
    generic_isr,         // RCC (5)
    generic_isr,         // EXTI0 (6)
    generic_isr,         // EXTI1 (7)
    generic_isr,         // EXTI2 (8)
    generic_isr,         // EXTI3 (9)
    generic_isr,         // EXTI4 (10)
    generic_isr,         // DMA1_CH1 (11)
    generic_isr,         // DMA1_CH2 (12)
    generic_isr,         // DMA1_CH3 (13)
    generic_isr,         // DMA1_CH4 (14)
    generic_isr,         // DMA1_CH5 (15)
    generic_isr,         // DMA1_CH6 (16)
    generic_isr,         // DMA1_CH7 (17)
    generic_isr,         // ADC1_2 (18)
    generic_isr,         // CAN1_TX (19)
    generic_isr,         // CAN1_RX0 (20)
    generic_isr,         // CAN1_RX1 (21)
    generic_isr,         // CAN1_SCE (22)
    generic_isr,         // EXTI9_5 (23)
    generic_isr,         // TIM1_BRK_TIM15 (24)
    generic_isr,         // TIM1_UP_TIM16 (25)
    generic_isr,         // TIM1_TRG_COM_TIM17 (26)
    generic_isr,         // TIM1_CC (27)
    generic_isr,         // TIM2 (28)
    generic_isr,         // TIM3 (29)
    generic_isr,         // TIM4 (30)
    generic_isr,         // I2C1_EV (31)
    generic_isr,         // I2C1_ER (32)
    generic_isr,         // I2C2_EV (33)
    generic_isr,         // I2C2_ER (34)
    generic_isr,         // SPI1 (35)
    generic_isr,         // SPI2 (36)
    generic_isr,         // USART1 (37)
    generic_isr,         // USART2 (38)
    generic_isr,         // USART3 (39)
    generic_isr,         // EXTI15_10 (40)
    generic_isr,         // RTC_ALARM (41)
    generic_isr,         // DFSDM1_FLT3 (42)
    generic_isr,         // TIM8_BRK (43)
    generic_isr,         // TIM8_UP (44)
    generic_isr,         // TIM8_TRG_COM (45)
    generic_isr,         // TIM8_CC (46)
    generic_isr,         // ADC3 (47)
    generic_isr,         // FMC (48)
    generic_isr,         // SDMMC1 (49)
    generic_isr,         // TIM5 (50)
    generic_isr,         // SPI3 (51)
    generic_isr,         // UART4 (52)
    generic_isr,         // UART5 (53)
    generic_isr,         // TIM6_DAC (54)
    generic_isr,         // TIM7 (55)
    generic_isr,         // DMA2_CH1 (56)
    generic_isr,         // DMA2_CH2 (57)
    generic_isr,         // DMA2_CH3 (58)
    generic_isr,         // DMA2_CH4 (59)
    generic_isr,         // DMA2_CH5 (60)
    generic_isr,         // DFSDM1_FLT0 (61)
    generic_isr,         // DFSDM1_FLT1 (62)
    generic_isr,         // DFSDM1_FLT2 (63)
    generic_isr,         // COMP (64)
    generic_isr,         // LPTIM1 (65)
    generic_isr,         // LPTIM2 (66)
    generic_isr,         // OTG_FS (67)
    generic_isr,         // DMA2_CH6 (68)
    generic_isr,         // DMA2_CH7 (69)
    generic_isr,         // LPUART1 (70)
    generic_isr,         // QUADSPI (71)
    generic_isr,         // I2C3_EV (72)
    generic_isr,         // I2C3_ER (73)
    generic_isr,         // SAI1 (74)
    generic_isr,         // SAI2 (75)
    generic_isr,         // SWPMI1 (76)
    generic_isr,         // TSC (77)
    generic_isr,         // LCD (78)
    unhandled_interrupt, // (79)
    generic_isr,         // RNG (80)
    generic_isr,         // FPU (81)
];

/// Disable and clear every interrupt in the NVIC, then enable them all so
/// that peripherals only need to unmask their own sources.
///
/// # Safety
///
/// Must be called once, during board initialization, with interrupts
/// globally disabled.
pub unsafe fn init() {
    cortexm4::nvic::disable_all();
    cortexm4::nvic::clear_all_pending();
    cortexm4::nvic::enable_all();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_table_length() {
        assert_eq!(IRQS.len(), nvic::FPU as usize + 1);
        assert_eq!(cortexm4::NUM_EXCEPTION_VECTORS + IRQS.len(), 98);
    }

    #[test]
    fn only_slot_79_is_reserved() {
        for (irq, handler) in IRQS.iter().enumerate() {
            let expected = if irq == 79 {
                unhandled_interrupt as usize
            } else {
                generic_isr as usize
            };
            assert_eq!(*handler as usize, expected, "IRQ slot {}", irq);
        }
    }

    #[test]
    fn irq_numbers() {
        assert_eq!(nvic::PVD_PVM, 1);
        assert_eq!(nvic::EXTI9_5, 23);
        assert_eq!(nvic::USART2, 38);
        assert_eq!(nvic::DFSDM1_FLT3, 42);
        assert_eq!(nvic::TIM6_DAC, 54);
        assert_eq!(nvic::DMA2_CH6, 68);
        assert_eq!(nvic::LCD, 78);
        assert_eq!(nvic::RNG, 80);
    }
}
