// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Named constants for NVIC ids

pub const WWDG: u32 = 0;
pub const PVD: u32 = 1;
pub const TAMP_STAMP: u32 = 2;
pub const RTC_WKUP: u32 = 3;
pub const FLASH: u32 = 4;
pub const RCC: u32 = 5;
pub const EXTI0: u32 = 6;
pub const EXTI1: u32 = 7;
pub const EXTI2_TSC: u32 = 8;
pub const EXTI3: u32 = 9;
pub const EXTI4: u32 = 10;
pub const DMA1_CH1: u32 = 11;
pub const DMA1_CH2: u32 = 12;
pub const DMA1_CH3: u32 = 13;
pub const DMA1_CH4: u32 = 14;
pub const DMA1_CH5: u32 = 15;
pub const DMA1_CH6: u32 = 16;
pub const DMA1_CH7: u32 = 17;
pub const ADC1_2: u32 = 18;
pub const USB_HP_CAN_TX: u32 = 19;
pub const USB_LP_CAN_RX0: u32 = 20;
pub const CAN_RX1: u32 = 21;
pub const CAN_SCE: u32 = 22;
pub const EXTI9_5: u32 = 23;
pub const TIM1_BRK_TIM15: u32 = 24;
pub const TIM1_UP_TIM16: u32 = 25;
pub const TIM1_TRG_COM_TIM17: u32 = 26;
pub const TIM1_CC: u32 = 27;
pub const TIM2: u32 = 28;
pub const TIM3: u32 = 29;
pub const TIM4: u32 = 30;
pub const I2C1_EV: u32 = 31;
pub const I2C1_ER: u32 = 32;
pub const I2C2_EV: u32 = 33;
pub const I2C2_ER: u32 = 34;
pub const SPI1: u32 = 35;
pub const SPI2: u32 = 36;
pub const USART1: u32 = 37;
pub const USART2: u32 = 38;
pub const USART3: u32 = 39;
pub const EXTI15_10: u32 = 40;
pub const RTC_ALARM: u32 = 41;
pub const USB_WKUP: u32 = 42;
pub const TIM8_BRK: u32 = 43;
pub const TIM8_UP: u32 = 44;
pub const TIM8_TRG_COM: u32 = 45;
pub const TIM8_CC: u32 = 46;
pub const ADC3: u32 = 47;

pub const SPI3: u32 = 51;
pub const UART4: u32 = 52;
pub const UART5: u32 = 53;
pub const TIM6_DAC: u32 = 54;
pub const TIM7: u32 = 55;
pub const DMA2_CH1: u32 = 56;
pub const DMA2_CH2: u32 = 57;
pub const DMA2_CH3: u32 = 58;
pub const DMA2_CH4: u32 = 59;
pub const DMA2_CH5: u32 = 60;
pub const ADC4: u32 = 61;

pub const COMP1_2_3: u32 = 64;
pub const COMP4_5_6: u32 = 65;
pub const COMP7: u32 = 66;

// USB interrupts remapped with SYSCFG_CFGR1.USB_IT_RMP
pub const USB_HP: u32 = 74;
pub const USB_LP: u32 = 75;
pub const USB_WKUP_RMP: u32 = 76;

pub const FPU: u32 = 81;
