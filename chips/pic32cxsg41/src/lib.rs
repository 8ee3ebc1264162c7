// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Peripheral definitions for the PIC32CX1025SG41128 MCU.
//!
//! The SG41 line shares its peripheral map and register layouts with the
//! SAM E5x family, minus the CAN controllers and the Ethernet MAC.

#![no_std]

pub mod chip_specific;
pub mod chip_specs;
pub mod eic;
pub mod gclk;
pub mod mclk;
pub mod memory_map;
pub mod nvic;
pub mod nvmctrl;
pub mod oscctrl;
pub mod port;
pub mod sercom;

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

// Slots 42-44 are reserved on the whole family. Slots 78, 79 (CAN0, CAN1)
// and 84 (GMAC) belong to peripherals this part does not have.
#[cfg_attr(all(target_arch = "arm", target_os = "none"), link_section = ".irqs")]
// used Ensures that the symbol is kept until the final binary
#[cfg_attr(all(target_arch = "arm", target_os = "none"), used)]
pub static IRQS: [unsafe extern "C" fn(); 137] = [
    generic_isr,         // PM (0)
    generic_isr,         // MCLK (1)
    generic_isr,         // OSCCTRL_XOSC0 (2)
    generic_isr,         // OSCCTRL_XOSC1 (3)
    generic_isr,         // OSCCTRL_DFLL (4)
    generic_isr,         // OSCCTRL_DPLL0 (5)
    generic_isr,         // OSCCTRL_DPLL1 (6)
    generic_isr,         // OSC32KCTRL (7)
    generic_isr,         // SUPC_0 (8)
    generic_isr,         // SUPC_1 (9)
    generic_isr,         // WDT (10)
    generic_isr,         // RTC (11)
    generic_isr,         // EIC_0 (12)
    generic_isr,         // EIC_1 (13)
    generic_isr,         // EIC_2 (14)
    generic_isr,         // EIC_3 (15)
    generic_isr,         // EIC_4 (16)
    generic_isr,         // EIC_5 (17)
    generic_isr,         // EIC_6 (18)
    generic_isr,         // EIC_7 (19)
    generic_isr,         // EIC_8 (20)
    generic_isr,         // EIC_9 (21)
    generic_isr,         // EIC_10 (22)
    generic_isr,         // EIC_11 (23)
    generic_isr,         // EIC_12 (24)
    generic_isr,         // EIC_13 (25)
    generic_isr,         // EIC_14 (26)
    generic_isr,         // EIC_15 (27)
    generic_isr,         // FREQM (28)
    generic_isr,         // NVMCTRL_0 (29)
    generic_isr,         // NVMCTRL_1 (30)
    generic_isr,         // DMAC_0 (31)
    generic_isr,         // DMAC_1 (32)
    generic_isr,         // DMAC_2 (33)
    generic_isr,         // DMAC_3 (34)
    generic_isr,         // DMAC_4 (35)
    generic_isr,         // EVSYS_0 (36)
    generic_isr,         // EVSYS_1 (37)
    generic_isr,         // EVSYS_2 (38)
    generic_isr,         // EVSYS_3 (39)
    generic_isr,         // EVSYS_4 (40)
    generic_isr,         // PAC (41)
    unhandled_interrupt, // (42)
    unhandled_interrupt, // (43)
    unhandled_interrupt, // (44)
    generic_isr,         // RAMECC (45)
    generic_isr,         // SERCOM0_0 (46)
    generic_isr,         // SERCOM0_1 (47)
    generic_isr,         // SERCOM0_2 (48)
    generic_isr,         // SERCOM0_3 (49)
    generic_isr,         // SERCOM1_0 (50)
    generic_isr,         // SERCOM1_1 (51)
    generic_isr,         // SERCOM1_2 (52)
    generic_isr,         // SERCOM1_3 (53)
    generic_isr,         // SERCOM2_0 (54)
    generic_isr,         // SERCOM2_1 (55)
    generic_isr,         // SERCOM2_2 (56)
    generic_isr,         // SERCOM2_3 (57)
    generic_isr,         // SERCOM3_0 (58)
    generic_isr,         // SERCOM3_1 (59)
    generic_isr,         // SERCOM3_2 (60)
    generic_isr,         // SERCOM3_3 (61)
    generic_isr,         // SERCOM4_0 (62)
    generic_isr,         // SERCOM4_1 (63)
    generic_isr,         // SERCOM4_2 (64)
    generic_isr,         // SERCOM4_3 (65)
    generic_isr,         // SERCOM5_0 (66)
    generic_isr,         // SERCOM5_1 (67)
    generic_isr,         // SERCOM5_2 (68)
    generic_isr,         // SERCOM5_3 (69)
    generic_isr,         // SERCOM6_0 (70)
    generic_isr,         // SERCOM6_1 (71)
    generic_isr,         // SERCOM6_2 (72)
    generic_isr,         // SERCOM6_3 (73)
    generic_isr,         // SERCOM7_0 (74)
    generic_isr,         // SERCOM7_1 (75)
    generic_isr,         // SERCOM7_2 (76)
    generic_isr,         // SERCOM7_3 (77)
    unhandled_interrupt, // (78)
    unhandled_interrupt, // (79)
    generic_isr,         // USB_0 (80)
    generic_isr,         // USB_1 (81)
    generic_isr,         // USB_2 (82)
    generic_isr,         // USB_3 (83)
    unhandled_interrupt, // (84)
    generic_isr,         // TCC0_0 (85)
    generic_isr,         // TCC0_1 (86)
    generic_isr,         // TCC0_2 (87)
    generic_isr,         // TCC0_3 (88)
    generic_isr,         // TCC0_4 (89)
    generic_isr,         // TCC0_5 (90)
    generic_isr,         // TCC0_6 (91)
    generic_isr,         // TCC1_0 (92)
    generic_isr,         // TCC1_1 (93)
    generic_isr,         // TCC1_2 (94)
    generic_isr,         // TCC1_3 (95)
    generic_isr,         // TCC1_4 (96)
    generic_isr,         // TCC2_0 (97)
    generic_isr,         // TCC2_1 (98)
    generic_isr,         // TCC2_2 (99)
    generic_isr,         // TCC2_3 (100)
    generic_isr,         // TCC3_0 (101)
    generic_isr,         // TCC3_1 (102)
    generic_isr,         // TCC3_2 (103)
    generic_isr,         // TCC4_0 (104)
    generic_isr,         // TCC4_1 (105)
    generic_isr,         // TCC4_2 (106)
    generic_isr,         // TC0 (107)
    generic_isr,         // TC1 (108)
    generic_isr,         // TC2 (109)
    generic_isr,         // TC3 (110)
    generic_isr,         // TC4 (111)
    generic_isr,         // TC5 (112)
    generic_isr,         // TC6 (113)
    generic_isr,         // TC7 (114)
    generic_isr,         // PDEC_0 (115)
    generic_isr,         // PDEC_1 (116)
    generic_isr,         // PDEC_2 (117)
    generic_isr,         // ADC0_0 (118)
    generic_isr,         // ADC0_1 (119)
    generic_isr,         // ADC1_0 (120)
    generic_isr,         // ADC1_1 (121)
    generic_isr,         // AC (122)
    generic_isr,         // DAC_0 (123)
    generic_isr,         // DAC_1 (124)
    generic_isr,         // DAC_2 (125)
    generic_isr,         // DAC_3 (126)
    generic_isr,         // DAC_4 (127)
    generic_isr,         // I2S (128)
    generic_isr,         // PCC (129)
    generic_isr,         // AES (130)
    generic_isr,         // TRNG (131)
    generic_isr,         // ICM (132)
    generic_isr,         // PUKCC (133)
    generic_isr,         // QSPI (134)
    generic_isr,         // SDHC0 (135)
    generic_isr,         // SDHC1 (136)
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

    const RESERVED: [usize; 6] = [42, 43, 44, 78, 79, 84];

    #[test]
    fn vector_table_length() {
        assert_eq!(IRQS.len(), nvic::SDHC1 as usize + 1);
        assert_eq!(cortexm4::NUM_EXCEPTION_VECTORS + IRQS.len(), 153);
    }

    #[test]
    fn reserved_slots() {
        for (irq, handler) in IRQS.iter().enumerate() {
            let expected = if RESERVED.contains(&irq) {
                unhandled_interrupt as usize
            } else {
                generic_isr as usize
            };
            assert_eq!(*handler as usize, expected, "IRQ slot {}", irq);
        }
    }

    #[test]
    fn irq_numbers() {
        assert_eq!(nvic::OSCCTRL_DPLL0, 5);
        assert_eq!(nvic::EIC_0, 12);
        assert_eq!(nvic::EIC_15, 27);
        assert_eq!(nvic::RAMECC, 45);
        assert_eq!(nvic::SERCOM0_0, 46);
        assert_eq!(nvic::SERCOM7_3, 77);
        assert_eq!(nvic::USB_0, 80);
        assert_eq!(nvic::TCC0_0, 85);
        assert_eq!(nvic::TC0, 107);
        assert_eq!(nvic::ADC0_0, 118);
        assert_eq!(nvic::QSPI, 134);
    }
}
