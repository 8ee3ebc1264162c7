// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Named constants for NVIC ids
//!
//! Peripherals with several interrupt lines get one constant per line,
//! suffixed with the line index.

pub const PM: u32 = 0;
pub const MCLK: u32 = 1;
pub const OSCCTRL_XOSC0: u32 = 2;
pub const OSCCTRL_XOSC1: u32 = 3;
pub const OSCCTRL_DFLL: u32 = 4;
pub const OSCCTRL_DPLL0: u32 = 5;
pub const OSCCTRL_DPLL1: u32 = 6;
pub const OSC32KCTRL: u32 = 7;
pub const SUPC_0: u32 = 8;
pub const SUPC_1: u32 = 9;
pub const WDT: u32 = 10;
pub const RTC: u32 = 11;
pub const EIC_0: u32 = 12;
pub const EIC_1: u32 = 13;
pub const EIC_2: u32 = 14;
pub const EIC_3: u32 = 15;
pub const EIC_4: u32 = 16;
pub const EIC_5: u32 = 17;
pub const EIC_6: u32 = 18;
pub const EIC_7: u32 = 19;
pub const EIC_8: u32 = 20;
pub const EIC_9: u32 = 21;
pub const EIC_10: u32 = 22;
pub const EIC_11: u32 = 23;
pub const EIC_12: u32 = 24;
pub const EIC_13: u32 = 25;
pub const EIC_14: u32 = 26;
pub const EIC_15: u32 = 27;
pub const FREQM: u32 = 28;
pub const NVMCTRL_0: u32 = 29;
pub const NVMCTRL_1: u32 = 30;
pub const DMAC_0: u32 = 31;
pub const DMAC_1: u32 = 32;
pub const DMAC_2: u32 = 33;
pub const DMAC_3: u32 = 34;
pub const DMAC_4: u32 = 35;
pub const EVSYS_0: u32 = 36;
pub const EVSYS_1: u32 = 37;
pub const EVSYS_2: u32 = 38;
pub const EVSYS_3: u32 = 39;
pub const EVSYS_4: u32 = 40;
pub const PAC: u32 = 41;
pub const RAMECC: u32 = 45;
pub const SERCOM0_0: u32 = 46;
pub const SERCOM0_1: u32 = 47;
pub const SERCOM0_2: u32 = 48;
pub const SERCOM0_3: u32 = 49;
pub const SERCOM1_0: u32 = 50;
pub const SERCOM1_1: u32 = 51;
pub const SERCOM1_2: u32 = 52;
pub const SERCOM1_3: u32 = 53;
pub const SERCOM2_0: u32 = 54;
pub const SERCOM2_1: u32 = 55;
pub const SERCOM2_2: u32 = 56;
pub const SERCOM2_3: u32 = 57;
pub const SERCOM3_0: u32 = 58;
pub const SERCOM3_1: u32 = 59;
pub const SERCOM3_2: u32 = 60;
pub const SERCOM3_3: u32 = 61;
pub const SERCOM4_0: u32 = 62;
pub const SERCOM4_1: u32 = 63;
pub const SERCOM4_2: u32 = 64;
pub const SERCOM4_3: u32 = 65;
pub const SERCOM5_0: u32 = 66;
pub const SERCOM5_1: u32 = 67;
pub const SERCOM5_2: u32 = 68;
pub const SERCOM5_3: u32 = 69;
pub const SERCOM6_0: u32 = 70;
pub const SERCOM6_1: u32 = 71;
pub const SERCOM6_2: u32 = 72;
pub const SERCOM6_3: u32 = 73;
pub const SERCOM7_0: u32 = 74;
pub const SERCOM7_1: u32 = 75;
pub const SERCOM7_2: u32 = 76;
pub const SERCOM7_3: u32 = 77;
pub const USB_0: u32 = 80;
pub const USB_1: u32 = 81;
pub const USB_2: u32 = 82;
pub const USB_3: u32 = 83;
pub const TCC0_0: u32 = 85;
pub const TCC0_1: u32 = 86;
pub const TCC0_2: u32 = 87;
pub const TCC0_3: u32 = 88;
pub const TCC0_4: u32 = 89;
pub const TCC0_5: u32 = 90;
pub const TCC0_6: u32 = 91;
pub const TCC1_0: u32 = 92;
pub const TCC1_1: u32 = 93;
pub const TCC1_2: u32 = 94;
pub const TCC1_3: u32 = 95;
pub const TCC1_4: u32 = 96;
pub const TCC2_0: u32 = 97;
pub const TCC2_1: u32 = 98;
pub const TCC2_2: u32 = 99;
pub const TCC2_3: u32 = 100;
pub const TCC3_0: u32 = 101;
pub const TCC3_1: u32 = 102;
pub const TCC3_2: u32 = 103;
pub const TCC4_0: u32 = 104;
pub const TCC4_1: u32 = 105;
pub const TCC4_2: u32 = 106;
pub const TC0: u32 = 107;
pub const TC1: u32 = 108;
pub const TC2: u32 = 109;
pub const TC3: u32 = 110;
pub const TC4: u32 = 111;
pub const TC5: u32 = 112;
pub const TC6: u32 = 113;
pub const TC7: u32 = 114;
pub const PDEC_0: u32 = 115;
pub const PDEC_1: u32 = 116;
pub const PDEC_2: u32 = 117;
pub const ADC0_0: u32 = 118;
pub const ADC0_1: u32 = 119;
pub const ADC1_0: u32 = 120;
pub const ADC1_1: u32 = 121;
pub const AC: u32 = 122;
pub const DAC_0: u32 = 123;
pub const DAC_1: u32 = 124;
pub const DAC_2: u32 = 125;
pub const DAC_3: u32 = 126;
pub const DAC_4: u32 = 127;
pub const I2S: u32 = 128;
pub const PCC: u32 = 129;
pub const AES: u32 = 130;
pub const TRNG: u32 = 131;
pub const ICM: u32 = 132;
pub const PUKCC: u32 = 133;
pub const QSPI: u32 = 134;
pub const SDHC0: u32 = 135;
pub const SDHC1: u32 = 136;
