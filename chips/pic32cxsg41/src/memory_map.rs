// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Memory regions and peripheral base addresses of the PIC32CX1025SG41128.

use chip_common::memory_map::{MemoryRegion, Peripheral, PeripheralMap};

pub const FLASH_MEMORY_BASE: usize = 0x0000_0000;
pub const QSPI_MEMORY_BASE: usize = 0x0400_0000;
pub const SRAM_BASE: usize = 0x2000_0000;
pub const SEEPROM_BASE: usize = 0x4400_0000;
pub const BKUPRAM_BASE: usize = 0x4700_0000;
/// User page of the NVM (calibration and fuse words)
pub const USER_PAGE_BASE: usize = 0x0080_4000;
/// Factory calibration area of the software calibration row
pub const SW0_FUSES_BASE: usize = 0x0080_0080;

// Bridge A
pub const PAC_BASE: usize = 0x4000_0000;
pub const PM_BASE: usize = 0x4000_0400;
pub const MCLK_BASE: usize = 0x4000_0800;
pub const RSTC_BASE: usize = 0x4000_0c00;
pub const OSCCTRL_BASE: usize = 0x4000_1000;
pub const OSC32KCTRL_BASE: usize = 0x4000_1400;
pub const SUPC_BASE: usize = 0x4000_1800;
pub const GCLK_BASE: usize = 0x4000_1c00;
pub const WDT_BASE: usize = 0x4000_2000;
pub const RTC_BASE: usize = 0x4000_2400;
pub const EIC_BASE: usize = 0x4000_2800;
pub const FREQM_BASE: usize = 0x4000_2c00;
pub const SERCOM0_BASE: usize = 0x4000_3000;
pub const SERCOM1_BASE: usize = 0x4000_3400;
pub const TC0_BASE: usize = 0x4000_3800;
pub const TC1_BASE: usize = 0x4000_3c00;

// Bridge B
pub const USB_BASE: usize = 0x4100_0000;
pub const DSU_BASE: usize = 0x4100_2000;
pub const NVMCTRL_BASE: usize = 0x4100_4000;
pub const CMCC_BASE: usize = 0x4100_6000;
pub const PORT_BASE: usize = 0x4100_8000;
pub const DMAC_BASE: usize = 0x4100_a000;
pub const HMATRIX_BASE: usize = 0x4100_c000;
pub const EVSYS_BASE: usize = 0x4100_e000;
pub const SERCOM2_BASE: usize = 0x4101_2000;
pub const SERCOM3_BASE: usize = 0x4101_4000;
pub const TCC0_BASE: usize = 0x4101_6000;
pub const TCC1_BASE: usize = 0x4101_8000;
pub const TC2_BASE: usize = 0x4101_a000;
pub const TC3_BASE: usize = 0x4101_c000;
pub const RAMECC_BASE: usize = 0x4102_0000;

// Bridge C
pub const TCC2_BASE: usize = 0x4200_0c00;
pub const TCC3_BASE: usize = 0x4200_1000;
pub const TC4_BASE: usize = 0x4200_1400;
pub const TC5_BASE: usize = 0x4200_1800;
pub const PDEC_BASE: usize = 0x4200_1c00;
pub const AC_BASE: usize = 0x4200_2000;
pub const AES_BASE: usize = 0x4200_2400;
pub const TRNG_BASE: usize = 0x4200_2800;
pub const ICM_BASE: usize = 0x4200_2c00;
pub const PUKCC_BASE: usize = 0x4200_3000;
pub const QSPI_BASE: usize = 0x4200_3400;
pub const CCL_BASE: usize = 0x4200_3800;

// Bridge D
pub const SERCOM4_BASE: usize = 0x4300_0000;
pub const SERCOM5_BASE: usize = 0x4300_0400;
pub const SERCOM6_BASE: usize = 0x4300_0800;
pub const SERCOM7_BASE: usize = 0x4300_0c00;
pub const TCC4_BASE: usize = 0x4300_1000;
pub const TC6_BASE: usize = 0x4300_1400;
pub const TC7_BASE: usize = 0x4300_1800;
pub const ADC0_BASE: usize = 0x4300_1c00;
pub const ADC1_BASE: usize = 0x4300_2000;
pub const DAC_BASE: usize = 0x4300_2400;
pub const I2S_BASE: usize = 0x4300_2800;
pub const PCC_BASE: usize = 0x4300_2c00;

pub const SDHC0_BASE: usize = 0x4500_0000;
pub const SDHC1_BASE: usize = 0x4600_0000;

/// 1 MiB flash, two banks of 512 KiB
pub const FLASH: MemoryRegion = MemoryRegion::new(FLASH_MEMORY_BASE, 1024 * 1024);
/// 256 KiB SRAM
pub const SRAM: MemoryRegion = MemoryRegion::new(SRAM_BASE, 256 * 1024);
/// 8 KiB backup SRAM, retained in backup mode
pub const BKUPRAM: MemoryRegion = MemoryRegion::new(BKUPRAM_BASE, 8 * 1024);

static TABLE: [Peripheral; 58] = [
    Peripheral::new("PAC", PAC_BASE),
    Peripheral::new("PM", PM_BASE),
    Peripheral::new("MCLK", MCLK_BASE),
    Peripheral::new("RSTC", RSTC_BASE),
    Peripheral::new("OSCCTRL", OSCCTRL_BASE),
    Peripheral::new("OSC32KCTRL", OSC32KCTRL_BASE),
    Peripheral::new("SUPC", SUPC_BASE),
    Peripheral::new("GCLK", GCLK_BASE),
    Peripheral::new("WDT", WDT_BASE),
    Peripheral::new("RTC", RTC_BASE),
    Peripheral::new("EIC", EIC_BASE),
    Peripheral::new("FREQM", FREQM_BASE),
    Peripheral::new("SERCOM0", SERCOM0_BASE),
    Peripheral::new("SERCOM1", SERCOM1_BASE),
    Peripheral::new("TC0", TC0_BASE),
    Peripheral::new("TC1", TC1_BASE),
    Peripheral::new("USB", USB_BASE),
    Peripheral::new("DSU", DSU_BASE),
    Peripheral::new("NVMCTRL", NVMCTRL_BASE),
    Peripheral::new("CMCC", CMCC_BASE),
    Peripheral::new("PORT", PORT_BASE),
    Peripheral::new("DMAC", DMAC_BASE),
    Peripheral::new("HMATRIX", HMATRIX_BASE),
    Peripheral::new("EVSYS", EVSYS_BASE),
    Peripheral::new("SERCOM2", SERCOM2_BASE),
    Peripheral::new("SERCOM3", SERCOM3_BASE),
    Peripheral::new("TCC0", TCC0_BASE),
    Peripheral::new("TCC1", TCC1_BASE),
    Peripheral::new("TC2", TC2_BASE),
    Peripheral::new("TC3", TC3_BASE),
    Peripheral::new("RAMECC", RAMECC_BASE),
    Peripheral::new("TCC2", TCC2_BASE),
    Peripheral::new("TCC3", TCC3_BASE),
    Peripheral::new("TC4", TC4_BASE),
    Peripheral::new("TC5", TC5_BASE),
    Peripheral::new("PDEC", PDEC_BASE),
    Peripheral::new("AC", AC_BASE),
    Peripheral::new("AES", AES_BASE),
    Peripheral::new("TRNG", TRNG_BASE),
    Peripheral::new("ICM", ICM_BASE),
    Peripheral::new("PUKCC", PUKCC_BASE),
    Peripheral::new("QSPI", QSPI_BASE),
    Peripheral::new("CCL", CCL_BASE),
    Peripheral::new("SERCOM4", SERCOM4_BASE),
    Peripheral::new("SERCOM5", SERCOM5_BASE),
    Peripheral::new("SERCOM6", SERCOM6_BASE),
    Peripheral::new("SERCOM7", SERCOM7_BASE),
    Peripheral::new("TCC4", TCC4_BASE),
    Peripheral::new("TC6", TC6_BASE),
    Peripheral::new("TC7", TC7_BASE),
    Peripheral::new("ADC0", ADC0_BASE),
    Peripheral::new("ADC1", ADC1_BASE),
    Peripheral::new("DAC", DAC_BASE),
    Peripheral::new("I2S", I2S_BASE),
    Peripheral::new("PCC", PCC_BASE),
    Peripheral::new("SEEPROM", SEEPROM_BASE),
    Peripheral::new("SDHC0", SDHC0_BASE),
    Peripheral::new("SDHC1", SDHC1_BASE),
];

pub static PERIPHERALS: PeripheralMap = PeripheralMap::new(&TABLE);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_ordered() {
        assert!(PERIPHERALS.is_sorted_and_unique());
        assert_eq!(PERIPHERALS.len(), TABLE.len());
    }

    #[test]
    fn lookups() {
        assert_eq!(PERIPHERALS.get("GCLK"), Some(0x4000_1c00));
        assert_eq!(PERIPHERALS.get("PORT"), Some(0x4100_8000));
        assert_eq!(PERIPHERALS.get("SERCOM5"), Some(0x4300_0400));
        assert_eq!(PERIPHERALS.name_of(0x4100_4000), Some("NVMCTRL"));
        assert_eq!(PERIPHERALS.get("GMAC"), None);
        assert_eq!(PERIPHERALS.get("CAN0"), None);
    }

    #[test]
    fn regions() {
        assert_eq!(FLASH.end(), 0x0010_0000);
        assert_eq!(SRAM.end(), 0x2004_0000);
        assert!(BKUPRAM.contains(0x4700_1fff));
        assert!(!FLASH.contains(USER_PAGE_BASE));
    }
}
