// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Multi-speed internal oscillator ranges.

use crate::rcc::CR;
use tock_registers::fields::FieldValue;

/// MSI frequency in MHz out of reset
pub const MSI_FREQUENCY_MHZ: usize = 4;

/// Default MSI trimming value
pub const MSI_CALIBRATION_DEFAULT: u8 = 0;

/// MSI frequency selected by `RCC_CR.MSIRANGE` or `RCC_CSR.MSISRANGE`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum MsiRange {
    Range100k = 0,
    Range200k = 1,
    Range400k = 2,
    Range800k = 3,
    Range1M = 4,
    Range2M = 5,
    #[default]
    Range4M = 6,
    Range8M = 7,
    Range16M = 8,
    Range24M = 9,
    Range32M = 10,
    Range48M = 11,
}

const MSI_RANGE_HZ: [u32; 12] = [
    100_000, 200_000, 400_000, 800_000, 1_000_000, 2_000_000, 4_000_000, 8_000_000, 16_000_000,
    24_000_000, 32_000_000, 48_000_000,
];

impl MsiRange {
    /// Decode a raw range value. Values above 11 are not allowed.
    pub fn from_bits(bits: u32) -> Option<Self> {
        Some(match bits {
            0 => Self::Range100k,
            1 => Self::Range200k,
            2 => Self::Range400k,
            3 => Self::Range800k,
            4 => Self::Range1M,
            5 => Self::Range2M,
            6 => Self::Range4M,
            7 => Self::Range8M,
            8 => Self::Range16M,
            9 => Self::Range24M,
            10 => Self::Range32M,
            11 => Self::Range48M,
            _ => return None,
        })
    }

    /// Frequency in Hz
    pub const fn frequency(self) -> u32 {
        MSI_RANGE_HZ[self as usize]
    }

    /// Select this range from `RCC_CR` (instead of the standby range in
    /// `RCC_CSR`).
    pub fn cr_value(self) -> FieldValue<u32, CR::Register> {
        CR::MSIRGSEL::SET + CR::MSIRANGE.val(self as u32)
    }
}

/// On-target check of the MSI state after reset.
///
/// ```rust,ignore
/// stm32l4xx::clocks::msi::tests::run(&rcc);
/// ```
///
/// **NOTE:** All these tests assume default boot configuration.
pub mod tests {
    use super::{MsiRange, MSI_FREQUENCY_MHZ};
    use crate::rcc::Rcc;
    use chip_common::debug;

    /// Run the entire test suite.
    pub fn run(rcc: &Rcc) {
        debug!("");
        debug!("===============================================");
        debug!("Testing MSI...");

        // By default, the MSI clock is enabled
        assert!(rcc.is_msi_ready());

        // MSI frequency is 4MHz
        let range = MsiRange::from_bits(rcc.msi_range());
        assert_eq!(range, Some(MsiRange::Range4M));
        assert_eq!(
            range.map(|r| r.frequency() as usize / 1_000_000),
            Some(MSI_FREQUENCY_MHZ)
        );

        debug!("Finished testing MSI. Everything is alright!");
        debug!("===============================================");
        debug!("");
    }
}

#[cfg(test)]
mod range_tests {
    use super::*;
    use tock_registers::interfaces::{Readable, Writeable};
    use tock_registers::registers::InMemoryRegister;

    #[test]
    fn ranges() {
        assert_eq!(MsiRange::default().frequency(), 4_000_000);
        assert_eq!(MsiRange::Range100k.frequency(), 100_000);
        assert_eq!(MsiRange::Range48M.frequency(), 48_000_000);
        assert_eq!(MsiRange::from_bits(9), Some(MsiRange::Range24M));
        assert_eq!(MsiRange::from_bits(12), None);
        let cr = InMemoryRegister::<u32, CR::Register>::new(0);
        cr.write(MsiRange::Range8M.cr_value());
        assert_eq!(cr.get(), (7 << 4) | (1 << 3));
    }
}
