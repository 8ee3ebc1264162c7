// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! STM32F3xx flash interface
//!
//! Only the parts needed while configuring the clock tree are driven here:
//! the access control register (wait states, prefetch) and the lock / key
//! sequence. Programming and erase are left to a board-level driver.
//!
//! ```rust,ignore
//! let flash = Flash::<Stm32f303Specs>::new();
//! flash.set_latency(72_000_000)?;
//! ```

use crate::chip_specific::flash::{FlashChipSpecific, RegisterToFlashLatency};
use crate::memory_map::FLASH_R_BASE;
use chip_common::{ErrorCode, StaticRef};
use core::marker::PhantomData;
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite, WriteOnly};
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    pub FlashRegisters {
        /// Flash access control register
        (0x00 => acr: ReadWrite<u32, ACR::Register>),
        /// Flash key register
        (0x04 => keyr: WriteOnly<u32>),
        /// Flash option key register
        (0x08 => optkeyr: WriteOnly<u32>),
        /// Flash status register
        (0x0c => sr: ReadWrite<u32, SR::Register>),
        /// Flash control register
        (0x10 => cr: ReadWrite<u32, CR::Register>),
        /// Flash address register
        (0x14 => ar: WriteOnly<u32>),
        (0x18 => _reserved0),
        /// Option byte register
        (0x1c => obr: ReadOnly<u32, OBR::Register>),
        /// Write protection register
        (0x20 => wrpr: ReadOnly<u32>),
        (0x24 => @END),
    }
}

register_bitfields! [u32,
    pub ACR [
        /// Prefetch buffer status
        PRFTBS OFFSET(5) NUMBITS(1) [],
        /// Prefetch buffer enable
        PRFTBE OFFSET(4) NUMBITS(1) [],
        /// Flash half cycle access enable
        HLFCYA OFFSET(3) NUMBITS(1) [],
        /// Ratio of the HCLK period to the Flash access time
        LATENCY OFFSET(0) NUMBITS(3) [
            /// 0 < HCLK <= 24MHz
            WS0 = 0,
            /// 24MHz < HCLK <= 48MHz
            WS1 = 1,
            /// 48MHz < HCLK <= 72MHz
            WS2 = 2
        ]
    ],
    pub SR [
        /// End of operation
        EOP OFFSET(5) NUMBITS(1) [],
        /// Write protection error
        WRPRTERR OFFSET(4) NUMBITS(1) [],
        /// Programming error
        PGERR OFFSET(2) NUMBITS(1) [],
        /// Busy
        BSY OFFSET(0) NUMBITS(1) []
    ],
    pub CR [
        /// Force option byte loading
        OBL_LAUNCH OFFSET(13) NUMBITS(1) [],
        /// End of operation interrupt enable
        EOPIE OFFSET(12) NUMBITS(1) [],
        /// Error interrupt enable
        ERRIE OFFSET(10) NUMBITS(1) [],
        /// Option bytes write enable
        OPTWRE OFFSET(9) NUMBITS(1) [],
        /// Lock
        LOCK OFFSET(7) NUMBITS(1) [],
        /// Start erase
        STRT OFFSET(6) NUMBITS(1) [],
        /// Option byte erase
        OPTER OFFSET(5) NUMBITS(1) [],
        /// Option byte programming
        OPTPG OFFSET(4) NUMBITS(1) [],
        /// Mass erase
        MER OFFSET(2) NUMBITS(1) [],
        /// Page erase
        PER OFFSET(1) NUMBITS(1) [],
        /// Programming
        PG OFFSET(0) NUMBITS(1) []
    ],
    pub OBR [
        DATA1 OFFSET(24) NUMBITS(8) [],
        DATA0 OFFSET(16) NUMBITS(8) [],
        /// SRAM parity check, active low
        SRAM_PE OFFSET(14) NUMBITS(1) [],
        /// VDDA power supply supervisor
        VDDA_MONITOR OFFSET(13) NUMBITS(1) [],
        /// Boot mode selection together with BOOT0
        NBOOT1 OFFSET(12) NUMBITS(1) [],
        /// No reset generated when entering Standby mode
        NRST_STDBY OFFSET(10) NUMBITS(1) [],
        /// No reset generated when entering Stop mode
        NRST_STOP OFFSET(9) NUMBITS(1) [],
        /// Software watchdog
        WDG_SW OFFSET(8) NUMBITS(1) [],
        /// Read protection level status
        RDPRT OFFSET(1) NUMBITS(2) [
            Level0 = 0b00,
            Level1 = 0b01,
            Level2 = 0b11
        ],
        /// Option byte load error
        OPTERR OFFSET(0) NUMBITS(1) []
    ]
];

/// Key sequence unlocking `FLASH_CR`.
pub const FLASH_KEY1: u32 = 0x4567_0123;
pub const FLASH_KEY2: u32 = 0xCDEF_89AB;
/// Key sequence setting `OPTWRE`.
pub const FLASH_OPTKEY1: u32 = 0x0819_2A3B;
pub const FLASH_OPTKEY2: u32 = 0x4C5D_6E7F;

pub const PAGE_SIZE: usize = 2048;

const FLASH: StaticRef<FlashRegisters> =
    unsafe { StaticRef::new(FLASH_R_BASE as *const FlashRegisters) };

pub struct Flash<S> {
    registers: StaticRef<FlashRegisters>,
    _marker: PhantomData<S>,
}

impl<S: FlashChipSpecific> Flash<S> {
    pub const fn new() -> Self {
        Self {
            registers: FLASH,
            _marker: PhantomData,
        }
    }

    #[cfg(test)]
    fn with_registers(registers: StaticRef<FlashRegisters>) -> Self {
        Self {
            registers,
            _marker: PhantomData,
        }
    }

    pub fn get_latency(&self) -> S::FlashLatency {
        S::FlashLatency::convert_register_to_enum(self.registers.acr.read(ACR::LATENCY))
    }

    /// Program the wait states needed for an HCLK of `hclk_hz` and enable
    /// the prefetch buffer. Must run before raising HCLK and after lowering it.
    pub fn set_latency(&self, hclk_hz: u32) -> Result<(), ErrorCode> {
        if hclk_hz > 72_000_000 {
            return Err(ErrorCode::SIZE);
        }
        let latency = S::get_number_wait_cycles_based_on_frequency(hclk_hz);
        self.registers
            .acr
            .modify(ACR::LATENCY.val(latency.into()) + ACR::PRFTBE::SET);
        Ok(())
    }

    pub fn is_locked(&self) -> bool {
        self.registers.cr.is_set(CR::LOCK)
    }

    pub fn unlock(&self) {
        if self.is_locked() {
            self.registers.keyr.set(FLASH_KEY1);
            self.registers.keyr.set(FLASH_KEY2);
        }
    }

    pub fn lock(&self) {
        self.registers.cr.modify(CR::LOCK::SET);
    }

    /// Write the option byte key sequence. `FLASH_CR` must already be
    /// unlocked.
    pub fn unlock_option_bytes(&self) {
        self.registers.optkeyr.set(FLASH_OPTKEY1);
        self.registers.optkeyr.set(FLASH_OPTKEY2);
    }

    pub fn is_busy(&self) -> bool {
        self.registers.sr.is_set(SR::BSY)
    }

    pub fn read_protection(&self) -> u32 {
        self.registers.obr.read(OBR::RDPRT)
    }

    pub fn write_protection(&self) -> u32 {
        self.registers.wrpr.get()
    }

    /// Start address of flash page `page`.
    pub fn page_address(page: usize) -> Result<usize, ErrorCode> {
        if (page + 1) * PAGE_SIZE > S::FLASH_SIZE {
            return Err(ErrorCode::INVAL);
        }
        Ok(crate::memory_map::FLASH_MEMORY_BASE + page * PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip_specific::flash::FlashLatency3;
    use core::mem::{offset_of, size_of};

    enum TestSpecs {}

    impl FlashChipSpecific for TestSpecs {
        type FlashLatency = FlashLatency3;

        const FLASH_SIZE: usize = 256 * 1024;

        fn get_number_wait_cycles_based_on_frequency(frequency_hz: u32) -> FlashLatency3 {
            match frequency_hz {
                0..=24_000_000 => FlashLatency3::Latency0,
                24_000_001..=48_000_000 => FlashLatency3::Latency1,
                _ => FlashLatency3::Latency2,
            }
        }
    }

    #[test]
    fn layout() {
        assert_eq!(offset_of!(FlashRegisters, sr), 0x0c);
        assert_eq!(offset_of!(FlashRegisters, ar), 0x14);
        assert_eq!(offset_of!(FlashRegisters, obr), 0x1c);
        assert_eq!(offset_of!(FlashRegisters, wrpr), 0x20);
        assert_eq!(size_of::<FlashRegisters>(), 0x24);
        assert_eq!(FLASH_R_BASE, 0x4002_2000);
    }

    #[test]
    fn bitfields() {
        assert_eq!(CR::LOCK.mask << CR::LOCK.shift, 0x80);
        assert_eq!(CR::OBL_LAUNCH.shift, 13);
        assert_eq!(SR::EOP.mask << SR::EOP.shift, 0x20);
        assert_eq!(OBR::RDPRT.mask << OBR::RDPRT.shift, 0x06);
        assert_eq!(OBR::SRAM_PE.shift, 14);
    }

    #[test]
    fn latency_follows_hclk() {
        let regs: FlashRegisters = unsafe { core::mem::zeroed() };
        let flash = Flash::<TestSpecs>::with_registers(unsafe { StaticRef::new(&regs) });

        flash.set_latency(72_000_000).unwrap();
        assert_eq!(flash.get_latency(), FlashLatency3::Latency2);
        assert!(regs.acr.is_set(ACR::PRFTBE));

        flash.set_latency(24_000_000).unwrap();
        assert_eq!(flash.get_latency(), FlashLatency3::Latency0);

        flash.set_latency(24_000_001).unwrap();
        assert_eq!(flash.get_latency(), FlashLatency3::Latency1);

        assert_eq!(flash.set_latency(72_000_001), Err(ErrorCode::SIZE));
    }

    #[test]
    fn unlock_writes_keys_only_when_locked() {
        let regs: FlashRegisters = unsafe { core::mem::zeroed() };
        let flash = Flash::<TestSpecs>::with_registers(unsafe { StaticRef::new(&regs) });
        let keyr =
            || unsafe { core::ptr::read_volatile(core::ptr::addr_of!(regs.keyr) as *const u32) };

        flash.unlock();
        assert_eq!(keyr(), 0);

        flash.lock();
        assert!(flash.is_locked());
        flash.unlock();
        assert_eq!(keyr(), FLASH_KEY2);
    }

    #[test]
    fn pages() {
        assert_eq!(Flash::<TestSpecs>::page_address(0), Ok(0x0800_0000));
        assert_eq!(Flash::<TestSpecs>::page_address(127), Ok(0x0803_F800));
        assert_eq!(Flash::<TestSpecs>::page_address(128), Err(ErrorCode::INVAL));
    }
}
