// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! STM32L4xx flash driver
//!
//! This driver provides basic functionalities for the entire STM32L4 series.
//!
//! # Features
//!
//! - [x] Configuring latency based on the system clock frequency
//! - [x] Instruction prefetch, instruction and data cache
//! - [x] Control register and option byte unlock sequences
//!
//! # Missing features
//!
//! - [ ] Programming and erase
//!
//! # Usage
//!
//! ```rust,ignore
//! let flash = Flash::<Stm32l476Specs>::new(Pwr::new());
//! let flash_latency = flash.get_latency() as usize;
//! debug!("Current flash latency is {}", flash_latency);
//! ```

use crate::chip_specific::flash::{FlashChipSpecific, RegisterToFlashLatency};
use crate::memory_map::{FLASH_MEMORY_BASE, FLASH_R_BASE};
use crate::pwr::Pwr;
use chip_common::{ErrorCode, StaticRef};
use core::marker::PhantomData;
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{ReadWrite, WriteOnly};
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    pub FlashRegisters {
        /// Flash access control register
        (0x00 => acr: ReadWrite<u32, ACR::Register>),
        /// Flash power-down key register
        (0x04 => pdkeyr: WriteOnly<u32>),
        /// Flash key register
        (0x08 => keyr: WriteOnly<u32>),
        /// Flash option key register
        (0x0c => optkeyr: WriteOnly<u32>),
        /// Status register
        (0x10 => sr: ReadWrite<u32, SR::Register>),
        /// Control register
        (0x14 => cr: ReadWrite<u32, CR::Register>),
        /// Flash ECC register
        (0x18 => eccr: ReadWrite<u32, ECCR::Register>),
        (0x1c => _reserved0),
        /// Flash option register
        (0x20 => optr: ReadWrite<u32, OPTR::Register>),
        /// Flash Bank 1 PCROP Start address register
        (0x24 => pcrop1sr: ReadWrite<u32>),
        /// Flash Bank 1 PCROP End address register
        (0x28 => pcrop1er: ReadWrite<u32>),
        /// Flash Bank 1 WRP area A address register
        (0x2c => wrp1ar: ReadWrite<u32, WRP::Register>),
        /// Flash Bank 1 WRP area B address register
        (0x30 => wrp1br: ReadWrite<u32, WRP::Register>),
        (0x34 => _reserved1),
        /// Flash Bank 2 PCROP Start address register
        (0x44 => pcrop2sr: ReadWrite<u32>),
        /// Flash Bank 2 PCROP End address register
        (0x48 => pcrop2er: ReadWrite<u32>),
        /// Flash Bank 2 WRP area A address register
        (0x4c => wrp2ar: ReadWrite<u32, WRP::Register>),
        /// Flash Bank 2 WRP area B address register
        (0x50 => wrp2br: ReadWrite<u32, WRP::Register>),
        (0x54 => @END),
    }
}

register_bitfields![u32,
    pub ACR [
        /// Latency (number of wait states). STM32L4x6: 3-bit field.
        LATENCY OFFSET(0) NUMBITS(3) [
            WS0 = 0,
            WS1 = 1,
            WS2 = 2,
            WS3 = 3,
            WS4 = 4
        ],
        /// Prefetch enable
        PRFTEN OFFSET(8) NUMBITS(1) [],
        /// Instruction cache enable
        ICEN OFFSET(9) NUMBITS(1) [],
        /// Data cache enable
        DCEN OFFSET(10) NUMBITS(1) [],
        /// Instruction cache reset
        ICRST OFFSET(11) NUMBITS(1) [],
        /// Data cache reset
        DCRST OFFSET(12) NUMBITS(1) [],
        /// Flash power-down mode during run
        RUN_PD OFFSET(13) NUMBITS(1) [],
        /// Flash power-down mode during sleep
        SLEEP_PD OFFSET(14) NUMBITS(1) []
    ],
    pub SR [
        /// End of operation
        EOP OFFSET(0) NUMBITS(1) [],
        /// Operation error
        OPERR OFFSET(1) NUMBITS(1) [],
        /// Programming error
        PROGERR OFFSET(3) NUMBITS(1) [],
        /// Write protection error
        WRPERR OFFSET(4) NUMBITS(1) [],
        /// Programming alignment error
        PGAERR OFFSET(5) NUMBITS(1) [],
        /// Size error
        SIZERR OFFSET(6) NUMBITS(1) [],
        /// Programming sequence error
        PGSERR OFFSET(7) NUMBITS(1) [],
        /// Fast programming data miss error
        MISERR OFFSET(8) NUMBITS(1) [],
        /// Fast programming error
        FASTERR OFFSET(9) NUMBITS(1) [],
        /// PCROP read error
        RDERR OFFSET(14) NUMBITS(1) [],
        /// Option validity error
        OPTVERR OFFSET(15) NUMBITS(1) [],
        /// Busy
        BSY OFFSET(16) NUMBITS(1) []
    ],
    pub CR [
        /// Programming
        PG OFFSET(0) NUMBITS(1) [],
        /// Page erase
        PER OFFSET(1) NUMBITS(1) [],
        /// Mass erase bank 1
        MER1 OFFSET(2) NUMBITS(1) [],
        /// Page number (for page erase)
        PNB OFFSET(3) NUMBITS(8) [],
        /// Bank selection for page erase (0: Bank1, 1: Bank2)
        BKER OFFSET(11) NUMBITS(1) [],
        /// Mass erase bank 2
        MER2 OFFSET(15) NUMBITS(1) [],
        /// Start erase operation
        START OFFSET(16) NUMBITS(1) [],
        /// Options modification start
        OPTSTRT OFFSET(17) NUMBITS(1) [],
        /// Fast programming
        FSTPG OFFSET(18) NUMBITS(1) [],
        /// End of operation interrupt enable
        EOPIE OFFSET(24) NUMBITS(1) [],
        /// Error interrupt enable
        ERRIE OFFSET(25) NUMBITS(1) [],
        /// PCROP read error interrupt enable
        RDERRIE OFFSET(26) NUMBITS(1) [],
        /// Force option byte loading
        OBL_LAUNCH OFFSET(27) NUMBITS(1) [],
        /// Option bytes lock
        OPTLOCK OFFSET(30) NUMBITS(1) [],
        /// FLASH control register lock
        LOCK OFFSET(31) NUMBITS(1) []
    ],
    pub ECCR [
        /// ECC detection
        ECCD OFFSET(31) NUMBITS(1) [],
        /// ECC correction
        ECCC OFFSET(30) NUMBITS(1) [],
        /// ECC correction interrupt enable
        ECCIE OFFSET(24) NUMBITS(1) [],
        /// System Flash ECC fail
        SYSF_ECC OFFSET(20) NUMBITS(1) [],
        /// ECC fail bank
        BK_ECC OFFSET(19) NUMBITS(1) [],
        /// ECC fail address
        ADDR_ECC OFFSET(0) NUMBITS(19) []
    ],
    pub OPTR [
        /// Read protection level
        RDP OFFSET(0) NUMBITS(8) [
            Level0 = 0xaa,
            Level2 = 0xcc
        ],
        /// BOR reset level
        BOR_LEV OFFSET(8) NUMBITS(3) [],
        /// Reset generated when entering Stop mode (active low)
        nRST_STOP OFFSET(12) NUMBITS(1) [],
        /// Reset generated when entering Standby mode (active low)
        nRST_STDBY OFFSET(13) NUMBITS(1) [],
        /// Reset generated when entering Shutdown mode (active low)
        nRST_SHDW OFFSET(14) NUMBITS(1) [],
        /// Independent watchdog selection
        IWDG_SW OFFSET(16) NUMBITS(1) [],
        /// Independent watchdog counter freeze in Stop mode
        IWDG_STOP OFFSET(17) NUMBITS(1) [],
        /// Independent watchdog counter freeze in Standby mode
        IWDG_STDBY OFFSET(18) NUMBITS(1) [],
        /// Window watchdog selection
        WWDG_SW OFFSET(19) NUMBITS(1) [],
        /// Boot from Bank 2
        BFB2 OFFSET(20) NUMBITS(1) [],
        /// Dual-bank configuration
        DUALBANK OFFSET(21) NUMBITS(1) [],
        /// Boot configuration
        nBOOT1 OFFSET(23) NUMBITS(1) [],
        /// SRAM2 parity check enable (active low)
        SRAM2_PE OFFSET(24) NUMBITS(1) [],
        /// SRAM2 Erase when system reset (active low)
        SRAM2_RST OFFSET(25) NUMBITS(1) []
    ],
    pub WRP [
        /// WRP area end offset
        WRP_END OFFSET(16) NUMBITS(8) [],
        /// WRP area start offset
        WRP_STRT OFFSET(0) NUMBITS(8) []
    ]
];

pub const FLASH_KEY1: u32 = 0x4567_0123;
pub const FLASH_KEY2: u32 = 0xCDEF_89AB;
pub const FLASH_OPTKEY1: u32 = 0x0819_2A3B;
pub const FLASH_OPTKEY2: u32 = 0x4C5D_6E7F;
pub const FLASH_PDKEY1: u32 = 0x0415_2637;
pub const FLASH_PDKEY2: u32 = 0xFAFB_FCFD;

pub const PAGE_SIZE: usize = 2048;

const FLASH: StaticRef<FlashRegisters> =
    unsafe { StaticRef::new(FLASH_R_BASE as *const FlashRegisters) };

/// Main Flash struct
pub struct Flash<S> {
    registers: StaticRef<FlashRegisters>,
    pwr: Pwr,
    _marker: PhantomData<S>,
}

impl<S: FlashChipSpecific> Flash<S> {
    pub const fn new(pwr: Pwr) -> Self {
        Self {
            registers: FLASH,
            pwr,
            _marker: PhantomData,
        }
    }

    #[cfg(test)]
    fn with_registers(registers: StaticRef<FlashRegisters>, pwr: Pwr) -> Self {
        Self {
            registers,
            pwr,
            _marker: PhantomData,
        }
    }

    pub fn get_latency(&self) -> S::FlashLatency {
        S::FlashLatency::convert_register_to_enum(self.registers.acr.read(ACR::LATENCY))
    }

    /// Program the wait states needed for an HCLK of `hclk_hz` in the current
    /// voltage range.
    ///
    /// # Errors
    ///
    /// + [Err]\([ErrorCode::BUSY]\): the regulator is still changing range
    /// + [Err]\([ErrorCode::FAIL]\): `PWR_CR1.VOS` holds a forbidden value
    /// + errors of [FlashChipSpecific::get_number_wait_cycles_based_on_frequency_and_voltage]
    pub fn set_latency(&self, hclk_hz: u32) -> Result<(), ErrorCode> {
        if !self.pwr.is_vos_ready() {
            return Err(ErrorCode::BUSY);
        }
        let vos = self.pwr.get_vos().ok_or(ErrorCode::FAIL)?;
        let latency =
            S::get_number_wait_cycles_based_on_frequency_and_voltage(hclk_hz, vos as usize)?;
        self.registers.acr.modify(ACR::LATENCY.val(latency.into()));
        if self.get_latency() != latency {
            return Err(ErrorCode::BUSY);
        }
        Ok(())
    }

    /// Enable prefetch and both caches.
    pub fn enable_cache(&self) {
        self.registers
            .acr
            .modify(ACR::PRFTEN::SET + ACR::ICEN::SET + ACR::DCEN::SET);
    }

    /// Flush both caches. They must be disabled first.
    pub fn reset_cache(&self) {
        self.registers.acr.modify(ACR::ICEN::CLEAR + ACR::DCEN::CLEAR);
        self.registers.acr.modify(ACR::ICRST::SET + ACR::DCRST::SET);
        self.registers.acr.modify(ACR::ICRST::CLEAR + ACR::DCRST::CLEAR);
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
        if self.registers.cr.is_set(CR::OPTLOCK) {
            self.registers.optkeyr.set(FLASH_OPTKEY1);
            self.registers.optkeyr.set(FLASH_OPTKEY2);
        }
    }

    /// Unlock `ACR.RUN_PD`.
    pub fn unlock_run_power_down(&self) {
        self.registers.pdkeyr.set(FLASH_PDKEY1);
        self.registers.pdkeyr.set(FLASH_PDKEY2);
    }

    pub fn is_busy(&self) -> bool {
        self.registers.sr.is_set(SR::BSY)
    }

    pub fn read_protection(&self) -> u32 {
        self.registers.optr.read(OPTR::RDP)
    }

    pub fn is_dual_bank(&self) -> bool {
        self.registers.optr.is_set(OPTR::DUALBANK)
    }

    /// Start address of flash page `page`, counted across both banks.
    pub fn page_address(page: usize) -> Result<usize, ErrorCode> {
        if (page + 1) * PAGE_SIZE > S::FLASH_SIZE {
            return Err(ErrorCode::INVAL);
        }
        Ok(FLASH_MEMORY_BASE + page * PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip_specific::flash::FlashLatency5;
    use crate::pwr::{PwrRegisters, VOS};
    use core::mem::{offset_of, size_of};

    enum TestSpecs {}

    impl FlashChipSpecific for TestSpecs {
        type FlashLatency = FlashLatency5;

        const FLASH_SIZE: usize = 1024 * 1024;

        fn get_number_wait_cycles_based_on_frequency_and_voltage(
            frequency_hz: u32,
            vos: usize,
        ) -> Result<FlashLatency5, ErrorCode> {
            match (vos, frequency_hz) {
                (1, 0..=16_000_000) => Ok(FlashLatency5::Latency0),
                (1, 16_000_001..=80_000_000) => Ok(FlashLatency5::Latency4),
                (2, 0..=26_000_000) => Ok(FlashLatency5::Latency3),
                (1 | 2, _) => Err(ErrorCode::SIZE),
                _ => Err(ErrorCode::INVAL),
            }
        }
    }

    #[test]
    fn layout() {
        assert_eq!(offset_of!(FlashRegisters, keyr), 0x08);
        assert_eq!(offset_of!(FlashRegisters, sr), 0x10);
        assert_eq!(offset_of!(FlashRegisters, optr), 0x20);
        assert_eq!(offset_of!(FlashRegisters, wrp1br), 0x30);
        assert_eq!(offset_of!(FlashRegisters, pcrop2sr), 0x44);
        assert_eq!(offset_of!(FlashRegisters, wrp2br), 0x50);
        assert_eq!(size_of::<FlashRegisters>(), 0x54);
    }

    #[test]
    fn bitfields() {
        assert_eq!(CR::PNB.mask << CR::PNB.shift, 0x7f8);
        assert_eq!(CR::LOCK.mask << CR::LOCK.shift, 0x8000_0000);
        assert_eq!(SR::BSY.shift, 16);
        assert_eq!(ECCR::ADDR_ECC.mask, 0x7_ffff);
        assert_eq!(OPTR::DUALBANK.shift, 21);
    }

    #[test]
    fn latency_follows_voltage_range() {
        let pwr_regs: PwrRegisters = unsafe { core::mem::zeroed() };
        let regs: FlashRegisters = unsafe { core::mem::zeroed() };
        let pwr = Pwr::with_registers(unsafe { StaticRef::new(&pwr_regs) });
        let flash = Flash::<TestSpecs>::with_registers(unsafe { StaticRef::new(&regs) }, pwr);

        // VOS = 0 is forbidden
        assert_eq!(flash.set_latency(80_000_000), Err(ErrorCode::FAIL));

        Pwr::with_registers(unsafe { StaticRef::new(&pwr_regs) }).set_vos(VOS::Range1);
        flash.set_latency(80_000_000).unwrap();
        assert_eq!(flash.get_latency(), FlashLatency5::Latency4);
        assert_eq!(flash.set_latency(80_000_001), Err(ErrorCode::SIZE));

        Pwr::with_registers(unsafe { StaticRef::new(&pwr_regs) }).set_vos(VOS::Range2);
        flash.set_latency(26_000_000).unwrap();
        assert_eq!(flash.get_latency(), FlashLatency5::Latency3);
    }

    #[test]
    fn key_sequences() {
        let pwr_regs: PwrRegisters = unsafe { core::mem::zeroed() };
        let regs: FlashRegisters = unsafe { core::mem::zeroed() };
        let pwr = Pwr::with_registers(unsafe { StaticRef::new(&pwr_regs) });
        let flash = Flash::<TestSpecs>::with_registers(unsafe { StaticRef::new(&regs) }, pwr);
        let read =
            |r: &WriteOnly<u32>| unsafe { core::ptr::read_volatile(r as *const _ as *const u32) };

        flash.unlock();
        assert_eq!(read(&regs.keyr), 0);
        flash.lock();
        flash.unlock();
        assert_eq!(read(&regs.keyr), FLASH_KEY2);

        regs.cr.modify(CR::OPTLOCK::SET);
        flash.unlock_option_bytes();
        assert_eq!(read(&regs.optkeyr), FLASH_OPTKEY2);

        flash.unlock_run_power_down();
        assert_eq!(read(&regs.pdkeyr), FLASH_PDKEY2);
    }

    #[test]
    fn pages() {
        assert_eq!(Flash::<TestSpecs>::page_address(0), Ok(0x0800_0000));
        assert_eq!(Flash::<TestSpecs>::page_address(511), Ok(0x080F_F800));
        assert_eq!(Flash::<TestSpecs>::page_address(512), Err(ErrorCode::INVAL));
    }
}
