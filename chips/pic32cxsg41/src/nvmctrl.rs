// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Non-volatile memory controller: flash wait states, cache, and the
//! erase / write command interface.

use crate::chip_specific::FlashChipSpecific;
use crate::memory_map::{FLASH_MEMORY_BASE, NVMCTRL_BASE};
use chip_common::{debug, ErrorCode, StaticRef};
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite, WriteOnly};
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    pub NvmctrlRegisters {
        /// Control A
        (0x00 => ctrla: ReadWrite<u16, CTRLA::Register>),
        (0x02 => _reserved0),
        /// Control B
        (0x04 => ctrlb: WriteOnly<u16, CTRLB::Register>),
        (0x06 => _reserved1),
        /// NVM Parameter
        (0x08 => param: ReadOnly<u32, PARAM::Register>),
        /// Interrupt Enable Clear
        (0x0c => intenclr: ReadWrite<u16, INT::Register>),
        (0x0e => _reserved2),
        /// Interrupt Enable Set
        (0x10 => intenset: ReadWrite<u16, INT::Register>),
        (0x12 => _reserved3),
        /// Interrupt Flag Status and Clear
        (0x14 => intflag: ReadWrite<u16, INT::Register>),
        /// Status
        (0x16 => status: ReadOnly<u16, STATUS::Register>),
        /// Address
        (0x18 => addr: ReadWrite<u32, ADDR::Register>),
        /// Lock Section
        (0x1c => runlock: ReadOnly<u32>),
        /// Page Buffer Load Data x
        (0x20 => pbldata: [ReadOnly<u32>; 2]),
        /// ECC Error Status Register
        (0x28 => eccerr: ReadOnly<u32, ECCERR::Register>),
        /// Debug Control
        (0x2c => dbgctrl: ReadWrite<u8>),
        (0x2d => _reserved4),
        /// SmartEEPROM Configuration Register
        (0x2e => seecfg: ReadWrite<u8, SEECFG::Register>),
        (0x2f => _reserved5),
        /// SmartEEPROM Status Register
        (0x30 => seestat: ReadOnly<u32, SEESTAT::Register>),
        (0x34 => @END),
    }
}

register_bitfields![u8,
    pub SEECFG [
        /// Automatic Page Reallocation Disable
        APRDIS OFFSET(1) NUMBITS(1) [],
        /// Write Mode
        WMODE OFFSET(0) NUMBITS(1) [
            Unbuffered = 0,
            Buffered = 1
        ]
    ]
];

register_bitfields![u16,
    pub CTRLA [
        /// AHB1 Cache Disable
        CACHEDIS1 OFFSET(15) NUMBITS(1) [],
        /// AHB0 Cache Disable
        CACHEDIS0 OFFSET(14) NUMBITS(1) [],
        /// Force AHB1 access to NONSEQ, burst transfers are continuously
        /// rearbitrated
        AHBNS1 OFFSET(13) NUMBITS(1) [],
        /// Force AHB0 access to NONSEQ
        AHBNS0 OFFSET(12) NUMBITS(1) [],
        /// NVM Read Wait States
        RWS OFFSET(8) NUMBITS(4) [],
        /// Power Reduction Mode during Sleep
        PRM OFFSET(6) NUMBITS(2) [
            SemiAuto = 0,
            FullAuto = 1,
            Manual = 3
        ],
        /// Write Mode
        WMODE OFFSET(4) NUMBITS(2) [
            Manual = 0,
            AutomaticDoubleWord = 1,
            AutomaticQuadWord = 2,
            AutomaticPage = 3
        ],
        /// Suspend Enable
        SUSPEN OFFSET(3) NUMBITS(1) [],
        /// Auto Wait State Enable
        AUTOWS OFFSET(2) NUMBITS(1) []
    ],
    pub CTRLB [
        /// Command Execution
        CMDEX OFFSET(8) NUMBITS(8) [
            KEY = 0xa5
        ],
        /// Command
        CMD OFFSET(0) NUMBITS(7) []
    ],
    pub INT [
        /// Write Crossed a Sector Boundary
        SEEWRC OFFSET(10) NUMBITS(1) [],
        /// Active SEES Overflow
        SEESOVF OFFSET(9) NUMBITS(1) [],
        /// Active SEES Full
        SEESFULL OFFSET(8) NUMBITS(1) [],
        /// Suspended Write Or Erase Operation
        SUSP OFFSET(7) NUMBITS(1) [],
        /// NVM Error
        NVME OFFSET(6) NUMBITS(1) [],
        /// ECC Dual Error
        ECCDE OFFSET(5) NUMBITS(1) [],
        /// ECC Single Error
        ECCSE OFFSET(4) NUMBITS(1) [],
        /// Lock Error
        LOCKE OFFSET(3) NUMBITS(1) [],
        /// Programming Error
        PROGE OFFSET(2) NUMBITS(1) [],
        /// Address Error
        ADDRE OFFSET(1) NUMBITS(1) [],
        /// Command Done
        DONE OFFSET(0) NUMBITS(1) []
    ],
    pub STATUS [
        /// Boot Loader Protection Size
        BOOTPROT OFFSET(8) NUMBITS(4) [],
        /// Boot Loader Protection Disable
        BPDIS OFFSET(5) NUMBITS(1) [],
        /// BANKA First
        AFIRST OFFSET(4) NUMBITS(1) [],
        /// NVM Suspend
        SUSP OFFSET(3) NUMBITS(1) [],
        /// NVM Page Buffer Active Loading
        LOAD OFFSET(2) NUMBITS(1) [],
        /// Power Reduction Mode
        PRM OFFSET(1) NUMBITS(1) [],
        /// Ready to accept a command
        READY OFFSET(0) NUMBITS(1) []
    ]
];

register_bitfields![u32,
    pub PARAM [
        /// SmartEEPROM Supported
        SEE OFFSET(31) NUMBITS(1) [],
        /// Page Size, 8 << PSZ bytes
        PSZ OFFSET(16) NUMBITS(3) [],
        /// NVM Pages
        NVMP OFFSET(0) NUMBITS(16) []
    ],
    pub ADDR [
        /// NVM Address
        ADDR OFFSET(0) NUMBITS(24) []
    ],
    pub ECCERR [
        /// Error Type
        TYPEH OFFSET(30) NUMBITS(2) [],
        TYPEL OFFSET(28) NUMBITS(2) [],
        /// Error Address
        ADDR OFFSET(0) NUMBITS(24) []
    ],
    pub SEESTAT [
        /// SmartEEPROM Page Size
        PSZ OFFSET(16) NUMBITS(3) [],
        /// Blocks Number In a Sector
        SBLK OFFSET(8) NUMBITS(4) [],
        /// Read-Only Locked
        RLOCK OFFSET(4) NUMBITS(1) [],
        /// SmartEEPROM Section Locked
        LOCK OFFSET(3) NUMBITS(1) [],
        /// Busy
        BUSY OFFSET(2) NUMBITS(1) [],
        /// Page Buffer Loaded
        LOAD OFFSET(1) NUMBITS(1) [],
        /// Active SmartEEPROM Sector
        ASEES OFFSET(0) NUMBITS(1) []
    ]
];

const NVMCTRL: StaticRef<NvmctrlRegisters> =
    unsafe { StaticRef::new(NVMCTRL_BASE as *const NvmctrlRegisters) };

pub const PAGE_SIZE: usize = 512;
/// Erase granularity.
pub const BLOCK_SIZE: usize = 8192;
/// Quad-word write granularity.
pub const QUAD_WORD_SIZE: usize = 16;

/// `ADDRE`, `PROGE`, `LOCKE` and `NVME` in `INTFLAG`.
const ERROR_FLAGS: u16 = 0x004e;

/// Value of `CTRLB.CMD`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    /// Erase Page, user page only
    EP = 0x00,
    /// Erase Block
    EB = 0x01,
    /// Write Page
    WP = 0x03,
    /// Write Quad Word
    WQW = 0x04,
    /// Software Reset
    SWRST = 0x10,
    /// Lock Region
    LR = 0x11,
    /// Unlock Region
    UR = 0x12,
    /// Set Power Reduction Mode
    SPRM = 0x13,
    /// Clear Power Reduction Mode
    CPRM = 0x14,
    /// Page Buffer Clear
    PBC = 0x15,
    /// Set Security Bit
    SSB = 0x16,
    /// Bank Swap and system reset
    BKSWRST = 0x17,
    /// Chip Erase Lock
    CELCK = 0x18,
    /// Chip Erase Unlock
    CEULCK = 0x19,
    /// Set Boot Loader Protection Disable
    SBPDIS = 0x1a,
    /// Clear Boot Loader Protection Disable
    CBPDIS = 0x1b,
    /// Configure SmartEEPROM to use Sector 0
    ASEES0 = 0x30,
    /// Configure SmartEEPROM to use Sector 1
    ASEES1 = 0x31,
    /// Start SmartEEPROM sector reallocation algorithm
    SEERALOC = 0x32,
    /// Flush SmartEEPROM data when in buffered mode
    SEEFLUSH = 0x33,
    /// Lock access to SmartEEPROM data from any means
    LSEE = 0x34,
    /// Unlock access to SmartEEPROM data
    USEE = 0x35,
    /// Lock access to the SmartEEPROM Register Address Space
    LSEER = 0x36,
    /// Unlock access to the SmartEEPROM Register Address Space
    USEER = 0x37,
}

pub struct Nvmctrl {
    registers: StaticRef<NvmctrlRegisters>,
}

impl Nvmctrl {
    pub const fn new() -> Nvmctrl {
        Nvmctrl { registers: NVMCTRL }
    }

    #[cfg(test)]
    pub(crate) fn with_registers(registers: StaticRef<NvmctrlRegisters>) -> Nvmctrl {
        Nvmctrl { registers }
    }

    pub fn wait_states(&self) -> u8 {
        self.registers.ctrla.read(CTRLA::RWS) as u8
    }

    /// Program `RWS` and turn off automatic wait states.
    pub fn set_wait_states(&self, wait_states: u8) -> Result<(), ErrorCode> {
        if wait_states as u16 > CTRLA::RWS.mask {
            return Err(ErrorCode::INVAL);
        }
        self.registers
            .ctrla
            .modify(CTRLA::AUTOWS::CLEAR + CTRLA::RWS.val(wait_states as u16));
        Ok(())
    }

    /// Set the wait states the part needs for a CPU clock of
    /// `frequency_hz`. Must be called before raising the clock.
    pub fn set_wait_states_for_frequency<S: FlashChipSpecific>(
        &self,
        frequency_hz: u32,
    ) -> Result<(), ErrorCode> {
        match S::wait_states_for_frequency(frequency_hz) {
            Ok(wait_states) => self.set_wait_states(wait_states),
            Err(e) => {
                debug!("NVMCTRL: no wait-state setting for {} Hz", frequency_hz);
                Err(e)
            }
        }
    }

    pub fn enable_cache(&self) {
        self.registers
            .ctrla
            .modify(CTRLA::CACHEDIS0::CLEAR + CTRLA::CACHEDIS1::CLEAR);
    }

    pub fn disable_cache(&self) {
        self.registers
            .ctrla
            .modify(CTRLA::CACHEDIS0::SET + CTRLA::CACHEDIS1::SET);
    }

    pub fn is_ready(&self) -> bool {
        self.registers.status.is_set(STATUS::READY)
    }

    /// Flash size reported by `PARAM`.
    pub fn flash_size(&self) -> usize {
        let page_size = 8usize << self.registers.param.read(PARAM::PSZ);
        self.registers.param.read(PARAM::NVMP) as usize * page_size
    }

    /// Issue `command`. Address-based commands act on the address
    /// previously loaded with [`Nvmctrl::set_address`].
    pub fn command(&self, command: Command) -> Result<(), ErrorCode> {
        if !self.is_ready() {
            return Err(ErrorCode::BUSY);
        }
        self.registers
            .ctrlb
            .write(CTRLB::CMDEX::KEY + CTRLB::CMD.val(command as u16));
        Ok(())
    }

    pub fn set_address(&self, address: usize) {
        self.registers.addr.write(ADDR::ADDR.val(address as u32));
    }

    /// Erase the 8 KiB block at `address`.
    pub fn erase_block<S: FlashChipSpecific>(&self, address: usize) -> Result<(), ErrorCode> {
        check_address::<S>(address, BLOCK_SIZE)?;
        self.set_address(address);
        self.command(Command::EB)
    }

    /// Commit the page buffer to the page at `address`. The caller has
    /// already filled the page buffer by writing to the page's addresses.
    pub fn write_page<S: FlashChipSpecific>(&self, address: usize) -> Result<(), ErrorCode> {
        check_address::<S>(address, PAGE_SIZE)?;
        self.set_address(address);
        self.command(Command::WP)
    }

    /// Read and clear the error flags of the last command.
    pub fn take_errors(&self) -> u16 {
        let errors = self.registers.intflag.get() & ERROR_FLAGS;
        self.registers.intflag.set(errors);
        errors
    }
}

fn check_address<S: FlashChipSpecific>(address: usize, alignment: usize) -> Result<(), ErrorCode> {
    match address.checked_sub(FLASH_MEMORY_BASE) {
        Some(offset) if offset < S::FLASH_SIZE && offset % alignment == 0 => Ok(()),
        _ => Err(ErrorCode::INVAL),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::{offset_of, size_of};
    use core::ptr::{addr_of, addr_of_mut, read_volatile};

    enum Specs {}
    impl FlashChipSpecific for Specs {
        const FLASH_SIZE: usize = 1024 * 1024;

        fn wait_states_for_frequency(frequency_hz: u32) -> Result<u8, ErrorCode> {
            match frequency_hz {
                0..=24_000_000 => Ok(0),
                24_000_001..=120_000_000 => Ok(5),
                _ => Err(ErrorCode::SIZE),
            }
        }
    }

    fn ctrlb(regs: &NvmctrlRegisters) -> u16 {
        unsafe { read_volatile(addr_of!(regs.ctrlb) as *const u16) }
    }

    #[test]
    fn layout() {
        assert_eq!(offset_of!(NvmctrlRegisters, ctrlb), 0x04);
        assert_eq!(offset_of!(NvmctrlRegisters, intflag), 0x14);
        assert_eq!(offset_of!(NvmctrlRegisters, status), 0x16);
        assert_eq!(offset_of!(NvmctrlRegisters, runlock), 0x1c);
        assert_eq!(offset_of!(NvmctrlRegisters, eccerr), 0x28);
        assert_eq!(offset_of!(NvmctrlRegisters, seecfg), 0x2e);
        assert_eq!(offset_of!(NvmctrlRegisters, seestat), 0x30);
        assert_eq!(size_of::<NvmctrlRegisters>(), 0x34);
        assert_eq!(CTRLA::RWS.mask << CTRLA::RWS.shift, 0x0f00);
        assert_eq!(PARAM::PSZ.shift, 16);
    }

    #[test]
    fn wait_states() {
        let regs: NvmctrlRegisters = unsafe { core::mem::zeroed() };
        regs.ctrla.write(CTRLA::AUTOWS::SET);
        let nvmctrl = Nvmctrl::with_registers(unsafe { StaticRef::new(&regs) });

        nvmctrl
            .set_wait_states_for_frequency::<Specs>(120_000_000)
            .unwrap();
        assert_eq!(nvmctrl.wait_states(), 5);
        assert!(!regs.ctrla.is_set(CTRLA::AUTOWS));

        assert_eq!(
            nvmctrl.set_wait_states_for_frequency::<Specs>(150_000_000),
            Err(ErrorCode::SIZE)
        );
        assert_eq!(nvmctrl.wait_states(), 5);
        assert_eq!(nvmctrl.set_wait_states(16), Err(ErrorCode::INVAL));
    }

    #[test]
    fn commands() {
        let busy: NvmctrlRegisters = unsafe { core::mem::zeroed() };
        let nvmctrl = Nvmctrl::with_registers(unsafe { StaticRef::new(&busy) });
        assert_eq!(nvmctrl.command(Command::PBC), Err(ErrorCode::BUSY));

        let mut regs: NvmctrlRegisters = unsafe { core::mem::zeroed() };
        // STATUS is read-only to the CPU; fake the ready bit.
        unsafe { (addr_of_mut!(regs.status) as *mut u16).write(1) };
        let nvmctrl = Nvmctrl::with_registers(unsafe { StaticRef::new(&regs) });
        assert_eq!(nvmctrl.erase_block::<Specs>(0x4000), Ok(()));
        assert_eq!(ctrlb(&regs), 0xa501);
        assert_eq!(regs.addr.get(), 0x4000);

        assert_eq!(nvmctrl.write_page::<Specs>(0x0002_0200), Ok(()));
        assert_eq!(ctrlb(&regs), 0xa503);

        assert_eq!(nvmctrl.erase_block::<Specs>(0x1000), Err(ErrorCode::INVAL));
        assert_eq!(nvmctrl.write_page::<Specs>(0x0010_0000), Err(ErrorCode::INVAL));
        assert_eq!(nvmctrl.write_page::<Specs>(0x0000_0100), Err(ErrorCode::INVAL));
    }

    #[test]
    fn errors() {
        let regs: NvmctrlRegisters = unsafe { core::mem::zeroed() };
        let nvmctrl = Nvmctrl::with_registers(unsafe { StaticRef::new(&regs) });
        regs.intflag.write(INT::DONE::SET + INT::PROGE::SET);
        assert_eq!(nvmctrl.take_errors(), 1 << 2);
    }
}
