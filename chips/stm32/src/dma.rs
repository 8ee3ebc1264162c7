// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Direct memory access controller (DMA v1: one request per channel).
//!
//! DMA1 has seven channels on both families, DMA2 five on F3 and seven on
//! L4. On L4 the request routed to each channel is chosen in `CSELR`; on F3
//! that word is reserved and the mapping is fixed.

use chip_common::{ErrorCode, StaticRef};
use tock_registers::fields::Field;
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite, WriteOnly};
use tock_registers::{register_bitfields, register_structs};

/// Channels in one controller block.
pub const NUM_CHANNELS: usize = 7;

register_structs! {
    /// One DMA channel
    pub DmaChannelRegisters {
        /// channel x configuration register
        (0x00 => ccr: ReadWrite<u32, CCR::Register>),
        /// channel x number of data register
        (0x04 => cndtr: ReadWrite<u32, CNDTR::Register>),
        /// channel x peripheral address register
        (0x08 => cpar: ReadWrite<u32>),
        /// channel x memory address register
        (0x0c => cmar: ReadWrite<u32>),
        (0x10 => _reserved0),
        (0x14 => @END),
    },

    /// DMA controller
    pub DmaRegisters {
        /// interrupt status register
        (0x00 => isr: ReadOnly<u32, ISR::Register>),
        /// interrupt flag clear register
        (0x04 => ifcr: WriteOnly<u32, IFCR::Register>),
        /// channels 1..7, 0x14 apart
        (0x08 => channels: [DmaChannelRegisters; NUM_CHANNELS]),
        (0x94 => _reserved0),
        /// channel selection register (L4)
        (0xa8 => cselr: ReadWrite<u32, CSELR::Register>),
        (0xac => @END),
    }
}

register_bitfields![u32,
    pub ISR [
        /// Channel 7 transfer error flag
        TEIF7 OFFSET(27) NUMBITS(1) [],
        /// Channel 7 half transfer flag
        HTIF7 OFFSET(26) NUMBITS(1) [],
        /// Channel 7 transfer complete flag
        TCIF7 OFFSET(25) NUMBITS(1) [],
        /// Channel 7 global interrupt flag
        GIF7 OFFSET(24) NUMBITS(1) [],
        /// Channel 6 transfer error flag
        TEIF6 OFFSET(23) NUMBITS(1) [],
        /// Channel 6 half transfer flag
        HTIF6 OFFSET(22) NUMBITS(1) [],
        /// Channel 6 transfer complete flag
        TCIF6 OFFSET(21) NUMBITS(1) [],
        /// Channel 6 global interrupt flag
        GIF6 OFFSET(20) NUMBITS(1) [],
        /// Channel 5 transfer error flag
        TEIF5 OFFSET(19) NUMBITS(1) [],
        /// Channel 5 half transfer flag
        HTIF5 OFFSET(18) NUMBITS(1) [],
        /// Channel 5 transfer complete flag
        TCIF5 OFFSET(17) NUMBITS(1) [],
        /// Channel 5 global interrupt flag
        GIF5 OFFSET(16) NUMBITS(1) [],
        /// Channel 4 transfer error flag
        TEIF4 OFFSET(15) NUMBITS(1) [],
        /// Channel 4 half transfer flag
        HTIF4 OFFSET(14) NUMBITS(1) [],
        /// Channel 4 transfer complete flag
        TCIF4 OFFSET(13) NUMBITS(1) [],
        /// Channel 4 global interrupt flag
        GIF4 OFFSET(12) NUMBITS(1) [],
        /// Channel 3 transfer error flag
        TEIF3 OFFSET(11) NUMBITS(1) [],
        /// Channel 3 half transfer flag
        HTIF3 OFFSET(10) NUMBITS(1) [],
        /// Channel 3 transfer complete flag
        TCIF3 OFFSET(9) NUMBITS(1) [],
        /// Channel 3 global interrupt flag
        GIF3 OFFSET(8) NUMBITS(1) [],
        /// Channel 2 transfer error flag
        TEIF2 OFFSET(7) NUMBITS(1) [],
        /// Channel 2 half transfer flag
        HTIF2 OFFSET(6) NUMBITS(1) [],
        /// Channel 2 transfer complete flag
        TCIF2 OFFSET(5) NUMBITS(1) [],
        /// Channel 2 global interrupt flag
        GIF2 OFFSET(4) NUMBITS(1) [],
        /// Channel 1 transfer error flag
        TEIF1 OFFSET(3) NUMBITS(1) [],
        /// Channel 1 half transfer flag
        HTIF1 OFFSET(2) NUMBITS(1) [],
        /// Channel 1 transfer complete flag
        TCIF1 OFFSET(1) NUMBITS(1) [],
        /// Channel 1 global interrupt flag
        GIF1 OFFSET(0) NUMBITS(1) []
    ],
    pub IFCR [
        CTEIF7 OFFSET(27) NUMBITS(1) [],
        CHTIF7 OFFSET(26) NUMBITS(1) [],
        CTCIF7 OFFSET(25) NUMBITS(1) [],
        CGIF7 OFFSET(24) NUMBITS(1) [],
        CTEIF6 OFFSET(23) NUMBITS(1) [],
        CHTIF6 OFFSET(22) NUMBITS(1) [],
        CTCIF6 OFFSET(21) NUMBITS(1) [],
        CGIF6 OFFSET(20) NUMBITS(1) [],
        CTEIF5 OFFSET(19) NUMBITS(1) [],
        CHTIF5 OFFSET(18) NUMBITS(1) [],
        CTCIF5 OFFSET(17) NUMBITS(1) [],
        CGIF5 OFFSET(16) NUMBITS(1) [],
        CTEIF4 OFFSET(15) NUMBITS(1) [],
        CHTIF4 OFFSET(14) NUMBITS(1) [],
        CTCIF4 OFFSET(13) NUMBITS(1) [],
        CGIF4 OFFSET(12) NUMBITS(1) [],
        CTEIF3 OFFSET(11) NUMBITS(1) [],
        CHTIF3 OFFSET(10) NUMBITS(1) [],
        CTCIF3 OFFSET(9) NUMBITS(1) [],
        CGIF3 OFFSET(8) NUMBITS(1) [],
        CTEIF2 OFFSET(7) NUMBITS(1) [],
        CHTIF2 OFFSET(6) NUMBITS(1) [],
        CTCIF2 OFFSET(5) NUMBITS(1) [],
        CGIF2 OFFSET(4) NUMBITS(1) [],
        CTEIF1 OFFSET(3) NUMBITS(1) [],
        CHTIF1 OFFSET(2) NUMBITS(1) [],
        CTCIF1 OFFSET(1) NUMBITS(1) [],
        CGIF1 OFFSET(0) NUMBITS(1) []
    ],
    pub CCR [
        /// Memory to memory mode
        MEM2MEM OFFSET(14) NUMBITS(1) [],
        /// Channel priority level
        PL OFFSET(12) NUMBITS(2) [
            Low = 0b00,
            Medium = 0b01,
            High = 0b10,
            VeryHigh = 0b11
        ],
        /// Memory size
        MSIZE OFFSET(10) NUMBITS(2) [],
        /// Peripheral size
        PSIZE OFFSET(8) NUMBITS(2) [],
        /// Memory increment mode
        MINC OFFSET(7) NUMBITS(1) [],
        /// Peripheral increment mode
        PINC OFFSET(6) NUMBITS(1) [],
        /// Circular mode
        CIRC OFFSET(5) NUMBITS(1) [],
        /// Data transfer direction
        DIR OFFSET(4) NUMBITS(1) [],
        /// Transfer error interrupt enable
        TEIE OFFSET(3) NUMBITS(1) [],
        /// Half transfer interrupt enable
        HTIE OFFSET(2) NUMBITS(1) [],
        /// Transfer complete interrupt enable
        TCIE OFFSET(1) NUMBITS(1) [],
        /// Channel enable
        EN OFFSET(0) NUMBITS(1) []
    ],
    pub CNDTR [
        /// Number of data to transfer
        NDT OFFSET(0) NUMBITS(16) []
    ],
    pub CSELR [
        C7S OFFSET(24) NUMBITS(4) [],
        C6S OFFSET(20) NUMBITS(4) [],
        C5S OFFSET(16) NUMBITS(4) [],
        C4S OFFSET(12) NUMBITS(4) [],
        C3S OFFSET(8) NUMBITS(4) [],
        C2S OFFSET(4) NUMBITS(4) [],
        C1S OFFSET(0) NUMBITS(4) []
    ]
];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    PeripheralToMemory,
    MemoryToPeripheral,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Width {
    Bits8 = 0b00,
    Bits16 = 0b01,
    Bits32 = 0b10,
}

/// Interrupt flags of one channel, decoded from `ISR`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ChannelFlags {
    pub global: bool,
    pub transfer_complete: bool,
    pub half_transfer: bool,
    pub transfer_error: bool,
}

/// Channel `channel` (numbered from 1, as in the reference manual) of one
/// controller.
pub struct DmaChannel {
    registers: StaticRef<DmaRegisters>,
    channel: usize,
}

impl DmaChannel {
    pub fn new(registers: StaticRef<DmaRegisters>, channel: usize) -> Result<DmaChannel, ErrorCode> {
        if channel == 0 || channel > NUM_CHANNELS {
            return Err(ErrorCode::INVAL);
        }
        Ok(DmaChannel { registers, channel })
    }

    fn regs(&self) -> &DmaChannelRegisters {
        &self.registers.channels[self.channel - 1]
    }

    fn flag_shift(&self) -> usize {
        4 * (self.channel - 1)
    }

    /// Route request `request` to this channel (L4 `CSELR`).
    pub fn select_request(&self, request: u32) {
        let field: Field<u32, CSELR::Register> = Field::new(0xf, self.flag_shift());
        self.registers.cselr.modify(field.val(request));
    }

    /// Set up a single, non-circular transfer of `count` items between a
    /// peripheral register and memory. The channel is left disabled.
    pub fn configure(
        &self,
        direction: Direction,
        peripheral_address: u32,
        memory_address: u32,
        count: u16,
        width: Width,
    ) {
        let regs = self.regs();
        regs.ccr.modify(CCR::EN::CLEAR);
        regs.cpar.set(peripheral_address);
        regs.cmar.set(memory_address);
        regs.cndtr.write(CNDTR::NDT.val(count as u32));
        regs.ccr.write(
            CCR::DIR.val((direction == Direction::MemoryToPeripheral) as u32)
                + CCR::MINC::SET
                + CCR::PSIZE.val(width as u32)
                + CCR::MSIZE.val(width as u32)
                + CCR::PL::Medium
                + CCR::TCIE::SET
                + CCR::TEIE::SET,
        );
    }

    pub fn enable(&self) {
        self.regs().ccr.modify(CCR::EN::SET);
    }

    pub fn disable(&self) {
        self.regs().ccr.modify(CCR::EN::CLEAR);
    }

    pub fn remaining(&self) -> u16 {
        self.regs().cndtr.read(CNDTR::NDT) as u16
    }

    pub fn flags(&self) -> ChannelFlags {
        let isr = self.registers.isr.get() >> self.flag_shift();
        ChannelFlags {
            global: isr & 0b0001 != 0,
            transfer_complete: isr & 0b0010 != 0,
            half_transfer: isr & 0b0100 != 0,
            transfer_error: isr & 0b1000 != 0,
        }
    }

    /// Clear all four flags of this channel.
    pub fn clear_flags(&self) {
        self.registers.ifcr.set(0b1111 << self.flag_shift());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::{offset_of, size_of};

    #[test]
    fn register_offsets() {
        assert_eq!(size_of::<DmaChannelRegisters>(), 0x14);
        assert_eq!(offset_of!(DmaChannelRegisters, cmar), 0x0c);
        assert_eq!(offset_of!(DmaRegisters, channels), 0x08);
        assert_eq!(offset_of!(DmaRegisters, cselr), 0xa8);
        assert_eq!(size_of::<DmaRegisters>(), 0xac);
    }

    #[test]
    fn flag_positions() {
        assert_eq!(ISR::GIF1.shift, 0);
        assert_eq!(ISR::TEIF7.shift, 27);
        assert_eq!(IFCR::CTCIF3.shift, 9);
        assert_eq!(CSELR::C7S.shift, 24);
        assert_eq!(CCR::MEM2MEM.shift, 14);
    }

    #[test]
    fn channel_numbering() {
        let regs: DmaRegisters = unsafe { core::mem::zeroed() };
        let base = unsafe { StaticRef::new(&regs as *const DmaRegisters) };
        assert!(DmaChannel::new(base, 0).is_err());
        assert!(DmaChannel::new(base, 8).is_err());

        let ch3 = DmaChannel::new(base, 3).unwrap();
        ch3.configure(Direction::MemoryToPeripheral, 0x4001_3828, 0x2000_0100, 16, Width::Bits8);
        let ch3_regs = &regs.channels[2];
        assert_eq!(ch3_regs.cpar.get(), 0x4001_3828);
        assert_eq!(ch3_regs.cmar.get(), 0x2000_0100);
        assert_eq!(ch3.remaining(), 16);
        assert_eq!(ch3_regs.ccr.get(), (1 << 4) | (1 << 7) | (0b01 << 12) | (1 << 1) | (1 << 3));

        ch3.select_request(0b0010);
        assert_eq!(regs.cselr.get(), 0b0010 << 8);

        ch3.clear_flags();
        let ifcr = unsafe { core::ptr::read_volatile(core::ptr::addr_of!(regs.ifcr) as *const u32) };
        assert_eq!(ifcr, 0b1111 << 8);
    }
}
