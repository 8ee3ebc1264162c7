// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Serial peripheral interface with 32-bit FIFO (SPI v2), as found on F3
//! and L4. SPI2/SPI3 of the F303 also carry the I2S registers.

use chip_common::{ErrorCode, StaticRef};
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite};
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    /// Serial peripheral interface
    pub SpiRegisters {
        /// control register 1
        (0x00 => cr1: ReadWrite<u32, CR1::Register>),
        /// control register 2
        (0x04 => cr2: ReadWrite<u32, CR2::Register>),
        /// status register
        (0x08 => sr: ReadWrite<u32, SR::Register>),
        /// data register
        (0x0c => dr: ReadWrite<u32, DR::Register>),
        /// CRC polynomial register
        (0x10 => crcpr: ReadWrite<u32>),
        /// RX CRC register
        (0x14 => rxcrcr: ReadOnly<u32>),
        /// TX CRC register
        (0x18 => txcrcr: ReadOnly<u32>),
        /// I2S configuration register
        (0x1c => i2scfgr: ReadWrite<u32, I2SCFGR::Register>),
        /// I2S prescaler register
        (0x20 => i2spr: ReadWrite<u32, I2SPR::Register>),
        (0x24 => @END),
    }
}

register_bitfields![u32,
    pub CR1 [
        /// Bidirectional data mode enable
        BIDIMODE OFFSET(15) NUMBITS(1) [],
        /// Output enable in bidirectional mode
        BIDIOE OFFSET(14) NUMBITS(1) [],
        /// Hardware CRC calculation enable
        CRCEN OFFSET(13) NUMBITS(1) [],
        /// CRC transfer next
        CRCNEXT OFFSET(12) NUMBITS(1) [],
        /// CRC length
        CRCL OFFSET(11) NUMBITS(1) [],
        /// Receive only
        RXONLY OFFSET(10) NUMBITS(1) [],
        /// Software slave management
        SSM OFFSET(9) NUMBITS(1) [],
        /// Internal slave select
        SSI OFFSET(8) NUMBITS(1) [],
        /// Frame format
        LSBFIRST OFFSET(7) NUMBITS(1) [],
        /// SPI enable
        SPE OFFSET(6) NUMBITS(1) [],
        /// Baud rate control
        BR OFFSET(3) NUMBITS(3) [],
        /// Master selection
        MSTR OFFSET(2) NUMBITS(1) [],
        /// Clock polarity
        CPOL OFFSET(1) NUMBITS(1) [],
        /// Clock phase
        CPHA OFFSET(0) NUMBITS(1) []
    ],
    pub CR2 [
        /// Last DMA transfer for transmission
        LDMA_TX OFFSET(14) NUMBITS(1) [],
        /// Last DMA transfer for reception
        LDMA_RX OFFSET(13) NUMBITS(1) [],
        /// FIFO reception threshold
        FRXTH OFFSET(12) NUMBITS(1) [],
        /// Data size
        DS OFFSET(8) NUMBITS(4) [],
        /// Tx buffer empty interrupt enable
        TXEIE OFFSET(7) NUMBITS(1) [],
        /// RX buffer not empty interrupt enable
        RXNEIE OFFSET(6) NUMBITS(1) [],
        /// Error interrupt enable
        ERRIE OFFSET(5) NUMBITS(1) [],
        /// Frame format
        FRF OFFSET(4) NUMBITS(1) [],
        /// NSS pulse management
        NSSP OFFSET(3) NUMBITS(1) [],
        /// SS output enable
        SSOE OFFSET(2) NUMBITS(1) [],
        /// Tx buffer DMA enable
        TXDMAEN OFFSET(1) NUMBITS(1) [],
        /// Rx buffer DMA enable
        RXDMAEN OFFSET(0) NUMBITS(1) []
    ],
    pub SR [
        /// FIFO transmission level
        FTLVL OFFSET(11) NUMBITS(2) [],
        /// FIFO reception level
        FRLVL OFFSET(9) NUMBITS(2) [],
        /// TI frame format error
        FRE OFFSET(8) NUMBITS(1) [],
        /// Busy flag
        BSY OFFSET(7) NUMBITS(1) [],
        /// Overrun flag
        OVR OFFSET(6) NUMBITS(1) [],
        /// Mode fault
        MODF OFFSET(5) NUMBITS(1) [],
        /// CRC error flag
        CRCERR OFFSET(4) NUMBITS(1) [],
        /// Underrun flag
        UDR OFFSET(3) NUMBITS(1) [],
        /// Channel side
        CHSIDE OFFSET(2) NUMBITS(1) [],
        /// Transmit buffer empty
        TXE OFFSET(1) NUMBITS(1) [],
        /// Receive buffer not empty
        RXNE OFFSET(0) NUMBITS(1) []
    ],
    pub DR [
        /// Data register
        DR OFFSET(0) NUMBITS(16) []
    ],
    pub I2SCFGR [
        /// I2S mode selection
        I2SMOD OFFSET(11) NUMBITS(1) [],
        /// I2S Enable
        I2SE OFFSET(10) NUMBITS(1) [],
        /// I2S configuration mode
        I2SCFG OFFSET(8) NUMBITS(2) [],
        /// PCM frame synchronization
        PCMSYNC OFFSET(7) NUMBITS(1) [],
        /// I2S standard selection
        I2SSTD OFFSET(4) NUMBITS(2) [],
        /// Steady state clock polarity
        CKPOL OFFSET(3) NUMBITS(1) [],
        /// Data length to be transferred
        DATLEN OFFSET(1) NUMBITS(2) [],
        /// Channel length (number of bits per audio channel)
        CHLEN OFFSET(0) NUMBITS(1) []
    ],
    pub I2SPR [
        /// Master clock output enable
        MCKOE OFFSET(9) NUMBITS(1) [],
        /// Odd factor for the prescaler
        ODD OFFSET(8) NUMBITS(1) [],
        /// I2S Linear prescaler
        I2SDIV OFFSET(0) NUMBITS(8) []
    ]
];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ClockPolarity {
    IdleLow,
    IdleHigh,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ClockPhase {
    SampleLeading,
    SampleTrailing,
}

/// `CR1.BR` value giving the fastest SCK not above `rate`, with the SCK
/// frequency it produces. The divider is `2 << BR`.
pub fn baud_rate_divider(pclk: u32, rate: u32) -> Result<(u32, u32), ErrorCode> {
    if rate == 0 {
        return Err(ErrorCode::INVAL);
    }
    for br in 0..8 {
        let sck = pclk >> (br + 1);
        if sck <= rate {
            return Ok((br, sck));
        }
    }
    Err(ErrorCode::INVAL)
}

pub struct Spi {
    registers: StaticRef<SpiRegisters>,
}

impl Spi {
    pub const fn new(registers: StaticRef<SpiRegisters>) -> Spi {
        Spi { registers }
    }

    /// Set up as master with software NSS and 8-bit frames. Returns the SCK
    /// frequency actually produced.
    pub fn init_master(
        &self,
        pclk: u32,
        rate: u32,
        polarity: ClockPolarity,
        phase: ClockPhase,
    ) -> Result<u32, ErrorCode> {
        let (br, sck) = baud_rate_divider(pclk, rate)?;

        self.registers.cr1.modify(CR1::SPE::CLEAR);
        self.registers.cr1.write(
            CR1::MSTR::SET
                + CR1::SSM::SET
                + CR1::SSI::SET
                + CR1::BR.val(br)
                + CR1::CPOL.val((polarity == ClockPolarity::IdleHigh) as u32)
                + CR1::CPHA.val((phase == ClockPhase::SampleTrailing) as u32),
        );
        // 8-bit data, RXNE as soon as one byte is in the FIFO
        self.registers
            .cr2
            .write(CR2::DS.val(0b0111) + CR2::FRXTH::SET);
        self.registers.cr1.modify(CR1::SPE::SET);
        Ok(sck)
    }

    pub fn is_busy(&self) -> bool {
        self.registers.sr.is_set(SR::BSY)
    }

    pub fn is_tx_empty(&self) -> bool {
        self.registers.sr.is_set(SR::TXE)
    }

    pub fn is_rx_ready(&self) -> bool {
        self.registers.sr.is_set(SR::RXNE)
    }

    pub fn disable(&self) {
        self.registers.cr1.modify(CR1::SPE::CLEAR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::{offset_of, size_of};

    #[test]
    fn register_offsets() {
        assert_eq!(offset_of!(SpiRegisters, sr), 0x08);
        assert_eq!(offset_of!(SpiRegisters, dr), 0x0c);
        assert_eq!(offset_of!(SpiRegisters, crcpr), 0x10);
        assert_eq!(offset_of!(SpiRegisters, i2scfgr), 0x1c);
        assert_eq!(offset_of!(SpiRegisters, i2spr), 0x20);
        assert_eq!(size_of::<SpiRegisters>(), 0x24);
    }

    #[test]
    fn fifo_fields() {
        assert_eq!(CR2::DS.shift, 8);
        assert_eq!(CR2::DS.mask, 0xf);
        assert_eq!(SR::FRLVL.shift, 9);
        assert_eq!(SR::FTLVL.shift, 11);
        assert_eq!(CR1::CRCL.shift, 11);
    }

    #[test]
    fn divider_selection() {
        assert_eq!(baud_rate_divider(72_000_000, 36_000_000), Ok((0, 36_000_000)));
        assert_eq!(baud_rate_divider(72_000_000, 1_000_000), Ok((6, 562_500)));
        assert_eq!(baud_rate_divider(72_000_000, 100_000), Err(ErrorCode::INVAL));
    }

    #[test]
    fn master_setup() {
        let regs: SpiRegisters = unsafe { core::mem::zeroed() };
        let spi = Spi::new(unsafe { StaticRef::new(&regs) });

        let sck = spi
            .init_master(8_000_000, 1_000_000, ClockPolarity::IdleHigh, ClockPhase::SampleLeading)
            .unwrap();
        assert_eq!(sck, 1_000_000);
        // MSTR | BR=2 | SSI | SSM | CPOL | SPE
        assert_eq!(regs.cr1.get(), (1 << 2) | (2 << 3) | (1 << 8) | (1 << 9) | (1 << 1) | (1 << 6));
        assert_eq!(regs.cr2.get(), (0b0111 << 8) | (1 << 12));
    }
}
