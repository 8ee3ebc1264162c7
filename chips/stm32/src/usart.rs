// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Universal synchronous/asynchronous receiver transmitter (USART v2).
//!
//! USART1-3, UART4/5 on F3 and L4, and LPUART1 on L4 (without the
//! synchronous and smartcard bits), share this layout.

use crate::prescaler;
use chip_common::{ErrorCode, StaticRef};
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite, WriteOnly};
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    /// Universal synchronous asynchronous receiver transmitter
    pub UsartRegisters {
        /// Control register 1
        (0x00 => cr1: ReadWrite<u32, CR1::Register>),
        /// Control register 2
        (0x04 => cr2: ReadWrite<u32, CR2::Register>),
        /// Control register 3
        (0x08 => cr3: ReadWrite<u32, CR3::Register>),
        /// Baud rate register
        (0x0c => brr: ReadWrite<u32, BRR::Register>),
        /// Guard time and prescaler register
        (0x10 => gtpr: ReadWrite<u32, GTPR::Register>),
        /// Receiver timeout register
        (0x14 => rtor: ReadWrite<u32, RTOR::Register>),
        /// Request register
        (0x18 => rqr: WriteOnly<u32, RQR::Register>),
        /// Interrupt & status register
        (0x1c => isr: ReadOnly<u32, ISR::Register>),
        /// Interrupt flag clear register
        (0x20 => icr: WriteOnly<u32, ICR::Register>),
        /// Receive data register
        (0x24 => rdr: ReadOnly<u32, RDR::Register>),
        /// Transmit data register
        (0x28 => tdr: ReadWrite<u32, TDR::Register>),
        (0x2c => @END),
    }
}

register_bitfields![u32,
    pub CR1 [
        /// Word length bit 1
        M1 OFFSET(28) NUMBITS(1) [],
        /// End of Block interrupt enable
        EOBIE OFFSET(27) NUMBITS(1) [],
        /// Receiver timeout interrupt enable
        RTOIE OFFSET(26) NUMBITS(1) [],
        /// Driver Enable assertion time
        DEAT OFFSET(21) NUMBITS(5) [],
        /// Driver Enable de-assertion time
        DEDT OFFSET(16) NUMBITS(5) [],
        /// Oversampling mode
        OVER8 OFFSET(15) NUMBITS(1) [],
        /// Character match interrupt enable
        CMIE OFFSET(14) NUMBITS(1) [],
        /// Mute mode enable
        MME OFFSET(13) NUMBITS(1) [],
        /// Word length bit 0
        M0 OFFSET(12) NUMBITS(1) [],
        /// Receiver wakeup method
        WAKE OFFSET(11) NUMBITS(1) [],
        /// Parity control enable
        PCE OFFSET(10) NUMBITS(1) [],
        /// Parity selection
        PS OFFSET(9) NUMBITS(1) [],
        /// PE interrupt enable
        PEIE OFFSET(8) NUMBITS(1) [],
        /// TXE interrupt enable
        TXEIE OFFSET(7) NUMBITS(1) [],
        /// Transmission complete interrupt enable
        TCIE OFFSET(6) NUMBITS(1) [],
        /// RXNE interrupt enable
        RXNEIE OFFSET(5) NUMBITS(1) [],
        /// IDLE interrupt enable
        IDLEIE OFFSET(4) NUMBITS(1) [],
        /// Transmitter enable
        TE OFFSET(3) NUMBITS(1) [],
        /// Receiver enable
        RE OFFSET(2) NUMBITS(1) [],
        /// USART enable in Stop mode
        UESM OFFSET(1) NUMBITS(1) [],
        /// USART enable
        UE OFFSET(0) NUMBITS(1) []
    ],
    pub CR2 [
        /// Address of the USART node
        ADD OFFSET(24) NUMBITS(8) [],
        /// Receiver timeout enable
        RTOEN OFFSET(23) NUMBITS(1) [],
        /// Auto baud rate mode
        ABRMOD OFFSET(21) NUMBITS(2) [],
        /// Auto baud rate enable
        ABREN OFFSET(20) NUMBITS(1) [],
        /// Most significant bit first
        MSBFIRST OFFSET(19) NUMBITS(1) [],
        /// Binary data inversion
        DATAINV OFFSET(18) NUMBITS(1) [],
        /// TX pin active level inversion
        TXINV OFFSET(17) NUMBITS(1) [],
        /// RX pin active level inversion
        RXINV OFFSET(16) NUMBITS(1) [],
        /// Swap TX/RX pins
        SWAP OFFSET(15) NUMBITS(1) [],
        /// LIN mode enable
        LINEN OFFSET(14) NUMBITS(1) [],
        /// STOP bits
        STOP OFFSET(12) NUMBITS(2) [
            Stop1 = 0b00,
            Stop0_5 = 0b01,
            Stop2 = 0b10,
            Stop1_5 = 0b11
        ],
        /// Clock enable
        CLKEN OFFSET(11) NUMBITS(1) [],
        /// Clock polarity
        CPOL OFFSET(10) NUMBITS(1) [],
        /// Clock phase
        CPHA OFFSET(9) NUMBITS(1) [],
        /// Last bit clock pulse
        LBCL OFFSET(8) NUMBITS(1) [],
        /// LIN break detection interrupt enable
        LBDIE OFFSET(6) NUMBITS(1) [],
        /// LIN break detection length
        LBDL OFFSET(5) NUMBITS(1) [],
        /// 7-bit Address Detection/4-bit Address Detection
        ADDM7 OFFSET(4) NUMBITS(1) []
    ],
    pub CR3 [
        /// Transmission complete before guard time interrupt enable (L4)
        TCBGTIE OFFSET(24) NUMBITS(1) [],
        /// USART Clock Enable in Stop mode (L4)
        UCESM OFFSET(23) NUMBITS(1) [],
        /// Wakeup from Stop mode interrupt enable
        WUFIE OFFSET(22) NUMBITS(1) [],
        /// Wakeup from Stop mode interrupt flag selection
        WUS OFFSET(20) NUMBITS(2) [],
        /// Smartcard auto-retry count
        SCARCNT OFFSET(17) NUMBITS(3) [],
        /// Driver enable polarity selection
        DEP OFFSET(15) NUMBITS(1) [],
        /// Driver enable mode
        DEM OFFSET(14) NUMBITS(1) [],
        /// DMA Disable on Reception Error
        DDRE OFFSET(13) NUMBITS(1) [],
        /// Overrun Disable
        OVRDIS OFFSET(12) NUMBITS(1) [],
        /// One sample bit method enable
        ONEBIT OFFSET(11) NUMBITS(1) [],
        /// CTS interrupt enable
        CTSIE OFFSET(10) NUMBITS(1) [],
        /// CTS enable
        CTSE OFFSET(9) NUMBITS(1) [],
        /// RTS enable
        RTSE OFFSET(8) NUMBITS(1) [],
        /// DMA enable transmitter
        DMAT OFFSET(7) NUMBITS(1) [],
        /// DMA enable receiver
        DMAR OFFSET(6) NUMBITS(1) [],
        /// Smartcard mode enable
        SCEN OFFSET(5) NUMBITS(1) [],
        /// Smartcard NACK enable
        NACK OFFSET(4) NUMBITS(1) [],
        /// Half-duplex selection
        HDSEL OFFSET(3) NUMBITS(1) [],
        /// IrDA low-power
        IRLP OFFSET(2) NUMBITS(1) [],
        /// IrDA mode enable
        IREN OFFSET(1) NUMBITS(1) [],
        /// Error interrupt enable
        EIE OFFSET(0) NUMBITS(1) []
    ],
    pub BRR [
        /// Mantissa of USARTDIV
        DIV_Mantissa OFFSET(4) NUMBITS(12) [],
        /// Fraction of USARTDIV
        DIV_Fraction OFFSET(0) NUMBITS(4) []
    ],
    pub GTPR [
        /// Guard time value
        GT OFFSET(8) NUMBITS(8) [],
        /// Prescaler value
        PSC OFFSET(0) NUMBITS(8) []
    ],
    pub RTOR [
        /// Block Length
        BLEN OFFSET(24) NUMBITS(8) [],
        /// Receiver timeout value
        RTO OFFSET(0) NUMBITS(24) []
    ],
    pub RQR [
        /// Transmit data flush request
        TXFRQ OFFSET(4) NUMBITS(1) [],
        /// Receive data flush request
        RXFRQ OFFSET(3) NUMBITS(1) [],
        /// Mute mode request
        MMRQ OFFSET(2) NUMBITS(1) [],
        /// Send break request
        SBKRQ OFFSET(1) NUMBITS(1) [],
        /// Auto baud rate request
        ABRRQ OFFSET(0) NUMBITS(1) []
    ],
    pub ISR [
        /// Transmission complete before guard time completion (L4)
        TCBGT OFFSET(25) NUMBITS(1) [],
        /// Receive enable acknowledge flag
        REACK OFFSET(22) NUMBITS(1) [],
        /// Transmit enable acknowledge flag
        TEACK OFFSET(21) NUMBITS(1) [],
        /// Wakeup from Stop mode flag
        WUF OFFSET(20) NUMBITS(1) [],
        /// Receiver wakeup from Mute mode
        RWU OFFSET(19) NUMBITS(1) [],
        /// Send break flag
        SBKF OFFSET(18) NUMBITS(1) [],
        /// Character match flag
        CMF OFFSET(17) NUMBITS(1) [],
        /// Busy flag
        BUSY OFFSET(16) NUMBITS(1) [],
        /// Auto baud rate flag
        ABRF OFFSET(15) NUMBITS(1) [],
        /// Auto baud rate error
        ABRE OFFSET(14) NUMBITS(1) [],
        /// End of block flag
        EOBF OFFSET(12) NUMBITS(1) [],
        /// Receiver timeout
        RTOF OFFSET(11) NUMBITS(1) [],
        /// CTS flag
        CTS OFFSET(10) NUMBITS(1) [],
        /// CTS interrupt flag
        CTSIF OFFSET(9) NUMBITS(1) [],
        /// LIN break detection flag
        LBDF OFFSET(8) NUMBITS(1) [],
        /// Transmit data register empty
        TXE OFFSET(7) NUMBITS(1) [],
        /// Transmission complete
        TC OFFSET(6) NUMBITS(1) [],
        /// Read data register not empty
        RXNE OFFSET(5) NUMBITS(1) [],
        /// Idle line detected
        IDLE OFFSET(4) NUMBITS(1) [],
        /// Overrun error
        ORE OFFSET(3) NUMBITS(1) [],
        /// Noise detected flag
        NF OFFSET(2) NUMBITS(1) [],
        /// Framing error
        FE OFFSET(1) NUMBITS(1) [],
        /// Parity error
        PE OFFSET(0) NUMBITS(1) []
    ],
    pub ICR [
        /// Wakeup from Stop mode clear flag
        WUCF OFFSET(20) NUMBITS(1) [],
        /// Character match clear flag
        CMCF OFFSET(17) NUMBITS(1) [],
        /// End of block clear flag
        EOBCF OFFSET(12) NUMBITS(1) [],
        /// Receiver timeout clear flag
        RTOCF OFFSET(11) NUMBITS(1) [],
        /// CTS clear flag
        CTSCF OFFSET(9) NUMBITS(1) [],
        /// LIN break detection clear flag
        LBDCF OFFSET(8) NUMBITS(1) [],
        /// Transmission complete before guard time clear flag (L4)
        TCBGTCF OFFSET(7) NUMBITS(1) [],
        /// Transmission complete clear flag
        TCCF OFFSET(6) NUMBITS(1) [],
        /// Idle line detected clear flag
        IDLECF OFFSET(4) NUMBITS(1) [],
        /// Overrun error clear flag
        ORECF OFFSET(3) NUMBITS(1) [],
        /// Noise detected clear flag
        NCF OFFSET(2) NUMBITS(1) [],
        /// Framing error clear flag
        FECF OFFSET(1) NUMBITS(1) [],
        /// Parity error clear flag
        PECF OFFSET(0) NUMBITS(1) []
    ],
    pub RDR [
        /// Receive data value
        RDR OFFSET(0) NUMBITS(9) []
    ],
    pub TDR [
        /// Transmit data value
        TDR OFFSET(0) NUMBITS(9) []
    ]
];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Oversampling {
    By16,
    By8,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Parity {
    None,
    Even,
    Odd,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StopBits {
    One,
    Two,
}

/// Frame and rate settings applied by [`Usart::configure`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Parameters {
    pub baud_rate: u32,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub oversampling: Oversampling,
}

impl Parameters {
    /// 8N1, 16x oversampling.
    pub const fn new(baud_rate: u32) -> Self {
        Parameters {
            baud_rate,
            parity: Parity::None,
            stop_bits: StopBits::One,
            oversampling: Oversampling::By16,
        }
    }

    /// `BRR` value for a USART whose kernel clock runs at `pclk` Hz.
    pub fn brr(&self, pclk: u32) -> Result<u32, ErrorCode> {
        match self.oversampling {
            Oversampling::By16 => prescaler::usart_div_sampling16(pclk, self.baud_rate),
            Oversampling::By8 => prescaler::usart_div_sampling8(pclk, self.baud_rate),
        }
    }
}

pub struct Usart {
    registers: StaticRef<UsartRegisters>,
}

impl Usart {
    pub const fn new(registers: StaticRef<UsartRegisters>) -> Usart {
        Usart { registers }
    }

    /// Program frame format and baud rate, then enable the transmitter and
    /// receiver. The USART is disabled while `CR1` and `BRR` are written.
    pub fn configure(&self, params: Parameters, pclk: u32) -> Result<(), ErrorCode> {
        let brr = params.brr(pclk)?;

        self.registers.cr1.modify(CR1::UE::CLEAR);

        // With parity on, the parity bit takes the place of the 8th data bit
        // unless M0 selects 9-bit words.
        let parity = match params.parity {
            Parity::None => CR1::PCE::CLEAR + CR1::M0::CLEAR,
            Parity::Even => CR1::PCE::SET + CR1::PS::CLEAR + CR1::M0::SET,
            Parity::Odd => CR1::PCE::SET + CR1::PS::SET + CR1::M0::SET,
        };
        let over8 = match params.oversampling {
            Oversampling::By16 => CR1::OVER8::CLEAR,
            Oversampling::By8 => CR1::OVER8::SET,
        };
        let stop = match params.stop_bits {
            StopBits::One => CR2::STOP::Stop1,
            StopBits::Two => CR2::STOP::Stop2,
        };

        self.registers.cr2.modify(stop);
        self.registers.brr.set(brr);
        self.registers
            .cr1
            .modify(parity + over8 + CR1::M1::CLEAR + CR1::TE::SET + CR1::RE::SET);
        self.registers.cr1.modify(CR1::UE::SET);
        Ok(())
    }

    pub fn disable(&self) {
        self.registers.cr1.modify(CR1::UE::CLEAR);
    }

    pub fn is_tx_empty(&self) -> bool {
        self.registers.isr.is_set(ISR::TXE)
    }

    pub fn is_rx_ready(&self) -> bool {
        self.registers.isr.is_set(ISR::RXNE)
    }

    pub fn write_byte(&self, byte: u8) {
        self.registers.tdr.write(TDR::TDR.val(byte as u32));
    }

    pub fn read_byte(&self) -> u8 {
        self.registers.rdr.read(RDR::RDR) as u8
    }

    /// Clear every error flag (parity, framing, noise, overrun).
    pub fn clear_errors(&self) {
        self.registers
            .icr
            .write(ICR::PECF::SET + ICR::FECF::SET + ICR::NCF::SET + ICR::ORECF::SET);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::{offset_of, size_of};

    #[test]
    fn register_offsets() {
        assert_eq!(offset_of!(UsartRegisters, brr), 0x0c);
        assert_eq!(offset_of!(UsartRegisters, rqr), 0x18);
        assert_eq!(offset_of!(UsartRegisters, isr), 0x1c);
        assert_eq!(offset_of!(UsartRegisters, icr), 0x20);
        assert_eq!(offset_of!(UsartRegisters, rdr), 0x24);
        assert_eq!(offset_of!(UsartRegisters, tdr), 0x28);
        assert_eq!(size_of::<UsartRegisters>(), 0x2c);
    }

    #[test]
    fn status_bits() {
        assert_eq!(ISR::TXE.shift, 7);
        assert_eq!(ISR::TEACK.shift, 21);
        assert_eq!(ISR::REACK.shift, 22);
        assert_eq!(CR1::OVER8.shift, 15);
        assert_eq!(CR1::M1.shift, 28);
        assert_eq!(CR2::STOP.mask, 0b11);
        assert_eq!(CR2::STOP.shift, 12);
    }

    #[test]
    fn configure_115200_8n1() {
        let regs: UsartRegisters = unsafe { core::mem::zeroed() };
        let usart = Usart::new(unsafe { StaticRef::new(&regs) });

        usart.configure(Parameters::new(115_200), 36_000_000).unwrap();
        // 36 MHz / 115200 = 312.5 -> 313
        assert_eq!(regs.brr.get(), 313);
        assert_eq!(regs.cr1.get(), (1 << 0) | (1 << 2) | (1 << 3));
        assert_eq!(regs.cr2.get(), 0);
    }

    #[test]
    fn configure_even_parity_two_stop() {
        let regs: UsartRegisters = unsafe { core::mem::zeroed() };
        let usart = Usart::new(unsafe { StaticRef::new(&regs) });
        let params = Parameters {
            parity: Parity::Even,
            stop_bits: StopBits::Two,
            ..Parameters::new(9600)
        };

        usart.configure(params, 8_000_000).unwrap();
        assert!(regs.cr1.is_set(CR1::PCE));
        assert!(regs.cr1.is_set(CR1::M0));
        assert!(!regs.cr1.is_set(CR1::PS));
        assert_eq!(regs.cr2.read(CR2::STOP), 0b10);
    }

    #[test]
    fn rejects_unreachable_rate() {
        let regs: UsartRegisters = unsafe { core::mem::zeroed() };
        let usart = Usart::new(unsafe { StaticRef::new(&regs) });
        assert_eq!(
            usart.configure(Parameters::new(4_000_000), 8_000_000),
            Err(ErrorCode::INVAL)
        );
        assert_eq!(regs.cr1.get(), 0);
    }
}
