// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! SERCOM in USART mode with internal clock.
//!
//! ```rust,ignore
//! let sercom = sercom::SERCOMS[2];
//! mclk.enable_clock(sercom.clock);
//! gclk.enable_channel(sercom.core_channel, Generator::Gclk0)?;
//! let usart = Usart::new(sercom.usart_registers());
//! usart.configure(Parameters::new(115_200), 48_000_000)?;
//! ```

use chip_common::{ErrorCode, StaticRef};
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite};
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    pub UsartRegisters {
        /// Control A
        (0x00 => ctrla: ReadWrite<u32, CTRLA::Register>),
        /// Control B
        (0x04 => ctrlb: ReadWrite<u32, CTRLB::Register>),
        /// Control C
        (0x08 => ctrlc: ReadWrite<u32, CTRLC::Register>),
        /// Baud Rate
        (0x0c => baud: ReadWrite<u16, BAUD::Register>),
        /// Receive Pulse Length
        (0x0e => rxpl: ReadWrite<u8>),
        (0x0f => _reserved0),
        /// Interrupt Enable Clear
        (0x14 => intenclr: ReadWrite<u8, INT::Register>),
        (0x15 => _reserved1),
        /// Interrupt Enable Set
        (0x16 => intenset: ReadWrite<u8, INT::Register>),
        (0x17 => _reserved2),
        /// Interrupt Flag Status and Clear
        (0x18 => intflag: ReadWrite<u8, INT::Register>),
        (0x19 => _reserved3),
        /// Status
        (0x1a => status: ReadWrite<u16, STATUS::Register>),
        /// Synchronization Busy
        (0x1c => syncbusy: ReadOnly<u32, SYNCBUSY::Register>),
        /// Receive Error Count
        (0x20 => rxerrcnt: ReadOnly<u8>),
        (0x21 => _reserved4),
        /// Length
        (0x22 => length: ReadWrite<u16, LENGTH::Register>),
        (0x24 => _reserved5),
        /// Data
        (0x28 => data: ReadWrite<u32>),
        (0x2c => _reserved6),
        /// Debug Control
        (0x30 => dbgctrl: ReadWrite<u8>),
        (0x31 => _reserved7),
        (0x34 => @END),
    }
}

register_bitfields![u8,
    pub INT [
        /// Combined Error Interrupt
        ERROR OFFSET(7) NUMBITS(1) [],
        /// Receive Break Interrupt
        RXBRK OFFSET(5) NUMBITS(1) [],
        /// Clear To Send Input Change Interrupt
        CTSIC OFFSET(4) NUMBITS(1) [],
        /// Receive Start Interrupt
        RXS OFFSET(3) NUMBITS(1) [],
        /// Receive Complete Interrupt
        RXC OFFSET(2) NUMBITS(1) [],
        /// Transmit Complete Interrupt
        TXC OFFSET(1) NUMBITS(1) [],
        /// Data Register Empty Interrupt
        DRE OFFSET(0) NUMBITS(1) []
    ]
];

register_bitfields![u16,
    pub BAUD [
        /// Fractional part, in fractional sample modes
        FP OFFSET(13) NUMBITS(3) [],
        /// Integer part, in fractional sample modes
        BAUD OFFSET(0) NUMBITS(13) []
    ],
    pub STATUS [
        /// Maximum Number of Repetitions Reached
        ITER OFFSET(7) NUMBITS(1) [],
        /// Transmitter Empty
        TXE OFFSET(6) NUMBITS(1) [],
        /// Collision Detected
        COLL OFFSET(5) NUMBITS(1) [],
        /// Inconsistent Sync Field
        ISF OFFSET(4) NUMBITS(1) [],
        /// Clear To Send
        CTS OFFSET(3) NUMBITS(1) [],
        /// Buffer Overflow
        BUFOVF OFFSET(2) NUMBITS(1) [],
        /// Frame Error
        FERR OFFSET(1) NUMBITS(1) [],
        /// Parity Error
        PERR OFFSET(0) NUMBITS(1) []
    ],
    pub LENGTH [
        /// Data Length Enable
        LENEN OFFSET(8) NUMBITS(2) [],
        /// Data Length
        LEN OFFSET(0) NUMBITS(8) []
    ]
];

register_bitfields![u32,
    pub CTRLA [
        /// Data Order
        DORD OFFSET(30) NUMBITS(1) [
            MSB = 0,
            LSB = 1
        ],
        /// Clock Polarity
        CPOL OFFSET(29) NUMBITS(1) [],
        /// Communication Mode
        CMODE OFFSET(28) NUMBITS(1) [
            Asynchronous = 0,
            Synchronous = 1
        ],
        /// Frame Format
        FORM OFFSET(24) NUMBITS(4) [
            Usart = 0,
            UsartParity = 1,
            AutoBaud = 4,
            AutoBaudParity = 5
        ],
        /// Sample Adjustment
        SAMPA OFFSET(22) NUMBITS(2) [],
        /// Receive Data Pinout
        RXPO OFFSET(20) NUMBITS(2) [],
        /// Transmit Data Pinout
        TXPO OFFSET(16) NUMBITS(2) [],
        /// Sample
        SAMPR OFFSET(13) NUMBITS(3) [
            Arithmetic16x = 0,
            Fractional16x = 1,
            Arithmetic8x = 2,
            Fractional8x = 3,
            Arithmetic3x = 4
        ],
        /// Receive Data Invert
        RXINV OFFSET(10) NUMBITS(1) [],
        /// Transmit Data Invert
        TXINV OFFSET(9) NUMBITS(1) [],
        /// Immediate Buffer Overflow Notification
        IBON OFFSET(8) NUMBITS(1) [],
        /// Run during Standby
        RUNSTDBY OFFSET(7) NUMBITS(1) [],
        /// Operating Mode
        MODE OFFSET(2) NUMBITS(3) [
            USART_EXT_CLK = 0,
            USART_INT_CLK = 1,
            SPI_SLAVE = 2,
            SPI_MASTER = 3,
            I2C_SLAVE = 4,
            I2C_MASTER = 5
        ],
        /// Enable
        ENABLE OFFSET(1) NUMBITS(1) [],
        /// Software Reset
        SWRST OFFSET(0) NUMBITS(1) []
    ],
    pub CTRLB [
        /// LIN Command
        LINCMD OFFSET(24) NUMBITS(2) [],
        /// Receiver Enable
        RXEN OFFSET(17) NUMBITS(1) [],
        /// Transmitter Enable
        TXEN OFFSET(16) NUMBITS(1) [],
        /// Parity Mode
        PMODE OFFSET(13) NUMBITS(1) [
            Even = 0,
            Odd = 1
        ],
        /// Encoding Format
        ENC OFFSET(10) NUMBITS(1) [],
        /// Start of Frame Detection Enable
        SFDE OFFSET(9) NUMBITS(1) [],
        /// Collision Detection Enable
        COLDEN OFFSET(8) NUMBITS(1) [],
        /// Stop Bit Mode
        SBMODE OFFSET(6) NUMBITS(1) [
            One = 0,
            Two = 1
        ],
        /// Character Size
        CHSIZE OFFSET(0) NUMBITS(3) [
            Bits8 = 0,
            Bits9 = 1,
            Bits5 = 5,
            Bits6 = 6,
            Bits7 = 7
        ]
    ],
    pub CTRLC [
        /// Data 32 Bit
        DATA32B OFFSET(24) NUMBITS(2) [],
        /// Maximum Iterations
        MAXITER OFFSET(20) NUMBITS(3) [],
        /// Disable Successive NACK
        DSNACK OFFSET(17) NUMBITS(1) [],
        /// Inhibit Not Acknowledge
        INACK OFFSET(16) NUMBITS(1) [],
        /// LIN Master Header Delay
        HDRDLY OFFSET(10) NUMBITS(2) [],
        /// LIN Master Break Length
        BRKLEN OFFSET(8) NUMBITS(2) [],
        /// Guard Time
        GTIME OFFSET(0) NUMBITS(3) []
    ],
    pub SYNCBUSY [
        /// LENGTH Synchronization Busy
        LENGTH OFFSET(4) NUMBITS(1) [],
        /// RXERRCNT Synchronization Busy
        RXERRCNT OFFSET(3) NUMBITS(1) [],
        /// CTRLB Synchronization Busy
        CTRLB OFFSET(2) NUMBITS(1) [],
        /// SERCOM Enable Synchronization Busy
        ENABLE OFFSET(1) NUMBITS(1) [],
        /// Software Reset Synchronization Busy
        SWRST OFFSET(0) NUMBITS(1) []
    ]
];

/// Oversampling and baud generation mode.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SampleRate {
    Arithmetic16x,
    Fractional16x,
    Arithmetic8x,
    Fractional8x,
    Arithmetic3x,
}

impl SampleRate {
    pub const fn samples(&self) -> u64 {
        match self {
            SampleRate::Arithmetic16x | SampleRate::Fractional16x => 16,
            SampleRate::Arithmetic8x | SampleRate::Fractional8x => 8,
            SampleRate::Arithmetic3x => 3,
        }
    }

    pub const fn is_fractional(&self) -> bool {
        matches!(self, SampleRate::Fractional16x | SampleRate::Fractional8x)
    }
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

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CharSize {
    Bits5,
    Bits6,
    Bits7,
    Bits8,
    Bits9,
}

/// `TXPO`: which pads carry TxD and the flow-control signals.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TxPinout {
    /// TxD on PAD0
    Pad0 = 0,
    /// TxD on PAD0, RTS on PAD2, CTS on PAD3
    Pad0RtsCts = 2,
    /// TxD on PAD0, TE on PAD2
    Pad0Rs485 = 3,
}

/// `RXPO`: the pad carrying RxD.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RxPinout {
    Pad0 = 0,
    Pad1 = 1,
    Pad2 = 2,
    Pad3 = 3,
}

/// `BAUD` value in arithmetic mode:
/// BAUD = 65536 * (1 - S * f_baud / f_ref)
pub fn baud_arithmetic(fref: u32, baud_rate: u32, samples: u64) -> Result<u16, ErrorCode> {
    let scaled = samples * baud_rate as u64;
    if baud_rate == 0 || scaled > fref as u64 {
        return Err(ErrorCode::INVAL);
    }
    Ok((65536 - 65536 * scaled / fref as u64) as u16)
}

/// `BAUD` value in fractional mode: f_ref / (S * f_baud) split into a
/// 13-bit integer part and a 3-bit fraction in eighths.
pub fn baud_fractional(fref: u32, baud_rate: u32, samples: u64) -> Result<u16, ErrorCode> {
    let scaled = samples * baud_rate as u64;
    if baud_rate == 0 {
        return Err(ErrorCode::INVAL);
    }
    let eighths = fref as u64 * 8 / scaled;
    let integer = eighths / 8;
    if integer == 0 || integer > BAUD::BAUD.mask as u64 {
        return Err(ErrorCode::INVAL);
    }
    Ok((integer | ((eighths % 8) << BAUD::FP.shift)) as u16)
}

/// Frame, rate and pinout settings applied by [`Usart::configure`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Parameters {
    pub baud_rate: u32,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub char_size: CharSize,
    pub sample_rate: SampleRate,
    pub tx_pinout: TxPinout,
    pub rx_pinout: RxPinout,
}

impl Parameters {
    /// 8N1, 16x arithmetic oversampling, TxD on PAD0 and RxD on PAD1.
    pub const fn new(baud_rate: u32) -> Self {
        Parameters {
            baud_rate,
            parity: Parity::None,
            stop_bits: StopBits::One,
            char_size: CharSize::Bits8,
            sample_rate: SampleRate::Arithmetic16x,
            tx_pinout: TxPinout::Pad0,
            rx_pinout: RxPinout::Pad1,
        }
    }

    /// RxD cannot share a pad with TxD or with the flow-control signals.
    pub fn validate(&self) -> Result<(), ErrorCode> {
        match (self.tx_pinout, self.rx_pinout) {
            (_, RxPinout::Pad0) => Err(ErrorCode::INVAL),
            (TxPinout::Pad0RtsCts, RxPinout::Pad2 | RxPinout::Pad3) => Err(ErrorCode::INVAL),
            (TxPinout::Pad0Rs485, RxPinout::Pad2) => Err(ErrorCode::INVAL),
            _ => Ok(()),
        }
    }

    /// `BAUD` value for a core clock of `fref` Hz.
    pub fn baud(&self, fref: u32) -> Result<u16, ErrorCode> {
        let samples = self.sample_rate.samples();
        if self.sample_rate.is_fractional() {
            baud_fractional(fref, self.baud_rate, samples)
        } else {
            baud_arithmetic(fref, self.baud_rate, samples)
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

    /// Program frame format, pinout and baud rate, then enable the
    /// transmitter and receiver. These registers are enable-protected, so
    /// the SERCOM is disabled while they are written.
    pub fn configure(&self, params: Parameters, fref: u32) -> Result<(), ErrorCode> {
        params.validate()?;
        let baud = params.baud(fref)?;

        self.registers.ctrla.modify(CTRLA::ENABLE::CLEAR);

        let sampr = match params.sample_rate {
            SampleRate::Arithmetic16x => CTRLA::SAMPR::Arithmetic16x,
            SampleRate::Fractional16x => CTRLA::SAMPR::Fractional16x,
            SampleRate::Arithmetic8x => CTRLA::SAMPR::Arithmetic8x,
            SampleRate::Fractional8x => CTRLA::SAMPR::Fractional8x,
            SampleRate::Arithmetic3x => CTRLA::SAMPR::Arithmetic3x,
        };
        let form = match params.parity {
            Parity::None => CTRLA::FORM::Usart,
            Parity::Even | Parity::Odd => CTRLA::FORM::UsartParity,
        };
        self.registers.ctrla.write(
            CTRLA::MODE::USART_INT_CLK
                + CTRLA::CMODE::Asynchronous
                + CTRLA::DORD::LSB
                + CTRLA::TXPO.val(params.tx_pinout as u32)
                + CTRLA::RXPO.val(params.rx_pinout as u32)
                + sampr
                + form,
        );

        let chsize = match params.char_size {
            CharSize::Bits5 => CTRLB::CHSIZE::Bits5,
            CharSize::Bits6 => CTRLB::CHSIZE::Bits6,
            CharSize::Bits7 => CTRLB::CHSIZE::Bits7,
            CharSize::Bits8 => CTRLB::CHSIZE::Bits8,
            CharSize::Bits9 => CTRLB::CHSIZE::Bits9,
        };
        let pmode = match params.parity {
            Parity::Odd => CTRLB::PMODE::Odd,
            Parity::None | Parity::Even => CTRLB::PMODE::Even,
        };
        let sbmode = match params.stop_bits {
            StopBits::One => CTRLB::SBMODE::One,
            StopBits::Two => CTRLB::SBMODE::Two,
        };
        self.registers
            .ctrlb
            .write(chsize + pmode + sbmode + CTRLB::TXEN::SET + CTRLB::RXEN::SET);
        self.registers.baud.set(baud);

        self.registers.ctrla.modify(CTRLA::ENABLE::SET);
        Ok(())
    }

    pub fn disable(&self) {
        self.registers.ctrla.modify(CTRLA::ENABLE::CLEAR);
    }

    pub fn is_syncing(&self) -> bool {
        self.registers.syncbusy.get() != 0
    }

    pub fn is_tx_empty(&self) -> bool {
        self.registers.intflag.is_set(INT::DRE)
    }

    pub fn is_tx_complete(&self) -> bool {
        self.registers.intflag.is_set(INT::TXC)
    }

    pub fn is_rx_ready(&self) -> bool {
        self.registers.intflag.is_set(INT::RXC)
    }

    pub fn write_byte(&self, byte: u8) {
        self.registers.data.set(byte as u32);
    }

    pub fn read_byte(&self) -> u8 {
        self.registers.data.get() as u8
    }

    pub fn enable_rx_interrupt(&self) {
        self.registers.intenset.write(INT::RXC::SET);
    }

    pub fn disable_rx_interrupt(&self) {
        self.registers.intenclr.write(INT::RXC::SET);
    }

    pub fn enable_tx_interrupt(&self) {
        self.registers.intenset.write(INT::DRE::SET);
    }

    pub fn disable_tx_interrupt(&self) {
        self.registers.intenclr.write(INT::DRE::SET);
    }

    pub fn has_errors(&self) -> bool {
        self.registers.intflag.is_set(INT::ERROR)
    }

    /// Clear every receive error flag (parity, framing, overflow).
    pub fn clear_errors(&self) {
        self.registers
            .status
            .write(STATUS::PERR::SET + STATUS::FERR::SET + STATUS::BUFOVF::SET);
        self.registers.intflag.write(INT::ERROR::SET);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::{offset_of, size_of};

    #[test]
    fn register_offsets() {
        assert_eq!(offset_of!(UsartRegisters, baud), 0x0c);
        assert_eq!(offset_of!(UsartRegisters, rxpl), 0x0e);
        assert_eq!(offset_of!(UsartRegisters, intenclr), 0x14);
        assert_eq!(offset_of!(UsartRegisters, intenset), 0x16);
        assert_eq!(offset_of!(UsartRegisters, intflag), 0x18);
        assert_eq!(offset_of!(UsartRegisters, status), 0x1a);
        assert_eq!(offset_of!(UsartRegisters, syncbusy), 0x1c);
        assert_eq!(offset_of!(UsartRegisters, length), 0x22);
        assert_eq!(offset_of!(UsartRegisters, data), 0x28);
        assert_eq!(offset_of!(UsartRegisters, dbgctrl), 0x30);
        assert_eq!(size_of::<UsartRegisters>(), 0x34);
    }

    #[test]
    fn bitfields() {
        assert_eq!(CTRLA::MODE.mask << CTRLA::MODE.shift, 0x1c);
        assert_eq!(CTRLA::SAMPR.mask << CTRLA::SAMPR.shift, 0xe000);
        assert_eq!(CTRLA::FORM.mask << CTRLA::FORM.shift, 0x0f00_0000);
        assert_eq!(CTRLB::PMODE.shift, 13);
        assert_eq!(INT::ERROR.shift, 7);
    }

    #[test]
    fn arithmetic_baud() {
        assert_eq!(baud_arithmetic(48_000_000, 115_200, 16), Ok(63_020));
        assert_eq!(baud_arithmetic(48_000_000, 9_600, 16), Ok(65_327));
        assert_eq!(baud_arithmetic(48_000_000, 3_000_000, 16), Ok(0));
        assert_eq!(baud_arithmetic(48_000_000, 4_000_000, 16), Err(ErrorCode::INVAL));
        assert_eq!(baud_arithmetic(48_000_000, 0, 16), Err(ErrorCode::INVAL));
    }

    #[test]
    fn fractional_baud() {
        // 48 MHz / (16 * 9600) = 312.5
        assert_eq!(baud_fractional(48_000_000, 9_600, 16), Ok((4 << 13) | 312));
        // 48 MHz / (16 * 115200) = 26.04
        assert_eq!(baud_fractional(48_000_000, 115_200, 16), Ok(26));
        assert_eq!(baud_fractional(48_000_000, 4_000_000, 16), Err(ErrorCode::INVAL));
        assert_eq!(baud_fractional(120_000_000, 300, 16), Err(ErrorCode::INVAL));
    }

    #[test]
    fn configure_115200_8n1() {
        let regs: UsartRegisters = unsafe { core::mem::zeroed() };
        let usart = Usart::new(unsafe { StaticRef::new(&regs) });

        usart.configure(Parameters::new(115_200), 48_000_000).unwrap();
        assert_eq!(regs.ctrla.get(), 0x4010_0006);
        assert_eq!(regs.ctrlb.get(), 0x0003_0000);
        assert_eq!(regs.baud.get(), 63_020);
    }

    #[test]
    fn configure_odd_parity_two_stop() {
        let regs: UsartRegisters = unsafe { core::mem::zeroed() };
        let usart = Usart::new(unsafe { StaticRef::new(&regs) });
        let params = Parameters {
            parity: Parity::Odd,
            stop_bits: StopBits::Two,
            sample_rate: SampleRate::Fractional16x,
            tx_pinout: TxPinout::Pad0RtsCts,
            ..Parameters::new(9600)
        };

        usart.configure(params, 48_000_000).unwrap();
        assert_eq!(regs.ctrla.read(CTRLA::FORM), 1);
        assert_eq!(regs.ctrla.read(CTRLA::SAMPR), 1);
        assert_eq!(regs.ctrla.read(CTRLA::TXPO), 2);
        assert!(regs.ctrlb.is_set(CTRLB::PMODE));
        assert!(regs.ctrlb.is_set(CTRLB::SBMODE));
        assert_eq!(regs.baud.read(BAUD::BAUD), 312);
        assert_eq!(regs.baud.read(BAUD::FP), 4);
    }

    #[test]
    fn rejects_bad_pinout() {
        let regs: UsartRegisters = unsafe { core::mem::zeroed() };
        let usart = Usart::new(unsafe { StaticRef::new(&regs) });
        let params = Parameters {
            tx_pinout: TxPinout::Pad0RtsCts,
            rx_pinout: RxPinout::Pad3,
            ..Parameters::new(115_200)
        };
        assert_eq!(usart.configure(params, 48_000_000), Err(ErrorCode::INVAL));
        let params = Parameters {
            rx_pinout: RxPinout::Pad0,
            ..Parameters::new(115_200)
        };
        assert_eq!(usart.configure(params, 48_000_000), Err(ErrorCode::INVAL));
        assert_eq!(regs.ctrla.get(), 0);
    }
}
