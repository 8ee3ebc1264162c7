// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Inter-integrated circuit interface (I2C v2, with `TIMINGR`).

use chip_common::{ErrorCode, StaticRef};
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite, WriteOnly};
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    /// Inter-integrated circuit
    pub I2CRegisters {
        /// Control register 1
        (0x00 => cr1: ReadWrite<u32, CR1::Register>),
        /// Control register 2
        (0x04 => cr2: ReadWrite<u32, CR2::Register>),
        /// Own address register 1
        (0x08 => oar1: ReadWrite<u32, OAR1::Register>),
        /// Own address register 2
        (0x0c => oar2: ReadWrite<u32, OAR2::Register>),
        /// Timing register
        (0x10 => timingr: ReadWrite<u32, TIMINGR::Register>),
        /// Timeout register
        (0x14 => timeoutr: ReadWrite<u32, TIMEOUTR::Register>),
        /// Interrupt and Status register
        (0x18 => isr: ReadWrite<u32, ISR::Register>),
        /// Interrupt clear register
        (0x1c => icr: WriteOnly<u32, ICR::Register>),
        /// PEC register
        (0x20 => pecr: ReadOnly<u32, PECR::Register>),
        /// Receive data register
        (0x24 => rxdr: ReadOnly<u32, RXDR::Register>),
        /// Transmit data register
        (0x28 => txdr: ReadWrite<u32, TXDR::Register>),
        (0x2c => @END),
    }
}

register_bitfields![u32,
    pub CR1 [
        /// PEC enable
        PECEN OFFSET(23) NUMBITS(1) [],
        /// SMBus alert enable
        ALERTEN OFFSET(22) NUMBITS(1) [],
        /// SMBus Device Default address enable
        SMBDEN OFFSET(21) NUMBITS(1) [],
        /// SMBus Host address enable
        SMBHEN OFFSET(20) NUMBITS(1) [],
        /// General call enable
        GCEN OFFSET(19) NUMBITS(1) [],
        /// Wakeup from Stop mode enable
        WUPEN OFFSET(18) NUMBITS(1) [],
        /// Clock stretching disable
        NOSTRETCH OFFSET(17) NUMBITS(1) [],
        /// Slave byte control
        SBC OFFSET(16) NUMBITS(1) [],
        /// DMA reception requests enable
        RXDMAEN OFFSET(15) NUMBITS(1) [],
        /// DMA transmission requests enable
        TXDMAEN OFFSET(14) NUMBITS(1) [],
        /// Analog noise filter OFF
        ANFOFF OFFSET(12) NUMBITS(1) [],
        /// Digital noise filter
        DNF OFFSET(8) NUMBITS(4) [],
        /// Error interrupts enable
        ERRIE OFFSET(7) NUMBITS(1) [],
        /// Transfer Complete interrupt enable
        TCIE OFFSET(6) NUMBITS(1) [],
        /// STOP detection Interrupt enable
        STOPIE OFFSET(5) NUMBITS(1) [],
        /// Not acknowledge received Interrupt enable
        NACKIE OFFSET(4) NUMBITS(1) [],
        /// Address match Interrupt enable (slave only)
        ADDRIE OFFSET(3) NUMBITS(1) [],
        /// RX Interrupt enable
        RXIE OFFSET(2) NUMBITS(1) [],
        /// TX Interrupt enable
        TXIE OFFSET(1) NUMBITS(1) [],
        /// Peripheral enable
        PE OFFSET(0) NUMBITS(1) []
    ],
    pub CR2 [
        /// Packet error checking byte
        PECBYTE OFFSET(26) NUMBITS(1) [],
        /// Automatic end mode (master mode)
        AUTOEND OFFSET(25) NUMBITS(1) [],
        /// NBYTES reload mode
        RELOAD OFFSET(24) NUMBITS(1) [],
        /// Number of bytes
        NBYTES OFFSET(16) NUMBITS(8) [],
        /// NACK generation (slave mode)
        NACK OFFSET(15) NUMBITS(1) [],
        /// Stop generation (master mode)
        STOP OFFSET(14) NUMBITS(1) [],
        /// Start generation
        START OFFSET(13) NUMBITS(1) [],
        /// 10-bit address header only read direction (master receiver mode)
        HEAD10R OFFSET(12) NUMBITS(1) [],
        /// 10-bit addressing mode (master mode)
        ADD10 OFFSET(11) NUMBITS(1) [],
        /// Transfer direction (master mode)
        RD_WRN OFFSET(10) NUMBITS(1) [],
        /// Slave address bit (master mode)
        SADD OFFSET(0) NUMBITS(10) []
    ],
    pub OAR1 [
        /// Own Address 1 enable
        OA1EN OFFSET(15) NUMBITS(1) [],
        /// Own Address 1 10-bit mode
        OA1MODE OFFSET(10) NUMBITS(1) [],
        /// Interface address
        OA1 OFFSET(0) NUMBITS(10) []
    ],
    pub OAR2 [
        /// Own Address 2 enable
        OA2EN OFFSET(15) NUMBITS(1) [],
        /// Own Address 2 masks
        OA2MSK OFFSET(8) NUMBITS(3) [],
        /// Interface address
        OA2 OFFSET(1) NUMBITS(7) []
    ],
    pub TIMINGR [
        /// Timing prescaler
        PRESC OFFSET(28) NUMBITS(4) [],
        /// Data setup time
        SCLDEL OFFSET(20) NUMBITS(4) [],
        /// Data hold time
        SDADEL OFFSET(16) NUMBITS(4) [],
        /// SCL high period (master mode)
        SCLH OFFSET(8) NUMBITS(8) [],
        /// SCL low period (master mode)
        SCLL OFFSET(0) NUMBITS(8) []
    ],
    pub TIMEOUTR [
        /// Extended clock timeout enable
        TEXTEN OFFSET(31) NUMBITS(1) [],
        /// Bus timeout B
        TIMEOUTB OFFSET(16) NUMBITS(12) [],
        /// Clock timeout enable
        TIMOUTEN OFFSET(15) NUMBITS(1) [],
        /// Idle clock timeout detection
        TIDLE OFFSET(12) NUMBITS(1) [],
        /// Bus timeout A
        TIMEOUTA OFFSET(0) NUMBITS(12) []
    ],
    pub ISR [
        /// Address match code (Slave mode)
        ADDCODE OFFSET(17) NUMBITS(7) [],
        /// Transfer direction (Slave mode)
        DIR OFFSET(16) NUMBITS(1) [],
        /// Bus busy
        BUSY OFFSET(15) NUMBITS(1) [],
        /// SMBus alert
        ALERT OFFSET(13) NUMBITS(1) [],
        /// Timeout or t_low detection flag
        TIMEOUT OFFSET(12) NUMBITS(1) [],
        /// PEC Error in reception
        PECERR OFFSET(11) NUMBITS(1) [],
        /// Overrun/Underrun (slave mode)
        OVR OFFSET(10) NUMBITS(1) [],
        /// Arbitration lost
        ARLO OFFSET(9) NUMBITS(1) [],
        /// Bus error
        BERR OFFSET(8) NUMBITS(1) [],
        /// Transfer Complete Reload
        TCR OFFSET(7) NUMBITS(1) [],
        /// Transfer Complete (master mode)
        TC OFFSET(6) NUMBITS(1) [],
        /// Stop detection flag
        STOPF OFFSET(5) NUMBITS(1) [],
        /// Not acknowledge received flag
        NACKF OFFSET(4) NUMBITS(1) [],
        /// Address matched (slave mode)
        ADDR OFFSET(3) NUMBITS(1) [],
        /// Receive data register not empty (receivers)
        RXNE OFFSET(2) NUMBITS(1) [],
        /// Transmit interrupt status (transmitters)
        TXIS OFFSET(1) NUMBITS(1) [],
        /// Transmit data register empty (transmitters)
        TXE OFFSET(0) NUMBITS(1) []
    ],
    pub ICR [
        /// Alert flag clear
        ALERTCF OFFSET(13) NUMBITS(1) [],
        /// Timeout detection flag clear
        TIMOUTCF OFFSET(12) NUMBITS(1) [],
        /// PEC Error flag clear
        PECCF OFFSET(11) NUMBITS(1) [],
        /// Overrun/Underrun flag clear
        OVRCF OFFSET(10) NUMBITS(1) [],
        /// Arbitration lost flag clear
        ARLOCF OFFSET(9) NUMBITS(1) [],
        /// Bus error flag clear
        BERRCF OFFSET(8) NUMBITS(1) [],
        /// Stop detection flag clear
        STOPCF OFFSET(5) NUMBITS(1) [],
        /// Not Acknowledge flag clear
        NACKCF OFFSET(4) NUMBITS(1) [],
        /// Address Matched flag clear
        ADDRCF OFFSET(3) NUMBITS(1) []
    ],
    pub PECR [
        /// Packet error checking register
        PEC OFFSET(0) NUMBITS(8) []
    ],
    pub RXDR [
        /// 8-bit receive data
        RXDATA OFFSET(0) NUMBITS(8) []
    ],
    pub TXDR [
        /// 8-bit transmit data
        TXDATA OFFSET(0) NUMBITS(8) []
    ]
];

/// Standard bus speeds.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Speed {
    Standard100k,
    Fast400k,
}

impl Speed {
    /// `TIMINGR` for an 8 MHz kernel clock (HSI on F3), from the timing
    /// examples in the reference manual.
    pub fn timing_8mhz(self) -> u32 {
        match self {
            // PRESC=1 SCLDEL=4 SDADEL=2 SCLH=0x0F SCLL=0x13
            Speed::Standard100k => 0x1042_0F13,
            // PRESC=0 SCLDEL=3 SDADEL=1 SCLH=0x03 SCLL=0x09
            Speed::Fast400k => 0x0031_0309,
        }
    }
}

pub struct I2C {
    registers: StaticRef<I2CRegisters>,
}

impl I2C {
    pub const fn new(registers: StaticRef<I2CRegisters>) -> I2C {
        I2C { registers }
    }

    /// `TIMINGR` may only be written while the peripheral is disabled.
    pub fn set_speed(&self, speed: Speed) {
        self.registers.cr1.modify(CR1::PE::CLEAR);
        self.registers.timingr.set(speed.timing_8mhz());
        self.registers.cr1.modify(CR1::PE::SET);
    }

    /// Program `CR2` for a master transfer of `len` bytes to the 7-bit
    /// address `addr` and generate START. STOP follows automatically.
    pub fn start_transfer(&self, addr: u8, len: usize, read: bool) -> Result<(), ErrorCode> {
        if addr > 0x7f {
            return Err(ErrorCode::INVAL);
        }
        if len > 255 {
            return Err(ErrorCode::SIZE);
        }
        self.registers.cr2.write(
            CR2::SADD.val((addr as u32) << 1)
                + CR2::RD_WRN.val(read as u32)
                + CR2::NBYTES.val(len as u32)
                + CR2::AUTOEND::SET
                + CR2::START::SET,
        );
        Ok(())
    }

    pub fn is_busy(&self) -> bool {
        self.registers.isr.is_set(ISR::BUSY)
    }

    pub fn clear_errors(&self) {
        self.registers.icr.write(
            ICR::NACKCF::SET + ICR::BERRCF::SET + ICR::ARLOCF::SET + ICR::OVRCF::SET,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::{offset_of, size_of};

    #[test]
    fn register_offsets() {
        assert_eq!(offset_of!(I2CRegisters, timingr), 0x10);
        assert_eq!(offset_of!(I2CRegisters, isr), 0x18);
        assert_eq!(offset_of!(I2CRegisters, icr), 0x1c);
        assert_eq!(offset_of!(I2CRegisters, rxdr), 0x24);
        assert_eq!(offset_of!(I2CRegisters, txdr), 0x28);
        assert_eq!(size_of::<I2CRegisters>(), 0x2c);
    }

    #[test]
    fn timing_fields() {
        let timing = Speed::Standard100k.timing_8mhz();
        assert_eq!((timing >> TIMINGR::PRESC.shift) & TIMINGR::PRESC.mask, 1);
        assert_eq!((timing >> TIMINGR::SCLDEL.shift) & TIMINGR::SCLDEL.mask, 4);
        assert_eq!((timing >> TIMINGR::SDADEL.shift) & TIMINGR::SDADEL.mask, 2);
        assert_eq!((timing >> TIMINGR::SCLH.shift) & TIMINGR::SCLH.mask, 0x0f);
        assert_eq!((timing >> TIMINGR::SCLL.shift) & TIMINGR::SCLL.mask, 0x13);
    }

    #[test]
    fn master_read_request() {
        let regs: I2CRegisters = unsafe { core::mem::zeroed() };
        let i2c = I2C::new(unsafe { StaticRef::new(&regs) });

        i2c.start_transfer(0x48, 2, true).unwrap();
        assert_eq!(
            regs.cr2.get(),
            (0x48 << 1) | (1 << 10) | (2 << 16) | (1 << 25) | (1 << 13)
        );
        assert_eq!(i2c.start_transfer(0x80, 1, false), Err(ErrorCode::INVAL));
        assert_eq!(i2c.start_transfer(0x10, 256, false), Err(ErrorCode::SIZE));
    }
}
