// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! General-purpose I/O ports.
//!
//! Ports A..H share one register layout on F3 and L4. `ASCR` only exists on
//! the STM32L47x/L48x; on F3 parts that word is reserved and reads as zero.

use chip_common::StaticRef;
use tock_registers::fields::Field;
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite, WriteOnly};
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    /// General-purpose I/Os
    pub GpioRegisters {
        /// GPIO port mode register
        (0x00 => moder: ReadWrite<u32, MODER::Register>),
        /// GPIO port output type register
        (0x04 => otyper: ReadWrite<u32, OTYPER::Register>),
        /// GPIO port output speed register
        (0x08 => ospeedr: ReadWrite<u32, OSPEEDR::Register>),
        /// GPIO port pull-up/pull-down register
        (0x0c => pupdr: ReadWrite<u32, PUPDR::Register>),
        /// GPIO port input data register
        (0x10 => idr: ReadOnly<u32, IDR::Register>),
        /// GPIO port output data register
        (0x14 => odr: ReadWrite<u32, ODR::Register>),
        /// GPIO port bit set/reset register
        (0x18 => bsrr: WriteOnly<u32, BSRR::Register>),
        /// GPIO port configuration lock register
        (0x1c => lckr: ReadWrite<u32, LCKR::Register>),
        /// GPIO alternate function low register
        (0x20 => afrl: ReadWrite<u32, AFRL::Register>),
        /// GPIO alternate function high register
        (0x24 => afrh: ReadWrite<u32, AFRH::Register>),
        /// GPIO port bit reset register
        (0x28 => brr: WriteOnly<u32, BRR::Register>),
        /// GPIO port analog switch control register (L47x/L48x)
        (0x2c => ascr: ReadWrite<u32, ASCR::Register>),
        (0x30 => @END),
    }
}

register_bitfields![u32,
    pub MODER [
        MODER0 OFFSET(0) NUMBITS(2) [
            Input = 0b00,
            Output = 0b01,
            AlternateFunction = 0b10,
            Analog = 0b11
        ],
        MODER1 OFFSET(2) NUMBITS(2) [
            Input = 0b00,
            Output = 0b01,
            AlternateFunction = 0b10,
            Analog = 0b11
        ],
        MODER2 OFFSET(4) NUMBITS(2) [
            Input = 0b00,
            Output = 0b01,
            AlternateFunction = 0b10,
            Analog = 0b11
        ],
        MODER3 OFFSET(6) NUMBITS(2) [
            Input = 0b00,
            Output = 0b01,
            AlternateFunction = 0b10,
            Analog = 0b11
        ],
        MODER4 OFFSET(8) NUMBITS(2) [
            Input = 0b00,
            Output = 0b01,
            AlternateFunction = 0b10,
            Analog = 0b11
        ],
        MODER5 OFFSET(10) NUMBITS(2) [
            Input = 0b00,
            Output = 0b01,
            AlternateFunction = 0b10,
            Analog = 0b11
        ],
        MODER6 OFFSET(12) NUMBITS(2) [
            Input = 0b00,
            Output = 0b01,
            AlternateFunction = 0b10,
            Analog = 0b11
        ],
        MODER7 OFFSET(14) NUMBITS(2) [
            Input = 0b00,
            Output = 0b01,
            AlternateFunction = 0b10,
            Analog = 0b11
        ],
        MODER8 OFFSET(16) NUMBITS(2) [
            Input = 0b00,
            Output = 0b01,
            AlternateFunction = 0b10,
            Analog = 0b11
        ],
        MODER9 OFFSET(18) NUMBITS(2) [
            Input = 0b00,
            Output = 0b01,
            AlternateFunction = 0b10,
            Analog = 0b11
        ],
        MODER10 OFFSET(20) NUMBITS(2) [
            Input = 0b00,
            Output = 0b01,
            AlternateFunction = 0b10,
            Analog = 0b11
        ],
        MODER11 OFFSET(22) NUMBITS(2) [
            Input = 0b00,
            Output = 0b01,
            AlternateFunction = 0b10,
            Analog = 0b11
        ],
        MODER12 OFFSET(24) NUMBITS(2) [
            Input = 0b00,
            Output = 0b01,
            AlternateFunction = 0b10,
            Analog = 0b11
        ],
        MODER13 OFFSET(26) NUMBITS(2) [
            Input = 0b00,
            Output = 0b01,
            AlternateFunction = 0b10,
            Analog = 0b11
        ],
        MODER14 OFFSET(28) NUMBITS(2) [
            Input = 0b00,
            Output = 0b01,
            AlternateFunction = 0b10,
            Analog = 0b11
        ],
        MODER15 OFFSET(30) NUMBITS(2) [
            Input = 0b00,
            Output = 0b01,
            AlternateFunction = 0b10,
            Analog = 0b11
        ]
    ],
    pub OTYPER [
        OT0 OFFSET(0) NUMBITS(1) [],
        OT1 OFFSET(1) NUMBITS(1) [],
        OT2 OFFSET(2) NUMBITS(1) [],
        OT3 OFFSET(3) NUMBITS(1) [],
        OT4 OFFSET(4) NUMBITS(1) [],
        OT5 OFFSET(5) NUMBITS(1) [],
        OT6 OFFSET(6) NUMBITS(1) [],
        OT7 OFFSET(7) NUMBITS(1) [],
        OT8 OFFSET(8) NUMBITS(1) [],
        OT9 OFFSET(9) NUMBITS(1) [],
        OT10 OFFSET(10) NUMBITS(1) [],
        OT11 OFFSET(11) NUMBITS(1) [],
        OT12 OFFSET(12) NUMBITS(1) [],
        OT13 OFFSET(13) NUMBITS(1) [],
        OT14 OFFSET(14) NUMBITS(1) [],
        OT15 OFFSET(15) NUMBITS(1) []
    ],
    pub OSPEEDR [
        OSPEEDR0 OFFSET(0) NUMBITS(2) [],
        OSPEEDR1 OFFSET(2) NUMBITS(2) [],
        OSPEEDR2 OFFSET(4) NUMBITS(2) [],
        OSPEEDR3 OFFSET(6) NUMBITS(2) [],
        OSPEEDR4 OFFSET(8) NUMBITS(2) [],
        OSPEEDR5 OFFSET(10) NUMBITS(2) [],
        OSPEEDR6 OFFSET(12) NUMBITS(2) [],
        OSPEEDR7 OFFSET(14) NUMBITS(2) [],
        OSPEEDR8 OFFSET(16) NUMBITS(2) [],
        OSPEEDR9 OFFSET(18) NUMBITS(2) [],
        OSPEEDR10 OFFSET(20) NUMBITS(2) [],
        OSPEEDR11 OFFSET(22) NUMBITS(2) [],
        OSPEEDR12 OFFSET(24) NUMBITS(2) [],
        OSPEEDR13 OFFSET(26) NUMBITS(2) [],
        OSPEEDR14 OFFSET(28) NUMBITS(2) [],
        OSPEEDR15 OFFSET(30) NUMBITS(2) []
    ],
    pub PUPDR [
        PUPDR0 OFFSET(0) NUMBITS(2) [],
        PUPDR1 OFFSET(2) NUMBITS(2) [],
        PUPDR2 OFFSET(4) NUMBITS(2) [],
        PUPDR3 OFFSET(6) NUMBITS(2) [],
        PUPDR4 OFFSET(8) NUMBITS(2) [],
        PUPDR5 OFFSET(10) NUMBITS(2) [],
        PUPDR6 OFFSET(12) NUMBITS(2) [],
        PUPDR7 OFFSET(14) NUMBITS(2) [],
        PUPDR8 OFFSET(16) NUMBITS(2) [],
        PUPDR9 OFFSET(18) NUMBITS(2) [],
        PUPDR10 OFFSET(20) NUMBITS(2) [],
        PUPDR11 OFFSET(22) NUMBITS(2) [],
        PUPDR12 OFFSET(24) NUMBITS(2) [],
        PUPDR13 OFFSET(26) NUMBITS(2) [],
        PUPDR14 OFFSET(28) NUMBITS(2) [],
        PUPDR15 OFFSET(30) NUMBITS(2) []
    ],
    pub IDR [
        IDR0 OFFSET(0) NUMBITS(1) [],
        IDR1 OFFSET(1) NUMBITS(1) [],
        IDR2 OFFSET(2) NUMBITS(1) [],
        IDR3 OFFSET(3) NUMBITS(1) [],
        IDR4 OFFSET(4) NUMBITS(1) [],
        IDR5 OFFSET(5) NUMBITS(1) [],
        IDR6 OFFSET(6) NUMBITS(1) [],
        IDR7 OFFSET(7) NUMBITS(1) [],
        IDR8 OFFSET(8) NUMBITS(1) [],
        IDR9 OFFSET(9) NUMBITS(1) [],
        IDR10 OFFSET(10) NUMBITS(1) [],
        IDR11 OFFSET(11) NUMBITS(1) [],
        IDR12 OFFSET(12) NUMBITS(1) [],
        IDR13 OFFSET(13) NUMBITS(1) [],
        IDR14 OFFSET(14) NUMBITS(1) [],
        IDR15 OFFSET(15) NUMBITS(1) []
    ],
    pub ODR [
        ODR0 OFFSET(0) NUMBITS(1) [],
        ODR1 OFFSET(1) NUMBITS(1) [],
        ODR2 OFFSET(2) NUMBITS(1) [],
        ODR3 OFFSET(3) NUMBITS(1) [],
        ODR4 OFFSET(4) NUMBITS(1) [],
        ODR5 OFFSET(5) NUMBITS(1) [],
        ODR6 OFFSET(6) NUMBITS(1) [],
        ODR7 OFFSET(7) NUMBITS(1) [],
        ODR8 OFFSET(8) NUMBITS(1) [],
        ODR9 OFFSET(9) NUMBITS(1) [],
        ODR10 OFFSET(10) NUMBITS(1) [],
        ODR11 OFFSET(11) NUMBITS(1) [],
        ODR12 OFFSET(12) NUMBITS(1) [],
        ODR13 OFFSET(13) NUMBITS(1) [],
        ODR14 OFFSET(14) NUMBITS(1) [],
        ODR15 OFFSET(15) NUMBITS(1) []
    ],
    pub BSRR [
        BS0 OFFSET(0) NUMBITS(1) [],
        BS1 OFFSET(1) NUMBITS(1) [],
        BS2 OFFSET(2) NUMBITS(1) [],
        BS3 OFFSET(3) NUMBITS(1) [],
        BS4 OFFSET(4) NUMBITS(1) [],
        BS5 OFFSET(5) NUMBITS(1) [],
        BS6 OFFSET(6) NUMBITS(1) [],
        BS7 OFFSET(7) NUMBITS(1) [],
        BS8 OFFSET(8) NUMBITS(1) [],
        BS9 OFFSET(9) NUMBITS(1) [],
        BS10 OFFSET(10) NUMBITS(1) [],
        BS11 OFFSET(11) NUMBITS(1) [],
        BS12 OFFSET(12) NUMBITS(1) [],
        BS13 OFFSET(13) NUMBITS(1) [],
        BS14 OFFSET(14) NUMBITS(1) [],
        BS15 OFFSET(15) NUMBITS(1) [],
        BR0 OFFSET(16) NUMBITS(1) [],
        BR1 OFFSET(17) NUMBITS(1) [],
        BR2 OFFSET(18) NUMBITS(1) [],
        BR3 OFFSET(19) NUMBITS(1) [],
        BR4 OFFSET(20) NUMBITS(1) [],
        BR5 OFFSET(21) NUMBITS(1) [],
        BR6 OFFSET(22) NUMBITS(1) [],
        BR7 OFFSET(23) NUMBITS(1) [],
        BR8 OFFSET(24) NUMBITS(1) [],
        BR9 OFFSET(25) NUMBITS(1) [],
        BR10 OFFSET(26) NUMBITS(1) [],
        BR11 OFFSET(27) NUMBITS(1) [],
        BR12 OFFSET(28) NUMBITS(1) [],
        BR13 OFFSET(29) NUMBITS(1) [],
        BR14 OFFSET(30) NUMBITS(1) [],
        BR15 OFFSET(31) NUMBITS(1) []
    ],
    pub LCKR [
        LCK0 OFFSET(0) NUMBITS(1) [],
        LCK1 OFFSET(1) NUMBITS(1) [],
        LCK2 OFFSET(2) NUMBITS(1) [],
        LCK3 OFFSET(3) NUMBITS(1) [],
        LCK4 OFFSET(4) NUMBITS(1) [],
        LCK5 OFFSET(5) NUMBITS(1) [],
        LCK6 OFFSET(6) NUMBITS(1) [],
        LCK7 OFFSET(7) NUMBITS(1) [],
        LCK8 OFFSET(8) NUMBITS(1) [],
        LCK9 OFFSET(9) NUMBITS(1) [],
        LCK10 OFFSET(10) NUMBITS(1) [],
        LCK11 OFFSET(11) NUMBITS(1) [],
        LCK12 OFFSET(12) NUMBITS(1) [],
        LCK13 OFFSET(13) NUMBITS(1) [],
        LCK14 OFFSET(14) NUMBITS(1) [],
        LCK15 OFFSET(15) NUMBITS(1) [],
        /// Lock key
        LCKK OFFSET(16) NUMBITS(1) []
    ],
    pub AFRL [
        AFRL0 OFFSET(0) NUMBITS(4) [],
        AFRL1 OFFSET(4) NUMBITS(4) [],
        AFRL2 OFFSET(8) NUMBITS(4) [],
        AFRL3 OFFSET(12) NUMBITS(4) [],
        AFRL4 OFFSET(16) NUMBITS(4) [],
        AFRL5 OFFSET(20) NUMBITS(4) [],
        AFRL6 OFFSET(24) NUMBITS(4) [],
        AFRL7 OFFSET(28) NUMBITS(4) []
    ],
    pub AFRH [
        AFRH8 OFFSET(0) NUMBITS(4) [],
        AFRH9 OFFSET(4) NUMBITS(4) [],
        AFRH10 OFFSET(8) NUMBITS(4) [],
        AFRH11 OFFSET(12) NUMBITS(4) [],
        AFRH12 OFFSET(16) NUMBITS(4) [],
        AFRH13 OFFSET(20) NUMBITS(4) [],
        AFRH14 OFFSET(24) NUMBITS(4) [],
        AFRH15 OFFSET(28) NUMBITS(4) []
    ],
    pub BRR [
        BR0 OFFSET(0) NUMBITS(1) [],
        BR1 OFFSET(1) NUMBITS(1) [],
        BR2 OFFSET(2) NUMBITS(1) [],
        BR3 OFFSET(3) NUMBITS(1) [],
        BR4 OFFSET(4) NUMBITS(1) [],
        BR5 OFFSET(5) NUMBITS(1) [],
        BR6 OFFSET(6) NUMBITS(1) [],
        BR7 OFFSET(7) NUMBITS(1) [],
        BR8 OFFSET(8) NUMBITS(1) [],
        BR9 OFFSET(9) NUMBITS(1) [],
        BR10 OFFSET(10) NUMBITS(1) [],
        BR11 OFFSET(11) NUMBITS(1) [],
        BR12 OFFSET(12) NUMBITS(1) [],
        BR13 OFFSET(13) NUMBITS(1) [],
        BR14 OFFSET(14) NUMBITS(1) [],
        BR15 OFFSET(15) NUMBITS(1) []
    ],
    pub ASCR [
        ASC0 OFFSET(0) NUMBITS(1) [],
        ASC1 OFFSET(1) NUMBITS(1) [],
        ASC2 OFFSET(2) NUMBITS(1) [],
        ASC3 OFFSET(3) NUMBITS(1) [],
        ASC4 OFFSET(4) NUMBITS(1) [],
        ASC5 OFFSET(5) NUMBITS(1) [],
        ASC6 OFFSET(6) NUMBITS(1) [],
        ASC7 OFFSET(7) NUMBITS(1) [],
        ASC8 OFFSET(8) NUMBITS(1) [],
        ASC9 OFFSET(9) NUMBITS(1) [],
        ASC10 OFFSET(10) NUMBITS(1) [],
        ASC11 OFFSET(11) NUMBITS(1) [],
        ASC12 OFFSET(12) NUMBITS(1) [],
        ASC13 OFFSET(13) NUMBITS(1) [],
        ASC14 OFFSET(14) NUMBITS(1) [],
        ASC15 OFFSET(15) NUMBITS(1) []
    ]
];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Input = 0b00,
    Output = 0b01,
    AlternateFunction = 0b10,
    Analog = 0b11,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OutputType {
    PushPull = 0,
    OpenDrain = 1,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Speed {
    Low = 0b00,
    Medium = 0b01,
    High = 0b10,
    VeryHigh = 0b11,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FloatingState {
    PullNone = 0b00,
    PullUp = 0b01,
    PullDown = 0b10,
}

/// Alternate function numbers `AF0`..`AF15`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AlternateFunction {
    AF0 = 0,
    AF1 = 1,
    AF2 = 2,
    AF3 = 3,
    AF4 = 4,
    AF5 = 5,
    AF6 = 6,
    AF7 = 7,
    AF8 = 8,
    AF9 = 9,
    AF10 = 10,
    AF11 = 11,
    AF12 = 12,
    AF13 = 13,
    AF14 = 14,
    AF15 = 15,
}

/// Number of pins on one port.
pub const PINS_PER_PORT: u8 = 16;

/// Field covering the 2-bit group of `pin` in `MODER`, `OSPEEDR` or `PUPDR`.
fn two_bit<R: tock_registers::RegisterLongName>(pin: u8) -> Field<u32, R> {
    Field::new(0b11, 2 * pin as usize)
}

fn one_bit<R: tock_registers::RegisterLongName>(pin: u8) -> Field<u32, R> {
    Field::new(0b1, pin as usize)
}

/// One pin of a GPIO port.
pub struct Pin {
    registers: StaticRef<GpioRegisters>,
    pin: u8,
}

impl Pin {
    /// `pin` must be below [`PINS_PER_PORT`].
    pub const fn new(registers: StaticRef<GpioRegisters>, pin: u8) -> Pin {
        Pin { registers, pin }
    }

    pub fn pin_number(&self) -> u8 {
        self.pin
    }

    pub fn set_mode(&self, mode: Mode) {
        self.registers
            .moder
            .modify(two_bit::<MODER::Register>(self.pin).val(mode as u32));
    }

    pub fn mode(&self) -> Mode {
        match self.registers.moder.read(two_bit::<MODER::Register>(self.pin)) {
            0b00 => Mode::Input,
            0b01 => Mode::Output,
            0b10 => Mode::AlternateFunction,
            _ => Mode::Analog,
        }
    }

    pub fn set_output_type(&self, otype: OutputType) {
        self.registers
            .otyper
            .modify(one_bit::<OTYPER::Register>(self.pin).val(otype as u32));
    }

    pub fn set_speed(&self, speed: Speed) {
        self.registers
            .ospeedr
            .modify(two_bit::<OSPEEDR::Register>(self.pin).val(speed as u32));
    }

    pub fn set_floating_state(&self, state: FloatingState) {
        self.registers
            .pupdr
            .modify(two_bit::<PUPDR::Register>(self.pin).val(state as u32));
    }

    /// Selects the alternate function. The mode must be set to
    /// [`Mode::AlternateFunction`] separately.
    pub fn set_alternate_function(&self, af: AlternateFunction) {
        if self.pin < 8 {
            let field: Field<u32, AFRL::Register> = Field::new(0b1111, 4 * self.pin as usize);
            self.registers.afrl.modify(field.val(af as u32));
        } else {
            let field: Field<u32, AFRH::Register> =
                Field::new(0b1111, 4 * (self.pin - 8) as usize);
            self.registers.afrh.modify(field.val(af as u32));
        }
    }

    pub fn set(&self) {
        self.registers.bsrr.set(1 << self.pin);
    }

    pub fn clear(&self) {
        self.registers.bsrr.set(1 << (self.pin + 16));
    }

    pub fn toggle(&self) -> bool {
        let set = self.registers.odr.get() & (1 << self.pin) == 0;
        if set {
            self.set();
        } else {
            self.clear();
        }
        set
    }

    pub fn read(&self) -> bool {
        self.registers.idr.get() & (1 << self.pin) != 0
    }

    /// Connect the pin to the ADC input (L47x/L48x analog switch).
    pub fn set_analog_switch(&self, closed: bool) {
        self.registers
            .ascr
            .modify(one_bit::<ASCR::Register>(self.pin).val(closed as u32));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::{offset_of, size_of};
    use tock_registers::registers::InMemoryRegister;

    #[test]
    fn register_offsets() {
        assert_eq!(offset_of!(GpioRegisters, idr), 0x10);
        assert_eq!(offset_of!(GpioRegisters, bsrr), 0x18);
        assert_eq!(offset_of!(GpioRegisters, afrl), 0x20);
        assert_eq!(offset_of!(GpioRegisters, afrh), 0x24);
        assert_eq!(offset_of!(GpioRegisters, brr), 0x28);
        assert_eq!(offset_of!(GpioRegisters, ascr), 0x2c);
        assert_eq!(size_of::<GpioRegisters>(), 0x30);
    }

    #[test]
    fn named_fields() {
        assert_eq!(MODER::MODER15.shift, 30);
        assert_eq!(MODER::MODER15.mask, 0b11);
        assert_eq!(BSRR::BR0.shift, 16);
        assert_eq!(LCKR::LCKK.shift, 16);
        assert_eq!(AFRH::AFRH15.shift, 28);

        let moder = InMemoryRegister::<u32, MODER::Register>::new(0);
        moder.write(MODER::MODER5::AlternateFunction);
        assert_eq!(moder.get(), 0b10 << 10);
    }

    #[test]
    fn pin_configuration() {
        let regs: GpioRegisters = unsafe { core::mem::zeroed() };
        let pa9 = Pin::new(unsafe { StaticRef::new(&regs) }, 9);

        pa9.set_mode(Mode::AlternateFunction);
        pa9.set_alternate_function(AlternateFunction::AF7);
        pa9.set_speed(Speed::VeryHigh);
        pa9.set_floating_state(FloatingState::PullUp);
        pa9.set_output_type(OutputType::OpenDrain);

        assert_eq!(pa9.mode(), Mode::AlternateFunction);
        assert_eq!(regs.moder.get(), 0b10 << 18);
        assert_eq!(regs.afrh.get(), 7 << 4);
        assert_eq!(regs.afrl.get(), 0);
        assert_eq!(regs.ospeedr.get(), 0b11 << 18);
        assert_eq!(regs.pupdr.get(), 0b01 << 18);
        assert_eq!(regs.otyper.get(), 1 << 9);
    }

    #[test]
    fn output_writes_go_through_bsrr() {
        let regs: GpioRegisters = unsafe { core::mem::zeroed() };
        let pb3 = Pin::new(unsafe { StaticRef::new(&regs) }, 3);

        pb3.set();
        let bsrr = unsafe { core::ptr::read_volatile(core::ptr::addr_of!(regs.bsrr) as *const u32) };
        assert_eq!(bsrr, 1 << 3);
        pb3.clear();
        let bsrr = unsafe { core::ptr::read_volatile(core::ptr::addr_of!(regs.bsrr) as *const u32) };
        assert_eq!(bsrr, 1 << 19);
    }
}
