// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Bus prescaler encodings shared by the F3 and L4 RCC.
//!
//! `HPRE` is four bits wide and `PPREx` three bits wide in `RCC_CFGR` on
//! both families; only the position of the fields differs.

use chip_common::ErrorCode;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AHBPrescaler {
    DivideBy1 = 0b0000,
    DivideBy2 = 0b1000,
    DivideBy4 = 0b1001,
    DivideBy8 = 0b1010,
    DivideBy16 = 0b1011,
    DivideBy64 = 0b1100,
    DivideBy128 = 0b1101,
    DivideBy256 = 0b1110,
    DivideBy512 = 0b1111,
}

impl From<AHBPrescaler> for usize {
    fn from(item: AHBPrescaler) -> usize {
        match item {
            AHBPrescaler::DivideBy1 => 1,
            AHBPrescaler::DivideBy2 => 2,
            AHBPrescaler::DivideBy4 => 4,
            AHBPrescaler::DivideBy8 => 8,
            AHBPrescaler::DivideBy16 => 16,
            AHBPrescaler::DivideBy64 => 64,
            AHBPrescaler::DivideBy128 => 128,
            AHBPrescaler::DivideBy256 => 256,
            AHBPrescaler::DivideBy512 => 512,
        }
    }
}

impl AHBPrescaler {
    /// Decode the `HPRE` field. Every value below `0b1000` means "not
    /// divided".
    pub fn from_bits(bits: u32) -> Self {
        match bits & 0b1111 {
            0b1000 => AHBPrescaler::DivideBy2,
            0b1001 => AHBPrescaler::DivideBy4,
            0b1010 => AHBPrescaler::DivideBy8,
            0b1011 => AHBPrescaler::DivideBy16,
            0b1100 => AHBPrescaler::DivideBy64,
            0b1101 => AHBPrescaler::DivideBy128,
            0b1110 => AHBPrescaler::DivideBy256,
            0b1111 => AHBPrescaler::DivideBy512,
            _ => AHBPrescaler::DivideBy1,
        }
    }

    pub fn divide(self, frequency: u32) -> u32 {
        frequency / usize::from(self) as u32
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum APBPrescaler {
    DivideBy1 = 0b000, // No division
    DivideBy2 = 0b100,
    DivideBy4 = 0b101,
    DivideBy8 = 0b110,
    DivideBy16 = 0b111,
}

impl From<APBPrescaler> for usize {
    fn from(item: APBPrescaler) -> Self {
        match item {
            APBPrescaler::DivideBy1 => 1,
            APBPrescaler::DivideBy2 => 2,
            APBPrescaler::DivideBy4 => 4,
            APBPrescaler::DivideBy8 => 8,
            APBPrescaler::DivideBy16 => 16,
        }
    }
}

impl APBPrescaler {
    /// Decode a `PPREx` field. Every value below `0b100` means "not divided".
    pub fn from_bits(bits: u32) -> Self {
        match bits & 0b111 {
            0b100 => APBPrescaler::DivideBy2,
            0b101 => APBPrescaler::DivideBy4,
            0b110 => APBPrescaler::DivideBy8,
            0b111 => APBPrescaler::DivideBy16,
            _ => APBPrescaler::DivideBy1,
        }
    }

    pub fn divide(self, frequency: u32) -> u32 {
        frequency / usize::from(self) as u32
    }

    /// Timers on an APB bus run at twice the bus clock whenever the bus is
    /// divided.
    pub fn timer_frequency(self, hclk: u32) -> u32 {
        match self {
            APBPrescaler::DivideBy1 => hclk,
            _ => 2 * self.divide(hclk),
        }
    }
}

/// `USARTDIV` for 16x oversampling, rounded to nearest
/// (`__HAL_UART_DIV_SAMPLING16`).
pub fn usart_div_sampling16(pclk: u32, baud: u32) -> Result<u32, ErrorCode> {
    if baud == 0 {
        return Err(ErrorCode::INVAL);
    }
    let div = (pclk + baud / 2) / baud;
    if !(16..=0xffff).contains(&div) {
        return Err(ErrorCode::INVAL);
    }
    Ok(div)
}

/// `BRR` value for 8x oversampling (`__HAL_UART_DIV_SAMPLING8`): the low
/// nibble of `USARTDIV` is shifted right by one and bit 3 must stay clear.
pub fn usart_div_sampling8(pclk: u32, baud: u32) -> Result<u32, ErrorCode> {
    if baud == 0 {
        return Err(ErrorCode::INVAL);
    }
    let div = (2 * pclk as u64 + baud as u64 / 2) / baud as u64;
    if !(16..=0xffff).contains(&div) {
        return Err(ErrorCode::INVAL);
    }
    let div = div as u32;
    Ok((div & 0xfff0) | ((div & 0x000f) >> 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ahb_decoding() {
        assert_eq!(AHBPrescaler::from_bits(0b0111), AHBPrescaler::DivideBy1);
        assert_eq!(AHBPrescaler::from_bits(0b1011), AHBPrescaler::DivideBy16);
        assert_eq!(AHBPrescaler::DivideBy64 as u32, 0b1100);
        assert_eq!(AHBPrescaler::DivideBy512.divide(72_000_000), 140_625);
    }

    #[test]
    fn apb_timer_doubling() {
        assert_eq!(APBPrescaler::from_bits(0b011), APBPrescaler::DivideBy1);
        assert_eq!(APBPrescaler::DivideBy2.divide(72_000_000), 36_000_000);
        assert_eq!(APBPrescaler::DivideBy2.timer_frequency(72_000_000), 72_000_000);
        assert_eq!(APBPrescaler::DivideBy1.timer_frequency(8_000_000), 8_000_000);
    }

    #[test]
    fn usart_divisors() {
        // 72 MHz / 115200 = 625
        assert_eq!(usart_div_sampling16(72_000_000, 115_200), Ok(625));
        // 8 MHz / 9600 = 833.3 -> 833
        assert_eq!(usart_div_sampling16(8_000_000, 9600), Ok(833));
        // 2 * 8 MHz / 115200 = 138.9 -> 139 = 0x8B -> 0x80 | (0xB >> 1)
        assert_eq!(usart_div_sampling8(8_000_000, 115_200), Ok(0x85));
        assert_eq!(usart_div_sampling16(8_000_000, 0), Err(ErrorCode::INVAL));
        assert_eq!(usart_div_sampling16(8_000_000, 1_000_000), Err(ErrorCode::INVAL));
    }
}
