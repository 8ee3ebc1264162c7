// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Independent watchdog, clocked from the LSI.

use chip_common::{ErrorCode, StaticRef};
use tock_registers::interfaces::{Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite, WriteOnly};
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    /// Independent watchdog
    pub IwdgRegisters {
        /// Key register
        (0x00 => kr: WriteOnly<u32, KR::Register>),
        /// Prescaler register
        (0x04 => pr: ReadWrite<u32, PR::Register>),
        /// Reload register
        (0x08 => rlr: ReadWrite<u32, RLR::Register>),
        /// Status register
        (0x0c => sr: ReadOnly<u32, SR::Register>),
        /// Window register
        (0x10 => winr: ReadWrite<u32, WINR::Register>),
        (0x14 => @END),
    }
}

register_bitfields![u32,
    pub KR [
        /// Key value
        KEY OFFSET(0) NUMBITS(16) [
            Reload = 0xAAAA,
            Unlock = 0x5555,
            Start = 0xCCCC
        ]
    ],
    pub PR [
        /// Prescaler divider
        PR OFFSET(0) NUMBITS(3) [
            DivideBy4 = 0,
            DivideBy8 = 1,
            DivideBy16 = 2,
            DivideBy32 = 3,
            DivideBy64 = 4,
            DivideBy128 = 5,
            DivideBy256 = 6
        ]
    ],
    pub RLR [
        /// Watchdog counter reload value
        RL OFFSET(0) NUMBITS(12) []
    ],
    pub SR [
        /// Watchdog counter window value update
        WVU OFFSET(2) NUMBITS(1) [],
        /// Watchdog counter reload value update
        RVU OFFSET(1) NUMBITS(1) [],
        /// Watchdog prescaler value update
        PVU OFFSET(0) NUMBITS(1) []
    ],
    pub WINR [
        /// Watchdog counter window value
        WIN OFFSET(0) NUMBITS(12) []
    ]
];

pub const MAX_RELOAD: u32 = 0xfff;

/// Smallest `(PR, RL)` pair whose timeout is at least `timeout_ms` with the
/// LSI running at `lsi_hz`.
pub fn timeout_settings(lsi_hz: u32, timeout_ms: u32) -> Result<(u32, u32), ErrorCode> {
    if timeout_ms == 0 || lsi_hz == 0 {
        return Err(ErrorCode::INVAL);
    }
    for pr in 0..=6u32 {
        let divider = 4u64 << pr;
        let ticks = (lsi_hz as u64 * timeout_ms as u64).div_ceil(divider * 1000);
        if ticks == 0 {
            return Ok((pr, 0));
        }
        if ticks - 1 <= MAX_RELOAD as u64 {
            return Ok((pr, ticks as u32 - 1));
        }
    }
    Err(ErrorCode::SIZE)
}

pub struct Iwdg {
    registers: StaticRef<IwdgRegisters>,
}

impl Iwdg {
    pub const fn new(registers: StaticRef<IwdgRegisters>) -> Iwdg {
        Iwdg { registers }
    }

    /// Start the watchdog. Once started it cannot be stopped until reset.
    pub fn start(&self, lsi_hz: u32, timeout_ms: u32) -> Result<(), ErrorCode> {
        let (pr, rl) = timeout_settings(lsi_hz, timeout_ms)?;
        self.registers.kr.write(KR::KEY::Start);
        self.registers.kr.write(KR::KEY::Unlock);
        self.registers.pr.write(PR::PR.val(pr));
        self.registers.rlr.write(RLR::RL.val(rl));
        self.registers.kr.write(KR::KEY::Reload);
        Ok(())
    }

    pub fn tickle(&self) {
        self.registers.kr.write(KR::KEY::Reload);
    }

    /// True while a prescaler, reload or window update is in flight.
    pub fn is_updating(&self) -> bool {
        self.registers.sr.get() != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::{offset_of, size_of};

    #[test]
    fn register_offsets() {
        assert_eq!(offset_of!(IwdgRegisters, rlr), 0x08);
        assert_eq!(offset_of!(IwdgRegisters, winr), 0x10);
        assert_eq!(size_of::<IwdgRegisters>(), 0x14);
    }

    #[test]
    fn timeouts() {
        // 40 kHz LSI (F3): 1 s = 10000 ticks at /4, 5000 at /8, 2500 at /16
        assert_eq!(timeout_settings(40_000, 1000), Ok((2, 2499)));
        // 32 kHz LSI (L4): 100 ms = 800 ticks at /4
        assert_eq!(timeout_settings(32_000, 100), Ok((0, 799)));
        // Longest: 4096 * 256 / 32000 = 32.768 s
        assert_eq!(timeout_settings(32_000, 32_768), Ok((6, 4095)));
        assert_eq!(timeout_settings(32_000, 40_000), Err(ErrorCode::SIZE));
        assert_eq!(timeout_settings(32_000, 0), Err(ErrorCode::INVAL));
    }

    #[test]
    fn start_sequence_ends_with_reload_key() {
        let regs: IwdgRegisters = unsafe { core::mem::zeroed() };
        let iwdg = Iwdg::new(unsafe { StaticRef::new(&regs) });
        iwdg.start(32_000, 100).unwrap();
        let kr = unsafe { core::ptr::read_volatile(core::ptr::addr_of!(regs.kr) as *const u32) };
        assert_eq!(kr, 0xAAAA);
        assert_eq!(regs.rlr.get(), 799);
        assert_eq!(regs.pr.get(), 0);
    }
}
