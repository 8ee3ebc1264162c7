// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Peripheral base-address tables and memory regions.
//!
//! Every part crate exports a `PERIPHERALS` table built from its family's
//! `*_BASE` constants. The table is ordered by address so that lookups by
//! address can stop early and so that the datasheet order is easy to check.

/// One entry of a peripheral base-address table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Peripheral {
    pub name: &'static str,
    pub base: usize,
}

impl Peripheral {
    pub const fn new(name: &'static str, base: usize) -> Self {
        Self { name, base }
    }
}

/// Mapping from peripheral name to physical base address for one chip.
#[derive(Clone, Copy, Debug)]
pub struct PeripheralMap {
    entries: &'static [Peripheral],
}

impl PeripheralMap {
    pub const fn new(entries: &'static [Peripheral]) -> Self {
        Self { entries }
    }

    /// Base address of the peripheral called `name`.
    pub fn get(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.base)
    }

    /// Name of the peripheral whose block starts exactly at `address`.
    pub fn name_of(&self, address: usize) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|p| p.base == address)
            .map(|p| p.name)
    }

    pub fn iter(&self) -> core::slice::Iter<'static, Peripheral> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries are strictly increasing by address. Aliases (two names for
    /// the same block) must be kept out of the table.
    pub fn is_sorted_and_unique(&self) -> bool {
        self.entries.windows(2).all(|w| w[0].base < w[1].base)
            && self
                .entries
                .iter()
                .enumerate()
                .all(|(i, a)| self.entries[i + 1..].iter().all(|b| a.name != b.name))
    }
}

/// A contiguous range of the address space (flash, SRAM, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryRegion {
    pub start: usize,
    pub size: usize,
}

impl MemoryRegion {
    pub const fn new(start: usize, size: usize) -> Self {
        Self { start, size }
    }

    /// First address past the end of the region.
    pub const fn end(&self) -> usize {
        self.start + self.size
    }

    pub const fn contains(&self, address: usize) -> bool {
        address >= self.start && address < self.end()
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryRegion, Peripheral, PeripheralMap};

    static TABLE: [Peripheral; 3] = [
        Peripheral::new("TIM2", 0x4000_0000),
        Peripheral::new("USART2", 0x4000_4400),
        Peripheral::new("RCC", 0x4002_1000),
    ];

    #[test]
    fn lookup_by_name_and_address() {
        let map = PeripheralMap::new(&TABLE);
        assert_eq!(map.get("RCC"), Some(0x4002_1000));
        assert_eq!(map.get("GPIOZ"), None);
        assert_eq!(map.name_of(0x4000_4400), Some("USART2"));
        assert_eq!(map.name_of(0x4000_4404), None);
        assert_eq!(map.len(), 3);
        assert!(map.is_sorted_and_unique());
    }

    #[test]
    fn unsorted_table_is_detected() {
        static BAD: [Peripheral; 2] = [
            Peripheral::new("B", 0x2000),
            Peripheral::new("A", 0x1000),
        ];
        assert!(!PeripheralMap::new(&BAD).is_sorted_and_unique());
    }

    #[test]
    fn region_bounds() {
        let flash = MemoryRegion::new(0x0800_0000, 256 * 1024);
        assert_eq!(flash.end(), 0x0804_0000);
        assert!(flash.contains(0x0800_0000));
        assert!(flash.contains(0x0803_FFFF));
        assert!(!flash.contains(0x0804_0000));
    }
}
