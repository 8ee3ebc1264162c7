// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Support types shared by every chip crate in this workspace.
//!
//! Chip crates describe hardware: register layouts, bitfields, base addresses
//! and interrupt tables. The few pieces of glue they all need (a reference to
//! a fixed MMIO address, an error type for configuration checks, a debug
//! output channel and a peripheral address table) live here.

#![no_std]

pub mod clock;
pub mod debug;
pub mod errorcode;
pub mod memory_map;
pub mod static_ref;

pub use crate::clock::ClockInterface;
pub use crate::errorcode::ErrorCode;
pub use crate::static_ref::StaticRef;
