// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Core peripherals and exception entry points for ARM Cortex-M4(F) MCUs.
//!
//! Every chip in this workspace is built around a Cortex-M4F core. The chip
//! crates only describe their vendor peripherals and interrupt numbering;
//! the NVIC, SCB and SysTick blocks and the handlers placed in the vector
//! tables come from here.

#![no_std]

pub mod nvic;
pub mod scb;
pub mod systick;

/// Number of Cortex-M exception slots preceding the first IRQ in a vector
/// table (initial SP, Reset, NMI, ..., SysTick).
pub const NUM_EXCEPTION_VECTORS: usize = 16;

#[cfg(all(target_arch = "arm", target_os = "none"))]
extern "C" {
    /// Handler placed in every implemented IRQ slot.
    ///
    /// It disables the interrupt that fired in the NVIC and marks it pending
    /// so that the main loop can find and service it with
    /// [`nvic::next_pending`], then re-enable it.
    pub fn generic_isr();

    /// Reset entry point: copy `.data` from flash, zero `.bss`, then jump to
    /// `main`. Expects the linker symbols `_etext`, `_srelocate`,
    /// `_erelocate`, `_szero` and `_ezero`.
    pub fn initialize_ram_jump_to_main();
}

#[cfg(all(target_arch = "arm", target_os = "none"))]
core::arch::global_asm!(
    "
    .section .generic_isr, \"ax\"
    .global generic_isr
    .thumb_func
  generic_isr:
    // Find the ISR number (`index`) by looking at the low byte of the IPSR
    // registers. ISRs start at 16, so subtract 16 to get zero-indexed.
    mrs r0, IPSR
    and r0, #0xff
    sub r0, #16

    // r2 = index / 32
    lsrs r2, r0, #5
    // r0 = 1 << (index & 31)
    movs r3, #1
    and r0, r0, #31
    lsl r0, r3, r0

    // NVIC.ICER[r2] = r0
    ldr r3, =0xe000e180
    str r0, [r3, r2, lsl #2]

    // NVIC.ISPR[r2] = r0
    ldr r3, =0xe000e200
    str r0, [r3, r2, lsl #2]

    bx lr
    "
);

#[cfg(all(target_arch = "arm", target_os = "none"))]
core::arch::global_asm!(
    "
    .section .initialize_ram_jump_to_main, \"ax\"
    .global initialize_ram_jump_to_main
    .thumb_func
  initialize_ram_jump_to_main:
    // Copy .data from its load address in flash to RAM.
    ldr r0, =_etext
    ldr r1, =_srelocate
    ldr r2, =_erelocate
  100:
    cmp r1, r2
    beq 101f
    ldr r3, [r0], #4
    str r3, [r1], #4
    b 100b

  101:
    // Zero .bss.
    ldr r1, =_szero
    ldr r2, =_ezero
    movs r3, #0
  102:
    cmp r1, r2
    beq 103f
    str r3, [r1], #4
    b 102b

  103:
    bl main
    b .
    "
);

/// Handler placed in reserved vector slots and unused exceptions.
#[cfg(all(target_arch = "arm", target_os = "none"))]
pub unsafe extern "C" fn unhandled_interrupt() {
    let mut interrupt_number: u32;

    // IPSR[8:0] holds the currently active interrupt
    core::arch::asm!(
        "mrs {}, ipsr",
        out(reg) interrupt_number,
        options(nomem, nostack, preserves_flags)
    );

    interrupt_number &= 0x1ff;

    panic!("Unhandled Interrupt. ISR {} is active.", interrupt_number);
}

/// Hard fault entry: report the fault status registers and stop.
#[cfg(all(target_arch = "arm", target_os = "none"))]
pub unsafe extern "C" fn hard_fault_handler() {
    let status = scb::fault_status();
    panic!(
        "HardFault. CFSR: {:#010X} HFSR: {:#010X}",
        status.cfsr, status.hfsr
    );
}

///////////////////////////////////////////////////////////////////
// Mock implementations for running tests on CI.
//
// Since tests run on the local architecture, we have to remove any
// ARM assembly since it will not compile.
///////////////////////////////////////////////////////////////////

#[cfg(not(all(target_arch = "arm", target_os = "none")))]
pub unsafe extern "C" fn generic_isr() {}

#[cfg(not(all(target_arch = "arm", target_os = "none")))]
pub unsafe extern "C" fn unhandled_interrupt() {
    unimplemented!()
}

#[cfg(not(all(target_arch = "arm", target_os = "none")))]
pub unsafe extern "C" fn hard_fault_handler() {
    unimplemented!()
}

#[cfg(not(all(target_arch = "arm", target_os = "none")))]
pub unsafe extern "C" fn initialize_ram_jump_to_main() {
    unimplemented!()
}
