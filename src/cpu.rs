// Copyright (C) 2025 Dayton Fishell
// EmuSNES Console Emulator Core
// This file is part of EmuSNES.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! S-16 interpreter
//!
//! A deliberately small subset of the 6502 family encodings:
//! - `LDA #imm`, `STA zp` and `JMP abs`
//! - every other byte is a one-byte no-op, so stray data never halts the core
//! - the program counter wraps back to the cartridge entry point whenever it
//!   leaves the loaded image

use crate::core::Bus;

/// Opcode encodings understood by the interpreter
pub mod opcode {
    pub const LDA_IMM: u8 = 0xA9;
    pub const STA_ZP: u8 = 0x85;
    pub const JMP_ABS: u8 = 0x4C;
}

/// CPU Status Register flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-spec", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusFlags {
    pub zero: bool,
    pub negative: bool,
}

impl StatusFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert flags to u8 representation
    pub fn to_byte(&self) -> u8 {
        let mut byte = 0u8;
        if self.zero { byte |= 0x02; }
        if self.negative { byte |= 0x80; }
        byte
    }

    /// Update zero and negative flags based on an 8-bit result
    pub fn update_zn(&mut self, value: u8) {
        self.zero = value == 0;
        self.negative = (value & 0x80) != 0;
    }
}

/// S-16 execution context
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-spec", derive(serde::Serialize, serde::Deserialize))]
pub struct Cpu {
    pub a: u8,           // Accumulator
    pub pc: u16,         // Program counter
    pub sr: StatusFlags, // Status register

    // Executed instruction count since reset
    pub cycles: u64,
}

impl Cpu {
    pub fn new() -> Self {
        Self {
            a: 0,
            pc: Bus::PROGRAM_BASE,
            sr: StatusFlags::new(),
            cycles: 0,
        }
    }

    /// Reset the CPU to initial state
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Execute up to `budget` instructions. Returns the number executed, which
    /// is zero only when no program is loaded.
    pub fn run(&mut self, bus: &mut Bus, budget: u32) -> u32 {
        let mut executed = 0;
        while executed < budget && self.step(bus) {
            executed += 1;
        }
        executed
    }

    /// Execute a single instruction. Returns `false` if there is nothing to run.
    pub fn step(&mut self, bus: &mut Bus) -> bool {
        if bus.fetch(self.pc).is_none() {
            self.pc = Bus::PROGRAM_BASE;
        }
        let Some(opcode) = bus.fetch(self.pc) else {
            return false;
        };

        self.execute_instruction(opcode, bus);
        self.cycles += 1;
        true
    }

    /// Execute an instruction based on opcode
    fn execute_instruction(&mut self, opcode: u8, bus: &mut Bus) {
        match opcode {
            // LDA - Load Accumulator (immediate 8-bit)
            opcode::LDA_IMM => {
                self.a = self.operand_u8(bus);
                self.sr.update_zn(self.a);
                self.pc = self.pc.wrapping_add(2);
            }

            // STA - Store Accumulator (zero page)
            opcode::STA_ZP => {
                let addr = self.operand_u8(bus);
                bus.write_u8(addr as u32, self.a);
                self.pc = self.pc.wrapping_add(2);
            }

            // JMP - Jump absolute (16-bit little-endian)
            opcode::JMP_ABS => {
                let lo = self.operand_u8(bus) as u16;
                let hi = bus.fetch(self.pc.wrapping_add(2)).unwrap_or(0) as u16;
                self.pc = lo | (hi << 8);
            }

            // Unknown opcode - treat as NOP
            _ => {
                self.pc = self.pc.wrapping_add(1);
            }
        }
    }

    /// Operand byte following the opcode. Truncated instructions at the end
    /// of the image read zero.
    fn operand_u8(&self, bus: &Bus) -> u8 {
        bus.fetch(self.pc.wrapping_add(1)).unwrap_or(0)
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bus_with(program: &[u8]) -> Bus {
        let mut bus = Bus::new();
        bus.load_program(program).expect("valid program");
        bus
    }

    #[test]
    fn cpu_initialization() {
        let cpu = Cpu::new();
        assert_eq!(cpu.a, 0);
        assert_eq!(cpu.pc, 0x8000);
        assert_eq!(cpu.cycles, 0);
    }

    #[test]
    fn cpu_reset() {
        let mut cpu = Cpu::new();
        cpu.a = 0x12;
        cpu.pc = 0x8123;
        cpu.cycles = 99;
        cpu.sr.zero = true;
        cpu.reset();
        assert_eq!(cpu, Cpu::new());
    }

    #[test]
    fn cpu_lda_immediate() {
        let mut cpu = Cpu::new();
        let mut bus = bus_with(&[0xA9, 0x34]);

        assert!(cpu.step(&mut bus));

        assert_eq!(cpu.a, 0x34);
        assert_eq!(cpu.pc, 0x8002);
        assert!(!cpu.sr.zero);
        assert!(!cpu.sr.negative);
        assert_eq!(cpu.cycles, 1);
    }

    #[test]
    fn cpu_lda_sets_flags() {
        let mut cpu = Cpu::new();
        let mut bus = bus_with(&[0xA9, 0x00, 0xA9, 0x80]);

        cpu.step(&mut bus);
        assert!(cpu.sr.zero);
        assert_eq!(cpu.sr.to_byte(), 0x02);

        cpu.step(&mut bus);
        assert!(!cpu.sr.zero);
        assert!(cpu.sr.negative);
    }

    #[test]
    fn cpu_sta_zero_page() {
        let mut cpu = Cpu::new();
        let mut bus = bus_with(&[0x85, 0x42]);
        cpu.a = 0x56;

        cpu.step(&mut bus);

        assert_eq!(bus.read_u8(0x42), 0x56);
        assert_eq!(cpu.pc, 0x8002);
    }

    #[test]
    fn cpu_jmp_absolute() {
        let mut cpu = Cpu::new();
        let mut bus = bus_with(&[0x4C, 0x05, 0x80, 0xEA, 0xEA, 0xA9, 0x07]);

        cpu.step(&mut bus);
        assert_eq!(cpu.pc, 0x8005);

        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0x07);
    }

    #[test]
    fn unknown_opcode_is_one_byte_nop() {
        let mut cpu = Cpu::new();
        let mut bus = bus_with(&[0xEA, 0x00, 0xFF]);

        for expected in [0x8001, 0x8002, 0x8003] {
            assert!(cpu.step(&mut bus));
            assert_eq!(cpu.pc, expected);
        }
        assert_eq!(cpu.a, 0);
        assert_eq!(cpu.cycles, 3);
    }

    #[test]
    fn pc_wraps_to_entry_point_past_image_end() {
        let mut cpu = Cpu::new();
        let mut bus = bus_with(&[0xA9, 0x09, 0xEA]);

        cpu.run(&mut bus, 2);
        assert_eq!(cpu.pc, 0x8003);

        // next fetch wraps and re-executes LDA
        cpu.a = 0;
        cpu.step(&mut bus);
        assert_eq!(cpu.a, 0x09);
        assert_eq!(cpu.pc, 0x8002);
    }

    #[test]
    fn jump_outside_image_wraps() {
        let mut cpu = Cpu::new();
        let mut bus = bus_with(&[0x4C, 0x00, 0x10]);

        cpu.step(&mut bus);
        assert_eq!(cpu.pc, 0x1000);

        cpu.step(&mut bus);
        assert_eq!(cpu.pc, 0x1000, "JMP re-executed from the entry point");
        assert_eq!(cpu.cycles, 2);
    }

    #[test]
    fn truncated_operand_reads_zero() {
        let mut cpu = Cpu::new();
        let mut bus = bus_with(&[0xEA, 0xA9]);
        cpu.a = 0x55;

        cpu.run(&mut bus, 2);
        assert_eq!(cpu.a, 0);
    }

    #[test]
    fn demo_loop_returns_to_entry_every_third_instruction() {
        let mut cpu = Cpu::new();
        let mut bus = bus_with(&[0xA9, 0x01, 0x85, 0x10, 0x4C, 0x00, 0x80]);

        assert_eq!(cpu.run(&mut bus, 3), 3);
        assert_eq!(cpu.pc, 0x8000);
        assert_eq!(bus.read_u8(0x10), 1);
    }

    #[test]
    fn run_without_program_executes_nothing() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::new();
        assert_eq!(cpu.run(&mut bus, 1000), 0);
        assert_eq!(cpu.cycles, 0);
    }
}
