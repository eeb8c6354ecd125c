// Copyright (C) 2025 Dayton Fishell
// EmuSNES Console Emulator Core
// This file is part of EmuSNES.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

use thiserror::Error;

/// Built-in demo cartridge: `LDA #1`, `STA $10`, `JMP $8000`.
pub const DEMO_PROGRAM: [u8; 7] = [0xA9, 0x01, 0x85, 0x10, 0x4C, 0x00, 0x80];

/// Reasons a program image was rejected. The bus always falls back to
/// [`DEMO_PROGRAM`] when one of these is reported, so the core stays runnable.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LoadError {
    #[error("no program image supplied, running the built-in demo")]
    Empty,
    #[error("program image is {0} bytes, larger than the {max} byte cartridge window", max = Bus::PROGRAM_WINDOW)]
    TooLarge(usize),
}

/// 64 KiB WorkRAM plus a cartridge image mapped at [`Bus::PROGRAM_BASE`].
///
/// WorkRAM accessors panic on addresses outside the RAM. Only the interpreter
/// produces addresses, so an out-of-range one is a bug in the core, never
/// something a cartridge can trigger.
pub struct Bus {
    workram: Vec<u8>,
    program: Vec<u8>,
}

impl Bus {
    pub const WORKRAM_SIZE: usize = 0x10000; // 64KB

    /// Entry point and base address of the cartridge window.
    pub const PROGRAM_BASE: u16 = 0x8000;
    pub const PROGRAM_WINDOW: usize = 0x8000;

    /// Direction variable written by the demo program
    pub const DIRECTION_CELL: u32 = 0x10;
    pub const POS_X_CELL: u32 = 0x20;
    pub const POS_Y_CELL: u32 = 0x21;

    pub fn new() -> Self {
        Self {
            workram: vec![0; Self::WORKRAM_SIZE],
            program: Vec::new(),
        }
    }

    /// Replace the cartridge image. Invalid images are swapped for the demo
    /// and the reason is handed back to the caller.
    pub fn load_program(&mut self, data: &[u8]) -> Result<(), LoadError> {
        let verdict = if data.is_empty() {
            Err(LoadError::Empty)
        } else if data.len() > Self::PROGRAM_WINDOW {
            Err(LoadError::TooLarge(data.len()))
        } else {
            Ok(())
        };

        self.program = match verdict {
            Ok(()) => data.to_vec(),
            Err(_) => DEMO_PROGRAM.to_vec(),
        };
        verdict
    }

    pub fn has_program(&self) -> bool {
        !self.program.is_empty()
    }

    pub fn program(&self) -> &[u8] {
        &self.program
    }

    /// Read a byte from the cartridge window. `None` when `addr` is outside
    /// the loaded image.
    pub fn fetch(&self, addr: u16) -> Option<u8> {
        let offset = addr.checked_sub(Self::PROGRAM_BASE)? as usize;
        self.program.get(offset).copied()
    }

    /// Zero WorkRAM and seed the well-known cells.
    pub fn reset(&mut self, spawn: (u8, u8)) {
        self.workram.fill(0);
        self.write_u8(Self::DIRECTION_CELL, 0);
        self.set_position(spawn);
    }

    /// Read a byte from WorkRAM
    ///
    /// # Panics
    /// If `addr` is outside the 64 KiB WorkRAM.
    pub fn read_u8(&self, addr: u32) -> u8 {
        let a = Self::check(addr);
        self.workram[a]
    }

    /// Write a byte to WorkRAM
    ///
    /// # Panics
    /// If `addr` is outside the 64 KiB WorkRAM.
    pub fn write_u8(&mut self, addr: u32, value: u8) {
        let a = Self::check(addr);
        self.workram[a] = value;
    }

    /// Current sprite position as held in WorkRAM
    pub fn position(&self) -> (u8, u8) {
        (self.read_u8(Self::POS_X_CELL), self.read_u8(Self::POS_Y_CELL))
    }

    pub fn set_position(&mut self, (x, y): (u8, u8)) {
        self.write_u8(Self::POS_X_CELL, x);
        self.write_u8(Self::POS_Y_CELL, y);
    }

    pub fn workram(&self) -> &[u8] {
        &self.workram
    }

    /// Overwrite WorkRAM wholesale. Callers check the length first.
    pub(crate) fn restore_workram(&mut self, image: &[u8]) {
        self.workram.copy_from_slice(image);
    }

    fn check(addr: u32) -> usize {
        let a = addr as usize;
        if a >= Self::WORKRAM_SIZE {
            panic!("WorkRAM access out of range: 0x{addr:08X} (programming error in the core)");
        }
        a
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}
