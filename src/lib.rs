// Copyright (C) 2025 Dayton Fishell
// EmuSNES Console Emulator Core
// This file is part of EmuSNES.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! EmuSNES console emulator core
//!
//! This library provides the emulation core behind the EmuSNES front-ends:
//! WorkRAM and cartridge bus, the S-16 interpreter, pad latch, software PPU,
//! save states and the 60 Hz frame governor. Windows, menus and file dialogs
//! live in the host; it talks to the core through [`Emulator`].

pub mod console;
pub mod core;
pub mod cpu;
pub mod demo;
pub mod emulator;
pub mod input;
pub mod machine;
pub mod ppu;
pub mod scheduler;
pub mod snapshot;

// Re-export commonly used types
pub use console::Snes16;
pub use crate::core::{Bus, DEMO_PROGRAM, LoadError};
pub use cpu::Cpu;
pub use demo::{NullCore, VibeCore};
pub use emulator::{Emulator, EmulatorStats};
pub use input::{Button, ButtonId, Buttons};
pub use machine::{Machine, MachineProfile, ProfileError};
pub use ppu::FrameBuffer;
pub use scheduler::Scheduler;
pub use snapshot::{IncompatibleSnapshot, Snapshot, StateError, Unavailable};
