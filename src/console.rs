// Copyright (C) 2025 Dayton Fishell
// EmuSNES Console Emulator Core
// This file is part of EmuSNES.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! S-16 interpreter console
//!
//! Wires the CPU, WorkRAM, pad latch and PPU together. One frame is a fixed
//! instruction budget followed by the pad-driven sprite update, so emulation
//! speed does not depend on how often the host polls.

use crate::core::{Bus, LoadError};
use crate::cpu::Cpu;
use crate::input::{ButtonId, InputLatch};
use crate::machine::{Machine, MachineProfile, ProfileError};
use crate::ppu::{FrameBuffer, Ppu};
use crate::snapshot::{IncompatibleSnapshot, Snapshot};

/// Opcode-interpreting core
pub struct Snes16 {
    pub cpu: Cpu,
    pub bus: Bus,
    input: InputLatch,
    ppu: Ppu,
    profile: MachineProfile,
}

impl Snes16 {
    /// Create a console with the reference profile
    pub fn new() -> Self {
        Self::build(MachineProfile::default())
    }

    pub fn with_profile(profile: MachineProfile) -> Result<Self, ProfileError> {
        profile.validate()?;
        Ok(Self::build(profile))
    }

    fn build(profile: MachineProfile) -> Self {
        let mut bus = Bus::new();
        bus.reset(profile.spawn);
        Self {
            cpu: Cpu::new(),
            bus,
            input: InputLatch::new(),
            ppu: Ppu::new(&profile),
            profile,
        }
    }

    pub fn input(&self) -> &InputLatch {
        &self.input
    }

    /// Current sprite position
    pub fn position(&self) -> (u8, u8) {
        self.bus.position()
    }
}

impl Default for Snes16 {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine for Snes16 {
    fn name(&self) -> &'static str {
        "S-16 interpreter"
    }

    fn profile(&self) -> &MachineProfile {
        &self.profile
    }

    fn load_program(&mut self, image: &[u8]) -> Result<(), LoadError> {
        let result = self.bus.load_program(image);
        match &result {
            Ok(()) => log::info!("loaded {} byte program", image.len()),
            Err(e) => log::warn!("{e}"),
        }
        self.reset();
        result
    }

    fn reset(&mut self) {
        self.cpu.reset();
        self.bus.reset(self.profile.spawn);
    }

    fn set_button(&mut self, id: ButtonId, pressed: bool) {
        self.input.set(id, pressed);
    }

    fn run_frame(&mut self) {
        if !self.bus.has_program() {
            return;
        }
        self.cpu.run(&mut self.bus, self.profile.instructions_per_frame);

        let delta = self.input.direction(self.profile.step as i32);
        let position = self.profile.move_clamped(self.bus.position(), delta);
        self.bus.set_position(position);
    }

    fn render(&self) -> FrameBuffer {
        self.ppu.render(&self.bus)
    }

    fn is_runnable(&self) -> bool {
        self.bus.has_program()
    }

    fn capture(&self) -> Option<Snapshot> {
        self.is_runnable()
            .then(|| Snapshot::capture(&self.bus, &self.cpu))
    }

    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), IncompatibleSnapshot> {
        snapshot.apply(&mut self.bus, &mut self.cpu)?;
        log::info!("restored state at cycle {}", self.cpu.cycles);
        Ok(())
    }

    fn cpu(&self) -> Option<&Cpu> {
        Some(&self.cpu)
    }
}
