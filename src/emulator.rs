// Copyright (C) 2025 Dayton Fishell
// EmuSNES Console Emulator Core
// This file is part of EmuSNES.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Host-facing emulator
//!
//! Owns one [`Machine`] plus the frame governor, the save slot and the last
//! rendered frame. A UI drives it from its own event loop by calling
//! [`Emulator::tick`] with a millisecond clock; every call returns after at
//! most one frame of work.
//!
//! There is no internal locking. Input set before a `tick` is seen by that
//! tick, input set after it by the next one.

use crate::core::LoadError;
use crate::input::ButtonId;
use crate::machine::Machine;
use crate::ppu::FrameBuffer;
use crate::scheduler::Scheduler;
use crate::snapshot::{IncompatibleSnapshot, Snapshot, SnapshotSlot, StateError, Unavailable};

/// Main emulator state
pub struct Emulator<M: Machine> {
    machine: M,
    scheduler: Scheduler,
    slot: SnapshotSlot,
    frame: FrameBuffer,
    running: bool,
    frame_count: u64,
}

impl<M: Machine> Emulator<M> {
    /// Wrap a machine. The governor runs at the machine profile's frame rate.
    pub fn new(machine: M) -> Self {
        let scheduler = Scheduler::new(machine.profile().frame_interval_ms());
        let frame = machine.render();
        Self {
            machine,
            scheduler,
            slot: SnapshotSlot::new(),
            frame,
            running: true,
            frame_count: 0,
        }
    }

    pub fn machine(&self) -> &M {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut M {
        &mut self.machine
    }

    /// Install a cartridge image supplied by the host. On `Err` the built-in
    /// demo is running instead; the emulator is still usable.
    pub fn load_program(&mut self, image: &[u8]) -> Result<(), LoadError> {
        let result = self.machine.load_program(image);
        self.power_cycled();
        result
    }

    /// Reset the machine, keeping the cartridge
    pub fn reset(&mut self) {
        log::info!("resetting {}", self.machine.name());
        self.machine.reset();
        self.power_cycled();
    }

    pub fn set_button(&mut self, id: ButtonId, pressed: bool) {
        self.machine.set_button(id, pressed);
    }

    /// Advance by at most one frame. Returns whether a frame ran.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if !self.running || !self.machine.is_runnable() {
            return false;
        }
        if !self.scheduler.poll(now_ms) {
            return false;
        }
        self.step_frame();
        true
    }

    /// Run exactly one frame, bypassing the governor (frame advance)
    pub fn step_frame(&mut self) {
        self.machine.run_frame();
        self.frame_count += 1;
        self.frame = self.machine.render();
    }

    /// Frame produced by the last executed frame, reset or state load
    pub fn current_frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Resume ticking. The next `tick` runs a frame immediately.
    pub fn resume(&mut self) {
        self.running = true;
        self.scheduler.rearm();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Capture the full machine state. The snapshot also replaces the
    /// contents of the save slot.
    pub fn save_state(&mut self) -> Result<Snapshot, Unavailable> {
        let snapshot = self.machine.capture().ok_or(Unavailable::NoProgram)?;
        self.slot.store(snapshot.clone());
        Ok(snapshot)
    }

    /// Overwrite machine state from `snapshot`. Rejected snapshots leave the
    /// machine untouched.
    pub fn load_state(&mut self, snapshot: Snapshot) -> Result<(), IncompatibleSnapshot> {
        if let Err(e) = self.machine.restore(&snapshot) {
            log::warn!("rejected snapshot: {e}");
            return Err(e);
        }
        self.frame = self.machine.render();
        Ok(())
    }

    /// Save into the internal slot
    pub fn quick_save(&mut self) -> Result<(), Unavailable> {
        self.save_state().map(|_| ())
    }

    /// Restore from the internal slot. The slot keeps its snapshot.
    pub fn quick_load(&mut self) -> Result<(), StateError> {
        let snapshot = self.slot.get().cloned().ok_or(Unavailable::EmptySlot)?;
        self.load_state(snapshot)?;
        Ok(())
    }

    pub fn has_saved_state(&self) -> bool {
        !self.slot.is_empty()
    }

    /// Get current execution statistics
    pub fn stats(&self) -> EmulatorStats {
        let cpu = self.machine.cpu();
        EmulatorStats {
            total_cycles: cpu.map_or(0, |c| c.cycles),
            frame_count: self.frame_count,
            pc: cpu.map(|c| c.pc),
            running: self.running,
            runnable: self.machine.is_runnable(),
        }
    }

    fn power_cycled(&mut self) {
        self.frame_count = 0;
        self.scheduler.rearm();
        self.frame = self.machine.render();
    }
}

/// Emulator execution statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmulatorStats {
    pub total_cycles: u64,
    pub frame_count: u64,
    pub pc: Option<u16>,
    pub running: bool,
    pub runnable: bool,
}
