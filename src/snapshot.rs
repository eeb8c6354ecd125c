// Copyright (C) 2025 Dayton Fishell
// EmuSNES Console Emulator Core
// This file is part of EmuSNES.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Save states
//!
//! A [`Snapshot`] is WorkRAM plus the execution context. The cartridge image is
//! not part of it; restoring onto a different cartridge is the host's call.
//! Any on-disk format is up to the host (see the `serde-spec` feature).

use thiserror::Error;

use crate::core::Bus;
use crate::cpu::Cpu;

/// Frozen copy of all mutable core state
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-spec", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub workram: Vec<u8>,
    pub cpu: Cpu,
}

impl Snapshot {
    pub fn capture(bus: &Bus, cpu: &Cpu) -> Self {
        Self {
            workram: bus.workram().to_vec(),
            cpu: cpu.clone(),
        }
    }

    /// Check this snapshot fits the running machine
    pub fn validate(&self) -> Result<(), IncompatibleSnapshot> {
        if self.workram.len() != Bus::WORKRAM_SIZE {
            return Err(IncompatibleSnapshot::WorkRamSize {
                expected: Bus::WORKRAM_SIZE,
                found: self.workram.len(),
            });
        }
        Ok(())
    }

    /// Copy this snapshot into `bus` and `cpu`. Nothing is written unless the
    /// snapshot validates.
    pub fn apply(&self, bus: &mut Bus, cpu: &mut Cpu) -> Result<(), IncompatibleSnapshot> {
        self.validate()?;
        bus.restore_workram(&self.workram);
        *cpu = self.cpu.clone();
        Ok(())
    }
}

/// No snapshot could be produced or consumed
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Unavailable {
    #[error("no program is loaded")]
    NoProgram,
    #[error("the save slot is empty")]
    EmptySlot,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IncompatibleSnapshot {
    #[error("snapshot holds {found} bytes of WorkRAM, expected {expected}")]
    WorkRamSize { expected: usize, found: usize },
    #[error("{0} cannot restore snapshots")]
    Unsupported(&'static str),
}

/// Failure restoring from the internal save slot
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error(transparent)]
    Unavailable(#[from] Unavailable),
    #[error(transparent)]
    Incompatible(#[from] IncompatibleSnapshot),
}

/// Single save slot. Overwritten by every save.
#[derive(Debug, Default)]
pub struct SnapshotSlot {
    current: Option<Snapshot>,
}

impl SnapshotSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&mut self, snapshot: Snapshot) {
        self.current = Some(snapshot);
    }

    pub fn get(&self) -> Option<&Snapshot> {
        self.current.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_apply_roundtrip() {
        let mut bus = Bus::new();
        let mut cpu = Cpu::new();
        bus.write_u8(0x1234, 0x56);
        cpu.a = 7;
        cpu.cycles = 42;

        let snap = Snapshot::capture(&bus, &cpu);
        bus.write_u8(0x1234, 0);
        cpu.reset();

        snap.apply(&mut bus, &mut cpu).unwrap();
        assert_eq!(bus.read_u8(0x1234), 0x56);
        assert_eq!(cpu.a, 7);
        assert_eq!(cpu.cycles, 42);
    }

    #[test]
    fn wrong_workram_size_is_rejected_untouched() {
        let mut bus = Bus::new();
        let mut cpu = Cpu::new();
        bus.write_u8(0x10, 9);

        let snap = Snapshot {
            workram: vec![0xAA; 1024],
            cpu: Cpu { a: 3, ..Cpu::new() },
        };
        assert_eq!(
            snap.apply(&mut bus, &mut cpu),
            Err(IncompatibleSnapshot::WorkRamSize {
                expected: 0x10000,
                found: 1024
            })
        );
        assert_eq!(bus.read_u8(0x10), 9);
        assert_eq!(cpu.a, 0);
    }

    #[test]
    fn slot_keeps_latest() {
        let bus = Bus::new();
        let mut cpu = Cpu::new();
        let mut slot = SnapshotSlot::new();
        assert!(slot.is_empty());

        slot.store(Snapshot::capture(&bus, &cpu));
        cpu.a = 1;
        slot.store(Snapshot::capture(&bus, &cpu));
        assert_eq!(slot.get().map(|s| s.cpu.a), Some(1));
    }
}
