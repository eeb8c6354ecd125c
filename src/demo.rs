// Copyright (C) 2025 Dayton Fishell
// EmuSNES Console Emulator Core
// This file is part of EmuSNES.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Fallback cores that share the [`Machine`] surface without interpreting a
//! program: the animated "vibe" core and the inert placeholder.

use crate::core::{Bus, LoadError};
use crate::cpu::Cpu;
use crate::input::{ButtonId, InputLatch};
use crate::machine::{Machine, MachineProfile, ProfileError};
use crate::ppu::{FrameBuffer, Ppu};
use crate::snapshot::{IncompatibleSnapshot, Snapshot};

/// Sprite colour of the vibe core
pub const VIBE_COLOR: u32 = 0x0000FF;

/// Animated demo core. Ignores cartridge contents and only moves the sprite
/// with the pad.
pub struct VibeCore {
    bus: Bus,
    input: InputLatch,
    ppu: Ppu,
    profile: MachineProfile,
    loaded: bool,
}

impl VibeCore {
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
            bus,
            input: InputLatch::new(),
            ppu: Ppu::with_color(&profile, VIBE_COLOR),
            profile,
            loaded: false,
        }
    }

    pub fn position(&self) -> (u8, u8) {
        self.bus.position()
    }
}

impl Default for VibeCore {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine for VibeCore {
    fn name(&self) -> &'static str {
        "vibe demo"
    }

    fn profile(&self) -> &MachineProfile {
        &self.profile
    }

    fn load_program(&mut self, image: &[u8]) -> Result<(), LoadError> {
        log::info!("vibe core ignores the {} byte program", image.len());
        self.loaded = true;
        self.reset();
        Ok(())
    }

    fn reset(&mut self) {
        self.bus.reset(self.profile.spawn);
    }

    fn set_button(&mut self, id: ButtonId, pressed: bool) {
        self.input.set(id, pressed);
    }

    fn run_frame(&mut self) {
        if !self.loaded {
            return;
        }
        let delta = self.input.direction(self.profile.step as i32);
        let position = self.profile.move_clamped(self.bus.position(), delta);
        self.bus.set_position(position);
    }

    fn render(&self) -> FrameBuffer {
        self.ppu.render(&self.bus)
    }

    fn is_runnable(&self) -> bool {
        self.loaded
    }

    fn capture(&self) -> Option<Snapshot> {
        self.loaded
            .then(|| Snapshot::capture(&self.bus, &Cpu::new()))
    }

    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), IncompatibleSnapshot> {
        let mut idle = Cpu::new();
        snapshot.apply(&mut self.bus, &mut idle)
    }
}

/// Placeholder core: accepts every command and never produces a picture
pub struct NullCore {
    profile: MachineProfile,
}

impl NullCore {
    pub fn new() -> Self {
        Self {
            profile: MachineProfile::default(),
        }
    }
}

impl Default for NullCore {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine for NullCore {
    fn name(&self) -> &'static str {
        "null"
    }

    fn profile(&self) -> &MachineProfile {
        &self.profile
    }

    fn load_program(&mut self, image: &[u8]) -> Result<(), LoadError> {
        log::debug!("null core dropping {} byte program", image.len());
        Ok(())
    }

    fn reset(&mut self) {}

    fn set_button(&mut self, _id: ButtonId, _pressed: bool) {}

    fn run_frame(&mut self) {}

    fn render(&self) -> FrameBuffer {
        FrameBuffer::new(self.profile.width, self.profile.height)
    }

    fn is_runnable(&self) -> bool {
        false
    }

    fn capture(&self) -> Option<Snapshot> {
        None
    }

    fn restore(&mut self, _snapshot: &Snapshot) -> Result<(), IncompatibleSnapshot> {
        Err(IncompatibleSnapshot::Unsupported(self.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Button;
    use crate::ppu::BACKDROP;

    #[test]
    fn vibe_core_idles_until_loaded() {
        let mut core = VibeCore::new();
        core.set_button(Button::Right.id(), true);
        core.run_frame();
        assert_eq!(core.position(), (128, 112));
        assert!(core.capture().is_none());
    }

    #[test]
    fn vibe_core_moves_and_clamps() {
        let mut core = VibeCore::new();
        core.load_program(&[]).unwrap();
        core.set_button(Button::Up.id(), true);
        for _ in 0..100 {
            core.run_frame();
        }
        assert_eq!(core.position(), (128, 0));
    }

    #[test]
    fn vibe_core_draws_blue_sprite() {
        let mut core = VibeCore::new();
        core.load_program(&[0x01, 0x02]).unwrap();
        let frame = core.render();
        assert_eq!(frame.pixel(128, 112), Some(VIBE_COLOR));
        assert_eq!(frame.pixel(0, 0), Some(BACKDROP));
    }

    #[test]
    fn vibe_core_snapshot_roundtrip() {
        let mut core = VibeCore::new();
        core.load_program(&[]).unwrap();
        let snap = core.capture().unwrap();
        core.set_button(Button::Right.id(), true);
        core.run_frame();
        core.restore(&snap).unwrap();
        assert_eq!(core.position(), (128, 112));
    }

    #[test]
    fn null_core_is_inert() {
        let mut core = NullCore::new();
        assert_eq!(core.load_program(&[0xA9, 0x01]), Ok(()));
        core.set_button(Button::A.id(), true);
        core.run_frame();
        assert!(!core.is_runnable());
        assert!(core.capture().is_none());
        assert!(core.render().pixels.iter().all(|&p| p == BACKDROP));
        assert!(core.cpu().is_none());

        let snap = Snapshot::capture(&Bus::new(), &Cpu::new());
        assert_eq!(
            core.restore(&snap),
            Err(IncompatibleSnapshot::Unsupported("null"))
        );
    }
}
