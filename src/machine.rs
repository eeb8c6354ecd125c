// Copyright (C) 2025 Dayton Fishell
// EmuSNES Console Emulator Core
// This file is part of EmuSNES.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Machine capability shared by every core variant, and the console profile
//! the variants are built from.

use thiserror::Error;

use crate::core::LoadError;
use crate::cpu::Cpu;
use crate::input::ButtonId;
use crate::ppu::FrameBuffer;
use crate::snapshot::{IncompatibleSnapshot, Snapshot};

/// Console constants. [`MachineProfile::default`] is the reference SNES-like
/// profile: 256x224, 20px sprite, 1000 instructions per 60 Hz frame.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-spec", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-spec", serde(default))]
pub struct MachineProfile {
    pub width: u32,
    pub height: u32,
    /// Edge length of the square player sprite
    pub sprite_size: u32,
    /// Pixels moved per frame per pressed direction
    pub step: u32,
    pub instructions_per_frame: u32,
    pub target_fps: u32,
    pub spawn: (u8, u8),
    /// Packed 0xRRGGBB
    pub sprite_color: u32,
}

impl Default for MachineProfile {
    fn default() -> Self {
        Self {
            width: 256,
            height: 224,
            sprite_size: 20,
            step: 2,
            instructions_per_frame: 1000,
            target_fps: 60,
            spawn: (128, 112),
            sprite_color: 0xFF0000,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("display must be at least 1x1, got {width}x{height}")]
    EmptyDisplay { width: u32, height: u32 },
    #[error(
        "display {width}x{height} exceeds the {max}x{max} limit",
        max = MachineProfile::MAX_EXTENT
    )]
    DisplayTooLarge { width: u32, height: u32 },
    #[error("sprite size {sprite} does not fit a {width}x{height} display")]
    SpriteTooLarge { sprite: u32, width: u32, height: u32 },
    #[error("position range {0} exceeds the 8-bit position cells")]
    PositionRange(u32),
    #[error("target frame rate must be 1..=1000 Hz, got {0}")]
    FrameRate(u32),
    #[error("spawn point {0:?} lies outside the playfield")]
    SpawnOutOfBounds((u8, u8)),
    #[error("malformed profile: {0}")]
    Parse(String),
}

impl MachineProfile {
    /// Widest or tallest display a profile may ask for
    pub const MAX_EXTENT: u32 = 4096;

    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.width == 0 || self.height == 0 {
            return Err(ProfileError::EmptyDisplay {
                width: self.width,
                height: self.height,
            });
        }
        if self.width > Self::MAX_EXTENT || self.height > Self::MAX_EXTENT {
            return Err(ProfileError::DisplayTooLarge {
                width: self.width,
                height: self.height,
            });
        }
        if self.sprite_size > self.width || self.sprite_size > self.height {
            return Err(ProfileError::SpriteTooLarge {
                sprite: self.sprite_size,
                width: self.width,
                height: self.height,
            });
        }
        let range = (self.width - self.sprite_size).max(self.height - self.sprite_size);
        if range > u8::MAX as u32 {
            return Err(ProfileError::PositionRange(range));
        }
        if !(1..=1000).contains(&self.target_fps) {
            return Err(ProfileError::FrameRate(self.target_fps));
        }
        let (max_x, max_y) = self.max_position();
        if self.spawn.0 > max_x || self.spawn.1 > max_y {
            return Err(ProfileError::SpawnOutOfBounds(self.spawn));
        }
        Ok(())
    }

    /// Parse a YAML profile and validate it. Missing keys keep their
    /// reference values.
    #[cfg(feature = "serde-spec")]
    pub fn from_yaml(text: &str) -> Result<Self, ProfileError> {
        let profile: Self =
            serde_yaml::from_str(text).map_err(|e| ProfileError::Parse(e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }

    /// Minimum wall-clock gap between two executed frames
    pub fn frame_interval_ms(&self) -> u64 {
        1000 / self.target_fps.max(1) as u64
    }

    /// Largest legal sprite origin. Assumes a validated profile.
    pub fn max_position(&self) -> (u8, u8) {
        let fit = |extent: u32| extent.saturating_sub(self.sprite_size).min(u8::MAX as u32) as u8;
        (fit(self.width), fit(self.height))
    }

    /// Apply a signed move and clamp the result to the playfield
    pub fn move_clamped(&self, (x, y): (u8, u8), (dx, dy): (i32, i32)) -> (u8, u8) {
        let (max_x, max_y) = self.max_position();
        (
            (x as i32 + dx).clamp(0, max_x as i32) as u8,
            (y as i32 + dy).clamp(0, max_y as i32) as u8,
        )
    }
}

/// Command surface every core variant exposes to the host.
///
/// Hosts only talk to a core through these entry points; a core never calls
/// back into its host.
pub trait Machine {
    fn name(&self) -> &'static str;

    fn profile(&self) -> &MachineProfile;

    /// Install a cartridge image and power-cycle. On `Err` the core is
    /// running the built-in demo instead.
    fn load_program(&mut self, image: &[u8]) -> Result<(), LoadError>;

    /// Power-cycle without touching the loaded cartridge
    fn reset(&mut self);

    /// Latch a button for the following frames. Unknown ids are ignored.
    fn set_button(&mut self, id: ButtonId, pressed: bool);

    /// Emulate one frame's worth of work
    fn run_frame(&mut self);

    /// Rasterize the current state. Must not change machine state.
    fn render(&self) -> FrameBuffer;

    /// Whether the core has something to execute
    fn is_runnable(&self) -> bool;

    /// Deep copy of all mutable state, or `None` when not runnable
    fn capture(&self) -> Option<Snapshot>;

    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), IncompatibleSnapshot>;

    /// Execution context, for cores that interpret a program
    fn cpu(&self) -> Option<&Cpu> {
        None
    }
}
