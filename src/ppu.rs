// Copyright (C) 2025 Dayton Fishell
// EmuSNES Console Emulator Core
// This file is part of EmuSNES.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Software PPU
//!
//! Every call regenerates the whole frame from WorkRAM, so the output is a pure
//! function of memory state and never tears.

use crate::core::Bus;
use crate::machine::MachineProfile;

/// Backdrop colour
pub const BACKDROP: u32 = 0x000000;

/// Packed 0xRRGGBB pixels, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![BACKDROP; width as usize * height as usize],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Paint a filled rectangle, clipped to the frame
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: u32) {
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        let stride = self.width as usize;
        for row in y.min(y_end) as usize..y_end as usize {
            let start = row * stride + x.min(x_end) as usize;
            let end = row * stride + x_end as usize;
            self.pixels[start..end].fill(color);
        }
    }

    /// Expand to 3 bytes per pixel (R, G, B) for hosts that blit RGB24
    pub fn to_rgb24(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&p| [(p >> 16) as u8, (p >> 8) as u8, p as u8])
            .collect()
    }
}

/// Sprite rasterizer configured from a [`MachineProfile`]
#[derive(Debug, Clone)]
pub struct Ppu {
    width: u32,
    height: u32,
    sprite_size: u32,
    sprite_color: u32,
}

impl Ppu {
    pub fn new(profile: &MachineProfile) -> Self {
        Self::with_color(profile, profile.sprite_color)
    }

    pub fn with_color(profile: &MachineProfile, sprite_color: u32) -> Self {
        Self {
            width: profile.width,
            height: profile.height,
            sprite_size: profile.sprite_size,
            sprite_color,
        }
    }

    /// Draw the backdrop and the player sprite at the WorkRAM position cells
    pub fn render(&self, bus: &Bus) -> FrameBuffer {
        let mut frame = FrameBuffer::new(self.width, self.height);
        let (x, y) = bus.position();
        frame.fill_rect(
            x as u32,
            y as u32,
            self.sprite_size,
            self.sprite_size,
            self.sprite_color,
        );
        frame
    }
}
