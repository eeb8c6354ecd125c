// Copyright (C) 2025 Dayton Fishell
// EmuSNES Console Emulator Core
// This file is part of EmuSNES.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Controller input latch

use bitflags::bitflags;

/// Number of button slots on the pad
pub const BUTTON_COUNT: usize = 16;

/// Index of a button slot, `0..BUTTON_COUNT`
pub type ButtonId = usize;

bitflags! {
    /// Pressed-button mask. Bit `n` is button id `n`; ids without a name are
    /// still latched.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Buttons: u16 {
        const A = 1 << 0;
        const B = 1 << 1;
        const START = 1 << 8;
        const UP = 1 << 12;
        const DOWN = 1 << 13;
        const LEFT = 1 << 14;
        const RIGHT = 1 << 15;
    }
}

/// Named pad buttons, valued by their [`ButtonId`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Button {
    A = 0,
    B = 1,
    Start = 8,
    Up = 12,
    Down = 13,
    Left = 14,
    Right = 15,
}

impl Button {
    pub const fn id(self) -> ButtonId {
        self as ButtonId
    }
}

impl From<Button> for ButtonId {
    fn from(button: Button) -> Self {
        button.id()
    }
}

/// Latched pad state. Held until the host changes it; there is no
/// auto-release.
#[derive(Debug, Clone, Copy)]
pub struct InputLatch {
    pressed: Buttons,
}

impl InputLatch {
    pub fn new() -> Self {
        Self {
            pressed: Buttons::empty(),
        }
    }

    /// Latch a button. Ids outside the pad are ignored.
    pub fn set(&mut self, id: ButtonId, pressed: bool) {
        if id >= BUTTON_COUNT {
            log::trace!("ignoring input for unknown button id {id}");
            return;
        }
        self.pressed
            .set(Buttons::from_bits_retain(1 << id), pressed);
    }

    pub fn is_pressed(&self, id: ButtonId) -> bool {
        id < BUTTON_COUNT && self.pressed.contains(Buttons::from_bits_retain(1 << id))
    }

    pub fn buttons(&self) -> Buttons {
        self.pressed
    }

    /// Net movement for one frame given a per-axis `step`.
    pub fn direction(&self, step: i32) -> (i32, i32) {
        let axis = |neg: Buttons, pos: Buttons| {
            let mut d = 0;
            if self.pressed.contains(neg) {
                d -= step;
            }
            if self.pressed.contains(pos) {
                d += step;
            }
            d
        };
        (
            axis(Buttons::LEFT, Buttons::RIGHT),
            axis(Buttons::UP, Buttons::DOWN),
        )
    }
}

impl Default for InputLatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_holds_until_released() {
        let mut latch = InputLatch::new();
        latch.set(Button::Right.id(), true);
        assert!(latch.is_pressed(15));
        assert_eq!(latch.buttons(), Buttons::RIGHT);

        latch.set(Button::Right.id(), false);
        assert!(!latch.is_pressed(15));
    }

    #[test]
    fn unnamed_ids_are_latched() {
        let mut latch = InputLatch::new();
        latch.set(3, true);
        assert!(latch.is_pressed(3));
        assert_eq!(latch.buttons().bits(), 1 << 3);
    }

    #[test]
    fn out_of_range_id_is_ignored() {
        let mut latch = InputLatch::new();
        latch.set(Button::A.id(), true);
        latch.set(99, true);
        latch.set(BUTTON_COUNT, true);
        assert_eq!(latch.buttons(), Buttons::A);
        assert!(!latch.is_pressed(99));
    }

    #[test]
    fn direction_combines_axes() {
        let mut latch = InputLatch::new();
        latch.set(Button::Right.id(), true);
        latch.set(Button::Up.id(), true);
        assert_eq!(latch.direction(2), (2, -2));

        latch.set(Button::Left.id(), true);
        assert_eq!(latch.direction(2), (0, -2));
    }

    #[test]
    fn button_ids_match_pad_mapping() {
        assert_eq!(ButtonId::from(Button::A), 0);
        assert_eq!(ButtonId::from(Button::Start), 8);
        assert_eq!(ButtonId::from(Button::Up), 12);
        assert_eq!(ButtonId::from(Button::Right), 15);
    }
}
