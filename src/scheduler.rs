// Copyright (C) 2025 Dayton Fishell
// EmuSNES Console Emulator Core
// This file is part of EmuSNES.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Frame-rate governor
//!
//! The host polls [`Scheduler::poll`] at whatever rate its event loop runs. A
//! frame is due once the interval has passed since the last executed frame; at
//! most one frame is released per poll, so a stalled host never triggers a
//! catch-up burst.

use crate::machine::MachineProfile;

/// Fixed-cadence frame governor
#[derive(Debug, Clone)]
pub struct Scheduler {
    interval_ms: u64,
    last_tick: Option<u64>,
}

impl Scheduler {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_tick: None,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn last_tick(&self) -> Option<u64> {
        self.last_tick
    }

    /// Returns `true` when a frame should run at `now_ms`, and records it.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.last_tick {
            None => {
                self.last_tick = Some(now_ms);
                true
            }
            Some(last) if now_ms < last => {
                // host clock went backwards; re-anchor and wait a full interval
                log::debug!("scheduler clock moved backwards ({last} -> {now_ms} ms)");
                self.last_tick = Some(now_ms);
                false
            }
            Some(last) if now_ms - last >= self.interval_ms => {
                self.last_tick = Some(now_ms);
                true
            }
            Some(_) => false,
        }
    }

    /// Forget the last tick so the next poll runs immediately
    pub fn rearm(&mut self) {
        self.last_tick = None;
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(MachineProfile::default().frame_interval_ms())
    }
}
