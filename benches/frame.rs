// Copyright (C) 2025 Dayton Fishell
// EmuSNES Console Emulator Core
// This file is part of EmuSNES.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use emusnes_core::{Button, DEMO_PROGRAM, Machine, Snes16};

fn run_frame(c: &mut Criterion) {
    let mut console = Snes16::new();
    console.load_program(&DEMO_PROGRAM).unwrap();
    console.set_button(Button::Right.id(), true);

    c.bench_function("s16_run_frame", |b| {
        b.iter(|| {
            console.run_frame();
            black_box(console.cpu.cycles)
        })
    });
}

fn render(c: &mut Criterion) {
    let mut console = Snes16::new();
    console.load_program(&DEMO_PROGRAM).unwrap();

    c.bench_function("ppu_render", |b| b.iter(|| black_box(console.render())));
}

criterion_group!(benches, run_frame, render);
criterion_main!(benches);
