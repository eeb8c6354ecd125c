// Copyright (C) 2025 Dayton Fishell
// EmuSNES Console Emulator Core
// This file is part of EmuSNES.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

// Headless runner for the EmuSNES core.
//
//   emusnes [ROM] [--core snes|vibe|null] [--frames N] [--profile FILE.yaml]
//           [--load-state FILE.json] [--save-state FILE.json] [--frame-out FILE.ppm]
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use emusnes_core::{
    Button, Emulator, Machine, MachineProfile, NullCore, Snapshot, Snes16, VibeCore,
};

/// Simulated host polling period; deliberately finer than a frame
const HOST_POLL_MS: u64 = 4;

#[derive(Debug, Default)]
struct Options {
    rom: Option<PathBuf>,
    core: String,
    frames: u64,
    profile: Option<PathBuf>,
    load_state: Option<PathBuf>,
    save_state: Option<PathBuf>,
    frame_out: Option<PathBuf>,
}

fn parse_args() -> Result<Options> {
    let mut opts = Options {
        core: "snes".into(),
        frames: 600,
        ..Options::default()
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        let mut value = || args.next().with_context(|| format!("{arg} needs a value"));
        match arg.as_str() {
            "--core" => opts.core = value()?,
            "--frames" => {
                opts.frames = value()?.parse().context("--frames expects a number")?;
            }
            "--profile" => opts.profile = Some(value()?.into()),
            "--load-state" => opts.load_state = Some(value()?.into()),
            "--save-state" => opts.save_state = Some(value()?.into()),
            "--frame-out" => opts.frame_out = Some(value()?.into()),
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            rom => opts.rom = Some(PathBuf::from(rom)),
        }
    }
    Ok(opts)
}

fn main() -> Result<()> {
    env_logger::init();

    println!("EmuSNES v0.1.0");
    println!("==============");
    println!();

    let opts = parse_args()?;
    let profile = match &opts.profile {
        Some(path) => load_profile(path)?,
        None => MachineProfile::default(),
    };

    match opts.core.as_str() {
        "snes" => run(Emulator::new(Snes16::with_profile(profile)?), &opts),
        "vibe" => run(Emulator::new(VibeCore::with_profile(profile)?), &opts),
        "null" => run(Emulator::new(NullCore::new()), &opts),
        other => bail!("unknown core {other:?} (expected snes, vibe or null)"),
    }
}

fn run<M: Machine>(mut emulator: Emulator<M>, opts: &Options) -> Result<()> {
    println!("Core: {}", emulator.machine().name());

    let rom = match &opts.rom {
        Some(path) => fs::read(path).with_context(|| format!("reading ROM {}", path.display()))?,
        None => Vec::new(),
    };
    if let Err(e) = emulator.load_program(&rom) {
        println!("  {e}");
    }

    if let Some(path) = &opts.load_state {
        let snapshot = read_snapshot(path)?;
        emulator
            .load_state(snapshot)
            .with_context(|| format!("restoring {}", path.display()))?;
        println!("  Restored state from {}", path.display());
    }

    if !emulator.machine().is_runnable() {
        println!("Core has nothing to run.");
    } else {
        println!("Running {} frames with Right held...", opts.frames);
        emulator.set_button(Button::Right.id(), true);
        let mut now = 0;
        while emulator.stats().frame_count < opts.frames {
            emulator.tick(now);
            now += HOST_POLL_MS;
        }
        println!("  Simulated host time: {now} ms");
    }
    println!();

    let stats = emulator.stats();
    println!("Final state:");
    if let Some(pc) = stats.pc {
        println!("  PC:          0x{pc:04X}");
    }
    println!("  Cycles:      {}", stats.total_cycles);
    println!("  Frames:      {}", stats.frame_count);

    if let Some(path) = &opts.frame_out {
        write_ppm(path, &emulator)?;
        println!("  Frame written to {}", path.display());
    }

    if let Some(path) = &opts.save_state {
        let snapshot = emulator
            .save_state()
            .context("cannot save state")?;
        write_snapshot(path, &snapshot)?;
        println!("  State saved to {}", path.display());
    }
    Ok(())
}

fn write_ppm<M: Machine>(path: &Path, emulator: &Emulator<M>) -> Result<()> {
    let frame = emulator.current_frame();
    let mut data = format!("P6\n{} {}\n255\n", frame.width, frame.height).into_bytes();
    data.extend(frame.to_rgb24());
    fs::write(path, data).with_context(|| format!("writing {}", path.display()))
}

#[cfg(feature = "serde-spec")]
fn load_profile(path: &Path) -> Result<MachineProfile> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading profile {}", path.display()))?;
    MachineProfile::from_yaml(&text).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(feature = "serde-spec")]
fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading state {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(feature = "serde-spec")]
fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let json = serde_json::to_string(snapshot)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

#[cfg(not(feature = "serde-spec"))]
fn load_profile(_path: &Path) -> Result<MachineProfile> {
    bail!("--profile requires the serde-spec feature")
}

#[cfg(not(feature = "serde-spec"))]
fn read_snapshot(_path: &Path) -> Result<Snapshot> {
    bail!("--load-state requires the serde-spec feature")
}

#[cfg(not(feature = "serde-spec"))]
fn write_snapshot(_path: &Path, _snapshot: &Snapshot) -> Result<()> {
    bail!("--save-state requires the serde-spec feature")
}
