use anyhow::{Context, Result};
use boyboy_core::emulator::{Emulator, NullFrameSink, NullInputSource};
use boyboy_core::hardware::serial::{Serial, StdoutSink};

use crate::config_file;
use crate::options::RunOptions;

/// Drives a rom headlessly: frames are produced and discarded, no
/// button events are ever generated. This is the same `FrameSink`/
/// `InputSource` seam a future windowed host would plug into.
pub fn run(opts: RunOptions) -> Result<()> {
    let (mut config, config_path) = config_file::load(opts.config.as_deref())?;

    if let Some(speed) = opts.speed {
        config.emulator.speed = speed;
    }
    if let Some(scale) = opts.scale {
        config.video.scale = scale;
    }
    if let Some(tick_mode) = opts.tick_mode.clone() {
        config.emulator.tick_mode = tick_mode;
    }
    config.validate(true)?;

    log::info!("loaded config from {}", config_path.display());

    let rom = std::fs::read(&opts.rom).with_context(|| format!("reading {}", opts.rom))?;
    let mut emulator = Emulator::new(rom)?.with_serial(Serial::with_sink(Box::new(StdoutSink)));
    emulator.speed = config.emulator.speed;
    emulator.frame_rate_limited = config.emulator.speed != 0;

    let save_path = save_path_for(&opts.rom)?;
    if let Ok(blob) = std::fs::read(&save_path) {
        if let Err(e) = emulator.load_battery_save(&blob) {
            log::warn!("battery save at {} rejected: {}", save_path.display(), e);
        }
    }

    let mut input = NullInputSource;
    let mut sink = NullFrameSink;

    log::info!("running {}", opts.rom);
    while emulator.running {
        emulator.run_frame(&mut input, &mut sink)?;

        if config.saves.autosave {
            if let Some(blob) = emulator.autosave_due() {
                persist_save(&save_path, &blob)?;
            }
        }
    }

    if let Some(blob) = emulator.battery_save_blob() {
        persist_save(&save_path, &blob)?;
    }

    Ok(())
}

fn save_path_for(rom_path: &str) -> Result<std::path::PathBuf> {
    let rom = std::fs::read(rom_path).with_context(|| format!("reading {}", rom_path))?;
    let header = boyboy_core::hardware::cartridge::header::CartridgeHeader::parse(&rom)?;
    let dirs = directories::ProjectDirs::from("", "", "boyboy").context("could not resolve a data directory")?;
    Ok(dirs.data_dir().join(header.normalized_title()).join("battery.sav"))
}

fn persist_save(path: &std::path::Path, blob: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, blob).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
