//! The top-level driver: owns the CPU, MMU, and interrupt bus and
//! advances them together. This is the single owner the redesign notes
//! call for — no subsystem holds a reference to another, so the
//! borrow-checker enforces the fixed tick order by construction.

use std::time::{Duration, Instant};

use crate::error::{BoyboyError, RomError, SaveError};
use crate::hardware::cpu::Cpu;
use crate::hardware::interrupts::InterruptBus;
use crate::hardware::joypad::Button;
use crate::hardware::mmu::Mmu;
use crate::hardware::serial::Serial;

/// T-cycles in one 160x144 frame (70224 = 456 dots/line * 154 lines).
pub const FRAME_T_CYCLES: u32 = 70_224;
const T_CYCLES_PER_SECOND: f64 = 4_194_304.0;

/// Destination for completed frames. A windowed host blits the
/// framebuffer; the CLI's headless `run` command uses [`NullFrameSink`].
pub trait FrameSink {
    fn present(&mut self, framebuffer: &[u32]);
}

#[derive(Debug, Default)]
pub struct NullFrameSink;

impl FrameSink for NullFrameSink {
    fn present(&mut self, _framebuffer: &[u32]) {}
}

/// Source of button events, polled once per frame. The CLI's headless
/// `run` command uses [`NullInputSource`], which never produces events.
pub trait InputSource {
    fn poll(&mut self) -> Vec<(Button, bool)>;
}

#[derive(Debug, Default)]
pub struct NullInputSource;

impl InputSource for NullInputSource {
    fn poll(&mut self) -> Vec<(Button, bool)> {
        Vec::new()
    }
}

pub struct Emulator {
    cpu: Cpu,
    mmu: Mmu,
    bus: InterruptBus,
    pub running: bool,
    /// Wall-clock speed multiplier; 0 means uncapped.
    pub speed: u32,
    pub frame_rate_limited: bool,
    last_frame_at: Option<Instant>,
    autosave_interval: Duration,
    last_autosave_at: Instant,
}

impl Emulator {
    pub fn new(rom: Vec<u8>) -> Result<Self, RomError> {
        Ok(Emulator {
            cpu: Cpu::new(),
            mmu: Mmu::new(rom)?,
            bus: InterruptBus::new(),
            running: true,
            speed: 1,
            frame_rate_limited: true,
            last_frame_at: None,
            autosave_interval: Duration::from_millis(5000),
            last_autosave_at: Instant::now(),
        })
    }

    pub fn with_serial(mut self, serial: Serial) -> Self {
        self.mmu = self.mmu.with_serial(serial);
        self
    }

    pub fn load_battery_save(&mut self, blob: &[u8]) -> Result<(), SaveError> {
        self.mmu.cartridge_mut().load_battery_save(blob)
    }

    pub fn battery_save_blob(&self) -> Option<Vec<u8>> {
        self.mmu.cartridge().battery_save_blob()
    }

    pub fn on_button_event(&mut self, button: Button, pressed: bool) {
        self.mmu.on_button_event(button, pressed, &mut self.bus);
    }

    /// Runs a single CPU instruction and ticks every peripheral by the
    /// same number of T-cycles, in the fixed order the concurrency
    /// model requires: CPU first, then Timer, OAM DMA, and PPU.
    pub fn step(&mut self) -> Result<u32, BoyboyError> {
        let cycles = self.cpu.step(&mut self.mmu, &mut self.bus)?;
        self.mmu.tick(cycles, &mut self.bus);
        Ok(cycles)
    }

    /// Polls `input` for button events, steps the CPU until a frame
    /// completes, hands the framebuffer to `sink`, and paces to the
    /// next frame boundary when rate-limited.
    pub fn run_frame(&mut self, input: &mut dyn InputSource, sink: &mut dyn FrameSink) -> Result<(), BoyboyError> {
        for (button, pressed) in input.poll() {
            self.on_button_event(button, pressed);
        }

        loop {
            self.step()?;
            if self.mmu.ppu.frame_ready() {
                sink.present(self.mmu.ppu.framebuffer().as_slice());
                self.mmu.ppu.consume_frame();
                break;
            }
        }

        self.pace_frame();
        Ok(())
    }

    fn pace_frame(&mut self) {
        if !self.frame_rate_limited || self.speed == 0 {
            self.last_frame_at = Some(Instant::now());
            return;
        }
        let target = Duration::from_secs_f64(FRAME_T_CYCLES as f64 / T_CYCLES_PER_SECOND / self.speed as f64);
        if let Some(last) = self.last_frame_at {
            let elapsed = last.elapsed();
            if elapsed < target {
                std::thread::sleep(target - elapsed);
            }
        }
        self.last_frame_at = Some(Instant::now());
    }

    pub fn set_autosave_interval(&mut self, interval: Duration) {
        self.autosave_interval = interval;
    }

    /// Returns a save blob if the autosave interval has elapsed and the
    /// cartridge has battery-backed RAM. The emulator never touches the
    /// filesystem itself; the caller persists the blob.
    pub fn autosave_due(&mut self) -> Option<Vec<u8>> {
        if self.last_autosave_at.elapsed() < self.autosave_interval {
            return None;
        }
        self.last_autosave_at = Instant::now();
        self.mmu.cartridge().battery_save_blob()
    }

    pub fn mmu(&self) -> &Mmu {
        &self.mmu
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rom_with_program(program: &[u8]) -> Vec<u8> {
        let mut rom = vec![0u8; 0x8000];
        rom[0x100..0x100 + program.len()].copy_from_slice(program);
        let mut x: u8 = 0;
        for &b in &rom[0x134..=0x14C] {
            x = x.wrapping_sub(b).wrapping_sub(1);
        }
        rom[0x14D] = x;
        rom
    }

    #[test]
    fn step_advances_both_cpu_and_peripherals() {
        let mut emu = Emulator::new(rom_with_program(&[0x00])).unwrap();
        let before = emu.mmu().timer.div();
        let cycles = emu.step().unwrap();
        assert_eq!(cycles, 4);
        // DIV may or may not visibly tick after only 4 cycles depending on
        // its internal counter phase, but the call must not panic and the
        // CPU must have moved on.
        let _ = before;
        assert_eq!(emu.cpu().registers.pc, 0x0101);
    }

    #[test]
    fn run_frame_produces_a_frame_without_panicking() {
        // An infinite JR loop keeps the CPU busy for a full frame.
        let mut emu = Emulator::new(rom_with_program(&[0x18, 0xFE])).unwrap();
        let mut input = NullInputSource;
        let mut sink = NullFrameSink;
        emu.run_frame(&mut input, &mut sink).unwrap();
    }
}
