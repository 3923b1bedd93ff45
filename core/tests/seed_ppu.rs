//! Seed scenario 6: PPU mode sequence and timing across one scanline
//! and one full frame.

use boyboy_core::hardware::interrupts::InterruptBus;
use boyboy_core::hardware::ppu::{Mode, Ppu};
use pretty_assertions::assert_eq;

#[test]
fn scanline_mode_sequence_matches_the_timing_table() {
    let mut bus = InterruptBus::new();
    let mut ppu = Ppu::new();

    assert_eq!(ppu.mode(), Mode::OamScan);
    assert_eq!(ppu.read_register(boyboy_core::hardware::ppu::LY), 0);

    ppu.tick(80, &mut bus);
    assert_eq!(ppu.mode(), Mode::OamScan, "mode only flips on the dot after the 80th");

    ppu.tick(1, &mut bus);
    assert_eq!(ppu.mode(), Mode::Transfer, "oam scan lasts exactly 80 dots");

    ppu.tick(172, &mut bus);
    assert_eq!(ppu.mode(), Mode::HBlank, "transfer lasts exactly 172 dots");

    ppu.tick(203, &mut bus);
    assert_eq!(ppu.mode(), Mode::OamScan, "hblank lasts exactly 204 dots, line total 456");
    assert_eq!(ppu.read_register(boyboy_core::hardware::ppu::LY), 1);
}

#[test]
fn full_frame_sets_frame_ready_and_wraps_ly() {
    let mut bus = InterruptBus::new();
    let mut ppu = Ppu::new();

    // 143 full lines from a fresh reset land exactly on LY=143.
    ppu.tick(456 * 143, &mut bus);
    assert_eq!(ppu.read_register(boyboy_core::hardware::ppu::LY), 143);

    ppu.tick(456, &mut bus);
    assert_eq!(ppu.mode(), Mode::VBlank);
    assert_eq!(ppu.read_register(boyboy_core::hardware::ppu::LY), 144);
    assert!(ppu.frame_ready());

    ppu.consume_frame();
    assert!(!ppu.frame_ready());
    ppu.consume_frame();
    assert!(!ppu.frame_ready(), "consuming twice without a new frame stays cleared");

    ppu.tick(456 * 10, &mut bus);
    assert_eq!(ppu.mode(), Mode::OamScan);
    assert_eq!(ppu.read_register(boyboy_core::hardware::ppu::LY), 0, "ly wraps after the 10 vblank lines");
}
