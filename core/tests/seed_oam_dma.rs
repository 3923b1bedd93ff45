//! Seed scenario 4: OAM DMA copies 160 bytes over 640 T-cycles, drops
//! CPU writes to OAM while active, and resumes normal OAM writes after.

mod common;

use boyboy_core::hardware::interrupts::InterruptBus;
use boyboy_core::hardware::mmu::Mmu;
use boyboy_core::hardware::ppu::DMA;
use pretty_assertions::assert_eq;

#[test]
fn oam_dma_copies_160_bytes_then_releases_the_bus() {
    let mut bus = InterruptBus::new();
    let mut mmu = Mmu::new(common::rom_with_program(&[])).unwrap();

    for i in 0..0xA0u16 {
        mmu.write_byte(0xC000 + i, i as u8, &mut bus);
    }
    mmu.write_byte(DMA, 0xC0, &mut bus);

    // Dropped while the transfer is in flight.
    mmu.write_byte(0xFE00, 0xFF, &mut bus);

    mmu.tick(640, &mut bus);

    for i in 0..0xA0u16 {
        assert_eq!(mmu.ppu.read_oam(0xFE00 + i, true), i as u8, "oam byte {} mismatched after dma", i);
    }

    // Normal OAM writes resume after completion.
    mmu.write_byte(0xFE00, 0x77, &mut bus);
    assert_eq!(mmu.ppu.read_oam(0xFE00, true), 0x77);
}
