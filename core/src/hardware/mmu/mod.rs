//! The memory-mapped bus: a region dispatcher that routes CPU accesses
//! to WRAM, HRAM, the cartridge, and the IO peripherals (Timer, Serial,
//! Joypad, APU, PPU, interrupts), plus the OAM DMA transfer engine.

use crate::error::RomError;
use crate::hardware::apu::Apu;
use crate::hardware::cartridge::Cartridge;
use crate::hardware::interrupts::InterruptBus;
use crate::hardware::joypad::{Button, Joypad, JOYPAD};
use crate::hardware::ppu::{Ppu, DMA, LCDC, LY, LYC, OBP0, OBP1, SCX, SCY, STAT, WX, WY};
use crate::hardware::serial::{Serial, SB, SC};
use crate::hardware::timer::{Timer, DIV, TAC, TIMA, TMA};

const WRAM_START: u16 = 0xC000;
const WRAM_END: u16 = 0xDFFF;
const ECHO_START: u16 = 0xE000;
const ECHO_END: u16 = 0xFDFF;
const OAM_START: u16 = 0xFE00;
const OAM_END: u16 = 0xFE9F;
const NOT_USABLE_START: u16 = 0xFEA0;
const NOT_USABLE_END: u16 = 0xFEFF;
const IO_START: u16 = 0xFF00;
const IO_END: u16 = 0xFF7F;
const HRAM_START: u16 = 0xFF80;
const HRAM_END: u16 = 0xFFFE;
const IF: u16 = 0xFF0F;
const IE: u16 = 0xFFFF;
const VRAM_START: u16 = 0x8000;
const VRAM_END: u16 = 0x9FFF;

const WRAM_SIZE: usize = (WRAM_END - WRAM_START + 1) as usize;
const HRAM_SIZE: usize = (HRAM_END - HRAM_START + 1) as usize;

#[derive(Debug, Default)]
struct OamDma {
    active: bool,
    src_base: u16,
    bytes_remaining: u16,
    tick_counter: u32,
}

#[derive(Debug)]
pub struct Mmu {
    cartridge: Cartridge,
    wram: [u8; WRAM_SIZE],
    hram: [u8; HRAM_SIZE],
    pub ppu: Ppu,
    pub timer: Timer,
    pub serial: Serial,
    pub joypad: Joypad,
    pub apu: Apu,
    dma: OamDma,
}

impl Mmu {
    pub fn new(rom: Vec<u8>) -> Result<Self, RomError> {
        Ok(Mmu {
            cartridge: Cartridge::load(rom)?,
            wram: [0; WRAM_SIZE],
            hram: [0; HRAM_SIZE],
            ppu: Ppu::new(),
            timer: Timer::new(),
            serial: Serial::new(),
            joypad: Joypad::new(),
            apu: Apu::new(),
            dma: OamDma::default(),
        })
    }

    pub fn with_serial(mut self, serial: Serial) -> Self {
        self.serial = serial;
        self
    }

    pub fn cartridge(&self) -> &Cartridge {
        &self.cartridge
    }

    pub fn cartridge_mut(&mut self) -> &mut Cartridge {
        &mut self.cartridge
    }

    pub fn on_button_event(&mut self, button: Button, pressed: bool, bus: &mut InterruptBus) {
        self.joypad.on_button_event(button, pressed, bus);
    }

    /// Advances Timer, the OAM DMA transfer, and the PPU by `cycles`
    /// T-cycles, in that order, exactly as the driver's step loop would.
    pub fn tick(&mut self, cycles: u32, bus: &mut InterruptBus) {
        self.timer.tick(cycles, bus);
        self.tick_dma(cycles);
        self.ppu.tick(cycles, bus);
    }

    fn tick_dma(&mut self, cycles: u32) {
        if !self.dma.active {
            return;
        }
        self.dma.tick_counter += cycles;
        while self.dma.tick_counter >= 4 && self.dma.bytes_remaining > 0 {
            let index = 160 - self.dma.bytes_remaining;
            let value = self.read_byte_unlocked(self.dma.src_base + index);
            self.ppu.dma_write_oam(index as usize, value);
            self.dma.bytes_remaining -= 1;
            self.dma.tick_counter -= 4;
        }
        if self.dma.bytes_remaining == 0 {
            self.dma.active = false;
        }
    }

    fn start_dma(&mut self, high_byte: u8) {
        self.dma.src_base = (high_byte as u16) << 8;
        self.dma.bytes_remaining = 160;
        self.dma.tick_counter = 0;
        self.dma.active = true;
    }

    pub fn read_byte(&self, address: u16, bus: &InterruptBus) -> u8 {
        self.read_byte_inner(address, bus, false)
    }

    /// Bypasses VRAM/OAM locks; used by the OAM DMA source read and by
    /// debug tooling. Never touches IF/IE, so a scratch bus is fine.
    pub fn read_byte_unlocked(&self, address: u16) -> u8 {
        let scratch = InterruptBus::new();
        self.read_byte_inner(address, &scratch, true)
    }

    fn read_byte_inner(&self, address: u16, bus: &InterruptBus, unlocked: bool) -> u8 {
        match address {
            0x0000..=0x7FFF => self.cartridge.read_byte(address),
            VRAM_START..=VRAM_END => self.ppu.read_vram(address, unlocked),
            0xA000..=0xBFFF => self.cartridge.read_byte(address),
            WRAM_START..=WRAM_END => self.wram[(address - WRAM_START) as usize],
            ECHO_START..=ECHO_END => self.wram[(address - ECHO_START) as usize],
            OAM_START..=OAM_END => self.ppu.read_oam(address, unlocked || self.dma.active),
            NOT_USABLE_START..=NOT_USABLE_END => 0xFF,
            IF => bus.read_if(),
            IO_START..=IO_END => self.read_io(address),
            HRAM_START..=HRAM_END => self.hram[(address - HRAM_START) as usize],
            IE => bus.read_ie(),
            _ => 0xFF,
        }
    }

    pub fn write_byte(&mut self, address: u16, value: u8, bus: &mut InterruptBus) {
        match address {
            0x0000..=0x7FFF => self.cartridge.write_byte(address, value),
            VRAM_START..=VRAM_END => self.ppu.write_vram(address, value, false),
            0xA000..=0xBFFF => self.cartridge.write_byte(address, value),
            WRAM_START..=WRAM_END => self.wram[(address - WRAM_START) as usize] = value,
            ECHO_START..=ECHO_END => self.wram[(address - ECHO_START) as usize] = value,
            OAM_START..=OAM_END => {
                if !self.dma.active {
                    self.ppu.write_oam(address, value, false);
                }
            }
            NOT_USABLE_START..=NOT_USABLE_END => {}
            IF => bus.write_if(value),
            IO_START..=IO_END => self.write_io(address, value, bus),
            HRAM_START..=HRAM_END => self.hram[(address - HRAM_START) as usize] = value,
            IE => bus.write_ie(value),
        }
    }

    pub fn read_word(&self, address: u16, bus: &InterruptBus) -> u16 {
        let lo = self.read_byte(address, bus) as u16;
        let hi = self.read_byte(address.wrapping_add(1), bus) as u16;
        (hi << 8) | lo
    }

    pub fn write_word(&mut self, address: u16, value: u16, bus: &mut InterruptBus) {
        self.write_byte(address, (value & 0xFF) as u8, bus);
        self.write_byte(address.wrapping_add(1), (value >> 8) as u8, bus);
    }

    fn read_io(&self, address: u16) -> u8 {
        match address {
            JOYPAD => self.joypad.read(),
            SB => self.serial.read_sb(),
            SC => self.serial.read_sc(),
            DIV => self.timer.div(),
            TIMA => self.timer.tima(),
            TMA => self.timer.tma(),
            TAC => self.timer.tac(),
            LCDC | STAT | SCY | SCX | LY | LYC | OBP0 | OBP1 | WY | WX | DMA => self.ppu.read_register(address),
            a if Apu::contains(a) => self.apu.read(a),
            _ => 0xFF,
        }
    }

    fn write_io(&mut self, address: u16, value: u8, bus: &mut InterruptBus) {
        match address {
            JOYPAD => self.joypad.write(value),
            SB => self.serial.write_sb(value),
            SC => self.serial.write_sc(value),
            DIV => self.timer.write_div(),
            TIMA => self.timer.write_tima(value),
            TMA => self.timer.write_tma(value),
            TAC => self.timer.write_tac(value),
            DMA => self.start_dma(value),
            LCDC | STAT | SCY | SCX | LY | LYC | OBP0 | OBP1 | WY | WX => {
                self.ppu.write_register(address, value, bus)
            }
            a if Apu::contains(a) => self.apu.write(a, value),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mmu_with_rom() -> Mmu {
        let mut rom = vec![0u8; 0x8000];
        let mut x: u8 = 0;
        for &b in &rom[0x134..=0x14C] {
            x = x.wrapping_sub(b).wrapping_sub(1);
        }
        rom[0x14D] = x;
        Mmu::new(rom).unwrap()
    }

    #[test]
    fn echo_mirrors_wram() {
        let mut bus = InterruptBus::new();
        let mut mmu = mmu_with_rom();
        mmu.write_byte(0xC010, 0x99, &mut bus);
        assert_eq!(mmu.read_byte(0xE010, &bus), 0x99);
    }

    #[test]
    fn oam_dma_copies_160_bytes_over_640_cycles() {
        let mut bus = InterruptBus::new();
        let mut mmu = mmu_with_rom();
        for i in 0..160u16 {
            mmu.write_byte(0xC000 + i, i as u8, &mut bus);
        }
        mmu.write_byte(DMA, 0xC0, &mut bus);

        mmu.tick(639, &mut bus);
        assert_eq!(mmu.ppu.read_oam(0xFE9F, true), 0);

        mmu.tick(1, &mut bus);
        assert_eq!(mmu.ppu.read_oam(0xFE9F, true), 159);
    }

    #[test]
    fn oam_writes_from_cpu_dropped_during_dma() {
        let mut bus = InterruptBus::new();
        let mut mmu = mmu_with_rom();
        mmu.write_byte(DMA, 0xC0, &mut bus);
        mmu.write_byte(0xFE00, 0x77, &mut bus);
        assert_ne!(mmu.ppu.read_oam(0xFE00, true), 0x77);
    }

    #[test]
    fn interrupt_enable_register_round_trips() {
        let mut bus = InterruptBus::new();
        let mmu = mmu_with_rom();
        bus.write_ie(0x1F);
        assert_eq!(mmu.read_byte(IE, &bus), 0x1F);
    }
}
