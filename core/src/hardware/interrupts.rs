//! The interrupt bus: IE (FFFF) and IF (FF0F), and the five interrupt
//! sources in their hardware priority order.
//!
//! This is a plain value type, not a component with a back-pointer to
//! the CPU: the CPU reads it at its between-instruction hook and the
//! peripherals (Timer, PPU, Joypad, Serial) call `request` on it during
//! their own `tick`.

use bitflags::bitflags;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Interrupt {
    VBlank,
    LcdStat,
    Timer,
    Serial,
    Joypad,
}

impl Interrupt {
    /// Priority order, high to low, as used for both IF bit resolution
    /// and simultaneous-request tie-breaking.
    pub const PRIORITY: [Interrupt; 5] = [
        Interrupt::VBlank,
        Interrupt::LcdStat,
        Interrupt::Timer,
        Interrupt::Serial,
        Interrupt::Joypad,
    ];

    pub fn bit(self) -> u8 {
        match self {
            Interrupt::VBlank => 0,
            Interrupt::LcdStat => 1,
            Interrupt::Timer => 2,
            Interrupt::Serial => 3,
            Interrupt::Joypad => 4,
        }
    }

    pub fn mask(self) -> u8 {
        1 << self.bit()
    }

    pub fn vector(self) -> u16 {
        match self {
            Interrupt::VBlank => 0x0040,
            Interrupt::LcdStat => 0x0048,
            Interrupt::Timer => 0x0050,
            Interrupt::Serial => 0x0058,
            Interrupt::Joypad => 0x0060,
        }
    }
}

bitflags! {
    #[derive(Default)]
    pub struct InterruptFlags: u8 {
        const VBLANK  = 0b0000_0001;
        const LCDSTAT = 0b0000_0010;
        const TIMER   = 0b0000_0100;
        const SERIAL  = 0b0000_1000;
        const JOYPAD  = 0b0001_0000;
        /// Bits 5-7 are unused but readable/writable on real IF/IE.
        const UNUSED  = 0b1110_0000;
    }
}

#[derive(Debug, Default, Clone)]
pub struct InterruptBus {
    pub enable: InterruptFlags,
    pub flags: InterruptFlags,
}

impl InterruptBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, interrupt: Interrupt) {
        self.flags.insert(InterruptFlags::from_bits_truncate(interrupt.mask()));
    }

    pub fn enable(&mut self, interrupt: Interrupt) {
        self.enable.insert(InterruptFlags::from_bits_truncate(interrupt.mask()));
    }

    /// `IE & IF`, the set of interrupts that are both enabled and requested.
    pub fn pending(&self) -> u8 {
        self.enable.bits & self.flags.bits
    }

    pub fn has_pending(&self) -> bool {
        self.pending() != 0
    }

    /// The highest-priority pending interrupt, if any.
    pub fn highest_priority(&self) -> Option<Interrupt> {
        let pending = self.pending();
        Interrupt::PRIORITY
            .iter()
            .copied()
            .find(|i| pending & i.mask() != 0)
    }

    pub fn clear(&mut self, interrupt: Interrupt) {
        self.flags.remove(InterruptFlags::from_bits_truncate(interrupt.mask()));
    }

    pub fn read_if(&self) -> u8 {
        // Bits 5-7 read back as 1 on real hardware.
        self.flags.bits | 0xE0
    }

    pub fn write_if(&mut self, value: u8) {
        self.flags = InterruptFlags::from_bits_truncate(value);
    }

    pub fn read_ie(&self) -> u8 {
        self.enable.bits
    }

    pub fn write_ie(&mut self, value: u8) {
        self.enable = InterruptFlags::from_bits_truncate(value);
    }
}
