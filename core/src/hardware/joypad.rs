//! Button matrix behind the FF00 register. Both button rows share the
//! same four data bits (A/Right, B/Left, Select/Up, Start/Down); the
//! two select bits choose which row is currently readable.

use crate::hardware::interrupts::{Interrupt, InterruptBus};
use bitflags::bitflags;

pub const JOYPAD: u16 = 0xFF00;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    Start,
    Select,
}

bitflags! {
    #[derive(Default)]
    struct JoypadBits: u8 {
        const RIGHT_A        = 0b0000_0001;
        const LEFT_B         = 0b0000_0010;
        const UP_SELECT      = 0b0000_0100;
        const DOWN_START     = 0b0000_1000;
        const SELECT_DPAD    = 0b0001_0000;
        const SELECT_BUTTONS = 0b0010_0000;
    }
}

impl Button {
    fn bit(self) -> JoypadBits {
        match self {
            Button::Right | Button::A => JoypadBits::RIGHT_A,
            Button::Left | Button::B => JoypadBits::LEFT_B,
            Button::Up | Button::Select => JoypadBits::UP_SELECT,
            Button::Down | Button::Start => JoypadBits::DOWN_START,
        }
    }

    fn is_dpad(self) -> bool {
        matches!(self, Button::Up | Button::Down | Button::Left | Button::Right)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Joypad {
    pressed_buttons: JoypadBits,
    pressed_dpad: JoypadBits,
    select: JoypadBits,
}

impl Joypad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_button_event(&mut self, button: Button, pressed: bool, bus: &mut InterruptBus) {
        let row = if button.is_dpad() {
            &mut self.pressed_dpad
        } else {
            &mut self.pressed_buttons
        };
        let was_set = row.contains(button.bit());
        row.set(button.bit(), pressed);

        let row_selected = if button.is_dpad() {
            self.select.contains(JoypadBits::SELECT_DPAD)
        } else {
            self.select.contains(JoypadBits::SELECT_BUTTONS)
        };
        if pressed && !was_set && row_selected {
            bus.request(Interrupt::Joypad);
        }
    }

    pub fn read(&self) -> u8 {
        let mut active = JoypadBits::empty();
        if self.select.contains(JoypadBits::SELECT_DPAD) {
            active.insert(self.pressed_dpad);
        }
        if self.select.contains(JoypadBits::SELECT_BUTTONS) {
            active.insert(self.pressed_buttons);
        }
        // The register is active-low: 0 means pressed/selected.
        0xC0 | self.select.bits | !active.bits & 0x0F
    }

    pub fn write(&mut self, value: u8) {
        self.select = JoypadBits::from_bits_truncate(value & 0x30);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unselected_row_reads_all_ones() {
        let pad = Joypad::new();
        assert_eq!(pad.read() & 0x0F, 0x0F);
    }

    #[test]
    fn pressing_a_pulls_bit_low_when_buttons_selected() {
        let mut pad = Joypad::new();
        let mut bus = InterruptBus::new();
        pad.write(0b0010_0000); // select buttons
        pad.on_button_event(Button::A, true, &mut bus);
        assert_eq!(pad.read() & 0x01, 0x00);
        assert!(bus.flags.bits() & Interrupt::Joypad.mask() != 0);
    }

    #[test]
    fn press_on_unselected_row_does_not_interrupt() {
        let mut pad = Joypad::new();
        let mut bus = InterruptBus::new();
        pad.write(0b0010_0000); // select buttons, not dpad
        pad.on_button_event(Button::Up, true, &mut bus);
        assert!(bus.flags.bits() & Interrupt::Joypad.mask() == 0);
    }
}
