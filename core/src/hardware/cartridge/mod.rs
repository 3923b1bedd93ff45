//! Cartridge: header-driven MBC construction, plus the battery-save
//! blob format (flat RAM dump + trailing 16-bit checksum).

pub mod header;
pub mod mbc;

use crate::error::{RomError, SaveError};
use header::CartridgeHeader;
use mbc::{Mbc, Mbc1, Mbc2, Mbc3, Mbc5, RomOnly};

#[derive(Debug)]
pub struct Cartridge {
    pub header: CartridgeHeader,
    mbc: Box<dyn Mbc>,
}

impl Cartridge {
    pub fn load(rom: Vec<u8>) -> Result<Self, RomError> {
        let header = CartridgeHeader::parse(&rom)?;
        if let Some(mismatch) = header.global_checksum_mismatch(&rom) {
            log::warn!("{mismatch}");
        }
        let ram_size = header.ram_size_bytes();
        let has_battery = header.has_battery();

        let mbc: Box<dyn Mbc> = match header.cartridge_type {
            0x00 | 0x08 | 0x09 => Box::new(RomOnly::new(rom, ram_size, has_battery)),
            0x01..=0x03 => Box::new(Mbc1::new(rom, ram_size, has_battery)),
            0x05 | 0x06 => Box::new(Mbc2::new(rom, has_battery)),
            0x0F..=0x13 => {
                let has_rtc = matches!(header.cartridge_type, 0x0F | 0x10);
                Box::new(Mbc3::new(rom, ram_size, has_battery, has_rtc))
            }
            0x19..=0x1E => Box::new(Mbc5::new(rom, ram_size, has_battery)),
            other => return Err(RomError::UnsupportedCartridgeType(other)),
        };

        Ok(Cartridge { header, mbc })
    }

    pub fn read_byte(&self, address: u16) -> u8 {
        match address {
            0x0000..=0x7FFF => self.mbc.read_rom(address),
            0xA000..=0xBFFF => self.mbc.read_ram(address),
            _ => 0xFF,
        }
    }

    pub fn write_byte(&mut self, address: u16, value: u8) {
        match address {
            0x0000..=0x7FFF => self.mbc.write_rom(address, value),
            0xA000..=0xBFFF => self.mbc.write_ram(address, value),
            _ => {}
        }
    }

    /// Serializes the battery-backed RAM for persistence, `None` for
    /// cartridges with no battery (nothing to save).
    pub fn battery_save_blob(&self) -> Option<Vec<u8>> {
        let ram = self.mbc.battery_ram()?;
        let mut blob = Vec::with_capacity(ram.len() + 2);
        blob.extend_from_slice(ram);
        let checksum = checksum16(ram);
        blob.extend_from_slice(&checksum.to_be_bytes());
        Some(blob)
    }

    /// Restores battery RAM from a blob produced by [`battery_save_blob`].
    pub fn load_battery_save(&mut self, blob: &[u8]) -> Result<(), SaveError> {
        if blob.len() < 2 {
            return Err(SaveError::ChecksumMismatch);
        }
        let (ram, checksum_bytes) = blob.split_at(blob.len() - 2);
        let expected = u16::from_be_bytes([checksum_bytes[0], checksum_bytes[1]]);
        if checksum16(ram) != expected {
            return Err(SaveError::ChecksumMismatch);
        }
        self.mbc.load_ram(ram);
        Ok(())
    }
}

fn checksum16(data: &[u8]) -> u16 {
    data.iter().fold(0u16, |acc, &b| acc.wrapping_add(b as u16))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rom_with(cartridge_type: u8, ram_size_code: u8) -> Vec<u8> {
        let mut rom = vec![0u8; 0x8000];
        rom[0x147] = cartridge_type;
        rom[0x148] = 0x00;
        rom[0x149] = ram_size_code;
        let mut x: u8 = 0;
        for &b in &rom[0x134..=0x14C] {
            x = x.wrapping_sub(b).wrapping_sub(1);
        }
        rom[0x14D] = x;
        rom
    }

    #[test]
    fn rom_only_dispatch() {
        let cart = Cartridge::load(rom_with(0x00, 0x00)).unwrap();
        assert_eq!(cart.read_byte(0x0000), 0x00);
    }

    #[test]
    fn global_checksum_mismatch_is_not_fatal() {
        let mut rom = rom_with(0x00, 0x00);
        rom[0x14E] = rom[0x14E].wrapping_add(1); // corrupt the global checksum only
        assert!(Cartridge::load(rom).is_ok(), "a bad global checksum must only warn, never fail loading");
    }

    #[test]
    fn unsupported_type_rejected() {
        assert!(matches!(Cartridge::load(rom_with(0xFE, 0x00)), Err(RomError::UnsupportedCartridgeType(0xFE))));
    }

    #[test]
    fn battery_save_round_trips_with_checksum() {
        let mut cart = Cartridge::load(rom_with(0x03, 0x02)).unwrap(); // MBC1+RAM+BATTERY, 8KiB
        cart.write_byte(0x0000, 0x0A); // enable ram
        cart.write_byte(0xA000, 0x42);

        let blob = cart.battery_save_blob().unwrap();

        let mut restored = Cartridge::load(rom_with(0x03, 0x02)).unwrap();
        restored.load_battery_save(&blob).unwrap();
        restored.write_byte(0x0000, 0x0A);
        assert_eq!(restored.read_byte(0xA000), 0x42);
    }

    #[test]
    fn corrupted_save_blob_rejected() {
        let cart = Cartridge::load(rom_with(0x03, 0x02)).unwrap();
        let mut blob = cart.battery_save_blob().unwrap();
        let last = blob.len() - 1;
        blob[last] ^= 0xFF;

        let mut restored = Cartridge::load(rom_with(0x03, 0x02)).unwrap();
        assert!(matches!(restored.load_battery_save(&blob), Err(SaveError::ChecksumMismatch)));
    }
}
