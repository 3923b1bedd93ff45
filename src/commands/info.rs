use anyhow::{Context, Result};
use boyboy_core::hardware::cartridge::header::CartridgeHeader;

use crate::options::InfoOptions;

pub fn run(opts: InfoOptions) -> Result<()> {
    let rom = std::fs::read(&opts.rom).with_context(|| format!("reading {}", opts.rom))?;
    let header = CartridgeHeader::parse(&rom)?;

    println!("title:        {}", header.title);
    println!("cartridge:    {:#04x}", header.cartridge_type);
    println!("rom size:     {} KiB", header.rom_bank_count() * 16);
    println!("ram size:     {} bytes", header.ram_size_bytes());
    println!("has battery:  {}", header.has_battery());
    println!("global sum ok: {}", header.verify_global_checksum(&rom));

    Ok(())
}
