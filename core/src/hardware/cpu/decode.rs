//! Opcode decode and dispatch.
//!
//! Every unprefixed opcode decomposes into `xxyyyzzz` bit fields (the
//! standard Sharp LR35902/Z80 layout): `x` selects the instruction
//! block, `y`/`z` select operands or sub-opcodes within it, and `p`/`q`
//! further split `y` for the 16-bit register-pair instructions. Working
//! from this decomposition instead of a 256-entry literal table keeps
//! the four near-identical LD/ALU/INC/DEC blocks to one match arm each.

use crate::error::CpuError;
use crate::hardware::interrupts::InterruptBus;
use crate::hardware::mmu::Mmu;
use crate::hardware::registers::{Reg16, Reg8};

use super::Cpu;

#[derive(Clone, Copy)]
enum Operand8 {
    Reg(Reg8),
    HlIndirect,
}

fn operand_from_bits(bits: u8) -> Operand8 {
    match bits & 0x07 {
        0 => Operand8::Reg(Reg8::B),
        1 => Operand8::Reg(Reg8::C),
        2 => Operand8::Reg(Reg8::D),
        3 => Operand8::Reg(Reg8::E),
        4 => Operand8::Reg(Reg8::H),
        5 => Operand8::Reg(Reg8::L),
        6 => Operand8::HlIndirect,
        _ => Operand8::Reg(Reg8::A),
    }
}

const R8_NAMES: [&str; 8] = ["B", "C", "D", "E", "H", "L", "(HL)", "A"];
const RP_NAMES: [&str; 4] = ["BC", "DE", "HL", "SP"];
const RP2_NAMES: [&str; 4] = ["BC", "DE", "HL", "AF"];
const CC_NAMES: [&str; 4] = ["NZ", "Z", "NC", "C"];
const ALU_NAMES: [&str; 8] = ["ADD A,", "ADC A,", "SUB", "SBC A,", "AND", "XOR", "OR", "CP"];

/// A best-effort mnemonic for `-v`-style tracing, derived from the same
/// `xxyyyzzz` decomposition used by [`execute`] rather than a literal
/// 256-entry string table.
pub(super) fn mnemonic(opcode: u8) -> String {
    let x = opcode >> 6;
    let y = ((opcode >> 3) & 0x07) as usize;
    let z = (opcode & 0x07) as usize;
    let p = y >> 1;

    match (x, z) {
        (1, _) if opcode == 0x76 => "HALT".to_string(),
        (1, _) => format!("LD {},{}", R8_NAMES[y], R8_NAMES[z]),
        (2, _) => format!("{} {}", ALU_NAMES[y], R8_NAMES[z]),
        (3, 6) => format!("{} d8", ALU_NAMES[y]),
        (3, 7) => format!("RST {:#04x}", y * 8),
        (0, 4) => format!("INC {}", R8_NAMES[y]),
        (0, 5) => format!("DEC {}", R8_NAMES[y]),
        (0, 6) => format!("LD {},d8", R8_NAMES[y]),
        (0, 1) if y % 2 == 0 => format!("LD {},d16", RP_NAMES[p]),
        (0, 1) => format!("ADD HL,{}", RP_NAMES[p]),
        (0, 0) if y == 0 => "NOP".to_string(),
        (0, 0) if y == 3 => "JR r8".to_string(),
        (0, 0) if y >= 4 => format!("JR {},r8", CC_NAMES[y - 4]),
        (3, 1) if y % 2 == 0 => format!("POP {}", RP2_NAMES[p]),
        (3, 5) if y % 2 == 0 => format!("PUSH {}", RP2_NAMES[p]),
        (3, 0) if y < 4 => format!("RET {}", CC_NAMES[y]),
        (3, 2) if y < 4 => format!("JP {},a16", CC_NAMES[y]),
        (3, 4) if y < 4 => format!("CALL {},a16", CC_NAMES[y]),
        (3, 3) if y == 1 => "PREFIX CB".to_string(),
        (3, 3) if y == 6 => "DI".to_string(),
        (3, 3) if y == 7 => "EI".to_string(),
        (3, 3) if y == 0 => "JP a16".to_string(),
        _ => format!("opcode {:#04x}", opcode),
    }
}

fn rp(p: u8) -> Reg16 {
    match p & 0x03 {
        0 => Reg16::BC,
        1 => Reg16::DE,
        2 => Reg16::HL,
        _ => Reg16::SP,
    }
}

fn rp2(p: u8) -> Reg16 {
    match p & 0x03 {
        0 => Reg16::BC,
        1 => Reg16::DE,
        2 => Reg16::HL,
        _ => Reg16::AF,
    }
}

impl Cpu {
    fn read_operand8(&mut self, op: Operand8, mmu: &mut Mmu, bus: &mut InterruptBus) -> u8 {
        match op {
            Operand8::Reg(r) => self.registers.get8(r),
            Operand8::HlIndirect => {
                let addr = self.registers.hl();
                self.read8(mmu, bus, addr)
            }
        }
    }

    fn write_operand8(&mut self, op: Operand8, value: u8, mmu: &mut Mmu, bus: &mut InterruptBus) {
        match op {
            Operand8::Reg(r) => self.registers.set8(r, value),
            Operand8::HlIndirect => {
                let addr = self.registers.hl();
                self.write8(mmu, bus, addr, value);
            }
        }
    }
}

fn check_condition(cpu: &Cpu, idx: u8) -> bool {
    match idx & 0x03 {
        0 => !cpu.registers.zf(),
        1 => cpu.registers.zf(),
        2 => !cpu.registers.cf(),
        _ => cpu.registers.cf(),
    }
}

fn jump_relative(cpu: &mut Cpu, offset: i8) {
    cpu.registers.pc = cpu.registers.pc.wrapping_add(offset as i16 as u16);
}

fn apply_alu(cpu: &mut Cpu, y: u8, value: u8) {
    match y {
        0 => cpu.add8(value, false),
        1 => cpu.add8(value, true),
        2 => cpu.registers.a = cpu.sub8(value, false),
        3 => cpu.registers.a = cpu.sub8(value, true),
        4 => cpu.and8(value),
        5 => cpu.xor8(value),
        6 => cpu.or8(value),
        _ => {
            cpu.sub8(value, false);
        }
    }
}

pub(super) fn pop16(cpu: &mut Cpu, mmu: &mut Mmu, bus: &mut InterruptBus) -> u16 {
    let addr = cpu.registers.sp;
    let lo = cpu.read8(mmu, bus, addr) as u16;
    cpu.registers.sp = cpu.registers.sp.wrapping_add(1);
    let addr = cpu.registers.sp;
    let hi = cpu.read8(mmu, bus, addr) as u16;
    cpu.registers.sp = cpu.registers.sp.wrapping_add(1);
    (hi << 8) | lo
}

pub(super) fn push16(cpu: &mut Cpu, mmu: &mut Mmu, bus: &mut InterruptBus, value: u16) {
    cpu.registers.sp = cpu.registers.sp.wrapping_sub(1);
    let addr = cpu.registers.sp;
    cpu.write8(mmu, bus, addr, (value >> 8) as u8);
    cpu.registers.sp = cpu.registers.sp.wrapping_sub(1);
    let addr = cpu.registers.sp;
    cpu.write8(mmu, bus, addr, value as u8);
}

fn call(cpu: &mut Cpu, mmu: &mut Mmu, bus: &mut InterruptBus, addr: u16) {
    cpu.internal_delay();
    let pc = cpu.registers.pc;
    push16(cpu, mmu, bus, pc);
    cpu.registers.pc = addr;
}

fn rp2_addr(cpu: &Cpu, p: u8) -> u16 {
    match p & 0x03 {
        0 => cpu.registers.bc(),
        1 => cpu.registers.de(),
        _ => cpu.registers.hl(),
    }
}

fn post_rp2_step(cpu: &mut Cpu, p: u8) {
    match p & 0x03 {
        2 => {
            let hl = cpu.registers.hl();
            cpu.registers.set_hl(hl.wrapping_add(1));
        }
        3 => {
            let hl = cpu.registers.hl();
            cpu.registers.set_hl(hl.wrapping_sub(1));
        }
        _ => {}
    }
}

pub(super) fn execute(
    cpu: &mut Cpu,
    opcode: u8,
    mmu: &mut Mmu,
    bus: &mut InterruptBus,
    pc: u16,
) -> Result<(), CpuError> {
    let x = opcode >> 6;
    let y = (opcode >> 3) & 0x07;
    let z = opcode & 0x07;
    let p = y >> 1;
    let q = y & 1;

    match x {
        0 => {
            execute_block0(cpu, y, z, p, q, mmu, bus);
            Ok(())
        }
        1 => {
            execute_block1(cpu, opcode, y, z, mmu, bus);
            Ok(())
        }
        2 => {
            let op = operand_from_bits(z);
            let value = cpu.read_operand8(op, mmu, bus);
            apply_alu(cpu, y, value);
            Ok(())
        }
        _ => execute_block3(cpu, opcode, y, z, p, q, mmu, bus, pc),
    }
}

fn execute_block0(cpu: &mut Cpu, y: u8, z: u8, p: u8, q: u8, mmu: &mut Mmu, bus: &mut InterruptBus) {
    match z {
        0 => match y {
            0 => {}
            1 => {
                let addr = cpu.fetch16(mmu, bus);
                let sp = cpu.registers.sp;
                cpu.write8(mmu, bus, addr, sp as u8);
                cpu.write8(mmu, bus, addr.wrapping_add(1), (sp >> 8) as u8);
            }
            2 => {
                cpu.fetch8(mmu, bus);
                cpu.stopped = true;
            }
            3 => {
                let offset = cpu.fetch8(mmu, bus) as i8;
                jump_relative(cpu, offset);
                cpu.internal_delay();
            }
            _ => {
                let offset = cpu.fetch8(mmu, bus) as i8;
                if check_condition(cpu, y - 4) {
                    jump_relative(cpu, offset);
                    cpu.internal_delay();
                }
            }
        },
        1 => {
            if q == 0 {
                let value = cpu.fetch16(mmu, bus);
                cpu.registers.set16(rp(p), value);
            } else {
                let value = cpu.registers.get16(rp(p));
                cpu.add_hl(value);
                cpu.internal_delay();
            }
        }
        2 => {
            let addr = rp2_addr(cpu, p);
            if q == 0 {
                let a = cpu.registers.a;
                cpu.write8(mmu, bus, addr, a);
            } else {
                cpu.registers.a = cpu.read8(mmu, bus, addr);
            }
            post_rp2_step(cpu, p);
        }
        3 => {
            let reg = rp(p);
            let value = cpu.registers.get16(reg);
            let result = if q == 0 { value.wrapping_add(1) } else { value.wrapping_sub(1) };
            cpu.registers.set16(reg, result);
            cpu.internal_delay();
        }
        4 => {
            let op = operand_from_bits(y);
            let value = cpu.read_operand8(op, mmu, bus);
            let result = cpu.inc8(value);
            cpu.write_operand8(op, result, mmu, bus);
        }
        5 => {
            let op = operand_from_bits(y);
            let value = cpu.read_operand8(op, mmu, bus);
            let result = cpu.dec8(value);
            cpu.write_operand8(op, result, mmu, bus);
        }
        6 => {
            let value = cpu.fetch8(mmu, bus);
            cpu.write_operand8(operand_from_bits(y), value, mmu, bus);
        }
        _ => match y {
            0 => {
                let a = cpu.registers.a;
                let r = cpu.rlc(a);
                cpu.registers.a = r;
                cpu.registers.set_zf(false);
            }
            1 => {
                let a = cpu.registers.a;
                let r = cpu.rrc(a);
                cpu.registers.a = r;
                cpu.registers.set_zf(false);
            }
            2 => {
                let a = cpu.registers.a;
                let r = cpu.rl(a);
                cpu.registers.a = r;
                cpu.registers.set_zf(false);
            }
            3 => {
                let a = cpu.registers.a;
                let r = cpu.rr(a);
                cpu.registers.a = r;
                cpu.registers.set_zf(false);
            }
            4 => cpu.daa(),
            5 => cpu.cpl(),
            6 => cpu.scf(),
            _ => cpu.ccf(),
        },
    }
}

fn execute_block1(cpu: &mut Cpu, opcode: u8, y: u8, z: u8, mmu: &mut Mmu, bus: &mut InterruptBus) {
    if opcode == 0x76 {
        cpu.halted = true;
        return;
    }
    let src = operand_from_bits(z);
    let dst = operand_from_bits(y);
    let value = cpu.read_operand8(src, mmu, bus);
    cpu.write_operand8(dst, value, mmu, bus);
}

fn execute_block3(
    cpu: &mut Cpu,
    opcode: u8,
    y: u8,
    z: u8,
    p: u8,
    q: u8,
    mmu: &mut Mmu,
    bus: &mut InterruptBus,
    pc: u16,
) -> Result<(), CpuError> {
    match z {
        0 => match y {
            0..=3 => {
                cpu.internal_delay();
                if check_condition(cpu, y) {
                    let addr = pop16(cpu, mmu, bus);
                    cpu.registers.pc = addr;
                    cpu.internal_delay();
                }
            }
            4 => {
                let offset = cpu.fetch8(mmu, bus) as u16;
                let a = cpu.registers.a;
                cpu.write8(mmu, bus, 0xFF00 + offset, a);
            }
            5 => {
                let offset = cpu.fetch8(mmu, bus) as i8;
                let result = cpu.add_sp_signed(offset);
                cpu.internal_delay();
                cpu.internal_delay();
                cpu.registers.sp = result;
            }
            6 => {
                let offset = cpu.fetch8(mmu, bus) as u16;
                cpu.registers.a = cpu.read8(mmu, bus, 0xFF00 + offset);
            }
            _ => {
                let offset = cpu.fetch8(mmu, bus) as i8;
                let result = cpu.add_sp_signed(offset);
                cpu.internal_delay();
                cpu.registers.set_hl(result);
            }
        },
        1 => {
            if q == 0 {
                let value = pop16(cpu, mmu, bus);
                cpu.registers.set16(rp2(p), value);
            } else {
                match p {
                    0 => {
                        let addr = pop16(cpu, mmu, bus);
                        cpu.registers.pc = addr;
                        cpu.internal_delay();
                    }
                    1 => {
                        let addr = pop16(cpu, mmu, bus);
                        cpu.registers.pc = addr;
                        cpu.ime = true;
                        cpu.internal_delay();
                    }
                    2 => cpu.registers.pc = cpu.registers.hl(),
                    _ => {
                        cpu.registers.sp = cpu.registers.hl();
                        cpu.internal_delay();
                    }
                }
            }
        }
        2 => match y {
            0..=3 => {
                let addr = cpu.fetch16(mmu, bus);
                if check_condition(cpu, y) {
                    cpu.registers.pc = addr;
                    cpu.internal_delay();
                }
            }
            4 => {
                let addr = 0xFF00 + cpu.registers.c as u16;
                let a = cpu.registers.a;
                cpu.write8(mmu, bus, addr, a);
            }
            5 => {
                let addr = cpu.fetch16(mmu, bus);
                let a = cpu.registers.a;
                cpu.write8(mmu, bus, addr, a);
            }
            6 => {
                let addr = 0xFF00 + cpu.registers.c as u16;
                cpu.registers.a = cpu.read8(mmu, bus, addr);
            }
            _ => {
                let addr = cpu.fetch16(mmu, bus);
                cpu.registers.a = cpu.read8(mmu, bus, addr);
            }
        },
        3 => match y {
            0 => {
                let addr = cpu.fetch16(mmu, bus);
                cpu.registers.pc = addr;
                cpu.internal_delay();
            }
            1 => {
                let cb_opcode = cpu.fetch8(mmu, bus);
                execute_cb(cpu, cb_opcode, mmu, bus);
            }
            6 => {
                cpu.ime = false;
                cpu.clear_ime_enable_pending();
            }
            7 => cpu.schedule_ime_enable(),
            _ => return Err(CpuError::IllegalOpcode(opcode, pc)),
        },
        4 => match y {
            0..=3 => {
                let addr = cpu.fetch16(mmu, bus);
                if check_condition(cpu, y) {
                    call(cpu, mmu, bus, addr);
                }
            }
            _ => return Err(CpuError::IllegalOpcode(opcode, pc)),
        },
        5 => {
            if q == 0 {
                let value = cpu.registers.get16(rp2(p));
                cpu.internal_delay();
                push16(cpu, mmu, bus, value);
            } else if y == 1 {
                let addr = cpu.fetch16(mmu, bus);
                call(cpu, mmu, bus, addr);
            } else {
                return Err(CpuError::IllegalOpcode(opcode, pc));
            }
        }
        6 => {
            let value = cpu.fetch8(mmu, bus);
            apply_alu(cpu, y, value);
        }
        _ => call(cpu, mmu, bus, (y as u16) * 8),
    }
    Ok(())
}

fn execute_cb(cpu: &mut Cpu, opcode: u8, mmu: &mut Mmu, bus: &mut InterruptBus) {
    let x = opcode >> 6;
    let y = (opcode >> 3) & 0x07;
    let z = opcode & 0x07;
    let op = operand_from_bits(z);
    let value = cpu.read_operand8(op, mmu, bus);

    match x {
        0 => {
            let result = match y {
                0 => cpu.rlc(value),
                1 => cpu.rrc(value),
                2 => cpu.rl(value),
                3 => cpu.rr(value),
                4 => cpu.sla(value),
                5 => cpu.sra(value),
                6 => cpu.swap(value),
                _ => cpu.srl(value),
            };
            cpu.registers.set_zf(result == 0);
            cpu.write_operand8(op, result, mmu, bus);
        }
        1 => {
            let bit_set = value & (1 << y) != 0;
            cpu.registers.set_zf(!bit_set);
            cpu.registers.set_n(false);
            cpu.registers.set_h(true);
        }
        2 => {
            let result = value & !(1 << y);
            cpu.write_operand8(op, result, mmu, bus);
        }
        _ => {
            let result = value | (1 << y);
            cpu.write_operand8(op, result, mmu, bus);
        }
    }
}
