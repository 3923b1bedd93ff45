use boyboy_core::hardware::cpu::Cpu;
use boyboy_core::hardware::interrupts::InterruptBus;
use boyboy_core::hardware::mmu::Mmu;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn synthetic_rom() -> Vec<u8> {
    let mut rom = vec![0u8; 0x8000];
    // A short, representative instruction stream: loads, an 8-bit add,
    // a conditional jump back to the top, repeated to fill the page.
    let program = [
        0x3E, 0x01, // LD A,1
        0x06, 0x02, // LD B,2
        0x80, // ADD A,B
        0x04, // INC B
        0x05, // DEC B
        0x20, 0xF8, // JR NZ,-8 (loops back to LD A,1)
    ];
    rom[0x100..0x100 + program.len()].copy_from_slice(&program);
    let mut checksum: u8 = 0;
    for &b in &rom[0x134..=0x14C] {
        checksum = checksum.wrapping_sub(b).wrapping_sub(1);
    }
    rom[0x14D] = checksum;
    rom
}

fn bench_cpu_step(c: &mut Criterion) {
    c.bench_function("cpu_step_synthetic_loop", |b| {
        b.iter(|| {
            let mut cpu = Cpu::new();
            let mut mmu = Mmu::new(synthetic_rom()).unwrap();
            let mut bus = InterruptBus::new();
            for _ in 0..10_000 {
                black_box(cpu.step(&mut mmu, &mut bus).unwrap());
            }
        })
    });
}

criterion_group!(benches, bench_cpu_step);
criterion_main!(benches);
