//! Seed scenario 5: TIMA overflow holds at 0x00 for 4 T-cycles before
//! TMA reloads it, with the Timer interrupt firing exactly once at the
//! reload point.

use boyboy_core::hardware::interrupts::{Interrupt, InterruptBus};
use boyboy_core::hardware::timer::Timer;
use pretty_assertions::assert_eq;

#[test]
fn tima_overflow_delays_reload_by_four_cycles() {
    let mut bus = InterruptBus::new();
    bus.enable(Interrupt::Timer);
    let mut timer = Timer::new();

    timer.write_tac(0x05); // enabled, select bit 3 (262144 Hz)
    timer.write_tma(0x42);
    // Drive TIMA to 0xFF via direct writes (write_tima bypasses the
    // falling-edge path entirely, which is the point of this seed).
    timer.write_tima(0xFF);

    // Bit 3 of the 16-bit DIV counter rises at count 8 and falls at 16,
    // so the falling edge (and the overflow it causes) lands exactly on
    // the 16th tick from a DIV counter of zero.
    timer.tick(16, &mut bus);
    assert_eq!(timer.tima(), 0x00, "tima should have just overflowed to 0");
    assert!(!bus.has_pending(), "interrupt must not fire on the overflow tick itself");

    timer.tick(3, &mut bus);
    assert_eq!(timer.tima(), 0x00, "tima stays at 0 for the three cycles after overflow");
    assert!(!bus.has_pending());

    timer.tick(1, &mut bus);
    assert_eq!(timer.tima(), 0x42, "tima reloads from tma on the 4th cycle after overflow");
    assert!(bus.has_pending(), "timer interrupt must fire exactly at the reload");

    bus.clear(Interrupt::Timer);
    timer.tick(1, &mut bus);
    assert!(!bus.has_pending(), "interrupt must not re-fire on subsequent ticks");
}
