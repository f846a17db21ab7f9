//! A self-contained tank simulation implementing the backend's vehicle
//! contract.
//!
//! The emulator advances on caller-supplied time steps, so a test or a demo
//! server owns the clock. Kinematics stay simple (straight segments,
//! in-place turns, a square arena) while the control semantics are complete:
//! pending values commit on execute, a control tick gates steady state, the
//! gun heats and cools, walls stop the hull and raise an event.

mod emulator;
mod option;

pub use emulator::TankEmulator;
pub use option::EmulatorOption;
