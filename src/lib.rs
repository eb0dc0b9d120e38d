//! A CHIP-8 virtual machine.
//!
//! The core is the fetch/decode/execute engine over the fixed 35-member
//! instruction set plus the machine state it mutates: 4K of memory with
//! the font at 0x050 and programs at 0x200, sixteen 8-bit registers, the
//! address register, a 16-deep call stack, two 60 Hz countdown timers, a
//! 64x32 one-bit display, and the hex keypad.
//!
//! Decoding is total ([`Instruction::decode`]) and execution returns
//! typed faults ([`Fault`]) instead of panicking, so the host decides
//! what a bad ROM means. Window, rendering, keyboard events and ROM file
//! loading live in the host binary, not here; the host drives
//! [`Chip8::step`] at its chosen instruction rate and feeds wall-clock
//! time to the timers separately.

pub mod chip8;
pub mod display;
pub mod fault;
pub mod instruction;
pub mod memory;
pub mod timers;

pub use chip8::{Chip8, Quirks};
pub use fault::Fault;
pub use instruction::Instruction;
