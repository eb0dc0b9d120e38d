use thiserror::Error;

/// A fault raised while loading or stepping the machine.
///
/// The core never recovers from one of these internally; every fault is
/// returned to whoever called [`crate::Chip8::step`], and the usual host
/// policy is to halt the run and log it. Faults carry the address of the
/// instruction that raised them (and the raw word where it matters) so a
/// bad ROM can be diagnosed from the log alone.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The fetched word matches no known instruction pattern.
    #[error("unrecognized instruction {word:#06x} at {pc:#05x}")]
    Decode { pc: u16, word: u16 },

    /// A recognized instruction with no executor arm. Unreachable once all
    /// 35 operations are in place; kept for partial builds.
    #[error("unimplemented instruction {word:#06x} at {pc:#05x}")]
    Unimplemented { pc: u16, word: u16 },

    /// A computed memory address fell outside the 4096-byte space.
    #[error("memory access at {addr:#05x} out of range (pc {pc:#05x})")]
    Address { pc: u16, addr: u16 },

    /// A subroutine call with all 16 stack slots in use.
    #[error("call stack overflow at {pc:#05x}")]
    StackOverflow { pc: u16 },

    /// A return with no call outstanding.
    #[error("return with empty call stack at {pc:#05x}")]
    StackUnderflow { pc: u16 },

    /// A program image too large for the 0x200..0x1000 region.
    #[error("program of {len} bytes does not fit in memory")]
    OversizedProgram { len: usize },
}
