use log::trace;
use rand::prelude::*;

use crate::display::Display;
use crate::fault::Fault;
use crate::instruction::Instruction;
use crate::memory::{self, Memory};
use crate::timers::Timers;

/// Points of divergence between historical CHIP-8 machines, pinned here
/// instead of silently picked. The defaults match the common modern
/// behavior: sprites clip at the screen edge and shifts operate on `Vx`
/// in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct Quirks {
    /// Wrap sprite pixels at the screen edge instead of clipping them.
    pub wrap_sprites: bool,
    /// Shifts read their operand from `Vy` (COSMAC VIP behavior) instead
    /// of `Vx`; the result still lands in `Vx`.
    pub shift_source_vy: bool,
}

/// The CHIP-8 virtual machine.
///
/// One owner drives it: [`step`](Chip8::step) runs a single
/// fetch/decode/execute cycle against `&mut self`, and every mutation of
/// machine state happens inside that call. The host feeds the keypad and
/// wall-clock time in between cycles and reads the display out.
pub struct Chip8 {
    memory: Memory,
    v: [u8; 16], // registers V0-VF (VF is the flag output for some instructions)
    i: u16,      // address register
    pc: u16,     // program counter
    stack: [u16; 16],
    sp: usize, // stack pointer
    timers: Timers,
    gfx: Display,
    keys: [bool; 16], // hex keypad state, written by the host
    draw_flag: bool,
    rng: ThreadRng,
    quirks: Quirks,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_quirks(Quirks::default())
    }

    pub fn with_quirks(quirks: Quirks) -> Self {
        Self {
            memory: Memory::new(),
            v: [0; 16],
            i: 0,
            pc: memory::PROG_START, // programs start at 0x200
            stack: [0; 16],
            sp: 0,
            timers: Timers::new(),
            gfx: Display::new(),
            keys: [false; 16],
            draw_flag: false,
            rng: rand::thread_rng(),
            quirks,
        }
    }

    /// Drop everything back to the power-on state: memory cleared with
    /// the font re-copied, registers, stack, timers and display zeroed,
    /// pc at 0x200. The program image is cleared too; reload it before
    /// stepping again.
    pub fn reset(&mut self) {
        *self = Self::with_quirks(self.quirks);
    }

    /// Copy a program image in at 0x200. Oversized images are refused.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), Fault> {
        self.memory.load_rom(rom)
    }

    /// Replace the built-in font table at 0x050.
    pub fn load_font(&mut self, font: &[u8; 80]) {
        self.memory.load_font(font);
    }

    pub fn gfx(&self) -> &Display {
        &self.gfx
    }

    /// True after a cycle that changed the display.
    pub fn draw_flag(&self) -> bool {
        self.draw_flag
    }

    pub fn sound_active(&self) -> bool {
        self.timers.sound_active()
    }

    /// Fold real elapsed time into the 60 Hz timers.
    pub fn advance_timers(&mut self, dt: std::time::Duration) {
        self.timers.advance(dt);
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn press_key(&mut self, key: usize) {
        self.keys[key] = true;
    }

    pub fn release_key(&mut self, key: usize) {
        self.keys[key] = false;
    }

    pub fn clear_keys(&mut self) {
        self.keys = [false; 16];
    }

    /// Run one fetch/decode/execute cycle.
    pub fn step(&mut self) -> Result<(), Fault> {
        let pc = self.pc;
        let word = self
            .memory
            .read_word(pc)
            .ok_or(Fault::Address { pc, addr: pc })?;
        let instr = Instruction::decode(word);
        trace!("{pc:#05X}: {word:04X} {instr:?}");

        self.draw_flag = false;
        self.execute(instr, pc, word)
    }

    /// Apply one decoded operation. `pc` is the address the instruction
    /// was fetched from; the counter has moved past it by the time any
    /// arm runs, so jumps assign it, skips bump it again, and the key
    /// wait rolls it back to stall.
    fn execute(&mut self, instr: Instruction, pc: u16, word: u16) -> Result<(), Fault> {
        use Instruction::*;

        self.pc = pc.wrapping_add(2);
        match instr {
            Cls => {
                self.gfx.clear();
                self.draw_flag = true;
            }
            Ret => {
                if self.sp == 0 {
                    return Err(Fault::StackUnderflow { pc });
                }
                self.sp -= 1;
                self.pc = self.stack[self.sp];
            }
            Jp(nnn) => self.pc = nnn,
            Call(nnn) => {
                if self.sp == self.stack.len() {
                    return Err(Fault::StackOverflow { pc });
                }
                self.stack[self.sp] = self.pc;
                self.sp += 1;
                self.pc = nnn;
            }
            SeByte(x, kk) => {
                if self.v[x] == kk {
                    self.skip();
                }
            }
            SneByte(x, kk) => {
                if self.v[x] != kk {
                    self.skip();
                }
            }
            SeReg(x, y) => {
                if self.v[x] == self.v[y] {
                    self.skip();
                }
            }
            LdByte(x, kk) => self.v[x] = kk,
            AddByte(x, kk) => self.v[x] = self.v[x].wrapping_add(kk),
            LdReg(x, y) => self.v[x] = self.v[y],
            Or(x, y) => self.v[x] |= self.v[y],
            And(x, y) => self.v[x] &= self.v[y],
            Xor(x, y) => self.v[x] ^= self.v[y],
            AddReg(x, y) => {
                // flag lands last so the op stays defined when x is F
                let (sum, carry) = self.v[x].overflowing_add(self.v[y]);
                self.v[x] = sum;
                self.v[0xF] = carry as u8;
            }
            Sub(x, y) => {
                let (diff, borrow) = self.v[x].overflowing_sub(self.v[y]);
                self.v[x] = diff;
                self.v[0xF] = !borrow as u8;
            }
            Subn(x, y) => {
                let (diff, borrow) = self.v[y].overflowing_sub(self.v[x]);
                self.v[x] = diff;
                self.v[0xF] = !borrow as u8;
            }
            Shr(x, y) => {
                let src = if self.quirks.shift_source_vy {
                    self.v[y]
                } else {
                    self.v[x]
                };
                self.v[x] = src >> 1;
                self.v[0xF] = src & 0x1;
            }
            Shl(x, y) => {
                let src = if self.quirks.shift_source_vy {
                    self.v[y]
                } else {
                    self.v[x]
                };
                self.v[x] = src << 1;
                self.v[0xF] = src >> 7;
            }
            SneReg(x, y) => {
                if self.v[x] != self.v[y] {
                    self.skip();
                }
            }
            LdI(nnn) => self.i = nnn,
            JpV0(nnn) => self.pc = nnn.wrapping_add(u16::from(self.v[0])),
            Rnd(x, kk) => self.v[x] = self.rng.gen::<u8>() & kk,
            Drw(x, y, n) => {
                let rows = self
                    .memory
                    .read_bytes(self.i, usize::from(n))
                    .ok_or(Fault::Address { pc, addr: self.i })?;
                let collision =
                    self.gfx
                        .draw_sprite(self.v[x], self.v[y], rows, self.quirks.wrap_sprites);
                self.v[0xF] = collision as u8;
                self.draw_flag = true;
            }
            Skp(x) => {
                if self.key_down(self.v[x]) {
                    self.skip();
                }
            }
            Sknp(x) => {
                if !self.key_down(self.v[x]) {
                    self.skip();
                }
            }
            LdDt(x) => self.v[x] = self.timers.delay(),
            LdKey(x) => match self.keys.iter().position(|&down| down) {
                Some(key) => self.v[x] = key as u8,
                // nothing down: hold the counter so this re-executes
                None => self.pc = pc,
            },
            SetDt(x) => self.timers.set_delay(self.v[x]),
            SetSt(x) => self.timers.set_sound(self.v[x]),
            AddI(x) => self.i = self.i.wrapping_add(u16::from(self.v[x])),
            LdFont(x) => self.i = memory::FONT_START + 5 * u16::from(self.v[x] & 0xF),
            Bcd(x) => {
                let vx = self.v[x];
                let digits = [vx / 100, (vx / 10) % 10, vx % 10];
                self.memory
                    .write_bytes(self.i, &digits)
                    .ok_or(Fault::Address { pc, addr: self.i })?;
            }
            Store(x) => {
                self.memory
                    .write_bytes(self.i, &self.v[..=x])
                    .ok_or(Fault::Address { pc, addr: self.i })?;
            }
            Load(x) => {
                let bytes = self
                    .memory
                    .read_bytes(self.i, x + 1)
                    .ok_or(Fault::Address { pc, addr: self.i })?;
                self.v[..=x].copy_from_slice(bytes);
            }
            Invalid(_) => return Err(Fault::Decode { pc, word }),
        }
        Ok(())
    }

    fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }

    fn key_down(&self, key: u8) -> bool {
        self.keys[usize::from(key & 0xF)]
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
