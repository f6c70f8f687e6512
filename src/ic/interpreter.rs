use crate::ic::constants::*;
use crate::ic::format;
use crate::ic::instruction::{Function, Modifiers, OPERAND_SHIFT};
use crate::ic::memory::Memory;
use crate::ic::stream::Streams;
use crate::ic::{ICError, ICResult};

/// The INTCODE machine state: two rotating accumulators, a program counter
/// and a stack pointer, all in word units.
///
/// The stack grows upward from the end of the loaded program; each call
/// frame holds the caller's frame address and return address in its first
/// two words, and arguments from the third.
pub struct Interpreter {
    pub pc: u16,
    pub sp: u16,
    pub a: i16,
    pub b: i16,
}

impl Interpreter {
    pub fn new(pc: u16, sp: u16) -> Self {
        Self { pc, sp, a: 0, b: 0 }
    }

    /// Fetches and executes instructions until the guest stops; returns the
    /// guest exit value.
    pub fn run(&mut self, m: &mut Memory, io: &mut Streams) -> ICResult<i16> {
        loop {
            let w = self.fetch(m);
            let mods = Modifiers::from_bits_truncate(w);
            let mut d = match mods.contains(Modifiers::WIDE) {
                true => self.fetch(m),
                false => w >> OPERAND_SHIFT,
            };
            if mods.contains(Modifiers::STACK) {
                d = d.wrapping_add(self.sp);
            }
            if mods.contains(Modifiers::INDIRECT) {
                d = m.word(d);
            }
            let function =
                Function::from_word(w).ok_or(ICError::IntcodeError(self.pc))?;
            match function {
                Function::Load => {
                    self.b = self.a;
                    self.a = d as i16;
                }
                Function::Store => m.set_word(d, self.a as u16),
                Function::Add => self.a = self.a.wrapping_add(d as i16),
                Function::Jump => self.pc = d,
                Function::JumpTrue => {
                    if self.a != 0 {
                        self.pc = d;
                    }
                }
                Function::JumpFalse => {
                    if self.a == 0 {
                        self.pc = d;
                    }
                }
                Function::Call => {
                    let frame = d.wrapping_add(self.sp);
                    if self.a < PROG_START as i16 {
                        if let Some(value) = self.system_call(frame, m, io)? {
                            return Ok(value);
                        }
                    } else {
                        m.set_word(frame, self.sp);
                        m.set_word(frame.wrapping_add(1), self.pc);
                        self.sp = frame;
                        self.pc = self.a as u16;
                    }
                }
                Function::Exec => {
                    if let Some(value) = self.execute(d, m)? {
                        return Ok(value);
                    }
                }
            }
        }
    }

    fn fetch(&mut self, m: &Memory) -> u16 {
        let word = m.word(self.pc);
        self.pc = self.pc.wrapping_add(1);
        word
    }

    /// Extended opcodes selected by the operand of an `X` instruction.
    /// Opcode 22 stops the machine with exit value 0.
    fn execute(&mut self, d: u16, m: &mut Memory) -> ICResult<Option<i16>> {
        match d {
            1 => self.a = m.word(self.a as u16) as i16,
            2 => self.a = self.a.wrapping_neg(),
            3 => self.a = !self.a,
            4 => {
                self.pc = m.word(self.sp.wrapping_add(1));
                self.sp = m.word(self.sp);
            }
            5 => self.a = self.b.wrapping_mul(self.a),
            6 => {
                if self.a != 0 {
                    self.a = self.b.wrapping_div(self.a);
                }
            }
            7 => {
                if self.a != 0 {
                    self.a = self.b.wrapping_rem(self.a);
                }
            }
            8 => self.a = self.b.wrapping_add(self.a),
            9 => self.a = self.b.wrapping_sub(self.a),
            10 => self.a = -i16::from(self.b == self.a),
            11 => self.a = -i16::from(self.b != self.a),
            12 => self.a = -i16::from(self.b < self.a),
            13 => self.a = -i16::from(self.b >= self.a),
            14 => self.a = -i16::from(self.b > self.a),
            15 => self.a = -i16::from(self.b <= self.a),
            16 => self.a = shift(self.b, self.a, |b, n| b << n),
            17 => self.a = shift(self.b, self.a, |b, n| b >> n),
            18 => self.a = self.b & self.a,
            19 => self.a = self.b | self.a,
            20 => self.a = self.b ^ self.a,
            21 => self.a = self.b ^ !self.a,
            22 => return Ok(Some(0)),
            23 => self.switchon(m),
            _ => return Err(ICError::UnknownExec(d as i16)),
        }
        Ok(None)
    }

    /// `X 23`: a count word, a default target, then (value, target) pairs.
    /// The first pair matching A supplies the new program counter; the pair
    /// counter runs down in B.
    fn switchon(&mut self, m: &Memory) {
        let mut p = self.pc;
        self.b = m.word(p) as i16;
        p = p.wrapping_add(1);
        self.pc = m.word(p);
        p = p.wrapping_add(1);
        while self.b != 0 {
            self.b -= 1;
            if self.a == m.word(p) as i16 {
                self.pc = m.word(p.wrapping_add(1));
                return;
            }
            p = p.wrapping_add(2);
        }
        self.b = -1;
    }

    /// Dispatches a host intrinsic named by A. The argument vector starts
    /// two words into the would-be frame, past the linkage slots. STOP
    /// returns the guest exit value; everything else resumes the fetch
    /// loop.
    fn system_call(
        &mut self,
        frame: u16,
        m: &mut Memory,
        io: &mut Streams,
    ) -> ICResult<Option<i16>> {
        let v = frame.wrapping_add(2);
        let arg = |m: &Memory, i: u16| m.word(v.wrapping_add(i));
        match self.a {
            CALL_SELECT_INPUT => io.select_input(arg(m, 0)),
            CALL_SELECT_OUTPUT => io.select_output(arg(m, 0)),
            CALL_RDCH => self.a = io.rdch(),
            CALL_WRCH => io.wrch(arg(m, 0) as u8),
            CALL_INPUT => self.a = io.input() as i16,
            CALL_OUTPUT => self.a = io.output() as i16,
            CALL_STOP => return Ok(Some(arg(m, 0) as i16)),
            CALL_LEVEL => self.a = self.sp as i16,
            CALL_LONGJUMP => {
                self.sp = arg(m, 0);
                self.pc = arg(m, 1);
            }
            CALL_APTOVEC => {
                // Stack-allocates a vector of v[1] words, then calls v[0]
                // with the vector address as its argument. The extended
                // frame saves the vector base in B; one return unwinds both
                // the call and the vector.
                let size = arg(m, 1);
                let base = frame.wrapping_add(size).wrapping_add(1);
                m.set_word(base, self.sp);
                m.set_word(base.wrapping_add(1), self.pc);
                m.set_word(base.wrapping_add(2), frame);
                m.set_word(base.wrapping_add(3), size);
                self.b = base as i16;
                self.sp = base;
                self.pc = arg(m, 0);
            }
            CALL_FINDOUTPUT => {
                let name = m.packed_str(arg(m, 0));
                self.a = io.find_output(&name) as i16;
            }
            CALL_FINDINPUT => {
                let name = m.packed_str(arg(m, 0));
                self.a = io.find_input(&name) as i16;
            }
            CALL_ENDREAD => io.end_read(),
            CALL_ENDWRITE => io.end_write(),
            CALL_WRITES => format::writes(m, io, arg(m, 0)),
            CALL_WRITEN => format::writen(io, arg(m, 0) as i16),
            CALL_NEWLINE => io.newline(),
            CALL_NEWPAGE => io.wrch(FORM_FEED),
            CALL_PACKSTRING => {
                let (src, dest) = (arg(m, 0), arg(m, 1));
                self.a = m.pack_string(src, dest);
            }
            CALL_UNPACKSTRING => {
                let (src, dest) = (arg(m, 0), arg(m, 1));
                m.unpack_string(src, dest);
            }
            CALL_WRITED => format::writed(io, arg(m, 0) as i16, arg(m, 1) as i16),
            CALL_READN => {
                let (value, terminator) = io.readn();
                m.set_word(TERMINATOR_CELL, terminator as u16);
                self.a = value;
            }
            CALL_WRITEHEX => format::writehex(io, arg(m, 0), arg(m, 1) as i16),
            CALL_WRITEF => format::writef(m, io, v),
            CALL_WRITEOCT => format::writeoct(io, arg(m, 0), arg(m, 1) as i16),
            CALL_GETBYTE => self.a = i16::from(m.byte(arg(m, 0), arg(m, 1))),
            CALL_PUTBYTE => {
                let (base, offset, value) = (arg(m, 0), arg(m, 1), arg(m, 2));
                m.set_byte(base, offset, value as u8);
            }
            _ => return Err(ICError::UnknownCall(self.a)),
        }
        Ok(None)
    }
}

/// Shifts operate on the unsigned view of B; amounts of 16 or more fall off
/// the end of the word.
fn shift(b: i16, amount: i16, op: fn(u16, u16) -> u16) -> i16 {
    let amount = amount as u16;
    match amount < 16 {
        true => op(b as u16, amount) as i16,
        false => 0,
    }
}
