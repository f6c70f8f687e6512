use crate::ic::instruction::{Function, Modifiers, OPERAND_MASK, OPERAND_SHIFT};
use crate::ic::label::LabelTable;
use crate::ic::memory::Memory;
use crate::ic::stream::{ENDSTREAMCH, Streams};
use crate::ic::{ICError, ICResult};

/// Single-pass loader for the textual INTCODE object format.
///
/// The text is a stream of statements separated by `$`, space and line
/// feed. A leading number defines a label at the current load address; a
/// function letter (`L S A J T F K X`) starts an instruction, which may
/// carry `I`/`P` modifier suffixes and either a numeric displacement or a
/// label operand. `C`, `D` and `G` emit data, `Z` closes the unit. A `/`
/// starts a comment running to the end of the line.
pub struct Assembler {
    labels: LabelTable,
    ch: i16,
}

impl Assembler {
    pub fn new() -> Self {
        Self {
            labels: LabelTable::new(),
            ch: ENDSTREAMCH,
        }
    }

    /// Assembles translation units from the currently selected input stream
    /// until it runs dry.
    pub fn assemble(&mut self, m: &mut Memory, io: &mut Streams) -> ICResult<()> {
        self.labels.clear();
        m.reset_packing();
        self.rch(io);
        loop {
            if self.is_digit() {
                let n = self.rdn(io);
                self.labels.define(n, m.lomem(), m)?;
                m.reset_packing();
                continue;
            }
            let statement = match self.ch {
                ENDSTREAMCH => return Ok(()),
                ch => ch as u8,
            };
            match statement {
                b'$' | b' ' | b'\n' => self.rch(io),
                b'C' => {
                    self.rch(io);
                    let value = self.rdn(io);
                    m.emit_byte(value as u8);
                }
                b'D' => self.data(m, io),
                b'G' => self.global(m, io)?,
                b'Z' => {
                    self.labels.check_resolved()?;
                    self.labels.clear();
                    m.reset_packing();
                    self.rch(io);
                }
                letter => {
                    let function = match letter {
                        b'L' => Function::Load,
                        b'S' => Function::Store,
                        b'A' => Function::Add,
                        b'J' => Function::Jump,
                        b'T' => Function::JumpTrue,
                        b'F' => Function::JumpFalse,
                        b'K' => Function::Call,
                        b'X' => Function::Exec,
                        _ => return Err(ICError::BadChar(self.ch)),
                    };
                    self.statement(function, m, io);
                }
            }
        }
    }

    /// One instruction statement: optional `I`/`P` suffixes (and a historic
    /// `G` suffix that is consumed and discarded), then a label operand or a
    /// numeric displacement.
    fn statement(&mut self, function: Function, m: &mut Memory, io: &mut Streams) {
        let mut word = function as u16;
        self.rch(io);
        if self.ch_is(b'I') {
            word |= Modifiers::INDIRECT.bits();
            self.rch(io);
        }
        if self.ch_is(b'P') {
            word |= Modifiers::STACK.bits();
            self.rch(io);
        }
        if self.ch_is(b'G') {
            self.rch(io);
        }
        if self.ch_is(b'L') {
            self.rch(io);
            m.emit_word(word | Modifiers::WIDE.bits());
            m.emit_word(0);
            let n = self.rdn(io);
            self.labels.reference(n, m.lomem() - 1, m);
        } else {
            let d = self.rdn(io) as u16;
            if d & OPERAND_MASK == d {
                m.emit_word(word | (d << OPERAND_SHIFT));
            } else {
                m.emit_word(word | Modifiers::WIDE.bits());
                m.emit_word(d);
            }
        }
    }

    /// `D <n>` emits a literal word, `DL <n>` the address of a label.
    fn data(&mut self, m: &mut Memory, io: &mut Streams) {
        self.rch(io);
        if self.ch_is(b'L') {
            self.rch(io);
            m.emit_word(0);
            let n = self.rdn(io);
            self.labels.reference(n, m.lomem() - 1, m);
        } else {
            let value = self.rdn(io);
            m.emit_word(value as u16);
        }
    }

    /// `G <cell> L <n>` points a global-vector cell at a label.
    fn global(&mut self, m: &mut Memory, io: &mut Streams) -> ICResult<()> {
        self.rch(io);
        let cell = self.rdn(io) as u16;
        if !self.ch_is(b'L') {
            return Err(ICError::BadCode(m.lomem()));
        }
        self.rch(io);
        m.set_word(cell, 0);
        let n = self.rdn(io);
        self.labels.reference(n, cell, m);
        Ok(())
    }

    /// Reads the next significant character, skipping `/` comments together
    /// with the blank lines that follow them.
    fn rch(&mut self, io: &mut Streams) {
        self.ch = io.rdch();
        while self.ch_is(b'/') {
            while !self.ch_is(b'\n') && self.ch != ENDSTREAMCH {
                self.ch = io.rdch();
            }
            while self.ch_is(b'\n') {
                self.ch = io.rdch();
            }
        }
    }

    /// Reads an optionally negated number, accumulating with 16-bit
    /// wrap-around and leaving the first non-digit in the lookahead.
    fn rdn(&mut self, io: &mut Streams) -> i16 {
        let negative = self.ch_is(b'-');
        if negative {
            self.rch(io);
        }
        let mut sum: i16 = 0;
        while self.is_digit() {
            sum = sum.wrapping_mul(10).wrapping_add(self.ch - i16::from(b'0'));
            self.rch(io);
        }
        match negative {
            true => sum.wrapping_neg(),
            false => sum,
        }
    }

    fn is_digit(&self) -> bool {
        (i16::from(b'0')..=i16::from(b'9')).contains(&self.ch)
    }

    fn ch_is(&self, byte: u8) -> bool {
        self.ch == i16::from(byte)
    }
}
