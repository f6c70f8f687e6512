/// Number of bits the operand is shifted by when packed into an instruction
/// word; the low byte holds the function code and modifier bits.
pub const OPERAND_SHIFT: u16 = 8;

/// Largest operand that still fits the packed single-word form.
pub const OPERAND_MASK: u16 = 0xFF;

bitflags! {
    /// Modifier bits of a packed instruction word.
    #[derive(Copy, Clone, PartialEq)]
    pub struct Modifiers: u16 {
        /// Replace the operand with the word it addresses.
        const INDIRECT = 1 << 3;
        /// Add the stack pointer to the operand.
        const STACK = 1 << 4;
        /// The operand did not fit the high byte and follows in the next word.
        const WIDE = 1 << 5;
    }
}

/// The six addressing-mode function codes plus call and execute.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Function {
    Load = 0,
    Store = 1,
    Add = 2,
    Jump = 3,
    JumpTrue = 4,
    JumpFalse = 5,
    Call = 6,
    Exec = 7,
}

impl Function {
    /// Decodes the function code from the low bits of an instruction word.
    pub fn from_word(word: u16) -> Option<Self> {
        let function = match word & 7 {
            0 => Function::Load,
            1 => Function::Store,
            2 => Function::Add,
            3 => Function::Jump,
            4 => Function::JumpTrue,
            5 => Function::JumpFalse,
            6 => Function::Call,
            7 => Function::Exec,
            _ => return None,
        };
        Some(function)
    }
}
