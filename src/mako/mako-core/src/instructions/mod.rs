pub mod instructions;

// Import trait implementations for CPU instruction categories
pub use instructions::Arithmetic;
pub use instructions::ControlFlow;
pub use instructions::LoadStore;
pub use instructions::StackOps;

/// Enum representing the machine's mnemonics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
    CONST,  // Push inline literal
    CALL,   // Call subroutine
    JUMP,   // Unconditional jump
    JUMPZ,  // Jump if zero
    JUMPIF, // Jump if nonzero
    LOAD,   // Load through the port-aware path
    STOR,   // Store through the port-aware path
    RETURN, // Return from subroutine
    DROP,   // Discard top
    SWAP,   // Exchange top two
    DUP,    // Duplicate top
    OVER,   // Duplicate second
    STR,    // Data stack to return stack
    RTS,    // Return stack to data stack
    ADD,
    SUB,
    MUL,
    DIV, // Floor division
    MOD, // Floor modulo
    AND,
    OR,
    XOR,
    NOT,
    SGT,  // Signed greater than
    SLT,  // Signed less than
    SYNC, // Frame yield point
    NEXT, // Counted loop
    NOP,
}

/// Structure representing a decoded instruction
pub struct Instructions {
    pub pc: i32,         // Address of the opcode
    pub mnem: Mnemonic,  // Mnemonic representation
    pub data: i32,       // Raw opcode word
    pub operand: i32,    // Address of the inline operand cell
}

impl Instructions {
    /// Whether the instruction owns the cell after its opcode
    pub fn has_operand(&self) -> bool {
        matches!(
            self.mnem,
            Mnemonic::CONST
                | Mnemonic::CALL
                | Mnemonic::JUMP
                | Mnemonic::JUMPZ
                | Mnemonic::JUMPIF
                | Mnemonic::NEXT
        )
    }

    /// Fall-through address past the instruction
    pub fn next_pc(&self) -> i32 {
        if self.has_operand() {
            self.operand.wrapping_add(1)
        } else {
            self.operand
        }
    }
}
