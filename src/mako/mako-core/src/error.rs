//! Faults that stop the machine.

use thiserror::Error;

/// Fatal machine faults. A negative program counter is a normal halt and
/// is reported through the driver state instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VmError {
    /// Load, store, fetch or stack access outside the allocated memory
    #[error("memory access out of bounds at address {addr} (pc {pc})")]
    OutOfBounds { addr: i64, pc: i32 },

    /// DIV or MOD with a zero right-hand operand
    #[error("division by zero (pc {pc})")]
    DivideByZero { pc: i32 },

    /// SYNC reached while no frame sink is attached
    #[error("the SYNC opcode cannot be used in headless mode (pc {pc})")]
    UnsupportedSync { pc: i32 },
}

impl VmError {
    /// Attribute a memory fault to the instruction that caused it
    pub fn at(self, opcode_addr: i32) -> VmError {
        match self {
            VmError::OutOfBounds { addr, .. } => VmError::OutOfBounds {
                addr,
                pc: opcode_addr,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, VmError>;
