use super::Instructions;
use crate::constants::registers::REGISTER_RP;
use crate::cpu::Cpu;
use crate::error::{Result, VmError};
use crate::utils::{flag, floor_div, floor_mod};

/// Binary operators pop the right-hand operand first and push `left OP right`
pub trait Arithmetic {
    fn add(&mut self, cmd: &Instructions) -> Result<()>;
    fn sub(&mut self, cmd: &Instructions) -> Result<()>;
    fn mul(&mut self, cmd: &Instructions) -> Result<()>;
    fn div(&mut self, cmd: &Instructions) -> Result<()>; // Floor division
    fn modulo(&mut self, cmd: &Instructions) -> Result<()>; // Floor modulo
    fn and(&mut self, cmd: &Instructions) -> Result<()>;
    fn or(&mut self, cmd: &Instructions) -> Result<()>;
    fn xor(&mut self, cmd: &Instructions) -> Result<()>;
    fn not(&mut self, cmd: &Instructions) -> Result<()>; // Bitwise complement
    fn sgt(&mut self, cmd: &Instructions) -> Result<()>;
    fn slt(&mut self, cmd: &Instructions) -> Result<()>;
}

impl Cpu {
    fn binary<F>(&mut self, op: F) -> Result<()>
    where
        F: FnOnce(i32, i32) -> i32,
    {
        let right = self.pop()?;
        let left = self.pop()?;
        self.push(op(left, right))
    }

    fn checked_binary<F>(&mut self, cmd: &Instructions, op: F) -> Result<()>
    where
        F: FnOnce(i32, i32) -> Option<i32>,
    {
        let right = self.pop()?;
        let left = self.pop()?;
        let value = op(left, right).ok_or(VmError::DivideByZero { pc: cmd.pc })?;
        self.push(value)
    }

    /// Word stored in the instruction's operand cell
    fn operand(&self, cmd: &Instructions) -> Result<i32> {
        self.memory().read(cmd.operand as i64)
    }
}

impl Arithmetic for Cpu {
    fn add(&mut self, _cmd: &Instructions) -> Result<()> {
        self.binary(i32::wrapping_add)
    }

    fn sub(&mut self, _cmd: &Instructions) -> Result<()> {
        self.binary(i32::wrapping_sub)
    }

    fn mul(&mut self, _cmd: &Instructions) -> Result<()> {
        self.binary(i32::wrapping_mul)
    }

    fn div(&mut self, cmd: &Instructions) -> Result<()> {
        self.checked_binary(cmd, floor_div)
    }

    fn modulo(&mut self, cmd: &Instructions) -> Result<()> {
        self.checked_binary(cmd, floor_mod)
    }

    fn and(&mut self, _cmd: &Instructions) -> Result<()> {
        self.binary(|a, b| a & b)
    }

    fn or(&mut self, _cmd: &Instructions) -> Result<()> {
        self.binary(|a, b| a | b)
    }

    fn xor(&mut self, _cmd: &Instructions) -> Result<()> {
        self.binary(|a, b| a ^ b)
    }

    fn not(&mut self, _cmd: &Instructions) -> Result<()> {
        let value = self.pop()?;
        self.push(!value)
    }

    fn sgt(&mut self, _cmd: &Instructions) -> Result<()> {
        self.binary(|a, b| flag(a > b))
    }

    fn slt(&mut self, _cmd: &Instructions) -> Result<()> {
        self.binary(|a, b| flag(a < b))
    }
}

/// Branches, subroutines and the counted loop
/// Targets are read from the operand cell
pub trait ControlFlow {
    fn call(&mut self, cmd: &Instructions) -> Result<()>; // Subroutine call
    fn jump(&mut self, cmd: &Instructions) -> Result<()>; // Unconditional jump
    fn jumpz(&mut self, cmd: &Instructions) -> Result<()>; // Branch if zero
    fn jumpif(&mut self, cmd: &Instructions) -> Result<()>; // Branch if nonzero
    fn ret(&mut self, cmd: &Instructions) -> Result<()>; // Return
    fn next(&mut self, cmd: &Instructions) -> Result<()>; // Loop while counter stays >= 0
}

impl Cpu {
    fn branch_if(&mut self, cmd: &Instructions, taken: bool) -> Result<()> {
        let destination = if taken {
            self.operand(cmd)?
        } else {
            cmd.next_pc()
        };
        self.set_pc(destination);
        Ok(())
    }
}

impl ControlFlow for Cpu {
    fn call(&mut self, cmd: &Instructions) -> Result<()> {
        self.rpush(cmd.next_pc())?;
        let target = self.operand(cmd)?;
        self.set_pc(target);
        Ok(())
    }

    fn jump(&mut self, cmd: &Instructions) -> Result<()> {
        self.branch_if(cmd, true)
    }

    fn jumpz(&mut self, cmd: &Instructions) -> Result<()> {
        let value = self.pop()?;
        self.branch_if(cmd, value == 0)
    }

    fn jumpif(&mut self, cmd: &Instructions) -> Result<()> {
        let value = self.pop()?;
        self.branch_if(cmd, value != 0)
    }

    fn ret(&mut self, _cmd: &Instructions) -> Result<()> {
        let destination = self.rpop()?;
        self.set_pc(destination);
        Ok(())
    }

    fn next(&mut self, cmd: &Instructions) -> Result<()> {
        // Counter lives just below the return stack top
        let rp = self.memory().reg(REGISTER_RP);
        let slot = rp as i64 - 1;
        let count = self.memory().read(slot)?.wrapping_sub(1);
        self.memory_mut().write(slot, count)?;

        if count < 0 {
            self.rpop()?;
            self.set_pc(cmd.next_pc());
            Ok(())
        } else {
            self.branch_if(cmd, true)
        }
    }
}

/// Data and return stack shuffling
pub trait StackOps {
    fn konst(&mut self, cmd: &Instructions) -> Result<()>; // Push inline literal
    fn drop_top(&mut self, cmd: &Instructions) -> Result<()>;
    fn swap(&mut self, cmd: &Instructions) -> Result<()>;
    fn dup(&mut self, cmd: &Instructions) -> Result<()>;
    fn over(&mut self, cmd: &Instructions) -> Result<()>;
    fn str(&mut self, cmd: &Instructions) -> Result<()>; // Data to return stack
    fn rts(&mut self, cmd: &Instructions) -> Result<()>; // Return to data stack
}

impl StackOps for Cpu {
    fn konst(&mut self, cmd: &Instructions) -> Result<()> {
        let literal = self.operand(cmd)?;
        self.push(literal)?;
        self.set_pc(cmd.next_pc());
        Ok(())
    }

    fn drop_top(&mut self, _cmd: &Instructions) -> Result<()> {
        self.pop().map(|_| ())
    }

    fn swap(&mut self, _cmd: &Instructions) -> Result<()> {
        let a = self.pop()?;
        let b = self.pop()?;
        self.push(a)?;
        self.push(b)
    }

    fn dup(&mut self, _cmd: &Instructions) -> Result<()> {
        let top = self.peek(0)?;
        self.push(top)
    }

    fn over(&mut self, _cmd: &Instructions) -> Result<()> {
        let second = self.peek(1)?;
        self.push(second)
    }

    fn str(&mut self, _cmd: &Instructions) -> Result<()> {
        let value = self.pop()?;
        self.rpush(value)
    }

    fn rts(&mut self, _cmd: &Instructions) -> Result<()> {
        let value = self.rpop()?;
        self.push(value)
    }
}

/// Port-aware memory access
pub trait LoadStore {
    fn load(&mut self, cmd: &Instructions) -> Result<()>;
    fn stor(&mut self, cmd: &Instructions) -> Result<()>;
}

impl LoadStore for Cpu {
    fn load(&mut self, _cmd: &Instructions) -> Result<()> {
        let addr = self.pop()?;
        let value = self.memory_mut().load(addr)?;
        self.push(value)
    }

    fn stor(&mut self, _cmd: &Instructions) -> Result<()> {
        // Address is on top, value beneath it
        let addr = self.pop()?;
        let value = self.pop()?;
        self.memory_mut().store(addr, value)
    }
}
