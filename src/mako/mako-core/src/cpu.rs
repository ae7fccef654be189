use crate::constants::opcodes::OP_SYNC;
use crate::constants::registers::*;
use crate::decoder::decoder;
use crate::error::Result;
use crate::instructions::{Arithmetic, ControlFlow, LoadStore, StackOps};
use crate::instructions::{Instructions, Mnemonic};
use crate::memory::MemoryMap;

use log::trace;

/// Stack machine executing out of its own memory
/// Every register, including both stack pointers, is a memory cell
pub struct Cpu {
    pub(crate) mem: MemoryMap,
    pub total_steps: u64, // Instructions executed since load
}

impl Cpu {
    pub fn new(memmap: MemoryMap) -> Cpu {
        Cpu {
            mem: memmap,
            total_steps: 0,
        }
    }

    pub fn memory(&self) -> &MemoryMap {
        &self.mem
    }

    pub fn memory_mut(&mut self) -> &mut MemoryMap {
        &mut self.mem
    }

    pub fn pc(&self) -> i32 {
        self.mem.reg(REGISTER_PC)
    }

    pub fn set_pc(&mut self, value: i32) {
        self.mem.set_reg(REGISTER_PC, value);
    }

    /// Opcode word at PC without executing it
    pub fn peek_opcode(&self) -> Result<i32> {
        self.mem.read(self.pc() as i64)
    }

    pub fn at_sync(&self) -> Result<bool> {
        Ok(self.peek_opcode()? == OP_SYNC)
    }

    // Stack helpers: push writes at the pointer then bumps it, pop is the reverse

    fn push_at(&mut self, pointer: usize, value: i32) -> Result<()> {
        let top = self.mem.reg(pointer);
        self.mem.write(top as i64, value)?;
        self.mem.set_reg(pointer, top.wrapping_add(1));
        Ok(())
    }

    fn pop_at(&mut self, pointer: usize) -> Result<i32> {
        let top = self.mem.reg(pointer).wrapping_sub(1);
        let value = self.mem.read(top as i64)?;
        self.mem.set_reg(pointer, top);
        Ok(value)
    }

    pub fn push(&mut self, value: i32) -> Result<()> {
        self.push_at(REGISTER_DP, value)
    }

    pub fn pop(&mut self) -> Result<i32> {
        self.pop_at(REGISTER_DP)
    }

    pub fn rpush(&mut self, value: i32) -> Result<()> {
        self.push_at(REGISTER_RP, value)
    }

    pub fn rpop(&mut self) -> Result<i32> {
        self.pop_at(REGISTER_RP)
    }

    /// Data stack element `depth` cells below the top, without popping
    pub fn peek(&self, depth: i32) -> Result<i32> {
        let top = self.mem.reg(REGISTER_DP) as i64;
        self.mem.read(top - 1 - depth as i64)
    }

    /// Execute the decoded instruction; PC already points past the opcode
    pub fn execute(&mut self, inst: &Instructions) -> Result<()> {
        match inst.mnem {
            Mnemonic::CONST => self.konst(inst),
            Mnemonic::CALL => self.call(inst),
            Mnemonic::JUMP => self.jump(inst),
            Mnemonic::JUMPZ => self.jumpz(inst),
            Mnemonic::JUMPIF => self.jumpif(inst),
            Mnemonic::LOAD => self.load(inst),
            Mnemonic::STOR => self.stor(inst),
            Mnemonic::RETURN => self.ret(inst),
            Mnemonic::DROP => self.drop_top(inst),
            Mnemonic::SWAP => self.swap(inst),
            Mnemonic::DUP => self.dup(inst),
            Mnemonic::OVER => self.over(inst),
            Mnemonic::STR => self.str(inst),
            Mnemonic::RTS => self.rts(inst),
            Mnemonic::ADD => self.add(inst),
            Mnemonic::SUB => self.sub(inst),
            Mnemonic::MUL => self.mul(inst),
            Mnemonic::DIV => self.div(inst),
            Mnemonic::MOD => self.modulo(inst),
            Mnemonic::AND => self.and(inst),
            Mnemonic::OR => self.or(inst),
            Mnemonic::XOR => self.xor(inst),
            Mnemonic::NOT => self.not(inst),
            Mnemonic::SGT => self.sgt(inst),
            Mnemonic::SLT => self.slt(inst),
            Mnemonic::NEXT => self.next(inst),
            // SYNC is a yield point owned by the frame driver
            Mnemonic::SYNC | Mnemonic::NOP => Ok(()),
        }
    }

    /// One fetch-decode-execute cycle
    pub fn step(&mut self) -> Result<()> {
        let addr = self.pc();
        let word = self.mem.read(addr as i64)?;
        let inst = decoder(addr, word);
        trace!("{:>6}: {:?}", addr, inst.mnem);

        self.set_pc(inst.operand);
        self.execute(&inst).map_err(|e| e.at(inst.pc))?;
        self.total_steps += 1;
        Ok(())
    }
}
