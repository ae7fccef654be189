pub mod audio;
pub mod input;
pub mod io;
mod memory;

pub mod mods;
pub use input::Keypad;
pub use io::IoController;

use self::mods::CharDevice;
use crate::constants::registers::REGISTER_PC;
use crate::error::{Result, VmError};
use log::trace;

/// Machine address space: main memory plus the device ports layered over it
pub struct MemoryMap {
    ram: memory::Ram,
    io: io::IoController,
}

impl MemoryMap {
    pub fn new(image: Vec<i32>, seed: Option<u64>, host_rate: u32) -> MemoryMap {
        MemoryMap {
            ram: memory::Ram::new(image),
            io: io::IoController::new(seed, host_rate),
        }
    }

    pub fn len(&self) -> usize {
        self.ram.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ram.is_empty()
    }

    pub fn attach_console(&mut self, console: Box<dyn CharDevice>) {
        self.io.attach_console(console);
    }

    pub fn io(&self) -> &io::IoController {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut io::IoController {
        &mut self.io
    }

    pub fn reg(&self, idx: usize) -> i32 {
        self.ram.reg(idx)
    }

    pub fn set_reg(&mut self, idx: usize, value: i32) {
        self.ram.set_reg(idx, value);
    }

    fn fault(&self, addr: i64) -> VmError {
        VmError::OutOfBounds {
            addr,
            pc: self.ram.reg(REGISTER_PC),
        }
    }

    /// Plain bounds-checked read with no device side effects
    pub fn read(&self, addr: i64) -> Result<i32> {
        self.ram.read(addr).ok_or_else(|| self.fault(addr))
    }

    /// Plain bounds-checked write with no device side effects
    pub fn write(&mut self, addr: i64, value: i32) -> Result<()> {
        match self.ram.write(addr, value) {
            Some(()) => Ok(()),
            None => Err(self.fault(addr)),
        }
    }

    /// Renderer read: outside memory reads as zero
    pub fn peek(&self, addr: i64) -> i32 {
        self.ram.read(addr).unwrap_or(0)
    }

    /// LOAD path: ports first, then memory
    pub fn load(&mut self, addr: i32) -> Result<i32> {
        if let Ok(port) = usize::try_from(addr) {
            if let Some(value) = self.io.read_port(port) {
                return Ok(value);
            }
        }
        let value = self.read(addr as i64)?;
        trace!("Load [{}] -> {}", addr, value);
        Ok(value)
    }

    /// STOR path: ports first, then memory
    pub fn store(&mut self, addr: i32, value: i32) -> Result<()> {
        if let Ok(port) = usize::try_from(addr) {
            if self.io.write_port(port, value) {
                return Ok(());
            }
        }
        trace!("Store [{}] <- {}", addr, value);
        self.write(addr as i64, value)
    }

    pub fn words(&self) -> &[i32] {
        self.ram.words()
    }
}

#[cfg(test)]
mod memory_tests {
    use super::*;
    use crate::constants::ports::*;
    use crate::constants::RESERVED_HEADER;
    use proptest::prelude::*;

    fn blank(len: usize) -> MemoryMap {
        MemoryMap::new(vec![0; len], Some(3), 8000)
    }

    #[test]
    fn test_short_image_keeps_header() {
        let mem = MemoryMap::new(vec![1, 2], Some(3), 8000);
        assert_eq!(mem.len(), RESERVED_HEADER);
        assert_eq!(mem.reg(1), 2);
    }

    #[test]
    fn test_out_of_bounds_reports_address() {
        let mut mem = blank(32);
        assert_eq!(
            mem.load(32),
            Err(VmError::OutOfBounds { addr: 32, pc: 0 })
        );
        assert_eq!(
            mem.store(-1, 0),
            Err(VmError::OutOfBounds { addr: -1, pc: 0 })
        );
        assert_eq!(mem.peek(1000), 0);
    }

    #[test]
    fn test_audio_port_feeds_sample_buffer() {
        let mut mem = blank(32);
        mem.store(PORT_AU as i32, 0x40).unwrap();
        mem.store(PORT_AU as i32, 0x80).unwrap();
        assert_eq!(mem.io().audio.written(), &[0.25, 0.5]);
        // Plain memory cell is untouched
        assert_eq!(mem.reg(PORT_AU), 0);
    }

    #[test]
    fn test_keyboard_port_pops_queue() {
        let mut mem = blank(32);
        let keypad = mem.io().input.keypad();
        keypad.push_char('a' as i32);
        keypad.push_char('b' as i32);
        assert_eq!(mem.load(PORT_KB as i32), Ok('a' as i32));
        assert_eq!(mem.load(PORT_KB as i32), Ok('b' as i32));
        assert_eq!(mem.load(PORT_KB as i32), Ok(-1));
    }

    proptest! {
        #[test]
        fn store_then_load_round_trips(addr in (RESERVED_HEADER as i32)..256, value in any::<i32>()) {
            let mut mem = blank(256);
            mem.store(addr, value).unwrap();
            prop_assert_eq!(mem.load(addr), Ok(value));
        }
    }
}
