use super::audio::SampleBuffer;
use super::input::InputPorts;
use super::mods::{CharDevice, NullConsole};
use crate::constants::ports;

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Devices behind the memory-mapped ports
/// None of these operations can fail; empty devices answer with sentinels
pub struct IoController {
    rng: StdRng,
    pub input: InputPorts,
    pub audio: SampleBuffer,
    console: Box<dyn CharDevice>,
}

impl IoController {
    pub fn new(seed: Option<u64>, host_rate: u32) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            input: InputPorts::new(),
            audio: SampleBuffer::new(host_rate),
            console: Box::new(NullConsole),
        }
    }

    pub fn attach_console(&mut self, console: Box<dyn CharDevice>) {
        self.console = console;
    }

    /// Fresh 32-bit value from two independent 16-bit draws
    pub fn random(&mut self) -> i32 {
        let hi: u32 = self.rng.gen_range(0..65536);
        let lo: u32 = self.rng.gen_range(0..65536);
        ((hi << 16) | lo) as i32
    }

    /// Reads of intercepted ports, None for plain memory
    pub fn read_port(&mut self, port: usize) -> Option<i32> {
        let value = match port {
            ports::PORT_RN => self.random(),
            ports::PORT_KY => self.input.latched(),
            ports::PORT_KB => self.input.next_char(),
            ports::PORT_CO => self.console.read(),
            ports::PORT_XO => -1,
            ports::PORT_XA | ports::PORT_XS => 0, // No storage support
            ports::PORT_AU => {
                warn!("Read from write-only audio port");
                return None;
            }
            _ => return None,
        };
        debug!("Reading from port {}: {}", port, value);
        Some(value)
    }

    /// Writes to intercepted ports; false when the write belongs to plain memory
    pub fn write_port(&mut self, port: usize, value: i32) -> bool {
        match port {
            ports::PORT_CO => self.console.write(value),
            ports::PORT_AU => self.audio.write(value),
            ports::PORT_XO | ports::PORT_XA | ports::PORT_XS => {
                debug!("Discarding write to storage port {}: {}", port, value);
            }
            _ => return false,
        }
        true
    }
}
