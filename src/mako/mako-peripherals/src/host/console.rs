use log::warn;
use mako_core::memory::mods::CharDevice;
use std::io::{Read, Write};

/// CO wired to the process's stdin and stdout
pub struct StdioConsole {
    stdin: std::io::Stdin,
    stdout: std::io::Stdout,
}

impl StdioConsole {
    pub fn new() -> Self {
        StdioConsole {
            stdin: std::io::stdin(),
            stdout: std::io::stdout(),
        }
    }
}

impl Default for StdioConsole {
    fn default() -> Self {
        Self::new()
    }
}

/// Character for an output code; codes outside the BMP wrap like a UTF-16 unit
pub fn output_char(value: i32) -> char {
    char::from_u32((value & 0xFFFF) as u32).unwrap_or(char::REPLACEMENT_CHARACTER)
}

impl CharDevice for StdioConsole {
    /// Blocks for one byte; end of input reads as -1
    fn read(&mut self) -> i32 {
        let mut buf = [0u8; 1];
        loop {
            match self.stdin.lock().read(&mut buf) {
                Ok(0) => return -1,
                Ok(_) => return buf[0] as i32,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!("Console read failed: {}", e);
                    return -1;
                }
            }
        }
    }

    fn write(&mut self, value: i32) {
        let mut utf8 = [0u8; 4];
        let encoded = output_char(value).encode_utf8(&mut utf8);
        let mut out = self.stdout.lock();
        if let Err(e) = out
            .write_all(encoded.as_bytes())
            .and_then(|_| out.flush())
        {
            warn!("Console write failed: {}", e);
        }
    }
}

#[cfg(test)]
mod console_tests {
    use super::*;

    #[test]
    fn test_output_char() {
        assert_eq!(output_char('A' as i32), 'A');
        assert_eq!(output_char(10), '\n');
        assert_eq!(output_char(0x1_0041), 'A');
        assert_eq!(output_char(0xD800), char::REPLACEMENT_CHARACTER);
    }
}
