use crate::constants::RESERVED_HEADER;

/// Flat word-addressed main memory
/// Holds code, data, both stacks and the register header
pub struct Ram {
    words: Vec<i32>,
}

impl Ram {
    pub fn new(image: Vec<i32>) -> Self {
        let mut words = image;
        if words.len() < RESERVED_HEADER {
            // Registers must always be addressable
            words.resize(RESERVED_HEADER, 0);
        }
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn index(&self, addr: i64) -> Option<usize> {
        if addr < 0 || addr >= self.words.len() as i64 {
            None
        } else {
            Some(addr as usize)
        }
    }

    pub fn read(&self, addr: i64) -> Option<i32> {
        self.index(addr).map(|i| self.words[i])
    }

    pub fn write(&mut self, addr: i64, value: i32) -> Option<()> {
        let i = self.index(addr)?;
        self.words[i] = value;
        Some(())
    }

    /// Register reads; the header always exists
    pub fn reg(&self, idx: usize) -> i32 {
        self.words[idx]
    }

    pub fn set_reg(&mut self, idx: usize, value: i32) {
        self.words[idx] = value;
    }

    pub fn words(&self) -> &[i32] {
        &self.words
    }
}
