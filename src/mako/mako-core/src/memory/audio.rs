use crate::constants::audio::{AUDIO_BUFFER_SIZE, AUDIO_RATE};

/// Mono sample buffer fed by AU writes
/// Holds AUDIO_BUFFER_SIZE logical samples at the host rate. The cursor
/// rewinds once per frame; samples past capacity are dropped
pub struct SampleBuffer {
    samples: Vec<f32>,
    cursor: usize,
    frame_len: usize,  // Samples written during the last completed frame
    multiplier: usize, // Host samples per logical 8khz sample
}

impl SampleBuffer {
    pub fn new(host_rate: u32) -> Self {
        let multiplier = Self::multiplier_for(host_rate);
        Self {
            samples: vec![0.0; AUDIO_BUFFER_SIZE * multiplier],
            cursor: 0,
            frame_len: 0,
            multiplier,
        }
    }

    /// Integer up-sampling factor, never below one
    pub fn multiplier_for(host_rate: u32) -> usize {
        ((host_rate / AUDIO_RATE) as usize).max(1)
    }

    pub fn multiplier(&self) -> usize {
        self.multiplier
    }

    /// Capacity in host samples
    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    /// Append one 8-bit sample, replicated to the host rate
    pub fn write(&mut self, value: i32) {
        let sample = (value & 0xFF) as f32 / 256.0;
        for _ in 0..self.multiplier {
            if self.cursor >= self.samples.len() {
                break;
            }
            self.samples[self.cursor] = sample;
            self.cursor += 1;
        }
    }

    /// Frame boundary: remember how much was written, then rewind
    pub fn end_frame(&mut self) {
        self.frame_len = self.cursor;
        self.cursor = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The whole buffer as the output device sees it
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Samples written since the last rewind
    pub fn written(&self) -> &[f32] {
        &self.samples[..self.cursor]
    }

    /// Samples produced by the last completed frame
    pub fn last_frame(&self) -> &[f32] {
        &self.samples[..self.frame_len]
    }
}

#[cfg(test)]
mod audio_tests {
    use super::*;

    #[test]
    fn test_multiplier() {
        assert_eq!(SampleBuffer::multiplier_for(44100), 5);
        assert_eq!(SampleBuffer::multiplier_for(48000), 6);
        assert_eq!(SampleBuffer::multiplier_for(8000), 1);
        assert_eq!(SampleBuffer::multiplier_for(4000), 1);
    }

    #[test]
    fn test_write_replicates_and_normalizes() {
        let mut buffer = SampleBuffer::new(16000);
        buffer.write(0x180); // Only the low byte counts
        assert_eq!(buffer.cursor(), 2);
        assert_eq!(buffer.written(), &[0.5, 0.5]);

        buffer.end_frame();
        assert_eq!(buffer.cursor(), 0);
        assert_eq!(buffer.last_frame(), &[0.5, 0.5]);
    }

    #[test]
    fn test_full_frame_at_host_rate() {
        let mut buffer = SampleBuffer::new(44100);
        assert_eq!(buffer.capacity(), AUDIO_BUFFER_SIZE * 5);
        for _ in 0..667 {
            buffer.write(0x40);
        }
        assert_eq!(buffer.cursor(), 667 * 5);

        buffer.end_frame();
        assert_eq!(buffer.last_frame().len(), 667 * 5);
        assert!(buffer.last_frame().iter().all(|&s| s == 0.25));
    }

    #[test]
    fn test_overflow_is_dropped() {
        let mut buffer = SampleBuffer::new(8000);
        for i in 0..(AUDIO_BUFFER_SIZE + 50) {
            buffer.write(i as i32);
        }
        assert_eq!(buffer.cursor(), AUDIO_BUFFER_SIZE);
        let last = ((AUDIO_BUFFER_SIZE - 1) & 0xFF) as f32 / 256.0;
        assert_eq!(buffer.samples()[AUDIO_BUFFER_SIZE - 1], last);

        buffer.end_frame();
        assert_eq!(buffer.cursor(), 0);
        assert!(buffer.written().is_empty());
        assert_eq!(buffer.last_frame().len(), AUDIO_BUFFER_SIZE);
    }

    #[test]
    fn test_overflow_at_host_rate_stops_on_logical_boundary() {
        let mut buffer = SampleBuffer::new(16000);
        for _ in 0..(AUDIO_BUFFER_SIZE + 10) {
            buffer.write(0x80);
        }
        assert_eq!(buffer.cursor(), AUDIO_BUFFER_SIZE * 2);
    }
}
