/// Byte-oriented character device wired to the CO port
pub trait CharDevice {
    /// Next input character, or -1 when none is available
    fn read(&mut self) -> i32;
    fn write(&mut self, value: i32);
}

/// Receives the upsampled RGBA framebuffer once per completed frame
pub trait FrameSink {
    fn present(&mut self, frame: &[u8]);
}

/// Receives the samples produced during the last frame
pub trait AudioSink {
    fn submit(&mut self, samples: &[f32]);
}

/// Character device with no input and a discarding output
pub struct NullConsole;

impl CharDevice for NullConsole {
    fn read(&mut self) -> i32 {
        -1
    }

    fn write(&mut self, _value: i32) {}
}
