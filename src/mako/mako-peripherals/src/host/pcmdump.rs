use log::warn;
use mako_core::memory::mods::AudioSink;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Appends each frame's samples to a raw unsigned 8-bit PCM file
pub struct PcmDumper<W: Write> {
    out: W,
    failed: bool,
}

pub fn to_pcm(samples: &[f32]) -> Vec<u8> {
    samples.iter().map(|s| (s * 256.0) as u8).collect()
}

impl PcmDumper<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        Ok(PcmDumper::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> PcmDumper<W> {
    pub fn new(out: W) -> Self {
        PcmDumper { out, failed: false }
    }

    pub fn into_inner(mut self) -> std::io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> AudioSink for PcmDumper<W> {
    fn submit(&mut self, samples: &[f32]) {
        if self.failed {
            return;
        }
        if let Err(e) = self.out.write_all(&to_pcm(samples)) {
            warn!("Audio dump stopped: {}", e);
            self.failed = true;
        }
    }
}
