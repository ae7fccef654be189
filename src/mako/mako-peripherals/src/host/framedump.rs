use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, error};
use mako_core::constants::video::{FRAME_HEIGHT, FRAME_WIDTH};
use mako_core::memory::mods::FrameSink;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

/// Writes every presented frame into a directory as numbered PPM files
pub struct FrameDumper {
    tx: Option<Sender<(u64, Vec<u8>)>>,
    writer: Option<JoinHandle<()>>,
    frame: u64,
}

/// Binary PPM of an RGBA frame; alpha is dropped
pub fn encode_ppm(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut out = format!("P6\n{} {}\n255\n", width, height).into_bytes();
    out.reserve(width * height * 3);
    for px in rgba.chunks_exact(4).take(width * height) {
        out.extend_from_slice(&px[..3]);
    }
    out
}

pub fn frame_path(dir: &Path, frame: u64) -> PathBuf {
    dir.join(format!("frame_{:05}.ppm", frame))
}

// Thread responsible for encoding and writing frames off the emulation loop
fn writer_thread(rx: Receiver<(u64, Vec<u8>)>, dir: PathBuf) {
    for (frame, rgba) in rx.iter() {
        let path = frame_path(&dir, frame);
        let data = encode_ppm(&rgba, FRAME_WIDTH, FRAME_HEIGHT);
        let result = std::fs::File::create(&path).and_then(|mut f| f.write_all(&data));
        match result {
            Ok(_) => debug!("Wrote {}", path.display()),
            Err(e) => {
                error!("Unable to write {}: {}", path.display(), e);
                break;
            }
        }
    }
}

impl FrameDumper {
    pub fn new<P: AsRef<Path>>(dir: P) -> std::io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;

        let (tx, rx) = unbounded();
        let writer = std::thread::spawn(move || writer_thread(rx, dir));
        Ok(FrameDumper {
            tx: Some(tx),
            writer: Some(writer),
            frame: 0,
        })
    }

    /// Frames handed to the writer so far
    pub fn frames(&self) -> u64 {
        self.frame
    }
}

impl FrameSink for FrameDumper {
    fn present(&mut self, frame: &[u8]) {
        if let Some(tx) = &self.tx {
            if tx.send((self.frame, frame.to_vec())).is_err() {
                error!("Frame writer stopped; no further frames will be saved");
                self.tx = None;
                return;
            }
            self.frame += 1;
        }
    }
}

impl Drop for FrameDumper {
    // Flush queued frames before returning
    fn drop(&mut self) {
        self.tx.take();
        if let Some(writer) = self.writer.take() {
            if writer.join().is_err() {
                error!("Frame writer panicked");
            }
        }
    }
}
