use crate::constants::keys::KEY_MASK;
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, warn};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

/// Host-side handle for feeding buttons and characters into a machine
/// Cloneable and usable from any thread
#[derive(Clone)]
pub struct Keypad {
    held: Arc<AtomicI32>,
    queue: Sender<i32>,
}

impl Keypad {
    pub fn press(&self, buttons: i32) {
        self.held.fetch_or(buttons & KEY_MASK, Ordering::Relaxed);
    }

    pub fn release(&self, buttons: i32) {
        self.held.fetch_and(!buttons, Ordering::Relaxed);
    }

    /// Replace the whole held-button mask
    pub fn set(&self, buttons: i32) {
        self.held.store(buttons & KEY_MASK, Ordering::Relaxed);
    }

    pub fn held(&self) -> i32 {
        self.held.load(Ordering::Relaxed)
    }

    /// Queue a typed character for KB reads
    pub fn push_char(&self, code: i32) {
        let code = match code {
            0 => {
                debug!("Ignoring null character code");
                return;
            }
            13 => 10, // Carriage return becomes newline
            c => c & 0xFF,
        };
        if self.queue.send(code).is_err() {
            warn!("Keyboard queue disconnected; dropping {}", code);
        }
    }
}

/// Machine-side input state: the live mask, its per-frame latch and the KB queue
pub struct InputPorts {
    held: Arc<AtomicI32>,
    latched: i32,
    queue_tx: Sender<i32>,
    queue_rx: Receiver<i32>,
}

impl InputPorts {
    pub fn new() -> Self {
        let (queue_tx, queue_rx) = unbounded();
        Self {
            held: Arc::new(AtomicI32::new(0)),
            latched: 0,
            queue_tx,
            queue_rx,
        }
    }

    pub fn keypad(&self) -> Keypad {
        Keypad {
            held: Arc::clone(&self.held),
            queue: self.queue_tx.clone(),
        }
    }

    /// Sample the live mask; KY reads see this value until the next latch
    pub fn latch(&mut self) {
        self.latched = self.held.load(Ordering::Relaxed);
    }

    pub fn latched(&self) -> i32 {
        self.latched
    }

    /// Pop the oldest queued character, -1 when empty
    pub fn next_char(&mut self) -> i32 {
        self.queue_rx.try_recv().unwrap_or(-1)
    }
}

impl Default for InputPorts {
    fn default() -> Self {
        Self::new()
    }
}
