pub mod constants;
pub mod cpu;
pub mod decoder;
pub mod error;
pub mod instructions;
pub mod machine;
pub mod memory;
pub mod utils;
pub mod video;

pub use error::VmError;
pub use machine::{FrameState, Machine, MachineConfig};
