pub mod keymap;

#[cfg(feature = "host-peripherals")]
pub mod host;

#[cfg(feature = "host-peripherals")]
pub use host::{console, framedump, pcmdump};
