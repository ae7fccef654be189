pub mod console;
pub mod framedump;
pub mod pcmdump;
