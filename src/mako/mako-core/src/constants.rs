// Words reserved for the register header at the bottom of memory
pub const RESERVED_HEADER: usize = 19;

pub mod registers {
    // Execution registers
    pub const REGISTER_PC: usize = 0; // Program counter
    pub const REGISTER_DP: usize = 1; // Data stack pointer
    pub const REGISTER_RP: usize = 2; // Return stack pointer

    // Graphics registers
    pub const REGISTER_GP: usize = 3; // Grid pointer
    pub const REGISTER_GT: usize = 4; // Grid tile pointer
    pub const REGISTER_SP: usize = 5; // Sprite pointer
    pub const REGISTER_ST: usize = 6; // Sprite tile pointer
    pub const REGISTER_SX: usize = 7; // Scroll X
    pub const REGISTER_SY: usize = 8; // Scroll Y
    pub const REGISTER_GS: usize = 9; // Grid horizontal skip
    pub const REGISTER_CL: usize = 10; // Clear color
}

pub mod ports {
    // Device ports intercepted by the load/store path
    pub const PORT_RN: usize = 11; // Random number
    pub const PORT_KY: usize = 12; // Latched key input
    pub const PORT_CO: usize = 13; // Character out/in
    pub const PORT_AU: usize = 14; // Audio out (8khz, 8-bit)
    pub const PORT_KB: usize = 15; // Keyboard queue in

    // External storage, reserved and inert
    pub const PORT_XO: usize = 16;
    pub const PORT_XA: usize = 17;
    pub const PORT_XS: usize = 18;
}

pub mod opcodes {
    pub const OP_CONST: i32 = 0;
    pub const OP_CALL: i32 = 1;
    pub const OP_JUMP: i32 = 2;
    pub const OP_JUMPZ: i32 = 3;
    pub const OP_JUMPIF: i32 = 4;

    pub const OP_LOAD: i32 = 10;
    pub const OP_STOR: i32 = 11;
    pub const OP_RETURN: i32 = 12;
    pub const OP_DROP: i32 = 13;
    pub const OP_SWAP: i32 = 14;
    pub const OP_DUP: i32 = 15;
    pub const OP_OVER: i32 = 16;
    pub const OP_STR: i32 = 17;
    pub const OP_RTS: i32 = 18;

    pub const OP_ADD: i32 = 19;
    pub const OP_SUB: i32 = 20;
    pub const OP_MUL: i32 = 21;
    pub const OP_DIV: i32 = 22;
    pub const OP_MOD: i32 = 23;
    pub const OP_AND: i32 = 24;
    pub const OP_OR: i32 = 25;
    pub const OP_XOR: i32 = 26;
    pub const OP_NOT: i32 = 27;
    pub const OP_SGT: i32 = 28;
    pub const OP_SLT: i32 = 29;
    pub const OP_SYNC: i32 = 30;
    pub const OP_NEXT: i32 = 31;
}

pub mod keys {
    // Held-button bits latched into KY
    pub const KEY_UP: i32 = 0x01;
    pub const KEY_RT: i32 = 0x02;
    pub const KEY_DN: i32 = 0x04;
    pub const KEY_LF: i32 = 0x08;
    pub const KEY_A: i32 = 0x10;
    pub const KEY_B: i32 = 0x20;
    pub const KEY_MASK: i32 = KEY_UP | KEY_RT | KEY_DN | KEY_LF | KEY_A | KEY_B;
}

pub mod video {
    // Logical canvas and presented framebuffer sizes in pixels
    pub const CANVAS_WIDTH: usize = 320;
    pub const CANVAS_HEIGHT: usize = 240;
    pub const SCALE: usize = 2;
    pub const FRAME_WIDTH: usize = CANVAS_WIDTH * SCALE;
    pub const FRAME_HEIGHT: usize = CANVAS_HEIGHT * SCALE;

    // Grid viewport in tiles, one column and row more than the screen for scrolling
    pub const GRID_WIDTH: usize = 41;
    pub const GRID_HEIGHT: usize = 31;
    pub const TILE_SIZE: i32 = 8;

    pub const SPRITE_SLOTS: usize = 256;
    pub const SPRITE_WORDS: usize = 4;

    pub const H_MIRROR_MASK: i32 = 0x10000; // sprite is mirrored horizontally
    pub const V_MIRROR_MASK: i32 = 0x20000; // sprite is mirrored vertically
    pub const GRID_Z_MASK: i32 = 0x40000000; // grid tile is drawn above sprites
    pub const OPAQUE_ALPHA: u32 = 0xFF;
}

pub mod audio {
    pub const AUDIO_RATE: u32 = 8000; // Logical sample rate in Hz
    pub const AUDIO_BUFFER_SIZE: usize = 670; // Logical samples; a frame at 60Hz is ~667
    pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
}
