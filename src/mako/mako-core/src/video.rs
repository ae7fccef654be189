//! Tile and sprite compositor.
//!
//! Once per frame the grid and sprite table are composited onto a 320x240
//! canvas of packed ARGB words, which is then replicated 2x2 into the
//! 640x480 RGBA framebuffer handed to the host. A pixel is written only
//! when its alpha byte is exactly 0xFF; there is no blending.

use crate::constants::registers::*;
use crate::constants::video::*;
use crate::memory::MemoryMap;
use crate::utils::unpack_argb;

pub struct Video {
    canvas: Vec<i32>, // Logical canvas, persists between frames
    frame: Vec<u8>,   // Upsampled RGBA output
}

impl Video {
    pub fn new() -> Self {
        Self {
            canvas: vec![0; CANVAS_WIDTH * CANVAS_HEIGHT],
            frame: vec![0; FRAME_WIDTH * FRAME_HEIGHT * 4],
        }
    }

    /// Composite one frame from the registers and tables in memory
    pub fn render(&mut self, mem: &MemoryMap) {
        let scroll_x = mem.reg(REGISTER_SX) as i64;
        let scroll_y = mem.reg(REGISTER_SY) as i64;

        let clear = mem.reg(REGISTER_CL);
        if is_opaque(clear) {
            self.canvas.iter_mut().for_each(|px| *px = clear);
        }

        self.draw_grid(mem, false, scroll_x, scroll_y);
        self.draw_sprites(mem, scroll_x, scroll_y);
        self.draw_grid(mem, true, scroll_x, scroll_y);
        self.upsample();
    }

    pub fn canvas(&self) -> &[i32] {
        &self.canvas
    }

    /// 640x480 RGBA bytes, row-major
    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    fn draw_pixel(&mut self, x: i64, y: i64, color: i32) {
        if !is_opaque(color) {
            return;
        }
        if x < 0 || x >= CANVAS_WIDTH as i64 || y < 0 || y >= CANVAS_HEIGHT as i64 {
            return;
        }
        self.canvas[x as usize + y as usize * CANVAS_WIDTH] = color;
    }

    fn draw_tile(&mut self, mem: &MemoryMap, tile: i32, px: i64, py: i64) {
        let tile = tile & !GRID_Z_MASK;
        if tile < 0 || off_canvas(px, py, TILE_SIZE as i64, TILE_SIZE as i64) {
            return;
        }
        let size = TILE_SIZE as i64;
        let mut i = mem.reg(REGISTER_GT) as i64 + tile as i64 * size * size;
        for y in 0..size {
            for x in 0..size {
                self.draw_pixel(px + x, py + y, mem.peek(i));
                i += 1;
            }
        }
    }

    /// One pass over the grid, drawing only tiles on the requested layer
    fn draw_grid(&mut self, mem: &MemoryMap, high_z: bool, scroll_x: i64, scroll_y: i64) {
        let skip = mem.reg(REGISTER_GS) as i64;
        let mut i = mem.reg(REGISTER_GP) as i64;
        for row in 0..GRID_HEIGHT as i64 {
            for col in 0..GRID_WIDTH as i64 {
                let tile = mem.peek(i);
                i += 1;
                if ((tile & GRID_Z_MASK) != 0) != high_z {
                    continue;
                }
                let size = TILE_SIZE as i64;
                self.draw_tile(mem, tile, col * size - scroll_x, row * size - scroll_y);
            }
            i += skip;
        }
    }

    /// Slots draw in ascending order, so later slots land on top
    fn draw_sprites(&mut self, mem: &MemoryMap, scroll_x: i64, scroll_y: i64) {
        let table = mem.reg(REGISTER_SP) as i64;
        for slot in 0..SPRITE_SLOTS as i64 {
            let base = table + slot * SPRITE_WORDS as i64;
            let status = mem.peek(base);
            let tile = mem.peek(base + 1);
            let px = mem.peek(base + 2) as i64;
            let py = mem.peek(base + 3) as i64;
            self.draw_sprite(mem, tile, status, px - scroll_x, py - scroll_y);
        }
    }

    fn draw_sprite(&mut self, mem: &MemoryMap, tile: i32, status: i32, px: i64, py: i64) {
        if status & 1 == 0 {
            return;
        }
        let (w, h) = sprite_size(status);
        if off_canvas(px, py, w, h) {
            return;
        }
        let h_mirror = status & H_MIRROR_MASK != 0;
        let v_mirror = status & V_MIRROR_MASK != 0;

        // Source data is stored unmirrored; mirroring reverses traversal
        let mut i = mem.reg(REGISTER_ST) as i64 + tile as i64 * w * h;
        for row in 0..h {
            let y = if v_mirror { h - 1 - row } else { row };
            for col in 0..w {
                let x = if h_mirror { w - 1 - col } else { col };
                self.draw_pixel(px + x, py + y, mem.peek(i));
                i += 1;
            }
        }
    }

    /// Nearest-neighbour 2x scale into the RGBA framebuffer
    fn upsample(&mut self) {
        for y in 0..CANVAS_HEIGHT {
            for x in 0..CANVAS_WIDTH {
                let (_, [r, g, b]) = unpack_argb(self.canvas[x + y * CANVAS_WIDTH]);
                for dy in 0..SCALE {
                    for dx in 0..SCALE {
                        let index = ((x * SCALE + dx) + (y * SCALE + dy) * FRAME_WIDTH) * 4;
                        self.frame[index..index + 4].copy_from_slice(&[r, g, b, 0xFF]);
                    }
                }
            }
        }
    }
}

impl Default for Video {
    fn default() -> Self {
        Self::new()
    }
}

fn is_opaque(color: i32) -> bool {
    unpack_argb(color).0 == OPAQUE_ALPHA
}

/// Sprite size in pixels from the status word
pub fn sprite_size(status: i32) -> (i64, i64) {
    let w = (((status & 0x0F00) >> 8) + 1) << 3;
    let h = (((status & 0xF000) >> 12) + 1) << 3;
    (w as i64, h as i64)
}

fn off_canvas(px: i64, py: i64, w: i64, h: i64) -> bool {
    px + w <= 0 || py + h <= 0 || px >= CANVAS_WIDTH as i64 || py >= CANVAS_HEIGHT as i64
}
