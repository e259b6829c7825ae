//! Square grid of colorable blocks.
//!
//! Blocks are stored in row-major order: index = y * grid_size + x, with
//! `y = 0` the top row. The canvas is centered on the world origin.

use glam::Vec3;
use super::events::{WeavingEvent, WeavingEvents};
use crate::api::config::WeavingConfig;
use crate::api::types::{GridPos, Rgba};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasBlock {
    pub grid: GridPos,
    /// Block center in world space.
    pub world_position: Vec3,
    pub color: Rgba,
}

#[derive(Debug, Clone)]
pub struct WeavingCanvas {
    grid_size: u32,
    block_size: f32,
    default_color: Rgba,
    blocks: Vec<CanvasBlock>,
}

impl WeavingCanvas {
    pub fn new(config: &WeavingConfig) -> Self {
        let grid_size = config.grid_size;
        let block_size = config.block_size;
        let extent = config.canvas_extent();
        let start_x = -extent / 2.0;
        let start_y = extent / 2.0;

        let mut blocks = Vec::with_capacity((grid_size as usize).pow(2));
        for y in 0..grid_size {
            for x in 0..grid_size {
                let world_position = Vec3::new(
                    start_x + x as f32 * block_size + block_size / 2.0,
                    start_y - y as f32 * block_size - block_size / 2.0,
                    0.0,
                );
                blocks.push(CanvasBlock {
                    grid: GridPos::new(x as i32, y as i32),
                    world_position,
                    color: config.default_block_color,
                });
            }
        }

        Self {
            grid_size,
            block_size,
            default_color: config.default_block_color,
            blocks,
        }
    }

    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    pub fn block_size(&self) -> f32 {
        self.block_size
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let n = self.grid_size as i32;
        if x < 0 || y < 0 || x >= n || y >= n {
            return None;
        }
        Some((y * n + x) as usize)
    }

    /// Block at (x, y), or `None` outside the grid.
    pub fn get(&self, x: i32, y: i32) -> Option<&CanvasBlock> {
        self.index(x, y).map(|i| &self.blocks[i])
    }

    pub fn block_world_position(&self, x: i32, y: i32) -> Option<Vec3> {
        self.get(x, y).map(|b| b.world_position)
    }

    /// Paint one block. Returns false (and emits nothing) outside the grid.
    pub fn color_block(&mut self, x: i32, y: i32, color: Rgba, events: &mut WeavingEvents) -> bool {
        let Some(i) = self.index(x, y) else {
            return false;
        };
        self.blocks[i].color = color;
        events.push(WeavingEvent::BlockColored { x, y });
        true
    }

    /// Return every block to the default color.
    pub fn reset(&mut self, events: &mut WeavingEvents) {
        for block in &mut self.blocks {
            block.color = self.default_color;
        }
        events.push(WeavingEvent::CanvasReset);
    }

    pub fn blocks(&self) -> &[CanvasBlock] {
        &self.blocks
    }

    /// Blocks whose color differs from the default.
    pub fn painted_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| b.color != self.default_color)
            .count()
    }

    /// Write RGBA floats for every block, row-major, into `out`.
    pub fn write_colors(&self, out: &mut Vec<f32>) {
        out.clear();
        out.reserve(self.blocks.len() * 4);
        for block in &self.blocks {
            out.extend_from_slice(&block.color.to_array());
        }
    }
}
