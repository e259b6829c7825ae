//! Orders in which the tip visits canvas cells.

use super::layer::WeavingLayer;
use crate::api::types::GridPos;

pub trait PathGenerator {
    fn generate(&self, grid_size: u32) -> Vec<GridPos>;
}

/// Row by row, left to right.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearPath;

impl PathGenerator for LinearPath {
    fn generate(&self, grid_size: u32) -> Vec<GridPos> {
        let n = grid_size as i32;
        (0..n)
            .flat_map(|y| (0..n).map(move |x| GridPos::new(x, y)))
            .collect()
    }
}

/// Row by row, alternating direction.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerpentinePath;

impl PathGenerator for SerpentinePath {
    fn generate(&self, grid_size: u32) -> Vec<GridPos> {
        let n = grid_size as i32;
        let mut path = Vec::with_capacity((grid_size as usize).pow(2));
        for y in 0..n {
            if y % 2 == 0 {
                path.extend((0..n).map(|x| GridPos::new(x, y)));
            } else {
                path.extend((0..n).rev().map(|x| GridPos::new(x, y)));
            }
        }
        path
    }
}

/// Row scan that keeps only cells whose layer pixel is visible.
#[derive(Debug, Clone, Copy)]
pub struct SelectivePath<'a> {
    layer: &'a WeavingLayer,
    alpha_threshold: f32,
}

impl<'a> SelectivePath<'a> {
    pub fn new(layer: &'a WeavingLayer, alpha_threshold: f32) -> Self {
        Self {
            layer,
            alpha_threshold,
        }
    }
}

impl PathGenerator for SelectivePath<'_> {
    fn generate(&self, grid_size: u32) -> Vec<GridPos> {
        let flip = grid_size as i32 - 1;
        LinearPath
            .generate(grid_size)
            .into_iter()
            .filter(|p| {
                self.layer
                    .is_pixel_visible(p.x, flip - p.y, self.alpha_threshold)
            })
            .collect()
    }
}
