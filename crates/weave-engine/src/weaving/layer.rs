use serde::{Deserialize, Serialize};
use crate::api::types::Rgba;
use crate::error::ConfigError;

/// One colored layer of the picture, woven in a single pass.
///
/// Pixels are row-major with `y = 0` the bottom row (texture convention),
/// so grid row `y` reads sprite row `height - 1 - y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeavingLayer {
    pub name: String,
    pub thread_color: Rgba,
    /// Position in the weaving order.
    #[serde(default)]
    pub order_index: i32,
    pub width: u32,
    pub height: u32,
    pixels: Vec<Rgba>,
}

impl WeavingLayer {
    pub fn new(
        name: impl Into<String>,
        thread_color: Rgba,
        width: u32,
        height: u32,
        pixels: Vec<Rgba>,
    ) -> Result<Self, ConfigError> {
        let layer = Self {
            name: name.into(),
            thread_color,
            order_index: 0,
            width,
            height,
            pixels,
        };
        layer.validate()?;
        Ok(layer)
    }

    /// Build from tightly packed 8-bit RGBA bytes.
    pub fn from_rgba8(
        name: impl Into<String>,
        thread_color: Rgba,
        width: u32,
        height: u32,
        bytes: &[u8],
    ) -> Result<Self, ConfigError> {
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(ConfigError::ByteCount {
                expected,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|p| Rgba::rgba8(p[0], p[1], p[2], p[3]))
            .collect();
        Self::new(name, thread_color, width, height, pixels)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let layer: Self = serde_json::from_str(json)?;
        layer.validate()?;
        Ok(layer)
    }

    pub fn with_order(mut self, order_index: i32) -> Self {
        self.order_index = order_index;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let expected = self.width as usize * self.height as usize;
        if self.pixels.len() != expected {
            return Err(ConfigError::PixelCount {
                name: self.name.clone(),
                width: self.width,
                height: self.height,
                actual: self.pixels.len(),
            });
        }
        Ok(())
    }

    /// Pixel at (x, y); transparent outside the image.
    pub fn pixel(&self, x: i32, y: i32) -> Rgba {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return Rgba::TRANSPARENT;
        }
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    pub fn is_pixel_visible(&self, x: i32, y: i32, alpha_threshold: f32) -> bool {
        self.pixel(x, y).a > alpha_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> WeavingLayer {
        let on = Rgba::rgb(1.0, 0.0, 0.0);
        let off = Rgba::TRANSPARENT;
        WeavingLayer::new("checker", Rgba::rgb(1.0, 0.5, 0.5), 2, 2, vec![on, off, off, on]).unwrap()
    }

    #[test]
    fn pixel_lookup_and_bounds() {
        let layer = checker();
        assert_eq!(layer.pixel(0, 0).a, 1.0);
        assert_eq!(layer.pixel(1, 0).a, 0.0);
        assert_eq!(layer.pixel(2, 0), Rgba::TRANSPARENT);
        assert_eq!(layer.pixel(0, -1), Rgba::TRANSPARENT);
    }

    #[test]
    fn visibility_is_strictly_above_threshold() {
        let half = Rgba::new(1.0, 1.0, 1.0, 0.5);
        let layer = WeavingLayer::new("half", Rgba::WHITE, 1, 1, vec![half]).unwrap();
        assert!(!layer.is_pixel_visible(0, 0, 0.5));
        assert!(layer.is_pixel_visible(0, 0, 0.49));
    }

    #[test]
    fn pixel_count_must_match() {
        let err = WeavingLayer::new("bad", Rgba::WHITE, 3, 3, vec![Rgba::WHITE; 4]);
        assert!(matches!(err, Err(ConfigError::PixelCount { actual: 4, .. })));
    }

    #[test]
    fn from_rgba8_rejects_stray_bytes() {
        let bytes = [255, 0, 0, 255, 9, 9, 9];
        let err = WeavingLayer::from_rgba8("short", Rgba::WHITE, 1, 1, &bytes);
        assert!(matches!(
            err,
            Err(ConfigError::ByteCount { expected: 4, actual: 7 })
        ));
        assert!(WeavingLayer::from_rgba8("empty", Rgba::WHITE, 1, 1, &[]).is_err());
    }

    #[test]
    fn from_rgba8_bytes() {
        let bytes = [255, 0, 0, 255, 0, 0, 0, 0];
        let layer = WeavingLayer::from_rgba8("row", Rgba::WHITE, 2, 1, &bytes).unwrap();
        assert!(layer.is_pixel_visible(0, 0, 0.5));
        assert!(!layer.is_pixel_visible(1, 0, 0.5));
    }

    #[test]
    fn from_json() {
        let json = r#"{
            "name": "yellow",
            "thread_color": { "r": 1.0, "g": 0.9, "b": 0.1, "a": 1.0 },
            "order_index": 2,
            "width": 1,
            "height": 1,
            "pixels": [{ "r": 1.0, "g": 1.0, "b": 0.0, "a": 1.0 }]
        }"#;
        let layer = WeavingLayer::from_json(json).unwrap();
        assert_eq!(layer.name, "yellow");
        assert_eq!(layer.order_index, 2);
        assert!(layer.is_pixel_visible(0, 0, 0.5));
    }
}
