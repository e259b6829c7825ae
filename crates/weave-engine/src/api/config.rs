use glam::Vec3;
use serde::{Deserialize, Serialize};
use crate::api::types::Rgba;
use crate::error::{ensure_positive, ensure_range, ConfigError};
use crate::rope::chain::ChainParams;
use crate::rope::resample::CurveStrategy;
use crate::thread::controller::AnchorSwing;

/// Largest canvas side accepted from configuration.
pub const MAX_GRID_SIZE: u32 = 1024;

/// Configuration of the simulated 3D thread.
/// Loaded from JSON; missing fields fall back to the defaults below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadConfig {
    /// Chain nodes, anchor and tip included.
    pub node_count: usize,
    pub segment_length: f32,
    /// Constraint passes per step (0 disables length correction).
    pub iterations: usize,
    pub elasticity: f32,
    /// Fraction of the length error corrected per pass, 0..=1.
    pub softness: f32,
    /// Velocity retained per step, 0..=1.
    pub damping: f32,
    pub gravity: Vec3,
    /// Tube radius.
    pub radius: f32,
    pub radial_segments: usize,
    /// How the centerline is derived.
    pub curve: CurveStrategy,
}

impl Default for ThreadConfig {
    fn default() -> Self {
        let chain = ChainParams::default();
        Self {
            node_count: 16,
            segment_length: chain.segment_length,
            iterations: chain.iterations,
            elasticity: chain.elasticity,
            softness: chain.softness,
            damping: chain.damping,
            gravity: chain.gravity,
            radius: 0.025,
            radial_segments: 12,
            curve: CurveStrategy::default(),
        }
    }
}

impl ThreadConfig {
    /// Parse and validate.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = self.curve.min_nodes().max(2);
        if self.node_count < required {
            return Err(ConfigError::TooFewNodes {
                nodes: self.node_count,
                required,
                strategy: self.curve.name(),
            });
        }
        ensure_positive("segment_length", self.segment_length)?;
        ensure_range("elasticity", self.elasticity, 0.0, f32::MAX)?;
        ensure_range("softness", self.softness, 0.0, 1.0)?;
        ensure_range("damping", self.damping, 0.0, 1.0)?;
        ensure_positive("radius", self.radius)?;
        if self.radial_segments < 3 {
            return Err(ConfigError::TooFewRadialSegments(self.radial_segments));
        }
        self.curve.validate()
    }

    pub fn chain_params(&self) -> ChainParams {
        ChainParams {
            segment_length: self.segment_length,
            iterations: self.iterations,
            elasticity: self.elasticity,
            softness: self.softness,
            damping: self.damping,
            gravity: self.gravity,
        }
    }
}

/// Look of the line-rendered rope and its anchor sway.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RopeConfig {
    pub rope_width: f32,
    /// Peak sideways offset of the anchor.
    pub swing_amount: f32,
    /// Sway rate in radians per second.
    pub swing_speed: f32,
}

impl Default for RopeConfig {
    fn default() -> Self {
        Self {
            rope_width: 0.1,
            swing_amount: 0.04,
            swing_speed: 6.0,
        }
    }
}

impl RopeConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        ensure_positive("rope_width", config.rope_width)?;
        Ok(config)
    }
}

/// Canvas, pacing and thread setup for a weaving session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeavingConfig {
    /// Cells per side of the square canvas.
    pub grid_size: u32,
    /// Cell edge length in world units.
    pub block_size: f32,
    pub default_block_color: Rgba,
    /// Tip speed in world units per second.
    pub thread_speed: f32,
    pub thread_width: f32,
    /// Pixels with alpha strictly above this are woven.
    pub alpha_threshold: f32,
    /// Offset added to every block position the tip travels to.
    pub tip_lift: Vec3,
    /// Where the thread leaves the spool.
    pub spool_anchor: Vec3,
    /// Sideways axis of the spool, used for sway.
    pub anchor_right: Vec3,
    pub swing: AnchorSwing,
    pub thread: ThreadConfig,
}

impl Default for WeavingConfig {
    fn default() -> Self {
        Self {
            grid_size: 26,
            block_size: 0.2,
            default_block_color: Rgba::WHITE,
            thread_speed: 50.0,
            thread_width: 0.1,
            alpha_threshold: 0.5,
            tip_lift: Vec3::new(0.0, 0.0, 0.02),
            spool_anchor: Vec3::new(0.0, 3.2, 0.0),
            anchor_right: Vec3::X,
            swing: AnchorSwing::Distance,
            thread: ThreadConfig::default(),
        }
    }
}

impl WeavingConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_range("grid_size", self.grid_size as f32, 1.0, MAX_GRID_SIZE as f32)?;
        ensure_positive("block_size", self.block_size)?;
        ensure_positive("thread_speed", self.thread_speed)?;
        ensure_positive("thread_width", self.thread_width)?;
        ensure_range("alpha_threshold", self.alpha_threshold, 0.0, 1.0)?;
        self.thread.validate()
    }

    /// Side length of the canvas in world units.
    pub fn canvas_extent(&self) -> f32 {
        self.grid_size as f32 * self.block_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ThreadConfig::default().validate().is_ok());
        assert!(WeavingConfig::default().validate().is_ok());
    }

    #[test]
    fn catmull_rom_needs_four_nodes() {
        let config = ThreadConfig {
            node_count: 3,
            ..Default::default()
        };
        match config.validate() {
            Err(ConfigError::TooFewNodes { nodes, required, .. }) => {
                assert_eq!(nodes, 3);
                assert_eq!(required, 4);
            }
            other => panic!("expected TooFewNodes, got {:?}", other),
        }
    }

    #[test]
    fn sag_bezier_accepts_two_nodes() {
        let config = ThreadConfig {
            node_count: 2,
            curve: CurveStrategy::sag_bezier(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let single = ThreadConfig { node_count: 1, ..config };
        assert!(single.validate().is_err());
    }

    #[test]
    fn rejects_degenerate_geometry() {
        let base = ThreadConfig::default();
        assert!(ThreadConfig { segment_length: 0.0, ..base }.validate().is_err());
        assert!(ThreadConfig { radius: -1.0, ..base }.validate().is_err());
        assert!(ThreadConfig { radial_segments: 2, ..base }.validate().is_err());
        assert!(ThreadConfig { softness: 1.5, ..base }.validate().is_err());
        assert!(ThreadConfig { iterations: 0, ..base }.validate().is_ok());
    }

    #[test]
    fn thread_config_from_partial_json() {
        let json = r#"{
            "node_count": 20,
            "gravity": [0.0, -1.0, 0.0],
            "curve": { "kind": "catmull_rom", "samples_per_span": 4 }
        }"#;
        let config = ThreadConfig::from_json(json).unwrap();
        assert_eq!(config.node_count, 20);
        assert_eq!(config.gravity, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(config.curve, CurveStrategy::CatmullRom { samples_per_span: 4 });
        assert_eq!(config.radial_segments, 12);
        assert_eq!(config.chain_params().segment_length, 0.08);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            ThreadConfig::from_json("{ node_count: }"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn weaving_config_nested_thread() {
        let json = r#"{ "grid_size": 4, "thread": { "radius": 0.05 } }"#;
        let config = WeavingConfig::from_json(json).unwrap();
        assert_eq!(config.grid_size, 4);
        assert_eq!(config.thread.radius, 0.05);
        assert_eq!(config.block_size, 0.2);
        assert!((config.canvas_extent() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn weaving_config_rejects_bad_threshold() {
        assert!(WeavingConfig::from_json(r#"{ "alpha_threshold": 2.0 }"#).is_err());
    }

    #[test]
    fn weaving_config_bounds_grid_size() {
        assert!(WeavingConfig::from_json(r#"{ "grid_size": 0 }"#).is_err());
        assert!(WeavingConfig::from_json(r#"{ "grid_size": 70000 }"#).is_err());
        assert!(WeavingConfig::from_json(r#"{ "grid_size": 1024 }"#).is_ok());
    }

    #[test]
    fn rope_config_defaults() {
        let config = RopeConfig::from_json("{}").unwrap();
        assert_eq!(config, RopeConfig::default());
    }
}
