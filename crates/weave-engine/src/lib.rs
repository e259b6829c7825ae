pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod rope;
pub mod thread;
pub mod weaving;

// Re-export key types at crate root for convenience
pub use api::config::{RopeConfig, ThreadConfig, WeavingConfig, MAX_GRID_SIZE};
pub use api::types::{EventRecord, GridPos, Rgba};
pub use crate::core::queue::EventQueue;
pub use crate::core::time::{FixedTimestep, SimClock};
pub use error::{ConfigError, ThreadError};
pub use rope::{
    rational_quadratic, BezierRope, BezierRopeSettings, ChainNode, ChainParams, CurveStrategy,
    RationalBezier, RopeEvent, RopeSnapshot, SpringDamperCurve, SpringState, TubeMesh,
    TubeMeshBuilder, TubeVertex, VerletChain,
};
pub use thread::{
    AnchorSwing, ChainRope, MotionStatus, MoveTask, RopeModel, ThreadMotionController, ThreadState,
};
pub use weaving::{
    CanvasBlock, LinearPath, PathGenerator, SelectivePath, SerpentinePath, WeavingCanvas,
    WeavingEvent, WeavingEvents, WeavingLayer, WeavingSession,
};

#[cfg(feature = "vectors")]
pub use rope::{StrokeVertex, ThreadStroke};

pub use extensions::{clamp01, inverse_lerp, lerp, lerp_vec3, move_towards};
