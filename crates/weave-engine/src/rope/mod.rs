pub mod bezier;
pub mod chain;
pub mod decorative;
pub mod resample;
pub mod spring;
#[cfg(feature = "vectors")]
pub mod stroke;
pub mod tube;

pub use bezier::{rational_quadratic, RationalBezier};
pub use chain::{ChainNode, ChainParams, VerletChain};
pub use decorative::{BezierRope, BezierRopeSettings, RopeEvent};
pub use resample::{CurveStrategy, RopeSnapshot};
pub use spring::{SpringDamperCurve, SpringState};
#[cfg(feature = "vectors")]
pub use stroke::{StrokeVertex, ThreadStroke};
pub use tube::{TubeMesh, TubeMeshBuilder, TubeVertex};
